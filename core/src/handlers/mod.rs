//! Event handlers for the single-class FIFO queue.
//!
//! Handlers mutate [`SystemState`](crate::state::SystemState) in place and
//! return the follow-up events they need; the driver owns the event list and
//! does the actual scheduling.

use crate::config::OverflowPolicy;
use crate::traits::UniformSource;
use serde::{Deserialize, Serialize};

pub mod arrival;
pub mod departure;

/// How inter-arrival and service durations are drawn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum TimingModel {
    /// Exponential inter-arrival and service times (M/M/m).
    Continuous {
        mean_interarrival: f64,
        mean_service: f64,
    },
    /// One Bernoulli trial per slot for the arrival stream and for each busy
    /// server (Geom/Geom/m). Durations are whole slot counts.
    Slotted {
        arrival_prob: f64,
        service_prob: f64,
    },
}

impl TimingModel {
    pub fn interarrival<R: UniformSource + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            TimingModel::Continuous { mean_interarrival, .. } => rng.exponential(mean_interarrival),
            TimingModel::Slotted { arrival_prob, .. } => rng.geometric(arrival_prob) as f64,
        }
    }

    pub fn service<R: UniformSource + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            TimingModel::Continuous { mean_service, .. } => rng.exponential(mean_service),
            TimingModel::Slotted { service_prob, .. } => rng.geometric(service_prob) as f64,
        }
    }

    pub fn is_slotted(&self) -> bool {
        matches!(self, TimingModel::Slotted { .. })
    }
}

/// Timing plus admission policy: everything the handlers need besides state.
#[derive(Debug, Clone, Copy)]
pub struct QueueModel {
    pub timing: TimingModel,
    pub overflow: OverflowPolicy,
}

impl QueueModel {
    pub fn new(timing: TimingModel, overflow: OverflowPolicy) -> Self {
        Self { timing, overflow }
    }
}
