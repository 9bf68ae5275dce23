use crate::error::ConfigError;
use crate::handlers::TimingModel;
use crate::rng::{RngKind, DEFAULT_LCG_SEED};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum QueueCapacity {
    /// At most this many customers wait. `Bounded(0)` is a pure loss system.
    Bounded(usize),
    Unbounded,
}

impl QueueCapacity {
    pub fn limit(&self) -> Option<usize> {
        match self {
            Self::Bounded(n) => Some(*n),
            Self::Unbounded => None,
        }
    }
}

/// What an arrival does when the waiting room (capacity > 0) is already full.
/// A zero-capacity queue always blocks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    #[default]
    Abort,
    Block,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum Termination {
    /// Stop when the clock reaches this time.
    Horizon(f64),
    /// Stop once this many customers have entered service.
    Served(u64),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimConfig {
    pub timing: TimingModel,
    pub servers: usize,
    pub queue_capacity: QueueCapacity,
    #[serde(default)]
    pub overflow: OverflowPolicy,
    pub termination: Termination,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub rng: RngKind,
}

fn default_seed() -> u64 {
    DEFAULT_LCG_SEED
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::mm1(2.0, 1.0, 10_000)
    }
}

impl SimConfig {
    /// Single server, unbounded FIFO queue, stops after `served` customers.
    pub fn mm1(mean_interarrival: f64, mean_service: f64, served: u64) -> Self {
        Self {
            timing: TimingModel::Continuous { mean_interarrival, mean_service },
            servers: 1,
            queue_capacity: QueueCapacity::Unbounded,
            overflow: OverflowPolicy::Abort,
            termination: Termination::Served(served),
            seed: DEFAULT_LCG_SEED,
            rng: RngKind::Lcg,
        }
    }

    /// M/M/m/m loss system.
    pub fn erlang_b(mean_interarrival: f64, mean_service: f64, servers: usize, served: u64) -> Self {
        Self {
            servers,
            queue_capacity: QueueCapacity::Bounded(0),
            overflow: OverflowPolicy::Block,
            ..Self::mm1(mean_interarrival, mean_service, served)
        }
    }

    /// M/M/m with an unbounded waiting room.
    pub fn erlang_c(mean_interarrival: f64, mean_service: f64, servers: usize, served: u64) -> Self {
        Self {
            servers,
            ..Self::mm1(mean_interarrival, mean_service, served)
        }
    }

    /// Geom/Geom/m/N: `capacity` counts customers in service plus waiting
    /// and must be at least `servers`.
    pub fn geo_geo_m_n(
        arrival_prob: f64,
        service_prob: f64,
        servers: usize,
        capacity: usize,
        slots: u64,
    ) -> Result<Self, ConfigError> {
        let Some(waiting_room) = capacity.checked_sub(servers) else {
            return Err(ConfigError::CapacityBelowServers { capacity, servers });
        };
        Ok(Self {
            timing: TimingModel::Slotted { arrival_prob, service_prob },
            servers,
            queue_capacity: QueueCapacity::Bounded(waiting_room),
            overflow: OverflowPolicy::Block,
            termination: Termination::Horizon(slots as f64),
            seed: DEFAULT_LCG_SEED,
            rng: RngKind::Lcg,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_rng(mut self, rng: RngKind) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_termination(mut self, termination: Termination) -> Self {
        self.termination = termination;
        self
    }

    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: QueueCapacity) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.timing {
            TimingModel::Continuous { mean_interarrival, mean_service } => {
                check_mean("interarrival", mean_interarrival)?;
                check_mean("service", mean_service)?;
            }
            TimingModel::Slotted { arrival_prob, service_prob } => {
                check_prob("arrival", arrival_prob)?;
                check_prob("service", service_prob)?;
            }
        }
        if self.servers == 0 {
            return Err(ConfigError::NoServers);
        }
        match self.termination {
            Termination::Horizon(t) if !(t.is_finite() && t > 0.0) => {
                return Err(ConfigError::InvalidHorizon(t));
            }
            Termination::Served(0) => return Err(ConfigError::ZeroServedTarget),
            _ => {}
        }
        if self.rng == RngKind::Lcg && self.seed % 2_147_483_647 == 0 {
            return Err(ConfigError::ZeroLcgSeed);
        }
        Ok(())
    }
}

fn check_mean(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveMean { name, value })
    }
}

fn check_prob(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}
