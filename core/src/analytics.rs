use crate::engine::{Event, Simulation};
use crate::state::{SystemState, WAIT_SCALE};
use crate::traits::Observer;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Final statistics of one run. Time averages are `area / clock`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub clock: f64,
    pub arrivals: u64,
    pub served: u64,
    pub completed: u64,
    pub blocked: u64,
    pub waited: u64,
    /// Fraction of time with exactly `n` customers in the system.
    pub state_probabilities: Vec<f64>,
    pub avg_queue_length: f64,
    pub avg_in_system: f64,
    pub server_utilization: Vec<f64>,
    pub utilization: f64,
    pub avg_wait: f64,
    pub wait_p50: f64,
    pub wait_p90: f64,
    pub wait_p99: f64,
    /// Blocked arrivals over all arrivals.
    pub blocking_probability: f64,
    /// Fraction of time every server was busy.
    pub all_busy_probability: f64,
    pub throughput: f64,
}

impl Report {
    pub fn from_state(state: &SystemState) -> Self {
        let clock = state.clock;
        let acc = &state.acc;

        let mut state_probabilities: Vec<f64> =
            acc.time_in_state.iter().map(|t| ratio(*t, clock)).collect();
        if let Some(limit) = state.queue_capacity.limit() {
            let max_state = state.servers_total() + limit;
            if state_probabilities.len() <= max_state {
                state_probabilities.resize(max_state + 1, 0.0);
            }
        }
        let avg_in_system: f64 = state_probabilities
            .iter()
            .enumerate()
            .map(|(n, p)| n as f64 * p)
            .sum();

        let server_utilization: Vec<f64> = acc
            .area_server_busy
            .iter()
            .map(|area| ratio(*area, clock))
            .collect();
        let utilization =
            server_utilization.iter().sum::<f64>() / server_utilization.len().max(1) as f64;

        let hist = &state.wait_histogram;
        let percentile = |q: f64| {
            if hist.len() == 0 {
                0.0
            } else {
                hist.value_at_quantile(q) as f64 / WAIT_SCALE
            }
        };

        Self {
            clock,
            arrivals: state.arrivals_count,
            served: state.served_count,
            completed: state.completed_count,
            blocked: state.blocked_count,
            waited: state.waited_count,
            state_probabilities,
            avg_queue_length: ratio(acc.area_queue_length, clock),
            avg_in_system,
            server_utilization,
            utilization,
            avg_wait: ratio(state.total_wait, state.served_count as f64),
            wait_p50: percentile(0.5),
            wait_p90: percentile(0.9),
            wait_p99: percentile(0.99),
            blocking_probability: ratio(state.blocked_count as f64, state.arrivals_count as f64),
            all_busy_probability: ratio(acc.all_busy_time, clock),
            throughput: ratio(state.completed_count as f64, clock),
        }
    }
}

impl Simulation {
    pub fn report(&self) -> Report {
        Report::from_state(&self.state)
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct MetricPoint {
    pub sim_time: f64,
    pub avg_queue_length: f64,
    pub utilization: f64,
    pub blocking_probability: f64,
}

/// Samples running averages at fixed simulated-time intervals so their
/// convergence can be plotted.
pub struct MetricsCollector {
    pub history: VecDeque<MetricPoint>,
    pub max_points: usize,
    pub step: f64,
    last_sample_time: f64,
}

impl MetricsCollector {
    pub fn new(max_points: usize, step: f64) -> Self {
        Self {
            history: VecDeque::with_capacity(max_points),
            max_points,
            step,
            last_sample_time: 0.0,
        }
    }

    pub fn update(&mut self, state: &SystemState) {
        if state.clock <= 0.0 || state.clock < self.last_sample_time + self.step {
            return;
        }

        let busy_area: f64 = state.acc.area_server_busy.iter().sum();
        self.history.push_back(MetricPoint {
            sim_time: state.clock,
            avg_queue_length: state.acc.area_queue_length / state.clock,
            utilization: busy_area / (state.clock * state.servers_total() as f64),
            blocking_probability: ratio(
                state.blocked_count as f64,
                state.arrivals_count as f64,
            ),
        });

        if self.history.len() > self.max_points {
            self.history.pop_front();
        }

        self.last_sample_time = state.clock;
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.last_sample_time = 0.0;
    }
}

impl Observer for MetricsCollector {
    fn on_event(&mut self, _event: &Event, state: &SystemState) {
        self.update(state);
    }
}
