//! Independent replications of one configuration across seeds.
//!
//! Each replication owns its own state, event list and generator; results
//! are only combined after every run has finished.

use crate::analytics::Report;
use crate::config::SimConfig;
use crate::engine::Simulation;
use crate::error::SimResult;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Two-sided 95% Student-t critical values for 1..=30 degrees of freedom.
const T_CRITICAL_95: [f64; 30] = [
    12.706, 4.303, 3.182, 2.776, 2.571, 2.447, 2.365, 2.306, 2.262, 2.228, 2.201, 2.179, 2.160,
    2.145, 2.131, 2.120, 2.110, 2.101, 2.093, 2.086, 2.080, 2.074, 2.069, 2.064, 2.060, 2.056,
    2.052, 2.048, 2.045, 2.042,
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Estimate {
    pub mean: f64,
    pub std_dev: f64,
    /// Half-width of the 95% confidence interval around `mean`.
    pub half_width: f64,
}

impl Estimate {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self { mean: 0.0, std_dev: 0.0, half_width: 0.0 };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        if n == 1 {
            return Self { mean, std_dev: 0.0, half_width: 0.0 };
        }
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let std_dev = variance.sqrt();
        let t = T_CRITICAL_95.get(n - 2).copied().unwrap_or(1.96);
        Self {
            mean,
            std_dev,
            half_width: t * std_dev / (n as f64).sqrt(),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        (value - self.mean).abs() <= self.half_width
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicationSummary {
    pub replications: usize,
    pub avg_wait: Estimate,
    pub avg_queue_length: Estimate,
    pub avg_in_system: Estimate,
    pub utilization: Estimate,
    pub blocking_probability: Estimate,
    pub all_busy_probability: Estimate,
    pub throughput: Estimate,
    pub reports: Vec<Report>,
}

impl ReplicationSummary {
    pub fn from_reports(reports: Vec<Report>) -> Self {
        let estimate = |metric: fn(&Report) -> f64| {
            let samples: Vec<f64> = reports.iter().map(metric).collect();
            Estimate::from_samples(&samples)
        };
        Self {
            replications: reports.len(),
            avg_wait: estimate(|r| r.avg_wait),
            avg_queue_length: estimate(|r| r.avg_queue_length),
            avg_in_system: estimate(|r| r.avg_in_system),
            utilization: estimate(|r| r.utilization),
            blocking_probability: estimate(|r| r.blocking_probability),
            all_busy_probability: estimate(|r| r.all_busy_probability),
            throughput: estimate(|r| r.throughput),
            reports,
        }
    }
}

/// Runs `count` replications in parallel; replication `i` uses seed
/// `config.seed + i`. Reports come back in replication order.
pub fn run_replications(config: &SimConfig, count: usize) -> SimResult<ReplicationSummary> {
    config.validate()?;
    log::debug!("running {count} replications from seed {}", config.seed);

    let reports = (0..count as u64)
        .into_par_iter()
        .map(|i| {
            let replica = config.clone().with_seed(config.seed.wrapping_add(i));
            let mut sim = Simulation::new(&replica)?;
            sim.run()?;
            Ok(sim.report())
        })
        .collect::<SimResult<Vec<Report>>>()?;

    Ok(ReplicationSummary::from_reports(reports))
}
