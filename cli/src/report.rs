use std::fmt::Write;

use queuesim_core::theory;
use queuesim_core::{
    Estimate, QueueCapacity, Report, ReplicationSummary, SimConfig, TimingModel,
};
use serde::Serialize;

/// Simulated values that have a closed-form counterpart.
pub struct Observed {
    pub avg_wait: f64,
    pub avg_queue_length: f64,
    pub blocking_probability: f64,
    pub all_busy_probability: f64,
    pub state_probabilities: Vec<f64>,
}

impl From<&Report> for Observed {
    fn from(report: &Report) -> Self {
        Self {
            avg_wait: report.avg_wait,
            avg_queue_length: report.avg_queue_length,
            blocking_probability: report.blocking_probability,
            all_busy_probability: report.all_busy_probability,
            state_probabilities: report.state_probabilities.clone(),
        }
    }
}

impl From<&ReplicationSummary> for Observed {
    fn from(summary: &ReplicationSummary) -> Self {
        let states = summary
            .reports
            .iter()
            .map(|r| r.state_probabilities.len())
            .max()
            .unwrap_or(0);
        let mut state_probabilities = vec![0.0; states];
        for report in &summary.reports {
            for (total, p) in state_probabilities.iter_mut().zip(&report.state_probabilities) {
                *total += p / summary.replications as f64;
            }
        }
        Self {
            avg_wait: summary.avg_wait.mean,
            avg_queue_length: summary.avg_queue_length.mean,
            blocking_probability: summary.blocking_probability.mean,
            all_busy_probability: summary.all_busy_probability.mean,
            state_probabilities,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Comparison {
    pub metric: String,
    pub simulated: f64,
    pub theoretical: f64,
}

impl Comparison {
    fn new(metric: impl Into<String>, simulated: f64, theoretical: f64) -> Self {
        Self {
            metric: metric.into(),
            simulated,
            theoretical,
        }
    }
}

/// Pairs simulated values with the closed forms that apply to `config`.
/// Unstable or unsupported configurations yield no rows.
pub fn comparisons(config: &SimConfig, observed: &Observed) -> Vec<Comparison> {
    let mut rows = Vec::new();
    let servers = config.servers;

    match config.timing {
        TimingModel::Continuous {
            mean_interarrival,
            mean_service,
        } => {
            let load = mean_service / mean_interarrival;
            match config.queue_capacity {
                QueueCapacity::Bounded(0) => {
                    let b = theory::erlang_b(load, servers);
                    rows.push(Comparison::new("blocking (Erlang B)", observed.blocking_probability, b));
                    rows.push(Comparison::new("all busy", observed.all_busy_probability, b));
                }
                QueueCapacity::Unbounded if servers == 1 => {
                    if let Some(wq) = theory::mm1_wait(mean_interarrival, mean_service) {
                        rows.push(Comparison::new("mean wait", observed.avg_wait, wq));
                    }
                    if let Some(lq) = theory::mm1_queue_length(mean_interarrival, mean_service) {
                        rows.push(Comparison::new("mean queue length", observed.avg_queue_length, lq));
                    }
                }
                QueueCapacity::Unbounded => {
                    if let Some(c) = theory::erlang_c(load, servers) {
                        rows.push(Comparison::new("all busy (Erlang C)", observed.all_busy_probability, c));
                    }
                    if let Some(wq) = theory::mmm_wait(mean_interarrival, mean_service, servers) {
                        rows.push(Comparison::new("mean wait", observed.avg_wait, wq));
                    }
                }
                QueueCapacity::Bounded(_) => {}
            }
        }
        TimingModel::Slotted {
            arrival_prob,
            service_prob,
        } => {
            let Some(limit) = config.queue_capacity.limit() else {
                return rows;
            };
            let capacity = servers + limit;
            let probs =
                theory::geo_geo_state_probabilities(arrival_prob, service_prob, servers, capacity);
            for (n, exact) in probs.iter().enumerate() {
                let simulated = observed.state_probabilities.get(n).copied().unwrap_or(0.0);
                rows.push(Comparison::new(format!("P_{n}"), simulated, *exact));
            }
            rows.push(Comparison::new(
                "blocking",
                observed.blocking_probability,
                theory::geo_geo_blocking(arrival_prob, service_prob, servers, capacity),
            ));
        }
    }
    rows
}

#[derive(Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Output {
    Single {
        config: SimConfig,
        report: Report,
        theory: Vec<Comparison>,
    },
    Replications {
        config: SimConfig,
        summary: ReplicationSummary,
        theory: Vec<Comparison>,
    },
}

impl Output {
    pub fn render(&self) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        match self {
            Output::Single { config, report, theory } => {
                render_config(&mut out, config)?;
                render_report(&mut out, report)?;
                render_theory(&mut out, theory)?;
            }
            Output::Replications {
                config,
                summary,
                theory,
            } => {
                render_config(&mut out, config)?;
                render_summary(&mut out, summary)?;
                render_theory(&mut out, theory)?;
            }
        }
        Ok(out)
    }
}

fn render_config(out: &mut String, config: &SimConfig) -> std::fmt::Result {
    match config.timing {
        TimingModel::Continuous {
            mean_interarrival,
            mean_service,
        } => writeln!(
            out,
            "model: continuous, mean interarrival {mean_interarrival}, mean service {mean_service}"
        )?,
        TimingModel::Slotted {
            arrival_prob,
            service_prob,
        } => writeln!(out, "model: slotted, p = {arrival_prob}, s = {service_prob}")?,
    }
    writeln!(
        out,
        "servers: {}, queue: {:?}, overflow: {:?}, termination: {:?}, seed: {} ({:?})",
        config.servers,
        config.queue_capacity,
        config.overflow,
        config.termination,
        config.seed,
        config.rng
    )?;
    writeln!(out)
}

fn render_report(out: &mut String, r: &Report) -> std::fmt::Result {
    writeln!(out, "clock               {:.4}", r.clock)?;
    writeln!(
        out,
        "customers           arrived {}, served {}, completed {}, waited {}, blocked {}",
        r.arrivals, r.served, r.completed, r.waited, r.blocked
    )?;
    writeln!(out, "avg wait in queue   {:.6}", r.avg_wait)?;
    writeln!(
        out,
        "wait p50/p90/p99    {:.4} / {:.4} / {:.4}",
        r.wait_p50, r.wait_p90, r.wait_p99
    )?;
    writeln!(out, "avg queue length    {:.6}", r.avg_queue_length)?;
    writeln!(out, "avg in system       {:.6}", r.avg_in_system)?;
    writeln!(out, "utilization         {:.6}", r.utilization)?;
    for (i, u) in r.server_utilization.iter().enumerate() {
        writeln!(out, "  server {i:<3}        {u:.6}")?;
    }
    writeln!(out, "blocking prob       {:.6}", r.blocking_probability)?;
    writeln!(out, "all busy prob       {:.6}", r.all_busy_probability)?;
    writeln!(out, "throughput          {:.6}", r.throughput)?;
    writeln!(out, "state probabilities")?;
    for (n, p) in r.state_probabilities.iter().enumerate() {
        writeln!(out, "  P_{n:<3}             {p:.6}")?;
    }
    Ok(())
}

fn render_summary(out: &mut String, s: &ReplicationSummary) -> std::fmt::Result {
    writeln!(out, "{} replications, mean ± 95% half-width", s.replications)?;
    let rows: [(&str, &Estimate); 7] = [
        ("avg wait in queue", &s.avg_wait),
        ("avg queue length", &s.avg_queue_length),
        ("avg in system", &s.avg_in_system),
        ("utilization", &s.utilization),
        ("blocking prob", &s.blocking_probability),
        ("all busy prob", &s.all_busy_probability),
        ("throughput", &s.throughput),
    ];
    for (name, e) in rows {
        writeln!(out, "{name:<20}{:.6} ± {:.6}", e.mean, e.half_width)?;
    }
    Ok(())
}

fn render_theory(out: &mut String, rows: &[Comparison]) -> std::fmt::Result {
    if rows.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "{:<22}{:>12}{:>12}", "theory", "simulated", "expected")?;
    for row in rows {
        writeln!(
            out,
            "{:<22}{:>12.6}{:>12.6}",
            row.metric, row.simulated, row.theoretical
        )?;
    }
    Ok(())
}
