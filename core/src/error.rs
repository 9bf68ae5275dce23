use thiserror::Error;

/// Rejected configuration. Raised before the first event is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("mean {name} must be positive and finite, got {value}")]
    NonPositiveMean { name: &'static str, value: f64 },
    #[error("{name} probability must lie in (0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("at least one server is required")]
    NoServers,
    #[error("system capacity {capacity} is smaller than the {servers} servers")]
    CapacityBelowServers { capacity: usize, servers: usize },
    #[error("time horizon must be positive and finite, got {0}")]
    InvalidHorizon(f64),
    #[error("served-customer target must be at least 1")]
    ZeroServedTarget,
    #[error("LCG seed must be non-zero modulo 2^31 - 1")]
    ZeroLcgSeed,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Returned by [`crate::engine::EventList::extract_min`] when nothing is pending.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("event list is empty")]
pub struct EmptyListError;

/// Failure that halts a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("queue overflow at t={time}: capacity {capacity} already reached")]
    QueueOverflow { time: f64, capacity: usize },
    #[error("event list is empty at t={time} before the run terminated")]
    EmptyEventList { time: f64 },
    #[error("event scheduled at t={time} is earlier than the clock t={clock}")]
    RetroactiveSchedule { time: f64, clock: f64 },
    #[error("wait histogram: {0}")]
    Histogram(#[from] hdrhistogram::CreationError),
    #[error("departure for server {server} at t={time} but it has no customer in service")]
    UnknownDeparture { server: usize, time: f64 },
    #[error("departure for server {server} at t={time} but its customer completes at t={scheduled}")]
    StaleDeparture { server: usize, time: f64, scheduled: f64 },
}

pub type SimResult<T> = Result<T, SimError>;
