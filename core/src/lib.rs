pub mod analytics;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod replication;
pub mod rng;
pub mod state;
pub mod theory;
pub mod traits;

pub use analytics::{MetricPoint, MetricsCollector, Report};
pub use config::{OverflowPolicy, QueueCapacity, SimConfig, Termination};
pub use engine::{Event, EventList, EventType, ScheduleCmd, Simulation};
pub use error::{ConfigError, EmptyListError, SimError, SimResult};
pub use handlers::{QueueModel, TimingModel};
pub use replication::{run_replications, Estimate, ReplicationSummary};
pub use rng::{Lcg, RandomStream, RngKind, DEFAULT_LCG_SEED};
pub use state::{Accumulators, SystemState};
pub use traits::{Observer, UniformSource};
