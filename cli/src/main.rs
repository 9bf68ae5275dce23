mod report;

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use env_logger::Builder;
use log::LevelFilter;
use queuesim_core::{
    run_replications, OverflowPolicy, QueueCapacity, RngKind, SimConfig, Simulation, Termination,
};

use crate::report::{comparisons, Observed, Output};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Model {
    /// Single server, unbounded queue
    Mm1,
    /// M/M/m loss system
    ErlangB,
    /// M/M/m with unbounded queue
    ErlangC,
    /// Slotted Geom/Geom/m/N
    Geo,
}

/// Queueing system simulator
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// JSON configuration file; preset flags are ignored when given
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Preset model
    #[arg(long, short, value_enum, default_value = "mm1")]
    model: Model,

    #[arg(long, default_value = "2.0")]
    mean_interarrival: f64,

    #[arg(long, default_value = "1.0")]
    mean_service: f64,

    /// Per-slot arrival probability (geo)
    #[arg(long, default_value = "0.3")]
    arrival_prob: f64,

    /// Per-slot completion probability of a busy server (geo)
    #[arg(long, default_value = "0.4")]
    service_prob: f64,

    #[arg(long, default_value = "1")]
    servers: usize,

    /// Waiting room size; for geo, total customers in the system
    #[arg(long)]
    capacity: Option<usize>,

    /// Block arrivals that find a full waiting room instead of aborting
    /// (geo always blocks)
    #[arg(long)]
    block: bool,

    /// Stop after this many customers entered service [default: 10000];
    /// not accepted for geo
    #[arg(long)]
    served: Option<u64>,

    /// Stop at this time; overrides --served. For geo, a whole number of
    /// slots [default: 100000]
    #[arg(long)]
    horizon: Option<f64>,

    /// Random seed
    #[arg(long, short)]
    seed: Option<u64>,

    /// Use the platform generator instead of the reference LCG
    #[arg(long)]
    platform_rng: bool,

    /// Number of independent replications
    #[arg(long, short, default_value = "1")]
    replications: usize,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Print debug logs
    #[arg(long, short)]
    debug: bool,
}

impl Args {
    fn build_config(&self) -> Result<SimConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path)?,
            None => self.preset()?,
        };
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if self.platform_rng {
            config = config.with_rng(RngKind::Platform);
        }
        config.validate()?;
        Ok(config)
    }

    fn preset(&self) -> Result<SimConfig, Box<dyn Error>> {
        let served = self.served.unwrap_or(DEFAULT_SERVED);
        let mut config = match self.model {
            Model::Mm1 => SimConfig::mm1(self.mean_interarrival, self.mean_service, served),
            Model::ErlangB => SimConfig::erlang_b(
                self.mean_interarrival,
                self.mean_service,
                self.servers,
                served,
            ),
            Model::ErlangC => SimConfig::erlang_c(
                self.mean_interarrival,
                self.mean_service,
                self.servers,
                served,
            ),
            Model::Geo => return self.geo_preset(),
        };
        if let Some(capacity) = self.capacity {
            config = config.with_queue_capacity(QueueCapacity::Bounded(capacity));
        }
        if self.block {
            config = config.with_overflow(OverflowPolicy::Block);
        }
        if let Some(horizon) = self.horizon {
            config = config.with_termination(Termination::Horizon(horizon));
        }
        Ok(config)
    }

    fn geo_preset(&self) -> Result<SimConfig, Box<dyn Error>> {
        if self.served.is_some() {
            return Err("--served does not apply to geo; use --horizon in slots".into());
        }
        if self.block {
            return Err("--block does not apply to geo, which always blocks".into());
        }
        let slots = self.horizon.unwrap_or(DEFAULT_SLOTS);
        if !(slots.is_finite() && slots >= 1.0 && slots.fract() == 0.0) {
            return Err(format!("geo --horizon must be a whole number of slots, got {slots}").into());
        }
        Ok(SimConfig::geo_geo_m_n(
            self.arrival_prob,
            self.service_prob,
            self.servers,
            self.capacity.unwrap_or(self.servers),
            slots as u64,
        )?)
    }
}

const DEFAULT_SERVED: u64 = 10_000;
const DEFAULT_SLOTS: f64 = 100_000.0;

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logger(if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });

    let config = args.build_config()?;
    log::debug!("configuration: {config:?}");

    let output = if args.replications > 1 {
        let summary = run_replications(&config, args.replications)?;
        Output::Replications {
            theory: comparisons(&config, &Observed::from(&summary)),
            config,
            summary,
        }
    } else {
        let mut sim = Simulation::new(&config)?;
        sim.run()?;
        let report = sim.report();
        Output::Single {
            theory: comparisons(&config, &Observed::from(&report)),
            config,
            report,
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", output.render()?);
    }
    Ok(())
}

fn init_logger(level: LevelFilter) {
    Builder::from_default_env()
        .filter(Some("queuesim_core"), level)
        .filter(Some("queuesim"), level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}
