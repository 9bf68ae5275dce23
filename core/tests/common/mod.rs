use queuesim_core::*;

/// State observed right after one event was handled.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub time: f64,
    pub event_type: EventType,
    pub queue_length: usize,
    pub servers_busy: usize,
    pub area_queue_length: f64,
    pub area_server_busy: Vec<f64>,
}

pub struct TestHarness {
    pub sim: Simulation,
    pub trace: Vec<Snapshot>,
}

impl TestHarness {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            sim: Simulation::new(config).unwrap(),
            trace: Vec::new(),
        }
    }

    /// No events are pending; feed them with [`TestHarness::arrive_at`].
    pub fn manual(config: &SimConfig) -> Self {
        Self {
            sim: Simulation::manual(config).unwrap(),
            trace: Vec::new(),
        }
    }

    pub fn arrive_at(&mut self, time: f64) {
        self.sim.schedule(time, EventType::Arrival).unwrap();
    }

    pub fn step(&mut self) -> bool {
        let trace = &mut self.trace;
        self.sim
            .step_with(&mut |event: &Event, state: &SystemState| trace.push(snapshot(event, state)))
            .unwrap()
    }

    pub fn run(&mut self) -> Report {
        self.sim.run().unwrap();
        self.sim.report()
    }

    /// Runs to completion keeping a snapshot of every event.
    pub fn run_traced(&mut self) -> Report {
        let trace = &mut self.trace;
        self.sim
            .run_with(&mut |event: &Event, state: &SystemState| trace.push(snapshot(event, state)))
            .unwrap();
        self.sim.report()
    }
}

fn snapshot(event: &Event, state: &SystemState) -> Snapshot {
    Snapshot {
        time: event.time,
        event_type: event.event_type,
        queue_length: state.queue_length(),
        servers_busy: state.servers_busy(),
        area_queue_length: state.acc.area_queue_length,
        area_server_busy: state.acc.area_server_busy.clone(),
    }
}

pub fn run_report(config: &SimConfig) -> Report {
    TestHarness::new(config).run()
}

pub fn assert_close(actual: f64, expected: f64, rel_tol: f64, what: &str) {
    let err = (actual - expected).abs() / expected.abs();
    assert!(
        err <= rel_tol,
        "{what}: simulated {actual:.5} vs expected {expected:.5} (relative error {err:.4})"
    );
}
