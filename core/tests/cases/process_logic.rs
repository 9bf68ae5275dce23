use crate::common::TestHarness;
use queuesim_core::*;

#[test]
fn test_third_simultaneous_arrival_is_blocked() {
    let config = SimConfig::erlang_b(1.0, 1.0, 2, 1000);
    let mut h = TestHarness::manual(&config);
    for _ in 0..3 {
        h.arrive_at(1.0);
    }

    assert!(h.step());
    assert!(h.step());
    assert_eq!(h.sim.state.servers_busy(), 2);
    assert_eq!(h.sim.state.blocked_count, 0);

    assert!(h.step());
    assert_eq!(h.sim.state.servers_busy(), 2);
    assert_eq!(h.sim.state.blocked_count, 1);
    assert_eq!(h.sim.state.queue_length(), 0);
    assert_eq!(h.sim.state.arrivals_count, 3);
    assert_eq!(h.sim.state.served_count, 2);
    assert!(h.trace.iter().all(|s| s.time == 1.0 && s.event_type == EventType::Arrival));
}

#[test]
fn test_waiting_customer_takes_freed_server_fifo() {
    let config = SimConfig::mm1(10.0, 1.0, 1000);
    let mut h = TestHarness::manual(&config);
    for _ in 0..3 {
        h.arrive_at(0.0);
    }
    for _ in 0..3 {
        h.step();
    }
    assert_eq!(h.sim.state.queue_length(), 2);
    assert_eq!(h.sim.state.waited_count, 2);

    while !matches!(h.trace.last().map(|s| s.event_type), Some(EventType::Departure { .. })) {
        assert!(h.step());
    }
    let departure = h.trace.last().unwrap();
    assert_eq!(departure.event_type, EventType::Departure { server: 0 });
    assert_eq!(h.sim.state.total_wait, departure.time);
    assert_eq!(h.sim.state.served_count, 2);
    assert_eq!(h.sim.state.completed_count, 1);
    assert!(h.sim.state.is_busy(0));
}

#[test]
fn test_served_target_stops_the_run() {
    let config = SimConfig::mm1(2.0, 1.0, 50);
    let mut h = TestHarness::new(&config);
    let report = h.run();

    assert_eq!(report.served, 50);
    assert!(report.clock > 0.0);
    assert!(!h.sim.step().unwrap(), "terminated run must not advance");
}

#[test]
fn test_horizon_stops_exactly_at_end_time() {
    let config = SimConfig::erlang_c(2.0, 3.0, 2, 1).with_termination(Termination::Horizon(500.0));
    let report = TestHarness::new(&config).run();

    assert_eq!(report.clock, 500.0);
    let total: f64 = report.state_probabilities.iter().sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn test_every_departure_completes_one_service() {
    let config = SimConfig::erlang_c(1.0, 1.8, 2, 2000);
    let mut h = TestHarness::new(&config);
    h.run_traced();

    for snapshot in &h.trace {
        if let EventType::Departure { server } = snapshot.event_type {
            assert!(server < 2);
        }
    }
    let departures = h
        .trace
        .iter()
        .filter(|s| matches!(s.event_type, EventType::Departure { .. }))
        .count() as u64;
    assert_eq!(departures, h.sim.state.completed_count);
}

#[test]
fn test_metrics_collector_samples_on_interval() {
    let config = SimConfig::mm1(2.0, 1.0, 5000);
    let mut sim = Simulation::new(&config).unwrap();
    let mut metrics = MetricsCollector::new(50, 100.0);
    sim.run_with(&mut metrics).unwrap();

    assert!(!metrics.history.is_empty());
    assert!(metrics.history.len() <= 50);
    for pair in metrics.history.iter().collect::<Vec<_>>().windows(2) {
        assert!(pair[1].sim_time >= pair[0].sim_time + 100.0);
    }
    let last = metrics.history.back().unwrap();
    assert!(last.utilization > 0.3 && last.utilization < 0.7);
}
