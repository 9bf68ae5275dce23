use crate::common::TestHarness;
use queuesim_core::*;

/// Checks conservation of customers after every event.
fn check_conservation(config: &SimConfig) {
    let mut sim = Simulation::new(config).unwrap();
    let mut checked = 0u64;
    sim.run_with(&mut |_: &Event, state: &SystemState| {
        assert_eq!(
            state.arrivals_count,
            state.served_count + state.blocked_count + state.queue_length() as u64
        );
        assert_eq!(
            state.completed_count + state.servers_busy() as u64,
            state.served_count
        );
        assert!(state.servers_busy() <= state.servers_total());
        if let Some(limit) = state.queue_capacity.limit() {
            assert!(state.queue_length() <= limit);
        }
        checked += 1;
    })
    .unwrap();
    assert_eq!(checked, sim.events_processed);
}

#[test]
fn test_customers_are_conserved() {
    check_conservation(&SimConfig::mm1(2.0, 1.0, 5000));
    check_conservation(&SimConfig::erlang_b(1.0, 3.0, 3, 5000));
    check_conservation(&SimConfig::erlang_c(1.0, 1.5, 2, 5000));
    check_conservation(
        &SimConfig::mm1(1.0, 1.5, 5000)
            .with_queue_capacity(QueueCapacity::Bounded(4))
            .with_overflow(OverflowPolicy::Block),
    );
    check_conservation(&SimConfig::geo_geo_m_n(0.3, 0.4, 2, 5, 20_000).unwrap());
}

#[test]
fn test_accumulated_areas_never_decrease() {
    let mut h = TestHarness::new(&SimConfig::erlang_c(1.0, 1.8, 2, 3000));
    h.run_traced();

    for pair in h.trace.windows(2) {
        assert!(pair[1].time >= pair[0].time);
        assert!(pair[1].area_queue_length >= pair[0].area_queue_length);
        for (next, prev) in pair[1].area_server_busy.iter().zip(&pair[0].area_server_busy) {
            assert!(next >= prev);
        }
    }
}

#[test]
fn test_areas_bounded_by_elapsed_time() {
    let config = SimConfig::erlang_b(1.0, 2.0, 2, 4000);
    let report = TestHarness::new(&config).run();

    assert!(report.utilization > 0.0 && report.utilization <= 1.0);
    for u in &report.server_utilization {
        assert!(*u <= 1.0);
    }
    assert!(report.all_busy_probability <= report.utilization + 1e-12);
    assert_eq!(report.avg_queue_length, 0.0);
}

#[test]
fn test_full_capacity_servers_never_queue() {
    // N == m: every customer is either served at once or lost
    let config = SimConfig::geo_geo_m_n(0.3, 0.4, 5, 5, 100_000).unwrap();
    let mut h = TestHarness::new(&config);
    let report = h.run_traced();

    assert!(h.trace.iter().all(|s| s.queue_length == 0));
    assert_eq!(report.waited, 0);
    assert_eq!(report.avg_wait, 0.0);
    assert_eq!(report.state_probabilities.len(), 6);
}

#[test]
fn test_slotted_queue_respects_capacity() {
    let config = SimConfig::geo_geo_m_n(0.3, 0.4, 2, 5, 100_000).unwrap();
    let mut h = TestHarness::new(&config);
    h.run_traced();

    assert!(h.trace.iter().all(|s| s.queue_length <= 3));
    assert!(h.trace.iter().all(|s| s.servers_busy <= 2));
}

#[test]
fn test_slotted_events_fall_on_slot_boundaries() {
    let config = SimConfig::geo_geo_m_n(0.5, 0.3, 3, 6, 10_000).unwrap();
    let mut h = TestHarness::new(&config);
    h.run_traced();

    assert!(!h.trace.is_empty());
    assert!(h.trace.iter().all(|s| s.time.fract() == 0.0 && s.time >= 1.0));
    assert_eq!(h.sim.state.clock, 10_000.0);
}
