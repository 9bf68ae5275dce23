use crate::common::run_report;
use queuesim_core::theory::erlang_b;
use queuesim_core::*;

#[test]
fn test_erlang_b_two_servers() {
    let report = run_report(&SimConfig::erlang_b(5.0, 6.0, 2, 100_000));
    let expected = erlang_b(1.2, 2);

    assert!(
        (report.blocking_probability - expected).abs() < 0.01,
        "blocking {} vs Erlang B {expected}",
        report.blocking_probability
    );
    // PASTA: arrivals see the all-busy state with its time-average probability
    assert!((report.all_busy_probability - expected).abs() < 0.01);
    assert_eq!(report.waited, 0);
}

#[test]
fn test_erlang_b_five_servers() {
    let report = run_report(&SimConfig::erlang_b(5.0, 6.0, 5, 100_000));
    let expected = erlang_b(1.2, 5);

    assert!((report.blocking_probability - expected).abs() < 0.01);
    assert!(report.blocked > 0);
}

#[test]
fn test_blocking_rises_with_traffic() {
    let blocking: Vec<f64> = [1.0, 0.1, 0.01, 0.001]
        .iter()
        .map(|&mean_interarrival| {
            run_report(&SimConfig::erlang_b(mean_interarrival, 1.0, 3, 20_000)).blocking_probability
        })
        .collect();

    assert!(blocking.windows(2).all(|w| w[0] < w[1]), "{blocking:?}");
    assert!(blocking[3] > 0.99);
    assert!(blocking[0] < 0.15);
}

#[test]
fn test_overflow_aborts_run() {
    let config = SimConfig::mm1(0.5, 5.0, 10_000).with_queue_capacity(QueueCapacity::Bounded(2));
    let mut sim = Simulation::new(&config).unwrap();

    match sim.run() {
        Err(SimError::QueueOverflow { capacity, time }) => {
            assert_eq!(capacity, 2);
            assert_eq!(time, sim.state.clock);
            assert_eq!(sim.state.queue_length(), 2);
        }
        other => panic!("expected queue overflow, got {other:?}"),
    }
}

#[test]
fn test_overflow_blocks_when_configured() {
    let config = SimConfig::mm1(0.5, 5.0, 10_000)
        .with_queue_capacity(QueueCapacity::Bounded(2))
        .with_overflow(OverflowPolicy::Block);
    let mut sim = Simulation::new(&config).unwrap();
    let mut max_queue = 0usize;
    sim.run_with(&mut |_: &Event, state: &SystemState| {
        max_queue = max_queue.max(state.queue_length());
    })
    .unwrap();

    let report = sim.report();
    assert_eq!(report.served, 10_000);
    assert!(report.blocked > 0);
    assert_eq!(max_queue, 2);
    assert_eq!(report.state_probabilities.len(), 4);
}

#[test]
fn test_zero_capacity_blocks_even_under_abort() {
    let config = SimConfig::erlang_b(0.5, 2.0, 1, 2000).with_overflow(OverflowPolicy::Abort);
    let report = run_report(&config);

    assert_eq!(report.served, 2000);
    assert!(report.blocked > 0);
}
