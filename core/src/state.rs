//! Queueing system state and its time-weighted accumulators.

use crate::config::QueueCapacity;
use crate::error::SimResult;
use hdrhistogram::Histogram;
use std::collections::VecDeque;

/// Waits are recorded in thousandths of a time unit.
pub const WAIT_SCALE: f64 = 1000.0;

/// Integrals of state variables over simulated time. Every field only grows.
#[derive(Debug, Clone, Default)]
pub struct Accumulators {
    pub area_queue_length: f64,
    pub area_server_busy: Vec<f64>,
    /// Time spent with exactly `n` customers in the system, indexed by `n`.
    pub time_in_state: Vec<f64>,
    /// Time during which every server was busy.
    pub all_busy_time: f64,
}

#[derive(Debug, Clone)]
pub struct SystemState {
    pub clock: f64,
    pub last_event_time: f64,
    /// Scheduled completion per server; `None` while the server is idle.
    pub departures: Vec<Option<f64>>,
    /// Arrival times of waiting customers, head first.
    pub queue: VecDeque<f64>,
    pub queue_capacity: QueueCapacity,
    pub arrivals_count: u64,
    /// Customers that have entered service.
    pub served_count: u64,
    /// Customers that have finished service and left.
    pub completed_count: u64,
    pub blocked_count: u64,
    /// Customers that had to join the queue.
    pub waited_count: u64,
    pub total_wait: f64,
    pub wait_histogram: Histogram<u64>,
    pub acc: Accumulators,
}

impl SystemState {
    pub fn new(servers: usize, queue_capacity: QueueCapacity) -> SimResult<Self> {
        Ok(Self {
            clock: 0.0,
            last_event_time: 0.0,
            departures: vec![None; servers],
            queue: VecDeque::new(),
            queue_capacity,
            arrivals_count: 0,
            served_count: 0,
            completed_count: 0,
            blocked_count: 0,
            waited_count: 0,
            total_wait: 0.0,
            wait_histogram: Histogram::new(3)?,
            acc: Accumulators {
                area_server_busy: vec![0.0; servers],
                ..Default::default()
            },
        })
    }

    pub fn servers_total(&self) -> usize {
        self.departures.len()
    }

    pub fn servers_busy(&self) -> usize {
        self.departures.iter().filter(|d| d.is_some()).count()
    }

    pub fn is_busy(&self, server: usize) -> bool {
        matches!(self.departures.get(server), Some(Some(_)))
    }

    /// Lowest-indexed idle server.
    pub fn free_server(&self) -> Option<usize> {
        self.departures.iter().position(Option::is_none)
    }

    pub fn queue_length(&self) -> usize {
        self.queue.len()
    }

    pub fn queue_has_room(&self) -> bool {
        self.queue_capacity
            .limit()
            .map_or(true, |limit| self.queue.len() < limit)
    }

    pub fn number_in_system(&self) -> usize {
        self.servers_busy() + self.queue.len()
    }

    /// Integrates the state that held since the previous event up to `time`,
    /// then moves the clock there. Must run before the event mutates state.
    pub fn advance_to(&mut self, time: f64) {
        let dt = time - self.last_event_time;
        debug_assert!(dt >= 0.0, "clock moved backwards: dt={dt}");

        self.acc.area_queue_length += self.queue.len() as f64 * dt;
        for (area, departure) in self.acc.area_server_busy.iter_mut().zip(&self.departures) {
            if departure.is_some() {
                *area += dt;
            }
        }

        let n = self.number_in_system();
        if self.acc.time_in_state.len() <= n {
            self.acc.time_in_state.resize(n + 1, 0.0);
        }
        self.acc.time_in_state[n] += dt;

        if self.servers_busy() == self.servers_total() {
            self.acc.all_busy_time += dt;
        }

        self.clock = time;
        self.last_event_time = time;
    }

    /// Records the queueing delay of a customer entering service.
    pub fn record_wait(&mut self, wait: f64) {
        self.total_wait += wait;
        self.served_count += 1;
        self.wait_histogram
            .saturating_record((wait * WAIT_SCALE).round() as u64);
    }
}
