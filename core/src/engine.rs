use crate::config::{SimConfig, Termination};
use crate::error::{EmptyListError, SimError, SimResult};
use crate::handlers::QueueModel;
use crate::rng::RandomStream;
use crate::state::SystemState;
use crate::traits::Observer;
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventType {
    Arrival,
    Departure { server: usize },
    EndOfSimulation,
}

impl EventType {
    /// Order among events sharing a timestamp: the end-of-run sentinel first,
    /// then departures, then arrivals.
    fn rank(&self) -> u8 {
        match self {
            EventType::EndOfSimulation => 0,
            EventType::Departure { .. } => 1,
            EventType::Arrival => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Event {
    pub time: f64,
    pub event_type: EventType,
    /// Insertion stamp, assigned by [`EventList::insert`].
    pub seq: u64,
}

impl Event {
    pub fn new(time: f64, event_type: EventType) -> Self {
        Self {
            time,
            event_type,
            seq: 0,
        }
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Event {}
impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then_with(|| self.event_type.rank().cmp(&other.event_type.rank()))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Pending events, earliest first.
#[derive(Debug, Default)]
pub struct EventList {
    heap: BinaryHeap<Reverse<Event>>,
    next_seq: u64,
}

impl EventList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, mut event: Event) {
        event.seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(event));
    }

    pub fn extract_min(&mut self) -> Result<Event, EmptyListError> {
        self.heap.pop().map(|Reverse(event)| event).ok_or(EmptyListError)
    }

    pub fn peek_time(&self) -> Option<f64> {
        self.heap.peek().map(|Reverse(event)| event.time)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Follow-up event requested by a handler, relative to the current clock.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleCmd {
    pub delay: f64,
    pub event_type: EventType,
}

pub struct Simulation {
    pub state: SystemState,
    pub events: EventList,
    pub events_processed: u64,
    model: QueueModel,
    termination: Termination,
    rng: RandomStream,
    finished: bool,
}

impl Simulation {
    /// Builds a run and primes it with the first arrival and, for a time
    /// horizon, the end-of-simulation sentinel.
    pub fn new(config: &SimConfig) -> SimResult<Self> {
        let mut sim = Self::manual(config)?;
        let first = sim.model.timing.interarrival(&mut sim.rng);
        sim.schedule(first, EventType::Arrival)?;
        log::debug!(
            "simulation primed: servers={}, capacity={:?}, termination={:?}, first arrival at t={first}",
            config.servers,
            config.queue_capacity,
            config.termination
        );
        Ok(sim)
    }

    /// Builds a run with an empty event list so callers can feed events by hand.
    pub fn manual(config: &SimConfig) -> SimResult<Self> {
        config.validate()?;
        let rng = RandomStream::new(config.rng, config.seed)?;
        let mut sim = Self {
            state: SystemState::new(config.servers, config.queue_capacity)?,
            events: EventList::new(),
            events_processed: 0,
            model: QueueModel::new(config.timing, config.overflow),
            termination: config.termination,
            rng,
            finished: false,
        };
        if let Termination::Horizon(horizon) = config.termination {
            sim.schedule(horizon, EventType::EndOfSimulation)?;
        }
        Ok(sim)
    }

    pub fn schedule(&mut self, time: f64, event_type: EventType) -> SimResult<()> {
        if time.is_nan() || time < self.state.clock {
            return Err(SimError::RetroactiveSchedule {
                time,
                clock: self.state.clock,
            });
        }
        self.events.insert(Event::new(time, event_type));
        Ok(())
    }

    pub fn is_terminated(&self) -> bool {
        match self.termination {
            Termination::Horizon(_) => self.finished,
            Termination::Served(target) => self.finished || self.state.served_count >= target,
        }
    }

    pub fn step(&mut self) -> SimResult<bool> {
        self.step_with(&mut |_: &Event, _: &SystemState| {})
    }

    /// Processes one event. Returns `Ok(false)` once the run has terminated.
    pub fn step_with<O: Observer + ?Sized>(&mut self, observer: &mut O) -> SimResult<bool> {
        if self.is_terminated() {
            return Ok(false);
        }
        let event = self
            .events
            .extract_min()
            .map_err(|_| SimError::EmptyEventList {
                time: self.state.clock,
            })?;

        self.state.advance_to(event.time);
        log::trace!("t={:.6} {:?}", event.time, event.event_type);

        let cmds = match event.event_type {
            EventType::Arrival => self.model.on_arrival(&mut self.state, &mut self.rng)?,
            EventType::Departure { server } => {
                self.model
                    .on_departure(server, &mut self.state, &mut self.rng)?
            }
            EventType::EndOfSimulation => {
                self.finished = true;
                Vec::new()
            }
        };
        for cmd in cmds {
            self.schedule(self.state.clock + cmd.delay, cmd.event_type)?;
        }

        self.events_processed += 1;
        observer.on_event(&event, &self.state);
        Ok(true)
    }

    pub fn run(&mut self) -> SimResult<()> {
        self.run_with(&mut |_: &Event, _: &SystemState| {})
    }

    /// Runs until the termination predicate holds. A scheduling bug that
    /// drains the event list surfaces as [`SimError::EmptyEventList`].
    pub fn run_with<O: Observer + ?Sized>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.step_with(observer)? {}
        log::debug!(
            "simulation finished at t={:.3}: events={}, arrivals={}, served={}, blocked={}",
            self.state.clock,
            self.events_processed,
            self.state.arrivals_count,
            self.state.served_count,
            self.state.blocked_count
        );
        Ok(())
    }
}
