use super::QueueModel;
use crate::config::OverflowPolicy;
use crate::engine::{EventType, ScheduleCmd};
use crate::error::{SimError, SimResult};
use crate::state::SystemState;
use crate::traits::UniformSource;

impl QueueModel {
    /// A customer arrives. The next arrival is always scheduled; the customer
    /// then takes a free server, joins the queue, or is blocked.
    pub fn on_arrival<R: UniformSource + ?Sized>(
        &self,
        state: &mut SystemState,
        rng: &mut R,
    ) -> SimResult<Vec<ScheduleCmd>> {
        state.arrivals_count += 1;

        let mut cmds = vec![ScheduleCmd {
            delay: self.timing.interarrival(rng),
            event_type: EventType::Arrival,
        }];

        if let Some(server) = state.free_server() {
            let service = self.timing.service(rng);
            state.departures[server] = Some(state.clock + service);
            state.record_wait(0.0);
            cmds.push(ScheduleCmd {
                delay: service,
                event_type: EventType::Departure { server },
            });
        } else if state.queue_has_room() {
            state.queue.push_back(state.clock);
            state.waited_count += 1;
        } else {
            match state.queue_capacity.limit() {
                Some(capacity) if capacity > 0 && self.overflow == OverflowPolicy::Abort => {
                    return Err(SimError::QueueOverflow {
                        time: state.clock,
                        capacity,
                    });
                }
                Some(capacity) if capacity > 0 => {
                    log::trace!("queue full at t={}, blocking arrival", state.clock);
                }
                _ => {}
            }
            state.blocked_count += 1;
        }

        Ok(cmds)
    }
}
