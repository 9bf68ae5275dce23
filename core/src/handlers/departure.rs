use super::QueueModel;
use crate::engine::{EventType, ScheduleCmd};
use crate::error::{SimError, SimResult};
use crate::state::SystemState;
use crate::traits::UniformSource;

impl QueueModel {
    /// `server` finishes its customer and either goes idle or takes the head
    /// of the queue.
    pub fn on_departure<R: UniformSource + ?Sized>(
        &self,
        server: usize,
        state: &mut SystemState,
        rng: &mut R,
    ) -> SimResult<Vec<ScheduleCmd>> {
        match state.departures.get(server).copied().flatten() {
            None => {
                return Err(SimError::UnknownDeparture {
                    server,
                    time: state.clock,
                });
            }
            // exact compare: both times are the same `clock + service` sum
            Some(scheduled) if scheduled != state.clock => {
                return Err(SimError::StaleDeparture {
                    server,
                    time: state.clock,
                    scheduled,
                });
            }
            Some(_) => {}
        }
        state.completed_count += 1;

        let Some(arrived) = state.queue.pop_front() else {
            state.departures[server] = None;
            return Ok(Vec::new());
        };

        state.record_wait(state.clock - arrived);
        let service = self.timing.service(rng);
        state.departures[server] = Some(state.clock + service);
        Ok(vec![ScheduleCmd {
            delay: service,
            event_type: EventType::Departure { server },
        }])
    }
}
