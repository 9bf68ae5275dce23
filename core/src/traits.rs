use crate::engine::Event;
use crate::state::SystemState;

/// Source of uniform draws on [0, 1]. Implementors only provide `next_uniform`;
/// every variate generator is built on top of it.
pub trait UniformSource {
    /// Raw draw. May return exactly 0.0 or 1.0 depending on the generator.
    fn next_uniform(&mut self) -> f64;

    /// Draw on the open interval (0, 1). Degenerate endpoints are resampled.
    fn open_uniform(&mut self) -> f64 {
        loop {
            let u = self.next_uniform();
            if u > 0.0 && u < 1.0 {
                return u;
            }
            log::trace!("resampling degenerate uniform {u}");
        }
    }

    /// Exponential variate with the given mean: `-mean * ln(U)`.
    fn exponential(&mut self, mean: f64) -> f64 {
        -mean * self.open_uniform().ln()
    }

    /// One draw is consumed even when `prob >= 1`, so a certain success
    /// still holds when the generator emits exactly 1.0.
    fn bernoulli(&mut self, prob: f64) -> bool {
        let u = self.next_uniform();
        prob >= 1.0 || u < prob
    }

    fn binomial(&mut self, n: u32, prob: f64) -> u32 {
        (0..n).filter(|_| self.bernoulli(prob)).count() as u32
    }

    /// Number of Bernoulli(`prob`) trials up to and including the first
    /// success. Always at least 1.
    fn geometric(&mut self, prob: f64) -> u64 {
        if prob >= 1.0 {
            return 1;
        }
        let u = self.open_uniform();
        let trials = (u.ln() / (-prob).ln_1p()).ceil();
        trials.max(1.0) as u64
    }
}

/// Read-only hook invoked by the driver after every dispatched event.
pub trait Observer {
    fn on_event(&mut self, event: &Event, state: &SystemState);
}

impl<F> Observer for F
where
    F: FnMut(&Event, &SystemState),
{
    fn on_event(&mut self, event: &Event, state: &SystemState) {
        self(event, state)
    }
}
