//! Closed-form results used to validate simulated output.

/// Erlang-B blocking probability for offered load `a` (erlangs) on `servers`
/// servers, via the stable recursion `B(k) = a·B(k-1) / (k + a·B(k-1))`.
pub fn erlang_b(a: f64, servers: usize) -> f64 {
    (1..=servers).fold(1.0, |b, k| a * b / (k as f64 + a * b))
}

/// Erlang-C probability that an arrival has to wait. `None` when the system
/// is unstable (`a >= servers`).
pub fn erlang_c(a: f64, servers: usize) -> Option<f64> {
    let m = servers as f64;
    if a >= m {
        return None;
    }
    let b = erlang_b(a, servers);
    Some(m * b / (m - a * (1.0 - b)))
}

/// Mean number waiting in an M/M/1 queue, `ρ²/(1−ρ)`.
pub fn mm1_queue_length(mean_interarrival: f64, mean_service: f64) -> Option<f64> {
    let rho = mean_service / mean_interarrival;
    (rho < 1.0).then(|| rho * rho / (1.0 - rho))
}

/// Mean wait in an M/M/1 queue, `ρ/(1−ρ) · mean_service` (Little's law on
/// [`mm1_queue_length`]).
pub fn mm1_wait(mean_interarrival: f64, mean_service: f64) -> Option<f64> {
    let rho = mean_service / mean_interarrival;
    (rho < 1.0).then(|| rho / (1.0 - rho) * mean_service)
}

/// Mean wait in an M/M/m queue: `C(m, a) · mean_service / (m − a)`.
pub fn mmm_wait(mean_interarrival: f64, mean_service: f64, servers: usize) -> Option<f64> {
    let a = mean_service / mean_interarrival;
    erlang_c(a, servers).map(|c| c * mean_service / (servers as f64 - a))
}

/// Stationary distribution `P_0..=P_capacity` of the Geom/Geom/m/N slot
/// chain: in every slot each busy server completes with probability `s`,
/// then one customer arrives with probability `p` and is lost if the system
/// is full. Solved by power iteration on the transition matrix.
pub fn geo_geo_state_probabilities(p: f64, s: f64, servers: usize, capacity: usize) -> Vec<f64> {
    let size = capacity + 1;
    let mut transition = vec![vec![0.0; size]; size];
    for (n, row) in transition.iter_mut().enumerate() {
        let busy = n.min(servers);
        for done in 0..=busy {
            let p_done = binomial_pmf(busy, done, s);
            let left = n - done;
            if left < capacity {
                row[left + 1] += p_done * p;
                row[left] += p_done * (1.0 - p);
            } else {
                row[left] += p_done;
            }
        }
    }

    let mut pi = vec![1.0 / size as f64; size];
    for _ in 0..MAX_ITERATIONS {
        let next: Vec<f64> = (0..size)
            .map(|j| (0..size).map(|i| pi[i] * transition[i][j]).sum::<f64>())
            .collect();
        let delta = next
            .iter()
            .zip(&pi)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        pi = next;
        if delta < 1e-15 {
            break;
        }
    }
    pi
}

const MAX_ITERATIONS: usize = 1_000_000;

fn binomial_pmf(n: usize, k: usize, prob: f64) -> f64 {
    let coefficient = (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64);
    coefficient * prob.powi(k as i32) * (1.0 - prob).powi((n - k) as i32)
}

/// Blocking probability of Geom/Geom/m/N: the system is full and none of the
/// busy servers completes in the arrival's slot, `P_N · (1−s)^min(m, N)`.
pub fn geo_geo_blocking(p: f64, s: f64, servers: usize, capacity: usize) -> f64 {
    let probs = geo_geo_state_probabilities(p, s, servers, capacity);
    let p_full = probs.last().copied().unwrap_or(0.0);
    p_full * (1.0 - s).powi(servers.min(capacity) as i32)
}
