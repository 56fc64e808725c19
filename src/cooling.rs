//! Geometric cooling schedule and the Metropolis acceptance probability.

use crate::config::CoolingConfig;

/// Annealing temperature state: `T_{k+1} = alpha * T_k`.
///
/// Created once per run from a validated [`CoolingConfig`] and advanced
/// once per engine iteration. Termination is monotone: once set it is
/// never cleared, and further [`advance`](CoolingSchedule::advance)
/// calls are no-ops.
#[derive(Debug, Clone, PartialEq)]
pub struct CoolingSchedule {
    start_temperature: f64,
    end_temperature: f64,
    alpha: f64,
    max_iterations: u64,
    iteration: u64,
    temperature: f64,
    terminated: bool,
}

impl CoolingSchedule {
    /// Builds the schedule at its start temperature.
    ///
    /// The config is expected to have passed
    /// [`CoolingConfig::validate`]; the engine constructors ensure it.
    pub fn new(config: &CoolingConfig) -> Self {
        debug_assert!(config.validate().is_ok());
        Self {
            start_temperature: config.start_temperature,
            end_temperature: config.end_temperature,
            alpha: config.alpha,
            max_iterations: config.max_iterations,
            iteration: 0,
            temperature: config.start_temperature,
            terminated: false,
        }
    }

    /// Moves to the next iteration.
    ///
    /// Past `max_iterations` the schedule terminates without cooling;
    /// otherwise it cools and terminates if the temperature fell below
    /// the floor.
    pub fn advance(&mut self) {
        if self.terminated {
            return;
        }
        self.iteration += 1;
        if self.iteration > self.max_iterations {
            self.terminated = true;
            return;
        }
        self.temperature *= self.alpha;
        if self.temperature < self.end_temperature {
            self.terminated = true;
        }
    }

    /// Metropolis probability of accepting a move that worsens the
    /// makespan by `delta`: `exp(-delta / T)`.
    ///
    /// Non-worsening moves are accepted by the engine without asking.
    /// `T` stays strictly positive: it starts above a positive floor and
    /// is only ever multiplied by `alpha > 0`.
    #[inline]
    pub fn acceptance_probability(&self, delta: u64) -> f64 {
        (-(delta as f64) / self.temperature).exp()
    }

    #[inline]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Number of completed [`advance`](CoolingSchedule::advance) calls.
    #[inline]
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn start_temperature(&self) -> f64 {
        self.start_temperature
    }

    pub fn end_temperature(&self) -> f64 {
        self.end_temperature
    }
}
