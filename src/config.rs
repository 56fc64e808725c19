//! Run configuration.

use crate::error::ConfigError;
use crate::neighborhood::MoveKind;
use crate::random::RandomSource;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geometric cooling parameters.
///
/// The temperature starts at `start_temperature` and is multiplied by
/// `alpha` once per iteration. The run ends when it falls below
/// `end_temperature` or after `max_iterations` iterations, whichever
/// comes first.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoolingConfig {
    /// Initial temperature. Must exceed `end_temperature`.
    pub start_temperature: f64,

    /// Temperature floor. Must be strictly positive.
    pub end_temperature: f64,

    /// Cooling factor in (0, 1). Higher = slower cooling.
    pub alpha: f64,

    /// Iteration budget. 0 still runs one iteration.
    pub max_iterations: u64,
}

impl Default for CoolingConfig {
    fn default() -> Self {
        Self {
            start_temperature: 1000.0,
            end_temperature: 1.0,
            alpha: 0.999,
            max_iterations: 1_000_000,
        }
    }
}

impl CoolingConfig {
    pub fn with_start_temperature(mut self, t: f64) -> Self {
        self.start_temperature = t;
        self
    }

    pub fn with_end_temperature(mut self, t: f64) -> Self {
        self.end_temperature = t;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_max_iterations(mut self, n: u64) -> Self {
        self.max_iterations = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (start, end) = (self.start_temperature, self.end_temperature);
        if !start.is_finite() || !end.is_finite() {
            return Err(ConfigError::NonFiniteTemperature { start, end });
        }
        if end <= 0.0 {
            return Err(ConfigError::NonPositiveEndTemperature(end));
        }
        if start <= end {
            return Err(ConfigError::TemperatureOrder { start, end });
        }
        // Written as a negated range check so NaN is rejected too.
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(ConfigError::AlphaOutOfRange(self.alpha));
        }
        Ok(())
    }
}

/// Relative weights of the two neighborhood moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveMix {
    pub relocate_weight: u32,
    pub exchange_weight: u32,
}

impl Default for MoveMix {
    fn default() -> Self {
        Self {
            relocate_weight: 1,
            exchange_weight: 1,
        }
    }
}

impl MoveMix {
    pub fn new(relocate_weight: u32, exchange_weight: u32) -> Self {
        Self {
            relocate_weight,
            exchange_weight,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let total = self.total();
        if total == 0 {
            return Err(ConfigError::NoMoveWeight);
        }
        // The draw bound must fit the 32-bit primitive and a 32-bit usize.
        if total > u64::from(u32::MAX) {
            return Err(ConfigError::MoveWeightOverflow(total));
        }
        Ok(())
    }

    fn total(&self) -> u64 {
        u64::from(self.relocate_weight) + u64::from(self.exchange_weight)
    }

    /// Draws a move kind proportionally to the weights.
    ///
    /// Expects a mix that passed [`validate`](MoveMix::validate).
    pub fn choose(&self, rng: &mut RandomSource) -> MoveKind {
        let total = self.total() as usize;
        if rng.below(total) < self.relocate_weight as usize {
            MoveKind::Relocate
        } else {
            MoveKind::Exchange
        }
    }
}

/// Configuration of one annealing run.
///
/// # Examples
///
/// ```
/// use u_makespan::{AnnealConfig, CoolingConfig};
///
/// let config = AnnealConfig::new(4)
///     .with_cooling(
///         CoolingConfig::default()
///             .with_start_temperature(500.0)
///             .with_alpha(0.995),
///     )
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnnealConfig {
    /// Number of identical machines. At least 1.
    pub machine_count: usize,

    /// Cooling schedule parameters.
    pub cooling: CoolingConfig,

    /// Relocate/exchange mix.
    pub move_mix: MoveMix,

    /// Random seed for reproducibility. `None` seeds from the OS.
    pub seed: Option<u64>,

    /// Progress is reported every this many iterations. 0 = never.
    pub report_interval: u64,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            machine_count: 2,
            cooling: CoolingConfig::default(),
            move_mix: MoveMix::default(),
            seed: None,
            report_interval: 0,
        }
    }
}

impl AnnealConfig {
    pub fn new(machine_count: usize) -> Self {
        Self {
            machine_count,
            ..Self::default()
        }
    }

    pub fn with_cooling(mut self, cooling: CoolingConfig) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_move_mix(mut self, mix: MoveMix) -> Self {
        self.move_mix = mix;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_report_interval(mut self, n: u64) -> Self {
        self.report_interval = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.machine_count == 0 {
            return Err(ConfigError::NoMachines);
        }
        self.cooling.validate()?;
        self.move_mix.validate()
    }
}
