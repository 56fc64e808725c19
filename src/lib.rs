//! Makespan minimization on identical parallel machines (`P||Cmax`) by
//! simulated annealing.
//!
//! Given `J` jobs with fixed durations and `M` identical machines, find
//! an assignment of jobs to machines minimizing the largest machine
//! load. The problem is NP-hard; this crate searches heuristically.
//!
//! - **Catalog** ([`JobCatalog`]): immutable job durations.
//! - **Assignment** ([`Assignment`]): job partition with cached machine
//!   loads, so the makespan is an O(M) query.
//! - **Neighborhood** ([`neighborhood`]): Relocate (move one job) and
//!   Exchange (swap two jobs between machines).
//! - **Cooling** ([`CoolingSchedule`]): geometric decay with the
//!   Metropolis acceptance probability.
//! - **Engine** ([`AnnealingEngine`]): the annealing loop, tracking the
//!   best assignment seen.
//!
//! A run is single-threaded and fully determined by its seed,
//! configuration and catalog.
//!
//! # Examples
//!
//! ```
//! use u_makespan::{AnnealConfig, AnnealingEngine, CoolingConfig, JobCatalog};
//!
//! let catalog = JobCatalog::new(vec![7, 5, 4, 3, 3, 2]).unwrap();
//! let config = AnnealConfig::new(3)
//!     .with_cooling(CoolingConfig::default().with_alpha(0.995))
//!     .with_seed(7);
//!
//! let result = AnnealingEngine::new(catalog, config).unwrap().run();
//! assert!(result.best_fitness >= 8);
//! assert!(result.best.verify().is_ok());
//! ```

pub mod assignment;
pub mod catalog;
pub mod config;
pub mod cooling;
pub mod engine;
pub mod error;
pub mod neighborhood;
pub mod random;

pub use assignment::{Assignment, Machine};
pub use catalog::JobCatalog;
pub use config::{AnnealConfig, CoolingConfig, MoveMix};
pub use cooling::CoolingSchedule;
pub use engine::{AnnealResult, AnnealingEngine, Decision, EngineState, Progress, StepOutcome};
pub use error::{ConfigError, InvariantViolation};
pub use neighborhood::MoveKind;
pub use random::RandomSource;
