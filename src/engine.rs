//! Annealing engine: the perturb / evaluate / accept / advance loop.
//!
//! # Algorithm
//!
//! 1. Place every job on a random machine (or start from a given
//!    assignment); this is the working, current and best solution.
//! 2. Each iteration:
//!    a. Pick a move. With a single occupied machine only Relocate is
//!    possible; otherwise Relocate or Exchange by the configured weights.
//!    b. Apply it to the working assignment and compute its makespan.
//!    c. Strictly better than current: commit, and update best if it also
//!    beats best. Otherwise commit with probability `exp(-delta / T)`,
//!    else restore working from current.
//!    d. Advance the cooling schedule.
//! 3. Stop once the schedule terminates; return the best assignment.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies" (`P||Cmax`)

use std::sync::Arc;

use tracing::{debug, trace};

use crate::assignment::Assignment;
use crate::catalog::JobCatalog;
use crate::config::AnnealConfig;
use crate::cooling::CoolingSchedule;
use crate::error::ConfigError;
use crate::neighborhood::{self, MoveKind};
use crate::random::RandomSource;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Best fitness is sampled into the history every this many iterations.
const HISTORY_INTERVAL: u64 = 1_000;

/// Engine lifecycle. `Terminated` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Running,
    Terminated,
}

/// What an iteration did with its candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Decision {
    /// Strictly better than current; committed.
    Improved,
    /// Not better, accepted by the Metropolis draw; committed.
    Accepted,
    /// Not better, rejected; working restored from current.
    Rejected,
    /// No move is possible on this instance (one machine, or no jobs).
    Idle,
}

/// Trace record of one iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Iteration number, starting at 1.
    pub iteration: u64,
    /// Applied move, `None` for idle iterations.
    pub move_kind: Option<MoveKind>,
    pub decision: Decision,
    /// Makespan of the candidate (equals current for idle iterations).
    pub candidate_fitness: u64,
    /// Temperature the decision was taken at.
    pub temperature: f64,
}

/// Snapshot passed to progress observers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub iteration: u64,
    pub temperature: f64,
    pub best_fitness: u64,
}

/// Result of an annealing run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnnealResult {
    /// The best assignment found.
    pub best: Assignment,

    /// Makespan of `best`.
    pub best_fitness: u64,

    /// Makespan of the starting assignment.
    pub initial_fitness: u64,

    /// Iterations executed.
    pub iterations: u64,

    /// Temperature when the schedule terminated.
    pub final_temperature: f64,

    /// Committed moves, improving ones included.
    pub accepted_moves: u64,

    /// Strictly improving moves.
    pub improving_moves: u64,

    pub relocations: u64,

    pub exchanges: u64,

    /// Seed the run used; replaying it reproduces the run.
    pub seed: u64,

    /// Best fitness sampled at regular intervals. Non-increasing.
    pub fitness_history: Vec<u64>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Counters {
    accepted: u64,
    improving: u64,
    relocations: u64,
    exchanges: u64,
}

/// Simulated annealing over job-to-machine assignments.
///
/// # Examples
///
/// ```
/// use u_makespan::{AnnealConfig, AnnealingEngine, CoolingConfig, JobCatalog};
///
/// let catalog = JobCatalog::new(vec![10, 20, 30]).unwrap();
/// let config = AnnealConfig::new(2)
///     .with_cooling(CoolingConfig::default().with_alpha(0.99))
///     .with_seed(42);
///
/// let result = AnnealingEngine::new(catalog, config).unwrap().run();
/// assert_eq!(result.best_fitness, 30);
/// ```
#[derive(Debug, Clone)]
pub struct AnnealingEngine {
    config: AnnealConfig,
    seed: u64,
    rng: RandomSource,
    schedule: CoolingSchedule,
    state: EngineState,

    working: Assignment,
    current: Assignment,
    best: Assignment,
    current_fitness: u64,
    best_fitness: u64,
    initial_fitness: u64,

    counters: Counters,
    history: Vec<u64>,
}

impl AnnealingEngine {
    /// Creates an engine starting from a random assignment drawn from
    /// the run's seeded source.
    pub fn new(
        catalog: impl Into<Arc<JobCatalog>>,
        config: AnnealConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = RandomSource::seeded(seed);
        let initial = Assignment::random(catalog.into(), config.machine_count, &mut rng)?;
        Ok(Self::assemble(config, seed, rng, initial))
    }

    /// Creates an engine starting from `initial`.
    ///
    /// `initial` must be a complete partition over `config.machine_count`
    /// machines.
    pub fn with_initial(initial: Assignment, config: AnnealConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        if initial.machine_count() != config.machine_count {
            return Err(ConfigError::MachineCountMismatch {
                expected: config.machine_count,
                actual: initial.machine_count(),
            });
        }
        initial.verify()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let rng = RandomSource::seeded(seed);
        Ok(Self::assemble(config, seed, rng, initial))
    }

    fn assemble(config: AnnealConfig, seed: u64, rng: RandomSource, initial: Assignment) -> Self {
        let fitness = initial.fitness();
        Self {
            schedule: CoolingSchedule::new(&config.cooling),
            config,
            seed,
            rng,
            state: EngineState::Running,
            current: initial.snapshot(),
            best: initial.snapshot(),
            working: initial,
            current_fitness: fitness,
            best_fitness: fitness,
            initial_fitness: fitness,
            counters: Counters::default(),
            history: vec![fitness],
        }
    }

    /// Runs until the schedule terminates.
    pub fn run(self) -> AnnealResult {
        self.run_with_observer(|_| {})
    }

    /// Runs until the schedule terminates, handing a [`Progress`] to
    /// `observer` every `report_interval` iterations.
    pub fn run_with_observer<F>(mut self, mut observer: F) -> AnnealResult
    where
        F: FnMut(&Progress),
    {
        debug!(
            jobs = self.working.catalog().len(),
            machines = self.config.machine_count,
            seed = self.seed,
            initial_fitness = self.initial_fitness,
            start_temperature = self.schedule.temperature(),
            "annealing started"
        );

        let interval = self.config.report_interval;
        while let Some(outcome) = self.step() {
            if interval > 0 && outcome.iteration % interval == 0 {
                let progress = self.progress();
                debug!(
                    iteration = progress.iteration,
                    temperature = progress.temperature,
                    best_fitness = progress.best_fitness,
                    "annealing progress"
                );
                observer(&progress);
            }
        }

        let result = self.into_result();
        debug!(
            iterations = result.iterations,
            best_fitness = result.best_fitness,
            final_temperature = result.final_temperature,
            accepted = result.accepted_moves,
            improving = result.improving_moves,
            "annealing finished"
        );
        result
    }

    /// Executes one iteration. Returns `None` once terminated.
    pub fn step(&mut self) -> Option<StepOutcome> {
        if self.state == EngineState::Terminated {
            return None;
        }

        let temperature = self.schedule.temperature();
        let move_kind = self.choose_move();

        let (decision, candidate_fitness) = match move_kind {
            None => (Decision::Idle, self.current_fitness),
            Some(kind) => {
                let applied = neighborhood::apply(kind, &mut self.working, &mut self.rng);
                match kind {
                    MoveKind::Relocate => self.counters.relocations += 1,
                    MoveKind::Exchange => self.counters.exchanges += 1,
                }
                let fitness = self.working.fitness();
                let decision = self.decide(fitness);
                trace!(?applied, fitness, ?decision, temperature, "move evaluated");
                (decision, fitness)
            }
        };

        self.schedule.advance();
        let iteration = self.schedule.iteration();
        if iteration % HISTORY_INTERVAL == 0 {
            self.history.push(self.best_fitness);
        }
        if self.schedule.is_terminated() {
            self.state = EngineState::Terminated;
        }

        Some(StepOutcome {
            iteration,
            move_kind,
            decision,
            candidate_fitness,
            temperature,
        })
    }

    /// `None` when no move exists: a single machine, or no jobs at all.
    fn choose_move(&mut self) -> Option<MoveKind> {
        if self.working.machine_count() < 2 {
            return None;
        }
        match self.working.occupied_machine_count() {
            0 => None,
            // Exchange needs two occupied machines.
            1 => Some(MoveKind::Relocate),
            _ => Some(self.config.move_mix.choose(&mut self.rng)),
        }
    }

    /// Metropolis decision on the working candidate, committing or
    /// reverting it.
    fn decide(&mut self, fitness: u64) -> Decision {
        if fitness < self.current_fitness {
            self.commit(fitness);
            self.counters.improving += 1;
            if fitness < self.best_fitness {
                self.best.restore_from(&self.current);
                self.best_fitness = fitness;
            }
            return Decision::Improved;
        }

        // delta == 0 gives probability 1, which every sample in [0, 1) beats.
        let delta = fitness - self.current_fitness;
        if self.rng.unit() < self.schedule.acceptance_probability(delta) {
            self.commit(fitness);
            Decision::Accepted
        } else {
            self.working.restore_from(&self.current);
            Decision::Rejected
        }
    }

    fn commit(&mut self, fitness: u64) {
        self.current.restore_from(&self.working);
        self.current_fitness = fitness;
        self.counters.accepted += 1;
    }

    pub fn progress(&self) -> Progress {
        Progress {
            iteration: self.schedule.iteration(),
            temperature: self.schedule.temperature(),
            best_fitness: self.best_fitness,
        }
    }

    /// Consumes the engine, returning the best assignment and statistics.
    ///
    /// Can be called before termination to take the best so far.
    pub fn into_result(mut self) -> AnnealResult {
        if self.history.last() != Some(&self.best_fitness) {
            self.history.push(self.best_fitness);
        }
        AnnealResult {
            best: self.best,
            best_fitness: self.best_fitness,
            initial_fitness: self.initial_fitness,
            iterations: self.schedule.iteration(),
            final_temperature: self.schedule.temperature(),
            accepted_moves: self.counters.accepted,
            improving_moves: self.counters.improving,
            relocations: self.counters.relocations,
            exchanges: self.counters.exchanges,
            seed: self.seed,
            fitness_history: self.history,
        }
    }

    #[inline]
    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn best(&self) -> &Assignment {
        &self.best
    }

    pub fn best_fitness(&self) -> u64 {
        self.best_fitness
    }

    /// The last committed assignment.
    pub fn current(&self) -> &Assignment {
        &self.current
    }

    pub fn current_fitness(&self) -> u64 {
        self.current_fitness
    }

    pub fn schedule(&self) -> &CoolingSchedule {
        &self.schedule
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &AnnealConfig {
        &self.config
    }
}
