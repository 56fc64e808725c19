//! Error types.
//!
//! Two kinds of failure exist and they are kept apart on purpose:
//!
//! - [`ConfigError`]: a malformed input, rejected before a run starts.
//!   Every constructor that takes user input returns it.
//! - [`InvariantViolation`]: corruption of the job partition. This is a
//!   defect in the mutation logic, never a runtime condition; the
//!   mutating operations panic with it as the diagnostic.

use thiserror::Error;

/// Rejected configuration or input data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("machine count must be at least 1")]
    NoMachines,

    #[error("alpha must be in (0, 1), got {0}")]
    AlphaOutOfRange(f64),

    #[error("end temperature must be positive, got {0}")]
    NonPositiveEndTemperature(f64),

    #[error("start temperature {start} must exceed end temperature {end}")]
    TemperatureOrder { start: f64, end: f64 },

    #[error("temperatures must be finite (start {start}, end {end})")]
    NonFiniteTemperature { start: f64, end: f64 },

    #[error("job {job} has negative duration {duration}")]
    NegativeDuration { job: usize, duration: i64 },

    #[error("total job duration overflows u64")]
    DurationOverflow,

    #[error("relocate and exchange weights are both zero")]
    NoMoveWeight,

    #[error("move weights sum to {0}, at most {max} allowed", max = u32::MAX)]
    MoveWeightOverflow(u64),

    #[error("assignment has {actual} machines, configuration expects {expected}")]
    MachineCountMismatch { expected: usize, actual: usize },

    #[error("initial assignment is not a valid partition: {0}")]
    InvalidAssignment(#[from] InvariantViolation),

    #[error("mapping covers {actual} jobs, catalog has {expected}")]
    MappingLength { expected: usize, actual: usize },

    #[error("job {job} mapped to machine {machine}, only {machine_count} machines exist")]
    MachineOutOfRange {
        job: usize,
        machine: usize,
        machine_count: usize,
    },
}

/// Broken job partition.
///
/// Reaching any of these means the assignment state is corrupt. The
/// messages carry enough state (job, machine, contents) to locate the
/// faulty mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("job {job} is not on machine {machine} (machine holds {jobs:?})")]
    JobNotOnMachine {
        job: usize,
        machine: usize,
        jobs: Vec<usize>,
    },

    #[error("job {job} is assigned {count} times")]
    DuplicateJob { job: usize, count: usize },

    #[error("job {job} is not assigned to any machine")]
    MissingJob { job: usize },

    #[error("job index {job} is outside the catalog of {job_count} jobs")]
    UnknownJob { job: usize, job_count: usize },

    #[error("machine {machine} caches load {cached}, its jobs sum to {actual}")]
    LoadDrift {
        machine: usize,
        cached: u64,
        actual: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::AlphaOutOfRange(1.5).to_string(),
            "alpha must be in (0, 1), got 1.5"
        );
        assert_eq!(
            ConfigError::TemperatureOrder {
                start: 1.0,
                end: 2.0
            }
            .to_string(),
            "start temperature 1 must exceed end temperature 2"
        );
    }

    #[test]
    fn test_invariant_message_names_job_and_machine() {
        let msg = InvariantViolation::JobNotOnMachine {
            job: 7,
            machine: 2,
            jobs: vec![1, 3],
        }
        .to_string();
        assert_eq!(msg, "job 7 is not on machine 2 (machine holds [1, 3])");
    }
}
