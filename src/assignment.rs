//! Job-to-machine assignment with cached machine loads.
//!
//! An [`Assignment`] partitions the jobs of a [`JobCatalog`] over `M`
//! identical machines. Every machine caches the summed duration of its
//! jobs, so the makespan is an O(M) query and a move is O(jobs on the
//! touched machines).
//!
//! # Invariant
//!
//! Every job index of the catalog is on exactly one machine, and every
//! cached load equals the sum of its machine's durations. The public
//! mutators preserve this when called correctly; a removal of a job
//! that is not where the caller claims it is panics with an
//! [`InvariantViolation`] diagnostic, since continuing from a corrupt
//! partition would silently produce a wrong schedule.

use std::fmt;
use std::sync::Arc;

use crate::catalog::JobCatalog;
use crate::error::{ConfigError, InvariantViolation};
use crate::random::RandomSource;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One machine bucket: unordered job indices and their cached total.
#[derive(Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Machine {
    jobs: Vec<usize>,
    load: u64,
}

impl Machine {
    /// Jobs on this machine, in storage order.
    #[inline]
    pub fn jobs(&self) -> &[usize] {
        &self.jobs
    }

    /// Cached sum of the durations of [`jobs`](Machine::jobs).
    #[inline]
    pub fn load(&self) -> u64 {
        self.load
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl Clone for Machine {
    fn clone(&self) -> Self {
        Self {
            jobs: self.jobs.clone(),
            load: self.load,
        }
    }

    // Reuses the job buffer; restores run once per rejected move.
    fn clone_from(&mut self, source: &Self) {
        self.jobs.clone_from(&source.jobs);
        self.load = source.load;
    }
}

/// Partition of the catalog's jobs over identical machines.
///
/// Deserialization (feature `serde`) restores buckets and cached loads
/// as given, without checking them. Call [`verify`](Assignment::verify)
/// on a deserialized assignment before mutating or scoring it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assignment {
    catalog: Arc<JobCatalog>,
    machines: Vec<Machine>,
}

impl Assignment {
    /// `machine_count` machines with no jobs on them.
    ///
    /// The result violates the partition invariant until every job has
    /// been [`assign`](Assignment::assign)ed; use it as a builder.
    pub fn empty(catalog: Arc<JobCatalog>, machine_count: usize) -> Result<Self, ConfigError> {
        if machine_count == 0 {
            return Err(ConfigError::NoMachines);
        }
        Ok(Self {
            catalog,
            machines: vec![Machine::default(); machine_count],
        })
    }

    /// Places every job on a uniformly drawn machine.
    pub fn random(
        catalog: Arc<JobCatalog>,
        machine_count: usize,
        rng: &mut RandomSource,
    ) -> Result<Self, ConfigError> {
        let mut assignment = Self::empty(catalog, machine_count)?;
        for job in 0..assignment.catalog.len() {
            let machine = rng.below(machine_count);
            assignment.assign(job, machine);
        }
        Ok(assignment)
    }

    /// Builds an assignment from `mapping[job] = machine`.
    pub fn from_mapping(
        catalog: Arc<JobCatalog>,
        machine_count: usize,
        mapping: &[usize],
    ) -> Result<Self, ConfigError> {
        if mapping.len() != catalog.len() {
            return Err(ConfigError::MappingLength {
                expected: catalog.len(),
                actual: mapping.len(),
            });
        }
        let mut assignment = Self::empty(catalog, machine_count)?;
        for (job, &machine) in mapping.iter().enumerate() {
            if machine >= machine_count {
                return Err(ConfigError::MachineOutOfRange {
                    job,
                    machine,
                    machine_count,
                });
            }
            assignment.assign(job, machine);
        }
        Ok(assignment)
    }

    /// Appends `job` to `machine` and adds its duration to the load.
    ///
    /// The caller guarantees `job` is not on any machine yet; assigning
    /// it twice breaks the partition.
    ///
    /// # Panics
    ///
    /// Panics if `job` or `machine` is out of range.
    #[inline]
    pub fn assign(&mut self, job: usize, machine: usize) {
        let duration = self.catalog.duration(job);
        let bucket = &mut self.machines[machine];
        bucket.jobs.push(job);
        bucket.load += duration;
    }

    /// Removes `job` from `machine` and subtracts its duration.
    ///
    /// The last job of the machine takes the vacated slot, so job order
    /// on the machine is not preserved.
    ///
    /// # Panics
    ///
    /// Panics with [`InvariantViolation::JobNotOnMachine`] if `machine`
    /// does not hold `job`. This only happens on corrupted state.
    pub fn remove(&mut self, job: usize, machine: usize) {
        let bucket = &mut self.machines[machine];
        let Some(pos) = bucket.jobs.iter().position(|&j| j == job) else {
            panic!(
                "assignment invariant violated: {}",
                InvariantViolation::JobNotOnMachine {
                    job,
                    machine,
                    jobs: bucket.jobs.clone(),
                }
            );
        };
        bucket.jobs.swap_remove(pos);
        bucket.load -= self.catalog.duration(job);
    }

    /// Cached load of `machine`.
    #[inline]
    pub fn load_of(&self, machine: usize) -> u64 {
        self.machines[machine].load
    }

    /// Makespan: the largest cached machine load.
    pub fn fitness(&self) -> u64 {
        self.machines.iter().map(|m| m.load).max().unwrap_or(0)
    }

    /// Number of machines holding at least one job.
    pub fn occupied_machine_count(&self) -> usize {
        self.machines.iter().filter(|m| !m.is_empty()).count()
    }

    #[inline]
    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }

    #[inline]
    pub fn job_count(&self, machine: usize) -> usize {
        self.machines[machine].jobs.len()
    }

    #[inline]
    pub fn jobs_on(&self, machine: usize) -> &[usize] {
        &self.machines[machine].jobs
    }

    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    pub fn catalog(&self) -> &Arc<JobCatalog> {
        &self.catalog
    }

    /// Returns `true` if both assignments are built over the same jobs.
    pub fn shares_catalog(&self, other: &Assignment) -> bool {
        Arc::ptr_eq(&self.catalog, &other.catalog) || self.catalog == other.catalog
    }

    /// Independent deep copy.
    pub fn snapshot(&self) -> Assignment {
        self.clone()
    }

    /// Overwrites `self` with the contents of `source`, reusing buffers.
    pub fn restore_from(&mut self, source: &Assignment) {
        debug_assert!(self.shares_catalog(source));
        self.machines.clone_from(&source.machines);
    }

    /// `mapping[job]` is the machine holding `job`.
    ///
    /// Relies on the partition invariant; call [`verify`](Assignment::verify)
    /// first on assignments of unknown provenance.
    pub fn to_mapping(&self) -> Vec<usize> {
        let mut mapping = vec![0; self.catalog.len()];
        for (machine, bucket) in self.machines.iter().enumerate() {
            for &job in &bucket.jobs {
                mapping[job] = machine;
            }
        }
        mapping
    }

    /// Checks the partition and every cached load against a full scan.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        let job_count = self.catalog.len();
        let mut seen = vec![0usize; job_count];

        for (machine, bucket) in self.machines.iter().enumerate() {
            let mut actual = 0u64;
            for &job in &bucket.jobs {
                if job >= job_count {
                    return Err(InvariantViolation::UnknownJob { job, job_count });
                }
                seen[job] += 1;
                actual += self.catalog.duration(job);
            }
            if actual != bucket.load {
                return Err(InvariantViolation::LoadDrift {
                    machine,
                    cached: bucket.load,
                    actual,
                });
            }
        }

        for (job, &count) in seen.iter().enumerate() {
            match count {
                1 => {}
                0 => return Err(InvariantViolation::MissingJob { job }),
                _ => return Err(InvariantViolation::DuplicateJob { job, count }),
            }
        }
        Ok(())
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, bucket) in self.machines.iter().enumerate() {
            write!(f, "machine {id}: {} jobs, load {} |", bucket.jobs.len(), bucket.load)?;
            for job in &bucket.jobs {
                write!(f, " {job}")?;
            }
            writeln!(f)?;
        }
        write!(f, "makespan {}", self.fitness())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(durations: &[u64]) -> Arc<JobCatalog> {
        Arc::new(JobCatalog::new(durations.to_vec()).unwrap())
    }

    #[test]
    fn test_empty_rejects_zero_machines() {
        let err = Assignment::empty(catalog(&[1]), 0).unwrap_err();
        assert_eq!(err, ConfigError::NoMachines);
    }

    #[test]
    fn test_assign_updates_load() {
        let mut a = Assignment::empty(catalog(&[4, 6, 9]), 2).unwrap();
        a.assign(0, 0);
        a.assign(2, 0);
        a.assign(1, 1);
        assert_eq!(a.load_of(0), 13);
        assert_eq!(a.load_of(1), 6);
        assert_eq!(a.fitness(), 13);
        assert_eq!(a.occupied_machine_count(), 2);
        assert!(a.verify().is_ok());
    }

    #[test]
    fn test_remove_moves_last_into_hole() {
        let mut a = Assignment::from_mapping(catalog(&[1, 2, 3, 4]), 2, &[0, 0, 0, 0]).unwrap();
        assert_eq!(a.jobs_on(0), &[0, 1, 2, 3]);
        a.remove(1, 0);
        assert_eq!(a.jobs_on(0), &[0, 3, 2]);
        assert_eq!(a.load_of(0), 8);
        a.remove(2, 0);
        assert_eq!(a.jobs_on(0), &[0, 3]);
    }

    #[test]
    fn test_remove_only_job() {
        let mut a = Assignment::from_mapping(catalog(&[5]), 3, &[2]).unwrap();
        a.remove(0, 2);
        assert_eq!(a.job_count(2), 0);
        assert_eq!(a.load_of(2), 0);
        assert_eq!(a.occupied_machine_count(), 0);
    }

    #[test]
    #[should_panic(expected = "job 1 is not on machine 0")]
    fn test_remove_absent_job_panics() {
        let mut a = Assignment::from_mapping(catalog(&[5, 6]), 2, &[0, 1]).unwrap();
        a.remove(1, 0);
    }

    #[test]
    fn test_from_mapping_validation() {
        let c = catalog(&[1, 2]);
        assert_eq!(
            Assignment::from_mapping(c.clone(), 2, &[0]).unwrap_err(),
            ConfigError::MappingLength {
                expected: 2,
                actual: 1
            }
        );
        assert_eq!(
            Assignment::from_mapping(c, 2, &[0, 2]).unwrap_err(),
            ConfigError::MachineOutOfRange {
                job: 1,
                machine: 2,
                machine_count: 2
            }
        );
    }

    #[test]
    fn test_to_mapping_round_trip() {
        let mapping = [2, 0, 1, 2, 0];
        let a = Assignment::from_mapping(catalog(&[1, 1, 1, 1, 1]), 3, &mapping).unwrap();
        assert_eq!(a.to_mapping(), mapping);
    }

    #[test]
    fn test_random_is_complete_partition() {
        let mut rng = RandomSource::seeded(11);
        let a = Assignment::random(catalog(&[3, 1, 4, 1, 5, 9, 2, 6]), 4, &mut rng).unwrap();
        assert!(a.verify().is_ok());
        let total: u64 = (0..4).map(|m| a.load_of(m)).sum();
        assert_eq!(total, 31);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut a = Assignment::from_mapping(catalog(&[1, 2, 3]), 2, &[0, 0, 1]).unwrap();
        let snap = a.snapshot();
        a.remove(0, 0);
        a.assign(0, 1);
        assert_ne!(a, snap);
        assert_eq!(snap.load_of(0), 3);

        a.restore_from(&snap);
        assert_eq!(a, snap);
        assert!(a.verify().is_ok());
    }

    #[test]
    fn test_verify_detects_duplicates_and_missing() {
        let mut a = Assignment::empty(catalog(&[1, 2]), 2).unwrap();
        a.assign(0, 0);
        assert_eq!(a.verify(), Err(InvariantViolation::MissingJob { job: 1 }));
        a.assign(1, 0);
        a.assign(1, 1);
        assert_eq!(
            a.verify(),
            Err(InvariantViolation::DuplicateJob { job: 1, count: 2 })
        );
    }

    #[test]
    fn test_display_lists_machines() {
        let a = Assignment::from_mapping(catalog(&[10, 20, 30]), 2, &[0, 0, 1]).unwrap();
        let text = a.to_string();
        assert!(text.contains("machine 0: 2 jobs, load 30 | 0 1"));
        assert!(text.contains("machine 1: 1 jobs, load 30 | 2"));
        assert!(text.ends_with("makespan 30"));
    }
}
