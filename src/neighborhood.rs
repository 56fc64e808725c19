//! Neighborhood moves: relocate one job, exchange two jobs.
//!
//! Both moves mutate the assignment in place and are undone only by a
//! full snapshot restore; no inverse-move bookkeeping is kept.
//!
//! Machine selection uses rejection sampling: draw uniformly, redraw
//! while the draw is unusable. The loops terminate only under the
//! liveness preconditions documented on each move, which the engine
//! guarantees before calling.

use crate::assignment::Assignment;
use crate::random::RandomSource;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which neighborhood move an iteration applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MoveKind {
    Relocate,
    Exchange,
}

/// A job moved from one machine to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
    pub job: usize,
    pub from: usize,
    pub to: usize,
}

/// Two jobs on distinct machines traded places.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exchange {
    pub first_job: usize,
    pub first_machine: usize,
    pub second_job: usize,
    pub second_machine: usize,
}

/// Record of an applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Relocate(Relocation),
    Exchange(Exchange),
}

impl Move {
    pub fn kind(&self) -> MoveKind {
        match self {
            Move::Relocate(_) => MoveKind::Relocate,
            Move::Exchange(_) => MoveKind::Exchange,
        }
    }
}

/// Applies the move of the given kind.
pub fn apply(kind: MoveKind, assignment: &mut Assignment, rng: &mut RandomSource) -> Move {
    match kind {
        MoveKind::Relocate => Move::Relocate(relocate(assignment, rng)),
        MoveKind::Exchange => Move::Exchange(exchange(assignment, rng)),
    }
}

/// Moves a uniformly chosen job of a random non-empty machine to a
/// different random machine.
///
/// Liveness: at least one machine is non-empty and there are at least
/// two machines. Otherwise the selection loops never end.
pub fn relocate(assignment: &mut Assignment, rng: &mut RandomSource) -> Relocation {
    let machine_count = assignment.machine_count();

    let from = draw_occupied(assignment, rng);
    let job = draw_job(assignment, from, rng);

    let mut to = rng.below(machine_count);
    while to == from {
        to = rng.below(machine_count);
    }

    assignment.remove(job, from);
    assignment.assign(job, to);
    Relocation { job, from, to }
}

/// Swaps one uniformly chosen job of each of two distinct non-empty
/// machines.
///
/// Precondition: `assignment.occupied_machine_count() >= 2`. It is not
/// checked; with fewer occupied machines the second draw never
/// succeeds.
pub fn exchange(assignment: &mut Assignment, rng: &mut RandomSource) -> Exchange {
    let machine_count = assignment.machine_count();

    let first_machine = draw_occupied(assignment, rng);
    let mut second_machine = rng.below(machine_count);
    while second_machine == first_machine || assignment.job_count(second_machine) == 0 {
        second_machine = rng.below(machine_count);
    }

    let first_job = draw_job(assignment, first_machine, rng);
    let second_job = draw_job(assignment, second_machine, rng);

    assignment.remove(first_job, first_machine);
    assignment.remove(second_job, second_machine);
    assignment.assign(second_job, first_machine);
    assignment.assign(first_job, second_machine);

    Exchange {
        first_job,
        first_machine,
        second_job,
        second_machine,
    }
}

/// Uniform machine among those holding at least one job.
fn draw_occupied(assignment: &Assignment, rng: &mut RandomSource) -> usize {
    let machine_count = assignment.machine_count();
    let mut machine = rng.below(machine_count);
    while assignment.job_count(machine) == 0 {
        machine = rng.below(machine_count);
    }
    machine
}

/// Uniform job on a non-empty machine.
fn draw_job(assignment: &Assignment, machine: usize, rng: &mut RandomSource) -> usize {
    let jobs = assignment.jobs_on(machine);
    jobs[rng.below(jobs.len())]
}
