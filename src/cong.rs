//! The congruence contract shared by every solver.
//!
//! Todd-Coxeter, Knuth-Bendix and the pair-closure engines all reduce
//! word-problem queries to this one trait, which is what lets a race
//! coordinator run them interchangeably and delegate to whichever
//! finishes first.

use crate::error::CongError;
use crate::quotient::QuotientSemigroup;
use crate::word::Word;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// The handedness of a congruence, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CongKind {
    Left,
    Right,
    TwoSided,
}

impl CongKind {
    /// Left congruences are computed on reversed words.
    pub fn reverses_words(self) -> bool {
        matches!(self, CongKind::Left)
    }
}

/// Number of congruence classes; infinite quotients are first-class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassCount {
    Finite(usize),
    Infinite,
}

impl ClassCount {
    pub fn finite(self) -> Option<usize> {
        match self {
            ClassCount::Finite(n) => Some(n),
            ClassCount::Infinite => None,
        }
    }

    pub fn is_infinite(self) -> bool {
        matches!(self, ClassCount::Infinite)
    }
}

/// Answer of a conservative, non-running query. `True` and `False` are
/// definite; `Unknown` means the solver has not computed enough yet.
/// A solver must never answer `True` or `False` wrongly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trivalent {
    True,
    False,
    Unknown,
}

/// A congruence solver. Blocking queries (`nr_classes`,
/// `word_to_class_index`, `contains`, ...) run the enumeration to
/// completion first and may therefore never return on undecidable
/// input; they respect kills and deadlines and report `Cancelled` or
/// `NotFinished` instead of an answer when stopped early.
pub trait CongruenceSolver: Send {
    /// Short name used by the reporter and the race coordinator.
    fn name(&self) -> &'static str;

    fn kind(&self) -> CongKind;

    fn nr_generators(&self) -> usize;

    /// Register an extra generating pair. Only valid before the solver
    /// has finished; afterwards this is `PrematureMutation`.
    fn add_pair(&mut self, u: &Word, v: &Word) -> Result<(), CongError>;

    /// Advance the enumeration until it completes or is stopped.
    /// Idempotent once finished, resumable after a deadline.
    fn run(&mut self);

    /// Run with a wall-clock budget. Timing out is not an error.
    fn run_for(&mut self, t: Duration);

    fn finished(&self) -> bool;

    fn dead(&self) -> bool;

    fn kill(&self);

    /// Shared flag through which a coordinator kills this runner.
    fn kill_handle(&self) -> Arc<AtomicBool>;

    /// Drop scratch buffers. Called on race losers; the solver is never
    /// queried afterwards.
    fn release_buffers(&mut self) {}

    fn nr_classes(&mut self) -> Result<ClassCount, CongError>;

    fn word_to_class_index(&mut self, w: &Word) -> Result<usize, CongError>;

    /// Non-blocking variant; `NotFinished` when the solver is not done.
    fn const_word_to_class_index(&self, w: &Word) -> Result<usize, CongError>;

    fn class_index_to_word(&mut self, index: usize) -> Result<Word, CongError>;

    fn contains(&mut self, u: &Word, v: &Word) -> Result<bool, CongError> {
        Ok(self.word_to_class_index(u)? == self.word_to_class_index(v)?)
    }

    /// Conservative containment check that never runs the enumeration.
    fn const_contains(&self, u: &Word, v: &Word) -> Trivalent {
        if u == v {
            return Trivalent::True;
        }
        match (
            self.const_word_to_class_index(u),
            self.const_word_to_class_index(v),
        ) {
            (Ok(i), Ok(j)) if i == j => Trivalent::True,
            (Ok(_), Ok(_)) => Trivalent::False,
            _ => Trivalent::Unknown,
        }
    }

    /// Total order on classes consistent with the enumeration order.
    /// Not stable across runs.
    fn less(&mut self, u: &Word, v: &Word) -> Result<bool, CongError> {
        Ok(self.word_to_class_index(u)? < self.word_to_class_index(v)?)
    }

    /// The classes with more than one element, as vectors of
    /// representative words. Solvers without access to a concrete parent
    /// report `NotImplemented`.
    fn non_trivial_classes(&mut self) -> Result<&[Vec<Word>], CongError>;

    fn nr_non_trivial_classes(&mut self) -> Result<usize, CongError> {
        Ok(self.non_trivial_classes()?.len())
    }

    /// Cheap sufficient test for an infinite quotient. `false` means
    /// "don't know", never "finite".
    fn is_quotient_obviously_infinite(&self) -> bool;

    /// Materialise the quotient semigroup on class indices. Fails with
    /// `QuotientInfinite` when the quotient is not finite and is only
    /// defined for two-sided congruences.
    fn quotient(&mut self) -> Result<QuotientSemigroup, CongError>;

    /// Run to completion, mapping an early stop onto the error taxonomy.
    fn run_checked(&mut self) -> Result<(), CongError> {
        self.run();
        if self.finished() {
            Ok(())
        } else if self.dead() {
            Err(CongError::Cancelled)
        } else {
            Err(CongError::NotFinished)
        }
    }
}
