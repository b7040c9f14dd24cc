//! Congruence facade: builds the right solver set for the input and
//! routes every query to the race winner.
//!
//! For a finitely presented input the set is a Todd-Coxeter enumerator,
//! plus (two-sided only) a Knuth-Bendix instance on the quotient
//! presentation, plus a Knuth-Bendix pair closure. Over a concrete
//! parent it is a prefilled Todd-Coxeter and the plain pair closure.

use crate::cong::{ClassCount, CongKind, CongruenceSolver, Trivalent};
use crate::error::CongError;
use crate::froidure::{FroidurePin, ParentSemigroup, SemigroupElement};
use crate::kb::KnuthBendix;
use crate::pair::{KbPairCongruence, PairCongruence};
use crate::quotient::QuotientSemigroup;
use crate::race::Race;
use crate::tc::ToddCoxeter;
use crate::word::{validate_word, Word};
use std::sync::Arc;
use std::time::Duration;

pub struct Congruence {
    kind: CongKind,
    nr_gens: usize,
    race: Race,
}

impl Congruence {
    /// A congruence of the finitely presented semigroup with `nr_gens`
    /// generators and the given defining relations, generated by the
    /// `extra` pairs.
    pub fn new(
        kind: CongKind,
        nr_gens: usize,
        relations: &[(Word, Word)],
        extra: &[(Word, Word)],
    ) -> Result<Self, CongError> {
        let mut race = Race::new();
        race.add_runner(Box::new(ToddCoxeter::with_relations(
            kind, nr_gens, relations, extra,
        )?))?;
        if kind == CongKind::TwoSided {
            // the two-sided quotient is itself finitely presented
            let mut all = relations.to_vec();
            all.extend_from_slice(extra);
            race.add_runner(Box::new(KnuthBendix::with_relations(nr_gens, &all)?))?;
        } else {
            // one-sided congruences cannot be fed to Knuth-Bendix
            // directly; close the pairs over its normal forms instead
            let kb = KnuthBendix::with_relations(nr_gens, relations)?;
            let mut kbp = KbPairCongruence::new(kind, kb);
            for (u, v) in extra {
                kbp.add_pair(u, v)?;
            }
            race.add_runner(Box::new(kbp))?;
        }
        Ok(Self {
            kind,
            nr_gens,
            race,
        })
    }

    /// A congruence of a concrete parent semigroup, generated by the
    /// `extra` pairs of words over the parent's generators.
    pub fn over_parent<T: SemigroupElement + 'static>(
        kind: CongKind,
        parent: Arc<FroidurePin<T>>,
        extra: &[(Word, Word)],
    ) -> Result<Self, CongError> {
        let nr_gens = parent.nr_generators();
        let mut race = Race::new();

        let mut tc = ToddCoxeter::new(kind, nr_gens);
        match kind {
            CongKind::Left => tc.prefill(parent.cayley_table(true))?,
            CongKind::Right => tc.prefill(parent.cayley_table(false))?,
            CongKind::TwoSided => {
                tc.prefill_both(parent.cayley_table(false), parent.cayley_table(true))?
            }
        }
        tc.set_parent_words(
            (0..parent.size())
                .map(|i| parent.factorisation_of_index(i))
                .collect(),
        );
        for (u, v) in extra {
            tc.add_pair(u, v)?;
        }
        race.add_runner(Box::new(tc))?;

        let mut p = PairCongruence::new(kind, parent);
        for (u, v) in extra {
            p.add_pair(u, v)?;
        }
        race.add_runner(Box::new(p))?;

        Ok(Self {
            kind,
            nr_gens,
            race,
        })
    }

    pub fn kind(&self) -> CongKind {
        self.kind
    }

    pub fn nr_generators(&self) -> usize {
        self.nr_gens
    }

    pub fn set_max_threads(&mut self, n: usize) {
        self.race.set_max_threads(n);
    }

    /// Register a further generating pair with every runner. Forbidden
    /// once the race has started.
    pub fn add_pair(&mut self, u: &Word, v: &Word) -> Result<(), CongError> {
        validate_word(u, self.nr_gens)?;
        validate_word(v, self.nr_gens)?;
        self.race.add_pair(u, v)
    }

    pub fn run(&mut self) -> Result<(), CongError> {
        self.race.winner().map(|_| ())
    }

    pub fn run_for(&mut self, t: Duration) -> Result<(), CongError> {
        self.race.run_for(t)
    }

    pub fn is_quotient_obviously_infinite(&self) -> bool {
        self.race.any_obviously_infinite()
    }

    pub fn nr_classes(&mut self) -> Result<ClassCount, CongError> {
        if self.is_quotient_obviously_infinite() {
            return Ok(ClassCount::Infinite);
        }
        self.race.winner()?.nr_classes()
    }

    pub fn word_to_class_index(&mut self, w: &Word) -> Result<usize, CongError> {
        self.race.winner()?.word_to_class_index(w)
    }

    pub fn class_index_to_word(&mut self, index: usize) -> Result<Word, CongError> {
        self.race.winner()?.class_index_to_word(index)
    }

    pub fn contains(&mut self, u: &Word, v: &Word) -> Result<bool, CongError> {
        self.race.winner()?.contains(u, v)
    }

    pub fn const_contains(&self, u: &Word, v: &Word) -> Trivalent {
        self.race.const_contains(u, v)
    }

    pub fn less(&mut self, u: &Word, v: &Word) -> Result<bool, CongError> {
        self.race.winner()?.less(u, v)
    }

    pub fn non_trivial_classes(&mut self) -> Result<&[Vec<Word>], CongError> {
        self.race.winner()?.non_trivial_classes()
    }

    pub fn nr_non_trivial_classes(&mut self) -> Result<usize, CongError> {
        self.race.winner()?.nr_non_trivial_classes()
    }

    pub fn quotient(&mut self) -> Result<QuotientSemigroup, CongError> {
        self.race.winner()?.quotient()
    }
}

#[cfg(test)]
#[path = "tests/congruence.rs"]
mod tests;
