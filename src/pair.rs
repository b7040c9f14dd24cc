//! Brute-force pair closure over a concrete parent semigroup.
//!
//! Known-equal element pairs are multiplied by every generator on the
//! sides the congruence kind demands, and the resulting pairs are united
//! in a union-find over an interned element table until no new pair
//! arises. Quadratic in the worst case, but unbeatable on small
//! congruences with cheap products, which is why it races against the
//! table-based engines.

use crate::cong::{ClassCount, CongKind, CongruenceSolver, Trivalent};
use crate::error::CongError;
use crate::froidure::{ParentSemigroup, SemigroupElement};
use crate::kb::{enumerate_normal_forms, KnuthBendix, RuleSet};
use crate::quotient::QuotientSemigroup;
use crate::reporter::reporter;
use crate::runner::RunnerState;
use crate::uf::UnionFind;
use crate::word::{validate_word, Word};
use hashbrown::HashMap;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

/// The `P` engine: congruence enumeration by pair closure.
pub struct PairCongruence<P: ParentSemigroup> {
    state: RunnerState,
    kind: CongKind,
    parent: Arc<P>,
    index_of: HashMap<P::Elt, u32>,
    reverse: Vec<P::Elt>,
    uf: UnionFind,
    /// Canonicalised `(i, j)` pairs already seen, `i < j`.
    found: FxHashSet<(u32, u32)>,
    queue: VecDeque<(u32, u32)>,
    class_lookup: Vec<u32>,
    next_class: u32,
    ntc: Option<Vec<Vec<Word>>>,
}

impl<P: ParentSemigroup + 'static> PairCongruence<P> {
    pub fn new(kind: CongKind, parent: Arc<P>) -> Self {
        Self {
            state: RunnerState::new(),
            kind,
            parent,
            index_of: HashMap::new(),
            reverse: Vec::new(),
            uf: UnionFind::new(0),
            found: FxHashSet::default(),
            queue: VecDeque::new(),
            class_lookup: Vec::new(),
            next_class: 0,
            ntc: None,
        }
    }

    pub(crate) fn runner_mut(&mut self) -> &mut RunnerState {
        &mut self.state
    }

    pub(crate) fn add_pair_unchecked(&mut self, u: &Word, v: &Word) {
        let x = self.parent.word_to_element(u);
        let y = self.parent.word_to_element(v);
        self.internal_add_pair(x, y);
    }

    fn get_index(&mut self, x: P::Elt) -> u32 {
        if let Some(&i) = self.index_of.get(&x) {
            return i;
        }
        let i = self.uf.add_entry();
        self.index_of.insert(x.clone(), i);
        self.reverse.push(x);
        if self.state.finished() {
            // late interning: a fresh singleton class
            self.class_lookup.push(self.next_class);
            self.next_class += 1;
        }
        i
    }

    fn internal_add_pair(&mut self, x: P::Elt, y: P::Elt) {
        if x == y {
            return;
        }
        let i = self.get_index(x);
        let j = self.get_index(y);
        let pair = if i < j { (i, j) } else { (j, i) };
        if !self.found.insert(pair) {
            return;
        }
        self.queue.push_back(pair);
        self.uf.unite(pair.0, pair.1);
    }

    fn report_progress(&mut self) {
        if reporter().report() && self.state.report_due() {
            reporter().emit(
                self.name(),
                &format!(
                    "{} pairs, {} elements in {} classes, {} pairs on the stack",
                    self.found.len(),
                    self.reverse.len(),
                    self.uf.nr_blocks(),
                    self.queue.len()
                ),
            );
        }
    }
}

impl<P: ParentSemigroup + 'static> CongruenceSolver for PairCongruence<P> {
    fn name(&self) -> &'static str {
        "pairs"
    }

    fn kind(&self) -> CongKind {
        self.kind
    }

    fn nr_generators(&self) -> usize {
        self.parent.nr_generators()
    }

    fn add_pair(&mut self, u: &Word, v: &Word) -> Result<(), CongError> {
        if self.state.started() {
            return Err(CongError::PrematureMutation);
        }
        validate_word(u, self.parent.nr_generators())?;
        validate_word(v, self.parent.nr_generators())?;
        self.add_pair_unchecked(u, v);
        Ok(())
    }

    fn run(&mut self) {
        if self.state.finished() || self.state.stopped() {
            return;
        }
        self.state.set_started();
        while let Some((i, j)) = self.queue.pop_front() {
            if self.state.stopped() {
                self.queue.push_front((i, j));
                reporter().emit(self.name(), "stopping early");
                return;
            }
            let x = self.reverse[i as usize].clone();
            let y = self.reverse[j as usize].clone();
            for g in 0..self.parent.nr_generators() {
                let gen = self.parent.generator(g);
                if matches!(self.kind, CongKind::Left | CongKind::TwoSided) {
                    self.internal_add_pair(gen.product(&x), gen.product(&y));
                }
                if matches!(self.kind, CongKind::Right | CongKind::TwoSided) {
                    self.internal_add_pair(x.product(&gen), y.product(&gen));
                }
            }
            self.report_progress();
        }
        self.class_lookup = self.uf.normalise();
        self.next_class = self.uf.nr_blocks() as u32;
        self.found = FxHashSet::default();
        self.state.set_finished(true);
        reporter().emit(
            self.name(),
            &format!(
                "finished with {} elements in {} classes",
                self.reverse.len(),
                self.next_class
            ),
        );
    }

    fn run_for(&mut self, t: Duration) {
        self.state.set_deadline_in(t);
        self.run();
        self.state.clear_deadline();
    }

    fn finished(&self) -> bool {
        self.state.finished()
    }

    fn dead(&self) -> bool {
        self.state.dead()
    }

    fn kill(&self) {
        self.state.kill();
    }

    fn kill_handle(&self) -> Arc<AtomicBool> {
        self.state.kill_handle()
    }

    fn release_buffers(&mut self) {
        self.found = FxHashSet::default();
        self.queue = VecDeque::new();
        self.ntc = None;
    }

    fn nr_classes(&mut self) -> Result<ClassCount, CongError> {
        self.run_checked()?;
        // untouched elements stay in singleton classes
        Ok(ClassCount::Finite(
            self.parent.size() - self.class_lookup.len() + self.next_class as usize,
        ))
    }

    fn word_to_class_index(&mut self, w: &Word) -> Result<usize, CongError> {
        validate_word(w, self.parent.nr_generators())?;
        self.run_checked()?;
        let x = self.parent.word_to_element(w);
        let i = self.get_index(x);
        Ok(self.class_lookup[i as usize] as usize)
    }

    fn const_word_to_class_index(&self, w: &Word) -> Result<usize, CongError> {
        if !self.state.finished() {
            return Err(CongError::NotFinished);
        }
        validate_word(w, self.parent.nr_generators())?;
        let x = self.parent.word_to_element(w);
        match self.index_of.get(&x) {
            Some(&i) => Ok(self.class_lookup[i as usize] as usize),
            None => Err(CongError::NotFinished),
        }
    }

    fn class_index_to_word(&mut self, _index: usize) -> Result<Word, CongError> {
        Err(CongError::NotImplemented("class_index_to_word for pair-closure"))
    }

    fn contains(&mut self, u: &Word, v: &Word) -> Result<bool, CongError> {
        validate_word(u, self.parent.nr_generators())?;
        validate_word(v, self.parent.nr_generators())?;
        self.run_checked()?;
        let x = self.parent.word_to_element(u);
        let y = self.parent.word_to_element(v);
        if x == y {
            return Ok(true);
        }
        let i = self.get_index(x);
        let j = self.get_index(y);
        Ok(self.class_lookup[i as usize] == self.class_lookup[j as usize])
    }

    fn const_contains(&self, u: &Word, v: &Word) -> Trivalent {
        let n = self.parent.nr_generators();
        if validate_word(u, n).is_err() || validate_word(v, n).is_err() {
            return Trivalent::Unknown;
        }
        let x = self.parent.word_to_element(u);
        let y = self.parent.word_to_element(v);
        if x == y {
            return Trivalent::True;
        }
        if !self.state.finished() {
            return Trivalent::Unknown;
        }
        match (self.index_of.get(&x), self.index_of.get(&y)) {
            (Some(&i), Some(&j)) => {
                if self.class_lookup[i as usize] == self.class_lookup[j as usize] {
                    Trivalent::True
                } else {
                    Trivalent::False
                }
            }
            // distinct elements, at least one never touched by the
            // closure: distinct singleton classes
            _ => Trivalent::False,
        }
    }

    fn non_trivial_classes(&mut self) -> Result<&[Vec<Word>], CongError> {
        if self.ntc.is_none() {
            self.run_checked()?;
            let mut classes: Vec<Vec<Word>> = vec![Vec::new(); self.next_class as usize];
            for i in 0..self.reverse.len() {
                let w = self.parent.factorisation(&self.reverse[i]);
                classes[self.class_lookup[i] as usize].push(w);
            }
            classes.retain(|c| c.len() > 1);
            self.ntc = Some(classes);
        }
        match &self.ntc {
            Some(classes) => Ok(classes),
            None => Err(CongError::NotFinished),
        }
    }

    fn is_quotient_obviously_infinite(&self) -> bool {
        false
    }

    fn quotient(&mut self) -> Result<QuotientSemigroup, CongError> {
        Err(CongError::NotImplemented("quotient for pair-closure"))
    }
}

/// An element of the quotient decided by a confluent rewrite system:
/// its shortlex normal form, plus a shared handle to the rules so that
/// products can be normalised.
#[derive(Debug, Clone)]
pub struct KbElement {
    nf: Word,
    rules: Arc<RuleSet>,
}

impl PartialEq for KbElement {
    fn eq(&self, other: &Self) -> bool {
        self.nf == other.nf
    }
}

impl Eq for KbElement {}

impl Hash for KbElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.nf.hash(state);
    }
}

impl SemigroupElement for KbElement {
    fn product(&self, other: &Self) -> Self {
        let mut w = self.nf.clone();
        w.extend(other.nf.iter().copied());
        KbElement {
            nf: self.rules.rewrite(&w),
            rules: Arc::clone(&self.rules),
        }
    }
}

/// The parent semigroup of normal forms of a confluent system.
pub struct KbSemigroup {
    rules: Arc<RuleSet>,
    size: OnceLock<usize>,
}

impl KbSemigroup {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self {
            rules,
            size: OnceLock::new(),
        }
    }
}

impl ParentSemigroup for KbSemigroup {
    type Elt = KbElement;

    fn nr_generators(&self) -> usize {
        self.rules.nr_generators()
    }

    fn generator(&self, i: usize) -> KbElement {
        let w = Word::from_slice(&[i as u32]);
        KbElement {
            nf: self.rules.rewrite(&w),
            rules: Arc::clone(&self.rules),
        }
    }

    fn word_to_element(&self, w: &Word) -> KbElement {
        KbElement {
            nf: self.rules.rewrite(w),
            rules: Arc::clone(&self.rules),
        }
    }

    fn factorisation(&self, x: &KbElement) -> Word {
        x.nf.clone()
    }

    fn size(&self) -> usize {
        *self.size.get_or_init(|| {
            enumerate_normal_forms(&self.rules, || false)
                .map(|nfs| nfs.len())
                .unwrap_or(0)
        })
    }
}

/// The `KBP` engine: run Knuth-Bendix to confluence so that element
/// equality becomes decidable, then close the extra pairs over the
/// normal-form semigroup. This is how one-sided congruences of a
/// finitely presented semigroup are enumerated without a coset table.
pub struct KbPairCongruence {
    state: RunnerState,
    kind: CongKind,
    kb: KnuthBendix,
    pairs: Vec<(Word, Word)>,
    inner: Option<PairCongruence<KbSemigroup>>,
}

impl KbPairCongruence {
    /// `kb` carries the defining relations of the semigroup; the
    /// congruence's extra pairs are added with `add_pair`.
    pub fn new(kind: CongKind, mut kb: KnuthBendix) -> Self {
        let state = RunnerState::new();
        kb.share_kill(state.kill_handle());
        Self {
            state,
            kind,
            kb,
            pairs: Vec::new(),
            inner: None,
        }
    }

    fn advance(&mut self, until: Option<Instant>) {
        if self.state.finished() || self.state.stopped() {
            return;
        }
        self.state.set_started();
        match until {
            Some(d) => {
                let rem = d.saturating_duration_since(Instant::now());
                if rem.is_zero() {
                    return;
                }
                self.kb.run_for(rem);
            }
            None => self.kb.run(),
        }
        if !self.kb.finished() {
            return;
        }
        if self.inner.is_none() {
            let rules = Arc::new(self.kb.rule_set().clone());
            let parent = Arc::new(KbSemigroup::new(rules));
            let mut p = PairCongruence::new(self.kind, parent);
            p.runner_mut().share_kill(self.state.kill_handle());
            for (u, v) in &self.pairs {
                p.add_pair_unchecked(u, v);
            }
            p.runner_mut().set_started();
            self.inner = Some(p);
        }
        if let Some(p) = &mut self.inner {
            match until {
                Some(d) => {
                    let rem = d.saturating_duration_since(Instant::now());
                    if rem.is_zero() {
                        return;
                    }
                    p.run_for(rem);
                }
                None => p.run(),
            }
            if p.finished() {
                self.state.set_finished(true);
            }
        }
    }

    fn inner_mut(&mut self) -> Result<&mut PairCongruence<KbSemigroup>, CongError> {
        match &mut self.inner {
            Some(p) => Ok(p),
            None => Err(CongError::NotFinished),
        }
    }
}

impl CongruenceSolver for KbPairCongruence {
    fn name(&self) -> &'static str {
        "kb-pairs"
    }

    fn kind(&self) -> CongKind {
        self.kind
    }

    fn nr_generators(&self) -> usize {
        self.kb.nr_generators()
    }

    fn add_pair(&mut self, u: &Word, v: &Word) -> Result<(), CongError> {
        if self.state.started() {
            return Err(CongError::PrematureMutation);
        }
        validate_word(u, self.kb.nr_generators())?;
        validate_word(v, self.kb.nr_generators())?;
        self.pairs.push((u.clone(), v.clone()));
        Ok(())
    }

    fn run(&mut self) {
        self.advance(None);
    }

    fn run_for(&mut self, t: Duration) {
        match Instant::now().checked_add(t) {
            Some(deadline) => self.advance(Some(deadline)),
            None => self.advance(None),
        }
    }

    fn finished(&self) -> bool {
        self.state.finished()
    }

    fn dead(&self) -> bool {
        self.state.dead()
    }

    fn kill(&self) {
        self.state.kill();
    }

    fn kill_handle(&self) -> Arc<AtomicBool> {
        self.state.kill_handle()
    }

    fn release_buffers(&mut self) {
        self.kb.release_buffers();
        if let Some(p) = &mut self.inner {
            p.release_buffers();
        }
    }

    fn nr_classes(&mut self) -> Result<ClassCount, CongError> {
        if self.is_quotient_obviously_infinite() {
            return Ok(ClassCount::Infinite);
        }
        self.run_checked()?;
        self.inner_mut()?.nr_classes()
    }

    fn word_to_class_index(&mut self, w: &Word) -> Result<usize, CongError> {
        self.run_checked()?;
        self.inner_mut()?.word_to_class_index(w)
    }

    fn const_word_to_class_index(&self, w: &Word) -> Result<usize, CongError> {
        match &self.inner {
            Some(p) => p.const_word_to_class_index(w),
            None => Err(CongError::NotFinished),
        }
    }

    fn class_index_to_word(&mut self, _index: usize) -> Result<Word, CongError> {
        Err(CongError::NotImplemented("class_index_to_word for pair-closure"))
    }

    fn const_contains(&self, u: &Word, v: &Word) -> Trivalent {
        match &self.inner {
            Some(p) => p.const_contains(u, v),
            // sound even before confluence
            None => self.kb.const_contains(u, v),
        }
    }

    fn non_trivial_classes(&mut self) -> Result<&[Vec<Word>], CongError> {
        self.run_checked()?;
        self.inner_mut()?.non_trivial_classes()
    }

    fn is_quotient_obviously_infinite(&self) -> bool {
        self.kb.is_quotient_obviously_infinite()
    }

    fn quotient(&mut self) -> Result<QuotientSemigroup, CongError> {
        Err(CongError::NotImplemented("quotient for pair-closure"))
    }
}

#[cfg(test)]
#[path = "tests/pair.rs"]
mod tests;
