//! Knuth-Bendix completion over the free monoid.
//!
//! Relations are oriented into rewrite rules by the shortlex order and
//! completed by resolving overlaps: whenever two left-hand sides overlap
//! and the two reductions of the overlap word differ, the difference is
//! oriented and added as a new rule, after which every existing rule is
//! re-reduced against the enlarged system. An empty work queue means the
//! system is confluent and `u = v` holds in the quotient exactly when
//! the two words rewrite to the same normal form.
//!
//! A Knuth-Bendix instance always decides the two-sided congruence; one
//! sided congruences over a Knuth-Bendix parent go through the pair
//! closure in [`crate::pair`].

use crate::cong::{ClassCount, CongKind, CongruenceSolver, Trivalent};
use crate::error::CongError;
use crate::quotient::QuotientSemigroup;
use crate::reporter::reporter;
use crate::runner::RunnerState;
use crate::trace::trace;
use crate::word::{shortlex_cmp, validate_word, Letter, Relation, Word};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
struct Rule {
    lhs: Word,
    rhs: Word,
    active: bool,
}

/// An indexed set of rewrite rules with left-to-right reduction. The
/// completion machinery lives in [`KnuthBendix`]; this part is shared
/// with the Knuth-Bendix pair-closure parent, which keeps a confluent
/// `RuleSet` behind an `Arc` and rewrites with it from many elements.
#[derive(Debug, Clone)]
pub struct RuleSet {
    nr_gens: usize,
    rules: Vec<Rule>,
    nr_active: usize,
}

impl RuleSet {
    pub fn new(nr_gens: usize) -> Self {
        Self {
            nr_gens,
            rules: Vec::new(),
            nr_active: 0,
        }
    }

    pub fn nr_generators(&self) -> usize {
        self.nr_gens
    }

    pub fn nr_active(&self) -> usize {
        self.nr_active
    }

    fn len(&self) -> usize {
        self.rules.len()
    }

    fn is_active(&self, i: usize) -> bool {
        self.rules[i].active
    }

    fn lhs(&self, i: usize) -> &Word {
        &self.rules[i].lhs
    }

    fn rhs(&self, i: usize) -> &Word {
        &self.rules[i].rhs
    }

    fn push(&mut self, lhs: Word, rhs: Word) -> usize {
        debug_assert_eq!(shortlex_cmp(&lhs, &rhs), Ordering::Greater);
        self.rules.push(Rule {
            lhs,
            rhs,
            active: true,
        });
        self.nr_active += 1;
        self.rules.len() - 1
    }

    fn deactivate(&mut self, i: usize) {
        if self.rules[i].active {
            self.rules[i].active = false;
            self.nr_active -= 1;
        }
    }

    fn set_rhs(&mut self, i: usize, rhs: Word) {
        self.rules[i].rhs = rhs;
    }

    /// Active rules as `(lhs, rhs)` pairs.
    pub fn active_rules(&self) -> impl Iterator<Item = (&Word, &Word)> {
        self.rules
            .iter()
            .filter(|r| r.active)
            .map(|r| (&r.lhs, &r.rhs))
    }

    /// The longest active left-hand side that is a suffix of `w`.
    fn longest_suffix_rule(&self, w: &[Letter]) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, rule) in self.rules.iter().enumerate() {
            if !rule.active || rule.lhs.len() > w.len() {
                continue;
            }
            if w[w.len() - rule.lhs.len()..] == rule.lhs[..]
                && best.map_or(true, |b| rule.lhs.len() > self.rules[b].lhs.len())
            {
                best = Some(i);
            }
        }
        best
    }

    /// True when some active left-hand side is a suffix of `w`. For a
    /// word whose proper prefixes are already irreducible this decides
    /// reducibility outright.
    pub fn has_suffix_redex(&self, w: &[Letter]) -> bool {
        self.rules
            .iter()
            .any(|r| r.active && r.lhs.len() <= w.len() && w[w.len() - r.lhs.len()..] == r.lhs[..])
    }

    /// Reduce `w` left-to-right, applying the longest matching rule at
    /// each position. Unique up to confluence of the rule set.
    pub fn rewrite(&self, w: &Word) -> Word {
        let mut out = Word::new();
        let mut todo: Vec<Letter> = w.iter().rev().copied().collect();
        while let Some(a) = todo.pop() {
            out.push(a);
            if let Some(i) = self.longest_suffix_rule(&out) {
                let llen = self.rules[i].lhs.len();
                out.truncate(out.len() - llen);
                todo.extend(self.rules[i].rhs.iter().rev());
            }
        }
        out
    }

    pub fn is_irreducible(&self, w: &[Letter]) -> bool {
        (1..=w.len()).all(|end| !self.has_suffix_redex(&w[..end]))
    }
}

/// Lazily enumerates irreducible words in shortlex order, one length
/// level at a time. The set of irreducible words is prefix-closed, so
/// each level is obtained by extending the previous one by a letter.
#[derive(Debug, Clone, Default)]
struct NormalFormCache {
    list: Vec<Word>,
    index: FxHashMap<Word, usize>,
    level: Vec<Word>,
    started: bool,
    exhausted: bool,
}

impl NormalFormCache {
    /// Add the next length level. Returns false once the language is
    /// exhausted.
    fn advance(&mut self, rules: &RuleSet) -> bool {
        if self.exhausted {
            return false;
        }
        let next: Vec<Word> = if !self.started {
            self.started = true;
            (0..rules.nr_generators() as Letter)
                .map(|g| Word::from_slice(&[g]))
                .filter(|w| !rules.has_suffix_redex(w))
                .collect()
        } else {
            let mut next = Vec::new();
            for w in &self.level {
                for g in 0..rules.nr_generators() as Letter {
                    let mut child = w.clone();
                    child.push(g);
                    if !rules.has_suffix_redex(&child) {
                        next.push(child);
                    }
                }
            }
            next
        };
        if next.is_empty() {
            self.exhausted = true;
            return false;
        }
        for w in &next {
            self.index.insert(w.clone(), self.list.len());
            self.list.push(w.clone());
        }
        self.level = next;
        true
    }
}

/// Every irreducible word of a confluent system, in shortlex order.
/// Returns `None` when cancelled; diverges when the language is
/// infinite and `cancel` never fires.
pub fn enumerate_normal_forms(
    rules: &RuleSet,
    cancel: impl Fn() -> bool,
) -> Option<Vec<Word>> {
    let mut cache = NormalFormCache::default();
    while cache.advance(rules) {
        if cancel() {
            return None;
        }
    }
    Some(cache.list)
}

/// Knuth-Bendix completion, racing-compatible through the congruence
/// contract.
pub struct KnuthBendix {
    state: RunnerState,
    nr_gens: usize,
    rules: RuleSet,
    /// Unprocessed equations; consumed by `clear_stack`.
    pending: Vec<(Word, Word)>,
    /// The input presentation, kept for the obviously-infinite check.
    input: Vec<(Word, Word)>,
    cursor_i: usize,
    cursor_j: usize,
    nf: NormalFormCache,
}

impl KnuthBendix {
    pub fn new(nr_gens: usize) -> Self {
        Self {
            state: RunnerState::new(),
            nr_gens,
            rules: RuleSet::new(nr_gens),
            pending: Vec::new(),
            input: Vec::new(),
            cursor_i: 0,
            cursor_j: 0,
            nf: NormalFormCache::default(),
        }
    }

    pub fn with_relations(nr_gens: usize, relations: &[(Word, Word)]) -> Result<Self, CongError> {
        let mut kb = Self::new(nr_gens);
        for (u, v) in relations {
            kb.add_rule(u, v)?;
        }
        Ok(kb)
    }

    /// Relations and extra pairs are the same thing for a two-sided
    /// congruence; both become equations to orient.
    pub fn add_rule(&mut self, u: &Word, v: &Word) -> Result<(), CongError> {
        if self.state.started() {
            return Err(CongError::PrematureMutation);
        }
        let rel = Relation::new(u.clone(), v.clone(), self.nr_gens)?;
        self.input.push((rel.lhs.clone(), rel.rhs.clone()));
        self.pending.push((rel.lhs, rel.rhs));
        Ok(())
    }

    pub fn nr_rules(&self) -> usize {
        self.rules.nr_active()
    }

    pub(crate) fn share_kill(&mut self, flag: Arc<AtomicBool>) {
        self.state.share_kill(flag);
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rules
    }

    /// The normal form of `w` under the current rules. Canonical once
    /// the system is confluent.
    pub fn rewrite(&self, w: &Word) -> Word {
        self.rules.rewrite(w)
    }

    /// Reduce, orient and insert every pending equation, keeping all
    /// other rules reduced against the growing system.
    fn clear_stack(&mut self) {
        while let Some((u, v)) = self.pending.pop() {
            if self.state.stopped() {
                self.pending.push((u, v));
                return;
            }
            let u = self.rules.rewrite(&u);
            let v = self.rules.rewrite(&v);
            let (lhs, rhs) = match shortlex_cmp(&u, &v) {
                Ordering::Equal => continue,
                Ordering::Greater => (u, v),
                Ordering::Less => (v, u),
            };
            let new_idx = self.rules.push(lhs.clone(), rhs);
            trace!(rule = new_idx, "oriented a new rule");
            for t in 0..new_idx {
                if !self.rules.is_active(t) {
                    continue;
                }
                if contains_factor(self.rules.lhs(t), &lhs) {
                    let pair = (self.rules.lhs(t).clone(), self.rules.rhs(t).clone());
                    self.rules.deactivate(t);
                    self.pending.push(pair);
                } else {
                    let old = self.rules.rhs(t).clone();
                    let reduced = self.rules.rewrite(&old);
                    if reduced != old {
                        self.rules.set_rhs(t, reduced);
                    }
                }
            }
        }
    }

    /// Critical pairs from proper overlaps of `lhs(i)` suffixes with
    /// `lhs(j)` prefixes.
    fn overlap(&mut self, i: usize, j: usize) {
        let max = self.rules.lhs(i).len().min(self.rules.lhs(j).len());
        for k in 1..max {
            if !self.rules.is_active(i) || !self.rules.is_active(j) {
                return;
            }
            let li = self.rules.lhs(i);
            let lj = self.rules.lhs(j);
            if li[li.len() - k..] != lj[..k] {
                continue;
            }
            // overlap word: li + lj[k..]; reduce it both ways
            let mut w1 = self.rules.rhs(i).clone();
            w1.extend(lj[k..].iter().copied());
            let mut w2: Word = li[..li.len() - k].iter().copied().collect();
            w2.extend(self.rules.rhs(j).iter().copied());
            self.pending.push((w1, w2));
            self.clear_stack();
        }
    }

    /// True when every critical pair of the active rules resolves.
    pub fn is_confluent(&self) -> bool {
        for i in 0..self.rules.len() {
            if !self.rules.is_active(i) {
                continue;
            }
            for j in 0..self.rules.len() {
                if !self.rules.is_active(j) {
                    continue;
                }
                let li = self.rules.lhs(i);
                let lj = self.rules.lhs(j);
                for k in 1..li.len().min(lj.len()) {
                    if li[li.len() - k..] != lj[..k] {
                        continue;
                    }
                    let mut w1 = self.rules.rhs(i).clone();
                    w1.extend(lj[k..].iter().copied());
                    let mut w2: Word = li[..li.len() - k].iter().copied().collect();
                    w2.extend(self.rules.rhs(j).iter().copied());
                    if self.rules.rewrite(&w1) != self.rules.rewrite(&w2) {
                        return false;
                    }
                }
            }
        }
        true
    }

    fn report_progress(&mut self) {
        if reporter().report() && self.state.report_due() {
            reporter().emit(
                self.name(),
                &format!(
                    "{} active rules, {} pending equations",
                    self.rules.nr_active(),
                    self.pending.len()
                ),
            );
        }
    }

    /// Class index of an irreducible word, extending the shortlex
    /// enumeration as far as needed. Terminates for every irreducible
    /// word, even over an infinite quotient.
    fn index_of_normal_form(&mut self, nf: &Word) -> Result<usize, CongError> {
        loop {
            if let Some(&i) = self.nf.index.get(nf) {
                return Ok(i);
            }
            if self.state.dead() {
                return Err(CongError::Cancelled);
            }
            if !self.nf.advance(&self.rules) {
                // exhausted without finding an irreducible word: the
                // word was not over this alphabet after all
                return Err(CongError::NotFinished);
            }
        }
    }
}

fn contains_factor(haystack: &Word, needle: &Word) -> bool {
    needle.len() <= haystack.len()
        && haystack
            .windows(needle.len())
            .any(|w| w == &needle[..])
}

impl CongruenceSolver for KnuthBendix {
    fn name(&self) -> &'static str {
        "knuth-bendix"
    }

    fn kind(&self) -> CongKind {
        CongKind::TwoSided
    }

    fn nr_generators(&self) -> usize {
        self.nr_gens
    }

    fn add_pair(&mut self, u: &Word, v: &Word) -> Result<(), CongError> {
        self.add_rule(u, v)
    }

    fn run(&mut self) {
        if self.state.finished() || self.state.stopped() {
            return;
        }
        self.state.set_started();
        self.clear_stack();
        if self.state.stopped() {
            return;
        }
        while self.cursor_i < self.rules.len() {
            if self.state.stopped() {
                reporter().emit(self.name(), "stopping early");
                return;
            }
            let i = self.cursor_i;
            if self.rules.is_active(i) {
                while self.cursor_j <= i {
                    if self.state.stopped() {
                        return;
                    }
                    let j = self.cursor_j;
                    if self.rules.is_active(j) {
                        self.overlap(i, j);
                        if i != j && self.rules.is_active(i) && self.rules.is_active(j) {
                            self.overlap(j, i);
                        }
                        if !self.rules.is_active(i) {
                            break;
                        }
                    }
                    self.cursor_j += 1;
                }
            }
            self.cursor_i += 1;
            self.cursor_j = 0;
            self.report_progress();
        }
        if !self.state.stopped() {
            self.state.set_finished(true);
            reporter().emit(
                self.name(),
                &format!("confluent with {} rules", self.rules.nr_active()),
            );
        }
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
        self.pending = Vec::new();
        self.nf = NormalFormCache::default();
    }

    fn nr_classes(&mut self) -> Result<ClassCount, CongError> {
        if self.is_quotient_obviously_infinite() {
            return Ok(ClassCount::Infinite);
        }
        self.run_checked()?;
        while self.nf.advance(&self.rules) {
            if self.state.dead() {
                return Err(CongError::Cancelled);
            }
        }
        Ok(ClassCount::Finite(self.nf.list.len()))
    }

    fn word_to_class_index(&mut self, w: &Word) -> Result<usize, CongError> {
        validate_word(w, self.nr_gens)?;
        self.run_checked()?;
        let nf = self.rules.rewrite(w);
        self.index_of_normal_form(&nf)
    }

    fn const_word_to_class_index(&self, w: &Word) -> Result<usize, CongError> {
        if !self.state.finished() {
            return Err(CongError::NotFinished);
        }
        validate_word(w, self.nr_gens)?;
        let nf = self.rules.rewrite(w);
        match self.nf.index.get(&nf) {
            Some(&i) => Ok(i),
            None => Err(CongError::NotFinished),
        }
    }

    fn class_index_to_word(&mut self, index: usize) -> Result<Word, CongError> {
        self.run_checked()?;
        while self.nf.list.len() <= index {
            if self.state.dead() {
                return Err(CongError::Cancelled);
            }
            if !self.nf.advance(&self.rules) {
                return Err(CongError::QuotientInfinite);
            }
        }
        Ok(self.nf.list[index].clone())
    }

    fn contains(&mut self, u: &Word, v: &Word) -> Result<bool, CongError> {
        validate_word(u, self.nr_gens)?;
        validate_word(v, self.nr_gens)?;
        self.run_checked()?;
        Ok(self.rules.rewrite(u) == self.rules.rewrite(v))
    }

    fn const_contains(&self, u: &Word, v: &Word) -> Trivalent {
        // every current rule is a consequence of the input, so equal
        // rewrites are conclusive even before confluence
        if u == v || self.rules.rewrite(u) == self.rules.rewrite(v) {
            Trivalent::True
        } else if self.state.finished() {
            Trivalent::False
        } else {
            Trivalent::Unknown
        }
    }

    fn less(&mut self, u: &Word, v: &Word) -> Result<bool, CongError> {
        self.run_checked()?;
        Ok(shortlex_cmp(&self.rules.rewrite(u), &self.rules.rewrite(v)) == Ordering::Less)
    }

    fn non_trivial_classes(&mut self) -> Result<&[Vec<Word>], CongError> {
        Err(CongError::NotImplemented(
            "non-trivial classes of a Knuth-Bendix congruence",
        ))
    }

    fn is_quotient_obviously_infinite(&self) -> bool {
        if self.nr_gens == 0 {
            return false;
        }
        let mut seen = vec![false; self.nr_gens];
        if self.state.finished() {
            // a letter on no left-hand side heads an infinite family of
            // irreducible words
            for (lhs, _) in self.rules.active_rules() {
                for &x in lhs.iter() {
                    seen[x as usize] = true;
                }
            }
        } else {
            for (u, v) in &self.input {
                for &x in u.iter().chain(v.iter()) {
                    seen[x as usize] = true;
                }
            }
        }
        seen.iter().any(|&s| !s)
    }

    fn quotient(&mut self) -> Result<QuotientSemigroup, CongError> {
        let n = match self.nr_classes()? {
            ClassCount::Finite(n) => n,
            ClassCount::Infinite => return Err(CongError::QuotientInfinite),
        };
        let mut right = Vec::with_capacity(n * self.nr_gens);
        for i in 0..n {
            for g in 0..self.nr_gens as Letter {
                let mut w = self.nf.list[i].clone();
                w.push(g);
                let nf = self.rules.rewrite(&w);
                right.push(self.index_of_normal_form(&nf)? as u32);
            }
        }
        let mut gen_classes = Vec::with_capacity(self.nr_gens);
        for g in 0..self.nr_gens as Letter {
            let nf = self.rules.rewrite(&Word::from_slice(&[g]));
            gen_classes.push(self.index_of_normal_form(&nf)? as u32);
        }
        let reps = self.nf.list[..n].to_vec();
        Ok(QuotientSemigroup::new(self.nr_gens, right, reps, gen_classes))
    }
}

#[cfg(test)]
#[path = "tests/kb.rs"]
mod tests;
