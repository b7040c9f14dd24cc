//! Todd-Coxeter coset enumeration.
//!
//! The engine maintains a partial action table on coset indices and
//! grows it HLT-style: for each live coset, every relation is traced
//! through the table, defining fresh cosets at undefined edges and
//! queueing a coincidence whenever the two sides of a relation reach
//! distinct defined targets. Coincidences are processed by merging the
//! larger coset into the smaller through a union-find, unioning their
//! rows column-wise and queueing any conflicting successors. The
//! enumeration terminates, for finite quotients, when every (coset,
//! relation) pair verifies without producing a new definition and the
//! coincidence queue is empty.
//!
//! Coset 0 is the trace origin (the empty word) and is never merged
//! away; congruence class `i` corresponds to coset `i + 1` once the
//! table has been compressed.

use crate::cong::{ClassCount, CongKind, CongruenceSolver};
use crate::error::CongError;
use crate::quotient::QuotientSemigroup;
use crate::reporter::reporter;
use crate::runner::RunnerState;
use crate::trace::trace;
use crate::uf::UnionFind;
use crate::word::{reversed, validate_word, Letter, Relation, Word};
use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// Sentinel for an undefined table entry.
pub const UNDEFINED: u32 = u32::MAX;

/// Capacity of the preferred-definition queue; overflow drops oldest.
const PREF_DEFS_CAP: usize = 256;

const DEFAULT_PACK: usize = 120_000;
const DEFAULT_LOOKAHEAD: u64 = 5_000_000;

/// A rectangular `rows x nr_cols` map from (coset, column) to
/// coset-or-[`UNDEFINED`], stored flat.
#[derive(Debug, Clone)]
pub struct CosetTable {
    nr_cols: usize,
    data: Vec<u32>,
}

impl CosetTable {
    pub fn new(nr_cols: usize) -> Self {
        Self {
            nr_cols,
            data: Vec::new(),
        }
    }

    pub fn nr_cols(&self) -> usize {
        self.nr_cols
    }

    pub fn nr_rows(&self) -> usize {
        self.data.len() / self.nr_cols.max(1)
    }

    pub fn add_row(&mut self) -> usize {
        let row = self.nr_rows();
        self.data.resize(self.data.len() + self.nr_cols, UNDEFINED);
        row
    }

    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.data[row * self.nr_cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u32) {
        self.data[row * self.nr_cols + col] = value;
    }

    /// True when every entry of every row is defined and points inside
    /// `[1, nr_rows)`; the shape a prefilled Cayley-graph table has.
    fn is_complete(&self) -> bool {
        let rows = self.nr_rows() as u32;
        self.data.iter().all(|&d| d != UNDEFINED && d >= 1 && d < rows)
    }
}

/// HLT coset enumeration with coincidence queueing, optional lookahead,
/// and periodic packing.
pub struct ToddCoxeter {
    state: RunnerState,
    kind: CongKind,
    nr_gens: usize,
    with_inverses: bool,
    /// Traced at every coset. For `Left` congruences every stored word
    /// is reversed; for a two-sided congruence of an fp semigroup the
    /// extra pairs live here too.
    relations: Vec<(Word, Word)>,
    /// Traced at coset 0 only.
    extra: Vec<(Word, Word)>,
    table: CosetTable,
    /// Opposite-side Cayley table, present for a two-sided congruence
    /// over a prefilled table: a coincidence `a = b` then also forces
    /// `g.a = g.b` for every generator.
    opposite: Option<CosetTable>,
    uf: UnionFind,
    active: Vec<bool>,
    nr_active: usize,
    coinc: VecDeque<(u32, u32)>,
    pref_defs: VecDeque<(u32, u32)>,
    nr_defs: u64,
    pack_threshold: usize,
    lookahead_next: u64,
    prefilled: bool,
    init_done: bool,
    /// Next coset the HLT loop will trace relations from.
    current: u32,
    class_words: Option<Vec<Word>>,
    ntc: Option<Vec<Vec<Word>>>,
    /// Factorisations of every parent element, when the congruence was
    /// constructed over a concrete parent. Needed for the non-trivial
    /// class decomposition.
    parent_words: Option<Vec<Word>>,
}

impl ToddCoxeter {
    pub fn new(kind: CongKind, nr_gens: usize) -> Self {
        let mut table = CosetTable::new(nr_gens);
        table.add_row();
        Self {
            state: RunnerState::new(),
            kind,
            nr_gens,
            with_inverses: false,
            relations: Vec::new(),
            extra: Vec::new(),
            table,
            opposite: None,
            uf: UnionFind::new(1),
            active: vec![true],
            nr_active: 1,
            coinc: VecDeque::new(),
            pref_defs: VecDeque::new(),
            nr_defs: 0,
            pack_threshold: DEFAULT_PACK,
            lookahead_next: DEFAULT_LOOKAHEAD,
            prefilled: false,
            init_done: false,
            current: 0,
            class_words: None,
            ntc: None,
            parent_words: None,
        }
    }

    /// Construct with defining relations and extra pairs in one go.
    pub fn with_relations(
        kind: CongKind,
        nr_gens: usize,
        relations: &[(Word, Word)],
        extra: &[(Word, Word)],
    ) -> Result<Self, CongError> {
        let mut tc = Self::new(kind, nr_gens);
        for (u, v) in relations {
            tc.add_relation(u, v)?;
        }
        for (u, v) in extra {
            tc.add_pair(u, v)?;
        }
        Ok(tc)
    }

    /// A defining relation of the underlying semigroup, traced at every
    /// coset.
    pub fn add_relation(&mut self, u: &Word, v: &Word) -> Result<(), CongError> {
        if self.state.started() {
            return Err(CongError::PrematureMutation);
        }
        let rel = Relation::new(u.clone(), v.clone(), self.nr_gens)?;
        self.relations.push(self.oriented(&rel.lhs, &rel.rhs));
        Ok(())
    }

    fn oriented(&self, u: &Word, v: &Word) -> (Word, Word) {
        if self.kind.reverses_words() {
            (reversed(u), reversed(v))
        } else {
            (u.clone(), v.clone())
        }
    }

    /// Declare that the table should carry formal-inverse columns
    /// `[n, 2n)` maintaining `table[d][inv(g)] = c` whenever
    /// `table[c][g] = d`. Only meaningful for group-theoretic
    /// presentations.
    pub fn set_inverses(&mut self) -> Result<(), CongError> {
        if self.state.started() || self.prefilled {
            return Err(CongError::PrematureMutation);
        }
        self.with_inverses = true;
        let mut table = CosetTable::new(2 * self.nr_gens);
        table.add_row();
        self.table = table;
        Ok(())
    }

    /// Pack when more than this many cosets are dead.
    pub fn set_pack(&mut self, threshold: usize) {
        self.pack_threshold = threshold.max(1);
    }

    /// Run a lookahead pass once this many definitions have been made.
    pub fn set_lookahead_next(&mut self, nr_defs: u64) {
        self.lookahead_next = nr_defs.max(1);
    }

    /// Install a fully defined Cayley-graph table and skip coset
    /// discovery. Row 0 maps each generator to its coset; rows `i + 1`
    /// are the Cayley rows of the parent elements.
    pub fn prefill(&mut self, table: CosetTable) -> Result<(), CongError> {
        if self.kind == CongKind::TwoSided {
            return Err(CongError::PrematureMutation);
        }
        self.install_prefill(table, None)
    }

    /// Prefill a two-sided congruence: `action` is the table merged
    /// during enumeration, `opposite` the other-side Cayley graph used
    /// to keep the congruence closed under both multiplications.
    pub fn prefill_both(
        &mut self,
        action: CosetTable,
        opposite: CosetTable,
    ) -> Result<(), CongError> {
        if self.kind != CongKind::TwoSided {
            return Err(CongError::PrematureMutation);
        }
        self.install_prefill(action, Some(opposite))
    }

    fn install_prefill(
        &mut self,
        table: CosetTable,
        opposite: Option<CosetTable>,
    ) -> Result<(), CongError> {
        if self.state.started() || self.with_inverses || !self.relations.is_empty() {
            return Err(CongError::PrematureMutation);
        }
        if table.nr_cols() != self.nr_gens || table.nr_rows() < 2 || !table.is_complete() {
            return Err(CongError::BadAlphabet(
                "prefill table does not match the alphabet".to_string(),
            ));
        }
        if let Some(op) = &opposite {
            if op.nr_cols() != table.nr_cols() || op.nr_rows() != table.nr_rows() {
                return Err(CongError::BadAlphabet(
                    "opposite table does not match the action table".to_string(),
                ));
            }
        }
        let rows = table.nr_rows();
        self.table = table;
        self.opposite = opposite;
        self.uf = UnionFind::new(rows);
        self.active = vec![true; rows];
        self.nr_active = rows;
        self.prefilled = true;
        Ok(())
    }

    /// Factorisations of the parent's elements, for the non-trivial
    /// class decomposition of a congruence over a concrete parent.
    pub fn set_parent_words(&mut self, words: Vec<Word>) {
        self.parent_words = Some(words);
    }

    pub fn nr_cosets(&self) -> usize {
        self.nr_active
    }

    fn nr_dead(&self) -> usize {
        self.table.nr_rows() - self.nr_active
    }

    /// Canonical target of the edge `(c, col)`, or [`UNDEFINED`].
    fn entry(&mut self, c: u32, col: usize) -> u32 {
        let c = self.uf.find(c);
        let d = self.table.get(c as usize, col);
        if d == UNDEFINED {
            UNDEFINED
        } else {
            self.uf.find(d)
        }
    }

    fn new_coset(&mut self) -> u32 {
        let idx = self.table.add_row() as u32;
        self.uf.add_entry();
        self.active.push(true);
        self.nr_active += 1;
        idx
    }

    fn set_edge(&mut self, c: u32, col: usize, d: u32) {
        self.table.set(c as usize, col, d);
        self.nr_defs += 1;
        if self.with_inverses && col < 2 * self.nr_gens {
            let inv_col = if col < self.nr_gens {
                col + self.nr_gens
            } else {
                col - self.nr_gens
            };
            let back = self.table.get(d as usize, inv_col);
            if back == UNDEFINED {
                self.table.set(d as usize, inv_col, c);
            } else if self.uf.find(back) != self.uf.find(c) {
                self.coinc.push_back((back, c));
            }
        }
    }

    fn push_pref_def(&mut self, c: u32, col: usize) {
        if self.pref_defs.len() == PREF_DEFS_CAP {
            self.pref_defs.pop_front();
        }
        self.pref_defs.push_back((c, col as u32));
    }

    /// Follow the edge `(c, col)`, materialising queued preferred
    /// definitions first whenever a fresh coset slot is needed.
    fn step_define(&mut self, c: u32, col: usize) -> u32 {
        let e = self.entry(c, col);
        if e != UNDEFINED {
            return e;
        }
        while let Some((pc, pg)) = self.pref_defs.pop_front() {
            let pc = self.uf.find(pc);
            if !self.active[pc as usize] || self.table.get(pc as usize, pg as usize) != UNDEFINED {
                continue;
            }
            let d = self.new_coset();
            self.set_edge(pc, pg as usize, d);
            let e = self.entry(c, col);
            if e != UNDEFINED {
                return e;
            }
        }
        let c = self.uf.find(c);
        let d = self.new_coset();
        self.set_edge(c, col, d);
        d
    }

    /// Trace the relation `u = v` from coset `c`, defining fresh cosets
    /// along the way and queueing a coincidence when the two sides reach
    /// defined but distinct targets.
    fn scan(&mut self, c: u32, u: &Word, v: &Word) {
        let mut a = c;
        for &x in &u[..u.len() - 1] {
            a = self.step_define(a, x as usize);
        }
        let mut b = c;
        for &x in &v[..v.len() - 1] {
            b = self.step_define(b, x as usize);
        }
        let ul = u[u.len() - 1] as usize;
        let vl = v[v.len() - 1] as usize;
        let ta = self.entry(a, ul);
        let tb = self.entry(b, vl);
        match (ta, tb) {
            (UNDEFINED, UNDEFINED) => {
                let a = self.uf.find(a);
                let b = self.uf.find(b);
                let d = self.new_coset();
                self.set_edge(a, ul, d);
                if (a, ul) != (b, vl) {
                    self.set_edge(b, vl, d);
                }
            }
            (UNDEFINED, tb) => {
                let a = self.uf.find(a);
                self.set_edge(a, ul, tb);
            }
            (ta, UNDEFINED) => {
                let b = self.uf.find(b);
                self.set_edge(b, vl, ta);
            }
            (ta, tb) => {
                if ta != tb {
                    self.coinc.push_back((ta, tb));
                }
            }
        }
    }

    /// Trace one side without defining anything; an undefined edge is
    /// recorded as a preferred definition and aborts the walk.
    fn trace_no_define(&mut self, c: u32, w: &Word) -> Option<u32> {
        let mut cur = c;
        for &x in w {
            let next = self.entry(cur, x as usize);
            if next == UNDEFINED {
                let root = self.uf.find(cur);
                self.push_pref_def(root, x as usize);
                return None;
            }
            cur = next;
        }
        Some(cur)
    }

    fn process_coincidences(&mut self) {
        while !self.coinc.is_empty() {
            if self.state.stopped() {
                return;
            }
            let (x, y) = match self.coinc.pop_front() {
                Some(p) => p,
                None => return,
            };
            let a = self.uf.find(x);
            let b = self.uf.find(y);
            if a == b {
                continue;
            }
            let (keep, kill) = if a < b { (a, b) } else { (b, a) };
            self.uf.unite(keep, kill);
            self.active[kill as usize] = false;
            self.nr_active -= 1;
            for col in 0..self.table.nr_cols() {
                let d = self.table.get(kill as usize, col);
                if d == UNDEFINED {
                    continue;
                }
                let e = self.table.get(keep as usize, col);
                if e == UNDEFINED {
                    self.table.set(keep as usize, col, d);
                } else {
                    let e = self.uf.find(e);
                    let d = self.uf.find(d);
                    if e != d {
                        self.coinc.push_back((e, d));
                    }
                }
            }
            if self.opposite.is_some() {
                for g in 0..self.nr_gens {
                    let (oa, ob) = match &self.opposite {
                        Some(op) => (op.get(keep as usize, g), op.get(kill as usize, g)),
                        None => break,
                    };
                    let oa = self.uf.find(oa);
                    let ob = self.uf.find(ob);
                    if oa != ob {
                        self.coinc.push_back((oa, ob));
                    }
                }
            }
        }
    }

    /// Compact live cosets into a contiguous range, repointing the
    /// queues, and reset the union-find.
    fn pack(&mut self) {
        let rows = self.table.nr_rows();
        let mut map = vec![UNDEFINED; rows];
        let mut next = 0u32;
        for c in 0..rows {
            if self.active[c] {
                map[c] = next;
                next += 1;
            }
        }
        let new_current = (0..self.current as usize).filter(|&c| self.active[c]).count() as u32;

        let mut new_table = CosetTable::new(self.table.nr_cols());
        for c in 0..rows {
            if !self.active[c] {
                continue;
            }
            let r = new_table.add_row();
            for col in 0..self.table.nr_cols() {
                let d = self.table.get(c, col);
                let d = if d == UNDEFINED {
                    UNDEFINED
                } else {
                    map[self.uf.find(d) as usize]
                };
                new_table.set(r, col, d);
            }
        }
        if let Some(op) = self.opposite.take() {
            let mut new_op = CosetTable::new(op.nr_cols());
            for c in 0..rows {
                if !self.active[c] {
                    continue;
                }
                let r = new_op.add_row();
                for col in 0..op.nr_cols() {
                    let d = op.get(c, col);
                    new_op.set(r, col, map[self.uf.find(d) as usize]);
                }
            }
            self.opposite = Some(new_op);
        }

        let coinc = std::mem::take(&mut self.coinc);
        self.coinc = coinc
            .into_iter()
            .map(|(a, b)| {
                (
                    map[self.uf.find(a) as usize],
                    map[self.uf.find(b) as usize],
                )
            })
            .filter(|&(a, b)| a != b)
            .collect();
        let prefs = std::mem::take(&mut self.pref_defs);
        self.pref_defs = prefs
            .into_iter()
            .map(|(c, g)| (map[self.uf.find(c) as usize], g))
            .collect();

        self.table = new_table;
        self.uf = UnionFind::new(next as usize);
        self.active = vec![true; next as usize];
        self.nr_active = next as usize;
        self.current = new_current;
        self.class_words = None;
        trace!(live = self.nr_active, "packed coset table");
    }

    /// One pass over all live cosets and relations that deduces
    /// coincidences without defining new cosets.
    fn lookahead(&mut self) {
        for c in 0..self.table.nr_rows() as u32 {
            if self.state.stopped() {
                return;
            }
            if !self.active[c as usize] {
                continue;
            }
            for r in 0..self.relations.len() {
                let (u, v) = self.relations[r].clone();
                let (ta, tb) = (self.trace_no_define(c, &u), self.trace_no_define(c, &v));
                if let (Some(ta), Some(tb)) = (ta, tb) {
                    if ta != tb {
                        self.coinc.push_back((ta, tb));
                    }
                }
            }
        }
        self.process_coincidences();
    }

    fn init(&mut self) {
        if self.init_done {
            return;
        }
        self.init_done = true;
        let extra = self.extra.clone();
        for (u, v) in &extra {
            if self.state.stopped() {
                return;
            }
            self.scan(0, u, v);
            self.process_coincidences();
        }
    }

    fn finalise(&mut self) {
        self.process_coincidences();
        if self.state.stopped() {
            return;
        }
        self.pack();
        self.state.set_finished(true);
        reporter().emit(
            self.name(),
            &format!("finished with {} classes", self.nr_active.saturating_sub(1)),
        );
    }

    fn report_progress(&mut self) {
        if reporter().report() && self.state.report_due() {
            reporter().emit(
                self.name(),
                &format!(
                    "{} active cosets, {} defined, {} pending coincidences",
                    self.nr_active,
                    self.table.nr_rows(),
                    self.coinc.len()
                ),
            );
        }
    }

    /// Trace `w` through a finished, compressed table.
    fn trace_finished(&self, w: &Word) -> Option<u32> {
        let mut cur = 0u32;
        for &x in w {
            let next = self.table.get(cur as usize, x as usize);
            if next == UNDEFINED {
                return None;
            }
            cur = next;
        }
        Some(cur)
    }

    fn ensure_class_words(&mut self) {
        if self.class_words.is_some() {
            return;
        }
        // breadth-first search from coset 0; every live coset is
        // reachable once the table is closed
        let rows = self.table.nr_rows();
        let mut words: Vec<Option<Word>> = vec![None; rows];
        let mut queue = VecDeque::new();
        words[0] = Some(Word::new());
        queue.push_back(0u32);
        while let Some(c) = queue.pop_front() {
            for g in 0..self.nr_gens {
                let d = self.table.get(c as usize, g);
                if d == UNDEFINED || words[d as usize].is_some() {
                    continue;
                }
                let mut w = match &words[c as usize] {
                    Some(w) => w.clone(),
                    None => continue,
                };
                w.push(g as Letter);
                words[d as usize] = Some(w);
                queue.push_back(d);
            }
        }
        let reverse = self.kind.reverses_words();
        let mut out = Vec::with_capacity(rows.saturating_sub(1));
        for w in words.into_iter().skip(1) {
            let w = w.unwrap_or_default();
            out.push(if reverse { reversed(&w) } else { w });
        }
        self.class_words = Some(out);
    }

    fn index_of_traced(&self, w: &Word) -> Result<usize, CongError> {
        validate_word(w, self.nr_gens)?;
        let w = if self.kind.reverses_words() {
            reversed(w)
        } else {
            w.clone()
        };
        match self.trace_finished(&w) {
            // coset 0 is the empty word, classes start at coset 1
            Some(c) if c > 0 => Ok(c as usize - 1),
            _ => Err(CongError::NotFinished),
        }
    }
}

impl CongruenceSolver for ToddCoxeter {
    fn name(&self) -> &'static str {
        "todd-coxeter"
    }

    fn kind(&self) -> CongKind {
        self.kind
    }

    fn nr_generators(&self) -> usize {
        self.nr_gens
    }

    fn add_pair(&mut self, u: &Word, v: &Word) -> Result<(), CongError> {
        if self.state.started() {
            return Err(CongError::PrematureMutation);
        }
        validate_word(u, self.nr_gens)?;
        validate_word(v, self.nr_gens)?;
        let pair = self.oriented(u, v);
        if self.kind == CongKind::TwoSided && !self.prefilled {
            // extra pairs of a two-sided congruence hold at every coset:
            // they are relations of the quotient presentation
            self.relations.push(pair);
        } else {
            self.extra.push(pair);
        }
        Ok(())
    }

    fn run(&mut self) {
        if self.state.finished() || self.state.stopped() {
            return;
        }
        self.state.set_started();
        self.init();
        if self.prefilled {
            self.process_coincidences();
            if !self.state.stopped() {
                self.finalise();
            }
            return;
        }
        while (self.current as usize) < self.table.nr_rows() {
            if self.state.stopped() {
                reporter().emit(self.name(), "stopping early");
                return;
            }
            let c = self.current;
            if !self.active[c as usize] {
                self.current += 1;
                continue;
            }
            for r in 0..self.relations.len() {
                let (u, v) = self.relations[r].clone();
                self.scan(c, &u, &v);
                self.process_coincidences();
                if !self.active[c as usize] {
                    break;
                }
            }
            if self.active[c as usize] {
                // close the row so that every class is discovered
                for g in 0..self.nr_gens {
                    if self.entry(c, g) == UNDEFINED {
                        self.step_define(c, g);
                    }
                }
            }
            self.current += 1;
            if self.nr_dead() >= self.pack_threshold {
                self.pack();
            }
            if self.nr_defs >= self.lookahead_next {
                self.lookahead();
                self.lookahead_next = self.nr_defs + self.lookahead_next;
            }
            self.report_progress();
        }
        if !self.state.stopped() {
            self.finalise();
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
        self.coinc = VecDeque::new();
        self.pref_defs = VecDeque::new();
        self.class_words = None;
        self.ntc = None;
    }

    fn nr_classes(&mut self) -> Result<ClassCount, CongError> {
        if self.is_quotient_obviously_infinite() {
            return Ok(ClassCount::Infinite);
        }
        self.run_checked()?;
        Ok(ClassCount::Finite(self.nr_active - 1))
    }

    fn word_to_class_index(&mut self, w: &Word) -> Result<usize, CongError> {
        validate_word(w, self.nr_gens)?;
        self.run_checked()?;
        self.index_of_traced(w)
    }

    fn const_word_to_class_index(&self, w: &Word) -> Result<usize, CongError> {
        if !self.state.finished() {
            return Err(CongError::NotFinished);
        }
        self.index_of_traced(w)
    }

    fn class_index_to_word(&mut self, index: usize) -> Result<Word, CongError> {
        self.run_checked()?;
        self.ensure_class_words();
        match &self.class_words {
            Some(words) => Ok(words[index].clone()),
            None => Err(CongError::NotFinished),
        }
    }

    fn non_trivial_classes(&mut self) -> Result<&[Vec<Word>], CongError> {
        if self.ntc.is_none() {
            let parent_words = match &self.parent_words {
                Some(words) => words.clone(),
                None => {
                    return Err(CongError::NotImplemented(
                        "non-trivial classes without a parent semigroup",
                    ))
                }
            };
            self.run_checked()?;
            let mut classes: Vec<Vec<Word>> = vec![Vec::new(); self.nr_active - 1];
            for w in parent_words {
                let index = self.const_word_to_class_index(&w)?;
                classes[index].push(w);
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
        if self.prefilled {
            return false;
        }
        if self.nr_gens == 0 {
            return false;
        }
        // a generator that occurs in no relation and no extra pair
        // generates a free factor
        let mut seen = vec![false; self.nr_gens];
        for (u, v) in self.relations.iter().chain(self.extra.iter()) {
            for &x in u.iter().chain(v.iter()) {
                seen[x as usize] = true;
            }
        }
        seen.iter().any(|&s| !s)
    }

    fn quotient(&mut self) -> Result<QuotientSemigroup, CongError> {
        if self.kind != CongKind::TwoSided {
            return Err(CongError::NotImplemented(
                "quotient of a one-sided congruence",
            ));
        }
        if self.is_quotient_obviously_infinite() {
            return Err(CongError::QuotientInfinite);
        }
        self.run_checked()?;
        self.ensure_class_words();
        let nr_classes = self.nr_active - 1;
        let mut right = Vec::with_capacity(nr_classes * self.nr_gens);
        for c in 1..=nr_classes {
            for g in 0..self.nr_gens {
                right.push(self.table.get(c, g) - 1);
            }
        }
        let gen_classes = (0..self.nr_gens)
            .map(|g| self.table.get(0, g) - 1)
            .collect();
        let reps = match &self.class_words {
            Some(words) => words.clone(),
            None => return Err(CongError::NotFinished),
        };
        Ok(QuotientSemigroup::new(self.nr_gens, right, reps, gen_classes))
    }
}

#[cfg(test)]
impl ToddCoxeter {
    pub(crate) fn table_entry(&self, c: usize, col: usize) -> u32 {
        self.table.get(c, col)
    }

    pub(crate) fn nr_table_rows(&self) -> usize {
        self.table.nr_rows()
    }

    pub(crate) fn nr_table_cols(&self) -> usize {
        self.table.nr_cols()
    }

    pub(crate) fn is_coset_active(&self, c: usize) -> bool {
        self.active[c]
    }
}

#[cfg(test)]
#[path = "tests/tc.rs"]
mod tests;
