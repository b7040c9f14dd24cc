//! Concrete parent semigroups.
//!
//! The pair-closure engine and the Todd-Coxeter prefill path both need a
//! parent semigroup to act on. The [`ParentSemigroup`] capability is the
//! only thing the core consumes; [`FroidurePin`] provides it for any
//! element type with a product, equality and a hash, by exhaustively
//! enumerating the semigroup generated by a set of elements together
//! with its Cayley graphs and factorisations.

use crate::error::CongError;
use crate::tc::{CosetTable, UNDEFINED};
use crate::word::{Letter, Word};
use hashbrown::HashMap;
use std::hash::Hash;

/// An element of a concrete semigroup: a value with an associative
/// product, structural equality and a hash.
pub trait SemigroupElement: Clone + Eq + Hash + Send + Sync {
    fn product(&self, other: &Self) -> Self;
}

/// What the congruence engines require of a concrete parent.
///
/// `factorisation` must be called only with elements of the parent
/// (anything produced by `generator`, `word_to_element`, or products
/// thereof); for foreign elements it returns an empty word.
pub trait ParentSemigroup: Send + Sync {
    type Elt: SemigroupElement;

    fn nr_generators(&self) -> usize;

    fn generator(&self, i: usize) -> Self::Elt;

    fn word_to_element(&self, w: &Word) -> Self::Elt;

    /// A word over the generators whose product is `x`.
    fn factorisation(&self, x: &Self::Elt) -> Word;

    /// The order of the parent. May enumerate, and therefore may not
    /// terminate for an infinite parent.
    fn size(&self) -> usize;
}

/// A fully enumerated concrete semigroup.
///
/// Enumeration happens at construction and terminates exactly when the
/// generated semigroup is finite: elements are produced in breadth-first
/// order (generators first, then products by generators on the right),
/// which also yields a factorisation and both Cayley graphs.
pub struct FroidurePin<T: SemigroupElement> {
    gens: Vec<T>,
    elements: Vec<T>,
    index_of: HashMap<T, usize>,
    /// `(prefix element, last letter)` per element; generators have no
    /// prefix.
    factor: Vec<(u32, u32)>,
    right: Vec<u32>,
    left: Vec<u32>,
}

impl<T: SemigroupElement> FroidurePin<T> {
    pub fn new(gens: Vec<T>) -> Result<Self, CongError> {
        if gens.is_empty() {
            return Err(CongError::BadAlphabet("no generators".to_string()));
        }
        let n = gens.len();
        let mut s = Self {
            gens,
            elements: Vec::new(),
            index_of: HashMap::new(),
            factor: Vec::new(),
            right: Vec::new(),
            left: Vec::new(),
        };
        for i in 0..n {
            let g = s.gens[i].clone();
            if !s.index_of.contains_key(&g) {
                s.intern(g, (UNDEFINED, i as u32));
            }
        }
        let mut x = 0;
        while x < s.elements.len() {
            for g in 0..n {
                let p = s.elements[x].product(&s.gens[g]);
                let idx = match s.index_of.get(&p).copied() {
                    Some(idx) => idx,
                    None => s.intern(p, (x as u32, g as u32)),
                };
                s.right.push(idx as u32);
            }
            x += 1;
        }
        for x in 0..s.elements.len() {
            for g in 0..n {
                let p = s.gens[g].product(&s.elements[x]);
                s.left.push(s.index_of[&p] as u32);
            }
        }
        Ok(s)
    }

    fn intern(&mut self, x: T, factor: (u32, u32)) -> usize {
        let idx = self.elements.len();
        self.index_of.insert(x.clone(), idx);
        self.elements.push(x);
        self.factor.push(factor);
        idx
    }

    pub fn element_index(&self, x: &T) -> Option<usize> {
        self.index_of.get(x).copied()
    }

    pub fn element(&self, x: usize) -> &T {
        &self.elements[x]
    }

    pub fn generator_index(&self, g: Letter) -> usize {
        self.index_of[&self.gens[g as usize]]
    }

    pub fn right_cayley(&self, x: usize, g: Letter) -> usize {
        self.right[x * self.gens.len() + g as usize] as usize
    }

    pub fn left_cayley(&self, x: usize, g: Letter) -> usize {
        self.left[x * self.gens.len() + g as usize] as usize
    }

    pub fn word_to_index(&self, w: &Word) -> usize {
        let mut x = self.generator_index(w[0]);
        for &a in &w[1..] {
            x = self.right_cayley(x, a);
        }
        x
    }

    pub fn factorisation_of_index(&self, x: usize) -> Word {
        let mut letters = Word::new();
        let mut cur = x as u32;
        loop {
            let (prefix, letter) = self.factor[cur as usize];
            letters.push(letter);
            if prefix == UNDEFINED {
                break;
            }
            cur = prefix;
        }
        letters.reverse();
        letters
    }

    /// The table a Todd-Coxeter engine is prefilled with: row 0 maps
    /// each generator to its coset, row `i + 1` is the Cayley row of
    /// element `i`. `left` selects the left Cayley graph, used for left
    /// congruences.
    pub fn cayley_table(&self, left: bool) -> CosetTable {
        let n = self.gens.len();
        let mut table = CosetTable::new(n);
        table.add_row();
        for g in 0..n {
            let coset = self.generator_index(g as Letter) as u32 + 1;
            table.set(0, g, coset);
        }
        for x in 0..self.elements.len() {
            let row = table.add_row();
            for g in 0..n {
                let target = if left {
                    self.left_cayley(x, g as Letter)
                } else {
                    self.right_cayley(x, g as Letter)
                };
                table.set(row, g, target as u32 + 1);
            }
        }
        table
    }
}

impl<T: SemigroupElement> ParentSemigroup for FroidurePin<T> {
    type Elt = T;

    fn nr_generators(&self) -> usize {
        self.gens.len()
    }

    fn generator(&self, i: usize) -> T {
        self.gens[i].clone()
    }

    fn word_to_element(&self, w: &Word) -> T {
        self.elements[self.word_to_index(w)].clone()
    }

    fn factorisation(&self, x: &T) -> Word {
        self.element_index(x)
            .map(|i| self.factorisation_of_index(i))
            .unwrap_or_default()
    }

    fn size(&self) -> usize {
        self.elements.len()
    }
}

#[cfg(test)]
#[path = "tests/froidure.rs"]
mod tests;
