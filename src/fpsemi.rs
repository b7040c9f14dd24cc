//! Finitely presented semigroups and monoids over a string alphabet.
//!
//! Wraps the two-sided congruence machinery as a presentation: strings
//! are normalised into integer words through the declared alphabet,
//! rules become generating pairs fanned out to a Todd-Coxeter and a
//! Knuth-Bendix runner, and `size`, `equal_to` and `normal_form`
//! round-trip through the winner's class indexing.

use crate::cong::{ClassCount, CongKind, Trivalent};
use crate::error::CongError;
use crate::kb::KnuthBendix;
use crate::race::Race;
use crate::reporter::reporter;
use crate::tc::ToddCoxeter;
use crate::word::{Letter, Word};
use rustc_hash::FxHashMap;
use std::time::Duration;

pub struct FpSemigroup {
    alphabet: Option<Vec<char>>,
    letter_of: FxHashMap<char, Letter>,
    nr_gens: usize,
    identity: Option<Letter>,
    nr_rules: usize,
    race: Race,
}

impl FpSemigroup {
    pub fn new() -> Self {
        Self {
            alphabet: None,
            letter_of: FxHashMap::default(),
            nr_gens: 0,
            identity: None,
            nr_rules: 0,
            race: Race::new(),
        }
    }

    /// Declare the alphabet; exactly once per facade. Characters are
    /// mapped bijectively onto `{0, .., n - 1}` in order of appearance.
    pub fn set_alphabet(&mut self, alphabet: &str) -> Result<(), CongError> {
        if self.alphabet.is_some() {
            return Err(CongError::BadAlphabet("alphabet already set".to_string()));
        }
        if alphabet.is_empty() {
            return Err(CongError::BadAlphabet("empty alphabet".to_string()));
        }
        let chars: Vec<char> = alphabet.chars().collect();
        for (i, &c) in chars.iter().enumerate() {
            if self.letter_of.insert(c, i as Letter).is_some() {
                self.letter_of.clear();
                return Err(CongError::BadAlphabet(format!("duplicate letter '{}'", c)));
            }
        }
        self.install_runners(chars.len())?;
        self.alphabet = Some(chars);
        Ok(())
    }

    /// Integer alphabet `{0, .., n - 1}`; the string interface is then
    /// unavailable and rules are added with [`FpSemigroup::add_rule_words`].
    pub fn set_alphabet_size(&mut self, n: usize) -> Result<(), CongError> {
        if self.alphabet.is_some() {
            return Err(CongError::BadAlphabet("alphabet already set".to_string()));
        }
        if n == 0 {
            return Err(CongError::BadAlphabet("empty alphabet".to_string()));
        }
        self.install_runners(n)?;
        self.alphabet = Some(Vec::new());
        Ok(())
    }

    fn install_runners(&mut self, n: usize) -> Result<(), CongError> {
        self.race
            .add_runner(Box::new(ToddCoxeter::new(CongKind::TwoSided, n)))?;
        self.race.add_runner(Box::new(KnuthBendix::new(n)))?;
        self.nr_gens = n;
        reporter().emit("fpsemi", &format!("alphabet of {} letters", n));
        Ok(())
    }

    pub fn nr_generators(&self) -> Result<usize, CongError> {
        match &self.alphabet {
            Some(_) => Ok(self.nr_gens),
            None => Err(CongError::BadAlphabet("no alphabet".to_string())),
        }
    }

    pub fn nr_rules(&self) -> usize {
        self.nr_rules
    }

    /// Convert a string to an integer word. The empty string denotes
    /// the identity where one has been declared and is otherwise
    /// `EmptyWord`.
    pub fn string_to_word(&self, s: &str) -> Result<Word, CongError> {
        if self.alphabet.is_none() {
            return Err(CongError::BadAlphabet("no alphabet".to_string()));
        }
        if s.is_empty() {
            return match self.identity {
                Some(e) => Ok(Word::from_slice(&[e])),
                None => Err(CongError::EmptyWord),
            };
        }
        let mut w = Word::new();
        for c in s.chars() {
            match self.letter_of.get(&c) {
                Some(&a) => w.push(a),
                // reported by codepoint; the character is not a letter
                None => return Err(CongError::BadLetter(c as u32)),
            }
        }
        Ok(w)
    }

    pub fn word_to_string(&self, w: &Word) -> Result<String, CongError> {
        let chars = match &self.alphabet {
            Some(chars) if !chars.is_empty() => chars,
            _ => return Err(CongError::BadAlphabet("no string alphabet".to_string())),
        };
        let mut s = String::with_capacity(w.len());
        for &a in w {
            match chars.get(a as usize) {
                Some(&c) => s.push(c),
                None => return Err(CongError::BadLetter(a)),
            }
        }
        Ok(s)
    }

    pub fn add_rule(&mut self, lhs: &str, rhs: &str) -> Result<(), CongError> {
        let u = self.string_to_word(lhs)?;
        let v = self.string_to_word(rhs)?;
        self.add_rule_words(&u, &v)
    }

    pub fn add_rule_words(&mut self, u: &Word, v: &Word) -> Result<(), CongError> {
        if self.alphabet.is_none() {
            return Err(CongError::BadAlphabet("no alphabet".to_string()));
        }
        self.race.add_pair(u, v)?;
        self.nr_rules += 1;
        Ok(())
    }

    /// Install `e` as the identity: adds `e.x = x.e = x` for every
    /// letter `x`. The identity must be a letter of the alphabet.
    pub fn set_identity(&mut self, e: char) -> Result<(), CongError> {
        let id = match self.letter_of.get(&e) {
            Some(&id) => id,
            None => return Err(CongError::BadLetter(e as u32)),
        };
        self.set_identity_letter(id)
    }

    pub fn set_identity_letter(&mut self, e: Letter) -> Result<(), CongError> {
        let n = self.nr_generators()?;
        if e as usize >= n {
            return Err(CongError::BadLetter(e));
        }
        for x in 0..n as Letter {
            if x == e {
                self.add_rule_words(&Word::from_slice(&[e, e]), &Word::from_slice(&[e]))?;
            } else {
                self.add_rule_words(&Word::from_slice(&[e, x]), &Word::from_slice(&[x]))?;
                self.add_rule_words(&Word::from_slice(&[x, e]), &Word::from_slice(&[x]))?;
            }
        }
        self.identity = Some(e);
        Ok(())
    }

    pub fn is_obviously_infinite(&self) -> bool {
        self.race.any_obviously_infinite()
    }

    /// The number of elements, racing the runners to completion.
    pub fn size(&mut self) -> Result<ClassCount, CongError> {
        if self.alphabet.is_none() {
            return Err(CongError::BadAlphabet("no alphabet".to_string()));
        }
        if self.is_obviously_infinite() {
            return Ok(ClassCount::Infinite);
        }
        self.race.winner()?.nr_classes()
    }

    pub fn equal_to(&mut self, u: &str, v: &str) -> Result<bool, CongError> {
        let u = self.string_to_word(u)?;
        let v = self.string_to_word(v)?;
        self.race.winner()?.contains(&u, &v)
    }

    pub fn const_equal_to(&self, u: &str, v: &str) -> Trivalent {
        match (self.string_to_word(u), self.string_to_word(v)) {
            (Ok(u), Ok(v)) => self.race.const_contains(&u, &v),
            _ => Trivalent::Unknown,
        }
    }

    /// A canonical representative of the class of `w`, as a string.
    pub fn normal_form(&mut self, w: &str) -> Result<String, CongError> {
        let word = self.string_to_word(w)?;
        let nf = self.normal_form_word(&word)?;
        self.word_to_string(&nf)
    }

    pub fn normal_form_word(&mut self, w: &Word) -> Result<Word, CongError> {
        let winner = self.race.winner()?;
        let index = winner.word_to_class_index(w)?;
        winner.class_index_to_word(index)
    }

    pub fn run(&mut self) -> Result<(), CongError> {
        self.race.winner().map(|_| ())
    }

    pub fn run_for(&mut self, t: Duration) -> Result<(), CongError> {
        self.race.run_for(t)
    }
}

impl Default for FpSemigroup {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/fpsemi.rs"]
mod tests;
