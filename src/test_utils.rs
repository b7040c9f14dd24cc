//! Shared test fixtures: a transformation element type and the size-88
//! transformation semigroup several congruence tests are built over.

use crate::froidure::{FroidurePin, SemigroupElement};
use crate::word::Word;

/// A transformation of `{0, .., n - 1}` by its image list, acting on
/// the right: `(x * y)(i) = y(x(i))`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Transf(pub Vec<u8>);

impl SemigroupElement for Transf {
    fn product(&self, other: &Self) -> Self {
        Transf(self.0.iter().map(|&i| other.0[i as usize]).collect())
    }
}

pub(crate) fn transf(images: &[u8]) -> Transf {
    Transf(images.to_vec())
}

/// `<[1,3,4,2,3], [3,2,1,3,3]>`, a transformation semigroup of order 88.
pub(crate) fn transf_semigroup_88() -> FroidurePin<Transf> {
    FroidurePin::new(vec![transf(&[1, 3, 4, 2, 3]), transf(&[3, 2, 1, 3, 3])])
        .expect("two generators")
}

/// Factorisation of a transformation known to lie in the semigroup.
pub(crate) fn factorisation_in(s: &FroidurePin<Transf>, images: &[u8]) -> Word {
    let index = s
        .element_index(&transf(images))
        .expect("element of the semigroup");
    s.factorisation_of_index(index)
}

/// The generating pair used by the congruence scenarios over the
/// size-88 semigroup.
pub(crate) fn pair_88(s: &FroidurePin<Transf>) -> (Word, Word) {
    (
        factorisation_in(s, &[3, 4, 4, 4, 4]),
        factorisation_in(s, &[3, 1, 3, 3, 3]),
    )
}
