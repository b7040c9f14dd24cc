use super::*;
use std::time::Duration;

fn small() -> FpSemigroup {
    let mut s = FpSemigroup::new();
    s.set_alphabet("ab").unwrap();
    s.add_rule("aaa", "a").unwrap();
    s.add_rule("bb", "a").unwrap();
    s
}

#[test]
fn size_of_small_fp_semigroup() {
    let mut s = small();
    assert_eq!(s.size().unwrap(), ClassCount::Finite(5));
    assert_eq!(s.nr_rules(), 2);
}

#[test]
fn equal_to_decides_the_word_problem() {
    let mut s = small();
    assert!(s.equal_to("aab", "aaaab").unwrap());
    assert!(s.equal_to("abbaab", "aaaab").unwrap());
    assert!(!s.equal_to("aaa", "b").unwrap());
    assert!(s.equal_to("bb", "a").unwrap());
}

#[test]
fn normal_forms_are_canonical() {
    let mut s = small();
    let nf = s.normal_form("abbaab").unwrap();
    assert!(s.equal_to(&nf, "abbaab").unwrap());
    // a normal form is its own normal form
    assert_eq!(s.normal_form(&nf).unwrap(), nf);
    // equal words share a normal form
    assert_eq!(nf, s.normal_form("aaaab").unwrap());
    // distinct classes do not
    assert_ne!(s.normal_form("aaa").unwrap(), s.normal_form("b").unwrap());
}

#[test]
fn alphabet_is_set_exactly_once() {
    let mut s = FpSemigroup::new();
    s.set_alphabet("ab").unwrap();
    assert!(matches!(
        s.set_alphabet("cd"),
        Err(CongError::BadAlphabet(_))
    ));
}

#[test]
fn duplicate_letters_are_rejected() {
    let mut s = FpSemigroup::new();
    assert!(matches!(
        s.set_alphabet("aba"),
        Err(CongError::BadAlphabet(_))
    ));
}

#[test]
fn empty_alphabet_is_rejected() {
    let mut s = FpSemigroup::new();
    assert!(matches!(s.set_alphabet(""), Err(CongError::BadAlphabet(_))));
}

#[test]
fn rules_need_an_alphabet() {
    let mut s = FpSemigroup::new();
    assert!(matches!(
        s.add_rule("a", "b"),
        Err(CongError::BadAlphabet(_))
    ));
}

#[test]
fn unknown_letters_are_rejected() {
    let mut s = FpSemigroup::new();
    s.set_alphabet("ab").unwrap();
    assert_eq!(s.add_rule("ac", "a"), Err(CongError::BadLetter('c' as u32)));
}

#[test]
fn empty_sides_are_rejected_without_an_identity() {
    let mut s = FpSemigroup::new();
    s.set_alphabet("ab").unwrap();
    assert_eq!(s.add_rule("", "a"), Err(CongError::EmptyWord));
}

#[test]
fn set_identity_installs_the_monoid_rules() {
    let mut s = FpSemigroup::new();
    s.set_alphabet("abe").unwrap();
    s.add_rule("aaa", "a").unwrap();
    s.add_rule("bb", "a").unwrap();
    s.set_identity('e').unwrap();
    // e absorbs on both sides, so the semigroup gains only the class
    // of e itself
    assert_eq!(s.size().unwrap(), ClassCount::Finite(6));
    assert!(s.equal_to("ea", "a").unwrap());
    assert!(s.equal_to("ae", "a").unwrap());
    assert!(s.equal_to("ee", "e").unwrap());
    // the empty string now denotes the identity
    assert!(s.equal_to("", "e").unwrap());
}

#[test]
fn free_semigroup_is_obviously_infinite() {
    let mut s = FpSemigroup::new();
    s.set_alphabet("ab").unwrap();
    assert!(s.is_obviously_infinite());
    assert_eq!(s.size().unwrap(), ClassCount::Infinite);
}

#[test]
fn integer_alphabet_interface() {
    let mut s = FpSemigroup::new();
    s.set_alphabet_size(2).unwrap();
    s.add_rule_words(&crate::word::word(&[0, 0, 0]), &crate::word::word(&[0]))
        .unwrap();
    s.add_rule_words(&crate::word::word(&[1, 1]), &crate::word::word(&[0]))
        .unwrap();
    assert_eq!(s.size().unwrap(), ClassCount::Finite(5));
    // no string alphabet to render into
    assert!(matches!(
        s.word_to_string(&crate::word::word(&[0])),
        Err(CongError::BadAlphabet(_))
    ));
}

#[test]
fn run_for_slices_are_not_errors() {
    let mut s = small();
    s.run_for(Duration::from_millis(1)).unwrap();
    assert_eq!(s.size().unwrap(), ClassCount::Finite(5));
}

#[test]
fn rules_after_the_race_are_premature() {
    let mut s = small();
    s.size().unwrap();
    assert_eq!(s.add_rule("a", "b"), Err(CongError::PrematureMutation));
}

#[test]
fn const_equal_to_is_conservative() {
    let s = small();
    assert_eq!(s.const_equal_to("a", "a"), Trivalent::True);
    assert_eq!(s.const_equal_to("a", "b"), Trivalent::Unknown);
}
