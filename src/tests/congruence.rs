use super::*;
use crate::test_utils::{factorisation_in, pair_88, transf_semigroup_88};
use crate::word::word;
use std::time::Duration;

fn small_fp() -> Vec<(Word, Word)> {
    vec![
        (word(&[0, 0, 0]), word(&[0])),
        (word(&[0]), word(&[1, 1])),
    ]
}

#[test]
fn two_sided_fp_congruence() {
    let mut cong = Congruence::new(CongKind::TwoSided, 2, &small_fp(), &[]).unwrap();
    assert_eq!(cong.nr_classes().unwrap(), ClassCount::Finite(5));
    assert!(cong
        .contains(&word(&[0, 0, 1]), &word(&[0, 0, 0, 0, 1]))
        .unwrap());
    assert!(!cong.contains(&word(&[0, 0, 0]), &word(&[1])).unwrap());
}

#[test]
fn left_fp_congruence() {
    let mut cong = Congruence::new(CongKind::Left, 2, &small_fp(), &[]).unwrap();
    assert_eq!(cong.nr_classes().unwrap(), ClassCount::Finite(5));
    let index = cong.word_to_class_index(&word(&[0, 0, 0, 0])).unwrap();
    assert!(index < 5);
}

#[test]
fn right_fp_congruence() {
    let mut cong = Congruence::new(CongKind::Right, 2, &small_fp(), &[]).unwrap();
    assert_eq!(cong.nr_classes().unwrap(), ClassCount::Finite(5));
}

#[test]
fn extra_pairs_coarsen_the_congruence() {
    let extra = vec![(word(&[0]), word(&[1]))];
    let mut cong = Congruence::new(CongKind::TwoSided, 2, &small_fp(), &extra).unwrap();
    assert_eq!(cong.nr_classes().unwrap(), ClassCount::Finite(1));
}

#[test]
fn add_pair_is_fanned_out_before_the_race() {
    let mut cong = Congruence::new(CongKind::TwoSided, 2, &small_fp(), &[]).unwrap();
    cong.add_pair(&word(&[0]), &word(&[1])).unwrap();
    assert_eq!(cong.nr_classes().unwrap(), ClassCount::Finite(1));
    assert_eq!(
        cong.add_pair(&word(&[0]), &word(&[1])),
        Err(CongError::PrematureMutation)
    );
}

#[test]
fn two_sided_congruence_over_concrete_parent() {
    let s = Arc::new(transf_semigroup_88());
    let (u, v) = pair_88(&s);
    let mut cong =
        Congruence::over_parent(CongKind::TwoSided, Arc::clone(&s), &[(u, v)]).unwrap();
    assert_eq!(cong.nr_classes().unwrap(), ClassCount::Finite(21));
    assert_eq!(cong.nr_non_trivial_classes().unwrap(), 1);
    assert_eq!(cong.non_trivial_classes().unwrap()[0].len(), 68);
    assert!(cong
        .contains(
            &factorisation_in(&s, &[1, 3, 1, 3, 3]),
            &factorisation_in(&s, &[4, 2, 4, 4, 2]),
        )
        .unwrap());
}

#[test]
fn left_congruence_over_concrete_parent() {
    let s = Arc::new(transf_semigroup_88());
    let (u, v) = pair_88(&s);
    let mut cong = Congruence::over_parent(CongKind::Left, Arc::clone(&s), &[(u, v)]).unwrap();
    assert_eq!(cong.nr_classes().unwrap(), ClassCount::Finite(69));
    assert_eq!(cong.nr_non_trivial_classes().unwrap(), 1);
    assert_eq!(cong.non_trivial_classes().unwrap()[0].len(), 20);
}

#[test]
fn right_congruence_over_concrete_parent() {
    let s = Arc::new(transf_semigroup_88());
    let (u, v) = pair_88(&s);
    let mut cong = Congruence::over_parent(CongKind::Right, Arc::clone(&s), &[(u, v)]).unwrap();
    assert_eq!(cong.nr_classes().unwrap(), ClassCount::Finite(72));
    let mut sizes: Vec<usize> = cong
        .non_trivial_classes()
        .unwrap()
        .iter()
        .map(|c| c.len())
        .collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![3, 5, 5, 7]);
}

#[test]
fn free_semigroup_has_infinitely_many_classes() {
    let mut cong = Congruence::new(CongKind::TwoSided, 2, &[], &[]).unwrap();
    assert!(cong.is_quotient_obviously_infinite());
    assert_eq!(cong.nr_classes().unwrap(), ClassCount::Infinite);
}

#[test]
fn quotient_through_the_facade() {
    let mut cong = Congruence::new(CongKind::TwoSided, 2, &small_fp(), &[]).unwrap();
    let q = cong.quotient().unwrap();
    assert_eq!(q.size(), 5);
}

#[test]
fn round_trip_through_class_words() {
    let mut cong = Congruence::new(CongKind::TwoSided, 2, &small_fp(), &[]).unwrap();
    let w = word(&[0, 1, 1, 0]);
    let index = cong.word_to_class_index(&w).unwrap();
    let rep = cong.class_index_to_word(index).unwrap();
    assert!(cong.contains(&rep, &w).unwrap());
}

#[test]
fn less_orders_distinct_classes_consistently() {
    let mut cong = Congruence::new(CongKind::TwoSided, 2, &small_fp(), &[]).unwrap();
    let u = word(&[0]);
    let v = word(&[1]);
    let uv = cong.less(&u, &v).unwrap();
    let vu = cong.less(&v, &u).unwrap();
    assert_ne!(uv, vu, "distinct classes must be strictly ordered");
}

#[test]
fn run_for_then_blocking_query() {
    let mut cong = Congruence::new(CongKind::TwoSided, 2, &small_fp(), &[]).unwrap();
    cong.run_for(Duration::from_millis(5)).unwrap();
    assert_eq!(cong.nr_classes().unwrap(), ClassCount::Finite(5));
}

#[test]
fn validation_happens_at_the_facade() {
    let mut cong = Congruence::new(CongKind::TwoSided, 2, &small_fp(), &[]).unwrap();
    assert_eq!(
        cong.add_pair(&word(&[7]), &word(&[0])),
        Err(CongError::BadLetter(7))
    );
}
