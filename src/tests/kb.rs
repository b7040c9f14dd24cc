use super::*;
use crate::word::word;
use std::time::Duration;

fn rels(pairs: &[(&[u32], &[u32])]) -> Vec<(Word, Word)> {
    pairs
        .iter()
        .map(|(u, v)| (word(u), word(v)))
        .collect()
}

// a^3 = a, a = b^2; the quotient has 5 elements
fn small_fp() -> Vec<(Word, Word)> {
    rels(&[(&[0, 0, 0], &[0]), (&[0], &[1, 1])])
}

#[test]
fn completion_of_small_fp_semigroup() {
    let mut kb = KnuthBendix::with_relations(2, &small_fp()).unwrap();
    assert!(!kb.finished());
    kb.run();
    assert!(kb.finished());
    assert!(kb.is_confluent());
    assert_eq!(kb.nr_classes().unwrap(), ClassCount::Finite(5));
}

#[test]
fn rewriting_reaches_a_fixed_point() {
    let mut kb = KnuthBendix::with_relations(2, &small_fp()).unwrap();
    kb.run();
    for w in [
        word(&[1, 1, 1, 1, 1]),
        word(&[0, 0, 0, 0, 1, 1, 0]),
        word(&[1, 0, 1, 0, 1]),
    ] {
        let nf = kb.rewrite(&w);
        assert_eq!(kb.rewrite(&nf), nf, "rewriting is not idempotent");
    }
}

#[test]
fn contains_agrees_with_rewriting() {
    let mut kb = KnuthBendix::with_relations(2, &small_fp()).unwrap();
    assert!(kb.contains(&word(&[0, 0, 1]), &word(&[0, 0, 0, 0, 1])).unwrap());
    assert!(kb
        .contains(&word(&[0, 1, 1, 0, 0, 1]), &word(&[0, 0, 0, 0, 1]))
        .unwrap());
    assert!(!kb.contains(&word(&[0, 0, 0]), &word(&[1])).unwrap());
    // b^2 = a is one of the defining relations
    assert!(kb.contains(&word(&[1, 1]), &word(&[0])).unwrap());
}

#[test]
fn every_critical_pair_resolves_at_termination() {
    let relations = rels(&[
        (&[0, 0], &[0]),
        (&[0, 1], &[1]),
        (&[1, 0], &[1]),
        (&[0, 2], &[2]),
        (&[2, 0], &[2]),
        (&[0, 3], &[3]),
        (&[3, 0], &[3]),
        (&[0, 4], &[4]),
        (&[4, 0], &[4]),
        (&[1, 2], &[0]),
        (&[2, 1], &[0]),
        (&[3, 4], &[0]),
        (&[4, 3], &[0]),
        (&[2, 2], &[0]),
        (&[1, 4, 2, 3, 3], &[0]),
        (&[4, 4, 4], &[0]),
    ]);
    let mut kb = KnuthBendix::with_relations(5, &relations).unwrap();
    kb.run();
    assert!(kb.is_confluent());
    assert_eq!(kb.nr_classes().unwrap(), ClassCount::Finite(6));
    assert!(kb.contains(&word(&[1]), &word(&[2])).unwrap());
}

#[test]
fn class_indexing_is_shortlex_and_total() {
    let mut kb = KnuthBendix::with_relations(2, &small_fp()).unwrap();
    let n = kb.nr_classes().unwrap().finite().unwrap();
    let mut seen = vec![false; n];
    for index in 0..n {
        let w = kb.class_index_to_word(index).unwrap();
        let back = kb.word_to_class_index(&w).unwrap();
        assert_eq!(back, index);
        assert!(!seen[index]);
        seen[index] = true;
    }
    assert!(seen.into_iter().all(|s| s));
}

#[test]
fn less_is_consistent_with_indexing() {
    let mut kb = KnuthBendix::with_relations(2, &small_fp()).unwrap();
    let u = word(&[0]);
    let v = word(&[0, 0, 1]);
    let lt = kb.less(&u, &v).unwrap();
    let iu = kb.word_to_class_index(&u).unwrap();
    let iv = kb.word_to_class_index(&v).unwrap();
    assert_eq!(lt, iu < iv);
}

#[test]
fn free_semigroup_is_obviously_infinite() {
    let mut kb = KnuthBendix::new(1);
    assert!(kb.is_quotient_obviously_infinite());
    assert_eq!(kb.nr_classes().unwrap(), ClassCount::Infinite);
}

#[test]
fn infinite_quotient_still_indexes_words() {
    // a single commutation rule: infinitely many classes, but every
    // query terminates
    let mut kb = KnuthBendix::with_relations(2, &rels(&[(&[1, 0], &[0, 1])])).unwrap();
    kb.run();
    assert!(kb.finished());
    let i = kb.word_to_class_index(&word(&[1, 0])).unwrap();
    let j = kb.word_to_class_index(&word(&[0, 1])).unwrap();
    assert_eq!(i, j);
    let k = kb.word_to_class_index(&word(&[0, 0, 1, 1])).unwrap();
    assert_ne!(i, k);
}

#[test]
fn const_contains_is_sound_before_running() {
    let kb = KnuthBendix::with_relations(2, &small_fp()).unwrap();
    // no rules yet: only trivial equalities are known
    assert_eq!(kb.const_contains(&word(&[0]), &word(&[0])), Trivalent::True);
    assert_eq!(
        kb.const_contains(&word(&[0]), &word(&[1])),
        Trivalent::Unknown
    );
}

#[test]
fn const_contains_is_definite_after_running() {
    let mut kb = KnuthBendix::with_relations(2, &small_fp()).unwrap();
    kb.run();
    assert_eq!(
        kb.const_contains(&word(&[1, 1]), &word(&[0])),
        Trivalent::True
    );
    assert_eq!(
        kb.const_contains(&word(&[0, 0, 0]), &word(&[1])),
        Trivalent::False
    );
}

#[test]
fn add_pair_after_run_is_premature_mutation() {
    let mut kb = KnuthBendix::with_relations(2, &small_fp()).unwrap();
    kb.run();
    assert_eq!(
        kb.add_pair(&word(&[0]), &word(&[1])),
        Err(CongError::PrematureMutation)
    );
}

#[test]
fn killed_completion_reports_cancelled() {
    let mut kb = KnuthBendix::with_relations(2, &small_fp()).unwrap();
    kb.kill();
    assert_eq!(kb.nr_classes(), Err(CongError::Cancelled));
}

#[test]
fn run_for_is_resumable() {
    let mut kb = KnuthBendix::with_relations(2, &small_fp()).unwrap();
    kb.run_for(Duration::from_secs(0));
    assert_eq!(kb.nr_classes().unwrap(), ClassCount::Finite(5));
}

#[test]
fn quotient_of_small_fp_semigroup() {
    let mut kb = KnuthBendix::with_relations(2, &small_fp()).unwrap();
    let q = kb.quotient().unwrap();
    assert_eq!(q.size(), 5);
    assert_eq!(q.nr_idempotents(), 1);
    let a = q.word_to_class(&word(&[0])).unwrap();
    let b = q.word_to_class(&word(&[1])).unwrap();
    assert_eq!(q.product(b, b), a);
}

#[test]
fn normal_forms_enumerate_in_shortlex_order() {
    let mut kb = KnuthBendix::with_relations(2, &small_fp()).unwrap();
    kb.run();
    let nfs = enumerate_normal_forms(kb.rule_set(), || false).unwrap();
    assert_eq!(nfs.len(), 5);
    for pair in nfs.windows(2) {
        assert_eq!(
            crate::word::shortlex_cmp(&pair[0], &pair[1]),
            std::cmp::Ordering::Less
        );
    }
}

#[test]
fn rule_right_hand_sides_stay_irreducible() {
    let mut kb = KnuthBendix::with_relations(2, &small_fp()).unwrap();
    kb.run();
    let rules: Vec<_> = kb
        .rule_set()
        .active_rules()
        .map(|(l, r)| (l.clone(), r.clone()))
        .collect();
    for (_, rhs) in &rules {
        assert_eq!(&kb.rule_set().rewrite(rhs), rhs);
    }
    for (lhs, _) in &rules {
        assert!(!kb.rule_set().is_irreducible(lhs));
    }
}
