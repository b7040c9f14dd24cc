use super::*;
use crate::cong::{ClassCount, CongKind, CongruenceSolver};
use crate::kb::KnuthBendix;
use crate::tc::ToddCoxeter;
use crate::word::{word, Word};
use std::time::Duration;

fn small_fp() -> Vec<(Word, Word)> {
    vec![
        (word(&[0, 0, 0]), word(&[0])),
        (word(&[0]), word(&[1, 1])),
    ]
}

fn small_race() -> Race {
    let mut race = Race::new();
    race.add_runner(Box::new(
        ToddCoxeter::with_relations(CongKind::TwoSided, 2, &small_fp(), &[]).unwrap(),
    ))
    .unwrap();
    race.add_runner(Box::new(KnuthBendix::with_relations(2, &small_fp()).unwrap()))
        .unwrap();
    race
}

#[test]
fn first_finisher_answers() {
    let mut race = small_race();
    assert!(!race.started());
    let winner = race.winner().unwrap();
    assert!(winner.finished());
    assert_eq!(winner.nr_classes().unwrap(), ClassCount::Finite(5));
    assert!(race.started());
}

#[test]
fn subsequent_queries_delegate_to_the_same_winner() {
    let mut race = small_race();
    let name = race.winner().unwrap().name();
    for _ in 0..3 {
        assert_eq!(race.winner().unwrap().name(), name);
    }
}

#[test]
fn add_pair_before_the_race_fans_out() {
    let mut race = small_race();
    race.add_pair(&word(&[0]), &word(&[1])).unwrap();
    let winner = race.winner().unwrap();
    assert_eq!(winner.nr_classes().unwrap(), ClassCount::Finite(1));
}

#[test]
fn add_pair_after_the_race_is_premature_mutation() {
    let mut race = small_race();
    race.winner().unwrap();
    assert_eq!(
        race.add_pair(&word(&[0]), &word(&[1])),
        Err(CongError::PrematureMutation)
    );
    assert_eq!(
        race.add_runner(Box::new(KnuthBendix::new(2))),
        Err(CongError::PrematureMutation)
    );
}

#[test]
fn empty_race_reports_all_failed() {
    let mut race = Race::new();
    assert_eq!(race.winner().err(), Some(CongError::AllFailed));
}

#[test]
fn single_runner_races_on_the_calling_thread() {
    let mut race = Race::new();
    race.add_runner(Box::new(
        ToddCoxeter::with_relations(CongKind::TwoSided, 2, &small_fp(), &[]).unwrap(),
    ))
    .unwrap();
    assert_eq!(
        race.winner().unwrap().nr_classes().unwrap(),
        ClassCount::Finite(5)
    );
}

#[test]
fn killed_single_runner_is_cancelled() {
    let mut race = Race::new();
    let tc = ToddCoxeter::with_relations(CongKind::TwoSided, 2, &small_fp(), &[]).unwrap();
    tc.kill();
    race.add_runner(Box::new(tc)).unwrap();
    assert_eq!(race.winner().err(), Some(CongError::Cancelled));
}

#[test]
fn losers_observe_the_kill_flag() {
    let mut race = small_race();
    let handles: Vec<_> = (0..race.nr_runners()).map(|_| ()).collect();
    assert_eq!(handles.len(), 2);
    race.winner().unwrap();
    // exactly one winner; the loser was killed rather than running to
    // completion on its own (it may also have finished first and lost
    // the channel race, so only check that a winner exists)
    assert!(race.started());
}

#[test]
fn run_for_without_a_winner_is_not_an_error() {
    let mut race = Race::new();
    // free semigroup: the enumeration cannot finish
    race.add_runner(Box::new(ToddCoxeter::new(CongKind::TwoSided, 1)))
        .unwrap();
    assert!(race.run_for(Duration::from_millis(10)).is_ok());
    assert!(!race.started());
}

#[test]
fn const_contains_over_all_runners() {
    let race = small_race();
    assert_eq!(
        race.const_contains(&word(&[0]), &word(&[0])),
        Trivalent::True
    );
    assert_eq!(
        race.const_contains(&word(&[0]), &word(&[1])),
        Trivalent::Unknown
    );
}

#[test]
fn obviously_infinite_checks_every_runner() {
    let mut race = Race::new();
    race.add_runner(Box::new(ToddCoxeter::new(CongKind::TwoSided, 2)))
        .unwrap();
    assert!(race.any_obviously_infinite());
}

#[test]
fn thread_cap_is_respected() {
    let mut race = small_race();
    race.set_max_threads(1);
    // only the first runner races, and it wins
    let winner = race.winner().unwrap();
    assert_eq!(winner.name(), "todd-coxeter");
    assert_eq!(winner.nr_classes().unwrap(), ClassCount::Finite(5));
}
