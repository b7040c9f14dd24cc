//! Competitive scheduling of congruence solvers.
//!
//! A race owns a set of runners for the same problem, spawns one thread
//! per runner on the first query that needs an answer, and records the
//! first runner to finish as the winner. The winner sets every other
//! runner's kill flag; the losers observe it at their next progress
//! point and return, after which their buffers are released and their
//! state is never queried.

use crate::cong::{CongruenceSolver, Trivalent};
use crate::error::CongError;
use crate::reporter::reporter;
use crate::trace::debug;
use crate::word::Word;
use std::sync::atomic::Ordering;
use std::time::Duration;

fn default_max_threads() -> usize {
    if let Ok(v) = std::env::var("FPSEMI_THREADS") {
        if let Ok(n) = v.parse::<usize>() {
            return n.max(1);
        }
    }
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
}

pub struct Race {
    runners: Vec<Box<dyn CongruenceSolver>>,
    winner: Option<usize>,
    max_threads: usize,
}

impl Race {
    pub fn new() -> Self {
        Self {
            runners: Vec::new(),
            winner: None,
            max_threads: default_max_threads(),
        }
    }

    /// Upper bound on race width; runners beyond it sit the race out.
    pub fn set_max_threads(&mut self, n: usize) {
        self.max_threads = n.max(1);
    }

    pub fn nr_runners(&self) -> usize {
        self.runners.len()
    }

    pub fn started(&self) -> bool {
        self.winner.is_some()
    }

    pub fn add_runner(&mut self, runner: Box<dyn CongruenceSolver>) -> Result<(), CongError> {
        if self.started() {
            return Err(CongError::PrematureMutation);
        }
        self.runners.push(runner);
        Ok(())
    }

    /// Fan a generating pair out to every runner. Forbidden once a race
    /// has begun.
    pub fn add_pair(&mut self, u: &Word, v: &Word) -> Result<(), CongError> {
        if self.started() {
            return Err(CongError::PrematureMutation);
        }
        for r in &mut self.runners {
            r.add_pair(u, v)?;
        }
        Ok(())
    }

    /// True if any runner can certify the quotient infinite without
    /// running.
    pub fn any_obviously_infinite(&self) -> bool {
        self.runners.iter().any(|r| r.is_quotient_obviously_infinite())
    }

    /// Best conservative answer across runners without running any.
    pub fn const_contains(&self, u: &Word, v: &Word) -> Trivalent {
        for r in &self.runners {
            match r.const_contains(u, v) {
                Trivalent::Unknown => continue,
                answer => return answer,
            }
        }
        Trivalent::Unknown
    }

    /// The winning runner, racing first if no race has happened yet.
    pub fn winner(&mut self) -> Result<&mut dyn CongruenceSolver, CongError> {
        if self.winner.is_none() {
            self.decide(None)?;
            if self.winner.is_none() {
                return Err(CongError::AllFailed);
            }
        }
        let i = match self.winner {
            Some(i) => i,
            None => return Err(CongError::AllFailed),
        };
        Ok(self.runners[i].as_mut())
    }

    /// Race with a wall-clock budget. Not finding a winner in time is
    /// not an error; a later blocking query resumes the race.
    pub fn run_for(&mut self, t: Duration) -> Result<(), CongError> {
        if self.winner.is_some() {
            return Ok(());
        }
        self.decide(Some(t))
    }

    fn decide(&mut self, until: Option<Duration>) -> Result<(), CongError> {
        if self.runners.is_empty() {
            return Err(CongError::AllFailed);
        }
        if self.runners.len() == 1 {
            let r = self.runners[0].as_mut();
            match until {
                Some(t) => r.run_for(t),
                None => r.run(),
            }
            if r.finished() {
                self.winner = Some(0);
                return Ok(());
            }
            return match until {
                Some(_) => Ok(()),
                None => {
                    if r.dead() {
                        Err(CongError::Cancelled)
                    } else {
                        // stopped without finishing and without being
                        // killed: a stale deadline
                        Err(CongError::Deadline)
                    }
                }
            };
        }

        let racing = self.runners.len().min(self.max_threads);
        let kills: Vec<_> = self.runners.iter().map(|r| r.kill_handle()).collect();
        let (tx, rx) = crossbeam_channel::bounded::<usize>(racing);
        let kills_ref = &kills;
        std::thread::scope(|scope| {
            for (i, r) in self.runners[..racing].iter_mut().enumerate() {
                let tx = tx.clone();
                scope.spawn(move || {
                    reporter().thread_label();
                    match until {
                        Some(t) => r.run_for(t),
                        None => r.run(),
                    }
                    if r.finished() {
                        let _ = tx.try_send(i);
                        for (j, k) in kills_ref.iter().enumerate() {
                            if j != i {
                                k.store(true, Ordering::Release);
                            }
                        }
                    }
                });
            }
        });
        drop(tx);

        match rx.try_recv() {
            Ok(i) => {
                self.winner = Some(i);
                for (j, r) in self.runners.iter_mut().enumerate() {
                    if j != i {
                        r.release_buffers();
                    }
                }
                debug!(winner = i, "race decided");
                reporter().emit("race", &format!("winner is {}", self.runners[i].name()));
                Ok(())
            }
            Err(_) => match until {
                Some(_) => Ok(()),
                None => {
                    if self.runners[..racing].iter().all(|r| r.dead()) {
                        Err(CongError::AllFailed)
                    } else {
                        Err(CongError::Deadline)
                    }
                }
            },
        }
    }
}

impl Default for Race {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/race.rs"]
mod tests;
