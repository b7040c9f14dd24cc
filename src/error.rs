use std::fmt;

/// Errors produced by the congruence engines and their facades.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CongError {
    /// An alphabet was empty, repeated a character, or was set twice.
    BadAlphabet(String),
    /// A letter was outside the declared alphabet.
    BadLetter(u32),
    /// An empty word where no identity has been declared.
    EmptyWord,
    /// A mutation (e.g. `add_pair`) after a run had finished or a race
    /// had started.
    PrematureMutation,
    /// The quotient is infinite and cannot be materialised.
    QuotientInfinite,
    /// A non-blocking query was made and the solver has not finished.
    NotFinished,
    /// The solver was killed cooperatively.
    Cancelled,
    /// A wall-clock deadline expired before an answer was found.
    Deadline,
    /// Every runner in a race died or failed.
    AllFailed,
    /// The operation is not provided by this solver.
    NotImplemented(&'static str),
}

impl fmt::Display for CongError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CongError::BadAlphabet(why) => write!(f, "bad alphabet: {}", why),
            CongError::BadLetter(a) => write!(f, "letter {} is out of range", a),
            CongError::EmptyWord => write!(f, "empty words are not valid here"),
            CongError::PrematureMutation => {
                write!(f, "cannot mutate a congruence that has already run")
            }
            CongError::QuotientInfinite => write!(f, "the quotient is infinite"),
            CongError::NotFinished => write!(f, "the enumeration has not finished"),
            CongError::Cancelled => write!(f, "the enumeration was cancelled"),
            CongError::Deadline => write!(f, "the deadline expired"),
            CongError::AllFailed => write!(f, "every runner in the race failed"),
            CongError::NotImplemented(what) => write!(f, "{} is not implemented", what),
        }
    }
}

impl std::error::Error for CongError {}
