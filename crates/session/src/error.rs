use std::fmt::{self, Display};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// The respondent tried to start without giving a name.
    MissingPlayerName,
    /// `start` was called on a session already under way.
    AlreadyStarted,
    /// The operation needs an active run.
    NotPlaying,
    /// Confirming an answer before selecting one.
    NoAnswerSelected,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingPlayerName => "Please enter your name!",
            Self::AlreadyStarted => "This quiz is already under way.",
            Self::NotPlaying => "The quiz is not being played right now.",
            Self::NoAnswerSelected => "Please select an answer!",
        })
    }
}

pub type Result<T> = core::result::Result<T, Error>;
