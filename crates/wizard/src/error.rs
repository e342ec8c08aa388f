use std::fmt::{self, Display};

/// Local, recoverable authoring failure. Always names the offending
/// field or question; never crosses the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationError {
    MissingAuthorName,
    MissingRespondentName,
    /// The question with this 1-based number has an empty prompt.
    MissingLabel(usize),
    /// A multiple-choice question has fewer than two filled options.
    TooFewOptions(usize),
    /// A multiple-choice question would exceed four options.
    TooManyOptions(usize),
    /// No correct answer is set, or it no longer matches any option.
    MissingCorrectAnswer(usize),
    /// An option index outside the question's current option list.
    NoSuchOption(usize),
    MissingRevealText,
}

impl ValidationError {
    /// 1-based number of the question this error points at, if any.
    pub const fn question(&self) -> Option<usize> {
        match *self {
            Self::MissingLabel(number)
            | Self::TooFewOptions(number)
            | Self::TooManyOptions(number)
            | Self::MissingCorrectAnswer(number)
            | Self::NoSuchOption(number) => Some(number),
            _ => None,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAuthorName => f.write_str("Please enter your name."),
            Self::MissingRespondentName => f.write_str("Please enter your partner's name."),
            Self::MissingLabel(number) => {
                write!(f, "Please enter a question for field {number}.")
            }
            Self::TooFewOptions(number) => {
                write!(f, "Question {number} needs at least 2 filled options.")
            }
            Self::TooManyOptions(number) => {
                write!(f, "Question {number} allows at most 4 options.")
            }
            Self::MissingCorrectAnswer(number) => {
                write!(f, "Please select a correct answer for question {number}.")
            }
            Self::NoSuchOption(number) => {
                write!(f, "Question {number} has no such option.")
            }
            Self::MissingRevealText => f.write_str("Please enter a reveal message for your quiz."),
        }
    }
}

/// Boundary contract of the submission collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitError {
    /// The backend rejected the call for want of a valid token.
    AuthRequired,
    /// The publish endpoint was not found; terminal for this attempt.
    NotFound,
    /// Network or server failure; safe to retry manually.
    Failed,
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AuthRequired => "Please log in to publish your quiz.",
            Self::NotFound => "The publish endpoint was not found.",
            Self::Failed => "Failed to publish the quiz. Your draft is untouched; try again.",
        })
    }
}

/// Failure of one publish attempt. The draft is never lost or altered
/// by any of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublishError {
    Validation(ValidationError),
    /// A publish call is already in flight.
    InFlight,
    /// No token on hand and the login collaborator could not supply one.
    Auth,
    Submit(SubmitError),
}

impl From<ValidationError> for PublishError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<SubmitError> for PublishError {
    fn from(err: SubmitError) -> Self {
        Self::Submit(err)
    }
}

impl Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(err) => err.fmt(f),
            Self::InFlight => f.write_str("A publish attempt is already in progress."),
            Self::Auth => f.write_str("Could not log you in; the quiz was not published."),
            Self::Submit(err) => err.fmt(f),
        }
    }
}
