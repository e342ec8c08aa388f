use hyper::http::uri::InvalidUri;
use serde_json::error::Category;
use std::fmt::{self, Display};

use wizard::SubmitError;

#[derive(Debug)]
pub enum Error {
    /// Transport-level failure while talking to the backend.
    Transport,
    /// The request itself could not be constructed.
    Http,
    /// The backend replied 401.
    Unauthorized,
    /// The backend replied 404.
    NotFound,
    /// The backend replied with another non-success status.
    Status(u16),
    /// JSON syntax error detected.
    Syntax,
    /// Unexpected JSON data types encountered.
    Data,
}

impl From<hyper::Error> for Error {
    fn from(_: hyper::Error) -> Self {
        Self::Transport
    }
}

impl From<hyper_util::client::legacy::Error> for Error {
    fn from(_: hyper_util::client::legacy::Error) -> Self {
        Self::Transport
    }
}

impl From<hyper::http::Error> for Error {
    fn from(_: hyper::http::Error) -> Self {
        Self::Http
    }
}

impl From<InvalidUri> for Error {
    fn from(_: InvalidUri) -> Self {
        Self::Http
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => Self::Data,
            Category::Syntax => Self::Syntax,
            _ => Self::Transport,
        }
    }
}

impl From<Error> for SubmitError {
    fn from(err: Error) -> Self {
        match err {
            Error::Unauthorized => Self::AuthRequired,
            Error::NotFound => Self::NotFound,
            _ => Self::Failed,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => f.write_str("failed to reach the backend"),
            Self::Http => f.write_str("could not construct the request"),
            Self::Unauthorized => f.write_str("the backend rejected the access token"),
            Self::NotFound => f.write_str("no such resource on the backend"),
            Self::Status(code) => write!(f, "unexpected status {code} from the backend"),
            Self::Syntax => f.write_str("syntax error in the JSON reply"),
            Self::Data => f.write_str("unexpected data types in the JSON reply"),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
