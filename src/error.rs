use std::{fmt, io, result};

/// Crate wide `Result` type, aliasing [std::result::Result] with [Error]
/// as the error variant.
pub type Result<T> = result::Result<T, Error>;

/// Error variants raised by this crate.
///
/// Three broad kinds: usage errors (bad CLI,
/// unreadable stream, unknown backend), precondition violations are raised
/// as panics inside the MVBT (they are not recoverable), and `NotFound` is
/// the one recoverable case, logged and returned to the caller to skip.
#[derive(Debug)]
pub enum Error {
    /// Bad command line usage, or unknown `-b` backend name.
    UsageError(String),
    /// The stream file could not be opened or read.
    InvalidFile(String),
    /// A line in the event stream could not be parsed.
    InvalidEvent(String),
    /// `erase`/`remove` of a record-id that is not currently live.
    NotFound(String),
    /// Wraps [std::io::Error].
    IoError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UsageError(msg) => write!(f, "usage error: {}", msg),
            Error::InvalidFile(msg) => write!(f, "invalid file: {}", msg),
            Error::InvalidEvent(msg) => write!(f, "invalid event: {}", msg),
            Error::NotFound(msg) => write!(f, "not found: {}", msg),
            Error::IoError(msg) => write!(f, "io error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err.to_string())
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(err: std::num::ParseIntError) -> Error {
        Error::InvalidEvent(err.to_string())
    }
}

impl From<std::num::ParseFloatError> for Error {
    fn from(err: std::num::ParseFloatError) -> Error {
        Error::InvalidEvent(err.to_string())
    }
}
