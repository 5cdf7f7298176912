use thiserror::Error;

/// Errors returned by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A caller-supplied argument is out of range or has the wrong shape.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A distance or prediction was requested before `train` was called.
    #[error("classifier has not been trained")]
    NotTrained,
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
