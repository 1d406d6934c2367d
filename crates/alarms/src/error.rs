use std::fmt;

#[derive(Debug)]
pub enum AlarmError {
    /// Network, auth, throttling or service-side failure.
    Transport(String),
    InvalidConfig(String),
}

impl fmt::Display for AlarmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport: {msg}"),
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for AlarmError {}

impl From<cloudkeep_common::config::LoadError> for AlarmError {
    fn from(e: cloudkeep_common::config::LoadError) -> Self {
        Self::InvalidConfig(e.to_string())
    }
}

/// Flattens an SDK error with its whole source chain.
pub(crate) fn transport(err: impl std::error::Error) -> AlarmError {
    AlarmError::Transport(aws_sdk_cloudwatch::error::DisplayErrorContext(&err).to_string())
}
