use std::fmt;

#[derive(Debug)]
pub enum PolicyError {
    /// Network, auth, permission or service-side validation failure.
    Transport(String),
    /// The remote policy changed between read and write.
    Conflict {
        bucket: String,
        expected: String,
        found: String,
    },
    InvalidRule(String),
    Serialization(serde_json::Error),
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport: {msg}"),
            Self::Conflict {
                bucket,
                expected,
                found,
            } => write!(
                f,
                "conflict: lifecycle policy of '{bucket}' changed concurrently (expected {expected}, found {found})"
            ),
            Self::InvalidRule(msg) => write!(f, "invalid rule: {msg}"),
            Self::Serialization(e) => write!(f, "serialization: {e}"),
        }
    }
}

impl std::error::Error for PolicyError {}

impl From<serde_json::Error> for PolicyError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}

impl PolicyError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
