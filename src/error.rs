use thiserror::Error;

/// Failures surfaced by a registry backend.
#[derive(Error, Debug, Clone)]
pub enum RegistryError {
    /// The server could not be reached at all (connect failure, reset
    /// mid-call, ...). Distinct from the server answering with an error.
    #[error("could not reach registry: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("registry returned status {status} for {context}")]
    Status { status: u16, context: String },

    /// The response body did not parse as the expected payload.
    #[error("invalid registry response: {0}")]
    Decode(String),
}

impl RegistryError {
    /// Short classifier carried into `CleanupResult::exception_kind`, so
    /// callers can tell "could not reach server" from "server said no".
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryError::Transport(_) => "Transport",
            RegistryError::Status { .. } => "Status",
            RegistryError::Decode(_) => "Decode",
        }
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(e: reqwest::Error) -> Self {
        RegistryError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(e: serde_json::Error) -> Self {
        RegistryError::Decode(e.to_string())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No deletion pattern specified. Use --delete-regex to opt tags into deletion")]
    NoDeletePattern,

    #[error("invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
