use thiserror::Error;

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// A client-side constraint violation. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("request to {endpoint} failed: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} responded with {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("conflicting edit on {entity} {id}")]
    Conflict { entity: &'static str, id: String },
    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl ClientError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }

    /// The session is missing or expired and the user must sign in again.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, ClientError::Status { status: 401, .. })
    }

    /// Failures that came back from, or never reached, the remote API.
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            ClientError::Network { .. } | ClientError::Status { .. }
        )
    }
}
