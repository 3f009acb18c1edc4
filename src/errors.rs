use crate::gateway::GatewayError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("VALIDATION: {0}")]
    Validation(String),
    #[error("REMOTE: {0}")]
    Remote(GatewayError),
    #[error("AUTH_EXPIRED: {0}")]
    Auth(String),
    #[error("MUTATION_PENDING: {0}")]
    MutationPending(String),
    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl From<GatewayError> for ClientError {
    fn from(value: GatewayError) -> Self {
        match value {
            GatewayError::Status { status: 401, message } => Self::Auth(message),
            other => Self::Remote(other),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
