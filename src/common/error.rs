use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request failed with code {code}")]
    Business { code: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("missing permission for {0}")]
    PermissionDenied(String),

    #[error("endpoint {0} is not configured for this resource")]
    EndpointMissing(&'static str),
}

impl AdminError {
    /// Business error code, when the failure carries one.
    pub fn code(&self) -> Option<&str> {
        match self {
            AdminError::Business { code } => Some(code),
            _ => None,
        }
    }
}
