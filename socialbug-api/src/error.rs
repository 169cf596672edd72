use reqwest::StatusCode;

/// Failure of a gateway call
#[derive(Debug)]
pub enum ApiError {
    /// No credential in the session store; nothing was sent
    Unauthenticated,
    /// The server answered with a non-2xx status
    RequestFailed { status: StatusCode, message: String },
    /// A successful response whose body could not be decoded
    MalformedResponse(String),
    /// The call was superseded or aborted before it completed
    Cancelled,
    /// A local precondition failed before anything was sent
    ValidationFailed(String),
    /// The request never produced a response
    Transport(reqwest::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::ValidationFailed(message.into())
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        ApiError::Transport(value)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Unauthenticated => f.write_str("Not authenticated"),
            ApiError::RequestFailed { message, .. } => f.write_str(message),
            ApiError::MalformedResponse(detail) => write!(f, "Malformed response: {}", detail),
            ApiError::Cancelled => f.write_str("Request cancelled"),
            ApiError::ValidationFailed(message) => f.write_str(message),
            ApiError::Transport(e) => write!(f, "Network error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Transport(e) => Some(e),
            _ => None,
        }
    }
}
