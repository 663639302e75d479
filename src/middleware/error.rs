use axum::http::{StatusCode, header::LOCATION};
use axum::response::{IntoResponse, Response};

/// Authentication errors for the middleware layer.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No valid session found.
    #[error("Unauthorized")]
    Unauthenticated,

    /// No valid session found; send the client to a login page.
    #[error("Redirecting to {0}")]
    Redirect(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A session could not be serialized into a token.
    #[error("Token encode error: {0}")]
    Encode(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()).into_response(),
            Self::Redirect(uri) => (StatusCode::FOUND, [(LOCATION, uri)]).into_response(),
            Self::Config(_) | Self::Encode(_) => {
                tracing::error!(error = %self, "Session auth internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

impl From<crate::error::Error> for AuthError {
    fn from(e: crate::error::Error) -> Self {
        match e {
            crate::error::Error::Encode(msg) => Self::Encode(msg),
            _ => Self::Unauthenticated,
        }
    }
}
