use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt;

use crate::models::ErrorResponse;

#[derive(Debug)]
pub enum Error {
    // Startup configuration
    Config(String),

    // I/O errors
    Io(std::io::Error),

    // Request validation errors
    InvalidRequest(String),
    EmptySsml,

    // Auth errors
    Unauthorized,

    // Upstream services
    Backend(String),
    ProxyStatus { status: u16, body: String },
    Http(String),
    Credentials(String),
    Model(String),
    EmptyResponse,

    // Local playback
    Player { player: String, reason: String },

    // Internal errors
    Unknown(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            Error::EmptySsml => write!(f, "ssml is required"),
            Error::Unauthorized => write!(f, "Unauthorized"),
            Error::Backend(msg) => write!(f, "TTS error: {}", msg),
            Error::ProxyStatus { status, body } => {
                write!(f, "proxy returned {}: {}", status, body)
            }
            Error::Http(msg) => write!(f, "HTTP error: {}", msg),
            Error::Credentials(msg) => write!(f, "Credentials error: {}", msg),
            Error::Model(msg) => write!(f, "Model error: {}", msg),
            Error::EmptyResponse => write!(f, "no response generated"),
            Error::Player { player, reason } => {
                write!(f, "playing audio with {}: {}", player, reason)
            }
            Error::Unknown(msg) => write!(f, "Unknown error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

// Conversions
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Unknown(err.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::Backend(format!("invalid audio payload: {}", err))
    }
}

impl From<gcp_auth::Error> for Error {
    fn from(err: gcp_auth::Error) -> Self {
        Error::Credentials(err.to_string())
    }
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::EmptySsml | Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::Backend(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Axum integration
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Internal error: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, axum::Json(ErrorResponse::new(message))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(Error::EmptySsml.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::InvalidRequest("bad json".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            Error::Backend("quota exceeded".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            Error::Unknown("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_proxy_status_message_includes_code() {
        let err = Error::ProxyStatus {
            status: 503,
            body: "unavailable".into(),
        };
        assert_eq!(err.to_string(), "proxy returned 503: unavailable");
    }

    #[test]
    fn test_player_error_names_player() {
        let err = Error::Player {
            player: "mpv".into(),
            reason: "exit status: 2".into(),
        };
        assert!(err.to_string().contains("mpv"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().starts_with("I/O error"));
    }
}
