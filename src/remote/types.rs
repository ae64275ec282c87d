//! Request/response payloads and the gateway error taxonomy.

use std::fmt;

use crate::model::RecordId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub(super) fn as_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("not logged in (run `tfmon login`)")]
    MissingCredential,

    #[error("session expired or revoked (run `tfmon login`)")]
    Unauthorized,

    #[error("{method} {path}: response belongs to a session that was reset")]
    Stale { method: Method, path: String },

    #[error("{method} {path}: {source}")]
    Transport {
        method: Method,
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {path}: server returned {status}: {body}")]
    Status {
        method: Method,
        path: String,
        status: u16,
        body: String,
    },

    #[error("{method} {path}: encode request body: {source}")]
    Encode {
        method: Method,
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{method} {path}: parse response: {source}")]
    Decode {
        method: Method,
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl GatewayError {
    /// The failure ended the session; the application is about to reset.
    pub fn is_session_reset(&self) -> bool {
        matches!(
            self,
            GatewayError::MissingCredential
                | GatewayError::Unauthorized
                | GatewayError::Stale { .. }
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            GatewayError::Unauthorized => Some(401),
            _ => None,
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CreatedResponse {
    pub id: RecordId,
}

#[derive(Debug, serde::Serialize)]
pub(super) struct LoginRequest<'a> {
    pub(super) username: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct LoginResponse {
    pub(super) token: String,
}
