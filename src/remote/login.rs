use reqwest::StatusCode;
use tracing::{info, warn};

use super::*;
use crate::session::Credential;

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("login response carried an empty token")]
    EmptyToken,

    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl Gateway {
    /// Exchanges username/password for a bearer token and installs it in the session.
    ///
    /// `/login` is public, so this does not go through [`Gateway::send`].
    pub async fn login(&self, username: &str, password: &str) -> Result<u64, LoginError> {
        let resp = self
            .client
            .post(self.url("/login"))
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(|e| LoginError::Unexpected(e.to_string()))?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            info!(username, "login rejected");
            return Err(LoginError::InvalidCredentials);
        }
        let resp = resp
            .error_for_status()
            .map_err(|e| LoginError::Unexpected(e.to_string()))?;
        let body: LoginResponse = resp
            .json()
            .await
            .map_err(|e| LoginError::Unexpected(format!("parse login response: {}", e)))?;

        let credential = Credential::new(body.token).ok_or(LoginError::EmptyToken)?;
        self.session.login(credential).map_err(|e| {
            warn!(error = %format!("{:#}", e), "store credential");
            LoginError::Unexpected(format!("{:#}", e))
        })
    }
}
