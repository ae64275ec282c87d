use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::*;
use crate::session::ReloadReason;

const MAX_ERROR_BODY: usize = 200;

impl Gateway {
    /// Performs one authenticated request and parses the JSON response.
    ///
    /// Without a credential no request is made and a reload is requested.
    /// A 401 clears the credential and requests a reload. Any response that
    /// arrives after the session moved to a new epoch is reported as
    /// [`GatewayError::Stale`] and has no other effect.
    pub async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, GatewayError> {
        let Some(active) = self.session.active() else {
            warn!(%method, path, "no credential held; forcing reload");
            self.session.request_reload(ReloadReason::MissingCredential);
            return Err(GatewayError::MissingCredential);
        };

        let mut req = self
            .client
            .request(method.as_reqwest(), self.url(path))
            .header(reqwest::header::AUTHORIZATION, active.credential.bearer());
        if let Some(body) = &body {
            req = req.json(body);
        }

        let stale = || GatewayError::Stale {
            method,
            path: path.to_string(),
        };

        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(source) => {
                if !self.session.is_current(active.epoch) {
                    return Err(stale());
                }
                warn!(%method, path, error = %source, "request failed");
                return Err(GatewayError::Transport {
                    method,
                    path: path.to_string(),
                    source,
                });
            }
        };

        if !self.session.is_current(active.epoch) {
            debug!(%method, path, "dropping response from a previous session");
            return Err(stale());
        }

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!(%method, path, "401 received; wiping credential");
            self.session.invalidate(active.epoch);
            return Err(GatewayError::Unauthorized);
        }

        let text = match resp.text().await {
            Ok(text) => text,
            Err(source) => {
                warn!(%method, path, error = %source, "read response body");
                return Err(GatewayError::Transport {
                    method,
                    path: path.to_string(),
                    source,
                });
            }
        };

        if !status.is_success() {
            let body = truncate(&text, MAX_ERROR_BODY);
            warn!(%method, path, status = status.as_u16(), body = %body, "request rejected");
            return Err(GatewayError::Status {
                method,
                path: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        if !self.session.is_current(active.epoch) {
            return Err(stale());
        }

        // DELETE and PUT usually answer with an empty body.
        let raw = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(raw).map_err(|source| {
            warn!(%method, path, error = %source, "unparseable response");
            GatewayError::Decode {
                method,
                path: path.to_string(),
                source,
            }
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        self.send(Method::Get, path, None).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        self.send(Method::Delete, path, None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let body = encode(Method::Post, path, body)?;
        self.send(Method::Post, path, Some(body)).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let body = encode(Method::Put, path, body)?;
        self.send(Method::Put, path, Some(body)).await
    }

    /// Callback form of [`Gateway::send`] for UI event handlers.
    ///
    /// `on_success` runs only when the request succeeded; `on_finish` runs
    /// afterwards in every case so callers can clear "in progress" markers.
    pub fn dispatch<T, S, F>(
        &self,
        method: Method,
        path: impl Into<String>,
        body: Option<serde_json::Value>,
        on_success: S,
        on_finish: F,
    ) -> JoinHandle<()>
    where
        T: DeserializeOwned + Send + 'static,
        S: FnOnce(T) + Send + 'static,
        F: FnOnce() + Send + 'static,
    {
        let gateway = self.clone();
        let path = path.into();
        tokio::spawn(async move {
            if let Ok(value) = gateway.send::<T>(method, &path, body).await {
                on_success(value);
            }
            on_finish();
        })
    }
}

fn encode<B: Serialize + ?Sized>(
    method: Method,
    path: &str,
    body: &B,
) -> Result<serde_json::Value, GatewayError> {
    serde_json::to_value(body).map_err(|source| GatewayError::Encode {
        method,
        path: path.to_string(),
        source,
    })
}

fn truncate(s: &str, max: usize) -> String {
    let s = s.trim();
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
#[path = "../tests/remote/http_client_tests.rs"]
mod tests;
