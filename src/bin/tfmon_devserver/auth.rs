use super::*;

pub(super) fn hash_token(secret: &str) -> String {
    blake3::hash(secret.as_bytes()).to_hex().to_string()
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct LoginRequest {
    username: String,
    password: String,
}

pub(super) async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, Response> {
    if payload.username != state.user || payload.password != state.password {
        info!(username = %payload.username, "login rejected");
        return Err(unauthorized());
    }

    let token = random_hex(32).map_err(internal_error)?;
    state.sessions.write().await.insert(hash_token(&token));
    info!(username = %payload.username, "session created");
    Ok(Json(json!({ "token": token })))
}

/// Revokes the token the request was made with.
pub(super) async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<SessionToken>,
) -> Json<serde_json::Value> {
    state.sessions.write().await.remove(&token.0);
    info!("session revoked");
    empty()
}

pub(super) async fn require_bearer(
    State(state): State<Arc<AppState>>,
    mut req: axum::extract::Request,
    next: Next,
) -> Response {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return unauthorized();
    };

    let Ok(value) = value.to_str() else {
        return unauthorized();
    };

    let Some(token) = value.strip_prefix("Bearer ") else {
        return unauthorized();
    };

    let token_hash = hash_token(token);
    if !state.sessions.read().await.contains(&token_hash) {
        debug!(path = %req.uri().path(), "unknown or revoked token");
        return unauthorized();
    }

    req.extensions_mut().insert(SessionToken(token_hash));
    next.run(req).await
}
