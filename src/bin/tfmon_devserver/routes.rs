//! HTTP route registration for the development server.

use axum::middleware;
use axum::routing::{delete, get, post};

use super::*;

pub(super) fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/login", post(login))
        .merge(authed_router(state.clone()))
        .with_state(state)
}

fn authed_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/session", delete(logout))
        .route("/tfstates", get(list_tfstates).post(create_tfstate))
        .route(
            "/tfstates/:id",
            get(get_tfstate).put(update_tfstate).delete(delete_tfstate),
        )
        .route("/tfstates/:id/validate", post(validate_tfstate))
        .route("/features", get(list_features).post(create_feature))
        .route(
            "/features/:id",
            get(get_feature).put(update_feature).delete(delete_feature),
        )
        .route("/logs", get(list_logs))
        .route("/logs/:id", get(get_log).delete(delete_log))
        .route("/foreignresources", get(list_foreign_resources))
        .layer(middleware::from_fn_with_state(state, require_bearer))
}

async fn healthz() -> &'static str {
    "ok"
}
