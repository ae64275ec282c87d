use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Extension, Path, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use tfmon::model::{
    ComplianceResult, Feature, ForeignResource, LogEntry, LogKind, RecordId, TfState,
};

#[path = "tfmon_devserver/types.rs"]
mod types;
use self::types::*;
#[path = "tfmon_devserver/http_error.rs"]
mod http_error;
use self::http_error::*;
#[path = "tfmon_devserver/auth.rs"]
mod auth;
use self::auth::*;
#[path = "tfmon_devserver/validation.rs"]
mod validation;
use self::validation::*;
#[path = "tfmon_devserver/handlers_tfstates.rs"]
mod handlers_tfstates;
use self::handlers_tfstates::*;
#[path = "tfmon_devserver/handlers_features.rs"]
mod handlers_features;
use self::handlers_features::*;
#[path = "tfmon_devserver/handlers_logs.rs"]
mod handlers_logs;
use self::handlers_logs::*;
#[path = "tfmon_devserver/routes.rs"]
mod routes;
#[path = "tfmon_devserver/runtime.rs"]
mod runtime;

#[tokio::main]
async fn main() {
    if let Err(err) = runtime::run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
