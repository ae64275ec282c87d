use super::*;

/// Per-feature details are only served by `GET /logs/{id}`.
pub(super) async fn list_logs(State(state): State<Arc<AppState>>) -> Json<Vec<LogEntry>> {
    let db = state.db.read().await;
    Json(
        db.logs
            .iter()
            .cloned()
            .map(|mut e| {
                e.state_diff_html = None;
                e.compliance_features = None;
                e.compliance_fail_messages = None;
                e
            })
            .collect(),
    )
}

pub(super) async fn get_log(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<LogEntry>, Response> {
    let db = state.db.read().await;
    db.logs
        .iter()
        .find(|e| e.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(not_found)
}

pub(super) async fn delete_log(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<serde_json::Value>, Response> {
    let mut db = state.db.write().await;
    let idx = db
        .logs
        .iter()
        .position(|e| e.id == id)
        .ok_or_else(not_found)?;
    db.logs.remove(idx);
    info!(id = %id, "log entry deleted");
    Ok(empty())
}
