use super::*;

pub(super) async fn list_tfstates(State(state): State<Arc<AppState>>) -> Json<Vec<TfState>> {
    Json(state.db.read().await.tfstates.clone())
}

pub(super) async fn get_tfstate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<TfState>, Response> {
    let db = state.db.read().await;
    db.tfstates
        .iter()
        .find(|s| s.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(not_found)
}

pub(super) async fn create_tfstate(
    State(state): State<Arc<AppState>>,
    Json(input): Json<TfStateInput>,
) -> Result<Json<serde_json::Value>, Response> {
    input.validate().map_err(bad_request)?;

    let mut db = state.db.write().await;
    if db
        .tfstates
        .iter()
        .any(|s| s.bucket == input.bucket && s.path == input.path)
    {
        return Err(conflict("tfstate already exists"));
    }

    let id = new_record_id()?;
    db.tfstates.push(TfState {
        id: id.clone(),
        timestamp: now_unix(),
        account: input.account,
        bucket: input.bucket,
        path: input.path,
        tags: input.tags,
        last_update: String::new(),
        compliance_result: ComplianceResult::default(),
        force_validation: false,
    });
    info!(id = %id, "tfstate created");
    Ok(Json(json!({ "id": id })))
}

pub(super) async fn update_tfstate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
    Json(input): Json<TfStateInput>,
) -> Result<Json<serde_json::Value>, Response> {
    input.validate().map_err(bad_request)?;

    let mut db = state.db.write().await;
    if db
        .tfstates
        .iter()
        .any(|s| s.id != id && s.bucket == input.bucket && s.path == input.path)
    {
        return Err(conflict("tfstate already exists"));
    }
    let tf = db
        .tfstates
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or_else(not_found)?;
    tf.account = input.account;
    tf.bucket = input.bucket;
    tf.path = input.path;
    tf.tags = input.tags;
    info!(id = %id, "tfstate updated");
    Ok(empty())
}

pub(super) async fn delete_tfstate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<serde_json::Value>, Response> {
    let mut db = state.db.write().await;
    let idx = db
        .tfstates
        .iter()
        .position(|s| s.id == id)
        .ok_or_else(not_found)?;
    db.tfstates.remove(idx);
    info!(id = %id, "tfstate deleted");
    Ok(empty())
}

/// Marks the tfstate pending and answers before the validation runs.
pub(super) async fn validate_tfstate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<serde_json::Value>, Response> {
    {
        let mut db = state.db.write().await;
        let tf = db
            .tfstates
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(not_found)?;
        if tf.force_validation {
            return Err(conflict("validation already running"));
        }
        tf.force_validation = true;
    }
    info!(id = %id, "validation requested");
    spawn_validation(state.clone(), id);
    Ok(empty())
}
