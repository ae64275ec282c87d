use super::*;

pub(super) async fn list_features(State(state): State<Arc<AppState>>) -> Json<Vec<Feature>> {
    Json(state.db.read().await.features.clone())
}

pub(super) async fn get_feature(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<Feature>, Response> {
    let db = state.db.read().await;
    db.features
        .iter()
        .find(|f| f.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(not_found)
}

pub(super) async fn create_feature(
    State(state): State<Arc<AppState>>,
    Json(input): Json<FeatureInput>,
) -> Result<Json<serde_json::Value>, Response> {
    input.validate().map_err(bad_request)?;

    let mut db = state.db.write().await;
    if db.features.iter().any(|f| f.name == input.name) {
        return Err(conflict("feature already exists"));
    }
    let id = new_record_id()?;
    db.features.push(Feature {
        id: id.clone(),
        timestamp: now_unix(),
        name: input.name,
        source: input.source,
        tags: input.tags,
        disabled: input.disabled,
    });
    info!(id = %id, "feature created");
    Ok(Json(json!({ "id": id })))
}

pub(super) async fn update_feature(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
    Json(input): Json<FeatureInput>,
) -> Result<Json<serde_json::Value>, Response> {
    input.validate().map_err(bad_request)?;

    let mut db = state.db.write().await;
    if db.features.iter().any(|f| f.id != id && f.name == input.name) {
        return Err(conflict("feature already exists"));
    }
    let f = db
        .features
        .iter_mut()
        .find(|f| f.id == id)
        .ok_or_else(not_found)?;
    f.name = input.name;
    f.source = input.source;
    f.tags = input.tags;
    f.disabled = input.disabled;
    info!(id = %id, disabled = f.disabled, "feature updated");
    Ok(empty())
}

pub(super) async fn delete_feature(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<serde_json::Value>, Response> {
    let mut db = state.db.write().await;
    let idx = db
        .features
        .iter()
        .position(|f| f.id == id)
        .ok_or_else(not_found)?;
    db.features.remove(idx);
    info!(id = %id, "feature deleted");
    Ok(empty())
}

pub(super) async fn list_foreign_resources(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<ForeignResource>> {
    Json(state.db.read().await.foreign_resources.clone())
}
