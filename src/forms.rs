use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::model::{Feature, RecordId, TfState};
use crate::remote::{GatewayError, RecordClient};

const DEFAULT_TAG: &str = "default";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Account,
    Bucket,
    Path,
    Name,
    Source,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Account => "account",
            Field::Bucket => "bucket",
            Field::Path => "path",
            Field::Name => "name",
            Field::Source => "source",
        })
    }
}

/// Input rejected before anything is sent; shown next to the field.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Comma-separated tag input: trimmed, empties and repeats dropped, order kept.
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}

fn require(field: Field, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::new(field, format!("{field} must not be empty")));
    }
    Ok(())
}

/// Body of `POST /tfstates` and `PUT /tfstates/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TfStateDraft {
    pub account: String,
    pub bucket: String,
    pub path: String,
    pub tags: Vec<String>,
}

impl Default for TfStateDraft {
    fn default() -> Self {
        Self {
            account: String::new(),
            bucket: String::new(),
            path: String::new(),
            tags: vec![DEFAULT_TAG.to_string()],
        }
    }
}

impl TfStateDraft {
    pub fn from_record(s: &TfState) -> Self {
        Self {
            account: s.account.clone(),
            bucket: s.bucket.clone(),
            path: s.path.clone(),
            tags: s.tags.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        require(Field::Account, &self.account)?;
        require(Field::Bucket, &self.bucket)?;
        require(Field::Path, &self.path)?;
        Ok(())
    }

    pub fn duplicate_in(&self, existing: &[TfState]) -> Result<(), FieldError> {
        if existing
            .iter()
            .any(|s| s.bucket == self.bucket && s.path == self.path)
        {
            return Err(FieldError::new(
                Field::Path,
                "That bucket:path combination already exists.",
            ));
        }
        Ok(())
    }
}

/// Creates (after the duplicate check) or updates a tfstate.
pub async fn submit_tfstate(
    client: &RecordClient,
    draft: &TfStateDraft,
    editing: Option<&RecordId>,
) -> Result<RecordId, SubmitError> {
    draft.validate()?;
    if let Some(id) = editing {
        client.update::<TfState, _>(id, draft).await?;
        info!(id = %id, "tfstate updated");
        return Ok(id.clone());
    }

    let existing = client.list::<TfState>().await?;
    draft.duplicate_in(&existing)?;
    let id = client.create::<TfState, _>(draft).await?;
    info!(id = %id, location = %format!("{}@{}", draft.bucket, draft.path), "tfstate added");
    Ok(id)
}

/// Body of `POST /features` and `PUT /features/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FeatureDraft {
    pub name: String,
    pub source: String,
    pub tags: Vec<String>,
    pub disabled: bool,
}

impl FeatureDraft {
    pub fn from_record(f: &Feature) -> Self {
        Self {
            name: f.name.clone(),
            source: f.source.clone(),
            tags: f.tags.clone(),
            disabled: f.disabled,
        }
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        require(Field::Name, &self.name)?;
        require(Field::Source, &self.source)?;
        Ok(())
    }
}

pub async fn submit_feature(
    client: &RecordClient,
    draft: &FeatureDraft,
    editing: Option<&RecordId>,
) -> Result<RecordId, SubmitError> {
    draft.validate()?;
    if let Some(id) = editing {
        client.update::<Feature, _>(id, draft).await?;
        info!(id = %id, "feature updated");
        return Ok(id.clone());
    }
    let id = client.create::<Feature, _>(draft).await?;
    info!(id = %id, name = %draft.name, "feature added");
    Ok(id)
}

/// Flips `disabled` on the server copy of the feature.
pub async fn toggle_feature(client: &RecordClient, feature: &Feature) -> Result<bool, SubmitError> {
    let mut draft = FeatureDraft::from_record(feature);
    draft.disabled = !draft.disabled;
    client.update::<Feature, _>(&feature.id, &draft).await?;
    info!(id = %feature.id, disabled = draft.disabled, "feature toggled");
    Ok(draft.disabled)
}

#[cfg(test)]
#[path = "tests/forms_tests.rs"]
mod tests;
