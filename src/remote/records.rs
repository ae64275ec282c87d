use serde::Serialize;
use serde::de::IgnoredAny;

use super::*;
use crate::model::{Record, RecordId, TfState};

/// Typed CRUD over the REST collections.
#[derive(Clone, Debug)]
pub struct RecordClient {
    gateway: Gateway,
}

impl RecordClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub async fn list<R: Record>(&self) -> Result<Vec<R>, GatewayError> {
        // An empty collection may be serialized as `null`.
        let items: Option<Vec<R>> = self.gateway.get(R::COLLECTION).await?;
        Ok(items.unwrap_or_default())
    }

    pub async fn get<R: Record>(&self, id: &RecordId) -> Result<R, GatewayError> {
        self.gateway.get(&R::item_path(id)).await
    }

    pub async fn create<R: Record, B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<RecordId, GatewayError> {
        let created: CreatedResponse = self.gateway.post(R::COLLECTION, body).await?;
        Ok(created.id)
    }

    pub async fn update<R: Record, B: Serialize + ?Sized>(
        &self,
        id: &RecordId,
        body: &B,
    ) -> Result<(), GatewayError> {
        let _: IgnoredAny = self.gateway.put(&R::item_path(id), body).await?;
        Ok(())
    }

    pub async fn delete<R: Record>(&self, id: &RecordId) -> Result<(), GatewayError> {
        let _: IgnoredAny = self.gateway.delete(&R::item_path(id)).await?;
        Ok(())
    }

    /// Asks the server to re-validate a tfstate asynchronously.
    pub async fn validate_tfstate(&self, id: &RecordId) -> Result<(), GatewayError> {
        let _: IgnoredAny = self
            .gateway
            .post(&TfState::validate_path(id), &serde_json::json!({}))
            .await?;
        Ok(())
    }
}
