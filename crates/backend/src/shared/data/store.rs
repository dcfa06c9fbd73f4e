use async_trait::async_trait;
use contracts::domain::common::{AggregateId, AggregateRoot};
use contracts::domain::a001_component::{Component, ComponentDto, ComponentId};
use contracts::domain::a002_reading::{Reading, ReadingDto, ReadingId};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use thiserror::Error;

use super::memory_store::MemoryStore;
use super::rest_store::RestStore;
use crate::shared::config::{StoreConfig, StoreKind};

/// Failures talking to the remote store
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Store returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("Unexpected store response: {0}")]
    Decode(String),

    #[error("Store has not been initialized")]
    NotInitialized,
}

impl StoreError {
    /// "Component 7 not found"
    pub fn not_found<A: AggregateRoot>(id: A::Id) -> Self {
        StoreError::NotFound(format!("{} {}", A::element_name(), id.as_string()))
    }
}

/// Operations the application needs from the hosted database and file storage.
///
/// Every call is a single request; nothing is retried.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_components(&self) -> Result<Vec<Component>, StoreError>;

    async fn get_component(&self, id: ComponentId) -> Result<Component, StoreError>;

    async fn create_component(&self, fields: &ComponentDto) -> Result<Component, StoreError>;

    async fn update_component(
        &self,
        id: ComponentId,
        fields: &ComponentDto,
    ) -> Result<(), StoreError>;

    async fn update_component_drawing_url(
        &self,
        id: ComponentId,
        url: &str,
    ) -> Result<(), StoreError>;

    async fn delete_component(&self, id: ComponentId) -> Result<(), StoreError>;

    /// Readings of one component, newest test date first
    async fn list_readings(&self, component_id: ComponentId) -> Result<Vec<Reading>, StoreError>;

    async fn get_reading(&self, id: ReadingId) -> Result<Reading, StoreError>;

    async fn create_reading(&self, fields: &ReadingDto) -> Result<(), StoreError>;

    /// Inserts all readings in one request
    async fn create_readings(&self, fields: &[ReadingDto]) -> Result<(), StoreError>;

    async fn update_reading(&self, id: ReadingId, fields: &ReadingDto) -> Result<(), StoreError>;

    async fn delete_reading(&self, id: ReadingId) -> Result<(), StoreError>;

    async fn delete_readings_for_component(
        &self,
        component_id: ComponentId,
    ) -> Result<(), StoreError>;

    async fn upload_file(&self, name: &str, bytes: Vec<u8>) -> Result<(), StoreError>;

    fn public_url(&self, name: &str) -> String;
}

static STORE: OnceCell<Arc<dyn RecordStore>> = OnceCell::new();

pub fn initialize_store(config: &StoreConfig) -> anyhow::Result<()> {
    let store: Arc<dyn RecordStore> = match config.kind {
        StoreKind::Memory => {
            tracing::warn!("Using in-memory store, data will not survive a restart");
            Arc::new(MemoryStore::new())
        }
        StoreKind::Rest => {
            tracing::info!("Using REST store at {}", config.url);
            Arc::new(RestStore::new(config)?)
        }
    };

    STORE
        .set(store)
        .map_err(|_| anyhow::anyhow!("Store is already initialized"))
}

pub fn get_store() -> Result<&'static dyn RecordStore, StoreError> {
    STORE
        .get()
        .map(|store| store.as_ref())
        .ok_or(StoreError::NotInitialized)
}
