//! Test double that records store calls and can fail chosen operations

use async_trait::async_trait;
use contracts::domain::a001_component::{Component, ComponentDto, ComponentId};
use contracts::domain::a002_reading::{Reading, ReadingDto, ReadingId};
use std::collections::HashSet;
use std::sync::Mutex;

use super::memory_store::MemoryStore;
use super::store::{RecordStore, StoreError};

#[derive(Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<&'static str>>,
    bulk_payloads: Mutex<Vec<Vec<ReadingDto>>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call of `operation` fail with an API error
    pub fn fail_on(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == operation).count()
    }

    /// Payload of every `create_readings` call, failed ones included
    pub fn bulk_payloads(&self) -> Vec<Vec<ReadingDto>> {
        self.bulk_payloads.lock().unwrap().clone()
    }

    pub async fn seed_component(&self, drawing: &str, name: &str, unit: &str) -> Component {
        self.inner
            .create_component(&ComponentDto {
                drawing: drawing.into(),
                name: name.into(),
                unit: unit.into(),
            })
            .await
            .unwrap()
    }

    fn enter(&self, operation: &'static str) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(operation.to_string());
        if self.failing.lock().unwrap().contains(operation) {
            return Err(StoreError::Api {
                status: 500,
                message: format!("{} failed", operation),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for RecordingStore {
    async fn list_components(&self) -> Result<Vec<Component>, StoreError> {
        self.enter("list_components")?;
        self.inner.list_components().await
    }

    async fn get_component(&self, id: ComponentId) -> Result<Component, StoreError> {
        self.enter("get_component")?;
        self.inner.get_component(id).await
    }

    async fn create_component(&self, fields: &ComponentDto) -> Result<Component, StoreError> {
        self.enter("create_component")?;
        self.inner.create_component(fields).await
    }

    async fn update_component(
        &self,
        id: ComponentId,
        fields: &ComponentDto,
    ) -> Result<(), StoreError> {
        self.enter("update_component")?;
        self.inner.update_component(id, fields).await
    }

    async fn update_component_drawing_url(
        &self,
        id: ComponentId,
        url: &str,
    ) -> Result<(), StoreError> {
        self.enter("update_component_drawing_url")?;
        self.inner.update_component_drawing_url(id, url).await
    }

    async fn delete_component(&self, id: ComponentId) -> Result<(), StoreError> {
        self.enter("delete_component")?;
        self.inner.delete_component(id).await
    }

    async fn list_readings(&self, component_id: ComponentId) -> Result<Vec<Reading>, StoreError> {
        self.enter("list_readings")?;
        self.inner.list_readings(component_id).await
    }

    async fn get_reading(&self, id: ReadingId) -> Result<Reading, StoreError> {
        self.enter("get_reading")?;
        self.inner.get_reading(id).await
    }

    async fn create_reading(&self, fields: &ReadingDto) -> Result<(), StoreError> {
        self.enter("create_reading")?;
        self.inner.create_reading(fields).await
    }

    async fn create_readings(&self, fields: &[ReadingDto]) -> Result<(), StoreError> {
        self.bulk_payloads.lock().unwrap().push(fields.to_vec());
        self.enter("create_readings")?;
        self.inner.create_readings(fields).await
    }

    async fn update_reading(&self, id: ReadingId, fields: &ReadingDto) -> Result<(), StoreError> {
        self.enter("update_reading")?;
        self.inner.update_reading(id, fields).await
    }

    async fn delete_reading(&self, id: ReadingId) -> Result<(), StoreError> {
        self.enter("delete_reading")?;
        self.inner.delete_reading(id).await
    }

    async fn delete_readings_for_component(
        &self,
        component_id: ComponentId,
    ) -> Result<(), StoreError> {
        self.enter("delete_readings_for_component")?;
        self.inner.delete_readings_for_component(component_id).await
    }

    async fn upload_file(&self, name: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        self.enter("upload_file")?;
        self.inner.upload_file(name, bytes).await
    }

    fn public_url(&self, name: &str) -> String {
        self.inner.public_url(name)
    }
}
