use async_trait::async_trait;
use contracts::domain::a001_component::{Component, ComponentDto, ComponentId};
use contracts::domain::a002_reading::{Reading, ReadingDto, ReadingId};
use std::collections::HashMap;
use std::sync::Mutex;

use super::store::{RecordStore, StoreError};

const PUBLIC_URL_PREFIX: &str = "memory://attachments/";

#[derive(Default)]
struct State {
    components: Vec<Component>,
    readings: Vec<Reading>,
    files: HashMap<String, Vec<u8>>,
    next_component_id: i64,
    next_reading_id: i64,
}

impl State {
    fn component_mut(&mut self, id: ComponentId) -> Result<&mut Component, StoreError> {
        self.components
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found::<Component>(id))
    }

    /// Rejects readings of unknown components like the hosted foreign key does
    fn check_component_exists(&self, id: ComponentId) -> Result<(), StoreError> {
        if self.components.iter().any(|c| c.id == id) {
            return Ok(());
        }
        Err(StoreError::Api {
            status: 409,
            message: format!(
                "insert or update on table \"Readings\" violates foreign key constraint: component {} does not exist",
                id
            ),
        })
    }

    fn insert_reading(&mut self, fields: &ReadingDto) {
        self.next_reading_id += 1;
        self.readings.push(Reading {
            id: ReadingId(self.next_reading_id),
            component_id: fields.component_id,
            test_date: fields.test_date,
            inspector: fields.inspector.clone(),
            reading_value: fields.reading_value,
            notes: fields.notes.clone(),
        });
    }
}

/// Keeps everything in process memory.
///
/// Used for local runs without a hosted database, and as the base of test doubles.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Network("memory store lock poisoned".into()))
    }

    /// Bytes of an uploaded file
    pub fn file(&self, name: &str) -> Option<Vec<u8>> {
        self.lock().ok()?.files.get(name).cloned()
    }

    pub fn reading_count(&self) -> usize {
        self.lock().map(|s| s.readings.len()).unwrap_or_default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_components(&self) -> Result<Vec<Component>, StoreError> {
        Ok(self.lock()?.components.clone())
    }

    async fn get_component(&self, id: ComponentId) -> Result<Component, StoreError> {
        Ok(self.lock()?.component_mut(id)?.clone())
    }

    async fn create_component(&self, fields: &ComponentDto) -> Result<Component, StoreError> {
        let mut state = self.lock()?;
        state.next_component_id += 1;
        let component = Component {
            id: ComponentId(state.next_component_id),
            drawing: fields.drawing.clone(),
            name: fields.name.clone(),
            unit: fields.unit.clone(),
            drawing_pdf_url: None,
        };
        state.components.push(component.clone());
        Ok(component)
    }

    async fn update_component(
        &self,
        id: ComponentId,
        fields: &ComponentDto,
    ) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let component = state.component_mut(id)?;
        component.drawing = fields.drawing.clone();
        component.name = fields.name.clone();
        component.unit = fields.unit.clone();
        Ok(())
    }

    async fn update_component_drawing_url(
        &self,
        id: ComponentId,
        url: &str,
    ) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        state.component_mut(id)?.drawing_pdf_url = Some(url.to_string());
        Ok(())
    }

    async fn delete_component(&self, id: ComponentId) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let before = state.components.len();
        state.components.retain(|c| c.id != id);
        if state.components.len() == before {
            return Err(StoreError::not_found::<Component>(id));
        }
        Ok(())
    }

    async fn list_readings(&self, component_id: ComponentId) -> Result<Vec<Reading>, StoreError> {
        let mut readings: Vec<Reading> = self
            .lock()?
            .readings
            .iter()
            .filter(|r| r.component_id == component_id)
            .cloned()
            .collect();
        readings.sort_by(|a, b| b.test_date.cmp(&a.test_date));
        Ok(readings)
    }

    async fn get_reading(&self, id: ReadingId) -> Result<Reading, StoreError> {
        self.lock()?
            .readings
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found::<Reading>(id))
    }

    async fn create_reading(&self, fields: &ReadingDto) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        state.check_component_exists(fields.component_id)?;
        state.insert_reading(fields);
        Ok(())
    }

    async fn create_readings(&self, fields: &[ReadingDto]) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        // All or nothing, as a single insert statement
        for reading in fields {
            state.check_component_exists(reading.component_id)?;
        }
        for reading in fields {
            state.insert_reading(reading);
        }
        Ok(())
    }

    async fn update_reading(&self, id: ReadingId, fields: &ReadingDto) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        state.check_component_exists(fields.component_id)?;
        let reading = state
            .readings
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::not_found::<Reading>(id))?;
        reading.component_id = fields.component_id;
        reading.test_date = fields.test_date;
        reading.inspector = fields.inspector.clone();
        reading.reading_value = fields.reading_value;
        reading.notes = fields.notes.clone();
        Ok(())
    }

    async fn delete_reading(&self, id: ReadingId) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let before = state.readings.len();
        state.readings.retain(|r| r.id != id);
        if state.readings.len() == before {
            return Err(StoreError::not_found::<Reading>(id));
        }
        Ok(())
    }

    async fn delete_readings_for_component(
        &self,
        component_id: ComponentId,
    ) -> Result<(), StoreError> {
        self.lock()?
            .readings
            .retain(|r| r.component_id != component_id);
        Ok(())
    }

    async fn upload_file(&self, name: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        self.lock()?.files.insert(name.to_string(), bytes);
        Ok(())
    }

    fn public_url(&self, name: &str) -> String {
        format!("{}{}", PUBLIC_URL_PREFIX, name)
    }
}
