use contracts::domain::a001_component::ComponentId;
use contracts::domain::a002_reading::{Reading, ReadingDto, ReadingId};

use crate::shared::data::RecordStore;
use crate::shared::error::AppError;

/// Readings of a component, newest first
pub async fn list_for_component(
    store: &dyn RecordStore,
    component_id: ComponentId,
) -> Result<Vec<Reading>, AppError> {
    Ok(store.list_readings(component_id).await?)
}

pub async fn get_by_id(store: &dyn RecordStore, id: ReadingId) -> Result<Reading, AppError> {
    Ok(store.get_reading(id).await?)
}

pub async fn create(store: &dyn RecordStore, dto: ReadingDto) -> Result<(), AppError> {
    dto.validate().map_err(AppError::Validation)?;
    store.create_reading(&dto.normalized()).await?;
    tracing::info!("Reading added to component {}", dto.component_id);
    Ok(())
}

pub async fn update(store: &dyn RecordStore, id: ReadingId, dto: ReadingDto) -> Result<(), AppError> {
    dto.validate().map_err(AppError::Validation)?;
    store.update_reading(id, &dto.normalized()).await?;
    tracing::info!("Reading {} updated", id);
    Ok(())
}

pub async fn delete(store: &dyn RecordStore, id: ReadingId) -> Result<(), AppError> {
    store.delete_reading(id).await?;
    tracing::info!("Reading {} deleted", id);
    Ok(())
}
