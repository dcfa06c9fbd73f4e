use axum::{
    body::Bytes,
    extract::{Path, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use contracts::domain::a001_component::{Component, ComponentDto, ComponentId, ComponentSort, DisplayedComponents};
use contracts::domain::a002_reading::Reading;
use contracts::usecases::u502_export_components::export_components_csv;
use serde::Deserialize;
use serde_json::json;

use crate::domain::{a001_component, a002_reading};
use crate::shared::data::get_store;
use crate::shared::error::AppError;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    /// "Component.asc", "Drawing.desc", ...
    pub sort: Option<String>,
}

impl ListQuery {
    fn sort(&self) -> Result<ComponentSort, AppError> {
        match self.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => s.parse().map_err(AppError::Validation),
            None => Ok(ComponentSort::default()),
        }
    }

    fn search(&self) -> &str {
        self.search.as_deref().unwrap_or_default()
    }
}

/// GET /api/component
pub async fn list(Query(query): Query<ListQuery>) -> Result<Json<DisplayedComponents>, AppError> {
    let store = get_store()?;
    let displayed = a001_component::service::list_displayed(store, query.search(), query.sort()?).await?;
    Ok(Json(displayed))
}

/// GET /api/component/export
pub async fn export_csv(Query(query): Query<ListQuery>) -> Result<Response, AppError> {
    let store = get_store()?;
    let displayed = a001_component::service::list_displayed(store, query.search(), query.sort()?).await?;
    let file = export_components_csv(&displayed)?;

    tracing::info!("Exporting {} components to {}", displayed.len(), file.file_name);
    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, file.mime_type.clone()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.into_bytes(),
    )
        .into_response())
}

/// GET /api/component/:id
pub async fn get_by_id(Path(id): Path<i64>) -> Result<Json<Component>, AppError> {
    let store = get_store()?;
    Ok(Json(a001_component::service::get_by_id(store, ComponentId(id)).await?))
}

/// POST /api/component
pub async fn create(Json(dto): Json<ComponentDto>) -> Result<(StatusCode, Json<Component>), AppError> {
    let store = get_store()?;
    let component = a001_component::service::create(store, dto).await?;
    Ok((StatusCode::CREATED, Json(component)))
}

/// PUT /api/component/:id
pub async fn update(
    Path(id): Path<i64>,
    Json(dto): Json<ComponentDto>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = get_store()?;
    a001_component::service::update(store, ComponentId(id), dto).await?;
    Ok(Json(json!({ "id": id })))
}

/// DELETE /api/component/:id
pub async fn delete(Path(id): Path<i64>) -> Result<Json<serde_json::Value>, AppError> {
    let store = get_store()?;
    a001_component::service::delete(store, ComponentId(id)).await?;
    Ok(Json(json!({
        "message": "Component and all its readings deleted successfully!"
    })))
}

/// POST /api/component/:id/drawing
pub async fn upload_drawing(Path(id): Path<i64>, body: Bytes) -> Result<Json<Component>, AppError> {
    let store = get_store()?;
    let component = a001_component::service::attach_drawing(store, ComponentId(id), body.to_vec()).await?;
    Ok(Json(component))
}

/// GET /api/component/:id/readings
pub async fn list_readings(Path(id): Path<i64>) -> Result<Json<Vec<Reading>>, AppError> {
    let store = get_store()?;
    Ok(Json(a002_reading::service::list_for_component(store, ComponentId(id)).await?))
}
