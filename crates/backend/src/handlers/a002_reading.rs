use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::a002_reading::{Reading, ReadingDto, ReadingId};
use serde_json::json;

use crate::domain::a002_reading;
use crate::shared::data::get_store;
use crate::shared::error::AppError;

/// POST /api/reading
pub async fn create(Json(dto): Json<ReadingDto>) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let store = get_store()?;
    a002_reading::service::create(store, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Reading added successfully!" })),
    ))
}

/// GET /api/reading/:id
pub async fn get_by_id(Path(id): Path<i64>) -> Result<Json<Reading>, AppError> {
    let store = get_store()?;
    Ok(Json(a002_reading::service::get_by_id(store, ReadingId(id)).await?))
}

/// PUT /api/reading/:id
pub async fn update(
    Path(id): Path<i64>,
    Json(dto): Json<ReadingDto>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = get_store()?;
    a002_reading::service::update(store, ReadingId(id), dto).await?;
    Ok(Json(json!({ "message": "Reading updated successfully!" })))
}

/// DELETE /api/reading/:id
pub async fn delete(Path(id): Path<i64>) -> Result<Json<serde_json::Value>, AppError> {
    let store = get_store()?;
    a002_reading::service::delete(store, ReadingId(id)).await?;
    Ok(Json(json!({ "message": "Reading deleted successfully!" })))
}
