use axum::Json;
use contracts::usecases::u501_import_readings::{ImportResult, ImportRow};
use serde::Serialize;

use crate::shared::data::get_store;
use crate::shared::error::AppError;
use crate::usecases::u501_import_readings::ImportExecutor;

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    #[serde(flatten)]
    pub result: ImportResult,
    /// Notice to show the user
    pub message: String,
}

impl From<ImportResult> for ImportResponse {
    fn from(result: ImportResult) -> Self {
        let message = result.summary();
        Self { result, message }
    }
}

/// POST /api/u501/import/csv
pub async fn u501_import_csv(body: String) -> Result<Json<ImportResponse>, AppError> {
    tracing::info!("Received CSV import request ({} bytes)", body.len());
    let store = get_store()?;
    let result = ImportExecutor::new(store).import_csv(&body).await?;
    Ok(Json(result.into()))
}

/// POST /api/u501/import/rows
pub async fn u501_import_rows(Json(rows): Json<Vec<ImportRow>>) -> Result<Json<ImportResponse>, AppError> {
    tracing::info!("Received import request with {} rows", rows.len());
    let store = get_store()?;
    let result = ImportExecutor::new(store).import_loaded_rows(rows).await?;
    Ok(Json(result.into()))
}
