use chrono::NaiveDate;
use contracts::domain::a001_component::{Component, ComponentId};
use contracts::domain::a002_reading::aggregate::normalize_notes;
use contracts::domain::a002_reading::ReadingDto;
use contracts::usecases::u501_import_readings::{
    columns, row_field, row_value, ImportResult, ImportRow, RowError, RowErrorReason,
};
use std::collections::HashMap;

use super::{parse_csv, ImportError};
use crate::shared::data::RecordStore;

/// Executor for the bulk reading import
pub struct ImportExecutor<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> ImportExecutor<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// Parses the CSV, loads the current components and imports the rows.
    /// Parse failures return before any store call.
    pub async fn import_csv(&self, csv_text: &str) -> Result<ImportResult, ImportError> {
        let rows = parse_csv(csv_text)?;
        self.import_loaded_rows(rows).await
    }

    /// Imports rows that were already parsed by the caller
    pub async fn import_loaded_rows(&self, rows: Vec<ImportRow>) -> Result<ImportResult, ImportError> {
        if rows.is_empty() {
            return Err(ImportError::Empty);
        }
        let components = self
            .store
            .list_components()
            .await
            .map_err(ImportError::Store)?;
        Ok(self.import_rows(&components, &rows).await)
    }

    /// Resolves every row against `components` and writes the valid ones
    /// in a single bulk insert. Rejected rows never stop the batch.
    pub async fn import_rows(&self, components: &[Component], rows: &[ImportRow]) -> ImportResult {
        let (staged, mut result) = stage_rows(components, rows);

        if staged.is_empty() {
            tracing::info!(
                "Import finished: nothing to write, {} rows rejected",
                result.error_count
            );
            return result;
        }

        match self.store.create_readings(&staged).await {
            Ok(()) => {
                result.success_count = staged.len();
                tracing::info!(
                    "Import finished: {} readings written, {} rows rejected",
                    result.success_count,
                    result.error_count
                );
            }
            Err(e) => {
                tracing::error!("Bulk insert of {} readings failed: {}", staged.len(), e);
                result.store_failed_count = staged.len();
                result.store_error = Some(e.to_string());
            }
        }

        result
    }
}

/// Validates rows and builds the insert payload without touching the store
pub fn stage_rows(components: &[Component], rows: &[ImportRow]) -> (Vec<ReadingDto>, ImportResult) {
    // Exact, case-sensitive match on the component name
    let lookup: HashMap<&str, ComponentId> = components
        .iter()
        .map(|c| (c.name.as_str(), c.id))
        .collect();

    let mut staged = Vec::new();
    let mut result = ImportResult::default();

    for (index, row) in rows.iter().enumerate() {
        let row_number = index + 1;
        match stage_row(&lookup, row, row_number) {
            Ok(reading) => staged.push(reading),
            Err(error) => {
                tracing::warn!(
                    "Skipping row {} ({}): {}",
                    error.row,
                    error.identifier,
                    error.reason
                );
                result.record_row_error(error);
            }
        }
    }

    (staged, result)
}

fn stage_row(
    lookup: &HashMap<&str, ComponentId>,
    row: &ImportRow,
    row_number: usize,
) -> Result<ReadingDto, RowError> {
    let fail = |identifier: &str, reason: RowErrorReason| RowError {
        row: row_number,
        identifier: identifier.to_string(),
        reason,
    };

    // Untrimmed: " V-101" is not "V-101"
    let name = row_value(row, columns::COMPONENT).ok_or_else(|| {
        fail(
            &format!("row {}", row_number),
            RowErrorReason::MissingField(columns::COMPONENT[0].into()),
        )
    })?;

    let component_id = *lookup
        .get(name)
        .ok_or_else(|| fail(name, RowErrorReason::UnknownComponent))?;

    let test_date = row_field(row, &[columns::TEST_DATE])
        .ok_or_else(|| fail(name, RowErrorReason::MissingField(columns::TEST_DATE.into())))?;
    let test_date = NaiveDate::parse_from_str(test_date, columns::DATE_FORMAT)
        .map_err(|_| fail(name, RowErrorReason::InvalidDate(test_date.into())))?;

    let inspector = row_field(row, &[columns::INSPECTOR])
        .ok_or_else(|| fail(name, RowErrorReason::MissingField(columns::INSPECTOR.into())))?;

    let raw_value = row_field(row, &[columns::READING_VALUE]).ok_or_else(|| {
        fail(name, RowErrorReason::MissingField(columns::READING_VALUE.into()))
    })?;
    let reading_value = parse_reading_value(raw_value)
        .ok_or_else(|| fail(name, RowErrorReason::InvalidValue(raw_value.into())))?;

    Ok(ReadingDto {
        component_id,
        test_date,
        inspector: inspector.to_string(),
        reading_value,
        notes: normalize_notes(row_field(row, &[columns::NOTES])),
    })
}

/// Accepts finite decimal numbers only; "NaN" and "inf" are rejected
fn parse_reading_value(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
