use contracts::usecases::u501_import_readings::{columns, ImportRow};

use super::ImportError;

/// Parses CSV text into header-keyed rows.
///
/// The header row is required and must name the component column plus
/// test_date, inspector and reading_value. Any malformed record fails the
/// whole file; nothing is imported from a file that does not parse.
pub fn parse_csv(csv_text: &str) -> Result<Vec<ImportRow>, ImportError> {
    // Strip UTF-8 BOM if present
    let text = csv_text.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ImportError::Parse(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(ImportError::Empty);
    }
    check_unique_columns(&headers)?;
    check_required_columns(&headers)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| ImportError::Parse(describe_csv_error(&e)))?;
        let row: ImportRow = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(ImportError::Empty);
    }

    tracing::info!("Parsed {} CSV rows with headers {:?}", rows.len(), headers);
    Ok(rows)
}

fn check_unique_columns(headers: &[String]) -> Result<(), ImportError> {
    for (i, header) in headers.iter().enumerate() {
        if headers[..i].iter().any(|h| h.eq_ignore_ascii_case(header)) {
            return Err(ImportError::Parse(format!("duplicate column '{}'", header)));
        }
    }

    let component_columns: Vec<&String> = headers
        .iter()
        .filter(|h| columns::COMPONENT.iter().any(|n| h.eq_ignore_ascii_case(n)))
        .collect();
    if component_columns.len() > 1 {
        return Err(ImportError::Parse(format!(
            "only one component column is allowed, found {:?}",
            component_columns
        )));
    }
    Ok(())
}

fn check_required_columns(headers: &[String]) -> Result<(), ImportError> {
    let has = |names: &[&str]| {
        headers
            .iter()
            .any(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
    };

    let mut missing = Vec::new();
    if !has(columns::COMPONENT) {
        missing.push(columns::COMPONENT[0].to_string());
    }
    for name in [columns::TEST_DATE, columns::INSPECTOR, columns::READING_VALUE] {
        if !has(&[name]) {
            missing.push(name.to_string());
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ImportError::MissingColumns(missing))
    }
}

fn describe_csv_error(e: &csv::Error) -> String {
    match e.position() {
        Some(pos) => format!("line {}: {}", pos.line(), e),
        None => e.to_string(),
    }
}
