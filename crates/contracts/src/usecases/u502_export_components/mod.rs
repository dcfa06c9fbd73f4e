//! CSV export of the displayed component list

use crate::domain::a001_component::{ComponentField, DisplayedComponents};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const EXPORT_FILE_NAME: &str = "components_export.csv";
pub const EXPORT_MIME_TYPE: &str = "text/csv";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// Export is refused rather than producing a header-only file
    #[error("There are no components to export.")]
    NothingToExport,
}

/// A ready-to-download file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFile {
    pub file_name: String,
    pub mime_type: String,
    pub content: String,
}

impl ExportFile {
    pub fn into_bytes(self) -> Vec<u8> {
        self.content.into_bytes()
    }
}

/// Serializes the displayed components as
/// `Drawing,Component,Unit` followed by one fully quoted row per component.
pub fn export_components_csv(list: &DisplayedComponents) -> Result<ExportFile, ExportError> {
    if list.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let header = ComponentField::ALL
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(",");

    let mut lines = Vec::with_capacity(list.len() + 1);
    lines.push(header);
    for component in list.iter() {
        let row = ComponentField::ALL
            .iter()
            .map(|field| quote_csv_cell(component.field_value(*field)))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(row);
    }

    Ok(ExportFile {
        file_name: EXPORT_FILE_NAME.to_string(),
        mime_type: EXPORT_MIME_TYPE.to_string(),
        content: lines.join("\n"),
    })
}

/// Wraps the cell in quotes, doubling any quotes inside
fn quote_csv_cell(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_component::{Component, ComponentId};

    fn displayed(items: Vec<Component>) -> DisplayedComponents {
        DisplayedComponents {
            total: items.len(),
            items,
        }
    }

    fn component(drawing: &str, name: &str, unit: &str) -> Component {
        Component {
            id: ComponentId(1),
            drawing: drawing.into(),
            name: name.into(),
            unit: unit.into(),
            drawing_pdf_url: None,
        }
    }

    #[test]
    fn test_empty_list_is_refused() {
        let result = export_components_csv(&DisplayedComponents::default());
        assert_eq!(result, Err(ExportError::NothingToExport));
        assert_eq!(
            ExportError::NothingToExport.to_string(),
            "There are no components to export."
        );
    }

    #[test]
    fn test_single_component() {
        let file = export_components_csv(&displayed(vec![component("D1", "V-101", "U1")])).unwrap();
        assert_eq!(file.content, "Drawing,Component,Unit\n\"D1\",\"V-101\",\"U1\"");
        assert_eq!(file.file_name, "components_export.csv");
        assert_eq!(file.mime_type, "text/csv");
    }

    #[test]
    fn test_quotes_are_escaped() {
        let file =
            export_components_csv(&displayed(vec![component("D \"A\"", "V,1", "U1")])).unwrap();
        let lines: Vec<&str> = file.content.lines().collect();
        assert_eq!(lines[1], "\"D \"\"A\"\"\",\"V,1\",\"U1\"");
    }

    #[test]
    fn test_rows_keep_display_order() {
        let list = displayed(vec![
            component("D2", "V-2", "U"),
            component("D1", "V-1", "U"),
        ]);
        let file = export_components_csv(&list).unwrap();
        assert_eq!(file.content.lines().count(), 3);
        assert!(file.content.ends_with("\"D1\",\"V-1\",\"U\""));
    }
}
