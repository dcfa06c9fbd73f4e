use crate::domain::a001_component::ComponentId;
use crate::domain::common::AggregateRoot;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================
crate::integer_id!(ReadingId);

// ============================================================================
// Aggregate Root
// ============================================================================
/// One inspection measurement of a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: ReadingId,
    pub component_id: ComponentId,
    pub test_date: NaiveDate,
    pub inspector: String,
    pub reading_value: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl AggregateRoot for Reading {
    type Id = ReadingId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn element_name() -> &'static str {
        "Reading"
    }
}

// ============================================================================
// DTO
// ============================================================================
/// Fields of a reading as written by forms and imports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingDto {
    pub component_id: ComponentId,
    pub test_date: NaiveDate,
    pub inspector: String,
    pub reading_value: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ReadingDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.inspector.trim().is_empty() {
            return Err("Inspector is required".into());
        }
        if !self.reading_value.is_finite() {
            return Err(format!(
                "Reading value must be a finite number, got {}",
                self.reading_value
            ));
        }
        Ok(())
    }

    /// Trims text and turns blank notes into `None`
    pub fn normalized(&self) -> Self {
        Self {
            component_id: self.component_id,
            test_date: self.test_date,
            inspector: self.inspector.trim().to_string(),
            reading_value: self.reading_value,
            notes: normalize_notes(self.notes.as_deref()),
        }
    }
}

impl From<&Reading> for ReadingDto {
    fn from(r: &Reading) -> Self {
        Self {
            component_id: r.component_id,
            test_date: r.test_date,
            inspector: r.inspector.clone(),
            reading_value: r.reading_value,
            notes: r.notes.clone(),
        }
    }
}

pub fn normalize_notes(notes: Option<&str>) -> Option<String> {
    notes
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> ReadingDto {
        ReadingDto {
            component_id: ComponentId(1),
            test_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            inspector: "J. Smith".into(),
            reading_value: 12.5,
            notes: Some("  ".into()),
        }
    }

    #[test]
    fn test_validate() {
        assert!(dto().validate().is_ok());

        let mut bad = dto();
        bad.inspector = " ".into();
        assert!(bad.validate().is_err());

        let mut nan = dto();
        nan.reading_value = f64::NAN;
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_normalized_drops_blank_notes() {
        assert_eq!(dto().normalized().notes, None);
        assert_eq!(normalize_notes(Some(" leak at flange ")), Some("leak at flange".into()));
    }

    #[test]
    fn test_date_serializes_as_iso() {
        let json = serde_json::to_value(dto()).unwrap();
        assert_eq!(json["test_date"], "2024-03-15");
        assert_eq!(json["component_id"], 1);
    }
}
