use crate::domain::common::AggregateRoot;
use crate::shared::list_utils::{natural_compare, Searchable, Sortable};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ============================================================================
// ID Type
// ============================================================================
crate::integer_id!(ComponentId);

// ============================================================================
// Aggregate Root
// ============================================================================
/// A tracked piece of plant equipment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    pub drawing: String,
    /// Human-facing name, also the join key for reading imports
    pub name: String,
    pub unit: String,
    #[serde(default)]
    pub drawing_pdf_url: Option<String>,
}

impl Component {
    pub fn field_value(&self, field: ComponentField) -> &str {
        match field {
            ComponentField::Drawing => &self.drawing,
            ComponentField::Name => &self.name,
            ComponentField::Unit => &self.unit,
        }
    }

    pub fn has_drawing_pdf(&self) -> bool {
        self.drawing_pdf_url
            .as_deref()
            .map_or(false, |url| !url.trim().is_empty())
    }

    /// Banner caption, e.g. "LDAR-1 - V-101 (Unit 1)"
    pub fn caption(&self) -> String {
        format!("{} - {} ({})", self.drawing, self.name, self.unit)
    }
}

impl AggregateRoot for Component {
    type Id = ComponentId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn element_name() -> &'static str {
        "Component"
    }
}

impl Searchable for Component {
    fn matches_filter(&self, filter: &str) -> bool {
        ComponentField::ALL
            .iter()
            .any(|field| self.field_value(*field).to_lowercase().contains(filter))
    }
}

impl Sortable for Component {
    type Field = ComponentField;

    fn compare_by_field(&self, other: &Self, field: ComponentField) -> Ordering {
        natural_compare(self.field_value(field), other.field_value(field))
    }
}

// ============================================================================
// Fields
// ============================================================================
/// Searchable/sortable text fields of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentField {
    Drawing,
    #[serde(rename = "Component")]
    Name,
    Unit,
}

impl ComponentField {
    pub const ALL: [ComponentField; 3] = [
        ComponentField::Drawing,
        ComponentField::Name,
        ComponentField::Unit,
    ];

    /// Column label shown to users and used in CSV headers
    pub fn label(&self) -> &'static str {
        match self {
            ComponentField::Drawing => "Drawing",
            ComponentField::Name => "Component",
            ComponentField::Unit => "Unit",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.label().eq_ignore_ascii_case(s.trim()))
    }
}

// ============================================================================
// DTO
// ============================================================================
/// Editable fields of a component (add and edit forms)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentDto {
    pub drawing: String,
    pub name: String,
    pub unit: String,
}

impl ComponentDto {
    pub fn validate(&self) -> Result<(), String> {
        for field in ComponentField::ALL {
            if self.value(field).trim().is_empty() {
                return Err(format!("{} is required", field.label()));
            }
        }
        Ok(())
    }

    pub fn value(&self, field: ComponentField) -> &str {
        match field {
            ComponentField::Drawing => &self.drawing,
            ComponentField::Name => &self.name,
            ComponentField::Unit => &self.unit,
        }
    }

    /// Values as they are written to the store
    pub fn normalized(&self) -> Self {
        Self {
            drawing: self.drawing.trim().to_string(),
            name: self.name.trim().to_string(),
            unit: self.unit.trim().to_string(),
        }
    }
}

impl From<&Component> for ComponentDto {
    fn from(c: &Component) -> Self {
        Self {
            drawing: c.drawing.clone(),
            name: c.name.clone(),
            unit: c.unit.clone(),
        }
    }
}
