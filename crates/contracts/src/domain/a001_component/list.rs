use super::aggregate::{Component, ComponentField};
use crate::shared::list_utils::{filter_list, sort_list, SortDirection};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sort column and direction, written as "Component.asc" / "Drawing.desc"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSort {
    pub field: ComponentField,
    pub direction: SortDirection,
}

impl ComponentSort {
    pub fn new(field: ComponentField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

impl Default for ComponentSort {
    /// Lists open sorted by component name, ascending
    fn default() -> Self {
        Self::new(ComponentField::Name, SortDirection::Asc)
    }
}

impl fmt::Display for ComponentSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.field.label(), self.direction.as_str())
    }
}

impl FromStr for ComponentSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = s
            .split_once('.')
            .ok_or_else(|| format!("Invalid sort '{}', expected <Field>.<asc|desc>", s))?;
        let field = ComponentField::from_label(field)
            .ok_or_else(|| format!("Unknown sort field '{}'", field))?;
        let direction = SortDirection::from_str_opt(direction)
            .ok_or_else(|| format!("Unknown sort direction '{}'", direction))?;
        Ok(Self::new(field, direction))
    }
}

/// The filtered and sorted list last produced for display.
///
/// An empty value means "nothing matched", which is different from a list
/// that was never loaded (`Option::None` on the caller side).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayedComponents {
    pub items: Vec<Component>,
    /// Size of the list before filtering
    pub total: usize,
}

impl DisplayedComponents {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Component> {
        self.items.iter()
    }

    /// Message for an empty table
    pub fn empty_message(&self) -> Option<&'static str> {
        match (self.items.is_empty(), self.total) {
            (false, _) => None,
            (true, 0) => Some("No components found."),
            (true, _) => Some("No components match your search."),
        }
    }
}

/// Filters by search term over drawing, name and unit, then sorts.
/// The source list is left untouched.
pub fn apply_filter(
    components: &[Component],
    search_term: &str,
    sort: ComponentSort,
) -> DisplayedComponents {
    let mut items = filter_list(components, search_term);
    sort_list(&mut items, sort.field, sort.direction);
    DisplayedComponents {
        items,
        total: components.len(),
    }
}
