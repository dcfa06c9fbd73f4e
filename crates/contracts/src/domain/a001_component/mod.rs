pub mod aggregate;
pub mod list;

pub use aggregate::{Component, ComponentDto, ComponentField, ComponentId};
pub use list::{apply_filter, ComponentSort, DisplayedComponents};
