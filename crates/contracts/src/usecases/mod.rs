pub mod u501_import_readings;
pub mod u502_export_components;
