pub mod u501_import_readings;
