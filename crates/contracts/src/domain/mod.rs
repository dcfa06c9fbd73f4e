pub mod a001_component;
pub mod a002_reading;
pub mod common;
