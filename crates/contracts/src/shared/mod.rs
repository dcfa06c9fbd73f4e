pub mod list_utils;
