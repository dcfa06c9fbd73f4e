pub mod memory_store;
pub mod rest_store;
pub mod store;

#[cfg(test)]
pub mod test_support;

pub use store::{get_store, initialize_store, RecordStore, StoreError};
