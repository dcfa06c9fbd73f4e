pub mod aggregate;

pub use aggregate::{Reading, ReadingDto, ReadingId};
