//! Shared types and pure logic for the component tracker.
//!
//! Nothing in this crate talks to the store: it is safe to use from any UI
//! layer as well as from the backend.

pub mod domain;
pub mod shared;
pub mod usecases;
