//! Shared data types for the Tower of Cash engine.
//!
//! Everything in this crate is plain data: the amount taxonomy, the floor
//! catalogs, the Mystery Box item pools, configuration and player records.
//! Game logic lives in `towercash-execution`.

pub mod tower;

pub use tower::*;
