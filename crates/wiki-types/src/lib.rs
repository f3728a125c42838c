//! Types shared between the storage layer and the HTTP layer.

pub mod api;
pub mod models;
pub mod outcome;

pub use outcome::{RegisterOutcome, WriteOutcome};
