//! rental-cleaner: basic cleaning step for the NYC rental price pipeline.
//!
//! Downloads the raw listings artifact from the tracking store, drops price
//! outliers and rows outside the NYC bounding box, normalizes the
//! `last_review` column, and publishes the cleaned dataset as a new artifact.

// Core modules
pub mod clean;
pub mod cli;
pub mod error;
pub mod store;
pub mod table;

// Re-export commonly used error types
pub use error::{StoreError, TableError};
