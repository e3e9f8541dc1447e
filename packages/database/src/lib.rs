#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! `DuckDB` store for the collision dashboard.
//!
//! Registers the downloaded dataset file as an in-memory `collisions`
//! view with the derived `hour` and `person_age_group` columns, loads
//! the distinct-value vocabulary at startup, and renders [`Predicate`]
//! trees into parameterized SQL fragments. This is the only crate that
//! speaks SQL; user-supplied values always travel as bound parameters,
//! never as spliced text.
//!
//! [`Predicate`]: collision_dash_query_models::Predicate

pub mod sql;
pub mod store;
pub mod vocabulary;

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Database query error.
    #[error("Database error: {0}")]
    Database(#[from] duckdb::Error),

    /// The dataset file does not exist at the configured path.
    #[error("Dataset file not found: {path}")]
    DatasetMissing {
        /// Configured dataset path.
        path: String,
    },

    /// The dataset file extension is neither `.parquet` nor `.csv`.
    #[error("Unsupported dataset format: {path} (expected .parquet or .csv)")]
    UnsupportedFormat {
        /// Configured dataset path.
        path: String,
    },
}
