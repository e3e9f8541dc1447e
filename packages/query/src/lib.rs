#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Query predicate builder for the collision dashboard.
//!
//! Turns raw UI filter state (dropdown selections plus a free-text search
//! box) into a canonical, injection-safe [`Predicate`] and a resolved
//! injury-count metric. The pipeline is classify → build → resolve; it is
//! pure, reads only the immutable [`Vocabulary`], and never raises for
//! malformed user input — bad values degrade to diagnostics and
//! broader-than-intended free-text matching.
//!
//! [`Predicate`]: collision_dash_query_models::Predicate

pub mod builder;
pub mod classify;
pub mod metric;
pub mod vocabulary;

pub use builder::{build_predicate, plan_report};
pub use classify::classify;
pub use metric::resolve_metric;
pub use vocabulary::Vocabulary;
