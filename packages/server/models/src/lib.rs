#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! API request and response types for the collision dashboard server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the core query types to allow independent evolution of the API
//! contract.

use collision_dash_query_models::FilterSelection;
use collision_dash_reports_models::Report;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Dropdown option lists for the filter UI, built from the vocabulary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Distinct boroughs.
    pub boroughs: Vec<String>,
    /// Distinct crash years.
    pub years: Vec<i32>,
    /// Distinct vehicle categories.
    pub vehicle_categories: Vec<String>,
    /// Distinct contributing factors.
    pub contributing_factors: Vec<String>,
    /// Distinct injury types.
    pub injury_types: Vec<String>,
}

/// Request body for the report endpoint: dropdown state plus search text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportRequest {
    /// Selected boroughs.
    pub boroughs: Vec<String>,
    /// Selected crash years.
    pub years: Vec<i32>,
    /// Selected vehicle categories.
    pub vehicle_categories: Vec<String>,
    /// Selected contributing factors.
    pub contributing_factors: Vec<String>,
    /// Selected injury types.
    pub injury_types: Vec<String>,
    /// Free-text search box contents.
    pub search_text: Option<String>,
}

impl From<ReportRequest> for FilterSelection {
    fn from(request: ReportRequest) -> Self {
        Self {
            boroughs: request.boroughs.into_iter().collect(),
            years: request.years.into_iter().collect(),
            vehicle_categories: request.vehicle_categories.into_iter().collect(),
            contributing_factors: request.contributing_factors.into_iter().collect(),
            injury_types: request.injury_types.into_iter().collect(),
            search_text: request.search_text,
        }
    }
}

/// Response body for the report endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    /// Whether the filters matched zero rows (explicit UI empty state).
    pub empty: bool,
    /// Human-readable diagnostics for dropped clauses and tokens.
    pub diagnostics: Vec<String>,
    /// The ten chart datasets plus the resolved metric.
    pub report: Report,
}
