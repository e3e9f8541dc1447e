#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Data model for turning UI filter state into a canonical predicate.
//!
//! [`FilterSelection`] is what the UI sends per report request,
//! [`ParsedQuery`] is the classified view of the free-text search box,
//! and [`Predicate`] is the engine-agnostic filter tree handed to the
//! aggregation layer. None of these types know any SQL; rendering with
//! parameter binding lives in the database crate.

use std::collections::BTreeSet;

use collision_dash_collision_models::{FilterColumn, MetricColumn, PersonType, Weekday};
use serde::{Deserialize, Serialize};

/// Raw filter state for one report-generation request.
///
/// Dropdown selections are sets of strings/integers; `search_text` is the
/// free-text search box. Values are untrusted until validated against the
/// vocabulary by the predicate builder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSelection {
    /// Selected boroughs.
    pub boroughs: BTreeSet<String>,
    /// Selected crash years.
    pub years: BTreeSet<i32>,
    /// Selected vehicle categories.
    pub vehicle_categories: BTreeSet<String>,
    /// Selected contributing factors.
    pub contributing_factors: BTreeSet<String>,
    /// Selected injury types.
    pub injury_types: BTreeSet<String>,
    /// Free-text search box contents.
    pub search_text: Option<String>,
}

impl FilterSelection {
    /// Returns the trimmed search text, treating empty/whitespace-only
    /// input as absent.
    #[must_use]
    pub fn search_text(&self) -> Option<&str> {
        self.search_text
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Classified view of the free-text search box.
///
/// Every input token lands in exactly one bucket; anything unrecognized
/// ends up in `free_text_terms`. Recomputed per request, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParsedQuery {
    /// Four-digit years recognized in the search text.
    pub years: BTreeSet<i32>,
    /// Borough names recognized against the vocabulary (canonical spelling).
    pub boroughs: BTreeSet<String>,
    /// Vehicle categories recognized against the vocabulary.
    pub vehicle_categories: BTreeSet<String>,
    /// Injury types recognized against the vocabulary.
    pub injury_types: BTreeSet<String>,
    /// Person types recognized from the fixed set.
    pub person_types: BTreeSet<PersonType>,
    /// Weekdays recognized from full names or three-letter abbreviations.
    pub weekdays: BTreeSet<Weekday>,
    /// Contributing factors recognized against the vocabulary.
    pub contributing_factors: BTreeSet<String>,
    /// Tokens that matched no category, in input order.
    pub free_text_terms: Vec<String>,
}

impl ParsedQuery {
    /// Returns `true` if no token was classified into any bucket.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
            && self.boroughs.is_empty()
            && self.vehicle_categories.is_empty()
            && self.injury_types.is_empty()
            && self.person_types.is_empty()
            && self.weekdays.is_empty()
            && self.contributing_factors.is_empty()
            && self.free_text_terms.is_empty()
    }
}

/// One conjunct of a [`Predicate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Clause {
    /// Column must take one of the whitelisted string values.
    StringIn {
        /// Restricted column.
        column: FilterColumn,
        /// Vocabulary-validated values, sorted and deduplicated.
        values: Vec<String>,
    },
    /// Crash year must be one of the given years.
    YearIn {
        /// Selected years, sorted and deduplicated.
        years: Vec<i32>,
    },
    /// Crash weekday must be one of the given days (Monday=0 .. Sunday=6).
    WeekdayIn {
        /// Selected weekdays, sorted and deduplicated.
        days: Vec<Weekday>,
    },
    /// One residual search term matched case-insensitively as a substring
    /// across the fixed text-column set.
    Contains {
        /// The unrecognized search term, lowercased.
        term: String,
    },
}

/// Canonical filter predicate: a conjunction of [`Clause`]s.
///
/// Zero clauses means "match all rows", never an empty result set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    /// AND-combined clauses.
    pub clauses: Vec<Clause>,
}

impl Predicate {
    /// Returns `true` when the predicate places no restriction on rows.
    #[must_use]
    pub fn is_match_all(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// A recoverable per-clause problem recorded while building a predicate.
///
/// Diagnostics never abort the request; the offending clause or token is
/// dropped and the rest of the predicate is built normally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Diagnostic {
    /// An explicit filter value was not found in the cached vocabulary.
    #[error("unknown {column} value {value:?}: clause value dropped")]
    UnknownVocabularyValue {
        /// Column the value was selected for.
        column: FilterColumn,
        /// The rejected value.
        value: String,
    },
    /// A token matched the year pattern but failed integer conversion.
    #[error("malformed year token {token:?}: dropped")]
    MalformedYearToken {
        /// The rejected token.
        token: String,
    },
}

/// Output of the predicate builder for one report request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPlan {
    /// Canonical filter predicate.
    pub predicate: Predicate,
    /// Resolved injury-count metric for person-type-sensitive charts.
    pub metric: MetricColumn,
    /// Recoverable problems encountered while building.
    pub diagnostics: Vec<Diagnostic>,
}
