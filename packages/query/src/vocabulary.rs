//! Distinct-value vocabularies for the filterable columns.
//!
//! Built once at startup from five DISTINCT queries against the dataset
//! and immutable afterwards. Used both to populate the UI dropdowns and
//! to whitelist every string value before it can enter a predicate.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use collision_dash_collision_models::FilterColumn;

/// A sorted, deduplicated value list with case-insensitive lookup that
/// returns the canonical (dataset) spelling.
#[derive(Debug, Clone, Default)]
pub struct ValueSet {
    values: Vec<String>,
    by_lower: BTreeMap<String, usize>,
}

impl ValueSet {
    /// Builds a value set from raw dataset values, dropping duplicates and
    /// sorting. When two values collide case-insensitively the first in
    /// sorted order wins.
    #[must_use]
    pub fn new(values: Vec<String>) -> Self {
        let unique: BTreeSet<String> = values.into_iter().collect();
        let values: Vec<String> = unique.into_iter().collect();
        let mut by_lower = BTreeMap::new();
        for (i, value) in values.iter().enumerate() {
            by_lower.entry(value.to_lowercase()).or_insert(i);
        }
        Self { values, by_lower }
    }

    /// Resolves a user-supplied value to its canonical spelling, ignoring
    /// case. Returns `None` for values not in the vocabulary.
    #[must_use]
    pub fn resolve(&self, value: &str) -> Option<&str> {
        self.by_lower
            .get(&value.trim().to_lowercase())
            .map(|&i| self.values[i].as_str())
    }

    /// Returns the canonical values in sorted order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Returns `true` if the vocabulary has no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Process-wide, read-only vocabulary of distinct filterable values.
///
/// Constructed once at boot (before the server accepts requests) and
/// passed by reference into the classifier and builder; rebuilt only on
/// process restart since the dataset is static per deployment.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    boroughs: ValueSet,
    years: BTreeSet<i32>,
    vehicle_categories: ValueSet,
    contributing_factors: ValueSet,
    injury_types: ValueSet,
}

impl Vocabulary {
    /// Builds a vocabulary from the five distinct-value lists loaded from
    /// the dataset. Empty lists are valid and simply match nothing.
    #[must_use]
    pub fn new(
        boroughs: Vec<String>,
        years: Vec<i32>,
        vehicle_categories: Vec<String>,
        contributing_factors: Vec<String>,
        injury_types: Vec<String>,
    ) -> Self {
        Self {
            boroughs: ValueSet::new(boroughs),
            years: years.into_iter().collect(),
            vehicle_categories: ValueSet::new(vehicle_categories),
            contributing_factors: ValueSet::new(contributing_factors),
            injury_types: ValueSet::new(injury_types),
        }
    }

    /// Returns the value set backing a string filter column.
    ///
    /// # Panics
    ///
    /// Panics if called with [`FilterColumn::CrashYear`] or
    /// [`FilterColumn::CrashWeekday`], which are not string vocabularies.
    #[must_use]
    pub fn values_for(&self, column: FilterColumn) -> &ValueSet {
        match column {
            FilterColumn::Borough => &self.boroughs,
            FilterColumn::VehicleCategory => &self.vehicle_categories,
            FilterColumn::ContributingFactor => &self.contributing_factors,
            FilterColumn::InjuryType => &self.injury_types,
            FilterColumn::CrashYear | FilterColumn::CrashWeekday => {
                panic!("{column} is not a string vocabulary column")
            }
        }
    }

    /// Returns the distinct crash years present in the dataset, sorted.
    #[must_use]
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.iter().copied()
    }
}
