#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Collision dataset taxonomy types.
//!
//! This crate defines the closed vocabularies of the collision dataset
//! that are known at compile time: the person types appearing in injury
//! counts, weekday encodings, the injury-count metric columns, and the
//! filterable / text-searchable column sets. The open vocabularies
//! (boroughs, vehicle categories, contributing factors, injury types)
//! are loaded from the dataset at startup and live in the query crate.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Multiplier applied to fatality counts when computing the severity
/// score (`injuries + WEIGHT * fatalities`).
pub const FATALITY_SEVERITY_WEIGHT: i64 = 5;

/// Person type involved in a collision, as recognized in search text.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PersonType {
    /// A pedestrian struck by a vehicle.
    Pedestrian,
    /// A cyclist involved in a collision.
    Cyclist,
    /// A vehicle occupant.
    Motorist,
}

impl PersonType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Pedestrian, Self::Cyclist, Self::Motorist]
    }

    /// Returns the dedicated injury-count column for this person type.
    #[must_use]
    pub const fn injury_metric(self) -> MetricColumn {
        match self {
            Self::Pedestrian => MetricColumn::PedestriansInjured,
            Self::Cyclist => MetricColumn::CyclistsInjured,
            Self::Motorist => MetricColumn::MotoristsInjured,
        }
    }
}

/// Injury-count metric column used by person-type-sensitive charts.
///
/// Defaults to the total across all person types; the metric resolver
/// narrows it when the search text unambiguously names one person type.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MetricColumn {
    /// Sum of pedestrian, cyclist, and motorist injuries.
    #[default]
    TotalInjuries,
    /// `number_of_pedestrians_injured`
    PedestriansInjured,
    /// `number_of_cyclist_injured`
    CyclistsInjured,
    /// `number_of_motorist_injured`
    MotoristsInjured,
}

impl MetricColumn {
    /// Returns the dataset expression that computes this metric for one row.
    ///
    /// The total is a sum over the three per-type columns; the others map
    /// directly to a dataset column.
    #[must_use]
    pub const fn dataset_expression(self) -> &'static str {
        match self {
            Self::TotalInjuries => {
                "number_of_pedestrians_injured \
                 + number_of_cyclist_injured \
                 + number_of_motorist_injured"
            }
            Self::PedestriansInjured => "number_of_pedestrians_injured",
            Self::CyclistsInjured => "number_of_cyclist_injured",
            Self::MotoristsInjured => "number_of_motorist_injured",
        }
    }
}

/// Day of week, encoded as Monday=0 through Sunday=6 in the dataset's
/// `crash_day_of_week` column.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Weekday {
    /// Monday (0)
    Monday,
    /// Tuesday (1)
    Tuesday,
    /// Wednesday (2)
    Wednesday,
    /// Thursday (3)
    Thursday,
    /// Friday (4)
    Friday,
    /// Saturday (5)
    Saturday,
    /// Sunday (6)
    Sunday,
}

impl Weekday {
    /// Returns all variants of this enum, Monday first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Monday,
            Self::Tuesday,
            Self::Wednesday,
            Self::Thursday,
            Self::Friday,
            Self::Saturday,
            Self::Sunday,
        ]
    }

    /// Returns the dataset encoding (Monday=0 .. Sunday=6).
    #[must_use]
    pub const fn index(self) -> i64 {
        self as i64
    }

    /// Returns the three-letter chart label (`Mon` .. `Sun`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Monday => "Mon",
            Self::Tuesday => "Tue",
            Self::Wednesday => "Wed",
            Self::Thursday => "Thu",
            Self::Friday => "Fri",
            Self::Saturday => "Sat",
            Self::Sunday => "Sun",
        }
    }

    /// Looks up a weekday from its dataset encoding.
    #[must_use]
    pub const fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Self::Monday),
            1 => Some(Self::Tuesday),
            2 => Some(Self::Wednesday),
            3 => Some(Self::Thursday),
            4 => Some(Self::Friday),
            5 => Some(Self::Saturday),
            6 => Some(Self::Sunday),
            _ => None,
        }
    }

    /// Parses a lowercased token as a full weekday name or a three-letter
    /// abbreviation.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "monday" | "mon" => Some(Self::Monday),
            "tuesday" | "tue" => Some(Self::Tuesday),
            "wednesday" | "wed" => Some(Self::Wednesday),
            "thursday" | "thu" => Some(Self::Thursday),
            "friday" | "fri" => Some(Self::Friday),
            "saturday" | "sat" => Some(Self::Saturday),
            "sunday" | "sun" => Some(Self::Sunday),
            _ => None,
        }
    }
}

/// Columns that accept an `IN (values)` restriction built from dropdown
/// selections and classified search tokens.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FilterColumn {
    /// Borough where the collision occurred.
    Borough,
    /// Four-digit crash year.
    CrashYear,
    /// Normalized vehicle category.
    VehicleCategory,
    /// Combined contributing factor.
    ContributingFactor,
    /// Person injury outcome.
    InjuryType,
    /// Day of week (Monday=0 .. Sunday=6).
    CrashWeekday,
}

impl FilterColumn {
    /// Returns the physical dataset column backing this filter.
    #[must_use]
    pub const fn dataset_column(self) -> &'static str {
        match self {
            Self::Borough => "borough",
            Self::CrashYear => "crash_year",
            Self::VehicleCategory => "vehicle_category",
            Self::ContributingFactor => "contributing_factor_combined",
            Self::InjuryType => "person_injury",
            Self::CrashWeekday => "crash_day_of_week",
        }
    }
}

/// Dataset columns searched by the residual free-text clause.
///
/// Each unrecognized search term produces one case-insensitive substring
/// match OR'd across this fixed set.
pub const TEXT_SEARCH_COLUMNS: &[&str] = &[
    "borough",
    "on_street_name",
    "vehicle_category",
    "person_type",
    "person_injury",
    "contributing_factor_combined",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_type_parses_lowercase() {
        assert_eq!("cyclist".parse::<PersonType>().ok(), Some(PersonType::Cyclist));
        assert!("driver".parse::<PersonType>().is_err());
    }

    #[test]
    fn person_type_maps_to_injury_metric() {
        assert_eq!(
            PersonType::Pedestrian.injury_metric(),
            MetricColumn::PedestriansInjured
        );
        assert_eq!(
            PersonType::Motorist.injury_metric(),
            MetricColumn::MotoristsInjured
        );
    }

    #[test]
    fn metric_defaults_to_total() {
        assert_eq!(MetricColumn::default(), MetricColumn::TotalInjuries);
    }

    #[test]
    fn weekday_indices_are_monday_zero() {
        assert_eq!(Weekday::Monday.index(), 0);
        assert_eq!(Weekday::Sunday.index(), 6);
        assert_eq!(Weekday::from_index(3), Some(Weekday::Thursday));
        assert_eq!(Weekday::from_index(7), None);
    }

    #[test]
    fn weekday_parses_full_and_abbreviated() {
        assert_eq!(Weekday::from_token("wednesday"), Some(Weekday::Wednesday));
        assert_eq!(Weekday::from_token("wed"), Some(Weekday::Wednesday));
        assert_eq!(Weekday::from_token("weds"), None);
    }

    #[test]
    fn filter_columns_map_to_dataset_columns() {
        assert_eq!(FilterColumn::Borough.dataset_column(), "borough");
        assert_eq!(
            FilterColumn::ContributingFactor.dataset_column(),
            "contributing_factor_combined"
        );
        assert_eq!(FilterColumn::InjuryType.dataset_column(), "person_injury");
    }
}
