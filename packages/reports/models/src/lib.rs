#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Typed rows for the ten dashboard charts and the report container.
//!
//! These are the shapes handed to the charting layer; this repo returns
//! chart data, never rendered figures.

use collision_dash_collision_models::MetricColumn;
use serde::{Deserialize, Serialize};

/// One point of the injuries-by-year-and-borough trend line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Crash year.
    pub crash_year: i32,
    /// Borough name.
    pub borough: String,
    /// Total injuries across person types.
    pub total_injuries: i64,
}

/// One bar of the top-contributing-factors chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorCount {
    /// Contributing factor label.
    pub factor: String,
    /// Number of matching rows.
    pub count: i64,
}

/// One bar of the injuries-by-borough chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoroughInjuries {
    /// Borough name.
    pub borough: String,
    /// Total injuries across person types.
    pub injuries: i64,
}

/// One point of the crashes-by-weekday line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayCount {
    /// Three-letter weekday label, or `Unknown`.
    pub day: String,
    /// Number of matching rows.
    pub crashes: i64,
}

/// One bar of the severity-by-vehicle-category chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSeverity {
    /// Vehicle category label.
    pub vehicle_category: String,
    /// Severity score (injuries plus weighted fatalities).
    pub severity: i64,
}

/// One bar of the crashes-by-person-sex chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SexCount {
    /// Person sex label, or `Unknown`.
    pub sex: String,
    /// Number of matching rows.
    pub crashes: i64,
}

/// One point of the average-injuries-per-hour line for the resolved
/// metric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyAverage {
    /// Hour of day, 0..=23.
    pub hour: i32,
    /// Average of the metric column per matching row.
    pub average: f64,
}

/// One cell of the severity heatmap (vehicle category x hour).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    /// Vehicle category label.
    pub vehicle_category: String,
    /// Hour of day, 0..=23.
    pub hour: i32,
    /// Average severity score.
    pub severity: f64,
}

/// One bar of the top-streets-by-severity chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreetSeverity {
    /// Street name.
    pub street: String,
    /// Severity score (injuries plus weighted fatalities).
    pub severity: i64,
}

/// One bar of the age-group breakdown chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeGroupCount {
    /// Derived age bucket label.
    pub age_group: String,
    /// Person type label, or `Unknown`.
    pub person_type: String,
    /// Injury outcome label, or `Unknown`.
    pub injury: String,
    /// Number of matching rows.
    pub count: i64,
}

/// The ten chart datasets for one report request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Number of dataset rows matching the predicate.
    pub matching_rows: i64,
    /// Metric column used by the person-type-sensitive charts.
    pub metric: MetricColumn,
    /// Injuries by year and borough.
    pub injury_trend: Vec<TrendPoint>,
    /// Top 10 contributing factors.
    pub top_factors: Vec<FactorCount>,
    /// Injuries by borough.
    pub borough_injuries: Vec<BoroughInjuries>,
    /// Crashes by day of week.
    pub weekday_crashes: Vec<WeekdayCount>,
    /// Severity score by vehicle category.
    pub vehicle_severity: Vec<VehicleSeverity>,
    /// Crashes by person sex.
    pub sex_counts: Vec<SexCount>,
    /// Average metric value per hour of day.
    pub hourly_averages: Vec<HourlyAverage>,
    /// Average severity by vehicle category and hour.
    pub severity_heatmap: Vec<HeatmapCell>,
    /// Top 15 streets by severity score.
    pub street_severity: Vec<StreetSeverity>,
    /// Age group x person type x injury outcome counts.
    pub age_groups: Vec<AgeGroupCount>,
}

impl Report {
    /// Builds the explicit empty-state report for a predicate that
    /// matched zero rows. Not an error; the UI renders it as a "no data
    /// for current filters" state.
    #[must_use]
    pub const fn empty(metric: MetricColumn) -> Self {
        Self {
            matching_rows: 0,
            metric,
            injury_trend: Vec::new(),
            top_factors: Vec::new(),
            borough_injuries: Vec::new(),
            weekday_crashes: Vec::new(),
            vehicle_severity: Vec::new(),
            sex_counts: Vec::new(),
            hourly_averages: Vec::new(),
            severity_heatmap: Vec::new(),
            street_severity: Vec::new(),
            age_groups: Vec::new(),
        }
    }

    /// Returns `true` when the predicate matched no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.matching_rows == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_carries_metric_and_flag() {
        let report = Report::empty(MetricColumn::CyclistsInjured);
        assert!(report.is_empty());
        assert_eq!(report.metric, MetricColumn::CyclistsInjured);
        assert!(report.injury_trend.is_empty());
    }
}
