#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Aggregation executor for the collision dashboard.
//!
//! Runs the ten templated aggregate queries behind the dashboard charts,
//! all sharing the one rendered filter from the predicate builder. Every
//! query appends the same parameterized `WHERE` fragment; charts that
//! also constrain derived columns add their conjunct through the
//! renderer instead of pasting onto the fragment by hand.

use collision_dash_collision_models::{FATALITY_SEVERITY_WEIGHT, MetricColumn, Weekday};
use collision_dash_database::sql::{self, SqlFilter};
use collision_dash_query_models::ReportPlan;
use collision_dash_reports_models::{
    AgeGroupCount, BoroughInjuries, FactorCount, HeatmapCell, HourlyAverage, Report, SexCount,
    StreetSeverity, TrendPoint, VehicleSeverity, WeekdayCount,
};
use duckdb::{Connection, Row, params_from_iter};

/// Errors that can occur while executing report queries.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Database query error.
    #[error("Database error: {0}")]
    Database(#[from] duckdb::Error),
}

/// Per-row severity score: injuries plus weighted fatalities.
fn severity_expression() -> String {
    format!(
        "number_of_pedestrians_injured + number_of_cyclist_injured \
         + number_of_motorist_injured + {FATALITY_SEVERITY_WEIGHT} * \
         (number_of_pedestrians_killed + number_of_cyclist_killed \
         + number_of_motorist_killed)"
    )
}

/// Runs all ten chart queries for one report request.
///
/// A predicate that matches zero rows short-circuits into the explicit
/// empty-state report rather than running ten queries over nothing.
///
/// # Errors
///
/// Returns [`ReportError`] if any query fails.
pub fn run_report(conn: &Connection, plan: &ReportPlan) -> Result<Report, ReportError> {
    let filter = sql::render(&plan.predicate);

    let matching_rows = count_matching_rows(conn, &filter)?;
    if matching_rows == 0 {
        log::info!("report predicate matched no rows, returning empty state");
        return Ok(Report::empty(plan.metric));
    }

    // The two hour-bucketed charts constrain the derived hour column on
    // top of the user's filter.
    let hour_filter = sql::render_with(&plan.predicate, &["hour BETWEEN 0 AND 23"]);
    let street_filter = sql::render_with(&plan.predicate, &["on_street_name IS NOT NULL"]);
    let year_filter = sql::render_with(&plan.predicate, &["crash_year IS NOT NULL"]);

    Ok(Report {
        matching_rows,
        metric: plan.metric,
        injury_trend: injury_trend(conn, &year_filter)?,
        top_factors: top_factors(conn, &filter)?,
        borough_injuries: borough_injuries(conn, &filter)?,
        weekday_crashes: weekday_crashes(conn, &filter)?,
        vehicle_severity: vehicle_severity(conn, &filter)?,
        sex_counts: sex_counts(conn, &filter)?,
        hourly_averages: hourly_averages(conn, &hour_filter, plan.metric)?,
        severity_heatmap: severity_heatmap(conn, &hour_filter)?,
        street_severity: street_severity(conn, &street_filter)?,
        age_groups: age_groups(conn, &filter)?,
    })
}

/// Counts the dataset rows matching the filter.
///
/// # Errors
///
/// Returns [`ReportError`] if the query fails.
pub fn count_matching_rows(conn: &Connection, filter: &SqlFilter) -> Result<i64, ReportError> {
    let sql = format!("SELECT COUNT(*) FROM collisions{}", filter.where_sql());
    let count = conn.query_row(&sql, params_from_iter(filter.params()), |row| {
        row.get::<_, i64>(0)
    })?;
    Ok(count)
}

fn query_rows<T>(
    conn: &Connection,
    sql: &str,
    filter: &SqlFilter,
    map_row: impl Fn(&Row<'_>) -> duckdb::Result<T>,
) -> Result<Vec<T>, ReportError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params_from_iter(filter.params()), map_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Total injuries by crash year and borough.
fn injury_trend(conn: &Connection, filter: &SqlFilter) -> Result<Vec<TrendPoint>, ReportError> {
    let injuries = MetricColumn::TotalInjuries.dataset_expression();
    let sql = format!(
        "SELECT TRY_CAST(crash_year AS INTEGER) AS crash_year,
                COALESCE(CAST(borough AS VARCHAR), 'Unknown') AS borough,
                CAST(COALESCE(SUM({injuries}), 0) AS BIGINT) AS total_injuries
         FROM collisions{}
         GROUP BY 1, 2
         ORDER BY 1, 2",
        filter.where_sql()
    );
    query_rows(conn, &sql, filter, |row| {
        Ok(TrendPoint {
            crash_year: row.get(0)?,
            borough: row.get(1)?,
            total_injuries: row.get(2)?,
        })
    })
}

/// Top 10 contributing factors by row count.
fn top_factors(conn: &Connection, filter: &SqlFilter) -> Result<Vec<FactorCount>, ReportError> {
    let sql = format!(
        "SELECT COALESCE(CAST(contributing_factor_combined AS VARCHAR), 'Unknown') AS factor,
                COUNT(*) AS count
         FROM collisions{}
         GROUP BY 1
         ORDER BY count DESC, factor
         LIMIT 10",
        filter.where_sql()
    );
    query_rows(conn, &sql, filter, |row| {
        Ok(FactorCount {
            factor: row.get(0)?,
            count: row.get(1)?,
        })
    })
}

/// Total injuries by borough.
fn borough_injuries(
    conn: &Connection,
    filter: &SqlFilter,
) -> Result<Vec<BoroughInjuries>, ReportError> {
    let injuries = MetricColumn::TotalInjuries.dataset_expression();
    let sql = format!(
        "SELECT COALESCE(CAST(borough AS VARCHAR), 'Unknown') AS borough,
                CAST(COALESCE(SUM({injuries}), 0) AS BIGINT) AS injuries
         FROM collisions{}
         GROUP BY 1
         ORDER BY 1",
        filter.where_sql()
    );
    query_rows(conn, &sql, filter, |row| {
        Ok(BoroughInjuries {
            borough: row.get(0)?,
            injuries: row.get(1)?,
        })
    })
}

/// Crash counts by day of week, labeled `Mon`..`Sun` with an `Unknown`
/// bucket for unencodable values.
fn weekday_crashes(conn: &Connection, filter: &SqlFilter) -> Result<Vec<WeekdayCount>, ReportError> {
    let sql = format!(
        "SELECT TRY_CAST(crash_day_of_week AS INTEGER) AS dow, COUNT(*) AS crashes
         FROM collisions{}
         GROUP BY 1
         ORDER BY 1",
        filter.where_sql()
    );
    query_rows(conn, &sql, filter, |row| {
        let dow: Option<i64> = row.get(0)?;
        let day = dow
            .and_then(Weekday::from_index)
            .map_or("Unknown", Weekday::label);
        Ok(WeekdayCount {
            day: day.to_string(),
            crashes: row.get(1)?,
        })
    })
}

/// Severity score by vehicle category.
fn vehicle_severity(
    conn: &Connection,
    filter: &SqlFilter,
) -> Result<Vec<VehicleSeverity>, ReportError> {
    let severity = severity_expression();
    let sql = format!(
        "SELECT COALESCE(CAST(vehicle_category AS VARCHAR), 'Unknown') AS vehicle_category,
                CAST(COALESCE(SUM({severity}), 0) AS BIGINT) AS severity
         FROM collisions{}
         GROUP BY 1
         ORDER BY 1",
        filter.where_sql()
    );
    query_rows(conn, &sql, filter, |row| {
        Ok(VehicleSeverity {
            vehicle_category: row.get(0)?,
            severity: row.get(1)?,
        })
    })
}

/// Crash counts by person sex.
fn sex_counts(conn: &Connection, filter: &SqlFilter) -> Result<Vec<SexCount>, ReportError> {
    let sql = format!(
        "SELECT COALESCE(CAST(person_sex AS VARCHAR), 'Unknown') AS sex, COUNT(*) AS crashes
         FROM collisions{}
         GROUP BY 1
         ORDER BY 1",
        filter.where_sql()
    );
    query_rows(conn, &sql, filter, |row| {
        Ok(SexCount {
            sex: row.get(0)?,
            crashes: row.get(1)?,
        })
    })
}

/// Average of the resolved metric column per hour of day.
fn hourly_averages(
    conn: &Connection,
    filter: &SqlFilter,
    metric: MetricColumn,
) -> Result<Vec<HourlyAverage>, ReportError> {
    let expression = metric.dataset_expression();
    let sql = format!(
        "SELECT hour, CAST(AVG({expression}) AS DOUBLE) AS average
         FROM collisions{}
         GROUP BY hour
         ORDER BY hour",
        filter.where_sql()
    );
    query_rows(conn, &sql, filter, |row| {
        Ok(HourlyAverage {
            hour: row.get(0)?,
            average: row.get(1)?,
        })
    })
}

/// Average severity by vehicle category and hour.
fn severity_heatmap(conn: &Connection, filter: &SqlFilter) -> Result<Vec<HeatmapCell>, ReportError> {
    let severity = severity_expression();
    let sql = format!(
        "SELECT COALESCE(CAST(vehicle_category AS VARCHAR), 'Unknown') AS vehicle_category,
                hour,
                CAST(AVG({severity}) AS DOUBLE) AS severity
         FROM collisions{}
         GROUP BY 1, 2
         ORDER BY 1, 2",
        filter.where_sql()
    );
    query_rows(conn, &sql, filter, |row| {
        Ok(HeatmapCell {
            vehicle_category: row.get(0)?,
            hour: row.get(1)?,
            severity: row.get(2)?,
        })
    })
}

/// Top 15 streets by severity score.
fn street_severity(
    conn: &Connection,
    filter: &SqlFilter,
) -> Result<Vec<StreetSeverity>, ReportError> {
    let severity = severity_expression();
    let sql = format!(
        "SELECT CAST(on_street_name AS VARCHAR) AS street,
                CAST(COALESCE(SUM({severity}), 0) AS BIGINT) AS severity
         FROM collisions{}
         GROUP BY 1
         ORDER BY severity DESC, street
         LIMIT 15",
        filter.where_sql()
    );
    query_rows(conn, &sql, filter, |row| {
        Ok(StreetSeverity {
            street: row.get(0)?,
            severity: row.get(1)?,
        })
    })
}

/// Counts by derived age bucket, person type, and injury outcome.
fn age_groups(conn: &Connection, filter: &SqlFilter) -> Result<Vec<AgeGroupCount>, ReportError> {
    let sql = format!(
        "SELECT person_age_group,
                COALESCE(CAST(person_type AS VARCHAR), 'Unknown') AS person_type,
                COALESCE(CAST(person_injury AS VARCHAR), 'Unknown') AS injury,
                COUNT(*) AS count
         FROM collisions{}
         GROUP BY 1, 2, 3
         ORDER BY 1, 2, 3",
        filter.where_sql()
    );
    query_rows(conn, &sql, filter, |row| {
        Ok(AgeGroupCount {
            age_group: row.get(0)?,
            person_type: row.get(1)?,
            injury: row.get(2)?,
            count: row.get(3)?,
        })
    })
}
