//! Startup vocabulary loading.
//!
//! Issues five small DISTINCT queries against the `collisions` view and
//! builds the immutable [`Vocabulary`] used for dropdown population and
//! input whitelisting. Columns with zero rows yield empty vocabularies,
//! not errors.

use collision_dash_collision_models::FilterColumn;
use collision_dash_query::Vocabulary;
use duckdb::Connection;

use crate::DbError;

/// Loads the distinct-value vocabulary from the registered dataset.
///
/// Call once at startup, before the first request is classified.
///
/// # Errors
///
/// Returns [`DbError`] if any of the distinct-value queries fails.
pub fn load_vocabulary(conn: &Connection) -> Result<Vocabulary, DbError> {
    let boroughs = distinct_strings(conn, FilterColumn::Borough)?;
    let years = distinct_years(conn)?;
    let vehicle_categories = distinct_strings(conn, FilterColumn::VehicleCategory)?;
    let contributing_factors = distinct_strings(conn, FilterColumn::ContributingFactor)?;
    let injury_types = distinct_strings(conn, FilterColumn::InjuryType)?;

    log::info!(
        "Loaded vocabulary: {} boroughs, {} years, {} vehicle categories, {} factors, {} injury types",
        boroughs.len(),
        years.len(),
        vehicle_categories.len(),
        contributing_factors.len(),
        injury_types.len(),
    );

    Ok(Vocabulary::new(
        boroughs,
        years,
        vehicle_categories,
        contributing_factors,
        injury_types,
    ))
}

fn distinct_strings(conn: &Connection, column: FilterColumn) -> Result<Vec<String>, DbError> {
    let name = column.dataset_column();
    let mut stmt = conn.prepare(&format!(
        "SELECT DISTINCT CAST({name} AS VARCHAR) AS value
         FROM collisions
         WHERE {name} IS NOT NULL
         ORDER BY value"
    ))?;

    let values = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(values)
}

fn distinct_years(conn: &Connection) -> Result<Vec<i32>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT TRY_CAST(crash_year AS INTEGER) AS year
         FROM collisions
         WHERE TRY_CAST(crash_year AS INTEGER) IS NOT NULL
         ORDER BY year",
    )?;

    let years = stmt
        .query_map([], |row| row.get::<_, i32>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(years)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE collisions (
                 borough VARCHAR,
                 crash_year INTEGER,
                 vehicle_category VARCHAR,
                 contributing_factor_combined VARCHAR,
                 person_injury VARCHAR
             );
             INSERT INTO collisions VALUES
                 ('BROOKLYN', 2021, 'SEDAN', 'SPEEDING', 'INJURED'),
                 ('QUEENS', 2022, 'TAXI', 'GLARE', 'KILLED'),
                 ('BROOKLYN', 2021, 'SEDAN', NULL, 'INJURED'),
                 (NULL, 2020, 'BICYCLE', 'SPEEDING', NULL);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn loads_sorted_distinct_values_skipping_nulls() {
        let vocab = load_vocabulary(&seeded_connection()).unwrap();

        assert_eq!(
            vocab.values_for(FilterColumn::Borough).values(),
            &["BROOKLYN", "QUEENS"]
        );
        assert_eq!(
            vocab.values_for(FilterColumn::ContributingFactor).values(),
            &["GLARE", "SPEEDING"]
        );
        let years: Vec<i32> = vocab.years().collect();
        assert_eq!(years, vec![2020, 2021, 2022]);
    }

    #[test]
    fn empty_dataset_yields_empty_vocabulary() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE collisions (
                 borough VARCHAR,
                 crash_year INTEGER,
                 vehicle_category VARCHAR,
                 contributing_factor_combined VARCHAR,
                 person_injury VARCHAR
             );",
        )
        .unwrap();

        let vocab = load_vocabulary(&conn).unwrap();
        assert!(vocab.values_for(FilterColumn::Borough).is_empty());
        assert_eq!(vocab.years().count(), 0);
    }
}
