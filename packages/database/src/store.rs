//! Dataset registration.
//!
//! Opens an in-memory `DuckDB` instance and exposes the dataset file as a
//! `collisions` view with two derived columns: `hour` (parsed from the
//! `HH:MM` `crash_time` string) and `person_age_group` (bucketed from
//! `person_age`). The dataset path comes from operator configuration, not
//! user input; single quotes are still doubled before embedding.

use std::path::Path;

use duckdb::Connection;

use crate::DbError;

/// Opens an in-memory database with the dataset registered as the
/// `collisions` view.
///
/// # Errors
///
/// Returns [`DbError`] if the file is missing, has an unsupported
/// extension, or `DuckDB` fails to open or register it.
pub fn open_dataset(path: &Path) -> Result<Connection, DbError> {
    if !path.exists() {
        return Err(DbError::DatasetMissing {
            path: path.display().to_string(),
        });
    }

    let conn = Connection::open_in_memory()?;
    register_collisions(&conn, path)?;

    log::info!("Registered dataset {} as collisions view", path.display());
    Ok(conn)
}

/// Creates the `collisions` view over the dataset file on an existing
/// connection.
///
/// # Errors
///
/// Returns [`DbError`] if the extension is unsupported or view creation
/// fails.
pub fn register_collisions(conn: &Connection, path: &Path) -> Result<(), DbError> {
    let scan = scan_expression(path)?;

    conn.execute_batch(&format!(
        "CREATE OR REPLACE VIEW collisions AS
         SELECT *,
             CASE
                 WHEN crash_time IS NULL THEN NULL
                 ELSE TRY_CAST(SPLIT_PART(crash_time, ':', 1) AS INTEGER)
             END AS hour,
             CASE
                 WHEN person_age IS NULL THEN 'Unknown'
                 WHEN TRY_CAST(person_age AS INTEGER) < 18 THEN '0-17'
                 WHEN TRY_CAST(person_age AS INTEGER) < 30 THEN '18-29'
                 WHEN TRY_CAST(person_age AS INTEGER) < 45 THEN '30-44'
                 WHEN TRY_CAST(person_age AS INTEGER) < 60 THEN '45-59'
                 ELSE '60+'
             END AS person_age_group
         FROM {scan};"
    ))?;

    Ok(())
}

/// Returns the table function call reading the dataset file, chosen by
/// extension.
fn scan_expression(path: &Path) -> Result<String, DbError> {
    let escaped = path.display().to_string().replace('\'', "''");

    match path.extension().and_then(|e| e.to_str()) {
        Some("parquet") => Ok(format!("read_parquet('{escaped}')")),
        Some("csv") => Ok(format!("read_csv_auto('{escaped}')")),
        _ => Err(DbError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    fn write_fixture_csv(name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "borough,crash_time,person_age").unwrap();
        writeln!(file, "BROOKLYN,14:30,25").unwrap();
        writeln!(file, "QUEENS,7:05,64").unwrap();
        writeln!(file, "BRONX,,17").unwrap();
        path
    }

    #[test]
    fn missing_dataset_is_an_error() {
        let err = open_dataset(Path::new("/nonexistent/collisions.parquet")).unwrap_err();
        assert!(matches!(err, DbError::DatasetMissing { .. }));
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let path = std::env::temp_dir().join("collisions.json");
        std::fs::write(&path, "{}").unwrap();
        let err = open_dataset(&path).unwrap_err();
        assert!(matches!(err, DbError::UnsupportedFormat { .. }));
    }

    #[test]
    fn csv_dataset_registers_with_derived_columns() {
        let path = write_fixture_csv("collision_dash_store_test.csv");
        let conn = open_dataset(&path).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM collisions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 3);

        let hour: i64 = conn
            .query_row(
                "SELECT hour FROM collisions WHERE borough = 'BROOKLYN'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(hour, 14);

        let age_group: String = conn
            .query_row(
                "SELECT person_age_group FROM collisions WHERE borough = 'QUEENS'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(age_group, "60+");
    }

    #[test]
    fn quoted_paths_are_escaped() {
        let scan = scan_expression(Path::new("/tmp/o'brien.csv")).unwrap();
        assert_eq!(scan, "read_csv_auto('/tmp/o''brien.csv')");
    }
}
