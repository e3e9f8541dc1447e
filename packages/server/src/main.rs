#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the collision dashboard.
//!
//! On startup: download the dataset if absent, register it in an
//! in-memory `DuckDB` instance, and load the distinct-value vocabulary.
//! The vocabulary is built before the server binds, so no request can
//! observe it partially populated. Serves the filter-options and
//! report-generation endpoints for the dashboard frontend.

mod handlers;

use std::path::PathBuf;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use collision_dash_query::Vocabulary;
use duckdb::Connection;

/// Default dataset location (cleaned NYC collision records, Parquet).
const DEFAULT_DATASET_URL: &str =
    "https://f005.backblazeb2.com/file/visuadataset4455/final_cleaned_final.parquet";

/// Shared application state.
pub struct AppState {
    /// In-memory analytical store with the `collisions` view registered.
    ///
    /// `DuckDB` connections are not `Sync`, so queries serialize through
    /// the mutex; every report query is a small bounded aggregate.
    pub conn: Mutex<Connection>,
    /// Distinct-value vocabulary, immutable after startup.
    pub vocabulary: Vocabulary,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let dataset_url =
        std::env::var("DATASET_URL").unwrap_or_else(|_| DEFAULT_DATASET_URL.to_string());
    let dataset_path = PathBuf::from(
        std::env::var("DATASET_PATH").unwrap_or_else(|_| "data/collisions.parquet".to_string()),
    );

    collision_dash_ingest::ensure_dataset(&dataset_url, &dataset_path)
        .await
        .expect("Failed to fetch dataset");

    log::info!("Opening dataset...");
    let conn =
        collision_dash_database::store::open_dataset(&dataset_path).expect("Failed to open dataset");

    log::info!("Loading vocabulary...");
    let vocabulary = collision_dash_database::vocabulary::load_vocabulary(&conn)
        .expect("Failed to load vocabulary");

    let state = web::Data::new(AppState {
        conn: Mutex::new(conn),
        vocabulary,
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/filters", web::get().to(handlers::filters))
                    .route("/report", web::post().to(handlers::report)),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
