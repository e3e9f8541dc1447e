//! HTTP handler functions for the collision dashboard API.

use actix_web::{HttpResponse, web};
use collision_dash_collision_models::FilterColumn;
use collision_dash_query::plan_report;
use collision_dash_query_models::FilterSelection;
use collision_dash_reports::run_report;
use collision_dash_server_models::{ApiHealth, FilterOptions, ReportRequest, ReportResponse};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/filters`
///
/// Returns the dropdown option lists built from the startup vocabulary.
pub async fn filters(state: web::Data<AppState>) -> HttpResponse {
    let vocabulary = &state.vocabulary;

    HttpResponse::Ok().json(FilterOptions {
        boroughs: vocabulary.values_for(FilterColumn::Borough).values().to_vec(),
        years: vocabulary.years().collect(),
        vehicle_categories: vocabulary
            .values_for(FilterColumn::VehicleCategory)
            .values()
            .to_vec(),
        contributing_factors: vocabulary
            .values_for(FilterColumn::ContributingFactor)
            .values()
            .to_vec(),
        injury_types: vocabulary
            .values_for(FilterColumn::InjuryType)
            .values()
            .to_vec(),
    })
}

/// `POST /api/report`
///
/// Classifies the search text, builds the predicate, and runs the ten
/// chart queries. Malformed filter values never fail the request; they
/// surface as diagnostics alongside the (broader) results.
pub async fn report(state: web::Data<AppState>, request: web::Json<ReportRequest>) -> HttpResponse {
    let selection: FilterSelection = request.into_inner().into();
    let plan = plan_report(&selection, &state.vocabulary);

    let Ok(conn) = state.conn.lock() else {
        log::error!("Database mutex poisoned");
        return HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Failed to run report"
        }));
    };

    match run_report(&conn, &plan) {
        Ok(report) => HttpResponse::Ok().json(ReportResponse {
            empty: report.is_empty(),
            diagnostics: plan.diagnostics.iter().map(ToString::to_string).collect(),
            report,
        }),
        Err(e) => {
            log::error!("Failed to run report: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to run report"
            }))
        }
    }
}
