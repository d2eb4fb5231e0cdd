use crate::handlers::{
    health::health_check,
    province::{get_province_chart, get_province_csv, get_province_report},
    regions::{get_region_chart, get_region_csv, get_region_report, list_regions},
    screens::show_screen,
    totals::{get_totals, get_totals_chart, get_totals_csv},
    years::{get_year_chart, get_year_csv, get_year_distribution},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{routing::get, Router};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // HTML screens
        .route("/", get(show_screen))
        // Health check
        .route("/health", get(health_check))
        // Per-region routes
        .route("/api/v1/regions", get(list_regions))
        .route("/api/v1/regions/:region", get(get_region_report))
        .route("/api/v1/regions/:region/chart", get(get_region_chart))
        .route("/api/v1/regions/:region/csv", get(get_region_csv))
        // Per-year routes
        .route("/api/v1/years/:year/distribution", get(get_year_distribution))
        .route("/api/v1/years/:year/chart", get(get_year_chart))
        .route("/api/v1/years/:year/csv", get(get_year_csv))
        // Province routes
        .route("/api/v1/province", get(get_province_report))
        .route("/api/v1/province/chart", get(get_province_chart))
        .route("/api/v1/province/csv", get(get_province_csv))
        .route("/api/v1/totals", get(get_totals))
        .route("/api/v1/totals/chart", get(get_totals_chart))
        .route("/api/v1/totals/csv", get(get_totals_csv))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
