use axum::{
    extract::{Query, State},
    response::{Json, Response},
};
use axum_valid::Valid;
use common::ChartKind;
use tracing::{debug, instrument, trace};

use crate::charts;
use crate::error::ApiError;
use crate::export::series_csv;
use crate::handlers::csv_attachment;
use crate::helpers::reports::province_report;
use crate::schemas::{ApiResponse, AppState, ChartResponse, ErrorResponse, ForecastQuery, RegionReport};

/// Province totals per year with trend and optional forecast
#[utoipa::path(
    get,
    path = "/api/v1/province",
    tag = "province",
    params(ForecastQuery),
    responses(
        (status = 200, description = "Province report retrieved successfully", body = ApiResponse<RegionReport>),
        (status = 400, description = "Invalid forecast horizon", body = ErrorResponse),
        (status = 404, description = "Province row missing", body = ErrorResponse),
        (status = 502, description = "Table store error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_province_report(
    Valid(Query(query)): Valid<Query<ForecastQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RegionReport>>, ApiError> {
    trace!("Entering get_province_report function");
    let report = province_report(&state, query.horizon()).await?;
    debug!("Province series has {} points", report.series.points.len());

    Ok(Json(ApiResponse {
        data: report,
        message: "Province report retrieved successfully".to_string(),
        success: true,
    }))
}

/// Bar chart figure of the province totals
#[utoipa::path(
    get,
    path = "/api/v1/province/chart",
    tag = "province",
    params(ForecastQuery),
    responses(
        (status = 200, description = "Chart built successfully", body = ApiResponse<ChartResponse>),
        (status = 404, description = "Province row missing", body = ErrorResponse),
        (status = 502, description = "Table store error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_province_chart(
    Valid(Query(query)): Valid<Query<ForecastQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ChartResponse>>, ApiError> {
    trace!("Entering get_province_chart function");
    let report = province_report(&state, query.horizon()).await?;
    let chart = charts::province_bar(
        &report.series,
        Some(report.forecast.as_slice()),
        state.settings.image_scale,
    )?;

    Ok(Json(ApiResponse {
        data: chart,
        message: "Chart built successfully".to_string(),
        success: true,
    }))
}

/// CSV download of the province totals
#[utoipa::path(
    get,
    path = "/api/v1/province/csv",
    tag = "province",
    params(ForecastQuery),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv", body = String),
        (status = 404, description = "Province row missing", body = ErrorResponse),
        (status = 502, description = "Table store error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_province_csv(
    Valid(Query(query)): Valid<Query<ForecastQuery>>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    trace!("Entering get_province_csv function");
    let report = province_report(&state, query.horizon()).await?;
    let body = series_csv(&report.series, &report.forecast)?;
    Ok(csv_attachment(&ChartKind::ProvinceBar.file_stem(None), body))
}
