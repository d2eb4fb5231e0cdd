use axum::{
    extract::{Path, Query, State},
    response::{Json, Response},
};
use axum_valid::Valid;
use common::{file_slug, ChartKind};
use tracing::{debug, info, instrument, trace};

use crate::charts;
use crate::error::ApiError;
use crate::export::series_csv;
use crate::handlers::csv_attachment;
use crate::helpers::reports::{region_list, region_report};
use crate::schemas::{ApiResponse, AppState, ChartResponse, ErrorResponse, ForecastQuery, RegionReport};

/// List the regions of the table, without the province row
#[utoipa::path(
    get,
    path = "/api/v1/regions",
    tag = "regions",
    responses(
        (status = 200, description = "Regions retrieved successfully", body = ApiResponse<Vec<String>>),
        (status = 502, description = "Table store error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_regions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    trace!("Entering list_regions function");
    let regions = region_list(&state).await?;
    info!("Listing {} regions", regions.len());

    Ok(Json(ApiResponse {
        data: regions,
        message: "Regions retrieved successfully".to_string(),
        success: true,
    }))
}

/// Yearly figures of a region with its trend and optional forecast
#[utoipa::path(
    get,
    path = "/api/v1/regions/{region}",
    tag = "regions",
    params(
        ("region" = String, Path, description = "Region id, e.g. `kota surabaya`"),
        ForecastQuery
    ),
    responses(
        (status = 200, description = "Region report retrieved successfully", body = ApiResponse<RegionReport>),
        (status = 400, description = "Invalid forecast horizon", body = ErrorResponse),
        (status = 404, description = "Region not found", body = ErrorResponse),
        (status = 502, description = "Table store error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_region_report(
    Path(region): Path<String>,
    Valid(Query(query)): Valid<Query<ForecastQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RegionReport>>, ApiError> {
    trace!("Entering get_region_report function");
    let report = region_report(&state, &region, query.horizon()).await?;
    debug!(
        "Region {} has {} points and {} forecast points",
        region,
        report.series.points.len(),
        report.forecast.len()
    );

    Ok(Json(ApiResponse {
        data: report,
        message: "Region report retrieved successfully".to_string(),
        success: true,
    }))
}

/// Bar chart figure of a region
#[utoipa::path(
    get,
    path = "/api/v1/regions/{region}/chart",
    tag = "regions",
    params(
        ("region" = String, Path, description = "Region id"),
        ForecastQuery
    ),
    responses(
        (status = 200, description = "Chart built successfully", body = ApiResponse<ChartResponse>),
        (status = 404, description = "Region not found", body = ErrorResponse),
        (status = 502, description = "Table store error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_region_chart(
    Path(region): Path<String>,
    Valid(Query(query)): Valid<Query<ForecastQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ChartResponse>>, ApiError> {
    trace!("Entering get_region_chart function");
    let report = region_report(&state, &region, query.horizon()).await?;
    let chart = charts::region_bar(
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

/// CSV download of a region's figures and forecast
#[utoipa::path(
    get,
    path = "/api/v1/regions/{region}/csv",
    tag = "regions",
    params(
        ("region" = String, Path, description = "Region id"),
        ForecastQuery
    ),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv", body = String),
        (status = 404, description = "Region not found", body = ErrorResponse),
        (status = 502, description = "Table store error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_region_csv(
    Path(region): Path<String>,
    Valid(Query(query)): Valid<Query<ForecastQuery>>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    trace!("Entering get_region_csv function");
    let report = region_report(&state, &region, query.horizon()).await?;
    let body = series_csv(&report.series, &report.forecast)?;
    let stem = ChartKind::RegionBar.file_stem(Some(&file_slug(&region)));
    Ok(csv_attachment(&stem, body))
}
