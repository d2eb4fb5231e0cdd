use axum::{
    extract::{Path, State},
    response::{Json, Response},
};
use common::{ChartKind, PieSlice};
use tracing::{debug, instrument, trace};

use crate::charts;
use crate::error::ApiError;
use crate::export::slices_csv;
use crate::handlers::csv_attachment;
use crate::helpers::reports::{parse_year, year_distribution};
use crate::schemas::{ApiResponse, AppState, ChartResponse, ErrorResponse};

/// Region shares of one year; regions under 1% are merged into `Lainnya`
#[utoipa::path(
    get,
    path = "/api/v1/years/{year}/distribution",
    tag = "years",
    params(
        ("year" = i32, Path, description = "Year between 2007 and 2024"),
    ),
    responses(
        (status = 200, description = "Distribution retrieved successfully", body = ApiResponse<Vec<PieSlice>>),
        (status = 400, description = "Year outside the published range", body = ErrorResponse),
        (status = 404, description = "No data for the year", body = ErrorResponse),
        (status = 502, description = "Table store error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_year_distribution(
    Path(year): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PieSlice>>>, ApiError> {
    trace!("Entering get_year_distribution function");
    let year = parse_year(&year)?;
    let slices = year_distribution(&state, year).await?;
    debug!("Returning {} slices for {}", slices.len(), year);

    Ok(Json(ApiResponse {
        data: slices,
        message: format!("Distribution for {} retrieved successfully", year),
        success: true,
    }))
}

/// Pie chart figure of one year
#[utoipa::path(
    get,
    path = "/api/v1/years/{year}/chart",
    tag = "years",
    params(
        ("year" = i32, Path, description = "Year between 2007 and 2024"),
    ),
    responses(
        (status = 200, description = "Chart built successfully", body = ApiResponse<ChartResponse>),
        (status = 400, description = "Year outside the published range", body = ErrorResponse),
        (status = 404, description = "No data for the year", body = ErrorResponse),
        (status = 502, description = "Table store error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_year_chart(
    Path(year): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ChartResponse>>, ApiError> {
    trace!("Entering get_year_chart function");
    let year = parse_year(&year)?;
    let slices = year_distribution(&state, year).await?;
    let chart = charts::year_pie(year, &slices, state.settings.image_scale)?;

    Ok(Json(ApiResponse {
        data: chart,
        message: "Chart built successfully".to_string(),
        success: true,
    }))
}

/// CSV download of one year's distribution
#[utoipa::path(
    get,
    path = "/api/v1/years/{year}/csv",
    tag = "years",
    params(
        ("year" = i32, Path, description = "Year between 2007 and 2024"),
    ),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv", body = String),
        (status = 400, description = "Year outside the published range", body = ErrorResponse),
        (status = 404, description = "No data for the year", body = ErrorResponse),
        (status = 502, description = "Table store error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_year_csv(
    Path(year): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    trace!("Entering get_year_csv function");
    let year = parse_year(&year)?;
    let slices = year_distribution(&state, year).await?;
    let body = slices_csv(&slices)?;
    let stem = ChartKind::YearPie.file_stem(Some(&year.to_string()));
    Ok(csv_attachment(&stem, body))
}
