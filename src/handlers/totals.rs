use axum::{
    extract::State,
    response::{Json, Response},
};
use common::{ChartKind, PieSlice, FIRST_YEAR, LAST_YEAR};
use tracing::{instrument, trace};

use crate::charts;
use crate::error::ApiError;
use crate::export::slices_csv;
use crate::handlers::csv_attachment;
use crate::helpers::reports::totals_distribution;
use crate::schemas::{ApiResponse, AppState, ChartResponse, ErrorResponse};

/// Region shares of the sum over every year
#[utoipa::path(
    get,
    path = "/api/v1/totals",
    tag = "province",
    responses(
        (status = 200, description = "Totals retrieved successfully", body = ApiResponse<Vec<PieSlice>>),
        (status = 404, description = "Table is empty", body = ErrorResponse),
        (status = 502, description = "Table store error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_totals(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PieSlice>>>, ApiError> {
    trace!("Entering get_totals function");
    let slices = totals_distribution(&state).await?;

    Ok(Json(ApiResponse {
        data: slices,
        message: "Totals retrieved successfully".to_string(),
        success: true,
    }))
}

/// Pie chart figure of the all-years totals
#[utoipa::path(
    get,
    path = "/api/v1/totals/chart",
    tag = "province",
    responses(
        (status = 200, description = "Chart built successfully", body = ApiResponse<ChartResponse>),
        (status = 404, description = "Table is empty", body = ErrorResponse),
        (status = 502, description = "Table store error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_totals_chart(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ChartResponse>>, ApiError> {
    trace!("Entering get_totals_chart function");
    let slices = totals_distribution(&state).await?;
    let chart = charts::total_pie(&slices, FIRST_YEAR, LAST_YEAR, state.settings.image_scale)?;

    Ok(Json(ApiResponse {
        data: chart,
        message: "Chart built successfully".to_string(),
        success: true,
    }))
}

/// CSV download of the all-years totals
#[utoipa::path(
    get,
    path = "/api/v1/totals/csv",
    tag = "province",
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv", body = String),
        (status = 404, description = "Table is empty", body = ErrorResponse),
        (status = 502, description = "Table store error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_totals_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    trace!("Entering get_totals_csv function");
    let slices = totals_distribution(&state).await?;
    let body = slices_csv(&slices)?;
    Ok(csv_attachment(&ChartKind::TotalPie.file_stem(None), body))
}
