use common::{
    ChartKind, ForecastPoint, PieSlice, RegionSeries, TrendLine, YearValue, FORECAST_HORIZON,
};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi, ToSchema};
use validator::Validate;

pub use common::ApiResponse;

use crate::config::Settings;
use crate::source::TableSource;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Where the poverty table is read from
    pub source: Arc<dyn TableSource>,
    /// Cache of fetched table snapshots
    pub cache: Cache<String, CachedData>,
    /// Runtime settings
    pub settings: Arc<Settings>,
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    Rows(Vec<RegionSeries>),
    Region(Option<RegionSeries>),
    Year(Vec<(String, f64)>),
}

/// Query parameters for endpoints that can extend a series with a forecast
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams, Validate)]
pub struct ForecastQuery {
    /// Append a linear forecast after the last observed year
    pub forecast: Option<bool>,
    /// Number of forecast years (default: 3)
    #[validate(range(max = 10))]
    pub horizon: Option<u32>,
}

impl ForecastQuery {
    /// Number of years to forecast, 0 when no forecast was asked for.
    pub fn horizon(&self) -> u32 {
        if self.forecast.unwrap_or(false) {
            self.horizon.unwrap_or(FORECAST_HORIZON)
        } else {
            0
        }
    }
}

/// Query parameters of the HTML screens served at `/`
#[derive(Debug, Default, Deserialize)]
pub struct ScreenQuery {
    /// Screen to show: awal, menu, perdaerah or sejawatimur
    pub screen: Option<String>,
    /// Region picked on the per-region screen
    pub region: Option<String>,
    /// Year picked on the province screen
    pub year: Option<String>,
    /// Forecast checkbox of the per-region screen (`on` when ticked)
    pub forecast: Option<String>,
    /// Button that submitted the form
    pub action: Option<String>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Table store backend and whether it answered
    pub source: String,
}

/// A region's history with its fitted trend and optional forecast
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegionReport {
    /// Observed yearly figures
    pub series: RegionSeries,
    /// Least-squares trend, absent with fewer than two observed years
    pub trend: Option<TrendLine>,
    /// Forecast years following the last observation
    pub forecast: Vec<ForecastPoint>,
}

/// A plotly figure ready for `Plotly.newPlot`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChartResponse {
    /// Which chart this is
    pub kind: ChartKind,
    /// File name of the PNG download
    pub file_name: String,
    /// Figure JSON with `data`, `layout` and `config`
    #[schema(value_type = Object)]
    pub figure: Value,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::regions::list_regions,
        crate::handlers::regions::get_region_report,
        crate::handlers::regions::get_region_chart,
        crate::handlers::regions::get_region_csv,
        crate::handlers::years::get_year_distribution,
        crate::handlers::years::get_year_chart,
        crate::handlers::years::get_year_csv,
        crate::handlers::province::get_province_report,
        crate::handlers::province::get_province_chart,
        crate::handlers::province::get_province_csv,
        crate::handlers::totals::get_totals,
        crate::handlers::totals::get_totals_chart,
        crate::handlers::totals::get_totals_csv,
    ),
    components(
        schemas(
            ApiResponse<Vec<String>>,
            ApiResponse<RegionReport>,
            ApiResponse<Vec<PieSlice>>,
            ApiResponse<ChartResponse>,
            ErrorResponse,
            HealthResponse,
            ForecastQuery,
            RegionReport,
            ChartResponse,
            ChartKind,
            RegionSeries,
            YearValue,
            TrendLine,
            ForecastPoint,
            PieSlice,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "regions", description = "Per-region poverty counts"),
        (name = "years", description = "Region distribution of a single year"),
        (name = "province", description = "Province-wide totals"),
    ),
    info(
        title = "povstat API",
        description = "Poverty counts of East Java regions with charts, forecasts and CSV downloads",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
