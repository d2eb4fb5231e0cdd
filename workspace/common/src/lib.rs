//! Common transport-layer types shared between the data source, the compute
//! crate and the web handlers.
//!
//! The hosted table stores one row per region with one column per year. Every
//! other crate works on the long form defined here ([`RegionSeries`]), so the
//! wide layout only leaks into the entity and the REST decoder.

mod chart;
mod series;

pub use chart::{ChartKind, ForecastPoint, PieSlice, TrendLine};
pub use series::{RegionSeries, YearValue};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Name of the hosted table holding the poverty counts.
pub const TABLE_NAME: &str = "jumlah_penduduk_miskin";

/// Row id of the province-wide totals. Excluded from region listings.
pub const PROVINCE_ID: &str = "jawa timur";

/// First year with published figures.
pub const FIRST_YEAR: i32 = 2007;

/// Last year with published figures.
pub const LAST_YEAR: i32 = 2024;

/// Label of the pie slice collecting every small region.
pub const OTHER_LABEL: &str = "Lainnya";

/// Number of future years a forecast covers.
pub const FORECAST_HORIZON: u32 = 3;

/// Regions below this share of the total (in percent) are merged into [`OTHER_LABEL`].
pub const SMALL_SLICE_THRESHOLD_PCT: f64 = 1.0;

/// Slices above this fraction of the total are pulled out of the pie.
pub const EXPLODE_SHARE: f64 = 0.05;

/// Placeholder shown whenever a query returns no rows.
pub const NO_DATA_MESSAGE: &str = "Data tidak ditemukan.";

/// Generic API response wrapper used by every JSON endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

/// Years offered in the year selector.
pub fn available_years() -> Vec<i32> {
    (FIRST_YEAR..=LAST_YEAR).collect()
}

/// Whether a table column holds yearly figures (its name is purely numeric).
pub fn is_year_column(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_digit())
}

/// Human readable region name: first character upper-cased, the rest lower-cased.
pub fn display_name(region: &str) -> String {
    let mut chars = region.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Region id usable inside a download file name.
pub fn file_slug(region: &str) -> String {
    region.split_whitespace().collect::<Vec<_>>().join("_")
}
