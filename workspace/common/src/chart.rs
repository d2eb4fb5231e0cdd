use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Least-squares line `value = slope * year + intercept`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    /// Value of the line at the given year.
    pub fn predict(&self, year: i32) -> f64 {
        self.slope * f64::from(year) + self.intercept
    }
}

/// Extrapolated value for a future year.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ForecastPoint {
    pub year: i32,
    pub value: f64,
}

/// One segment of a pie chart.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PieSlice {
    /// Region id, or the "other" label for merged segments
    pub label: String,
    /// Absolute value
    pub value: f64,
    /// Share of the grand total in percent
    pub percentage: f64,
    /// Whether the segment is pulled out of the pie
    pub exploded: bool,
}

/// The four charts the dashboard renders.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Bars and trend line for a single region
    RegionBar,
    /// Region distribution for one year
    YearPie,
    /// Province totals over all years
    ProvinceBar,
    /// Region distribution summed over all years
    TotalPie,
}

impl ChartKind {
    /// Base name of downloaded artifacts; `subject` is the region slug or the year.
    pub fn file_stem(&self, subject: Option<&str>) -> String {
        match (self, subject) {
            (ChartKind::RegionBar, Some(region)) => format!("grafik_batang_{}", region),
            (ChartKind::RegionBar, None) => "grafik_batang".to_string(),
            (ChartKind::YearPie, Some(year)) => format!("grafik_lingkaran_{}", year),
            (ChartKind::YearPie, None) => "grafik_lingkaran".to_string(),
            (ChartKind::ProvinceBar, _) => "grafik_batang_jawa_timur".to_string(),
            (ChartKind::TotalPie, _) => "grafik_lingkaran_total_semua_tahun".to_string(),
        }
    }
}
