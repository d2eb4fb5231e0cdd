use anyhow::Result;
use clap::Args;
use common::FORECAST_HORIZON;
use tracing::{info, trace};

use crate::config::{initialize_app_state, Settings};
use crate::export::{series_csv, slices_csv};
use crate::helpers::reports::{
    province_report, region_report, totals_distribution, year_distribution,
};
use crate::schemas::AppState;

/// Which CSV download to produce.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ExportTarget {
    /// Yearly figures of a region
    #[arg(long)]
    pub region: Option<String>,

    /// Region distribution of a year
    #[arg(long)]
    pub year: Option<i32>,

    /// Province totals per year
    #[arg(long)]
    pub province: bool,

    /// Region distribution summed over every year
    #[arg(long)]
    pub totals: bool,
}

/// Builds the CSV body of the requested download.
pub async fn render_export(state: &AppState, target: &ExportTarget, forecast: bool) -> Result<String> {
    let horizon = if forecast { FORECAST_HORIZON } else { 0 };

    let csv = if let Some(region) = &target.region {
        let report = region_report(state, region, horizon).await?;
        series_csv(&report.series, &report.forecast)?
    } else if let Some(year) = target.year {
        slices_csv(&year_distribution(state, year).await?)?
    } else if target.province {
        let report = province_report(state, horizon).await?;
        series_csv(&report.series, &report.forecast)?
    } else {
        slices_csv(&totals_distribution(state).await?)?
    };

    Ok(csv)
}

pub async fn export(
    settings: Settings,
    target: ExportTarget,
    forecast: bool,
    out: Option<&str>,
) -> Result<()> {
    trace!("Entering export function");
    let state = initialize_app_state(settings).await?;
    let csv = render_export(&state, &target, forecast).await?;

    match out {
        Some(path) => {
            tokio::fs::write(path, csv).await?;
            info!("Wrote {}", path);
        }
        None => print!("{}", csv),
    }
    Ok(())
}
