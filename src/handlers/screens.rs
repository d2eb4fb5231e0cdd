use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
};
use common::{FIRST_YEAR, LAST_YEAR};
use tracing::{debug, error, instrument, trace, warn};

use crate::charts;
use crate::error::ApiError;
use crate::helpers::reports::{
    province_report, region_list, region_report, totals_distribution, year_distribution,
};
use crate::pages::{self, Outcome, ProvinceForm, RegionForm};
use crate::schemas::{AppState, ChartResponse, ScreenQuery};
use crate::screens::Screen;

/// Turns a chart request into what the page shows.
fn outcome(result: Result<(ChartResponse, String), ApiError>, image_scale: u32) -> Outcome {
    match result {
        Ok((chart, csv_href)) => Outcome::Chart {
            chart,
            csv_href,
            image_scale,
        },
        Err(ApiError::NotFound) => Outcome::NoData,
        Err(e) => {
            error!("Screen query failed: {}", e);
            Outcome::Failed(e.to_string())
        }
    }
}

fn forecast_suffix(forecast: bool) -> &'static str {
    if forecast { "?forecast=true" } else { "" }
}

async fn region_chart(
    state: &AppState,
    region: &str,
    forecast: bool,
) -> Result<(ChartResponse, String), ApiError> {
    let horizon = if forecast { common::FORECAST_HORIZON } else { 0 };
    let report = region_report(state, region, horizon).await?;
    let chart = charts::region_bar(
        &report.series,
        Some(report.forecast.as_slice()),
        state.settings.image_scale,
    )?;
    let csv_href = format!(
        "/api/v1/regions/{}/csv{}",
        urlencoding::encode(region),
        forecast_suffix(forecast)
    );
    Ok((chart, csv_href))
}

async fn year_chart(state: &AppState, year: i32) -> Result<(ChartResponse, String), ApiError> {
    let slices = year_distribution(state, year).await?;
    let chart = charts::year_pie(year, &slices, state.settings.image_scale)?;
    Ok((chart, format!("/api/v1/years/{}/csv", year)))
}

async fn province_chart(
    state: &AppState,
    forecast: bool,
) -> Result<(ChartResponse, String), ApiError> {
    let horizon = if forecast { common::FORECAST_HORIZON } else { 0 };
    let report = province_report(state, horizon).await?;
    let chart = charts::province_bar(
        &report.series,
        Some(report.forecast.as_slice()),
        state.settings.image_scale,
    )?;
    Ok((chart, format!("/api/v1/province/csv{}", forecast_suffix(forecast))))
}

async fn totals_chart(state: &AppState) -> Result<(ChartResponse, String), ApiError> {
    let slices = totals_distribution(state).await?;
    let chart = charts::total_pie(&slices, FIRST_YEAR, LAST_YEAR, state.settings.image_scale)?;
    Ok((chart, "/api/v1/totals/csv".to_string()))
}

async fn per_region_screen(state: &AppState, query: &ScreenQuery) -> (StatusCode, String) {
    let regions = match region_list(state).await {
        Ok(regions) => regions,
        Err(e) => {
            error!("Failed to list regions: {}", e);
            let form = RegionForm::default();
            let page = pages::per_region(&form, &Outcome::Failed(e.to_string()));
            return (e.status(), page);
        }
    };

    let forecast = query.forecast.is_some();
    let selected = query
        .region
        .as_deref()
        .or_else(|| regions.first().map(String::as_str));

    let result = match (query.action.as_deref(), selected) {
        (Some("generate"), Some(region)) => {
            debug!("Generating chart for {}", region);
            outcome(
                region_chart(state, region, forecast).await,
                state.settings.image_scale,
            )
        }
        (Some("generate"), None) => Outcome::NoData,
        _ => Outcome::Idle,
    };

    let form = RegionForm {
        regions: &regions,
        selected,
        forecast,
    };
    (StatusCode::OK, pages::per_region(&form, &result))
}

async fn province_screen(state: &AppState, query: &ScreenQuery) -> (StatusCode, String) {
    let forecast = query.forecast.is_some();
    let year = match query.year.as_deref().map(str::parse::<i32>) {
        Some(Ok(year)) => Some(year),
        Some(Err(_)) => {
            warn!("Ignoring unparsable year {:?}", query.year);
            None
        }
        None => None,
    };
    let form = ProvinceForm { year, forecast };
    let scale = state.settings.image_scale;

    let (result, label) = match query.action.as_deref() {
        Some("pie") => (
            outcome(year_chart(state, year.unwrap_or(FIRST_YEAR)).await, scale),
            "Download Grafik Lingkaran",
        ),
        Some("bar") => (
            outcome(province_chart(state, forecast).await, scale),
            "Download Grafik Batang",
        ),
        Some("total") => (
            outcome(totals_chart(state).await, scale),
            "Download Grafik Lingkaran Total",
        ),
        _ => (Outcome::Idle, ""),
    };

    (StatusCode::OK, pages::province(&form, &result, label))
}

/// HTML dashboard; the `screen` parameter picks the page
#[instrument(skip(state))]
pub async fn show_screen(
    Query(query): Query<ScreenQuery>,
    State(state): State<AppState>,
) -> (StatusCode, Html<String>) {
    trace!("Entering show_screen function");
    let screen = match Screen::resolve(query.screen.as_deref()) {
        Ok(screen) => screen,
        Err(e) => {
            debug!("{}", e);
            return (StatusCode::NOT_FOUND, Html(pages::not_found()));
        }
    };

    let (status, page) = match screen {
        Screen::Landing => (StatusCode::OK, pages::landing()),
        Screen::Menu => (StatusCode::OK, pages::menu()),
        Screen::PerRegion => per_region_screen(&state, &query).await,
        Screen::Province => province_screen(&state, &query).await,
    };
    (status, Html(page))
}
