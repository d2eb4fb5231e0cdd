//! Plotly figures for the four dashboard charts.
//!
//! Figures are built server-side and shipped as JSON (`data`, `layout`,
//! `config`) for `Plotly.newPlot`. PNG export happens in the browser through
//! the modebar button configured here.

use common::{display_name, file_slug, ChartKind, ForecastPoint, PieSlice, RegionSeries};
use plotly::{
    common::{DashType, Line, Marker, Mode, Title},
    layout::Axis,
    Bar, Layout, Pie, Plot, Scatter,
};
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::error::ApiError;
use crate::schemas::ChartResponse;

const X_TITLE: &str = "Tahun";
const Y_TITLE: &str = "Jumlah Penduduk Miskin (Ribu)";
const PIE_ROTATION: f64 = 140.0;
const PIE_PULL: f64 = 0.05;
const PROVINCE_TITLE: &str = "Jawa Timur";

fn year_labels(years: impl IntoIterator<Item = i32>) -> Vec<String> {
    years.into_iter().map(|year| year.to_string()).collect()
}

/// Bars, red trend line and an optional dashed forecast continuing from the
/// last observed point.
fn bar_plot(
    series: &RegionSeries,
    forecast: Option<&[ForecastPoint]>,
    title: String,
    bar_color: Option<&'static str>,
) -> Plot {
    let years = year_labels(series.years());
    let values = series.values();

    let mut bars = Bar::new(years.clone(), values.clone()).name("Data");
    if let Some(color) = bar_color {
        bars = bars.marker(Marker::new().color(color));
    }

    let trend = Scatter::new(years, values)
        .mode(Mode::LinesMarkers)
        .name("Tren")
        .line(Line::new().color("red"))
        .marker(Marker::new().color("red"));

    let mut plot = Plot::new();
    plot.add_trace(bars);
    plot.add_trace(trend);

    if let (Some(points), Some(last)) = (forecast.filter(|p| !p.is_empty()), series.points.last()) {
        let mut x = vec![last.year.to_string()];
        let mut y = vec![last.value];
        x.extend(points.iter().map(|p| p.year.to_string()));
        y.extend(points.iter().map(|p| p.value));

        let prediction = Scatter::new(x, y)
            .mode(Mode::LinesMarkers)
            .name("Prediksi")
            .line(Line::new().color("red").dash(DashType::Dash));
        plot.add_trace(prediction);
    }

    let layout = Layout::new()
        .title(Title::with_text(title))
        .x_axis(Axis::new().title(Title::with_text(X_TITLE)))
        .y_axis(Axis::new().title(Title::with_text(Y_TITLE)));
    plot.set_layout(layout);
    plot
}

fn pie_plot(slices: &[PieSlice], title: String) -> Plot {
    let values: Vec<f64> = slices.iter().map(|s| s.value).collect();

    let mut plot = Plot::new();
    plot.add_trace(Pie::new(values));
    plot.set_layout(Layout::new().title(Title::with_text(title)));
    plot
}

/// Serialises the plot and adds the pieces the typed builders do not cover:
/// the PNG download button settings and, for pies, labels and slice styling.
fn finish(
    plot: &Plot,
    kind: ChartKind,
    file_stem: String,
    image_scale: u32,
    pie_slices: Option<&[PieSlice]>,
) -> Result<ChartResponse, ApiError> {
    let mut figure = serde_json::to_value(plot)
        .map_err(|e| ApiError::Export(format!("chart serialisation failed: {}", e)))?;

    if let Some(slices) = pie_slices {
        if let Some(trace) = figure.pointer_mut("/data/0") {
            let pull: Vec<f64> = slices
                .iter()
                .map(|s| if s.exploded { PIE_PULL } else { 0.0 })
                .collect();
            let labels: Vec<&str> = slices.iter().map(|s| s.label.as_str()).collect();
            trace["labels"] = json!(labels);
            trace["rotation"] = json!(PIE_ROTATION);
            trace["pull"] = json!(pull);
            trace["textinfo"] = json!("label+percent");
            trace["marker"] = json!({ "line": { "color": "white", "width": 1.5 } });
        }
    }

    figure["config"] = json!({
        "responsive": true,
        "toImageButtonOptions": {
            "format": "png",
            "filename": file_stem,
            "scale": image_scale,
        }
    });

    debug!("Built {:?} figure {}", kind, file_stem);
    Ok(ChartResponse {
        kind,
        file_name: format!("{}.png", file_stem),
        figure,
    })
}

/// Bar chart of a single region.
#[instrument(skip(series, forecast), fields(region = %series.region))]
pub fn region_bar(
    series: &RegionSeries,
    forecast: Option<&[ForecastPoint]>,
    image_scale: u32,
) -> Result<ChartResponse, ApiError> {
    let title = format!(
        "Grafik Jumlah Penduduk Miskin - {}",
        display_name(&series.region)
    );
    let plot = bar_plot(series, forecast, title, None);
    let stem = ChartKind::RegionBar.file_stem(Some(&file_slug(&series.region)));
    finish(&plot, ChartKind::RegionBar, stem, image_scale, None)
}

/// Pie chart of the regions of one year.
#[instrument(skip(slices))]
pub fn year_pie(year: i32, slices: &[PieSlice], image_scale: u32) -> Result<ChartResponse, ApiError> {
    let title = format!("Distribusi Penduduk Miskin - Tahun {}", year);
    let plot = pie_plot(slices, title);
    let stem = ChartKind::YearPie.file_stem(Some(&year.to_string()));
    finish(&plot, ChartKind::YearPie, stem, image_scale, Some(slices))
}

/// Bar chart of the province totals.
#[instrument(skip(series, forecast))]
pub fn province_bar(
    series: &RegionSeries,
    forecast: Option<&[ForecastPoint]>,
    image_scale: u32,
) -> Result<ChartResponse, ApiError> {
    let title = format!(
        "Grafik Total Jumlah Penduduk Miskin - {} ({})",
        PROVINCE_TITLE,
        year_span(series),
    );
    let plot = bar_plot(series, forecast, title, Some("skyblue"));
    let stem = ChartKind::ProvinceBar.file_stem(None);
    finish(&plot, ChartKind::ProvinceBar, stem, image_scale, None)
}

/// Pie chart of the per-region sums over every year.
#[instrument(skip(slices))]
pub fn total_pie(
    slices: &[PieSlice],
    first_year: i32,
    last_year: i32,
    image_scale: u32,
) -> Result<ChartResponse, ApiError> {
    let title = format!(
        "Distribusi Total Penduduk Miskin - Semua Tahun ({}–{})",
        first_year, last_year
    );
    let plot = pie_plot(slices, title);
    let stem = ChartKind::TotalPie.file_stem(None);
    finish(&plot, ChartKind::TotalPie, stem, image_scale, Some(slices))
}

fn year_span(series: &RegionSeries) -> String {
    match (series.first_year(), series.last_year()) {
        (Some(first), Some(last)) => format!("{}–{}", first, last),
        _ => String::new(),
    }
}

/// Figure JSON as a `Plotly.newPlot` call for the given element.
pub fn render_script(element_id: &str, chart: &ChartResponse) -> String {
    let figure = &chart.figure;
    format!(
        "Plotly.newPlot({}, {}, {}, {});",
        Value::String(element_id.to_string()),
        figure.get("data").unwrap_or(&Value::Null),
        figure.get("layout").unwrap_or(&Value::Null),
        figure.get("config").unwrap_or(&Value::Null),
    )
}
