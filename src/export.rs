//! CSV downloads and the wide CSV import format.

use std::io::Read;

use common::{is_year_column, ForecastPoint, PieSlice, RegionSeries, YearValue};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not UTF-8: {0}")]
    Encoding(String),

    #[error("Invalid import file: {0}")]
    Invalid(String),
}

#[derive(Debug, Serialize)]
struct SeriesRow {
    tahun: i32,
    jumlah: f64,
    jenis: &'static str,
}

#[derive(Debug, Serialize)]
struct SliceRow<'a> {
    daerah: &'a str,
    jumlah: f64,
    persen: f64,
}

fn into_string(writer: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Encoding(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Encoding(e.to_string()))
}

/// Observed values followed by forecast values, `tahun,jumlah,jenis`.
pub fn series_csv(series: &RegionSeries, forecast: &[ForecastPoint]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for point in &series.points {
        writer.serialize(SeriesRow {
            tahun: point.year,
            jumlah: point.value,
            jenis: "data",
        })?;
    }
    for point in forecast {
        writer.serialize(SeriesRow {
            tahun: point.year,
            jumlah: point.value,
            jenis: "prediksi",
        })?;
    }

    into_string(writer)
}

/// One row per pie slice, `daerah,jumlah,persen`. Percentages are rounded to
/// two decimals.
pub fn slices_csv(slices: &[PieSlice]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for slice in slices {
        writer.serialize(SliceRow {
            daerah: &slice.label,
            jumlah: slice.value,
            persen: (slice.percentage * 100.0).round() / 100.0,
        })?;
    }

    into_string(writer)
}

/// Parses the wide table layout: an `id` column plus one column per year.
///
/// Empty cells are missing values and non-year columns are ignored.
pub fn read_wide_csv<R: Read>(reader: R) -> Result<Vec<RegionSeries>, ExportError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();

    let id_index = headers
        .iter()
        .position(|h| h == "id")
        .ok_or_else(|| ExportError::Invalid("missing id column".to_string()))?;

    let mut year_columns = Vec::new();
    for (index, header) in headers.iter().enumerate() {
        if !is_year_column(header) {
            if index != id_index {
                debug!("Ignoring column {}", header);
            }
            continue;
        }
        match header.parse::<i32>() {
            Ok(year) => year_columns.push((index, year)),
            Err(_) => warn!("Ignoring column {} that does not fit a year", header),
        }
    }

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let id = record.get(id_index).unwrap_or_default();
        if id.is_empty() {
            return Err(ExportError::Invalid(format!("row {} has no id", line + 1)));
        }

        let mut points = Vec::new();
        for (index, year) in &year_columns {
            let cell = record.get(*index).unwrap_or_default();
            if cell.is_empty() {
                continue;
            }
            let value = cell.parse::<f64>().map_err(|_| {
                ExportError::Invalid(format!(
                    "row {} column {} holds non-numeric value {:?}",
                    line + 1,
                    year,
                    cell
                ))
            })?;
            points.push(YearValue::new(*year, value));
        }
        rows.push(RegionSeries::new(id, points));
    }

    debug!("Parsed {} rows from CSV", rows.len());
    Ok(rows)
}
