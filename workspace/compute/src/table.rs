//! In-memory copy of the poverty table.
//!
//! Rows are kept in the same wide shape the hosted table uses (an `id` column
//! plus one column per year) so per-year and per-region views are plain
//! column/row reads.

use std::collections::{BTreeSet, HashSet};

use common::{is_year_column, RegionSeries, YearValue, PROVINCE_ID};
use polars::prelude::*;
use tracing::{debug, instrument, trace};

use crate::error::{ComputeError, Result};

/// Name of the region id column.
pub const ID_COLUMN: &str = "id";

/// Wide poverty table backed by a polars [`DataFrame`].
#[derive(Debug, Clone)]
pub struct PovertyTable {
    df: DataFrame,
}

impl PovertyTable {
    /// Builds the table from fetched rows. The year columns are the union of
    /// every row's years, ascending.
    #[instrument(skip(rows), fields(num_rows = rows.len()))]
    pub fn from_series(rows: &[RegionSeries]) -> Result<Self> {
        let years: BTreeSet<i32> = rows.iter().flat_map(|row| row.years()).collect();
        debug!("Building table with {} rows and {} year columns", rows.len(), years.len());

        let ids: Vec<&str> = rows.iter().map(|row| row.region.as_str()).collect();
        let mut columns: Vec<Column> = Vec::with_capacity(years.len() + 1);
        columns.push(Series::new(ID_COLUMN.into(), ids).into());

        for year in &years {
            let values: Vec<Option<f64>> = rows.iter().map(|row| row.value_for(*year)).collect();
            columns.push(Series::new(year.to_string().into(), values).into());
        }

        let df = DataFrame::new(columns)?;
        Ok(Self { df })
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Numeric column names, ascending.
    pub fn year_columns(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self
            .df
            .get_column_names()
            .into_iter()
            .filter(|name| is_year_column(name.as_str()))
            .filter_map(|name| name.as_str().parse().ok())
            .collect();
        years.sort_unstable();
        years
    }

    /// Unique region ids in first-seen order, without the province row.
    pub fn regions(&self) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let regions = self
            .ids()?
            .into_iter()
            .flatten()
            .filter(|id| id != PROVINCE_ID)
            .filter(|id| seen.insert(id.clone()))
            .collect();
        Ok(regions)
    }

    /// The first row with the given id as a series.
    #[instrument(skip(self))]
    pub fn series(&self, region: &str) -> Result<Option<RegionSeries>> {
        let ids = self.ids()?;
        let Some(row) = ids.iter().position(|id| id.as_deref() == Some(region)) else {
            debug!("Region {} not present in table", region);
            return Ok(None);
        };

        let mut points = Vec::new();
        for year in self.year_columns() {
            if let Some(value) = self.year_column(year)?.get(row) {
                points.push(YearValue::new(year, value));
            }
        }

        Ok(Some(RegionSeries::new(region, points)))
    }

    /// Table without the province row.
    pub fn without_province(&self) -> Result<Self> {
        let df = self
            .df
            .clone()
            .lazy()
            .filter(col(ID_COLUMN).neq(lit(PROVINCE_ID)))
            .collect()?;
        trace!("Dropped province row, {} rows left", df.height());
        Ok(Self { df })
    }

    /// Sum over every year column per region, without the province row.
    /// Empty cells count as zero.
    #[instrument(skip(self))]
    pub fn totals_per_region(&self) -> Result<Vec<(String, f64)>> {
        let regions = self.without_province()?;
        let ids = regions.ids()?;
        let mut totals = vec![0.0; ids.len()];

        for year in regions.year_columns() {
            let values = regions.year_column(year)?;
            for (total, value) in totals.iter_mut().zip(&values) {
                *total += value.unwrap_or(0.0);
            }
        }

        let result: Vec<(String, f64)> = ids
            .into_iter()
            .zip(totals)
            .filter_map(|(id, total)| id.map(|id| (id, total)))
            .collect();
        debug!("Computed totals for {} regions", result.len());
        Ok(result)
    }

    fn ids(&self) -> Result<Vec<Option<String>>> {
        let ids = self
            .df
            .column(ID_COLUMN)?
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|id| id.map(str::to_string))
            .collect();
        Ok(ids)
    }

    fn year_column(&self, year: i32) -> Result<Float64Chunked> {
        let name = year.to_string();
        let column = self
            .df
            .column(&name)
            .map_err(|_| ComputeError::MissingColumn(name.clone()))?;
        let values = column.as_materialized_series().f64()?.clone();
        Ok(values)
    }
}
