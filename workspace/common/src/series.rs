use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single yearly figure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct YearValue {
    /// Calendar year
    pub year: i32,
    /// Poverty count in thousands of people
    pub value: f64,
}

impl YearValue {
    pub fn new(year: i32, value: f64) -> Self {
        Self { year, value }
    }
}

/// Yearly poverty counts of one region, sorted by year.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct RegionSeries {
    /// Region id as stored in the table (lower-case name)
    pub region: String,
    /// Observed values, ascending by year, without empty cells
    pub points: Vec<YearValue>,
}

impl RegionSeries {
    /// Builds a series, sorting the points by year and dropping duplicate years
    /// (the first occurrence wins).
    pub fn new(region: impl Into<String>, mut points: Vec<YearValue>) -> Self {
        points.sort_by_key(|p| p.year);
        points.dedup_by_key(|p| p.year);
        Self {
            region: region.into(),
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn years(&self) -> Vec<i32> {
        self.points.iter().map(|p| p.year).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn value_for(&self, year: i32) -> Option<f64> {
        self.points
            .binary_search_by_key(&year, |p| p.year)
            .ok()
            .map(|idx| self.points[idx].value)
    }

    pub fn first_year(&self) -> Option<i32> {
        self.points.first().map(|p| p.year)
    }

    pub fn last_year(&self) -> Option<i32> {
        self.points.last().map(|p| p.year)
    }

    /// Sum over every observed year.
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }
}
