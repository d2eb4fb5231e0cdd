//! Read access to the poverty table.
//!
//! Every query is a direct pass-through to the backing store. Two backends
//! exist: a SeaORM connection (local SQLite or the hosted Postgres) and the
//! hosted store's PostgREST endpoint.

pub mod database;
pub mod rest;

use std::fmt::Debug;

use async_trait::async_trait;
use common::RegionSeries;
use thiserror::Error;

pub use database::DatabaseSource;
pub use rest::RestSource;

/// Errors raised while querying the table store.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Transport error talking to the REST endpoint
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The REST endpoint answered with a non-success status
    #[error("Table store returned {status}: {body}")]
    Status { status: u16, body: String },

    /// A row could not be turned into a series
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Queries the dashboard runs against the poverty table.
#[async_trait]
pub trait TableSource: Send + Sync + Debug {
    /// Every row, optionally including the province totals row.
    async fn fetch_all(&self, include_province: bool) -> Result<Vec<RegionSeries>, SourceError>;

    /// The row of a single region, `None` when the id is unknown.
    async fn fetch_region(&self, region: &str) -> Result<Option<RegionSeries>, SourceError>;

    /// `(region, value)` pairs of one year, without the province row and
    /// without empty cells.
    async fn fetch_year(&self, year: i32) -> Result<Vec<(String, f64)>, SourceError>;

    /// Whether the store is reachable.
    async fn ping(&self) -> bool;

    /// Short backend name for health output.
    fn kind(&self) -> &'static str;
}
