use async_trait::async_trait;
use common::{RegionSeries, PROVINCE_ID};
use model::entities::{poverty_count, prelude::PovertyCount};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect};
use tracing::{debug, instrument, trace};

use super::{SourceError, TableSource};

/// Table source backed by a SeaORM connection.
#[derive(Debug, Clone)]
pub struct DatabaseSource {
    db: DatabaseConnection,
}

impl DatabaseSource {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl TableSource for DatabaseSource {
    #[instrument(skip(self))]
    async fn fetch_all(&self, include_province: bool) -> Result<Vec<RegionSeries>, SourceError> {
        trace!("Entering fetch_all");
        let mut query = PovertyCount::find();
        if !include_province {
            query = query.filter(poverty_count::Column::Id.ne(PROVINCE_ID));
        }

        let rows = query.all(&self.db).await?;
        debug!("Fetched {} rows", rows.len());
        Ok(rows.iter().map(poverty_count::Model::series).collect())
    }

    #[instrument(skip(self))]
    async fn fetch_region(&self, region: &str) -> Result<Option<RegionSeries>, SourceError> {
        trace!("Entering fetch_region");
        let row = PovertyCount::find_by_id(region.to_string())
            .one(&self.db)
            .await?;
        Ok(row.map(|model| model.series()))
    }

    #[instrument(skip(self))]
    async fn fetch_year(&self, year: i32) -> Result<Vec<(String, f64)>, SourceError> {
        trace!("Entering fetch_year");
        let Some(column) = poverty_count::Column::for_year(year) else {
            debug!("Table has no column for year {}", year);
            return Ok(Vec::new());
        };

        let rows: Vec<(String, Option<f64>)> = PovertyCount::find()
            .select_only()
            .column(poverty_count::Column::Id)
            .column(column)
            .filter(poverty_count::Column::Id.ne(PROVINCE_ID))
            .into_tuple()
            .all(&self.db)
            .await?;

        debug!("Fetched {} rows for year {}", rows.len(), year);
        Ok(rows
            .into_iter()
            .filter_map(|(id, value)| value.map(|v| (id, v)))
            .collect())
    }

    async fn ping(&self) -> bool {
        self.db.ping().await.is_ok()
    }

    fn kind(&self) -> &'static str {
        "database"
    }
}
