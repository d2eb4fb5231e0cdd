use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};
use model::entities::{poverty_count, prelude::PovertyCount};
use sea_orm::{EntityTrait, TransactionTrait};
use tracing::{debug, info, trace};

use super::initdb::connect_and_migrate;
use crate::export::read_wide_csv;

/// Loads a wide CSV file into the poverty table, replacing rows whose id is
/// already present.
pub async fn import_csv(csv_path: &str, database_url: &str) -> Result<usize> {
    trace!("Entering import_csv function");
    info!("Importing {}", csv_path);

    let file = File::open(csv_path).with_context(|| format!("cannot open {}", csv_path))?;
    let rows = read_wide_csv(BufReader::new(file))
        .with_context(|| format!("cannot parse {}", csv_path))?;
    debug!("Read {} rows", rows.len());

    let db = connect_and_migrate(database_url).await?;
    let txn = db.begin().await?;

    for series in &rows {
        let model = poverty_count::Model::from_series(series);
        if PovertyCount::find_by_id(model.id.clone()).one(&txn).await?.is_some() {
            debug!("Replacing row {}", model.id);
            PovertyCount::delete_by_id(model.id.clone()).exec(&txn).await?;
        }
        PovertyCount::insert(model.to_active_model()).exec(&txn).await?;
    }

    txn.commit().await?;
    info!("Imported {} rows", rows.len());
    Ok(rows.len())
}
