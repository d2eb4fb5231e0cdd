use anyhow::Result;
use config::{Config, ConfigError, Environment, File};
use moka::future::Cache;
use sea_orm::Database;
use serde::Deserialize;
use std::{sync::Arc, time::Duration};
use tracing::{debug, info, warn};

use crate::schemas::AppState;
use crate::source::{DatabaseSource, RestSource, TableSource};

/// Runtime configuration.
///
/// Layered as: built-in defaults, then an optional TOML file (`povstat.toml`
/// unless a path is given), then `POVSTAT_*` environment variables.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    /// Address the web server binds to
    pub bind_address: String,
    /// SeaORM database URL, used when no REST endpoint is configured
    pub database_url: String,
    /// Base URL of the hosted table store
    pub supabase_url: Option<String>,
    /// API key of the hosted table store
    pub supabase_key: Option<String>,
    /// Table holding the poverty counts on the hosted store. The SQL backend
    /// always reads the migrated `jumlah_penduduk_miskin` table.
    pub table: String,
    /// How long fetched rows are cached; 0 (the default) reads through on every request
    pub cache_ttl_secs: u64,
    /// Maximum number of cached query results
    pub cache_capacity: u64,
    /// Timeout for requests to the REST endpoint
    pub request_timeout_secs: u64,
    /// Scale factor of PNG exports (6 is roughly 600 dpi)
    pub image_scale: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            database_url: "sqlite://povstat.db?mode=rwc".to_string(),
            supabase_url: None,
            supabase_key: None,
            table: common::TABLE_NAME.to_string(),
            cache_ttl_secs: 0,
            cache_capacity: 1000,
            request_timeout_secs: 30,
            image_scale: 6,
        }
    }
}

impl Settings {
    /// Load settings from defaults, the config file and the environment.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let defaults = Settings::default();

        let settings = Config::builder()
            .set_default("bind_address", defaults.bind_address)?
            .set_default("database_url", defaults.database_url)?
            .set_default("table", defaults.table)?
            .set_default("cache_ttl_secs", defaults.cache_ttl_secs as i64)?
            .set_default("cache_capacity", defaults.cache_capacity as i64)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
            .set_default("image_scale", defaults.image_scale as i64)?
            .add_source(File::with_name(path.unwrap_or("povstat")).required(path.is_some()))
            .add_source(Environment::with_prefix("POVSTAT").try_parsing(true))
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    /// Credentials of the hosted table store, when both are configured.
    pub fn rest_endpoint(&self) -> Option<(&str, &str)> {
        match (self.supabase_url.as_deref(), self.supabase_key.as_deref()) {
            (Some(url), Some(key)) if !url.is_empty() && !key.is_empty() => Some((url, key)),
            _ => None,
        }
    }

    /// Whether a custom `table` is set that the selected backend cannot honour.
    pub fn table_ignored(&self) -> bool {
        self.rest_endpoint().is_none() && self.table != common::TABLE_NAME
    }
}

/// Connects the table source the settings select.
pub async fn connect_source(settings: &Settings) -> Result<Arc<dyn TableSource>> {
    if let Some((url, key)) = settings.rest_endpoint() {
        info!("Using hosted table store at {}", url);
        let source = RestSource::new(
            url,
            key,
            settings.table.clone(),
            Duration::from_secs(settings.request_timeout_secs),
        )?;
        return Ok(Arc::new(source));
    }

    if settings.table_ignored() {
        warn!(
            "Setting table = {:?} only applies to the hosted store; reading {}",
            settings.table,
            common::TABLE_NAME
        );
    }
    info!("Connecting to database: {}", settings.database_url);
    let db = Database::connect(&settings.database_url).await?;
    Ok(Arc::new(DatabaseSource::new(db)))
}

/// Initialize application state from settings
pub async fn initialize_app_state(settings: Settings) -> Result<AppState> {
    let source = connect_source(&settings).await?;

    debug!(
        "Cache capacity {}, ttl {}s",
        settings.cache_capacity, settings.cache_ttl_secs
    );
    let cache = Cache::builder()
        .max_capacity(settings.cache_capacity)
        .time_to_live(Duration::from_secs(settings.cache_ttl_secs.max(1)))
        .build();

    Ok(AppState {
        source,
        cache,
        settings: Arc::new(settings),
    })
}
