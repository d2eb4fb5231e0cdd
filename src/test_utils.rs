#[cfg(test)]
pub mod test_utils {
    use crate::config::Settings;
    use crate::router::create_router;
    use crate::schemas::AppState;
    use crate::source::DatabaseSource;
    use axum::Router;
    use common::{RegionSeries, YearValue, PROVINCE_ID};
    use migration::{Migrator, MigratorTrait};
    use model::entities::poverty_count;
    use moka::future::Cache;
    use sea_orm::{ActiveModelTrait, Database, DatabaseConnection};
    use std::sync::Arc;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Regions seeded into every test database, with a linear formula per
    /// region so expected values are easy to derive:
    ///
    /// * `pacitan`: 170 - 5 * (year - 2007)
    /// * `kota surabaya`: 200 - 4 * (year - 2007)
    /// * `kabupaten malang`: 300 - 6 * (year - 2007)
    /// * `kota batu`: 3 every year from 2008 on (no 2007 figure)
    /// * `jawa timur`: 5000 - 50 * (year - 2007)
    pub fn seed_series() -> Vec<RegionSeries> {
        let linear = |region: &str, start: f64, step: f64, first: i32| {
            RegionSeries::new(
                region,
                (first..=2024)
                    .map(|year| YearValue::new(year, start - step * f64::from(year - 2007)))
                    .collect(),
            )
        };

        vec![
            linear("pacitan", 170.0, 5.0, 2007),
            linear("kota surabaya", 200.0, 4.0, 2007),
            linear("kabupaten malang", 300.0, 6.0, 2007),
            linear("kota batu", 3.0, 0.0, 2008),
            linear(PROVINCE_ID, 5000.0, 50.0, 2007),
        ]
    }

    /// Create an in-memory SQLite database with the table but no rows
    pub async fn setup_empty_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
        db
    }

    /// Create an in-memory SQLite database for testing, migrated and seeded
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = setup_empty_test_db().await;

        for series in seed_series() {
            poverty_count::Model::from_series(&series)
                .to_active_model()
                .insert(&db)
                .await
                .expect("Failed to seed poverty row");
        }

        db
    }

    /// Settings for tests; the defaults read through to the database
    pub fn test_settings() -> Settings {
        Settings::default()
    }

    /// Create AppState for testing
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_test_db().await;
        state_for_db(db)
    }

    /// AppState over an existing connection
    pub fn state_for_db(db: DatabaseConnection) -> AppState {
        AppState {
            source: Arc::new(DatabaseSource::new(db)),
            cache: Cache::new(100),
            settings: Arc::new(test_settings()),
        }
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Test app plus the guard keeping its log subscriber installed; hold
    /// the guard for as long as the test runs.
    pub struct TestApp {
        pub router: Router,
        pub tracing_guard: tracing::subscriber::DefaultGuard,
    }

    /// Create axum app for testing over the seeded database
    pub async fn setup_test_app() -> TestApp {
        let guard = init_test_tracing();
        let state = setup_test_app_state().await;
        TestApp {
            router: create_router(state),
            tracing_guard: guard,
        }
    }

    /// Create axum app for testing over a table without rows
    pub async fn setup_empty_test_app() -> TestApp {
        let guard = init_test_tracing();
        let state = state_for_db(setup_empty_test_db().await);
        TestApp {
            router: create_router(state),
            tracing_guard: guard,
        }
    }
}
