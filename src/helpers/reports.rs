use common::{
    PieSlice, RegionSeries, FIRST_YEAR, LAST_YEAR, PROVINCE_ID, SMALL_SLICE_THRESHOLD_PCT,
};
use compute::{fit_linear, forecast, group_small_slices, plain_slices, PovertyTable};
use tracing::{debug, instrument, trace};

use crate::error::ApiError;
use crate::schemas::{AppState, CachedData, RegionReport};

/// Rejects years outside the published range.
pub fn check_year(year: i32) -> Result<(), ApiError> {
    if (FIRST_YEAR..=LAST_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "year {} outside {}-{}",
            year, FIRST_YEAR, LAST_YEAR
        )))
    }
}

/// Parses a year taken from the URL and checks its range.
pub fn parse_year(raw: &str) -> Result<i32, ApiError> {
    let year = raw
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid year {:?}", raw)))?;
    check_year(year)?;
    Ok(year)
}

fn caching(state: &AppState) -> bool {
    state.settings.cache_ttl_secs > 0
}

/// Every row of the table, through the cache.
async fn rows(state: &AppState, include_province: bool) -> Result<Vec<RegionSeries>, ApiError> {
    let cache_key = format!("rows_{}", include_province);
    if caching(state) {
        if let Some(CachedData::Rows(rows)) = state.cache.get(&cache_key).await {
            trace!("Rows served from cache");
            return Ok(rows);
        }
    }

    let rows = state.source.fetch_all(include_province).await?;
    if caching(state) {
        state.cache.insert(cache_key, CachedData::Rows(rows.clone())).await;
    }
    Ok(rows)
}

/// A single region's row, through the cache.
async fn region_row(state: &AppState, region: &str) -> Result<Option<RegionSeries>, ApiError> {
    let cache_key = format!("region_{}", region);
    if caching(state) {
        if let Some(CachedData::Region(row)) = state.cache.get(&cache_key).await {
            trace!("Region {} served from cache", region);
            return Ok(row);
        }
    }

    let row = state.source.fetch_region(region).await?;
    if caching(state) {
        state.cache.insert(cache_key, CachedData::Region(row.clone())).await;
    }
    Ok(row)
}

/// One year's values, through the cache.
async fn year_values(state: &AppState, year: i32) -> Result<Vec<(String, f64)>, ApiError> {
    let cache_key = format!("year_{}", year);
    if caching(state) {
        if let Some(CachedData::Year(values)) = state.cache.get(&cache_key).await {
            trace!("Year {} served from cache", year);
            return Ok(values);
        }
    }

    let values = state.source.fetch_year(year).await?;
    if caching(state) {
        state.cache.insert(cache_key, CachedData::Year(values.clone())).await;
    }
    Ok(values)
}

/// Trend and forecast for an observed series. A series the trend cannot be
/// fitted to is reported without one.
pub fn build_report(series: RegionSeries, horizon: u32) -> Result<RegionReport, ApiError> {
    let trend = match fit_linear(&series.points) {
        Ok(trend) => Some(trend),
        Err(e) => {
            debug!("No trend for {}: {}", series.region, e);
            None
        }
    };

    let forecast = if trend.is_some() && horizon > 0 {
        forecast(&series, horizon)?
    } else {
        Vec::new()
    };

    Ok(RegionReport {
        series,
        trend,
        forecast,
    })
}

/// Region ids for the region selector.
#[instrument(skip(state))]
pub async fn region_list(state: &AppState) -> Result<Vec<String>, ApiError> {
    let table = PovertyTable::from_series(&rows(state, false).await?)?;
    let regions = table.regions()?;
    debug!("Found {} regions", regions.len());
    Ok(regions)
}

#[instrument(skip(state))]
pub async fn region_report(
    state: &AppState,
    region: &str,
    horizon: u32,
) -> Result<RegionReport, ApiError> {
    let series = region_row(state, region)
        .await?
        .filter(|series| !series.is_empty())
        .ok_or(ApiError::NotFound)?;
    build_report(series, horizon)
}

/// Province totals row as a report.
#[instrument(skip(state))]
pub async fn province_report(state: &AppState, horizon: u32) -> Result<RegionReport, ApiError> {
    let table = PovertyTable::from_series(&rows(state, true).await?)?;
    let series = table
        .series(PROVINCE_ID)?
        .filter(|series| !series.is_empty())
        .ok_or(ApiError::NotFound)?;
    build_report(series, horizon)
}

/// Region shares of one year with small regions merged into one slice.
#[instrument(skip(state))]
pub async fn year_distribution(state: &AppState, year: i32) -> Result<Vec<PieSlice>, ApiError> {
    check_year(year)?;
    let values = year_values(state, year).await?;
    let slices = group_small_slices(&values, SMALL_SLICE_THRESHOLD_PCT);
    if slices.is_empty() {
        return Err(ApiError::NotFound);
    }
    debug!("Year {} split into {} slices", year, slices.len());
    Ok(slices)
}

/// Region shares of the sum over every year.
#[instrument(skip(state))]
pub async fn totals_distribution(state: &AppState) -> Result<Vec<PieSlice>, ApiError> {
    let table = PovertyTable::from_series(&rows(state, true).await?)?;
    let totals = table.totals_per_region()?;
    let slices = plain_slices(&totals);
    if slices.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(slices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::{setup_test_app_state, setup_test_db, state_for_db};
    use common::{YearValue, OTHER_LABEL};
    use model::entities::poverty_count;
    use sea_orm::ActiveModelTrait;
    use std::sync::Arc;

    #[test]
    fn test_check_year() {
        assert!(check_year(2007).is_ok());
        assert!(check_year(2024).is_ok());
        assert!(matches!(check_year(2006), Err(ApiError::BadRequest(_))));
        assert!(matches!(check_year(2025), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2015").unwrap(), 2015);
        assert!(matches!(parse_year("dua ribu"), Err(ApiError::BadRequest(_))));
        assert!(matches!(parse_year("2030"), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_build_report_single_point_has_no_trend() {
        let series = RegionSeries::new("pacitan", vec![YearValue::new(2010, 150.0)]);
        let report = build_report(series, 3).unwrap();
        assert!(report.trend.is_none());
        assert!(report.forecast.is_empty());
    }

    #[tokio::test]
    async fn test_region_list() {
        let state = setup_test_app_state().await;
        let regions = region_list(&state).await.unwrap();
        assert_eq!(regions.len(), 4);
        assert!(!regions.contains(&PROVINCE_ID.to_string()));
    }

    #[tokio::test]
    async fn test_region_report_with_forecast() {
        let state = setup_test_app_state().await;

        let report = region_report(&state, "pacitan", 3).await.unwrap();
        assert_eq!(report.series.points.len(), 18);
        let trend = report.trend.unwrap();
        assert!((trend.slope + 5.0).abs() < 1e-9);
        let years: Vec<i32> = report.forecast.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2025, 2026, 2027]);
        // 170 - 5 * 18
        assert!((report.forecast[0].value - 80.0).abs() < 1e-6);

        let report = region_report(&state, "pacitan", 0).await.unwrap();
        assert!(report.forecast.is_empty());
        assert!(report.trend.is_some());

        assert!(matches!(
            region_report(&state, "atlantis", 3).await,
            Err(ApiError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_province_report() {
        let state = setup_test_app_state().await;
        let report = province_report(&state, 0).await.unwrap();
        assert_eq!(report.series.region, PROVINCE_ID);
        assert_eq!(report.series.value_for(2007), Some(5000.0));
    }

    #[tokio::test]
    async fn test_year_distribution_groups_small_regions() {
        let state = setup_test_app_state().await;

        // 2010: pacitan 155, surabaya 188, malang 282, batu 3 (below 1%)
        let slices = year_distribution(&state, 2010).await.unwrap();
        assert_eq!(slices.len(), 4);
        assert_eq!(slices.last().unwrap().label, OTHER_LABEL);
        assert_eq!(slices.last().unwrap().value, 3.0);

        assert!(matches!(
            year_distribution(&state, 1999).await,
            Err(ApiError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_totals_distribution() {
        let state = setup_test_app_state().await;
        let slices = totals_distribution(&state).await.unwrap();
        assert_eq!(slices.len(), 4);
        let total: f64 = slices.iter().map(|s| s.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
        // 17 years of 3 for kota batu
        let batu = slices.iter().find(|s| s.label == "kota batu").unwrap();
        assert_eq!(batu.value, 51.0);
    }

    #[tokio::test]
    async fn test_cache_serves_previous_rows() {
        let mut state = setup_test_app_state().await;
        let mut settings = (*state.settings).clone();
        settings.cache_ttl_secs = 60;
        state.settings = Arc::new(settings);

        let first = region_list(&state).await.unwrap();
        assert!(state.cache.get("rows_false").await.is_some());
        let second = region_list(&state).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_default_settings_see_new_rows() {
        let db = setup_test_db().await;
        let state = state_for_db(db.clone());
        assert_eq!(state.settings.cache_ttl_secs, 0);

        let before = region_list(&state).await.unwrap();
        assert!(!before.contains(&"kota madiun".to_string()));

        let series = RegionSeries::new("kota madiun", vec![YearValue::new(2020, 9.0)]);
        poverty_count::Model::from_series(&series)
            .to_active_model()
            .insert(&db)
            .await
            .unwrap();

        let after = region_list(&state).await.unwrap();
        assert_eq!(after.len(), before.len() + 1);
        assert!(after.contains(&"kota madiun".to_string()));
        assert!(state.cache.get("rows_false").await.is_none());
    }
}
