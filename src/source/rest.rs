use std::time::Duration;

use async_trait::async_trait;
use common::{is_year_column, RegionSeries, YearValue, PROVINCE_ID};
use serde_json::{Map, Value};
use tracing::{debug, error, instrument, trace, warn};

use super::{SourceError, TableSource};

type Row = Map<String, Value>;

/// Table source talking to the hosted store's PostgREST endpoint
/// (`{base_url}/rest/v1/{table}`).
#[derive(Debug, Clone)]
pub struct RestSource {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl RestSource {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        table: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            table: table.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), self.table)
    }

    /// Runs a select against the table with PostgREST query parameters.
    async fn select(&self, params: &[(&str, String)]) -> Result<Vec<Row>, SourceError> {
        trace!("Selecting from {} with {:?}", self.endpoint(), params);
        let response = self
            .client
            .get(self.endpoint())
            .query(params)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Table store answered {}: {}", status, body);
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<Row> = response.json().await?;
        debug!("Received {} rows", rows.len());
        Ok(rows)
    }
}

/// `eq.`/`neq.` filter on the id column.
fn id_filter(op: &str, id: &str) -> (&'static str, String) {
    ("id", format!("{}.{}", op, id))
}

fn row_id(row: &Row) -> Result<String, SourceError> {
    row.get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| SourceError::Decode("row without a string id".to_string()))
}

/// Reads a cell that may hold a number, a numeric string or null.
fn cell_value(column: &str, value: &Value) -> Result<Option<f64>, SourceError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => Ok(number.as_f64()),
        Value::String(text) if text.trim().is_empty() => Ok(None),
        Value::String(text) => text.trim().parse::<f64>().map(Some).map_err(|_| {
            SourceError::Decode(format!("column {} holds non-numeric value {:?}", column, text))
        }),
        other => Err(SourceError::Decode(format!(
            "column {} holds unexpected value {}",
            column, other
        ))),
    }
}

/// Turns a wide JSON row into a series; numeric keys are year columns.
fn row_to_series(row: &Row) -> Result<RegionSeries, SourceError> {
    let id = row_id(row)?;
    let mut points = Vec::new();
    for (column, value) in row {
        if !is_year_column(column) {
            continue;
        }
        let Ok(year) = column.parse::<i32>() else {
            warn!("Skipping column {} that does not fit a year", column);
            continue;
        };
        if let Some(value) = cell_value(column, value)? {
            points.push(YearValue::new(year, value));
        }
    }
    Ok(RegionSeries::new(id, points))
}

#[async_trait]
impl TableSource for RestSource {
    #[instrument(skip(self))]
    async fn fetch_all(&self, include_province: bool) -> Result<Vec<RegionSeries>, SourceError> {
        let mut params = vec![("select", "*".to_string())];
        if !include_province {
            params.push(id_filter("neq", PROVINCE_ID));
        }

        self.select(&params)
            .await?
            .iter()
            .map(row_to_series)
            .collect()
    }

    #[instrument(skip(self))]
    async fn fetch_region(&self, region: &str) -> Result<Option<RegionSeries>, SourceError> {
        let params = [("select", "*".to_string()), id_filter("eq", region)];
        let rows = self.select(&params).await?;
        rows.first().map(row_to_series).transpose()
    }

    #[instrument(skip(self))]
    async fn fetch_year(&self, year: i32) -> Result<Vec<(String, f64)>, SourceError> {
        let column = year.to_string();
        let params = [
            ("select", format!("id,{}", column)),
            id_filter("neq", PROVINCE_ID),
        ];

        let mut values = Vec::new();
        for row in self.select(&params).await? {
            let id = row_id(&row)?;
            let cell = row.get(&column).unwrap_or(&Value::Null);
            if let Some(value) = cell_value(&column, cell)? {
                values.push((id, value));
            }
        }
        Ok(values)
    }

    async fn ping(&self) -> bool {
        let params = [("select", "id".to_string()), ("limit", "1".to_string())];
        match self.select(&params).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Table store ping failed: {}", e);
                false
            }
        }
    }

    fn kind(&self) -> &'static str {
        "rest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Query,
        http::{HeaderMap, StatusCode},
        routing::get,
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;
    use tokio::net::TcpListener;

    const KEY: &str = "test-key";

    fn rows() -> Vec<Value> {
        vec![
            json!({"id": "pacitan", "2007": 170.5, "2008": "165.0", "2009": null}),
            json!({"id": "kota batu", "2007": null, "2008": 3.0, "2009": 3.1}),
            json!({"id": PROVINCE_ID, "2007": 5000.0, "2008": 4950.0, "2009": 4900.0}),
        ]
    }

    /// Minimal stand-in for PostgREST: understands `select`, `id=eq.` and `id=neq.`.
    async fn postgrest(
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
    ) -> Result<Json<Vec<Value>>, StatusCode> {
        if headers.get("apikey").and_then(|v| v.to_str().ok()) != Some(KEY) {
            return Err(StatusCode::UNAUTHORIZED);
        }

        let mut result = rows();
        if let Some(filter) = params.get("id") {
            let (op, id) = filter.split_once('.').ok_or(StatusCode::BAD_REQUEST)?;
            result.retain(|row| match op {
                "eq" => row["id"] == id,
                "neq" => row["id"] != id,
                _ => true,
            });
        }

        if let Some(select) = params.get("select").filter(|s| s.as_str() != "*") {
            let columns: Vec<&str> = select.split(',').map(str::trim).collect();
            result = result
                .into_iter()
                .map(|row| {
                    let picked: Map<String, Value> = columns
                        .iter()
                        .filter_map(|c| row.get(*c).map(|v| (c.to_string(), v.clone())))
                        .collect();
                    Value::Object(picked)
                })
                .collect();
        }

        Ok(Json(result))
    }

    async fn spawn_store() -> String {
        let app = Router::new().route("/rest/v1/jumlah_penduduk_miskin", get(postgrest));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", address)
    }

    async fn source(key: &str) -> RestSource {
        let base_url = spawn_store().await;
        RestSource::new(base_url, key, common::TABLE_NAME, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_all() {
        let source = source(KEY).await;

        let regions = source.fetch_all(false).await.unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].region, "pacitan");
        // numeric strings are accepted, nulls dropped
        assert_eq!(regions[0].points, vec![YearValue::new(2007, 170.5), YearValue::new(2008, 165.0)]);

        let everything = source.fetch_all(true).await.unwrap();
        assert_eq!(everything.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_region() {
        let source = source(KEY).await;

        let batu = source.fetch_region("kota batu").await.unwrap().unwrap();
        assert_eq!(batu.years(), vec![2008, 2009]);

        assert!(source.fetch_region("atlantis").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_year() {
        let source = source(KEY).await;

        let values = source.fetch_year(2007).await.unwrap();
        assert_eq!(values, vec![("pacitan".to_string(), 170.5)]);

        let values = source.fetch_year(2008).await.unwrap();
        assert_eq!(values.len(), 2);
    }

    #[tokio::test]
    async fn test_bad_key_is_reported() {
        let source = source("wrong").await;

        let result = source.fetch_all(true).await;
        assert!(matches!(result, Err(SourceError::Status { status: 401, .. })));
        assert!(!source.ping().await);
    }

    #[test]
    fn test_cell_value_rejects_garbage() {
        assert!(cell_value("2010", &json!("abc")).is_err());
        assert!(cell_value("2010", &json!(true)).is_err());
        assert_eq!(cell_value("2010", &json!("")).unwrap(), None);
        assert_eq!(cell_value("2010", &json!(12)).unwrap(), Some(12.0));
    }
}
