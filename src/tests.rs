#[cfg(test)]
mod integration_tests {
    use crate::schemas::{ApiResponse, ChartResponse, ErrorResponse, HealthResponse, RegionReport};
    use crate::test_utils::test_utils::{setup_empty_test_app, setup_test_app, TestApp};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use common::{ChartKind, PieSlice, NO_DATA_MESSAGE, OTHER_LABEL, PROVINCE_ID};
    use std::ops::Deref;

    /// Test server that keeps the test log subscriber alive with it
    struct Harness {
        server: TestServer,
        _tracing: tracing::subscriber::DefaultGuard,
    }

    impl Deref for Harness {
        type Target = TestServer;

        fn deref(&self) -> &TestServer {
            &self.server
        }
    }

    fn harness(app: TestApp) -> Harness {
        Harness {
            server: TestServer::new(app.router).unwrap(),
            _tracing: app.tracing_guard,
        }
    }

    async fn server() -> Harness {
        harness(setup_test_app().await)
    }

    async fn empty_server() -> Harness {
        harness(setup_empty_test_app().await)
    }

    #[tokio::test]
    async fn test_log_subscriber_active_while_server_lives() {
        let server = server().await;

        let installed = tracing::dispatcher::get_default(|dispatch| {
            !dispatch.is::<tracing::subscriber::NoSubscriber>()
        });
        assert!(installed);
        server.get("/health").await.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = server().await;

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: HealthResponse = response.json();
        assert_eq!(body.status, "healthy");
        assert_eq!(body.source, "database connected");
    }

    #[tokio::test]
    async fn test_list_regions() {
        let server = server().await;

        let response = server.get("/api/v1/regions").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<String>> = response.json();
        assert!(body.success);
        assert_eq!(body.data.len(), 4);
        assert!(body.data.contains(&"kota surabaya".to_string()));
        assert!(!body.data.contains(&PROVINCE_ID.to_string()));
    }

    #[tokio::test]
    async fn test_region_report_without_forecast() {
        let server = server().await;

        let response = server.get("/api/v1/regions/kota%20surabaya").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<RegionReport> = response.json();
        assert_eq!(body.data.series.region, "kota surabaya");
        assert_eq!(body.data.series.points.len(), 18);
        assert_eq!(body.data.series.value_for(2007), Some(200.0));
        assert!(body.data.trend.is_some());
        assert!(body.data.forecast.is_empty());
    }

    #[tokio::test]
    async fn test_region_report_with_forecast() {
        let server = server().await;

        let response = server
            .get("/api/v1/regions/pacitan")
            .add_query_param("forecast", "true")
            .add_query_param("horizon", "5")
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<RegionReport> = response.json();
        let years: Vec<i32> = body.data.forecast.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2025, 2026, 2027, 2028, 2029]);
        // 170 - 5 * (2029 - 2007)
        assert!((body.data.forecast[4].value - 60.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_region_report_rejects_large_horizon() {
        let server = server().await;

        let response = server
            .get("/api/v1/regions/pacitan")
            .add_query_param("forecast", "true")
            .add_query_param("horizon", "11")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_region_is_not_found() {
        let server = server().await;

        let response = server.get("/api/v1/regions/atlantis").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: ErrorResponse = response.json();
        assert_eq!(body.error, NO_DATA_MESSAGE);
        assert_eq!(body.code, "NOT_FOUND");
        assert!(!body.success);
    }

    #[tokio::test]
    async fn test_region_chart() {
        let server = server().await;

        let response = server
            .get("/api/v1/regions/kabupaten%20malang/chart")
            .add_query_param("forecast", "true")
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<ChartResponse> = response.json();
        assert_eq!(body.data.kind, ChartKind::RegionBar);
        assert_eq!(body.data.file_name, "grafik_batang_kabupaten_malang.png");
        assert_eq!(body.data.figure["data"].as_array().unwrap().len(), 3);
        assert_eq!(
            body.data.figure["layout"]["title"]["text"],
            "Grafik Jumlah Penduduk Miskin - Kabupaten malang"
        );
    }

    #[tokio::test]
    async fn test_region_csv_download() {
        let server = server().await;

        let response = server.get("/api/v1/regions/kota%20batu/csv").await;

        response.assert_status(StatusCode::OK);
        assert_eq!(
            response.header("content-disposition"),
            "attachment; filename=\"grafik_batang_kota_batu.csv\""
        );
        assert!(response
            .header("content-type")
            .to_str()
            .unwrap()
            .starts_with("text/csv"));
        let text = response.text();
        assert!(text.starts_with("tahun,jumlah,jenis\n2008,3.0,data\n"));
        assert!(!text.contains("prediksi"));
    }

    #[tokio::test]
    async fn test_year_distribution() {
        let server = server().await;

        let response = server.get("/api/v1/years/2010/distribution").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<PieSlice>> = response.json();
        let labels: Vec<&str> = body.data.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["pacitan", "kota surabaya", "kabupaten malang", OTHER_LABEL]
        );
        assert!(body.data.iter().take(3).all(|s| s.exploded));
        assert!(!body.data[3].exploded);
    }

    #[tokio::test]
    async fn test_year_outside_range_is_rejected() {
        let server = server().await;

        let response = server.get("/api/v1/years/2030/distribution").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "BAD_REQUEST");

        let response = server.get("/api/v1/years/2006/chart").await;
        response.assert_status(StatusCode::BAD_REQUEST);

        for path in ["/api/v1/years/abc/distribution", "/api/v1/years/abc/chart", "/api/v1/years/abc/csv"] {
            let response = server.get(path).await;
            response.assert_status(StatusCode::BAD_REQUEST);
            let body: ErrorResponse = response.json();
            assert_eq!(body.code, "BAD_REQUEST");
            assert!(!body.success);
        }
    }

    #[tokio::test]
    async fn test_year_chart_and_csv() {
        let server = server().await;

        let response = server.get("/api/v1/years/2015/chart").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<ChartResponse> = response.json();
        assert_eq!(body.data.file_name, "grafik_lingkaran_2015.png");
        assert_eq!(body.data.figure["data"][0]["type"], "pie");

        let response = server.get("/api/v1/years/2015/csv").await;
        response.assert_status(StatusCode::OK);
        assert!(response.text().starts_with("daerah,jumlah,persen\n"));
    }

    #[tokio::test]
    async fn test_province_report_and_chart() {
        let server = server().await;

        let response = server.get("/api/v1/province").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<RegionReport> = response.json();
        assert_eq!(body.data.series.region, PROVINCE_ID);
        assert_eq!(body.data.series.value_for(2024), Some(4150.0));

        let response = server.get("/api/v1/province/chart").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<ChartResponse> = response.json();
        assert_eq!(body.data.file_name, "grafik_batang_jawa_timur.png");

        let response = server
            .get("/api/v1/province/csv")
            .add_query_param("forecast", "true")
            .await;
        response.assert_status(StatusCode::OK);
        assert_eq!(response.text().matches("prediksi").count(), 3);
    }

    #[tokio::test]
    async fn test_totals() {
        let server = server().await;

        let response = server.get("/api/v1/totals").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<PieSlice>> = response.json();
        assert_eq!(body.data.len(), 4);
        assert!(body.data.iter().all(|s| s.label != PROVINCE_ID));

        let response = server.get("/api/v1/totals/chart").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<ChartResponse> = response.json();
        assert_eq!(body.data.kind, ChartKind::TotalPie);

        let response = server.get("/api/v1/totals/csv").await;
        response.assert_status(StatusCode::OK);
        assert_eq!(
            response.header("content-disposition"),
            "attachment; filename=\"grafik_lingkaran_total_semua_tahun.csv\""
        );
    }

    #[tokio::test]
    async fn test_screen_navigation() {
        let server = server().await;

        let response = server.get("/").await;
        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("/?screen=menu"));

        let response = server.get("/").add_query_param("screen", "menu").await;
        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("Grafik Per Daerah"));

        let response = server.get("/").add_query_param("screen", "laporan").await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert!(response.text().contains("Halaman tidak ditemukan."));
    }

    #[tokio::test]
    async fn test_per_region_screen_generates_chart() {
        let server = server().await;

        let response = server
            .get("/")
            .add_query_param("screen", "perdaerah")
            .await;
        response.assert_status(StatusCode::OK);
        let html = response.text();
        assert!(html.contains("<option value=\"kota batu\">"));
        assert!(!html.contains("Plotly.newPlot"));

        let response = server
            .get("/")
            .add_query_param("screen", "perdaerah")
            .add_query_param("region", "kota surabaya")
            .add_query_param("forecast", "on")
            .add_query_param("action", "generate")
            .await;
        response.assert_status(StatusCode::OK);
        let html = response.text();
        assert!(html.contains("Plotly.newPlot"));
        assert!(html.contains("/api/v1/regions/kota%20surabaya/csv?forecast=true"));
        assert!(html.contains("Prediksi"));
    }

    #[tokio::test]
    async fn test_per_region_screen_unknown_region() {
        let server = server().await;

        let response = server
            .get("/")
            .add_query_param("screen", "perdaerah")
            .add_query_param("region", "atlantis")
            .add_query_param("action", "generate")
            .await;

        response.assert_status(StatusCode::OK);
        assert!(response.text().contains(NO_DATA_MESSAGE));
    }

    #[tokio::test]
    async fn test_province_screen_actions() {
        let server = server().await;

        for (action, file_name) in [
            ("pie", "grafik_lingkaran_2012"),
            ("bar", "grafik_batang_jawa_timur"),
            ("total", "grafik_lingkaran_total_semua_tahun"),
        ] {
            let response = server
                .get("/")
                .add_query_param("screen", "sejawatimur")
                .add_query_param("year", "2012")
                .add_query_param("action", action)
                .await;
            response.assert_status(StatusCode::OK);
            let html = response.text();
            assert!(html.contains(file_name), "{} should offer {}", action, file_name);
            assert!(html.contains("Kembali"));
        }
    }

    #[tokio::test]
    async fn test_province_screen_without_rows() {
        let server = empty_server().await;

        for action in ["pie", "bar", "total"] {
            let response = server
                .get("/")
                .add_query_param("screen", "sejawatimur")
                .add_query_param("year", "2012")
                .add_query_param("action", action)
                .await;
            response.assert_status(StatusCode::OK);
            let html = response.text();
            assert!(html.contains(NO_DATA_MESSAGE), "{} should report no data", action);
            assert!(!html.contains("Plotly.newPlot"), "{} should not draw a chart", action);
        }
    }

    #[tokio::test]
    async fn test_api_without_rows_is_not_found() {
        let server = empty_server().await;

        for path in ["/api/v1/province", "/api/v1/totals", "/api/v1/years/2012/distribution"] {
            let response = server.get(path).await;
            response.assert_status(StatusCode::NOT_FOUND);
            let body: ErrorResponse = response.json();
            assert_eq!(body.error, NO_DATA_MESSAGE);
        }
    }
}
