pub mod health;
pub mod province;
pub mod regions;
pub mod screens;
pub mod totals;
pub mod years;

use axum::{
    http::header,
    response::{IntoResponse, Response},
};

use crate::export::CSV_CONTENT_TYPE;

/// CSV body served as a download named `{stem}.csv`.
pub fn csv_attachment(stem: &str, body: String) -> Response {
    let disposition = format!("attachment; filename=\"{}.csv\"", stem);
    (
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}
