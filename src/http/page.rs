//! `GET /`: the static calculator page.

use axum::response::Html;

/// The page: two inputs, a button, and script that calls `/api/add`.
pub const INDEX_HTML: &str = include_str!("../../static/index.html");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
