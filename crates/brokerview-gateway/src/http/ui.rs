use axum::http::header;
use axum::response::Html;

static INDEX_HTML: &str = include_str!("../../static/index.html");
static SCRIPT_JS: &str = include_str!("../../static/script.js");

/// Serve the embedded dashboard page at `GET /`.
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Serve the embedded dashboard script at `GET /static/script.js`.
pub async fn script_handler() -> ([(header::HeaderName, &'static str); 1], &'static str) {
    ([(header::CONTENT_TYPE, "application/javascript")], SCRIPT_JS)
}
