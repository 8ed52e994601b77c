//! robots.txt
//!
//! Static pages may be crawled; game endpoints never.

use axum::{http::header, response::IntoResponse, routing::get, Router};

use crate::AppState;

const ALLOWED: &[&str] = &["/", "/tos/", "/cookies/", "/home/"];
const DISALLOWED: &[&str] = &["/api/game/", "/api/images/", "/media/"];

fn render_rules() -> String {
    let mut lines = vec!["User-agent: *".to_string()];
    lines.extend(ALLOWED.iter().map(|path| format!("Allow: {}", path)));
    lines.extend(DISALLOWED.iter().map(|path| format!("Disallow: {}", path)));
    lines.push(String::new());
    lines.join("\n")
}

/// GET /robots.txt
pub async fn robots_txt() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_rules(),
    )
}

pub fn robots_routes() -> Router<AppState> {
    Router::new().route("/robots.txt", get(robots_txt))
}
