use axum::response::{Html, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

pub async fn health_check() -> Json<Health> {
    Json(Health {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
    })
}

// Stoplight Elements pointed at the merged OpenAPI document.
const DOCS_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta name="viewport" content="width=device-width, initial-scale=1"/>
  <title>Roomhub API</title>
  <script src="https://unpkg.com/@stoplight/elements/web-components.min.js"></script>
  <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements/styles.min.css"/>
</head>
<body style="height: 100vh; margin: 0">
  <elements-api apiDescriptionUrl="/openapi.json" router="hash" layout="sidebar" hideSchemas="false"></elements-api>
</body>
</html>"#;

pub async fn serve_docs() -> Html<&'static str> {
    Html(DOCS_PAGE)
}
