//! Service metadata and health endpoints

use std::collections::BTreeMap;

use axum::Json;
use serde::Serialize;

pub const SERVICE_NAME: &str = "birdfeed";

#[derive(Serialize)]
pub struct ServiceInfo {
    name: &'static str,
    description: &'static str,
    version: &'static str,
    endpoints: BTreeMap<&'static str, &'static str>,
}

/// GET /
pub async fn service_info() -> Json<ServiceInfo> {
    let endpoints = BTreeMap::from([
        ("user_timeline", "/user/{username}/rss"),
        ("list_timeline", "/list/{list_id}/rss"),
        ("user_timeline_atom", "/user/{username}/atom"),
        ("list_timeline_atom", "/list/{list_id}/atom"),
        ("health", "/health"),
    ]);

    Json(ServiceInfo {
        name: SERVICE_NAME,
        description: "Generate RSS and Atom feeds from Twitter timelines",
        version: env!("CARGO_PKG_VERSION"),
        endpoints,
    })
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
    })
}
