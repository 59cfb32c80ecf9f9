// handlers/system.rs - GET / and GET /health

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET / - service info
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Northwind Admin API",
        "version": version,
        "description": "Employee and product administration over the Northwind schema",
        "endpoints": {
            "employees": "/employees[/:id], /employees/search, /employees/territories, /employees/:id/territories",
            "products": "/products[/:id], /products/search, /products/categories, /products/suppliers",
            "health": "/health",
        }
    }))
}

/// GET /health - 503 when the store is unreachable
pub async fn health(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let backend = state.store.backend_name();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": backend
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "store": backend,
                    "error": "store unavailable"
                })),
            )
        }
    }
}
