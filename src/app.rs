use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Extension};
use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, SecurityConfig};
use crate::database::Store;
use crate::handlers::{employees, products, system};
use crate::services::{EmployeeService, ProductService};

/// Shared per-process state handed to every handler through `Extension`
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub employees: EmployeeService,
    pub products: ProductService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, page_size: i64) -> Self {
        Self {
            employees: EmployeeService::new(store.clone(), page_size),
            products: ProductService::new(store.clone(), page_size),
            store,
        }
    }
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .merge(employee_routes())
        .merge(product_routes())
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer(&config.security))
                .layer(Extension(state))
                .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes)),
        );

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn employee_routes() -> Router {
    Router::new()
        .route("/employees", get(employees::list).post(employees::create))
        .route("/employees/search", get(employees::search))
        .route("/employees/territories", get(employees::territories))
        .route(
            "/employees/:id",
            get(employees::show).put(employees::update).delete(employees::delete),
        )
        .route("/employees/:id/territories", get(employees::employee_territories))
}

fn product_routes() -> Router {
    Router::new()
        .route("/products", get(products::list).post(products::create))
        .route("/products/search", get(products::search))
        .route("/products/categories", get(products::categories))
        .route("/products/suppliers", get(products::suppliers))
        .route(
            "/products/:id",
            get(products::show).put(products::update).delete(products::delete),
        )
}

/// Empty origin list means any origin
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
