// handlers/mod.rs - HTTP handlers grouped by resource
//
// Handlers stay thin: extract path/query/body, call the service held in
// `AppState`, and shape the response. Validation and store access live in
// `crate::services`.

pub mod employees;
pub mod products;
pub mod system;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;

/// `?page=N`, kept raw so a malformed page becomes a field error on `page`
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Path ids are parsed here so a non-numeric id gets the API error body
pub(crate) fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ApiError::bad_request(format!("Invalid id '{}'", raw)))
}

pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// Malformed query strings (repeated keys, bad encoding) get the API error body
pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}
