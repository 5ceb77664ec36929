//! Success response helpers.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// 200 with the DTO as the body.
pub fn ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// 201 with a `Location` header pointing at the new resource.
pub fn created<T: Serialize>(location: &str, data: T) -> Response {
    (StatusCode::CREATED, [(header::LOCATION, location.to_string())], Json(data)).into_response()
}

/// 200 with an empty body, used by deletes.
pub fn ok_empty() -> Response {
    StatusCode::OK.into_response()
}
