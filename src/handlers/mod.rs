//! HTTP handlers for camps and their talks.

pub mod camps;
pub mod talks;
pub use camps::*;
pub use talks::*;

use crate::error::AppError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Query};

/// Unwrap a JSON body, reporting malformed input in the standard error envelope.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    params
        .map(|Query(p)| p)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

fn parse_talk_id(id_str: &str) -> Result<i32, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid talk id: {}", id_str)))
}
