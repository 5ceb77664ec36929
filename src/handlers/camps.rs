//! Camp handlers: list, get, search by date, create, update, delete.

use super::{json_body, query_params};
use crate::entities::Entity;
use crate::error::{AppError, OrInternal};
use crate::links::Route;
use crate::models::{parse_event_date, CampModel};
use crate::response;
use crate::service::Validate;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Path, Query, State};
use axum::response::Response;
use serde::Deserialize;

const DB_FAILURE: &str = "Database failure";

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default, rename = "includeTalks", alias = "includetalks")]
    pub include_talks: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(rename = "theDate", alias = "thedate")]
    pub the_date: String,
    #[serde(default, rename = "includeTalks", alias = "includetalks")]
    pub include_talks: bool,
}

/// GET /api/camps?includeTalks=
pub async fn list_camps(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Response, AppError> {
    let params = query_params(params)?;
    let repo = state.repository();
    let camps = repo.get_all_camps(params.include_talks).await.or_internal(DB_FAILURE)?;
    let models: Vec<CampModel> = camps.iter().map(CampModel::from).collect();
    Ok(response::ok(models))
}

/// GET /api/camps/:moniker
pub async fn get_camp(
    State(state): State<AppState>,
    Path(moniker): Path<String>,
) -> Result<Response, AppError> {
    let repo = state.repository();
    let camp = repo
        .get_camp(&moniker, false)
        .await
        .or_internal(DB_FAILURE)?
        .ok_or_else(|| AppError::NotFound(format!("Could not find camp with moniker of {}", moniker)))?;
    Ok(response::ok(CampModel::from(&camp)))
}

/// GET /api/camps/search?theDate=&includeTalks=
///
/// An empty result is a 404 here, unlike the plain list.
pub async fn search_camps(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Response, AppError> {
    let params = query_params(params)?;
    let date = parse_event_date(&params.the_date)
        .ok_or_else(|| AppError::BadRequest(format!("invalid date: {}", params.the_date)))?;
    let repo = state.repository();
    let camps = repo
        .get_all_camps_by_event_date(date, params.include_talks)
        .await
        .or_internal(DB_FAILURE)?;
    if camps.is_empty() {
        return Err(AppError::NotFound(format!("No camps found on {}", date)));
    }
    let models: Vec<CampModel> = camps.iter().map(CampModel::from).collect();
    Ok(response::ok(models))
}

/// POST /api/camps
pub async fn create_camp(
    State(state): State<AppState>,
    payload: Result<Json<CampModel>, JsonRejection>,
) -> Result<Response, AppError> {
    let model = json_body(payload)?;
    model.validate()?;

    let location = state
        .links
        .path_for(Route::Camp { moniker: &model.moniker })
        .ok_or_else(|| AppError::BadRequest("Could not use current moniker".into()))?;

    let mut repo = state.repository();
    if repo.get_camp(&model.moniker, false).await.or_internal(DB_FAILURE)?.is_some() {
        return Err(AppError::BadRequest(format!("Moniker {} Already Exists", model.moniker)));
    }

    let entry = repo.add(Entity::Camp(model.to_entity()));
    if !repo.save_changes().await.or_internal(DB_FAILURE)? {
        return Err(AppError::BadRequest("Failed to save camp".into()));
    }
    let camp = repo
        .entry(entry)
        .and_then(Entity::as_camp)
        .ok_or_else(|| AppError::Internal(DB_FAILURE.into()))?;
    tracing::info!(moniker = %camp.moniker, camp_id = camp.camp_id, "camp created");
    Ok(response::created(&location, CampModel::from(camp)))
}

/// PUT /api/camps/:moniker
pub async fn update_camp(
    State(state): State<AppState>,
    Path(moniker): Path<String>,
    payload: Result<Json<CampModel>, JsonRejection>,
) -> Result<Response, AppError> {
    let model = json_body(payload)?;
    model.validate()?;

    let mut repo = state.repository();
    let mut camp = repo
        .get_camp(&moniker, false)
        .await
        .or_internal(DB_FAILURE)?
        .ok_or_else(|| AppError::NotFound(format!("Could not find camp with moniker of {}", moniker)))?;

    model.apply_to(&mut camp);
    if state.links.path_for(Route::Camp { moniker: &camp.moniker }).is_none() {
        return Err(AppError::BadRequest("Could not use current moniker".into()));
    }
    repo.update(Entity::Camp(camp.clone()));
    if !repo.save_changes().await.or_internal(DB_FAILURE)? {
        return Err(AppError::BadRequest("Failed to update camp".into()));
    }
    tracing::info!(moniker = %moniker, camp_id = camp.camp_id, "camp updated");
    Ok(response::ok(CampModel::from(&camp)))
}

/// DELETE /api/camps/:moniker
pub async fn delete_camp(
    State(state): State<AppState>,
    Path(moniker): Path<String>,
) -> Result<Response, AppError> {
    let mut repo = state.repository();
    let camp = repo
        .get_camp(&moniker, false)
        .await
        .or_internal(DB_FAILURE)?
        .ok_or_else(|| AppError::NotFound(format!("Could not find camp with moniker of {}", moniker)))?;

    repo.delete(Entity::Camp(camp));
    if !repo.save_changes().await.or_internal(DB_FAILURE)? {
        return Err(AppError::BadRequest("Failed to Delete Camp".into()));
    }
    tracing::info!(moniker = %moniker, "camp deleted");
    Ok(response::ok_empty())
}
