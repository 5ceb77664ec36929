//! Talk handlers, nested under a camp: list, get, create, update, delete.
//! Every talk must resolve to its camp and to a speaker.

use super::{json_body, parse_talk_id};
use crate::entities::Entity;
use crate::error::{AppError, OrInternal};
use crate::links::Route;
use crate::models::TalkModel;
use crate::response;
use crate::service::Validate;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::response::Response;

/// GET /api/camps/:moniker/talks
///
/// A camp without talks (or an unknown camp) is a 404.
pub async fn list_talks(
    State(state): State<AppState>,
    Path(moniker): Path<String>,
) -> Result<Response, AppError> {
    let repo = state.repository();
    let talks = repo
        .get_talks_by_moniker(&moniker, true)
        .await
        .or_internal(format!("Failed to get Talks for the Camps with Moniker {}", moniker))?;
    if talks.is_empty() {
        return Err(AppError::NotFound("Talks not found".into()));
    }
    let models: Vec<TalkModel> = talks.iter().map(TalkModel::from).collect();
    Ok(response::ok(models))
}

/// GET /api/camps/:moniker/talks/:id
pub async fn get_talk(
    State(state): State<AppState>,
    Path((moniker, id_str)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let talk_id = parse_talk_id(&id_str)?;
    let repo = state.repository();
    let talk = repo
        .get_talk_by_moniker(&moniker, talk_id, true)
        .await
        .or_internal(format!("Failed to get Talk for the Camps with Moniker {}", moniker))?
        .ok_or_else(|| AppError::NotFound("Talk not found".into()))?;
    Ok(response::ok(TalkModel::from(&talk)))
}

/// POST /api/camps/:moniker/talks
pub async fn create_talk(
    State(state): State<AppState>,
    Path(moniker): Path<String>,
    payload: Result<Json<TalkModel>, JsonRejection>,
) -> Result<Response, AppError> {
    let model = json_body(payload)?;
    model.validate()?;
    let failure = || format!("Failed to create Talk for the Camps with Moniker {}", moniker);

    let mut repo = state.repository();
    let camp = repo
        .get_camp(&moniker, false)
        .await
        .or_internal(failure())?
        .ok_or_else(|| AppError::BadRequest(format!("Camp not found for the Moniker {}", moniker)))?;

    let mut talk = model.to_entity();
    talk.attach_camp(&camp);

    let speaker_ref = model
        .speaker
        .as_ref()
        .ok_or_else(|| AppError::BadRequest("Speaker ID is required".into()))?;
    let speaker = repo
        .get_speaker(speaker_ref.speaker_id)
        .await
        .or_internal(failure())?
        .ok_or_else(|| AppError::BadRequest("Speaker not found".into()))?;
    talk.attach_speaker(speaker);

    // Location must resolve before the talk is written.
    let talks_path = state
        .links
        .path_for(Route::Talks { moniker: &camp.moniker })
        .ok_or_else(|| AppError::BadRequest("Could not use current moniker".into()))?;

    let entry = repo.add(Entity::Talk(talk));
    if !repo.save_changes().await.or_internal(failure())? {
        return Err(AppError::BadRequest("Failed to save talk".into()));
    }
    let talk = repo
        .entry(entry)
        .and_then(Entity::as_talk)
        .ok_or_else(|| AppError::Internal(failure()))?;
    let location = format!("{}/{}", talks_path, talk.talk_id);
    tracing::info!(moniker = %moniker, talk_id = talk.talk_id, speaker_id = talk.speaker_id, "talk created");
    Ok(response::created(&location, TalkModel::from(talk)))
}

/// PUT /api/camps/:moniker/talks/:id
///
/// The speaker is optional here; when given it must resolve, otherwise the
/// stored association is left alone.
pub async fn update_talk(
    State(state): State<AppState>,
    Path((moniker, id_str)): Path<(String, String)>,
    payload: Result<Json<TalkModel>, JsonRejection>,
) -> Result<Response, AppError> {
    let talk_id = parse_talk_id(&id_str)?;
    let model = json_body(payload)?;
    model.validate()?;
    let failure = || format!("Failed to update Talk with Moniker {}", moniker);

    let mut repo = state.repository();
    let mut talk = repo
        .get_talk_by_moniker(&moniker, talk_id, true)
        .await
        .or_internal(failure())?
        .ok_or_else(|| AppError::NotFound("Couldn't find the talk".into()))?;

    model.apply_to(&mut talk);

    if let Some(speaker_ref) = &model.speaker {
        let speaker = repo
            .get_speaker(speaker_ref.speaker_id)
            .await
            .or_internal(failure())?
            .ok_or_else(|| AppError::BadRequest("Speaker not found".into()))?;
        talk.attach_speaker(speaker);
    }

    repo.update(Entity::Talk(talk.clone()));
    if !repo.save_changes().await.or_internal(failure())? {
        return Err(AppError::BadRequest("Failed to update database with talk".into()));
    }
    tracing::info!(moniker = %moniker, talk_id, "talk updated");
    Ok(response::ok(TalkModel::from(&talk)))
}

/// DELETE /api/camps/:moniker/talks/:id
pub async fn delete_talk(
    State(state): State<AppState>,
    Path((moniker, id_str)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let talk_id = parse_talk_id(&id_str)?;
    let failure = || format!("Failed to Delete Talk with Moniker {}", moniker);

    let mut repo = state.repository();
    let talk = repo
        .get_talk_by_moniker(&moniker, talk_id, false)
        .await
        .or_internal(failure())?
        .ok_or_else(|| AppError::NotFound("Talk not found".into()))?;

    repo.delete(Entity::Talk(talk));
    if !repo.save_changes().await.or_internal(failure())? {
        return Err(AppError::BadRequest("Failed to Delete Talk".into()));
    }
    tracing::info!(moniker = %moniker, talk_id, "talk deleted");
    Ok(response::ok_empty())
}
