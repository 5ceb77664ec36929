//! Camp and talk routes under /api/camps.
//! `/search` is a static segment and wins over `/:moniker`.

use crate::handlers::{
    create_camp, create_talk, delete_camp, delete_talk, get_camp, get_talk, list_camps, list_talks,
    search_camps, update_camp, update_talk,
};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn camp_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/camps", get(list_camps).post(create_camp))
        .route("/api/camps/search", get(search_camps))
        .route(
            "/api/camps/:moniker",
            get(get_camp).put(update_camp).delete(delete_camp),
        )
        .route("/api/camps/:moniker/talks", get(list_talks).post(create_talk))
        .route(
            "/api/camps/:moniker/talks/:id",
            get(get_talk).put(update_talk).delete(delete_talk),
        )
        .with_state(state)
}
