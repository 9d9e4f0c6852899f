//! Route definitions for the `/api/personagens` resource.

use axum::middleware;
use axum::routing::{get, post, put, MethodRouter};
use axum::Router;

use crate::handlers::character;
use crate::middleware::session::require_session;
use crate::state::AppState;

/// Routes mounted at `/api/personagens`.
///
/// ```text
/// GET    /       -> list
/// POST   /       -> create      (multipart, `foto` required)
/// GET    /{id}   -> get_by_id
/// PUT    /{id}   -> update      (multipart, all fields optional)
/// DELETE /{id}   -> delete
/// ```
///
/// Reads are always public. Writes pass through the session guard only when
/// `guard_writes` is set.
pub fn router(guard_writes: bool) -> Router<AppState> {
    let guarded = |route: MethodRouter<AppState>| {
        if guard_writes {
            route.route_layer(middleware::from_fn(require_session))
        } else {
            route
        }
    };

    Router::new()
        .route(
            "/",
            get(character::list).merge(guarded(post(character::create))),
        )
        .route(
            "/{id}",
            get(character::get_by_id)
                .merge(guarded(put(character::update).delete(character::delete))),
        )
}
