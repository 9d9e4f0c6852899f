//! Session guard.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use personagens_core::error::CoreError;
use tower_sessions::Session;

use crate::auth::session::{SessionAuth, SESSION_AUTH_KEY};
use crate::error::AppError;

/// Forward the request only if its session holds an authenticated
/// [`SessionAuth`]; otherwise answer 401.
///
/// On success the [`SessionAuth`] is placed in the request extensions so
/// downstream handlers can read it with `Extension<SessionAuth>`.
///
/// ```ignore
/// Router::new()
///     .route("/", post(handler))
///     .route_layer(axum::middleware::from_fn(require_session));
/// ```
pub async fn require_session(
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth = session
        .get::<SessionAuth>(SESSION_AUTH_KEY)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load session");
            AppError::InternalError("Failed to load session".into())
        })?;

    match auth {
        Some(auth) if auth.authenticated => {
            request.extensions_mut().insert(auth);
            Ok(next.run(request).await)
        }
        _ => Err(AppError::Core(CoreError::Unauthorized(
            "Unauthorized access".into(),
        ))),
    }
}
