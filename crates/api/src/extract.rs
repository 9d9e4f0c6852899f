//! Request extractors that report failures through [`AppError`].

use axum::extract::{FromRequest, Request};
use axum::Json;
use personagens_core::error::CoreError;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that is deserialized and then validated.
///
/// Malformed JSON, a wrong content type or a missing field become a 400
/// (413 for an oversized body) with the usual `{"error","code"}` body, and
/// failed `validator` rules become a `VALIDATION_ERROR` 400. The handler only
/// runs with a body that passed both steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::rejected(e.status(), e.body_text()))?;
        value
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        Ok(Self(value))
    }
}
