//! Axum extractor for validated garment drafts
//!
//! The `ValidatedDraft` extractor parses a JSON body into a
//! [`GarmentDraft`], validates it and normalizes it into a [`NewGarment`]
//! before the handler runs. Invalid drafts never reach the store.

use crate::core::error::InventoryError;
use crate::core::garment::{GarmentDraft, NewGarment};
use axum::{
    Json,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};

/// Validated and normalized garment fields taken from the request body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_garment(
///     State(state): State<AppState>,
///     ValidatedDraft(fields): ValidatedDraft,
/// ) -> Result<Json<Garment>, InventoryError> {
///     // fields already passed validation
/// }
/// ```
#[derive(Debug)]
pub struct ValidatedDraft(pub NewGarment);

impl ValidatedDraft {
    pub fn into_inner(self) -> NewGarment {
        self.0
    }
}

impl std::ops::Deref for ValidatedDraft {
    type Target = NewGarment;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequest<S> for ValidatedDraft
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(draft): Json<GarmentDraft> = Json::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        draft
            .into_new_garment()
            .map(ValidatedDraft)
            .map_err(InventoryError::into_response)
    }
}
