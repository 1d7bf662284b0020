//! Identity Extractor
//!
//! Authentication happens upstream; the gateway forwards the caller as
//! `x-actor-id` / `x-actor-role` headers and this extractor turns them
//! into an [`Actor`].

use axum::{extract::FromRequestParts, http::request::Parts};

use shared::{Actor, Role};

use crate::core::ServerState;
use crate::utils::error::AppError;

/// Authenticated caller for protected handlers
///
/// Missing headers reject with `Unauthorized`, an unknown role string
/// with `Validation`.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

impl CurrentActor {
    /// Gate for staff-side operations
    pub fn require_order_manager(&self) -> Result<&Actor, AppError> {
        if self.0.role.can_manage_orders() {
            Ok(&self.0)
        } else {
            Err(AppError::forbidden(format!(
                "Role {} cannot manage orders",
                self.0.role
            )))
        }
    }
}

impl FromRequestParts<ServerState> for CurrentActor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted
        if let Some(actor) = parts.extensions.get::<CurrentActor>() {
            return Ok(actor.clone());
        }

        let id = parts
            .headers
            .get("x-actor-id")
            .and_then(|h| h.to_str().ok())
            .filter(|v| !v.is_empty());

        let Some(id) = id else {
            tracing::warn!(uri = %parts.uri, "Request without actor identity");
            return Err(AppError::Unauthorized);
        };

        let role = parts
            .headers
            .get("x-actor-role")
            .and_then(|h| h.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let role: Role = role
            .parse()
            .map_err(|e: String| AppError::validation(e))?;

        let actor = CurrentActor(Actor::new(id, role));
        parts.extensions.insert(actor.clone());

        Ok(actor)
    }
}
