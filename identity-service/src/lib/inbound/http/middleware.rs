use async_trait::async_trait;
use auth::SessionClaim;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::request::Parts;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::policy;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Validated session claim attached to the request by the coarse layer.
///
/// Request-scoped by construction: handlers read it from extensions, never
/// from any ambient global.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal(pub SessionClaim);

/// Extractor for handlers that need the authenticated principal.
pub struct CurrentPrincipal(pub SessionClaim);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedPrincipal>()
            .map(|principal| CurrentPrincipal(principal.0.clone()))
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}

/// Coarse authorization layer, applied to every request including the
/// fallback: decode the bearer session if present, evaluate the route table,
/// then stash the principal for the handler's own fine-grained check.
pub async fn authorize(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claim = match extract_bearer(&req) {
        None => None,
        Some(token) => match state.session_codec.decode(token) {
            Ok(claim) => Some(claim),
            Err(e) => {
                tracing::warn!(error = %e, "Rejected session token");
                None
            }
        },
    };

    policy::evaluate_route(req.uri().path(), claim.as_ref())?;

    if let Some(claim) = claim {
        req.extensions_mut().insert(AuthenticatedPrincipal(claim));
    }

    Ok(next.run(req).await)
}

fn extract_bearer(req: &Request) -> Option<&str> {
    let header = req.headers().get(http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
