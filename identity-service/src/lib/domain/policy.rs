//! Two-layer authorization policy.
//!
//! Layer one is the coarse route table in [`routes`]; layer two is the
//! per-operation [`require_role`] check each handler runs itself. Both are
//! pure functions so rule precedence is testable without a server, and both
//! must pass for a request to reach handler logic.

pub mod routes;

use auth::Role;
use auth::SessionClaim;
use thiserror::Error;

pub use routes::route_rule;
pub use routes::RouteRule;

/// Authorization failure, mapped to 401/403 at the HTTP boundary.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Forbidden")]
    Forbidden,
}

/// Fine-grained, per-operation role check.
///
/// Runs at the point of invocation, independent of whatever the coarse layer
/// already decided for the path.
pub fn require_role(claim: &SessionClaim, allowed: &[Role]) -> Result<(), PolicyError> {
    if allowed.contains(&claim.role) {
        Ok(())
    } else {
        Err(PolicyError::Forbidden)
    }
}

/// Evaluate the coarse layer for a request path.
///
/// `claim` is the validated session claim when the request carried one.
pub fn evaluate_route(path: &str, claim: Option<&SessionClaim>) -> Result<(), PolicyError> {
    match routes::route_rule(path) {
        RouteRule::Public => Ok(()),
        RouteRule::DenyAll => Err(PolicyError::Forbidden),
        RouteRule::RequireRole(role) => match claim {
            None => Err(PolicyError::Unauthenticated),
            Some(claim) if claim.role == role => Ok(()),
            Some(_) => Err(PolicyError::Forbidden),
        },
        RouteRule::Authenticated => match claim {
            Some(_) => Ok(()),
            None => Err(PolicyError::Unauthenticated),
        },
    }
}
