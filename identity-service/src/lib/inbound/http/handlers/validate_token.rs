use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Read-only probe the setup UI calls before showing the password form.
pub async fn validate_token(
    State(state): State<AppState>,
    Query(params): Query<ValidateTokenParams>,
) -> Result<ApiSuccess<ValidateTokenResponseData>, ApiError> {
    state
        .setup_service
        .validate(&params.token)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ValidateTokenResponseData {
            message: "Valid token".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidateTokenParams {
    token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidateTokenResponseData {
    pub message: String,
}
