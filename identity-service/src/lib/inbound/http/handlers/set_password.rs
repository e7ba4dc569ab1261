use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Public endpoint completing the provisioning flow: the token proves the
/// caller owns the mailbox, the password activates the identity.
pub async fn set_password(
    State(state): State<AppState>,
    Json(body): Json<SetPasswordRequestBody>,
) -> Result<ApiSuccess<SetPasswordResponseData>, ApiError> {
    state
        .setup_service
        .consume(&body.token, &body.password)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        SetPasswordResponseData {
            message: "Password set successfully. You can now log in.".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SetPasswordRequestBody {
    token: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetPasswordResponseData {
    pub message: String,
}
