use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let grant = state
        .identity_service
        .login(&body.email, &body.password)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            access_token: grant.access_token,
            expires_at: grant.claim.exp,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub access_token: String,
    pub expires_at: i64,
}
