use std::sync::Arc;
use std::time::Duration;

use auth::SessionCodec;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::attendance_self::mark_my_attendance;
use super::handlers::attendance_self::my_attendance;
use super::handlers::create_employee::create_employee;
use super::handlers::employee_self::my_profile;
use super::handlers::leave_self::apply_my_leave;
use super::handlers::leave_self::my_leave;
use super::handlers::leave_self::my_leave_balance;
use super::handlers::login::login;
use super::handlers::set_password::set_password;
use super::handlers::timesheet_self::my_timesheets;
use super::handlers::timesheet_self::submit_my_timesheet;
use super::handlers::validate_token::validate_token;
use super::handlers::ApiError;
use super::middleware::authorize;
use crate::domain::employee::ports::EmployeeServicePort;
use crate::domain::identity::ports::IdentityServicePort;
use crate::domain::records::ports::RecordsServicePort;
use crate::domain::token::ports::SetupServicePort;

#[derive(Clone)]
pub struct AppState {
    pub employee_service: Arc<dyn EmployeeServicePort>,
    pub identity_service: Arc<dyn IdentityServicePort>,
    pub setup_service: Arc<dyn SetupServicePort>,
    pub records_service: Arc<dyn RecordsServicePort>,
    pub session_codec: Arc<SessionCodec>,
}

pub fn create_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/set-password", post(set_password))
        .route("/api/v1/auth/validate-token", get(validate_token))
        .route("/api/v1/employees", post(create_employee))
        .route("/api/v1/employees/me", get(my_profile))
        .route(
            "/api/v1/attendance/me",
            get(my_attendance).post(mark_my_attendance),
        )
        .route("/api/v1/leave/me", get(my_leave).post(apply_my_leave))
        .route("/api/v1/leave/balance/me", get(my_leave_balance))
        .route(
            "/api/v1/timesheets/me",
            get(my_timesheets).post(submit_my_timesheet),
        )
        // The fallback sits inside the authorization layer so the coarse
        // policy also covers paths no handler claims (the denylisted
        // namespaces in particular).
        .fallback(fallback)
        .layer(middleware::from_fn_with_state(state.clone(), authorize))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn fallback() -> ApiError {
    ApiError::NotFound("No such resource".to_string())
}
