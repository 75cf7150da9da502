use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::access::{self, AccessGate};
use crate::config::AppConfig;

use super::admission::AdmissionError;
use super::domain::{ClientMeta, RsvpSubmission};
use super::repository::RsvpRepository;
use super::service::RsvpService;

/// Router-level settings, usually derived from the application config.
#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub operator_token: String,
    pub access_phrase: Option<String>,
    pub session_ttl: Duration,
    /// Storage-failure details are only echoed in development mode.
    pub expose_storage_errors: bool,
}

impl From<&AppConfig> for RouterSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            operator_token: config.rsvp.operator_token.clone(),
            access_phrase: config.rsvp.access_phrase.clone(),
            session_ttl: Duration::hours(config.rsvp.session_ttl_hours),
            expose_storage_errors: config.environment.is_development(),
        }
    }
}

pub(crate) struct RouterState<R> {
    service: Arc<RsvpService<R>>,
    settings: RouterSettings,
    access: Option<AccessGate>,
}

/// Router exposing the submission, stats, and soft-gate endpoints. Every
/// response carries open CORS headers; unknown methods on known paths get
/// an explicit 405.
pub fn rsvp_router<R>(service: Arc<RsvpService<R>>, settings: RouterSettings) -> Router
where
    R: RsvpRepository + 'static,
{
    let access = settings.access_phrase.clone().map(AccessGate::new);
    let state = Arc::new(RouterState {
        service,
        settings,
        access,
    });

    Router::new()
        .route(
            "/submit-rsvp",
            post(submit_handler::<R>)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route(
            "/rsvp-stats",
            get(stats_handler::<R>)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route(
            "/validate-access",
            post(access_handler::<R>)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .with_state(state)
}

fn cors() -> [(HeaderName, &'static str); 3] {
    [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            "Content-Type, Authorization",
        ),
        (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
    ]
}

pub(crate) async fn preflight() -> Response {
    (StatusCode::OK, cors()).into_response()
}

pub(crate) async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        cors(),
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}

fn client_meta(headers: &HeaderMap) -> ClientMeta {
    let header_text = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    ClientMeta {
        source_ip: header_text("x-forwarded-for")
            .or_else(|| header_text("x-real-ip"))
            .unwrap_or_else(|| "unknown".to_string()),
        user_agent: header_text("user-agent").unwrap_or_else(|| "unknown".to_string()),
    }
}

pub(crate) async fn submit_handler<R>(
    State(state): State<Arc<RouterState<R>>>,
    headers: HeaderMap,
    Json(submission): Json<RsvpSubmission>,
) -> Response
where
    R: RsvpRepository + 'static,
{
    let client = client_meta(&headers);
    match state.service.submit(submission, client) {
        Ok(receipt) => (
            StatusCode::OK,
            cors(),
            Json(json!({
                "success": true,
                "message": receipt.message,
                "rsvpId": receipt.rsvp_id,
            })),
        )
            .into_response(),
        Err(error) => admission_response(&error, state.settings.expose_storage_errors),
    }
}

fn admission_response(error: &AdmissionError, expose_details: bool) -> Response {
    let status = match error {
        AdmissionError::MissingField { .. }
        | AdmissionError::InvalidEmail
        | AdmissionError::NoEventSelected => StatusCode::BAD_REQUEST,
        AdmissionError::NotInvited { .. } => StatusCode::FORBIDDEN,
        AdmissionError::DuplicateSubmission => StatusCode::CONFLICT,
        AdmissionError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = if let AdmissionError::Storage(source) = error {
        error!(%source, "rsvp submission failed in storage");
        let mut body =
            json!({ "error": "There was an error processing your RSVP. Please try again later." });
        if expose_details {
            body["details"] = json!(source.to_string());
        }
        body
    } else {
        match error.field() {
            Some(field) => json!({ "error": error.to_string(), "field": field }),
            None => json!({ "error": error.to_string() }),
        }
    };

    (status, cors(), Json(body)).into_response()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

pub(crate) async fn stats_handler<R>(
    State(state): State<Arc<RouterState<R>>>,
    headers: HeaderMap,
) -> Response
where
    R: RsvpRepository + 'static,
{
    if bearer_token(&headers) != Some(state.settings.operator_token.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            cors(),
            Json(json!({ "error": "Unauthorized" })),
        )
            .into_response();
    }

    match state.service.stats() {
        Ok(report) => (StatusCode::OK, cors(), Json(report)).into_response(),
        Err(source) => {
            error!(%source, "failed to assemble rsvp stats");
            let mut body = json!({ "error": "Error fetching statistics" });
            if state.settings.expose_storage_errors {
                body["details"] = json!(source.to_string());
            }
            (StatusCode::INTERNAL_SERVER_ERROR, cors(), Json(body)).into_response()
        }
    }
}

/// Soft-gate request: a passphrase to exchange for a session token, or an
/// existing token to re-validate.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AccessRequest {
    passphrase: Option<String>,
    token: Option<String>,
}

pub(crate) async fn access_handler<R>(
    State(state): State<Arc<RouterState<R>>>,
    Json(request): Json<AccessRequest>,
) -> Response
where
    R: RsvpRepository + 'static,
{
    let Some(gate) = &state.access else {
        return (
            StatusCode::NOT_FOUND,
            cors(),
            Json(json!({ "error": "Access gate is not configured" })),
        )
            .into_response();
    };

    if let Some(token) = request.token.as_deref() {
        return if access::validate_token(token, Utc::now(), state.settings.session_ttl) {
            (StatusCode::OK, cors(), Json(json!({ "valid": true }))).into_response()
        } else {
            (
                StatusCode::UNAUTHORIZED,
                cors(),
                Json(json!({ "error": "Session expired. Please enter the password again." })),
            )
                .into_response()
        };
    }

    match request.passphrase.as_deref() {
        Some(input) if gate.verify(input) => (
            StatusCode::OK,
            cors(),
            Json(json!({ "token": access::issue_token(Utc::now()) })),
        )
            .into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            cors(),
            Json(json!({ "error": "Incorrect password. Please try again." })),
        )
            .into_response(),
    }
}
