//! Organisation dashboard analytics endpoint.
//!
//! # Flow
//! ```text
//! POST /api/analytics/dash { orgId }  +  Authorization: <token>
//!     → missing orgId or token        → 400
//!     → token does not resolve        → 401
//!     → cache headers set from here on
//!     → fetch_organisation_analytics  → 200 payload | 500
//! ```

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::analytics::fetch_organisation_analytics;
use crate::backend::{AuthFailure, AuthOutcome};
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;

pub const DASH_ANALYTICS_PATH: &str = "/api/analytics/dash";

/// Validated input of one analytics request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsRequest {
    pub org_id: String,
    pub access_token: String,
}

impl AnalyticsRequest {
    /// Pull `orgId` from the JSON body and the token from `Authorization`.
    ///
    /// Returns `None` when either is absent or empty. A body that is not a
    /// JSON object counts as absent. The token may be sent bare or with a
    /// `Bearer ` prefix.
    pub fn from_parts(headers: &HeaderMap, body: &[u8]) -> Option<Self> {
        let org_id = serde_json::from_slice::<serde_json::Value>(body)
            .ok()?
            .get("orgId")?
            .as_str()
            .filter(|id| !id.is_empty())?
            .to_string();

        let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim_start();
        let access_token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
        if access_token.is_empty() {
            return None;
        }

        Some(Self {
            org_id,
            access_token: access_token.to_string(),
        })
    }
}

/// `POST /api/analytics/dash`
pub async fn dash_analytics(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let response = respond(&state, &headers, &body).await;
    metrics::record_request(response.status().as_u16(), start);
    response
}

async fn respond(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Response {
    let Some(request) = AnalyticsRequest::from_parts(headers, body) else {
        return ApiError::MissingFields.into_response();
    };

    let user = match state.identity.get_user(&request.access_token).await {
        AuthOutcome::Authenticated(user) => user,
        AuthOutcome::Rejected(AuthFailure::Lookup(e)) => {
            tracing::error!(error = %e, "Identity lookup failed");
            metrics::record_backend_error("auth");
            return ApiError::Unauthenticated.into_response();
        }
        AuthOutcome::Rejected(AuthFailure::InvalidToken) => {
            tracing::debug!("Access token rejected");
            return ApiError::Unauthenticated.into_response();
        }
    };

    tracing::debug!(
        user_id = %user.id,
        org_id = %request.org_id,
        "Fetching dashboard analytics"
    );

    // Sent on the success and failure paths alike once the caller is known.
    let cache_headers = [
        (header::CACHE_CONTROL, state.cache_control.clone()),
        (header::CONTENT_TYPE, "application/json".to_string()),
    ];

    match fetch_organisation_analytics(state.store.as_ref(), &request.org_id).await {
        Ok(analytics) => (StatusCode::OK, cache_headers, Json(analytics)).into_response(),
        Err(_) => (cache_headers, ApiError::Internal).into_response(),
    }
}
