//! Backend record and error types.
//!
//! Records mirror the rows returned by the remote views and RPCs, so field
//! names stay in the database's snake_case.

use serde::{Deserialize, Serialize};

/// Result type alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors talking to the backend service.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("backend returned {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("service key is not a valid header value")]
    InvalidServiceKey,
}

/// Identity resolved from an access token.
///
/// Only presence matters to callers; `id` and `email` are kept for logs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AuthenticatedUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Why a token did not resolve to a user.
#[derive(Debug, thiserror::Error)]
pub enum AuthFailure {
    /// The identity service rejected the token.
    #[error("token rejected by identity service")]
    InvalidToken,
    /// The identity service could not be consulted.
    #[error("identity lookup failed: {0}")]
    Lookup(#[source] BackendError),
}

/// Outcome of resolving an access token.
#[derive(Debug)]
pub enum AuthOutcome {
    Authenticated(AuthenticatedUser),
    Rejected(AuthFailure),
}

/// Row of the `dash_org_stats` view.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OrgStatsRecord {
    pub no_of_courses: i64,
    pub enrolled_students: i64,
}

/// Row returned by `get_dash_org_top_courses`.
///
/// Everything but the id may be null in the view and is passed through.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TopCourseRecord {
    pub course_id: String,
    pub course_title: Option<String>,
    pub total_students: Option<i64>,
    pub completion_percentage: Option<f64>,
}

/// Row returned by `get_dash_org_recent_enrollments`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RecentEnrollmentRecord {
    pub profile_id: String,
    pub avatar_url: Option<String>,
    pub fullname: Option<String>,
    pub course_id: String,
    pub course_title: Option<String>,
    pub enrolled_at: Option<String>,
}
