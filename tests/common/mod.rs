//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

use dash_analytics::backend::{
    AnalyticsStore, AuthFailure, AuthOutcome, AuthenticatedUser, BackendError, BackendResult,
    IdentityProvider, OrgStatsRecord, RecentEnrollmentRecord, TopCourseRecord,
};
use dash_analytics::config::{CacheConfig, SecurityConfig};
use dash_analytics::http::{build_router, AppState, Backends, DASH_ANALYTICS_PATH};

pub const SERVICE_KEY: &str = "service-key";
pub const GOOD_TOKEN: &str = "good-token";
pub const ORG_ID: &str = "org-1";

// ---------------------------------------------------------------------------
// In-process collaborator doubles
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AuthMode {
    Valid,
    InvalidToken,
    LookupError,
}

/// Records every call and answers with the example dataset.
pub struct RecordingBackend {
    pub auth: AuthMode,
    pub fail: Vec<&'static str>,
    pub auth_calls: AtomicUsize,
    pub tokens: Mutex<Vec<String>>,
    pub queries: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingBackend {
    pub fn new(auth: AuthMode) -> Arc<Self> {
        Self::failing(auth, &[])
    }

    /// `fail` names the reads that error: `stats`, `top_courses`, `enrollments`.
    pub fn failing(auth: AuthMode, fail: &[&'static str]) -> Arc<Self> {
        Arc::new(Self {
            auth,
            fail: fail.to_vec(),
            auth_calls: AtomicUsize::new(0),
            tokens: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<(&'static str, String)> {
        self.queries.lock().unwrap().clone()
    }

    fn record(&self, query: &'static str, org_id: &str) -> BackendResult<()> {
        self.queries.lock().unwrap().push((query, org_id.to_string()));
        if self.fail.contains(&query) {
            return Err(BackendError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("{} exploded", query),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for RecordingBackend {
    async fn get_user(&self, access_token: &str) -> AuthOutcome {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        self.tokens.lock().unwrap().push(access_token.to_string());
        match self.auth {
            AuthMode::Valid => AuthOutcome::Authenticated(AuthenticatedUser {
                id: "user-1".into(),
                email: Some("jane@example.com".into()),
            }),
            AuthMode::InvalidToken => AuthOutcome::Rejected(AuthFailure::InvalidToken),
            AuthMode::LookupError => AuthOutcome::Rejected(AuthFailure::Lookup(
                BackendError::InvalidUrl("identity service unreachable".into()),
            )),
        }
    }
}

#[async_trait]
impl AnalyticsStore for RecordingBackend {
    async fn org_stats(&self, org_id: &str) -> BackendResult<OrgStatsRecord> {
        self.record("stats", org_id)?;
        Ok(example_stats())
    }

    async fn top_courses(&self, org_id: &str) -> BackendResult<Vec<TopCourseRecord>> {
        self.record("top_courses", org_id)?;
        Ok(vec![example_top_course()])
    }

    async fn recent_enrollments(&self, org_id: &str) -> BackendResult<Vec<RecentEnrollmentRecord>> {
        self.record("enrollments", org_id)?;
        Ok(vec![example_enrollment()])
    }
}

pub fn example_stats() -> OrgStatsRecord {
    OrgStatsRecord {
        no_of_courses: 3,
        enrolled_students: 42,
    }
}

pub fn example_top_course() -> TopCourseRecord {
    TopCourseRecord {
        course_id: "c1".into(),
        course_title: Some("Intro".into()),
        total_students: Some(10),
        completion_percentage: Some(80.0),
    }
}

pub fn example_enrollment() -> RecentEnrollmentRecord {
    RecentEnrollmentRecord {
        profile_id: "u1".into(),
        avatar_url: Some("a.png".into()),
        fullname: Some("Jane".into()),
        course_id: "c1".into(),
        course_title: Some("Intro".into()),
        enrolled_at: Some("2024-01-01".into()),
    }
}

/// The payload expected for the example dataset.
pub fn example_payload() -> Value {
    json!({
        "revenue": 0,
        "numberOfCourses": 3,
        "totalStudents": 42,
        "topCourses": [
            {"id": "c1", "title": "Intro", "enrollments": 10, "completion": 80.0}
        ],
        "enrollments": [
            {
                "id": "u1",
                "avatarUrl": "a.png",
                "name": "Jane",
                "courseId": "c1",
                "course": "Intro",
                "date": "2024-01-01"
            }
        ]
    })
}

/// Router wired to `backend` for both collaborator roles, default config.
pub fn app(backend: Arc<RecordingBackend>) -> Router {
    let backends = Backends {
        identity: backend.clone(),
        store: backend,
    };
    build_router(
        AppState::new(backends, &CacheConfig::default()),
        &SecurityConfig::default(),
    )
}

/// Send one POST to the analytics route.
pub async fn post_dash(app: Router, body: &str, authorization: Option<&str>) -> Response {
    let mut request = Request::builder()
        .method("POST")
        .uri(DASH_ANALYTICS_PATH)
        .header("content-type", "application/json");
    if let Some(auth) = authorization {
        request = request.header("Authorization", auth);
    }

    app.oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fake Supabase project over real HTTP
// ---------------------------------------------------------------------------

/// One request as seen by the fake backend.
#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Serves the auth user endpoint, the stats view and both RPCs.
///
/// `fail` holds request paths that answer 500 with a PostgREST error body.
/// With `null_columns` set, both RPCs answer one row whose nullable columns
/// are all null.
#[derive(Clone, Default)]
pub struct FakeSupabase {
    pub requests: Arc<Mutex<Vec<Recorded>>>,
    pub fail: Arc<Vec<&'static str>>,
    pub null_columns: bool,
}

impl FakeSupabase {
    pub fn failing(paths: &[&'static str]) -> Self {
        Self {
            fail: Arc::new(paths.to_vec()),
            ..Self::default()
        }
    }

    pub fn with_null_columns() -> Self {
        Self {
            null_columns: true,
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    /// Bind to an ephemeral port and return the base URL.
    pub async fn spawn(&self) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(fake_handler).with_state(self.clone());

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        format!("http://{}", addr)
    }
}

async fn fake_handler(
    State(fake): State<FakeSupabase>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let query: HashMap<String, String> = uri
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();
    let path = uri.path().to_string();

    fake.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        query: query.clone(),
        headers: headers.clone(),
        body: serde_json::from_slice(&body).ok(),
    });

    if headers.get("apikey").and_then(|v| v.to_str().ok()) != Some(SERVICE_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid API key"})),
        )
            .into_response();
    }

    if fake.fail.iter().any(|p| *p == path) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"code": "XX000", "message": "relation exploded"})),
        )
            .into_response();
    }

    match (method, path.as_str()) {
        (Method::POST, "/rest/v1/rpc/get_dash_org_top_courses") if fake.null_columns => Json(json!([
            {"course_id": "c1", "course_title": null, "total_students": null, "completion_percentage": null}
        ]))
        .into_response(),
        (Method::POST, "/rest/v1/rpc/get_dash_org_recent_enrollments") if fake.null_columns => Json(json!([
            {"profile_id": "u1", "avatar_url": null, "fullname": null, "course_id": "c1", "course_title": null, "enrolled_at": null}
        ]))
        .into_response(),
        (Method::GET, "/auth/v1/user") => {
            let expected = format!("Bearer {}", GOOD_TOKEN);
            if headers.get("authorization").and_then(|v| v.to_str().ok()) == Some(expected.as_str()) {
                Json(json!({
                    "id": "user-1",
                    "aud": "authenticated",
                    "email": "jane@example.com"
                }))
                .into_response()
            } else {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"code": 401, "msg": "invalid JWT"})),
                )
                    .into_response()
            }
        }
        (Method::GET, "/rest/v1/dash_org_stats") => {
            let expected = format!("eq.{}", ORG_ID);
            if query.get("org_id").map(String::as_str) == Some(expected.as_str()) {
                Json(json!({"org_id": ORG_ID, "no_of_courses": 3, "enrolled_students": 42}))
                    .into_response()
            } else {
                (
                    StatusCode::NOT_ACCEPTABLE,
                    Json(json!({
                        "code": "PGRST116",
                        "message": "JSON object requested, multiple (or no) rows returned"
                    })),
                )
                    .into_response()
            }
        }
        (Method::POST, "/rest/v1/rpc/get_dash_org_top_courses") => Json(json!([
            {"course_id": "c2", "course_title": "Advanced", "total_students": 4, "completion_percentage": 95.5},
            {"course_id": "c1", "course_title": "Intro", "total_students": 10, "completion_percentage": 80}
        ]))
        .into_response(),
        (Method::POST, "/rest/v1/rpc/get_dash_org_recent_enrollments") => Json(json!([
            {"profile_id": "u2", "avatar_url": null, "fullname": "Sam", "course_id": "c2", "course_title": "Advanced", "enrolled_at": "2024-02-01"},
            {"profile_id": "u1", "avatar_url": "a.png", "fullname": "Jane", "course_id": "c1", "course_title": "Intro", "enrolled_at": "2024-01-01"}
        ]))
        .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
