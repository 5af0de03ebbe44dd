//! HTTP client for a Supabase project.
//!
//! # Responsibilities
//! - Resolve user access tokens through the auth API
//! - Query the stats view and call the analytics RPCs through PostgREST
//! - Map non-2xx responses into `BackendError::Status`

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::backend::types::{
    AuthFailure, AuthOutcome, AuthenticatedUser, BackendError, BackendResult, OrgStatsRecord,
    RecentEnrollmentRecord, TopCourseRecord,
};
use crate::backend::{AnalyticsStore, IdentityProvider};
use crate::config::BackendConfig;

const AUTH_USER_PATH: &str = "auth/v1/user";
const REST_PATH: &str = "rest/v1/";

const ORG_STATS_VIEW: &str = "dash_org_stats";
const TOP_COURSES_RPC: &str = "get_dash_org_top_courses";
const RECENT_ENROLLMENTS_RPC: &str = "get_dash_org_recent_enrollments";

/// PostgREST media type that returns exactly one row as an object.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

#[derive(Serialize)]
struct OrgRpcArgs<'a> {
    org_id_arg: &'a str,
}

/// Error body shape shared by PostgREST and the auth API.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "msg", alias = "error_description")]
    message: Option<String>,
}

/// Client for the auth and REST APIs of one project.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct SupabaseClient {
    client: reqwest::Client,
    base_url: Url,
    service_key: String,
}

impl SupabaseClient {
    /// Create a client for the configured project.
    pub fn new(config: &BackendConfig) -> BackendResult<Self> {
        let mut base_url = Url::parse(&config.url)
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {}", config.url, e)))?;

        // Url::join replaces the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let key = HeaderValue::from_str(&config.service_key)
            .map_err(|_| BackendError::InvalidServiceKey)?;
        let mut headers = HeaderMap::new();
        headers.insert("apikey", key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        tracing::info!(url = %base_url, "Backend client initialized");

        Ok(Self {
            client,
            base_url,
            service_key: config.service_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> BackendResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {}", path, e)))
    }

    fn rest(&self, path: &str) -> BackendResult<Url> {
        self.endpoint(&format!("{}{}", REST_PATH, path))
    }

    /// Attach service credentials for PostgREST calls.
    fn with_service_auth(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.service_key)
    }

    async fn call_rpc<T: DeserializeOwned>(
        &self,
        function: &str,
        org_id: &str,
        order: Option<&str>,
    ) -> BackendResult<T> {
        let url = self.rest(&format!("rpc/{}", function))?;
        let mut request = self
            .with_service_auth(self.client.post(url))
            .json(&OrgRpcArgs { org_id_arg: org_id });

        if let Some(order) = order {
            request = request.query(&[("order", order)]);
        }

        let response = check_status(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Pass 2xx responses through; turn anything else into `BackendError::Status`.
async fn check_status(response: Response) -> BackendResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.message)
        .unwrap_or(text);

    Err(BackendError::Status { status, message })
}

#[async_trait]
impl IdentityProvider for SupabaseClient {
    async fn get_user(&self, access_token: &str) -> AuthOutcome {
        let url = match self.endpoint(AUTH_USER_PATH) {
            Ok(url) => url,
            Err(e) => return AuthOutcome::Rejected(AuthFailure::Lookup(e)),
        };

        let response = match self.client.get(url).bearer_auth(access_token).send().await {
            Ok(response) => response,
            Err(e) => return AuthOutcome::Rejected(AuthFailure::Lookup(e.into())),
        };

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                AuthOutcome::Rejected(AuthFailure::InvalidToken)
            }
            _ => match check_status(response).await {
                Ok(response) => match response.json::<AuthenticatedUser>().await {
                    Ok(user) => AuthOutcome::Authenticated(user),
                    Err(e) => AuthOutcome::Rejected(AuthFailure::Lookup(e.into())),
                },
                Err(e) => AuthOutcome::Rejected(AuthFailure::Lookup(e)),
            },
        }
    }
}

#[async_trait]
impl AnalyticsStore for SupabaseClient {
    async fn org_stats(&self, org_id: &str) -> BackendResult<OrgStatsRecord> {
        let url = self.rest(ORG_STATS_VIEW)?;
        let filter = format!("eq.{}", org_id);
        let request = self
            .with_service_auth(self.client.get(url))
            .header(ACCEPT, SINGLE_OBJECT)
            .query(&[("select", "*"), ("org_id", filter.as_str())]);

        let response = check_status(request.send().await?).await?;
        Ok(response.json::<OrgStatsRecord>().await?)
    }

    async fn top_courses(&self, org_id: &str) -> BackendResult<Vec<TopCourseRecord>> {
        self.call_rpc(TOP_COURSES_RPC, org_id, Some("completion_percentage.desc"))
            .await
    }

    async fn recent_enrollments(&self, org_id: &str) -> BackendResult<Vec<RecentEnrollmentRecord>> {
        self.call_rpc(RECENT_ENROLLMENTS_RPC, org_id, None).await
    }
}
