//! Backend-as-a-service collaborators.
//!
//! # Data Flow
//! ```text
//! dash handler
//!     → IdentityProvider::get_user (token → AuthOutcome)
//!     → AnalyticsStore (three independent reads per org)
//!         → supabase.rs (auth API + PostgREST over reqwest)
//! ```
//!
//! # Design Decisions
//! - One client is built at startup and shared behind `Arc`
//! - Token resolution returns an explicit outcome, never an `Err`
//! - Remote rows are deserialized as-is; reshaping happens in `analytics`

pub mod supabase;
pub mod types;

use async_trait::async_trait;

pub use supabase::SupabaseClient;
pub use types::{
    AuthFailure, AuthOutcome, AuthenticatedUser, BackendError, BackendResult, OrgStatsRecord,
    RecentEnrollmentRecord, TopCourseRecord,
};

/// Resolves access tokens to users.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn get_user(&self, access_token: &str) -> AuthOutcome;
}

/// Read-only analytics queries, keyed by organisation id.
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    /// Single aggregate row for the organisation.
    async fn org_stats(&self, org_id: &str) -> BackendResult<OrgStatsRecord>;

    /// Top courses, highest completion first.
    async fn top_courses(&self, org_id: &str) -> BackendResult<Vec<TopCourseRecord>>;

    /// Most recent enrollments, in backend order.
    async fn recent_enrollments(&self, org_id: &str) -> BackendResult<Vec<RecentEnrollmentRecord>>;
}
