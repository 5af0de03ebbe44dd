//! Organisation dashboard analytics.
//!
//! # Data Flow
//! ```text
//! org_id
//!     → engine.rs (stats ∥ top courses ∥ enrollments, joined)
//!     → types.rs (backend rows → camelCase payload)
//!     → OrganisationAnalytics
//! ```

pub mod engine;
pub mod types;

pub use engine::{fetch_organisation_analytics, AnalyticsError};
pub use types::{CourseSummary, EnrollmentSummary, OrgStats, OrganisationAnalytics};
