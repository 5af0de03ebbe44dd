//! Concurrent fetch and merge of an organisation's dashboard analytics.

use crate::analytics::types::{CourseSummary, EnrollmentSummary, OrgStats, OrganisationAnalytics};
use crate::backend::{AnalyticsStore, BackendError};
use crate::observability::metrics;

/// A backend read failed; the whole payload is abandoned.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("Failed to fetch organisation analytics")]
    Stats(#[source] BackendError),
    #[error("Failed to fetch top courses")]
    TopCourses(#[source] BackendError),
    #[error("Failed to fetch enrollments")]
    Enrollments(#[source] BackendError),
}

impl AnalyticsError {
    /// Short name of the failed read, used as a log field and metric label.
    pub fn query(&self) -> &'static str {
        match self {
            AnalyticsError::Stats(_) => "stats",
            AnalyticsError::TopCourses(_) => "top_courses",
            AnalyticsError::Enrollments(_) => "enrollments",
        }
    }

    pub fn backend_error(&self) -> &BackendError {
        match self {
            AnalyticsError::Stats(e)
            | AnalyticsError::TopCourses(e)
            | AnalyticsError::Enrollments(e) => e,
        }
    }
}

fn report(org_id: &str, err: AnalyticsError) -> AnalyticsError {
    tracing::error!(
        org_id = %org_id,
        query = err.query(),
        error = %err.backend_error(),
        "{}", err
    );
    metrics::record_backend_error(err.query());
    err
}

/// Fetch stats, top courses and recent enrollments for `org_id`.
///
/// The three reads run concurrently and are all awaited before any result is
/// inspected. Failures are checked in the order stats, top courses,
/// enrollments; the first one found is logged and returned. Top courses and
/// enrollments keep the order the backend returned them in.
pub async fn fetch_organisation_analytics(
    store: &dyn AnalyticsStore,
    org_id: &str,
) -> Result<OrganisationAnalytics, AnalyticsError> {
    let (stats, top_courses, enrollments) = tokio::join!(
        store.org_stats(org_id),
        store.top_courses(org_id),
        store.recent_enrollments(org_id),
    );

    let stats = stats.map_err(|e| report(org_id, AnalyticsError::Stats(e)))?;
    let top_courses = top_courses.map_err(|e| report(org_id, AnalyticsError::TopCourses(e)))?;
    let enrollments = enrollments.map_err(|e| report(org_id, AnalyticsError::Enrollments(e)))?;

    let stats = OrgStats::from(stats);

    Ok(OrganisationAnalytics {
        // Hardcoded until payments exist
        revenue: 0,
        number_of_courses: stats.number_of_courses,
        total_students: stats.total_students,
        top_courses: top_courses.into_iter().map(CourseSummary::from).collect(),
        enrollments: enrollments.into_iter().map(EnrollmentSummary::from).collect(),
    })
}
