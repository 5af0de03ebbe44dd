//! Dashboard analytics payload types.

use serde::{Deserialize, Serialize};

use crate::backend::{OrgStatsRecord, RecentEnrollmentRecord, TopCourseRecord};

/// Aggregate counters for an organisation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgStats {
    pub number_of_courses: i64,
    pub total_students: i64,
}

/// One of the organisation's top courses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: String,
    pub title: Option<String>,
    /// Number of enrolled students.
    pub enrollments: Option<i64>,
    /// Completion percentage, 0 to 100.
    pub completion: Option<f64>,
}

/// A recent enrollment into one of the organisation's courses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentSummary {
    /// Profile id of the enrolled student.
    pub id: String,
    pub avatar_url: Option<String>,
    pub name: Option<String>,
    pub course_id: String,
    /// Course title.
    pub course: Option<String>,
    /// Enrollment timestamp as stored by the backend.
    pub date: Option<String>,
}

/// Response body of the dashboard analytics endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationAnalytics {
    /// Always zero until payments exist.
    pub revenue: i64,
    pub number_of_courses: i64,
    pub total_students: i64,
    pub top_courses: Vec<CourseSummary>,
    pub enrollments: Vec<EnrollmentSummary>,
}

impl From<OrgStatsRecord> for OrgStats {
    fn from(record: OrgStatsRecord) -> Self {
        OrgStats {
            number_of_courses: record.no_of_courses,
            total_students: record.enrolled_students,
        }
    }
}

impl From<TopCourseRecord> for CourseSummary {
    fn from(record: TopCourseRecord) -> Self {
        CourseSummary {
            id: record.course_id,
            title: record.course_title,
            enrollments: record.total_students,
            completion: record.completion_percentage,
        }
    }
}

impl From<RecentEnrollmentRecord> for EnrollmentSummary {
    fn from(record: RecentEnrollmentRecord) -> Self {
        EnrollmentSummary {
            id: record.profile_id,
            avatar_url: record.avatar_url,
            name: record.fullname,
            course_id: record.course_id,
            course: record.course_title,
            date: record.enrolled_at,
        }
    }
}
