//! Live attendance counts and class attendance listing
//!
//! The live endpoint is polled by the teacher dashboard on a short
//! interval; both endpoints are pure reads.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};

use attendify_common::db::models::AttendanceRecord;

use crate::api::error::ApiError;
use crate::store::attendance::{self, DepartmentCount, LiveFilters, RecentSubmission, RecordFilters};
use crate::AppState;

fn today() -> String {
    Local::now().date_naive().to_string()
}

/// Query parameters for the live count view
#[derive(Debug, Deserialize)]
pub struct LiveQuery {
    #[serde(default)]
    pub subject: String,
    #[serde(default, alias = "department")]
    pub dept: String,
    #[serde(default)]
    pub division: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, alias = "lectureType")]
    pub lecture_type: String,
    #[serde(default, alias = "timeSlot")]
    pub time_slot: String,
    #[serde(default, alias = "sem")]
    pub semester: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AttendanceSummary {
    pub total_present: i64,
    pub unique_students: i64,
    pub total_subjects: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_eligible: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<i64>,
    pub date: String,
    pub subject: String,
    pub department: String,
    pub division: String,
    pub lecture_type: String,
    pub time_slot: String,
}

#[derive(Debug, Serialize)]
pub struct LiveAttendanceResponse {
    pub success: bool,
    pub attendance_summary: AttendanceSummary,
    pub recent_attendance: Vec<RecentSubmission>,
    pub department_breakdown: Option<Vec<DepartmentCount>>,
    pub last_updated: String,
}

/// GET /api/attendance/live
///
/// Subject and date are the two mandatory filters; date defaults to today.
pub async fn live_attendance(
    State(state): State<AppState>,
    Query(query): Query<LiveQuery>,
) -> Result<Json<LiveAttendanceResponse>, ApiError> {
    let date = query.date.filter(|d| !d.is_empty()).unwrap_or_else(today);

    let filters = LiveFilters {
        subject: query.subject,
        dept: query.dept,
        division: query.division,
        date,
        lecture_type: query.lecture_type,
        time_slot: query.time_slot,
        semester: query.semester,
    };

    let live = attendance::live_attendance(&state.db, &filters).await?;

    Ok(Json(LiveAttendanceResponse {
        success: true,
        attendance_summary: AttendanceSummary {
            total_present: live.total_present,
            unique_students: live.unique_students,
            total_subjects: live.total_subjects,
            total_eligible: live.total_eligible,
            remaining: live.remaining,
            date: filters.date,
            subject: filters.subject,
            department: filters.dept,
            division: filters.division,
            lecture_type: filters.lecture_type,
            time_slot: filters.time_slot,
        },
        recent_attendance: live.recent,
        department_breakdown: live.department_breakdown,
        last_updated: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    }))
}

/// Query parameters for the class attendance listing
#[derive(Debug, Deserialize)]
pub struct RecordsQuery {
    #[serde(default, alias = "department")]
    pub dept: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub division: String,
    #[serde(default, alias = "timeSlot")]
    pub time_slot: String,
    #[serde(default, alias = "semester")]
    pub sem: Option<i64>,
    #[serde(default)]
    pub subject: String,
}

#[derive(Debug, Serialize)]
pub struct RecordsSummary {
    pub total_students: i64,
    pub unique_students: i64,
    pub total_subjects: i64,
}

#[derive(Debug, Serialize)]
pub struct FiltersApplied {
    pub dept: String,
    pub date: String,
    pub division: String,
    #[serde(rename = "timeSlot")]
    pub time_slot: String,
    pub sem: Option<i64>,
    pub subject: String,
}

#[derive(Debug, Serialize)]
pub struct ClassAttendanceResponse {
    pub success: bool,
    pub department: String,
    pub summary: RecordsSummary,
    pub department_summary: Vec<DepartmentCount>,
    pub records: Vec<AttendanceRecord>,
    pub total_records: usize,
    pub filters_applied: FiltersApplied,
}

/// GET /api/attendance/records
///
/// Department and date are required; date defaults to today.
pub async fn list_class_attendance(
    State(state): State<AppState>,
    Query(query): Query<RecordsQuery>,
) -> Result<Json<ClassAttendanceResponse>, ApiError> {
    let date = query.date.filter(|d| !d.is_empty()).unwrap_or_else(today);

    let filters = RecordFilters {
        dept: query.dept.to_uppercase(),
        date,
        division: query.division,
        time_slot: query.time_slot,
        semester: query.sem,
        subject: query.subject,
    };

    let listing = attendance::list_records(&state.db, &filters).await?;

    Ok(Json(ClassAttendanceResponse {
        success: true,
        department: filters.dept.clone(),
        summary: RecordsSummary {
            total_students: listing.total_students,
            unique_students: listing.unique_students,
            total_subjects: listing.total_subjects,
        },
        department_summary: listing.department_summary,
        total_records: listing.records.len(),
        records: listing.records,
        filters_applied: FiltersApplied {
            dept: filters.dept,
            date: filters.date,
            division: filters.division,
            time_slot: filters.time_slot,
            sem: filters.semester,
            subject: filters.subject,
        },
    }))
}
