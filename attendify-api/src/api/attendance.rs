//! Attendance submission and deletion endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use attendify_common::db::models::AttendanceRecord;

use crate::api::error::ApiError;
use crate::store::attendance::{self, BulkDeleteFilters, DeletedRecord, SubmissionInput};
use crate::AppState;

/// Submission request; accepts both the canonical storage names and the
/// session-form aliases carried by legacy links
#[derive(Debug, Deserialize)]
pub struct SubmitAttendanceRequest {
    #[serde(default, alias = "sessionId")]
    pub session_id: Option<String>,
    #[serde(default, rename = "MOT", alias = "lectureType")]
    pub mot: Option<String>,
    #[serde(default, alias = "timeSlot")]
    pub timeslot: Option<String>,
    #[serde(default, alias = "department")]
    pub dept: Option<String>,
    #[serde(default)]
    pub division: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default, alias = "faculty")]
    pub faculty_name: Option<String>,
    #[serde(default, alias = "semester")]
    pub sem: Option<i64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, alias = "email", alias = "student_email")]
    pub gmail: String,
    #[serde(default)]
    pub selfie: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitAttendanceResponse {
    pub success: bool,
    pub message: String,
    pub attendance_id: i64,
    pub record: AttendanceRecord,
}

/// POST /api/attendance
pub async fn submit_attendance(
    State(state): State<AppState>,
    Json(req): Json<SubmitAttendanceRequest>,
) -> Result<(StatusCode, Json<SubmitAttendanceResponse>), ApiError> {
    let record = attendance::submit_attendance(
        &state.db,
        SubmissionInput {
            session_id: req.session_id,
            mot: req.mot,
            timeslot: req.timeslot,
            dept: req.dept,
            division: req.division,
            subject: req.subject,
            faculty_name: req.faculty_name,
            sem: req.sem,
            date: req.date,
            gmail: req.gmail,
            selfie: req.selfie,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitAttendanceResponse {
            success: true,
            message: "Attendance recorded successfully".to_string(),
            attendance_id: record.id,
            record,
        }),
    ))
}

#[derive(Debug, Serialize)]
pub struct DeleteRecordResponse {
    pub success: bool,
    pub message: String,
    pub deleted_record: DeletedRecord,
}

/// DELETE /api/attendance/:id
pub async fn remove_attendance_record(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteRecordResponse>, ApiError> {
    let deleted = attendance::delete_record(&state.db, id).await?;
    Ok(Json(DeleteRecordResponse {
        success: true,
        message: "Attendance record deleted successfully".to_string(),
        deleted_record: deleted,
    }))
}

/// Bulk-delete request; all filters optional, empty means unconstrained
#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    #[serde(default, alias = "dept")]
    pub department: String,
    #[serde(default)]
    pub division: String,
    #[serde(default, alias = "timeSlot", alias = "timeslot")]
    pub time_slot: String,
    #[serde(default, alias = "sem")]
    pub semester: Option<i64>,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct BulkDeleteResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "deletedCount")]
    pub deleted_count: u64,
}

/// POST /api/attendance/bulk-delete
pub async fn bulk_delete_attendance(
    State(state): State<AppState>,
    Json(req): Json<BulkDeleteRequest>,
) -> Result<Json<BulkDeleteResponse>, ApiError> {
    let deleted_count = attendance::bulk_delete(
        &state.db,
        &BulkDeleteFilters {
            department: req.department,
            division: req.division,
            time_slot: req.time_slot,
            semester: req.semester,
            date: req.date,
        },
    )
    .await?;

    Ok(Json(BulkDeleteResponse {
        success: true,
        message: "Attendance records deleted successfully".to_string(),
        deleted_count,
    }))
}
