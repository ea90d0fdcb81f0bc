//! Session registry endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use attendify_common::db::models::AttendanceSession;

use crate::api::error::ApiError;
use crate::api::teachers::MessageResponse;
use crate::store::sessions::{self, NewSession};
use crate::AppState;

/// Create-session request; accepts the teacher form's camelCase names
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub subject: String,
    #[serde(default, alias = "dept")]
    pub department: String,
    #[serde(default)]
    pub division: String,
    #[serde(default, alias = "sem")]
    pub semester: Option<i64>,
    #[serde(default, alias = "lectureType", alias = "MOT")]
    pub lecture_type: String,
    #[serde(default, alias = "timeSlot", alias = "timeslot")]
    pub time_slot: String,
    #[serde(default)]
    pub classroom: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, alias = "faculty")]
    pub faculty_name: String,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub success: bool,
    pub session_id: String,
    #[serde(rename = "attendanceLink")]
    pub attendance_link: String,
    pub session: AttendanceSession,
}

/// POST /api/sessions
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), ApiError> {
    let session = sessions::create_session(
        &state.db,
        NewSession {
            subject: req.subject,
            department: req.department,
            division: req.division,
            semester: req.semester.unwrap_or(0),
            lecture_type: req.lecture_type,
            time_slot: req.time_slot,
            classroom: req.classroom,
            date: req.date,
            faculty_name: req.faculty_name,
        },
    )
    .await?;

    let attendance_link = sessions::attendance_link(&state.public_url, &session);

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            success: true,
            session_id: session.session_id.clone(),
            attendance_link,
            session,
        }),
    ))
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub session: AttendanceSession,
}

/// GET /api/sessions/:session_id
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = sessions::get_session(&state.db, &session_id).await?;
    Ok(Json(SessionResponse {
        success: true,
        session,
    }))
}

/// POST /api/sessions/:session_id/close
pub async fn close_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    sessions::close_session(&state.db, &session_id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Session closed".to_string(),
    }))
}
