//! Student roster endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use attendify_common::db::models::Student;

use crate::api::error::ApiError;
use crate::store::roster::{self, DepartmentStudentCount, NewStudent};
use crate::AppState;

/// Add-student request; accepts the admin form's field names
#[derive(Debug, Deserialize)]
pub struct AddStudentRequest {
    #[serde(default, alias = "studentId")]
    pub student_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "dept")]
    pub department: String,
    #[serde(default)]
    pub division: String,
    #[serde(default, alias = "sem")]
    pub semester: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AddStudentResponse {
    pub success: bool,
    pub message: String,
    pub student_id: i64,
}

/// POST /api/students
pub async fn add_student(
    State(state): State<AppState>,
    Json(req): Json<AddStudentRequest>,
) -> Result<(StatusCode, Json<AddStudentResponse>), ApiError> {
    let id = roster::add_student(
        &state.db,
        NewStudent {
            student_id: req.student_id,
            name: req.name,
            email: req.email,
            department: req.department,
            division: req.division,
            semester: req.semester.unwrap_or(0),
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(AddStudentResponse {
            success: true,
            message: "Student added successfully".to_string(),
            student_id: id,
        }),
    ))
}

#[derive(Debug, Serialize)]
pub struct StudentListResponse {
    pub success: bool,
    pub students: Vec<Student>,
}

/// GET /api/students
pub async fn list_students(
    State(state): State<AppState>,
) -> Result<Json<StudentListResponse>, ApiError> {
    let students = roster::list_students(&state.db).await?;
    Ok(Json(StudentListResponse {
        success: true,
        students,
    }))
}

#[derive(Debug, Serialize)]
pub struct StudentCountResponse {
    pub success: bool,
    pub total_count: i64,
    pub department_counts: Vec<DepartmentStudentCount>,
}

/// GET /api/students/count
pub async fn count_students(
    State(state): State<AppState>,
) -> Result<Json<StudentCountResponse>, ApiError> {
    let (total_count, department_counts) = roster::count_students(&state.db).await?;
    Ok(Json(StudentCountResponse {
        success: true,
        total_count,
        department_counts,
    }))
}

#[derive(Debug, Serialize)]
pub struct RemoveStudentResponse {
    pub success: bool,
    pub message: String,
    pub student_name: String,
    pub student_email: String,
}

/// DELETE /api/students/:student_id
pub async fn remove_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<RemoveStudentResponse>, ApiError> {
    let removed = roster::remove_student(&state.db, &student_id).await?;
    Ok(Json(RemoveStudentResponse {
        success: true,
        message: "Student removed successfully".to_string(),
        student_name: removed.name,
        student_email: removed.email,
    }))
}
