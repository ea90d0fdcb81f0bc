//! Teacher roster and login endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use attendify_common::db::models::Teacher;

use crate::api::error::ApiError;
use crate::auth::{self, TeacherIdentity};
use crate::store::roster;
use crate::AppState;

/// Add-teacher request; the original client sent PascalCase field names,
/// later forms sent lowercase, so both are accepted
#[derive(Debug, Deserialize)]
pub struct AddTeacherRequest {
    #[serde(default, alias = "Full_Name", alias = "full_name")]
    pub name: String,
    #[serde(default, alias = "Email")]
    pub email: String,
    #[serde(default, alias = "Password")]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// POST /api/teachers
pub async fn add_teacher(
    State(state): State<AppState>,
    Json(req): Json<AddTeacherRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    // Hash before touching the store; the plaintext never goes further
    let password_hash = if req.password.is_empty() {
        String::new()
    } else {
        auth::hash_password(&req.password)?
    };

    roster::add_teacher(&state.db, &req.name, &req.email, &password_hash).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            success: true,
            message: "Teacher added successfully".to_string(),
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct RemoveTeacherRequest {
    #[serde(default, alias = "Email")]
    pub email: String,
}

/// DELETE /api/teachers
pub async fn remove_teacher(
    State(state): State<AppState>,
    Json(req): Json<RemoveTeacherRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if req.email.trim().is_empty() {
        return Err(attendify_common::Error::Validation("Valid email required".to_string()).into());
    }
    roster::remove_teacher(&state.db, &req.email).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Teacher removed".to_string(),
    }))
}

#[derive(Debug, Serialize)]
pub struct TeacherListResponse {
    pub success: bool,
    pub teachers: Vec<Teacher>,
}

/// GET /api/teachers
pub async fn list_teachers(
    State(state): State<AppState>,
) -> Result<Json<TeacherListResponse>, ApiError> {
    let teachers = roster::list_teachers(&state.db).await?;
    Ok(Json(TeacherListResponse {
        success: true,
        teachers,
    }))
}

#[derive(Debug, Serialize)]
pub struct TeacherCountResponse {
    pub success: bool,
    pub count: i64,
}

/// GET /api/teachers/count
pub async fn count_teachers(
    State(state): State<AppState>,
) -> Result<Json<TeacherCountResponse>, ApiError> {
    let count = roster::count_teachers(&state.db).await?;
    Ok(Json(TeacherCountResponse {
        success: true,
        count,
    }))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default, alias = "Email")]
    pub email: String,
    #[serde(default, alias = "Password")]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub teacher: TeacherIdentity,
}

/// POST /api/teachers/login
pub async fn teacher_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let teacher = auth::login_teacher(&state.db, &req.email, &req.password).await?;
    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        teacher,
    }))
}
