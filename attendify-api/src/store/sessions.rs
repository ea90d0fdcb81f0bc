//! Session registry
//!
//! Sessions are created by teachers and looked up by an opaque token.
//! The attribute tuple is immutable once stored; the only mutation is the
//! explicit close, after which submissions are rejected.

use rand::Rng;
use sqlx::SqlitePool;

use attendify_common::db::models::{
    AttendanceSession, Department, LectureType, SESSION_ACTIVE, SESSION_CLOSED,
};
use attendify_common::{Error, Result};

/// Attributes for a new session, already alias-normalized by the caller
#[derive(Debug, Clone)]
pub struct NewSession {
    pub subject: String,
    pub department: String,
    pub division: String,
    pub semester: i64,
    pub lecture_type: String,
    pub time_slot: String,
    pub classroom: String,
    pub date: String,
    pub faculty_name: String,
}

/// Opaque session token: 32 random bytes, hex-encoded (256 bits, URL-safe)
pub fn generate_session_token() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(bytes)
}

/// Create a session and return the stored row
pub async fn create_session(db: &SqlitePool, input: NewSession) -> Result<AttendanceSession> {
    let mut missing = Vec::new();
    if input.subject.trim().is_empty() {
        missing.push("subject".to_string());
    }
    if input.department.trim().is_empty() {
        missing.push("department".to_string());
    }
    if input.division.trim().is_empty() {
        missing.push("division".to_string());
    }
    if input.semester == 0 {
        missing.push("semester".to_string());
    }
    if input.lecture_type.trim().is_empty() {
        missing.push("lectureType".to_string());
    }
    if input.time_slot.trim().is_empty() {
        missing.push("timeSlot".to_string());
    }
    if input.date.trim().is_empty() {
        missing.push("date".to_string());
    }
    if input.faculty_name.trim().is_empty() {
        missing.push("faculty".to_string());
    }
    if !missing.is_empty() {
        return Err(Error::MissingFields(missing));
    }

    let department: Department = input.department.parse()?;
    let lecture_type: LectureType = input.lecture_type.parse()?;

    if !(1..=8).contains(&input.semester) {
        return Err(Error::Validation("Invalid semester (1-8)".to_string()));
    }

    let date = input.date.trim();
    if chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err(Error::Validation(
            "Invalid date format. Use YYYY-MM-DD".to_string(),
        ));
    }

    let time_slot = input.time_slot.trim();
    if !lecture_type.time_slots().iter().any(|slot| *slot == time_slot) {
        return Err(Error::Validation(format!(
            "Invalid time slot '{}' for {}",
            time_slot, lecture_type
        )));
    }

    let session_id = generate_session_token();

    sqlx::query(
        "INSERT INTO attendance_sessions
         (session_id, subject, department, division, semester, lecture_type,
          time_slot, classroom, date, faculty_name, status)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&session_id)
    .bind(input.subject.trim())
    .bind(department.to_string())
    .bind(input.division.trim())
    .bind(input.semester)
    .bind(lecture_type.to_string())
    .bind(time_slot)
    .bind(input.classroom.trim())
    .bind(date)
    .bind(input.faculty_name.trim())
    .bind(SESSION_ACTIVE)
    .execute(db)
    .await?;

    get_session(db, &session_id).await
}

/// Look up a session by token
pub async fn get_session(db: &SqlitePool, session_id: &str) -> Result<AttendanceSession> {
    let session = sqlx::query_as::<_, AttendanceSession>(
        "SELECT session_id, subject, department, division, semester, lecture_type,
                time_slot, classroom, date, faculty_name, status, created_at
         FROM attendance_sessions WHERE session_id = ?",
    )
    .bind(session_id)
    .fetch_optional(db)
    .await?;

    session.ok_or_else(|| Error::NotFound("Session not found".to_string()))
}

/// Close a session; further submissions against it are rejected
pub async fn close_session(db: &SqlitePool, session_id: &str) -> Result<()> {
    let result = sqlx::query("UPDATE attendance_sessions SET status = ? WHERE session_id = ?")
        .bind(SESSION_CLOSED)
        .bind(session_id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound("Session not found".to_string()));
    }
    Ok(())
}

/// Shareable link for a session
///
/// The link embeds the token in the path and, for compatibility with
/// clients that never call back for the stored session, repeats the
/// attributes as query parameters. The stored row is the source of truth.
pub fn attendance_link(public_url: &str, session: &AttendanceSession) -> String {
    let semester = session.semester.to_string();
    let params = [
        ("subject", session.subject.as_str()),
        ("department", session.department.as_str()),
        ("division", session.division.as_str()),
        ("semester", semester.as_str()),
        ("lectureType", session.lecture_type.as_str()),
        ("timeSlot", session.time_slot.as_str()),
        ("classroom", session.classroom.as_str()),
        ("date", session.date.as_str()),
        ("faculty", session.faculty_name.as_str()),
    ];
    let query = serde_urlencoded::to_string(params).unwrap_or_default();
    format!(
        "{}/student-auth/{}?{}",
        public_url.trim_end_matches('/'),
        session.session_id,
        query
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_tokens_are_long_and_unique() {
        let a = generate_session_token();
        let b = generate_session_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
