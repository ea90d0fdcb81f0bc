//! Roster store: students and teachers
//!
//! Owns uniqueness of student IDs and emails. All validation runs before
//! any mutation; the UNIQUE constraints at the storage layer arbitrate
//! check-then-insert races and surface as conflicts, never as generic
//! database errors.

use serde::Serialize;
use sqlx::SqlitePool;

use attendify_common::db::is_unique_violation;
use attendify_common::db::models::{Department, Student, Teacher};
use attendify_common::identity::{is_plausible_email, parse_student_id};
use attendify_common::{Error, Result};

const DUPLICATE_STUDENT: &str = "Student ID or email already exists";

/// Fields for a new roster entry, already alias-normalized by the caller
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub department: String,
    pub division: String,
    pub semester: i64,
}

/// Identity of a removed student, returned for confirmation messaging
#[derive(Debug, Clone, Serialize)]
pub struct RemovedStudent {
    pub name: String,
    pub email: String,
}

/// Per-department student tally
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DepartmentStudentCount {
    pub department: String,
    pub count: i64,
}

/// Add a student to the roster; returns the new row id
///
/// Validation order: required fields, department, semester range, email
/// format, student ID format, the diploma/semester exclusion, then
/// uniqueness. Any failure short-circuits before the insert.
pub async fn add_student(db: &SqlitePool, input: NewStudent) -> Result<i64> {
    let mut missing = Vec::new();
    if input.student_id.trim().is_empty() {
        missing.push("student_id".to_string());
    }
    if input.name.trim().is_empty() {
        missing.push("name".to_string());
    }
    if input.email.trim().is_empty() {
        missing.push("email".to_string());
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
    if !missing.is_empty() {
        return Err(Error::MissingFields(missing));
    }

    let department: Department = input.department.parse()?;

    if !(1..=8).contains(&input.semester) {
        return Err(Error::Validation("Invalid semester (1-8)".to_string()));
    }

    let email = input.email.trim().to_string();
    if !is_plausible_email(&email) {
        return Err(Error::Validation("Invalid email format".to_string()));
    }

    let parsed = parse_student_id(&input.student_id)?;

    // Diploma students enter laterally and may never hold semester 1 or 2
    if parsed.is_diploma && (input.semester == 1 || input.semester == 2) {
        return Err(Error::Validation(
            "Diploma students cannot be in semester 1 or 2".to_string(),
        ));
    }

    let student_id = parsed.canonical();

    let existing: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM students WHERE student_id = ? OR email = ?")
            .bind(&student_id)
            .bind(&email)
            .fetch_optional(db)
            .await?;
    if existing.is_some() {
        return Err(Error::Conflict(DUPLICATE_STUDENT.to_string()));
    }

    let result = sqlx::query(
        "INSERT INTO students (student_id, name, email, department, division, semester)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&student_id)
    .bind(input.name.trim())
    .bind(&email)
    .bind(department.to_string())
    .bind(input.division.trim())
    .bind(input.semester)
    .execute(db)
    .await;

    match result {
        Ok(done) => Ok(done.last_insert_rowid()),
        Err(err) if is_unique_violation(&err) => Err(Error::Conflict(DUPLICATE_STUDENT.to_string())),
        Err(err) => Err(err.into()),
    }
}

/// Hard-delete a student; returns the deleted identity
pub async fn remove_student(db: &SqlitePool, student_id: &str) -> Result<RemovedStudent> {
    let student: Option<(String, String)> =
        sqlx::query_as("SELECT name, email FROM students WHERE student_id = ?")
            .bind(student_id)
            .fetch_optional(db)
            .await?;

    let Some((name, email)) = student else {
        return Err(Error::NotFound("Student not found".to_string()));
    };

    sqlx::query("DELETE FROM students WHERE student_id = ?")
        .bind(student_id)
        .execute(db)
        .await?;

    Ok(RemovedStudent { name, email })
}

/// All roster entries, oldest first
pub async fn list_students(db: &SqlitePool) -> Result<Vec<Student>> {
    let students = sqlx::query_as::<_, Student>(
        "SELECT id, student_id, name, email, department, division, semester,
                is_active, created_at, updated_at
         FROM students ORDER BY id",
    )
    .fetch_all(db)
    .await?;
    Ok(students)
}

/// Total student count plus a per-department breakdown
pub async fn count_students(db: &SqlitePool) -> Result<(i64, Vec<DepartmentStudentCount>)> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students")
        .fetch_one(db)
        .await?;

    let by_department = sqlx::query_as::<_, DepartmentStudentCount>(
        "SELECT department, COUNT(*) as count FROM students GROUP BY department",
    )
    .fetch_all(db)
    .await?;

    Ok((total, by_department))
}

/// Count of active students eligible for a fully scoped session
///
/// Division drifts between raw ("IT 1") and normalized ("1") spellings in
/// stored rows, so the match accepts either form. The dual OR-match is
/// deliberate; see `identity::normalize_division`.
pub async fn find_eligible_count(
    db: &SqlitePool,
    department: &str,
    division: &str,
    semester: i64,
) -> Result<i64> {
    let normalized = attendify_common::identity::normalize_division(division);
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM students
         WHERE is_active = 1 AND department = ? AND semester = ?
           AND (division = ? OR division = ?)",
    )
    .bind(department)
    .bind(semester)
    .bind(division)
    .bind(&normalized)
    .fetch_one(db)
    .await?;
    Ok(count)
}

/// Add a teacher; `password_hash` must already be a salted hash
pub async fn add_teacher(
    db: &SqlitePool,
    full_name: &str,
    email: &str,
    password_hash: &str,
) -> Result<i64> {
    let mut missing = Vec::new();
    if full_name.trim().is_empty() {
        missing.push("Full_Name".to_string());
    }
    if email.trim().is_empty() {
        missing.push("Email".to_string());
    }
    if password_hash.is_empty() {
        missing.push("Password".to_string());
    }
    if !missing.is_empty() {
        return Err(Error::MissingFields(missing));
    }

    if !is_plausible_email(email.trim()) {
        return Err(Error::Validation("Invalid email".to_string()));
    }

    let result = sqlx::query("INSERT INTO Teachers (Full_Name, Email, Password) VALUES (?, ?, ?)")
        .bind(full_name.trim())
        .bind(email.trim())
        .bind(password_hash)
        .execute(db)
        .await;

    match result {
        Ok(done) => Ok(done.last_insert_rowid()),
        Err(err) if is_unique_violation(&err) => {
            Err(Error::Conflict("Teacher email already exists".to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

/// Remove a teacher by email
pub async fn remove_teacher(db: &SqlitePool, email: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM Teachers WHERE Email = ?")
        .bind(email.trim())
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound("Teacher not found".to_string()));
    }
    Ok(())
}

/// All teachers, oldest first; the password column is never selected
pub async fn list_teachers(db: &SqlitePool) -> Result<Vec<Teacher>> {
    let teachers =
        sqlx::query_as::<_, Teacher>("SELECT id, Full_Name, Email FROM Teachers ORDER BY id")
            .fetch_all(db)
            .await?;
    Ok(teachers)
}

/// Total teacher count
pub async fn count_teachers(db: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Teachers")
        .fetch_one(db)
        .await?;
    Ok(count)
}
