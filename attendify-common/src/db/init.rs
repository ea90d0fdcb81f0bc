//! Database initialization
//!
//! Creates the SQLite database on first run and brings the schema up
//! idempotently. Table and column names follow the original MySQL schema
//! so exported data stays compatible; the attendance uniqueness index and
//! the sessions table are additions that move submission idempotence and
//! session truth server-side.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL mode: concurrent dashboard reads while submissions write
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    // Migrations (idempotent - safe to call multiple times)
    create_students_table(&pool).await?;
    create_teachers_table(&pool).await?;
    create_attendance_sessions_table(&pool).await?;
    create_attendance_records_table(&pool).await?;

    Ok(pool)
}

async fn create_students_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            department TEXT NOT NULL,
            division TEXT NOT NULL,
            semester INTEGER NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_students_department ON students (department)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_students_semester ON students (semester)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_students_active ON students (is_active)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_teachers_table(pool: &SqlitePool) -> Result<()> {
    // Column names reproduce the original Teachers schema
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS Teachers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            Full_Name TEXT NOT NULL,
            Email TEXT NOT NULL UNIQUE,
            Password TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_attendance_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS attendance_sessions (
            session_id TEXT PRIMARY KEY,
            subject TEXT NOT NULL,
            department TEXT NOT NULL,
            division TEXT NOT NULL,
            semester INTEGER NOT NULL,
            lecture_type TEXT NOT NULL,
            time_slot TEXT NOT NULL,
            classroom TEXT NOT NULL,
            date TEXT NOT NULL,
            faculty_name TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'active',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_attendance_records_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS attendance_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            MOT TEXT NOT NULL,
            timeslot TEXT NOT NULL,
            dept TEXT NOT NULL,
            division TEXT NOT NULL,
            subject TEXT NOT NULL,
            faculty_name TEXT NOT NULL,
            sem INTEGER NOT NULL,
            date TEXT NOT NULL,
            student_id TEXT NOT NULL,
            selfie TEXT NOT NULL,
            gmail TEXT NOT NULL,
            session_id TEXT REFERENCES attendance_sessions (session_id),
            attendance_time TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_student_date ON attendance_records (student_id, date)",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_dept_sem ON attendance_records (dept, sem)")
        .execute(pool)
        .await?;

    // At most one submission per student per session identity; the arbiter
    // for same-student races (the second writer hits this constraint)
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS uniq_attendance_submission
        ON attendance_records (student_id, subject, dept, division, MOT, timeslot, date)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
