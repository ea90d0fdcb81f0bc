//! Tests for database initialization
//!
//! Covers automatic creation on first run, idempotent re-open, and the
//! uniqueness constraints the stores rely on.

use attendify_common::db::init::init_database;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("attendify.db");
    assert!(!db_path.exists());

    let result = init_database(&db_path).await;
    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("attendify.db");

    let pool1 = init_database(&db_path).await;
    assert!(pool1.is_ok());
    drop(pool1);

    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());
}

#[tokio::test]
async fn test_all_tables_created() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("attendify.db")).await.unwrap();

    for table in ["students", "Teachers", "attendance_sessions", "attendance_records"] {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 1, "table {} missing", table);
    }
}

#[tokio::test]
async fn test_student_uniqueness_constraints() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("attendify.db")).await.unwrap();

    let insert = "INSERT INTO students (student_id, name, email, department, division, semester)
                  VALUES (?, ?, ?, ?, ?, ?)";

    sqlx::query(insert)
        .bind("24it176")
        .bind("A Student")
        .bind("24it176@charusat.edu.in")
        .bind("IT")
        .bind("IT 1")
        .bind(3_i64)
        .execute(&pool)
        .await
        .unwrap();

    // Same student_id, different email
    let dup_id = sqlx::query(insert)
        .bind("24it176")
        .bind("Other")
        .bind("other@charusat.edu.in")
        .bind("IT")
        .bind("IT 1")
        .bind(3_i64)
        .execute(&pool)
        .await;
    assert!(attendify_common::db::is_unique_violation(&dup_id.unwrap_err()));

    // Same email, different student_id
    let dup_email = sqlx::query(insert)
        .bind("24it177")
        .bind("Other")
        .bind("24it176@charusat.edu.in")
        .bind("IT")
        .bind("IT 1")
        .bind(3_i64)
        .execute(&pool)
        .await;
    assert!(attendify_common::db::is_unique_violation(&dup_email.unwrap_err()));
}

#[tokio::test]
async fn test_duplicate_submission_rejected_by_index() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("attendify.db")).await.unwrap();

    async fn insert_record(pool: &sqlx::SqlitePool) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO attendance_records
             (MOT, timeslot, dept, division, subject, faculty_name, sem, date, student_id, selfie, gmail)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind("lecture")
        .bind("9:10 to 10:10")
        .bind("IT")
        .bind("IT 1")
        .bind("Data Structures")
        .bind("Prof. Shah")
        .bind(3_i64)
        .bind("2024-01-10")
        .bind("24it176")
        .bind("selfie-bytes")
        .bind("24it176@charusat.edu.in")
        .execute(pool)
        .await
        .map(|_| ())
    }

    insert_record(&pool).await.unwrap();

    let second = insert_record(&pool).await;
    assert!(attendify_common::db::is_unique_violation(&second.unwrap_err()));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendance_records")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}
