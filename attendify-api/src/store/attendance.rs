//! Attendance submission and aggregation engines
//!
//! Submission runs a strict validation pipeline before a single-statement
//! insert: institutional-domain check, student-id derivation, session
//! attribute resolution, collective missing-field reporting, enum and
//! date validation, then the duplicate check. The UNIQUE index on the
//! submission tuple arbitrates same-student races; the second writer gets
//! the same conflict as a repeated submission.
//!
//! Aggregation is a pure read over the records table and is polled every
//! few seconds by the teacher dashboard.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use attendify_common::db::is_unique_violation;
use attendify_common::db::models::{AttendanceRecord, Department, SESSION_ACTIVE};
use attendify_common::identity::student_id_from_email;
use attendify_common::{Error, Result};

use crate::store::{roster, sessions};

const ALREADY_SUBMITTED: &str = "Attendance already submitted for this session";

/// One submission as received at the boundary, alias-normalized
///
/// Attribute fields are optional: when `session_id` names a stored session
/// its attributes win; otherwise the caller-supplied values are used
/// (legacy links embed them in query parameters).
#[derive(Debug, Clone, Default)]
pub struct SubmissionInput {
    pub session_id: Option<String>,
    pub mot: Option<String>,
    pub timeslot: Option<String>,
    pub dept: Option<String>,
    pub division: Option<String>,
    pub subject: Option<String>,
    pub faculty_name: Option<String>,
    pub sem: Option<i64>,
    pub date: Option<String>,
    pub gmail: String,
    pub selfie: String,
}

/// Resolved session attributes a record is written against
#[derive(Debug, Clone)]
struct SessionAttrs {
    mot: String,
    timeslot: String,
    dept: String,
    division: String,
    subject: String,
    faculty_name: String,
    sem: i64,
    date: String,
}

/// Submit one attendance record
///
/// At most one record is stored per (student, session identity); a repeat
/// is a conflict and a no-op. No row is written on any error path.
pub async fn submit_attendance(
    db: &SqlitePool,
    input: SubmissionInput,
) -> Result<AttendanceRecord> {
    let student = student_id_from_email(&input.gmail)?;
    let student_id = student.canonical();
    let gmail = input.gmail.trim().to_lowercase();

    let (attrs, session_ref) = resolve_attrs(db, &input).await?;

    let mut missing = Vec::new();
    if attrs.mot.is_empty() {
        missing.push("MOT".to_string());
    }
    if attrs.timeslot.is_empty() {
        missing.push("timeslot".to_string());
    }
    if attrs.dept.is_empty() {
        missing.push("dept".to_string());
    }
    if attrs.division.is_empty() {
        missing.push("division".to_string());
    }
    if attrs.subject.is_empty() {
        missing.push("subject".to_string());
    }
    if attrs.faculty_name.is_empty() {
        missing.push("faculty_name".to_string());
    }
    if attrs.sem == 0 {
        missing.push("sem".to_string());
    }
    if attrs.date.is_empty() {
        missing.push("date".to_string());
    }
    if input.selfie.is_empty() {
        missing.push("selfie".to_string());
    }
    if !missing.is_empty() {
        return Err(Error::MissingFields(missing));
    }

    let dept: Department = attrs.dept.parse()?;

    if attrs.mot != "lecture" && attrs.mot != "lab" {
        return Err(Error::Validation("Invalid mode of teaching".to_string()));
    }

    if NaiveDate::parse_from_str(&attrs.date, "%Y-%m-%d").is_err() {
        return Err(Error::Validation("Invalid date format".to_string()));
    }

    if !(1..=8).contains(&attrs.sem) {
        return Err(Error::Validation("Invalid semester".to_string()));
    }

    let duplicate: Option<(i64,)> = sqlx::query_as(
        "SELECT id FROM attendance_records
         WHERE student_id = ? AND subject = ? AND dept = ? AND division = ?
           AND MOT = ? AND timeslot = ? AND date = ?",
    )
    .bind(&student_id)
    .bind(&attrs.subject)
    .bind(dept.to_string())
    .bind(&attrs.division)
    .bind(&attrs.mot)
    .bind(&attrs.timeslot)
    .bind(&attrs.date)
    .fetch_optional(db)
    .await?;
    if duplicate.is_some() {
        return Err(Error::Conflict(ALREADY_SUBMITTED.to_string()));
    }

    let result = sqlx::query(
        "INSERT INTO attendance_records
         (MOT, timeslot, dept, division, subject, faculty_name, sem, date,
          student_id, selfie, gmail, session_id)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&attrs.mot)
    .bind(&attrs.timeslot)
    .bind(dept.to_string())
    .bind(&attrs.division)
    .bind(&attrs.subject)
    .bind(&attrs.faculty_name)
    .bind(attrs.sem)
    .bind(&attrs.date)
    .bind(&student_id)
    .bind(&input.selfie)
    .bind(&gmail)
    .bind(&session_ref)
    .execute(db)
    .await;

    let record_id = match result {
        Ok(done) => done.last_insert_rowid(),
        // Lost a same-student race; the constraint is the arbiter
        Err(err) if is_unique_violation(&err) => {
            return Err(Error::Conflict(ALREADY_SUBMITTED.to_string()))
        }
        Err(err) => return Err(err.into()),
    };

    let record = sqlx::query_as::<_, AttendanceRecord>(
        "SELECT * FROM attendance_records WHERE id = ?",
    )
    .bind(record_id)
    .fetch_one(db)
    .await?;

    Ok(record)
}

/// Resolve the attribute tuple a submission is validated against
async fn resolve_attrs(
    db: &SqlitePool,
    input: &SubmissionInput,
) -> Result<(SessionAttrs, Option<String>)> {
    if let Some(session_id) = input.session_id.as_deref().filter(|s| !s.is_empty()) {
        let session = sessions::get_session(db, session_id).await?;
        if session.status != SESSION_ACTIVE {
            return Err(Error::Conflict("Session is closed".to_string()));
        }
        let attrs = SessionAttrs {
            mot: session.lecture_type.clone(),
            timeslot: session.time_slot.clone(),
            dept: session.department.clone(),
            division: session.division.clone(),
            subject: session.subject.clone(),
            faculty_name: session.faculty_name.clone(),
            sem: session.semester,
            date: session.date.clone(),
        };
        return Ok((attrs, Some(session.session_id)));
    }

    let field = |v: &Option<String>| v.as_deref().unwrap_or("").trim().to_string();
    let attrs = SessionAttrs {
        mot: field(&input.mot).to_lowercase(),
        timeslot: field(&input.timeslot),
        dept: field(&input.dept),
        division: field(&input.division),
        subject: field(&input.subject),
        faculty_name: field(&input.faculty_name),
        sem: input.sem.unwrap_or(0),
        date: field(&input.date),
    };
    Ok((attrs, None))
}

/// Conjunctive filter set for live counts; empty strings impose no constraint
#[derive(Debug, Clone, Default)]
pub struct LiveFilters {
    pub subject: String,
    pub dept: String,
    pub division: String,
    pub date: String,
    pub lecture_type: String,
    pub time_slot: String,
    pub semester: Option<i64>,
}

/// Recent submission line for the dashboard feed
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RecentSubmission {
    pub student_id: String,
    pub gmail: String,
    pub attendance_time: chrono::NaiveDateTime,
    #[sqlx(rename = "MOT")]
    #[serde(rename = "MOT")]
    pub mot: String,
    pub timeslot: String,
}

/// Per-department record tally
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DepartmentCount {
    pub dept: String,
    pub count: i64,
}

/// Live reconciliation of submissions against the roster
#[derive(Debug, Clone, Serialize)]
pub struct LiveAttendance {
    pub total_present: i64,
    pub unique_students: i64,
    pub total_subjects: i64,
    pub recent: Vec<RecentSubmission>,
    /// Only computed when no department filter scopes the view
    pub department_breakdown: Option<Vec<DepartmentCount>>,
    /// Only computed when dept, division, and semester are all provided
    pub total_eligible: Option<i64>,
    pub remaining: Option<i64>,
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, filters: &LiveFilters) {
    if !filters.subject.is_empty() {
        builder.push(" AND subject = ").push_bind(filters.subject.clone());
    }
    if !filters.dept.is_empty() {
        builder.push(" AND dept = ").push_bind(filters.dept.to_uppercase());
    }
    if !filters.division.is_empty() {
        builder.push(" AND division = ").push_bind(filters.division.clone());
    }
    if !filters.date.is_empty() {
        builder.push(" AND date = ").push_bind(filters.date.clone());
    }
    if !filters.lecture_type.is_empty() {
        builder
            .push(" AND MOT = ")
            .push_bind(filters.lecture_type.to_lowercase());
    }
    if !filters.time_slot.is_empty() {
        builder.push(" AND timeslot = ").push_bind(filters.time_slot.clone());
    }
    if let Some(sem) = filters.semester {
        builder.push(" AND sem = ").push_bind(sem);
    }
}

/// Live attendance summary for the dashboard; pure read, safe to poll
pub async fn live_attendance(db: &SqlitePool, filters: &LiveFilters) -> Result<LiveAttendance> {
    if filters.subject.is_empty() || filters.date.is_empty() {
        return Err(Error::Validation(
            "Subject and date are required".to_string(),
        ));
    }

    let mut counts = QueryBuilder::new(
        "SELECT COUNT(*), COUNT(DISTINCT student_id), COUNT(DISTINCT subject)
         FROM attendance_records WHERE 1=1",
    );
    push_filters(&mut counts, filters);
    let (total_present, unique_students, total_subjects): (i64, i64, i64) =
        counts.build_query_as().fetch_one(db).await?;

    let mut recent = QueryBuilder::new(
        "SELECT student_id, gmail, attendance_time, MOT, timeslot
         FROM attendance_records WHERE 1=1",
    );
    push_filters(&mut recent, filters);
    recent.push(" ORDER BY attendance_time DESC LIMIT 10");
    let recent: Vec<RecentSubmission> = recent.build_query_as().fetch_all(db).await?;

    // A department-scoped view doesn't need its own breakdown
    let department_breakdown = if filters.dept.is_empty() {
        let mut breakdown = QueryBuilder::new(
            "SELECT dept, COUNT(*) as count FROM attendance_records WHERE 1=1",
        );
        push_filters(&mut breakdown, filters);
        breakdown.push(" GROUP BY dept ORDER BY count DESC");
        Some(breakdown.build_query_as::<DepartmentCount>().fetch_all(db).await?)
    } else {
        None
    };

    // Eligibility is only meaningful when the view is scoped to one cohort
    let (total_eligible, remaining) =
        if !filters.dept.is_empty() && !filters.division.is_empty() && filters.semester.is_some() {
            let eligible = roster::find_eligible_count(
                db,
                &filters.dept.to_uppercase(),
                &filters.division,
                filters.semester.unwrap_or(0),
            )
            .await?;
            (Some(eligible), Some((eligible - unique_students).max(0)))
        } else {
            (None, None)
        };

    Ok(LiveAttendance {
        total_present,
        unique_students,
        total_subjects,
        recent,
        department_breakdown,
        total_eligible,
        remaining,
    })
}

/// Filter set for the class attendance listing
#[derive(Debug, Clone, Default)]
pub struct RecordFilters {
    pub dept: String,
    pub date: String,
    pub division: String,
    pub time_slot: String,
    pub semester: Option<i64>,
    pub subject: String,
}

/// Class attendance listing with summary statistics
#[derive(Debug, Clone, Serialize)]
pub struct ClassAttendance {
    pub records: Vec<AttendanceRecord>,
    pub total_students: i64,
    pub unique_students: i64,
    pub total_subjects: i64,
    pub department_summary: Vec<DepartmentCount>,
}

/// Full record listing for a department and date
///
/// Unlike the live view, the subject filter here is a substring match.
pub async fn list_records(db: &SqlitePool, filters: &RecordFilters) -> Result<ClassAttendance> {
    if filters.dept.is_empty() || filters.date.is_empty() {
        return Err(Error::Validation(
            "Department and date are required".to_string(),
        ));
    }
    let dept: Department = filters.dept.parse()?;

    let push_record_filters = |builder: &mut QueryBuilder<'_, Sqlite>| {
        builder.push(" AND dept = ").push_bind(dept.to_string());
        builder.push(" AND date = ").push_bind(filters.date.clone());
        if !filters.division.is_empty() {
            builder.push(" AND division = ").push_bind(filters.division.clone());
        }
        if !filters.time_slot.is_empty() {
            builder.push(" AND timeslot = ").push_bind(filters.time_slot.clone());
        }
        if let Some(sem) = filters.semester {
            builder.push(" AND sem = ").push_bind(sem);
        }
        if !filters.subject.is_empty() {
            builder
                .push(" AND subject LIKE ")
                .push_bind(format!("%{}%", filters.subject));
        }
    };

    let mut records = QueryBuilder::new("SELECT * FROM attendance_records WHERE 1=1");
    push_record_filters(&mut records);
    records.push(" ORDER BY attendance_time DESC");
    let records: Vec<AttendanceRecord> = records.build_query_as().fetch_all(db).await?;

    let mut summary = QueryBuilder::new(
        "SELECT COUNT(*), COUNT(DISTINCT student_id), COUNT(DISTINCT subject)
         FROM attendance_records WHERE 1=1",
    );
    push_record_filters(&mut summary);
    let (total_students, unique_students, total_subjects): (i64, i64, i64) =
        summary.build_query_as().fetch_one(db).await?;

    let mut breakdown =
        QueryBuilder::new("SELECT dept, COUNT(*) as count FROM attendance_records WHERE 1=1");
    push_record_filters(&mut breakdown);
    breakdown.push(" GROUP BY dept ORDER BY count DESC");
    let department_summary: Vec<DepartmentCount> =
        breakdown.build_query_as().fetch_all(db).await?;

    Ok(ClassAttendance {
        records,
        total_students,
        unique_students,
        total_subjects,
        department_summary,
    })
}

/// Identity of a deleted record, returned for confirmation messaging
#[derive(Debug, Clone, Serialize)]
pub struct DeletedRecord {
    pub id: i64,
    pub student_id: String,
    pub subject: String,
    pub date: String,
}

/// Delete a single record by id
pub async fn delete_record(db: &SqlitePool, id: i64) -> Result<DeletedRecord> {
    let record: Option<(String, String, String)> =
        sqlx::query_as("SELECT student_id, subject, date FROM attendance_records WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await?;

    let Some((student_id, subject, date)) = record else {
        return Err(Error::NotFound("Attendance record not found".to_string()));
    };

    sqlx::query("DELETE FROM attendance_records WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;

    Ok(DeletedRecord {
        id,
        student_id,
        subject,
        date,
    })
}

/// Filter set for the teacher "reset" bulk delete
#[derive(Debug, Clone, Default)]
pub struct BulkDeleteFilters {
    pub department: String,
    pub division: String,
    pub time_slot: String,
    pub semester: Option<i64>,
    pub date: String,
}

/// Delete all records matching the provided filters; returns the count
pub async fn bulk_delete(db: &SqlitePool, filters: &BulkDeleteFilters) -> Result<u64> {
    let mut builder = QueryBuilder::new("DELETE FROM attendance_records WHERE 1=1");
    if !filters.department.is_empty() {
        builder.push(" AND dept = ").push_bind(filters.department.clone());
    }
    if !filters.division.is_empty() {
        builder.push(" AND division = ").push_bind(filters.division.clone());
    }
    if !filters.time_slot.is_empty() {
        builder.push(" AND timeslot = ").push_bind(filters.time_slot.clone());
    }
    if let Some(sem) = filters.semester {
        builder.push(" AND sem = ").push_bind(sem);
    }
    if !filters.date.is_empty() {
        builder.push(" AND date = ").push_bind(filters.date.clone());
    }

    let result = builder.build().execute(db).await?;
    Ok(result.rows_affected())
}
