//! Database models and validated field enums

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Academic departments tracked by the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Department {
    IT,
    CSE,
    CE,
}

impl Department {
    /// Lowercase code as it appears inside student IDs
    pub fn code(&self) -> &'static str {
        match self {
            Department::IT => "it",
            Department::CSE => "cse",
            Department::CE => "ce",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Department::IT => "IT",
            Department::CSE => "CSE",
            Department::CE => "CE",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Department {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "IT" => Ok(Department::IT),
            "CSE" => Ok(Department::CSE),
            "CE" => Ok(Department::CE),
            _ => Err(Error::Validation(
                "Invalid department. Must be IT, CSE, or CE".to_string(),
            )),
        }
    }
}

/// Mode of teaching for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LectureType {
    Lecture,
    Lab,
    Tutorial,
}

/// One-hour slots used by lectures (tutorials share this set)
pub const LECTURE_TIME_SLOTS: [&str; 6] = [
    "9:10 to 10:10",
    "10:10 to 11:10",
    "12:10 to 1:10",
    "1:10 to 2:10",
    "2:20 to 3:20",
    "3:20 to 4:20",
];

/// Two-hour slots used by labs
pub const LAB_TIME_SLOTS: [&str; 3] = ["9:10 to 11:10", "12:10 to 2:10", "2:20 to 4:20"];

impl LectureType {
    /// Valid time slots for this mode of teaching
    pub fn time_slots(&self) -> &'static [&'static str] {
        match self {
            LectureType::Lab => &LAB_TIME_SLOTS,
            LectureType::Lecture | LectureType::Tutorial => &LECTURE_TIME_SLOTS,
        }
    }
}

impl fmt::Display for LectureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LectureType::Lecture => "lecture",
            LectureType::Lab => "lab",
            LectureType::Tutorial => "tutorial",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for LectureType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lecture" => Ok(LectureType::Lecture),
            "lab" => Ok(LectureType::Lab),
            "tutorial" => Ok(LectureType::Tutorial),
            _ => Err(Error::Validation(
                "Invalid lecture type. Must be lecture, lab, or tutorial".to_string(),
            )),
        }
    }
}

/// Lifecycle state of an attendance session
pub const SESSION_ACTIVE: &str = "active";
pub const SESSION_CLOSED: &str = "closed";

/// Roster row for one student
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Student {
    pub id: i64,
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub department: String,
    pub division: String,
    pub semester: i64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Roster row for one teacher; the password column holds a salted hash only
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Teacher {
    pub id: i64,
    #[sqlx(rename = "Full_Name")]
    #[serde(rename = "Full_Name")]
    pub full_name: String,
    #[sqlx(rename = "Email")]
    #[serde(rename = "Email")]
    pub email: String,
}

/// A teacher-created attendance session; the attribute tuple is immutable
/// after creation and `session_id` is the sole lookup key
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttendanceSession {
    pub session_id: String,
    pub subject: String,
    pub department: String,
    pub division: String,
    pub semester: i64,
    pub lecture_type: String,
    pub time_slot: String,
    pub classroom: String,
    pub date: String,
    pub faculty_name: String,
    pub status: String,
    pub created_at: NaiveDateTime,
}

/// One stored attendance submission
///
/// `session_id` is nullable: legacy links carry the session attributes in
/// query parameters instead of referencing a stored session.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttendanceRecord {
    pub id: i64,
    #[sqlx(rename = "MOT")]
    #[serde(rename = "MOT")]
    pub mot: String,
    pub timeslot: String,
    pub dept: String,
    pub division: String,
    pub subject: String,
    pub faculty_name: String,
    pub sem: i64,
    pub date: String,
    pub student_id: String,
    pub selfie: String,
    pub gmail: String,
    pub session_id: Option<String>,
    pub attendance_time: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_roundtrip() {
        for (raw, expected) in [("it", Department::IT), ("CSE", Department::CSE), ("Ce", Department::CE)] {
            let dept: Department = raw.parse().unwrap();
            assert_eq!(dept, expected);
            assert_eq!(dept.to_string().parse::<Department>().unwrap(), expected);
        }
        assert!("EE".parse::<Department>().is_err());
    }

    #[test]
    fn test_lecture_type_slots() {
        let lab: LectureType = "lab".parse().unwrap();
        assert!(lab.time_slots().contains(&"12:10 to 2:10"));
        assert!(!lab.time_slots().contains(&"9:10 to 10:10"));

        let lecture: LectureType = "LECTURE".parse().unwrap();
        assert!(lecture.time_slots().contains(&"9:10 to 10:10"));

        let tutorial: LectureType = "tutorial".parse().unwrap();
        assert_eq!(tutorial.time_slots(), lecture.time_slots());
    }
}
