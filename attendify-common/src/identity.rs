//! Student identity parsing and division normalization
//!
//! Student IDs follow the institutional format `[d]YYdeptNNN`: an optional
//! diploma marker, two admission-year digits, a department code, and a
//! three-digit roll number (e.g. `d24it176`, `25ce123`). The canonical form
//! is lowercase.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::db::models::Department;
use crate::{Error, Result};

/// Domain suffix all student emails must carry
pub const INSTITUTIONAL_DOMAIN: &str = "@charusat.edu.in";

static STUDENT_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(d)?(\d{2})(it|cse|ce)(\d{3})$").expect("valid pattern"));

/// Components of a well-formed student ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStudentId {
    /// Leading `d` marker; diploma students may never hold semester 1 or 2
    pub is_diploma: bool,
    /// Two-digit admission year, kept as written (e.g. "24")
    pub admission_year: String,
    pub department: Department,
    /// Three-digit roll number, kept as written (e.g. "176")
    pub roll: String,
}

impl ParsedStudentId {
    /// Canonical lowercase form, e.g. `d24it176`
    pub fn canonical(&self) -> String {
        format!(
            "{}{}{}{}",
            if self.is_diploma { "d" } else { "" },
            self.admission_year,
            self.department.code(),
            self.roll
        )
    }
}

/// Parse a student ID in any case; malformed input is an error, never coerced
pub fn parse_student_id(raw: &str) -> Result<ParsedStudentId> {
    let trimmed = raw.trim();
    let caps = STUDENT_ID_RE.captures(trimmed).ok_or_else(|| {
        Error::Validation(format!(
            "Invalid student ID format: '{}'. Use format: d24it176 or 24it176",
            trimmed
        ))
    })?;

    let department: Department = caps[3].parse()?;

    Ok(ParsedStudentId {
        is_diploma: caps.get(1).is_some(),
        admission_year: caps[2].to_string(),
        department,
        roll: caps[4].to_string(),
    })
}

/// Derive a student ID from an institutional email address
///
/// The address must end with the institutional domain; the local part must
/// be a well-formed student ID. Returns an auth error for foreign domains
/// and a validation error for malformed local parts.
pub fn student_id_from_email(email: &str) -> Result<ParsedStudentId> {
    let lowered = email.trim().to_ascii_lowercase();
    if !lowered.ends_with(INSTITUTIONAL_DOMAIN) {
        return Err(Error::Auth(format!(
            "Email must be a {} address",
            &INSTITUTIONAL_DOMAIN[1..]
        )));
    }

    let local = &lowered[..lowered.len() - INSTITUTIONAL_DOMAIN.len()];
    parse_student_id(local)
}

/// Normalize a free-text division label for comparison
///
/// Division is stored inconsistently across call sites ("IT 1" vs "1" vs
/// "IT1"); this is the single seam that reconciles them. If the input
/// contains digits, the digits are returned with leading zeros stripped;
/// otherwise the input is uppercased with whitespace removed.
pub fn normalize_division(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if !digits.is_empty() {
        let stripped = digits.trim_start_matches('0');
        if stripped.is_empty() {
            "0".to_string()
        } else {
            stripped.to_string()
        }
    } else {
        raw.chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase()
    }
}

/// Minimal structural email check (local part, domain with a dot)
pub fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_regular_id() {
        let parsed = parse_student_id("24it176").unwrap();
        assert!(!parsed.is_diploma);
        assert_eq!(parsed.admission_year, "24");
        assert_eq!(parsed.department, Department::IT);
        assert_eq!(parsed.roll, "176");
        assert_eq!(parsed.canonical(), "24it176");
    }

    #[test]
    fn test_parse_diploma_id_case_insensitive() {
        let parsed = parse_student_id("D24IT176").unwrap();
        assert!(parsed.is_diploma);
        assert_eq!(parsed.department, Department::IT);
        assert_eq!(parsed.canonical(), "d24it176");
    }

    #[test]
    fn test_canonical_form_reparses_identically() {
        for raw in ["D24IT176", "25ce123", "d22CSE001", "24it176"] {
            let first = parse_student_id(raw).unwrap();
            let second = parse_student_id(&first.canonical()).unwrap();
            assert_eq!(first, second, "round trip failed for {}", raw);
        }
    }

    #[test]
    fn test_parse_rejects_malformed_ids() {
        for raw in ["", "24it17", "24it1765", "2it176", "24xx176", "dd24it176", "24 it176"] {
            assert!(parse_student_id(raw).is_err(), "accepted {:?}", raw);
        }
    }

    #[test]
    fn test_student_id_from_email() {
        let parsed = student_id_from_email("D24IT176@charusat.edu.in").unwrap();
        assert_eq!(parsed.canonical(), "d24it176");
    }

    #[test]
    fn test_student_id_from_email_rejects_foreign_domain() {
        let err = student_id_from_email("24it176@gmail.com").unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }

    #[test]
    fn test_student_id_from_email_rejects_bad_local_part() {
        let err = student_id_from_email("jdoe@charusat.edu.in").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_normalize_division_digit_mode() {
        assert_eq!(normalize_division("IT 1"), "1");
        assert_eq!(normalize_division("Division 01"), "1");
        assert_eq!(normalize_division("01"), "1");
        assert_eq!(normalize_division("CSE2"), "2");
    }

    #[test]
    fn test_normalize_division_text_mode() {
        assert_eq!(normalize_division("IT Division"), "ITDIVISION");
        assert_eq!(normalize_division("a"), "A");
    }

    #[test]
    fn test_normalize_division_idempotent() {
        for raw in ["IT 1", "01", "IT Division", "", "00", "  CSE  2 ", "b1"] {
            let once = normalize_division(raw);
            assert_eq!(normalize_division(&once), once, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_is_plausible_email() {
        assert!(is_plausible_email("a@b.com"));
        assert!(!is_plausible_email("a@b"));
        assert!(!is_plausible_email("@b.com"));
        assert!(!is_plausible_email("ab.com"));
    }
}
