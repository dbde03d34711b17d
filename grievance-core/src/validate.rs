//! Submission validation rules
//!
//! Role-based rules from the institution: students use the `@sves.org.in` domain,
//! teaching and non-teaching staff use `@srivasaviengg.ac.in`. Staff IDs follow
//! fixed dash-separated formats; student roll numbers only need to be non-empty.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Email domain for students.
pub const STUDENT_DOMAIN: &str = "@sves.org.in";
/// Email domain for teaching and non-teaching staff.
pub const FACULTY_DOMAIN: &str = "@srivasaviengg.ac.in";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Student,
    Teaching,
    NonTeaching,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teaching => "teaching",
            Role::NonTeaching => "non-teaching",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "student" => Ok(Role::Student),
            "teaching" => Ok(Role::Teaching),
            "non-teaching" => Ok(Role::NonTeaching),
            other => Err(ValidationError::InvalidRole(other.to_string())),
        }
    }

    /// Label used in user-facing validation messages.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Student => "Students",
            Role::Teaching | Role::NonTeaching => "Faculty",
        }
    }

    pub fn expected_domain(&self) -> &'static str {
        match self {
            Role::Student => STUDENT_DOMAIN,
            Role::Teaching | Role::NonTeaching => FACULTY_DOMAIN,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loose shape check used before sending an OTP: something@something.tld.
pub fn is_plausible_email(email: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
    re.is_match(email)
}

/// OTP issuance accepts either institutional domain; the role binding is only
/// known at submission time.
pub fn is_institutional_email(email: &str) -> bool {
    let lower = email.to_lowercase();
    lower.ends_with(STUDENT_DOMAIN) || lower.ends_with(FACULTY_DOMAIN)
}

/// Role-based email domain check, comparing case-insensitively.
pub fn check_email_domain(email: &str, role: Role) -> Result<(), ValidationError> {
    if email.to_lowercase().ends_with(role.expected_domain()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmailDomain {
            role_label: role.label(),
            expected: role.expected_domain(),
        })
    }
}

/// Role-based external-ID format check, normalized to uppercase before matching.
/// Teaching: 1 letter, dash, 2-4 letters, dash, 1-3 digits (e.g. T-AB-1).
/// Non-teaching: 2 letters, dash, 3-4 letters, dash, 1-3 digits (e.g. NT-ABC-1).
/// Students only need a non-empty ID (checked by field presence).
pub fn check_external_id(id: &str, role: Role) -> Result<(), ValidationError> {
    static TEACHING_RE: OnceLock<Regex> = OnceLock::new();
    static NON_TEACHING_RE: OnceLock<Regex> = OnceLock::new();

    let upper = id.to_uppercase();
    match role {
        Role::Student => Ok(()),
        Role::Teaching => {
            let re = TEACHING_RE
                .get_or_init(|| Regex::new(r"^[A-Z]-[A-Z]{2,4}-\d{1,3}$").unwrap());
            if re.is_match(&upper) {
                Ok(())
            } else {
                Err(ValidationError::InvalidIdFormat {
                    role_label: "Faculty",
                    example: "T-AB-1, T-ABC-12, or T-ABCD-123",
                })
            }
        }
        Role::NonTeaching => {
            let re = NON_TEACHING_RE
                .get_or_init(|| Regex::new(r"^[A-Z]{2}-[A-Z]{3,4}-\d{1,3}$").unwrap());
            if re.is_match(&upper) {
                Ok(())
            } else {
                Err(ValidationError::InvalidIdFormat {
                    role_label: "Staff",
                    example: "NT-ABC-1, NT-ABCD-12, or ST-ABCD-123",
                })
            }
        }
    }
}

/// Presence check over named fields; fails listing every missing field.
pub fn require_fields(fields: &[(&str, &str)]) -> Result<(), ValidationError> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("student"), Ok(Role::Student));
        assert_eq!(Role::parse("teaching"), Ok(Role::Teaching));
        assert_eq!(Role::parse("non-teaching"), Ok(Role::NonTeaching));
        assert!(Role::parse("staff").is_err());
    }

    #[test]
    fn test_student_domain() {
        assert!(check_email_domain("x@sves.org.in", Role::Student).is_ok());
        assert!(check_email_domain("X@SVES.ORG.IN", Role::Student).is_ok());

        let err = check_email_domain("x@srivasaviengg.ac.in", Role::Student).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidEmailDomain {
                role_label: "Students",
                expected: "@sves.org.in",
            }
        );
    }

    #[test]
    fn test_faculty_domain() {
        for role in [Role::Teaching, Role::NonTeaching] {
            assert!(check_email_domain("x@srivasaviengg.ac.in", role).is_ok());
            assert!(check_email_domain("x@sves.org.in", role).is_err());
        }
    }

    #[test]
    fn test_teaching_id_format() {
        assert!(check_external_id("T-AB-1", Role::Teaching).is_ok());
        assert!(check_external_id("T-ABC-12", Role::Teaching).is_ok());
        assert!(check_external_id("T-ABCD-123", Role::Teaching).is_ok());
        // case-insensitive: normalized to uppercase first
        assert!(check_external_id("t-ab-1", Role::Teaching).is_ok());

        // middle segment too short
        assert!(check_external_id("T-A-1", Role::Teaching).is_err());
        assert!(check_external_id("T-ABCDE-1", Role::Teaching).is_err());
        assert!(check_external_id("T-AB-1234", Role::Teaching).is_err());
        assert!(check_external_id("TT-AB-1", Role::Teaching).is_err());
    }

    #[test]
    fn test_non_teaching_id_format() {
        assert!(check_external_id("NT-ABC-1", Role::NonTeaching).is_ok());
        assert!(check_external_id("NT-ABCD-12", Role::NonTeaching).is_ok());
        assert!(check_external_id("ST-ABCD-123", Role::NonTeaching).is_ok());
        assert!(check_external_id("nt-abc-1", Role::NonTeaching).is_ok());

        assert!(check_external_id("N-ABC-1", Role::NonTeaching).is_err());
        assert!(check_external_id("NT-AB-1", Role::NonTeaching).is_err());
        assert!(check_external_id("NT-ABC-1234", Role::NonTeaching).is_err());
    }

    #[test]
    fn test_student_id_unconstrained() {
        assert!(check_external_id("22A81A0501", Role::Student).is_ok());
        assert!(check_external_id("anything", Role::Student).is_ok());
    }

    #[test]
    fn test_plausible_email() {
        assert!(is_plausible_email("a@b.co"));
        assert!(!is_plausible_email("a@b"));
        assert!(!is_plausible_email("a b@c.d"));
        assert!(!is_plausible_email("no-at-sign"));
    }

    #[test]
    fn test_institutional_email() {
        assert!(is_institutional_email("x@sves.org.in"));
        assert!(is_institutional_email("x@srivasaviengg.ac.in"));
        assert!(!is_institutional_email("x@gmail.com"));
    }

    #[test]
    fn test_require_fields_lists_all_missing() {
        let err = require_fields(&[("name", ""), ("email", "x@y.z"), ("mobile", "  ")])
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields(vec!["name".to_string(), "mobile".to_string()])
        );
        assert!(require_fields(&[("name", "a"), ("email", "b")]).is_ok());
    }
}
