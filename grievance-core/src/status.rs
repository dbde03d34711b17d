//! Grievance status lifecycle
//!
//! `pending -> in-progress -> {resolved, rejected}` with direct jumps from
//! `pending` to either terminal state allowed. Terminal states accept no further
//! transitions, including re-setting the same value.

use serde::{Deserialize, Serialize};

use crate::error::StatusError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Pending,
        Status::InProgress,
        Status::Resolved,
        Status::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in-progress",
            Status::Resolved => "resolved",
            Status::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Result<Self, StatusError> {
        match s {
            "pending" => Ok(Status::Pending),
            "in-progress" => Ok(Status::InProgress),
            "resolved" => Ok(Status::Resolved),
            "rejected" => Ok(Status::Rejected),
            other => Err(StatusError::Unknown(other.to_string())),
        }
    }

    /// Terminal states permit no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Resolved | Status::Rejected)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of planning a status change at the authority boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Same non-terminal value requested; the store must not be touched and
    /// `updated_at` stays as it was.
    Unchanged,
    /// Persist the new status and refresh `updated_at`.
    Updated(Status),
}

/// Authoritative transition check. This is the only place lifecycle rules are
/// enforced; callers apply the result verbatim.
pub fn plan_transition(current: Status, requested: Status) -> Result<Transition, StatusError> {
    if current.is_terminal() {
        return Err(StatusError::Immutable);
    }
    if requested == current {
        return Ok(Transition::Unchanged);
    }
    Ok(Transition::Updated(requested))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for status in Status::ALL {
            assert_eq!(Status::parse(status.as_str()), Ok(status));
        }
        assert!(Status::parse("closed").is_err());
    }

    #[test]
    fn test_non_terminal_moves_forward() {
        assert_eq!(
            plan_transition(Status::Pending, Status::InProgress),
            Ok(Transition::Updated(Status::InProgress))
        );
        assert_eq!(
            plan_transition(Status::Pending, Status::Resolved),
            Ok(Transition::Updated(Status::Resolved))
        );
        assert_eq!(
            plan_transition(Status::InProgress, Status::Rejected),
            Ok(Transition::Updated(Status::Rejected))
        );
    }

    #[test]
    fn test_same_non_terminal_is_noop() {
        assert_eq!(
            plan_transition(Status::Pending, Status::Pending),
            Ok(Transition::Unchanged)
        );
        assert_eq!(
            plan_transition(Status::InProgress, Status::InProgress),
            Ok(Transition::Unchanged)
        );
    }

    #[test]
    fn test_terminal_is_immutable() {
        for terminal in [Status::Resolved, Status::Rejected] {
            for requested in Status::ALL {
                assert_eq!(
                    plan_transition(terminal, requested),
                    Err(StatusError::Immutable),
                    "{terminal} -> {requested} must be rejected"
                );
            }
        }
    }

    #[test]
    fn test_backward_move_is_still_allowed_before_terminal() {
        // The lattice only forbids leaving terminal states; in-progress -> pending
        // is accepted, matching the authority check.
        assert_eq!(
            plan_transition(Status::InProgress, Status::Pending),
            Ok(Transition::Updated(Status::Pending))
        );
    }
}
