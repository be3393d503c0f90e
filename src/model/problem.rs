//! Annotation problem slots.

use std::fmt;
use std::str::FromStr;

use crate::constants::text;
use crate::error::WorkspaceError;
use crate::zoom_math::Point;

/// Identifier of a problem slot.
///
/// The supervisor slot always exists; numbered slots render as `problemN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProblemId {
    Supervisor,
    Numbered(u32),
}

impl ProblemId {
    pub fn is_supervisor(&self) -> bool {
        matches!(self, ProblemId::Supervisor)
    }

    /// Slot number, `None` for the supervisor.
    pub fn number(&self) -> Option<u32> {
        match self {
            ProblemId::Supervisor => None,
            ProblemId::Numbered(n) => Some(*n),
        }
    }
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemId::Supervisor => f.write_str("supervisor"),
            ProblemId::Numbered(n) => write!(f, "problem{}", n),
        }
    }
}

impl FromStr for ProblemId {
    type Err = WorkspaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "supervisor" {
            return Ok(ProblemId::Supervisor);
        }
        s.strip_prefix("problem")
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .map(ProblemId::Numbered)
            .ok_or_else(|| WorkspaceError::UnknownProblem(s.to_string()))
    }
}

/// A named annotation slot awaiting a coordinate/value.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    pub id: ProblemId,
    pub display_name: String,
    pub value: String,
    /// Image-space point picked in coordinate-capture mode
    pub point: Option<Point>,
}

impl Problem {
    /// The permanent supervisor slot.
    pub fn supervisor() -> Self {
        Self {
            id: ProblemId::Supervisor,
            display_name: text::SUPERVISOR_NAME.to_string(),
            value: text::UNASSIGNED.to_string(),
            point: None,
        }
    }

    /// Numbered slot `n`, displayed as "문제 n".
    pub fn numbered(n: u32) -> Self {
        Self {
            id: ProblemId::Numbered(n),
            display_name: format!("{} {}", text::PROBLEM_PREFIX, n),
            value: text::UNASSIGNED.to_string(),
            point: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_parse() {
        assert_eq!(ProblemId::Supervisor.to_string(), "supervisor");
        assert_eq!(ProblemId::Numbered(7).to_string(), "problem7");

        assert_eq!("supervisor".parse::<ProblemId>().unwrap(), ProblemId::Supervisor);
        assert_eq!("problem12".parse::<ProblemId>().unwrap(), ProblemId::Numbered(12));
        assert!("problem".parse::<ProblemId>().is_err());
        assert!("problem0".parse::<ProblemId>().is_err());
        assert!("task3".parse::<ProblemId>().is_err());
    }

    #[test]
    fn test_numbered_problem_defaults() {
        let p = Problem::numbered(3);
        assert_eq!(p.id.number(), Some(3));
        assert_eq!(p.display_name, "문제 3");
        assert_eq!(p.value, "미지정");
        assert!(p.point.is_none());
    }

    #[test]
    fn test_supervisor() {
        let p = Problem::supervisor();
        assert!(p.id.is_supervisor());
        assert_eq!(p.id.number(), None);
    }
}
