// src/model/requirement.rs
use serde::Serialize;

use crate::error::{ReqsentryError, Result};

/// A single parsed requirement statement.
///
/// The id and line number are assigned once at parse time and never change;
/// a `Requirement` is immutable for the lifetime of an analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    /// Stable identifier, e.g. `R001`.
    pub id: String,
    /// Line number in the source file (1-based, for traceability).
    pub line_number: usize,
    /// The requirement text, trimmed.
    pub text: String,
}

impl Requirement {
    /// Validates and constructs a requirement.
    ///
    /// # Errors
    /// Returns an error for an empty id, a zero line number, or blank text.
    pub fn new(id: impl Into<String>, line_number: usize, text: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let text = text.into();

        if id.is_empty() {
            return Err(ReqsentryError::InvalidRequirement(
                "requirement id cannot be empty".to_string(),
            ));
        }
        if line_number == 0 {
            return Err(ReqsentryError::InvalidRequirement(format!(
                "line number must be positive (requirement {id})"
            )));
        }
        if text.trim().is_empty() {
            return Err(ReqsentryError::InvalidRequirement(format!(
                "requirement text cannot be empty ({id})"
            )));
        }

        Ok(Self {
            id,
            line_number,
            text: text.trim().to_string(),
        })
    }
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.id, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_requirement() {
        let req = Requirement::new("R001", 3, "The system shall log out idle users").unwrap();
        assert_eq!(req.id, "R001");
        assert_eq!(req.line_number, 3);
    }

    #[test]
    fn test_rejects_empty_id() {
        assert!(Requirement::new("", 1, "text").is_err());
    }

    #[test]
    fn test_rejects_zero_line() {
        assert!(Requirement::new("R001", 0, "text").is_err());
    }

    #[test]
    fn test_rejects_blank_text() {
        assert!(Requirement::new("R001", 1, "   ").is_err());
    }

    #[test]
    fn test_trims_text() {
        let req = Requirement::new("R001", 1, "  padded  ").unwrap();
        assert_eq!(req.text, "padded");
    }
}
