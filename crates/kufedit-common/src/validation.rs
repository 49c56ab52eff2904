//! Structured validation results shared by all format codecs.
//!
//! `validate()` on a codec is a pure function of the parsed model: it never
//! mutates anything and never blocks loading or saving. Consumers use the
//! record index to navigate back to the offending record.

use std::fmt;

/// Severity of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single issue reported by a codec's `validate()`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Name of the offending field.
    pub field: &'static str,
    /// Human-readable description.
    pub message: String,
    /// 0-based index of the record the issue refers to.
    pub record_index: usize,
}

impl ValidationIssue {
    pub fn new(
        severity: Severity,
        field: &'static str,
        message: impl Into<String>,
        record_index: usize,
    ) -> Self {
        Self {
            severity,
            field,
            message: message.into(),
            record_index,
        }
    }

    /// Shorthand for a warning.
    pub fn warning(field: &'static str, message: impl Into<String>, record_index: usize) -> Self {
        Self::new(Severity::Warning, field, message, record_index)
    }

    /// Shorthand for an error.
    pub fn error(field: &'static str, message: impl Into<String>, record_index: usize) -> Self {
        Self::new(Severity::Error, field, message, record_index)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] record {}: {} ({})",
            self.severity, self.record_index, self.message, self.field
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_display() {
        let issue = ValidationIssue::error("uniqueId", "Duplicate unique ID: 42", 3);
        assert_eq!(
            issue.to_string(),
            "[error] record 3: Duplicate unique ID: 42 (uniqueId)"
        );
    }
}
