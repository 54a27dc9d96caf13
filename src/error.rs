//! Error taxonomy for a generation run.
//!
//! Only conditions that must terminate a run are errors. A candidate that the
//! routing oracle reports as missing is a normal outcome
//! ([`DispatchOutcome::ExpectedAbsence`](crate::dispatcher::DispatchOutcome)),
//! and a documented parameter with no real counterpart falls through to a
//! synthetic descriptor in the [`resolver`](crate::resolver).

use std::fmt;
use thiserror::Error;

/// A single problem found while validating a model or controller document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub location: String,
    pub kind: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        location: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ValidationIssue {
            location: location.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.location, self.message)
    }
}

/// All validation issues found in one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "model validation failed, {} issue(s) found:", self.issues.len())?;
        for issue in &self.issues {
            writeln!(f, "  {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ModelError {}

/// Turn a list of collected issues into a `Result`.
pub fn fail_if_issues(issues: Vec<ValidationIssue>) -> Result<(), ModelError> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ModelError { issues })
    }
}

/// Terminating errors of a generation run.
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// The sample value synthesizer has no literal for this (kind, format).
    #[error(
        "cannot synthesize a sample value for parameter '{parameter}' in template '{template}': \
         unsupported type (kind: {kind}, format: {})",
        format.as_deref().unwrap_or("<none>")
    )]
    Synthesis {
        parameter: String,
        template: String,
        kind: String,
        format: Option<String>,
    },

    /// A model type resolved to more than one implementation type.
    #[error("multiple implementation types match model type '{model_type}': {}", candidates.join(", "))]
    AmbiguousTypeMapping {
        model_type: String,
        candidates: Vec<String>,
    },

    /// The routing oracle failed for a reason other than "no such route".
    #[error("dispatch fault for {method} {uri} (template '{template}'): status {status}: {message}")]
    DispatchFault {
        method: String,
        uri: String,
        template: String,
        status: u16,
        message: String,
    },

    /// A template could not be bound into a concrete URI.
    #[error("malformed template '{template}': {reason}")]
    MalformedTemplate { template: String, reason: String },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ExplorerError {
    pub(crate) fn malformed(template: &str, reason: impl Into<String>) -> Self {
        ExplorerError::MalformedTemplate {
            template: template.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = ExplorerError> = std::result::Result<T, E>;
