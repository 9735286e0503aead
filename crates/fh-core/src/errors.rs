//! Structured error types shared across the forecast hub crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`HubError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (columns, offending values, valid sets).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Adds a context entry rendering a list of values as `[a, b, c]`.
    pub fn with_list<I, S>(self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rendered = values
            .into_iter()
            .map(|value| value.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        self.with_context(key, format!("[{rendered}]"))
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the forecast hub toolkit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum HubError {
    /// Argument has the wrong container shape or column type.
    #[error("type mismatch: {0}")]
    TypeMismatch(ErrorInfo),
    /// Table or vector is empty where at least one element is required.
    #[error("empty input: {0}")]
    EmptyInput(ErrorInfo),
    /// Expected column is absent from a table.
    #[error("missing column: {0}")]
    MissingColumn(ErrorInfo),
    /// Value is not part of the code or abbreviation set being recoded.
    #[error("invalid location value: {0}")]
    InvalidLocationValue(ErrorInfo),
    /// Location is not a member of the target hub.
    #[error("invalid location: {0}")]
    InvalidLocation(ErrorInfo),
    /// Unrecognised location format tag.
    #[error("unknown format: {0}")]
    UnknownFormat(ErrorInfo),
    /// Unrecognised hub name.
    #[error("unknown hub: {0}")]
    UnknownHub(ErrorInfo),
    /// Unrecognised disease or target type.
    #[error("unknown target: {0}")]
    UnknownTarget(ErrorInfo),
    /// Quantile levels are not increasing, not distinct or not canonical.
    #[error("invalid quantile levels: {0}")]
    InvalidQuantileLevels(ErrorInfo),
    /// Output would not conform to the fixed submission schema.
    #[error("schema violation: {0}")]
    SchemaViolation(ErrorInfo),
    /// Filesystem failures.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Serialization and parsing failures.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl HubError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            HubError::TypeMismatch(info)
            | HubError::EmptyInput(info)
            | HubError::MissingColumn(info)
            | HubError::InvalidLocationValue(info)
            | HubError::InvalidLocation(info)
            | HubError::UnknownFormat(info)
            | HubError::UnknownHub(info)
            | HubError::UnknownTarget(info)
            | HubError::InvalidQuantileLevels(info)
            | HubError::SchemaViolation(info)
            | HubError::Io(info)
            | HubError::Serde(info) => info,
        }
    }

    /// Stable code of the underlying payload.
    pub fn code(&self) -> &str {
        &self.info().code
    }
}
