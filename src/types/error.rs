//! Unified Error Type System
//!
//! Centralized error types for the entire crate.
//! Classifies failures so the fetch layer can decide between surfacing an
//! error and degrading to synthetic data.
//!
//! ## Error Categories
//!
//! - **Selection**: Not enough entities/criteria to proceed (guidance, not a fault)
//! - **Transport**: Network unreachable or non-2xx status (fallback to synthetic)
//! - **Malformed**: Response body could not be decoded (fallback to synthetic)
//! - **Timeout**: Request exceeded its deadline (fallback to synthetic)
//! - **Config**: Invalid configuration (fail fast)

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Error categories used to route failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Selection is incomplete - show guidance, do nothing
    Selection,
    /// Network or HTTP status failure
    Transport,
    /// Response could not be decoded
    Malformed,
    /// Request timed out
    Timeout,
    /// Invalid configuration
    Config,
    /// Anything else
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Selection => write!(f, "SELECTION"),
            Self::Transport => write!(f, "TRANSPORT"),
            Self::Malformed => write!(f, "MALFORMED"),
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::Config => write!(f, "CONFIG"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Whether the fetch layer absorbs this failure by flagging held data as synthetic
    pub fn falls_back_to_synthetic(&self) -> bool {
        matches!(self, Self::Transport | Self::Malformed | Self::Timeout)
    }

    /// Whether retrying the same request later can succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport | Self::Timeout)
    }
}

// =============================================================================
// Selection Issues
// =============================================================================

/// Why a selection cannot be compared yet.
///
/// `Display` is the guidance text presented to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionIssue {
    TooFewEntities { required: usize, selected: usize },
    MissingProduct,
    NoCriteria,
    BlankCriterionName,
}

impl std::fmt::Display for SelectionIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewEntities { required, selected } => write!(
                f,
                "Select at least {} banks to compare ({} selected)",
                required, selected
            ),
            Self::MissingProduct => write!(f, "Select a product to analyze"),
            Self::NoCriteria => write!(f, "Select at least 1 criterion to compare"),
            Self::BlankCriterionName => write!(f, "Custom criterion name cannot be empty"),
        }
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps raw transport outcomes to crate errors
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify a non-2xx HTTP status into a transport error
    pub fn classify_http_status(status: u16, body: &str) -> BenchError {
        let reason = match status {
            400 => "bad request",
            401 | 403 => "access denied",
            404 => "endpoint not found",
            429 => "rate limited",
            500..=599 => "server error",
            _ => "unexpected status",
        };

        let body = body.trim();
        let message = if body.is_empty() {
            format!("API error: {} ({})", status, reason)
        } else {
            format!(
                "API error: {} ({}): {}",
                status,
                reason,
                truncate(body, MAX_BODY_IN_MESSAGE)
            )
        };

        BenchError::Transport(message)
    }

    /// Classify a reqwest failure that happened before a status was received
    pub fn classify_request(err: &reqwest::Error, endpoint: &str) -> BenchError {
        if err.is_timeout() {
            BenchError::Timeout {
                operation: format!("GET {}", endpoint),
                duration: None,
            }
        } else if err.is_connect() {
            BenchError::Transport(format!("Failed to connect to {}", endpoint))
        } else if err.is_decode() {
            BenchError::MalformedResponse(err.to_string())
        } else {
            BenchError::Transport(format!("Request to {} failed: {}", endpoint, err))
        }
    }
}

const MAX_BODY_IN_MESSAGE: usize = 200;

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum BenchError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // -------------------------------------------------------------------------
    // Fetch Errors
    // -------------------------------------------------------------------------
    /// Network unreachable or non-2xx response
    #[error("{0}")]
    Transport(String),

    /// Body was not valid JSON or missed a required field
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Timeout{}: {operation}", after(.duration))]
    Timeout {
        operation: String,
        duration: Option<Duration>,
    },

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("{0}")]
    SelectionIncomplete(SelectionIssue),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unknown {kind}: {id}")]
    UnknownCatalogEntry { kind: &'static str, id: String },
}

impl From<SelectionIssue> for BenchError {
    fn from(issue: SelectionIssue) -> Self {
        BenchError::SelectionIncomplete(issue)
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;

fn after(duration: &Option<Duration>) -> String {
    duration
        .map(|d| format!(" after {:?}", d))
        .unwrap_or_default()
}

impl BenchError {
    /// Category for routing decisions
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport(_) | Self::Io(_) => ErrorCategory::Transport,
            Self::MalformedResponse(_) | Self::Json(_) | Self::Yaml(_) => ErrorCategory::Malformed,
            Self::Timeout { .. } => ErrorCategory::Timeout,
            Self::SelectionIncomplete(_) => ErrorCategory::Selection,
            Self::Config(_) => ErrorCategory::Config,
            Self::UnknownCatalogEntry { .. } => ErrorCategory::Unknown,
        }
    }

    /// Create a timeout error with a known deadline
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration: Some(duration),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
