use std::fmt;

use serde::Serialize;

use crate::graph::EdgeRow;

/// Why a row was refused at graph construction time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InvalidEdgeReason {
    /// `source == target`.
    SelfLoop,
    /// Weight is zero, negative, or not finite.
    NonPositiveWeight(f64),
    /// Source or target label is empty (after trimming).
    EmptyLabel,
}

impl fmt::Display for InvalidEdgeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfLoop => write!(f, "self-loop"),
            Self::NonPositiveWeight(w) => write!(f, "weight must be > 0, got {w}"),
            Self::EmptyLabel => write!(f, "empty node label"),
        }
    }
}

/// Errors produced by netsight-core.
///
/// The centrality and layout engines are total over a valid
/// [`GraphStore`](crate::graph::GraphStore); the only engine-side failure is
/// an explicit cancellation request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A row could not become an edge. `index` is the zero-based position
    /// of the row in the input sequence.
    #[error("invalid edge at row {index} ({row}): {reason}")]
    InvalidEdge {
        index: usize,
        row: EdgeRow,
        reason: InvalidEdgeReason,
    },

    /// The layout was cancelled through its [`CancellationToken`](crate::CancellationToken).
    #[error("layout cancelled before round {round}")]
    LayoutCancelled { round: usize },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidEdge { .. } => ErrorCode::InvalidEdge,
            Self::LayoutCancelled { .. } => ErrorCode::LayoutCancelled,
            Self::Config(_) => ErrorCode::ConfigInvalid,
        }
    }
}

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidEdge,
    LayoutCancelled,
    ConfigInvalid,
    ConfigParseError,
    InputParseError,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidEdge => "E1001",
            Self::InputParseError => "E1002",
            Self::ConfigInvalid => "E2001",
            Self::ConfigParseError => "E2002",
            Self::LayoutCancelled => "E3001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidEdge => "Invalid edge row",
            Self::InputParseError => "Edge input could not be parsed",
            Self::ConfigInvalid => "Configuration value out of range",
            Self::ConfigParseError => "Config file parse error",
            Self::LayoutCancelled => "Layout cancelled",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InvalidEdge => {
                Some("Fix or drop the row, or rerun with --skip-invalid to ignore bad rows.")
            }
            Self::InputParseError => {
                Some("Input must be a JSON array of {source, target, weight, type, time?} objects.")
            }
            Self::ConfigInvalid => Some("Use a positive k and a finite tolerance."),
            Self::ConfigParseError => Some("Fix syntax in the TOML config file and retry."),
            Self::LayoutCancelled => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
