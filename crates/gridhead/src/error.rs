//! Error types for the header controllers.
//!
//! None of these errors is fatal to the grid. The gesture-facing entry points
//! (`start`, `finish`, `open_at`, resize handlers) swallow them and report
//! "no effect" instead; the typed variants exist so internal steps can use
//! `?` and so the reason shows up in logs.

use thiserror::Error;

use crate::model::ColumnId;

/// Errors raised while interpreting or committing a header gesture.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// The drop target or the dragged column is not in the current order.
    #[error("column '{0}' is not a valid drop target")]
    InvalidTarget(ColumnId),

    /// A gesture was attempted while another one is in progress.
    #[error("a {active} gesture is already in progress")]
    ConcurrentGestureRejected {
        /// Short name of the gesture holding the arbiter.
        active: &'static str,
    },

    /// A commit referenced a column removed from the model mid-gesture.
    #[error("column '{0}' was removed while the gesture was in progress")]
    StaleColumn(ColumnId),

    /// The column id is unknown to the model.
    #[error("unknown column '{0}'")]
    UnknownColumn(ColumnId),

    /// A column order listed the same id twice.
    #[error("column '{0}' appears more than once in the order")]
    DuplicateColumn(ColumnId),

    /// The column's capability flags forbid the requested action.
    #[error("column '{column}' does not allow {action}")]
    CapabilityDenied {
        /// The column the action targeted.
        column: ColumnId,
        /// The refused action.
        action: &'static str,
    },

    /// Menu actions are refused while a drag or resize is active.
    #[error("header actions are suspended while a gesture is active")]
    GestureActive,
}

/// Errors raised while loading or validating a [`HeaderConfig`](crate::HeaderConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("failed to parse header config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Size bounds are inconsistent.
    #[error("invalid size bounds: min {min} > max {max}")]
    InvalidBounds {
        /// Configured minimum size.
        min: f32,
        /// Configured maximum size.
        max: f32,
    },

    /// The default column size lies outside the size bounds.
    #[error("default size {default} is outside [{min}, {max}]")]
    DefaultOutOfBounds {
        /// Configured default size.
        default: f32,
        /// Configured minimum size.
        min: f32,
        /// Configured maximum size.
        max: f32,
    },

    /// A numeric setting that must be positive was not.
    #[error("'{name}' must be positive, got {value}")]
    NonPositive {
        /// The offending setting.
        name: &'static str,
        /// Its value.
        value: f32,
    },
}

/// Result type for header operations.
pub type HeaderResult<T> = Result<T, HeaderError>;
