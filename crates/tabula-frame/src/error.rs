//! Error types for frame construction and column building.

use crate::types::SemanticType;

/// Result type for frame operations.
pub type Result<T> = std::result::Result<T, FrameError>;

/// Errors raised while building columns or assembling frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A value of the wrong type was pushed into a column.
    #[error("type mismatch in column '{column}': expected {expected}, got {actual}")]
    TypeMismatch {
        /// Column name.
        column: String,
        /// The column's element type.
        expected: SemanticType,
        /// The type of the rejected value.
        actual: SemanticType,
    },

    /// The requested element type has no dense container representation.
    #[error("no dense container for datatype {datatype}")]
    Unbuildable {
        /// The unsupported element type.
        datatype: SemanticType,
    },

    /// Columns disagree on shape, or frames disagree on structure.
    #[error("shape mismatch: {message}")]
    ShapeMismatch {
        /// What disagreed.
        message: String,
    },
}

impl FrameError {
    /// Create a type-mismatch error.
    pub fn type_mismatch(
        column: impl Into<String>,
        expected: SemanticType,
        actual: SemanticType,
    ) -> Self {
        Self::TypeMismatch {
            column: column.into(),
            expected,
            actual,
        }
    }

    /// Create a shape-mismatch error.
    pub fn shape_mismatch(message: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            message: message.into(),
        }
    }
}
