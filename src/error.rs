//! Error types surfaced to the player

use thiserror::Error;

/// Rejected form input. Shown inline; the flow does not advance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please provide at least a name and email.")]
    MissingName,
    #[error("Please provide at least a name and email.")]
    MissingEmail,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

/// STL generation failure. Shown in place of the export call-to-action.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExportError {
    #[error("mesh has no triangles")]
    EmptyMesh,
    #[error("segment {index} has non-finite extent {value}")]
    NonFinite { index: usize, value: f32 },
    #[error("mesh has too many triangles ({0})")]
    TooManyTriangles(usize),
}
