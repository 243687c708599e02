//! Error types for figura operations.

use thiserror::Error;

/// Errors that can occur while constructing geometric data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A contour needs at least three vertices to enclose area.
    #[error("degenerate contour: fewer than 3 vertices")]
    TooFewVertices,

    /// A contour's enclosed area is below the tolerance.
    #[error("degenerate contour: area below tolerance")]
    ZeroArea,
}
