use thiserror::Error;

/// Failures reported by fallible constructors and matrix operations.
///
/// A query that finds no intersection is not an error: those return `bool` or `Option`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeomError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("matrix is singular (determinant is zero)")]
    SingularMatrix,
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
}

pub type Result<T> = std::result::Result<T, GeomError>;

pub(crate) fn length_mismatch(what: &str, expected: usize, actual: usize) -> GeomError {
    GeomError::InvalidArgument(format!(
        "{what}: expected {expected} components, got {actual}"
    ))
}
