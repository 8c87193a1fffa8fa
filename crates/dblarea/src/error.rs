//! Errors surfaced by the area routines.

use std::fmt;

/// Errors surfaced by the area routines.
///
/// Entry-level conditions (`InvalidTopology`, `UnsupportedDimension`,
/// `IndexOutOfBounds`) are detected before any triangle is processed. The
/// remaining variants are attached to a single triangle.
#[derive(Clone, Debug, PartialEq)]
pub enum AreaError {
    /// Face table rows are not index triples.
    InvalidTopology { columns: usize },
    /// Vertex dimension below 2.
    UnsupportedDimension { dim: usize },
    /// A face references a vertex row that does not exist.
    IndexOutOfBounds {
        triangle: usize,
        index: usize,
        vertices: usize,
    },
    /// The three lengths cannot close a triangle.
    InvalidTriangleInequality { triangle: usize, lengths: [f64; 3] },
    /// An input length is NaN or infinite.
    NonFiniteInput { triangle: usize },
    /// The kernel produced NaN or a negative value from admissible input.
    NumericInvariantViolation { triangle: usize, value: f64 },
}

impl AreaError {
    /// Triangle the error is attached to, if any.
    pub fn triangle(&self) -> Option<usize> {
        match self {
            AreaError::InvalidTopology { .. } | AreaError::UnsupportedDimension { .. } => None,
            AreaError::IndexOutOfBounds { triangle, .. }
            | AreaError::InvalidTriangleInequality { triangle, .. }
            | AreaError::NonFiniteInput { triangle }
            | AreaError::NumericInvariantViolation { triangle, .. } => Some(*triangle),
        }
    }

    pub(crate) fn at(self, triangle: usize) -> Self {
        match self {
            AreaError::InvalidTriangleInequality { lengths, .. } => {
                AreaError::InvalidTriangleInequality { triangle, lengths }
            }
            AreaError::NonFiniteInput { .. } => AreaError::NonFiniteInput { triangle },
            AreaError::NumericInvariantViolation { value, .. } => {
                AreaError::NumericInvariantViolation { triangle, value }
            }
            other => other,
        }
    }
}

impl fmt::Display for AreaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AreaError::InvalidTopology { columns } => write!(
                f,
                "faces must be triangles (3 indices per row), got {} columns",
                columns
            ),
            AreaError::UnsupportedDimension { dim } => {
                write!(f, "vertex dimension {} is not supported (need ≥2)", dim)
            }
            AreaError::IndexOutOfBounds {
                triangle,
                index,
                vertices,
            } => write!(
                f,
                "triangle {} references vertex {} but only {} vertices exist",
                triangle, index, vertices
            ),
            AreaError::InvalidTriangleInequality { triangle, lengths } => write!(
                f,
                "triangle {} has edge lengths {:?} violating the triangle inequality",
                triangle, lengths
            ),
            AreaError::NonFiniteInput { triangle } => {
                write!(f, "triangle {} has a non-finite edge length", triangle)
            }
            AreaError::NumericInvariantViolation { triangle, value } => write!(
                f,
                "double area of triangle {} evaluated to {} (kernel invariant broken)",
                triangle, value
            ),
        }
    }
}

impl std::error::Error for AreaError {}
