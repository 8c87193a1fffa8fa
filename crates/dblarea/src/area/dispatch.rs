//! Double area from vertex positions, dispatched on vertex dimension.
//!
//! - d = 2: signed cross product `(v0 - v2) × (v1 - v2)` (positive for CCW).
//! - d = 3: root of the summed squares of the signed double areas of the
//!   projections onto the (x,y), (y,z), (z,x) planes.
//! - d ≥ 4: edge lengths, then the Heron kernel.
//!
//! The 2D and 3D formulas rescale the corners by a power of two before
//! subtracting, so the result overflows only when the area itself does.

use nalgebra::{DMatrix, DVector, Vector2, Vector3};

use super::kernel::{double_area_from_edge_lengths_with_cfg, double_area_from_lengths};
use super::types::{check_mesh, check_shape, checked_corners, corners, DimKind};
use crate::cfg::AreaCfg;
use crate::error::AreaError;
use crate::measure::{edge_lengths, triangle_edge_lengths};

/// Axis pairs whose projected areas make up the 3D area.
const AXIS_PAIRS: [(usize, usize); 3] = [(0, 1), (1, 2), (2, 0)];

/// Bound on the corner rescaling exponent; keeps both `2^e` and `2^-e` normal.
const MAX_COORD_EXP: i32 = 1000;

/// Exponent `e` that brings the largest corner magnitude `m` near 1. Zero when
/// there is nothing to rescale (all-zero or non-finite corners).
fn coord_exp<'a>(coords: impl IntoIterator<Item = &'a f64>) -> i32 {
    let m = coords.into_iter().fold(0.0f64, |m, x| m.max(x.abs()));
    if m > 0.0 && m.is_finite() {
        (m.log2().floor() as i32).clamp(-MAX_COORD_EXP, MAX_COORD_EXP)
    } else {
        0
    }
}

/// Signed double area of a planar triangle; positive for counterclockwise `a, b, c`.
#[inline]
pub fn signed_double_area2(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> f64 {
    let e = coord_exp(a.iter().chain(b.iter()).chain(c.iter()));
    let down = 2f64.powi(-e);
    let (a, b, c) = (a * down, b * down, c * down);
    let r = a - c;
    let s = b - c;
    let up = 2f64.powi(e);
    (r.x * s.y - r.y * s.x) * up * up
}

/// Unsigned double area of a triangle in R³.
#[inline]
pub fn double_area3(a: Vector3<f64>, b: Vector3<f64>, c: Vector3<f64>) -> f64 {
    let e = coord_exp(a.iter().chain(b.iter()).chain(c.iter()));
    let down = 2f64.powi(-e);
    let (a, b, c) = (a * down, b * down, c * down);
    let r = a - c;
    let s = b - c;
    let proj = AXIS_PAIRS.map(|(i, j)| r[i] * s[j] - r[j] * s[i]);
    let up = 2f64.powi(e);

    // Squares of projections far below the corner scale would underflow;
    // normalize by the largest one first.
    let big = proj.iter().fold(0.0f64, |m, p| m.max(p.abs()));
    if big == 0.0 || !big.is_finite() {
        return proj.iter().map(|p| p * p).sum::<f64>().sqrt() * up * up;
    }
    let acc: f64 = proj.iter().map(|p| (p / big) * (p / big)).sum();
    acc.sqrt() * big * up * up
}

/// Double area of every triangle in `f` over the vertex rows of `v`.
///
/// Signed for 2D input, non-negative otherwise. Fails atomically: either all
/// `#F` entries are returned or the first error is.
pub fn double_area(v: &DMatrix<f64>, f: &DMatrix<usize>) -> Result<DVector<f64>, AreaError> {
    double_area_with_cfg(v, f, &AreaCfg::default())
}

pub fn double_area_with_cfg(
    v: &DMatrix<f64>,
    f: &DMatrix<usize>,
    cfg: &AreaCfg,
) -> Result<DVector<f64>, AreaError> {
    let kind = check_mesh(v, f)?;
    tracing::debug!(triangles = f.nrows(), dim = v.ncols(), kind = ?kind, "double_area");
    if let DimKind::General(_) = kind {
        let l = edge_lengths(v, f)?;
        return double_area_from_edge_lengths_with_cfg(&l, cfg);
    }
    let mut out = DVector::<f64>::zeros(f.nrows());
    for t in 0..f.nrows() {
        out[t] = triangle_double_area(v, corners(f, t), kind, cfg).map_err(|e| e.at(t))?;
    }
    Ok(out)
}

/// Per-triangle outcomes; a bad triangle never affects any other entry.
///
/// Only shape errors (`InvalidTopology`, `UnsupportedDimension`) fail the whole
/// call. Out-of-range indices are reported on the triangle that holds them.
pub fn double_area_per_triangle(
    v: &DMatrix<f64>,
    f: &DMatrix<usize>,
    cfg: &AreaCfg,
) -> Result<Vec<Result<f64, AreaError>>, AreaError> {
    let kind = check_shape(v, f)?;
    tracing::debug!(triangles = f.nrows(), dim = v.ncols(), kind = ?kind, "double_area_per_triangle");
    let out = (0..f.nrows())
        .map(|t| {
            checked_corners(v, f, t)
                .and_then(|c| triangle_double_area(v, c, kind, cfg))
                .map_err(|e| {
                    let e = e.at(t);
                    tracing::warn!(triangle = t, error = %e, "skipping triangle");
                    e
                })
        })
        .collect();
    Ok(out)
}

/// One triangle; corners must be in range. Errors carry triangle index 0.
pub(crate) fn triangle_double_area(
    v: &DMatrix<f64>,
    c: [usize; 3],
    kind: DimKind,
    cfg: &AreaCfg,
) -> Result<f64, AreaError> {
    let value = match kind {
        DimKind::Planar => {
            let p = |i: usize| Vector2::new(v[(i, 0)], v[(i, 1)]);
            signed_double_area2(p(c[0]), p(c[1]), p(c[2]))
        }
        DimKind::Spatial => {
            let p = |i: usize| Vector3::new(v[(i, 0)], v[(i, 1)], v[(i, 2)]);
            double_area3(p(c[0]), p(c[1]), p(c[2]))
        }
        DimKind::General(_) => {
            return double_area_from_lengths(triangle_edge_lengths(v, c), cfg);
        }
    };
    if !value.is_finite() && !c.iter().all(|&i| v.row(i).iter().all(|x| x.is_finite())) {
        return Err(AreaError::NonFiniteInput { triangle: 0 });
    }
    if value.is_nan() {
        debug_assert!(false, "double area produced {}", value);
        return Err(AreaError::NumericInvariantViolation { triangle: 0, value });
    }
    Ok(value)
}
