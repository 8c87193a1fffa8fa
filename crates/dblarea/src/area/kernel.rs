//! Double area from edge lengths (Kahan's rearrangement of Heron's formula).
//!
//! With sides sorted `a ≥ b ≥ c`,
//!
//! ```text
//! 2·area = ½ · sqrt((a+(b+c)) · (c-(a-b)) · (c+(a-b)) · (a+(b-c)))
//! ```
//!
//! The parentheses are load-bearing: every subtraction is either exact or
//! between quantities whose difference is well conditioned, which keeps
//! needle and cap triangles accurate where the semiperimeter form loses all
//! digits. Reference: W. Kahan, "Miscalculating Area and Angles of a
//! Needle-like Triangle"; J. Shewchuk, "Lecture Notes on Geometric
//! Robustness", §3.1.
//!
//! The lengths are rescaled by a power of two before the product is formed so
//! that neither overflow nor underflow can occur in the radicand; power-of-two
//! scaling is exact and leaves the result bit-identical otherwise.

use nalgebra::{DMatrix, DVector};

use crate::cfg::AreaCfg;
use crate::error::AreaError;
use crate::sort::{sort3_desc, sort_rows, Order, SortAxis};

/// Largest binary exponent applied per scaling step.
const MAX_SCALE_EXP: i32 = 500;

/// Double area of one triangle given its three edge lengths (any order).
pub fn double_area_from_lengths(l: [f64; 3], cfg: &AreaCfg) -> Result<f64, AreaError> {
    double_area_sorted(sort3_desc(l), cfg)
}

/// Double area of every row of the `#F × 3` edge-length table `l`.
///
/// Fails atomically on the first bad row.
pub fn double_area_from_edge_lengths(l: &DMatrix<f64>) -> Result<DVector<f64>, AreaError> {
    double_area_from_edge_lengths_with_cfg(l, &AreaCfg::default())
}

pub fn double_area_from_edge_lengths_with_cfg(
    l: &DMatrix<f64>,
    cfg: &AreaCfg,
) -> Result<DVector<f64>, AreaError> {
    let sorted = sorted_lengths(l)?;
    let mut out = DVector::<f64>::zeros(sorted.nrows());
    for t in 0..sorted.nrows() {
        out[t] = double_area_sorted(row3(&sorted, t), cfg).map_err(|e| e.at(t))?;
    }
    Ok(out)
}

/// Per-row outcomes; a bad row never affects any other entry.
pub fn double_area_from_edge_lengths_per_triangle(
    l: &DMatrix<f64>,
    cfg: &AreaCfg,
) -> Result<Vec<Result<f64, AreaError>>, AreaError> {
    let sorted = sorted_lengths(l)?;
    let out = (0..sorted.nrows())
        .map(|t| {
            double_area_sorted(row3(&sorted, t), cfg).map_err(|e| {
                let e = e.at(t);
                tracing::warn!(triangle = t, error = %e, "skipping triangle");
                e
            })
        })
        .collect();
    Ok(out)
}

fn sorted_lengths(l: &DMatrix<f64>) -> Result<DMatrix<f64>, AreaError> {
    if l.ncols() != 3 {
        return Err(AreaError::InvalidTopology { columns: l.ncols() });
    }
    let (sorted, _) = sort_rows(l, SortAxis::Row, Order::Descending);
    Ok(sorted)
}

#[inline]
fn row3(m: &DMatrix<f64>, t: usize) -> [f64; 3] {
    [m[(t, 0)], m[(t, 1)], m[(t, 2)]]
}

/// Kahan's formula on lengths already sorted largest first.
///
/// Errors carry triangle index 0; batch callers re-tag with `AreaError::at`.
pub(crate) fn double_area_sorted([a, b, c]: [f64; 3], cfg: &AreaCfg) -> Result<f64, AreaError> {
    if !(a.is_finite() && b.is_finite() && c.is_finite()) {
        return Err(AreaError::NonFiniteInput { triangle: 0 });
    }
    let violation = AreaError::InvalidTriangleInequality {
        triangle: 0,
        lengths: [a, b, c],
    };
    if c < 0.0 {
        return Err(violation);
    }
    if a == 0.0 {
        return Ok(0.0);
    }

    let e = (a.log2().floor() as i32).clamp(-MAX_SCALE_EXP, MAX_SCALE_EXP);
    let down = 2f64.powi(-e);
    let (a, b, c) = (a * down, b * down, c * down);

    let mut cap = c - (a - b);
    if cap < 0.0 {
        if -cap > cfg.rel_slack * a {
            return Err(violation);
        }
        // flat triangle, rounding pushed it past zero
        cap = 0.0;
    }
    let radicand = (a + (b + c)) * cap * (c + (a - b)) * (a + (b - c));
    let up = 2f64.powi(e);
    let dbl = 0.5 * radicand.sqrt() * up * up;

    if !(dbl >= 0.0) {
        debug_assert!(false, "double area produced {}", dbl);
        return Err(AreaError::NumericInvariantViolation {
            triangle: 0,
            value: dbl,
        });
    }
    Ok(dbl)
}
