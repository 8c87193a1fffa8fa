//! Per-triangle edge lengths in any dimension.
//!
//! Convention: column `i` holds the length of the edge opposite corner `i`,
//! i.e. `l0 = |v1 - v2|`, `l1 = |v0 - v2|`, `l2 = |v0 - v1|`.

use nalgebra::DMatrix;

use crate::area::types::{check_mesh, corners};
use crate::error::AreaError;

/// `#F × 3` edge-length table for the faces `f` over vertex rows `v`.
pub fn edge_lengths(v: &DMatrix<f64>, f: &DMatrix<usize>) -> Result<DMatrix<f64>, AreaError> {
    check_mesh(v, f)?;
    let mut l = DMatrix::<f64>::zeros(f.nrows(), 3);
    for t in 0..f.nrows() {
        let row = triangle_edge_lengths(v, corners(f, t));
        for (k, len) in row.into_iter().enumerate() {
            l[(t, k)] = len;
        }
    }
    Ok(l)
}

/// Edge lengths of one triangle; indices must be in range.
#[inline]
pub(crate) fn triangle_edge_lengths(v: &DMatrix<f64>, [i0, i1, i2]: [usize; 3]) -> [f64; 3] {
    [dist(v, i1, i2), dist(v, i0, i2), dist(v, i0, i1)]
}

#[inline]
fn dist(v: &DMatrix<f64>, i: usize, j: usize) -> f64 {
    (v.row(i) - v.row(j)).norm()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dmatrix;

    #[test]
    fn lengths_follow_opposite_corner_convention() {
        // 3-4-5 right triangle with the right angle at corner 0.
        let v = dmatrix![0.0, 0.0; 3.0, 0.0; 0.0, 4.0];
        let f = dmatrix![0usize, 1, 2];
        let l = edge_lengths(&v, &f).unwrap();
        assert!((l[(0, 0)] - 5.0).abs() < 1e-12);
        assert!((l[(0, 1)] - 4.0).abs() < 1e-12);
        assert!((l[(0, 2)] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn works_in_higher_dimensions() {
        let v = dmatrix![
            0.0, 0.0, 0.0, 0.0, 0.0;
            1.0, 1.0, 1.0, 1.0, 1.0;
            0.0, 0.0, 0.0, 0.0, 2.0
        ];
        let f = dmatrix![0usize, 1, 2];
        let l = edge_lengths(&v, &f).unwrap();
        assert!((l[(0, 2)] - 5f64.sqrt()).abs() < 1e-12);
        assert!((l[(0, 1)] - 2.0).abs() < 1e-12);
        assert!((l[(0, 0)] - 5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn rejects_quads_and_bad_indices() {
        let v = dmatrix![0.0, 0.0; 1.0, 0.0; 0.0, 1.0; 1.0, 1.0];
        let quads = dmatrix![0usize, 1, 3, 2];
        assert!(matches!(
            edge_lengths(&v, &quads),
            Err(AreaError::InvalidTopology { columns: 4 })
        ));
        let bad = dmatrix![0usize, 1, 7];
        assert!(matches!(
            edge_lengths(&v, &bad),
            Err(AreaError::IndexOutOfBounds {
                triangle: 0,
                index: 7,
                vertices: 4
            })
        ));
    }
}
