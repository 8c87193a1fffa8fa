//! Rayon variants of the batch routines (feature `parallel`).
//!
//! Triangles are independent, so each worker writes its own output slot. The
//! values are bit-identical to the serial routines, and when several triangles
//! fail the error reported is the one with the lowest index, as in the serial
//! loop.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use super::dispatch::triangle_double_area;
use super::kernel::double_area_from_lengths;
use super::types::{check_mesh, corners};
use crate::cfg::AreaCfg;
use crate::error::AreaError;

/// Parallel `double_area_with_cfg`.
pub fn double_area_par(
    v: &DMatrix<f64>,
    f: &DMatrix<usize>,
    cfg: &AreaCfg,
) -> Result<DVector<f64>, AreaError> {
    let kind = check_mesh(v, f)?;
    tracing::debug!(triangles = f.nrows(), dim = v.ncols(), kind = ?kind, "double_area_par");
    let vals = (0..f.nrows())
        .into_par_iter()
        .map(|t| triangle_double_area(v, corners(f, t), kind, cfg).map_err(|e| e.at(t)))
        .collect::<Vec<_>>();
    in_index_order(vals)
}

/// Parallel `double_area_from_edge_lengths_with_cfg`.
pub fn double_area_from_edge_lengths_par(
    l: &DMatrix<f64>,
    cfg: &AreaCfg,
) -> Result<DVector<f64>, AreaError> {
    if l.ncols() != 3 {
        return Err(AreaError::InvalidTopology { columns: l.ncols() });
    }
    let vals = (0..l.nrows())
        .into_par_iter()
        .map(|t| {
            double_area_from_lengths([l[(t, 0)], l[(t, 1)], l[(t, 2)]], cfg).map_err(|e| e.at(t))
        })
        .collect::<Vec<_>>();
    in_index_order(vals)
}

/// Serial pass over the per-triangle outcomes; stops at the lowest failing index.
fn in_index_order(vals: Vec<Result<f64, AreaError>>) -> Result<DVector<f64>, AreaError> {
    let vals = vals.into_iter().collect::<Result<Vec<f64>, AreaError>>()?;
    Ok(DVector::from_vec(vals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::{double_area_from_edge_lengths_with_cfg, double_area_with_cfg};
    use crate::rand::{draw_triangle_soup, TriangleSoupCfg};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn parallel_matches_serial_in_every_dimension() {
        let cfg = AreaCfg::default();
        for dim in 2..=5 {
            let mut rng = StdRng::seed_from_u64(7 + dim as u64);
            let soup = TriangleSoupCfg {
                dim,
                triangles: 500,
                ..TriangleSoupCfg::default()
            };
            let (v, f) = draw_triangle_soup(&soup, &mut rng);
            let serial = double_area_with_cfg(&v, &f, &cfg).unwrap();
            let par = double_area_par(&v, &f, &cfg).unwrap();
            assert_eq!(serial, par, "dim {}", dim);
        }
    }

    #[test]
    fn parallel_lengths_match_serial_and_report_failure() {
        let cfg = AreaCfg::default();
        let l = nalgebra::dmatrix![3.0, 4.0, 5.0; 1.0, 1.0, 1.9999999; 2.0, 2.0, 3.0];
        let serial = double_area_from_edge_lengths_with_cfg(&l, &cfg).unwrap();
        let par = double_area_from_edge_lengths_par(&l, &cfg).unwrap();
        assert_eq!(serial, par);

        let bad = nalgebra::dmatrix![3.0, 4.0, 5.0; 1.0, 1.0, 5.0];
        assert!(matches!(
            double_area_from_edge_lengths_par(&bad, &cfg),
            Err(AreaError::InvalidTriangleInequality { triangle: 1, .. })
        ));
    }

    #[test]
    fn parallel_reports_lowest_failing_triangle() {
        let cfg = AreaCfg::default();
        let n = 20_000;
        let l = nalgebra::DMatrix::from_fn(n, 3, |t, j| match (t % 97 == 13, j) {
            (true, 2) => 5.0,
            _ => 1.0,
        });
        let serial = double_area_from_edge_lengths_with_cfg(&l, &cfg).unwrap_err();
        let par = double_area_from_edge_lengths_par(&l, &cfg).unwrap_err();
        assert_eq!(serial.triangle(), Some(13));
        assert_eq!(par, serial);

        let mut rng = StdRng::seed_from_u64(3);
        let soup = TriangleSoupCfg {
            dim: 3,
            triangles: n,
            vertices: 64,
            ..TriangleSoupCfg::default()
        };
        let (v, mut f) = draw_triangle_soup(&soup, &mut rng);
        let bad = v.nrows();
        let v = v.insert_row(bad, f64::NAN);
        for t in (40..n).step_by(211) {
            f[(t, 1)] = bad;
        }
        let serial = double_area_with_cfg(&v, &f, &cfg).unwrap_err();
        let par = double_area_par(&v, &f, &cfg).unwrap_err();
        assert_eq!(serial, AreaError::NonFiniteInput { triangle: 40 });
        assert_eq!(par, serial);
    }
}
