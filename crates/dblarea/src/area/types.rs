//! Dimension tags and entry checks shared by the area routines.

use nalgebra::DMatrix;

use crate::error::AreaError;

/// Strategy selected from the vertex dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DimKind {
    /// d = 2: signed cross product.
    Planar,
    /// d = 3: root of summed squared axis-pair projections.
    Spatial,
    /// d ≥ 4: edge lengths fed into the Heron kernel.
    General(usize),
}

impl DimKind {
    pub fn from_dim(dim: usize) -> Result<Self, AreaError> {
        match dim {
            0 | 1 => Err(AreaError::UnsupportedDimension { dim }),
            2 => Ok(DimKind::Planar),
            3 => Ok(DimKind::Spatial),
            d => Ok(DimKind::General(d)),
        }
    }

    /// Whether results on this path carry the winding sign.
    #[inline]
    pub fn is_signed(&self) -> bool {
        matches!(self, DimKind::Planar)
    }
}

/// Shape checks done before any triangle is touched: triangle topology,
/// then vertex dimension.
pub(crate) fn check_shape(v: &DMatrix<f64>, f: &DMatrix<usize>) -> Result<DimKind, AreaError> {
    if f.ncols() != 3 {
        return Err(AreaError::InvalidTopology { columns: f.ncols() });
    }
    DimKind::from_dim(v.ncols())
}

/// Corners of triangle `t`, checked against the vertex count.
#[inline]
pub(crate) fn checked_corners(
    v: &DMatrix<f64>,
    f: &DMatrix<usize>,
    t: usize,
) -> Result<[usize; 3], AreaError> {
    let c = [f[(t, 0)], f[(t, 1)], f[(t, 2)]];
    let n = v.nrows();
    match c.iter().find(|&&i| i >= n) {
        Some(&index) => Err(AreaError::IndexOutOfBounds {
            triangle: t,
            index,
            vertices: n,
        }),
        None => Ok(c),
    }
}

/// Fail-fast validation of a whole vertex/face pair.
pub(crate) fn check_mesh(v: &DMatrix<f64>, f: &DMatrix<usize>) -> Result<DimKind, AreaError> {
    let kind = check_shape(v, f)?;
    for t in 0..f.nrows() {
        checked_corners(v, f, t)?;
    }
    Ok(kind)
}

/// Row `t` of `f` as a plain index triple.
#[inline]
pub(crate) fn corners(f: &DMatrix<usize>, t: usize) -> [usize; 3] {
    [f[(t, 0)], f[(t, 1)], f[(t, 2)]]
}
