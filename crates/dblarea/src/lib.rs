//! Robust double area of triangle meshes.
//!
//! Entry points
//! - `area::double_area(V, F)`: vertex rows `V` (`#V × d`) and index triples
//!   `F` (`#F × 3`). Strategy depends on `d`, see `area::DimKind`.
//! - `area::double_area_from_edge_lengths(L)`: `#F × 3` edge lengths, column
//!   `i` opposite corner `i`.
//!
//! Supporting utilities: `measure::edge_lengths`, `sort::sort_rows`, and the
//! seeded samplers in `rand`.

pub mod area;
mod cfg;
pub mod error;
pub mod measure;
pub mod rand;
pub mod sort;

pub use cfg::AreaCfg;
pub use error::AreaError;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::area::{
        double_area, double_area3, double_area_from_edge_lengths,
        double_area_from_edge_lengths_per_triangle, double_area_from_edge_lengths_with_cfg,
        double_area_from_lengths, double_area_per_triangle, double_area_with_cfg,
        signed_double_area2, DimKind,
    };
    #[cfg(feature = "parallel")]
    pub use crate::area::{double_area_from_edge_lengths_par, double_area_par};
    pub use crate::measure::edge_lengths;
    pub use crate::sort::{sort_rows, Order, SortAxis};
    pub use crate::{AreaCfg, AreaError};
    pub use nalgebra::{DMatrix, DVector, Vector2, Vector3};
}
