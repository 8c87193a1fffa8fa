//! Double area of mesh triangles.
//!
//! Purpose
//! - One scalar per triangle, twice its geometric area, same order as the
//!   face table. Signed (CCW positive) for 2D vertices, non-negative for any
//!   other dimension.
//!
//! Layout
//! - `dispatch`: vertex/face entry points; picks a strategy from `DimKind`.
//! - `kernel`: edge-length entry points (Kahan's stable Heron formula).
//! - `parallel`: rayon variants, behind the `parallel` feature.
//!
//! Failure modes
//! - `double_area*` and `double_area_from_edge_lengths*` are atomic.
//! - `*_per_triangle` keep going and return one `Result` per triangle.

mod dispatch;
mod kernel;
#[cfg(feature = "parallel")]
mod parallel;
pub mod types;

pub use dispatch::{
    double_area, double_area3, double_area_per_triangle, double_area_with_cfg,
    signed_double_area2,
};
pub use kernel::{
    double_area_from_edge_lengths, double_area_from_edge_lengths_per_triangle,
    double_area_from_edge_lengths_with_cfg, double_area_from_lengths,
};
#[cfg(feature = "parallel")]
pub use parallel::{double_area_from_edge_lengths_par, double_area_par};
pub use types::DimKind;
