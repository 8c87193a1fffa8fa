//! Tolerance defaults for the area kernels.
//!
//! Policy
//! - One tolerance only. Everything else in the kernel is exact branching on
//!   signs of well-conditioned factors.

/// Relative slack (in units of the longest edge) under which a negative
/// `c - (a - b)` factor is treated as rounding noise on a flat triangle.
pub(crate) const REL_SLACK: f64 = 16.0 * f64::EPSILON;

/// Kernel configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AreaCfg {
    pub rel_slack: f64,
}

impl Default for AreaCfg {
    fn default() -> Self {
        Self {
            rel_slack: REL_SLACK,
        }
    }
}

impl AreaCfg {
    /// Strict configuration: any negative factor is reported.
    #[inline]
    pub fn strict() -> Self {
        Self { rel_slack: 0.0 }
    }
}
