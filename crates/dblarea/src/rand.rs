//! Random triangle soups and needle-like edge-length tables.
//!
//! Purpose
//! - Reproducible inputs for benches, property tests, and the CLI `sample`
//!   command. Nothing here is used by the area routines themselves.
//!
//! Model
//! - Vertices are i.i.d. uniform in `[-scale, scale]^dim`. Each triangle picks
//!   three distinct vertex rows, so triangles may share vertices.
//! - Needles are isosceles with apex gap `10^-k`, `k ∈ [3, 12]`, rescaled and
//!   shuffled so the longest side is not always in the same column.

use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Triangle soup sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct TriangleSoupCfg {
    pub dim: usize,
    pub triangles: usize,
    /// Vertex rows to draw. Values below 3 mean "three fresh vertices per triangle".
    pub vertices: usize,
    /// Half-width of the coordinate box.
    pub scale: f64,
}

impl Default for TriangleSoupCfg {
    fn default() -> Self {
        Self {
            dim: 3,
            triangles: 100,
            vertices: 0,
            scale: 1.0,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    pub fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw `(V, F)` with `V` of shape `vertices × dim` and `F` of shape `triangles × 3`.
pub fn draw_triangle_soup<R: Rng>(
    cfg: &TriangleSoupCfg,
    rng: &mut R,
) -> (DMatrix<f64>, DMatrix<usize>) {
    let fresh = cfg.vertices < 3;
    let n = if fresh { 3 * cfg.triangles } else { cfg.vertices };
    let s = cfg.scale.abs();
    let v = DMatrix::<f64>::from_fn(n, cfg.dim, |_, _| {
        if s > 0.0 {
            rng.gen_range(-s..=s)
        } else {
            0.0
        }
    });
    let mut f = DMatrix::<usize>::zeros(cfg.triangles, 3);
    let pool: Vec<usize> = (0..n).collect();
    for t in 0..cfg.triangles {
        if fresh {
            for k in 0..3 {
                f[(t, k)] = 3 * t + k;
            }
        } else {
            for (k, &i) in pool.choose_multiple(rng, 3).enumerate() {
                f[(t, k)] = i;
            }
        }
    }
    (v, f)
}

/// `n × 3` table of valid but needle-thin triangles.
pub fn draw_needle_lengths<R: Rng>(n: usize, rng: &mut R) -> DMatrix<f64> {
    let mut l = DMatrix::<f64>::zeros(n, 3);
    for t in 0..n {
        let k: i32 = rng.gen_range(3..=12);
        let scale: f64 = rng.gen_range(0.1..10.0);
        let mut row = [scale, scale, scale * (2.0 - 10f64.powi(-k))];
        row.shuffle(rng);
        for (j, x) in row.into_iter().enumerate() {
            l[(t, j)] = x;
        }
    }
    l
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soup_shapes_and_indices() {
        let mut rng = StdRng::seed_from_u64(1);
        let cfg = TriangleSoupCfg {
            dim: 4,
            triangles: 20,
            vertices: 10,
            scale: 2.0,
        };
        let (v, f) = draw_triangle_soup(&cfg, &mut rng);
        assert_eq!(v.shape(), (10, 4));
        assert_eq!(f.shape(), (20, 3));
        for t in 0..20 {
            let (a, b, c) = (f[(t, 0)], f[(t, 1)], f[(t, 2)]);
            assert!(a < 10 && b < 10 && c < 10);
            assert!(a != b && b != c && a != c);
        }
        assert!(v.iter().all(|x| x.abs() <= 2.0));
    }

    #[test]
    fn fresh_vertices_are_not_shared() {
        let mut rng = StdRng::seed_from_u64(2);
        let (v, f) = draw_triangle_soup(&TriangleSoupCfg::default(), &mut rng);
        assert_eq!(v.nrows(), 300);
        assert_eq!(f[(99, 2)], 299);
    }

    #[test]
    fn replay_tokens_are_deterministic() {
        let tok = ReplayToken { seed: 5, index: 3 };
        let cfg = TriangleSoupCfg::default();
        let a = draw_triangle_soup(&cfg, &mut tok.to_std_rng());
        let b = draw_triangle_soup(&cfg, &mut tok.to_std_rng());
        assert_eq!(a, b);
        let other = ReplayToken { seed: 5, index: 4 };
        let c = draw_triangle_soup(&cfg, &mut other.to_std_rng());
        assert_ne!(a.0, c.0);
    }

    #[test]
    fn needles_satisfy_triangle_inequality() {
        let mut rng = StdRng::seed_from_u64(3);
        let l = draw_needle_lengths(50, &mut rng);
        for t in 0..50 {
            let mut row = [l[(t, 0)], l[(t, 1)], l[(t, 2)]];
            row.sort_by(|a, b| b.partial_cmp(a).unwrap());
            assert!(row[0] < row[1] + row[2]);
        }
    }
}
