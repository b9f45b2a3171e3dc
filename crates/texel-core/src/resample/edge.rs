//! Edge policies for sample indices that fall outside the source image.

use serde::{Deserialize, Serialize};

/// How a resampling tap outside `[0, n)` is mapped back into the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    /// Repeat the border pixel.
    #[default]
    Clamp,
    /// Mirror about the border, repeating the edge pixel (`.. 1 0 | 0 1 ..`).
    Reflect,
    /// Tile periodically.
    Wrap,
    /// Treat outside pixels as transparent black; their taps are dropped.
    Zero,
}

impl Edge {
    /// Resolve index `i` against an axis of length `n`.
    ///
    /// Returns `None` only for [`Edge::Zero`] when `i` lies outside the axis,
    /// meaning the tap contributes nothing. `n` must be non-zero.
    pub fn resolve(self, i: i64, n: usize) -> Option<usize> {
        debug_assert!(n > 0, "edge resolution on an empty axis");
        let n = n as i64;
        let resolved = match self {
            Self::Clamp => i.clamp(0, n - 1),
            Self::Reflect => {
                let period = 2 * n;
                let m = i.rem_euclid(period);
                if m >= n { period - 1 - m } else { m }
            }
            Self::Wrap => i.rem_euclid(n),
            Self::Zero => {
                if !(0..n).contains(&i) {
                    return None;
                }
                i
            }
        };
        Some(resolved as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(Edge::Clamp.resolve(-3, 4), Some(0));
        assert_eq!(Edge::Clamp.resolve(2, 4), Some(2));
        assert_eq!(Edge::Clamp.resolve(9, 4), Some(3));
    }

    #[test]
    fn test_reflect_mirrors_with_edge_repeat() {
        let got: Vec<_> = (-5..9).map(|i| Edge::Reflect.resolve(i, 4).unwrap()).collect();
        assert_eq!(got, vec![3, 3, 2, 1, 0, 0, 1, 2, 3, 3, 2, 1, 0, 0]);
    }

    #[test]
    fn test_wrap() {
        assert_eq!(Edge::Wrap.resolve(-1, 4), Some(3));
        assert_eq!(Edge::Wrap.resolve(4, 4), Some(0));
        assert_eq!(Edge::Wrap.resolve(-9, 4), Some(3));
    }

    #[test]
    fn test_zero_drops_outside() {
        assert_eq!(Edge::Zero.resolve(-1, 4), None);
        assert_eq!(Edge::Zero.resolve(4, 4), None);
        assert_eq!(Edge::Zero.resolve(3, 4), Some(3));
    }

    #[test]
    fn test_single_pixel_axis() {
        for i in -3..4 {
            assert_eq!(Edge::Clamp.resolve(i, 1), Some(0));
            assert_eq!(Edge::Reflect.resolve(i, 1), Some(0));
            assert_eq!(Edge::Wrap.resolve(i, 1), Some(0));
            let zero = Edge::Zero.resolve(i, 1);
            assert_eq!(zero, if i == 0 { Some(0) } else { None });
        }
    }

    #[test]
    fn test_resolved_indices_in_range() {
        for edge in [Edge::Clamp, Edge::Reflect, Edge::Wrap, Edge::Zero] {
            for n in 1..6 {
                for i in -20..20 {
                    if let Some(r) = edge.resolve(i, n) {
                        assert!(r < n, "{edge:?} resolved {i} to {r} for n={n}");
                    }
                }
            }
        }
    }
}
