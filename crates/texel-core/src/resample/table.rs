//! Per-axis weight tables.
//!
//! # Algorithm
//! For output coordinate `o` on an axis resized from `src` to `dst` samples:
//! ```text
//! center = (o + 0.5) * src / dst - 0.5
//! scale  = max(1, src / dst)          // widen the kernel when minifying
//! taps   = i in [ceil(center - r*scale), floor(center + r*scale)]
//! w_i    = kernel((i - center) / scale) / Σ kernel(..)
//! ```
//! Normalization happens before edge resolution, so taps dropped by
//! [`Edge::Zero`] usually leave the row summing to less than one. When a
//! dropped tap carried negative weight (cubic lobes) the kept taps are
//! rescaled to sum to exactly one, so the Zero policy never brightens.

use super::edge::Edge;
use super::kernel::Filter;

/// Raw weight sums below this are treated as degenerate. Every shipped
/// kernel is a partition of unity over its support, so this only guards
/// against float cancellation.
const MIN_WEIGHT_SUM: f32 = 1e-8;

/// One source contribution to an output sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    /// Resolved source index along the axis.
    pub index: usize,
    /// Normalized weight.
    pub weight: f32,
}

/// Taps for every output coordinate along one axis, stored contiguously.
#[derive(Debug, Clone)]
pub struct WeightTable {
    taps: Vec<Tap>,
    /// `offsets[o]..offsets[o + 1]` indexes the taps of output `o`.
    offsets: Vec<usize>,
}

impl WeightTable {
    /// Build the table for an axis of `src` samples resized to `dst`.
    ///
    /// Both lengths must be non-zero. Equal lengths produce one unit tap per
    /// output so a same-size resize is an exact copy for every kernel.
    pub fn new(src: usize, dst: usize, filter: Filter, edge: Edge) -> Self {
        debug_assert!(src > 0 && dst > 0, "weight table for an empty axis");

        let mut taps = Vec::new();
        let mut offsets = Vec::with_capacity(dst + 1);
        offsets.push(0);

        if src == dst {
            taps.extend((0..dst).map(|index| Tap { index, weight: 1.0 }));
            offsets.extend(1..=dst);
            return Self { taps, offsets };
        }

        let ratio = src as f64 / dst as f64;
        let scale = ratio.max(1.0);
        let support = filter.radius() as f64 * scale;
        let mut raw: Vec<(i64, f32)> = Vec::new();

        for out in 0..dst {
            let center = (out as f64 + 0.5) * ratio - 0.5;
            let first = (center - support).ceil() as i64;
            let last = (center + support).floor() as i64;

            raw.clear();
            let mut total = 0.0_f32;
            for i in first..=last {
                let w = filter.weight(((i as f64 - center) / scale) as f32);
                if w != 0.0 {
                    raw.push((i, w));
                    total += w;
                }
            }

            push_row(&mut taps, &raw, total, center, src, edge);
            offsets.push(taps.len());
        }

        Self { taps, offsets }
    }

    /// Number of output coordinates.
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// True when the table has no output coordinates.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Taps contributing to output coordinate `out`.
    pub fn taps(&self, out: usize) -> &[Tap] {
        &self.taps[self.offsets[out]..self.offsets[out + 1]]
    }

    /// Sum of weights for output coordinate `out`.
    pub fn weight_sum(&self, out: usize) -> f32 {
        self.taps(out).iter().map(|t| t.weight).sum()
    }

    /// Widest tap list across all outputs.
    pub fn max_support(&self) -> usize {
        self.offsets.windows(2).map(|w| w[1] - w[0]).max().unwrap_or(0)
    }
}

/// Normalize one row of raw `(index, weight)` samples and append its
/// resolved taps.
fn push_row(
    taps: &mut Vec<Tap>,
    raw: &[(i64, f32)],
    total: f32,
    center: f64,
    src: usize,
    edge: Edge,
) {
    if total.abs() < MIN_WEIGHT_SUM {
        // Fall back to the nearest source sample.
        let nearest = center.round() as i64;
        let index = Edge::Clamp.resolve(nearest, src).unwrap_or(0);
        taps.push(Tap { index, weight: 1.0 });
        return;
    }

    let start = taps.len();
    for &(i, w) in raw {
        if let Some(index) = edge.resolve(i, src) {
            taps.push(Tap { index, weight: w / total });
        }
    }
    let kept: f32 = taps[start..].iter().map(|t| t.weight).sum();
    if kept > 1.0 {
        for tap in &mut taps[start..] {
            tap.weight /= kept;
        }
    }
}
