//! Distribution comparison.
//!
//! Scores the similarity of two sparse distributions (label → nonnegative
//! weight) in `[0, 1]`, where 1 means identical after normalization.
//! Both inputs are aligned over the union of their labels and each is
//! independently normalized to unit sum before the metric is applied.
//!
//! # Metrics
//!
//! - `l1`: `1 - |e - a|_1 / 2`, with a hard 0 when the actual side has no mass
//! - `l2`: `1 - |e - a|_2 / 2`, unclamped
//! - `cosine`: dot product of the unit-sum vectors
//! - `js`: `1 - JS(e, a)` in bits, clamped to `[0, 1]`
//!
//! # References
//!
//! Lin (1991), "Divergence Measures Based on the Shannon Entropy"

mod distance;
mod metric;

pub use distance::{align, compare, kl_divergence, normalize};
pub use metric::Metric;
