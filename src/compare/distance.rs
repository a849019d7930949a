//! Distribution alignment, normalization and similarity metrics.

use std::collections::BTreeMap;

use super::metric::Metric;

/// Normalizes a nonnegative vector to unit sum.
///
/// A vector with zero total mass normalizes to all zeros.
///
/// # Examples
///
/// ```
/// use u_descriptors::compare::normalize;
///
/// assert_eq!(normalize(&[1.0, 3.0]), vec![0.25, 0.75]);
/// assert_eq!(normalize(&[0.0, 0.0]), vec![0.0, 0.0]);
/// ```
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let sum: f64 = values.iter().sum();
    if sum == 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|x| x / sum).collect()
}

/// Aligns two sparse distributions over the union of their labels.
///
/// Returns the labels in sorted order together with one dense vector per
/// input; a label missing from one side contributes 0.0 there.
pub fn align(
    expected: &BTreeMap<String, f64>,
    actual: &BTreeMap<String, f64>,
) -> (Vec<String>, Vec<f64>, Vec<f64>) {
    let mut labels: Vec<String> = expected.keys().chain(actual.keys()).cloned().collect();
    labels.sort();
    labels.dedup();

    let e = labels
        .iter()
        .map(|k| expected.get(k).copied().unwrap_or(0.0))
        .collect();
    let a = labels
        .iter()
        .map(|k| actual.get(k).copied().unwrap_or(0.0))
        .collect();
    (labels, e, a)
}

/// Kullback-Leibler divergence `KL(p, q) = Σ p_i log2(p_i / q_i)`.
///
/// Only indices where both `p_i > 0` and `q_i > 0` contribute. Note that
/// KL is asymmetric: `KL(p, q) != KL(q, p)` in general.
pub fn kl_divergence(p: &[f64], q: &[f64]) -> f64 {
    p.iter()
        .zip(q)
        .filter(|&(&pi, &qi)| pi > 0.0 && qi > 0.0)
        .map(|(&pi, &qi)| pi * (pi / qi).log2())
        .sum()
}

/// Scores the similarity of `actual` against `expected` under `metric`.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use u_descriptors::compare::{compare, Metric};
///
/// let expected = BTreeMap::from([("A".to_string(), 0.5), ("B".to_string(), 0.5)]);
/// let actual = BTreeMap::from([("A".to_string(), 1.0)]);
/// assert!((compare(&expected, &actual, Metric::L1) - 0.5).abs() < 1e-12);
/// ```
pub fn compare(
    expected: &BTreeMap<String, f64>,
    actual: &BTreeMap<String, f64>,
    metric: Metric,
) -> f64 {
    let (_, e, a) = align(expected, actual);
    let e = normalize(&e);
    let a = normalize(&a);

    match metric {
        Metric::L1 => {
            let expected_empty = e.iter().all(|&x| x == 0.0);
            let actual_empty = a.iter().all(|&x| x == 0.0);
            if actual_empty && !expected_empty {
                return 0.0;
            }
            let dist: f64 = e.iter().zip(&a).map(|(x, y)| (x - y).abs()).sum();
            1.0 - dist / 2.0
        }
        Metric::L2 => {
            let dist = e
                .iter()
                .zip(&a)
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f64>()
                .sqrt();
            1.0 - dist / 2.0
        }
        // Unit-sum rather than unit-length vectors: this is the plain dot product.
        Metric::Cosine => e.iter().zip(&a).map(|(x, y)| x * y).sum(),
        Metric::JensenShannon => {
            let m: Vec<f64> = e.iter().zip(&a).map(|(x, y)| (x + y) / 2.0).collect();
            let js = (kl_divergence(&e, &m) + kl_divergence(&a, &m)) / 2.0;
            (1.0 - js).clamp(0.0, 1.0)
        }
    }
}
