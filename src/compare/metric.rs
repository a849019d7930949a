//! Comparison metric identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Similarity metric used to compare an area's target and derived
/// distributions.
///
/// Parsed from the identifiers `l1`, `l2`, `cosine` and `js`. Any other
/// identifier is rejected with [`Error::UnknownMetric`].
///
/// # Examples
///
/// ```
/// use u_descriptors::compare::Metric;
///
/// let metric: Metric = "js".parse().unwrap();
/// assert_eq!(metric, Metric::JensenShannon);
/// assert!("chebyshev".parse::<Metric>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Metric {
    /// Manhattan distance, mapped to `1 - d / 2`.
    #[default]
    L1,
    /// Euclidean distance, mapped to `1 - d / 2`.
    L2,
    /// Dot product of the unit-sum vectors.
    Cosine,
    /// One minus the Jensen-Shannon divergence (base 2).
    JensenShannon,
}

impl Metric {
    /// All supported metrics.
    pub const ALL: [Metric; 4] = [
        Metric::L1,
        Metric::L2,
        Metric::Cosine,
        Metric::JensenShannon,
    ];

    /// The identifier this metric is parsed from.
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::L1 => "l1",
            Metric::L2 => "l2",
            Metric::Cosine => "cosine",
            Metric::JensenShannon => "js",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "l1" => Ok(Metric::L1),
            "l2" => Ok(Metric::L2),
            "cosine" => Ok(Metric::Cosine),
            "js" => Ok(Metric::JensenShannon),
            other => Err(Error::UnknownMetric(other.to_string())),
        }
    }
}

impl TryFrom<String> for Metric {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Metric> for String {
    fn from(metric: Metric) -> Self {
        metric.as_str().to_string()
    }
}
