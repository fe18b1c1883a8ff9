//! String distance metrics.
//!
//! All metrics are total functions to a non-negative finite value and
//! satisfy identity, symmetry and the triangle inequality; the tree's
//! branch pruning is only correct under those properties.

pub mod damerau;
pub mod levenshtein;
pub mod trigram;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NeardexError, Result};

/// A string distance function, the seam the index builds and searches
/// through. Implementations must be pure: no shared mutable state, no
/// failures.
pub trait Metric: Send + Sync {
    fn distance(&self, a: &str, b: &str) -> f64;
}

impl<F> Metric for F
where
    F: Fn(&str, &str) -> f64 + Send + Sync,
{
    fn distance(&self, a: &str, b: &str) -> f64 {
        self(a, b)
    }
}

/// The built-in, name-addressable metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Codepoint-wise Levenshtein distance.
    Levenshtein,
    /// Byte-wise Levenshtein distance.
    LevenshteinBytes,
    /// Codepoint-wise Damerau-Levenshtein distance.
    DamerauLevenshtein,
    /// Jaccard distance over character trigram sets.
    JaccardTrigrams,
}

impl MetricKind {
    /// The wire name of this metric, as accepted by `--metric` and
    /// reported by `/info`.
    pub fn name(&self) -> &'static str {
        match self {
            MetricKind::Levenshtein => "levenshtein",
            MetricKind::LevenshteinBytes => "levenshtein_bytes",
            MetricKind::DamerauLevenshtein => "damerau_levenshtein",
            MetricKind::JaccardTrigrams => "jaccard_trigrams",
        }
    }
}

impl FromStr for MetricKind {
    type Err = NeardexError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "levenshtein" => Ok(MetricKind::Levenshtein),
            "levenshtein_bytes" => Ok(MetricKind::LevenshteinBytes),
            "damerau_levenshtein" => Ok(MetricKind::DamerauLevenshtein),
            "jaccard_trigrams" => Ok(MetricKind::JaccardTrigrams),
            _ => Err(NeardexError::UnknownMetric(s.to_string())),
        }
    }
}

impl Metric for MetricKind {
    fn distance(&self, a: &str, b: &str) -> f64 {
        match self {
            MetricKind::Levenshtein => levenshtein::distance_codepoints(a, b) as f64,
            MetricKind::LevenshteinBytes => levenshtein::distance_bytes(a, b) as f64,
            MetricKind::DamerauLevenshtein => damerau::distance_codepoints(a, b) as f64,
            MetricKind::JaccardTrigrams => trigram::jaccard_distance(a, b),
        }
    }
}
