//! # neardex
//!
//! k-nearest-neighbor search over an immutable set of strings.
//!
//! This library provides:
//! - Edit-distance metrics (byte and codepoint Levenshtein,
//!   Damerau-Levenshtein, trigram Jaccard)
//! - A vantage-point tree index built in parallel from a stream of strings
//! - Filtered, deadline-bounded k-NN search
//! - An HTTP API surface (`/info`, `/keys`, `/knn`, `/distance`)
//!
//! ## Example
//!
//! ```rust
//! use neardex::{MetricKind, SearchOptions, VpTree};
//!
//! let words = ["foo", "bar", "baz", "quux"].map(String::from);
//! let tree = VpTree::build(MetricKind::Levenshtein, words).unwrap();
//!
//! let nearest = tree.search("bax", &SearchOptions::new(1)).unwrap();
//! assert_eq!(nearest[0].point, "bar");
//! assert_eq!(nearest[0].distance, 1.0);
//! ```

pub mod error;
pub mod ingest;
pub mod metric;
pub mod normalize;
pub mod rng;
pub mod server;
pub mod vptree;

pub use error::{NeardexError, Result};
pub use ingest::InputFormat;
pub use metric::{Metric, MetricKind};
pub use normalize::NormalForm;
pub use vptree::{Neighbor, SearchOptions, VpTree};
