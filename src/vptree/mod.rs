//! Vantage-point tree: a spatial index over an immutable set of strings.
//!
//! The tree is built once from a finite sequence of strings and a metric,
//! then shared read-only across any number of concurrent searches.

mod build;
mod search;

pub use search::{Neighbor, SearchOptions};

use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::metric::Metric;

/// One node of the tree. `radius` is the median distance from `center` to
/// the points routed into `inside`; leaves carry a NaN radius.
pub(crate) struct Node {
    pub(crate) center: String,
    pub(crate) radius: f64,
    pub(crate) inside: Option<Box<Node>>,
    pub(crate) outside: Option<Box<Node>>,
}

impl Node {
    pub(crate) fn leaf(center: String) -> Box<Node> {
        Box::new(Node {
            center,
            radius: f64::NAN,
            inside: None,
            outside: None,
        })
    }
}

/// An immutable vantage-point tree over strings, with metric `M`.
pub struct VpTree<M> {
    metric: M,
    root: Option<Box<Node>>,
    len: usize,
}

impl<M: Metric> VpTree<M> {
    /// Build a tree from `points` with a random seed.
    ///
    /// Duplicate points are kept and remain individually searchable.
    pub fn build(metric: M, points: impl IntoIterator<Item = String>) -> Result<Self> {
        Self::build_with(metric, points, rand::random(), &CancellationToken::new())
    }

    /// Build a tree from `points` with an explicit seed and cancellation
    /// token.
    ///
    /// `points` is always consumed to completion, even when `cancel` fires
    /// mid-build; cancellation is reported as [`NeardexError::Canceled`].
    ///
    /// [`NeardexError::Canceled`]: crate::error::NeardexError::Canceled
    pub fn build_with(
        metric: M,
        points: impl IntoIterator<Item = String>,
        seed: u64,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        build::build_tree(metric, points, seed, cancel)
    }

    /// The number of indexed strings.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The metric the tree was built with.
    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Iterate over every indexed string, in unspecified order.
    pub fn iter(&self) -> Keys<'_> {
        Keys {
            stack: self.root.as_deref().into_iter().collect(),
        }
    }

    pub(crate) fn from_parts(metric: M, root: Option<Box<Node>>, len: usize) -> Self {
        Self { metric, root, len }
    }

    pub(crate) fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }
}

/// Iterator over the indexed strings; see [`VpTree::iter`].
pub struct Keys<'t> {
    stack: Vec<&'t Node>,
}

impl<'t> Iterator for Keys<'t> {
    type Item = &'t str;

    fn next(&mut self) -> Option<&'t str> {
        let node = self.stack.pop()?;
        if let Some(inside) = node.inside.as_deref() {
            self.stack.push(inside);
        }
        if let Some(outside) = node.outside.as_deref() {
            self.stack.push(outside);
        }
        Some(&node.center)
    }
}
