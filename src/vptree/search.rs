//! Pruning k-nearest-neighbor search over the tree.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use super::{Node, VpTree};
use crate::error::{NeardexError, Result};
use crate::metric::Metric;

/// One search result: an indexed string and its distance to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub point: String,
    pub distance: f64,
}

/// Parameters of one k-NN search.
pub struct SearchOptions<'s> {
    /// Maximum number of results.
    pub k: usize,
    /// Cutoff radius: candidates farther than this are discarded.
    pub max_dist: f64,
    /// Optional filter, evaluated against the stored strings.
    pub predicate: Option<&'s (dyn Fn(&str) -> bool + Sync)>,
    /// Abort with a timeout error once this instant passes.
    pub deadline: Option<Instant>,
    /// Abort with a cancellation error once this token fires.
    pub cancel: Option<&'s CancellationToken>,
}

impl SearchOptions<'_> {
    /// Unbounded, unfiltered search for the `k` nearest neighbors.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_dist: f64::INFINITY,
            predicate: None,
            deadline: None,
            cancel: None,
        }
    }
}

impl<M: Metric> VpTree<M> {
    /// Find the `opts.k` indexed strings nearest to `query`, after
    /// discarding all strings farther than `opts.max_dist` and all strings
    /// rejected by the predicate.
    ///
    /// Results are sorted by ascending distance, ties broken by string, so
    /// the nearest neighbor is at index 0.
    pub fn search(&self, query: &str, opts: &SearchOptions<'_>) -> Result<Vec<Neighbor>> {
        let mut searcher = Searcher {
            metric: &self.metric,
            query,
            k: opts.k,
            radius: opts.max_dist,
            predicate: opts.predicate,
            deadline: opts.deadline,
            cancel: opts.cancel,
            found: BinaryHeap::with_capacity(opts.k.min(self.len()) + 1),
        };

        if let Some(root) = self.root() {
            searcher.visit(root)?;
        }

        Ok(searcher
            .found
            .into_sorted_vec()
            .into_iter()
            .map(|c| Neighbor {
                point: c.point.to_string(),
                distance: c.distance,
            })
            .collect())
    }
}

/// Candidate result: a max-heap entry keyed by distance, ties broken by
/// string so that equal-distance pops are deterministic.
struct Candidate<'t> {
    distance: f64,
    point: &'t str,
}

impl PartialEq for Candidate<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate<'_> {}

impl PartialOrd for Candidate<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .partial_cmp(&other.distance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.point.cmp(other.point))
    }
}

struct Searcher<'s, 't, M> {
    metric: &'t M,
    query: &'s str,
    k: usize,
    radius: f64,
    predicate: Option<&'s (dyn Fn(&str) -> bool + Sync)>,
    deadline: Option<Instant>,
    cancel: Option<&'s CancellationToken>,
    found: BinaryHeap<Candidate<'t>>,
}

impl<'t, M: Metric> Searcher<'_, 't, M> {
    fn visit(&mut self, node: &'t Node) -> Result<()> {
        if let Some(cancel) = self.cancel {
            if cancel.is_cancelled() {
                return Err(NeardexError::Canceled);
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(NeardexError::Timeout);
            }
        }

        let d = self.metric.distance(self.query, &node.center);
        if self.k > 0
            && d <= self.radius
            && self.predicate.map_or(true, |pred| pred(&node.center))
        {
            self.found.push(Candidate {
                distance: d,
                point: &node.center,
            });
            if self.found.len() > self.k {
                self.found.pop();
            }
            if self.found.len() == self.k {
                if let Some(worst) = self.found.peek() {
                    self.radius = worst.distance;
                }
            }
        }

        // Both comparisons against a leaf's NaN radius are false, so leaves
        // descend nowhere.
        if d < node.radius {
            if let Some(inside) = node.inside.as_deref() {
                self.visit(inside)?;
            }
            if d + self.radius >= node.radius {
                if let Some(outside) = node.outside.as_deref() {
                    self.visit(outside)?;
                }
            }
        } else {
            if let Some(outside) = node.outside.as_deref() {
                self.visit(outside)?;
            }
            if d - self.radius <= node.radius {
                if let Some(inside) = node.inside.as_deref() {
                    self.visit(inside)?;
                }
            }
        }

        Ok(())
    }
}
