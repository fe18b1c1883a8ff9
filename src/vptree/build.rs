//! Parallel construction of the vantage-point tree.
//!
//! Each non-trivial node selects its vantage point by sampling: of ~√N
//! shuffled candidates, the one whose distances to a disjoint window of
//! other points show the greatest mean absolute deviation wins. The
//! remaining points are partitioned at the median distance (quickselect)
//! and the two halves recurse on separate Rayon tasks, each with its own
//! PRNG substream.

use tokio_util::sync::CancellationToken;

use super::{Node, VpTree};
use crate::error::{NeardexError, Result};
use crate::metric::Metric;
use crate::rng::Xoroshiro128;

pub(super) fn build_tree<M: Metric>(
    metric: M,
    points: impl IntoIterator<Item = String>,
    seed: u64,
    cancel: &CancellationToken,
) -> Result<VpTree<M>> {
    let mut iter = points.into_iter();
    let mut points = Vec::new();

    loop {
        if cancel.is_cancelled() {
            // Drain the sequence as promised before reporting cancellation.
            for _ in iter.by_ref() {}
            return Err(NeardexError::Canceled);
        }
        match iter.next() {
            Some(p) => points.push(PointDist { point: p, dist: 0.0 }),
            None => break,
        }
    }

    let len = points.len();
    let builder = Builder {
        metric: &metric,
        cancel,
        rng: Xoroshiro128::seed(seed),
        points,
    };
    let root = builder.build();

    if cancel.is_cancelled() {
        return Err(NeardexError::Canceled);
    }
    Ok(VpTree::from_parts(metric, root, len))
}

/// A point together with scratch space for its distance to the current
/// vantage candidate.
struct PointDist {
    point: String,
    dist: f64,
}

struct Builder<'b, M> {
    metric: &'b M,
    cancel: &'b CancellationToken,
    rng: Xoroshiro128,
    points: Vec<PointDist>,
}

impl<M: Metric> Builder<'_, M> {
    fn build(mut self) -> Option<Box<Node>> {
        if self.cancel.is_cancelled() {
            // The result is discarded; build_tree reports the cancellation.
            return None;
        }

        match self.points.len() {
            0 => return None,
            1 => {
                let p = self.points.pop()?;
                return Some(Node::leaf(p.point));
            }
            2 => return Some(self.build2()),
            3 => return Some(self.build3()),
            _ => {}
        }

        let vantage = self.select_vantage();
        for pd in &mut self.points {
            pd.dist = self.metric.distance(&vantage, &pd.point);
        }
        let median_idx = self.select_median();
        let median_dist = self.points[median_idx].dist;

        // Points before the median index have distance <= the median and go
        // inside; the median itself and everything after it go outside.
        let outside_points = self.points.split_off(median_idx);
        let mut outside_rng = self.rng.clone();
        outside_rng.jump();

        let inside_builder = Builder {
            metric: self.metric,
            cancel: self.cancel,
            rng: self.rng,
            points: self.points,
        };
        let outside_builder = Builder {
            metric: self.metric,
            cancel: self.cancel,
            rng: outside_rng,
            points: outside_points,
        };

        let (inside, outside) = rayon::join(|| inside_builder.build(), || outside_builder.build());

        Some(Box::new(Node {
            center: vantage,
            radius: median_dist,
            inside,
            outside,
        }))
    }

    /// Base case with two points.
    fn build2(mut self) -> Box<Node> {
        let other = self.points.pop().expect("two points").point;
        let vantage = self.points.pop().expect("two points").point;
        let radius = self.metric.distance(&vantage, &other);

        Box::new(Node {
            center: vantage,
            radius,
            inside: Some(Node::leaf(other)),
            outside: None,
        })
    }

    /// Base case with three points: the root is the point whose distances
    /// to the other two have the greatest spread; the closer of the other
    /// two goes inside, the farther outside.
    fn build3(mut self) -> Box<Node> {
        let d01 = self.metric.distance(&self.points[0].point, &self.points[1].point);
        let d02 = self.metric.distance(&self.points[0].point, &self.points[2].point);
        let d12 = self.metric.distance(&self.points[1].point, &self.points[2].point);

        let spread = |x: f64, y: f64| {
            let mean = 0.5 * (x + y);
            (x - mean).abs() + (y - mean).abs()
        };

        let mut best = 0;
        let mut best_spread = spread(d01, d02);
        if spread(d01, d12) > best_spread {
            (best, best_spread) = (1, spread(d01, d12));
        }
        if spread(d02, d12) > best_spread {
            best = 2;
        }

        // Record distances to the chosen root and move it to index 0.
        match best {
            0 => {
                self.points[1].dist = d01;
                self.points[2].dist = d02;
            }
            1 => {
                self.points[0].dist = d01;
                self.points[2].dist = d12;
                self.points.swap(0, 1);
            }
            _ => {
                self.points[0].dist = d02;
                self.points[1].dist = d12;
                self.points.swap(0, 2);
            }
        }
        if self.points[1].dist > self.points[2].dist {
            self.points.swap(1, 2);
        }

        let outside = self.points.pop().expect("three points");
        let inside = self.points.pop().expect("three points");
        let center = self.points.pop().expect("three points");

        Box::new(Node {
            center: center.point,
            radius: inside.dist,
            inside: Some(Node::leaf(inside.point)),
            outside: Some(Node::leaf(outside.point)),
        })
    }

    /// Select, remove and return a vantage point. Assumes more than three
    /// points.
    fn select_vantage(&mut self) -> String {
        // The first ~sqrt(N) shuffled points are the candidates; each is
        // scored against its own disjoint window of the remaining points,
        // keeping the total number of distance evaluations linear.
        let n = self.points.len();
        let n_candidates = (n as f64).sqrt() as usize;
        self.rng.shuffle(&mut self.points);

        let metric = self.metric;
        let (candidates, rest) = self.points.split_at_mut(n_candidates);
        let window = (rest.len() as f64).sqrt() as usize;

        let mut best = 0;
        let mut best_spread = f64::NEG_INFINITY;

        for (i, candidate) in candidates.iter().enumerate().take(window) {
            let sample = &mut rest[i * window..(i + 1) * window];
            for pd in sample.iter_mut() {
                pd.dist = metric.distance(&candidate.point, &pd.point);
            }

            let mean = sample.iter().map(|pd| pd.dist).sum::<f64>() / sample.len() as f64;
            let spread =
                sample.iter().map(|pd| (pd.dist - mean).abs()).sum::<f64>() / sample.len() as f64;
            if spread > best_spread {
                (best, best_spread) = (i, spread);
            }
        }

        self.points.swap(best, 0);
        self.points.swap_remove(0).point
    }

    /// Quickselect for the median distance. The points were shuffled by
    /// `select_vantage`, so the last-element pivot has adequate expected
    /// performance.
    fn select_median(&mut self) -> usize {
        let median = self.points.len() / 2;
        let (mut lo, mut hi) = (0, self.points.len() - 1);

        while hi > lo {
            let pivot = self.partition(lo, hi);
            match median.cmp(&pivot) {
                std::cmp::Ordering::Equal => break,
                std::cmp::Ordering::Less => hi = pivot - 1,
                std::cmp::Ordering::Greater => lo = pivot + 1,
            }
        }
        median
    }

    /// Lomuto partition of `points[lo..=hi]` around the distance at `hi`;
    /// returns the pivot's final index.
    fn partition(&mut self, lo: usize, hi: usize) -> usize {
        let pivot = self.points[hi].dist;

        let mut i = lo;
        for j in lo..hi {
            if self.points[j].dist <= pivot {
                self.points.swap(i, j);
                i += 1;
            }
        }
        self.points.swap(i, hi);
        i
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::MetricKind;

    fn words(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("word-{i}-{}", i * 37 % 101)).collect()
    }

    #[test]
    fn test_len_matches_input() {
        for n in [0, 1, 2, 3, 4, 5, 6, 100] {
            let tree = VpTree::build(MetricKind::Levenshtein, words(n)).unwrap();
            assert_eq!(tree.len(), n);
            assert_eq!(tree.iter().count(), n);
        }
    }

    #[test]
    fn test_traversal_recovers_multiset() {
        let mut input = words(50);
        input.extend(words(10)); // duplicates are kept
        let tree = VpTree::build(MetricKind::Levenshtein, input.clone()).unwrap();

        let mut seen: Vec<String> = tree.iter().map(str::to_string).collect();
        seen.sort();
        input.sort();
        assert_eq!(seen, input);
    }

    #[test]
    fn test_node_invariants() {
        let tree = VpTree::build(MetricKind::Levenshtein, words(200)).unwrap();
        if let Some(root) = tree.root() {
            check_node(&MetricKind::Levenshtein, root);
        }
    }

    fn check_node(metric: &MetricKind, node: &Node) {
        match (&node.inside, &node.outside) {
            (None, None) => assert!(node.radius.is_nan(), "leaves carry NaN radius"),
            (inside, outside) => {
                if let Some(inside) = inside {
                    for_each_key(inside, &mut |key| {
                        assert!(
                            metric.distance(&node.center, key) <= node.radius,
                            "inside point {key:?} beyond radius of {:?}",
                            node.center
                        );
                    });
                    check_node(metric, inside);
                }
                if let Some(outside) = outside {
                    for_each_key(outside, &mut |key| {
                        assert!(
                            metric.distance(&node.center, key) >= node.radius,
                            "outside point {key:?} within radius of {:?}",
                            node.center
                        );
                    });
                    check_node(metric, outside);
                }
            }
        }
    }

    fn for_each_key(node: &Node, f: &mut impl FnMut(&str)) {
        f(&node.center);
        if let Some(inside) = &node.inside {
            for_each_key(inside, f);
        }
        if let Some(outside) = &node.outside {
            for_each_key(outside, f);
        }
    }

    #[test]
    fn test_deterministic_given_seed() {
        let cancel = CancellationToken::new();
        let a = VpTree::build_with(MetricKind::Levenshtein, words(300), 42, &cancel).unwrap();
        let b = VpTree::build_with(MetricKind::Levenshtein, words(300), 42, &cancel).unwrap();

        let keys_a: Vec<String> = a.iter().map(str::to_string).collect();
        let keys_b: Vec<String> = b.iter().map(str::to_string).collect();
        assert_eq!(keys_a, keys_b, "same seed, same tree shape");
    }

    #[test]
    fn test_cancellation_drains_input() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let pulled = Arc::new(AtomicUsize::new(0));
        let counter = pulled.clone();
        let input = words(100).into_iter().inspect(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = VpTree::build_with(MetricKind::Levenshtein, input, 1, &cancel);

        assert!(matches!(result, Err(NeardexError::Canceled)));
        assert_eq!(pulled.load(Ordering::Relaxed), 100, "input must be drained");
    }

    #[test]
    fn test_empty_input() {
        let tree = VpTree::build(MetricKind::Levenshtein, Vec::new()).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.iter().count(), 0);
    }
}
