//! Jaccard distance over sets of packed character trigrams.
//!
//! A trigram of Unicode scalars fits in a single 64-bit integer: valid
//! scalars need only 21 bits, leaving room for two sentinel values above
//! `char::MAX`.

use std::cell::RefCell;
use std::collections::HashSet;

/// Padding scalar for windows that run past the end of the string.
const PAD: u32 = char::MAX as u32 + 1;
/// "No scalar seen yet" marker; never packed into a trigram.
const INVALID: u32 = char::MAX as u32 + 2;

/// Three Unicode scalars in 21-bit fields, high to low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Trigram(u64);

impl Trigram {
    #[inline]
    fn pack(r0: u32, r1: u32, r2: u32) -> Self {
        Trigram((r0 as u64) << 42 | (r1 as u64) << 21 | r2 as u64)
    }
}

/// Jaccard distance `1 - |A∩B| / |A∪B|` between the trigram sets of `x`
/// and `y`. Two empty strings are at distance 0.
pub fn jaccard_distance(x: &str, y: &str) -> f64 {
    let mut a = rent_set();
    let mut b = rent_set();
    fill_set(&mut a, x);
    fill_set(&mut b, y);

    let d = jaccard(&a, &b);

    return_set(a);
    return_set(b);
    d
}

fn jaccard(a: &HashSet<Trigram>, b: &HashSet<Trigram>) -> f64 {
    // Loop over the smaller of a and b.
    let (small, large) = if a.len() > b.len() { (b, a) } else { (a, b) };

    let intersection = small.iter().filter(|t| large.contains(t)).count();
    let union = (a.len() + b.len() - intersection) as f64;
    if union == 0.0 {
        return 0.0;
    }

    (union - intersection as f64) / union
}

/// Collect all unigrams, bigrams and trigrams of `s` into `set`.
fn fill_set(set: &mut HashSet<Trigram>, s: &str) {
    let (mut r0, mut r1) = (INVALID, INVALID);

    for c in s.chars() {
        let r2 = c as u32;
        if r0 != INVALID && r1 != INVALID {
            set.insert(Trigram::pack(r0, r1, r2));
        }
        if r1 != INVALID {
            set.insert(Trigram::pack(r1, r2, PAD));
        }
        set.insert(Trigram::pack(r2, PAD, PAD));
        (r0, r1) = (r1, r2);
    }
}

// Per-thread pool of set storage, rented for the duration of one distance
// call.
thread_local! {
    static SET_POOL: RefCell<Vec<HashSet<Trigram>>> = const { RefCell::new(Vec::new()) };
}

fn rent_set() -> HashSet<Trigram> {
    SET_POOL
        .with(|pool| pool.borrow_mut().pop())
        .unwrap_or_default()
}

fn return_set(mut set: HashSet<Trigram>) {
    set.clear();
    SET_POOL.with(|pool| pool.borrow_mut().push(set));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_literal_cases() {
        for (a, b, dist) in [
            ("", "foo", 1.0),
            ("bar", "bard", 1.0 / 3.0),
            ("bar", "br", 0.7142857142857143),
            ("bar", "foobar", 0.5714285714285714),
            ("foobar", "quux", 1.0),
            ("kitten", "sitting", 0.75),
            ("naïve", "naive", 0.6666666666666666),
            ("naïve", "nai\u{0308}ve", 0.7142857142857143),
            ("prefixAAsuffix", "prefixBsuffix", 0.3783783783783784),
        ] {
            let d = jaccard_distance(a, b);
            assert_relative_eq!(d, dist, epsilon = 1e-14);

            // Symmetry.
            assert_relative_eq!(jaccard_distance(b, a), d, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_identity() {
        for s in ["", "a", "ab", "kitten", "naïve", "€500"] {
            assert_eq!(jaccard_distance(s, s), 0.0, "d({s:?}, {s:?})");
        }
    }

    #[test]
    fn test_both_empty() {
        assert_eq!(jaccard_distance("", ""), 0.0);
    }

    #[test]
    fn test_gram_counts() {
        // "bar" yields 3 unigrams, 2 bigrams and 1 trigram.
        let mut set = HashSet::new();
        fill_set(&mut set, "bar");
        assert_eq!(set.len(), 6);

        // The empty string yields the empty set.
        set.clear();
        fill_set(&mut set, "");
        assert!(set.is_empty());
    }

    #[test]
    fn test_pad_never_collides_with_real_scalar() {
        // A one-char string and a three-char string sharing that char must
        // not produce identical trigrams through padding.
        let mut a = HashSet::new();
        let mut b = HashSet::new();
        fill_set(&mut a, "a");
        fill_set(&mut b, "aaa");
        assert!(a.is_subset(&b));
        assert!(b.len() > a.len());
    }
}
