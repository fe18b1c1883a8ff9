//! Damerau-Levenshtein edit distance: insertions, deletions, substitutions
//! and transpositions of adjacent code points.
//!
//! Algorithm S from Lowrance and Wagner, "An Extension of the
//! String-to-String Correction Problem", JACM, 1975.

use std::collections::HashMap;

use super::levenshtein::{strip_common_prefix, strip_common_suffix};

/// Codepoint-wise Damerau-Levenshtein distance of `s` and `t`.
pub fn distance_codepoints(s: &str, t: &str) -> usize {
    let (s, t) = strip_common_prefix(s, t);
    let (s, t) = strip_common_suffix(s, t);

    let a: Vec<char> = s.chars().collect();
    let b: Vec<char> = t.chars().collect();
    let (m, n) = (a.len(), b.len());
    let inf = 1 + m + n;

    // Last seen row index (1-based) of each scalar in a; L & W's DA.
    let mut last_occ_a: HashMap<char, usize> = HashMap::new();

    let mut d = LdTable::new(m, n);
    for i in 1..=m {
        d.set(i as isize, -1, inf);
        d.set(i as isize, 0, i);
    }
    for j in 1..=n {
        d.set(-1, j as isize, inf);
        d.set(0, j as isize, j);
    }

    for i in 1..=m {
        // Last column index at which a[i-1] matched b along this row;
        // L & W's DB.
        let mut last_occ_b = 0usize;

        for j in 1..=n {
            let i1 = last_occ_a.get(&b[j - 1]).copied().unwrap_or(0);
            let j1 = last_occ_b;

            let subst_cost = if a[i - 1] == b[j - 1] {
                last_occ_b = j;
                0
            } else {
                1
            };

            let (i, j) = (i as isize, j as isize);
            let value = (d.get(i - 1, j - 1) + subst_cost)
                .min(d.get(i, j - 1) + 1)
                .min(d.get(i - 1, j) + 1)
                .min(
                    d.get(i1 as isize - 1, j1 as isize - 1)
                        + (i as usize - i1 - 1)
                        + 1
                        + (j as usize - j1 - 1),
                );
            d.set(i, j, value);
        }
        last_occ_a.insert(a[i - 1], i);
    }

    d.get(m as isize, n as isize)
}

/// DP table for Damerau-Levenshtein with indexes starting at -1.
struct LdTable {
    ncols: usize,
    data: Vec<usize>,
}

impl LdTable {
    fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            ncols: ncols + 2,
            data: vec![0; (nrows + 2) * (ncols + 2)],
        }
    }

    #[inline]
    fn get(&self, i: isize, j: isize) -> usize {
        self.data[(i + 1) as usize * self.ncols + (j + 1) as usize]
    }

    #[inline]
    fn set(&mut self, i: isize, j: isize, value: usize) {
        self.data[(i + 1) as usize * self.ncols + (j + 1) as usize] = value;
    }
}
