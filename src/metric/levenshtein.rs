//! Levenshtein edit distance for byte strings and Unicode strings.

/// Byte-wise Levenshtein distance of `a` and `b`.
pub fn distance_bytes(a: &str, b: &str) -> usize {
    let (mut a, mut b) = (a.as_bytes(), b.as_bytes());

    // Skip longest common prefix of a and b.
    while !a.is_empty() && !b.is_empty() && a[0] == b[0] {
        a = &a[1..];
        b = &b[1..];
    }

    // Skip longest common suffix of a and b.
    while !a.is_empty() && !b.is_empty() && a[a.len() - 1] == b[b.len() - 1] {
        a = &a[..a.len() - 1];
        b = &b[..b.len() - 1];
    }

    // Make sure a is the shorter string, since its length determines
    // how much memory we use.
    if a.len() > b.len() {
        std::mem::swap(&mut a, &mut b);
    }
    if a.is_empty() {
        return b.len();
    }

    // Wagner-Fischer DP with only the current row in memory.
    let mut row: Vec<usize> = (0..=a.len()).collect();
    for (j, &bc) in b.iter().enumerate() {
        row[0] = j + 1;
        let mut prev_diag = j;

        for (i, &ac) in a.iter().enumerate() {
            let old = row[i + 1];
            row[i + 1] = if bc == ac {
                prev_diag
            } else {
                1 + old.min(row[i]).min(prev_diag)
            };
            prev_diag = old;
        }
    }
    row[a.len()]
}

/// Codepoint-wise Levenshtein distance of `a` and `b`.
///
/// All comparisons and lengths are in Unicode scalar values. No
/// normalization is performed on either argument.
pub fn distance_codepoints(a: &str, b: &str) -> usize {
    let (a, b) = strip_common_prefix(a, b);
    let (a, b) = strip_common_suffix(a, b);

    // Make sure a is the shorter string, since its scalar count determines
    // how much memory we use.
    let (na, nb) = (a.chars().count(), b.chars().count());
    let (a, na, b) = if na > nb { (b, nb, a) } else { (a, na, b) };
    if na == 0 {
        return b.chars().count();
    }

    let a: Vec<char> = a.chars().collect();

    // Wagner-Fischer DP with only the current row in memory.
    let mut row: Vec<usize> = (0..=na).collect();
    for (j, bc) in b.chars().enumerate() {
        row[0] = j + 1;
        let mut prev_diag = j;

        for (i, &ac) in a.iter().enumerate() {
            let old = row[i + 1];
            row[i + 1] = if bc == ac {
                prev_diag
            } else {
                1 + old.min(row[i]).min(prev_diag)
            };
            prev_diag = old;
        }
    }
    row[na]
}

/// Strip the longest common scalar prefix from both strings.
pub(super) fn strip_common_prefix<'s>(mut a: &'s str, mut b: &'s str) -> (&'s str, &'s str) {
    loop {
        match (a.chars().next(), b.chars().next()) {
            (Some(ca), Some(cb)) if ca == cb => {
                a = &a[ca.len_utf8()..];
                b = &b[cb.len_utf8()..];
            }
            _ => return (a, b),
        }
    }
}

/// Strip the longest common scalar suffix from both strings.
pub(super) fn strip_common_suffix<'s>(mut a: &'s str, mut b: &'s str) -> (&'s str, &'s str) {
    loop {
        match (a.chars().next_back(), b.chars().next_back()) {
            (Some(ca), Some(cb)) if ca == cb => {
                a = &a[..a.len() - ca.len_utf8()];
                b = &b[..b.len() - cb.len_utf8()];
            }
            _ => return (a, b),
        }
    }
}
