//! Prefix edit distance over characters, with an optional transposition
//! edit.
//!
//! Distances are computed over `char`s, not bytes, so multi-byte text is
//! handled correctly. Transpositions use the optimal string alignment
//! variant: a swap of two adjacent characters counts as a single edit.

/// Minimum edit distance between `query` and any prefix of `target`.
///
/// This is the admission test for fuzzy completion: the partially typed
/// query only has to be close to the *beginning* of a candidate token, so
/// the answer is the minimum over the final row of the distance matrix.
pub fn prefix_edit_distance(query: &str, target: &str, transpositions: bool) -> usize {
    let q: Vec<char> = query.chars().collect();
    let t: Vec<char> = target.chars().collect();
    let n = q.len();
    let m = t.len();
    let mut d = vec![vec![0usize; m + 1]; n + 1];
    for (i, row) in d.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=m {
        d[0][j] = j;
    }
    for i in 1..=n {
        for j in 1..=m {
            let cost = if q[i - 1] == t[j - 1] { 0 } else { 1 };
            let mut best = (d[i - 1][j] + 1).min(d[i][j - 1] + 1).min(d[i - 1][j - 1] + cost);
            if transpositions && i > 1 && j > 1 && q[i - 1] == t[j - 2] && q[i - 2] == t[j - 1] {
                best = best.min(d[i - 2][j - 2] + 1);
            }
            d[i][j] = best;
        }
    }
    d[n].iter().copied().min().unwrap_or(n)
}
