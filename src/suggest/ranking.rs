//! Candidate ordering shared by every lookup path.

use std::cmp::Reverse;

use crate::suggest::dictionary::StoredEntry;

/// Select the top `limit` candidate ordinals by weight descending.
///
/// Ordinals are deduplicated and pre-sorted ascending, which is ascending
/// normalized-key order by construction of the dictionary table; the stable
/// sort therefore breaks equal weights lexicographically.
pub fn top_by_weight(mut ords: Vec<u64>, entries: &[StoredEntry], limit: usize) -> Vec<u64> {
    ords.sort_unstable();
    ords.dedup();
    ords.sort_by_key(|&ord| Reverse(entries[ord as usize].weight));
    ords.truncate(limit);
    ords
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(weights: &[i64]) -> Vec<StoredEntry> {
        weights
            .iter()
            .enumerate()
            .map(|(i, &w)| StoredEntry {
                text: format!("e{i}"),
                weight: w,
                payload: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn test_weight_descending() {
        let table = entries(&[5, 10, 15]);
        assert_eq!(top_by_weight(vec![0, 1, 2], &table, 5), [2, 1, 0]);
    }

    #[test]
    fn test_limit_truncates() {
        let table = entries(&[5, 10, 15]);
        assert_eq!(top_by_weight(vec![0, 1, 2], &table, 2), [2, 1]);
    }

    #[test]
    fn test_ties_break_by_key_order() {
        let table = entries(&[7, 7, 7]);
        // Unordered, duplicated input still comes out in table order.
        assert_eq!(top_by_weight(vec![2, 0, 1, 0], &table, 5), [0, 1, 2]);
    }
}
