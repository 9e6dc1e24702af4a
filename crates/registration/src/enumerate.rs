use itertools::Itertools;

/// Number of ordered injective mappings of `n` query indices into `m`
/// reference indices: P(m, n) = m! / (m - n)!.
///
/// Returns `Some(0)` when `n > m` and `None` on u128 overflow. This count
/// grows factorially; callers use it both to document the brute-force bound
/// and to pick between sequential and parallel scoring.
pub fn pairing_count(m: usize, n: usize) -> Option<u128> {
    if n > m {
        return Some(0);
    }
    let mut count: u128 = 1;
    for k in (m - n + 1)..=m {
        count = count.checked_mul(k as u128)?;
    }
    Some(count)
}

/// All ordered injective mappings of `0..n` into `0..m`, in lexicographic
/// order.
///
/// Candidate `i` of the stream maps query index `k` to reference index
/// `mapping[k]`. The lexicographic order is a contract: correspondence
/// search breaks residual ties by the lowest enumeration index, so the
/// order here must stay deterministic.
pub fn pairings(m: usize, n: usize) -> impl Iterator<Item = Vec<usize>> {
    (0..m).permutations(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_matches_enumeration() {
        for (m, n) in [(3, 3), (4, 3), (5, 3), (6, 4), (5, 5)] {
            let counted = pairing_count(m, n).unwrap();
            let enumerated = pairings(m, n).count() as u128;
            assert_eq!(counted, enumerated, "P({}, {})", m, n);
        }
    }

    #[test]
    fn known_counts() {
        assert_eq!(pairing_count(8, 6), Some(20_160));
        assert_eq!(pairing_count(5, 3), Some(60));
        assert_eq!(pairing_count(3, 3), Some(6));
        assert_eq!(pairing_count(2, 3), Some(0));
    }

    #[test]
    fn overflow_returns_none() {
        assert_eq!(pairing_count(200, 100), None);
    }

    #[test]
    fn mappings_are_injective() {
        for mapping in pairings(5, 3) {
            let mut seen = [false; 5];
            for &j in &mapping {
                assert!(!seen[j], "duplicate target index in {:?}", mapping);
                seen[j] = true;
            }
        }
    }

    #[test]
    fn order_is_lexicographic() {
        let all: Vec<Vec<usize>> = pairings(3, 2).collect();
        assert_eq!(
            all,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 2],
                vec![2, 0],
                vec![2, 1],
            ]
        );

        let mut sorted = all.clone();
        sorted.sort();
        assert_eq!(all, sorted);
    }

    #[test]
    fn n_greater_than_m_yields_nothing() {
        assert_eq!(pairings(2, 3).count(), 0);
    }
}
