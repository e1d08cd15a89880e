use std::collections::HashSet;

use kinrec_map::{PowerTiers, ScoreMatrix, off_by_power_similarity, relative_closeness, solve_matrix};
use proptest::prelude::*;

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(128),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn arb_matrix(max: usize) -> impl Strategy<Value = ScoreMatrix> {
    (0..max, 0..max).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(0.0..10.0_f64, rows * cols)
            .prop_map(move |scores| ScoreMatrix::from_fn(rows, cols, |r, c| scores[r * cols + c]))
    })
}

/// Best total over every permutation of the padded square matrix.
fn brute_force_best(matrix: &ScoreMatrix) -> f64 {
    fn search(matrix: &ScoreMatrix, row: usize, k: usize, used: &mut [bool]) -> f64 {
        if row == k {
            return 0.0;
        }
        let mut best = f64::NEG_INFINITY;
        for col in 0..k {
            if used[col] {
                continue;
            }
            used[col] = true;
            let total = matrix.get(row, col) + search(matrix, row + 1, k, used);
            used[col] = false;
            best = best.max(total);
        }
        best
    }
    let k = matrix.rows().max(matrix.cols());
    if k == 0 {
        return 0.0;
    }
    search(matrix, 0, k, &mut vec![false; k])
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn every_index_appears_exactly_once(matrix in arb_matrix(7)) {
        let edges = solve_matrix(&matrix);
        prop_assert_eq!(edges.len(), matrix.rows().max(matrix.cols()));

        let mut lefts = HashSet::new();
        let mut rights = HashSet::new();
        for edge in &edges {
            prop_assert!(edge.left_index.is_some() || edge.right_index.is_some());
            if let Some(left) = edge.left_index {
                prop_assert!(left < matrix.rows());
                prop_assert!(lefts.insert(left));
            }
            if let Some(right) = edge.right_index {
                prop_assert!(right < matrix.cols());
                prop_assert!(rights.insert(right));
            }
        }
        prop_assert_eq!(lefts.len(), matrix.rows());
        prop_assert_eq!(rights.len(), matrix.cols());
    }

    #[test]
    fn assignment_total_is_optimal(matrix in arb_matrix(6)) {
        let total: f64 = solve_matrix(&matrix).iter().map(|edge| edge.score).sum();
        let best = brute_force_best(&matrix);
        prop_assert!((total - best).abs() < 1e-9, "solver {} vs brute force {}", total, best);
    }

    #[test]
    fn thousand_fold_is_symmetric(x in 1e-6..1e6_f64) {
        let tiers = PowerTiers::default();
        let forward = off_by_power_similarity(x, x * 1000.0, 10.0, &tiers);
        let backward = off_by_power_similarity(x * 1000.0, x, 10.0, &tiers);
        prop_assert_eq!(forward, 0.9);
        prop_assert_eq!(backward, 0.9);
    }

    #[test]
    fn closeness_is_symmetric_and_bounded(a in -1e6..1e6_f64, b in -1e6..1e6_f64) {
        let forward = relative_closeness(a, b);
        prop_assert_eq!(forward, relative_closeness(b, a));
        prop_assert!((0.0..=1.0).contains(&forward));
    }
}
