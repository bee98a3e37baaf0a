// src/core/indexing/kdtree/tests/test_search.rs

#[cfg(test)]
mod search_tests {
    use crate::core::distance::{Chebyshev, Distance, Euclidean, FnDistance, Manhattan};
    use crate::core::indexing::kdtree::builder::build_kdtree;
    use crate::core::indexing::kdtree::error::KdTreeError;
    use crate::core::indexing::kdtree::search::{find_knn, PruningStrategy};
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const KTH: PruningStrategy = PruningStrategy::KthBest;

    /// Exhaustive reference: indices of the k nearest, ties broken by index.
    fn brute_force(points: &[Vec<f64>], query: &[f64], k: usize, distance: &dyn Distance) -> Vec<usize> {
        let mut ranked: Vec<(f64, usize)> = points
            .iter()
            .enumerate()
            .map(|(i, p)| (distance.distance(query, p), i))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        ranked.into_iter().take(k).map(|(_, i)| i).collect()
    }

    #[test]
    fn test_find_knn_empty_tree() {
        let points: Vec<Vec<f64>> = Vec::new();
        let tree = build_kdtree(&points, &[], 2).unwrap();
        let result = find_knn(&tree, &[1.0, 1.0], 1, &Euclidean, KTH).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_find_knn_single_point_tree() {
        let tree = build_kdtree(&[[1.0, 2.0]], &[9], 2).unwrap();

        for query in [[1.0, 2.0], [-50.0, 3.0], [1e6, 1e6]] {
            let results = find_knn(&tree, &query, 1, &Euclidean, KTH).unwrap();
            assert_eq!(results.len(), 1);
            assert_eq!(results[0].index, 0);
            assert_eq!(results[0].label, 9);
            assert_eq!(results[0].point, &[1.0, 2.0]);
        }
    }

    #[test]
    fn test_find_knn_exact_match() {
        let tree = build_kdtree(&[[1.0, 2.0], [5.0, 5.0]], &[0, 1], 2).unwrap();

        let results = find_knn(&tree, &[5.0, 5.0], 1, &Euclidean, KTH).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].index, 1);
        assert_eq!(results[0].distance, 0.0);
    }

    #[test]
    fn test_find_knn_k_greater_than_points() {
        let tree = build_kdtree(&[[1.0, 2.0], [5.0, 5.0]], &[0, 1], 2).unwrap();

        let results = find_knn(&tree, &[0.0, 0.0], 5, &Euclidean, KTH).unwrap();
        assert_eq!(results.len(), 2); // Should return all points
        assert_eq!(results[0].index, 0);
        assert_abs_diff_eq!(results[0].distance, 5.0f64.sqrt(), epsilon = 1e-12);
        assert_eq!(results[1].index, 1);
        assert_abs_diff_eq!(results[1].distance, 50.0f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_find_knn_simple_2d() {
        let points = [
            [2.0, 3.0], // 0: dist to (6,3) = 4
            [5.0, 4.0], // 1: sqrt(2)
            [9.0, 6.0], // 2: sqrt(18)
            [4.0, 7.0], // 3: sqrt(20)
            [8.0, 1.0], // 4: sqrt(8)
            [7.0, 2.0], // 5: sqrt(2)
        ];
        let tree = build_kdtree(&points, &[0, 1, 2, 3, 4, 5], 2).unwrap();

        let results = find_knn(&tree, &[6.0, 3.0], 3, &Euclidean, KTH).unwrap();
        let got: Vec<usize> = results.iter().map(|n| n.index).collect();
        // 1 and 5 tie; the lower training index comes first.
        assert_eq!(got, vec![1, 5, 4]);
        assert_abs_diff_eq!(results[0].distance, 2.0f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(results[1].distance, 2.0f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(results[2].distance, 8.0f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_find_knn_query_dimension_mismatch() {
        let tree = build_kdtree(&[[1.0, 2.0]], &[0], 2).unwrap();
        let result = find_knn(&tree, &[1.0, 2.0, 3.0], 1, &Euclidean, KTH);
        assert_eq!(result.unwrap_err(), KdTreeError::DimensionMismatch { expected: 2, found: 3 });
    }

    #[test]
    fn test_find_knn_k_is_zero() {
        let tree = build_kdtree(&[[1.0, 2.0]], &[0], 2).unwrap();
        let result = find_knn(&tree, &[1.0, 1.0], 0, &Euclidean, KTH);
        assert!(matches!(result, Err(KdTreeError::InvalidK(_))));
    }

    #[test]
    fn test_find_knn_non_finite_query() {
        let tree = build_kdtree(&[[1.0, 2.0]], &[0], 2).unwrap();
        let result = find_knn(&tree, &[f64::NAN, 1.0], 1, &Euclidean, KTH);
        assert!(matches!(result, Err(KdTreeError::InvalidPoint(_))));
    }

    #[test]
    fn test_duplicate_coordinates_resolve_to_lowest_index() {
        let tree = build_kdtree(&[[1.0, 1.0], [1.0, 1.0]], &[1, 2], 2).unwrap();
        for _ in 0..10 {
            let results = find_knn(&tree, &[1.0, 1.0], 1, &Euclidean, KTH).unwrap();
            assert_eq!(results[0].index, 0);
            assert_eq!(results[0].label, 1);
        }
    }

    #[test]
    fn test_running_minimum_can_miss_neighbors() {
        // Root pivot is 1.0. Query 1.25 descends right, finds 5.0 (d=3.75),
        // then the root point (d=0.25) equals the plane distance, so the
        // running minimum stops the left side from being visited.
        let tree = build_kdtree(&[[5.0], [0.0], [1.0]], &[50, 0, 10], 1).unwrap();

        let exact = find_knn(&tree, &[1.25], 3, &Euclidean, PruningStrategy::KthBest).unwrap();
        assert_eq!(exact.len(), 3);

        let approx = find_knn(&tree, &[1.25], 3, &Euclidean, PruningStrategy::RunningMinimum).unwrap();
        let labels: Vec<u32> = approx.iter().map(|n| n.label).collect();
        assert_eq!(labels, vec![10, 50]);
    }

    #[test]
    fn test_running_minimum_is_exact_for_single_neighbor() {
        let mut rng = StdRng::seed_from_u64(7);
        let points: Vec<Vec<f64>> = (0..300)
            .map(|_| (0..3).map(|_| rng.gen_range(-5.0..5.0)).collect())
            .collect();
        let labels = vec![0; points.len()];
        let tree = build_kdtree(&points, &labels, 3).unwrap();

        for _ in 0..100 {
            let query: Vec<f64> = (0..3).map(|_| rng.gen_range(-6.0..6.0)).collect();
            let got = find_knn(&tree, &query, 1, &Euclidean, PruningStrategy::RunningMinimum).unwrap();
            assert_eq!(got[0].index, brute_force(&points, &query, 1, &Euclidean)[0]);
        }
    }

    #[test]
    fn test_matches_brute_force_for_each_builtin_metric() {
        let mut rng = StdRng::seed_from_u64(42);
        let points: Vec<Vec<f64>> = (0..150)
            .map(|_| (0..4).map(|_| rng.gen_range(-10.0..10.0)).collect())
            .collect();
        let labels = vec![0; points.len()];
        let tree = build_kdtree(&points, &labels, 4).unwrap();
        let metrics: [&dyn Distance; 3] = [&Euclidean, &Manhattan, &Chebyshev];

        for metric in metrics {
            for k in [1, 2, 5, 17, 150] {
                let query: Vec<f64> = (0..4).map(|_| rng.gen_range(-12.0..12.0)).collect();
                let got: Vec<usize> = find_knn(&tree, &query, k, metric, KTH)
                    .unwrap()
                    .iter()
                    .map(|n| n.index)
                    .collect();
                assert_eq!(got, brute_force(&points, &query, k, metric), "{} k={}", metric.name(), k);
            }
        }
    }

    #[test]
    fn test_custom_distance_matches_brute_force() {
        let weights = [1.0, 3.0, 1.5];
        let weighted_l1 = FnDistance::new("weighted_l1", move |a: &[f64], b: &[f64]| {
            a.iter().zip(b).zip(weights).map(|((x, y), w)| w * (x - y).abs()).sum()
        });
        let mut rng = StdRng::seed_from_u64(11);
        let points: Vec<Vec<f64>> = (0..200)
            .map(|_| (0..3).map(|_| rng.gen_range(-1.0..1.0)).collect())
            .collect();
        let labels = vec![0; points.len()];
        let tree = build_kdtree(&points, &labels, 3).unwrap();

        for k in [1, 3, 8, 40] {
            for _ in 0..20 {
                let query: Vec<f64> = (0..3).map(|_| rng.gen_range(-1.2..1.2)).collect();
                let got: Vec<usize> = find_knn(&tree, &query, k, &weighted_l1, KTH)
                    .unwrap()
                    .iter()
                    .map(|n| n.index)
                    .collect();
                assert_eq!(got, brute_force(&points, &query, k, &weighted_l1), "k={}", k);
            }
        }
    }

    #[test]
    fn test_rebuild_yields_identical_results() {
        let mut rng = StdRng::seed_from_u64(3);
        let points: Vec<[f64; 2]> = (0..120)
            .map(|_| [f64::from(rng.gen_range(0..6i32)), f64::from(rng.gen_range(0..6i32))])
            .collect();
        let labels: Vec<u32> = (0..120).map(|i| i % 4).collect();
        let first = build_kdtree(&points, &labels, 2).unwrap();
        let second = build_kdtree(&points, &labels, 2).unwrap();

        for _ in 0..50 {
            let query = [rng.gen_range(-1.0..7.0), rng.gen_range(-1.0..7.0)];
            let k = rng.gen_range(1..=10);
            let a = find_knn(&first, &query, k, &Euclidean, KTH).unwrap();
            let b = find_knn(&second, &query, k, &Euclidean, KTH).unwrap();
            assert_eq!(a, b);
        }
    }

    fn dataset() -> impl Strategy<Value = (usize, Vec<Vec<f64>>, Vec<f64>)> {
        (1usize..=5).prop_flat_map(|dimension| {
            (
                Just(dimension),
                prop::collection::vec(prop::collection::vec(-100.0f64..100.0, dimension), 1..=200),
                prop::collection::vec(-120.0f64..120.0, dimension),
            )
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_knn_matches_brute_force_for_every_k((dimension, points, query) in dataset()) {
            let labels = vec![0; points.len()];
            let tree = build_kdtree(&points, &labels, dimension).unwrap();

            for k in 1..=points.len() {
                let got: Vec<usize> = find_knn(&tree, &query, k, &Euclidean, KTH)
                    .unwrap()
                    .iter()
                    .map(|n| n.index)
                    .collect();
                prop_assert_eq!(got, brute_force(&points, &query, k, &Euclidean));
            }
        }

        #[test]
        fn prop_grid_data_with_ties_matches_brute_force(
            raw in prop::collection::vec((-3i32..3, -3i32..3), 1..80),
            qx in -4i32..4,
            qy in -4i32..4,
            k in 1usize..12,
        ) {
            let points: Vec<Vec<f64>> = raw.iter().map(|&(x, y)| vec![f64::from(x), f64::from(y)]).collect();
            let labels = vec![0; points.len()];
            let tree = build_kdtree(&points, &labels, 2).unwrap();
            let query = [f64::from(qx), f64::from(qy)];

            let got: Vec<usize> = find_knn(&tree, &query, k, &Manhattan, KTH)
                .unwrap()
                .iter()
                .map(|n| n.index)
                .collect();
            prop_assert_eq!(got, brute_force(&points, &query, k, &Manhattan));
        }

        #[test]
        fn prop_self_query_returns_the_point((dimension, points, _query) in dataset(), pick in any::<prop::sample::Index>()) {
            let labels = vec![0; points.len()];
            let tree = build_kdtree(&points, &labels, dimension).unwrap();
            let target = &points[pick.index(points.len())];

            let got = find_knn(&tree, target, 1, &Euclidean, KTH).unwrap();
            prop_assert_eq!(got.len(), 1);
            prop_assert_eq!(got[0].distance, 0.0);
            prop_assert_eq!(got[0].point, target.as_slice());
        }
    }
}
