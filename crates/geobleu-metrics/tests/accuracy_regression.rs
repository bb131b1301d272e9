//! Accuracy regression tests for geobleu-metrics.
//!
//! Closed-form cases pin the exact kernel and recurrence; the randomized
//! cases compare the single-pass greedy matcher against a literal
//! take-best-then-filter extraction on seeded data.

use geobleu_metrics::{
    Dtw, GeoBleu, Point, PointSeries, generate_ngrams, greedy_matching, ngram_proximity,
    precision_at_n,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn series(points: &[(f64, f64)]) -> PointSeries {
    PointSeries::new(points.iter().map(|&p| p.into()).collect()).expect("valid test series")
}

fn random_points(rng: &mut ChaCha8Rng, len: usize) -> Vec<Point> {
    (0..len)
        .map(|_| Point::new(rng.random_range(0.0..200.0), rng.random_range(0.0..200.0)))
        .collect()
}

fn random_grid_points(rng: &mut ChaCha8Rng, len: usize) -> Vec<Point> {
    // Small grid so that tied proximities are common.
    (0..len)
        .map(|_| Point::new(rng.random_range(1..=4) as f64, rng.random_range(1..=4) as f64))
        .collect()
}

/// Repeatedly take the first remaining edge and filter out conflicts.
fn filter_and_restart(sys: &[Point], reference: &[Point], n: usize, beta: f64) -> Vec<(usize, usize, f64)> {
    let sys_ngrams = generate_ngrams(sys, n);
    let ref_ngrams = generate_ngrams(reference, n);
    let mut edges = Vec::new();
    for (i, s) in sys_ngrams.iter().enumerate() {
        for (j, r) in ref_ngrams.iter().enumerate() {
            edges.push((i, j, ngram_proximity(s, r, beta)));
        }
    }
    edges.sort_by(|a, b| b.2.total_cmp(&a.2));

    let mut taken = Vec::new();
    while let Some(&best) = edges.first() {
        taken.push(best);
        edges.retain(|e| e.0 != best.0 && e.1 != best.1);
    }
    taken
}

// ---------------------------------------------------------------------------
// a) closed-form scores
// ---------------------------------------------------------------------------

#[test]
fn geobleu_matches_known_values() {
    let g = GeoBleu::default();

    let same = series(&[(10.0, 10.0), (10.0, 10.0), (10.0, 10.0)]);
    assert_eq!(g.score(same.as_view(), same.as_view()).value(), 1.0);

    // One step, 2 cells apart: exp(-0.5 * 2).
    let a = series(&[(0.0, 0.0)]);
    let b = series(&[(0.0, 2.0)]);
    let got = g.score(a.as_view(), b.as_view()).value();
    assert!((got - (-1.0_f64).exp()).abs() < 1e-12, "got {got}");
}

#[test]
fn dtw_single_step_offset_equals_delta_over_scale() {
    let sys = series(&[(10.0, 10.0), (10.0, 10.0), (10.0, 10.0)]);
    let reference = series(&[(10.0, 10.0), (10.0, 13.0), (10.0, 10.0)]);
    for scale in [1.0, 2.0, 3.0] {
        let dtw = Dtw::with_scale(scale).unwrap();
        let got = dtw.distance(sys.as_view(), reference.as_view()).value();
        assert!((got - 3.0 / scale).abs() < 1e-12, "scale {scale}: got {got}");
    }
}

// ---------------------------------------------------------------------------
// b) greedy matcher equivalence on seeded data
// ---------------------------------------------------------------------------

#[test]
fn single_pass_matches_filter_and_restart() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for round in 0..50 {
        let sys_len = rng.random_range(1..=12);
        let ref_len = rng.random_range(1..=12);
        let sys = random_grid_points(&mut rng, sys_len);
        let reference = random_grid_points(&mut rng, ref_len);
        for n in 1..=3 {
            let expected = filter_and_restart(&sys, &reference, n, 0.5);
            let matching = greedy_matching(
                &generate_ngrams(&sys, n),
                &generate_ngrams(&reference, n),
                0.5,
            );
            let got: Vec<(usize, usize, f64)> = matching
                .edges()
                .iter()
                .map(|e| (e.sys_index, e.ref_index, e.proximity))
                .collect();
            assert_eq!(got, expected, "round {round}, n = {n}");
        }
    }
}

#[test]
fn precision_is_symmetric_under_swap() {
    // Continuous coordinates: exact ties, where enumeration order would
    // differ between the two directions, do not occur.
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..20 {
        let a = random_points(&mut rng, 8);
        let b = random_points(&mut rng, 8);
        for n in 1..=3 {
            let ab = precision_at_n(&a, &b, n, 0.5).unwrap();
            let ba = precision_at_n(&b, &a, n, 0.5).unwrap();
            assert!((ab - ba).abs() < 1e-12, "n = {n}: {ab} vs {ba}");
        }
    }
}

#[test]
fn scores_stay_in_range() {
    let mut rng = ChaCha8Rng::seed_from_u64(2023);
    let g = GeoBleu::default();
    let dtw = Dtw::new();
    for _ in 0..30 {
        let a = PointSeries::new(random_grid_points(&mut rng, 10)).unwrap();
        let b = PointSeries::new(random_grid_points(&mut rng, 10)).unwrap();
        let s = g.score(a.as_view(), b.as_view()).value();
        assert!((0.0..=1.0).contains(&s), "geo-bleu out of range: {s}");
        assert!(dtw.distance(a.as_view(), b.as_view()).value() >= 0.0);
    }
}
