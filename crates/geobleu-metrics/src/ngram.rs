//! N-gram generation and greedy one-to-one matching between n-gram sets.
//!
//! The matching is a greedy approximation of maximum-weight bipartite
//! matching and is part of the GEO-BLEU definition: edges are taken in
//! descending proximity, ties resolved by enumeration order (system index
//! major, reference index minor). Replacing it with an exact assignment
//! solver changes the metric.

use crate::kernel::ngram_proximity;
use crate::series::Point;

/// All contiguous windows of `n` points, in order of starting index.
///
/// Returns an empty vector when `points.len() < n` or `n == 0`.
#[must_use]
pub fn generate_ngrams(points: &[Point], n: usize) -> Vec<&[Point]> {
    if n == 0 || points.len() < n {
        return Vec::new();
    }
    points.windows(n).collect()
}

/// A candidate pairing between a system n-gram and a reference n-gram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Starting index of the system n-gram.
    pub sys_index: usize,
    /// Starting index of the reference n-gram.
    pub ref_index: usize,
    /// Product of pointwise proximities, in `[0, 1]`.
    pub proximity: f64,
}

/// Edges selected by [`greedy_matching`], in selection order.
///
/// No system index and no reference index appears twice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matching {
    edges: Vec<Edge>,
}

impl Matching {
    /// Return the selected edges in the order they were taken.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Return the number of matched pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Return true if nothing was matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Mean proximity of the selected edges, `None` for an empty matching.
    #[must_use]
    pub fn mean_proximity(&self) -> Option<f64> {
        if self.edges.is_empty() {
            return None;
        }
        let sum: f64 = self.edges.iter().map(|e| e.proximity).sum();
        Some(sum / self.edges.len() as f64)
    }
}

/// Greedily extract a one-to-one matching from the complete bipartite edge set.
///
/// Equivalent to repeatedly taking the highest-scoring remaining edge and
/// discarding every edge sharing an endpoint with it. Because discarding
/// preserves the relative order of survivors, a single pass over the
/// stably-sorted edges that skips already-used endpoints selects the same
/// edges in the same order.
#[must_use]
pub fn greedy_matching(sys_ngrams: &[&[Point]], ref_ngrams: &[&[Point]], beta: f64) -> Matching {
    let mut edges = Vec::with_capacity(sys_ngrams.len() * ref_ngrams.len());
    for (sys_index, sys) in sys_ngrams.iter().enumerate() {
        for (ref_index, reference) in ref_ngrams.iter().enumerate() {
            edges.push(Edge {
                sys_index,
                ref_index,
                proximity: ngram_proximity(sys, reference, beta),
            });
        }
    }

    // Stable sort: equal proximities keep enumeration order.
    edges.sort_by(|a, b| b.proximity.total_cmp(&a.proximity));

    let limit = sys_ngrams.len().min(ref_ngrams.len());
    let mut sys_used = vec![false; sys_ngrams.len()];
    let mut ref_used = vec![false; ref_ngrams.len()];
    let mut selected = Vec::with_capacity(limit);

    for edge in edges {
        if selected.len() == limit {
            break;
        }
        if sys_used[edge.sys_index] || ref_used[edge.ref_index] {
            continue;
        }
        sys_used[edge.sys_index] = true;
        ref_used[edge.ref_index] = true;
        selected.push(edge);
    }

    Matching { edges: selected }
}

/// Mean proximity of the greedy matching between the n-grams of two sequences.
///
/// Returns `None` when either sequence has fewer than `n` points, where the
/// edge set is empty and the precision is undefined.
#[must_use]
pub fn precision_at_n(sys: &[Point], reference: &[Point], n: usize, beta: f64) -> Option<f64> {
    let sys_ngrams = generate_ngrams(sys, n);
    let ref_ngrams = generate_ngrams(reference, n);
    greedy_matching(&sys_ngrams, &ref_ngrams, beta).mean_proximity()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(xs: &[f64]) -> Vec<Point> {
        xs.iter().map(|&x| Point::new(x, 0.0)).collect()
    }

    #[test]
    fn ngram_count_and_order() {
        let pts = line(&[1.0, 2.0, 3.0, 4.0]);
        let grams = generate_ngrams(&pts, 2);
        assert_eq!(grams.len(), 3);
        assert_eq!(grams[0], &pts[0..2]);
        assert_eq!(grams[2], &pts[2..4]);
    }

    #[test]
    fn ngram_whole_sequence() {
        let pts = line(&[1.0, 2.0, 3.0]);
        assert_eq!(generate_ngrams(&pts, 3).len(), 1);
    }

    #[test]
    fn ngram_too_short_is_empty() {
        let pts = line(&[1.0, 2.0]);
        assert!(generate_ngrams(&pts, 3).is_empty());
        assert!(generate_ngrams(&pts, 0).is_empty());
    }

    #[test]
    fn identical_sequences_have_unit_precision() {
        let pts = vec![
            Point::new(3.0, 7.0),
            Point::new(4.0, 7.0),
            Point::new(9.0, 1.0),
            Point::new(9.0, 2.0),
        ];
        for n in 1..=4 {
            assert_eq!(precision_at_n(&pts, &pts, n, 0.5), Some(1.0), "n = {n}");
        }
    }

    #[test]
    fn precision_none_when_too_short() {
        let a = line(&[1.0, 2.0]);
        let b = line(&[1.0, 2.0, 3.0]);
        assert_eq!(precision_at_n(&a, &b, 3, 0.5), None);
        assert_eq!(precision_at_n(&b, &a, 3, 0.5), None);
    }

    #[test]
    fn tie_break_prefers_lower_enumeration_order() {
        // sys = [A, A], ref = [A, B]: edges (0,0) and (1,0) tie at 1.0.
        let a = Point::new(0.0, 0.0);
        let b = Point::new(50.0, 0.0);
        let sys = [a, a];
        let reference = [a, b];
        let matching = greedy_matching(
            &generate_ngrams(&sys, 1),
            &generate_ngrams(&reference, 1),
            0.5,
        );
        let pairs: Vec<(usize, usize)> = matching
            .edges()
            .iter()
            .map(|e| (e.sys_index, e.ref_index))
            .collect();
        assert_eq!(pairs, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn all_tied_edges_match_along_diagonal() {
        let p = Point::new(1.0, 1.0);
        let pts = [p, p, p];
        let matching = greedy_matching(&generate_ngrams(&pts, 1), &generate_ngrams(&pts, 1), 0.5);
        let pairs: Vec<(usize, usize)> = matching
            .edges()
            .iter()
            .map(|e| (e.sys_index, e.ref_index))
            .collect();
        assert_eq!(pairs, vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn greedy_is_not_the_optimal_assignment() {
        // Best single edge (a,c) forces the worst remaining edge (b,d);
        // the optimal assignment (a,d)+(b,c) scores higher.
        let sys = line(&[0.0, 0.3]);
        let reference = line(&[0.1, -0.2]);
        let matching = greedy_matching(&generate_ngrams(&sys, 1), &generate_ngrams(&reference, 1), 1.0);

        let pairs: Vec<(usize, usize)> = matching
            .edges()
            .iter()
            .map(|e| (e.sys_index, e.ref_index))
            .collect();
        assert_eq!(pairs, vec![(0, 0), (1, 1)]);

        let greedy = matching.mean_proximity().unwrap();
        let expected = ((-0.1_f64).exp() + (-0.5_f64).exp()) / 2.0;
        assert!((greedy - expected).abs() < 1e-12);
        assert!(greedy < (-0.2_f64).exp());
    }

    #[test]
    fn matching_is_one_to_one_with_uneven_sides() {
        let sys = line(&[0.0, 1.0, 2.0, 3.0, 4.0]);
        let reference = line(&[2.0, 2.5]);
        let matching = greedy_matching(&generate_ngrams(&sys, 1), &generate_ngrams(&reference, 1), 0.5);
        assert_eq!(matching.len(), 2);
        assert_eq!(matching.edges()[0].sys_index, 2);
        assert_eq!(matching.edges()[0].ref_index, 0);
        assert_ne!(matching.edges()[1].ref_index, 0);
        assert_ne!(matching.edges()[1].sys_index, 2);
    }

    #[test]
    fn empty_matching_has_no_mean() {
        assert_eq!(Matching::default().mean_proximity(), None);
    }
}
