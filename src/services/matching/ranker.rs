//! Similarity Ranker
//!
//! Scores candidate vectors against one query vector and orders them.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::{GroupDocument, RankedGroup};

/// How query/candidate similarity is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    /// Raw dot product, no normalization.
    #[default]
    Dot,
    /// Dot product of the L2-normalized vectors.
    Cosine,
}

impl SimilarityMetric {
    pub fn score(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            SimilarityMetric::Dot => dot(a, b),
            SimilarityMetric::Cosine => cosine(a, b),
        }
    }
}

/// Dot product over the shared prefix of `a` and `b`.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Cosine similarity; zero-norm vectors score 0.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let norm_a = dot(a, a).sqrt();
    let norm_b = dot(b, b).sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot(a, b) / (norm_a * norm_b)
}

/// Descending by score; NaN after every number.
fn by_score_desc(a: &RankedGroup, b: &RankedGroup) -> Ordering {
    match (a.score.is_nan(), b.score.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityRanker {
    metric: SimilarityMetric,
}

impl SimilarityRanker {
    pub fn new(metric: SimilarityMetric) -> Self {
        Self { metric }
    }

    pub fn metric(&self) -> SimilarityMetric {
        self.metric
    }

    /// Score every candidate and return all of them, best first.
    ///
    /// `candidates[i]` must belong to `documents[i]`. Ties keep input order.
    pub fn rank(
        &self,
        query: &[f32],
        candidates: &[Vec<f32>],
        documents: &[GroupDocument],
    ) -> Vec<RankedGroup> {
        let mut ranked: Vec<RankedGroup> = candidates
            .iter()
            .zip(documents.iter())
            .enumerate()
            .map(|(index, (vector, doc))| RankedGroup {
                index,
                name: doc.name.clone(),
                score: self.metric.score(query, vector),
            })
            .collect();

        // `sort_by` is stable.
        ranked.sort_by(by_score_desc);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(names: &[&str]) -> Vec<GroupDocument> {
        names
            .iter()
            .map(|n| GroupDocument::new(*n, "Subject", "Description"))
            .collect()
    }

    fn names(ranked: &[RankedGroup]) -> Vec<&str> {
        ranked.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_dot_and_cosine() {
        assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
        assert!((cosine(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_dot_is_not_normalized() {
        let metric = SimilarityMetric::Dot;
        assert_eq!(metric.score(&[2.0, 0.0], &[3.0, 0.0]), 6.0);
        let metric = SimilarityMetric::Cosine;
        assert!((metric.score(&[2.0, 0.0], &[3.0, 0.0]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rank_orders_descending() {
        let ranker = SimilarityRanker::default();
        let ranked = ranker.rank(
            &[1.0, 0.0],
            &[vec![0.1, 0.0], vec![0.9, 0.0], vec![0.5, 0.0]],
            &docs(&["A", "B", "C"]),
        );
        assert_eq!(names(&ranked), vec!["B", "C", "A"]);
        assert_eq!(ranked[0].index, 1);
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let ranker = SimilarityRanker::default();
        let ranked = ranker.rank(
            &[1.0],
            &[vec![0.5], vec![0.7], vec![0.5], vec![0.5]],
            &docs(&["A", "B", "C", "D"]),
        );
        assert_eq!(names(&ranked), vec!["B", "A", "C", "D"]);
    }

    #[test]
    fn test_rank_nan_sorts_last() {
        let ranker = SimilarityRanker::default();
        let ranked = ranker.rank(
            &[1.0],
            &[vec![f32::NAN], vec![-1.0], vec![2.0]],
            &docs(&["A", "B", "C"]),
        );
        assert_eq!(names(&ranked), vec!["C", "B", "A"]);
        assert!(ranked[2].score.is_nan());
    }

    #[test]
    fn test_metric_serde() {
        assert_eq!(serde_json::to_string(&SimilarityMetric::Cosine).unwrap(), "\"cosine\"");
        let parsed: SimilarityMetric = serde_json::from_str("\"dot\"").unwrap();
        assert_eq!(parsed, SimilarityMetric::Dot);
    }
}
