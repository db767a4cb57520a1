use crate::inferred_clusters::InferredClusters;

/// Internal cluster validation judges a clustering from the reads themselves,
/// without the ground truth. No evaluator is part of the quality pipeline
/// yet; implement `InternalEvaluator` to provide one.
#[derive(Debug, PartialEq, Clone)]
pub struct InternalEvaluation {
    /// Average similarity of each cluster with its most similar cluster.
    /// Range [0, +inf), 0 is best.
    pub davies_bouldin: f64,
    /// Range [-1, 1], 1 is best.
    pub silhouette: f64,
}

pub trait InternalEvaluator {
    fn method_name(&self) -> &str;

    /// `None` when the clustering cannot be scored, e.g. it has fewer than
    /// two clusters.
    fn evaluate(&self, inferred: &InferredClusters) -> Option<InternalEvaluation>;
}
