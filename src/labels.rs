use std::collections::{BTreeMap, BTreeSet};

use crate::error::EvaluationError;
use crate::{ClassLabel, ClusterId, ReadId, Result};

/// Parallel true and predicted labels, one entry per retained read.
#[derive(Debug, PartialEq, Default)]
pub struct LabelPairs<'a> {
    pub true_labels: Vec<&'a str>,
    pub pred_labels: Vec<ClusterId>,
}

impl LabelPairs<'_> {
    pub fn len(&self) -> usize {
        self.true_labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.true_labels.is_empty()
    }
}

/// Pair up the class and cluster of every clustered read whose cluster is
/// not excluded. Returns empty labels when everything is excluded.
pub fn align<'a>(
    clusters: &BTreeMap<ReadId, ClusterId>,
    classes: &'a BTreeMap<ReadId, ClassLabel>,
    without: &BTreeSet<ClusterId>,
) -> Result<LabelPairs<'a>> {
    let mut labels = LabelPairs::default();
    for (read_id, cluster_id) in clusters {
        if without.contains(cluster_id) {
            continue;
        }
        let class = classes
            .get(read_id)
            .ok_or_else(|| EvaluationError::MissingClass(read_id.clone()))?;
        labels.true_labels.push(class.as_str());
        labels.pred_labels.push(*cluster_id);
    }
    Ok(labels)
}
