use std::collections::{BTreeMap, BTreeSet};

use crate::error::EvaluationError;
use crate::{ClassLabel, ClusterId, ReadId, Result};

/// A class is trivial if at most `threshold` reads were simulated from it.
pub fn trivial_classes(
    class_groups: &BTreeMap<ClassLabel, BTreeSet<ReadId>>,
    threshold: usize,
) -> BTreeSet<ClassLabel> {
    class_groups
        .iter()
        .filter(|(_, reads)| reads.len() <= threshold)
        .map(|(class, _)| class.clone())
        .collect()
}

/// A cluster is trivial if it contains at most `threshold` reads.
pub fn trivial_clusters(
    cluster_groups: &BTreeMap<ClusterId, BTreeSet<ReadId>>,
    threshold: usize,
) -> BTreeSet<ClusterId> {
    cluster_groups
        .iter()
        .filter(|(_, reads)| reads.len() <= threshold)
        .map(|(cluster_id, _)| *cluster_id)
        .collect()
}

pub fn singleton_clusters(
    cluster_groups: &BTreeMap<ClusterId, BTreeSet<ReadId>>,
) -> BTreeSet<ClusterId> {
    trivial_clusters(cluster_groups, 1)
}

/// Every simulated class has more than `threshold` reads by construction, so
/// a trivial class means the ground truth does not belong to this
/// evaluation.
pub fn check_no_trivial_classes(
    class_groups: &BTreeMap<ClassLabel, BTreeSet<ReadId>>,
    threshold: usize,
) -> Result<()> {
    let trivial = trivial_classes(class_groups, threshold);
    info!("# trivial classes: {}", trivial.len());
    if !trivial.is_empty() {
        debug!("Trivial classes were: {:?}", trivial);
        return Err(EvaluationError::TrivialClasses {
            count: trivial.len(),
            threshold,
        });
    }
    Ok(())
}
