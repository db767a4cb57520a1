use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::{ClusterId, ReadId};

/// How cluster cardinality varies across a clustering. Size fields are
/// `None` when there are no clusters.
#[derive(Debug, PartialEq, Clone)]
pub struct ClusterStats {
    pub k: usize,
    pub min_size: Option<usize>,
    pub max_size: Option<usize>,
    pub avg_size: Option<f64>,
    /// Population standard deviation.
    pub std_size: Option<f64>,
}

pub fn calculate_cluster_stats(
    k: usize,
    cluster_groups: &BTreeMap<ClusterId, BTreeSet<ReadId>>,
) -> ClusterStats {
    let sizes: Vec<usize> = cluster_groups.values().map(|reads| reads.len()).collect();
    if sizes.is_empty() {
        return ClusterStats {
            k,
            min_size: None,
            max_size: None,
            avg_size: None,
            std_size: None,
        };
    }

    let n = sizes.len() as f64;
    let mean = sizes.iter().sum::<usize>() as f64 / n;
    let variance = sizes
        .iter()
        .map(|s| {
            let d = *s as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;

    ClusterStats {
        k,
        min_size: sizes.iter().min().copied(),
        max_size: sizes.iter().max().copied(),
        avg_size: Some(mean),
        std_size: Some(variance.sqrt()),
    }
}

fn fmt_opt<T: fmt::Display>(v: &Option<T>) -> String {
    match v {
        Some(x) => x.to_string(),
        None => "undefined".to_string(),
    }
}

impl fmt::Display for ClusterStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "k: {}, minimum size: {}, maximum size: {}, average size: {}, standard deviation of size: {}",
            self.k,
            fmt_opt(&self.min_size),
            fmt_opt(&self.max_size),
            fmt_opt(&self.avg_size),
            fmt_opt(&self.std_size)
        )
    }
}
