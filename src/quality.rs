use std::collections::BTreeSet;
use std::path::PathBuf;

use rayon::prelude::*;

use crate::cluster_filter::{check_no_trivial_classes, singleton_clusters, trivial_clusters};
use crate::cluster_stats::calculate_cluster_stats;
use crate::external_evaluation::compute_external_metrics;
use crate::ground_truth::{read_ground_truth, GroundTruth};
use crate::inferred_clusters::{ClusteringTool, InferredClusters};
use crate::labels::align;
use crate::report::{ClusterCounts, FilterVariant, QualityReport, ReportLocation, StagedReports};
use crate::Result;

/// Where to find one simulated dataset and the results of one tool on it.
#[derive(Debug, Clone)]
pub struct QualityConfig {
    pub data_root: PathBuf,
    pub tool: ClusteringTool,
    pub dataset: String,
    /// Clusters (and classes) with at most this many reads are trivial.
    pub threshold: usize,
}

impl QualityConfig {
    pub fn ground_truth_path(&self) -> PathBuf {
        self.data_root
            .join("simulated")
            .join(&self.dataset)
            .join("simulated.sam")
    }

    pub fn inferred_clusters_path(&self, result: &str) -> PathBuf {
        self.tool
            .inferred_clusters_path(&self.data_root, &self.dataset, result)
    }

    pub fn report_location(&self, result: &str) -> ReportLocation {
        ReportLocation::new(&self.data_root, self.tool, &self.dataset, result)
    }
}

/// Score a clustering against the ground truth, once with all clusters and
/// once each without singleton and without trivial clusters.
pub fn evaluate_clusters(
    truth: &GroundTruth,
    inferred: &InferredClusters,
    threshold: usize,
) -> Result<QualityReport> {
    check_no_trivial_classes(&truth.class_groups, threshold)?;

    let singleton_cluster_ids = singleton_clusters(&inferred.cluster_groups);
    info!("# singleton clusters: {}", singleton_cluster_ids.len());
    let trivial_cluster_ids = trivial_clusters(&inferred.cluster_groups, threshold);
    info!("# trivial clusters: {}", trivial_cluster_ids.len());

    let no_exclusion = BTreeSet::new();
    let mut evaluations = Vec::with_capacity(FilterVariant::ALL.len());
    for variant in FilterVariant::ALL.iter() {
        let without = match variant {
            FilterVariant::All => &no_exclusion,
            FilterVariant::NoSingleton => &singleton_cluster_ids,
            FilterVariant::NoTrivial => &trivial_cluster_ids,
        };
        let labels = align(&inferred.clusters, &truth.classes, without)?;
        debug!("Comparing {} reads ({})", labels.len(), variant);
        let evaluation = compute_external_metrics(&labels);
        match &evaluation {
            Some(e) => info!("External evaluation ({}): {}", variant, e),
            None => info!("External evaluation ({}): no reads left to compare", variant),
        }
        evaluations.push((*variant, evaluation));
    }

    let stats = calculate_cluster_stats(inferred.k(), &inferred.cluster_groups);
    info!("Cluster stats: {}", stats);
    let counts = ClusterCounts::new(
        inferred.k(),
        trivial_cluster_ids.len(),
        singleton_cluster_ids.len(),
    );
    info!("Cluster counts: {}", counts);

    Ok(QualityReport {
        stats,
        counts,
        evaluations,
    })
}

fn evaluate_result(
    config: &QualityConfig,
    truth: &GroundTruth,
    result: &str,
) -> Result<(ReportLocation, QualityReport)> {
    let path = config.inferred_clusters_path(result);
    info!("Reading {} clusters from {} ..", config.tool, path.display());
    let inferred = config.tool.read_inferred_clusters(&path)?;
    info!(
        "Read in {} clusters over {} reads for result {}",
        inferred.k(),
        inferred.clusters.len(),
        result
    );
    let report = evaluate_clusters(truth, &inferred, config.threshold)?;
    Ok((config.report_location(result), report))
}

/// Evaluate each result of a tool on a dataset and write the reports. Results
/// are evaluated independently, in parallel on the global rayon pool.
/// Nothing is written unless every result could be evaluated, and the
/// reports of all results are written together or not at all.
pub fn run_quality(config: &QualityConfig, results: &[String]) -> Result<Vec<ReportLocation>> {
    let ground_truth_path = config.ground_truth_path();
    info!("Reading ground truth from {} ..", ground_truth_path.display());
    let truth = read_ground_truth(&ground_truth_path)?;
    info!(
        "Read in {} reads from {} classes",
        truth.num_reads(),
        truth.class_groups.len()
    );

    let evaluated: Vec<Result<(ReportLocation, QualityReport)>> = results
        .par_iter()
        .map(|result| evaluate_result(config, &truth, result))
        .collect();
    let evaluated = evaluated.into_iter().collect::<Result<Vec<_>>>()?;

    let mut staged = StagedReports::new();
    let mut locations = vec![];
    for (location, report) in evaluated {
        info!(
            "Writing reports for result {} to {} ..",
            location.result,
            location.directory.display()
        );
        staged.stage(&location, &report)?;
        locations.push(location);
    }
    let written = staged.commit()?;
    info!("Wrote {} report files", written.len());
    Ok(locations)
}
