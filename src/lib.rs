pub mod cluster_filter;
pub mod cluster_stats;
pub mod contingency;
pub mod error;
pub mod external_evaluation;
pub mod ground_truth;
pub mod inferred_clusters;
pub mod internal_evaluation;
pub mod isonclust;
pub mod labels;
pub mod qcluster;
pub mod quality;
pub mod quality_argument_parsing;
pub mod random_cluster;
pub mod report;

#[macro_use]
extern crate log;
extern crate clap;
extern crate rayon;

use crate::error::EvaluationError;

/// Read identifier, unique within a simulated dataset.
pub type ReadId = String;
/// Ground truth class of a read, e.g. the transcript it was simulated from.
pub type ClassLabel = String;
/// Cluster identifier, scoped to one clustering result.
pub type ClusterId = i64;

pub type Result<T> = std::result::Result<T, EvaluationError>;

/// One line format of a clustering tool's output. Implementors only know how
/// to pull the read and cluster out of a single record; streaming the file
/// and building the maps is shared in inferred_clusters.
pub trait InferredClusterParser {
    fn method_name(&self) -> &str;

    /// Name of the file the tool writes inside its result directory.
    fn inferred_clusters_file_name(&self) -> &str;

    fn delimiter(&self) -> u8;

    fn parse_record(
        &self,
        record: &csv::StringRecord,
    ) -> std::result::Result<(ReadId, ClusterId), String>;
}

pub const DEFAULT_THRESHOLD: &str = "10";

pub const AUTHOR: &str = "clustqual contributors";
