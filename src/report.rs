use std::fmt;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::cluster_stats::ClusterStats;
use crate::error::EvaluationError;
use crate::external_evaluation::ExternalEvaluation;
use crate::inferred_clusters::ClusteringTool;
use crate::Result;

pub const QUALITY_COLUMNS: [&str; 13] = [
    "homogeneity",
    "completeness",
    "v_measure",
    "adjusted_mutual_information",
    "adjusted_rand_index",
    "fowlkes_mallows",
    "purity",
    "inverse_purity",
    "k",
    "min_size",
    "max_size",
    "avg_size",
    "std_size",
];

pub const CLUSTER_COUNT_COLUMNS: [&str; 4] = ["k", "k_non_trivial", "k_trivial", "k_singleton"];

/// Which clusters were left out before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterVariant {
    All,
    NoSingleton,
    NoTrivial,
}

impl FilterVariant {
    pub const ALL: [FilterVariant; 3] = [
        FilterVariant::All,
        FilterVariant::NoSingleton,
        FilterVariant::NoTrivial,
    ];

    pub fn file_prefix(&self) -> &'static str {
        match self {
            FilterVariant::All => "",
            FilterVariant::NoSingleton => "no_singleton_",
            FilterVariant::NoTrivial => "no_trivial_",
        }
    }
}

impl fmt::Display for FilterVariant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FilterVariant::All => write!(f, "all clusters"),
            FilterVariant::NoSingleton => write!(f, "no singleton"),
            FilterVariant::NoTrivial => write!(f, "no trivial"),
        }
    }
}

/// Composition of a clustering by cluster size.
#[derive(Debug, PartialEq, Clone)]
pub struct ClusterCounts {
    pub k: usize,
    pub k_non_trivial: usize,
    pub k_trivial: usize,
    pub k_singleton: usize,
}

impl ClusterCounts {
    pub fn new(k: usize, k_trivial: usize, k_singleton: usize) -> ClusterCounts {
        ClusterCounts {
            k,
            k_non_trivial: k - k_trivial,
            k_trivial,
            k_singleton,
        }
    }
}

impl fmt::Display for ClusterCounts {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "k: {}, non-trivial: {}, trivial: {}, singleton: {}",
            self.k, self.k_non_trivial, self.k_trivial, self.k_singleton
        )
    }
}

/// Everything computed for one clustering result, ready to be written.
#[derive(Debug, PartialEq)]
pub struct QualityReport {
    pub stats: ClusterStats,
    pub counts: ClusterCounts,
    /// `None` evaluations had no reads left to compare.
    pub evaluations: Vec<(FilterVariant, Option<ExternalEvaluation>)>,
}

impl QualityReport {
    pub fn evaluation(&self, variant: FilterVariant) -> Option<&ExternalEvaluation> {
        self.evaluations
            .iter()
            .find(|(v, _)| *v == variant)
            .and_then(|(_, e)| e.as_ref())
    }
}

/// Report files for one result live in `{data}/quality/{tool}/{dataset}/`.
#[derive(Debug, PartialEq, Clone)]
pub struct ReportLocation {
    pub directory: PathBuf,
    pub result: String,
}

impl ReportLocation {
    pub fn new(data_root: &Path, tool: ClusteringTool, dataset: &str, result: &str) -> Self {
        ReportLocation {
            directory: data_root.join("quality").join(tool.name()).join(dataset),
            result: result.to_string(),
        }
    }

    pub fn quality_path(&self, variant: FilterVariant) -> PathBuf {
        self.directory.join(format!(
            "{}{}_quality.csv",
            variant.file_prefix(),
            self.result
        ))
    }

    pub fn cluster_counts_path(&self) -> PathBuf {
        self.directory.join(format!("{}_n_clusters.csv", self.result))
    }
}

fn optional_cell<T: ToString>(v: &Option<T>) -> String {
    match v {
        Some(x) => x.to_string(),
        None => "".to_string(),
    }
}

pub fn quality_row(evaluation: &ExternalEvaluation, stats: &ClusterStats) -> Vec<String> {
    vec![
        evaluation.homogeneity.to_string(),
        evaluation.completeness.to_string(),
        evaluation.v_measure.to_string(),
        evaluation.adjusted_mutual_information.to_string(),
        evaluation.adjusted_rand_index.to_string(),
        evaluation.fowlkes_mallows.to_string(),
        evaluation.purity.to_string(),
        evaluation.inverse_purity.to_string(),
        stats.k.to_string(),
        optional_cell(&stats.min_size),
        optional_cell(&stats.max_size),
        optional_cell(&stats.avg_size),
        optional_cell(&stats.std_size),
    ]
}

pub fn cluster_counts_row(counts: &ClusterCounts) -> Vec<String> {
    vec![
        counts.k.to_string(),
        counts.k_non_trivial.to_string(),
        counts.k_trivial.to_string(),
        counts.k_singleton.to_string(),
    ]
}

/// Report tables written to temporary files beside their destinations,
/// waiting to be renamed into place together. Dropping staged reports without
/// committing them deletes the temporary files.
#[derive(Debug, Default)]
pub struct StagedReports {
    tables: Vec<(NamedTempFile, PathBuf)>,
}

impl StagedReports {
    pub fn new() -> StagedReports {
        StagedReports::default()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    fn stage_table(
        &mut self,
        directory: &Path,
        path: &Path,
        header: &[&str],
        row: &[String],
    ) -> Result<()> {
        let mut tmp =
            NamedTempFile::new_in(directory).map_err(|e| EvaluationError::io(directory, e))?;
        {
            let mut wtr = csv::Writer::from_writer(&mut tmp);
            wtr.write_record(header)
                .map_err(|e| EvaluationError::csv(path, e))?;
            wtr.write_record(row)
                .map_err(|e| EvaluationError::csv(path, e))?;
            wtr.flush().map_err(|e| EvaluationError::io(path, e))?;
        }
        trace!("Staged {} as {}", path.display(), tmp.path().display());
        self.tables.push((tmp, path.to_path_buf()));
        Ok(())
    }

    /// Stage one quality file per evaluated variant, and the cluster counts.
    /// Variants without an evaluation get no file.
    pub fn stage(&mut self, location: &ReportLocation, report: &QualityReport) -> Result<()> {
        std::fs::create_dir_all(&location.directory)
            .map_err(|e| EvaluationError::io(&location.directory, e))?;

        for (variant, evaluation) in &report.evaluations {
            match evaluation {
                Some(e) => self.stage_table(
                    &location.directory,
                    &location.quality_path(*variant),
                    &QUALITY_COLUMNS,
                    &quality_row(e, &report.stats),
                )?,
                None => debug!(
                    "Not writing {} quality for result {} since no reads were left to compare",
                    variant, location.result
                ),
            }
        }

        self.stage_table(
            &location.directory,
            &location.cluster_counts_path(),
            &CLUSTER_COUNT_COLUMNS,
            &cluster_counts_row(&report.counts),
        )
    }

    /// Rename every staged table to its destination. If one cannot be, the
    /// tables already renamed are removed again and the rest are discarded,
    /// so either all reports are written or none are.
    pub fn commit(self) -> Result<Vec<PathBuf>> {
        let mut written: Vec<PathBuf> = Vec::with_capacity(self.tables.len());
        for (tmp, path) in self.tables {
            if let Err(e) = tmp.persist(&path) {
                for done in &written {
                    if let Err(remove_error) = std::fs::remove_file(done) {
                        warn!(
                            "Failed to remove partially written report {}: {}",
                            done.display(),
                            remove_error
                        );
                    }
                }
                return Err(EvaluationError::io(&path, e.error));
            }
            debug!("Wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}

/// Write the reports of a single result, all of them or none.
pub fn write_reports(location: &ReportLocation, report: &QualityReport) -> Result<Vec<PathBuf>> {
    let mut staged = StagedReports::new();
    staged.stage(location, report)?;
    staged.commit()
}
