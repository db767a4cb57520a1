use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::EvaluationError;
use crate::isonclust::IsonclustParser;
use crate::qcluster::QclusterParser;
use crate::random_cluster::RandomClusterParser;
use crate::{ClusterId, InferredClusterParser, ReadId, Result};

/// The clustering tools whose output can be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusteringTool {
    Isonclust,
    Qcluster,
    RandomCluster,
}

impl ClusteringTool {
    pub const ALL: [ClusteringTool; 3] = [
        ClusteringTool::Isonclust,
        ClusteringTool::Qcluster,
        ClusteringTool::RandomCluster,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ClusteringTool::Isonclust => "isONclust",
            ClusteringTool::Qcluster => "qCluster",
            ClusteringTool::RandomCluster => "random_cluster",
        }
    }

    /// Where the tool writes its clusters for a given dataset and result.
    pub fn inferred_clusters_path(&self, data_root: &Path, dataset: &str, result: &str) -> PathBuf {
        let file_name = match self {
            ClusteringTool::Isonclust => IsonclustParser.inferred_clusters_file_name(),
            ClusteringTool::Qcluster => QclusterParser.inferred_clusters_file_name(),
            ClusteringTool::RandomCluster => RandomClusterParser.inferred_clusters_file_name(),
        };
        data_root
            .join(self.name())
            .join(dataset)
            .join(result)
            .join(file_name)
    }

    pub fn read_inferred_clusters(&self, path: &Path) -> Result<InferredClusters> {
        match self {
            ClusteringTool::Isonclust => read_inferred_clusters(&IsonclustParser, path),
            ClusteringTool::Qcluster => read_inferred_clusters(&QclusterParser, path),
            ClusteringTool::RandomCluster => read_inferred_clusters(&RandomClusterParser, path),
        }
    }
}

impl FromStr for ClusteringTool {
    type Err = EvaluationError;

    fn from_str(s: &str) -> Result<ClusteringTool> {
        ClusteringTool::ALL
            .iter()
            .find(|tool| tool.name() == s)
            .copied()
            .ok_or_else(|| EvaluationError::UnknownTool(s.to_string()))
    }
}

impl fmt::Display for ClusteringTool {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Clusters inferred by a tool: the cluster of each read, and the inverse
/// grouping.
#[derive(Debug, PartialEq, Default)]
pub struct InferredClusters {
    pub clusters: BTreeMap<ReadId, ClusterId>,
    pub cluster_groups: BTreeMap<ClusterId, BTreeSet<ReadId>>,
}

impl InferredClusters {
    pub fn insert(&mut self, read_id: ReadId, cluster_id: ClusterId) {
        self.cluster_groups
            .entry(cluster_id)
            .or_default()
            .insert(read_id.clone());
        if let Some(previous) = self.clusters.insert(read_id.clone(), cluster_id) {
            warn!(
                "Read {} was clustered multiple times, previously into cluster {}",
                read_id, previous
            );
        }
    }

    /// Number of distinct cluster ids.
    pub fn k(&self) -> usize {
        self.cluster_groups.len()
    }

    pub fn cluster_ids(&self) -> BTreeSet<ClusterId> {
        self.cluster_groups.keys().copied().collect()
    }
}

pub fn parse_cluster_id(field: &str) -> std::result::Result<ClusterId, String> {
    field
        .trim()
        .parse::<ClusterId>()
        .map_err(|_| format!("Cluster id '{}' is not an integer", field))
}

/// Every line must carry exactly `expected` fields.
pub fn check_field_count(
    record: &csv::StringRecord,
    expected: usize,
) -> std::result::Result<(), String> {
    if record.len() != expected {
        return Err(format!(
            "Expected exactly {} fields, found {}: {:?}",
            expected,
            record.len(),
            record
        ));
    }
    Ok(())
}

/// Stream a tool's cluster file, failing on the first malformed line.
/// Surrounding whitespace is stripped from each line before it is split on
/// the tool's delimiter, so only interior malformations are fatal. Blank
/// lines are skipped.
pub fn read_inferred_clusters<P: InferredClusterParser>(
    parser: &P,
    path: &Path,
) -> Result<InferredClusters> {
    let file = std::fs::File::open(path).map_err(|e| EvaluationError::io(path, e))?;
    let reader = BufReader::new(file);
    let delimiter = parser.delimiter() as char;

    let mut inferred = InferredClusters::default();
    let mut num_lines = 0usize;
    for (i, line_res) in reader.lines().enumerate() {
        let line = line_res.map_err(|e| EvaluationError::io(path, e))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record = csv::StringRecord::from(line.split(delimiter).collect::<Vec<&str>>());
        let (read_id, cluster_id) = parser
            .parse_record(&record)
            .map_err(|m| EvaluationError::parse(path, i as u64 + 1, m))?;
        trace!("Read {} is in cluster {}", read_id, cluster_id);
        inferred.insert(read_id, cluster_id);
        num_lines += 1;
    }
    debug!(
        "Read in {} {} assignments into {} clusters from {}",
        num_lines,
        parser.method_name(),
        inferred.k(),
        path.display()
    );
    Ok(inferred)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn write_lines(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{}", content).unwrap();
        f.flush().unwrap();
        f
    }

    fn assert_k_consistent(inferred: &InferredClusters) {
        let distinct_values: BTreeSet<ClusterId> = inferred.clusters.values().copied().collect();
        assert_eq!(inferred.k(), inferred.cluster_groups.len());
        assert_eq!(inferred.k(), distinct_values.len());
    }

    #[test]
    fn test_tool_names() {
        init();
        for tool in ClusteringTool::ALL.iter() {
            assert_eq!(*tool, tool.name().parse::<ClusteringTool>().unwrap());
        }
        assert!(matches!(
            "cd-hit".parse::<ClusteringTool>(),
            Err(EvaluationError::UnknownTool(_))
        ));
    }

    #[test]
    fn test_inferred_clusters_path() {
        init();
        assert_eq!(
            PathBuf::from("data/isONclust/n-10/run1/final_clusters.tsv"),
            ClusteringTool::Isonclust.inferred_clusters_path(Path::new("data"), "n-10", "run1")
        );
        assert_eq!(
            PathBuf::from("data/qCluster/n-10/run1/inferred_clusters.tsv"),
            ClusteringTool::Qcluster.inferred_clusters_path(Path::new("data"), "n-10", "run1")
        );
        assert_eq!(
            PathBuf::from("data/random_cluster/n-10/run1/inferred_clusters.tsv"),
            ClusteringTool::RandomCluster.inferred_clusters_path(
                Path::new("data"),
                "n-10",
                "run1"
            )
        );
    }

    #[test]
    fn test_read_isonclust() {
        init();
        let f = write_lines("0\tr1_1_0.98_ccs\n0\tr2_1_0.9_ccs\n1\tr3_2_0.99_ccs\n");
        let inferred = ClusteringTool::Isonclust
            .read_inferred_clusters(f.path())
            .unwrap();
        assert_eq!(2, inferred.k());
        assert_eq!(0, inferred.clusters["r1"]);
        assert_eq!(1, inferred.clusters["r3"]);
        assert_eq!(2, inferred.cluster_groups[&0].len());
        assert_k_consistent(&inferred);
    }

    #[test]
    fn test_read_qcluster() {
        init();
        let f = write_lines("r1 5\nr2 5\nr3 7\nr4 9\n");
        let inferred = ClusteringTool::Qcluster
            .read_inferred_clusters(f.path())
            .unwrap();
        assert_eq!(3, inferred.k());
        assert_eq!(9, inferred.clusters["r4"]);
        assert_k_consistent(&inferred);
    }

    #[test]
    fn test_read_random_cluster() {
        init();
        let f = write_lines("0\tr1\n1\tr2\n0\tr3\n");
        let inferred = ClusteringTool::RandomCluster
            .read_inferred_clusters(f.path())
            .unwrap();
        assert_eq!(2, inferred.k());
        assert_eq!(
            vec!["r1".to_string(), "r3".to_string()],
            inferred.cluster_groups[&0].iter().cloned().collect::<Vec<_>>()
        );
        assert_k_consistent(&inferred);
    }

    #[test]
    fn test_non_integer_cluster_id_is_fatal() {
        init();
        let f = write_lines("r1 5\nr2 five\n");
        assert!(matches!(
            ClusteringTool::Qcluster.read_inferred_clusters(f.path()),
            Err(EvaluationError::Parse { .. })
        ));
    }

    #[test]
    fn test_wrong_field_count_is_fatal() {
        init();
        let f = write_lines("0\tr1\n1\tr2\textra\n");
        assert!(matches!(
            ClusteringTool::RandomCluster.read_inferred_clusters(f.path()),
            Err(EvaluationError::Parse { .. })
        ));
    }

    #[test]
    fn test_surrounding_whitespace_is_stripped() {
        init();
        let f = write_lines("r1 5 \n  r2 5\nr3 7\t\n\n");
        let inferred = ClusteringTool::Qcluster
            .read_inferred_clusters(f.path())
            .unwrap();
        assert_eq!(2, inferred.k());
        assert_eq!(5, inferred.clusters["r1"]);
        assert_eq!(5, inferred.clusters["r2"]);
        assert_eq!(7, inferred.clusters["r3"]);

        let f = write_lines("0\tr1\t\n 1\tr2\n0\tr3 \r\n");
        let inferred = ClusteringTool::RandomCluster
            .read_inferred_clusters(f.path())
            .unwrap();
        assert_eq!(2, inferred.k());
        assert_eq!(
            vec!["r1".to_string(), "r3".to_string()],
            inferred.cluster_groups[&0].iter().cloned().collect::<Vec<_>>()
        );

        let f = write_lines("  0\tr1_1_0.9_ccs\n1\tr2_1_0.9_ccs \n1\tr3_1\t\n");
        let inferred = ClusteringTool::Isonclust
            .read_inferred_clusters(f.path())
            .unwrap();
        assert_eq!(2, inferred.k());
        assert_eq!(0, inferred.clusters["r1"]);
        assert_eq!(1, inferred.clusters["r2"]);
        assert_eq!(1, inferred.clusters["r3"]);
        assert_k_consistent(&inferred);
    }

    #[test]
    fn test_interior_extra_field_is_still_fatal() {
        init();
        let f = write_lines("r1 5\nr2 5 6\n");
        match ClusteringTool::Qcluster.read_inferred_clusters(f.path()) {
            Err(EvaluationError::Parse { line, .. }) => assert_eq!(2, line),
            other => panic!("Unexpected result {:?}", other),
        }
        let f = write_lines("0\tr1\t\tr2\n");
        assert!(matches!(
            ClusteringTool::RandomCluster.read_inferred_clusters(f.path()),
            Err(EvaluationError::Parse { .. })
        ));
        // Two spaces make an empty field between them
        let f = write_lines("r1  5\n");
        assert!(matches!(
            ClusteringTool::Qcluster.read_inferred_clusters(f.path()),
            Err(EvaluationError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        init();
        assert!(matches!(
            ClusteringTool::Isonclust.read_inferred_clusters(Path::new("/nonexistent.tsv")),
            Err(EvaluationError::Io { .. })
        ));
    }

    #[test]
    fn test_empty_file() {
        init();
        let f = write_lines("");
        let inferred = ClusteringTool::Qcluster
            .read_inferred_clusters(f.path())
            .unwrap();
        assert_eq!(0, inferred.k());
        assert!(inferred.clusters.is_empty());
    }
}
