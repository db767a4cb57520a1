use crate::inferred_clusters::{check_field_count, parse_cluster_id};
use crate::{ClusterId, InferredClusterParser, ReadId};

/// qCluster writes `<read id> <cluster id>`, space separated.
pub struct QclusterParser;

impl InferredClusterParser for QclusterParser {
    fn method_name(&self) -> &str {
        "qCluster"
    }

    fn inferred_clusters_file_name(&self) -> &str {
        "inferred_clusters.tsv"
    }

    fn delimiter(&self) -> u8 {
        b' '
    }

    fn parse_record(&self, record: &csv::StringRecord) -> Result<(ReadId, ClusterId), String> {
        check_field_count(record, 2)?;
        Ok((record[0].to_string(), parse_cluster_id(&record[1])?))
    }
}
