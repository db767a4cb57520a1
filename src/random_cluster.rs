use crate::inferred_clusters::{check_field_count, parse_cluster_id};
use crate::{ClusterId, InferredClusterParser, ReadId};

/// The random clustering baseline writes `<cluster id>\t<read id>`.
pub struct RandomClusterParser;

impl InferredClusterParser for RandomClusterParser {
    fn method_name(&self) -> &str {
        "random_cluster"
    }

    fn inferred_clusters_file_name(&self) -> &str {
        "inferred_clusters.tsv"
    }

    fn delimiter(&self) -> u8 {
        b'\t'
    }

    fn parse_record(&self, record: &csv::StringRecord) -> Result<(ReadId, ClusterId), String> {
        check_field_count(record, 2)?;
        Ok((record[1].to_string(), parse_cluster_id(&record[0])?))
    }
}
