use crate::inferred_clusters::{check_field_count, parse_cluster_id};
use crate::{ClusterId, InferredClusterParser, ReadId};

/// isONclust writes `<cluster id>\t<read header>`, where the header carries
/// extra `_`-separated annotations after the read id.
pub struct IsonclustParser;

impl InferredClusterParser for IsonclustParser {
    fn method_name(&self) -> &str {
        "isONclust"
    }

    fn inferred_clusters_file_name(&self) -> &str {
        "final_clusters.tsv"
    }

    fn delimiter(&self) -> u8 {
        b'\t'
    }

    fn parse_record(&self, record: &csv::StringRecord) -> Result<(ReadId, ClusterId), String> {
        check_field_count(record, 2)?;
        let cluster_id = parse_cluster_id(&record[0])?;
        // e.g. 'm99726/100/CCS_1_0.98_ccs'
        let read_id = record[1].split('_').next().unwrap_or("");
        if read_id.is_empty() {
            return Err(format!("Empty read id in header '{}'", &record[1]));
        }
        Ok((read_id.to_string(), cluster_id))
    }
}
