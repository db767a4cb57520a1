use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::error::EvaluationError;
use crate::{ClassLabel, ReadId, Result};

/// Minimum number of columns in a SAM alignment record.
const SAM_MANDATORY_FIELDS: usize = 11;

/// Ground truth of a simulated dataset: the class every read came from, and
/// the inverse grouping.
#[derive(Debug, PartialEq)]
pub struct GroundTruth {
    pub classes: BTreeMap<ReadId, ClassLabel>,
    pub class_groups: BTreeMap<ClassLabel, BTreeSet<ReadId>>,
}

impl GroundTruth {
    /// Builds the maps from (read, class) pairs in order. A repeated read id
    /// takes the class of its last occurrence in `classes`, but stays a member
    /// of every class group it was seen in.
    pub fn from_pairs<I: IntoIterator<Item = (ReadId, ClassLabel)>>(pairs: I) -> GroundTruth {
        let mut classes = BTreeMap::new();
        let mut class_groups: BTreeMap<ClassLabel, BTreeSet<ReadId>> = BTreeMap::new();
        for (read_id, class) in pairs {
            class_groups
                .entry(class.clone())
                .or_default()
                .insert(read_id.clone());
            if let Some(previous) = classes.insert(read_id.clone(), class) {
                warn!(
                    "Read {} was found multiple times in the ground truth, previously with class {}",
                    read_id, previous
                );
            }
        }
        GroundTruth {
            classes,
            class_groups,
        }
    }

    pub fn num_reads(&self) -> usize {
        self.classes.len()
    }
}

/// Split a simulated query name into its read id and class, e.g.
/// `m0/100/CCS ...;...;...;fn=ENSG01|ENST01` gives `m0/100/CCS` and
/// `ENSG01|ENST01`.
pub fn parse_query_name(query_name: &str) -> std::result::Result<(ReadId, ClassLabel), String> {
    let read_id = query_name.split(' ').next().unwrap_or("");
    if read_id.is_empty() {
        return Err(format!("Empty read id in query name '{}'", query_name));
    }
    let metadata = query_name.split(';').nth(3).ok_or_else(|| {
        format!(
            "Expected at least 4 ';'-separated fields in query name '{}'",
            query_name
        )
    })?;
    let class = metadata.split('=').nth(1).ok_or_else(|| {
        format!(
            "Expected key=value in 4th field '{}' of query name '{}'",
            metadata, query_name
        )
    })?;
    Ok((read_id.to_string(), class.to_string()))
}

/// Read the SAM file written by the read simulator, taking the class of each
/// read from its query name.
pub fn read_ground_truth(sam_path: &Path) -> Result<GroundTruth> {
    let file = std::fs::File::open(sam_path).map_err(|e| EvaluationError::io(sam_path, e))?;
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .comment(Some(b'@'))
        .from_reader(file);

    let mut pairs = vec![];
    for record_res in rdr.records() {
        let record = record_res.map_err(|e| EvaluationError::csv(sam_path, e))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() < SAM_MANDATORY_FIELDS {
            return Err(EvaluationError::parse(
                sam_path,
                line,
                format!(
                    "Expected at least {} fields in SAM record, found {}",
                    SAM_MANDATORY_FIELDS,
                    record.len()
                ),
            ));
        }
        let pair =
            parse_query_name(&record[0]).map_err(|m| EvaluationError::parse(sam_path, line, m))?;
        trace!("Read {} has class {}", pair.0, pair.1);
        pairs.push(pair);
    }
    debug!("Read in {} records from {}", pairs.len(), sam_path.display());

    Ok(GroundTruth::from_pairs(pairs))
}
