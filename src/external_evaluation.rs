use std::fmt;

use crate::contingency::ContingencyTable;
use crate::labels::LabelPairs;

/// External cluster validation compares a clustering to the known classes of
/// the reads. Every score is 1 for a perfect clustering.
#[derive(Debug, PartialEq, Clone)]
pub struct ExternalEvaluation {
    /// Range [0, 1]. Each cluster contains members of a single class only.
    pub homogeneity: f64,
    /// Range [0, 1]. All members of a class are in the same cluster.
    pub completeness: f64,
    /// Harmonic mean of homogeneity and completeness, range [0, 1].
    pub v_measure: f64,
    /// Range [-1, 1].
    pub adjusted_mutual_information: f64,
    /// Range [-1, 1], close to 0 for random labelings.
    pub adjusted_rand_index: f64,
    /// Geometric mean of pairwise precision and recall, range [0, 1].
    pub fowlkes_mallows: f64,
    /// Range [0, 1].
    pub purity: f64,
    /// Range [0, 1].
    pub inverse_purity: f64,
}

/// Score predicted labels against true labels. `None` when there are no
/// labels to compare.
pub fn compute_external_metrics(labels: &LabelPairs) -> Option<ExternalEvaluation> {
    if labels.is_empty() {
        return None;
    }
    let table = ContingencyTable::from_labels(&labels.true_labels, &labels.pred_labels);
    Some(ExternalEvaluation::from_contingency(&table))
}

impl ExternalEvaluation {
    /// All scores from one shared table. The table must not be empty.
    pub fn from_contingency(table: &ContingencyTable) -> ExternalEvaluation {
        let n = table.n() as f64;
        let mi = mutual_information(table);
        let entropy_true = entropy(table.row_sums(), table.n());
        let entropy_pred = entropy(table.column_sums(), table.n());

        let homogeneity = if entropy_true == 0.0 {
            1.0
        } else {
            mi / entropy_true
        };
        let completeness = if entropy_pred == 0.0 {
            1.0
        } else {
            mi / entropy_pred
        };
        let v_measure = if homogeneity + completeness == 0.0 {
            0.0
        } else {
            2.0 * homogeneity * completeness / (homogeneity + completeness)
        };

        ExternalEvaluation {
            homogeneity,
            completeness,
            v_measure,
            adjusted_mutual_information: adjusted_mutual_information(
                table,
                mi,
                entropy_true,
                entropy_pred,
            ),
            adjusted_rand_index: adjusted_rand_index(table),
            fowlkes_mallows: fowlkes_mallows(table),
            purity: table.sum_of_column_maxima() as f64 / n,
            inverse_purity: table.sum_of_row_maxima() as f64 / n,
        }
    }
}

impl fmt::Display for ExternalEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "homogeneity: {}, completeness: {}, V-measure: {}, adjusted mutual information: {}, \
             adjusted RI: {}, Fowlkes-Mallows: {}, purity: {}, inverse purity: {}",
            self.homogeneity,
            self.completeness,
            self.v_measure,
            self.adjusted_mutual_information,
            self.adjusted_rand_index,
            self.fowlkes_mallows,
            self.purity,
            self.inverse_purity
        )
    }
}

/// Shannon entropy in nats of a labeling given its label counts.
fn entropy(counts: &[u64], n: u64) -> f64 {
    if counts.len() <= 1 {
        return 0.0;
    }
    let n = n as f64;
    -counts
        .iter()
        .filter(|c| **c > 0)
        .map(|c| {
            let p = *c as f64 / n;
            p * p.ln()
        })
        .sum::<f64>()
}

fn mutual_information(table: &ContingencyTable) -> f64 {
    if table.num_rows() <= 1 || table.num_columns() <= 1 {
        return 0.0;
    }
    let n = table.n() as f64;
    let a = table.row_sums();
    let b = table.column_sums();
    let mi: f64 = table
        .cells()
        .map(|(r, c, count)| {
            let nij = count as f64;
            nij / n * (nij.ln() + n.ln() - (a[r] as f64).ln() - (b[c] as f64).ln())
        })
        .sum();
    mi.max(0.0)
}

/// ln(m!) for m in 0..=n.
fn log_factorials(n: u64) -> Vec<f64> {
    let mut table = Vec::with_capacity(n as usize + 1);
    let mut acc = 0.0;
    table.push(acc);
    for m in 1..=n {
        acc += (m as f64).ln();
        table.push(acc);
    }
    table
}

/// Expected mutual information of two random labelings with the same
/// marginals as the table, under the hypergeometric model.
fn expected_mutual_information(table: &ContingencyTable) -> f64 {
    let a = table.row_sums();
    let b = table.column_sums();
    if a.len() == 1 || b.len() == 1 {
        return 0.0;
    }
    let n = table.n();
    let nf = n as f64;
    let log_factorial = log_factorials(n);
    let lf = |m: u64| log_factorial[m as usize];

    let mut emi = 0.0;
    for &ai in a {
        for &bj in b {
            let start = std::cmp::max(1, (ai + bj).saturating_sub(n));
            let end = std::cmp::min(ai, bj);
            let fixed = lf(ai) + lf(bj) + lf(n - ai) + lf(n - bj) - lf(n);
            for nij in start..=end {
                let nijf = nij as f64;
                let term1 = nijf / nf;
                let term2 = (nf * nijf).ln() - (ai as f64).ln() - (bj as f64).ln();
                let gln = fixed - lf(nij) - lf(ai - nij) - lf(bj - nij) - lf(n + nij - ai - bj);
                emi += term1 * term2 * gln.exp();
            }
        }
    }
    emi
}

fn adjusted_mutual_information(
    table: &ContingencyTable,
    mi: f64,
    entropy_true: f64,
    entropy_pred: f64,
) -> f64 {
    // Identical trivial partitions
    if table.num_rows() == table.num_columns() && table.num_rows() <= 1 {
        return 1.0;
    }
    let emi = expected_mutual_information(table);
    let normalizer = (entropy_true + entropy_pred) / 2.0;
    let mut denominator = normalizer - emi;
    if denominator < 0.0 {
        denominator = denominator.min(-f64::EPSILON);
    } else {
        denominator = denominator.max(f64::EPSILON);
    }
    (mi - emi) / denominator
}

fn sum_of_squares(values: &[u64]) -> i128 {
    values.iter().map(|&v| i128::from(v) * i128::from(v)).sum()
}

fn sum_of_squared_cells(table: &ContingencyTable) -> i128 {
    table
        .cells()
        .map(|(_, _, count)| i128::from(count) * i128::from(count))
        .sum()
}

/// Pair confusion matrix entries (tn, fp, fn, tp), counting ordered pairs.
/// Kept as exact integers: each is O(n^2) and the adjusted rand index
/// multiplies them, which f64 cannot hold exactly past a few thousand reads.
fn pair_confusion(table: &ContingencyTable) -> (i128, i128, i128, i128) {
    let n = i128::from(table.n());
    let squares = sum_of_squared_cells(table);
    let tp = squares - n;
    let fp = sum_of_squares(table.column_sums()) - squares;
    let false_negatives = sum_of_squares(table.row_sums()) - squares;
    let tn = n * n - fp - false_negatives - squares;
    (tn, fp, false_negatives, tp)
}

fn adjusted_rand_index(table: &ContingencyTable) -> f64 {
    let (tn, fp, false_negatives, tp) = pair_confusion(table);
    if false_negatives == 0 && fp == 0 {
        return 1.0;
    }
    let numerator = 2 * (tp * tn - false_negatives * fp);
    let denominator = (tp + false_negatives) * (false_negatives + tn) + (tp + fp) * (fp + tn);
    numerator as f64 / denominator as f64
}

fn fowlkes_mallows(table: &ContingencyTable) -> f64 {
    let n = i128::from(table.n());
    let tk = sum_of_squared_cells(table) - n;
    if tk == 0 {
        return 0.0;
    }
    let pk = sum_of_squares(table.column_sums()) - n;
    let qk = sum_of_squares(table.row_sums()) - n;
    (tk as f64 / pk as f64).sqrt() * (tk as f64 / qk as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn assert_close(expected: f64, actual: f64) {
        assert!(
            (expected - actual).abs() < 1e-9,
            "expected {} but found {}",
            expected,
            actual
        );
    }

    fn evaluate(true_labels: &[&str], pred_labels: &[i64]) -> ExternalEvaluation {
        compute_external_metrics(&LabelPairs {
            true_labels: true_labels.to_vec(),
            pred_labels: pred_labels.to_vec(),
        })
        .unwrap()
    }

    /// Deterministic labels spread over `k` values.
    fn pseudo_random_labels(n: usize, k: u64, seed: u64) -> Vec<i64> {
        let mut state = seed;
        (0..n)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                ((state >> 33) % k) as i64
            })
            .collect()
    }

    #[test]
    fn test_empty_is_absent() {
        init();
        assert_eq!(None, compute_external_metrics(&LabelPairs::default()));
    }

    #[test]
    fn test_perfect_clustering() {
        init();
        let e = evaluate(&["A", "A", "B", "B"], &[0, 0, 1, 1]);
        assert_close(1.0, e.purity);
        assert_close(1.0, e.inverse_purity);
        assert_close(1.0, e.adjusted_rand_index);
        assert_close(1.0, e.adjusted_mutual_information);
        assert_close(1.0, e.homogeneity);
        assert_close(1.0, e.completeness);
        assert_close(1.0, e.v_measure);
        assert_close(1.0, e.fowlkes_mallows);
    }

    #[test]
    fn test_poor_clustering() {
        init();
        let e = evaluate(&["A", "A", "B", "B"], &[0, 1, 0, 1]);
        assert_close(0.5, e.purity);
        assert_close(0.5, e.inverse_purity);
        assert_close(-0.5, e.adjusted_rand_index);
        assert_close(0.0, e.homogeneity);
        assert_close(0.0, e.completeness);
        assert_close(0.0, e.v_measure);
        assert_close(0.0, e.fowlkes_mallows);
        assert!(e.adjusted_mutual_information < 0.0);
    }

    #[test]
    fn test_split_class() {
        init();
        // One class split in two clusters: homogeneous but not complete
        let e = evaluate(&["A", "A", "B", "B"], &[0, 0, 1, 2]);
        assert_close(1.0, e.homogeneity);
        assert_close(2.0 / 3.0, e.completeness);
        assert_close(0.8, e.v_measure);
        assert_close(1.0, e.purity);
        assert_close(0.75, e.inverse_purity);
        assert_close(0.5f64.sqrt(), e.fowlkes_mallows);
        assert_close(4.0 / 7.0, e.adjusted_rand_index);
    }

    #[test]
    fn test_pair_counts_are_exact_for_many_reads() {
        init();
        // 2 classes of 50000 reads, each split evenly over 2 clusters
        let n = 100_000;
        let true_labels: Vec<&str> = (0..n).map(|i| if i < n / 2 { "A" } else { "B" }).collect();
        let pred_labels: Vec<i64> = (0..n).map(|i| (i / (n / 4)) as i64).collect();
        let table = ContingencyTable::from_labels(&true_labels, &pred_labels);

        let (tn, fp, false_negatives, tp) = pair_confusion(&table);
        assert_eq!(2_499_900_000, tp);
        assert_eq!(0, fp);
        assert_eq!(2_500_000_000, false_negatives);
        assert_eq!(5_000_000_000, tn);
        assert_eq!(10_000_000_000, tn + fp + false_negatives + tp + n as i128);

        // tp * tn alone is beyond 2^53
        let e = evaluate(&true_labels, &pred_labels);
        assert!((0.49999249981249533 - e.adjusted_rand_index).abs() < 1e-15);
        assert!((0.7070997099419544 - e.fowlkes_mallows).abs() < 1e-15);
        assert_close(1.0, e.homogeneity);
        assert_close(0.5, e.inverse_purity);
    }

    #[test]
    fn test_single_class_against_singletons() {
        init();
        let e = evaluate(&["A", "A", "A", "A"], &[0, 1, 2, 3]);
        assert_close(0.0, e.adjusted_mutual_information);
        assert_close(1.0, e.homogeneity);
        assert_close(0.0, e.completeness);
        assert_close(1.0, e.purity);
        assert_close(0.25, e.inverse_purity);
    }

    #[test]
    fn test_single_class_single_cluster() {
        init();
        let e = evaluate(&["A", "A", "A"], &[4, 4, 4]);
        assert_close(1.0, e.adjusted_mutual_information);
        assert_close(1.0, e.adjusted_rand_index);
        assert_close(1.0, e.v_measure);
        assert_close(1.0, e.fowlkes_mallows);
    }

    #[test]
    fn test_relabeling_is_perfect() {
        init();
        let classes = ["t1", "t2", "t3", "t4", "t5"];
        let raw = pseudo_random_labels(200, 5, 7);
        let true_labels: Vec<&str> = raw.iter().map(|i| classes[*i as usize]).collect();
        let pred_labels: Vec<i64> = raw.iter().map(|i| 100 - 3 * i).collect();
        let e = evaluate(&true_labels, &pred_labels);
        assert_close(1.0, e.adjusted_rand_index);
        assert_close(1.0, e.adjusted_mutual_information);
        assert_close(1.0, e.purity);
        assert_close(1.0, e.inverse_purity);
    }

    #[test]
    fn test_random_labeling_scores_near_zero() {
        init();
        let classes = ["t1", "t2", "t3", "t4", "t5"];
        let true_labels: Vec<&str> = pseudo_random_labels(2000, 5, 1)
            .iter()
            .map(|i| classes[*i as usize])
            .collect();
        let pred_labels = pseudo_random_labels(2000, 5, 99);
        let e = evaluate(&true_labels, &pred_labels);
        assert!(e.adjusted_rand_index.abs() < 0.05, "{}", e);
        assert!(e.adjusted_mutual_information.abs() < 0.05, "{}", e);
        for v in &[e.purity, e.inverse_purity, e.fowlkes_mallows, e.v_measure] {
            assert!(*v >= 0.0 && *v <= 1.0);
        }
    }

    #[test]
    fn test_expected_mutual_information_two_by_two() {
        init();
        let table = ContingencyTable::from_labels(&["A", "A", "B", "B"], &[0, 0, 1, 1]);
        assert_close(2f64.ln() / 3.0, expected_mutual_information(&table));
    }
}
