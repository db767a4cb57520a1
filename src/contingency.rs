use std::collections::BTreeMap;

/// Sparse cross-tabulation of true classes (rows) against predicted clusters
/// (columns). Only non-zero cells are stored.
#[derive(Debug, PartialEq)]
pub struct ContingencyTable {
    /// ((row, column), count)
    cells: BTreeMap<(usize, usize), u64>,
    row_sums: Vec<u64>,
    column_sums: Vec<u64>,
    n: u64,
}

impl ContingencyTable {
    pub fn from_labels<T: Ord, P: Ord>(true_labels: &[T], pred_labels: &[P]) -> ContingencyTable {
        assert_eq!(true_labels.len(), pred_labels.len());

        let mut rows: BTreeMap<&T, usize> = BTreeMap::new();
        let mut columns: BTreeMap<&P, usize> = BTreeMap::new();
        let mut cells = BTreeMap::new();
        let mut row_sums = vec![];
        let mut column_sums = vec![];

        for (t, p) in true_labels.iter().zip(pred_labels.iter()) {
            let next_row = rows.len();
            let row = *rows.entry(t).or_insert(next_row);
            if row == row_sums.len() {
                row_sums.push(0);
            }
            let next_column = columns.len();
            let column = *columns.entry(p).or_insert(next_column);
            if column == column_sums.len() {
                column_sums.push(0);
            }

            *cells.entry((row, column)).or_insert(0) += 1;
            row_sums[row] += 1;
            column_sums[column] += 1;
        }

        ContingencyTable {
            cells,
            row_sums,
            column_sums,
            n: true_labels.len() as u64,
        }
    }

    pub fn n(&self) -> u64 {
        self.n
    }

    pub fn num_rows(&self) -> usize {
        self.row_sums.len()
    }

    pub fn num_columns(&self) -> usize {
        self.column_sums.len()
    }

    /// Class sizes.
    pub fn row_sums(&self) -> &[u64] {
        &self.row_sums
    }

    /// Cluster sizes.
    pub fn column_sums(&self) -> &[u64] {
        &self.column_sums
    }

    /// Non-zero cells as (row, column, count).
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, u64)> + '_ {
        self.cells.iter().map(|(&(r, c), &count)| (r, c, count))
    }

    /// Sum over columns of the largest cell in each column.
    pub fn sum_of_column_maxima(&self) -> u64 {
        let mut maxima = vec![0u64; self.num_columns()];
        for (_, c, count) in self.cells() {
            maxima[c] = maxima[c].max(count);
        }
        maxima.iter().sum()
    }

    /// Sum over rows of the largest cell in each row.
    pub fn sum_of_row_maxima(&self) -> u64 {
        let mut maxima = vec![0u64; self.num_rows()];
        for (r, _, count) in self.cells() {
            maxima[r] = maxima[r].max(count);
        }
        maxima.iter().sum()
    }
}
