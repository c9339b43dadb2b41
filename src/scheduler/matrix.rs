//! Pairwise dissimilarities over the scheduler's active queries.

use crate::model::{dissimilarity, ConjunctiveQuery};
use crate::{Error, Result};

/// Diagonal value: larger than any real dissimilarity, so a query is
/// never paired with itself.
pub const SENTINEL: u32 = u32::MAX;

/// Symmetric square matrix kept in step with the active query list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DissimilarityMatrix {
    size: usize,
    cells: Vec<u32>,
}

impl DissimilarityMatrix {
    /// All-pairs dissimilarity of `queries`.
    pub fn build(queries: &[ConjunctiveQuery]) -> Self {
        let n = queries.len();
        let mut matrix = Self { size: n, cells: vec![SENTINEL; n * n] };
        for (i, row) in upper_triangle(queries).into_iter().enumerate() {
            for (offset, d) in row.into_iter().enumerate() {
                let j = i + 1 + offset;
                matrix.set(i, j, d);
                matrix.set(j, i, d);
            }
        }
        matrix
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> u32 {
        self.cells[i * self.size + j]
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, value: u32) {
        self.cells[i * self.size + j] = value;
    }

    /// Position of the smallest entry; the first one in row-major order on ties.
    pub fn argmin(&self) -> Option<(usize, usize)> {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .min_by_key(|&(k, &d)| (d, k))
            .map(|(k, _)| (k / size, k % size))
    }

    /// Drop row and column `k`.
    pub fn remove(&mut self, k: usize) -> Result<()> {
        let n = self.size;
        if k >= n {
            return Err(Error::InvalidShape(format!("cannot remove row {k} from {n}x{n} dissimilarity matrix")));
        }
        let mut cells = Vec::with_capacity((n - 1) * (n - 1));
        for i in (0..n).filter(|&i| i != k) {
            for j in (0..n).filter(|&j| j != k) {
                cells.push(self.get(i, j));
            }
        }
        self.size = n - 1;
        self.cells = cells;
        Ok(())
    }

    /// Recompute row and column `l` after `queries[l]` was replaced.
    pub fn refresh(&mut self, l: usize, queries: &[ConjunctiveQuery]) {
        for (j, other) in queries.iter().enumerate() {
            let d = if j == l { SENTINEL } else { dissimilarity(&queries[l], other) };
            self.set(l, j, d);
            self.set(j, l, d);
        }
    }
}

/// Row `i` holds `d(i, j)` for `j > i`.
#[cfg(not(feature = "parallel"))]
fn upper_triangle(queries: &[ConjunctiveQuery]) -> Vec<Vec<u32>> {
    (0..queries.len())
        .map(|i| queries[i + 1..].iter().map(|q| dissimilarity(&queries[i], q)).collect())
        .collect()
}

/// Row `i` holds `d(i, j)` for `j > i`. Rows are computed in parallel;
/// the layout is identical to the sequential version.
#[cfg(feature = "parallel")]
fn upper_triangle(queries: &[ConjunctiveQuery]) -> Vec<Vec<u32>> {
    use rayon::prelude::*;

    (0..queries.len())
        .into_par_iter()
        .map(|i| queries[i + 1..].iter().map(|q| dissimilarity(&queries[i], q)).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn singles(labels: &[&[&str]]) -> Vec<ConjunctiveQuery> {
        labels.iter().map(|l| ConjunctiveQuery::single(l.iter().copied())).collect()
    }

    #[test]
    fn test_build_is_symmetric_with_sentinel_diagonal() {
        let m = DissimilarityMatrix::build(&singles(&[&["A", "B"], &["A"], &["C"]]));
        assert_eq!(m.size(), 3);
        for i in 0..3 {
            assert_eq!(m.get(i, i), SENTINEL);
            for j in 0..3 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
        assert_eq!(m.get(0, 1), 1);
        assert_eq!(m.get(0, 2), 3);
        assert_eq!(m.get(1, 2), 2);
    }

    #[test]
    fn test_argmin_prefers_first_row_major() {
        let m = DissimilarityMatrix::build(&singles(&[&["A"], &["B"], &["C"]]));
        // Every off-diagonal entry is 2; (0, 1) comes first.
        assert_eq!(m.argmin(), Some((0, 1)));
    }

    #[test]
    fn test_remove_and_refresh() {
        let mut queries = singles(&[&["A", "B"], &["A"], &["C"]]);
        let mut m = DissimilarityMatrix::build(&queries);
        queries.remove(1);
        m.remove(1).unwrap();
        assert_eq!(m.size(), 2);
        assert_eq!(m.get(0, 1), 3);

        queries[0] = ConjunctiveQuery::single(["C"]);
        m.refresh(0, &queries);
        assert_eq!(m.get(0, 1), 0);
        assert_eq!(m.get(0, 0), SENTINEL);
    }

    #[test]
    fn test_empty_matrix_has_no_argmin() {
        assert_eq!(DissimilarityMatrix::build(&[]).argmin(), None);
    }

    #[test]
    fn test_remove_out_of_range_leaves_matrix_intact() {
        let mut m = DissimilarityMatrix::build(&singles(&[&["A"], &["B"]]));
        let before = m.clone();
        assert!(matches!(m.remove(2), Err(Error::InvalidShape(_))));
        assert_eq!(m, before);

        let mut empty = DissimilarityMatrix::build(&[]);
        assert!(empty.remove(0).is_err());
        assert_eq!(empty.size(), 0);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_build_matches_pairwise() {
        let labels: [&[&str]; 8] = [
            &["A", "B"], &["A"], &["C"], &["A", "C"], &["B"], &["A", "B", "C"], &["D"], &["B", "D"],
        ];
        let queries = singles(&labels);
        let m = DissimilarityMatrix::build(&queries);

        let mut expected_min = None;
        for i in 0..queries.len() {
            for j in 0..queries.len() {
                let d = if i == j { SENTINEL } else { dissimilarity(&queries[i], &queries[j]) };
                assert_eq!(m.get(i, j), d, "cell ({i}, {j})");
                if expected_min.is_none_or(|(best, _)| d < best) {
                    expected_min = Some((d, (i, j)));
                }
            }
        }
        assert_eq!(m.argmin(), expected_min.map(|(_, at)| at));
    }
}
