//! Dense square boolean adjacency matrix.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Square `n × n` boolean matrix stored row-major.
///
/// Entry `[i, j]` set means "node i is related to node j".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<bool>>", into = "Vec<Vec<bool>>")]
pub struct AdjacencyMatrix {
    size: usize,
    cells: Vec<bool>,
}

impl AdjacencyMatrix {
    /// All-false matrix of the given size.
    pub fn new(size: usize) -> Self {
        Self { size, cells: vec![false; size * size] }
    }

    /// Build from nested rows. Every row must have as many entries as there are rows.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(Error::InvalidShape(format!(
                    "row {i} has {} entries, expected {size}",
                    row.len()
                )));
            }
            cells.extend(row);
        }
        Ok(Self { size, cells })
    }

    /// Build from a list of `(row, col)` edges.
    pub fn from_edges(size: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Result<Self> {
        let mut matrix = Self::new(size);
        for (i, j) in edges {
            if i >= size || j >= size {
                return Err(Error::InvalidShape(format!("edge ({i}, {j}) outside {size}x{size} matrix")));
            }
            matrix.set(i, j, true);
        }
        Ok(matrix)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> bool {
        self.cells[i * self.size + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: bool) {
        self.cells[i * self.size + j] = value;
    }

    /// Number of set entries in row `i` (edges leaving node i).
    pub fn row_count(&self, i: usize) -> u32 {
        self.row(i).iter().filter(|&&b| b).count() as u32
    }

    /// Number of set entries in column `j` (edges entering node j).
    pub fn col_count(&self, j: usize) -> u32 {
        (0..self.size).filter(|&i| self.get(i, j)).count() as u32
    }

    pub fn row(&self, i: usize) -> &[bool] {
        &self.cells[i * self.size..(i + 1) * self.size]
    }

    /// Total number of set entries.
    pub fn edge_count(&self) -> usize {
        self.cells.iter().filter(|&&b| b).count()
    }

    /// Set entries in row-major order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b)
            .map(move |(k, _)| (k / size, k % size))
    }

    /// Drop row `k` and column `k`.
    pub fn remove_index(&mut self, k: usize) -> Result<()> {
        if k >= self.size {
            return Err(Error::NodeOutOfRange { index: k, node_count: self.size });
        }
        let keep: Vec<usize> = (0..self.size).filter(|&i| i != k).collect();
        *self = self.select(&keep);
        Ok(())
    }

    /// Kronecker product: entry `[(i1, j1), (i2, j2)]` is set iff
    /// `self[i1, i2]` and `other[j1, j2]` are both set, where the product
    /// index of `(i, j)` is `i * other.size + j`.
    pub fn kron(&self, other: &Self) -> Self {
        let m = other.size;
        let mut out = Self::new(self.size * m);
        for (i1, i2) in self.edges() {
            for (j1, j2) in other.edges() {
                out.set(i1 * m + j1, i2 * m + j2, true);
            }
        }
        out
    }

    /// Rows and columns of `self` picked out (and reordered) by `indices`.
    pub fn select(&self, indices: &[usize]) -> Self {
        let n = indices.len();
        let mut out = Self::new(n);
        for (a, &i) in indices.iter().enumerate() {
            for (b, &j) in indices.iter().enumerate() {
                out.set(a, b, self.get(i, j));
            }
        }
        out
    }

    /// Elementwise AND of two equally sized matrices.
    pub fn and(&self, other: &Self) -> Result<Self> {
        if self.size != other.size {
            return Err(Error::InvalidShape(format!(
                "cannot AND {0}x{0} with {1}x{1}",
                self.size, other.size
            )));
        }
        let cells = self.cells.iter().zip(&other.cells).map(|(&a, &b)| a && b).collect();
        Ok(Self { size: self.size, cells })
    }
}

impl TryFrom<Vec<Vec<bool>>> for AdjacencyMatrix {
    type Error = Error;

    fn try_from(rows: Vec<Vec<bool>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<AdjacencyMatrix> for Vec<Vec<bool>> {
    fn from(matrix: AdjacencyMatrix) -> Self {
        matrix.cells.chunks(matrix.size.max(1)).take(matrix.size).map(<[bool]>::to_vec).collect()
    }
}

impl fmt::Display for AdjacencyMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.size {
            let row: String = self.row(i).iter().map(|&b| if b { '1' } else { '.' }).collect();
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
