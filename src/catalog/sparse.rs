use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Sparse matrix in compressed-sparse-row layout
///
/// Matches the CSR artifact emitted by the vectorization pipeline: row `i`
/// occupies `indices[indptr[i]..indptr[i + 1]]` / `data[indptr[i]..indptr[i + 1]]`,
/// with column indices sorted ascending within each row.
#[derive(Debug, Clone, Deserialize)]
pub struct CsrMatrix {
    pub rows: usize,
    pub cols: usize,
    pub indptr: Vec<usize>,
    pub indices: Vec<u32>,
    pub data: Vec<f64>,
}

impl CsrMatrix {
    /// Checks the structural CSR invariants
    pub fn validate(&self) -> AppResult<()> {
        if self.indptr.len() != self.rows + 1 {
            return Err(AppError::MalformedInput(format!(
                "CSR indptr length {} does not match {} rows",
                self.indptr.len(),
                self.rows
            )));
        }
        if self.indices.len() != self.data.len() {
            return Err(AppError::MalformedInput(format!(
                "CSR indices length {} does not match data length {}",
                self.indices.len(),
                self.data.len()
            )));
        }
        if self.indptr.first() != Some(&0) || self.indptr.last() != Some(&self.data.len()) {
            return Err(AppError::MalformedInput(
                "CSR indptr endpoints do not span the data array".to_string(),
            ));
        }
        if self.indptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(AppError::MalformedInput(
                "CSR indptr is not monotonically non-decreasing".to_string(),
            ));
        }
        if self.indices.iter().any(|&j| j as usize >= self.cols) {
            return Err(AppError::MalformedInput(format!(
                "CSR column index out of range for {} columns",
                self.cols
            )));
        }
        Ok(())
    }

    /// Borrows row `i` as a sparse slice; `None` past the last row
    pub fn row(&self, i: usize) -> Option<SparseSlice<'_>> {
        if i >= self.rows {
            return None;
        }
        let (start, end) = (self.indptr[i], self.indptr[i + 1]);
        Some(SparseSlice {
            indices: &self.indices[start..end],
            values: &self.data[start..end],
        })
    }
}

/// Borrowed view over one sparse row
#[derive(Debug, Clone, Copy)]
pub struct SparseSlice<'a> {
    pub indices: &'a [u32],
    pub values: &'a [f64],
}

/// Owned sparse vector with ascending column indices
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVec {
    pub indices: Vec<u32>,
    pub values: Vec<f64>,
}

impl SparseVec {
    /// Collects the nonzero entries of a dense vector
    pub fn from_dense(dense: &[f64]) -> Self {
        let mut indices = Vec::new();
        let mut values = Vec::new();
        for (j, &v) in dense.iter().enumerate() {
            if v != 0.0 {
                indices.push(j as u32);
                values.push(v);
            }
        }
        Self { indices, values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// L2 norm over the explicitly stored values
    pub fn norm(&self) -> f64 {
        l2_norm(&self.values)
    }

    pub fn as_slice(&self) -> SparseSlice<'_> {
        SparseSlice {
            indices: &self.indices,
            values: &self.values,
        }
    }

    /// Divides every stored value in place
    pub fn scale_down(&mut self, divisor: f64) {
        for v in &mut self.values {
            *v /= divisor;
        }
    }
}

/// L2 norm of an explicit value slice (implicit zeros contribute nothing)
pub fn l2_norm(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// Dot product of two sparse slices via a merge walk over sorted indices
pub fn dot(a: SparseSlice<'_>, b: SparseSlice<'_>) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut sum = 0.0;
    while i < a.indices.len() && j < b.indices.len() {
        match a.indices[i].cmp(&b.indices[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a.values[i] * b.values[j];
                i += 1;
                j += 1;
            }
        }
    }
    sum
}

/// Cosine similarity of two sparse slices
///
/// Computes the full dot / (|a|·|b|) formula rather than assuming either side
/// is pre-normalized; zero-norm operands score 0.0.
pub fn cosine(a: SparseSlice<'_>, b: SparseSlice<'_>) -> f64 {
    let denom = l2_norm(a.values) * l2_norm(b.values);
    if denom == 0.0 {
        return 0.0;
    }
    dot(a, b) / denom
}
