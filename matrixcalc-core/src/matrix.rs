//! Core matrix type

use std::fmt;
use nalgebra::DMatrix;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use crate::{fmt_num, CalcError, CalcResult};

/// Default bound on rows and columns of any matrix the engine accepts
pub const DEFAULT_MAX_DIM: usize = 10;

/// Default tolerance for singularity and equality checks
pub const DEFAULT_EPSILON: f64 = 1e-10;

/// A non-empty rectangular matrix of finite `f64` values
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: DMatrix<f64>,
}

impl Matrix {
    /// Build from nested rows, validating shape and finiteness.
    ///
    /// `label` names the input in error messages (e.g. `matrixA`).
    pub fn from_rows(rows: &[Vec<f64>], label: &str) -> CalcResult<Self> {
        if rows.is_empty() {
            return Err(CalcError::validation(format!("{}: matrix cannot be empty", label)));
        }

        let cols = rows[0].len();
        if cols == 0 {
            return Err(CalcError::validation(format!("{}: rows cannot be empty", label)));
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(CalcError::validation(format!(
                    "{}: row {} has {} columns, expected {}",
                    label, i + 1, row.len(), cols
                )));
            }
            if let Some(j) = row.iter().position(|v| !v.is_finite()) {
                return Err(CalcError::validation(format!(
                    "{}[{}][{}] must be a finite number", label, i + 1, j + 1
                )));
            }
        }

        Ok(Matrix {
            data: DMatrix::from_fn(rows.len(), cols, |i, j| rows[i][j]),
        })
    }

    /// Wrap an nalgebra matrix produced by the engine
    pub fn from_dmatrix(data: DMatrix<f64>) -> Self {
        Matrix { data }
    }

    /// n×n identity
    pub fn identity(n: usize) -> Self {
        Matrix { data: DMatrix::identity(n, n) }
    }

    /// rows×cols of zeros
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix { data: DMatrix::zeros(rows, cols) }
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    pub fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    /// Element at (row, col); indices must be in range
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.data[(row, col)]
    }

    pub fn as_dmatrix(&self) -> &DMatrix<f64> {
        &self.data
    }

    pub fn into_dmatrix(self) -> DMatrix<f64> {
        self.data
    }

    /// Row `i` as a plain vector
    pub fn row_vec(&self, i: usize) -> Vec<f64> {
        self.data.row(i).iter().copied().collect()
    }

    /// Nested rows, outer = rows
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows()).map(|i| self.row_vec(i)).collect()
    }

    /// All elements in row-major order
    pub fn flatten(&self) -> Vec<f64> {
        self.to_rows().into_iter().flatten().collect()
    }

    /// True when every element is finite
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Element-wise comparison within `eps`; false on shape mismatch
    pub fn approx_eq(&self, other: &Matrix, eps: f64) -> bool {
        self.shape() == other.shape()
            && self.data.iter().zip(other.data.iter()).all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for i in 0..self.rows() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for j in 0..self.cols() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", fmt_num(self.at(i, j)))?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

/// Serialized as an array of row arrays
impl Serialize for Matrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows()))?;
        for i in 0..self.rows() {
            seq.serialize_element(&self.row_vec(i))?;
        }
        seq.end()
    }
}
