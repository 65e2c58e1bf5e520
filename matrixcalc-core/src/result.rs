//! Operation results
//!
//! Each operation produces exactly one of these shapes. The serialized form
//! follows the calculator's rendering contract rather than serde's default
//! enum tagging.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use crate::{fmt_num, Matrix};

#[derive(Debug, Clone, PartialEq)]
pub enum OpResult {
    Matrix(Matrix),
    Scalar(f64),
    /// Integer result (rank)
    Count(usize),
    /// Boolean-style result rendered as a display string ("Yes", "Equal")
    Label(String),
    Dimensions { rows: usize, cols: usize },
    Lu { l: Matrix, u: Matrix },
    Cholesky { l: Matrix },
    /// Real eigenvalues of a 2×2 matrix, larger first
    Eigen(f64, f64),
}

impl OpResult {
    pub fn label(text: impl Into<String>) -> Self {
        OpResult::Label(text.into())
    }

    /// "Yes"/"No" label for predicates
    pub fn yes_no(flag: bool) -> Self {
        OpResult::label(if flag { "Yes" } else { "No" })
    }

    /// False if any carried number is NaN or infinite
    pub fn is_finite(&self) -> bool {
        match self {
            OpResult::Matrix(m) => m.is_finite(),
            OpResult::Scalar(v) => v.is_finite(),
            OpResult::Count(_) | OpResult::Label(_) | OpResult::Dimensions { .. } => true,
            OpResult::Lu { l, u } => l.is_finite() && u.is_finite(),
            OpResult::Cholesky { l } => l.is_finite(),
            OpResult::Eigen(a, b) => a.is_finite() && b.is_finite(),
        }
    }

    /// One-line rendering for history entries and logs
    pub fn summary(&self) -> String {
        match self {
            OpResult::Matrix(m) => m.to_string(),
            OpResult::Scalar(v) => fmt_num(*v),
            OpResult::Count(n) => n.to_string(),
            OpResult::Label(s) => s.clone(),
            OpResult::Dimensions { rows, cols } => format!("{} × {}", rows, cols),
            OpResult::Lu { l, u } => format!("L = {}, U = {}", l, u),
            OpResult::Cholesky { l } => format!("L = {}", l),
            OpResult::Eigen(a, b) => format!("λ₁ = {}, λ₂ = {}", fmt_num(*a), fmt_num(*b)),
        }
    }
}

impl Serialize for OpResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OpResult::Matrix(m) => m.serialize(serializer),
            OpResult::Scalar(v) => serializer.serialize_f64(*v),
            OpResult::Count(n) => serializer.serialize_u64(*n as u64),
            OpResult::Label(s) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(s)?;
                seq.end()
            }
            OpResult::Dimensions { rows, cols } => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(rows)?;
                seq.serialize_element(cols)?;
                seq.end()
            }
            OpResult::Lu { l, u } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("L", l)?;
                map.serialize_entry("U", u)?;
                map.end()
            }
            OpResult::Cholesky { l } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("L", l)?;
                map.end()
            }
            OpResult::Eigen(a, b) => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(a)?;
                seq.serialize_element(b)?;
                seq.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn m(rows: &[Vec<f64>]) -> Matrix {
        Matrix::from_rows(rows, "m").unwrap()
    }

    #[test]
    fn test_wire_shapes() {
        assert_eq!(serde_json::to_value(OpResult::Scalar(-2.0)).unwrap(), json!(-2.0));
        assert_eq!(serde_json::to_value(OpResult::Count(3)).unwrap(), json!(3));
        assert_eq!(serde_json::to_value(OpResult::yes_no(true)).unwrap(), json!(["Yes"]));
        assert_eq!(
            serde_json::to_value(OpResult::Dimensions { rows: 2, cols: 3 }).unwrap(),
            json!([2, 3])
        );
        assert_eq!(serde_json::to_value(OpResult::Eigen(3.0, 2.0)).unwrap(), json!([3.0, 2.0]));
    }

    #[test]
    fn test_decomposition_shapes() {
        let lu = OpResult::Lu { l: Matrix::identity(2), u: m(&[vec![4.0, 3.0], vec![0.0, -1.5]]) };
        let v = serde_json::to_value(&lu).unwrap();
        assert_eq!(v["L"], json!([[1.0, 0.0], [0.0, 1.0]]));
        assert_eq!(v["U"], json!([[4.0, 3.0], [0.0, -1.5]]));

        let chol = OpResult::Cholesky { l: m(&[vec![2.0, 0.0], vec![6.0, 1.0]]) };
        let v = serde_json::to_value(&chol).unwrap();
        assert_eq!(v, json!({"L": [[2.0, 0.0], [6.0, 1.0]]}));
    }

    #[test]
    fn test_is_finite() {
        assert!(OpResult::Scalar(1.0).is_finite());
        assert!(!OpResult::Scalar(f64::INFINITY).is_finite());
        assert!(!OpResult::Eigen(1.0, f64::NAN).is_finite());
        let big = Matrix::from_dmatrix(nalgebra::DMatrix::from_element(1, 1, f64::INFINITY));
        assert!(!OpResult::Matrix(big).is_finite());
    }

    #[test]
    fn test_summary() {
        assert_eq!(OpResult::Dimensions { rows: 2, cols: 3 }.summary(), "2 × 3");
        assert_eq!(OpResult::Scalar(0.25).summary(), "0.25");
        assert_eq!(OpResult::Eigen(3.0, 2.0).summary(), "λ₁ = 3, λ₂ = 2");
    }
}
