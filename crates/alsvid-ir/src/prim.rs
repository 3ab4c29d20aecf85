//! Fundamental primitives shared across the IR.

use serde::{Deserialize, Serialize};

/// How an instruction or function uses one of its operands.
///
/// The scheduler downstream derives commutation information from these: two
/// accesses to the same object commute iff their modes are equal and not
/// [`AccessMode::Write`]-like. The `Commute*` modes commute with same-axis
/// accesses only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessMode {
    /// The operand is written (or is a qubit being operated on).
    Write,
    /// The operand is only read.
    Read,
    /// The operand must be a literal; it is not accessed at runtime.
    Literal,
    /// Qubit operand that commutes along the X axis.
    CommuteX,
    /// Qubit operand that commutes along the Y axis.
    CommuteY,
    /// Qubit operand that commutes along the Z axis.
    CommuteZ,
    /// Qubit operand that is measured, writing both the qubit and its
    /// implicit measurement bit.
    Measure,
    /// The operand is read and then written.
    Update,
}

impl AccessMode {
    /// Whether this is one of the axis-commutation modes.
    pub fn is_commute(self) -> bool {
        matches!(
            self,
            AccessMode::CommuteX | AccessMode::CommuteY | AccessMode::CommuteZ
        )
    }
}

/// Checks a name against the identifier grammar `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Dense row-major matrix storage for matrix literals.
///
/// The IR only carries matrix values around; it never computes with them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T> Matrix<T> {
    /// Creates a matrix from row-major element data.
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` does not equal `rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<T>) -> Self {
        assert_eq!(
            data.len(),
            rows * cols,
            "matrix data length {} does not match {}x{} shape",
            data.len(),
            rows,
            cols,
        );
        Self { rows, cols, data }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Element at `(row, col)`.
    pub fn at(&self, row: usize, col: usize) -> &T {
        &self.data[row * self.cols + col]
    }

    /// Iterates over one row.
    pub fn row(&self, row: usize) -> impl Iterator<Item = &T> {
        self.data[row * self.cols..(row + 1) * self.cols].iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("x"));
        assert!(is_identifier("_tmp0"));
        assert!(is_identifier("Cnot_2q"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("0x"));
        assert!(!is_identifier("operator+"));
        assert!(!is_identifier("with space"));
        assert!(!is_identifier("uni\u{00e7}ode"));
    }

    #[test]
    fn test_matrix_shape() {
        let m = Matrix::new(2, 2, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(m.rows(), 2);
        assert_eq!(*m.at(1, 0), 3.0);
        assert_eq!(m.row(0).copied().collect::<Vec<_>>(), vec![1.0, 2.0]);
    }

    #[test]
    #[should_panic(expected = "matrix data length")]
    fn test_matrix_bad_shape_panics() {
        let _ = Matrix::new(2, 2, vec![1.0]);
    }
}
