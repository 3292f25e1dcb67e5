//! Fancy indexing: selectors over rows and columns

use crate::error::{Axis, MatrixError, Result};
use crate::matrix::Matrix;
use std::ops::{Range, RangeFull};

/// Selection of indices along one axis
///
/// An empty `List` selects every index, like `All`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSelector {
    Single(usize),
    List(Vec<usize>),
    Range(Range<usize>),
    All,
}

impl IndexSelector {
    /// Concrete, bounds-checked indices for an axis of length `extent`
    pub fn resolve(&self, axis: Axis, extent: usize) -> Result<Vec<usize>> {
        let indices: Vec<usize> = match self {
            IndexSelector::Single(i) => vec![*i],
            IndexSelector::List(list) if list.is_empty() => (0..extent).collect(),
            IndexSelector::List(list) => list.clone(),
            IndexSelector::Range(range) => range.clone().collect(),
            IndexSelector::All => (0..extent).collect(),
        };
        if let Some(&index) = indices.iter().find(|&&i| i >= extent) {
            return Err(MatrixError::IndexOutOfBounds { axis, index, extent });
        }
        Ok(indices)
    }
}

impl From<usize> for IndexSelector {
    fn from(i: usize) -> Self {
        IndexSelector::Single(i)
    }
}

impl From<Vec<usize>> for IndexSelector {
    fn from(list: Vec<usize>) -> Self {
        IndexSelector::List(list)
    }
}

impl From<&[usize]> for IndexSelector {
    fn from(list: &[usize]) -> Self {
        IndexSelector::List(list.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for IndexSelector {
    fn from(list: [usize; N]) -> Self {
        IndexSelector::List(list.to_vec())
    }
}

impl From<Range<usize>> for IndexSelector {
    fn from(range: Range<usize>) -> Self {
        IndexSelector::Range(range)
    }
}

impl From<RangeFull> for IndexSelector {
    fn from(_: RangeFull) -> Self {
        IndexSelector::All
    }
}

impl Matrix {
    /// Submatrix at the Cartesian product of the selected rows and columns
    ///
    /// Indices keep selector order and may repeat.
    pub fn select(&self, rows: impl Into<IndexSelector>, columns: impl Into<IndexSelector>) -> Result<Matrix> {
        let rows = rows.into().resolve(Axis::Row, self.rows)?;
        let columns = columns.into().resolve(Axis::Column, self.columns)?;

        let mut elements = Vec::with_capacity(rows.len() * columns.len());
        for &i in &rows {
            for &j in &columns {
                elements.push(self.elements[i * self.columns + j]);
            }
        }
        Ok(Matrix { rows: rows.len(), columns: columns.len(), elements })
    }

    /// Overwrite the selected cells with `value`
    ///
    /// `value` must have shape (selected rows, selected columns). Nothing is
    /// written unless every check passes.
    pub fn assign(
        &mut self,
        rows: impl Into<IndexSelector>,
        columns: impl Into<IndexSelector>,
        value: &Matrix,
    ) -> Result<()> {
        let rows = rows.into().resolve(Axis::Row, self.rows)?;
        let columns = columns.into().resolve(Axis::Column, self.columns)?;
        if value.shape() != (rows.len(), columns.len()) {
            return Err(MatrixError::DimensionMismatch {
                operation: "assign",
                left: (rows.len(), columns.len()),
                right: value.shape(),
            });
        }

        for (vi, &i) in rows.iter().enumerate() {
            for (vj, &j) in columns.iter().enumerate() {
                self.elements[i * self.columns + j] = value.elements[vi * value.columns + vj];
            }
        }
        Ok(())
    }

    /// Row `i` as a 1 x columns matrix
    pub fn row(&self, i: usize) -> Result<Matrix> {
        self.select(i, ..)
    }

    /// Column `j` as a rows x 1 matrix
    pub fn column(&self, j: usize) -> Result<Matrix> {
        self.select(.., j)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m3() -> Matrix {
        Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]).unwrap()
    }

    #[test]
    fn test_select_block() {
        let sub = m3().select([0, 1], [0, 1]).unwrap();
        assert_eq!(sub, Matrix::from_rows(&[[1.0, 2.0], [4.0, 5.0]]).unwrap());
    }

    #[test]
    fn test_select_order_and_repeats() {
        let sub = m3().select(vec![2, 0, 2], 1).unwrap();
        assert_eq!(sub.shape(), (3, 1));
        assert_eq!(sub.as_slice(), &[8.0, 2.0, 8.0]);
    }

    #[test]
    fn test_empty_list_selects_all() {
        let m = m3();
        assert_eq!(m.select(Vec::<usize>::new(), ..).unwrap(), m);
        assert_eq!(m.select(0..3, IndexSelector::All).unwrap(), m);
    }

    #[test]
    fn test_select_out_of_bounds() {
        assert_eq!(
            m3().select(1, [0, 3]).unwrap_err(),
            MatrixError::IndexOutOfBounds { axis: Axis::Column, index: 3, extent: 3 }
        );
        assert!(m3().select(1..4, ..).is_err());
    }

    #[test]
    fn test_assign_block() {
        let mut m = m3();
        let block = Matrix::from_rows(&[[0.0, -1.0], [-2.0, -3.0]]).unwrap();
        m.assign([1, 2], 1..3, &block).unwrap();
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0, 0.0, -1.0, 7.0, -2.0, -3.0]);
    }

    #[test]
    fn test_assign_shape_mismatch_leaves_matrix_untouched() {
        let mut m = m3();
        let err = m.assign([0, 1], .., &Matrix::ones(2, 2)).unwrap_err();
        assert!(matches!(err, MatrixError::DimensionMismatch { .. }));
        assert_eq!(m, m3());
    }

    #[test]
    fn test_row_and_column() {
        let m = m3();
        assert_eq!(m.row(1).unwrap().as_slice(), &[4.0, 5.0, 6.0]);
        assert_eq!(m.column(2).unwrap().as_slice(), &[3.0, 6.0, 9.0]);
    }
}
