/// A trait for matrix-like types that Jacobians can be written into.
///
/// This trait provides a common interface for different matrix implementations so a
/// Jacobian can be filled directly into the caller's preferred container. Elements are
/// addressed by `(row, col)`, which keeps the trait independent of whether the
/// underlying storage is row-major (ndarray) or column-major (nalgebra).
///
/// # Examples
///
/// ```rust
/// use diffprog::prelude::Matrix;
///
/// let mut mat: Vec<Vec<f64>> = Matrix::zeros(2, 3);
/// assert_eq!(mat.dims(), (2, 3));
///
/// mat.set(1, 2, 4.0);
/// assert_eq!(mat[1][2], 4.0);
/// ```
pub trait Matrix {
    /// Creates a new matrix of the specified dimensions filled with zeros.
    ///
    /// # Arguments
    /// * `rows` - Number of rows in the matrix
    /// * `cols` - Number of columns in the matrix
    fn zeros(rows: usize, cols: usize) -> Self;

    /// Returns the dimensions of the matrix as (rows, columns).
    fn dims(&self) -> (usize, usize);

    /// Writes `value` at position `(row, col)`.
    fn set(&mut self, row: usize, col: usize, value: f64);
}

/// Nested vectors, one inner vector per row.
///
/// A matrix without rows reports zero columns. Rows of differing lengths report
/// `usize::MAX` columns, which no Jacobian shape can match.
impl Matrix for Vec<Vec<f64>> {
    fn zeros(rows: usize, cols: usize) -> Self {
        vec![vec![0.0; cols]; rows]
    }

    fn dims(&self) -> (usize, usize) {
        let cols = self.first().map_or(0, Vec::len);
        if self.iter().all(|row| row.len() == cols) {
            (self.len(), cols)
        } else {
            (self.len(), usize::MAX)
        }
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        self[row][col] = value;
    }
}

/// Implementation of Matrix trait for ndarray's Array2<f64>.
#[cfg(feature = "ndarray")]
impl Matrix for ndarray::Array2<f64> {
    fn zeros(rows: usize, cols: usize) -> Self {
        ndarray::Array2::zeros((rows, cols))
    }

    fn dims(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        self[[row, col]] = value;
    }
}

/// Implementation of Matrix trait for nalgebra's DMatrix<f64>.
#[cfg(feature = "nalgebra")]
impl Matrix for nalgebra::DMatrix<f64> {
    fn zeros(rows: usize, cols: usize) -> Self {
        nalgebra::DMatrix::zeros(rows, cols)
    }

    fn dims(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        self[(row, col)] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_vec_matrix() {
        let mut mat = <Vec<Vec<f64>> as Matrix>::zeros(2, 2);
        assert_eq!(mat.dims(), (2, 2));
        mat.set(0, 1, 3.0);
        assert_eq!(mat, vec![vec![0.0, 3.0], vec![0.0, 0.0]]);

        let empty = <Vec<Vec<f64>> as Matrix>::zeros(3, 0);
        assert_eq!(empty.dims(), (3, 0));
    }

    #[test]
    fn test_ragged_nested_vec_dims() {
        let short_tail = vec![vec![0.0, 0.0], vec![0.0]];
        assert_eq!(short_tail.dims(), (2, usize::MAX));

        let short_head = vec![vec![0.0], vec![0.0, 0.0], vec![0.0, 0.0]];
        assert_eq!(short_head.dims(), (3, usize::MAX));
    }

    #[cfg(feature = "ndarray")]
    #[test]
    fn test_ndarray_matrix() {
        let mut mat = <ndarray::Array2<f64> as Matrix>::zeros(2, 3);
        assert_eq!(mat.dims(), (2, 3));
        mat.set(1, 0, 7.0);
        assert_eq!(mat[[1, 0]], 7.0);
    }

    #[cfg(feature = "nalgebra")]
    #[test]
    fn test_nalgebra_matrix() {
        let mut mat = <nalgebra::DMatrix<f64> as Matrix>::zeros(2, 3);
        assert_eq!(mat.dims(), (2, 3));
        mat.set(1, 0, 7.0);
        assert_eq!(mat[(1, 0)], 7.0);
    }
}
