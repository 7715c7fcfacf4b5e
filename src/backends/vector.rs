/// A trait for vector-like types that can be used as evaluation points and outputs.
///
/// This trait provides a common interface for different vector implementations,
/// allowing them to be used interchangeably when evaluating differentiable functions.
/// Functions only ever read the coordinates of an input point through `as_slice` and
/// write outputs through `as_mut_slice`.
///
/// # Examples
///
/// ```rust
/// use diffprog::prelude::Vector;
///
/// let vec = vec![1.0, 2.0, 3.0];
/// assert_eq!(Vector::len(&vec), 3);
/// assert_eq!(Vector::as_slice(&vec)[0], 1.0);
/// ```
pub trait Vector {
    /// Returns a reference to the vector's data as a slice.
    fn as_slice(&self) -> &[f64];

    /// Returns a mutable reference to the vector's data as a slice.
    fn as_mut_slice(&mut self) -> &mut [f64];

    /// Returns the length of the vector.
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Checks if the vector is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Vector for Vec<f64> {
    fn as_slice(&self) -> &[f64] {
        self
    }

    fn as_mut_slice(&mut self) -> &mut [f64] {
        self
    }
}

impl Vector for [f64] {
    fn as_slice(&self) -> &[f64] {
        self
    }

    fn as_mut_slice(&mut self) -> &mut [f64] {
        self
    }
}

/// Fixed-size arrays, so points can be written as literals such as `&[1.0, 2.0]`.
impl<const N: usize> Vector for [f64; N] {
    fn as_slice(&self) -> &[f64] {
        self
    }

    fn as_mut_slice(&mut self) -> &mut [f64] {
        self
    }

    fn len(&self) -> usize {
        N
    }
}

/// Implementation of Vector trait for ndarray's Array1<f64>.
///
/// `Array1` values built with the usual constructors are contiguous.
///
/// # Panics
/// `as_slice` and `as_mut_slice` panic on non-contiguous arrays, e.g. after
/// `invert_axis` or an in-place strided slice.
#[cfg(feature = "ndarray")]
impl Vector for ndarray::Array1<f64> {
    fn as_slice(&self) -> &[f64] {
        ndarray::Array1::as_slice(self).expect("Array1 must be contiguous")
    }

    fn as_mut_slice(&mut self) -> &mut [f64] {
        self.as_slice_mut().expect("Array1 must be contiguous")
    }

    fn len(&self) -> usize {
        ndarray::Array1::len(self)
    }
}

/// Implementation of Vector trait for nalgebra's DVector<f64>.
#[cfg(feature = "nalgebra")]
impl Vector for nalgebra::DVector<f64> {
    fn as_slice(&self) -> &[f64] {
        nalgebra::DVector::as_slice(self)
    }

    fn as_mut_slice(&mut self) -> &mut [f64] {
        nalgebra::DVector::as_mut_slice(self)
    }

    fn len(&self) -> usize {
        nalgebra::DVector::len(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_vectors() {
        let mut vec = vec![1.0, 2.0];
        vec.as_mut_slice()[1] = 5.0;
        assert_eq!(Vector::as_slice(&vec), &[1.0, 5.0]);
        assert!(!Vector::is_empty(&vec));

        let arr = [0.0; 3];
        assert_eq!(Vector::len(&arr), 3);

        let slice: &[f64] = &[];
        assert!(Vector::is_empty(slice));
    }

    #[cfg(feature = "ndarray")]
    #[test]
    fn test_ndarray_vector() {
        let mut vec = ndarray::Array1::<f64>::zeros(3);
        Vector::as_mut_slice(&mut vec)[0] = 1.0;
        assert_eq!(Vector::as_slice(&vec), &[1.0, 0.0, 0.0]);
        assert_eq!(Vector::len(&vec), 3);
    }

    #[cfg(feature = "ndarray")]
    #[test]
    #[should_panic(expected = "Array1 must be contiguous")]
    fn test_ndarray_non_contiguous_vector() {
        let mut vec = ndarray::Array1::from_vec(vec![1.0, 2.0, 3.0]);
        vec.invert_axis(ndarray::Axis(0));
        let _ = Vector::as_slice(&vec);
    }

    #[cfg(feature = "nalgebra")]
    #[test]
    fn test_nalgebra_vector() {
        let mut vec = nalgebra::DVector::<f64>::zeros(3);
        Vector::as_mut_slice(&mut vec)[2] = 1.0;
        assert_eq!(Vector::as_slice(&vec), &[0.0, 0.0, 1.0]);
        assert_eq!(Vector::len(&vec), 3);
    }
}
