use std::sync::Arc;

use crate::backend::ComputeBackend;
use crate::device::Device;
use crate::dtype::DType;
use crate::element::Element;
use crate::error::{Result, TensorError};
use crate::ops;
use crate::shape::Shape;
use crate::storage::Storage;

/// A rank-2 view over device-tagged storage.
///
/// Matrices built by the constructors are contiguous and row-major.
/// `transpose` produces a view sharing the same storage with swapped
/// strides; such a view is not contiguous until `contiguous` copies it.
#[derive(Debug, Clone)]
pub struct Matrix<T: Element> {
    storage: Arc<Storage<T>>,
    shape: Shape,
    strides: Vec<usize>,
}

impl<T: Element> Matrix<T> {
    /// Create a matrix from row-major data.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if `rows * cols` overflows or differs from
    /// `data.len()`.
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize, device: Device) -> Result<Self> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(TensorError::ShapeMismatch {
                a: vec![data.len()],
                b: vec![rows, cols],
            });
        }
        Ok(Self::from_storage(
            Storage::new(data, device),
            Shape::matrix(rows, cols),
        ))
    }

    pub(crate) fn from_storage(storage: Storage<T>, shape: Shape) -> Self {
        let strides = shape.strides();
        Matrix {
            storage: Arc::new(storage),
            shape,
            strides,
        }
    }

    /// # Panics
    /// Panics if `rows * cols` overflows `usize`.
    pub fn zeros(rows: usize, cols: usize, device: Device) -> Self {
        let len = element_count(rows, cols);
        Self::from_storage(Storage::zeros(len, device), Shape::matrix(rows, cols))
    }

    /// The `n x n` identity matrix.
    pub fn identity(n: usize, device: Device) -> Self {
        Self::from_fn(n, n, device, |r, c| if r == c { T::one() } else { T::zero() })
    }

    /// Build a matrix by evaluating `f(row, col)` in row-major order.
    ///
    /// # Panics
    /// Panics if `rows * cols` overflows `usize`.
    pub fn from_fn<F>(rows: usize, cols: usize, device: Device, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut data = Vec::with_capacity(element_count(rows, cols));
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self::from_storage(Storage::new(data, device), Shape::matrix(rows, cols))
    }

    pub fn rows(&self) -> usize {
        self.shape.dim(0)
    }

    pub fn cols(&self) -> usize {
        self.shape.dim(1)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn device(&self) -> Device {
        self.storage.device()
    }

    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    pub fn is_contiguous(&self) -> bool {
        self.shape.is_contiguous(&self.strides)
    }

    /// Element at `(row, col)`, honoring the view's strides.
    ///
    /// # Panics
    /// Panics if the coordinate is outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> T {
        assert!(
            row < self.rows() && col < self.cols(),
            "index ({row}, {col}) out of bounds for shape {}",
            self.shape
        );
        self.storage.as_slice()[row * self.strides[0] + col * self.strides[1]]
    }

    /// The underlying buffer, if the layout is contiguous row-major.
    pub fn as_slice(&self) -> Option<&[T]> {
        if self.is_contiguous() {
            Some(self.storage.as_slice())
        } else {
            None
        }
    }

    /// Elements in logical row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        match self.as_slice() {
            Some(data) => data.to_vec(),
            None => {
                let mut out = Vec::with_capacity(self.shape.numel());
                for r in 0..self.rows() {
                    for c in 0..self.cols() {
                        out.push(self.get(r, c));
                    }
                }
                out
            }
        }
    }

    /// Row-major rendering as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        (0..self.rows())
            .map(|r| (0..self.cols()).map(|c| self.get(r, c)).collect())
            .collect()
    }

    /// Swap the axes without copying.
    pub fn transpose(&self) -> Matrix<T> {
        Matrix {
            storage: Arc::clone(&self.storage),
            shape: self.shape.transposed(),
            strides: vec![self.strides[1], self.strides[0]],
        }
    }

    /// A contiguous row-major matrix with the same elements, on the same
    /// device. Shares storage when already contiguous.
    pub fn contiguous(&self) -> Matrix<T> {
        if self.is_contiguous() {
            return self.clone();
        }
        Self::from_storage(
            Storage::new(self.to_vec(), self.device()),
            self.shape.clone(),
        )
    }

    /// Copy of this matrix resident on `device`.
    pub fn to_device(&self, device: Device) -> Matrix<T> {
        Matrix {
            storage: Arc::new(self.storage.copy_to(device)),
            shape: self.shape.clone(),
            strides: self.strides.clone(),
        }
    }

    /// `self @ other` on `backend`. See [`ops::matmul`].
    pub fn matmul(&self, other: &Matrix<T>, backend: &dyn ComputeBackend) -> Result<Matrix<T>> {
        ops::matmul(self, other, backend)
    }
}

fn element_count(rows: usize, cols: usize) -> usize {
    rows.checked_mul(cols)
        .unwrap_or_else(|| panic!("matrix of {rows}x{cols} elements overflows usize"))
}
