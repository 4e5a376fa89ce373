use std::fmt;

/// A rank-2 matrix shape, wrapping the dimension sizes `[rows, cols]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    /// Shape `[rows, cols]`.
    pub fn matrix(rows: usize, cols: usize) -> Self {
        Shape {
            dims: vec![rows, cols],
        }
    }

    /// Total number of elements (product of all dimension sizes).
    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    /// Returns the size of dimension `i`.
    ///
    /// # Panics
    /// Panics if `i > 1`.
    pub fn dim(&self, i: usize) -> usize {
        self.dims[i]
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// True for equal, non-zero sides.
    pub fn is_square(&self) -> bool {
        self.dims[0] == self.dims[1] && self.dims[0] > 0
    }

    /// Computes row-major contiguous strides for this shape.
    ///
    /// For a shape [rows, cols], the strides are [cols, 1].
    pub fn strides(&self) -> Vec<usize> {
        vec![self.dims[1], 1]
    }

    /// Checks if the given strides describe a gap-free row-major layout.
    pub fn is_contiguous(&self, strides: &[usize]) -> bool {
        strides.len() == self.dims.len() && strides == self.strides().as_slice()
    }

    /// The shape with its two axes swapped.
    pub fn transposed(&self) -> Shape {
        Shape::matrix(self.dims[1], self.dims[0])
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, "]")
    }
}
