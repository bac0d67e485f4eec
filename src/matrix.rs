//! Row-major buffer descriptors and complex matrix kernels

use rustfft::num_complex::Complex32;

/// Shape of a row-major 2-D buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub const fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shape with rows and columns swapped
    pub const fn transposed(&self) -> Self {
        Self::new(self.cols, self.rows)
    }

    /// Flat offset of element `(row, col)`
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        row * self.cols + col
    }

    /// Panic unless a buffer of `len` elements holds exactly this shape
    #[track_caller]
    pub fn check(&self, len: usize, what: &str) {
        assert_eq!(
            len,
            self.len(),
            "{} holds {} elements, expected {}x{}",
            what,
            len,
            self.rows,
            self.cols
        );
    }
}

/// Dense row-major complex matrix
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexMatrix {
    shape: Shape,
    data: Vec<Complex32>,
}

impl ComplexMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            shape: Shape::new(rows, cols),
            data: vec![Complex32::new(0.0, 0.0); rows * cols],
        }
    }

    pub fn from_vec(rows: usize, cols: usize, data: Vec<Complex32>) -> Self {
        let shape = Shape::new(rows, cols);
        shape.check(data.len(), "matrix data");
        Self { shape, data }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    pub fn cols(&self) -> usize {
        self.shape.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Complex32 {
        self.data[self.shape.index(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, value: Complex32) {
        let idx = self.shape.index(row, col);
        self.data[idx] = value;
    }

    pub fn row(&self, row: usize) -> &[Complex32] {
        let cols = self.shape.cols;
        &self.data[row * cols..(row + 1) * cols]
    }

    pub fn as_slice(&self) -> &[Complex32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [Complex32] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<Complex32> {
        self.data
    }
}

/// Full transpose of `src` (shape `src_shape`) into separately owned `dst`
pub fn cmplx_transpose(src: &[Complex32], src_shape: Shape, dst: &mut [Complex32]) {
    src_shape.check(src.len(), "transpose source");
    src_shape.check(dst.len(), "transpose destination");

    let dst_shape = src_shape.transposed();
    for r in 0..src_shape.rows {
        for c in 0..src_shape.cols {
            dst[dst_shape.index(c, r)] = src[src_shape.index(r, c)];
        }
    }
}

/// Complex matrix product `out = a × b`
pub fn cmplx_mult(a: &ComplexMatrix, b: &ComplexMatrix, out: &mut ComplexMatrix) {
    assert_eq!(a.cols(), b.rows(), "inner dimensions differ");
    assert_eq!(out.rows(), a.rows(), "output rows differ from left operand");
    assert_eq!(out.cols(), b.cols(), "output columns differ from right operand");

    for i in 0..a.rows() {
        for j in 0..b.cols() {
            let mut acc = Complex32::new(0.0, 0.0);
            for k in 0..a.cols() {
                acc += a.get(i, k) * b.get(k, j);
            }
            out.set(i, j, acc);
        }
    }
}
