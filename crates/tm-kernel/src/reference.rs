use crate::element::Element;

/// Sequential triple-loop definition of `C = A @ B` for row-major `n x n`
/// slices. Slow and obviously correct; the kernels are checked against it.
///
/// # Panics
/// Panics if either slice is not `n * n` long.
pub fn matmul_reference<T: Element>(a: &[T], b: &[T], n: usize) -> Vec<T> {
    assert_eq!(a.len(), n * n, "a.len()={} but n*n={}", a.len(), n * n);
    assert_eq!(b.len(), n * n, "b.len()={} but n*n={}", b.len(), n * n);

    let mut c = vec![T::zero(); n * n];
    for i in 0..n {
        for j in 0..n {
            let mut sum = T::zero();
            for p in 0..n {
                sum = sum + a[i * n + p] * b[p * n + j];
            }
            c[i * n + j] = sum;
        }
    }
    c
}
