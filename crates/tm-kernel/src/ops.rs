//! Host-side launcher for the square matmul kernel.

use tracing::{debug, error};

use crate::backend::ComputeBackend;
use crate::device::Device;
use crate::element::Element;
use crate::error::{Result, TensorError};
use crate::launch::LaunchConfig;
use crate::matrix::Matrix;
use crate::shape::Shape;
use crate::storage::Storage;

/// Compute `C = A @ B` for square `n x n` matrices on `backend`.
///
/// Operands are checked in this order, `a` before `b`:
/// 1. both live on `backend.device()`, else `InvalidDevice`
/// 2. both are contiguous row-major, else `InvalidLayout`
/// 3. both are square with the same side, else `ShapeMismatch`
///
/// The output is zero-allocated on the backend's device, filled by the
/// kernel, and returned only after the launch has completed. A dispatch or
/// execution fault is returned as `KernelLaunchError`; the zeroed buffer
/// is dropped, never handed back.
pub fn matmul<T: Element>(
    a: &Matrix<T>,
    b: &Matrix<T>,
    backend: &dyn ComputeBackend,
) -> Result<Matrix<T>> {
    let device = backend.device();
    check_device("a", a, device)?;
    check_device("b", b, device)?;

    let a_data = contiguous_slice("a", a)?;
    let b_data = contiguous_slice("b", b)?;

    if !a.shape().is_square() || a.shape() != b.shape() {
        return Err(TensorError::ShapeMismatch {
            a: a.shape().dims().to_vec(),
            b: b.shape().dims().to_vec(),
        });
    }

    let n = a.rows();
    let config = LaunchConfig::for_square(n)?;
    let mut out = Storage::<T>::zeros(n * n, device);
    let dtype = T::DTYPE;

    debug!(
        n,
        dtype = %dtype,
        grid_x = config.grid().x,
        grid_y = config.grid().y,
        units = config.num_units(),
        backend = backend.name(),
        "launching matmul"
    );

    if let Err(e) = T::launch(backend, a_data, b_data, out.as_mut_slice(), &config) {
        error!(
            n,
            dtype = %dtype,
            backend = backend.name(),
            error = %e,
            "matmul launch faulted"
        );
        return Err(e);
    }

    debug!(n, blocks = config.num_blocks(), "matmul complete");
    Ok(Matrix::from_storage(out, Shape::matrix(n, n)))
}

fn check_device<T: Element>(operand: &'static str, m: &Matrix<T>, expected: Device) -> Result<()> {
    if m.device() != expected {
        return Err(TensorError::InvalidDevice {
            operand,
            expected,
            got: m.device(),
        });
    }
    Ok(())
}

fn contiguous_slice<'m, T: Element>(operand: &'static str, m: &'m Matrix<T>) -> Result<&'m [T]> {
    m.as_slice().ok_or_else(|| TensorError::InvalidLayout {
        operand,
        shape: m.shape().dims().to_vec(),
        strides: m.strides().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::CpuBackend;

    fn backend() -> CpuBackend {
        CpuBackend::new().unwrap()
    }

    fn on_compute(data: Vec<f32>, n: usize) -> Matrix<f32> {
        Matrix::from_vec(data, n, n, Device::Compute(0)).unwrap()
    }

    #[test]
    fn test_matmul_basic() {
        let be = backend();
        let a = on_compute(vec![1.0, 2.0, 3.0, 4.0], 2);
        let b = on_compute(vec![5.0, 6.0, 7.0, 8.0], 2);
        let c = matmul(&a, &b, &be).unwrap();
        assert_eq!(c.shape(), &Shape::matrix(2, 2));
        assert_eq!(c.device(), Device::Compute(0));
        assert_eq!(c.to_vec(), vec![19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_host_operand_rejected() {
        let be = backend();
        let a = Matrix::from_vec(vec![1.0f32; 4], 2, 2, Device::Host).unwrap();
        let b = on_compute(vec![1.0; 4], 2);
        match matmul(&a, &b, &be).unwrap_err() {
            TensorError::InvalidDevice { operand, expected, got } => {
                assert_eq!(operand, "a");
                assert_eq!(expected, Device::Compute(0));
                assert_eq!(got, Device::Host);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_other_device_rejected() {
        let be = backend();
        let a = on_compute(vec![1.0; 4], 2);
        let b = Matrix::from_vec(vec![1.0f32; 4], 2, 2, Device::Compute(3)).unwrap();
        assert!(matches!(
            matmul(&a, &b, &be),
            Err(TensorError::InvalidDevice { operand: "b", .. })
        ));
    }

    #[test]
    fn test_transposed_operand_rejected() {
        let be = backend();
        let a = on_compute(vec![1.0, 2.0, 3.0, 4.0], 2);
        let b = on_compute(vec![1.0, 2.0, 3.0, 4.0], 2).transpose();
        assert!(matches!(
            matmul(&a, &b, &be),
            Err(TensorError::InvalidLayout { operand: "b", .. })
        ));
    }

    #[test]
    fn test_device_checked_before_layout() {
        let be = backend();
        let a = Matrix::from_vec(vec![1.0f32; 4], 2, 2, Device::Host).unwrap().transpose();
        let b = on_compute(vec![1.0; 4], 2);
        assert!(matches!(
            matmul(&a, &b, &be),
            Err(TensorError::InvalidDevice { .. })
        ));
    }

    #[test]
    fn test_non_square_rejected() {
        let be = backend();
        let a = Matrix::from_vec(vec![1.0f32; 6], 2, 3, Device::Compute(0)).unwrap();
        let b = Matrix::from_vec(vec![1.0f32; 6], 3, 2, Device::Compute(0)).unwrap();
        assert!(matches!(
            matmul(&a, &b, &be),
            Err(TensorError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_rejected() {
        let be = backend();
        let a = Matrix::<f32>::zeros(0, 0, Device::Compute(0));
        assert!(matches!(
            matmul(&a, &a, &be),
            Err(TensorError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_method_form() {
        let be = backend();
        let a = Matrix::<f64>::identity(3, Device::Compute(0));
        let b = Matrix::from_fn(3, 3, Device::Compute(0), |r, c| (r * 3 + c) as f64);
        assert_eq!(a.matmul(&b, &be).unwrap().to_vec(), b.to_vec());
    }
}
