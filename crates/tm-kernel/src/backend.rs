use std::fmt::Debug;

use crate::device::Device;
use crate::error::Result;
use crate::launch::LaunchConfig;

/// Trait for pluggable compute backends.
///
/// A backend owns one memory space (`device()`) and executes the matmul
/// launch grid over buffers that live there. There is one entry point per
/// element width; `Element::launch` picks the right one.
///
/// Implementations receive validated operands: `a` and `b` are contiguous,
/// row-major `n x n` slices and `c` is a zero-filled `n x n` output. A call
/// returns only once every block has finished. Any fault during dispatch or
/// execution must be reported as `TensorError::KernelLaunchError`.
pub trait ComputeBackend: Send + Sync + Debug {
    /// Returns the name of this backend (e.g., "cpu").
    fn name(&self) -> &str;

    /// Memory space operands must reside in.
    fn device(&self) -> Device;

    /// C = A @ B over f32 elements.
    fn matmul_f32(&self, a: &[f32], b: &[f32], c: &mut [f32], config: &LaunchConfig)
        -> Result<()>;

    /// C = A @ B over f64 elements.
    fn matmul_f64(&self, a: &[f64], b: &[f64], c: &mut [f64], config: &LaunchConfig)
        -> Result<()>;
}
