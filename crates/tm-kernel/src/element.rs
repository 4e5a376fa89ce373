use std::fmt::Debug;

use num_traits::Float;

use crate::backend::ComputeBackend;
use crate::dtype::DType;
use crate::error::Result;
use crate::launch::LaunchConfig;

/// Floating-point element types the matmul kernel is instantiated for.
///
/// Accumulation happens in `Self`; there is no widening. `launch` routes a
/// call to the backend entry point for this width, so dispatch is resolved
/// at compile time.
pub trait Element: Float + Debug + Default + Send + Sync + 'static {
    const DTYPE: DType;

    fn launch(
        backend: &dyn ComputeBackend,
        a: &[Self],
        b: &[Self],
        c: &mut [Self],
        config: &LaunchConfig,
    ) -> Result<()>;
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;

    fn launch(
        backend: &dyn ComputeBackend,
        a: &[f32],
        b: &[f32],
        c: &mut [f32],
        config: &LaunchConfig,
    ) -> Result<()> {
        backend.matmul_f32(a, b, c, config)
    }
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;

    fn launch(
        backend: &dyn ComputeBackend,
        a: &[f64],
        b: &[f64],
        c: &mut [f64],
        config: &LaunchConfig,
    ) -> Result<()> {
        backend.matmul_f64(a, b, c, config)
    }
}
