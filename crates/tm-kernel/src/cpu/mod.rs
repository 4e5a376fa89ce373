pub mod matmul;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::info;

use crate::backend::ComputeBackend;
use crate::config::BackendConfig;
use crate::device::Device;
use crate::element::Element;
use crate::error::{Result, TensorError};
use crate::kernel::KernelVariant;
use crate::launch::LaunchConfig;

/// CPU compute backend.
///
/// Owns a rayon thread pool and runs the launch grid on it, one task per
/// grid row. Claims `Device::Compute(ordinal)` as its memory space.
#[derive(Debug, Clone)]
pub struct CpuBackend {
    pool: Arc<ThreadPool>,
    variant: KernelVariant,
    device: Device,
}

impl CpuBackend {
    /// Backend with default settings.
    ///
    /// # Errors
    /// Returns `KernelLaunchError` if the worker pool cannot be started.
    pub fn new() -> Result<Self> {
        Self::with_config(BackendConfig::default())
    }

    /// # Errors
    /// Returns `KernelLaunchError` if the worker pool cannot be started.
    pub fn with_config(config: BackendConfig) -> Result<Self> {
        let mut builder = ThreadPoolBuilder::new()
            .thread_name(|i| format!("tm-kernel-worker-{i}"));
        if let Some(threads) = config.num_threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build().map_err(|e| {
            TensorError::KernelLaunchError(format!("failed to start worker pool: {e}"))
        })?;

        let device = Device::Compute(config.device_ordinal);
        info!(
            threads = pool.current_num_threads(),
            variant = %config.variant,
            device = %device,
            "cpu backend ready"
        );

        Ok(CpuBackend {
            pool: Arc::new(pool),
            variant: config.variant,
            device,
        })
    }

    pub fn variant(&self) -> KernelVariant {
        self.variant
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    fn launch<T: Element>(
        &self,
        a: &[T],
        b: &[T],
        c: &mut [T],
        config: &LaunchConfig,
    ) -> Result<()> {
        let expected = config.n() * config.n();
        for (name, len) in [("a", a.len()), ("b", b.len()), ("c", c.len())] {
            if len != expected {
                return Err(TensorError::KernelLaunchError(format!(
                    "buffer {name} holds {len} elements, launch covers {expected}"
                )));
            }
        }

        let variant = self.variant;
        self.run_guarded(|| matmul::execute_grid(variant, a, b, c, config))
    }

    /// Runs `work` on the pool and waits for it. A panic in any block is
    /// caught at the join and reported as a launch fault.
    fn run_guarded<F>(&self, work: F) -> Result<()>
    where
        F: FnOnce() + Send,
    {
        self.pool
            .install(|| panic::catch_unwind(AssertUnwindSafe(work)))
            .map_err(|payload| {
                TensorError::KernelLaunchError(format!(
                    "kernel execution aborted: {}",
                    panic_message(payload.as_ref())
                ))
            })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl ComputeBackend for CpuBackend {
    fn name(&self) -> &str {
        "cpu"
    }

    fn device(&self) -> Device {
        self.device
    }

    fn matmul_f32(
        &self,
        a: &[f32],
        b: &[f32],
        c: &mut [f32],
        config: &LaunchConfig,
    ) -> Result<()> {
        self.launch(a, b, c, config)
    }

    fn matmul_f64(
        &self,
        a: &[f64],
        b: &[f64],
        c: &mut [f64],
        config: &LaunchConfig,
    ) -> Result<()> {
        self.launch(a, b, c, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> CpuBackend {
        CpuBackend::with_config(BackendConfig::default().with_num_threads(2)).unwrap()
    }

    #[test]
    fn test_basic() {
        let b = backend();
        let cfg = LaunchConfig::for_square(2).unwrap();
        let mut c = vec![0.0f32; 4];
        b.matmul_f32(&[1.0, 2.0, 3.0, 4.0], &[5.0, 6.0, 7.0, 8.0], &mut c, &cfg)
            .unwrap();
        assert_eq!(c, vec![19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_f64_identity() {
        let b = backend();
        let cfg = LaunchConfig::for_square(2).unwrap();
        let mut c = vec![0.0f64; 4];
        b.matmul_f64(&[1.0, 0.0, 0.0, 1.0], &[1.0, 2.0, 3.0, 4.0], &mut c, &cfg)
            .unwrap();
        assert_eq!(c, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_config_applied() {
        let b = CpuBackend::with_config(
            BackendConfig::default()
                .with_num_threads(3)
                .with_variant(KernelVariant::Tiled)
                .with_device_ordinal(4),
        )
        .unwrap();
        assert_eq!(b.num_threads(), 3);
        assert_eq!(b.variant(), KernelVariant::Tiled);
        assert_eq!(b.device(), Device::Compute(4));
        assert_eq!(b.name(), "cpu");
    }

    #[test]
    fn test_launch_fills_every_output_element() {
        // All-ones operands: every element of C must equal n, none left zero.
        for variant in [KernelVariant::Naive, KernelVariant::Tiled] {
            let b = CpuBackend::with_config(
                BackendConfig::default().with_num_threads(2).with_variant(variant),
            )
            .unwrap();
            for n in [1, 16, 17, 32, 33] {
                let cfg = LaunchConfig::for_square(n).unwrap();
                let ones = vec![1.0f32; n * n];
                let mut c = vec![0.0f32; n * n];
                b.matmul_f32(&ones, &ones, &mut c, &cfg).unwrap();
                let zeros = c.iter().filter(|v| **v == 0.0).count();
                assert_eq!(zeros, 0, "n={n} variant={variant}");
                assert!(c.iter().all(|v| *v == n as f32), "n={n} variant={variant}");
            }
        }
    }

    #[test]
    fn test_buffer_length_mismatch_is_launch_error() {
        let b = backend();
        let cfg = LaunchConfig::for_square(2).unwrap();
        let mut c = vec![0.0f32; 3];
        let err = b
            .matmul_f32(&[1.0; 4], &[1.0; 4], &mut c, &cfg)
            .unwrap_err();
        assert!(matches!(err, TensorError::KernelLaunchError(_)));
    }

    #[test]
    fn test_panic_in_worker_is_reported() {
        let b = backend();
        let err = b
            .run_guarded(|| {
                use rayon::prelude::*;
                (0..8).into_par_iter().for_each(|i| {
                    if i == 5 {
                        panic!("block 5 faulted");
                    }
                });
            })
            .unwrap_err();
        match err {
            TensorError::KernelLaunchError(msg) => assert!(msg.contains("block 5 faulted")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
