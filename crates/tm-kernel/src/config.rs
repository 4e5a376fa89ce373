use std::env;

use crate::error::{Result, TensorError};
use crate::kernel::KernelVariant;

/// Environment variable overriding the worker thread count.
pub const ENV_NUM_THREADS: &str = "TM_NUM_THREADS";
/// Environment variable selecting the kernel variant (`naive` or `tiled`).
pub const ENV_KERNEL: &str = "TM_KERNEL";

/// Settings for building a `CpuBackend`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BackendConfig {
    /// Worker threads in the backend's pool. `None` lets rayon decide
    /// (one per logical CPU).
    pub num_threads: Option<usize>,
    /// Block kernel to run.
    pub variant: KernelVariant,
    /// Ordinal of the compute device the backend claims.
    pub device_ordinal: usize,
}

impl BackendConfig {
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    pub fn with_variant(mut self, variant: KernelVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_device_ordinal(mut self, ordinal: usize) -> Self {
        self.device_ordinal = ordinal;
        self
    }

    /// Defaults overridden by `TM_NUM_THREADS` and `TM_KERNEL` when set.
    pub fn from_env() -> Result<BackendConfig> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like `from_env`, reading values through `lookup`.
    ///
    /// - `TM_NUM_THREADS` -> num_threads (positive integer)
    /// - `TM_KERNEL` -> variant
    pub fn from_lookup<F>(lookup: F) -> Result<BackendConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = BackendConfig::default();

        if let Some(raw) = lookup(ENV_NUM_THREADS) {
            let threads: usize = raw.trim().parse().map_err(|_| {
                TensorError::Config(format!("{ENV_NUM_THREADS}='{raw}' is not an integer"))
            })?;
            if threads == 0 {
                return Err(TensorError::Config(format!(
                    "{ENV_NUM_THREADS} must be at least 1"
                )));
            }
            config.num_threads = Some(threads);
        }

        if let Some(raw) = lookup(ENV_KERNEL) {
            config.variant = raw.parse()?;
        }

        Ok(config)
    }
}
