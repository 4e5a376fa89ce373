//! `tm-kernel` - Tiled dense matrix multiplication with pluggable compute backends.
//!
//! This crate provides:
//! - A `Matrix` type over device-tagged storage
//! - A `ComputeBackend` trait for the kernel launch seam
//! - A `CpuBackend` that runs the 16x16 block grid on a rayon pool
//! - Naive and shared-tile block kernels with identical results
//! - The host-side `matmul` launcher that validates operands and reports
//!   launch faults as errors

pub mod backend;
pub mod config;
pub mod cpu;
pub mod device;
pub mod dtype;
pub mod element;
pub mod error;
pub mod kernel;
pub mod launch;
pub mod matrix;
pub mod ops;
pub mod reference;
pub mod shape;
pub mod storage;

// Re-export primary types at the crate root for convenience.
pub use backend::ComputeBackend;
pub use config::BackendConfig;
pub use cpu::CpuBackend;
pub use device::Device;
pub use dtype::DType;
pub use element::Element;
pub use error::{Result, TensorError};
pub use kernel::KernelVariant;
pub use launch::{Dim2, LaunchConfig, BLOCK_SIZE};
pub use matrix::Matrix;
pub use ops::matmul;
pub use reference::matmul_reference;
pub use shape::Shape;
pub use storage::Storage;
