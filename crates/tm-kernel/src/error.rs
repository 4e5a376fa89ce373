use thiserror::Error;

use crate::device::Device;

#[derive(Error, Debug)]
pub enum TensorError {
    #[error("operand {operand} is on {got}, expected {expected}")]
    InvalidDevice {
        operand: &'static str,
        expected: Device,
        got: Device,
    },
    #[error("operand {operand} is not contiguous: shape {shape:?}, strides {strides:?}")]
    InvalidLayout {
        operand: &'static str,
        shape: Vec<usize>,
        strides: Vec<usize>,
    },
    #[error("shape mismatch: {a:?} vs {b:?}")]
    ShapeMismatch { a: Vec<usize>, b: Vec<usize> },
    #[error("kernel launch failed: {0}")]
    KernelLaunchError(String),
    #[error("invalid config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TensorError>;
