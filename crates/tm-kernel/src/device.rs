use std::fmt;

/// Memory space a buffer lives in.
///
/// `Host` is ordinary process memory that no backend reads from directly.
/// `Compute(ordinal)` is the memory space owned by the compute backend with
/// that ordinal; kernels only accept operands resident there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Device {
    #[default]
    Host,
    Compute(usize),
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Host => write!(f, "host"),
            Device::Compute(ordinal) => write!(f, "compute:{}", ordinal),
        }
    }
}
