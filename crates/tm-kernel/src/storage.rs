use crate::device::Device;
use crate::element::Element;

/// A flat element buffer tagged with the memory space it lives in.
#[derive(Debug, Clone)]
pub struct Storage<T: Element> {
    data: Vec<T>,
    device: Device,
}

impl<T: Element> Storage<T> {
    pub fn new(data: Vec<T>, device: Device) -> Self {
        Storage { data, device }
    }

    /// Zero-filled storage of `n` elements.
    pub fn zeros(n: usize, device: Device) -> Self {
        Storage {
            data: vec![T::zero(); n],
            device,
        }
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Copy of the elements placed on another device.
    pub fn copy_to(&self, device: Device) -> Self {
        Storage {
            data: self.data.clone(),
            device,
        }
    }
}
