use crate::consts::IMAGE_DEPTH;
use crate::mem::GMemType;

use log::warn;

///
/// Read-only program store. Contents can only be placed while an image is
/// loaded; the memory map refuses runtime writes.
///
#[derive(Clone)]
pub struct GRom {
    data: [u8; IMAGE_DEPTH],
}

impl GRom {
    pub fn blank() -> GRom {
        GRom {
            data: [0; IMAGE_DEPTH],
        }
    }

    ///
    /// Places a byte into ROM during image load.
    ///
    pub fn program(&mut self, offset: usize, value: u8) {
        match self.data.get_mut(offset) {
            Some(slot) => *slot = value,
            None => warn!("Out of bound ROM program offset: {:x}", offset),
        }
    }
}

impl GMemType for GRom {
    fn read(&self, offset: usize) -> u8 {
        self.data[offset & (IMAGE_DEPTH - 1)]
    }
}
