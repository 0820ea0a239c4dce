use crate::consts::IMAGE_DEPTH;
use crate::mem::GMemType;

use log::trace;

#[derive(Clone)]
pub struct GRam {
    data: [u8; IMAGE_DEPTH],
}

impl GRam {
    ///
    /// Constructor for GRam structure. This will create a blank RAM state of
    /// all zeros.
    ///
    pub fn new() -> GRam {
        GRam {
            data: [0; IMAGE_DEPTH],
        }
    }

    pub fn write(&mut self, offset: usize, value: u8) {
        trace!("RAM Write: 0x{:x}: 0x{:x}", offset, value);
        self.data[offset & (IMAGE_DEPTH - 1)] = value;
    }
}

impl GMemType for GRam {
    fn read(&self, offset: usize) -> u8 {
        self.data[offset & (IMAGE_DEPTH - 1)]
    }
}
