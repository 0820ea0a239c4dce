pub mod mif;
mod ram;
mod rom;

use std::fs;
use std::path::Path;

use log::{debug, trace};

use crate::consts::memmap;
use crate::error::{CpuError, LoadError};

// ============================================================================
// Trait Declarations
// ============================================================================
trait GMemType {
    fn read(&self, offset: usize) -> u8;
}

///
/// The 8 KiB G-CPU memory map. The lower half is ROM and the upper half RAM;
/// nothing above 0x1FFF is backed.
///
#[derive(Clone)]
pub struct MemoryImage {
    rom: rom::GRom,
    ram: ram::GRam,
}

impl MemoryImage {
    pub fn new() -> MemoryImage {
        MemoryImage {
            rom: rom::GRom::blank(),
            ram: ram::GRam::new(),
        }
    }

    ///
    /// Builds a memory image out of the text of a ROM image and a RAM image.
    /// The RAM image is loaded at 0x1000.
    ///
    pub fn from_mif(rom_text: &str, ram_text: &str) -> Result<MemoryImage, LoadError> {
        let mut mm = MemoryImage::new();
        for record in mif::parse(rom_text)?.iter() {
            record.for_each(|addr, value| mm.program(memmap::ROM_START + addr, value));
        }
        for record in mif::parse(ram_text)?.iter() {
            record.for_each(|addr, value| mm.program(memmap::RAM_START + addr, value));
        }
        Ok(mm)
    }

    pub fn load<P: AsRef<Path>>(rom_path: P, ram_path: P) -> Result<MemoryImage, LoadError> {
        debug!(
            "Loading ROM {:?} and RAM {:?}",
            rom_path.as_ref(),
            ram_path.as_ref()
        );
        let rom_text = fs::read_to_string(rom_path)?;
        let ram_text = fs::read_to_string(ram_path)?;
        MemoryImage::from_mif(&rom_text, &ram_text)
    }

    ///
    /// Load-time store. This is the only path that can place bytes in ROM.
    ///
    pub fn program(&mut self, idx: usize, value: u8) {
        match idx {
            memmap::ROM_START..=memmap::ROM_END => self.rom.program(idx, value),
            memmap::RAM_START..=memmap::RAM_END => {
                self.ram.write(idx - memmap::RAM_START, value)
            }
            _ => debug!("Dropping load of out of range address {:x}", idx),
        }
    }

    pub fn read(&self, idx: usize) -> Result<u8, CpuError> {
        let val = match idx {
            memmap::ROM_START..=memmap::ROM_END => self.rom.read(idx),
            memmap::RAM_START..=memmap::RAM_END => self.ram.read(idx - memmap::RAM_START),
            _ => return Err(CpuError::OutOfBounds(idx)),
        };
        trace!("Read: 0x{:x}: 0x{:x}", idx, val);
        Ok(val)
    }

    pub fn write(&mut self, idx: usize, val: u8) -> Result<(), CpuError> {
        trace!("Write: 0x{:x}: 0x{:x}", idx, val);
        match idx {
            memmap::ROM_START..=memmap::ROM_END => Err(CpuError::ReadOnlyViolation(idx)),
            memmap::RAM_START..=memmap::RAM_END => {
                self.ram.write(idx - memmap::RAM_START, val);
                Ok(())
            }
            _ => Err(CpuError::OutOfBounds(idx)),
        }
    }
}

impl Default for MemoryImage {
    fn default() -> Self {
        MemoryImage::new()
    }
}

#[cfg(test)]
mod memory_image_tests {
    use super::*;

    #[test]
    fn rom_is_read_only_at_runtime() {
        let mut mm = MemoryImage::new();
        mm.program(0x0050, 0x12);

        assert_eq!(mm.write(0x0050, 0xFF), Err(CpuError::ReadOnlyViolation(0x50)));
        assert_eq!(mm.read(0x0050), Ok(0x12));
        assert_eq!(mm.write(0x0FFF, 0xFF), Err(CpuError::ReadOnlyViolation(0xFFF)));
    }

    #[test]
    fn ram_is_read_write() {
        let mut mm = MemoryImage::new();
        for idx in [0x1000, 0x1234, 0x1FFF].iter() {
            mm.write(*idx, 0xA5).unwrap();
            assert_eq!(mm.read(*idx), Ok(0xA5));
        }
    }

    #[test]
    fn unbacked_addresses_are_out_of_bounds() {
        let mut mm = MemoryImage::new();
        assert_eq!(mm.read(0x2000), Err(CpuError::OutOfBounds(0x2000)));
        assert_eq!(mm.read(0xFFFF), Err(CpuError::OutOfBounds(0xFFFF)));
        assert_eq!(mm.write(0x2000, 1), Err(CpuError::OutOfBounds(0x2000)));
    }

    #[test]
    fn from_mif_places_ram_at_upper_half() {
        let rom = "CONTENT\nBEGIN\n0000 : 02;\n0001 : 07;\n[0002..0FFF] : 00;\nEND;\n";
        let ram = "CONTENT\nBEGIN\n[0000..0003] : 00;\n0004 : 99;\n[0005..0FFF] : 00;\nEND;\n";
        let mm = MemoryImage::from_mif(rom, ram).unwrap();

        assert_eq!(mm.read(0x0000), Ok(0x02));
        assert_eq!(mm.read(0x0001), Ok(0x07));
        assert_eq!(mm.read(0x1004), Ok(0x99));
        assert_eq!(mm.read(0x0004), Ok(0x00));
    }
}
