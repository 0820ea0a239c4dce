use std::fs;
use std::path::Path;

use log::info;

use gcpu_core::mem::mif;
use gcpu_core::DebugInfo;

use crate::assembler::Assembly;
use crate::error::AsmError;

pub const ROM_FILE: &str = "rom.mif";
pub const RAM_FILE: &str = "ram.mif";
pub const SYMBOLS_FILE: &str = "symbols.json";

///
/// Renders the (ROM, RAM) image pair. RAM content is rebased to 0x0000.
///
pub fn mif_images(asm: &Assembly) -> (String, String) {
    let (rom, ram) = mif::split_images(&asm.memory);
    (mif::render(&rom), mif::render(&ram))
}

pub fn debug_info(asm: &Assembly) -> DebugInfo {
    let mut info = DebugInfo::new();
    info.symbols = asm.symbols();
    info.lines = asm.lines.clone();
    info
}

///
/// ## `write_outputs` Function
///
/// Writes `rom.mif`, `ram.mif` and `symbols.json` into `out_dir`. Every file
/// is rendered before the first one is written.
///
pub fn write_outputs<P: AsRef<Path>>(asm: &Assembly, out_dir: P) -> Result<(), AsmError> {
    let dir = out_dir.as_ref();
    let (rom, ram) = mif_images(asm);
    let symbols = serde_json::to_string_pretty(&debug_info(asm))?;

    fs::create_dir_all(dir)?;
    fs::write(dir.join(ROM_FILE), rom)?;
    fs::write(dir.join(RAM_FILE), ram)?;
    fs::write(dir.join(SYMBOLS_FILE), symbols)?;

    info!("Wrote {} bytes of image to {:?}", asm.memory.len(), dir);
    Ok(())
}

#[cfg(test)]
mod output_tests {
    use super::*;
    use crate::assembler::assemble;

    #[test]
    fn split_at_image_boundary() {
        let out = assemble("org $0fff\ndb $11\ndb $22\n").unwrap();
        let (rom, ram) = mif_images(&out);

        assert!(rom.contains("[0000..0FFE] : 00;\n0FFF : 11;\n"));
        assert!(!rom.contains("1000"));
        assert!(ram.contains("0000 : 22;\n[0001..0FFF] : 00;\n"));
    }

    #[test]
    fn empty_program_fills_both_images() {
        let out = assemble("").unwrap();
        let (rom, ram) = mif_images(&out);
        assert!(rom.contains("[0000..0FFF] : 00;"));
        assert!(ram.contains("[0000..0FFF] : 00;"));
        assert!(rom.starts_with("DEPTH = 4096;"));
        assert!(rom.ends_with("END;\n"));
    }

    #[test]
    fn debug_info_carries_symbols_and_lines() {
        let out = assemble("org $1050\nfoo: db 1\norg 0\nstart: tab\n").unwrap();
        let info = debug_info(&out);
        assert_eq!(info.version, 1);
        assert_eq!(info.symbol("foo"), Some(0x1050));
        assert_eq!(info.symbol("start"), Some(0x0000));
        assert_eq!(info.address_of_line(4), Some(0x0000));
    }
}
