use crate::error::CpuError;
use crate::instr::{GAddrMode, GInst};
use crate::mem::MemoryImage;
use crate::utils::word_from_le;

///
/// Decodes the instruction at `pc` and renders it in assembler syntax.
///
/// # Result
///
///  - `(GInst, String)` - the decoded instruction and its text, e.g.
///    `ldaa $02,x` or `ldx #$1234`.
///
pub fn disasm(mem: &MemoryImage, pc: u16) -> Result<(GInst, String), CpuError> {
    let opcode = mem.read(pc as usize)?;
    let inst = match GInst::decode(pc, opcode) {
        Some(i) => i,
        None => return Err(CpuError::UnknownInstruction { opcode, pc }),
    };

    let operand8 = || mem.read(pc.wrapping_add(1) as usize);
    let operand16 = || -> Result<u16, CpuError> {
        let low = mem.read(pc.wrapping_add(1) as usize)?;
        let high = mem.read(pc.wrapping_add(2) as usize)?;
        Ok(word_from_le(low, high))
    };

    let name = inst.mnem.name();
    let text = match inst.mnem.mode() {
        GAddrMode::Inherent => name.to_string(),
        GAddrMode::Immediate8 => format!("{} #${:02x}", name, operand8()?),
        GAddrMode::Immediate16 => format!("{} #${:04x}", name, operand16()?),
        GAddrMode::Absolute | GAddrMode::Branch16 => format!("{} ${:04x}", name, operand16()?),
        GAddrMode::IndexedX => format!("{} ${:02x},x", name, operand8()?),
        GAddrMode::IndexedY => format!("{} ${:02x},y", name, operand8()?),
        GAddrMode::Branch8 => format!("{} ${:02x}", name, operand8()?),
    };

    Ok((inst, text))
}

#[cfg(test)]
mod disasm_tests {
    use super::*;
    use crate::consts::opcodes;

    fn mem_with(program: &[u8]) -> MemoryImage {
        let mut mm = MemoryImage::new();
        for (idx, b) in program.iter().enumerate() {
            mm.program(idx, *b);
        }
        mm
    }

    #[test]
    fn renders_each_addressing_mode() {
        let mm = mem_with(&[
            opcodes::TAB,
            opcodes::LDAAI,
            0x05,
            opcodes::LDXI,
            0x34,
            0x12,
            opcodes::STAA,
            0x50,
            0x10,
            opcodes::LDABY,
            0x02,
            opcodes::BNE,
            0x00,
            opcodes::BP16,
            0x00,
            0x10,
        ]);

        let expect = [
            (0x0000, "tab"),
            (0x0001, "ldaa #$05"),
            (0x0003, "ldx #$1234"),
            (0x0006, "staa $1050"),
            (0x0009, "ldab $02,y"),
            (0x000B, "bne $00"),
            (0x000D, "bp16 $1000"),
        ];
        for (pc, text) in expect.iter() {
            let (_, res) = disasm(&mm, *pc).unwrap();
            assert_eq!(res, *text);
        }
    }

    #[test]
    fn unknown_opcode() {
        let mm = mem_with(&[0xFF]);
        assert_eq!(
            disasm(&mm, 0).unwrap_err(),
            CpuError::UnknownInstruction { opcode: 0xFF, pc: 0 }
        );
    }
}
