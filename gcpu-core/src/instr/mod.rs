pub mod alu;
pub mod cf;
pub mod ldst;

pub use alu::GAlu;
pub use cf::GControlFlow;
pub use ldst::GLoadStore;

#[cfg(test)]
pub mod tests;

use crate::consts::opcodes;

/// Instruction mnemonics. The discriminant is the opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GMnem {
    TAB = opcodes::TAB,
    TBA = opcodes::TBA,
    LDAAI = opcodes::LDAAI,
    LDABI = opcodes::LDABI,
    LDAA = opcodes::LDAA,
    LDAB = opcodes::LDAB,
    STAA = opcodes::STAA,
    STAB = opcodes::STAB,
    LDXI = opcodes::LDXI,
    LDYI = opcodes::LDYI,
    LDX = opcodes::LDX,
    LDY = opcodes::LDY,
    LDAAX = opcodes::LDAAX,
    LDAAY = opcodes::LDAAY,
    LDABX = opcodes::LDABX,
    LDABY = opcodes::LDABY,
    STAAX = opcodes::STAAX,
    STAAY = opcodes::STAAY,
    STABX = opcodes::STABX,
    STABY = opcodes::STABY,
    SUMBA = opcodes::SUMBA,
    SUMAB = opcodes::SUMAB,
    ANDBA = opcodes::ANDBA,
    ANDAB = opcodes::ANDAB,
    ORBA = opcodes::ORBA,
    ORAB = opcodes::ORAB,
    COMA = opcodes::COMA,
    COMB = opcodes::COMB,
    SHFAL = opcodes::SHFAL,
    SHFAR = opcodes::SHFAR,
    SHFBL = opcodes::SHFBL,
    SHFBR = opcodes::SHFBR,
    BEQ = opcodes::BEQ,
    BNE = opcodes::BNE,
    BN = opcodes::BN,
    BP = opcodes::BP,
    BEQ16 = opcodes::BEQ16,
    BNE16 = opcodes::BNE16,
    BN16 = opcodes::BN16,
    BP16 = opcodes::BP16,
    INX = opcodes::INX,
    INY = opcodes::INY,
}

pub const ALL_MNEMS: [GMnem; 42] = [
    GMnem::TAB,
    GMnem::TBA,
    GMnem::LDAAI,
    GMnem::LDABI,
    GMnem::LDAA,
    GMnem::LDAB,
    GMnem::STAA,
    GMnem::STAB,
    GMnem::LDXI,
    GMnem::LDYI,
    GMnem::LDX,
    GMnem::LDY,
    GMnem::LDAAX,
    GMnem::LDAAY,
    GMnem::LDABX,
    GMnem::LDABY,
    GMnem::STAAX,
    GMnem::STAAY,
    GMnem::STABX,
    GMnem::STABY,
    GMnem::SUMBA,
    GMnem::SUMAB,
    GMnem::ANDBA,
    GMnem::ANDAB,
    GMnem::ORBA,
    GMnem::ORAB,
    GMnem::COMA,
    GMnem::COMB,
    GMnem::SHFAL,
    GMnem::SHFAR,
    GMnem::SHFBL,
    GMnem::SHFBR,
    GMnem::BEQ,
    GMnem::BNE,
    GMnem::BN,
    GMnem::BP,
    GMnem::BEQ16,
    GMnem::BNE16,
    GMnem::BN16,
    GMnem::BP16,
    GMnem::INX,
    GMnem::INY,
];

/// How an instruction's operand bytes are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GAddrMode {
    Inherent,
    Immediate8,
    Immediate16,
    Absolute,
    IndexedX,
    IndexedY,
    Branch8,
    Branch16,
}

impl GAddrMode {
    /// Encoded length in bytes, opcode included.
    pub const fn len(self) -> u16 {
        match self {
            GAddrMode::Inherent => 1,
            GAddrMode::Immediate8
            | GAddrMode::IndexedX
            | GAddrMode::IndexedY
            | GAddrMode::Branch8 => 2,
            GAddrMode::Immediate16 | GAddrMode::Absolute | GAddrMode::Branch16 => 3,
        }
    }
}

impl GMnem {
    pub const fn opcode(self) -> u8 {
        self as u8
    }

    pub const fn mode(self) -> GAddrMode {
        match self {
            GMnem::LDAAI | GMnem::LDABI => GAddrMode::Immediate8,
            GMnem::LDXI | GMnem::LDYI => GAddrMode::Immediate16,
            GMnem::LDAA
            | GMnem::LDAB
            | GMnem::STAA
            | GMnem::STAB
            | GMnem::LDX
            | GMnem::LDY => GAddrMode::Absolute,
            GMnem::LDAAX | GMnem::LDABX | GMnem::STAAX | GMnem::STABX => GAddrMode::IndexedX,
            GMnem::LDAAY | GMnem::LDABY | GMnem::STAAY | GMnem::STABY => GAddrMode::IndexedY,
            GMnem::BEQ | GMnem::BNE | GMnem::BN | GMnem::BP => GAddrMode::Branch8,
            GMnem::BEQ16 | GMnem::BNE16 | GMnem::BN16 | GMnem::BP16 => GAddrMode::Branch16,
            _ => GAddrMode::Inherent,
        }
    }

    pub const fn len(self) -> u16 {
        self.mode().len()
    }

    /// Assembly mnemonic as written in source.
    pub fn name(self) -> &'static str {
        match self {
            GMnem::TAB => "tab",
            GMnem::TBA => "tba",
            GMnem::LDAAI | GMnem::LDAA | GMnem::LDAAX | GMnem::LDAAY => "ldaa",
            GMnem::LDABI | GMnem::LDAB | GMnem::LDABX | GMnem::LDABY => "ldab",
            GMnem::STAA | GMnem::STAAX | GMnem::STAAY => "staa",
            GMnem::STAB | GMnem::STABX | GMnem::STABY => "stab",
            GMnem::LDXI | GMnem::LDX => "ldx",
            GMnem::LDYI | GMnem::LDY => "ldy",
            GMnem::SUMBA => "sum_ba",
            GMnem::SUMAB => "sum_ab",
            GMnem::ANDBA => "and_ba",
            GMnem::ANDAB => "and_ab",
            GMnem::ORBA => "or_ba",
            GMnem::ORAB => "or_ab",
            GMnem::COMA => "coma",
            GMnem::COMB => "comb",
            GMnem::SHFAL => "shfa_l",
            GMnem::SHFAR => "shfa_r",
            GMnem::SHFBL => "shfb_l",
            GMnem::SHFBR => "shfb_r",
            GMnem::BEQ => "beq",
            GMnem::BNE => "bne",
            GMnem::BN => "bn",
            GMnem::BP => "bp",
            GMnem::BEQ16 => "beq16",
            GMnem::BNE16 => "bne16",
            GMnem::BN16 => "bn16",
            GMnem::BP16 => "bp16",
            GMnem::INX => "inx",
            GMnem::INY => "iny",
        }
    }
}

const fn build_opcode_table() -> [Option<GMnem>; 0x100] {
    let mut table = [None; 0x100];
    let mut i = 0;
    while i < ALL_MNEMS.len() {
        let m = ALL_MNEMS[i];
        table[m.opcode() as usize] = Some(m);
        i += 1;
    }
    table
}

/// Dense opcode lookup indexed by the opcode byte.
pub static OPCODE_TABLE: [Option<GMnem>; 0x100] = build_opcode_table();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GInst {
    pub pc: u16,
    pub opcode: u8,
    pub mnem: GMnem,
}

impl GInst {
    ///
    /// Decodes the opcode fetched at `pc`. Returns `None` if the opcode is not
    /// part of the instruction set.
    ///
    pub fn decode(pc: u16, opcode: u8) -> Option<GInst> {
        OPCODE_TABLE[opcode as usize].map(|mnem| GInst { pc, opcode, mnem })
    }
}
