use log::{info, trace};

use crate::error::CpuError;
use crate::instr::{GAlu, GControlFlow, GInst, GLoadStore, GMnem};
use crate::mem::MemoryImage;
use crate::utils::word_from_le;

/// 8-bit accumulators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg8 {
    A,
    B,
}

/// 16-bit index registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg16 {
    X,
    Y,
}

/// Branch conditions, all evaluated on accumulator A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GCond {
    Zero,
    NonZero,
    Negative,
    Positive,
}

/// Copy of the programmer-visible register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registers {
    pub a: u8,
    pub b: u8,
    pub x: u16,
    pub y: u16,
    pub pc: u16,
}

pub struct GCpu {
    mem: MemoryImage,
    pub a: u8,
    pub b: u8,
    pub x: u16,
    pub y: u16,
    pub pc: u16,
    pub total_steps: u64,
}

impl GCpu {
    pub fn new(memmap: MemoryImage) -> GCpu {
        let mut cpu = GCpu {
            mem: memmap,
            a: 0,
            b: 0,
            x: 0,
            y: 0,
            pc: 0,
            total_steps: 0,
        };

        cpu.reset();
        cpu
    }

    pub fn reset(&mut self) {
        // Execution always starts at the bottom of ROM
        self.a = 0;
        self.b = 0;
        self.x = 0;
        self.y = 0;
        self.pc = 0;
        self.total_steps = 0;
    }

    pub fn mem(&self) -> &MemoryImage {
        &self.mem
    }

    pub fn registers(&self) -> Registers {
        Registers {
            a: self.a,
            b: self.b,
            x: self.x,
            y: self.y,
            pc: self.pc,
        }
    }

    pub fn read(&self, idx: usize) -> Result<u8, CpuError> {
        self.mem.read(idx)
    }

    pub fn write(&mut self, idx: usize, val: u8) -> Result<(), CpuError> {
        self.mem.write(idx, val)
    }

    ///
    /// Reads a little-endian word as two sequential byte reads at `idx` and
    /// `idx + 1`. The second address is not wrapped.
    ///
    pub fn read_u16(&self, idx: usize) -> Result<u16, CpuError> {
        let low = self.read(idx)?;
        let high = self.read(idx + 1)?;
        Ok(word_from_le(low, high))
    }

    ///
    /// Reads the operand byte located `offset` bytes past the current PC.
    ///
    pub fn fetch(&self, offset: u16) -> Result<u8, CpuError> {
        self.read(self.pc.wrapping_add(offset) as usize)
    }

    ///
    /// Reads a little-endian operand word starting `offset` bytes past PC.
    ///
    pub fn fetch_u16(&self, offset: u16) -> Result<u16, CpuError> {
        let low = self.fetch(offset)?;
        let high = self.fetch(offset.wrapping_add(1))?;
        Ok(word_from_le(low, high))
    }

    pub fn reg8(&self, r: Reg8) -> u8 {
        match r {
            Reg8::A => self.a,
            Reg8::B => self.b,
        }
    }

    pub fn set_reg8(&mut self, r: Reg8, val: u8) {
        match r {
            Reg8::A => self.a = val,
            Reg8::B => self.b = val,
        }
    }

    pub fn reg16(&self, r: Reg16) -> u16 {
        match r {
            Reg16::X => self.x,
            Reg16::Y => self.y,
        }
    }

    pub fn set_reg16(&mut self, r: Reg16, val: u16) {
        match r {
            Reg16::X => self.x = val,
            Reg16::Y => self.y = val,
        }
    }

    pub fn condition(&self, cond: GCond) -> bool {
        match cond {
            GCond::Zero => self.a == 0,
            GCond::NonZero => self.a != 0,
            GCond::Negative => self.a & 0x80 == 0x80,
            GCond::Positive => self.a & 0x80 == 0,
        }
    }

    ///
    /// Moves PC past an instruction of `len` bytes.
    ///
    pub fn advance_pc(&mut self, len: u16) {
        self.pc = self.pc.wrapping_add(len);
    }

    ///
    /// Dispatches a decoded instruction to its handler. Each handler performs
    /// every fallible read or write before touching registers or PC, so a
    /// fault leaves the CPU exactly as it was before the instruction.
    ///
    pub fn execute(&mut self, inst: &GInst) -> Result<(), CpuError> {
        match inst.mnem {
            GMnem::TAB => self.transfer(Reg8::A, Reg8::B),
            GMnem::TBA => self.transfer(Reg8::B, Reg8::A),
            GMnem::LDAAI => self.load_imm(Reg8::A),
            GMnem::LDABI => self.load_imm(Reg8::B),
            GMnem::LDAA => self.load_abs(Reg8::A),
            GMnem::LDAB => self.load_abs(Reg8::B),
            GMnem::STAA => self.store_abs(Reg8::A),
            GMnem::STAB => self.store_abs(Reg8::B),
            GMnem::LDXI => self.load_imm16(Reg16::X),
            GMnem::LDYI => self.load_imm16(Reg16::Y),
            GMnem::LDX => self.load_abs16(Reg16::X),
            GMnem::LDY => self.load_abs16(Reg16::Y),
            GMnem::LDAAX => self.load_idx(Reg8::A, Reg16::X),
            GMnem::LDAAY => self.load_idx(Reg8::A, Reg16::Y),
            GMnem::LDABX => self.load_idx(Reg8::B, Reg16::X),
            GMnem::LDABY => self.load_idx(Reg8::B, Reg16::Y),
            GMnem::STAAX => self.store_idx(Reg8::A, Reg16::X),
            GMnem::STAAY => self.store_idx(Reg8::A, Reg16::Y),
            GMnem::STABX => self.store_idx(Reg8::B, Reg16::X),
            GMnem::STABY => self.store_idx(Reg8::B, Reg16::Y),
            GMnem::SUMBA => self.sum(Reg8::A),
            GMnem::SUMAB => self.sum(Reg8::B),
            GMnem::ANDBA => self.and(Reg8::A),
            GMnem::ANDAB => self.and(Reg8::B),
            GMnem::ORBA => self.or(Reg8::A),
            GMnem::ORAB => self.or(Reg8::B),
            GMnem::COMA => self.com(Reg8::A),
            GMnem::COMB => self.com(Reg8::B),
            GMnem::SHFAL => self.shift_left(Reg8::A),
            GMnem::SHFAR => self.shift_right(Reg8::A),
            GMnem::SHFBL => self.shift_left(Reg8::B),
            GMnem::SHFBR => self.shift_right(Reg8::B),
            GMnem::INX => self.inc(Reg16::X),
            GMnem::INY => self.inc(Reg16::Y),
            GMnem::BEQ => self.branch8(GCond::Zero),
            GMnem::BNE => self.branch8(GCond::NonZero),
            GMnem::BN => self.branch8(GCond::Negative),
            GMnem::BP => self.branch8(GCond::Positive),
            GMnem::BEQ16 => self.branch16(GCond::Zero),
            GMnem::BNE16 => self.branch16(GCond::NonZero),
            GMnem::BN16 => self.branch16(GCond::Negative),
            GMnem::BP16 => self.branch16(GCond::Positive),
        }
    }

    pub fn print_state(&self) {
        info!("=========================================================");
        info!(
            "PC: {:04x} A: {:02x} B: {:02x} X: {:04x} Y: {:04x}",
            self.pc, self.a, self.b, self.x, self.y
        );
        info!("Steps: {}", self.total_steps);
    }

    ///
    /// Fetches, decodes and executes one instruction. Returns the instruction
    /// that ran. A fault is returned without any visible change to the CPU.
    ///
    pub fn step(&mut self) -> Result<GInst, CpuError> {
        let pc = self.pc;
        let opcode = self.read(pc as usize)?;
        let inst = match GInst::decode(pc, opcode) {
            Some(i) => i,
            None => return Err(CpuError::UnknownInstruction { opcode, pc }),
        };

        trace!("{:04x}: {:?}", pc, inst.mnem);
        self.execute(&inst)?;
        self.total_steps += 1;
        Ok(inst)
    }
}
