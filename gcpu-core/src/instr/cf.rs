use crate::cpu::{GCond, GCpu};
use crate::error::CpuError;

use log::trace;

pub trait GControlFlow {
    fn branch8(&mut self, cond: GCond) -> Result<(), CpuError>;
    fn branch16(&mut self, cond: GCond) -> Result<(), CpuError>;
}

impl GControlFlow for GCpu {
    ///
    /// ## 8-bit branch (`beq`, `bne`, `bn`, `bp`)
    ///
    ///  When the condition holds only the low byte of PC is replaced with the
    ///  operand, so the target stays inside the page of the operand byte.
    ///  Otherwise execution falls through to the next instruction.
    ///
    fn branch8(&mut self, cond: GCond) -> Result<(), CpuError> {
        let target = self.fetch(1)?;
        if self.condition(cond) {
            let page = self.pc.wrapping_add(1) & 0xFF00;
            trace!("Branch {:?} taken to {:04x}", cond, page | target as u16);
            self.pc = page | target as u16;
        } else {
            self.advance_pc(2);
        }
        Ok(())
    }

    ///
    /// ## 16-bit branch (`beq16`, `bne16`, `bn16`, `bp16`)
    ///
    ///  Same conditions as the 8-bit family, but the operand is a full
    ///  little-endian address and the branch is not confined to a page.
    ///
    fn branch16(&mut self, cond: GCond) -> Result<(), CpuError> {
        let target = self.fetch_u16(1)?;
        if self.condition(cond) {
            trace!("Branch {:?} taken to {:04x}", cond, target);
            self.pc = target;
        } else {
            self.advance_pc(3);
        }
        Ok(())
    }
}
