use crate::cpu::{GCpu, Reg16, Reg8};
use crate::error::CpuError;

use log::debug;

pub trait GLoadStore {
    fn transfer(&mut self, src: Reg8, dst: Reg8) -> Result<(), CpuError>;
    fn load_imm(&mut self, dst: Reg8) -> Result<(), CpuError>;
    fn load_abs(&mut self, dst: Reg8) -> Result<(), CpuError>;
    fn store_abs(&mut self, src: Reg8) -> Result<(), CpuError>;
    fn load_imm16(&mut self, dst: Reg16) -> Result<(), CpuError>;
    fn load_abs16(&mut self, dst: Reg16) -> Result<(), CpuError>;
    fn load_idx(&mut self, dst: Reg8, idx: Reg16) -> Result<(), CpuError>;
    fn store_idx(&mut self, src: Reg8, idx: Reg16) -> Result<(), CpuError>;
}

impl GCpu {
    ///
    /// ## `effective_address` Function
    ///
    /// Computes the indexed effective address. The sum is masked to 16 bits
    /// first and then bounds checked by the memory access itself, so an index
    /// that wraps past 0xFFFF lands back at the bottom of memory.
    ///
    fn effective_address(&self, idx: Reg16, displacement: u8) -> usize {
        self.reg16(idx).wrapping_add(displacement as u16) as usize
    }
}

impl GLoadStore for GCpu {
    fn transfer(&mut self, src: Reg8, dst: Reg8) -> Result<(), CpuError> {
        let val = self.reg8(src);
        self.set_reg8(dst, val);
        self.advance_pc(1);
        Ok(())
    }

    fn load_imm(&mut self, dst: Reg8) -> Result<(), CpuError> {
        let val = self.fetch(1)?;
        self.set_reg8(dst, val);
        self.advance_pc(2);
        Ok(())
    }

    fn load_abs(&mut self, dst: Reg8) -> Result<(), CpuError> {
        let addr = self.fetch_u16(1)?;
        let val = self.read(addr as usize)?;
        self.set_reg8(dst, val);
        self.advance_pc(3);
        Ok(())
    }

    fn store_abs(&mut self, src: Reg8) -> Result<(), CpuError> {
        let addr = self.fetch_u16(1)?;
        let val = self.reg8(src);
        self.write(addr as usize, val)?;
        self.advance_pc(3);
        Ok(())
    }

    fn load_imm16(&mut self, dst: Reg16) -> Result<(), CpuError> {
        let val = self.fetch_u16(1)?;
        self.set_reg16(dst, val);
        self.advance_pc(3);
        Ok(())
    }

    fn load_abs16(&mut self, dst: Reg16) -> Result<(), CpuError> {
        let addr = self.fetch_u16(1)?;
        let val = self.read_u16(addr as usize)?;
        self.set_reg16(dst, val);
        self.advance_pc(3);
        Ok(())
    }

    fn load_idx(&mut self, dst: Reg8, idx: Reg16) -> Result<(), CpuError> {
        let d = self.fetch(1)?;
        let addr = self.effective_address(idx, d);
        let val = self.read(addr)?;
        self.set_reg8(dst, val);
        self.advance_pc(2);
        Ok(())
    }

    fn store_idx(&mut self, src: Reg8, idx: Reg16) -> Result<(), CpuError> {
        let d = self.fetch(1)?;
        let addr = self.effective_address(idx, d);
        debug!("Indexed store {:?}+{:x} => {:04x}", idx, d, addr);
        let val = self.reg8(src);
        self.write(addr, val)?;
        self.advance_pc(2);
        Ok(())
    }
}
