use crate::cpu::{GCpu, Reg16, Reg8};
use crate::error::CpuError;

pub trait GAlu {
    fn sum(&mut self, dst: Reg8) -> Result<(), CpuError>;
    fn and(&mut self, dst: Reg8) -> Result<(), CpuError>;
    fn or(&mut self, dst: Reg8) -> Result<(), CpuError>;
    fn com(&mut self, reg: Reg8) -> Result<(), CpuError>;
    fn shift_left(&mut self, reg: Reg8) -> Result<(), CpuError>;
    fn shift_right(&mut self, reg: Reg8) -> Result<(), CpuError>;
    fn inc(&mut self, reg: Reg16) -> Result<(), CpuError>;
}

impl GAlu for GCpu {
    ///
    /// ## SUM instruction
    ///
    ///  Adds A and B modulo 256 and stores the result in `dst`. `sum_ba`
    ///  targets A, `sum_ab` targets B.
    ///
    fn sum(&mut self, dst: Reg8) -> Result<(), CpuError> {
        let val = self.a.wrapping_add(self.b);
        self.set_reg8(dst, val);
        self.advance_pc(1);
        Ok(())
    }

    fn and(&mut self, dst: Reg8) -> Result<(), CpuError> {
        let val = self.a & self.b;
        self.set_reg8(dst, val);
        self.advance_pc(1);
        Ok(())
    }

    fn or(&mut self, dst: Reg8) -> Result<(), CpuError> {
        let val = self.a | self.b;
        self.set_reg8(dst, val);
        self.advance_pc(1);
        Ok(())
    }

    fn com(&mut self, reg: Reg8) -> Result<(), CpuError> {
        let val = !self.reg8(reg);
        self.set_reg8(reg, val);
        self.advance_pc(1);
        Ok(())
    }

    fn shift_left(&mut self, reg: Reg8) -> Result<(), CpuError> {
        // Bit 7 falls off the top
        let val = self.reg8(reg) << 1;
        self.set_reg8(reg, val);
        self.advance_pc(1);
        Ok(())
    }

    fn shift_right(&mut self, reg: Reg8) -> Result<(), CpuError> {
        let val = self.reg8(reg) >> 1;
        self.set_reg8(reg, val);
        self.advance_pc(1);
        Ok(())
    }

    fn inc(&mut self, reg: Reg16) -> Result<(), CpuError> {
        let val = self.reg16(reg).wrapping_add(1);
        self.set_reg16(reg, val);
        self.advance_pc(1);
        Ok(())
    }
}

#[cfg(test)]
mod alu_tests {
    use crate::consts::opcodes;
    use crate::instr::tests::{init_cpu, validate_cpu_state};

    #[test]
    fn sum_wraps_modulo_256() {
        let srcs = [
            (opcodes::SUMBA, 0x10, 0x20, 0x30, 0x20),
            (opcodes::SUMAB, 0x10, 0x20, 0x10, 0x30),
            (opcodes::SUMBA, 0xF0, 0x20, 0x10, 0x20),
            (opcodes::SUMAB, 0xFF, 0x01, 0xFF, 0x00),
        ];

        for (op, a, b, expect_a, expect_b) in srcs.iter() {
            let mut cpu = init_cpu(&[*op]);
            cpu.a = *a;
            cpu.b = *b;
            cpu.step().unwrap();

            validate_cpu_state(&cpu, 0x0001);
            assert_eq!(cpu.a, *expect_a, "A mismatch for opcode {:x}", op);
            assert_eq!(cpu.b, *expect_b, "B mismatch for opcode {:x}", op);
        }
    }

    #[test]
    fn and_or() {
        let srcs = [
            (opcodes::ANDBA, 0x88, 0xAA),
            (opcodes::ANDAB, 0xCC, 0x88),
            (opcodes::ORBA, 0xEE, 0xAA),
            (opcodes::ORAB, 0xCC, 0xEE),
        ];

        for (op, expect_a, expect_b) in srcs.iter() {
            let mut cpu = init_cpu(&[*op]);
            cpu.a = 0xCC;
            cpu.b = 0xAA;
            cpu.step().unwrap();

            validate_cpu_state(&cpu, 0x0001);
            assert_eq!(cpu.a, *expect_a, "A mismatch for opcode {:x}", op);
            assert_eq!(cpu.b, *expect_b, "B mismatch for opcode {:x}", op);
        }
    }

    #[test]
    fn complement() {
        let mut cpu = init_cpu(&[opcodes::COMA, opcodes::COMB]);
        cpu.a = 0x0F;
        cpu.b = 0x00;
        cpu.step().unwrap();
        cpu.step().unwrap();

        validate_cpu_state(&cpu, 0x0002);
        assert_eq!(cpu.a, 0xF0);
        assert_eq!(cpu.b, 0xFF);
    }

    #[test]
    fn shifts() {
        let mut cpu = init_cpu(&[opcodes::SHFAL, opcodes::SHFAR, opcodes::SHFBL, opcodes::SHFBR]);
        cpu.a = 0x81;
        cpu.step().unwrap();
        assert_eq!(cpu.a, 0x02);

        cpu.a = 0x81;
        cpu.step().unwrap();
        assert_eq!(cpu.a, 0x40);

        cpu.b = 0xC0;
        cpu.step().unwrap();
        assert_eq!(cpu.b, 0x80);

        cpu.b = 0x01;
        cpu.step().unwrap();
        assert_eq!(cpu.b, 0x00);
        validate_cpu_state(&cpu, 0x0004);
    }

    #[test]
    fn increments_wrap_at_16_bits() {
        let mut cpu = init_cpu(&[opcodes::INX, opcodes::INY, opcodes::INX]);
        cpu.x = 0x00FF;
        cpu.y = 0xFFFF;
        cpu.step().unwrap();
        cpu.step().unwrap();

        assert_eq!(cpu.x, 0x0100);
        assert_eq!(cpu.y, 0x0000);

        cpu.x = 0xFFFF;
        cpu.step().unwrap();
        assert_eq!(cpu.x, 0x0000);
        validate_cpu_state(&cpu, 0x0003);
    }
}
