use crate::cpu::GCpu;
use crate::mem::MemoryImage;

///
/// Builds a CPU whose ROM starts with `program`. Everything else is zero.
///
#[allow(dead_code)]
pub fn init_cpu(program: &[u8]) -> GCpu {
    let mut mm = MemoryImage::new();
    for (idx, byte) in program.iter().enumerate() {
        mm.program(idx, *byte);
    }
    GCpu::new(mm)
}

#[allow(dead_code)]
pub fn validate_cpu_state(cpu: &GCpu, expect_pc: u16) {
    assert_eq!(
        cpu.pc, expect_pc,
        "PC mismatch: e:{:04x} | r:{:04x}",
        expect_pc, cpu.pc
    );
}
