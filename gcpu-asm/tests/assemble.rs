use gcpu_asm::output::{debug_info, mif_images, write_outputs};
use gcpu_asm::{assemble, AsmError};
use gcpu_core::consts::{opcodes, MEM_SIZE};
use gcpu_core::{DebugInfo, GCpu, MemoryImage};

const SUM_PROGRAM: &str = "
; adds the value at count to itself and stores it in result
        org $1000
count:  dc.b 3
result: ds.b 1
        org $0000

start:  ldx #count
        ldaa 0,x
        tab
        sum_ba
        staa result
        ldaa #0
done:   beq done
";

#[test]
fn forward_label_resolves_to_final_address() {
    let src = "
    start: beq end
           tab
           tba
    end:   tab
    ";
    let out = assemble(src).unwrap();
    assert_eq!(out.memory.get(&0x0000), Some(&opcodes::BEQ));
    assert_eq!(out.memory.get(&0x0001), Some(&0x04));
    assert_eq!(out.symbols().get("end"), Some(&0x0004));
}

#[test]
fn assembling_twice_is_byte_identical() {
    let a = assemble(SUM_PROGRAM).unwrap();
    let b = assemble(SUM_PROGRAM).unwrap();

    assert_eq!(mif_images(&a), mif_images(&b));
    assert_eq!(
        serde_json::to_string(&debug_info(&a)).unwrap(),
        serde_json::to_string(&debug_info(&b)).unwrap()
    );
}

#[test]
fn images_round_trip_into_memory() {
    let out = assemble(SUM_PROGRAM).unwrap();
    let (rom, ram) = mif_images(&out);
    let mm = MemoryImage::from_mif(&rom, &ram).unwrap();

    for addr in 0..MEM_SIZE {
        let expect = out.memory.get(&(addr as u16)).copied().unwrap_or(0);
        assert_eq!(mm.read(addr), Ok(expect), "mismatch at {:04x}", addr);
    }
}

#[test]
fn assembled_program_runs() {
    let out = assemble(SUM_PROGRAM).unwrap();
    let (rom, ram) = mif_images(&out);
    let mut cpu = GCpu::new(MemoryImage::from_mif(&rom, &ram).unwrap());
    let done = out.symbols()["done"];

    for _ in 0..7 {
        cpu.step().unwrap();
    }
    assert_eq!(cpu.pc, done);
    cpu.step().unwrap();
    assert_eq!(cpu.pc, done);

    assert_eq!(cpu.read(0x1001), Ok(6));
    assert_eq!(cpu.x, 0x1000);
    assert_eq!(cpu.b, 3);
}

#[test]
fn duplicate_definition_is_fatal() {
    let src = "
        org $1000
        dc.b 1,2
        org $1001
        db 3
    ";
    match assemble(src) {
        Err(AsmError::DuplicateDefinition { line, addr }) => {
            assert_eq!(line, 5);
            assert_eq!(addr, 0x1001);
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn unknown_instruction_reports_line_and_text() {
    let err = assemble("tab\n\njmp $10\n").unwrap_err();
    match err {
        AsmError::UnknownInstruction { line, ref text } => {
            assert_eq!(line, 3);
            assert_eq!(text, "jmp $10");
        }
        ref other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(err.to_string(), "line 3: unknown instruction `jmp $10`");
}

#[test]
fn outputs_written_to_directory() {
    let dir = std::env::temp_dir().join(format!("gcpu-asm-out-{}", std::process::id()));
    let out = assemble(SUM_PROGRAM).unwrap();
    write_outputs(&out, &dir).unwrap();

    let mm = MemoryImage::load(dir.join("rom.mif"), dir.join("ram.mif")).unwrap();
    assert_eq!(mm.read(0x1000), Ok(3));
    assert_eq!(mm.read(0x0000), Ok(opcodes::LDXI));

    let info = DebugInfo::load(dir.join("symbols.json")).unwrap();
    assert_eq!(info.symbol("result"), Some(0x1001));
    assert_eq!(info.line_at(0x0000).map(|l| l.1.as_str()), Some("start:  ldx #count"));

    let _ = std::fs::remove_dir_all(&dir);
}
