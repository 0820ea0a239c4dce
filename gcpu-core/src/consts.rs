/* Number of physically backed bytes within the G-CPU address space */
pub const MEM_SIZE: usize = 0x2000;

/* Number of bytes held by a single MIF image (ROM or RAM) */
pub const IMAGE_DEPTH: usize = 0x1000;

pub mod memmap {
    pub const ROM_START: usize = 0x0000;
    pub const ROM_END: usize = 0x0FFF;
    pub const RAM_START: usize = 0x1000;
    pub const RAM_END: usize = 0x1FFF;
}

pub mod opcodes {
    pub const TAB: u8 = 0x00;
    pub const TBA: u8 = 0x01;
    pub const LDAAI: u8 = 0x02;
    pub const LDABI: u8 = 0x03;
    pub const LDAA: u8 = 0x04;
    pub const LDAB: u8 = 0x05;
    pub const STAA: u8 = 0x06;
    pub const STAB: u8 = 0x07;
    pub const LDXI: u8 = 0x08;
    pub const LDYI: u8 = 0x09;
    pub const LDX: u8 = 0x0A;
    pub const LDY: u8 = 0x0B;
    pub const LDAAX: u8 = 0x0C;
    pub const LDAAY: u8 = 0x0D;
    pub const LDABX: u8 = 0x0E;
    pub const LDABY: u8 = 0x0F;
    pub const STAAX: u8 = 0x10;
    pub const STAAY: u8 = 0x11;
    pub const STABX: u8 = 0x12;
    pub const STABY: u8 = 0x13;
    pub const SUMBA: u8 = 0x14;
    pub const SUMAB: u8 = 0x15;
    pub const ANDBA: u8 = 0x16;
    pub const ANDAB: u8 = 0x17;
    pub const ORBA: u8 = 0x18;
    pub const ORAB: u8 = 0x19;
    pub const COMA: u8 = 0x1A;
    pub const COMB: u8 = 0x1B;
    pub const SHFAL: u8 = 0x1C;
    pub const SHFAR: u8 = 0x1D;
    pub const SHFBL: u8 = 0x1E;
    pub const SHFBR: u8 = 0x1F;
    pub const BEQ: u8 = 0x20;
    pub const BNE: u8 = 0x21;
    pub const BN: u8 = 0x22;
    pub const BP: u8 = 0x23;
    pub const BEQ16: u8 = 0x24;
    pub const BNE16: u8 = 0x25;
    pub const BN16: u8 = 0x26;
    pub const BP16: u8 = 0x27;
    pub const INX: u8 = 0x30;
    pub const INY: u8 = 0x31;
}

pub mod io {
    // Offsets relative to the memory-mapped I/O base address
    pub const POINTER_X: u16 = 0;
    pub const POINTER_Y: u16 = 1;
    pub const POINTER_STATE: u16 = 2;

    pub const DEFAULT_IO_BASE: u16 = 0x1400;
    pub const DEFAULT_LINE_OFFSET: u16 = 3;
    pub const DEFAULT_LINE_COUNT: u16 = 4;
}

pub mod clock {
    /* Default instruction rate of the paced execution loop */
    pub const DEFAULT_RATE_HZ: u32 = 1_100;
}
