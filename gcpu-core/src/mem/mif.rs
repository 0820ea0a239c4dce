//! Memory Initialization File (MIF) codec.
//!
//! Both the ROM and RAM images use the same 4096 x 8 layout. RAM content is
//! stored rebased to 0x0000, so the caller picks the load offset.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::consts::{memmap, IMAGE_DEPTH};
use crate::error::LoadError;

const HEADER: &str = "DEPTH = 4096;\nWIDTH = 8;\nADDRESS_RADIX = HEX;\nDATA_RADIX = HEX;\nCONTENT\nBEGIN\n\n";
const FOOTER: &str = "\nEND;\n";

/// One body line of a MIF image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MifRecord {
    Single { addr: u16, value: u8 },
    Range { start: u16, end: u16, value: u8 },
}

impl MifRecord {
    /// Calls `f` for every address covered by the record.
    pub fn for_each(&self, mut f: impl FnMut(usize, u8)) {
        match *self {
            MifRecord::Single { addr, value } => f(addr as usize, value),
            MifRecord::Range { start, end, value } => {
                for addr in start as usize..=end as usize {
                    f(addr, value);
                }
            }
        }
    }
}

fn malformed(line: usize, text: &str) -> LoadError {
    LoadError::MalformedFile {
        line,
        text: text.to_string(),
    }
}

fn parse_hex(tok: &str, max: usize) -> Option<usize> {
    let v = usize::from_str_radix(tok.trim(), 16).ok()?;
    if v > max {
        return None;
    }
    Some(v)
}

fn parse_record(body: &str, depth: usize) -> Option<MifRecord> {
    let body = body.strip_suffix(';')?;
    let mut parts = body.splitn(2, ':');
    let lhs = parts.next()?.trim();
    let value = parse_hex(parts.next()?, 0xFF)? as u8;

    match lhs.strip_prefix('[') {
        Some(range) => {
            let range = range.strip_suffix(']')?;
            let mut bounds = range.splitn(2, "..");
            let start = parse_hex(bounds.next()?, depth - 1)? as u16;
            let end = parse_hex(bounds.next()?, depth - 1)? as u16;
            if start > end {
                return None;
            }
            Some(MifRecord::Range { start, end, value })
        }
        None => {
            let addr = parse_hex(lhs, depth - 1)? as u16;
            Some(MifRecord::Single { addr, value })
        }
    }
}

// `= 4096;` following the DEPTH keyword
fn parse_depth(rest: &str) -> Option<usize> {
    let value = rest.trim().strip_prefix('=')?.trim().strip_suffix(';')?;
    match value.trim().parse::<usize>() {
        Ok(d) if d > 0 && d <= IMAGE_DEPTH => Some(d),
        _ => None,
    }
}

///
/// Parses the text of a MIF image into its body records.
///
/// `DEPTH` in the header bounds every body address and may not exceed 4096;
/// other header lines are skipped. Every non-empty body line up to `END;`
/// must be a single or a range record.
///
pub fn parse(text: &str) -> Result<Vec<MifRecord>, LoadError> {
    let mut records = Vec::new();
    let mut in_body = false;
    let mut depth = IMAGE_DEPTH;
    let mut last_line = 0;

    for (idx, raw) in text.lines().enumerate() {
        let line_num = idx + 1;
        let line = raw.trim();
        last_line = line_num;

        if !in_body {
            if let Some(rest) = line.strip_prefix("DEPTH") {
                depth = parse_depth(rest).ok_or_else(|| malformed(line_num, line))?;
            }
            if line == "BEGIN" || line.ends_with(" BEGIN") {
                in_body = true;
            }
            continue;
        }

        if line.is_empty() {
            continue;
        }
        if line == "END;" || line == "END" {
            return Ok(records);
        }

        match parse_record(line, depth) {
            Some(r) => records.push(r),
            None => return Err(malformed(line_num, line)),
        }
    }

    if in_body {
        Err(malformed(last_line + 1, "missing END;"))
    } else {
        Err(malformed(last_line + 1, "missing BEGIN"))
    }
}

///
/// Renders one image worth of written bytes (addresses already rebased to
/// 0x0000..=0x0FFF). Written bytes become single records, every unwritten
/// run becomes one zero-filled range record, including the tail up to the
/// last address of the image.
///
pub fn render(bytes: &BTreeMap<u16, u8>) -> String {
    let mut out = String::from(HEADER);
    let mut cursor: usize = 0;

    for (&addr, &value) in bytes.iter() {
        let addr = addr as usize;
        if addr > cursor {
            let _ = writeln!(out, "[{:04X}..{:04X}] : 00;", cursor, addr - 1);
        }
        let _ = writeln!(out, "{:04X} : {:02X};", addr, value);
        cursor = addr + 1;
    }

    if cursor < IMAGE_DEPTH {
        let _ = writeln!(out, "[{:04X}..{:04X}] : 00;", cursor, IMAGE_DEPTH - 1);
    }

    out.push_str(FOOTER);
    out
}

///
/// Splits a sparse map of logical addresses into the ROM image and the RAM
/// image. RAM addresses come out rebased to 0x0000. Addresses beyond the RAM
/// region are not representable and are dropped.
///
pub fn split_images(memory: &BTreeMap<u16, u8>) -> (BTreeMap<u16, u8>, BTreeMap<u16, u8>) {
    let mut rom = BTreeMap::new();
    let mut ram = BTreeMap::new();

    for (&addr, &value) in memory.iter() {
        match addr as usize {
            memmap::ROM_START..=memmap::ROM_END => {
                rom.insert(addr, value);
            }
            memmap::RAM_START..=memmap::RAM_END => {
                ram.insert(addr - memmap::RAM_START as u16, value);
            }
            _ => {}
        }
    }

    (rom, ram)
}
