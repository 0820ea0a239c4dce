use std::collections::BTreeMap;
use std::fmt;

use log::{debug, trace};

use gcpu_core::consts::MEM_SIZE;
use gcpu_core::instr::{GAddrMode, GMnem};
use gcpu_core::utils::parse_literal;

use crate::error::AsmError;
use crate::grammar::{self, Directive, Statement};
use crate::preproc::{self, SourceLine};

/// A non-fatal finding. Assembly still produces output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

///
/// Result of a successful assembly.
///
///  - `memory` - every explicitly written byte, keyed by address.
///  - `macros` - labels (as decimal address text) and `equ` bindings (as the
///    raw operand text).
///  - `lines` - address of each instruction mapped to its source line.
///
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub memory: BTreeMap<u16, u8>,
    pub macros: BTreeMap<String, String>,
    pub lines: BTreeMap<u16, (usize, String)>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Assembly {
    ///
    /// Symbol table: every binding whose text is a numeric value that fits
    /// an address.
    ///
    pub fn symbols(&self) -> BTreeMap<String, u16> {
        self.macros
            .iter()
            .filter_map(|(name, text)| match parse_literal(text) {
                Some(v) if v <= 0xFFFF => Some((name.clone(), v as u16)),
                _ => None,
            })
            .collect()
    }
}

struct Line<'a> {
    src: &'a SourceLine,
    label: Option<String>,
    stmt: Statement,
}

fn parse_line(src: &SourceLine) -> Result<Line<'_>, AsmError> {
    let (label, rest) = grammar::split_label(&src.text);
    let stmt = match grammar::parse_statement(rest) {
        Some(s) => s,
        None => {
            let name = rest.split_whitespace().next().unwrap_or("");
            return Err(if grammar::is_directive(name) {
                AsmError::InvalidOperand {
                    line: src.number,
                    text: rest.to_string(),
                }
            } else {
                AsmError::UnknownInstruction {
                    line: src.number,
                    text: rest.to_string(),
                }
            });
        }
    };

    Ok(Line {
        src,
        label: label.map(|l| l.to_string()),
        stmt,
    })
}

fn literal(line: usize, tok: &str) -> Result<u32, AsmError> {
    parse_literal(tok).ok_or_else(|| AsmError::InvalidOperand {
        line,
        text: tok.to_string(),
    })
}

struct Assembler {
    cursor: u32,
    out: Assembly,
}

impl Assembler {
    fn new() -> Assembler {
        Assembler {
            cursor: 0,
            out: Assembly::default(),
        }
    }

    fn diag(&mut self, line: usize, message: String) {
        debug!("line {}: {}", line, message);
        self.out.diagnostics.push(Diagnostic { line, message });
    }

    fn bind(&mut self, line: usize, name: &str, value: String) {
        trace!("Binding {} = {}", name, value);
        if let Some(old) = self.out.macros.insert(name.to_string(), value.clone()) {
            if old != value {
                self.diag(
                    line,
                    format!("label `{}` rebound from {} to {}", name, old, value),
                );
            }
        }
    }

    fn bind_here(&mut self, l: &Line) {
        if let Some(label) = &l.label {
            self.bind(l.src.number, label, self.cursor.to_string());
        }
    }

    fn emit(&mut self, line: usize, addr: u32, value: u8) -> Result<(), AsmError> {
        if addr >= MEM_SIZE as u32 {
            return Err(AsmError::AddressOutOfRange { line, addr });
        }
        let addr16 = addr as u16;
        if self.out.memory.contains_key(&addr16) {
            return Err(AsmError::DuplicateDefinition { line, addr });
        }
        self.out.memory.insert(addr16, value);
        Ok(())
    }

    fn define_bytes(&mut self, l: &Line, values: &[String]) -> Result<(), AsmError> {
        let n = l.src.number;
        self.bind_here(l);
        for (i, tok) in values.iter().enumerate() {
            let v = literal(n, tok)?;
            if v > 0xFF {
                self.diag(n, format!("value {} truncated to 8 bits", tok));
            }
            self.emit(n, self.cursor.saturating_add(i as u32), v as u8)?;
        }
        self.cursor = self.cursor.saturating_add(values.len() as u32);
        Ok(())
    }

    ///
    /// ## Pass 1
    ///
    /// Handles `org`, `equ`, `db`, `dc.b` and `ds.b`. Data bytes are placed
    /// here and the cursor is left where the last directive put it.
    ///
    fn pass_directives(&mut self, lines: &[Line]) -> Result<(), AsmError> {
        for l in lines.iter() {
            let dir = match &l.stmt {
                Statement::Directive(d) => d,
                _ => continue,
            };
            let n = l.src.number;

            match dir {
                Directive::Org(tok) => {
                    let addr = literal(n, tok)?;
                    if addr > 0xFFFF {
                        return Err(AsmError::AddressOutOfRange { line: n, addr });
                    }
                    self.cursor = addr;
                    self.bind_here(l);
                }
                Directive::Equ(tok) => match &l.label {
                    Some(label) => self.bind(n, label, tok.clone()),
                    None => self.diag(n, "equ without a label has no effect".to_string()),
                },
                Directive::Db(tok) => self.define_bytes(l, std::slice::from_ref(tok))?,
                Directive::Dcb(toks) => self.define_bytes(l, toks)?,
                Directive::Dsb(tok) => {
                    let size = literal(n, tok)?;
                    self.bind_here(l);
                    for i in 0..size {
                        self.emit(n, self.cursor.saturating_add(i), 0)?;
                    }
                    self.cursor = self.cursor.saturating_add(size);
                }
            }
        }
        Ok(())
    }

    ///
    /// ## Pass 2
    ///
    /// Binds instruction labels to their final addresses, starting from the
    /// cursor pass 1 left behind.
    ///
    fn pass_addresses(&mut self, lines: &[Line]) {
        for l in lines.iter() {
            if let Statement::Instruction { mnem, .. } = &l.stmt {
                self.bind_here(l);
                self.cursor = self.cursor.saturating_add(mnem.len() as u32);
            }
        }
    }

    fn resolve(&self, line: usize, tok: &str) -> Result<u32, AsmError> {
        let text = match self.out.macros.get(tok) {
            Some(t) => t.as_str(),
            None => tok,
        };

        match parse_literal(text) {
            Some(v) => Ok(v),
            None if self.out.macros.contains_key(tok) => Err(AsmError::InvalidOperand {
                line,
                text: format!("{} = {}", tok, text),
            }),
            None if tok.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') => {
                Err(AsmError::UndefinedSymbol {
                    line,
                    name: tok.to_string(),
                })
            }
            None => Err(AsmError::InvalidOperand {
                line,
                text: tok.to_string(),
            }),
        }
    }

    fn encode(&mut self, l: &Line, mnem: GMnem, operand: &Option<String>) -> Result<(), AsmError> {
        let n = l.src.number;
        let addr = self.cursor;
        let tok = operand.as_deref().unwrap_or("");

        self.emit(n, addr, mnem.opcode())?;
        match mnem.mode() {
            GAddrMode::Inherent => {}
            GAddrMode::Immediate8 | GAddrMode::IndexedX | GAddrMode::IndexedY => {
                let v = self.resolve(n, tok)?;
                if v > 0xFF {
                    self.diag(n, format!("operand {} (${:X}) truncated to 8 bits", tok, v));
                }
                self.emit(n, addr + 1, v as u8)?;
            }
            GAddrMode::Branch8 => {
                let v = self.resolve(n, tok)?;
                let page = (addr + 1) & 0xFF00;
                if v > 0xFF && v & 0xFF00 != page {
                    self.diag(
                        n,
                        format!("branch target ${:04X} is outside of page ${:04X}", v, page),
                    );
                }
                self.emit(n, addr + 1, v as u8)?;
            }
            GAddrMode::Immediate16 | GAddrMode::Absolute | GAddrMode::Branch16 => {
                let v = self.resolve(n, tok)?;
                if v > 0xFFFF {
                    self.diag(n, format!("operand {} (${:X}) truncated to 16 bits", tok, v));
                }
                self.emit(n, addr + 1, v as u8)?;
                self.emit(n, addr + 2, (v >> 8) as u8)?;
            }
        }

        self.out.lines.insert(addr as u16, (n, l.src.text.clone()));
        self.cursor = addr + mnem.len() as u32;
        Ok(())
    }

    ///
    /// ## Pass 3
    ///
    /// Encodes every instruction from the pass 1 end cursor onwards.
    ///
    fn pass_encode(&mut self, lines: &[Line]) -> Result<(), AsmError> {
        for l in lines.iter() {
            if let Statement::Instruction { mnem, operand } = &l.stmt {
                self.encode(l, *mnem, operand)?;
            }
        }
        Ok(())
    }
}

///
/// ## `assemble` Function
///
/// Assembles G-CPU source text into a sparse memory map, its bindings and a
/// line map.
///
/// # Errors
///
/// Any `AsmError` aborts the whole assembly.
///
pub fn assemble(source: &str) -> Result<Assembly, AsmError> {
    let src = preproc::preprocess(source)?;
    let lines = src.iter().map(parse_line).collect::<Result<Vec<_>, _>>()?;

    let mut asm = Assembler::new();
    asm.pass_directives(&lines)?;
    let code_start = asm.cursor;
    debug!("Directives done, code starts at {:04x}", code_start);

    asm.pass_addresses(&lines);
    asm.cursor = code_start;
    asm.pass_encode(&lines)?;

    debug!(
        "Assembled {} bytes, {} bindings",
        asm.out.memory.len(),
        asm.out.macros.len()
    );
    Ok(asm.out)
}

#[cfg(test)]
mod assembler_tests {
    use super::*;
    use gcpu_core::consts::opcodes;

    #[test]
    fn code_follows_data_cursor() {
        let src = "
            org $1000
        val: dc.b 1,2
            tab
        ";
        let out = assemble(src).unwrap();
        assert_eq!(out.memory.get(&0x1000), Some(&1));
        assert_eq!(out.memory.get(&0x1001), Some(&2));
        assert_eq!(out.memory.get(&0x1002), Some(&opcodes::TAB));
        assert_eq!(out.symbols().get("val"), Some(&0x1000));
    }

    #[test]
    fn equ_binds_raw_text_once() {
        let src = "
        base: equ $1400
        alias: equ base
            ldaa base
            ldab alias
        ";
        let err = assemble(src).unwrap_err();
        assert!(matches!(err, AsmError::InvalidOperand { line: 5, .. }));

        let out = assemble("base: equ $1400\n ldaa base\n").unwrap();
        assert_eq!(out.memory.get(&0x0001), Some(&0x00));
        assert_eq!(out.memory.get(&0x0002), Some(&0x14));
        assert_eq!(out.macros.get("base").map(|s| s.as_str()), Some("$1400"));
    }

    #[test]
    fn ds_reserves_zeroed_bytes() {
        let out = assemble("org $1010\nbuf: ds.b 3\nnext: db $ff\norg 0\ntab\n").unwrap();
        for a in 0x1010..0x1013 {
            assert_eq!(out.memory.get(&a), Some(&0));
        }
        assert_eq!(out.memory.get(&0x1013), Some(&0xFF));
        assert_eq!(out.symbols().get("next"), Some(&0x1013));
    }

    #[test]
    fn sixteen_bit_branches() {
        let out = assemble("beq16 $1234\nbp16 top\ntop: tab\n").unwrap();
        let bytes: Vec<u8> = out.memory.values().copied().collect();
        assert_eq!(
            bytes,
            vec![opcodes::BEQ16, 0x34, 0x12, opcodes::BP16, 0x06, 0x00, opcodes::TAB]
        );
    }

    #[test]
    fn diagnostics_are_collected() {
        let src = "
            equ 5
            ldaa #$1ff
        far: tab
            beq far
            ldx #$12345
        far: tba
        ";
        let out = assemble(src).unwrap();
        let msgs: Vec<&str> = out.diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(msgs.len(), 4, "{:?}", msgs);
        assert!(msgs[0].contains("equ without a label"));
        assert!(msgs.iter().any(|m| m.contains("truncated to 8 bits")));
        assert!(msgs.iter().any(|m| m.contains("truncated to 16 bits")));
        assert!(msgs.iter().any(|m| m.contains("rebound")));
        assert_eq!(out.memory.get(&0x0001), Some(&0xFF));
    }

    #[test]
    fn branch_out_of_page_is_reported() {
        let out = assemble("far: equ $0210\nbne far\n").unwrap();
        assert_eq!(out.memory.get(&0x0001), Some(&0x10));
        assert_eq!(out.diagnostics.len(), 1);
        assert!(out.diagnostics[0].message.contains("outside of page"));
    }

    #[test]
    fn fatal_errors() {
        assert!(matches!(
            assemble("tab\nldaa missing\n").unwrap_err(),
            AsmError::UndefinedSymbol { line: 2, .. }
        ));
        assert!(matches!(
            assemble("org $1fff\ndc.b 1,2\n").unwrap_err(),
            AsmError::AddressOutOfRange {
                line: 2,
                addr: 0x2000
            }
        ));
        assert!(matches!(
            assemble("org $10000\n").unwrap_err(),
            AsmError::AddressOutOfRange { line: 1, .. }
        ));
        assert!(matches!(
            assemble("dc.b 1,x2z!\n").unwrap_err(),
            AsmError::InvalidOperand { line: 1, .. }
        ));
        assert!(matches!(
            assemble("org 0\ndb 1\norg 0\ntab\n").unwrap_err(),
            AsmError::DuplicateDefinition { line: 4, addr: 0 }
        ));
    }

    #[test]
    fn line_map_records_instructions() {
        let out = assemble("; header\nstart:\n  ldaa #1\n  tab\n").unwrap();
        assert_eq!(out.lines.get(&0), Some(&(3, "start: ldaa #1".to_string())));
        assert_eq!(out.lines.get(&2), Some(&(4, "tab".to_string())));
    }
}
