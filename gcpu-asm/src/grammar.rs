//! Source grammar: label splitting, directive recognition and the ordered
//! mnemonic pattern table.

use gcpu_core::instr::GMnem;
use gcpu_core::utils::is_symbol_name;

/// Operand shape a pattern accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// No operand.
    Bare,
    /// `#value`
    Immediate,
    /// `value`
    Plain,
    /// `value,x`
    IndexX,
    /// `value,y`
    IndexY,
}

#[derive(Debug, Clone, Copy)]
pub struct Pattern {
    pub mnemonic: &'static str,
    pub shape: Shape,
    pub mnem: GMnem,
}

const fn pat(mnemonic: &'static str, shape: Shape, mnem: GMnem) -> Pattern {
    Pattern {
        mnemonic,
        shape,
        mnem,
    }
}

/// Patterns in match priority order. The first entry that accepts a line wins.
pub static PATTERNS: [Pattern; 42] = [
    pat("tab", Shape::Bare, GMnem::TAB),
    pat("tba", Shape::Bare, GMnem::TBA),
    pat("ldaa", Shape::Immediate, GMnem::LDAAI),
    pat("ldab", Shape::Immediate, GMnem::LDABI),
    pat("ldaa", Shape::Plain, GMnem::LDAA),
    pat("ldab", Shape::Plain, GMnem::LDAB),
    pat("staa", Shape::Plain, GMnem::STAA),
    pat("stab", Shape::Plain, GMnem::STAB),
    pat("ldx", Shape::Immediate, GMnem::LDXI),
    pat("ldy", Shape::Immediate, GMnem::LDYI),
    pat("ldx", Shape::Plain, GMnem::LDX),
    pat("ldy", Shape::Plain, GMnem::LDY),
    pat("ldaa", Shape::IndexX, GMnem::LDAAX),
    pat("ldaa", Shape::IndexY, GMnem::LDAAY),
    pat("ldab", Shape::IndexX, GMnem::LDABX),
    pat("ldab", Shape::IndexY, GMnem::LDABY),
    pat("staa", Shape::IndexX, GMnem::STAAX),
    pat("staa", Shape::IndexY, GMnem::STAAY),
    pat("stab", Shape::IndexX, GMnem::STABX),
    pat("stab", Shape::IndexY, GMnem::STABY),
    pat("sum_ba", Shape::Bare, GMnem::SUMBA),
    pat("sum_ab", Shape::Bare, GMnem::SUMAB),
    pat("and_ba", Shape::Bare, GMnem::ANDBA),
    pat("and_ab", Shape::Bare, GMnem::ANDAB),
    pat("or_ba", Shape::Bare, GMnem::ORBA),
    pat("or_ab", Shape::Bare, GMnem::ORAB),
    pat("coma", Shape::Bare, GMnem::COMA),
    pat("comb", Shape::Bare, GMnem::COMB),
    pat("shfa_l", Shape::Bare, GMnem::SHFAL),
    pat("shfa_r", Shape::Bare, GMnem::SHFAR),
    pat("shfb_l", Shape::Bare, GMnem::SHFBL),
    pat("shfb_r", Shape::Bare, GMnem::SHFBR),
    pat("inx", Shape::Bare, GMnem::INX),
    pat("iny", Shape::Bare, GMnem::INY),
    pat("beq", Shape::Plain, GMnem::BEQ),
    pat("bne", Shape::Plain, GMnem::BNE),
    pat("bn", Shape::Plain, GMnem::BN),
    pat("bp", Shape::Plain, GMnem::BP),
    pat("beq16", Shape::Plain, GMnem::BEQ16),
    pat("bne16", Shape::Plain, GMnem::BNE16),
    pat("bn16", Shape::Plain, GMnem::BN16),
    pat("bp16", Shape::Plain, GMnem::BP16),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Org(String),
    Equ(String),
    Db(String),
    Dcb(Vec<String>),
    Dsb(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Directive(Directive),
    Instruction { mnem: GMnem, operand: Option<String> },
}

///
/// Operand tokens are `[$%]?[a-z0-9_]+`: a literal or a symbol name.
///
pub fn is_operand_token(tok: &str) -> bool {
    let body = tok
        .strip_prefix('$')
        .or_else(|| tok.strip_prefix('%'))
        .unwrap_or(tok);
    is_symbol_name(body)
}

///
/// Splits an optional leading `label:` off a line.
///
pub fn split_label(text: &str) -> (Option<&str>, &str) {
    if let Some(pos) = text.find(':') {
        let label = &text[..pos];
        if is_symbol_name(label) {
            return (Some(label), text[pos + 1..].trim());
        }
    }
    (None, text.trim())
}

fn split_mnemonic(text: &str) -> (&str, &str) {
    match text.find(char::is_whitespace) {
        Some(pos) => (&text[..pos], text[pos..].trim()),
        None => (text, ""),
    }
}

fn parse_directive(name: &str, rest: &str) -> Option<Directive> {
    let values: Vec<String> = rest.split(',').map(|v| v.trim().to_string()).collect();
    if rest.is_empty() || !values.iter().all(|v| is_operand_token(v)) {
        return None;
    }

    let single = if values.len() == 1 {
        Some(values[0].clone())
    } else {
        None
    };

    match name {
        "org" => single.map(Directive::Org),
        "equ" => single.map(Directive::Equ),
        "db" => single.map(Directive::Db),
        "ds.b" => single.map(Directive::Dsb),
        "dc.b" => Some(Directive::Dcb(values)),
        _ => None,
    }
}

fn operand_shape(operand: &str) -> Option<(Shape, &str)> {
    if operand.is_empty() {
        return Some((Shape::Bare, ""));
    }

    let (shape, tok) = if let Some(rest) = operand.strip_prefix('#') {
        (Shape::Immediate, rest)
    } else if let Some(rest) = operand.strip_suffix(",x") {
        (Shape::IndexX, rest)
    } else if let Some(rest) = operand.strip_suffix(",y") {
        (Shape::IndexY, rest)
    } else {
        (Shape::Plain, operand)
    };

    if is_operand_token(tok) {
        Some((shape, tok))
    } else {
        None
    }
}

pub fn is_directive(name: &str) -> bool {
    matches!(name, "org" | "equ" | "db" | "dc.b" | "ds.b")
}

///
/// ## `parse_statement` Function
///
/// Recognises the statement part of a line (label already removed). Returns
/// `None` when the text is neither a directive nor an instruction accepted by
/// any pattern.
///
pub fn parse_statement(text: &str) -> Option<Statement> {
    let (name, rest) = split_mnemonic(text);

    if is_directive(name) {
        return parse_directive(name, rest).map(Statement::Directive);
    }

    let (shape, tok) = operand_shape(rest)?;
    PATTERNS
        .iter()
        .find(|p| p.mnemonic == name && p.shape == shape)
        .map(|p| Statement::Instruction {
            mnem: p.mnem,
            operand: if shape == Shape::Bare {
                None
            } else {
                Some(tok.to_string())
            },
        })
}

#[cfg(test)]
mod grammar_tests {
    use super::*;

    fn instr(text: &str) -> Option<(GMnem, Option<String>)> {
        match parse_statement(text) {
            Some(Statement::Instruction { mnem, operand }) => Some((mnem, operand)),
            _ => None,
        }
    }

    #[test]
    fn every_mnemonic_has_one_pattern_per_shape() {
        for (i, a) in PATTERNS.iter().enumerate() {
            for b in PATTERNS[i + 1..].iter() {
                assert!(
                    !(a.mnemonic == b.mnemonic && a.shape == b.shape),
                    "{} listed twice",
                    a.mnemonic
                );
                assert_ne!(a.mnem, b.mnem);
            }
        }
    }

    #[test]
    fn shapes_select_addressing_mode() {
        assert_eq!(instr("ldaa #$05"), Some((GMnem::LDAAI, Some("$05".to_string()))));
        assert_eq!(instr("ldaa $1050"), Some((GMnem::LDAA, Some("$1050".to_string()))));
        assert_eq!(instr("ldaa $02,x"), Some((GMnem::LDAAX, Some("$02".to_string()))));
        assert_eq!(instr("stab count,y"), Some((GMnem::STABY, Some("count".to_string()))));
        assert_eq!(instr("ldx #%1010"), Some((GMnem::LDXI, Some("%1010".to_string()))));
        assert_eq!(instr("sum_ba"), Some((GMnem::SUMBA, None)));
        assert_eq!(instr("bne16 loop"), Some((GMnem::BNE16, Some("loop".to_string()))));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(instr("tab $01"), None);
        assert_eq!(instr("ldaa"), None);
        assert_eq!(instr("beq #$10"), None);
        assert_eq!(instr("ldx $10,x"), None);
        assert_eq!(instr("ldaa $02, x"), None);
        assert_eq!(instr("jmp $1000"), None);
    }

    #[test]
    fn directives() {
        assert_eq!(
            parse_statement("org $1000"),
            Some(Statement::Directive(Directive::Org("$1000".to_string())))
        );
        assert_eq!(
            parse_statement("dc.b 1,$02, %11"),
            Some(Statement::Directive(Directive::Dcb(vec![
                "1".to_string(),
                "$02".to_string(),
                "%11".to_string()
            ])))
        );
        assert_eq!(parse_statement("db 1,2"), None);
        assert_eq!(parse_statement("ds.b"), None);
    }

    #[test]
    fn label_split() {
        assert_eq!(split_label("loop: inx"), (Some("loop"), "inx"));
        assert_eq!(split_label("inx"), (None, "inx"));
        assert_eq!(split_label("bad label: inx"), (None, "bad label: inx"));
    }
}
