///
/// `parse_literal` function converts a numeric literal token into its value.
///
/// # Arguments
///
///  - `tok` - Literal text. `$` prefixes hexadecimal, `%` prefixes binary,
///    anything else is read as decimal.
///
/// # Results
///
///  - `Some(u32)` with the value, or `None` if the token is not a literal
///    or does not fit within 32 bits.
///
pub fn parse_literal(tok: &str) -> Option<u32> {
    let (digits, radix) = if let Some(rest) = tok.strip_prefix('$') {
        (rest, 16)
    } else if let Some(rest) = tok.strip_prefix('%') {
        (rest, 2)
    } else {
        (tok, 10)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u32::from_str_radix(digits, radix).ok()
}

///
/// Joins two bytes stored little-endian into a 16-bit word.
///
pub fn word_from_le(low: u8, high: u8) -> u16 {
    (high as u16) << 8 | low as u16
}

///
/// Returns whether `tok` is a valid symbol name (`[a-z0-9_]+`, any case).
///
pub fn is_symbol_name(tok: &str) -> bool {
    !tok.is_empty() && tok.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod utils_tests {
    use super::*;

    #[test]
    fn parse_literal_radixes() {
        assert_eq!(parse_literal("$1F"), Some(0x1F));
        assert_eq!(parse_literal("$1f"), Some(0x1F));
        assert_eq!(parse_literal("%1010"), Some(0b1010));
        assert_eq!(parse_literal("4176"), Some(4176));
    }

    #[test]
    fn parse_literal_rejects_garbage() {
        assert_eq!(parse_literal(""), None);
        assert_eq!(parse_literal("$"), None);
        assert_eq!(parse_literal("%102"), None);
        assert_eq!(parse_literal("loop"), None);
        assert_eq!(parse_literal("12ab"), None);
        assert_eq!(parse_literal("-1"), None);
    }

    #[test]
    fn word_assembly() {
        assert_eq!(word_from_le(0x34, 0x12), 0x1234);
    }
}
