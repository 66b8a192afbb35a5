//! Interpretation of JavaScript literal text.
//!
//! Numeric literals land in exactly one of the three representations the
//! resolver's coercion table is defined over: `n`-suffixed and oversized
//! integers as big integers, other integers as i64, fractional and exponent
//! forms as f64.

use std::ops::Range;

use num_bigint::BigInt;
use rigel_constant::NumericValue;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LiteralError {
    pub message: String,
    /// Byte range within the provided literal text (not file offsets).
    pub span: Range<usize>,
}

fn err(message: impl Into<String>, span: Range<usize>) -> LiteralError {
    LiteralError {
        message: message.into(),
        span,
    }
}

/// Parse a JavaScript numeric literal.
pub fn parse_number_literal(text: &str) -> Result<NumericValue, LiteralError> {
    if text.is_empty() {
        return Err(err("empty numeric literal", 0..0));
    }

    let compact = strip_separators(text)?;

    if let Some(digits) = compact.strip_suffix(['n', 'N']) {
        return parse_radix_integer(digits, text.len()).map(NumericValue::BigInt);
    }

    if has_radix_prefix(&compact) {
        return Ok(fit_integer(parse_radix_integer(&compact, text.len())?));
    }

    if compact.contains(['.', 'e', 'E']) {
        let value: f64 = compact
            .parse()
            .map_err(|_| err("malformed floating-point literal", 0..text.len()))?;
        return Ok(NumericValue::Float(value));
    }

    if !compact.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err("malformed numeric literal", 0..text.len()));
    }
    let value = BigInt::parse_bytes(compact.as_bytes(), 10)
        .ok_or_else(|| err("malformed integer literal", 0..text.len()))?;
    Ok(fit_integer(value))
}

/// Integers that fit 64 bits stay there; anything bigger keeps arbitrary
/// precision.
fn fit_integer(value: BigInt) -> NumericValue {
    match i64::try_from(&value) {
        Ok(small) => NumericValue::Int(small),
        Err(_) => NumericValue::BigInt(value),
    }
}

fn has_radix_prefix(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= 2
        && bytes[0] == b'0'
        && matches!(bytes[1], b'x' | b'X' | b'o' | b'O' | b'b' | b'B')
}

fn parse_radix_integer(text: &str, original_len: usize) -> Result<BigInt, LiteralError> {
    let (radix, digits) = match text.as_bytes() {
        [b'0', b'x' | b'X', ..] => (16, &text[2..]),
        [b'0', b'o' | b'O', ..] => (8, &text[2..]),
        [b'0', b'b' | b'B', ..] => (2, &text[2..]),
        _ => (10, text),
    };
    if digits.is_empty() {
        return Err(err("missing digits after base prefix", 0..original_len));
    }
    BigInt::parse_bytes(digits.as_bytes(), radix)
        .ok_or_else(|| err(format!("invalid base-{radix} integer literal"), 0..original_len))
}

/// Drop `_` separators, requiring a digit on both sides.
fn strip_separators(text: &str) -> Result<String, LiteralError> {
    if !text.contains('_') {
        return Ok(text.to_string());
    }
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(bytes.len());
    for (idx, &b) in bytes.iter().enumerate() {
        if b != b'_' {
            out.push(b as char);
            continue;
        }
        let digit_before = idx
            .checked_sub(1)
            .map(|i| bytes[i].is_ascii_hexdigit())
            .unwrap_or(false);
        let digit_after = bytes
            .get(idx + 1)
            .map(|c| c.is_ascii_hexdigit())
            .unwrap_or(false);
        if !digit_before || !digit_after {
            return Err(err("misplaced numeric separator", idx..idx + 1));
        }
    }
    Ok(out)
}

/// Expand one `escape_sequence` token (backslash included) to its value.
pub fn unescape_escape_sequence(text: &str) -> Result<String, LiteralError> {
    let rest = text
        .strip_prefix('\\')
        .ok_or_else(|| err("escape sequence must start with a backslash", 0..text.len()))?;
    let mut chars = rest.chars();
    let lead = chars
        .next()
        .ok_or_else(|| err("empty escape sequence", 0..text.len()))?;

    let expanded = match lead {
        'n' => "\n".to_string(),
        't' => "\t".to_string(),
        'r' => "\r".to_string(),
        'b' => "\u{0008}".to_string(),
        'f' => "\u{000C}".to_string(),
        'v' => "\u{000B}".to_string(),
        '0' if chars.as_str().is_empty() => "\0".to_string(),
        // Escaped line terminators are line continuations and expand to
        // nothing.
        '\n' | '\r' | '\u{2028}' | '\u{2029}' => String::new(),
        'x' => hex_escape(chars.as_str(), 2, text.len())?,
        'u' => {
            let rest = chars.as_str();
            if let Some(braced) = rest.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
                hex_escape(braced, braced.len(), text.len())?
            } else {
                hex_escape(rest, 4, text.len())?
            }
        }
        other => other.to_string(),
    };
    Ok(expanded)
}

fn hex_escape(digits: &str, expected_len: usize, span_len: usize) -> Result<String, LiteralError> {
    if digits.len() != expected_len || digits.is_empty() {
        return Err(err("malformed hex escape", 0..span_len));
    }
    let code = u32::from_str_radix(digits, 16)
        .map_err(|_| err("malformed hex escape", 0..span_len))?;
    let c = char::from_u32(code).ok_or_else(|| err("escape is not a valid char", 0..span_len))?;
    Ok(c.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn integers_fit_into_i64() {
        assert_eq!(parse_number_literal("0"), Ok(NumericValue::Int(0)));
        assert_eq!(parse_number_literal("42"), Ok(NumericValue::Int(42)));
        // Above 2^53 but still within 64 bits.
        assert_eq!(
            parse_number_literal("9007199254740993"),
            Ok(NumericValue::Int(9007199254740993))
        );
        assert_eq!(parse_number_literal("0xFF"), Ok(NumericValue::Int(255)));
        assert_eq!(parse_number_literal("0o17"), Ok(NumericValue::Int(15)));
        assert_eq!(parse_number_literal("0b1010"), Ok(NumericValue::Int(10)));
        assert_eq!(
            parse_number_literal("1_000_000"),
            Ok(NumericValue::Int(1_000_000))
        );
    }

    #[test]
    fn oversized_integers_keep_arbitrary_precision() {
        let expected = BigInt::from_str("99999999999999999999999999").unwrap();
        assert_eq!(
            parse_number_literal("99999999999999999999999999"),
            Ok(NumericValue::BigInt(expected))
        );
    }

    #[test]
    fn bigint_suffix_always_keeps_arbitrary_precision() {
        assert_eq!(
            parse_number_literal("5n"),
            Ok(NumericValue::BigInt(BigInt::from(5)))
        );
        assert_eq!(
            parse_number_literal("0xFFn"),
            Ok(NumericValue::BigInt(BigInt::from(255)))
        );
    }

    #[test]
    fn fractional_and_exponent_forms_are_doubles() {
        assert_eq!(parse_number_literal("1.5"), Ok(NumericValue::Float(1.5)));
        assert_eq!(parse_number_literal(".5"), Ok(NumericValue::Float(0.5)));
        assert_eq!(parse_number_literal("1e3"), Ok(NumericValue::Float(1000.0)));
        assert_eq!(
            parse_number_literal("2.5e-1"),
            Ok(NumericValue::Float(0.25))
        );
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        assert!(parse_number_literal("").is_err());
        assert!(parse_number_literal("0x").is_err());
        assert!(parse_number_literal("12ab").is_err());
        assert!(parse_number_literal("_1").is_err());
        assert!(parse_number_literal("1_").is_err());
        assert!(parse_number_literal("1__0").is_err());
    }

    #[test]
    fn escape_sequences() {
        assert_eq!(unescape_escape_sequence("\\n").as_deref(), Ok("\n"));
        assert_eq!(unescape_escape_sequence("\\\\").as_deref(), Ok("\\"));
        assert_eq!(unescape_escape_sequence("\\'").as_deref(), Ok("'"));
        assert_eq!(unescape_escape_sequence("\\x41").as_deref(), Ok("A"));
        assert_eq!(unescape_escape_sequence("\\u0041").as_deref(), Ok("A"));
        assert_eq!(unescape_escape_sequence("\\u{1F600}").as_deref(), Ok("😀"));
        assert_eq!(unescape_escape_sequence("\\\n").as_deref(), Ok(""));
        assert_eq!(unescape_escape_sequence("\\0").as_deref(), Ok("\0"));
        assert!(unescape_escape_sequence("\\u00").is_err());
        assert!(unescape_escape_sequence("x").is_err());
    }
}
