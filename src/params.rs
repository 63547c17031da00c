//! Inline parameter overrides: `+(90)`, `<(1.5)`, `&(spread)`.

use crate::error::{LSystemError, ResolutionError, SyntaxError};
use crate::grammar::ConstantTable;

/// Resolves the optional `(value)` following the command at `*cursor`.
///
/// Returns `default` and leaves `cursor` untouched when no `(` follows. Otherwise
/// moves `cursor` onto the closing `)` so the caller's loop resumes right after it.
pub fn resolve_parameter(
    text: &str,
    cursor: &mut usize,
    default: f32,
    constants: &ConstantTable,
) -> Result<f32, LSystemError> {
    let bytes = text.as_bytes();
    let open = *cursor + 1;
    if bytes.get(open) != Some(&b'(') {
        return Ok(default);
    }

    let close = bytes[open + 1..]
        .iter()
        .position(|&b| b == b')')
        .map(|offset| open + 1 + offset)
        .ok_or(SyntaxError::UnterminatedParameter { position: open })?;

    let content = text[open + 1..close].trim();
    let value = match content.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => {
            constants
                .get(content)
                .ok_or_else(|| ResolutionError::UnknownConstant {
                    name: content.to_owned(),
                })?
        }
        _ => parse_leading_float(content)
            .filter(|v| v.is_finite())
            .ok_or_else(|| SyntaxError::InvalidNumber {
                position: open + 1,
                text: content.to_owned(),
            })?,
    };

    *cursor = close;
    Ok(value)
}

/// Parses the longest decimal float prefix of `s`, ignoring whatever follows.
pub fn parse_leading_float(s: &str) -> Option<f32> {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut seen_digit = int_end > end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if frac_end > end + 1 || seen_digit {
            seen_digit |= frac_end > end + 1;
            end = frac_end;
        }
    }
    if !seen_digit {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}
