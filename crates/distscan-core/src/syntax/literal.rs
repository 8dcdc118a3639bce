//! Decoding of string literal bodies.

use super::token::StringLiteral;

/// Value of a (non-bytes) string literal.
///
/// Raw literals are returned verbatim. Otherwise the standard escapes are decoded;
/// unknown escapes keep their backslash, and `\N{...}` is kept as written because
/// resolving Unicode character names needs a name table.
pub fn decode_string(literal: &StringLiteral) -> String
{
    if literal.is_raw() {
        return literal.body.clone();
    }

    let chars: Vec<char> = literal.body.chars().collect();
    let mut out = String::with_capacity(literal.body.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c != '\\' || i + 1 >= chars.len() {
            out.push(c);
            i += 1;
            continue;
        }

        let escaped = chars[i + 1];
        i += 2;
        match escaped {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut value = escaped.to_digit(8).unwrap_or(0);
                let mut taken = 1;
                while taken < 3 && i < chars.len() && chars[i].is_digit(8) {
                    value = value * 8 + chars[i].to_digit(8).unwrap_or(0);
                    i += 1;
                    taken += 1;
                }
                push_code_point(&mut out, value, &chars[i - taken - 1..i]);
            }
            'x' => i = decode_hex(&chars, i, 2, &mut out),
            'u' => i = decode_hex(&chars, i, 4, &mut out),
            'U' => i = decode_hex(&chars, i, 8, &mut out),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}

/// Decode `width` hex digits starting at `start` (just after `\x`, `\u` or `\U`).
///
/// Malformed escapes are copied through unchanged. Returns the next index.
fn decode_hex(chars: &[char], start: usize, width: usize, out: &mut String) -> usize
{
    let end = start + width;
    let digits = chars.get(start..end);
    let value = digits.and_then(|digits| {
        let text: String = digits.iter().collect();
        u32::from_str_radix(&text, 16).ok()
    });

    match value {
        Some(value) => {
            push_code_point(out, value, &chars[start - 2..end]);
            end
        }
        None => {
            out.extend(&chars[start - 2..start]);
            start
        }
    }
}

fn push_code_point(out: &mut String, value: u32, original: &[char])
{
    match char::from_u32(value) {
        Some(c) => out.push(c),
        None => out.extend(original),
    }
}
