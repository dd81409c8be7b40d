/// Failure while decoding a string literal body: byte offset of the backslash plus the
/// offending escape character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EscapeError {
    pub offset: usize,
    pub ch: char,
}

/// Strips the surrounding quotes (`'` or `"`) and decodes escapes.
pub fn unquote(s: &str) -> Result<String, EscapeError> {
    let bytes = s.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        unescape(&s[1..bytes.len() - 1]).map_err(|e| EscapeError {
            offset: e.offset + 1,
            ch: e.ch,
        })
    } else {
        unescape(s)
    }
}

fn hex_digits(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>, n: usize) -> Option<u32> {
    let mut v = 0u32;
    for _ in 0..n {
        let (_, c) = chars.next()?;
        v = v * 16 + c.to_digit(16)?;
    }
    Some(v)
}

pub fn unescape(s: &str) -> Result<String, EscapeError> {
    let mut res = String::with_capacity(s.len());
    let mut chars = s.char_indices().peekable();
    while let Some((at, c)) = chars.next() {
        if c != '\\' {
            res.push(c);
            continue;
        }
        let Some((_, esc)) = chars.next() else {
            return Err(EscapeError { offset: at, ch: '\\' });
        };
        let bad = EscapeError { offset: at, ch: esc };
        match esc {
            'n' => res.push('\n'),
            'r' => res.push('\r'),
            't' => res.push('\t'),
            'b' => res.push('\u{0008}'),
            'f' => res.push('\u{000C}'),
            'v' => res.push('\u{000B}'),
            '0' if !chars.peek().is_some_and(|(_, c)| c.is_ascii_digit()) => res.push('\0'),
            'x' => {
                let v = hex_digits(&mut chars, 2).ok_or(bad)?;
                res.push(char::from_u32(v).ok_or(bad)?);
            }
            'u' => {
                let v = if chars.peek().is_some_and(|(_, c)| *c == '{') {
                    chars.next();
                    let mut v = 0u32;
                    let mut digits = 0;
                    loop {
                        let (_, c) = chars.next().ok_or(bad)?;
                        if c == '}' {
                            break;
                        }
                        v = v
                            .checked_mul(16)
                            .and_then(|v| v.checked_add(c.to_digit(16)?))
                            .ok_or(bad)?;
                        digits += 1;
                    }
                    if digits == 0 {
                        return Err(bad);
                    }
                    v
                } else {
                    hex_digits(&mut chars, 4).ok_or(bad)?
                };
                // Lone surrogates cannot live in a Rust string.
                res.push(char::from_u32(v).unwrap_or('\u{FFFD}'));
            }
            '\n' => {}
            other if other.is_ascii_digit() => return Err(bad),
            other => res.push(other),
        }
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_common_escapes() {
        assert_eq!(unquote(r#""a\tb\n""#).unwrap(), "a\tb\n");
        assert_eq!(unquote(r"'it\'s'").unwrap(), "it's");
        assert_eq!(unquote(r#""\x41B\u{43}""#).unwrap(), "ABC");
    }

    #[test]
    fn rejects_truncated_hex_escape() {
        let err = unquote(r#""\x4""#).unwrap_err();
        assert_eq!(err.ch, 'x');
        assert_eq!(err.offset, 1);
    }
}
