use crate::error::Error;
use crate::token::{Op, Token};

/// Strips `#`-prefixed comment lines, matching the driver-level convention:
/// a line whose first non-whitespace character is `#` is removed entirely
/// before tokenization ever sees it.
pub fn strip_comments(source: &str) -> String {
    source
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Turns source text into a flat, ordered token stream. Whitespace separates
/// tokens and carries no other meaning; there are no labels, only positions.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c == '"' {
            let start = i;
            i += 1;
            let mut buf = Vec::new();
            loop {
                if i >= chars.len() {
                    return Err(Error::Lexical(start));
                }
                if chars[i] == '"' {
                    i += 1;
                    break;
                }
                buf.push(chars[i] as i64);
                i += 1;
            }
            tokens.push(Token::Buffer(buf));
            continue;
        }

        if c == '-' && chars.get(i + 1).map_or(false, |c| c.is_ascii_digit()) {
            let (value, next) = scan_integer(&chars, i + 1, i)?;
            tokens.push(Token::Lit(-value));
            i = next;
            continue;
        }

        if c.is_ascii_digit() {
            let (value, next) = scan_integer(&chars, i, i)?;
            tokens.push(Token::Lit(value));
            i = next;
            continue;
        }

        if let Some(op) = Op::from_char(c) {
            tokens.push(Token::Op(op));
            i += 1;
            continue;
        }

        return Err(Error::Lexical(i));
    }

    Ok(tokens)
}

/// Scans a decimal or `0x`/`0X`-prefixed hex literal starting at `start`,
/// reporting lexical errors at `report_pos` (the position of a leading `-`
/// when one was consumed, so the diagnostic points at the sign).
fn scan_integer(chars: &[char], start: usize, report_pos: usize) -> Result<(i64, usize), Error> {
    if chars.get(start) == Some(&'0') && matches!(chars.get(start + 1), Some('x') | Some('X')) {
        let digits_start = start + 2;
        let mut end = digits_start;
        while end < chars.len() && chars[end].is_ascii_hexdigit() {
            end += 1;
        }
        if end == digits_start {
            return Err(Error::Lexical(report_pos));
        }
        let text: String = chars[digits_start..end].iter().collect();
        let value = i64::from_str_radix(&text, 16).map_err(|_| Error::Lexical(report_pos))?;
        return Ok((value, end));
    }

    let mut end = start;
    while end < chars.len() && chars[end].is_ascii_digit() {
        end += 1;
    }
    let text: String = chars[start..end].iter().collect();
    let value: i64 = text.parse().map_err(|_| Error::Lexical(report_pos))?;
    Ok((value, end))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tokenizes_literals_and_ops() {
        let tokens = tokenize("2 3 A P H").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Lit(2),
                Token::Lit(3),
                Token::Op(Op::Add),
                Token::Op(Op::PrintInt),
                Token::Op(Op::Halt),
            ]
        );
    }

    #[test]
    fn tokenizes_negative_and_hex_literals() {
        let tokens = tokenize("-5 0x1F").unwrap();
        assert_eq!(tokens, vec![Token::Lit(-5), Token::Lit(31)]);
    }

    #[test]
    fn tokenizes_buffer_literal_as_code_points() {
        let tokens = tokenize("\"HI\"").unwrap();
        assert_eq!(tokens, vec![Token::Buffer(vec![72, 73])]);
    }

    #[test]
    fn unterminated_buffer_is_lexical_error() {
        assert_eq!(tokenize("\"HI"), Err(Error::Lexical(0)));
    }

    #[test]
    fn empty_hex_literal_is_lexical_error() {
        assert_eq!(tokenize("0x"), Err(Error::Lexical(0)));
    }

    #[test]
    fn unknown_character_is_lexical_error() {
        assert_eq!(tokenize("2 ? H"), Err(Error::Lexical(2)));
    }

    #[test]
    fn strips_comment_lines() {
        let src = "# this is a comment\n2 3 A P H\n# trailing\n";
        assert_eq!(strip_comments(src).trim(), "2 3 A P H");
    }
}
