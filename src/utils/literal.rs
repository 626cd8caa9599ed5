use std::{iter::Peekable, str::CharIndices};

use thiserror::Error;

use crate::matcher::skill::SkillFrequency;

/// Decoding failure with the byte offset it was detected at
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("unexpected {found:?} at {pos}, expected {expected}")]
    Unexpected { found: char, pos: usize, expected: &'static str },
    #[error("invalid escape \\{found} at {pos}")]
    InvalidEscape { found: char, pos: usize },
    #[error("escape at {pos} is not a valid code point ({value:#x})")]
    InvalidCodePoint { value: u32, pos: usize },
    #[error("count for {skill:?} does not fit in 64 bits")]
    CountOverflow { skill: String },
    #[error("duplicate skill {0:?}")]
    DuplicateSkill(String),
    #[error("empty skill name")]
    EmptySkill,
}

/// Decode a skill mapping literal such as `{'python': 5, "sql": 2}`.
///
/// Accepted:
/// - braces around zero or more `key: count` entries separated by commas, one trailing comma
/// - keys quoted with `'` or `"`, with the escapes repr() writes
///   (`\\ \' \" \n \t \r \a \b \f \v`, octal `\0`..`\777`, `\xHH`, `\uHHHH`, `\UHHHHHHHH`)
/// - counts as plain decimal digits
///
/// Anything else (floats, signs, booleans, nesting, bare keys, duplicate keys,
/// trailing input) is rejected instead of coerced.
pub fn parse_skill_mapping(raw: &str) -> Result<SkillFrequency, LiteralError> {
    let mut cur = Cursor { chars: raw.char_indices().peekable() };
    let mut freq = SkillFrequency::new();

    cur.skip_ws();
    cur.expect('{', "'{'")?;
    cur.skip_ws();
    if cur.eat('}') {
        return cur.finish(freq);
    }
    loop {
        cur.skip_ws();
        // trailing comma: `{'a': 1,}`
        if !freq.is_empty() && cur.eat('}') {
            break;
        }
        let skill = cur.quoted()?;
        if skill.is_empty() {
            return Err(LiteralError::EmptySkill);
        }
        if freq.contains_skill(&skill) {
            return Err(LiteralError::DuplicateSkill(skill));
        }
        cur.skip_ws();
        cur.expect(':', "':'")?;
        cur.skip_ws();
        let count = cur.count(&skill)?;
        freq.add_skill(&skill, count);
        cur.skip_ws();
        match cur.next() {
            Some((_, ',')) => continue,
            Some((_, '}')) => break,
            Some((pos, found)) => return Err(LiteralError::Unexpected { found, pos, expected: "',' or '}'" }),
            None => return Err(LiteralError::UnexpectedEnd { expected: "',' or '}'" }),
        }
    }
    cur.finish(freq)
}

struct Cursor<'a> {
    chars: Peekable<CharIndices<'a>>,
}

impl Cursor<'_> {
    fn next(&mut self) -> Option<(usize, char)> {
        self.chars.next()
    }

    fn skip_ws(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn eat(&mut self, want: char) -> bool {
        self.chars.next_if(|&(_, c)| c == want).is_some()
    }

    fn expect(&mut self, want: char, expected: &'static str) -> Result<(), LiteralError> {
        match self.next() {
            Some((_, c)) if c == want => Ok(()),
            Some((pos, found)) => Err(LiteralError::Unexpected { found, pos, expected }),
            None => Err(LiteralError::UnexpectedEnd { expected }),
        }
    }

    fn quoted(&mut self) -> Result<String, LiteralError> {
        let quote = match self.next() {
            Some((_, c @ ('\'' | '"'))) => c,
            Some((pos, found)) => return Err(LiteralError::Unexpected { found, pos, expected: "quoted skill name" }),
            None => return Err(LiteralError::UnexpectedEnd { expected: "quoted skill name" }),
        };
        let mut out = String::new();
        loop {
            match self.next() {
                Some((_, c)) if c == quote => return Ok(out),
                Some((_, '\\')) => out.push(self.escape()?),
                Some((_, c)) => out.push(c),
                None => return Err(LiteralError::UnexpectedEnd { expected: "closing quote" }),
            }
        }
    }

    /// Body of a backslash escape, same set a quoted repr() string can contain
    fn escape(&mut self) -> Result<char, LiteralError> {
        let (pos, c) = self.next().ok_or(LiteralError::UnexpectedEnd { expected: "escape character" })?;
        let c = match c {
            '\\' | '\'' | '"' => c,
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'a' => '\x07',
            'b' => '\x08',
            'f' => '\x0c',
            'v' => '\x0b',
            'x' => self.hex_escape(pos, 2)?,
            'u' => self.hex_escape(pos, 4)?,
            'U' => self.hex_escape(pos, 8)?,
            '0'..='7' => {
                // octal: 最大 3 桁、先頭は消費済み
                let mut value = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.chars.next_if(|(_, d)| d.is_digit(8)) {
                        Some((_, d)) => value = value * 8 + d.to_digit(8).unwrap_or(0),
                        None => break,
                    }
                }
                char::from_u32(value).ok_or(LiteralError::InvalidCodePoint { value, pos })?
            }
            found => return Err(LiteralError::InvalidEscape { found, pos }),
        };
        Ok(c)
    }

    /// Exactly `len` hex digits after `\x`, `\u` or `\U`
    fn hex_escape(&mut self, pos: usize, len: usize) -> Result<char, LiteralError> {
        let mut value: u32 = 0;
        for _ in 0..len {
            match self.next() {
                Some((_, d)) if d.is_ascii_hexdigit() => value = value * 16 + d.to_digit(16).unwrap_or(0),
                Some((pos, found)) => return Err(LiteralError::Unexpected { found, pos, expected: "hex digit" }),
                None => return Err(LiteralError::UnexpectedEnd { expected: "hex digit" }),
            }
        }
        char::from_u32(value).ok_or(LiteralError::InvalidCodePoint { value, pos })
    }

    fn count(&mut self, skill: &str) -> Result<u64, LiteralError> {
        let mut value: u64 = 0;
        let mut digits = 0usize;
        while let Some((_, c)) = self.chars.next_if(|(_, c)| c.is_ascii_digit()) {
            let d = u64::from(c as u8 - b'0');
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(d))
                .ok_or_else(|| LiteralError::CountOverflow { skill: skill.to_string() })?;
            digits += 1;
        }
        if digits == 0 {
            return match self.next() {
                Some((pos, found)) => Err(LiteralError::Unexpected { found, pos, expected: "non-negative integer count" }),
                None => Err(LiteralError::UnexpectedEnd { expected: "non-negative integer count" }),
            };
        }
        Ok(value)
    }

    fn finish(mut self, freq: SkillFrequency) -> Result<SkillFrequency, LiteralError> {
        self.skip_ws();
        match self.next() {
            Some((pos, found)) => Err(LiteralError::Unexpected { found, pos, expected: "end of input" }),
            None => Ok(freq),
        }
    }
}
