//! Python tokenizer.

use super::error::SyntaxError;
use super::token::{StringLiteral, Token, TokenKind};

const OPS_3: [&str; 5] = ["**=", "//=", ">>=", "<<=", "..."];
const OPS_2: [&str; 19] = [
    "**", "//", "==", "!=", "<=", ">=", "<<", ">>", "->", ":=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "@=",
];
const OPS_1: [&str; 24] = [
    "+", "-", "*", "/", "%", "@", "&", "|", "^", "~", "<", ">", "=", ".", ",", ":", ";", "!", "(", ")", "[", "]",
    "{", "}",
];

const STRING_PREFIXES: [&str; 11] = ["r", "u", "b", "f", "t", "br", "rb", "fr", "rf", "tr", "rt"];

const TAB_SIZE: usize = 8;

/// Converts Python source text into a token stream.
///
/// Indentation is tracked on a stack and reported as `Indent`/`Dedent` tokens.
/// Newlines inside brackets and after a line-continuation backslash are not
/// reported, and blank or comment-only lines produce no tokens at all.
pub struct Lexer
{
    chars: Vec<char>,
    pos: usize,
    line: usize,
    indents: Vec<usize>,
    brackets: Vec<(char, usize)>,
    at_line_start: bool,
    tokens: Vec<Token>,
}

impl Lexer
{
    pub fn new(source: &str) -> Self
    {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            indents: vec![0],
            brackets: Vec::new(),
            at_line_start: true,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the whole input. The result always ends with `EndMarker`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, SyntaxError>
    {
        // Skip a UTF-8 byte order mark.
        if self.peek(0) == Some('\u{feff}') {
            self.pos += 1;
        }

        while self.pos < self.chars.len() {
            if self.at_line_start && self.brackets.is_empty() {
                if !self.read_indentation()? {
                    continue;
                }
            }
            self.read_token()?;
        }

        if let Some((open, line)) = self.brackets.last() {
            return Err(SyntaxError::new(*line, format!("'{open}' was never closed")));
        }

        let needs_newline = matches!(
            self.tokens.last().map(|token| &token.kind),
            Some(kind) if !matches!(kind, TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent)
        );
        if needs_newline {
            self.push(TokenKind::Newline);
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.push(TokenKind::Dedent);
        }
        self.push(TokenKind::EndMarker);
        Ok(self.tokens)
    }

    fn peek(&self, offset: usize) -> Option<char>
    {
        self.chars.get(self.pos + offset).copied()
    }

    fn push(&mut self, kind: TokenKind)
    {
        self.tokens.push(Token::new(kind, self.line));
    }

    /// Measure leading whitespace of a logical line and emit indentation tokens.
    ///
    /// Returns `false` when the line was blank or comment-only and has been consumed.
    fn read_indentation(&mut self) -> Result<bool, SyntaxError>
    {
        let mut column = 0;
        while let Some(c) = self.peek(0) {
            match c {
                ' ' => column += 1,
                '\t' => column = (column / TAB_SIZE + 1) * TAB_SIZE,
                '\x0c' => column = 0,
                _ => break,
            }
            self.pos += 1;
        }

        match self.peek(0) {
            None => return Ok(false),
            Some('#') => {
                self.skip_comment();
                self.consume_line_break();
                return Ok(false);
            }
            Some('\n' | '\r') => {
                self.consume_line_break();
                return Ok(false);
            }
            _ => {}
        }

        self.at_line_start = false;
        let current = self.indents.last().copied().unwrap_or(0);
        if column > current {
            self.indents.push(column);
            self.push(TokenKind::Indent);
        } else if column < current {
            while self.indents.last().is_some_and(|&level| level > column) {
                self.indents.pop();
                self.push(TokenKind::Dedent);
            }
            if self.indents.last().copied() != Some(column) {
                return Err(SyntaxError::new(
                    self.line,
                    "unindent does not match any outer indentation level",
                ));
            }
        }
        Ok(true)
    }

    fn skip_comment(&mut self)
    {
        while let Some(c) = self.peek(0) {
            if c == '\n' || c == '\r' {
                break;
            }
            self.pos += 1;
        }
    }

    /// Consume `\n`, `\r` or `\r\n` and advance the line counter.
    fn consume_line_break(&mut self)
    {
        match self.peek(0) {
            Some('\r') => {
                self.pos += 1;
                if self.peek(0) == Some('\n') {
                    self.pos += 1;
                }
            }
            Some('\n') => self.pos += 1,
            _ => return,
        }
        self.line += 1;
    }

    fn read_token(&mut self) -> Result<(), SyntaxError>
    {
        let Some(c) = self.peek(0) else {
            return Ok(());
        };

        match c {
            ' ' | '\t' | '\x0c' => self.pos += 1,
            '#' => self.skip_comment(),
            '\n' | '\r' => {
                if self.brackets.is_empty() {
                    self.push(TokenKind::Newline);
                    self.at_line_start = true;
                }
                self.consume_line_break();
            }
            '\\' => {
                self.pos += 1;
                match self.peek(0) {
                    Some('\n' | '\r') => self.consume_line_break(),
                    None => return Err(SyntaxError::new(self.line, "unexpected EOF while parsing")),
                    Some(_) => {
                        return Err(SyntaxError::new(
                            self.line,
                            "unexpected character after line continuation character",
                        ))
                    }
                }
            }
            '\'' | '"' => self.read_string(String::new())?,
            c if c.is_ascii_digit() => self.read_number(),
            '.' if self.peek(1).is_some_and(|next| next.is_ascii_digit()) => self.read_number(),
            c if c == '_' || c.is_alphabetic() => self.read_name()?,
            _ => self.read_operator(c)?,
        }
        Ok(())
    }

    fn read_name(&mut self) -> Result<(), SyntaxError>
    {
        let start = self.pos;
        while self.peek(0).is_some_and(|c| c == '_' || c.is_alphanumeric()) {
            self.pos += 1;
        }
        let name: String = self.chars[start..self.pos].iter().collect();

        if matches!(self.peek(0), Some('\'' | '"')) && is_string_prefix(&name) {
            return self.read_string(name.to_lowercase());
        }

        self.push(TokenKind::Name(name));
        Ok(())
    }

    fn read_number(&mut self)
    {
        while let Some(c) = self.peek(0) {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                self.pos += 1;
            } else if matches!(c, '+' | '-')
                && matches!(self.chars.get(self.pos.wrapping_sub(1)), Some('e' | 'E'))
                && !self.number_is_hex()
            {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.push(TokenKind::Number);
    }

    fn number_is_hex(&self) -> bool
    {
        let mut start = self.pos;
        while start > 0 && (self.chars[start - 1].is_ascii_alphanumeric() || self.chars[start - 1] == '_') {
            start -= 1;
        }
        matches!(self.chars.get(start..start + 2), Some(['0', 'x' | 'X']))
    }

    fn read_string(&mut self, prefix: String) -> Result<(), SyntaxError>
    {
        let start_line = self.line;
        let Some(quote) = self.peek(0) else {
            return Err(SyntaxError::new(start_line, "unterminated string literal"));
        };
        let triple = self.peek(1) == Some(quote) && self.peek(2) == Some(quote);
        self.pos += if triple { 3 } else { 1 };

        let mut body = String::new();
        loop {
            let Some(c) = self.peek(0) else {
                let message = if triple {
                    format!("unterminated triple-quoted string literal (detected at line {})", self.line)
                } else {
                    format!("unterminated string literal (detected at line {})", self.line)
                };
                return Err(SyntaxError::new(start_line, message));
            };

            match c {
                '\\' => {
                    body.push(c);
                    self.pos += 1;
                    match self.peek(0) {
                        Some('\r') => {
                            body.push('\n');
                            self.consume_line_break();
                        }
                        Some('\n') => {
                            body.push('\n');
                            self.consume_line_break();
                        }
                        Some(escaped) => {
                            body.push(escaped);
                            self.pos += 1;
                        }
                        None => {}
                    }
                }
                '\n' | '\r' if !triple => {
                    return Err(SyntaxError::new(
                        start_line,
                        format!("unterminated string literal (detected at line {start_line})"),
                    ));
                }
                '\n' | '\r' => {
                    body.push('\n');
                    self.consume_line_break();
                }
                c if c == quote => {
                    if !triple {
                        self.pos += 1;
                        break;
                    }
                    if self.peek(1) == Some(quote) && self.peek(2) == Some(quote) {
                        self.pos += 3;
                        break;
                    }
                    body.push(c);
                    self.pos += 1;
                }
                _ => {
                    body.push(c);
                    self.pos += 1;
                }
            }
        }

        self.tokens
            .push(Token::new(TokenKind::String(StringLiteral { prefix, body }), start_line));
        Ok(())
    }

    fn read_operator(&mut self, c: char) -> Result<(), SyntaxError>
    {
        match c {
            '(' | '[' | '{' => self.brackets.push((c, self.line)),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match self.brackets.pop() {
                    Some((open, _)) if open == expected => {}
                    Some((open, _)) => {
                        return Err(SyntaxError::new(
                            self.line,
                            format!("closing parenthesis '{c}' does not match opening parenthesis '{open}'"),
                        ))
                    }
                    None => return Err(SyntaxError::new(self.line, format!("unmatched '{c}'"))),
                }
            }
            _ => {}
        }

        for table in [&OPS_3[..], &OPS_2[..], &OPS_1[..]] {
            for op in table {
                if self.matches_ahead(op) {
                    self.pos += op.chars().count();
                    self.push(TokenKind::Op(*op));
                    return Ok(());
                }
            }
        }

        Err(SyntaxError::new(
            self.line,
            format!("invalid character '{c}' (U+{:04X})", u32::from(c)),
        ))
    }

    fn matches_ahead(&self, text: &str) -> bool
    {
        text.chars().enumerate().all(|(offset, expected)| self.peek(offset) == Some(expected))
    }
}

fn is_string_prefix(name: &str) -> bool
{
    let lowered = name.to_lowercase();
    STRING_PREFIXES.contains(&lowered.as_str())
}
