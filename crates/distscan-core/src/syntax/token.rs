//! Token types produced by the [`super::Lexer`].

/// A string literal as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral
{
    /// Lowercased prefix letters (`""`, `"r"`, `"rb"`, `"f"`, ...).
    pub prefix: String,
    /// Text between the quotes, escapes not yet decoded.
    pub body: String,
}

impl StringLiteral
{
    /// Bytes, f-strings and t-strings never form a docstring.
    pub fn is_plain_text(&self) -> bool
    {
        !self.prefix.contains(['b', 'f', 't'])
    }

    pub fn is_raw(&self) -> bool
    {
        self.prefix.contains('r')
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind
{
    Name(String),
    Number,
    String(StringLiteral),
    Op(&'static str),
    Newline,
    Indent,
    Dedent,
    EndMarker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token
{
    pub kind: TokenKind,
    /// One-based line where the token starts.
    pub line: usize,
}

impl Token
{
    pub fn new(kind: TokenKind, line: usize) -> Self
    {
        Self { kind, line }
    }

    pub fn is_op(&self, op: &str) -> bool
    {
        matches!(&self.kind, TokenKind::Op(candidate) if *candidate == op)
    }

    pub fn is_name(&self, name: &str) -> bool
    {
        matches!(&self.kind, TokenKind::Name(candidate) if candidate == name)
    }

    pub fn name(&self) -> Option<&str>
    {
        match &self.kind {
            TokenKind::Name(name) => Some(name),
            _ => None,
        }
    }
}
