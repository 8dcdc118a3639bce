use std::fmt::{self, Display, Formatter};

/// Tokenizer or parser failure, located by one-based line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError
{
    pub line: usize,
    pub message: String,
}

impl SyntaxError
{
    pub fn new(line: usize, message: impl Into<String>) -> Self
    {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl Display for SyntaxError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result
    {
        write!(f, "{} (line {})", self.message, self.line)
    }
}

impl std::error::Error for SyntaxError {}
