//! Symbol and parameter types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a cataloged definition.
///
/// Members that are neither functions nor classes never become symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind
{
    /// Plain, coroutine or built-in function.
    Function,
    /// Class (type object).
    Class,
}

impl fmt::Display for SymbolKind
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let label = match self {
            SymbolKind::Function => "function",
            SymbolKind::Class => "class",
        };
        write!(f, "{label}")
    }
}

/// A function or class discovered inside a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol
{
    /// Name as bound in the module namespace.
    pub name: String,
    /// Function or class.
    pub kind: SymbolKind,
    /// Rendered parameter list, or a placeholder.
    pub signature: String,
    /// First one or two documentation lines joined by a space.
    pub doc_head: String,
    /// Source file defining the symbol, if known.
    pub defined_in: Option<String>,
    /// One-based line where the definition starts, if known.
    pub line_no: Option<u32>,
}

/// How a parameter binds arguments.
///
/// Variant names follow the names Python's `inspect.Parameter.kind` reports so the
/// probe output deserializes directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParamKind
{
    PositionalOnly,
    PositionalOrKeyword,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

/// A single declared parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter
{
    pub name: String,
    pub kind: ParamKind,
}

impl Parameter
{
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self
    {
        Self { name: name.into(), kind }
    }
}

impl fmt::Display for Parameter
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self.kind {
            ParamKind::VarPositional => write!(f, "*{}", self.name),
            ParamKind::VarKeyword => write!(f, "**{}", self.name),
            _ => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_variadic_markers()
    {
        assert_eq!(Parameter::new("args", ParamKind::VarPositional).to_string(), "*args");
        assert_eq!(Parameter::new("kw", ParamKind::VarKeyword).to_string(), "**kw");
        assert_eq!(Parameter::new("x", ParamKind::KeywordOnly).to_string(), "x");
    }

    #[test]
    fn test_kind_serializes_lowercase()
    {
        assert_eq!(serde_json::to_string(&SymbolKind::Class).unwrap(), "\"class\"");
        assert_eq!(SymbolKind::Function.to_string(), "function");
    }
}
