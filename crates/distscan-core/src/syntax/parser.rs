//! Module-scope parser.
//!
//! Collects `def`, `async def` and `class` statements that bind names in the module
//! namespace: those directly in the module body and those inside module-level
//! compound statements (`if`, `try`, `with`, `for`, `while`, `match`). Bodies of
//! functions and classes are skipped, so nested definitions are never collected.

use std::collections::HashMap;

use super::error::SyntaxError;
use super::lexer::Lexer;
use super::literal::decode_string;
use super::token::{Token, TokenKind};
use crate::types::{ParamKind, Parameter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind
{
    Function,
    Class,
}

/// A function or class statement found at module scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition
{
    pub kind: DefinitionKind,
    pub name: String,
    /// First line of the definition, including its decorators.
    pub line: usize,
    /// Declared parameters; always empty for classes.
    pub params: Vec<Parameter>,
    /// Decoded docstring, not yet cleaned.
    pub docstring: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedModule
{
    /// One definition per bound name; a later definition replaces an earlier one.
    pub definitions: Vec<Definition>,
}

/// Tokenize and parse a module's source text.
pub fn parse_module(source: &str) -> Result<ParsedModule, SyntaxError>
{
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = Parser { tokens, pos: 0 };
    let mut definitions = Vec::new();
    parser.parse_statements(&mut definitions, false)?;

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<Definition> = Vec::with_capacity(definitions.len());
    for definition in definitions {
        match index.get(&definition.name) {
            Some(&slot) => unique[slot] = definition,
            None => {
                index.insert(definition.name.clone(), unique.len());
                unique.push(definition);
            }
        }
    }

    Ok(ParsedModule { definitions: unique })
}

struct Parser
{
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser
{
    fn current(&self) -> &Token
    {
        // The lexer guarantees a trailing EndMarker, and `advance` never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self, offset: usize) -> &Token
    {
        &self.tokens[(self.pos + offset).min(self.tokens.len() - 1)]
    }

    fn advance(&mut self)
    {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn at_end(&self) -> bool
    {
        self.current().kind == TokenKind::EndMarker
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T, SyntaxError>
    {
        Err(SyntaxError::new(self.current().line, message))
    }

    fn expect_op(&mut self, op: &str) -> Result<(), SyntaxError>
    {
        if self.current().is_op(op) {
            self.advance();
            Ok(())
        } else {
            self.error(format!("expected '{op}'"))
        }
    }

    /// Parse statements until end of input, or until the closing `Dedent` of the
    /// current block when `in_block` is set.
    fn parse_statements(&mut self, definitions: &mut Vec<Definition>, in_block: bool) -> Result<(), SyntaxError>
    {
        loop {
            match &self.current().kind {
                TokenKind::EndMarker => return Ok(()),
                TokenKind::Dedent if in_block => {
                    self.advance();
                    return Ok(());
                }
                TokenKind::Dedent => return self.error("unexpected unindent"),
                TokenKind::Indent => return self.error("unexpected indent"),
                TokenKind::Newline => self.advance(),
                _ => self.parse_statement(definitions)?,
            }
        }
    }

    fn parse_statement(&mut self, definitions: &mut Vec<Definition>) -> Result<(), SyntaxError>
    {
        let mut start_line = None;
        while self.current().is_op("@") {
            start_line.get_or_insert(self.current().line);
            self.skip_logical_line();
            if !self.starts_definition() {
                return self.error("invalid syntax: decorator must precede a function or class definition");
            }
        }

        let line = start_line.unwrap_or(self.current().line);
        if self.current().is_name("async") && self.peek(1).is_name("def") {
            self.advance();
            definitions.push(self.parse_function(line)?);
            return Ok(());
        }
        if self.current().is_name("def") {
            definitions.push(self.parse_function(line)?);
            return Ok(());
        }
        if self.current().is_name("class") {
            definitions.push(self.parse_class(line)?);
            return Ok(());
        }

        // Any other statement. A logical line ending in ':' opens a block whose
        // statements still belong to module scope.
        let header_line = self.current().line;
        let mut last_was_colon = false;
        while !matches!(self.current().kind, TokenKind::Newline | TokenKind::EndMarker) {
            last_was_colon = self.current().is_op(":");
            self.advance();
        }
        self.advance();

        if last_was_colon {
            if self.current().kind != TokenKind::Indent {
                return Err(SyntaxError::new(
                    header_line,
                    format!("expected an indented block after statement on line {header_line}"),
                ));
            }
            self.advance();
            self.parse_statements(definitions, true)?;
        }
        Ok(())
    }

    fn starts_definition(&self) -> bool
    {
        let current = self.current();
        current.is_op("@")
            || current.is_name("def")
            || current.is_name("class")
            || (current.is_name("async") && self.peek(1).is_name("def"))
    }

    /// Skip to just past the next `Newline`.
    fn skip_logical_line(&mut self)
    {
        while !matches!(self.current().kind, TokenKind::Newline | TokenKind::EndMarker) {
            self.advance();
        }
        self.advance();
    }

    fn parse_name(&mut self) -> Result<String, SyntaxError>
    {
        match self.current().name() {
            Some(name) if !is_keyword(name) => {
                let name = name.to_string();
                self.advance();
                Ok(name)
            }
            _ => self.error("invalid syntax: expected a name"),
        }
    }

    fn parse_function(&mut self, line: usize) -> Result<Definition, SyntaxError>
    {
        let def_line = self.current().line;
        self.advance();
        let name = self.parse_name()?;
        if self.current().is_op("[") {
            self.skip_bracketed()?;
        }
        if !self.current().is_op("(") {
            return self.error("invalid syntax: expected '(' after function name");
        }
        let params = self.parse_params()?;

        if self.current().is_op("->") {
            self.advance();
            self.skip_until_colon()?;
        }
        self.expect_op(":")?;
        let docstring = self.parse_body("function", def_line)?;

        Ok(Definition {
            kind: DefinitionKind::Function,
            name,
            line,
            params,
            docstring,
        })
    }

    fn parse_class(&mut self, line: usize) -> Result<Definition, SyntaxError>
    {
        let class_line = self.current().line;
        self.advance();
        let name = self.parse_name()?;
        if self.current().is_op("[") {
            self.skip_bracketed()?;
        }
        if self.current().is_op("(") {
            self.skip_bracketed()?;
        }
        self.expect_op(":")?;
        let docstring = self.parse_body("class", class_line)?;

        Ok(Definition {
            kind: DefinitionKind::Class,
            name,
            line,
            params: Vec::new(),
            docstring,
        })
    }

    /// Skip a balanced `(...)`, `[...]` or `{...}` group starting at the current token.
    fn skip_bracketed(&mut self) -> Result<(), SyntaxError>
    {
        let mut depth = 0usize;
        loop {
            let token = self.current();
            if token.is_op("(") || token.is_op("[") || token.is_op("{") {
                depth += 1;
            } else if token.is_op(")") || token.is_op("]") || token.is_op("}") {
                depth = depth.saturating_sub(1);
            } else if self.at_end() {
                return self.error("unexpected EOF while parsing");
            }
            self.advance();
            if depth == 0 {
                return Ok(());
            }
        }
    }

    /// Skip a return annotation up to the `:` that opens the body.
    fn skip_until_colon(&mut self) -> Result<(), SyntaxError>
    {
        let mut depth = 0usize;
        loop {
            let token = self.current();
            if depth == 0 && token.is_op(":") {
                return Ok(());
            }
            if matches!(token.kind, TokenKind::Newline | TokenKind::EndMarker) {
                return self.error("invalid syntax: expected ':'");
            }
            if token.is_op("(") || token.is_op("[") || token.is_op("{") {
                depth += 1;
            } else if token.is_op(")") || token.is_op("]") || token.is_op("}") {
                depth = depth.saturating_sub(1);
            }
            self.advance();
        }
    }

    /// Parse `( ... )` of a function header into parameters.
    fn parse_params(&mut self) -> Result<Vec<Parameter>, SyntaxError>
    {
        self.expect_op("(")?;

        // Split the parameter list at top-level commas. Commas between `lambda` and
        // its `:` belong to the lambda of a default value.
        let mut chunks: Vec<Vec<Token>> = vec![Vec::new()];
        let mut depth = 0usize;
        let mut open_lambdas = 0usize;
        loop {
            let token = self.current().clone();
            if self.at_end() {
                return self.error("unexpected EOF while parsing");
            }
            self.advance();

            if token.is_op("(") || token.is_op("[") || token.is_op("{") {
                depth += 1;
            } else if token.is_op(")") || token.is_op("]") || token.is_op("}") {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            } else if depth == 0 && token.is_name("lambda") {
                open_lambdas += 1;
            } else if depth == 0 && open_lambdas > 0 && token.is_op(":") {
                open_lambdas -= 1;
            } else if depth == 0 && open_lambdas == 0 && token.is_op(",") {
                chunks.push(Vec::new());
                continue;
            }
            if let Some(chunk) = chunks.last_mut() {
                chunk.push(token);
            }
        }

        // A single trailing comma leaves one empty chunk behind.
        if chunks.len() > 1 && chunks.last().is_some_and(Vec::is_empty) {
            chunks.pop();
        }
        if chunks.len() == 1 && chunks[0].is_empty() {
            return Ok(Vec::new());
        }

        let mut params: Vec<Parameter> = Vec::new();
        let mut keyword_only = false;
        for chunk in &chunks {
            let Some(first) = chunk.first() else {
                return Err(SyntaxError::new(self.current().line, "invalid syntax: empty parameter"));
            };

            if first.is_op("/") {
                if chunk.len() != 1 || keyword_only {
                    return Err(SyntaxError::new(first.line, "invalid syntax: misplaced '/'"));
                }
                for param in &mut params {
                    param.kind = ParamKind::PositionalOnly;
                }
                continue;
            }

            if first.is_op("*") {
                keyword_only = true;
                if chunk.len() == 1 {
                    continue;
                }
                let name = param_name(&chunk[1..], first.line)?;
                params.push(Parameter::new(name, ParamKind::VarPositional));
                continue;
            }

            if first.is_op("**") {
                let name = param_name(&chunk[1..], first.line)?;
                params.push(Parameter::new(name, ParamKind::VarKeyword));
                continue;
            }

            let name = param_name(chunk, first.line)?;
            let kind = if keyword_only {
                ParamKind::KeywordOnly
            } else {
                ParamKind::PositionalOrKeyword
            };
            params.push(Parameter::new(name, kind));
        }
        Ok(params)
    }

    /// Parse the body after the header's `:` and return its docstring, leaving the
    /// parser after the body.
    fn parse_body(&mut self, what: &str, header_line: usize) -> Result<Option<String>, SyntaxError>
    {
        if self.current().kind != TokenKind::Newline {
            // Body on the header line: `def f(): "doc"`.
            let docstring = self.docstring_here();
            self.skip_logical_line();
            return Ok(docstring);
        }

        self.advance();
        if self.current().kind != TokenKind::Indent {
            return self.error(format!(
                "expected an indented block after {what} definition on line {header_line}"
            ));
        }
        self.advance();
        let docstring = self.docstring_here();

        let mut depth = 1usize;
        while depth > 0 && !self.at_end() {
            match self.current().kind {
                TokenKind::Indent => depth += 1,
                TokenKind::Dedent => depth -= 1,
                _ => {}
            }
            self.advance();
        }
        Ok(docstring)
    }

    /// Docstring of the statement starting at the current token, without consuming it.
    ///
    /// The statement must be a run of plain string literals, optionally wrapped in
    /// any number of parentheses.
    fn docstring_here(&self) -> Option<String>
    {
        let mut offset = 0;
        while self.peek(offset).is_op("(") {
            offset += 1;
        }
        let open = offset;

        let mut value = String::new();
        while let TokenKind::String(literal) = &self.peek(offset).kind {
            if !literal.is_plain_text() {
                return None;
            }
            value.push_str(&decode_string(literal));
            offset += 1;
        }
        if offset == open {
            return None;
        }

        for _ in 0..open {
            if !self.peek(offset).is_op(")") {
                return None;
            }
            offset += 1;
        }

        let terminator = self.peek(offset);
        let terminated = matches!(terminator.kind, TokenKind::Newline | TokenKind::EndMarker) || terminator.is_op(";");
        terminated.then_some(value)
    }
}

/// Name at the start of a parameter chunk; anything after it must be an
/// annotation or a default.
fn param_name(chunk: &[Token], line: usize) -> Result<String, SyntaxError>
{
    let Some(first) = chunk.first() else {
        return Err(SyntaxError::new(line, "invalid syntax: missing parameter name"));
    };
    let name = match first.name() {
        Some(name) if !is_keyword(name) => name.to_string(),
        _ => return Err(SyntaxError::new(first.line, "invalid syntax in parameter list")),
    };
    if let Some(next) = chunk.get(1) {
        if !(next.is_op(":") || next.is_op("=")) {
            return Err(SyntaxError::new(next.line, "invalid syntax in parameter list"));
        }
    }
    Ok(name)
}

fn is_keyword(name: &str) -> bool
{
    matches!(
        name,
        "False"
            | "None"
            | "True"
            | "and"
            | "as"
            | "assert"
            | "async"
            | "await"
            | "break"
            | "class"
            | "continue"
            | "def"
            | "del"
            | "elif"
            | "else"
            | "except"
            | "finally"
            | "for"
            | "from"
            | "global"
            | "if"
            | "import"
            | "in"
            | "is"
            | "lambda"
            | "nonlocal"
            | "not"
            | "or"
            | "pass"
            | "raise"
            | "return"
            | "try"
            | "while"
            | "with"
            | "yield"
    )
}
