//! Error types surfaced by the interpreter pipeline.
//!
//! Three disjoint categories exist: lexical and syntactic/static errors are
//! collected as [`SyntaxError`]s while scanning, parsing, and resolving
//! continue; [`RuntimeError`]s abort the current program unit. The non-local
//! `return` signal is deliberately not represented here, it lives in the
//! interpreter's internal unwind type and must never be confused with an
//! error.

use std::fmt::{self, Display};

use crate::{
    intern::Interner,
    lex::{Token, TokenKind},
};

/// Where in the source a compile-time diagnostic points.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ErrorLocation {
    /// A lexical error, reported against the line alone.
    Source,
    /// The parser ran out of tokens.
    AtEnd,
    /// The offending token's lexeme.
    At(Box<str>),
}

/// A single lexical, syntactic, or static error.
///
/// Rendering matches the classic line-oriented format, for example
/// `[line 4] Error  at ')': Expected expression.` for a token error and
/// `[line 2] Error : Unterminated string.` for a lexical one.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    line: u32,
    location: ErrorLocation,
    message: String,
}

impl SyntaxError {
    /// A lexical error with no token to anchor to.
    pub(crate) fn in_source(line: u32, message: impl Into<String>) -> Self {
        Self {
            line,
            location: ErrorLocation::Source,
            message: message.into(),
        }
    }

    /// A parse or resolution error anchored to a token.
    pub(crate) fn at_token(token: &Token, interner: &Interner, message: impl Into<String>) -> Self {
        let location = if token.kind == TokenKind::Eof {
            ErrorLocation::AtEnd
        } else {
            ErrorLocation::At(Box::from(interner.resolve(token.lexeme)))
        };
        Self {
            line: token.line,
            location,
            message: message.into(),
        }
    }

    /// 1-based source line the error was reported on.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { line, location, message } = self;
        match location {
            ErrorLocation::Source => write!(f, "[line {line}] Error : {message}"),
            ErrorLocation::AtEnd => write!(f, "[line {line}] Error  at end: {message}"),
            ErrorLocation::At(lexeme) => write!(f, "[line {line}] Error  at '{lexeme}': {message}"),
        }
    }
}

impl std::error::Error for SyntaxError {}

/// Every compile-time error reported for one source unit.
///
/// The pipeline keeps going after each error (the lexer skips the bad
/// character, the parser synchronizes to the next statement boundary), so a
/// single run can carry several of these.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxErrors(Vec<SyntaxError>);

impl SyntaxErrors {
    pub(crate) fn new(errors: Vec<SyntaxError>) -> Self {
        Self(errors)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SyntaxError> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for SyntaxErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxErrors {}

/// Sink the lexer, parser, and resolver report into.
///
/// Owned by the caller driving the pipeline; once any error lands here the
/// program must not be executed.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    errors: Vec<SyntaxError>,
}

impl Diagnostics {
    pub fn report(&mut self, error: SyntaxError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> SyntaxErrors {
        SyntaxErrors::new(self.errors)
    }
}

/// An error raised while executing a program.
///
/// Rendered as the message followed by a `[line L]` trailer on its own line.
/// Raising one unwinds the current evaluation; the interpreter's globals
/// survive, which is what lets a REPL keep its session after a failed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeError {
    message: String,
    line: u32,
}

impl RuntimeError {
    pub(crate) fn new(message: impl Into<String>, line: u32) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }

    /// 1-based line of the token the error is tagged with.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n[line {}]", self.message, self.line)
    }
}

impl std::error::Error for RuntimeError {}

/// Failure of one REPL line: either it never compiled or it failed mid-run.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplError {
    /// The line had lexical, syntax, or resolution errors and was not run.
    Compile(SyntaxErrors),
    /// The line compiled but raised while executing.
    Runtime(RuntimeError),
}

impl Display for ReplError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compile(errors) => Display::fmt(errors, f),
            Self::Runtime(error) => Display::fmt(error, f),
        }
    }
}

impl std::error::Error for ReplError {}

impl From<SyntaxErrors> for ReplError {
    fn from(errors: SyntaxErrors) -> Self {
        Self::Compile(errors)
    }
}

impl From<RuntimeError> for ReplError {
    fn from(error: RuntimeError) -> Self {
        Self::Runtime(error)
    }
}
