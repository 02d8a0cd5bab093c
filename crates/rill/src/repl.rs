//! Persistent interactive session support.
//!
//! `ReplSession` keeps interpreter state across `execute()` calls so
//! interactive lines can share variables and functions: one interner, one
//! node-id counter, one globals frame. Compile errors belong to the line
//! that produced them and leave the session untouched; runtime errors stop
//! the line but keep everything already defined.

use crate::{
    error::{Diagnostics, ReplError},
    expressions::NodeIds,
    intern::Interner,
    interp::Interpreter,
    io::PrintWriter,
    lex::lex,
    parse::parse,
    resolve::{Resolutions, resolve},
    value::Value,
};

/// A REPL session with state that persists across executed lines.
///
/// # Example
/// ```
/// use rill::{CollectStringPrint, ReplSession};
///
/// let mut session = ReplSession::new();
/// let mut print = CollectStringPrint::new();
/// session.execute("var greeting = \"hi\";", &mut print).unwrap();
/// session.execute("print greeting;", &mut print).unwrap();
/// assert_eq!(print.output(), "hi\n");
/// ```
pub struct ReplSession {
    interner: Interner,
    /// Shared across lines so node ids from different parses never collide
    /// in the interpreter's resolution table.
    ids: NodeIds,
    interpreter: Interpreter,
}

impl ReplSession {
    #[must_use]
    pub fn new() -> Self {
        let mut interner = Interner::new();
        let interpreter = Interpreter::new(&mut interner);
        Self {
            interner,
            ids: NodeIds::default(),
            interpreter,
        }
    }

    /// Runs one source line (or several statements) against the session.
    ///
    /// The whole pipeline runs per call: lex, parse, resolve, execute.
    /// Nothing executes if any compile-time error was reported, and such
    /// errors are forgotten afterwards; the next call starts clean.
    pub fn execute(&mut self, source: &str, print: &mut impl PrintWriter) -> Result<(), ReplError> {
        let mut diagnostics = Diagnostics::default();

        let tokens = lex(source, &mut self.interner, &mut diagnostics);
        let statements = parse(tokens, &self.interner, &mut diagnostics, &mut self.ids);

        let resolutions = if diagnostics.is_empty() {
            resolve(&statements, &self.interner, &mut diagnostics)
        } else {
            Resolutions::default()
        };

        if !diagnostics.is_empty() {
            return Err(ReplError::Compile(diagnostics.into_errors()));
        }

        self.interpreter.add_resolutions(resolutions);
        self.interpreter
            .interpret(&statements, &self.interner, print)
            .map_err(ReplError::Runtime)
        // The statement list is dropped here; function bodies live on
        // because closures share the declarations by reference.
    }

    /// Global bindings in definition order, natives included (`clock` is
    /// always first in a fresh session).
    #[must_use]
    pub fn list_variables(&self) -> Vec<(String, Value)> {
        self.interpreter
            .global_bindings()
            .into_iter()
            .map(|(name, value)| (self.interner.resolve(name).to_owned(), value))
            .collect()
    }
}

impl Default for ReplSession {
    fn default() -> Self {
        Self::new()
    }
}
