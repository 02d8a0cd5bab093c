//! Public interface for compiling and running Rill source.

use crate::{
    error::{Diagnostics, RuntimeError, SyntaxErrors},
    expressions::{NodeIds, Stmt},
    intern::Interner,
    interp::Interpreter,
    io::PrintWriter,
    lex::lex,
    parse::parse,
    resolve::{Resolutions, resolve},
};

/// A fully compiled source unit: statements, interned strings, and the
/// resolver's scope-distance table. Plain data, safe to serialize.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub(crate) struct Program {
    pub statements: Vec<Stmt>,
    pub interner: Interner,
    pub resolutions: Resolutions,
}

/// One-shot compile-and-run entry point.
///
/// `new()` runs the lexer, parser, and resolver and either yields a runner
/// holding the compiled program or every diagnostic the pipeline reported.
/// Execution is a separate step so hosts can compile once and run later,
/// or snapshot the compiled program with [`Runner::dump`].
///
/// # Example
/// ```
/// use rill::{CollectStringPrint, Runner};
///
/// let runner = Runner::new("print 1 + 2;").unwrap();
/// let mut print = CollectStringPrint::new();
/// runner.run(&mut print).unwrap();
/// assert_eq!(print.output(), "3\n");
/// ```
#[derive(Debug)]
pub struct Runner {
    program: Program,
}

impl Runner {
    /// Compiles `source`, reporting every lexical, syntax, and static error.
    ///
    /// The resolver only runs when lexing and parsing were clean, mirroring
    /// the pipeline's staged error gates.
    pub fn new(source: &str) -> Result<Self, SyntaxErrors> {
        let mut interner = Interner::new();
        let mut diagnostics = Diagnostics::default();
        let mut ids = NodeIds::default();

        let tokens = lex(source, &mut interner, &mut diagnostics);
        let statements = parse(tokens, &interner, &mut diagnostics, &mut ids);

        let resolutions = if diagnostics.is_empty() {
            resolve(&statements, &interner, &mut diagnostics)
        } else {
            Resolutions::default()
        };

        if diagnostics.is_empty() {
            Ok(Self {
                program: Program {
                    statements,
                    interner,
                    resolutions,
                },
            })
        } else {
            Err(diagnostics.into_errors())
        }
    }

    /// Executes the program on a fresh interpreter, writing `print` output
    /// to the given sink. Stops at the first runtime error.
    pub fn run(&self, print: &mut impl PrintWriter) -> Result<(), RuntimeError> {
        let mut interner = self.program.interner.clone();
        let mut interpreter = Interpreter::new(&mut interner);
        interpreter.add_resolutions(self.program.resolutions.clone());
        interpreter.interpret(&self.program.statements, &interner, print)
    }

    /// Serializes the compiled program to a binary format.
    ///
    /// The bytes can be stored and later restored with [`Runner::load`],
    /// which allows caching compilation across host runs.
    pub fn dump(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_allocvec(&self.program)
    }

    /// Restores a runner from the output of [`Runner::dump`].
    pub fn load(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes).map(|program| Self { program })
    }
}
