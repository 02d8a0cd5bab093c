//! Expression and statement trees produced by the parser.
//!
//! Plain sum types with exhaustive matching everywhere downstream; there is
//! no visitor machinery. Nodes embed the tokens they were parsed from, which
//! carries both the interned lexeme and the line for error reporting.

use std::{
    fmt::{self, Display},
    rc::Rc,
};

use crate::{intern::Interner, lex::Token, value::LiteralValue};

/// Stable identity of a variable-use or assignment node.
///
/// The resolver keys its scope-distance table on this, so two textually
/// identical sub-expressions must never share an id. Ids are handed out by a
/// single [`NodeIds`] counter per compilation session; a REPL keeps one
/// counter across lines so entries from earlier lines stay valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ExprId(u32);

/// Monotonic [`ExprId`] generator.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct NodeIds(u32);

impl NodeIds {
    pub fn next(&mut self) -> ExprId {
        let id = ExprId(self.0);
        self.0 += 1;
        id
    }
}

/// An expression node.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum Expr {
    /// A literal value embedded at parse time.
    Literal { value: LiteralValue },
    /// A variable read. The id keys the resolution table.
    Variable { id: ExprId, name: Token },
    /// Assignment to an existing variable; evaluates to the assigned value.
    Assign {
        id: ExprId,
        name: Token,
        value: Box<Expr>,
    },
    /// Prefix `!` or `-`.
    Unary { op: Token, right: Box<Expr> },
    /// Arithmetic or comparison; both operands evaluate before dispatch.
    Binary {
        left: Box<Expr>,
        op: Token,
        right: Box<Expr>,
    },
    /// Short-circuiting `and` / `or`; yields an operand value, not a bool.
    Logical {
        left: Box<Expr>,
        op: Token,
        right: Box<Expr>,
    },
    /// Parenthesized expression.
    Grouping { inner: Box<Expr> },
    /// A call. `paren` is the closing parenthesis, used to tag call errors.
    Call {
        callee: Box<Expr>,
        paren: Token,
        args: Vec<Expr>,
    },
}

/// A statement node.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum Stmt {
    /// Expression evaluated for its side effects, result discarded.
    Expression { expr: Expr },
    /// `print expr;` writes one formatted line to the output sink.
    Print { expr: Expr },
    /// `var name = init;` with the initializer defaulting to nil.
    Var {
        name: Token,
        initializer: Option<Expr>,
    },
    /// `{ ... }` executed in a fresh child environment.
    Block { statements: Vec<Stmt> },
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While { condition: Expr, body: Box<Stmt> },
    /// Function declaration. Shared by reference with every closure value
    /// created from it.
    Function { decl: Rc<FunctionDecl> },
    Return {
        keyword: Token,
        value: Option<Expr>,
    },
}

/// A function declaration: name, parameters, body.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct FunctionDecl {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
}

impl Expr {
    /// Renders the fully parenthesized prefix form, e.g. `(+ 1 (group 2))`.
    ///
    /// Needs the interner that produced the tree to spell out names.
    pub fn display<'a>(&'a self, interner: &'a Interner) -> impl Display + 'a {
        ExprDisplay { expr: self, interner }
    }
}

struct ExprDisplay<'a> {
    expr: &'a Expr,
    interner: &'a Interner,
}

impl Display for ExprDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, self.expr, self.interner)
    }
}

fn write_expr(f: &mut fmt::Formatter<'_>, expr: &Expr, interner: &Interner) -> fmt::Result {
    match expr {
        Expr::Literal { value } => match value {
            LiteralValue::Str(s) => write!(f, "{s}"),
            other => write!(f, "{}", other.to_value()),
        },
        Expr::Variable { name, .. } => f.write_str(interner.resolve(name.lexeme)),
        Expr::Assign { name, value, .. } => {
            write!(f, "(= {} ", interner.resolve(name.lexeme))?;
            write_expr(f, value, interner)?;
            f.write_str(")")
        }
        Expr::Unary { op, right } => {
            write!(f, "({} ", interner.resolve(op.lexeme))?;
            write_expr(f, right, interner)?;
            f.write_str(")")
        }
        Expr::Binary { left, op, right } | Expr::Logical { left, op, right } => {
            write!(f, "({} ", interner.resolve(op.lexeme))?;
            write_expr(f, left, interner)?;
            f.write_str(" ")?;
            write_expr(f, right, interner)?;
            f.write_str(")")
        }
        Expr::Grouping { inner } => {
            f.write_str("(group ")?;
            write_expr(f, inner, interner)?;
            f.write_str(")")
        }
        Expr::Call { callee, args, .. } => {
            f.write_str("(call ")?;
            write_expr(f, callee, interner)?;
            for arg in args {
                f.write_str(" ")?;
                write_expr(f, arg, interner)?;
            }
            f.write_str(")")
        }
    }
}
