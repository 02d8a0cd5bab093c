//! Static resolution pass: pre-computes the lexical binding distance of
//! every local variable reference.
//!
//! Walks the statement tree with a stack of scopes, each mapping a name to
//! whether its initializer has finished. A resolved reference is recorded as
//! `node id -> distance` where distance 0 is the innermost frame; names
//! found in no scope are left out of the table and bind to the globals frame
//! at run time. This keeps globals late-bound while locals are fixed before
//! execution starts.

use ahash::AHashMap;

use crate::{
    error::{Diagnostics, SyntaxError},
    expressions::{Expr, ExprId, FunctionDecl, Stmt},
    intern::{Interner, Symbol},
    lex::Token,
};

/// Scope-distance table keyed by node identity, written once by the
/// resolver and read-only during execution.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub(crate) struct Resolutions(AHashMap<ExprId, usize>);

impl Resolutions {
    pub fn depth(&self, id: ExprId) -> Option<usize> {
        self.0.get(&id).copied()
    }

    fn insert(&mut self, id: ExprId, depth: usize) {
        self.0.insert(id, depth);
    }

    /// Folds another table into this one. Node ids never repeat across
    /// parses of one session, so entries cannot collide.
    pub fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }
}

/// What kind of function body the resolver is currently inside. Used to
/// reject `return` at the top level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionKind {
    None,
    Function,
}

/// Resolves `statements`, reporting static errors into `diagnostics`.
pub(crate) fn resolve(statements: &[Stmt], interner: &Interner, diagnostics: &mut Diagnostics) -> Resolutions {
    let mut resolver = Resolver {
        interner,
        diagnostics,
        scopes: Vec::new(),
        resolutions: Resolutions::default(),
        current_function: FunctionKind::None,
    };
    for statement in statements {
        resolver.resolve_stmt(statement);
    }
    resolver.resolutions
}

struct Resolver<'a> {
    interner: &'a Interner,
    diagnostics: &'a mut Diagnostics,
    /// Innermost scope last. Each entry maps a name to whether its
    /// initializer has completed; the global scope is never on this stack.
    scopes: Vec<AHashMap<Symbol, bool>>,
    resolutions: Resolutions,
    current_function: FunctionKind,
}

impl Resolver<'_> {
    fn resolve_stmt(&mut self, statement: &Stmt) {
        match statement {
            Stmt::Expression { expr } | Stmt::Print { expr } => self.resolve_expr(expr),
            Stmt::Var { name, initializer } => {
                self.declare(name);
                if let Some(initializer) = initializer {
                    self.resolve_expr(initializer);
                }
                self.define(name);
            }
            Stmt::Block { statements } => {
                self.begin_scope();
                for statement in statements {
                    self.resolve_stmt(statement);
                }
                self.end_scope();
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch);
                }
            }
            Stmt::While { condition, body } => {
                self.resolve_expr(condition);
                self.resolve_stmt(body);
            }
            Stmt::Function { decl } => {
                // Declare and define eagerly so the function can recurse.
                self.declare(&decl.name);
                self.define(&decl.name);
                self.resolve_function(decl);
            }
            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionKind::None {
                    self.report(keyword, "Can't return from top-level code.");
                }
                if let Some(value) = value {
                    self.resolve_expr(value);
                }
            }
        }
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal { .. } => {}
            Expr::Variable { id, name } => {
                if let Some(scope) = self.scopes.last()
                    && scope.get(&name.lexeme) == Some(&false)
                {
                    self.report(name, "Can't read local variable in its own initializer.");
                }
                self.resolve_local(*id, name.lexeme);
            }
            Expr::Assign { id, name, value } => {
                self.resolve_expr(value);
                self.resolve_local(*id, name.lexeme);
            }
            Expr::Unary { right, .. } => self.resolve_expr(right),
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            Expr::Grouping { inner } => self.resolve_expr(inner),
            Expr::Call { callee, args, .. } => {
                self.resolve_expr(callee);
                for arg in args {
                    self.resolve_expr(arg);
                }
            }
        }
    }

    fn resolve_function(&mut self, decl: &FunctionDecl) {
        let enclosing = std::mem::replace(&mut self.current_function, FunctionKind::Function);

        self.begin_scope();
        for param in &decl.params {
            self.declare(param);
            self.define(param);
        }
        for statement in &decl.body {
            self.resolve_stmt(statement);
        }
        self.end_scope();

        self.current_function = enclosing;
    }

    fn begin_scope(&mut self) {
        self.scopes.push(AHashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Marks a name as existing in the innermost scope but not yet usable.
    /// No-op at global scope, where re-declaration is allowed.
    fn declare(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };
        if scope.contains_key(&name.lexeme) {
            let error = SyntaxError::at_token(name, self.interner, "Already a variable with this name in this scope.");
            self.diagnostics.report(error);
        }
        scope.insert(name.lexeme, false);
    }

    /// Marks a declared name's initializer as complete.
    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme, true);
        }
    }

    /// Records the distance to the innermost scope holding `name`. Names in
    /// no local scope are left unresolved and bind to globals at run time.
    fn resolve_local(&mut self, id: ExprId, name: Symbol) {
        for (distance, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name) {
                self.resolutions.insert(id, distance);
                return;
            }
        }
    }

    fn report(&mut self, token: &Token, message: &str) {
        let error = SyntaxError::at_token(token, self.interner, message);
        self.diagnostics.report(error);
    }
}
