//! Tree-walking evaluator.
//!
//! Executes statements against a chain of environments. Control leaves a
//! statement through [`ExecResult`]: `Unwind::Error` aborts the program
//! unit, `Unwind::Return` carries a value to the nearest enclosing function
//! call and nothing else. The two must never be conflated; only
//! `Callable::call` intercepts the return signal.

use std::rc::Rc;

use smallvec::SmallVec;

use crate::{
    environment::{self, EnvRef, Environment},
    error::RuntimeError,
    expressions::{Expr, ExprId, Stmt},
    function::{Callable, UserFunction, NATIVES},
    intern::{Interner, Symbol},
    io::PrintWriter,
    lex::{Token, TokenKind},
    resolve::Resolutions,
    value::Value,
};

/// Non-local exits from statement and expression evaluation.
#[derive(Debug)]
pub(crate) enum Unwind {
    /// A `return` statement in flight. Not an error.
    Return(Value),
    /// A runtime error unwinding the whole program unit.
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Self::Error(error)
    }
}

pub(crate) type ExecResult<T> = Result<T, Unwind>;

/// Read-only interner plus the output sink, threaded through evaluation.
pub(crate) struct ExecContext<'a> {
    pub interner: &'a Interner,
    pub print: &'a mut dyn PrintWriter,
}

/// Executes programs against a persistent globals frame.
///
/// One interpreter may run several compiled units in sequence (the REPL
/// does); globals and the merged resolution table survive across runs,
/// runtime errors do not poison them.
pub(crate) struct Interpreter {
    globals: EnvRef,
    /// The innermost environment currently executing. Equals `globals`
    /// outside any block or call.
    environment: EnvRef,
    /// Scope distances for every resolved variable node seen so far.
    locals: Resolutions,
}

impl Interpreter {
    /// Creates an interpreter with the native functions pre-defined in its
    /// globals frame.
    pub fn new(interner: &mut Interner) -> Self {
        let globals = Environment::global();
        {
            let mut frame = globals.borrow_mut();
            for native in NATIVES {
                let name = interner.intern(native.name);
                frame.define(name, Value::Callable(Callable::Native(Rc::new(*native))));
            }
        }
        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: Resolutions::default(),
        }
    }

    /// Adopts the resolution table of a freshly compiled unit.
    pub fn add_resolutions(&mut self, resolutions: Resolutions) {
        self.locals.merge(resolutions);
    }

    /// Runs statements in order, stopping at the first runtime error.
    pub fn interpret(
        &mut self,
        statements: &[Stmt],
        interner: &Interner,
        print: &mut dyn PrintWriter,
    ) -> Result<(), RuntimeError> {
        let mut ctx = ExecContext { interner, print };
        for statement in statements {
            match self.execute(statement, &mut ctx) {
                Ok(()) => {}
                Err(Unwind::Error(error)) => return Err(error),
                // The resolver rejects top-level `return`; a stray signal
                // simply ends the unit.
                Err(Unwind::Return(_)) => break,
            }
        }
        Ok(())
    }

    /// Global bindings in definition order, for session inspection.
    pub fn global_bindings(&self) -> Vec<(Symbol, Value)> {
        self.globals.borrow().bindings().collect()
    }

    fn execute(&mut self, statement: &Stmt, ctx: &mut ExecContext<'_>) -> ExecResult<()> {
        match statement {
            Stmt::Expression { expr } => {
                self.evaluate(expr, ctx)?;
                Ok(())
            }
            Stmt::Print { expr } => {
                let value = self.evaluate(expr, ctx)?;
                ctx.print.write_line(&value.to_string());
                Ok(())
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(initializer) => self.evaluate(initializer, ctx)?,
                    None => Value::Nil,
                };
                self.environment.borrow_mut().define(name.lexeme, value);
                Ok(())
            }
            Stmt::Block { statements } => {
                let environment = Environment::nested(&self.environment);
                self.execute_block(statements, environment, ctx)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition, ctx)?.is_truthy() {
                    self.execute(then_branch, ctx)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch, ctx)
                } else {
                    Ok(())
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition, ctx)?.is_truthy() {
                    self.execute(body, ctx)?;
                }
                Ok(())
            }
            Stmt::Function { decl } => {
                // The closure is the environment in force right now, shared
                // by reference with every sibling declared in this scope.
                let function = UserFunction {
                    name: Box::from(ctx.interner.resolve(decl.name.lexeme)),
                    decl: Rc::clone(decl),
                    closure: Rc::clone(&self.environment),
                };
                let value = Value::Callable(Callable::Function(Rc::new(function)));
                self.environment.borrow_mut().define(decl.name.lexeme, value);
                Ok(())
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(value) => self.evaluate(value, ctx)?,
                    None => Value::Nil,
                };
                Err(Unwind::Return(value))
            }
        }
    }

    /// Runs `statements` with `environment` as the current frame, restoring
    /// the previous frame on every exit path, including errors and the
    /// return signal.
    pub(crate) fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: EnvRef,
        ctx: &mut ExecContext<'_>,
    ) -> ExecResult<()> {
        let previous = std::mem::replace(&mut self.environment, environment);
        let mut result = Ok(());
        for statement in statements {
            result = self.execute(statement, ctx);
            if result.is_err() {
                break;
            }
        }
        self.environment = previous;
        result
    }

    fn evaluate(&mut self, expr: &Expr, ctx: &mut ExecContext<'_>) -> ExecResult<Value> {
        match expr {
            Expr::Literal { value } => Ok(value.to_value()),
            Expr::Grouping { inner } => self.evaluate(inner, ctx),
            Expr::Variable { id, name } => self.look_up_variable(*id, name, ctx),
            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value, ctx)?;
                match self.locals.depth(*id) {
                    Some(distance) => {
                        let assigned =
                            environment::assign_at(&self.environment, distance, name.lexeme, value.clone());
                        debug_assert!(assigned, "resolved assignment target is bound");
                    }
                    None => {
                        if !self.globals.borrow_mut().assign(name.lexeme, value.clone()) {
                            return Err(undefined_variable(name, ctx));
                        }
                    }
                }
                // Assignment is an expression; it yields the stored value.
                Ok(value)
            }
            Expr::Unary { op, right } => {
                let right = self.evaluate(right, ctx)?;
                match op.kind {
                    TokenKind::Minus => match right {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        _ => Err(RuntimeError::new("Operand must be a number.", op.line).into()),
                    },
                    TokenKind::Bang => Ok(Value::Bool(!right.is_truthy())),
                    _ => unreachable!("parser emits only '!' and '-' as unary operators"),
                }
            }
            Expr::Binary { left, op, right } => {
                // Both operands evaluate, left first, before dispatch.
                let left = self.evaluate(left, ctx)?;
                let right = self.evaluate(right, ctx)?;
                binary_op(&left, op, &right)
            }
            Expr::Logical { left, op, right } => {
                let left = self.evaluate(left, ctx)?;
                let short_circuits = match op.kind {
                    TokenKind::Or => left.is_truthy(),
                    TokenKind::And => !left.is_truthy(),
                    _ => unreachable!("parser emits only 'and' and 'or' as logical operators"),
                };
                if short_circuits {
                    // The operand value itself, not a boolean.
                    Ok(left)
                } else {
                    self.evaluate(right, ctx)
                }
            }
            Expr::Call { callee, paren, args } => {
                let callee = self.evaluate(callee, ctx)?;
                let mut arguments: SmallVec<[Value; 8]> = SmallVec::with_capacity(args.len());
                for arg in args {
                    arguments.push(self.evaluate(arg, ctx)?);
                }

                let Value::Callable(callable) = callee else {
                    return Err(RuntimeError::new("Can only call functions and classes.", paren.line).into());
                };
                if arguments.len() != callable.arity() {
                    let message = format!(
                        "Expected {} arguments but got {}.",
                        callable.arity(),
                        arguments.len()
                    );
                    return Err(RuntimeError::new(message, paren.line).into());
                }
                callable.call(self, ctx, &arguments, paren.line)
            }
        }
    }

    fn look_up_variable(&self, id: ExprId, name: &Token, ctx: &ExecContext<'_>) -> ExecResult<Value> {
        match self.locals.depth(id) {
            Some(distance) => Ok(environment::get_at(&self.environment, distance, name.lexeme)
                .expect("resolved variable is bound")),
            None => self
                .globals
                .borrow()
                .get(name.lexeme)
                .ok_or_else(|| undefined_variable(name, ctx)),
        }
    }
}

fn binary_op(left: &Value, op: &Token, right: &Value) -> ExecResult<Value> {
    match op.kind {
        TokenKind::Plus => match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(Rc::from(format!("{a}{b}")))),
            _ => Err(RuntimeError::new("Operands must be two numbers or two strings.", op.line).into()),
        },
        TokenKind::Minus => {
            let (a, b) = number_operands(op, left, right)?;
            Ok(Value::Number(a - b))
        }
        TokenKind::Star => {
            let (a, b) = number_operands(op, left, right)?;
            Ok(Value::Number(a * b))
        }
        TokenKind::Slash => {
            // IEEE division; dividing by zero yields an infinity or nan.
            let (a, b) = number_operands(op, left, right)?;
            Ok(Value::Number(a / b))
        }
        TokenKind::Greater => {
            let (a, b) = number_operands(op, left, right)?;
            Ok(Value::Bool(a > b))
        }
        TokenKind::GreaterEqual => {
            let (a, b) = number_operands(op, left, right)?;
            Ok(Value::Bool(a >= b))
        }
        TokenKind::Less => {
            let (a, b) = number_operands(op, left, right)?;
            Ok(Value::Bool(a < b))
        }
        TokenKind::LessEqual => {
            let (a, b) = number_operands(op, left, right)?;
            Ok(Value::Bool(a <= b))
        }
        TokenKind::EqualEqual => Ok(Value::Bool(left == right)),
        TokenKind::BangEqual => Ok(Value::Bool(left != right)),
        _ => unreachable!("parser emits only binary operators here"),
    }
}

fn number_operands(op: &Token, left: &Value, right: &Value) -> Result<(f64, f64), Unwind> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(RuntimeError::new("Operands must be numbers.", op.line).into()),
    }
}

fn undefined_variable(name: &Token, ctx: &ExecContext<'_>) -> Unwind {
    let message = format!("Undefined variable '{}'.", ctx.interner.resolve(name.lexeme));
    RuntimeError::new(message, name.line).into()
}
