//! Callable values: native built-ins and user-defined functions.

use std::{
    fmt::{self, Display},
    rc::Rc,
    time::{SystemTime, UNIX_EPOCH},
};

use crate::{
    environment::{EnvRef, Environment},
    error::RuntimeError,
    expressions::FunctionDecl,
    interp::{ExecContext, ExecResult, Interpreter, Unwind},
    value::Value,
};

/// Implementation of a native function. Errors come back as bare messages;
/// the call site tags them with the closing parenthesis line.
pub(crate) type NativeFn = fn(&[Value]) -> Result<Value, String>;

/// A built-in function provided by the interpreter itself.
#[derive(Debug, Clone, Copy)]
pub struct NativeFunction {
    pub(crate) name: &'static str,
    pub(crate) arity: usize,
    pub(crate) func: NativeFn,
}

/// A user-defined function value.
///
/// Holds the declaration it was created from and the environment that was
/// current at the moment the declaration executed. That captured frame, the
/// closure, becomes the enclosing frame of every call, so sibling functions
/// declared in one scope share it by reference and observe each other's
/// mutations.
pub struct UserFunction {
    /// Resolved name, kept here so values can render without an interner.
    pub(crate) name: Box<str>,
    pub(crate) decl: Rc<FunctionDecl>,
    pub(crate) closure: EnvRef,
}

// Manual impl: the closure chain can reach back to this very function, so a
// derived Debug would recurse forever.
impl fmt::Debug for UserFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserFunction").field("name", &self.name).finish_non_exhaustive()
    }
}

/// A value that can be called.
///
/// An enum rather than a trait object so [`Value`] stays a plain `Clone`
/// type; the two variants are shared handles and compare by identity.
#[derive(Debug, Clone)]
pub enum Callable {
    Native(Rc<NativeFunction>),
    Function(Rc<UserFunction>),
}

impl Callable {
    /// Number of parameters the callable declares.
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Self::Native(native) => native.arity,
            Self::Function(function) => function.decl.params.len(),
        }
    }

    /// Identity comparison; two callables are equal only if they are the
    /// same object.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Native(a), Self::Native(b)) => Rc::ptr_eq(a, b),
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Invokes the callable. Arity has already been checked at the call
    /// site; `line` is the closing parenthesis line used to tag native
    /// errors.
    pub(crate) fn call(
        &self,
        interpreter: &mut Interpreter,
        ctx: &mut ExecContext<'_>,
        args: &[Value],
        line: u32,
    ) -> ExecResult<Value> {
        match self {
            Self::Native(native) => {
                (native.func)(args).map_err(|message| Unwind::from(RuntimeError::new(message, line)))
            }
            Self::Function(function) => {
                let environment = Environment::nested(&function.closure);
                {
                    let mut frame = environment.borrow_mut();
                    for (param, arg) in function.decl.params.iter().zip(args) {
                        frame.define(param.lexeme, arg.clone());
                    }
                }
                match interpreter.execute_block(&function.decl.body, environment, ctx) {
                    // Falling off the end of a function yields nil.
                    Ok(()) => Ok(Value::Nil),
                    // The return signal stops here; it never crosses a call
                    // boundary and it is not an error.
                    Err(Unwind::Return(value)) => Ok(value),
                    Err(unwind) => Err(unwind),
                }
            }
        }
    }
}

impl Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(_) => f.write_str("<native fn>"),
            Self::Function(function) => write!(f, "<fn {}>", function.name),
        }
    }
}

fn native_clock(_args: &[Value]) -> Result<Value, String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    Ok(Value::Number(now.as_secs_f64()))
}

/// Built-ins installed into the globals frame of every interpreter.
pub(crate) const NATIVES: &[NativeFunction] = &[NativeFunction {
    name: "clock",
    arity: 0,
    func: native_clock,
}];
