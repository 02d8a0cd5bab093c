#![doc = include_str!("../../../README.md")]

mod environment;
mod error;
mod expressions;
mod function;
mod intern;
mod interp;
mod io;
mod lex;
mod parse;
mod repl;
mod resolve;
mod run;
mod value;

pub use crate::{
    error::{ReplError, RuntimeError, SyntaxError, SyntaxErrors},
    function::{Callable, NativeFunction, UserFunction},
    io::{CollectStringPrint, NoPrint, PrintWriter, StdPrint},
    repl::ReplSession,
    run::Runner,
    value::Value,
};
