//! Tree-walking evaluator for parsed Zoe programs.
//!
//! `Interpreter` owns the root scope (seeded with the host builtins) and the
//! evaluator; the root scope persists across `run` calls so the REPL keeps
//! its bindings. `print` output is buffered here and drained by the driver,
//! on success and on error alike.

use crate::builtins;
use crate::parser::ast::Program;

pub mod env;
mod error;
mod runtime;
pub mod value;

pub use error::RuntimeError;
pub use value::Value;

use env::{Scope, ScopeRef};
use runtime::{Evaluator, ExecResult};

pub struct Interpreter {
    globals: ScopeRef,
    evaluator: Evaluator,
}

impl Interpreter {
    pub fn new() -> Self {
        let globals = Scope::root();
        builtins::install(&globals);
        Self {
            globals,
            evaluator: Evaluator::new(),
        }
    }

    /// Evaluates the program's statements against the persistent root scope
    /// and produces the last statement's value. A `return` that unwinds past
    /// the outermost call is a diagnostic.
    pub fn run(&mut self, program: &Program) -> Result<Value, RuntimeError> {
        match self.evaluator.exec_block(&program.statements, &self.globals)? {
            ExecResult::Continue(value) => Ok(value),
            ExecResult::Return(_) => Err(RuntimeError::ReturnOutsideFunction),
        }
    }

    /// Hands over the lines `print` has produced since the last drain.
    pub fn drain_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.evaluator.output)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
