//! Strategy script language: parser, interpreter and one-shot execution.

pub mod diagnostic;
pub mod execute;
pub mod interpreter;
pub mod parser;

pub use diagnostic::Diagnostic;
pub use execute::{execute_script, ExecutionOutput, ExecutionValue};
pub use interpreter::{Evaluation, Interpreter};
pub use parser::{parse_line, parse_script, Statement};
