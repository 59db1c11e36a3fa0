pub mod ast;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod repl;
pub mod value;

mod env;

pub use error::{Error, EvalError, ParseError, Result};
pub use interpreter::Interpreter;
pub use parser::Parser;
pub use repl::Repl;
pub use value::{Identifier, Value};
