use std::cell::RefCell;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use knot_core::Scanner;

use crate::error::{EvalError, Result};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::value::Value;

const DEFAULT_PROMPT: &str = "> ";

// Printed in place of a value when any stage fails on a line.
const ERROR_MARKER: &str = "ERROR";

/// Line oriented read loop around an [`Interpreter`]. A line that fails to scan, parse or evaluate
/// reports `ERROR` and the loop moves on, bindings made by earlier lines stay intact.
pub struct Repl {
    interpreter: Interpreter,
    stdout: Rc<RefCell<dyn Write>>,
    prompt: String,
}

impl Repl {
    pub fn new(stdout: Rc<RefCell<dyn Write>>) -> Self {
        Repl::with_prompt(stdout, DEFAULT_PROMPT)
    }

    pub fn with_prompt(stdout: Rc<RefCell<dyn Write>>, prompt: &str) -> Self {
        Repl {
            interpreter: Interpreter::new(stdout.clone()),
            stdout,
            prompt: String::from(prompt),
        }
    }

    pub fn eval_line(&mut self, line: &str) -> Result<Value> {
        let mut scanner = Scanner::new();
        let expr = Parser::new(scanner.scan_tokens(line)).parse()?;

        trace(
            &mut *RefCell::borrow_mut(&self.stdout),
            format_args!("[ {:?} ]", expr),
        )
        .map_err(EvalError::from)?;

        self.interpreter.evaluate(&expr)
    }

    /// Runs until `input` is exhausted. Only I/O failures on the streams themselves end the loop,
    /// a line that is not valid UTF-8 reports `ERROR` like any other bad line.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> io::Result<()> {
        let mut buf = Vec::new();

        loop {
            {
                let mut out = RefCell::borrow_mut(&self.stdout);
                write!(out, "{}", self.prompt)?;
                out.flush()?;
            }

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }

            let result = match std::str::from_utf8(&buf) {
                Ok(line) => self.eval_line(line.trim_end_matches(['\n', '\r'])),
                Err(err) => Err(EvalError::unsupported(format_args!("{}", err)).into()),
            };

            let mut out = RefCell::borrow_mut(&self.stdout);
            match result {
                Ok(value) => writeln!(out, "{}", value)?,
                Err(err) => {
                    writeln!(out, "{}", ERROR_MARKER)?;
                    trace(&mut *out, format_args!("{}", err))?;
                }
            }
        }

        Ok(())
    }
}

// Diagnostics that only show up when built with `debug-trace-execution`.
#[allow(unused_variables)]
fn trace(out: &mut dyn Write, args: fmt::Arguments) -> io::Result<()> {
    #[cfg(feature = "debug-trace-execution")]
    writeln!(out, "{}", args)?;
    Ok(())
}
