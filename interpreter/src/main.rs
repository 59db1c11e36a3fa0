use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use anyhow::{Context, Result};
use knot::Repl;

fn main() -> Result<()> {
    let stdout = Rc::new(RefCell::new(io::stdout()));
    let mut repl = Repl::new(stdout);
    repl.run(io::stdin().lock())
        .context("Reading from stdin or writing to stdout")?;
    Ok(())
}
