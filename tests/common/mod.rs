use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use loxrs::error::Diagnostics;
use loxrs::Lox;

/// An in-memory sink shared between the harness and the interpreter: the
/// interpreter owns one handle and writes through it, the test keeps
/// another handle and reads the bytes back once the run completes.
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("interpreter output to be valid UTF-8")
    }
}

/// Runs a single chunk of Lox source through the full pipeline in script
/// mode and returns the captured `(stdout, stderr)`.
pub fn run(source: &str) -> (String, String) {
    let stdout = SharedBuffer::default();
    let stderr = SharedBuffer::default();

    let mut lox = Lox::with_output(Box::new(stdout.clone()));
    let mut diagnostics = Diagnostics::new(Box::new(stderr.clone()));
    lox.run(source, &mut diagnostics, false);

    (stdout.contents(), stderr.contents())
}

/// Runs `lines` one at a time against a single persistent interpreter, as
/// the REPL would, with top-level bare expressions auto-printed. Returns
/// the captured `(stdout, stderr)` across the whole session.
pub fn run_repl(lines: &[&str]) -> (String, String) {
    let stdout = SharedBuffer::default();
    let stderr = SharedBuffer::default();

    let mut lox = Lox::with_output(Box::new(stdout.clone()));

    for line in lines {
        let mut diagnostics = Diagnostics::new(Box::new(stderr.clone()));
        lox.run(line, &mut diagnostics, true);
    }

    (stdout.contents(), stderr.contents())
}
