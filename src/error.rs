use std::io::Write;

use crate::token::{Kind, Token};

/// Carries the `had_error`/`had_runtime_error` flags and the sink diagnostics
/// are written to, threaded through scanning, parsing, resolving and
/// interpreting instead of living in process-global statics. The REPL driver
/// owns a single instance and resets its flags between lines; a script run
/// constructs one, runs the pipeline once, and inspects the flags to pick an
/// exit code.
pub struct Diagnostics {
    had_error: bool,
    had_runtime_error: bool,
    sink: Box<dyn Write>,
}

impl Diagnostics {
    pub fn new(sink: Box<dyn Write>) -> Self {
        Diagnostics { had_error: false, had_runtime_error: false, sink }
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Resets both flags. Used between REPL lines so one bad line does not
    /// poison the exit status of later, valid ones.
    pub fn reset(&mut self) {
        self.had_error = false;
        self.had_runtime_error = false;
    }

    /// Reports a scan error: `[line L] Error: MSG`.
    pub fn scan_error(&mut self, err: &ScanError) {
        let _ = writeln!(self.sink, "[line {}] Error: {}", err.line, err.message);
        self.had_error = true;
    }

    /// Reports a parse error: `[line L] Error at end: MSG` or
    /// `[line L] Error at 'LEXEME': MSG`.
    pub fn parse_error(&mut self, err: &ParseError) {
        self.static_error(&err.token, &err.message);
    }

    /// Reports a resolve error, formatted the same way as a parse error:
    /// both are static, pre-execution diagnostics tied to a source token.
    pub fn resolve_error(&mut self, err: &ResolveError) {
        self.static_error(&err.token, &err.message);
    }

    fn static_error(&mut self, token: &Token, message: &str) {
        if token.kind == Kind::EOF {
            let _ = writeln!(self.sink, "[line {}] Error at end: {}", token.line, message);
        } else {
            let _ = writeln!(self.sink, "[line {}] Error at '{}': {}", token.line, token.lexeme, message);
        }
        self.had_error = true;
    }

    /// Reports a runtime error: `[line L] Error: 'LEXEME' MSG`.
    pub fn runtime_error(&mut self, err: &RuntimeError) {
        let _ = writeln!(
            self.sink,
            "[line {}] Error: '{}' {}",
            err.token.line, err.token.lexeme, err.message
        );
        self.had_runtime_error = true;
    }
}

/// An error raised by the scanner: an unexpected character, an unterminated
/// string, or an unterminated block comment.
#[derive(Debug)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

/// An error raised by the parser: a malformed statement or expression that
/// the recursive-descent grammar could not match.
#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

/// An error raised by the resolver: syntactically valid code that is
/// statically known to be meaningless (reading a local in its own
/// initializer, `return` outside a function, ...).
#[derive(Debug)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

/// An error raised while evaluating the resolved AST: a type mismatch, an
/// undefined variable, a division by zero, and so on.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}
