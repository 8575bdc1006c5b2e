#![allow(clippy::needless_return)]

//! loxrs is a tree-walking interpreter for Lox, a small dynamically typed
//! scripting language with lexical scoping, first-class functions, and
//! closures. It has no object system: classes, methods and inheritance are
//! explicit non-goals of this implementation.
//!
//! ## Scanning
//! The first step is scanning: turning a source string into a list of
//! tokens. The scanner is implemented in the [`scanner`] module as a
//! single-pass state machine over the source's characters. It reports
//! lexical problems — an unterminated string, an unexpected character — as
//! [`ScanError`](error::ScanError)s through the shared [`Diagnostics`](error::Diagnostics)
//! context, and keeps scanning past them so a single run surfaces as many
//! lexical errors as possible.
//!
//! ## Parsing
//! The second step is parsing: turning the token list into an abstract
//! syntax tree. The parser is implemented in the [`parser`] module as a
//! recursive-descent parser producing [`Expr`](expr::Expr)s (code that
//! produces a value) and [`Stmt`](stmt::Stmt)s (code that performs a
//! side effect, like a variable declaration or an `if`). Parse errors are
//! reported as [`ParseError`](error::ParseError)s; the parser synchronizes
//! at the next statement boundary so one mistake does not cascade.
//!
//! ## Resolving
//! The third step is resolving: a static pass over the AST, implemented in
//! the [`resolver`] module, that determines the lexical scope depth of
//! every variable reference ahead of time. This is what lets closures and
//! shadowing behave correctly without a runtime scope search on every
//! lookup. Resolve errors ([`ResolveError`](error::ResolveError)) catch
//! problems that are syntactically valid but statically meaningless, such
//! as reading a local in its own initializer or a top-level `return`.
//!
//! ## Interpreting
//! The final step is interpreting: walking the resolved AST and producing
//! effects, implemented in the [`interpreter`] module. The interpreter owns
//! the global environment and the chain of lexical [`environment`]s that
//! implement closures. Runtime errors ([`RuntimeError`](error::RuntimeError))
//! are the only errors that can occur once a program has scanned, parsed
//! and resolved cleanly — a type mismatch in an operator, division by zero,
//! an undefined variable, calling something that is not callable.

use std::io::{self, Write};
use std::{fs, process};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use error::Diagnostics;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// The interpreter facade: owns the long-lived evaluator state (the global
/// environment persists across REPL lines) and drives the scan → parse →
/// resolve → evaluate pipeline for each chunk of source.
pub struct Lox {
    interpreter: Interpreter,
}

impl Lox {
    pub fn new() -> Self {
        Lox { interpreter: Interpreter::new(Box::new(io::stdout())) }
    }

    /// Builds a facade around a caller-supplied output sink, bypassing
    /// stdout. Used by the integration test harness to capture `print` and
    /// REPL-echo output in memory instead of the process's real stdout.
    pub fn with_output(output: Box<dyn Write>) -> Self {
        Lox { interpreter: Interpreter::new(output) }
    }

    /// Reads `path` as UTF-8 and runs it once. Exits the process with the
    /// status codes from section 6 of the design: 66 if the file cannot be
    /// read, 65 if a static error occurred, 70 if a runtime error occurred.
    pub fn run_file(&mut self, path: &str) {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => {
                eprintln!("lox: can't open '{path}': {err}");
                process::exit(66);
            }
        };

        let mut diagnostics = Diagnostics::new(Box::new(io::stderr()));
        self.run(&source, &mut diagnostics, false);

        if diagnostics.had_error() {
            process::exit(65);
        }
        if diagnostics.had_runtime_error() {
            process::exit(70);
        }
    }

    /// Runs an interactive read-eval-print loop with line editing and
    /// in-session history. `Ctrl-D` ends the session cleanly; `Ctrl-C`
    /// aborts only the current line.
    pub fn run_prompt(&mut self) {
        let mut editor = DefaultEditor::new().expect("failed to initialize line editor");

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());

                    let mut diagnostics = Diagnostics::new(Box::new(io::stderr()));
                    self.run(&line, &mut diagnostics, true);
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("lox: {err}");
                    break;
                }
            }
        }
    }

    /// Runs one chunk of source through the full pipeline against the
    /// facade's persistent interpreter state, reporting diagnostics through
    /// `diagnostics` rather than exiting the process. Exposed publicly so
    /// the integration test harness can drive the pipeline directly.
    pub fn run(&mut self, source: &str, diagnostics: &mut Diagnostics, repl: bool) {
        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens(diagnostics);

        if diagnostics.had_error() {
            return;
        }

        let mut parser = Parser::new(tokens, self.interpreter.next_expr_id());
        let statements = parser.parse(diagnostics);
        self.interpreter.set_next_expr_id(parser.next_expr_id());

        if diagnostics.had_error() {
            return;
        }

        let mut resolver = Resolver::new(&mut self.interpreter, diagnostics);
        resolver.resolve(&statements);

        if diagnostics.had_error() {
            return;
        }

        self.interpreter.interpret(&statements, diagnostics, repl);
    }
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}
