use std::cell::RefCell;
use std::fmt::{self, Debug, Display};
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::interpreter::{Flow, Interpreter};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::FunctionData;
use crate::token::{Kind, Token};

/// A user-defined function: its declaration plus the environment that was
/// active when it was declared. `call` parents the fresh call environment on
/// `self.closure`, not on the interpreter's globals — this is what makes a
/// nested function declared inside another function capture that outer
/// function's locals rather than always seeing only the global scope.
#[derive(Debug)]
pub struct LoxFunction {
    pub declaration: Rc<FunctionData>,
    pub closure: Rc<RefCell<Environment>>,
}

impl Callable for LoxFunction {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));

        for (param, arg) in self.declaration.params.iter().zip(arguments.into_iter()) {
            environment.define(&param.lexeme, arg);
        }

        match interpreter.execute_block(&self.declaration.body, Rc::new(RefCell::new(environment)))? {
            Flow::Return(value) => Ok(value),
            _ => Ok(Object::from(Literal::Nil)),
        }
    }

    fn arity(&self) -> usize {
        self.declaration.params.len()
    }
}

impl Display for LoxFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.declaration.name.lexeme)
    }
}

/// A built-in function exposed to Lox code as a global. `function` is a
/// plain fn pointer rather than a boxed closure: none of the natives need to
/// capture state, and a pointer keeps `NativeFunction` cheap to construct.
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub function: fn(&mut Interpreter, Vec<Object>) -> Result<Object, RuntimeError>,
}

impl Callable for NativeFunction {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        (self.function)(interpreter, arguments)
    }

    fn arity(&self) -> usize {
        self.arity
    }
}

impl NativeFunction {
    /// The natives installed into every fresh global environment: `min`
    /// (required by the language core), plus `clock` and `str`, rounding out
    /// the ambient standard library the way the reference interpreter's own
    /// `get_globals` installs `clock` and `input`.
    pub fn globals() -> Vec<NativeFunction> {
        vec![
            NativeFunction {
                name: "min",
                arity: 2,
                function: |_, args| {
                    let token = Token::new(Kind::Identifier, "min".to_string(), None, 0);
                    let (a, b) = (args[0].clone(), args[1].clone());
                    match (&a, &b) {
                        (Object::Literal(Literal::Number(x)), Object::Literal(Literal::Number(y))) => {
                            Ok(Object::from(x.min(*y)))
                        }
                        (Object::Literal(Literal::String(x)), Object::Literal(Literal::String(y))) => {
                            if x <= y { Ok(a) } else { Ok(b) }
                        }
                        _ => Err(RuntimeError {
                            token,
                            message: "operands must be two numbers or two strings".to_string(),
                        }),
                    }
                },
            },
            NativeFunction {
                name: "clock",
                arity: 0,
                function: |_, _| {
                    let now = std::time::SystemTime::now()
                        .duration_since(std::time::UNIX_EPOCH)
                        .expect("system clock before the Unix epoch")
                        .as_millis();
                    Ok(Object::from(now as f64))
                },
            },
            NativeFunction {
                name: "str",
                arity: 1,
                function: |_, args| Ok(Object::from(args[0].to_string())),
            },
        ]
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native {}>", self.name)
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native {}>", self.name)
    }
}
