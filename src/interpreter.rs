use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::mem;
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::{Diagnostics, RuntimeError};
use crate::expr::{
    AssignData, BinaryData, CallData, ConditionalData, Expr, ExprVisitor, GroupData, LogicalData,
    UnaryData, VariableData,
};
use crate::function::{LoxFunction, NativeFunction};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::{
    BlockData, BreakData, ExpressionData, FunctionData, IfData, PrintData, ReturnData, Stmt,
    StmtVisitor, VarData, WhileData,
};
use crate::token::{Kind, Token};

/// The signal a statement's execution returns: `Normal` completion, or a
/// non-local transfer in progress. Carried as the `Ok` payload of
/// `Result<Flow, RuntimeError>` instead of a native exception, which keeps
/// environment-restoration logic localized to `execute_block` rather than
/// scattered across unwind sites.
#[derive(Debug, Clone)]
pub enum Flow {
    Normal,
    Break,
    Return(Object),
}

/// Tree-walking evaluator. Owns the global environment and the current
/// lexical environment, plus the resolver's output: a map from expression
/// node id to lexical scope depth.
pub struct Interpreter {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<usize, usize>,
    next_expr_id: usize,
    output: Box<dyn Write>,
}

impl Interpreter {
    pub fn new(output: Box<dyn Write>) -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));

        for native in NativeFunction::globals() {
            let name = native.name;
            globals.borrow_mut().define(name, Object::from(Rc::new(native)));
        }
        globals.borrow_mut().define("pi", Object::from(3.14_f64));

        Interpreter {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            next_expr_id: 0,
            output,
        }
    }

    /// Records that the expression identified by `id` resolves `depth`
    /// scopes up from wherever it is evaluated. Called only by the resolver.
    pub fn resolve(&mut self, id: usize, depth: usize) {
        self.locals.insert(id, depth);
    }

    /// The next unused expression id, carried across REPL lines so a fresh
    /// `Parser` never reuses an id already resolved against `locals` —
    /// `locals` lives for the process's whole lifetime and is keyed by id,
    /// so ids must stay unique across every chunk of source this interpreter
    /// ever runs, not just within one.
    pub fn next_expr_id(&self) -> usize {
        self.next_expr_id
    }

    pub fn set_next_expr_id(&mut self, id: usize) {
        self.next_expr_id = id;
    }

    /// Runs a whole program. In REPL mode, a bare expression statement at
    /// the top level additionally prints its value, matching the reference
    /// REPL's convenience of auto-printing the last expression typed.
    /// Execution stops at the first runtime error, which is reported once;
    /// the caller (the REPL driver) resumes with the next line regardless.
    pub fn interpret(&mut self, statements: &[Stmt], diagnostics: &mut Diagnostics, repl: bool) {
        for statement in statements {
            let result = if repl {
                self.execute_top_level(statement)
            } else {
                self.execute(statement)
            };

            match result {
                Ok(_) => {}
                Err(error) => {
                    diagnostics.runtime_error(&error);
                    return;
                }
            }
        }
    }

    fn execute_top_level(&mut self, stmt: &Stmt) -> Result<Flow, RuntimeError> {
        if let Stmt::Expression(data) = stmt {
            let value = self.evaluate(&data.expr)?;
            let _ = writeln!(self.output, "{value}");
            return Ok(Flow::Normal);
        }

        self.execute(stmt)
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<Flow, RuntimeError> {
        stmt.accept(self)
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        expr.accept(self)
    }

    /// Executes `statements` with `environment` as the current scope,
    /// restoring the previous scope on every exit path: normal completion,
    /// `break`, `return`, or a propagated runtime error.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Rc<RefCell<Environment>>,
    ) -> Result<Flow, RuntimeError> {
        let previous = mem::replace(&mut self.environment, environment);

        let result = (|| {
            for statement in statements {
                match self.execute(statement)? {
                    Flow::Normal => continue,
                    flow => return Ok(flow),
                }
            }
            Ok(Flow::Normal)
        })();

        self.environment = previous;
        result
    }

    fn lookup_variable(&self, id: usize, name: &Token) -> Result<Object, RuntimeError> {
        match self.locals.get(&id) {
            Some(&depth) => self.environment.borrow().get_at(depth, name),
            None => self.globals.borrow().get(name),
        }
    }
}

impl ExprVisitor<Result<Object, RuntimeError>> for Interpreter {
    fn visit_literal_expr(&mut self, data: &Literal) -> Result<Object, RuntimeError> {
        Ok(Object::from(data.clone()))
    }

    fn visit_variable_expr(&mut self, data: &VariableData) -> Result<Object, RuntimeError> {
        self.lookup_variable(data.id, &data.name)
    }

    fn visit_group_expr(&mut self, data: &GroupData) -> Result<Object, RuntimeError> {
        self.evaluate(&data.expr)
    }

    fn visit_assign_expr(&mut self, data: &AssignData) -> Result<Object, RuntimeError> {
        let value = self.evaluate(&data.value)?;

        match self.locals.get(&data.id) {
            Some(&depth) => self.environment.borrow_mut().assign_at(depth, &data.name, value.clone()),
            None => self.globals.borrow_mut().assign(&data.name, value.clone())?,
        }

        Ok(value)
    }

    fn visit_unary_expr(&mut self, data: &UnaryData) -> Result<Object, RuntimeError> {
        let right = self.evaluate(&data.expr)?;

        match data.operator.kind {
            Kind::Bang => Ok(Object::from(!right.is_truthy())),
            Kind::Minus => match right {
                Object::Literal(Literal::Number(n)) => Ok(Object::from(-n)),
                _ => Err(RuntimeError {
                    token: data.operator.clone(),
                    message: "operand must be a number".to_string(),
                }),
            },
            _ => unreachable!("unary operator must be '!' or '-'"),
        }
    }

    fn visit_logical_expr(&mut self, data: &LogicalData) -> Result<Object, RuntimeError> {
        let left = self.evaluate(&data.left)?;

        match data.operator.kind {
            Kind::Or if left.is_truthy() => Ok(left),
            Kind::Or => self.evaluate(&data.right),
            Kind::And if !left.is_truthy() => Ok(left),
            Kind::And => self.evaluate(&data.right),
            _ => unreachable!("logical operator must be 'and' or 'or'"),
        }
    }

    fn visit_binary_expr(&mut self, data: &BinaryData) -> Result<Object, RuntimeError> {
        let left = self.evaluate(&data.left)?;
        let right = self.evaluate(&data.right)?;
        let operator = &data.operator;

        use Literal::{Number, String as Str};
        use Object::Literal as Lit;

        match operator.kind {
            Kind::Comma => Ok(right),
            Kind::Minus => match (&left, &right) {
                (Lit(Number(l)), Lit(Number(r))) => Ok(Object::from(l - r)),
                _ => Err(operands_must_be_numbers(operator)),
            },
            Kind::Star => match (&left, &right) {
                (Lit(Number(l)), Lit(Number(r))) => Ok(Object::from(l * r)),
                (Lit(Number(n)), Lit(Str(s))) | (Lit(Str(s)), Lit(Number(n))) => {
                    Ok(Object::from(s.repeat(n.max(0.0).floor() as usize)))
                }
                _ => Err(operands_must_be_numbers(operator)),
            },
            Kind::Slash => match (&left, &right) {
                (Lit(Number(_)), Lit(Number(r))) if *r == 0.0 => Err(RuntimeError {
                    token: operator.clone(),
                    message: "division by zero".to_string(),
                }),
                (Lit(Number(l)), Lit(Number(r))) => Ok(Object::from(l / r)),
                _ => Err(operands_must_be_numbers(operator)),
            },
            Kind::Plus => match (&left, &right) {
                (Lit(Number(l)), Lit(Number(r))) => Ok(Object::from(l + r)),
                (Lit(Str(l)), Lit(Str(r))) => Ok(Object::from(format!("{l}{r}"))),
                (Lit(Number(_)), Lit(Str(r))) => Ok(Object::from(format!("{left}{r}"))),
                (Lit(Str(l)), Lit(Number(_))) => Ok(Object::from(format!("{l}{right}"))),
                _ => Err(RuntimeError {
                    token: operator.clone(),
                    message: "operands must be numbers or strings".to_string(),
                }),
            },
            Kind::Greater => compare(operator, &left, &right, |o| o == std::cmp::Ordering::Greater),
            Kind::GreaterEqual => compare(operator, &left, &right, |o| o != std::cmp::Ordering::Less),
            Kind::Less => compare(operator, &left, &right, |o| o == std::cmp::Ordering::Less),
            Kind::LessEqual => compare(operator, &left, &right, |o| o != std::cmp::Ordering::Greater),
            Kind::EqualEqual => Ok(Object::from(left == right)),
            Kind::BangEqual => Ok(Object::from(left != right)),
            _ => unreachable!("unexpected binary operator"),
        }
    }

    fn visit_call_expr(&mut self, data: &CallData) -> Result<Object, RuntimeError> {
        let callee = self.evaluate(&data.callee)?;

        let mut arguments = Vec::with_capacity(data.arguments.len());
        for argument in &data.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        let callable: &dyn Callable = match &callee {
            Object::Function(function) => function.as_ref(),
            Object::Native(function) => function.as_ref(),
            _ => {
                return Err(RuntimeError {
                    token: data.paren.clone(),
                    message: "can only call functions and classes".to_string(),
                })
            }
        };

        if arguments.len() != callable.arity() {
            return Err(RuntimeError {
                token: data.paren.clone(),
                message: format!(
                    "expected {} arguments but got {}",
                    callable.arity(),
                    arguments.len()
                ),
            });
        }

        callable.call(self, arguments)
    }

    fn visit_conditional_expr(&mut self, data: &ConditionalData) -> Result<Object, RuntimeError> {
        if self.evaluate(&data.cond)?.is_truthy() {
            self.evaluate(&data.then_branch)
        } else {
            self.evaluate(&data.else_branch)
        }
    }
}

fn operands_must_be_numbers(operator: &Token) -> RuntimeError {
    RuntimeError {
        token: operator.clone(),
        message: "operands must be numbers".to_string(),
    }
}

fn compare(
    operator: &Token,
    left: &Object,
    right: &Object,
    accept: impl Fn(std::cmp::Ordering) -> bool,
) -> Result<Object, RuntimeError> {
    let ordering = match (left, right) {
        (Object::Literal(Literal::Number(l)), Object::Literal(Literal::Number(r))) => {
            l.partial_cmp(r)
        }
        (Object::Literal(Literal::String(l)), Object::Literal(Literal::String(r))) => {
            Some(l.cmp(r))
        }
        _ => None,
    };

    match ordering {
        Some(ordering) => Ok(Object::from(accept(ordering))),
        None => Err(RuntimeError {
            token: operator.clone(),
            message: "operands must be two numbers or two strings".to_string(),
        }),
    }
}

impl StmtVisitor<Result<Flow, RuntimeError>> for Interpreter {
    fn visit_expression_stmt(&mut self, data: &ExpressionData) -> Result<Flow, RuntimeError> {
        self.evaluate(&data.expr)?;
        Ok(Flow::Normal)
    }

    fn visit_print_stmt(&mut self, data: &PrintData) -> Result<Flow, RuntimeError> {
        let value = self.evaluate(&data.expr)?;
        let _ = writeln!(self.output, "{value}");
        Ok(Flow::Normal)
    }

    fn visit_var_stmt(&mut self, data: &VarData) -> Result<Flow, RuntimeError> {
        let value = match &data.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Object::from(Literal::Nil),
        };

        self.environment.borrow_mut().define(&data.name.lexeme, value);
        Ok(Flow::Normal)
    }

    fn visit_block_stmt(&mut self, data: &BlockData) -> Result<Flow, RuntimeError> {
        let scope = Environment::new(Some(Rc::clone(&self.environment)));
        self.execute_block(&data.statements, Rc::new(RefCell::new(scope)))
    }

    fn visit_if_stmt(&mut self, data: &IfData) -> Result<Flow, RuntimeError> {
        if self.evaluate(&data.condition)?.is_truthy() {
            self.execute(&data.then_branch)
        } else if let Some(else_branch) = &data.else_branch {
            self.execute(else_branch)
        } else {
            Ok(Flow::Normal)
        }
    }

    fn visit_while_stmt(&mut self, data: &WhileData) -> Result<Flow, RuntimeError> {
        while self.evaluate(&data.condition)?.is_truthy() {
            match self.execute(&data.body)? {
                Flow::Normal => continue,
                Flow::Break => break,
                flow @ Flow::Return(_) => return Ok(flow),
            }
        }

        Ok(Flow::Normal)
    }

    fn visit_break_stmt(&mut self, _data: &BreakData) -> Result<Flow, RuntimeError> {
        Ok(Flow::Break)
    }

    fn visit_function_stmt(&mut self, data: &Rc<FunctionData>) -> Result<Flow, RuntimeError> {
        let function = LoxFunction {
            declaration: Rc::clone(data),
            closure: Rc::clone(&self.environment),
        };

        self.environment
            .borrow_mut()
            .define(&data.name.lexeme, Object::from(Rc::new(function)));

        Ok(Flow::Normal)
    }

    fn visit_return_stmt(&mut self, data: &ReturnData) -> Result<Flow, RuntimeError> {
        let value = match &data.value {
            Some(value) => self.evaluate(value)?,
            None => Object::from(Literal::Nil),
        };

        Ok(Flow::Return(value))
    }
}
