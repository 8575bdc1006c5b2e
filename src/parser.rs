use std::rc::Rc;

use crate::error::{Diagnostics, ParseError};
use crate::expr::*;
use crate::literal::Literal;
use crate::stmt::*;
use crate::token::{Kind, Token};

type ParseResult<T> = Result<T, ParseError>;

/// Returns whether the next token is any of the given kinds, consuming it if so.
macro_rules! matches {
    ( $self:ident, $( $kind:expr ),+ ) => {
        {
            if $( $self.check($kind) )||* {
                $self.advance();
                true
            } else {
                false
            }
        }
    }
}

/// Recursive-descent parser, one-token lookahead.
///
/// - program     -> declaration* EOF
/// - declaration -> varDecl | funDecl | statement
/// - varDecl     -> "var" IDENT ( "=" expression )? ";"
/// - funDecl     -> "fun" IDENT "(" params? ")" block
/// - params      -> IDENT ( "," IDENT )*
/// - statement   -> exprStmt | printStmt | ifStmt | whileStmt
///                | forStmt | returnStmt | breakStmt | block
/// - block       -> "{" declaration* "}"
/// - ifStmt      -> "if" "(" expression ")" statement ( "else" statement )?
/// - whileStmt   -> "while" "(" expression ")" statement
/// - forStmt     -> "for" "(" ( varDecl | exprStmt | ";" ) expression? ";" expression? ")" statement
/// - returnStmt  -> "return" expression? ";"
/// - breakStmt   -> "break" ";"
/// - exprStmt    -> expression ";"
/// - printStmt   -> "print" expression ";"
/// - expression  -> assignment
/// - assignment  -> IDENT "=" assignment | logic_or
/// - logic_or    -> logic_and ( "or" logic_and )*
/// - logic_and   -> comma ( "and" comma )*
/// - comma       -> conditional ( "," conditional )*
/// - conditional -> equality ( "?" expression ":" conditional )?
/// - equality    -> comparison ( ( "!=" | "==" ) comparison )*
/// - comparison  -> term ( ( ">" | ">=" | "<" | "<=" ) term )*
/// - term        -> factor ( ( "-" | "+" ) factor )*
/// - factor      -> unary ( ( "/" | "*" ) unary )*
/// - unary       -> ( "!" | "-" ) unary | call
/// - call        -> primary ( "(" args? ")" )*
/// - primary     -> NUMBER | STRING | "true" | "false" | "nil" | IDENT | "(" expression ")"
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    next_id: usize,
    loop_depth: u32,
}

impl Parser {
    /// `first_id` seeds the expression-id counter. Callers that re-parse
    /// against a persistent interpreter (the REPL) must pass the next unused
    /// id from the last parse, not `0` — expression ids key the interpreter's
    /// resolution map for the lifetime of the process, so two unrelated
    /// expressions on different lines must never share one.
    pub fn new(tokens: Vec<Token>, first_id: usize) -> Self {
        Parser { tokens, current: 0, next_id: first_id, loop_depth: 0 }
    }

    /// Parses the token stream into a program, reporting each error it
    /// encounters and synchronizing so later statements still get a chance
    /// to parse.
    pub fn parse(&mut self, diagnostics: &mut Diagnostics) -> Vec<Stmt> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.declaration(diagnostics) {
                statements.push(stmt);
            }
        }

        statements
    }

    /// The next unused expression id. The caller carries this forward into
    /// the next parse against the same interpreter.
    pub fn next_expr_id(&self) -> usize {
        self.next_id
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == Kind::EOF
    }

    fn check(&self, kind: Kind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn consume(&mut self, kind: Kind, message: &str) -> ParseResult<&Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }

        Err(ParseError { token: self.peek().clone(), message: message.to_string() })
    }

    fn declaration(&mut self, diagnostics: &mut Diagnostics) -> Option<Stmt> {
        let result = if matches!(self, Kind::Fun) {
            self.function(diagnostics, "function")
        } else if matches!(self, Kind::Var) {
            self.var_declaration(diagnostics)
        } else {
            self.statement(diagnostics)
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(error) => {
                diagnostics.parse_error(&error);
                self.synchronize();
                None
            }
        }
    }

    fn var_declaration(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        let name = self.consume(Kind::Identifier, "expect variable name")?.clone();

        let initializer = if matches!(self, Kind::Equal) {
            Some(self.expression(diagnostics)?)
        } else {
            None
        };

        self.consume(Kind::Semicolon, "expect ';' after variable declaration")?;
        Ok(Stmt::Var(VarData { name, initializer }))
    }

    fn statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        if matches!(self, Kind::For) {
            return self.for_statement(diagnostics);
        }
        if matches!(self, Kind::If) {
            return self.if_statement(diagnostics);
        }
        if matches!(self, Kind::Print) {
            return self.print_statement(diagnostics);
        }
        if matches!(self, Kind::Return) {
            return self.return_statement(diagnostics);
        }
        if matches!(self, Kind::While) {
            return self.while_statement(diagnostics);
        }
        if matches!(self, Kind::Break) {
            return self.break_statement();
        }
        if matches!(self, Kind::LeftBrace) {
            return Ok(Stmt::Block(BlockData { statements: self.block(diagnostics)? }));
        }

        self.expression_statement(diagnostics)
    }

    fn while_statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        self.consume(Kind::LeftParen, "expect '(' after 'while'")?;
        let condition = self.expression(diagnostics)?;
        self.consume(Kind::RightParen, "expect ')' after condition")?;

        self.loop_depth += 1;
        let body = self.statement(diagnostics);
        self.loop_depth -= 1;

        Ok(Stmt::While(WhileData { condition, body: Box::new(body?) }))
    }

    fn for_statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        self.consume(Kind::LeftParen, "expect '(' after 'for'")?;

        let initializer = if matches!(self, Kind::Semicolon) {
            None
        } else if matches!(self, Kind::Var) {
            Some(self.var_declaration(diagnostics)?)
        } else {
            Some(self.expression_statement(diagnostics)?)
        };

        let condition = if !self.check(Kind::Semicolon) { Some(self.expression(diagnostics)?) } else { None };
        self.consume(Kind::Semicolon, "expect ';' after loop condition")?;

        let increment = if !self.check(Kind::RightParen) { Some(self.expression(diagnostics)?) } else { None };
        self.consume(Kind::RightParen, "expect ')' after loop clauses")?;

        self.loop_depth += 1;
        let body_result = self.statement(diagnostics);
        self.loop_depth -= 1;
        let mut body = body_result?;

        if let Some(increment) = increment {
            body = Stmt::Block(BlockData {
                statements: vec![body, Stmt::Expression(ExpressionData { expr: increment })],
            });
        }

        body = Stmt::While(WhileData {
            condition: condition.unwrap_or(Expr::Literal(Literal::Bool(true))),
            body: Box::new(body),
        });

        if let Some(initializer) = initializer {
            body = Stmt::Block(BlockData { statements: vec![initializer, body] });
        }

        Ok(body)
    }

    fn if_statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        self.consume(Kind::LeftParen, "expect '(' after 'if'")?;
        let condition = self.expression(diagnostics)?;
        self.consume(Kind::RightParen, "expect ')' after if condition")?;

        let then_branch = Box::new(self.statement(diagnostics)?);
        let else_branch = if matches!(self, Kind::Else) {
            Some(Box::new(self.statement(diagnostics)?))
        } else {
            None
        };

        Ok(Stmt::If(IfData { condition, then_branch, else_branch }))
    }

    fn print_statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        let expr = self.expression(diagnostics)?;
        self.consume(Kind::Semicolon, "expect ';' after value")?;
        Ok(Stmt::Print(PrintData { expr }))
    }

    fn return_statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();

        let value = if !self.check(Kind::Semicolon) { Some(self.expression(diagnostics)?) } else { None };

        self.consume(Kind::Semicolon, "expect ';' after return value")?;
        Ok(Stmt::Return(ReturnData { keyword, value }))
    }

    fn break_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();

        if self.loop_depth == 0 {
            return Err(ParseError {
                token: keyword,
                message: "can't break outside of a loop".to_string(),
            });
        }

        self.consume(Kind::Semicolon, "expect ';' after 'break'")?;
        Ok(Stmt::Break(BreakData { keyword, loop_depth: self.loop_depth }))
    }

    fn expression_statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        let expr = self.expression(diagnostics)?;
        self.consume(Kind::Semicolon, "expect ';' after expression")?;
        Ok(Stmt::Expression(ExpressionData { expr }))
    }

    fn function(&mut self, diagnostics: &mut Diagnostics, kind: &str) -> ParseResult<Stmt> {
        let name = self.consume(Kind::Identifier, &format!("expect {kind} name"))?.clone();

        self.consume(Kind::LeftParen, &format!("expect '(' after {kind} name"))?;

        let mut params = vec![];
        if !self.check(Kind::RightParen) {
            loop {
                if params.len() >= 255 {
                    return Err(ParseError {
                        token: self.peek().clone(),
                        message: "can't have more than 255 parameters".to_string(),
                    });
                }

                params.push(self.consume(Kind::Identifier, "expect parameter name")?.clone());

                if !matches!(self, Kind::Comma) {
                    break;
                }
            }
        }
        self.consume(Kind::RightParen, "expect ')' after parameters")?;

        self.consume(Kind::LeftBrace, &format!("expect '{{' before {kind} body"))?;
        let body = self.block(diagnostics)?;

        Ok(Stmt::Function(Rc::new(FunctionData { name, params, body })))
    }

    /// Parses the body of a block or function, reporting and synchronizing
    /// each declaration independently so one bad statement does not cost
    /// the rest of the block.
    fn block(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(Kind::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration(diagnostics) {
                statements.push(stmt);
            }
        }

        self.consume(Kind::RightBrace, "expect '}' after block")?;
        Ok(statements)
    }

    fn expression(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        self.assignment(diagnostics)
    }

    /// On an invalid assignment target (`1 = 2;`), reports at the `=` token
    /// and keeps the already-parsed left-hand expression rather than
    /// propagating an `Err` — the grammar around it is otherwise fine, so
    /// there is nothing to synchronize past.
    fn assignment(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let expr = self.or(diagnostics)?;

        if matches!(self, Kind::Equal) {
            let equals = self.previous().clone();
            let value = self.assignment(diagnostics)?;

            if let Expr::Variable(data) = expr {
                return Ok(Expr::Assign(AssignData {
                    id: self.next_id(),
                    name: data.name,
                    value: Box::new(value),
                }));
            }

            diagnostics.parse_error(&ParseError {
                token: equals,
                message: "invalid assignment target".to_string(),
            });
            return Ok(expr);
        }

        Ok(expr)
    }

    fn or(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let mut expr = self.and(diagnostics)?;

        while matches!(self, Kind::Or) {
            let operator = self.previous().clone();
            let right = self.and(diagnostics)?;
            expr = Expr::Logical(LogicalData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn and(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let mut expr = self.comma(diagnostics)?;

        while matches!(self, Kind::And) {
            let operator = self.previous().clone();
            let right = self.comma(diagnostics)?;
            expr = Expr::Logical(LogicalData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn comma(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let mut expr = self.conditional(diagnostics)?;

        while matches!(self, Kind::Comma) {
            let operator = self.previous().clone();
            let right = self.conditional(diagnostics)?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn conditional(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let expr = self.binary_entry(diagnostics)?;

        if matches!(self, Kind::Question) {
            let then_branch = self.expression(diagnostics)?;
            self.consume(Kind::Colon, "expect ':' after then branch of conditional expression")?;
            let else_branch = self.conditional(diagnostics)?;

            return Ok(Expr::Conditional(ConditionalData {
                cond: Box::new(expr),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            }));
        }

        Ok(expr)
    }

    /// Entry point into the ordinary binary-operator precedence ladder,
    /// with a check for a binary operator missing its left operand (e.g. a
    /// program that starts with `+ 1`): the offending right-hand side is
    /// still parsed and discarded so the rest of the line can be diagnosed,
    /// rather than cascading into unrelated "expect expression" errors.
    fn binary_entry(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        if matches!(
            self,
            Kind::BangEqual, Kind::EqualEqual, Kind::Greater, Kind::GreaterEqual,
            Kind::Less, Kind::LessEqual, Kind::Plus, Kind::Slash, Kind::Star
        ) {
            let operator = self.previous().clone();
            let _ = self.equality(diagnostics)?;
            return Err(ParseError {
                token: operator,
                message: "missing left-hand operand".to_string(),
            });
        }

        self.equality(diagnostics)
    }

    fn equality(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let mut expr = self.comparison(diagnostics)?;

        while matches!(self, Kind::BangEqual, Kind::EqualEqual) {
            let operator = self.previous().clone();
            let right = self.comparison(diagnostics)?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn comparison(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let mut expr = self.term(diagnostics)?;

        while matches!(self, Kind::Greater, Kind::GreaterEqual, Kind::Less, Kind::LessEqual) {
            let operator = self.previous().clone();
            let right = self.term(diagnostics)?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn term(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let mut expr = self.factor(diagnostics)?;

        while matches!(self, Kind::Minus, Kind::Plus) {
            let operator = self.previous().clone();
            let right = self.factor(diagnostics)?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn factor(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let mut expr = self.unary(diagnostics)?;

        while matches!(self, Kind::Slash, Kind::Star) {
            let operator = self.previous().clone();
            let right = self.unary(diagnostics)?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn unary(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        if matches!(self, Kind::Bang, Kind::Minus) {
            let operator = self.previous().clone();
            let right = self.unary(diagnostics)?;
            return Ok(Expr::Unary(UnaryData { operator, expr: Box::new(right) }));
        }

        self.call(diagnostics)
    }

    fn finish_call(&mut self, diagnostics: &mut Diagnostics, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = vec![];

        if !self.check(Kind::RightParen) {
            loop {
                if arguments.len() >= 255 {
                    return Err(ParseError {
                        token: self.peek().clone(),
                        message: "can't have more than 255 arguments".to_string(),
                    });
                }

                arguments.push(self.expression(diagnostics)?);

                if !matches!(self, Kind::Comma) {
                    break;
                }
            }
        }

        let paren = self.consume(Kind::RightParen, "expect ')' after arguments")?.clone();

        Ok(Expr::Call(CallData { callee: Box::new(callee), paren, arguments }))
    }

    fn call(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let mut expr = self.primary(diagnostics)?;

        while matches!(self, Kind::LeftParen) {
            expr = self.finish_call(diagnostics, expr)?;
        }

        Ok(expr)
    }

    fn primary(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        if matches!(self, Kind::False) {
            return Ok(Expr::Literal(Literal::Bool(false)));
        }
        if matches!(self, Kind::True) {
            return Ok(Expr::Literal(Literal::Bool(true)));
        }
        if matches!(self, Kind::Nil) {
            return Ok(Expr::Literal(Literal::Nil));
        }
        if matches!(self, Kind::Number, Kind::String) {
            return Ok(Expr::Literal(
                self.previous().clone().literal.expect("number or string token to carry a literal"),
            ));
        }
        if matches!(self, Kind::Identifier) {
            return Ok(Expr::Variable(VariableData {
                id: self.next_id(),
                name: self.previous().clone(),
            }));
        }
        if matches!(self, Kind::LeftParen) {
            let expr = self.expression(diagnostics)?;
            self.consume(Kind::RightParen, "expect ')' after expression")?;
            return Ok(Expr::Group(GroupData { expr: Box::new(expr) }));
        }

        Err(ParseError { token: self.peek().clone(), message: "expect expression".to_string() })
    }

    /// Discards tokens up to the next statement boundary after a parse
    /// error, so a single mistake does not cascade into a wall of
    /// downstream diagnostics.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == Kind::Semicolon {
                return;
            }

            match self.peek().kind {
                Kind::Fun | Kind::Var | Kind::For | Kind::If | Kind::While | Kind::Print | Kind::Return => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}
