use crate::literal::Literal;
use crate::token::Token;

/// An expression node. Recursive arms are boxed to keep the enum's size
/// finite; the AST is built once by the parser and never mutated afterward.
///
/// `Variable` and `Assign` each carry an `id`: a construction-order identity
/// assigned once by the parser. The resolver uses `id` as the key into the
/// interpreter's resolution map, since two syntactically identical
/// references at different program points must resolve independently and
/// source text is not a stable key.
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Literal),
    Variable(VariableData),
    Group(GroupData),
    Assign(AssignData),
    Unary(UnaryData),
    Logical(LogicalData),
    Binary(BinaryData),
    Call(CallData),
    Conditional(ConditionalData),
}

#[derive(Debug, Clone)]
pub struct VariableData {
    pub id: usize,
    pub name: Token,
}

#[derive(Debug, Clone)]
pub struct GroupData {
    pub expr: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct AssignData {
    pub id: usize,
    pub name: Token,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct UnaryData {
    pub operator: Token,
    pub expr: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct LogicalData {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct BinaryData {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct CallData {
    pub callee: Box<Expr>,
    pub paren: Token,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct ConditionalData {
    pub cond: Box<Expr>,
    pub then_branch: Box<Expr>,
    pub else_branch: Box<Expr>,
}

impl Expr {
    /// Accepts a visitor and returns the result of the visit.
    pub fn accept<T>(&self, visitor: &mut dyn ExprVisitor<T>) -> T {
        match self {
            Expr::Literal(data) => visitor.visit_literal_expr(data),
            Expr::Variable(data) => visitor.visit_variable_expr(data),
            Expr::Group(data) => visitor.visit_group_expr(data),
            Expr::Assign(data) => visitor.visit_assign_expr(data),
            Expr::Unary(data) => visitor.visit_unary_expr(data),
            Expr::Logical(data) => visitor.visit_logical_expr(data),
            Expr::Binary(data) => visitor.visit_binary_expr(data),
            Expr::Call(data) => visitor.visit_call_expr(data),
            Expr::Conditional(data) => visitor.visit_conditional_expr(data),
        }
    }
}

pub trait ExprVisitor<T> {
    fn visit_literal_expr(&mut self, data: &Literal) -> T;
    fn visit_variable_expr(&mut self, data: &VariableData) -> T;
    fn visit_group_expr(&mut self, data: &GroupData) -> T;
    fn visit_assign_expr(&mut self, data: &AssignData) -> T;
    fn visit_unary_expr(&mut self, data: &UnaryData) -> T;
    fn visit_logical_expr(&mut self, data: &LogicalData) -> T;
    fn visit_binary_expr(&mut self, data: &BinaryData) -> T;
    fn visit_call_expr(&mut self, data: &CallData) -> T;
    fn visit_conditional_expr(&mut self, data: &ConditionalData) -> T;
}
