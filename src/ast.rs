//! Parse tree produced by the parser: classes, their members, statements and
//! expressions. Built once per compilation and never mutated afterwards.

use std::fmt;

use crate::ty::Type;

/// Binary operators recognised by the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Div,
  Lt,
  Le,
  Gt,
  Ge,
  Eq,
  Ne,
}

impl BinaryOp {
  /// Source spelling of the operator.
  pub fn symbol(self) -> &'static str {
    match self {
      BinaryOp::Add => "+",
      BinaryOp::Sub => "-",
      BinaryOp::Mul => "*",
      BinaryOp::Div => "/",
      BinaryOp::Lt => "<",
      BinaryOp::Le => "<=",
      BinaryOp::Gt => ">",
      BinaryOp::Ge => ">=",
      BinaryOp::Eq => "==",
      BinaryOp::Ne => "!=",
    }
  }

  pub fn is_arithmetic(self) -> bool {
    matches!(
      self,
      BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div
    )
  }
}

impl fmt::Display for BinaryOp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.symbol())
  }
}

/// Expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
  IntLiteral(i64),
  Identifier(String),
  BinaryOp {
    left: Box<Expression>,
    op: BinaryOp,
    right: Box<Expression>,
  },
  MethodCall {
    name: String,
    arguments: Vec<Expression>,
  },
}

impl Expression {
  pub fn ident(name: impl Into<String>) -> Self {
    Self::Identifier(name.into())
  }

  pub fn binary(left: Expression, op: BinaryOp, right: Expression) -> Self {
    Self::BinaryOp {
      left: Box::new(left),
      op,
      right: Box::new(right),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
  VariableDeclaration {
    ty: Type,
    name: String,
    expr: Option<Expression>,
  },
  Assignment {
    target: String,
    expr: Expression,
  },
  Print {
    expr: Expression,
  },
  If {
    condition: Expression,
    then_branch: Box<Statement>,
    else_branch: Option<Box<Statement>>,
  },
  While {
    condition: Expression,
    body: Box<Statement>,
  },
  Return {
    expr: Expression,
  },
  Block {
    statements: Vec<Statement>,
  },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
  pub ty: Type,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
  pub name: String,
  pub return_type: Type,
  pub parameters: Vec<Parameter>,
  pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
  pub ty: Type,
  pub name: String,
  pub init: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
  pub name: String,
  pub fields: Vec<FieldDecl>,
  pub methods: Vec<MethodDecl>,
}
