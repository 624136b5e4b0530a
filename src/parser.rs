//! Recursive-descent parser producing the class/method/statement tree.
//!
//! One function per nonterminal. Binary operators are parsed by a set of
//! precedence levels, each folding to the left, so `a - b - c` groups as
//! `(a - b) - c`. The parser stops at the first mismatch and reports the index
//! of the token it failed on.

use crate::ast::{
  BinaryOp, ClassDecl, Expression, FieldDecl, MethodDecl, Parameter, Statement,
};
use crate::error::{CompileError, CompileResult};
use crate::tokenizer::{PRINTLN, Token, TokenKind, describe_token};
use crate::ty::Type;

/// Parse a whole program: a sequence of class declarations.
pub fn parse(tokens: Vec<Token>, source: &str) -> CompileResult<Vec<ClassDecl>> {
  let mut stream = TokenStream::new(tokens, source);
  let mut classes = Vec::new();

  while !stream.is_eof() {
    classes.push(parse_class(&mut stream)?);
  }

  log::debug!("parsed {} class declaration(s)", classes.len());
  Ok(classes)
}

fn parse_class(stream: &mut TokenStream) -> CompileResult<ClassDecl> {
  stream.skip_keyword("class")?;
  let name = stream.get_ident()?;
  stream.skip("{")?;

  let mut fields = Vec::new();
  let mut methods = Vec::new();
  let construct = format!("class '{name}'");

  while !stream.equal("}") {
    if stream.is_eof() {
      return Err(stream.unclosed(&construct));
    }

    if stream.at_main_signature() {
      methods.push(parse_main_method(stream)?);
    } else if stream.check_keyword("public") {
      methods.push(parse_method(stream)?);
    } else {
      fields.push(parse_field(stream)?);
    }
  }

  Ok(ClassDecl {
    name,
    fields,
    methods,
  })
}

// public static void main(String[] args) { ... }
fn parse_main_method(stream: &mut TokenStream) -> CompileResult<MethodDecl> {
  stream.skip_keyword("public")?;
  stream.skip_keyword("static")?;
  stream.skip_keyword("void")?;
  let name = stream.get_ident()?;
  stream.skip("(")?;
  stream.skip_keyword("String")?;
  stream.skip("[")?;
  stream.skip("]")?;
  stream.get_ident()?;
  stream.skip(")")?;
  let statements = parse_body(stream, &format!("method '{name}'"))?;

  Ok(MethodDecl {
    name,
    return_type: Type::Void,
    parameters: Vec::new(),
    statements,
  })
}

fn parse_method(stream: &mut TokenStream) -> CompileResult<MethodDecl> {
  stream.skip_keyword("public")?;
  stream.equal_keyword("static");
  let return_type = parse_type(stream)?;
  let name = stream.get_ident()?;
  stream.skip("(")?;

  let mut parameters = Vec::new();
  if !stream.equal(")") {
    loop {
      let ty = parse_type(stream)?;
      let param_name = stream.get_ident()?;
      parameters.push(Parameter {
        ty,
        name: param_name,
      });
      if stream.equal(")") {
        break;
      }
      stream.skip(",")?;
    }
  }

  let statements = parse_body(stream, &format!("method '{name}'"))?;
  Ok(MethodDecl {
    name,
    return_type,
    parameters,
    statements,
  })
}

fn parse_field(stream: &mut TokenStream) -> CompileResult<FieldDecl> {
  let ty = parse_type(stream)?;
  let name = stream.get_ident()?;
  let init = if stream.equal("=") {
    Some(parse_expr(stream)?)
  } else {
    None
  };
  stream.skip(";")?;
  Ok(FieldDecl { ty, name, init })
}

/// `type := KEYWORD | IDENTIFIER`
fn parse_type(stream: &mut TokenStream) -> CompileResult<Type> {
  if let Some(token) = stream.peek() {
    let ty = match token.kind {
      TokenKind::Keyword => Type::from_keyword(&token.text),
      TokenKind::Identifier => Some(Type::class(token.text.clone())),
      _ => None,
    };
    if let Some(ty) = ty {
      stream.advance();
      return Ok(ty);
    }
  }
  Err(stream.unexpected("a type name"))
}

/// `'{' statement* '}'`, reporting `construct` if the closing brace never comes.
fn parse_body(stream: &mut TokenStream, construct: &str) -> CompileResult<Vec<Statement>> {
  stream.skip("{")?;
  let mut statements = Vec::new();
  while !stream.equal("}") {
    if stream.is_eof() {
      return Err(stream.unclosed(construct));
    }
    statements.push(parse_stmt(stream)?);
  }
  Ok(statements)
}

fn parse_stmt(stream: &mut TokenStream) -> CompileResult<Statement> {
  let Some((kind, text)) = stream.peek().map(|token| (token.kind, token.text.clone())) else {
    return Err(stream.unexpected("a statement"));
  };

  match (kind, text.as_str()) {
    (TokenKind::Keyword, "int" | "boolean") => parse_var_decl(stream),
    (TokenKind::Keyword, PRINTLN) => parse_print(stream),
    (TokenKind::Keyword, "if") => parse_if(stream),
    (TokenKind::Keyword, "while") => parse_while(stream),
    (TokenKind::Keyword, "return") => parse_return(stream),
    (TokenKind::Symbol, "{") => {
      let statements = parse_body(stream, "block")?;
      Ok(Statement::Block { statements })
    }
    (TokenKind::Identifier, _) => parse_assignment(stream),
    _ => Err(stream.unexpected("a statement")),
  }
}

fn parse_var_decl(stream: &mut TokenStream) -> CompileResult<Statement> {
  let ty = parse_type(stream)?;
  let name = stream.get_ident()?;
  let expr = if stream.equal("=") {
    Some(parse_expr(stream)?)
  } else {
    None
  };
  stream.skip(";")?;
  Ok(Statement::VariableDeclaration { ty, name, expr })
}

fn parse_assignment(stream: &mut TokenStream) -> CompileResult<Statement> {
  let target = stream.get_ident()?;
  stream.skip("=")?;
  let expr = parse_expr(stream)?;
  stream.skip(";")?;
  Ok(Statement::Assignment { target, expr })
}

fn parse_print(stream: &mut TokenStream) -> CompileResult<Statement> {
  stream.skip_keyword(PRINTLN)?;
  stream.skip("(")?;
  let expr = parse_expr(stream)?;
  stream.skip(")")?;
  stream.skip(";")?;
  Ok(Statement::Print { expr })
}

fn parse_if(stream: &mut TokenStream) -> CompileResult<Statement> {
  stream.skip_keyword("if")?;
  stream.skip("(")?;
  let condition = parse_expr(stream)?;
  stream.skip(")")?;
  let then_branch = Box::new(parse_stmt(stream)?);
  let else_branch = if stream.equal_keyword("else") {
    Some(Box::new(parse_stmt(stream)?))
  } else {
    None
  };
  Ok(Statement::If {
    condition,
    then_branch,
    else_branch,
  })
}

fn parse_while(stream: &mut TokenStream) -> CompileResult<Statement> {
  stream.skip_keyword("while")?;
  stream.skip("(")?;
  let condition = parse_expr(stream)?;
  stream.skip(")")?;
  let body = Box::new(parse_stmt(stream)?);
  Ok(Statement::While { condition, body })
}

fn parse_return(stream: &mut TokenStream) -> CompileResult<Statement> {
  stream.skip_keyword("return")?;
  let expr = parse_expr(stream)?;
  stream.skip(";")?;
  Ok(Statement::Return { expr })
}

fn parse_expr(stream: &mut TokenStream) -> CompileResult<Expression> {
  parse_relational(stream)
}

fn parse_relational(stream: &mut TokenStream) -> CompileResult<Expression> {
  let mut node = parse_add(stream)?;

  loop {
    let op = match stream.peek_symbol() {
      Some("<") => BinaryOp::Lt,
      Some("<=") => BinaryOp::Le,
      Some(">") => BinaryOp::Gt,
      Some(">=") => BinaryOp::Ge,
      Some("==") => BinaryOp::Eq,
      Some("!=") => BinaryOp::Ne,
      _ => break,
    };

    stream.advance();
    let rhs = parse_add(stream)?;
    node = Expression::binary(node, op, rhs);
  }

  Ok(node)
}

fn parse_add(stream: &mut TokenStream) -> CompileResult<Expression> {
  let mut node = parse_mul(stream)?;

  loop {
    let op = match stream.peek_symbol() {
      Some("+") => BinaryOp::Add,
      Some("-") => BinaryOp::Sub,
      _ => break,
    };

    stream.advance();
    let rhs = parse_mul(stream)?;
    node = Expression::binary(node, op, rhs);
  }

  Ok(node)
}

fn parse_mul(stream: &mut TokenStream) -> CompileResult<Expression> {
  let mut node = parse_primary(stream)?;

  loop {
    let op = match stream.peek_symbol() {
      Some("*") => BinaryOp::Mul,
      Some("/") => BinaryOp::Div,
      _ => break,
    };

    stream.advance();
    let rhs = parse_primary(stream)?;
    node = Expression::binary(node, op, rhs);
  }

  Ok(node)
}

fn parse_primary(stream: &mut TokenStream) -> CompileResult<Expression> {
  if stream.equal("(") {
    let node = parse_expr(stream)?;
    stream.skip(")")?;
    return Ok(node);
  }

  match stream.peek().map(|token| token.kind) {
    Some(TokenKind::Identifier) => {
      let name = stream.get_ident()?;
      if !stream.equal("(") {
        return Ok(Expression::Identifier(name));
      }

      let mut arguments = Vec::new();
      if !stream.equal(")") {
        loop {
          arguments.push(parse_expr(stream)?);
          if stream.equal(")") {
            break;
          }
          stream.skip(",")?;
        }
      }
      Ok(Expression::MethodCall { name, arguments })
    }
    Some(TokenKind::IntegerLiteral) => Ok(Expression::IntLiteral(stream.get_number()?)),
    _ => Err(stream.unexpected("an expression")),
  }
}

/// Lightweight cursor over the token vector.
struct TokenStream<'a> {
  tokens: Vec<Token>,
  source: &'a str,
  pos: usize,
}

impl<'a> TokenStream<'a> {
  /// Take ownership of the token stream; the parser will advance `pos` as it consumes input.
  fn new(tokens: Vec<Token>, source: &'a str) -> Self {
    Self {
      tokens,
      source,
      pos: 0,
    }
  }

  fn peek(&self) -> Option<&Token> {
    self.tokens.get(self.pos)
  }

  fn peek_at(&self, offset: usize) -> Option<&Token> {
    self.tokens.get(self.pos + offset)
  }

  /// Text of the current token if it is a symbol.
  fn peek_symbol(&self) -> Option<&str> {
    self
      .peek()
      .filter(|token| token.kind == TokenKind::Symbol)
      .map(|token| token.text.as_str())
  }

  fn advance(&mut self) {
    self.pos += 1;
  }

  fn check_keyword(&self, keyword: &str) -> bool {
    self
      .peek()
      .is_some_and(|token| token.is(TokenKind::Keyword, keyword))
  }

  /// Lookahead for `public static void main`.
  fn at_main_signature(&self) -> bool {
    ["public", "static", "void"]
      .iter()
      .enumerate()
      .all(|(i, keyword)| {
        self
          .peek_at(i)
          .is_some_and(|token| token.is(TokenKind::Keyword, keyword))
      })
      && self
        .peek_at(3)
        .is_some_and(|token| token.is(TokenKind::Identifier, "main"))
  }

  /// Consume the current token if it is the given symbol.
  fn equal(&mut self, symbol: &str) -> bool {
    if self
      .peek()
      .is_some_and(|token| token.is(TokenKind::Symbol, symbol))
    {
      self.pos += 1;
      return true;
    }
    false
  }

  /// Consume the current token if it is the given keyword.
  fn equal_keyword(&mut self, keyword: &str) -> bool {
    if self.check_keyword(keyword) {
      self.pos += 1;
      return true;
    }
    false
  }

  fn skip(&mut self, symbol: &str) -> CompileResult<()> {
    if self.equal(symbol) {
      Ok(())
    } else {
      Err(self.unexpected_value(TokenKind::Symbol, symbol))
    }
  }

  fn skip_keyword(&mut self, keyword: &str) -> CompileResult<()> {
    if self.equal_keyword(keyword) {
      Ok(())
    } else {
      Err(self.unexpected_value(TokenKind::Keyword, keyword))
    }
  }

  /// Consume a token of the given kind, returning its text.
  fn consume(&mut self, kind: TokenKind) -> CompileResult<String> {
    if let Some(token) = self.peek()
      && token.kind == kind
    {
      let text = token.text.clone();
      self.pos += 1;
      return Ok(text);
    }

    let got = describe_token(self.peek());
    Err(self.error(format!("Expected token type '{kind}', found '{got}'")))
  }

  fn get_ident(&mut self) -> CompileResult<String> {
    self.consume(TokenKind::Identifier)
  }

  /// Parse the current token as an integer literal.
  fn get_number(&mut self) -> CompileResult<i64> {
    let loc = self.current_loc();
    let index = self.pos;
    let text = self.consume(TokenKind::IntegerLiteral)?;
    text.parse::<i64>().map_err(|err| {
      CompileError::syntax_at(self.source, index, loc, format!("invalid number: {err}"))
    })
  }

  fn is_eof(&self) -> bool {
    self.pos >= self.tokens.len()
  }

  fn current_loc(&self) -> usize {
    self.peek().map_or(self.source.len(), |token| token.loc)
  }

  /// A syntax error anchored at the current token (or the end of input).
  fn error(&self, message: impl Into<String>) -> CompileError {
    CompileError::syntax_at(self.source, self.pos, self.current_loc(), message)
  }

  fn unexpected_value(&self, kind: TokenKind, expected: &str) -> CompileError {
    let got = describe_token(self.peek());
    self.error(format!("Expected token type '{kind} {expected}', found '{got}'"))
  }

  fn unexpected(&self, what: &str) -> CompileError {
    let got = describe_token(self.peek());
    self.error(format!("Expected {what}, found '{got}'"))
  }

  fn unclosed(&self, construct: &str) -> CompileError {
    let got = describe_token(self.peek());
    self.error(format!("Expected '}}' to close {construct}, found '{got}'"))
  }
}
