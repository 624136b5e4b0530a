//! Lexical analysis: turns the raw input string into a vector of tokens.
//!
//! The tokenizer knows nothing about the grammar beyond the four token kinds.
//! Comments and whitespace are consumed here and never reach the parser.
//! Multi-character symbols are matched before single-character ones to avoid
//! ambiguity, and words are matched greedily before being classified, so a
//! keyword is only recognised when it stands on its own.

use std::fmt;

use crate::error::{CompileError, CompileResult};

/// Reserved words. `System.out.println` is handled separately since it spans
/// several identifier-like segments.
pub const KEYWORDS: [&str; 15] = [
  "class", "public", "static", "void", "String", "int", "boolean", "true", "false", "if", "else",
  "while", "return", "new", "this",
];

/// The print intrinsic, lexed as a single keyword.
pub const PRINTLN: &str = "System.out.println";

/// Kinds of tokens recognised by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Keyword,
  Identifier,
  IntegerLiteral,
  Symbol,
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      TokenKind::Keyword => "KEYWORD",
      TokenKind::Identifier => "IDENTIFIER",
      TokenKind::IntegerLiteral => "INTEGER_LITERAL",
      TokenKind::Symbol => "SYMBOL",
    };
    f.write_str(name)
  }
}

/// A lexeme together with its byte offset in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub text: String,
  pub loc: usize,
}

impl Token {
  pub fn new(kind: TokenKind, text: impl Into<String>, loc: usize) -> Self {
    Self {
      kind,
      text: text.into(),
      loc,
    }
  }

  /// True for a token of the given kind whose text is exactly `text`.
  pub fn is(&self, kind: TokenKind, text: &str) -> bool {
    self.kind == kind && self.text == text
  }
}

impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Token({}, {})", self.kind, self.text)
  }
}

fn is_ident_start(c: u8) -> bool {
  c.is_ascii_alphabetic() || c == b'_'
}

fn is_ident_continue(c: u8) -> bool {
  c.is_ascii_alphanumeric() || c == b'_'
}

/// Lex the input into a flat vector of tokens.
pub fn tokenize(input: &str) -> CompileResult<Vec<Token>> {
  let mut tokens = Vec::new();
  let bytes = input.as_bytes();
  let mut i = 0;

  while i < bytes.len() {
    let c = bytes[i];
    if c.is_ascii_whitespace() {
      i += 1;
      continue;
    }

    if input[i..].starts_with("//") {
      i = input[i..].find('\n').map_or(bytes.len(), |end| i + end);
      continue;
    }

    if input[i..].starts_with("/*") {
      let Some(end) = input[i + 2..].find("*/") else {
        return Err(CompileError::lex_at(input, i, "unterminated block comment"));
      };
      i += 2 + end + 2;
      continue;
    }

    if input[i..].starts_with(PRINTLN)
      && !bytes
        .get(i + PRINTLN.len())
        .is_some_and(|next| is_ident_continue(*next))
    {
      tokens.push(Token::new(TokenKind::Keyword, PRINTLN, i));
      i += PRINTLN.len();
      continue;
    }

    if is_ident_start(c) {
      let start = i;
      while i < bytes.len() && is_ident_continue(bytes[i]) {
        i += 1;
      }
      let word = &input[start..i];
      let kind = if KEYWORDS.contains(&word) {
        TokenKind::Keyword
      } else {
        TokenKind::Identifier
      };
      tokens.push(Token::new(kind, word, start));
      continue;
    }

    if c.is_ascii_digit() {
      let start = i;
      while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
      }
      let text = &input[start..i];
      text
        .parse::<i64>()
        .map_err(|err| CompileError::lex_at(input, start, format!("invalid number: {err}")))?;
      tokens.push(Token::new(TokenKind::IntegerLiteral, text, start));
      continue;
    }

    if let Some(op) = ["<=", ">=", "==", "!="]
      .into_iter()
      .find(|op| input[i..].starts_with(op))
    {
      tokens.push(Token::new(TokenKind::Symbol, op, i));
      i += op.len();
      continue;
    }

    if matches!(
      c,
      b'{'
        | b'}'
        | b'('
        | b')'
        | b'['
        | b']'
        | b';'
        | b'='
        | b'+'
        | b'-'
        | b'*'
        | b'/'
        | b','
        | b'.'
        | b'<'
        | b'>'
    ) {
      tokens.push(Token::new(TokenKind::Symbol, &input[i..i + 1], i));
      i += 1;
      continue;
    }

    let invalid_char = input[i..].chars().next().unwrap_or('\0');
    return Err(CompileError::lex_at(
      input,
      i,
      format!("invalid token: '{invalid_char}'"),
    ));
  }

  log::trace!("tokenized {} tokens", tokens.len());
  Ok(tokens)
}

/// Human-friendly description used in diagnostics: `<kind> <text>` or `EOF`.
pub fn describe_token(token: Option<&Token>) -> String {
  match token {
    Some(t) => format!("{} {}", t.kind, t.text),
    None => "EOF".to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn kinds_and_texts(source: &str) -> Vec<(TokenKind, String)> {
    tokenize(source)
      .unwrap()
      .into_iter()
      .map(|t| (t.kind, t.text))
      .collect()
  }

  #[test]
  fn classifies_keywords_identifiers_literals_and_symbols() {
    let tokens = kinds_and_texts("int x = 42;");
    assert_eq!(
      tokens,
      vec![
        (TokenKind::Keyword, "int".to_string()),
        (TokenKind::Identifier, "x".to_string()),
        (TokenKind::Symbol, "=".to_string()),
        (TokenKind::IntegerLiteral, "42".to_string()),
        (TokenKind::Symbol, ";".to_string()),
      ]
    );
  }

  #[test]
  fn println_is_a_single_keyword() {
    let tokens = tokenize("System.out.println(x);").unwrap();
    assert_eq!(tokens[0], Token::new(TokenKind::Keyword, PRINTLN, 0));
    assert_eq!(tokens[1].text, "(");
  }

  #[test]
  fn keyword_prefixes_stay_identifiers() {
    let tokens = kinds_and_texts("interest classy whileLoop _if");
    assert!(tokens.iter().all(|(kind, _)| *kind == TokenKind::Identifier));
    assert_eq!(tokens[0].1, "interest");
  }

  #[test]
  fn comments_and_whitespace_are_dropped() {
    let source = "a // trailing\n/* block\n comment */ b\t\n";
    let texts: Vec<String> = tokenize(source).unwrap().into_iter().map(|t| t.text).collect();
    assert_eq!(texts, vec!["a", "b"]);
  }

  #[test]
  fn relational_symbols_prefer_longest_match() {
    let texts: Vec<String> = tokenize("a<=b==c<d!=e")
      .unwrap()
      .into_iter()
      .map(|t| t.text)
      .collect();
    assert_eq!(texts, vec!["a", "<=", "b", "==", "c", "<", "d", "!=", "e"]);
  }

  #[test]
  fn records_byte_offsets() {
    let tokens = tokenize("  x\n y").unwrap();
    assert_eq!(tokens[0].loc, 2);
    assert_eq!(tokens[1].loc, 5);
  }

  #[test]
  fn token_display_matches_listing_format() {
    let token = Token::new(TokenKind::IntegerLiteral, "7", 0);
    assert_eq!(token.to_string(), "Token(INTEGER_LITERAL, 7)");
  }

  #[test]
  fn rejects_unknown_characters() {
    let err = tokenize("int x;\nx = 3 # 4;").unwrap_err();
    assert!(matches!(err, CompileError::Lex { .. }));
    assert_eq!(err.line(), 2);
    assert_eq!(err.message(), "invalid token: '#'");
  }

  #[test]
  fn rejects_unterminated_block_comment() {
    let err = tokenize("x /* never closed").unwrap_err();
    assert_eq!(err.message(), "unterminated block comment");
  }

  #[test]
  fn rejects_oversized_literals() {
    let err = tokenize("99999999999999999999").unwrap_err();
    assert!(err.message().starts_with("invalid number"));
  }
}
