//! Shared error utilities used across the compilation pipeline.
//!
//! Both fatal error kinds carry enough location information for the caller to
//! point at the offending line: the 1-based line and column, the text of that
//! line, and a caret marker underneath it.

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Snafu)]
pub enum CompileError {
  /// An input character or sequence the tokenizer cannot classify.
  #[snafu(display("line {line}, column {column}: {message}\n{source_line}\n{marker}"))]
  Lex {
    message: String,
    line: usize,
    column: usize,
    source_line: String,
    marker: String,
  },

  /// The parser expected something the token stream did not provide.
  #[snafu(display("line {line}, column {column}: {message}\n{source_line}\n{marker}"))]
  Syntax {
    message: String,
    token_index: usize,
    line: usize,
    column: usize,
    source_line: String,
    marker: String,
  },
}

/// Position of a byte offset inside the source, resolved to its line.
struct Location {
  line: usize,
  column: usize,
  source_line: String,
  marker: String,
}

impl Location {
  fn resolve(source: &str, loc: usize) -> Self {
    let mut safe_loc = loc.min(source.len());
    while !source.is_char_boundary(safe_loc) {
      safe_loc -= 1;
    }
    let line_start = source[..safe_loc].rfind('\n').map_or(0, |i| i + 1);
    let line_end = source[safe_loc..]
      .find('\n')
      .map_or(source.len(), |i| safe_loc + i);
    let line = source[..safe_loc].matches('\n').count() + 1;
    let column = source[line_start..safe_loc].chars().count() + 1;
    let marker = format!("{}^", " ".repeat(column - 1));
    Self {
      line,
      column,
      source_line: source[line_start..line_end].trim_end_matches('\r').to_string(),
      marker,
    }
  }
}

impl CompileError {
  /// Construct a lexical error anchored at a byte offset in the source.
  pub fn lex_at(source: &str, loc: usize, message: impl Into<String>) -> Self {
    let Location {
      line,
      column,
      source_line,
      marker,
    } = Location::resolve(source, loc);
    Self::Lex {
      message: message.into(),
      line,
      column,
      source_line,
      marker,
    }
  }

  /// Construct a syntax error for the token at `token_index`, which starts at
  /// byte offset `loc`.
  pub fn syntax_at(
    source: &str,
    token_index: usize,
    loc: usize,
    message: impl Into<String>,
  ) -> Self {
    let Location {
      line,
      column,
      source_line,
      marker,
    } = Location::resolve(source, loc);
    Self::Syntax {
      message: message.into(),
      token_index,
      line,
      column,
      source_line,
      marker,
    }
  }

  /// 1-based source line the error points at.
  pub fn line(&self) -> usize {
    match self {
      Self::Lex { line, .. } | Self::Syntax { line, .. } => *line,
    }
  }

  /// The bare diagnostic, without location decoration.
  pub fn message(&self) -> &str {
    match self {
      Self::Lex { message, .. } | Self::Syntax { message, .. } => message,
    }
  }

  /// Index of the token the parser failed on; `None` for lexical errors.
  pub fn token_index(&self) -> Option<usize> {
    match self {
      Self::Syntax { token_index, .. } => Some(*token_index),
      Self::Lex { .. } => None,
    }
  }
}
