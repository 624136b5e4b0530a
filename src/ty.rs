use std::fmt;

/// Type names as written in declarations. Nothing checks them; they are kept
/// so the parse tree reproduces the source faithfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
  Int,
  Boolean,
  Void,
  String,
  Class(std::string::String),
}

impl Type {
  /// Map a keyword type name onto its variant; `None` for non-type keywords.
  pub fn from_keyword(keyword: &str) -> Option<Self> {
    match keyword {
      "int" => Some(Self::Int),
      "boolean" => Some(Self::Boolean),
      "void" => Some(Self::Void),
      "String" => Some(Self::String),
      _ => None,
    }
  }

  pub fn class(name: impl Into<std::string::String>) -> Self {
    Self::Class(name.into())
  }

  pub fn is_void(&self) -> bool {
    matches!(self, Self::Void)
  }
}

impl fmt::Display for Type {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Int => f.write_str("int"),
      Self::Boolean => f.write_str("boolean"),
      Self::Void => f.write_str("void"),
      Self::String => f.write_str("String"),
      Self::Class(name) => f.write_str(name),
    }
  }
}
