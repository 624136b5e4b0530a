//! Three-address code: the flat instruction list shared by lowering and the
//! optimizer. Each instruction prints as one line of the textual listing.

use std::fmt;

use crate::ast::BinaryOp;

/// A branch target, printed as `L<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(pub usize);

impl fmt::Display for Label {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "L{}", self.0)
  }
}

/// A value an instruction reads: an integer literal or a variable/temporary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
  Const(i64),
  Name(String),
}

impl Operand {
  pub fn name(name: impl Into<String>) -> Self {
    Self::Name(name.into())
  }

  pub fn as_const(&self) -> Option<i64> {
    match self {
      Self::Const(value) => Some(*value),
      Self::Name(_) => None,
    }
  }

  pub fn as_name(&self) -> Option<&str> {
    match self {
      Self::Name(name) => Some(name),
      Self::Const(_) => None,
    }
  }
}

impl fmt::Display for Operand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Const(value) => write!(f, "{value}"),
      Self::Name(name) => f.write_str(name),
    }
  }
}

/// Right-hand side of an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Rvalue {
  Operand(Operand),
  Binary {
    left: Operand,
    op: BinaryOp,
    right: Operand,
  },
  /// Call `callee` with the preceding `argc` `param` instructions.
  Call { callee: String, argc: usize },
}

impl Rvalue {
  /// Operands this right-hand side reads.
  pub fn operands(&self) -> Vec<&Operand> {
    match self {
      Self::Operand(operand) => vec![operand],
      Self::Binary { left, right, .. } => vec![left, right],
      Self::Call { .. } => Vec::new(),
    }
  }
}

impl fmt::Display for Rvalue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Operand(operand) => write!(f, "{operand}"),
      Self::Binary { left, op, right } => write!(f, "{left} {op} {right}"),
      Self::Call { callee, argc } => write!(f, "call {callee}, {argc}"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
  Assign { dest: String, rhs: Rvalue },
  Param { value: Operand },
  Print { value: Operand },
  Label { label: Label },
  Goto { target: Label },
  IfFalseGoto { condition: Operand, target: Label },
  Return { value: Operand },
}

impl Instruction {
  pub fn assign(dest: impl Into<String>, rhs: Rvalue) -> Self {
    Self::Assign {
      dest: dest.into(),
      rhs,
    }
  }

  /// Destination written by this instruction, if any.
  pub fn dest(&self) -> Option<&str> {
    match self {
      Self::Assign { dest, .. } => Some(dest),
      _ => None,
    }
  }

  /// Operands read by this instruction.
  pub fn uses(&self) -> Vec<&Operand> {
    match self {
      Self::Assign { rhs, .. } => rhs.operands(),
      Self::Param { value } | Self::Print { value } | Self::Return { value } => vec![value],
      Self::IfFalseGoto { condition, .. } => vec![condition],
      Self::Label { .. } | Self::Goto { .. } => Vec::new(),
    }
  }

  /// Print and return are the instructions with effects visible outside the
  /// listing; optimizations never remove them.
  pub fn is_observable(&self) -> bool {
    matches!(self, Self::Print { .. } | Self::Return { .. })
  }
}

impl fmt::Display for Instruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Assign { dest, rhs } => write!(f, "{dest} = {rhs}"),
      Self::Param { value } => write!(f, "param {value}"),
      Self::Print { value } => write!(f, "print {value}"),
      Self::Label { label } => write!(f, "{label}:"),
      Self::Goto { target } => write!(f, "goto {target}"),
      Self::IfFalseGoto { condition, target } => write!(f, "if not {condition} goto {target}"),
      Self::Return { value } => write!(f, "return {value}"),
    }
  }
}

/// Render a listing one instruction per line.
pub fn listing(instructions: &[Instruction]) -> Vec<String> {
  instructions.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn prints_every_instruction_form() {
    let instructions = vec![
      Instruction::assign("x", Rvalue::Operand(Operand::Const(5))),
      Instruction::assign(
        "t0",
        Rvalue::Binary {
          left: Operand::name("i"),
          op: BinaryOp::Add,
          right: Operand::Const(1),
        },
      ),
      Instruction::Param {
        value: Operand::name("x"),
      },
      Instruction::assign(
        "t1",
        Rvalue::Call {
          callee: "f".into(),
          argc: 1,
        },
      ),
      Instruction::Print {
        value: Operand::name("t0"),
      },
      Instruction::Label { label: Label(1) },
      Instruction::Goto { target: Label(1) },
      Instruction::IfFalseGoto {
        condition: Operand::Const(5),
        target: Label(2),
      },
      Instruction::Return {
        value: Operand::Const(0),
      },
    ];
    assert_eq!(
      listing(&instructions),
      vec![
        "x = 5",
        "t0 = i + 1",
        "param x",
        "t1 = call f, 1",
        "print t0",
        "L1:",
        "goto L1",
        "if not 5 goto L2",
        "return 0",
      ]
    );
  }

  #[test]
  fn reports_uses_and_destinations() {
    let add = Instruction::assign(
      "t0",
      Rvalue::Binary {
        left: Operand::name("a"),
        op: BinaryOp::Mul,
        right: Operand::Const(2),
      },
    );
    assert_eq!(add.dest(), Some("t0"));
    assert_eq!(add.uses(), vec![&Operand::name("a"), &Operand::Const(2)]);
    assert!(!add.is_observable());
    assert!(Instruction::Goto { target: Label(3) }.uses().is_empty());
  }
}
