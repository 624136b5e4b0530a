//! Constant folding of arithmetic on integer literals.

use crate::ast::BinaryOp;
use crate::optimizer::Pass;
use crate::tac::{Instruction, Operand, Rvalue};

/// Constant folding: replaces arithmetic on two literals with its result.
pub struct ConstFold;

impl ConstFold {
  /// Evaluate `lhs op rhs` with integer semantics. `None` for relational
  /// operators, division by zero and overflow; those stay unfolded.
  pub fn evaluate(lhs: i64, op: BinaryOp, rhs: i64) -> Option<i64> {
    match op {
      BinaryOp::Add => lhs.checked_add(rhs),
      BinaryOp::Sub => lhs.checked_sub(rhs),
      BinaryOp::Mul => lhs.checked_mul(rhs),
      BinaryOp::Div => lhs.checked_div(rhs),
      _ => None,
    }
  }

  fn fold(rhs: &Rvalue) -> Option<i64> {
    let Rvalue::Binary { left, op, right } = rhs else {
      return None;
    };
    Self::evaluate(left.as_const()?, *op, right.as_const()?)
  }
}

impl Pass for ConstFold {
  fn name(&self) -> &'static str {
    "ConstFold"
  }

  fn run(&mut self, instructions: &mut Vec<Instruction>) -> bool {
    let mut changed = false;
    for instr in instructions.iter_mut() {
      if let Instruction::Assign { dest, rhs } = instr
        && let Some(value) = Self::fold(rhs)
      {
        log::trace!("folded {dest} = {rhs} to {value}");
        *rhs = Rvalue::Operand(Operand::Const(value));
        changed = true;
      }
    }
    changed
  }
}
