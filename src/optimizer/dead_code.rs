//! Dead-code elimination: drops assignments nothing needs, in one of two modes.

use std::collections::HashSet;

use crate::optimizer::Pass;
use crate::tac::{Instruction, Operand, Rvalue};

/// How dead-code elimination decides that an assignment is worth keeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Liveness {
  /// Keep an assignment when its destination receives a non-trivial
  /// assignment anywhere in the list. Every lowered assignment qualifies, so
  /// this mode only ever drops assignments to names that are never given a
  /// real value.
  #[default]
  AssignedTargets,
  /// Drop assignments whose destination no instruction reads, repeating until
  /// nothing more can go. Calls are always kept.
  UsedOperands,
}

/// Dead-code elimination.
pub struct DeadCode {
  liveness: Liveness,
}

impl DeadCode {
  pub fn new(liveness: Liveness) -> Self {
    Self { liveness }
  }

  fn retain_assigned_targets(instructions: &mut Vec<Instruction>) -> bool {
    let assigned: HashSet<String> = instructions
      .iter()
      .filter_map(|instr| match instr {
        Instruction::Assign { dest, rhs } if !is_trivial(rhs) => Some(dest.clone()),
        _ => None,
      })
      .collect();

    let before = instructions.len();
    instructions.retain(|instr| instr.dest().is_none_or(|dest| assigned.contains(dest)));
    instructions.len() != before
  }

  fn retain_read_destinations(instructions: &mut Vec<Instruction>) -> bool {
    let mut changed = false;
    loop {
      let used: HashSet<String> = instructions
        .iter()
        .flat_map(Instruction::uses)
        .filter_map(|operand| operand.as_name().map(str::to_string))
        .collect();

      let before = instructions.len();
      instructions.retain(|instr| match instr {
        Instruction::Assign {
          rhs: Rvalue::Call { .. },
          ..
        } => true,
        _ => instr.dest().is_none_or(|dest| used.contains(dest)),
      });
      if instructions.len() == before {
        return changed;
      }
      changed = true;
    }
  }
}

impl Pass for DeadCode {
  fn name(&self) -> &'static str {
    "DeadCode"
  }

  fn run(&mut self, instructions: &mut Vec<Instruction>) -> bool {
    match self.liveness {
      Liveness::AssignedTargets => Self::retain_assigned_targets(instructions),
      Liveness::UsedOperands => Self::retain_read_destinations(instructions),
    }
  }
}

/// A right-hand side carrying no value: an empty name.
fn is_trivial(rhs: &Rvalue) -> bool {
  matches!(rhs, Rvalue::Operand(Operand::Name(name)) if name.is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ast::BinaryOp;
  use crate::tac::listing;

  fn add(dest: &str, left: &str, right: i64) -> Instruction {
    Instruction::assign(
      dest,
      Rvalue::Binary {
        left: Operand::name(left),
        op: BinaryOp::Add,
        right: Operand::Const(right),
      },
    )
  }

  #[test]
  fn assigned_targets_keeps_every_real_assignment() {
    let mut instructions = vec![
      add("t0", "a", 1),
      add("t1", "b", 2),
      Instruction::Print {
        value: Operand::name("t1"),
      },
    ];
    let before = instructions.clone();
    assert!(!DeadCode::new(Liveness::AssignedTargets).run(&mut instructions));
    assert_eq!(instructions, before);
  }

  #[test]
  fn assigned_targets_drops_names_without_a_value() {
    let mut instructions = vec![
      Instruction::assign("x", Rvalue::Operand(Operand::name(""))),
      Instruction::assign("y", Rvalue::Operand(Operand::name(""))),
      Instruction::assign("y", Rvalue::Operand(Operand::Const(1))),
      Instruction::Print {
        value: Operand::name("y"),
      },
    ];
    assert!(DeadCode::new(Liveness::AssignedTargets).run(&mut instructions));
    assert_eq!(listing(&instructions), vec!["y = ", "y = 1", "print y"]);
  }

  #[test]
  fn used_operands_removes_unread_assignment_chains() {
    let mut instructions = vec![
      add("t0", "a", 1),
      add("t1", "t0", 2),
      add("t2", "b", 3),
      Instruction::assign("x", Rvalue::Operand(Operand::name("t2"))),
      Instruction::assign(
        "t3",
        Rvalue::Call {
          callee: "f".into(),
          argc: 0,
        },
      ),
      Instruction::Return {
        value: Operand::Const(0),
      },
    ];
    assert!(DeadCode::new(Liveness::UsedOperands).run(&mut instructions));
    assert_eq!(
      listing(&instructions),
      vec!["t3 = call f, 0", "return 0"]
    );
  }
}
