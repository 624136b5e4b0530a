//! Common-subexpression elimination over straight-line runs of the listing.

use std::collections::HashMap;

use crate::optimizer::Pass;
use crate::tac::{Instruction, Operand, Rvalue};

/// Common-subexpression elimination.
///
/// A single forward scan remembers, for each right-hand side, the first
/// destination that computed it. A later identical right-hand side is replaced
/// by a copy of that destination; the first computation stays put and later
/// readers of the redundant destination are left as they are. Plain copies and
/// folded constants count as right-hand sides too, so two `t = 5` collapse.
///
/// A remembered right-hand side is forgotten as soon as one of its operands or
/// its destination is reassigned, and everything is forgotten at a label, since
/// control may arrive there from elsewhere. Calls are never remembered.
pub struct CommonSubexpr;

impl CommonSubexpr {
  fn invalidate(available: &mut HashMap<Rvalue, String>, written: &str) {
    available.retain(|rhs, holder| holder.as_str() != written && !reads(rhs, written));
  }
}

impl Pass for CommonSubexpr {
  fn name(&self) -> &'static str {
    "CommonSubexpr"
  }

  fn run(&mut self, instructions: &mut Vec<Instruction>) -> bool {
    let mut available: HashMap<Rvalue, String> = HashMap::new();
    let mut changed = false;

    for instr in instructions.iter_mut() {
      match instr {
        Instruction::Label { .. } => available.clear(),
        Instruction::Assign { dest, rhs } => {
          let key = (!matches!(rhs, Rvalue::Call { .. })).then(|| rhs.clone());
          let mut reused = false;

          if let Some(key) = &key
            && let Some(holder) = available.get(key)
          {
            log::trace!("{dest} = {rhs} reuses {holder}");
            *rhs = Rvalue::Operand(Operand::Name(holder.clone()));
            changed = true;
            reused = true;
          }

          Self::invalidate(&mut available, dest);

          // `t = t + 1` does not leave `t + 1` available in `t`.
          if !reused
            && let Some(key) = key
            && !reads(&key, dest)
          {
            available.insert(key, dest.clone());
          }
        }
        _ => {}
      }
    }

    changed
  }
}

fn reads(rhs: &Rvalue, name: &str) -> bool {
  rhs
    .operands()
    .iter()
    .any(|operand| operand.as_name() == Some(name))
}
