//! Structural loop unrolling: backward-goto loops get extra body copies.

use std::collections::HashMap;

use crate::optimizer::{DEFAULT_MAX_UNROLL, Pass};
use crate::tac::{Instruction, Label};

/// Loop unrolling by structural duplication.
///
/// A loop is a backward `goto L` whose `L:` appears earlier in the list; the
/// instructions between the two are its body. `max_unroll - 1` extra copies of
/// the body are inserted right after the label. Every copy keeps the loop's
/// exit test, so control still leaves through the original exit label, but no
/// trip-count analysis happens. Labels defined inside the body are renamed in
/// each copy so that every label stays unique.
pub struct LoopUnroll {
  max_unroll: usize,
}

impl LoopUnroll {
  pub fn new(max_unroll: usize) -> Self {
    Self { max_unroll }
  }

  /// One copy of `body` whose locally defined labels are replaced by fresh ones.
  fn relabel(body: &[Instruction], next_label: &mut usize) -> Vec<Instruction> {
    let mut renamed: HashMap<Label, Label> = HashMap::new();
    for instr in body {
      if let Instruction::Label { label } = instr {
        renamed.insert(*label, Label(*next_label));
        *next_label += 1;
      }
    }

    let rename = |label: &Label| renamed.get(label).copied().unwrap_or(*label);
    body
      .iter()
      .map(|instr| match instr {
        Instruction::Label { label } => Instruction::Label {
          label: rename(label),
        },
        Instruction::Goto { target } => Instruction::Goto {
          target: rename(target),
        },
        Instruction::IfFalseGoto { condition, target } => Instruction::IfFalseGoto {
          condition: condition.clone(),
          target: rename(target),
        },
        other => other.clone(),
      })
      .collect()
  }
}

impl Default for LoopUnroll {
  fn default() -> Self {
    Self::new(DEFAULT_MAX_UNROLL)
  }
}

impl Pass for LoopUnroll {
  fn name(&self) -> &'static str {
    "LoopUnroll"
  }

  fn run(&mut self, instructions: &mut Vec<Instruction>) -> bool {
    if self.max_unroll <= 1 {
      return false;
    }

    let mut next_label = instructions
      .iter()
      .filter_map(|instr| match instr {
        Instruction::Label { label } => Some(label.0),
        Instruction::Goto { target } | Instruction::IfFalseGoto { target, .. } => Some(target.0),
        _ => None,
      })
      .max()
      .map_or(1, |max| max + 1);

    let mut changed = false;
    let mut i = 0;
    while i < instructions.len() {
      if let Instruction::Goto { target } = instructions[i]
        && let Some(start) = instructions[..i]
          .iter()
          .position(|instr| matches!(instr, Instruction::Label { label } if *label == target))
      {
        let body = instructions[start + 1..i].to_vec();
        let mut copies = Vec::with_capacity(body.len() * (self.max_unroll - 1));
        for _ in 1..self.max_unroll {
          copies.extend(Self::relabel(&body, &mut next_label));
        }

        if !copies.is_empty() {
          log::trace!(
            "unrolled loop at {target}: {} instruction(s) x{}",
            body.len(),
            self.max_unroll
          );
          let inserted = copies.len();
          instructions.splice(start + 1..start + 1, copies);
          i += inserted;
          changed = true;
        }
      }
      i += 1;
    }

    changed
  }
}
