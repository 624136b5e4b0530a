//! Peephole optimizer over the flat instruction list.
//!
//! Four passes run in a fixed order, each one seeing the complete output of
//! the previous: constant folding, dead-code elimination, common-subexpression
//! elimination and loop unrolling. A pass that finds nothing to rewrite leaves
//! the list untouched; none of them can fail.

mod const_fold;
mod cse;
mod dead_code;
mod unroll;

pub use const_fold::ConstFold;
pub use cse::CommonSubexpr;
pub use dead_code::{DeadCode, Liveness};
pub use unroll::LoopUnroll;

use crate::tac::Instruction;

/// Default number of body copies a loop ends up with after unrolling.
pub const DEFAULT_MAX_UNROLL: usize = 2;

/// Knobs for the optimization pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizerConfig {
  /// Copies of each loop body after unrolling; `0` and `1` disable the pass.
  pub max_unroll: usize,
  /// Which assignments dead-code elimination keeps.
  pub liveness: Liveness,
  /// When false, `optimize` returns without touching the list.
  pub enabled: bool,
}

impl Default for OptimizerConfig {
  fn default() -> Self {
    Self {
      max_unroll: DEFAULT_MAX_UNROLL,
      liveness: Liveness::AssignedTargets,
      enabled: true,
    }
  }
}

/// A rewrite over the instruction list.
pub trait Pass {
  /// Name of the pass for logging.
  fn name(&self) -> &'static str;
  /// Rewrite `instructions` in place, returning whether anything changed.
  fn run(&mut self, instructions: &mut Vec<Instruction>) -> bool;
}

/// Runs a sequence of passes in registration order.
pub struct PassManager {
  passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
  pub fn new() -> Self {
    Self { passes: Vec::new() }
  }

  /// The four standard passes in their fixed order.
  pub fn with_config(config: &OptimizerConfig) -> Self {
    let mut manager = Self::new();
    manager.add_pass(ConstFold);
    manager.add_pass(DeadCode::new(config.liveness));
    manager.add_pass(CommonSubexpr);
    manager.add_pass(LoopUnroll::new(config.max_unroll));
    manager
  }

  pub fn add_pass<P: Pass + 'static>(&mut self, pass: P) {
    self.passes.push(Box::new(pass));
  }

  /// Run every pass once, in order.
  pub fn run_all(&mut self, instructions: &mut Vec<Instruction>) {
    for pass in &mut self.passes {
      log::info!("Running pass: {}", pass.name());
      if !pass.run(instructions) {
        log::debug!("{}: nothing to rewrite", pass.name());
      }
    }
  }

  pub fn count(&self) -> usize {
    self.passes.len()
  }
}

impl Default for PassManager {
  fn default() -> Self {
    Self::new()
  }
}

/// Run the standard pipeline over `instructions`.
pub fn optimize(instructions: &mut Vec<Instruction>, config: &OptimizerConfig) {
  if !config.enabled {
    log::debug!("optimizer disabled");
    return;
  }
  PassManager::with_config(config).run_all(instructions);
}
