//! Crate root: wires together the compilation pipeline.
//!
//! The stages are small and run strictly one after another:
//! - `tokenizer` performs lexical analysis and produces a flat token stream.
//! - `parser` owns all syntactic knowledge and returns the class tree in `ast`.
//! - `lower` flattens method bodies into three-address code (`tac`).
//! - `optimizer` rewrites that code in place with four peephole passes.
//! - `error` centralises reporting utilities shared by the other modules.

pub mod ast;
pub mod error;
pub mod lower;
pub mod optimizer;
pub mod parser;
pub mod tac;
pub mod tokenizer;
pub mod ty;

pub use error::{CompileError, CompileResult};
pub use optimizer::{Liveness, OptimizerConfig};

use ast::ClassDecl;
use tac::Instruction;
use tokenizer::Token;

/// Every artifact produced by one run of the pipeline.
#[derive(Debug, Clone)]
pub struct Compilation {
  pub tokens: Vec<Token>,
  pub program: Vec<ClassDecl>,
  /// Instructions as lowered, before any optimization.
  pub tac: Vec<Instruction>,
  /// Instructions after the optimizer ran over a copy of `tac`.
  pub optimized: Vec<Instruction>,
}

/// Run the whole pipeline over a source string. Lowering only happens when
/// tokenizing and parsing both succeed.
pub fn compile(source: &str, config: &OptimizerConfig) -> CompileResult<Compilation> {
  let tokens = tokenizer::tokenize(source)?;
  log::debug!("tokenized {} token(s)", tokens.len());
  let program = parser::parse(tokens.clone(), source)?;
  let tac = lower::lower(&program);
  let mut optimized = tac.clone();
  optimizer::optimize(&mut optimized, config);
  Ok(Compilation {
    tokens,
    program,
    tac,
    optimized,
  })
}
