use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use minitac::optimizer::DEFAULT_MAX_UNROLL;
use minitac::tac::listing;
use minitac::{CompileError, Liveness, OptimizerConfig, compile};

/// Compile a MiniLang source file to three-address code, printing every stage.
#[derive(Debug, Parser)]
#[command(name = "minitac", version)]
struct Args {
  /// MiniLang source file.
  path: PathBuf,

  /// Copies of each loop body after unrolling (1 disables unrolling).
  #[arg(long, default_value_t = DEFAULT_MAX_UNROLL)]
  max_unroll: usize,

  /// Drop unread temporaries instead of keeping every assigned target.
  #[arg(long)]
  use_liveness: bool,

  /// Print the lowered code without running the optimizer.
  #[arg(long)]
  no_optimize: bool,
}

impl Args {
  fn optimizer_config(&self) -> OptimizerConfig {
    OptimizerConfig {
      max_unroll: self.max_unroll,
      liveness: if self.use_liveness {
        Liveness::UsedOperands
      } else {
        Liveness::AssignedTargets
      },
      enabled: !self.no_optimize,
    }
  }
}

fn main() {
  env_logger::init();
  let args = Args::parse();

  let source = match fs::read_to_string(&args.path) {
    Ok(source) => source,
    Err(err) => {
      eprintln!("File '{}' not found: {err}", args.path.display());
      process::exit(1);
    }
  };

  let compilation = match compile(&source, &args.optimizer_config()) {
    Ok(compilation) => compilation,
    Err(err) => {
      let kind = match &err {
        CompileError::Lex { .. } => "Lexical error",
        CompileError::Syntax { .. } => "Syntax error",
      };
      eprintln!("{kind}: {} at line {}", err.message(), err.line());
      eprintln!("{err}");
      process::exit(1);
    }
  };

  println!("LEXICAL ANALYSIS\n");
  println!("Tokens\n");
  for token in &compilation.tokens {
    println!("{token}");
  }

  println!("\n\nSYNTAX ANALYSIS\n");
  println!("Parse tree output");
  println!("{:#?}", compilation.program);

  println!("\n\nINTERMEDIATE CODE GENERATION\n");
  println!("TAC Instructions:");
  for line in listing(&compilation.tac) {
    println!("{line}");
  }

  if !args.no_optimize {
    println!("\n\nOPTIMIZED CODE\n");
    for line in listing(&compilation.optimized) {
      println!("{line}");
    }
  }
}
