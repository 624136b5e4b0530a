use minitac::tac::{Instruction, listing};
use minitac::{CompileError, Liveness, OptimizerConfig, compile};

const WHILE_IF_EXAMPLE: &str = r#"
class WhileIfExample {
    public static void main(String[] args) {
        int x;
        x = 5;
        System.out.println(x);
        if (5) {
            System.out.println(1);
        } else {
            System.out.println(0);
        }
        int i;
        i = 0;
        while (5) {
            System.out.println(i);
            i = i + 1;
        }
        return 0;
    }
}
"#;

fn wrap_main(body: &str) -> String {
  format!("class Main {{ public static void main(String[] args) {{ {body} }} }}")
}

fn unoptimized(body: &str) -> Vec<String> {
  let source = wrap_main(body);
  listing(&compile(&source, &OptimizerConfig::default()).unwrap().tac)
}

fn optimized(body: &str) -> Vec<String> {
  let source = wrap_main(body);
  listing(&compile(&source, &OptimizerConfig::default()).unwrap().optimized)
}

fn observable_count(instructions: &[Instruction]) -> usize {
  instructions.iter().filter(|instr| instr.is_observable()).count()
}

#[test]
fn literal_assignment_and_print() {
  assert_eq!(
    unoptimized("int x; x = 5; System.out.println(x);"),
    vec!["x = 5", "print x"]
  );
}

#[test]
fn constant_expression_is_folded() {
  assert_eq!(
    unoptimized("System.out.println(2 + 3);"),
    vec!["t0 = 2 + 3", "print t0"]
  );
  assert_eq!(
    optimized("System.out.println(2 + 3);"),
    vec!["t0 = 5", "print t0"]
  );
}

#[test]
fn if_else_lowering() {
  assert_eq!(
    unoptimized("if (5) { System.out.println(1); } else { System.out.println(0); }"),
    vec!["if not 5 goto L1", "print 1", "L1:", "print 0"]
  );
}

#[test]
fn while_lowering() {
  let lines = unoptimized("while (5) { System.out.println(i); i = i + 1; }");
  assert_eq!(
    lines,
    vec![
      "L1:",
      "if not 5 goto L2",
      "print i",
      "t0 = i + 1",
      "i = t0",
      "goto L1",
      "L2:",
    ]
  );
  assert_eq!(lines.iter().filter(|line| line.ends_with(':')).count(), 2);
  assert_eq!(lines.iter().filter(|line| line.starts_with("goto")).count(), 1);
}

#[test]
fn missing_closing_brace_is_a_syntax_error() {
  let source = "class Broken {\n  public static void main(String[] args) {\n    int x;\n    x = 1;\n";
  let err = compile(source, &OptimizerConfig::default()).unwrap_err();
  assert!(matches!(err, CompileError::Syntax { .. }));
  assert_eq!(
    err.message(),
    "Expected '}' to close method 'main', found 'EOF'"
  );
  assert_eq!(err.line(), 5);
}

#[test]
fn repeated_expression_is_shared() {
  let lines = optimized("x = a + b; y = a + b;");
  assert_eq!(lines, vec!["t0 = a + b", "x = t0", "t1 = t0", "y = t1"]);
}

#[test]
fn repeated_constant_is_shared_after_folding() {
  assert_eq!(
    optimized("System.out.println(2 + 3); System.out.println(2 + 3);"),
    vec!["t0 = 5", "print t0", "t1 = t0", "print t1"]
  );
}

#[test]
fn full_example_pipeline() {
  let compilation = compile(WHILE_IF_EXAMPLE, &OptimizerConfig::default()).unwrap();
  assert_eq!(
    listing(&compilation.tac),
    vec![
      "x = 5",
      "print x",
      "if not 5 goto L1",
      "print 1",
      "L1:",
      "print 0",
      "i = 0",
      "L2:",
      "if not 5 goto L3",
      "print i",
      "t0 = i + 1",
      "i = t0",
      "goto L2",
      "L3:",
      "return 0",
    ]
  );
  assert_eq!(
    listing(&compilation.optimized),
    vec![
      "x = 5",
      "print x",
      "if not 5 goto L1",
      "print 1",
      "L1:",
      "print 0",
      "i = 0",
      "L2:",
      "if not 5 goto L3",
      "print i",
      "t0 = i + 1",
      "i = t0",
      "if not 5 goto L3",
      "print i",
      "t0 = i + 1",
      "i = t0",
      "goto L2",
      "L3:",
      "return 0",
    ]
  );
}

#[test]
fn tokens_reproduce_source_without_comments_or_whitespace() {
  let source = "class A { // header\n /* body */ public int f() { return 1 + 2; } }";
  let compilation = compile(source, &OptimizerConfig::default()).unwrap();
  let joined: String = compilation.tokens.iter().map(|t| t.text.as_str()).collect();
  assert_eq!(joined, "classA{publicintf(){return1+2;}}");
}

#[test]
fn optimizer_never_removes_output_or_returns() {
  let body = "int a = 1 + 2; int b = a * 3; System.out.println(b);
              if (b < 10) { System.out.println(a + b); }
              System.out.println(a + b); return a + b;";
  for liveness in [Liveness::AssignedTargets, Liveness::UsedOperands] {
    let config = OptimizerConfig {
      liveness,
      ..OptimizerConfig::default()
    };
    let compilation = compile(&wrap_main(body), &config).unwrap();
    assert_eq!(
      observable_count(&compilation.tac),
      observable_count(&compilation.optimized)
    );
  }
}

#[test]
fn unrolling_only_adds_observable_instructions() {
  let source = wrap_main("while (i < 3) { System.out.println(i); i = i + 1; } return i;");
  let compilation = compile(&source, &OptimizerConfig::default()).unwrap();
  assert!(observable_count(&compilation.optimized) >= observable_count(&compilation.tac));
}

#[test]
fn compilation_is_deterministic() {
  let first = compile(WHILE_IF_EXAMPLE, &OptimizerConfig::default()).unwrap();
  let second = compile(WHILE_IF_EXAMPLE, &OptimizerConfig::default()).unwrap();
  assert_eq!(first.tac, second.tac);
  assert_eq!(first.optimized, second.optimized);
}

#[test]
fn use_based_liveness_drops_unread_assignments() {
  let source = wrap_main("x = f(1); y = 2 * 3; System.out.println(y);");
  let config = OptimizerConfig {
    liveness: Liveness::UsedOperands,
    ..OptimizerConfig::default()
  };
  let compilation = compile(&source, &config).unwrap();
  assert_eq!(
    listing(&compilation.optimized),
    vec!["param 1", "t0 = call f, 1", "t1 = 6", "y = t1", "print y"]
  );
}

#[test]
fn disabling_unrolling_keeps_loops_intact() {
  let source = wrap_main("while (n) { n = n - 1; }");
  let config = OptimizerConfig {
    max_unroll: 1,
    ..OptimizerConfig::default()
  };
  let compilation = compile(&source, &config).unwrap();
  assert_eq!(compilation.tac, compilation.optimized);
}

#[test]
fn lexical_errors_stop_the_pipeline() {
  let err = compile("class A { int x = 1 @ 2; }", &OptimizerConfig::default()).unwrap_err();
  assert!(matches!(err, CompileError::Lex { .. }));
  assert_eq!(err.token_index(), None);
}
