//! Lowering: flatten the parse tree into three-address code.
//!
//! Every method body of every class is lowered in declaration order into one
//! shared instruction list; there is no per-method framing. Expressions are
//! emitted post-order, so each compound expression is broken into
//! single-operator steps that write a fresh temporary.
//!
//! Labels come from one counter for the whole run, starting at `L1`, so nested
//! control flow can never produce two labels with the same name.

use crate::ast::{ClassDecl, Expression, Statement};
use crate::tac::{Instruction, Label, Operand, Rvalue};

/// Lower all method bodies into a single instruction list.
pub fn lower(classes: &[ClassDecl]) -> Vec<Instruction> {
  let mut lowerer = Lowerer::default();
  for class in classes {
    for method in &class.methods {
      log::debug!("lowering {}.{}", class.name, method.name);
      for stmt in &method.statements {
        lowerer.emit_stmt(stmt);
      }
    }
  }
  log::debug!(
    "lowered to {} instruction(s), {} temporaries, {} labels",
    lowerer.instructions.len(),
    lowerer.next_temp,
    lowerer.next_label - 1
  );
  lowerer.instructions
}

struct Lowerer {
  instructions: Vec<Instruction>,
  next_temp: usize,
  next_label: usize,
}

impl Default for Lowerer {
  fn default() -> Self {
    Self {
      instructions: Vec::new(),
      next_temp: 0,
      next_label: 1,
    }
  }
}

impl Lowerer {
  fn new_temp(&mut self) -> String {
    let name = format!("t{}", self.next_temp);
    self.next_temp += 1;
    name
  }

  fn new_label(&mut self) -> Label {
    let label = Label(self.next_label);
    self.next_label += 1;
    label
  }

  fn push(&mut self, instruction: Instruction) {
    self.instructions.push(instruction);
  }

  fn emit_stmt(&mut self, stmt: &Statement) {
    match stmt {
      Statement::VariableDeclaration { name, expr, .. } => {
        // A bare declaration reserves nothing at this level.
        if let Some(expr) = expr {
          let value = self.emit_expr(expr);
          self.push(Instruction::assign(name.clone(), Rvalue::Operand(value)));
        }
      }
      Statement::Assignment { target, expr } => {
        let value = self.emit_expr(expr);
        self.push(Instruction::assign(target.clone(), Rvalue::Operand(value)));
      }
      Statement::Print { expr } => {
        let value = self.emit_expr(expr);
        self.push(Instruction::Print { value });
      }
      Statement::If {
        condition,
        then_branch,
        else_branch,
      } => {
        let else_or_end = self.new_label();
        let condition = self.emit_expr(condition);
        self.push(Instruction::IfFalseGoto {
          condition,
          target: else_or_end,
        });
        self.emit_stmt(then_branch);
        self.push(Instruction::Label { label: else_or_end });
        if let Some(else_branch) = else_branch {
          self.emit_stmt(else_branch);
        }
      }
      Statement::While { condition, body } => {
        let start = self.new_label();
        let end = self.new_label();
        self.push(Instruction::Label { label: start });
        let condition = self.emit_expr(condition);
        self.push(Instruction::IfFalseGoto {
          condition,
          target: end,
        });
        self.emit_stmt(body);
        self.push(Instruction::Goto { target: start });
        self.push(Instruction::Label { label: end });
      }
      Statement::Return { expr } => {
        let value = self.emit_expr(expr);
        self.push(Instruction::Return { value });
      }
      Statement::Block { statements } => {
        for stmt in statements {
          self.emit_stmt(stmt);
        }
      }
    }
  }

  /// Emit the instructions computing `expr` and return the operand holding it.
  fn emit_expr(&mut self, expr: &Expression) -> Operand {
    match expr {
      Expression::IntLiteral(value) => Operand::Const(*value),
      Expression::Identifier(name) => Operand::Name(name.clone()),
      Expression::BinaryOp { left, op, right } => {
        let left = self.emit_expr(left);
        let right = self.emit_expr(right);
        let temp = self.new_temp();
        self.push(Instruction::assign(
          temp.clone(),
          Rvalue::Binary {
            left,
            op: *op,
            right,
          },
        ));
        Operand::Name(temp)
      }
      Expression::MethodCall { name, arguments } => {
        let values: Vec<Operand> = arguments.iter().map(|arg| self.emit_expr(arg)).collect();
        let argc = values.len();
        for value in values {
          self.push(Instruction::Param { value });
        }
        let temp = self.new_temp();
        self.push(Instruction::assign(
          temp.clone(),
          Rvalue::Call {
            callee: name.clone(),
            argc,
          },
        ));
        Operand::Name(temp)
      }
    }
  }
}
