//! Mutable tagged-variant traversal of program trees.
//!
//! `VisitorMut` implementations override the hooks they care about; the
//! default methods defer to the `walk_*` functions, which recurse into
//! child nodes in program order.

use crate::expr::{Expression, Reference};
use crate::stmt::{Instruction, Loop, SetInstruction, Statement};

/// A mutable visitor over statements and expressions.
pub trait VisitorMut {
    /// Visits every statement of a block.
    fn visit_block(&mut self, statements: &mut [Statement]) {
        walk_block(self, statements);
    }

    /// Visits one statement.
    fn visit_statement(&mut self, statement: &mut Statement) {
        walk_statement(self, statement);
    }

    /// Visits one instruction.
    fn visit_instruction(&mut self, instruction: &mut Instruction) {
        walk_instruction(self, instruction);
    }

    /// Visits one expression.
    fn visit_expression(&mut self, expression: &mut Expression) {
        walk_expression(self, expression);
    }

    /// Visits one reference. Does not recurse by default; indices are
    /// literals.
    fn visit_reference(&mut self, _reference: &mut Reference) {}
}

/// Recurses into every statement of a block.
pub fn walk_block<V: VisitorMut + ?Sized>(visitor: &mut V, statements: &mut [Statement]) {
    for statement in statements {
        visitor.visit_statement(statement);
    }
}

/// Recurses into the children of a statement.
pub fn walk_statement<V: VisitorMut + ?Sized>(visitor: &mut V, statement: &mut Statement) {
    match statement {
        Statement::Instruction(instruction) => visitor.visit_instruction(instruction),
        Statement::IfElse(if_else) => {
            for branch in &mut if_else.branches {
                visitor.visit_expression(&mut branch.condition);
                visitor.visit_block(&mut branch.body.statements);
            }
            if let Some(otherwise) = &mut if_else.otherwise {
                visitor.visit_block(&mut otherwise.statements);
            }
        }
        Statement::Loop(looping) => match looping {
            Loop::Static(l) => {
                visitor.visit_reference(&mut l.lhs);
                visitor.visit_block(&mut l.body.statements);
            }
            Loop::For(l) => {
                if let Some(initialize) = &mut l.initialize {
                    walk_set(visitor, initialize);
                }
                visitor.visit_expression(&mut l.condition);
                if let Some(update) = &mut l.update {
                    walk_set(visitor, update);
                }
                visitor.visit_block(&mut l.body.statements);
            }
            Loop::RepeatUntil(l) => {
                visitor.visit_expression(&mut l.condition);
                visitor.visit_block(&mut l.body.statements);
            }
        },
        Statement::LoopControl(_) => {}
    }
}

/// Recurses into the children of an instruction.
pub fn walk_instruction<V: VisitorMut + ?Sized>(visitor: &mut V, instruction: &mut Instruction) {
    match instruction {
        Instruction::Custom(custom) => {
            visitor.visit_expression(&mut custom.condition);
            for operand in &mut custom.operands {
                visitor.visit_expression(operand);
            }
        }
        Instruction::Set(set) => walk_set(visitor, set),
        Instruction::Wait(wait) => {
            for reference in &mut wait.objects {
                visitor.visit_reference(reference);
            }
        }
        Instruction::Goto(goto) => visitor.visit_expression(&mut goto.condition),
        Instruction::Source { .. } | Instruction::Sink { .. } | Instruction::Dummy { .. } => {}
    }
}

/// Recurses into the children of a set instruction.
pub fn walk_set<V: VisitorMut + ?Sized>(visitor: &mut V, set: &mut SetInstruction) {
    visitor.visit_expression(&mut set.condition);
    visitor.visit_reference(&mut set.lhs);
    visitor.visit_expression(&mut set.rhs);
}

/// Recurses into the children of an expression.
pub fn walk_expression<V: VisitorMut + ?Sized>(visitor: &mut V, expression: &mut Expression) {
    match expression {
        Expression::Literal(_) => {}
        Expression::Reference(reference) => visitor.visit_reference(reference),
        Expression::FunctionCall(call) => {
            for operand in &mut call.operands {
                visitor.visit_expression(operand);
            }
        }
    }
}
