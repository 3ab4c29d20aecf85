//! Rewrites references from one object to another.

use rustc_hash::FxHashMap;

use crate::expr::{Expression, Reference};
use crate::object::ObjectLink;
use crate::program::Program;
use crate::stmt::Statement;
use crate::visit::VisitorMut;

/// A visitor that retargets every reference according to an old-to-new
/// object mapping. Data types and indices are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ReferenceRemapper {
    map: FxHashMap<ObjectLink, ObjectLink>,
}

impl ReferenceRemapper {
    /// Creates a remapper from an old-to-new object mapping.
    pub fn new(map: FxHashMap<ObjectLink, ObjectLink>) -> Self {
        Self { map }
    }

    /// Remaps all references in a whole program.
    pub fn remap_program(&mut self, program: &mut Program) {
        for block in &mut program.blocks {
            self.visit_block(&mut block.statements);
        }
    }

    /// Remaps all references in a sequence of statements.
    pub fn remap_block(&mut self, statements: &mut [Statement]) {
        self.visit_block(statements);
    }

    /// Remaps all references in one statement.
    pub fn remap_statement(&mut self, statement: &mut Statement) {
        self.visit_statement(statement);
    }

    /// Remaps all references in one expression.
    pub fn remap_expression(&mut self, expression: &mut Expression) {
        self.visit_expression(expression);
    }
}

impl VisitorMut for ReferenceRemapper {
    fn visit_reference(&mut self, reference: &mut Reference) {
        if let Some(&target) = self.map.get(&reference.target) {
            reference.target = target;
        }
    }
}
