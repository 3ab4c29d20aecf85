//! Operand prototypes, function types, and instruction types.

use serde::{Deserialize, Serialize};

use crate::arena::Handle;
use crate::expr::Expression;
use crate::object::ObjectLink;
use crate::prim::AccessMode;
use crate::stmt::SubBlock;
use crate::types::DataTypeLink;

/// Link to an instruction type in the platform's instruction arena.
pub type InstructionTypeLink = Handle<InstructionType>;

/// Link to a function type in the platform's function registry.
pub type FunctionTypeLink = Handle<FunctionType>;

/// How and what kind of operand an instruction or function takes at one
/// prototype position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperandType {
    /// How the operand is accessed.
    pub mode: AccessMode,
    /// Required operand data type.
    pub data_type: DataTypeLink,
}

impl OperandType {
    /// Creates an operand type.
    pub fn new(mode: AccessMode, data_type: DataTypeLink) -> Self {
        Self { mode, data_type }
    }
}

/// A function prototype: name, operand types, and return type.
///
/// Function names follow the identifier grammar or start with `operator`
/// followed by an operator spelling, in which case the describer renders
/// calls in infix notation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionType {
    /// Name of the function.
    pub name: String,
    /// Prototype of the operand list.
    pub operand_types: Vec<OperandType>,
    /// Type of the returned value.
    pub return_type: DataTypeLink,
}

impl FunctionType {
    /// Creates a function type.
    pub fn new(
        name: impl Into<String>,
        operand_types: Vec<OperandType>,
        return_type: DataTypeLink,
    ) -> Self {
        Self {
            name: name.into(),
            operand_types,
            return_type,
        }
    }
}

/// A rule rewriting one instruction into an equivalent sub-program of
/// lower-level instructions. Only the most specialized instruction types
/// carry these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecompositionRule {
    /// Name of the rule, for diagnostics and pass predicates.
    pub name: String,
    /// Objects standing in for the instruction's operands inside the
    /// expansion.
    pub parameters: Vec<ObjectLink>,
    /// The replacement sub-program.
    pub expansion: SubBlock,
    /// Duration of the expansion in cycles.
    pub duration: u64,
}

/// An instruction prototype, possibly specialized for fixed operand values.
///
/// Instruction types form trees: the root is the fully generalized form,
/// and each child fixes the parent's first remaining operand to a concrete
/// template expression. A node at depth `d` therefore has `d` template
/// operands and the root's operand list minus its first `d` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionType {
    /// Name of the instruction.
    pub name: String,
    /// Name used when printing/parsing cQASM. Usually equals `name`.
    pub cqasm_name: String,
    /// Prototype of the remaining (non-template) operands.
    pub operand_types: Vec<OperandType>,
    /// Values of the operands specialized away, outermost first.
    pub template_operands: Vec<Expression>,
    /// Back-link to the parent in the specialization tree. `None` at the
    /// root.
    pub generalization: Option<InstructionTypeLink>,
    /// Children in the specialization tree.
    pub specializations: Vec<InstructionTypeLink>,
    /// Decomposition rules. Non-empty only on leaves.
    pub decompositions: Vec<DecompositionRule>,
    /// Duration in cycles.
    pub duration: u64,
}

impl InstructionType {
    /// Creates a fully generalized instruction type with no operands and
    /// zero duration. The cQASM name defaults to `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            cqasm_name: name.clone(),
            name,
            operand_types: vec![],
            template_operands: vec![],
            generalization: None,
            specializations: vec![],
            decompositions: vec![],
            duration: 0,
        }
    }

    /// Sets the cQASM name.
    #[must_use]
    pub fn with_cqasm_name(mut self, cqasm_name: impl Into<String>) -> Self {
        self.cqasm_name = cqasm_name.into();
        self
    }

    /// Sets the operand prototype.
    #[must_use]
    pub fn with_operand_types(mut self, operand_types: Vec<OperandType>) -> Self {
        self.operand_types = operand_types;
        self
    }

    /// Sets the duration in cycles.
    #[must_use]
    pub fn with_duration(mut self, duration: u64) -> Self {
        self.duration = duration;
        self
    }

    /// Adds a decomposition rule.
    #[must_use]
    pub fn with_decomposition(mut self, rule: DecompositionRule) -> Self {
        self.decompositions.push(rule);
        self
    }

    /// Whether this is a fully generalized (root) form: no template
    /// operands, no parent.
    pub fn is_generalized(&self) -> bool {
        self.template_operands.is_empty() && self.generalization.is_none()
    }

    /// Whether this node has no further specializations.
    pub fn is_leaf(&self) -> bool {
        self.specializations.is_empty()
    }
}
