//! Object-access analysis.
//!
//! Summarizes which references a statement or block touches and how, as the
//! input to data-dependency construction in a downstream scheduler. Reads
//! on the same reference commute; any pair of differing modes collapses to
//! a write, which commutes with nothing. Barrier-like statements write a
//! synthetic empty reference that every statement also reads, so statements
//! can shift around between barriers but never across one.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::expr::{Expression, Reference};
use crate::itype::OperandType;
use crate::object::ObjectLink;
use crate::platform::Platform;
use crate::prim::AccessMode;
use crate::stmt::{Instruction, Loop, SetInstruction, Statement};
use crate::types::DataTypeLink;

/// Value-comparable key identifying one accessed storage location: target
/// object, the type it is viewed as, and the literal element indices.
///
/// The default value (no target) is the synthetic reference used to model
/// barriers. Ordering is lexicographic over (target, data type, indices),
/// so analysis results iterate deterministically.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct AccessRef {
    /// The accessed object, or `None` for the synthetic barrier reference.
    pub target: Option<ObjectLink>,
    /// The type the storage is viewed as.
    pub data_type: Option<DataTypeLink>,
    /// Literal element indices.
    pub indices: Vec<i64>,
}

impl AccessRef {
    /// The synthetic empty reference modeling barriers.
    pub fn barrier() -> Self {
        Self::default()
    }

    /// Whether this is the synthetic barrier reference.
    pub fn is_barrier(&self) -> bool {
        self.target.is_none()
    }
}

impl From<&Reference> for AccessRef {
    fn from(reference: &Reference) -> Self {
        Self {
            target: Some(reference.target),
            data_type: Some(reference.data_type),
            indices: reference.indices.iter().map(|index| index.value).collect(),
        }
    }
}

/// The computed access summary: effective access mode per touched
/// reference.
pub type Accesses = BTreeMap<AccessRef, AccessMode>;

/// Accumulates object accesses over statements and blocks.
#[derive(Debug, Clone, Default)]
pub struct ObjectAccesses {
    /// When set, commutation modes on instructions with exactly one qubit
    /// operand are demoted to write.
    pub disable_single_qubit_commutation: bool,
    /// When set, commutation modes on instructions with two or more qubit
    /// operands are demoted to write.
    pub disable_multi_qubit_commutation: bool,
    accesses: Accesses,
}

impl ObjectAccesses {
    /// Creates an analysis with commutation enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// The accumulated accesses.
    pub fn get(&self) -> &Accesses {
        &self.accesses
    }

    /// Clears the accumulated accesses, allowing the analysis to be reused.
    pub fn reset(&mut self) {
        self.accesses.clear();
    }

    /// Records a single access.
    ///
    /// Literal mode is upgraded to read; it makes no sense to access an
    /// object in literal mode. Measure mode becomes a write to the qubit
    /// plus a write to the implicit measurement bit view of the same
    /// storage. When the reference was already accessed, equal modes are
    /// kept and differing modes collapse to write.
    pub fn add_access(
        &mut self,
        platform: &Platform,
        mode: AccessMode,
        reference: AccessRef,
    ) -> IrResult<()> {
        let mode = match mode {
            AccessMode::Literal => AccessMode::Read,
            AccessMode::Measure => {
                let bit_type = platform.implicit_bit_type.ok_or_else(|| {
                    IrError::InternalConsistency(
                        "measure access on a platform without an implicit bit type".into(),
                    )
                })?;
                let mut bit_view = reference.clone();
                bit_view.data_type = Some(bit_type);
                self.add_access(platform, AccessMode::Write, bit_view)?;
                AccessMode::Write
            }
            other => other,
        };
        match self.accesses.entry(reference) {
            Entry::Vacant(entry) => {
                entry.insert(mode);
            }
            Entry::Occupied(mut entry) => {
                if *entry.get() != mode {
                    *entry.get_mut() = AccessMode::Write;
                }
            }
        }
        Ok(())
    }

    /// Records accesses for everything used by an expression.
    pub fn add_expression(
        &mut self,
        platform: &Platform,
        mode: AccessMode,
        expression: &Expression,
    ) -> IrResult<()> {
        match expression {
            Expression::Literal(_) => Ok(()),
            Expression::Reference(reference) => {
                self.add_access(platform, mode, AccessRef::from(reference))
            }
            Expression::FunctionCall(call) => {
                let function_type = platform.function_type(call.function_type);
                self.add_operands(platform, &function_type.operand_types, &call.operands)
            }
        }
    }

    /// Records accesses for the operands of a function or instruction,
    /// applying each prototype position's access mode to the corresponding
    /// operand.
    pub fn add_operands(
        &mut self,
        platform: &Platform,
        prototype: &[OperandType],
        operands: &[Expression],
    ) -> IrResult<()> {
        if prototype.len() != operands.len() {
            return Err(IrError::InternalConsistency(format!(
                "operand count {} does not match prototype size {}",
                operands.len(),
                prototype.len(),
            )));
        }
        let num_qubits = prototype
            .iter()
            .filter(|operand| platform.data_type(operand.data_type).is_qubit())
            .count();
        let disable_commutation = (num_qubits == 1 && self.disable_single_qubit_commutation)
            || (num_qubits > 1 && self.disable_multi_qubit_commutation);
        for (operand_type, operand) in prototype.iter().zip(operands) {
            let mut mode = operand_type.mode;
            if disable_commutation && mode.is_commute() {
                mode = AccessMode::Write;
            }
            self.add_expression(platform, mode, operand)?;
        }
        Ok(())
    }

    /// Records accesses for a complete statement, including the trailing
    /// synthetic barrier access: write for barrier-like statements, read
    /// otherwise.
    pub fn add_statement(&mut self, platform: &Platform, statement: &Statement) -> IrResult<()> {
        let mut barrier = false;
        match statement {
            Statement::Instruction(instruction) => match instruction {
                Instruction::Custom(custom) => {
                    self.add_expression(platform, AccessMode::Read, &custom.condition)?;
                    let instruction_type = platform.instruction_type(custom.instruction_type);
                    self.add_operands(
                        platform,
                        &instruction_type.operand_types,
                        &custom.operands,
                    )?;
                    // Template operands were specialized away, but their
                    // accesses remain; their modes come from the root
                    // generalization's full prototype.
                    if !instruction_type.template_operands.is_empty() {
                        let root = platform
                            .instruction_type(platform.root_generalization(custom.instruction_type));
                        for (i, template) in instruction_type.template_operands.iter().enumerate() {
                            let Some(operand_type) = root.operand_types.get(i) else {
                                return Err(IrError::InternalConsistency(
                                    "specialization has more template operands than its root \
                                     generalization has operand types"
                                        .into(),
                                ));
                            };
                            self.add_expression(platform, operand_type.mode, template)?;
                        }
                    }
                }
                Instruction::Set(set) => {
                    self.add_set(platform, set)?;
                }
                Instruction::Goto(goto) => {
                    self.add_expression(platform, AccessMode::Read, &goto.condition)?;
                    barrier = true;
                }
                Instruction::Wait(wait) => {
                    if wait.objects.is_empty() {
                        barrier = true;
                    } else {
                        // Writes, so nothing may be reordered with the wait.
                        for reference in &wait.objects {
                            self.add_access(
                                platform,
                                AccessMode::Write,
                                AccessRef::from(reference),
                            )?;
                        }
                    }
                }
                Instruction::Source { .. }
                | Instruction::Sink { .. }
                | Instruction::Dummy { .. } => {
                    barrier = true;
                }
            },
            Statement::IfElse(if_else) => {
                for branch in &if_else.branches {
                    self.add_expression(platform, AccessMode::Read, &branch.condition)?;
                    self.add_block(platform, &branch.body.statements)?;
                }
                if let Some(otherwise) = &if_else.otherwise {
                    self.add_block(platform, &otherwise.statements)?;
                }
            }
            Statement::Loop(looping) => {
                self.add_block(platform, &looping.body().statements)?;
                match looping {
                    Loop::Static(l) => {
                        self.add_access(platform, AccessMode::Write, AccessRef::from(&l.lhs))?;
                    }
                    Loop::For(l) => {
                        self.add_expression(platform, AccessMode::Read, &l.condition)?;
                        if let Some(initialize) = &l.initialize {
                            self.add_set(platform, initialize)?;
                        }
                        if let Some(update) = &l.update {
                            self.add_set(platform, update)?;
                        }
                    }
                    Loop::RepeatUntil(l) => {
                        self.add_expression(platform, AccessMode::Read, &l.condition)?;
                    }
                }
            }
            Statement::LoopControl(_) => {
                barrier = true;
            }
        }

        // Statements can shift around between barriers (read accesses
        // commute), but they cannot cross one, and barriers themselves
        // cannot commute.
        let mode = if barrier {
            AccessMode::Write
        } else {
            AccessMode::Read
        };
        self.add_access(platform, mode, AccessRef::barrier())
    }

    /// Records accesses for a whole (sub)block of statements.
    pub fn add_block(&mut self, platform: &Platform, statements: &[Statement]) -> IrResult<()> {
        for statement in statements {
            self.add_statement(platform, statement)?;
        }
        Ok(())
    }

    fn add_set(&mut self, platform: &Platform, set: &SetInstruction) -> IrResult<()> {
        self.add_expression(platform, AccessMode::Read, &set.condition)?;
        self.add_access(platform, AccessMode::Write, AccessRef::from(&set.lhs))?;
        self.add_expression(platform, AccessMode::Read, &set.rhs)
    }
}
