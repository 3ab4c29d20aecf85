//! Statement nodes and structured control flow.

use serde::{Deserialize, Serialize};

use crate::expr::{Expression, IntLiteral, Reference};
use crate::itype::InstructionTypeLink;

/// An anonymous sequence of statements, as owned by structured control-flow
/// constructs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubBlock {
    /// The statements, in program order.
    pub statements: Vec<Statement>,
}

impl SubBlock {
    /// Creates an empty sub-block.
    pub fn new() -> Self {
        Self::default()
    }
}

impl From<Vec<Statement>> for SubBlock {
    fn from(statements: Vec<Statement>) -> Self {
        Self { statements }
    }
}

/// A platform-defined instruction instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomInstruction {
    /// The resolved (most specialized) instruction type.
    pub instruction_type: InstructionTypeLink,
    /// Actual operands for the type's remaining operand prototype.
    pub operands: Vec<Expression>,
    /// Execution condition. A `true` bit literal when unconditional.
    pub condition: Expression,
    /// Cycle the instruction is scheduled in. Zero before scheduling.
    pub cycle: u64,
}

/// An assignment of a classical value to a classical reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetInstruction {
    /// Assignment target. Always classical.
    pub lhs: Reference,
    /// Assigned value; same data type as `lhs`.
    pub rhs: Expression,
    /// Execution condition. A `true` bit literal when unconditional.
    pub condition: Expression,
    /// Cycle the instruction is scheduled in. Zero before scheduling.
    pub cycle: u64,
}

/// A wait. With an empty object list this is a full barrier: it waits on
/// everything and nothing may be reordered across it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitInstruction {
    /// Duration in cycles. Zero for pure barriers.
    pub duration: u64,
    /// The references being waited on. Empty means all objects.
    pub objects: Vec<Reference>,
    /// Cycle the instruction is scheduled in. Zero before scheduling.
    pub cycle: u64,
}

impl WaitInstruction {
    /// Whether this waits on everything.
    pub fn is_full_barrier(&self) -> bool {
        self.objects.is_empty()
    }
}

/// An unstructured jump to another block of the program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GotoInstruction {
    /// Index of the target block in the owning program.
    pub target: usize,
    /// Execution condition. A `true` bit literal when unconditional.
    pub condition: Expression,
    /// Cycle the instruction is scheduled in. Zero before scheduling.
    pub cycle: u64,
}

/// An instruction statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// A platform-defined instruction.
    Custom(CustomInstruction),
    /// A classical assignment.
    Set(SetInstruction),
    /// A wait or barrier.
    Wait(WaitInstruction),
    /// An unstructured jump.
    Goto(GotoInstruction),
    /// Scheduling sentinel at the start of a block.
    Source {
        /// Cycle the sentinel is scheduled in.
        cycle: u64,
    },
    /// Scheduling sentinel at the end of a block.
    Sink {
        /// Cycle the sentinel is scheduled in.
        cycle: u64,
    },
    /// A no-op placeholder that still acts as a barrier.
    Dummy {
        /// Cycle the placeholder is scheduled in.
        cycle: u64,
    },
}

impl Instruction {
    /// The cycle this instruction is scheduled in.
    pub fn cycle(&self) -> u64 {
        match self {
            Instruction::Custom(i) => i.cycle,
            Instruction::Set(i) => i.cycle,
            Instruction::Wait(i) => i.cycle,
            Instruction::Goto(i) => i.cycle,
            Instruction::Source { cycle }
            | Instruction::Sink { cycle }
            | Instruction::Dummy { cycle } => *cycle,
        }
    }

    /// Sets the scheduled cycle.
    pub fn set_cycle(&mut self, new_cycle: u64) {
        match self {
            Instruction::Custom(i) => i.cycle = new_cycle,
            Instruction::Set(i) => i.cycle = new_cycle,
            Instruction::Wait(i) => i.cycle = new_cycle,
            Instruction::Goto(i) => i.cycle = new_cycle,
            Instruction::Source { cycle }
            | Instruction::Sink { cycle }
            | Instruction::Dummy { cycle } => *cycle = new_cycle,
        }
    }

    /// The execution condition, for instruction kinds that can be
    /// conditional.
    pub fn condition(&self) -> Option<&Expression> {
        match self {
            Instruction::Custom(i) => Some(&i.condition),
            Instruction::Set(i) => Some(&i.condition),
            Instruction::Goto(i) => Some(&i.condition),
            Instruction::Wait(_)
            | Instruction::Source { .. }
            | Instruction::Sink { .. }
            | Instruction::Dummy { .. } => None,
        }
    }

    /// The contained custom instruction, if any.
    pub fn as_custom(&self) -> Option<&CustomInstruction> {
        match self {
            Instruction::Custom(i) => Some(i),
            _ => None,
        }
    }

    /// The contained wait instruction, if any.
    pub fn as_wait(&self) -> Option<&WaitInstruction> {
        match self {
            Instruction::Wait(i) => Some(i),
            _ => None,
        }
    }
}

/// One `(condition, body)` branch of an if-else chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfElseBranch {
    /// Branch condition; bit-typed.
    pub condition: Expression,
    /// Statements executed when the condition holds.
    pub body: SubBlock,
}

/// A chain of conditional branches with an optional else body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfElse {
    /// The branches, tried in order.
    pub branches: Vec<IfElseBranch>,
    /// Statements executed when no branch condition holds.
    pub otherwise: Option<SubBlock>,
}

/// A loop with an iteration count known at compile time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticLoop {
    /// The loop variable, written each iteration.
    pub lhs: Reference,
    /// First value of the loop variable.
    pub frm: IntLiteral,
    /// Last value of the loop variable, inclusive.
    pub to: IntLiteral,
    /// The loop body.
    pub body: SubBlock,
}

/// A classic for loop evaluated at run time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForLoop {
    /// Assignment executed once before the first iteration.
    pub initialize: Option<Box<SetInstruction>>,
    /// Loop condition, checked before each iteration; bit-typed.
    pub condition: Expression,
    /// Assignment executed after each iteration.
    pub update: Option<Box<SetInstruction>>,
    /// The loop body.
    pub body: SubBlock,
}

/// A repeat-until loop; the body runs at least once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatUntilLoop {
    /// Termination condition, checked after each iteration; bit-typed.
    pub condition: Expression,
    /// The loop body.
    pub body: SubBlock,
}

/// A structured loop statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Loop {
    /// Compile-time iteration count.
    Static(StaticLoop),
    /// Run-time for loop.
    For(ForLoop),
    /// Run-time repeat-until loop.
    RepeatUntil(RepeatUntilLoop),
}

impl Loop {
    /// The loop body.
    pub fn body(&self) -> &SubBlock {
        match self {
            Loop::Static(l) => &l.body,
            Loop::For(l) => &l.body,
            Loop::RepeatUntil(l) => &l.body,
        }
    }

    /// The loop body, mutably.
    pub fn body_mut(&mut self) -> &mut SubBlock {
        match self {
            Loop::Static(l) => &mut l.body,
            Loop::For(l) => &mut l.body,
            Loop::RepeatUntil(l) => &mut l.body,
        }
    }
}

/// Escapes from the innermost enclosing loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopControl {
    /// Terminate the loop.
    Break,
    /// Skip to the next iteration.
    Continue,
}

/// Any statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// An instruction.
    Instruction(Instruction),
    /// Structured conditional execution.
    IfElse(IfElse),
    /// A structured loop.
    Loop(Loop),
    /// Break or continue.
    LoopControl(LoopControl),
}

impl Statement {
    /// The contained instruction, if this is one.
    pub fn as_instruction(&self) -> Option<&Instruction> {
        match self {
            Statement::Instruction(i) => Some(i),
            _ => None,
        }
    }
}

impl From<Instruction> for Statement {
    fn from(instruction: Instruction) -> Self {
        Statement::Instruction(instruction)
    }
}
