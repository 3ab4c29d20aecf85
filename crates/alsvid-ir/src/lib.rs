//! Alsvid Program Intermediate Representation
//!
//! This crate provides the typed in-memory form of quantum programs that
//! every Alsvid analysis, scheduling, and code-generation pass operates on,
//! together with the platform model declaring which data types, registers,
//! functions, and instructions are legal on a target.
//!
//! # Overview
//!
//! A program is a tree rooted at [`Ir`], which owns a [`Platform`] and a
//! [`Program`]. The platform's registries are name-sorted and append-only;
//! everything else links to their entries through lightweight typed
//! [`Handle`]s. Statements are built through the checked `make_*` builders,
//! which validate names, arities, types, and literal ranges, and resolve
//! instructions to their most specialized form.
//!
//! # Core Components
//!
//! - **Platform registries**: [`Platform`] with [`DataType`], [`Object`],
//!   [`FunctionType`], and [`InstructionType`] entries
//! - **Specialization trees**: instruction types specialized over fixed
//!   template operand values, grown by [`Platform::add_instruction_type`]
//! - **Statement builders**: [`Ir::make_instruction`] and friends
//! - **Access analysis**: [`ObjectAccesses`] summarizing which references a
//!   statement touches and how, for data-dependency construction
//! - **Remapping**: [`ReferenceRemapper`] retargeting references
//! - **Description**: the [`Describe`] trait rendering any node on one line
//!
//! # Example: Building and Describing an Instruction
//!
//! ```rust
//! use alsvid_ir::gates::register_default_gates;
//! use alsvid_ir::{DataType, Describe, Ir, Object, Platform};
//!
//! let mut platform = Platform::new("example");
//! let qubit = platform.add_data_type(DataType::qubit("qubit"))?;
//! let bit = platform.add_data_type(DataType::bit("bit"))?;
//! let int = platform.add_data_type(DataType::int("int", 64, true))?;
//! platform.add_data_type(DataType::real("real"))?;
//!
//! let qubits = platform.add_physical_object(Object::physical("qubits", qubit, vec![3]))?;
//! platform.qubits = Some(qubits);
//! platform.implicit_bit_type = Some(bit);
//! platform.default_int_type = Some(int);
//! platform.default_bit_type = Some(bit);
//! register_default_gates(&mut platform)?;
//!
//! let mut ir = Ir::new(platform);
//! let q0 = ir.make_qubit_ref(0)?;
//! let h = ir.make_instruction("h", vec![q0.into()], None)?;
//! assert_eq!(h.describe(&ir.platform), "h qubit=qubits[0]");
//! # Ok::<(), alsvid_ir::IrError>(())
//! ```

pub mod accesses;
pub mod arena;
mod builder;
pub mod describe;
pub mod error;
pub mod expr;
pub mod gates;
pub mod ir;
pub mod itype;
pub mod object;
pub mod platform;
pub mod prim;
pub mod program;
pub mod remap;
pub mod stmt;
pub mod types;
pub mod visit;

pub use accesses::{AccessRef, Accesses, ObjectAccesses};
pub use arena::{Arena, Handle};
pub use describe::Describe;
pub use error::{IrError, IrResult};
pub use expr::{
    is_assignable_or_qubit, BitLiteral, ComplexLiteral, ComplexMatrixLiteral, Expression,
    FunctionCall, IntLiteral, JsonLiteral, Literal, RealLiteral, RealMatrixLiteral, Reference,
    StringLiteral,
};
pub use ir::Ir;
pub use itype::{
    DecompositionRule, FunctionType, FunctionTypeLink, InstructionType, InstructionTypeLink,
    OperandType,
};
pub use object::{Object, ObjectKind, ObjectLink};
pub use platform::Platform;
pub use prim::{is_identifier, AccessMode, Matrix};
pub use program::{Block, Program};
pub use remap::ReferenceRemapper;
pub use stmt::{
    CustomInstruction, ForLoop, GotoInstruction, IfElse, IfElseBranch, Instruction, Loop,
    LoopControl, RepeatUntilLoop, SetInstruction, Statement, StaticLoop, SubBlock,
    WaitInstruction,
};
pub use types::{max_int_for, min_int_for, DataType, DataTypeKind, DataTypeLink};
pub use visit::VisitorMut;
