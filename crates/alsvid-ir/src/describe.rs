//! One-line human-readable rendering of IR nodes.
//!
//! The renderings aim to be comprehensible in an error message or log line,
//! which makes them far more useful than a raw debug dump. Nothing is
//! defined for inherently multi-line content; blocks, programs, and
//! platforms print minimal identifiers only.

use std::fmt::Write as _;
use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::expr::{Expression, Literal, Reference};
use crate::itype::{FunctionType, InstructionType, OperandType};
use crate::object::Object;
use crate::platform::Platform;
use crate::prim::{AccessMode, Matrix};
use crate::program::{Block, Program};
use crate::stmt::{
    CustomInstruction, GotoInstruction, Instruction, Loop, LoopControl, SetInstruction, Statement,
    WaitInstruction,
};
use crate::types::DataType;

/// Which side of a binary operator binds tighter at equal precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorAssociativity {
    /// Left-associative: `a - b - c` is `(a - b) - c`.
    Left,
    /// Right-associative: `a ** b ** c` is `a ** (b ** c)`.
    Right,
}

/// Rendering metadata for one operator-style function.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    /// Precedence level; higher binds tighter.
    pub precedence: u32,
    /// Associativity at equal precedence.
    pub associativity: OperatorAssociativity,
    /// Text before the first operand (unary operators).
    pub prefix: &'static str,
    /// Text between the first and second operand.
    pub infix: &'static str,
    /// Text between the second and third operand (ternary operators).
    pub infix2: &'static str,
}

/// Operator metadata as the operators appear in cQASM, keyed by function
/// name and operand count. Used to avoid excessive parentheses when
/// printing expressions.
pub static OPERATOR_INFO: LazyLock<FxHashMap<(&'static str, usize), OperatorInfo>> =
    LazyLock::new(|| {
        use OperatorAssociativity::{Left, Right};
        let table: &[(&str, usize, u32, OperatorAssociativity, &str, &str, &str)] = &[
            ("operator?:", 3, 1, Right, "", " ? ", " : "),
            ("operator||", 2, 2, Left, "", " || ", ""),
            ("operator^^", 2, 3, Left, "", " ^^ ", ""),
            ("operator&&", 2, 4, Left, "", " && ", ""),
            ("operator|", 2, 5, Left, "", " | ", ""),
            ("operator^", 2, 6, Left, "", " ^ ", ""),
            ("operator&", 2, 7, Left, "", " & ", ""),
            ("operator==", 2, 8, Left, "", " == ", ""),
            ("operator!=", 2, 8, Left, "", " != ", ""),
            ("operator<", 2, 9, Left, "", " < ", ""),
            ("operator>", 2, 9, Left, "", " > ", ""),
            ("operator<=", 2, 9, Left, "", " <= ", ""),
            ("operator>=", 2, 9, Left, "", " >= ", ""),
            ("operator<<", 2, 10, Left, "", " << ", ""),
            ("operator<<<", 2, 10, Left, "", " <<< ", ""),
            ("operator>>", 2, 10, Left, "", " >> ", ""),
            ("operator>>>", 2, 10, Left, "", " >>> ", ""),
            ("operator+", 2, 11, Left, "", " + ", ""),
            ("operator-", 2, 11, Left, "", " - ", ""),
            ("operator*", 2, 12, Left, "", " * ", ""),
            ("operator/", 2, 12, Left, "", " / ", ""),
            ("operator//", 2, 12, Left, "", " // ", ""),
            ("operator%", 2, 12, Left, "", " % ", ""),
            ("operator**", 2, 13, Right, "", " ** ", ""),
            ("operator-", 1, 14, Right, "-", "", ""),
            ("operator+", 1, 14, Right, "+", "", ""),
            ("operator~", 1, 14, Right, "~", "", ""),
            ("operator!", 1, 14, Right, "!", "", ""),
        ];
        table
            .iter()
            .map(|&(name, arity, precedence, associativity, prefix, infix, infix2)| {
                (
                    (name, arity),
                    OperatorInfo {
                        precedence,
                        associativity,
                        prefix,
                        infix,
                        infix2,
                    },
                )
            })
            .collect()
    });

/// One-line description of a node, for error messages and logs.
pub trait Describe {
    /// Appends the description to a string.
    fn describe_into(&self, platform: &Platform, out: &mut String);

    /// Returns the description as a fresh string.
    fn describe(&self, platform: &Platform) -> String {
        let mut out = String::new();
        self.describe_into(platform, &mut out);
        out
    }
}

impl Describe for DataType {
    fn describe_into(&self, _platform: &Platform, out: &mut String) {
        out.push_str(&self.name);
    }
}

impl Describe for Object {
    fn describe_into(&self, platform: &Platform, out: &mut String) {
        if self.name.is_empty() {
            out.push_str("<anonymous>");
        } else {
            out.push_str(&self.name);
        }
        out.push_str(": ");
        out.push_str(&platform.data_type(self.data_type).name);
        if !self.shape.is_empty() {
            out.push('[');
            for (i, extent) in self.shape.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "{extent}");
            }
            out.push(']');
        }
    }
}

impl Describe for OperandType {
    fn describe_into(&self, platform: &Platform, out: &mut String) {
        let data_type = platform.data_type(self.data_type);
        match self.mode {
            AccessMode::Write => {
                if !data_type.is_qubit() {
                    out.push_str("write ");
                }
            }
            AccessMode::Read => out.push_str("read "),
            AccessMode::Literal => out.push_str("literal "),
            AccessMode::CommuteX => out.push_str("X-commute "),
            AccessMode::CommuteY => out.push_str("Y-commute "),
            AccessMode::CommuteZ => out.push_str("Z-commute "),
            AccessMode::Measure => out.push_str("measure "),
            AccessMode::Update => out.push_str("update "),
        }
        out.push_str(&data_type.name);
    }
}

impl Describe for FunctionType {
    fn describe_into(&self, platform: &Platform, out: &mut String) {
        out.push_str(&self.name);
        out.push('(');
        for (i, operand_type) in self.operand_types.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            operand_type.describe_into(platform, out);
        }
        out.push_str(") -> ");
        out.push_str(&platform.data_type(self.return_type).name);
    }
}

/// Writes an instruction type's name, cQASM alias, and template operands.
/// Returns whether the operand list is still empty (no separator needed
/// before the first remaining operand).
fn write_instruction_type_prefix(
    platform: &Platform,
    out: &mut String,
    instruction_type: &InstructionType,
) -> bool {
    out.push_str(&instruction_type.name);
    if instruction_type.cqasm_name != instruction_type.name {
        out.push('/');
        out.push_str(&instruction_type.cqasm_name);
    }
    let mut first = true;
    if !instruction_type.template_operands.is_empty() {
        // The operand types of specialized-away operands live on the root
        // generalization, which still has the full prototype.
        let root = match instruction_type.generalization {
            Some(parent) => platform.instruction_type(platform.root_generalization(parent)),
            None => instruction_type,
        };
        for (i, template) in instruction_type.template_operands.iter().enumerate() {
            if !first {
                out.push(',');
            }
            first = false;
            out.push(' ');
            if let Some(operand_type) = root.operand_types.get(i) {
                operand_type.describe_into(platform, out);
            }
            out.push('=');
            write_expression(platform, out, template, 0);
        }
    }
    first
}

impl Describe for InstructionType {
    fn describe_into(&self, platform: &Platform, out: &mut String) {
        let mut first = write_instruction_type_prefix(platform, out, self);
        for operand_type in &self.operand_types {
            if !first {
                out.push(',');
            }
            first = false;
            out.push(' ');
            operand_type.describe_into(platform, out);
        }
    }
}

fn write_escaped_string(out: &mut String, value: &str) {
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            other => out.push(other),
        }
    }
    out.push('"');
}

fn write_matrix<T: std::fmt::Display>(out: &mut String, matrix: &Matrix<T>) {
    out.push('[');
    for row in 0..matrix.rows() {
        if row > 0 {
            out.push_str(", ");
        }
        out.push('[');
        for (col, element) in matrix.row(row).enumerate() {
            if col > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{element}");
        }
        out.push(']');
    }
    out.push(']');
}

fn write_literal(out: &mut String, literal: &Literal) {
    match literal {
        Literal::Bit(l) => out.push_str(if l.value { "true" } else { "false" }),
        Literal::Int(l) => {
            let _ = write!(out, "{}", l.value);
        }
        Literal::Real(l) => {
            let _ = write!(out, "{}", l.value);
        }
        Literal::Complex(l) => {
            let _ = write!(out, "{}", l.value);
        }
        Literal::RealMatrix(l) => write_matrix(out, &l.value),
        Literal::ComplexMatrix(l) => write_matrix(out, &l.value),
        Literal::String(l) => write_escaped_string(out, &l.value),
        Literal::Json(l) => {
            let _ = write!(out, "{}", l.value);
        }
    }
}

fn write_reference(platform: &Platform, out: &mut String, reference: &Reference) {
    let target = platform.object(reference.target);
    if reference.data_type != target.data_type {
        out.push('(');
        out.push_str(&platform.data_type(reference.data_type).name);
        out.push(')');
    }
    if target.name.is_empty() {
        out.push_str("<anonymous>");
    } else {
        out.push_str(&target.name);
    }
    if !reference.indices.is_empty() {
        out.push('[');
        for (i, index) in reference.indices.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{}", index.value);
        }
        out.push(']');
    }
}

/// Writes an expression, parenthesizing operator-style function calls only
/// when the surrounding precedence requires it.
fn write_expression(
    platform: &Platform,
    out: &mut String,
    expression: &Expression,
    precedence: u32,
) {
    match expression {
        Expression::Literal(literal) => write_literal(out, literal),
        Expression::Reference(reference) => write_reference(platform, out, reference),
        Expression::FunctionCall(call) => {
            let function_type = platform.function_type(call.function_type);
            let info = OPERATOR_INFO.get(&(function_type.name.as_str(), call.operands.len()));
            let Some(info) = info else {
                // Plain function call syntax; operand precedence resets.
                out.push_str(&function_type.name);
                out.push('(');
                for (i, operand) in call.operands.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write_expression(platform, out, operand, 0);
                }
                out.push(')');
                return;
            };

            let parenthesize = precedence > info.precedence;
            if parenthesize {
                out.push('(');
            }
            out.push_str(info.prefix);
            match call.operands.as_slice() {
                [operand] => {
                    // Associativity does not matter for unary operators;
                    // there are no postfix operators.
                    write_expression(platform, out, operand, info.precedence);
                }
                [first, rest @ ..] => {
                    // The first operand needs one level more precedence for
                    // right-associative operators, forcing parentheses at
                    // equal precedence on that side; mirrored for the last.
                    let left = match info.associativity {
                        OperatorAssociativity::Right => info.precedence + 1,
                        OperatorAssociativity::Left => info.precedence,
                    };
                    write_expression(platform, out, first, left);
                    out.push_str(info.infix);

                    if let [middle, _] = rest {
                        // Ternary: the middle operand is always
                        // parenthesized at equal precedence. Not strictly
                        // necessary, but easier to read.
                        write_expression(platform, out, middle, info.precedence + 1);
                        out.push_str(info.infix2);
                    }

                    if let Some(last) = rest.last() {
                        let right = match info.associativity {
                            OperatorAssociativity::Left => info.precedence + 1,
                            OperatorAssociativity::Right => info.precedence,
                        };
                        write_expression(platform, out, last, right);
                    }
                }
                [] => {}
            }
            if parenthesize {
                out.push(')');
            }
        }
    }
}

impl Describe for Expression {
    fn describe_into(&self, platform: &Platform, out: &mut String) {
        write_expression(platform, out, self, 0);
    }
}

impl Describe for Reference {
    fn describe_into(&self, platform: &Platform, out: &mut String) {
        write_reference(platform, out, self);
    }
}

/// Writes the `cond (...) ` prefix, elided when the condition is a literal
/// `true`.
fn write_condition_prefix(platform: &Platform, out: &mut String, condition: &Expression) {
    if condition.as_bit_literal().map(|b| b.value) == Some(true) {
        return;
    }
    out.push_str("cond (");
    write_expression(platform, out, condition, 0);
    out.push_str(") ");
}

impl Describe for CustomInstruction {
    fn describe_into(&self, platform: &Platform, out: &mut String) {
        write_condition_prefix(platform, out, &self.condition);
        let instruction_type = platform.instruction_type(self.instruction_type);
        let mut first = write_instruction_type_prefix(platform, out, instruction_type);
        for (operand_type, operand) in instruction_type.operand_types.iter().zip(&self.operands) {
            if !first {
                out.push(',');
            }
            first = false;
            out.push(' ');
            operand_type.describe_into(platform, out);
            out.push('=');
            write_expression(platform, out, operand, 0);
        }
    }
}

impl Describe for SetInstruction {
    fn describe_into(&self, platform: &Platform, out: &mut String) {
        write_condition_prefix(platform, out, &self.condition);
        write_reference(platform, out, &self.lhs);
        out.push_str(" = ");
        write_expression(platform, out, &self.rhs, 0);
    }
}

impl Describe for GotoInstruction {
    fn describe_into(&self, platform: &Platform, out: &mut String) {
        write_condition_prefix(platform, out, &self.condition);
        let _ = write!(out, "goto {}", self.target);
    }
}

impl Describe for WaitInstruction {
    fn describe_into(&self, platform: &Platform, out: &mut String) {
        out.push_str("wait");
        if self.duration > 0 {
            let _ = write!(out, " {} cycle", self.duration);
            if self.duration != 1 {
                out.push('s');
            }
            if !self.objects.is_empty() {
                out.push_str(" after");
            }
        } else if !self.objects.is_empty() {
            out.push_str(" on");
        }
        for (i, reference) in self.objects.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push(' ');
            write_reference(platform, out, reference);
        }
    }
}

impl Describe for Instruction {
    fn describe_into(&self, platform: &Platform, out: &mut String) {
        match self {
            Instruction::Custom(custom) => custom.describe_into(platform, out),
            Instruction::Set(set) => set.describe_into(platform, out),
            Instruction::Wait(wait) => wait.describe_into(platform, out),
            Instruction::Goto(goto) => goto.describe_into(platform, out),
            Instruction::Source { .. } => out.push_str("SOURCE"),
            Instruction::Sink { .. } => out.push_str("SINK"),
            Instruction::Dummy { .. } => out.push_str("dummy"),
        }
    }
}

impl Describe for Statement {
    fn describe_into(&self, platform: &Platform, out: &mut String) {
        match self {
            Statement::Instruction(instruction) => instruction.describe_into(platform, out),
            Statement::IfElse(if_else) => {
                out.push_str("if (");
                if let Some(branch) = if_else.branches.first() {
                    write_expression(platform, out, &branch.condition, 0);
                }
                out.push_str(") ...");
            }
            Statement::Loop(Loop::Static(_) | Loop::For(_) | Loop::RepeatUntil(_)) => {
                out.push_str("loop ...");
            }
            Statement::LoopControl(LoopControl::Break) => out.push_str("break"),
            Statement::LoopControl(LoopControl::Continue) => out.push_str("continue"),
        }
    }
}

impl Describe for Block {
    fn describe_into(&self, _platform: &Platform, out: &mut String) {
        if self.name.is_empty() {
            out.push_str("anonymous block");
        } else {
            out.push_str("block ");
            out.push_str(&self.name);
        }
    }
}

impl Describe for Program {
    fn describe_into(&self, _platform: &Platform, out: &mut String) {
        if self.name.is_empty() {
            out.push_str("anonymous program");
        } else {
            out.push_str("program ");
            out.push_str(&self.name);
        }
    }
}

impl Describe for Platform {
    fn describe_into(&self, _platform: &Platform, out: &mut String) {
        if self.name.is_empty() {
            out.push_str("anonymous platform");
        } else {
            out.push_str("platform ");
            out.push_str(&self.name);
        }
    }
}
