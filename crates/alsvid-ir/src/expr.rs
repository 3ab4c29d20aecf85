//! Expression tree nodes.
//!
//! Expressions are owned sum types with structural equality: two
//! expressions are equal iff they are the same variant with equal contents,
//! where links compare by arena identity. That equality is what template
//! operand matching and specialization dispatch are defined in terms of.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::itype::FunctionTypeLink;
use crate::object::ObjectLink;
use crate::prim::Matrix;
use crate::types::DataTypeLink;

/// A bit literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitLiteral {
    /// The literal value.
    pub value: bool,
    /// Type of the literal.
    pub data_type: DataTypeLink,
}

/// An integer literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntLiteral {
    /// The literal value.
    pub value: i64,
    /// Type of the literal.
    pub data_type: DataTypeLink,
}

/// A real-number literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealLiteral {
    /// The literal value.
    pub value: f64,
    /// Type of the literal.
    pub data_type: DataTypeLink,
}

/// A complex-number literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexLiteral {
    /// The literal value.
    pub value: Complex64,
    /// Type of the literal.
    pub data_type: DataTypeLink,
}

/// A real matrix literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealMatrixLiteral {
    /// The literal value.
    pub value: Matrix<f64>,
    /// Type of the literal.
    pub data_type: DataTypeLink,
}

/// A complex matrix literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexMatrixLiteral {
    /// The literal value.
    pub value: Matrix<Complex64>,
    /// Type of the literal.
    pub data_type: DataTypeLink,
}

/// A string literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringLiteral {
    /// The literal value.
    pub value: String,
    /// Type of the literal.
    pub data_type: DataTypeLink,
}

/// A JSON literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonLiteral {
    /// The literal value.
    pub value: serde_json::Value,
    /// Type of the literal.
    pub data_type: DataTypeLink,
}

/// A literal of any kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// A bit literal.
    Bit(BitLiteral),
    /// An integer literal.
    Int(IntLiteral),
    /// A real-number literal.
    Real(RealLiteral),
    /// A complex-number literal.
    Complex(ComplexLiteral),
    /// A real matrix literal.
    RealMatrix(RealMatrixLiteral),
    /// A complex matrix literal.
    ComplexMatrix(ComplexMatrixLiteral),
    /// A string literal.
    String(StringLiteral),
    /// A JSON literal.
    Json(JsonLiteral),
}

impl Literal {
    /// Type of the literal.
    pub fn data_type(&self) -> DataTypeLink {
        match self {
            Literal::Bit(l) => l.data_type,
            Literal::Int(l) => l.data_type,
            Literal::Real(l) => l.data_type,
            Literal::Complex(l) => l.data_type,
            Literal::RealMatrix(l) => l.data_type,
            Literal::ComplexMatrix(l) => l.data_type,
            Literal::String(l) => l.data_type,
            Literal::Json(l) => l.data_type,
        }
    }
}

/// A reference to one element of an object.
///
/// `data_type` usually equals the target object's element type, but may
/// differ to model a different view of the same storage; a qubit reference
/// retyped to the platform's implicit bit type addresses the measurement bit
/// associated with that qubit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    /// The object being referred to.
    pub target: ObjectLink,
    /// The type the storage is viewed as.
    pub data_type: DataTypeLink,
    /// One literal index per target shape dimension.
    pub indices: Vec<IntLiteral>,
}

/// A call to a platform-declared function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// The resolved function type.
    pub function_type: FunctionTypeLink,
    /// Actual operands, one per prototype operand.
    pub operands: Vec<Expression>,
}

/// An expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// A literal value.
    Literal(Literal),
    /// A reference to an object element.
    Reference(Reference),
    /// A function call.
    FunctionCall(FunctionCall),
}

impl Expression {
    /// The contained reference, if this is a reference.
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Expression::Reference(r) => Some(r),
            _ => None,
        }
    }

    /// The contained integer literal, if this is one.
    pub fn as_int_literal(&self) -> Option<&IntLiteral> {
        match self {
            Expression::Literal(Literal::Int(l)) => Some(l),
            _ => None,
        }
    }

    /// The contained bit literal, if this is one.
    pub fn as_bit_literal(&self) -> Option<&BitLiteral> {
        match self {
            Expression::Literal(Literal::Bit(l)) => Some(l),
            _ => None,
        }
    }

    /// Whether this is a literal of any kind.
    pub fn is_literal(&self) -> bool {
        matches!(self, Expression::Literal(_))
    }
}

impl From<Literal> for Expression {
    fn from(literal: Literal) -> Self {
        Expression::Literal(literal)
    }
}

impl From<BitLiteral> for Expression {
    fn from(literal: BitLiteral) -> Self {
        Expression::Literal(Literal::Bit(literal))
    }
}

impl From<IntLiteral> for Expression {
    fn from(literal: IntLiteral) -> Self {
        Expression::Literal(Literal::Int(literal))
    }
}

impl From<Reference> for Expression {
    fn from(reference: Reference) -> Self {
        Expression::Reference(reference)
    }
}

impl From<FunctionCall> for Expression {
    fn from(call: FunctionCall) -> Self {
        Expression::FunctionCall(call)
    }
}

/// Whether the expression can appear on the left-hand side of an assignment
/// or be used as a qubit or classical-write operand. Only references can.
pub fn is_assignable_or_qubit(expr: &Expression) -> bool {
    match expr {
        Expression::Literal(_) => false,
        Expression::Reference(_) => true,
        Expression::FunctionCall(_) => false,
    }
}
