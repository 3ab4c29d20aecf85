//! Error types for the IR crate.

use thiserror::Error;

/// Errors that can occur while constructing or analyzing the IR.
///
/// Variants up to and including [`IrError::UnknownName`] indicate bad user
/// input (malformed names, type errors, unresolvable instructions).
/// [`IrError::InternalConsistency`] indicates malformed IR handed to an
/// analysis, which is a bug in the producing code rather than in user input.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Name failed the identifier grammar, or an operator-style function
    /// name lacks the `operator` prefix.
    #[error("invalid name for new {role}: \"{name}\" is not a valid identifier")]
    InvalidName {
        /// What was being named.
        role: &'static str,
        /// The offending name.
        name: String,
    },

    /// A registry already contains an entry with this name and operand
    /// signature.
    #[error("duplicate {role}: {description}")]
    DuplicateDefinition {
        /// The kind of registry entry.
        role: &'static str,
        /// One-line description of the clashing entry.
        description: String,
    },

    /// Two sides of an assignment disagree, or a type is not what the
    /// operation requires.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// An index is outside an object's shape, or the index count does not
    /// match the shape's dimensionality.
    #[error("index out of range: {0}")]
    IndexOutOfRange(String),

    /// An integer literal does not fit the representable range of its type.
    #[error("literal value {value} is out of range for type {type_name}")]
    OutOfRangeLiteral {
        /// The value that did not fit.
        value: i128,
        /// Name of the integer type.
        type_name: String,
    },

    /// Wrong number of operands for a builder or no matching overload.
    #[error("operand arity: {0}")]
    OperandArity(String),

    /// An operand of the wrong kind: a non-reference where a reference is
    /// required, a non-literal duration, or a condition on an instruction
    /// that cannot be conditional.
    #[error("operand kind: {0}")]
    OperandKind(String),

    /// Lookup by name found nothing.
    #[error("unknown {role}: {name}")]
    UnknownName {
        /// The kind of entity looked up.
        role: &'static str,
        /// The name (plus operand types, where applicable).
        name: String,
    },

    /// The IR violates an invariant every producer must uphold. This is a
    /// bug in the code that built the tree, not a user input problem.
    #[error("internal consistency violation: {0}")]
    InternalConsistency(String),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
