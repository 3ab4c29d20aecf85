//! Well-typed construction of statements, literals, and references.
//!
//! These builders are the only supported way for front-ends to create
//! statements: they validate names, arities, types, and ranges, and resolve
//! custom instructions to their most specialized instruction type.

use crate::error::{IrError, IrResult};
use crate::expr::{BitLiteral, Expression, FunctionCall, IntLiteral, Literal, Reference};
use crate::ir::Ir;
use crate::object::{Object, ObjectLink};
use crate::stmt::{CustomInstruction, Instruction, SetInstruction, WaitInstruction};
use crate::types::{max_int_for, min_int_for, DataTypeLink};

impl Ir {
    /// Builds a new instruction based on name and operand list.
    ///
    /// - `"set"`: exactly two operands; the first is the left-hand side and
    ///   must be a reference of classical type, the second must have exactly
    ///   the same type.
    /// - `"wait"`: the first operand is a non-negative integer literal
    ///   duration in cycles; any further operands are references being
    ///   waited on. With no references the wait is a full barrier.
    /// - `"barrier"`: a zero-duration wait; all operands are references.
    /// - anything else resolves a custom instruction through the platform's
    ///   instruction registry and then specializes it as far as template
    ///   operands match.
    ///
    /// When no condition is given, conditional instructions get a literal
    /// `true`. Wait instructions are always unconditional; supplying a
    /// condition for one is an error. Goto and dummy instructions cannot be
    /// created through this interface.
    pub fn make_instruction(
        &mut self,
        name: &str,
        operands: Vec<Expression>,
        condition: Option<Expression>,
    ) -> IrResult<Instruction> {
        match self.make_instruction_opt(name, operands, condition, false, false)? {
            Some(instruction) => Ok(instruction),
            None => Err(IrError::InternalConsistency(
                "make_instruction returned no instruction without being asked to".into(),
            )),
        }
    }

    /// [`Ir::make_instruction`] with the resolution escape hatches used by
    /// IR converters: `generate_overload_if_needed` generates a write-mode
    /// overload when only the instruction name matches, and
    /// `return_empty_on_failure` returns `Ok(None)` instead of
    /// [`IrError::UnknownName`] when resolution fails.
    pub fn make_instruction_opt(
        &mut self,
        name: &str,
        mut operands: Vec<Expression>,
        condition: Option<Expression>,
        generate_overload_if_needed: bool,
        return_empty_on_failure: bool,
    ) -> IrResult<Option<Instruction>> {
        let instruction = match name {
            "set" => {
                if operands.len() != 2 {
                    return Err(IrError::OperandArity(
                        "set instructions must have exactly two operands".into(),
                    ));
                }
                let (Some(rhs), Some(lhs)) = (operands.pop(), operands.pop()) else {
                    return Err(IrError::OperandArity(
                        "set instructions must have exactly two operands".into(),
                    ));
                };
                let lhs = match lhs {
                    Expression::Reference(r) => r,
                    _ => {
                        return Err(IrError::OperandKind(
                            "the left-hand side of a set instruction must be a reference".into(),
                        ));
                    }
                };
                if !self.platform.data_type(lhs.data_type).is_classical() {
                    return Err(IrError::TypeMismatch(
                        "set instructions only support classical data types".into(),
                    ));
                }
                if lhs.data_type != self.platform.type_of(&rhs) {
                    return Err(IrError::TypeMismatch(
                        "the left-hand side and right-hand side of a set instruction must have \
                         the same type"
                            .into(),
                    ));
                }
                let condition = self.condition_or_true(condition)?;
                Instruction::Set(SetInstruction {
                    lhs,
                    rhs,
                    condition,
                    cycle: 0,
                })
            }

            "wait" => {
                if condition.is_some() {
                    return Err(IrError::OperandKind(
                        "wait instructions are always unconditional".into(),
                    ));
                }
                let mut operands = operands.into_iter();
                let Some(first) = operands.next() else {
                    return Err(IrError::OperandArity(
                        "wait instructions must have at least one operand (the duration)".into(),
                    ));
                };
                let duration = match first.as_int_literal() {
                    Some(literal) if literal.value < 0 => {
                        return Err(IrError::OutOfRangeLiteral {
                            value: literal.value as i128,
                            type_name: self.platform.data_type(literal.data_type).name.clone(),
                        });
                    }
                    Some(literal) => literal.value as u64,
                    None => {
                        return Err(IrError::OperandKind(
                            "the duration of a wait instruction must be an integer literal".into(),
                        ));
                    }
                };
                let objects = Self::wait_references(operands)?;
                Instruction::Wait(WaitInstruction {
                    duration,
                    objects,
                    cycle: 0,
                })
            }

            "barrier" => {
                if condition.is_some() {
                    return Err(IrError::OperandKind(
                        "wait instructions are always unconditional".into(),
                    ));
                }
                let objects = Self::wait_references(operands.into_iter())?;
                Instruction::Wait(WaitInstruction {
                    duration: 0,
                    objects,
                    cycle: 0,
                })
            }

            _ => {
                let types: Vec<DataTypeLink> = operands
                    .iter()
                    .map(|operand| self.platform.type_of(operand))
                    .collect();
                let found = if generate_overload_if_needed {
                    self.platform.find_instruction_type_or_overload(name, &types)
                } else {
                    self.platform.find_instruction_type(name, &types)
                };
                let Some(mut instruction_type) = found else {
                    if return_empty_on_failure {
                        return Ok(None);
                    }
                    let mut described = name.to_string();
                    for (i, &typ) in types.iter().enumerate() {
                        described.push_str(if i == 0 { " " } else { ", " });
                        described.push_str(&self.platform.data_type(typ).name);
                    }
                    return Err(IrError::UnknownName {
                        role: "instruction",
                        name: described,
                    });
                };

                // Specialize the instruction type and operands as much as
                // possible: each matching template operand is consumed from
                // the front of the operand list.
                loop {
                    let matched = self
                        .platform
                        .instruction_type(instruction_type)
                        .specializations
                        .iter()
                        .copied()
                        .find(|&s| {
                            self.platform.instruction_type(s).template_operands.last()
                                == operands.first()
                        });
                    match matched {
                        Some(specialization) => {
                            operands.remove(0);
                            instruction_type = specialization;
                        }
                        None => break,
                    }
                }

                let condition = self.condition_or_true(condition)?;
                Instruction::Custom(CustomInstruction {
                    instruction_type,
                    operands,
                    condition,
                    cycle: 0,
                })
            }
        };
        Ok(Some(instruction))
    }

    /// Shorthand for `make_instruction("set", [lhs, rhs], condition)`.
    pub fn make_set_instruction(
        &mut self,
        lhs: Expression,
        rhs: Expression,
        condition: Option<Expression>,
    ) -> IrResult<Instruction> {
        self.make_instruction("set", vec![lhs, rhs], condition)
    }

    /// Builds a function call node, resolving the function by name and
    /// positional operand types.
    pub fn make_function_call(
        &self,
        name: &str,
        operands: Vec<Expression>,
    ) -> IrResult<FunctionCall> {
        let types: Vec<DataTypeLink> = operands
            .iter()
            .map(|operand| self.platform.type_of(operand))
            .collect();
        let Some(function_type) = self.platform.find_function_type(name, &types) else {
            let mut described = format!("{name}(");
            for (i, &typ) in types.iter().enumerate() {
                if i > 0 {
                    described.push_str(", ");
                }
                described.push_str(&self.platform.data_type(typ).name);
            }
            described.push(')');
            return Err(IrError::UnknownName {
                role: "function",
                name: described,
            });
        };
        Ok(FunctionCall {
            function_type,
            operands,
        })
    }

    /// Makes an integer literal of the given type, or of the platform's
    /// default integer type when none is given. The value must be
    /// representable by the type.
    pub fn make_int_lit(&self, value: i64, data_type: Option<DataTypeLink>) -> IrResult<IntLiteral> {
        let typ = data_type.or(self.platform.default_int_type).ok_or_else(|| {
            IrError::TypeMismatch("no default integer type is defined".into())
        })?;
        let data_type = self.platform.data_type(typ);
        let Some((bits, signed)) = data_type.as_int() else {
            return Err(IrError::TypeMismatch(format!(
                "type {} is not integer-like",
                data_type.name,
            )));
        };
        if value > max_int_for(bits, signed) || value < min_int_for(bits, signed) {
            return Err(IrError::OutOfRangeLiteral {
                value: value as i128,
                type_name: data_type.name.clone(),
            });
        }
        Ok(IntLiteral {
            value,
            data_type: typ,
        })
    }

    /// Makes an integer literal from an unsigned value. See
    /// [`Ir::make_int_lit`].
    pub fn make_uint_lit(&self, value: u64, data_type: Option<DataTypeLink>) -> IrResult<IntLiteral> {
        let typ = data_type.or(self.platform.default_int_type).ok_or_else(|| {
            IrError::TypeMismatch("no default integer type is defined".into())
        })?;
        let data_type = self.platform.data_type(typ);
        let Some((bits, signed)) = data_type.as_int() else {
            return Err(IrError::TypeMismatch(format!(
                "type {} is not integer-like",
                data_type.name,
            )));
        };
        if value > max_int_for(bits, signed) as u64 {
            return Err(IrError::OutOfRangeLiteral {
                value: value as i128,
                type_name: data_type.name.clone(),
            });
        }
        Ok(IntLiteral {
            value: value as i64,
            data_type: typ,
        })
    }

    /// Makes a bit literal of the given type, or of the platform's default
    /// bit type when none is given.
    pub fn make_bit_lit(&self, value: bool, data_type: Option<DataTypeLink>) -> IrResult<BitLiteral> {
        let typ = data_type.or(self.platform.default_bit_type).ok_or_else(|| {
            IrError::TypeMismatch("no default bit type is defined".into())
        })?;
        let data_type = self.platform.data_type(typ);
        if !matches!(data_type.kind, crate::types::DataTypeKind::Bit) {
            return Err(IrError::TypeMismatch(format!(
                "type {} is not bit-like",
                data_type.name,
            )));
        }
        Ok(BitLiteral {
            value,
            data_type: typ,
        })
    }

    /// Makes a reference to one qubit of the main qubit register.
    pub fn make_qubit_ref(&self, index: u64) -> IrResult<Reference> {
        let qubits = self.platform.qubits.ok_or_else(|| {
            IrError::TypeMismatch("platform does not define a main qubit register".into())
        })?;
        self.make_reference(qubits, &[index])
    }

    /// Makes a reference to the implicit measurement bit associated with a
    /// qubit of the main qubit register.
    pub fn make_bit_ref(&self, index: u64) -> IrResult<Reference> {
        let bit_type = self.platform.implicit_bit_type.ok_or_else(|| {
            IrError::TypeMismatch(
                "platform does not support implicit measurement bits for qubits".into(),
            )
        })?;
        let mut reference = self.make_qubit_ref(index)?;
        reference.data_type = bit_type;
        Ok(reference)
    }

    /// Makes a reference to one element of the given object using literal
    /// indices. One index per shape dimension is required, and each index
    /// must be within the corresponding extent.
    pub fn make_reference(&self, object: ObjectLink, indices: &[u64]) -> IrResult<Reference> {
        let obj = self.platform.object(object);
        if indices.len() > obj.shape.len() {
            return Err(IrError::IndexOutOfRange(format!(
                "too many indices specified to make reference to '{}'",
                obj.name,
            )));
        }
        if indices.len() < obj.shape.len() {
            return Err(IrError::IndexOutOfRange(format!(
                "not enough indices specified to make reference to '{}' (only individual \
                 elements can be referenced)",
                obj.name,
            )));
        }
        let mut literals = Vec::with_capacity(indices.len());
        for (dimension, &index) in indices.iter().enumerate() {
            if index >= obj.shape[dimension] {
                return Err(IrError::IndexOutOfRange(format!(
                    "index {index} out of range making reference to '{}'",
                    obj.name,
                )));
            }
            literals.push(self.make_uint_lit(index, None)?);
        }
        Ok(Reference {
            target: object,
            data_type: obj.data_type,
            indices: literals,
        })
    }

    /// Allocates an anonymous program-scoped temporary of the given type and
    /// returns a link to it.
    pub fn make_temporary(&mut self, data_type: DataTypeLink) -> ObjectLink {
        let link = self.platform.alloc_object(Object::temporary(data_type));
        self.program.temporaries.push(link);
        link
    }

    /// The given condition, or a literal `true` of the default bit type.
    /// Conditions must have a bit data type.
    fn condition_or_true(&self, condition: Option<Expression>) -> IrResult<Expression> {
        match condition {
            Some(condition) => {
                let typ = self.platform.data_type(self.platform.type_of(&condition));
                if !matches!(typ.kind, crate::types::DataTypeKind::Bit) {
                    return Err(IrError::TypeMismatch(format!(
                        "instruction conditions must have a bit type, not {}",
                        typ.name,
                    )));
                }
                Ok(condition)
            }
            None => Ok(Expression::Literal(Literal::Bit(
                self.make_bit_lit(true, None)?,
            ))),
        }
    }

    /// Collects wait/barrier operands, which must all be references.
    fn wait_references(
        operands: impl Iterator<Item = Expression>,
    ) -> IrResult<Vec<Reference>> {
        let mut references = vec![];
        for operand in operands {
            match operand {
                Expression::Reference(reference) => references.push(reference),
                _ => {
                    return Err(IrError::OperandKind(
                        "the operands of a wait instruction after the duration must be references"
                            .into(),
                    ));
                }
            }
        }
        Ok(references)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itype::{InstructionType, OperandType};
    use crate::platform::Platform;
    use crate::prim::AccessMode;
    use crate::types::DataType;

    fn test_ir() -> Ir {
        let mut platform = Platform::new("test");
        let qubit = platform.add_data_type(DataType::qubit("qubit")).unwrap();
        let bit = platform.add_data_type(DataType::bit("bit")).unwrap();
        let int = platform
            .add_data_type(DataType::int("int", 32, true))
            .unwrap();
        let qubits = platform
            .add_physical_object(Object::physical("q", qubit, vec![5]))
            .unwrap();
        platform.qubits = Some(qubits);
        platform.implicit_bit_type = Some(bit);
        platform.default_int_type = Some(int);
        platform.default_bit_type = Some(bit);
        platform
            .add_instruction_type(
                InstructionType::new("x")
                    .with_operand_types(vec![OperandType::new(AccessMode::Write, qubit)])
                    .with_duration(40),
                &[],
            )
            .unwrap();
        Ir::new(platform)
    }

    #[test]
    fn test_int_literal_range() {
        let mut ir = test_ir();
        let byte = ir.platform.add_data_type(DataType::int("byte", 8, true)).unwrap();
        assert!(ir.make_int_lit(127, Some(byte)).is_ok());
        assert!(ir.make_int_lit(-128, Some(byte)).is_ok());
        assert!(matches!(
            ir.make_int_lit(128, Some(byte)),
            Err(IrError::OutOfRangeLiteral { .. })
        ));
        assert!(matches!(
            ir.make_int_lit(-129, Some(byte)),
            Err(IrError::OutOfRangeLiteral { .. })
        ));
    }

    #[test]
    fn test_uint_literal_uses_default_type() {
        let ir = test_ir();
        let literal = ir.make_uint_lit(12, None).unwrap();
        assert_eq!(literal.value, 12);
        assert_eq!(literal.data_type, ir.platform.default_int_type.unwrap());
    }

    #[test]
    fn test_non_integer_literal_type_rejected() {
        let ir = test_ir();
        let bit = ir.platform.find_type("bit").unwrap();
        assert!(matches!(
            ir.make_int_lit(0, Some(bit)),
            Err(IrError::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_reference_bounds() {
        let ir = test_ir();
        assert!(ir.make_qubit_ref(4).is_ok());
        assert!(matches!(
            ir.make_qubit_ref(5),
            Err(IrError::IndexOutOfRange(_))
        ));
        let qubits = ir.platform.qubits.unwrap();
        assert!(matches!(
            ir.make_reference(qubits, &[]),
            Err(IrError::IndexOutOfRange(_))
        ));
        assert!(matches!(
            ir.make_reference(qubits, &[0, 0]),
            Err(IrError::IndexOutOfRange(_))
        ));
    }

    #[test]
    fn test_bit_ref_view() {
        let ir = test_ir();
        let bit_ref = ir.make_bit_ref(2).unwrap();
        let qubit_ref = ir.make_qubit_ref(2).unwrap();
        assert_eq!(bit_ref.target, qubit_ref.target);
        assert_eq!(bit_ref.indices, qubit_ref.indices);
        assert_eq!(bit_ref.data_type, ir.platform.implicit_bit_type.unwrap());
        assert_ne!(bit_ref.data_type, qubit_ref.data_type);
    }

    #[test]
    fn test_set_instruction_type_checking() {
        let mut ir = test_ir();
        let int = ir.platform.find_type("int").unwrap();
        let counter = ir
            .platform
            .add_physical_object(Object::scalar("counter", int))
            .unwrap();
        let lhs = ir.make_reference(counter, &[]).unwrap();
        let rhs = ir.make_int_lit(5, None).unwrap();
        let instruction = ir
            .make_set_instruction(lhs.clone().into(), rhs.into(), None)
            .unwrap();
        assert!(matches!(instruction, Instruction::Set(_)));

        // Mismatched right-hand side type.
        let bad_rhs = ir.make_bit_lit(true, None).unwrap();
        assert!(matches!(
            ir.make_set_instruction(lhs.clone().into(), bad_rhs.into(), None),
            Err(IrError::TypeMismatch(_))
        ));

        // Qubit left-hand side.
        let qubit_lhs = ir.make_qubit_ref(0).unwrap();
        let rhs = ir.make_int_lit(5, None).unwrap();
        assert!(matches!(
            ir.make_set_instruction(qubit_lhs.into(), rhs.into(), None),
            Err(IrError::TypeMismatch(_))
        ));

        // Literal left-hand side.
        let lit = ir.make_int_lit(1, None).unwrap();
        let rhs = ir.make_int_lit(5, None).unwrap();
        assert!(matches!(
            ir.make_set_instruction(lit.into(), rhs.into(), None),
            Err(IrError::OperandKind(_))
        ));
    }

    #[test]
    fn test_wait_and_barrier() {
        let mut ir = test_ir();
        let duration = ir.make_int_lit(10, None).unwrap();
        let wait = ir.make_instruction("wait", vec![duration.into()], None).unwrap();
        match &wait {
            Instruction::Wait(w) => {
                assert_eq!(w.duration, 10);
                assert!(w.is_full_barrier());
            }
            _ => panic!("expected wait instruction"),
        }

        let duration = ir.make_int_lit(10, None).unwrap();
        let q0 = ir.make_qubit_ref(0).unwrap();
        let wait = ir
            .make_instruction("wait", vec![duration.into(), q0.into()], None)
            .unwrap();
        match &wait {
            Instruction::Wait(w) => {
                assert_eq!(w.objects.len(), 1);
                assert!(!w.is_full_barrier());
            }
            _ => panic!("expected wait instruction"),
        }

        let q0 = ir.make_qubit_ref(0).unwrap();
        let q1 = ir.make_qubit_ref(1).unwrap();
        let barrier = ir
            .make_instruction("barrier", vec![q0.into(), q1.into()], None)
            .unwrap();
        match &barrier {
            Instruction::Wait(w) => {
                assert_eq!(w.duration, 0);
                assert_eq!(w.objects.len(), 2);
            }
            _ => panic!("expected wait instruction"),
        }

        // Negative duration.
        let negative = ir.make_int_lit(-1, None).unwrap();
        assert!(matches!(
            ir.make_instruction("wait", vec![negative.into()], None),
            Err(IrError::OutOfRangeLiteral { .. })
        ));

        // No duration at all.
        assert!(matches!(
            ir.make_instruction("wait", vec![], None),
            Err(IrError::OperandArity(_))
        ));

        // Conditions are forbidden on waits.
        let duration = ir.make_int_lit(1, None).unwrap();
        let condition = ir.make_bit_lit(true, None).unwrap();
        assert!(matches!(
            ir.make_instruction("wait", vec![duration.into()], Some(condition.into())),
            Err(IrError::OperandKind(_))
        ));
    }

    #[test]
    fn test_custom_instruction_resolution() {
        let mut ir = test_ir();
        let q0 = ir.make_qubit_ref(0).unwrap();
        let instruction = ir.make_instruction("x", vec![q0.into()], None).unwrap();
        match &instruction {
            Instruction::Custom(c) => {
                assert_eq!(ir.platform.instruction_type(c.instruction_type).name, "x");
                assert_eq!(c.operands.len(), 1);
                // Unconditional instructions get a literal true condition.
                assert_eq!(c.condition.as_bit_literal().map(|b| b.value), Some(true));
            }
            _ => panic!("expected custom instruction"),
        }

        assert!(matches!(
            ir.make_instruction("x", vec![], None),
            Err(IrError::UnknownName { .. })
        ));
        let q0 = ir.make_qubit_ref(0).unwrap();
        assert!(matches!(
            ir.make_instruction("nope", vec![q0.into()], None),
            Err(IrError::UnknownName { .. })
        ));

        // return_empty_on_failure suppresses the error.
        let q0 = ir.make_qubit_ref(0).unwrap();
        assert!(ir
            .make_instruction_opt("nope", vec![q0.into()], None, false, true)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_non_bit_condition_rejected() {
        let mut ir = test_ir();
        let q0 = ir.make_qubit_ref(0).unwrap();
        let not_a_bit = ir.make_int_lit(1, None).unwrap();
        assert!(matches!(
            ir.make_instruction("x", vec![q0.into()], Some(not_a_bit.into())),
            Err(IrError::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_make_temporary_is_program_scoped() {
        let mut ir = test_ir();
        let int = ir.platform.find_type("int").unwrap();
        let temp = ir.make_temporary(int);
        assert_eq!(ir.program.temporaries, vec![temp]);
        assert!(ir.platform.object(temp).name.is_empty());
        // Temporaries are not registered by name.
        assert_eq!(ir.platform.objects().count(), 1);
    }
}
