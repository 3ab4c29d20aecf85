//! End-to-end scenarios: building a platform from scratch, resolving
//! instructions, structured control flow, and block durations.

use alsvid_ir::{
    AccessMode, AccessRef, DataType, Describe, Expression, ForLoop, IfElse, IfElseBranch,
    Instruction, InstructionType, Ir, IrError, Loop, Object, ObjectAccesses, OperandType,
    Platform, Reference, SetInstruction, Statement, SubBlock,
};

fn mode_of(accesses: &ObjectAccesses, reference: &Reference) -> Option<AccessMode> {
    accesses.get().get(&AccessRef::from(reference)).copied()
}

/// Helper: the platform of scenario S1 with qubit type `qubit`, bit type
/// `bit`, a three-qubit register `qubits`, and implicit measurement bits.
fn s1_ir() -> Ir {
    let mut platform = Platform::new("s1");
    let qubit = platform.add_data_type(DataType::qubit("qubit")).unwrap();
    let bit = platform.add_data_type(DataType::bit("bit")).unwrap();
    let int = platform
        .add_data_type(DataType::int("int", 64, true))
        .unwrap();
    let qubits = platform
        .add_physical_object(Object::physical("qubits", qubit, vec![3]))
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
fn test_s1_build_and_describe() {
    let mut ir = s1_ir();
    let q0 = ir.make_qubit_ref(0).unwrap();
    let x = ir.make_instruction("x", vec![q0.into()], None).unwrap();
    assert_eq!(x.describe(&ir.platform), "x qubit=qubits[0]");

    assert!(matches!(
        ir.make_instruction("x", vec![], None),
        Err(IrError::UnknownName { .. })
    ));
}

#[test]
fn test_s2_specialization_dispatch() {
    let mut ir = s1_ir();
    let qubit = ir.platform.find_type("qubit").unwrap();
    let q1: Expression = ir.make_qubit_ref(1).unwrap().into();
    let specialized = ir
        .platform
        .add_instruction_type(
            InstructionType::new("x")
                .with_operand_types(vec![OperandType::new(AccessMode::Write, qubit)])
                .with_duration(40),
            &[q1],
        )
        .unwrap();

    let q1 = ir.make_qubit_ref(1).unwrap();
    let hit = ir.make_instruction("x", vec![q1.into()], None).unwrap();
    let custom = hit.as_custom().unwrap();
    assert_eq!(custom.instruction_type, specialized);
    assert!(custom.operands.is_empty());
    assert_eq!(hit.describe(&ir.platform), "x qubit=qubits[1]");

    let q2 = ir.make_qubit_ref(2).unwrap();
    let miss = ir.make_instruction("x", vec![q2.into()], None).unwrap();
    let custom = miss.as_custom().unwrap();
    assert_ne!(custom.instruction_type, specialized);
    assert_eq!(custom.operands.len(), 1);
}

#[test]
fn test_s4_set_instruction_typing() {
    let mut ir = s1_ir();
    let int = ir.platform.find_type("int").unwrap();
    let counter = ir
        .platform
        .add_physical_object(Object::scalar("counter", int))
        .unwrap();
    let int_ref = ir.make_reference(counter, &[]).unwrap();
    let five = ir.make_int_lit(5, None).unwrap();
    let set = ir
        .make_instruction("set", vec![int_ref.clone().into(), five.into()], None)
        .unwrap();
    assert!(matches!(set, Instruction::Set(_)));
    assert_eq!(set.describe(&ir.platform), "counter = 5");

    let wrong = ir.make_bit_lit(true, None).unwrap();
    assert!(matches!(
        ir.make_instruction("set", vec![int_ref.into(), wrong.into()], None),
        Err(IrError::TypeMismatch(_))
    ));
}

#[test]
fn test_s5_wait_semantics() {
    let mut ir = s1_ir();
    let ten = ir.make_int_lit(10, None).unwrap();
    let full = ir.make_instruction("wait", vec![ten.into()], None).unwrap();
    let wait = full.as_wait().unwrap();
    assert_eq!(wait.duration, 10);
    assert!(wait.is_full_barrier());

    let ten = ir.make_int_lit(10, None).unwrap();
    let q0 = ir.make_qubit_ref(0).unwrap();
    let scoped = ir
        .make_instruction("wait", vec![ten.into(), q0.into()], None)
        .unwrap();
    let wait = scoped.as_wait().unwrap();
    assert_eq!(wait.objects.len(), 1);
    assert!(!wait.is_full_barrier());

    let negative = ir.make_int_lit(-1, None).unwrap();
    assert!(matches!(
        ir.make_instruction("wait", vec![negative.into()], None),
        Err(IrError::OutOfRangeLiteral { .. })
    ));
}

#[test]
fn test_conditional_rendering() {
    let mut ir = s1_ir();
    let q0 = ir.make_qubit_ref(0).unwrap();
    let flag = ir.make_bit_ref(2).unwrap();
    let x = ir
        .make_instruction("x", vec![q0.into()], Some(flag.into()))
        .unwrap();
    assert_eq!(x.describe(&ir.platform), "cond ((bit)qubits[2]) x qubit=qubits[0]");

    // The implicit true condition is elided.
    let q0 = ir.make_qubit_ref(0).unwrap();
    let x = ir.make_instruction("x", vec![q0.into()], None).unwrap();
    assert_eq!(x.describe(&ir.platform), "x qubit=qubits[0]");
}

#[test]
fn test_structured_control_flow_accesses() {
    let mut ir = s1_ir();
    let int = ir.platform.find_type("int").unwrap();
    let counter = ir
        .platform
        .add_physical_object(Object::scalar("counter", int))
        .unwrap();
    let flag_ref = ir.make_bit_ref(0).unwrap();

    // if (bit view of qubit 0) { x qubits[1] } else { x qubits[2] }
    let q1 = ir.make_qubit_ref(1).unwrap();
    let then_gate = ir.make_instruction("x", vec![q1.into()], None).unwrap();
    let q2 = ir.make_qubit_ref(2).unwrap();
    let else_gate = ir.make_instruction("x", vec![q2.into()], None).unwrap();
    let if_else = Statement::IfElse(IfElse {
        branches: vec![IfElseBranch {
            condition: flag_ref.clone().into(),
            body: SubBlock::from(vec![then_gate.into()]),
        }],
        otherwise: Some(SubBlock::from(vec![else_gate.into()])),
    });

    let mut accesses = ObjectAccesses::new();
    accesses.add_statement(&ir.platform, &if_else).unwrap();
    let q1 = ir.make_qubit_ref(1).unwrap();
    let q2 = ir.make_qubit_ref(2).unwrap();
    assert_eq!(mode_of(&accesses, &flag_ref), Some(AccessMode::Read));
    assert_eq!(mode_of(&accesses, &q1), Some(AccessMode::Write));
    assert_eq!(mode_of(&accesses, &q2), Some(AccessMode::Write));

    // for (counter = 0; flag; counter = counter) { x qubits[1] }
    let counter_ref = ir.make_reference(counter, &[]).unwrap();
    let zero = ir.make_int_lit(0, None).unwrap();
    let truthy = ir.make_bit_lit(true, None).unwrap();
    let initialize = SetInstruction {
        lhs: counter_ref.clone(),
        rhs: zero.into(),
        condition: Expression::from(truthy),
        cycle: 0,
    };
    let q1 = ir.make_qubit_ref(1).unwrap();
    let body_gate = ir.make_instruction("x", vec![q1.into()], None).unwrap();
    let for_loop = Statement::Loop(Loop::For(ForLoop {
        initialize: Some(Box::new(initialize)),
        condition: flag_ref.clone().into(),
        update: None,
        body: SubBlock::from(vec![body_gate.into()]),
    }));

    let mut accesses = ObjectAccesses::new();
    accesses.add_statement(&ir.platform, &for_loop).unwrap();
    assert_eq!(mode_of(&accesses, &counter_ref), Some(AccessMode::Write));
    assert_eq!(mode_of(&accesses, &flag_ref), Some(AccessMode::Read));
}

#[test]
fn test_block_duration() {
    let mut ir = s1_ir();

    // Two x gates scheduled at cycles 0 and 10, and a wait of 100 cycles
    // scheduled at cycle 5. The wait dominates.
    let q0 = ir.make_qubit_ref(0).unwrap();
    let mut first = ir.make_instruction("x", vec![q0.into()], None).unwrap();
    first.set_cycle(0);
    let q1 = ir.make_qubit_ref(1).unwrap();
    let mut second = ir.make_instruction("x", vec![q1.into()], None).unwrap();
    second.set_cycle(10);
    let hundred = ir.make_int_lit(100, None).unwrap();
    let mut wait = ir.make_instruction("wait", vec![hundred.into()], None).unwrap();
    wait.set_cycle(5);

    assert_eq!(ir.platform.duration_of(&first), 40);
    assert_eq!(ir.platform.duration_of(&wait), 100);

    let statements: Vec<Statement> = vec![first.into(), second.into(), wait.into()];
    assert_eq!(ir.platform.block_duration(&statements), 105);

    assert_eq!(ir.platform.block_duration(&[]), 0);
}

#[test]
fn test_temporaries_and_num_qubits() {
    let mut ir = s1_ir();
    assert_eq!(ir.platform.num_qubits(), 3);

    let int = ir.platform.find_type("int").unwrap();
    let temp = ir.make_temporary(int);
    let temp_ref = ir.make_reference(temp, &[]).unwrap();
    assert_eq!(temp_ref.describe(&ir.platform), "<anonymous>");
    assert_eq!(ir.program.temporaries.len(), 1);
}
