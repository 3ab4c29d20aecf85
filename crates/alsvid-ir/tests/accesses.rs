//! Integration tests for object-access analysis and reference remapping.

use alsvid_ir::gates::register_default_gates;
use alsvid_ir::{
    AccessMode, AccessRef, DataType, Describe, Ir, Object, ObjectAccesses, Platform, Reference,
    ReferenceRemapper, Statement,
};
use rustc_hash::FxHashMap;

/// Helper: a platform with the default gate set and a four-qubit register.
fn bootstrap_ir() -> Ir {
    let mut platform = Platform::new("test");
    let qubit = platform.add_data_type(DataType::qubit("qubit")).unwrap();
    let bit = platform.add_data_type(DataType::bit("bit")).unwrap();
    let int = platform
        .add_data_type(DataType::int("int", 64, true))
        .unwrap();
    platform.add_data_type(DataType::real("real")).unwrap();
    let qubits = platform
        .add_physical_object(Object::physical("qubits", qubit, vec![4]))
        .unwrap();
    platform.qubits = Some(qubits);
    platform.implicit_bit_type = Some(bit);
    platform.default_int_type = Some(int);
    platform.default_bit_type = Some(bit);
    register_default_gates(&mut platform).unwrap();
    Ir::new(platform)
}

fn mode_of(accesses: &ObjectAccesses, reference: &Reference) -> Option<AccessMode> {
    accesses.get().get(&AccessRef::from(reference)).copied()
}

fn synthetic_mode(accesses: &ObjectAccesses) -> Option<AccessMode> {
    accesses.get().get(&AccessRef::barrier()).copied()
}

// ============================================================================
// Commutation across statements (S3)
// ============================================================================

#[test]
fn test_cz_chain_keeps_z_commutation() {
    let mut ir = bootstrap_ir();
    let mut statements: Vec<Statement> = vec![];
    for (a, b) in [(0, 1), (1, 2)] {
        let qa = ir.make_qubit_ref(a).unwrap();
        let qb = ir.make_qubit_ref(b).unwrap();
        statements.push(
            ir.make_instruction("cz", vec![qa.into(), qb.into()], None)
                .unwrap()
                .into(),
        );
    }

    // Per statement: both operands commute along Z.
    let mut accesses = ObjectAccesses::new();
    accesses.add_statement(&ir.platform, &statements[0]).unwrap();
    let q0 = ir.make_qubit_ref(0).unwrap();
    let q1 = ir.make_qubit_ref(1).unwrap();
    assert_eq!(mode_of(&accesses, &q0), Some(AccessMode::CommuteZ));
    assert_eq!(mode_of(&accesses, &q1), Some(AccessMode::CommuteZ));

    // Merged over both statements, the shared qubit stays Z-commuting and
    // the synthetic accesses between the gates are reads.
    let mut accesses = ObjectAccesses::new();
    accesses.add_block(&ir.platform, &statements).unwrap();
    let q2 = ir.make_qubit_ref(2).unwrap();
    assert_eq!(mode_of(&accesses, &q0), Some(AccessMode::CommuteZ));
    assert_eq!(mode_of(&accesses, &q1), Some(AccessMode::CommuteZ));
    assert_eq!(mode_of(&accesses, &q2), Some(AccessMode::CommuteZ));
    assert_eq!(synthetic_mode(&accesses), Some(AccessMode::Read));
}

#[test]
fn test_cnot_mixes_axes_on_shared_qubit() {
    let mut ir = bootstrap_ir();
    let mut statements: Vec<Statement> = vec![];
    for (a, b) in [(0, 1), (1, 2)] {
        let qa = ir.make_qubit_ref(a).unwrap();
        let qb = ir.make_qubit_ref(b).unwrap();
        statements.push(
            ir.make_instruction("cnot", vec![qa.into(), qb.into()], None)
                .unwrap()
                .into(),
        );
    }

    // qubit 1 is the X-commuting target of the first gate and the
    // Z-commuting control of the second: the modes differ and collapse.
    let mut accesses = ObjectAccesses::new();
    accesses.add_block(&ir.platform, &statements).unwrap();
    let q1 = ir.make_qubit_ref(1).unwrap();
    assert_eq!(mode_of(&accesses, &q1), Some(AccessMode::Write));
}

// ============================================================================
// Barrier separation
// ============================================================================

#[test]
fn test_barrier_separates_reads() {
    let mut ir = bootstrap_ir();
    let q0 = ir.make_qubit_ref(0).unwrap();
    let gate: Statement = ir
        .make_instruction("z", vec![q0.into()], None)
        .unwrap()
        .into();
    let duration = ir.make_int_lit(0, None).unwrap();
    let barrier: Statement = ir
        .make_instruction("wait", vec![duration.into()], None)
        .unwrap()
        .into();

    // Statement-by-statement, the gates end in synthetic reads and the
    // barrier in a synthetic write separating them.
    let mut accesses = ObjectAccesses::new();
    let mut synthetic = vec![];
    for statement in [&gate, &barrier, &gate] {
        accesses.reset();
        accesses.add_statement(&ir.platform, statement).unwrap();
        synthetic.push(synthetic_mode(&accesses).unwrap());
    }
    assert_eq!(
        synthetic,
        vec![AccessMode::Read, AccessMode::Write, AccessMode::Read]
    );
}

#[test]
fn test_scoped_barrier_writes_its_objects() {
    // Scenario S6: a barrier on two qubits is a zero-duration wait that
    // writes both references; only empty-object waits act as full
    // barriers.
    let mut ir = bootstrap_ir();
    let q0 = ir.make_qubit_ref(0).unwrap();
    let q1 = ir.make_qubit_ref(1).unwrap();
    let barrier = ir
        .make_instruction("barrier", vec![q0.clone().into(), q1.clone().into()], None)
        .unwrap();
    let wait = barrier.as_wait().unwrap();
    assert_eq!(wait.duration, 0);
    assert_eq!(wait.objects.len(), 2);

    let mut accesses = ObjectAccesses::new();
    accesses
        .add_statement(&ir.platform, &barrier.clone().into())
        .unwrap();
    assert_eq!(mode_of(&accesses, &q0), Some(AccessMode::Write));
    assert_eq!(mode_of(&accesses, &q1), Some(AccessMode::Write));
    assert_eq!(synthetic_mode(&accesses), Some(AccessMode::Read));
}

// ============================================================================
// Reference remapping
// ============================================================================

#[test]
fn test_remap_rewrites_every_reference() {
    let mut ir = bootstrap_ir();
    let int = ir.platform.find_type("int").unwrap();
    let a = ir
        .platform
        .add_physical_object(Object::scalar("a", int))
        .unwrap();
    let b = ir
        .platform
        .add_physical_object(Object::scalar("b", int))
        .unwrap();

    // a = 1; z qubits[0]; a = a (reads and writes a in one statement).
    let lhs = ir.make_reference(a, &[]).unwrap();
    let one = ir.make_int_lit(1, None).unwrap();
    let set1: Statement = ir
        .make_set_instruction(lhs.clone().into(), one.into(), None)
        .unwrap()
        .into();
    let q0 = ir.make_qubit_ref(0).unwrap();
    let gate: Statement = ir
        .make_instruction("z", vec![q0.into()], None)
        .unwrap()
        .into();
    let set2: Statement = ir
        .make_set_instruction(lhs.clone().into(), lhs.into(), None)
        .unwrap()
        .into();
    let mut statements = vec![set1, gate, set2];
    let before = statements.len();

    let mut map = FxHashMap::default();
    map.insert(a, b);
    ReferenceRemapper::new(map).remap_block(&mut statements);

    assert_eq!(statements.len(), before);
    assert_eq!(statements[0].describe(&ir.platform), "b = 1");
    assert_eq!(statements[2].describe(&ir.platform), "b = b");

    // The analysis agrees: only b is accessed, a is untouched.
    let mut accesses = ObjectAccesses::new();
    accesses.add_block(&ir.platform, &statements).unwrap();
    let a_ref = ir.make_reference(a, &[]).unwrap();
    let b_ref = ir.make_reference(b, &[]).unwrap();
    assert_eq!(mode_of(&accesses, &a_ref), None);
    assert_eq!(mode_of(&accesses, &b_ref), Some(AccessMode::Write));
}

#[test]
fn test_remap_leaves_unrelated_targets_alone() {
    let mut ir = bootstrap_ir();
    let int = ir.platform.find_type("int").unwrap();
    let a = ir
        .platform
        .add_physical_object(Object::scalar("a", int))
        .unwrap();
    let b = ir
        .platform
        .add_physical_object(Object::scalar("b", int))
        .unwrap();

    let q0 = ir.make_qubit_ref(0).unwrap();
    let mut statement: Statement = ir
        .make_instruction("z", vec![q0.into()], None)
        .unwrap()
        .into();
    let rendered = statement.describe(&ir.platform);

    let mut map = FxHashMap::default();
    map.insert(a, b);
    ReferenceRemapper::new(map).remap_statement(&mut statement);
    assert_eq!(statement.describe(&ir.platform), rendered);
}
