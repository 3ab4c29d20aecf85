//! Conventional default gate set.
//!
//! Registers the usual gate vocabulary as plain instruction types, so a
//! platform is usable without an external platform file. A loader may still
//! override or extend any of these; the registry treats them like any other
//! instruction type.

use tracing::debug;

use crate::error::{IrError, IrResult};
use crate::itype::{InstructionType, OperandType};
use crate::platform::Platform;
use crate::prim::AccessMode;

/// Cycle count of single-qubit gates.
const SINGLE_QUBIT_CYCLES: u64 = 40;
/// Cycle count of two-qubit gates.
const TWO_QUBIT_CYCLES: u64 = 80;
/// Cycle count of the three-qubit toffoli.
const TOFFOLI_CYCLES: u64 = 160;
/// Cycle count of measurement.
const MEASURE_CYCLES: u64 = 40;
/// Cycle count of state preparation.
const PREP_CYCLES: u64 = 20;

/// Registers the default gate set on a platform.
///
/// Requires data types named `qubit` and `real` to exist. Rotation gates
/// take their angle as a literal real operand. Commutation modes follow the
/// gates' axes: `x`/`rx` commute along X, `y`/`ry` along Y, the phase
/// family and both `cz` operands along Z, and the `cnot` control commutes
/// along Z while its target commutes along X.
pub fn register_default_gates(platform: &mut Platform) -> IrResult<()> {
    let qubit = platform.find_type("qubit").ok_or_else(|| IrError::UnknownName {
        role: "data type",
        name: "qubit".into(),
    })?;
    let real = platform.find_type("real").ok_or_else(|| IrError::UnknownName {
        role: "data type",
        name: "real".into(),
    })?;

    let one_qubit = |mode: AccessMode| vec![OperandType::new(mode, qubit)];
    let rotation = |mode: AccessMode| {
        vec![
            OperandType::new(mode, qubit),
            OperandType::new(AccessMode::Literal, real),
        ]
    };

    let gates = [
        ("i", one_qubit(AccessMode::Write), SINGLE_QUBIT_CYCLES),
        ("h", one_qubit(AccessMode::Write), SINGLE_QUBIT_CYCLES),
        ("x", one_qubit(AccessMode::CommuteX), SINGLE_QUBIT_CYCLES),
        ("y", one_qubit(AccessMode::CommuteY), SINGLE_QUBIT_CYCLES),
        ("z", one_qubit(AccessMode::CommuteZ), SINGLE_QUBIT_CYCLES),
        ("s", one_qubit(AccessMode::CommuteZ), SINGLE_QUBIT_CYCLES),
        ("sdag", one_qubit(AccessMode::CommuteZ), SINGLE_QUBIT_CYCLES),
        ("t", one_qubit(AccessMode::CommuteZ), SINGLE_QUBIT_CYCLES),
        ("tdag", one_qubit(AccessMode::CommuteZ), SINGLE_QUBIT_CYCLES),
        ("rx", rotation(AccessMode::CommuteX), SINGLE_QUBIT_CYCLES),
        ("ry", rotation(AccessMode::CommuteY), SINGLE_QUBIT_CYCLES),
        ("rz", rotation(AccessMode::CommuteZ), SINGLE_QUBIT_CYCLES),
        ("prep_z", one_qubit(AccessMode::Write), PREP_CYCLES),
        ("measure", one_qubit(AccessMode::Measure), MEASURE_CYCLES),
        (
            "cnot",
            vec![
                OperandType::new(AccessMode::CommuteZ, qubit),
                OperandType::new(AccessMode::CommuteX, qubit),
            ],
            TWO_QUBIT_CYCLES,
        ),
        (
            "cz",
            vec![
                OperandType::new(AccessMode::CommuteZ, qubit),
                OperandType::new(AccessMode::CommuteZ, qubit),
            ],
            TWO_QUBIT_CYCLES,
        ),
        (
            "swap",
            vec![
                OperandType::new(AccessMode::Write, qubit),
                OperandType::new(AccessMode::Write, qubit),
            ],
            TWO_QUBIT_CYCLES,
        ),
        (
            "toffoli",
            vec![
                OperandType::new(AccessMode::CommuteZ, qubit),
                OperandType::new(AccessMode::CommuteZ, qubit),
                OperandType::new(AccessMode::CommuteX, qubit),
            ],
            TOFFOLI_CYCLES,
        ),
    ];

    for (name, operand_types, duration) in gates {
        platform.add_instruction_type(
            InstructionType::new(name)
                .with_operand_types(operand_types)
                .with_duration(duration),
            &[],
        )?;
    }
    debug!("registered default gate set");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    fn platform_with_gates() -> Platform {
        let mut platform = Platform::new("default");
        platform.add_data_type(DataType::qubit("qubit")).unwrap();
        platform.add_data_type(DataType::real("real")).unwrap();
        register_default_gates(&mut platform).unwrap();
        platform
    }

    #[test]
    fn test_default_gates_resolve() {
        let platform = platform_with_gates();
        let qubit = platform.find_type("qubit").unwrap();
        let real = platform.find_type("real").unwrap();

        let h = platform.find_instruction_type("h", &[qubit]).unwrap();
        assert_eq!(platform.instruction_type(h).duration, 40);

        let rz = platform.find_instruction_type("rz", &[qubit, real]).unwrap();
        assert_eq!(
            platform.instruction_type(rz).operand_types[1].mode,
            AccessMode::Literal
        );

        let cnot = platform.find_instruction_type("cnot", &[qubit, qubit]).unwrap();
        let modes: Vec<_> = platform
            .instruction_type(cnot)
            .operand_types
            .iter()
            .map(|o| o.mode)
            .collect();
        assert_eq!(modes, vec![AccessMode::CommuteZ, AccessMode::CommuteX]);
        assert_eq!(platform.instruction_type(cnot).duration, 80);

        let toffoli = platform
            .find_instruction_type("toffoli", &[qubit, qubit, qubit])
            .unwrap();
        assert_eq!(platform.instruction_type(toffoli).duration, 160);
    }

    #[test]
    fn test_missing_types_reported() {
        let mut platform = Platform::new("incomplete");
        platform.add_data_type(DataType::qubit("qubit")).unwrap();
        assert!(register_default_gates(&mut platform).is_err());
    }
}
