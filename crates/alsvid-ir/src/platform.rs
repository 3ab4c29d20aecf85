//! Platform registry: the data types, objects, functions, and instruction
//! types legal in a program.
//!
//! Each registry is an arena plus a name-sorted index vector. Lookups are
//! binary searches over the index (`partition_point` is the lower-bound
//! operation), so iteration order is deterministic and lookups are
//! O(log n). Registries are append-only: a link handed out once stays valid
//! for the lifetime of the IR.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::arena::Arena;
use crate::describe::Describe;
use crate::error::{IrError, IrResult};
use crate::expr::Expression;
use crate::itype::{
    FunctionType, FunctionTypeLink, InstructionType, InstructionTypeLink, OperandType,
};
use crate::object::{Object, ObjectKind, ObjectLink};
use crate::prim::{self, AccessMode};
use crate::stmt::{CustomInstruction, Instruction, Statement};
use crate::types::{DataType, DataTypeLink};

/// Whether two operand prototypes take the same positional data types.
/// Access modes are ignored; two entries with equal names and equal
/// positional types are the same overload.
fn same_signature(a: &[OperandType], b: &[OperandType]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.data_type == y.data_type)
}

/// Whether an operand prototype takes exactly the given positional types.
fn signature_matches(operand_types: &[OperandType], types: &[DataTypeLink]) -> bool {
    operand_types.len() == types.len()
        && operand_types.iter().zip(types).all(|(o, &t)| o.data_type == t)
}

/// The platform description: everything a program may legally refer to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Platform {
    /// Name of the platform. May be empty.
    pub name: String,

    data_types: Arena<DataType>,
    data_type_index: Vec<DataTypeLink>,

    objects: Arena<Object>,
    object_index: Vec<ObjectLink>,

    functions: Arena<FunctionType>,
    function_index: Vec<FunctionTypeLink>,

    instructions: Arena<InstructionType>,
    instruction_index: Vec<InstructionTypeLink>,

    /// The main qubit register: a distinguished one-dimensional object of
    /// qubit type.
    pub qubits: Option<ObjectLink>,
    /// Type of the measurement bit implicitly associated with each qubit in
    /// the main register, if the platform has such bits.
    pub implicit_bit_type: Option<DataTypeLink>,
    /// Integer type used by literal builders when no type is given.
    pub default_int_type: Option<DataTypeLink>,
    /// Bit type used for default (always-true) instruction conditions.
    pub default_bit_type: Option<DataTypeLink>,
}

impl Platform {
    /// Creates an empty platform.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The data type behind a link.
    pub fn data_type(&self, link: DataTypeLink) -> &DataType {
        &self.data_types[link]
    }

    /// The object behind a link.
    pub fn object(&self, link: ObjectLink) -> &Object {
        &self.objects[link]
    }

    /// The function type behind a link.
    pub fn function_type(&self, link: FunctionTypeLink) -> &FunctionType {
        &self.functions[link]
    }

    /// The instruction type behind a link.
    pub fn instruction_type(&self, link: InstructionTypeLink) -> &InstructionType {
        &self.instructions[link]
    }

    /// Data types in name order.
    pub fn data_types(&self) -> impl Iterator<Item = (DataTypeLink, &DataType)> {
        self.data_type_index.iter().map(|&h| (h, &self.data_types[h]))
    }

    /// Physical objects in name order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectLink, &Object)> {
        self.object_index.iter().map(|&h| (h, &self.objects[h]))
    }

    /// Function types in name order.
    pub fn function_types(&self) -> impl Iterator<Item = (FunctionTypeLink, &FunctionType)> {
        self.function_index.iter().map(|&h| (h, &self.functions[h]))
    }

    /// Generalized (root) instruction types in name order. Specializations
    /// are reached through their roots.
    pub fn instruction_types(&self) -> impl Iterator<Item = (InstructionTypeLink, &InstructionType)> {
        self.instruction_index
            .iter()
            .map(|&h| (h, &self.instructions[h]))
    }

    /// Allocates an object without registering it by name. Used for
    /// program-scoped temporaries.
    pub(crate) fn alloc_object(&mut self, object: Object) -> ObjectLink {
        self.objects.alloc(object)
    }

    /// Extent of the main qubit register, or zero if the platform has none.
    pub fn num_qubits(&self) -> u64 {
        self.qubits
            .map(|q| self.objects[q].shape.first().copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Adds a data type to the platform.
    ///
    /// Errors if the name is not a valid identifier or is already in use.
    pub fn add_data_type(&mut self, data_type: DataType) -> IrResult<DataTypeLink> {
        if !prim::is_identifier(&data_type.name) {
            return Err(IrError::InvalidName {
                role: "data type",
                name: data_type.name,
            });
        }
        let pos = self
            .data_type_index
            .partition_point(|&h| self.data_types[h].name < data_type.name);
        if let Some(&h) = self.data_type_index.get(pos) {
            if self.data_types[h].name == data_type.name {
                return Err(IrError::DuplicateDefinition {
                    role: "data type",
                    description: data_type.name,
                });
            }
        }
        debug!(name = %data_type.name, "adding data type");
        let link = self.data_types.alloc(data_type);
        self.data_type_index.insert(pos, link);
        Ok(link)
    }

    /// Returns the data type with the given name, if it exists.
    pub fn find_type(&self, name: &str) -> Option<DataTypeLink> {
        let pos = self
            .data_type_index
            .partition_point(|&h| self.data_types[h].name.as_str() < name);
        match self.data_type_index.get(pos) {
            Some(&h) if self.data_types[h].name == name => Some(h),
            _ => None,
        }
    }

    /// Adds a physical object (register) to the platform.
    ///
    /// Errors if the name is not a valid identifier or is already in use.
    pub fn add_physical_object(&mut self, object: Object) -> IrResult<ObjectLink> {
        if object.kind != ObjectKind::Physical {
            return Err(IrError::InternalConsistency(
                "only physical objects can be registered on the platform".into(),
            ));
        }
        if !prim::is_identifier(&object.name) {
            return Err(IrError::InvalidName {
                role: "register",
                name: object.name,
            });
        }
        let pos = self
            .object_index
            .partition_point(|&h| self.objects[h].name < object.name);
        if let Some(&h) = self.object_index.get(pos) {
            if self.objects[h].name == object.name {
                return Err(IrError::DuplicateDefinition {
                    role: "register",
                    description: object.name,
                });
            }
        }
        debug!(name = %object.name, "adding physical object");
        let link = self.objects.alloc(object);
        self.object_index.insert(pos, link);
        Ok(link)
    }

    /// Returns the physical object with the given name, if it exists.
    pub fn find_physical_object(&self, name: &str) -> Option<ObjectLink> {
        let pos = self
            .object_index
            .partition_point(|&h| self.objects[h].name.as_str() < name);
        match self.object_index.get(pos) {
            Some(&h) if self.objects[h].name == name => Some(h),
            _ => None,
        }
    }

    /// Adds a function type to the platform. Duplicate names are fine as
    /// long as the positional operand types differ.
    ///
    /// Errors if the name is neither a valid identifier nor an `operator`
    /// spelling, or if an overload with the same signature already exists.
    pub fn add_function_type(&mut self, function_type: FunctionType) -> IrResult<FunctionTypeLink> {
        if !prim::is_identifier(&function_type.name)
            && !function_type.name.starts_with("operator")
        {
            return Err(IrError::InvalidName {
                role: "function type",
                name: function_type.name,
            });
        }
        let mut pos = self
            .function_index
            .partition_point(|&h| self.functions[h].name < function_type.name);
        while let Some(&h) = self.function_index.get(pos) {
            if self.functions[h].name != function_type.name {
                break;
            }
            if same_signature(&self.functions[h].operand_types, &function_type.operand_types) {
                return Err(IrError::DuplicateDefinition {
                    role: "function type",
                    description: self.functions[h].describe(self),
                });
            }
            pos += 1;
        }
        let link = self.functions.alloc(function_type);
        self.function_index.insert(pos, link);
        Ok(link)
    }

    /// Finds the function overload with the given name and positional
    /// operand types.
    pub fn find_function_type(
        &self,
        name: &str,
        types: &[DataTypeLink],
    ) -> Option<FunctionTypeLink> {
        let start = self
            .function_index
            .partition_point(|&h| self.functions[h].name.as_str() < name);
        self.function_index[start..]
            .iter()
            .copied()
            .take_while(|&h| self.functions[h].name == name)
            .find(|&h| signature_matches(&self.functions[h].operand_types, types))
    }

    /// Climbs the specialization tree to its fully generalized root.
    pub fn root_generalization(&self, mut link: InstructionTypeLink) -> InstructionTypeLink {
        while let Some(parent) = self.instructions[link].generalization {
            link = parent;
        }
        link
    }

    /// Adds an instruction type to the platform, or returns the matching
    /// existing specialization without changing anything. The incoming type
    /// must be fully generalized; template operands are supplied separately
    /// and the specialization tree is grown to hold them. The boolean is
    /// `true` iff anything was added.
    fn add_or_find_instruction_type(
        &mut self,
        mut instruction_type: InstructionType,
        template_operands: &[Expression],
    ) -> IrResult<(InstructionTypeLink, bool)> {
        if !instruction_type.is_generalized() || !instruction_type.specializations.is_empty() {
            return Err(IrError::InternalConsistency(
                "instruction type to add must be fully generalized".into(),
            ));
        }
        if !prim::is_identifier(&instruction_type.name) {
            return Err(IrError::InvalidName {
                role: "instruction type",
                name: instruction_type.name,
            });
        }

        // Find an existing overload with the same name and signature, or the
        // sorted position to insert one at.
        let pos = self
            .instruction_index
            .partition_point(|&h| self.instructions[h].name < instruction_type.name);
        let existing = self.instruction_index[pos..]
            .iter()
            .copied()
            .take_while(|&h| self.instructions[h].name == instruction_type.name)
            .find(|&h| {
                same_signature(
                    &self.instructions[h].operand_types,
                    &instruction_type.operand_types,
                )
            });

        let mut added_anything = false;
        let root = match existing {
            None => {
                // The decompositions belong on the final, most specialized
                // node only; the registered root starts without them.
                let mut root = instruction_type.clone();
                root.decompositions.clear();
                debug!(name = %root.name, "adding instruction type");
                let link = self.instructions.alloc(root);
                self.instruction_index.insert(pos, link);
                added_anything = true;
                link
            }
            Some(link) => {
                // The first registration of an overload defines the
                // canonical access modes; copy them onto the incoming type
                // so any specializations built from it agree.
                for i in 0..instruction_type.operand_types.len() {
                    instruction_type.operand_types[i].mode =
                        self.instructions[link].operand_types[i].mode;
                }
                link
            }
        };

        // Descend through (or grow) the specialization tree, one template
        // operand at a time.
        let mut cur = root;
        for (depth, operand) in template_operands.iter().enumerate() {
            let known = self.instructions[cur]
                .specializations
                .iter()
                .copied()
                .find(|&s| self.instructions[s].template_operands.last() == Some(operand));
            if let Some(spec) = known {
                cur = spec;
                continue;
            }

            let mut spec = instruction_type.clone();
            spec.decompositions.clear();
            for template in &template_operands[..=depth] {
                if spec.operand_types.is_empty() {
                    return Err(IrError::OperandArity(format!(
                        "instruction type {} has more template operands than operand types",
                        spec.name,
                    )));
                }
                let removed = spec.operand_types.remove(0);
                if removed.data_type != self.type_of(template) {
                    return Err(IrError::TypeMismatch(format!(
                        "template operand type does not match operand type of instruction {}",
                        spec.name,
                    )));
                }
                spec.template_operands.push(template.clone());
            }
            spec.generalization = Some(cur);
            let link = self.instructions.alloc(spec);
            self.instructions[cur].specializations.push(link);
            added_anything = true;
            cur = link;
        }

        // Attach the decomposition rules to the most specialized node.
        if added_anything {
            self.instructions[cur].decompositions = instruction_type.decompositions;
        }

        Ok((cur, added_anything))
    }

    /// Adds an instruction type (with optional template operands growing
    /// the specialization tree) to the platform.
    ///
    /// Errors if a matching specialization of a matching overload already
    /// exists.
    pub fn add_instruction_type(
        &mut self,
        instruction_type: InstructionType,
        template_operands: &[Expression],
    ) -> IrResult<InstructionTypeLink> {
        let (link, added) =
            self.add_or_find_instruction_type(instruction_type, template_operands)?;
        if !added {
            return Err(IrError::DuplicateDefinition {
                role: "instruction type",
                description: self.instructions[link].describe(self),
            });
        }
        Ok(link)
    }

    /// Adds a decomposition rule. The carrier instruction type is created
    /// if it did not already exist; otherwise the incoming type's rules
    /// extend the existing node's rule list.
    pub fn add_decomposition_rule(
        &mut self,
        instruction_type: InstructionType,
        template_operands: &[Expression],
    ) -> IrResult<InstructionTypeLink> {
        let decompositions = instruction_type.decompositions.clone();
        let (link, added) =
            self.add_or_find_instruction_type(instruction_type, template_operands)?;
        if !added {
            self.instructions[link].decompositions.extend(decompositions);
        }
        Ok(link)
    }

    /// Finds the generalized instruction type with the given name and
    /// positional operand types.
    pub fn find_instruction_type(
        &self,
        name: &str,
        types: &[DataTypeLink],
    ) -> Option<InstructionTypeLink> {
        let start = self
            .instruction_index
            .partition_point(|&h| self.instructions[h].name.as_str() < name);
        self.instruction_index[start..]
            .iter()
            .copied()
            .take_while(|&h| self.instructions[h].name == name)
            .find(|&h| signature_matches(&self.instructions[h].operand_types, types))
    }

    /// Like [`Platform::find_instruction_type`], but when only the name
    /// matches, a new overload is generated for the requested types
    /// (conservatively all write-mode) based on the first entry with that
    /// name. Returns `None` only when no instruction with the name exists
    /// at all.
    pub fn find_instruction_type_or_overload(
        &mut self,
        name: &str,
        types: &[DataTypeLink],
    ) -> Option<InstructionTypeLink> {
        if let Some(link) = self.find_instruction_type(name, types) {
            return Some(link);
        }
        let start = self
            .instruction_index
            .partition_point(|&h| self.instructions[h].name.as_str() < name);
        let mut end = start;
        while end < self.instruction_index.len()
            && self.instructions[self.instruction_index[end]].name == name
        {
            end += 1;
        }
        if end == start {
            return None;
        }

        // Build the overload fresh from the first entry's metadata; the
        // existing entry's specializations are meaningless for a different
        // signature and are not carried over.
        let first = &self.instructions[self.instruction_index[start]];
        let overload = InstructionType {
            name: first.name.clone(),
            cqasm_name: first.cqasm_name.clone(),
            operand_types: types
                .iter()
                .map(|&t| OperandType::new(AccessMode::Write, t))
                .collect(),
            template_operands: vec![],
            generalization: None,
            specializations: vec![],
            decompositions: vec![],
            duration: first.duration,
        };
        debug!(name = %name, "generating instruction overload");
        let link = self.instructions.alloc(overload);
        // Insert just after the other entries with this name to keep the
        // index sorted.
        self.instruction_index.insert(end, link);
        Some(link)
    }

    /// Returns the data type of (or returned by) an expression.
    pub fn type_of(&self, expr: &Expression) -> DataTypeLink {
        match expr {
            Expression::Literal(l) => l.data_type(),
            Expression::Reference(r) => r.data_type,
            Expression::FunctionCall(c) => self.functions[c.function_type].return_type,
        }
    }

    /// Number of qubit-typed operand positions in a custom instruction's
    /// prototype. Nonzero means the instruction is a quantum gate.
    pub fn num_qubit_operands(&self, instruction: &CustomInstruction) -> usize {
        self.instructions[instruction.instruction_type]
            .operand_types
            .iter()
            .filter(|o| self.data_types[o.data_type].is_qubit())
            .count()
    }

    /// Duration of an instruction in cycles. Zero for everything that is
    /// neither a custom instruction nor a wait.
    pub fn duration_of(&self, instruction: &Instruction) -> u64 {
        match instruction {
            Instruction::Custom(c) => self.instructions[c.instruction_type].duration,
            Instruction::Wait(w) => w.duration,
            Instruction::Set(_)
            | Instruction::Goto(_)
            | Instruction::Source { .. }
            | Instruction::Sink { .. }
            | Instruction::Dummy { .. } => 0,
        }
    }

    /// Duration of a block in cycles: the maximum over its instructions of
    /// scheduled cycle plus duration. Structured sub-blocks count as zero.
    pub fn block_duration(&self, statements: &[Statement]) -> u64 {
        statements
            .iter()
            .filter_map(Statement::as_instruction)
            .map(|i| i.cycle() + self.duration_of(i))
            .max()
            .unwrap_or(0)
    }
}
