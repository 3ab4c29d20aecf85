//! Addressable data storage declared by the platform or program.

use serde::{Deserialize, Serialize};

use crate::arena::Handle;
use crate::types::DataTypeLink;

/// Link to an object in the object arena.
pub type ObjectLink = Handle<Object>;

/// Whether an object is platform-declared or program-scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Declared by the platform; named and registered.
    Physical,
    /// Allocated on demand by a program; anonymous.
    Temporary,
}

/// An addressable object: a scalar or dense tensor of elements of one data
/// type.
///
/// A zero-dimensional shape denotes a scalar; an n-dimensional shape denotes
/// a dense tensor with the given fixed extents. References address exactly
/// one element, so they must supply one index per shape dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    /// The object's name. Empty for temporaries.
    pub name: String,
    /// Element data type.
    pub data_type: DataTypeLink,
    /// Extent of each dimension. Empty for scalars.
    pub shape: Vec<u64>,
    /// Physical or temporary.
    pub kind: ObjectKind,
}

impl Object {
    /// Creates a named physical object with the given shape.
    pub fn physical(name: impl Into<String>, data_type: DataTypeLink, shape: Vec<u64>) -> Self {
        Self {
            name: name.into(),
            data_type,
            shape,
            kind: ObjectKind::Physical,
        }
    }

    /// Creates a named physical scalar.
    pub fn scalar(name: impl Into<String>, data_type: DataTypeLink) -> Self {
        Self::physical(name, data_type, vec![])
    }

    /// Creates an anonymous temporary scalar.
    pub fn temporary(data_type: DataTypeLink) -> Self {
        Self {
            name: String::new(),
            data_type,
            shape: vec![],
            kind: ObjectKind::Temporary,
        }
    }

    /// Whether this is a scalar (zero-dimensional) object.
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }
}
