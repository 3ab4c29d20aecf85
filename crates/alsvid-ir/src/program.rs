//! Program structure: named blocks of statements plus program-scoped
//! temporaries.

use serde::{Deserialize, Serialize};

use crate::object::ObjectLink;
use crate::stmt::Statement;

/// A named top-level block. Goto instructions target blocks by their index
/// in the owning program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Name of the block. May be empty.
    pub name: String,
    /// The statements, in program order.
    pub statements: Vec<Statement>,
}

impl Block {
    /// Creates an empty named block.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            statements: vec![],
        }
    }
}

/// A program: an ordered list of blocks plus the temporary objects
/// allocated while building it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Name of the program. May be empty.
    pub name: String,
    /// Index of the block execution starts in.
    pub entry: usize,
    /// The blocks.
    pub blocks: Vec<Block>,
    /// Temporary objects scoped to this program, in allocation order.
    pub temporaries: Vec<ObjectLink>,
}

impl Program {
    /// Creates an empty program.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Appends a block and returns its index.
    pub fn add_block(&mut self, block: Block) -> usize {
        self.blocks.push(block);
        self.blocks.len() - 1
    }
}
