//! Root of the IR tree.

use serde::{Deserialize, Serialize};

use crate::platform::Platform;
use crate::program::Program;

/// The root of an IR tree: a platform description plus the program being
/// compiled against it.
///
/// There is no ambient "current platform"; every builder and analysis takes
/// the root (or its platform) explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ir {
    /// The platform description.
    pub platform: Platform,
    /// The program.
    pub program: Program,
}

impl Ir {
    /// Creates an IR with an empty program for the given platform.
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            program: Program::default(),
        }
    }
}
