//! Source location tracking for Core AST nodes
//!
//! Every node in the desugared tree carries a location so that type errors
//! can point back at the original source, even after the upstream desugarer
//! has rewritten the surface syntax.

use serde::{Deserialize, Serialize};

/// A location in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File ID (index into the module's file table)
    pub file_id: u32,
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed)
    pub column: u32,
    /// Byte offset from the start of the file
    pub offset: u32,
}

impl Location {
    /// Create a new location
    pub fn new(file_id: u32, line: u32, column: u32, offset: u32) -> Self {
        Self {
            file_id,
            line,
            column,
            offset,
        }
    }

    /// Create a dummy location (for generated nodes)
    pub fn dummy() -> Self {
        Self {
            file_id: 0,
            line: 0,
            column: 0,
            offset: 0,
        }
    }

    /// Whether this is a generated (dummy) location
    pub fn is_dummy(&self) -> bool {
        self.line == 0
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::dummy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_creation() {
        let loc = Location::new(0, 3, 7, 42);
        assert_eq!(loc.line, 3);
        assert_eq!(loc.column, 7);
        assert_eq!(loc.offset, 42);
        assert!(!loc.is_dummy());
    }

    #[test]
    fn test_dummy_location() {
        assert!(Location::dummy().is_dummy());
        assert!(Location::default().is_dummy());
    }
}
