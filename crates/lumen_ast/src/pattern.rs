//! Pattern nodes of the Core AST
//!
//! Patterns appear in lambda parameters, let bindings, and match arms.
//! Or-patterns do not appear here: the desugarer expands them into
//! separate match arms before the core runs.

use crate::expr::Literal;
use crate::span::Location;
use serde::{Deserialize, Serialize};

/// Pattern node ID (index into the module arena)
pub type PatternId = u32;

/// A pattern in the Core AST
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// The pattern kind
    pub kind: PatternKind,
    /// Source location
    pub loc: Location,
}

/// Pattern kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PatternKind {
    /// Wildcard pattern (`_`)
    Wildcard,

    /// Variable binding pattern (`x`)
    Var(String),

    /// Literal pattern (`42`, `"hi"`, `true`)
    Literal(Literal),

    /// Variant pattern (`Some(x)`, `Cons(h, t)`, `Nil`)
    Variant {
        /// Constructor name
        ctor: String,
        /// Sub-patterns for the constructor arguments
        args: Vec<PatternId>,
    },

    /// Record pattern (`{x, y: p}`); fields not listed are ignored
    Record {
        /// Field patterns, in source order
        fields: Vec<(String, PatternId)>,
    },

    /// Tuple pattern (`(a, b)`)
    Tuple(Vec<PatternId>),
}

impl Pattern {
    /// Whether this pattern matches any value of its type
    pub fn is_catch_all(&self) -> bool {
        matches!(self.kind, PatternKind::Wildcard | PatternKind::Var(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catch_all() {
        let wild = Pattern {
            kind: PatternKind::Wildcard,
            loc: Location::dummy(),
        };
        let var = Pattern {
            kind: PatternKind::Var("x".to_string()),
            loc: Location::dummy(),
        };
        let lit = Pattern {
            kind: PatternKind::Literal(Literal::Bool(true)),
            loc: Location::dummy(),
        };
        assert!(wild.is_catch_all());
        assert!(var.is_catch_all());
        assert!(!lit.is_catch_all());
    }
}
