//! Surface type expressions
//!
//! These are the types as they appear in annotations, external signatures,
//! and type definitions. They are syntax, not semantics: the checker's
//! conversion pass resolves names against the type environment and rejects
//! forms that are not supported in the given position (e.g. free type
//! variables inside annotations).

use crate::span::Location;
use serde::{Deserialize, Serialize};

/// Surface type node ID (index into the module arena)
pub type TypeExprId = u32;

/// A surface type expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeExpr {
    /// The type expression kind
    pub kind: TypeExprKind,
    /// Source location
    pub loc: Location,
}

/// Surface type expression kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeExprKind {
    /// Named type, possibly applied (`Int`, `List<Int>`, `Promise<a>`)
    Named {
        /// Type name
        name: String,
        /// Type arguments
        args: Vec<TypeExprId>,
    },

    /// Function arrow (`A -> B`)
    Fun {
        /// Parameter type
        param: TypeExprId,
        /// Result type
        result: TypeExprId,
    },

    /// Record type (`{x: Int, y: Float}`)
    Record {
        /// Field types, in source order
        fields: Vec<(String, TypeExprId)>,
    },

    /// Union type (`A | B`)
    Union {
        /// Alternatives, in source order
        alternatives: Vec<TypeExprId>,
    },

    /// Tuple type (`(Int, String)`)
    Tuple(Vec<TypeExprId>),

    /// Type variable (`a`); only legal inside type definition bodies
    Var(String),
}
