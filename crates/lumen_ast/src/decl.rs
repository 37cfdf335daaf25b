//! Declaration nodes of the Core AST
//!
//! A module is a sequence of declarations: let bindings, mutually recursive
//! groups, external (JavaScript interop) declarations, external type
//! declarations, type definitions, and exports. The overload resolver runs
//! upstream, so overloaded externals arrive already grouped.

use crate::expr::{ExprId, RecBinding};
use crate::pattern::PatternId;
use crate::span::Location;
use crate::ty::TypeExprId;
use serde::{Deserialize, Serialize};

/// A top-level declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decl {
    /// The declaration kind
    pub kind: DeclKind,
    /// Source location
    pub loc: Location,
}

/// The signature of one external function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalSig {
    /// Declared type
    pub ty: TypeExprId,
    /// Name of the JavaScript function the external binds to
    pub js_name: String,
}

/// One constructor of a variant type definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorDef {
    /// Constructor name
    pub name: String,
    /// Parameter types
    pub params: Vec<TypeExprId>,
    /// Source location
    pub loc: Location,
}

/// Body of a type definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeDefBody {
    /// Variant (sum) type: a list of constructors
    Variant(Vec<ConstructorDef>),
    /// Record type: a list of named fields
    Record(Vec<(String, TypeExprId)>),
}

/// Declaration kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeclKind {
    /// Top-level let binding
    Let {
        /// Bound pattern
        pattern: PatternId,
        /// Bound value
        value: ExprId,
        /// Whether the binding may refer to itself
        recursive: bool,
        /// Whether the binding is mutable
        mutable: bool,
    },

    /// Mutually recursive group of top-level bindings
    LetRecGroup {
        /// The bindings, in source order
        bindings: Vec<RecBinding>,
    },

    /// External function declaration
    External {
        /// Bound name
        name: String,
        /// Type and JavaScript target
        sig: ExternalSig,
    },

    /// Overloaded external declaration (grouped by arity upstream)
    ExternalOverload {
        /// Bound name
        name: String,
        /// One signature per arity
        overloads: Vec<ExternalSig>,
    },

    /// External (opaque) type declaration
    ExternalType {
        /// Type name
        name: String,
        /// Number of type parameters
        arity: usize,
    },

    /// User type definition (variant or record)
    TypeDef {
        /// Type name
        name: String,
        /// Type parameter names
        params: Vec<String>,
        /// Definition body
        body: TypeDefBody,
    },

    /// Export list
    Export {
        /// Exported names
        names: Vec<String>,
    },
}
