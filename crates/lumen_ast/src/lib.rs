//! lumen_ast - Lumen Core AST
//!
//! This crate defines the desugared tree ("Core AST") that the upstream
//! lexer/parser/desugarer pipeline hands to the type checker. It is the
//! input contract of the core:
//! - **Fully desugared**: unary lambdas, no `if`, no list sugar, no
//!   or-patterns, blocks as nested lets
//! - **Location tracking**: every node carries a source location
//! - **Machine-readable**: full serde support so tooling (and the `lumenc`
//!   driver) can ship modules as JSON
//!
//! # Node IDs
//!
//! Nodes reference each other via typed u32 ids into per-category arenas
//! owned by the [`Module`]. This keeps the tree serializable and avoids
//! pointer cycles; see [`builder::ModuleBuilder`] for the construction API.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod decl;
pub mod expr;
pub mod module;
pub mod pattern;
pub mod span;
pub mod ty;

pub use builder::ModuleBuilder;
pub use decl::{ConstructorDef, Decl, DeclKind, ExternalSig, TypeDefBody};
pub use expr::{BinOp, Expr, ExprId, ExprKind, Literal, MatchArm, RecBinding, UnaryOp};
pub use module::Module;
pub use pattern::{Pattern, PatternId, PatternKind};
pub use span::Location;
pub use ty::{TypeExpr, TypeExprId, TypeExprKind};
