//! lumen_types - The Lumen type system
//!
//! Constraint-based Hindley-Milner inference for the Lumen Core AST,
//! with the extensions the language needs:
//! - **Level-based scoping** of inference variables for sound, fast
//!   generalization
//! - **The value restriction**: only syntactic values generalize, keeping
//!   mutable references sound
//! - **Width subtyping** for structural records (permissive direction
//!   only), **nominal** equality for variants
//! - **Occurs-checked unification** with `Never` as bottom
//! - **Matrix-based exhaustiveness** checking for match expressions
//!
//! # Architecture
//!
//! - `ty`: type representation, schemes, pretty printing
//! - `subst`: substitutions (chain-following apply, composition)
//! - `ctx`: the inference context (fresh ids, levels, substitution)
//! - `unify`: the unification algorithm
//! - `env` / `builtins`: environments and the seeded standard library
//! - `convert`: surface type expressions → types
//! - `infer`: the expression walker
//! - `pattern` / `exhaustive`: pattern checking and coverage
//! - `check`: the module driver
//! - `error`: the closed error taxonomy
//!
//! The main entry point is [`TypeChecker::check_module`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builtins;
pub mod check;
pub mod convert;
pub mod ctx;
pub mod env;
pub mod error;
pub mod exhaustive;
pub mod infer;
pub mod pattern;
pub mod subst;
pub mod ty;
pub mod unify;

pub use builtins::{builtin_env, Stdlib};
pub use check::{CheckOptions, CheckedModule, TypeChecker};
pub use ctx::InferCtx;
pub use env::{CtorDef, Overload, RecordDef, TypeDef, TypeEnv, ValueBinding, VariantDef};
pub use error::{TypeError, TypeResult};
pub use exhaustive::{check_exhaustive, PatternSkeleton};
pub use infer::is_syntactic_value;
pub use pattern::check_pattern;
pub use subst::{compose, Subst};
pub use ty::{Prim, Scheme, TyVar, Type};
