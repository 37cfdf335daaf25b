//! Type environment
//!
//! Maps value names to bindings (plain values, externals, overloaded
//! externals) and type names to definitions (primitives, variants,
//! records, external opaque types). Environments are extended by
//! copy-on-write: scoping derives a new environment instead of mutating a
//! shared one, which keeps reasoning simple at an acceptable allocation
//! cost.

use crate::ctx::InferCtx;
use crate::subst::Subst;
use crate::ty::{Scheme, TyVar, Type};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// How a value name is bound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueBinding {
    /// An ordinary value with its (possibly polymorphic) scheme
    Value(Scheme),
    /// An external function bound to a JavaScript name
    External {
        /// The declared scheme
        scheme: Scheme,
        /// The JavaScript function it compiles to
        js_name: String,
    },
    /// An overloaded external, one signature per arity
    ExternalOverload(Vec<Overload>),
}

impl ValueBinding {
    /// The binding's scheme, when it has exactly one
    pub fn scheme(&self) -> Option<&Scheme> {
        match self {
            ValueBinding::Value(scheme) | ValueBinding::External { scheme, .. } => Some(scheme),
            ValueBinding::ExternalOverload(_) => None,
        }
    }
}

/// One arity of an overloaded external
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overload {
    /// Number of parameters
    pub arity: usize,
    /// The declared scheme
    pub scheme: Scheme,
    /// The JavaScript function it compiles to
    pub js_name: String,
}

/// One constructor of a variant definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtorDef {
    /// Constructor name
    pub name: String,
    /// Parameter types, expressed over the definition's template variables
    pub params: Vec<Type>,
}

/// A variant (sum) type definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantDef {
    /// The type's declared name
    pub name: String,
    /// Template variables standing for the type parameters
    pub params: Vec<TyVar>,
    /// The constructors
    pub ctors: Vec<CtorDef>,
}

impl VariantDef {
    /// Instantiate the definition with fresh variables at the current
    /// level. Returns the fresh argument types and the mapping from
    /// template variables to them (for rewriting constructor parameters).
    pub fn instantiate(&self, ctx: &mut InferCtx) -> (Vec<Type>, Subst) {
        let mut mapping = Subst::new();
        let mut args = Vec::with_capacity(self.params.len());
        for param in &self.params {
            let fresh = ctx.fresh_var();
            mapping.insert(*param, fresh.clone());
            args.push(fresh);
        }
        (args, mapping)
    }

    /// Look up a constructor by name
    pub fn ctor(&self, name: &str) -> Option<&CtorDef> {
        self.ctors.iter().find(|c| c.name == name)
    }
}

/// A named record type definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDef {
    /// The type's declared name
    pub name: String,
    /// Template variables standing for the type parameters
    pub params: Vec<TyVar>,
    /// Field types, expressed over the template variables
    pub fields: BTreeMap<String, Type>,
}

/// How a type name is bound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeDef {
    /// A built-in primitive constant
    Prim(Type),
    /// A user-defined variant type
    Variant(VariantDef),
    /// A user-defined record type (an alias for its structural record)
    Record(RecordDef),
    /// An external opaque type of the given arity
    External {
        /// Number of type parameters
        arity: usize,
    },
}

/// The type environment
#[derive(Debug, Clone, Default)]
pub struct TypeEnv {
    values: HashMap<String, ValueBinding>,
    types: HashMap<String, TypeDef>,
    /// Constructor name → owning variant type name
    ctors: HashMap<String, String>,
}

impl TypeEnv {
    /// Create an empty environment
    pub fn new() -> Self {
        Self::default()
    }

    // ── Values ──────────────────────────────────────────────────────────

    /// Derive a new environment with one extra value binding
    pub fn with_value(&self, name: impl Into<String>, binding: ValueBinding) -> Self {
        let mut env = self.clone();
        env.values.insert(name.into(), binding);
        env
    }

    /// Derive a new environment with several extra monomorphic bindings
    pub fn with_mono_values(&self, bindings: &[(String, Type)]) -> Self {
        let mut env = self.clone();
        for (name, ty) in bindings {
            env.values.insert(
                name.clone(),
                ValueBinding::Value(Scheme::mono(ty.clone())),
            );
        }
        env
    }

    /// Derive a new environment with several extra scheme bindings
    pub fn with_schemes(&self, bindings: &[(String, Scheme)]) -> Self {
        let mut env = self.clone();
        for (name, scheme) in bindings {
            env.values
                .insert(name.clone(), ValueBinding::Value(scheme.clone()));
        }
        env
    }

    /// Insert a value binding in place (used by the module driver, which
    /// owns its environment)
    pub fn insert_value(&mut self, name: impl Into<String>, binding: ValueBinding) {
        self.values.insert(name.into(), binding);
    }

    /// Look up a value binding
    pub fn lookup_value(&self, name: &str) -> Option<&ValueBinding> {
        self.values.get(name)
    }

    /// All value names currently in scope (for suggestions)
    pub fn value_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    // ── Types ───────────────────────────────────────────────────────────

    /// Insert a type definition in place
    pub fn insert_type(&mut self, name: impl Into<String>, def: TypeDef) {
        self.types.insert(name.into(), def);
    }

    /// Look up a type definition
    pub fn lookup_type(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    // ── Constructors ────────────────────────────────────────────────────

    /// Record which variant type owns a constructor
    pub fn register_ctor(&mut self, ctor: impl Into<String>, type_name: impl Into<String>) {
        self.ctors.insert(ctor.into(), type_name.into());
    }

    /// Whether a constructor name is registered
    pub fn has_ctor(&self, name: &str) -> bool {
        self.ctors.contains_key(name)
    }

    /// Look up a constructor: the owning variant definition and the
    /// constructor itself
    pub fn lookup_ctor(&self, name: &str) -> Option<(&VariantDef, &CtorDef)> {
        let type_name = self.ctors.get(name)?;
        match self.types.get(type_name)? {
            TypeDef::Variant(def) => def.ctor(name).map(|c| (def, c)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_on_write_extension() {
        let env = TypeEnv::new();
        let env2 = env.with_value("x", ValueBinding::Value(Scheme::mono(Type::int())));
        assert!(env2.lookup_value("x").is_some());
        // The original environment is unchanged.
        assert!(env.lookup_value("x").is_none());
    }

    #[test]
    fn test_ctor_lookup() {
        let mut ctx = InferCtx::new();
        let a = ctx.fresh_ty_var();
        let mut env = TypeEnv::new();
        env.insert_type(
            "Option",
            TypeDef::Variant(VariantDef {
                name: "Option".to_string(),
                params: vec![a],
                ctors: vec![
                    CtorDef {
                        name: "Some".to_string(),
                        params: vec![Type::Var(a)],
                    },
                    CtorDef {
                        name: "None".to_string(),
                        params: vec![],
                    },
                ],
            }),
        );
        env.register_ctor("Some", "Option");
        env.register_ctor("None", "Option");

        let (def, ctor) = env.lookup_ctor("Some").unwrap();
        assert_eq!(def.name, "Option");
        assert_eq!(ctor.params.len(), 1);
        assert!(env.lookup_ctor("Whatever").is_none());
    }

    #[test]
    fn test_variant_instantiation_is_fresh() {
        let mut ctx = InferCtx::new();
        let a = ctx.fresh_ty_var();
        let def = VariantDef {
            name: "Option".to_string(),
            params: vec![a],
            ctors: vec![],
        };
        let (args1, _) = def.instantiate(&mut ctx);
        let (args2, _) = def.instantiate(&mut ctx);
        assert_ne!(args1, args2);
    }
}
