//! Type representation for the Lumen type system
//!
//! This module defines the semantic types manipulated by inference:
//! - Primitive constants and the bottom type `Never`
//! - Inference variables identified by globally unique ids
//! - Unary function types (all functions are unary after desugaring)
//! - Applied type constructors, structural records, nominal variants,
//!   mutable reference cells, and closed unions
//! - Polymorphic type schemes
//!
//! Inference variables carry only their id; the level at which a variable
//! was born lives in the inference context's side table, so types stay
//! freely cloneable while levels are updated in one place.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// A type inference variable, identified by a globally unique id
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TyVar(pub u64);

/// Primitive type constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Prim {
    /// 64-bit integer
    Int,
    /// 64-bit float
    Float,
    /// Immutable string
    String,
    /// Boolean
    Bool,
    /// Unit
    Unit,
}

impl Prim {
    /// The primitive's surface name
    pub fn name(&self) -> &'static str {
        match self {
            Prim::Int => "Int",
            Prim::Float => "Float",
            Prim::String => "String",
            Prim::Bool => "Bool",
            Prim::Unit => "Unit",
        }
    }
}

impl fmt::Display for Prim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The nominal name under which tuples are represented
///
/// Tuples are the built-in variant family of fixed arity; two tuple types
/// are equal iff their arities match and their components unify.
pub const TUPLE_NAME: &str = "Tuple";

/// A Lumen type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    /// An inference variable
    Var(TyVar),

    /// A primitive constant
    Prim(Prim),

    /// A named opaque type constant (external types)
    Con(String),

    /// The bottom type; unifies with anything
    Never,

    /// A unary function type
    Fun {
        /// Parameter type
        param: Box<Type>,
        /// Result type
        result: Box<Type>,
    },

    /// An applied type constructor (e.g. `Promise<Int>`)
    App {
        /// The constructor being applied
        ctor: Box<Type>,
        /// The arguments
        args: Vec<Type>,
    },

    /// A structural record type
    Record {
        /// Field types, keyed by field name
        fields: BTreeMap<String, Type>,
    },

    /// A nominal variant type applied to its type arguments
    Variant {
        /// The variant type's declared name
        name: String,
        /// Type arguments
        args: Vec<Type>,
    },

    /// A mutable reference cell
    Ref(Box<Type>),

    /// A closed set of alternatives
    Union(Vec<Type>),
}

impl Type {
    /// The `Int` type
    pub fn int() -> Type {
        Type::Prim(Prim::Int)
    }

    /// The `Float` type
    pub fn float() -> Type {
        Type::Prim(Prim::Float)
    }

    /// The `String` type
    pub fn string() -> Type {
        Type::Prim(Prim::String)
    }

    /// The `Bool` type
    pub fn bool() -> Type {
        Type::Prim(Prim::Bool)
    }

    /// The `Unit` type
    pub fn unit() -> Type {
        Type::Prim(Prim::Unit)
    }

    /// A unary function type
    pub fn fun(param: Type, result: Type) -> Type {
        Type::Fun {
            param: Box::new(param),
            result: Box::new(result),
        }
    }

    /// A curried function type over several parameters
    pub fn fun_chain(params: Vec<Type>, result: Type) -> Type {
        params
            .into_iter()
            .rev()
            .fold(result, |acc, p| Type::fun(p, acc))
    }

    /// A `List<elem>` type
    pub fn list(elem: Type) -> Type {
        Type::Variant {
            name: "List".to_string(),
            args: vec![elem],
        }
    }

    /// An `Option<elem>` type
    pub fn option(elem: Type) -> Type {
        Type::Variant {
            name: "Option".to_string(),
            args: vec![elem],
        }
    }

    /// A `Result<ok, err>` type
    pub fn result(ok: Type, err: Type) -> Type {
        Type::Variant {
            name: "Result".to_string(),
            args: vec![ok, err],
        }
    }

    /// A tuple type of the given components
    pub fn tuple(elems: Vec<Type>) -> Type {
        Type::Variant {
            name: TUPLE_NAME.to_string(),
            args: elems,
        }
    }

    /// A `Ref<inner>` type
    pub fn reference(inner: Type) -> Type {
        Type::Ref(Box::new(inner))
    }

    /// A record type from field pairs
    pub fn record(fields: Vec<(&str, Type)>) -> Type {
        Type::Record {
            fields: fields
                .into_iter()
                .map(|(name, ty)| (name.to_string(), ty))
                .collect(),
        }
    }

    /// Check if this is an inference variable
    pub fn is_var(&self) -> bool {
        matches!(self, Type::Var(_))
    }

    /// Check if this is a tuple type
    pub fn is_tuple(&self) -> bool {
        matches!(self, Type::Variant { name, .. } if name == TUPLE_NAME)
    }

    /// Number of parameters in the function spine of this type
    pub fn fun_arity(&self) -> usize {
        let mut arity = 0;
        let mut ty = self;
        while let Type::Fun { result, .. } = ty {
            arity += 1;
            ty = result;
        }
        arity
    }

    /// All inference variables occurring in this type
    pub fn free_vars(&self) -> BTreeSet<TyVar> {
        let mut vars = BTreeSet::new();
        self.collect_free_vars(&mut vars);
        vars
    }

    fn collect_free_vars(&self, vars: &mut BTreeSet<TyVar>) {
        match self {
            Type::Var(v) => {
                vars.insert(*v);
            }
            Type::Prim(_) | Type::Con(_) | Type::Never => {}
            Type::Fun { param, result } => {
                param.collect_free_vars(vars);
                result.collect_free_vars(vars);
            }
            Type::App { ctor, args } => {
                ctor.collect_free_vars(vars);
                for arg in args {
                    arg.collect_free_vars(vars);
                }
            }
            Type::Record { fields } => {
                for ty in fields.values() {
                    ty.collect_free_vars(vars);
                }
            }
            Type::Variant { args, .. } => {
                for arg in args {
                    arg.collect_free_vars(vars);
                }
            }
            Type::Ref(inner) => inner.collect_free_vars(vars),
            Type::Union(alts) => {
                for alt in alts {
                    alt.collect_free_vars(vars);
                }
            }
        }
    }

    /// Occurs check: does the variable occur anywhere in this type?
    pub fn contains_var(&self, var: TyVar) -> bool {
        match self {
            Type::Var(v) => *v == var,
            Type::Prim(_) | Type::Con(_) | Type::Never => false,
            Type::Fun { param, result } => {
                param.contains_var(var) || result.contains_var(var)
            }
            Type::App { ctor, args } => {
                ctor.contains_var(var) || args.iter().any(|a| a.contains_var(var))
            }
            Type::Record { fields } => fields.values().any(|t| t.contains_var(var)),
            Type::Variant { args, .. } => args.iter().any(|a| a.contains_var(var)),
            Type::Ref(inner) => inner.contains_var(var),
            Type::Union(alts) => alts.iter().any(|a| a.contains_var(var)),
        }
    }
}

/// A polymorphic type scheme: `∀ quantified. body`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheme {
    /// Universally quantified variable ids
    pub quantified: Vec<TyVar>,
    /// The scheme body
    pub body: Type,
}

impl Scheme {
    /// Create a monomorphic scheme
    pub fn mono(body: Type) -> Self {
        Scheme {
            quantified: Vec::new(),
            body,
        }
    }

    /// Create a polymorphic scheme
    pub fn poly(quantified: Vec<TyVar>, body: Type) -> Self {
        Scheme { quantified, body }
    }

    /// Whether the scheme quantifies any variables
    pub fn is_poly(&self) -> bool {
        !self.quantified.is_empty()
    }

    /// Variables free in the body and not bound by the scheme
    pub fn free_vars(&self) -> BTreeSet<TyVar> {
        let mut vars = self.body.free_vars();
        for v in &self.quantified {
            vars.remove(v);
        }
        vars
    }
}

// ── Pretty printing ────────────────────────────────────────────────────

/// Assigns stable display names (`a`, `b`, …, `a1`, …) to inference
/// variables within one printout. Raw ids never reach the user.
#[derive(Debug, Default)]
pub struct TypeNamer {
    names: HashMap<TyVar, String>,
    next: usize,
}

impl TypeNamer {
    /// Create an empty namer
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-assign names to a scheme's quantified variables, in order
    pub fn seed(&mut self, vars: &[TyVar]) {
        for v in vars {
            self.name(*v);
        }
    }

    /// The display name for a variable, assigning one if needed
    pub fn name(&mut self, var: TyVar) -> String {
        if let Some(name) = self.names.get(&var) {
            return name.clone();
        }
        let idx = self.next;
        self.next += 1;
        let letter = (b'a' + (idx % 26) as u8) as char;
        let suffix = idx / 26;
        let name = if suffix == 0 {
            letter.to_string()
        } else {
            format!("{}{}", letter, suffix)
        };
        self.names.insert(var, name.clone());
        name
    }
}

fn fmt_type<W: fmt::Write>(ty: &Type, f: &mut W, namer: &mut TypeNamer) -> fmt::Result {
    match ty {
        Type::Var(v) => write!(f, "{}", namer.name(*v)),
        Type::Prim(p) => write!(f, "{}", p),
        Type::Con(name) => write!(f, "{}", name),
        Type::Never => write!(f, "Never"),
        Type::Fun { param, result } => {
            // Parenthesize function parameters: (a -> b) -> c
            if matches!(**param, Type::Fun { .. }) {
                write!(f, "(")?;
                fmt_type(param, f, namer)?;
                write!(f, ")")?;
            } else {
                fmt_type(param, f, namer)?;
            }
            write!(f, " -> ")?;
            fmt_type(result, f, namer)
        }
        Type::App { ctor, args } => {
            fmt_type(ctor, f, namer)?;
            if !args.is_empty() {
                write!(f, "<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    fmt_type(arg, f, namer)?;
                }
                write!(f, ">")?;
            }
            Ok(())
        }
        Type::Record { fields } => {
            write!(f, "{{")?;
            for (i, (name, ty)) in fields.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: ", name)?;
                fmt_type(ty, f, namer)?;
            }
            write!(f, "}}")
        }
        Type::Variant { name, args } if name == TUPLE_NAME => {
            write!(f, "(")?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                fmt_type(arg, f, namer)?;
            }
            write!(f, ")")
        }
        Type::Variant { name, args } => {
            write!(f, "{}", name)?;
            if !args.is_empty() {
                write!(f, "<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    fmt_type(arg, f, namer)?;
                }
                write!(f, ">")?;
            }
            Ok(())
        }
        Type::Ref(inner) => {
            write!(f, "Ref<")?;
            fmt_type(inner, f, namer)?;
            write!(f, ">")
        }
        Type::Union(alts) => {
            for (i, alt) in alts.iter().enumerate() {
                if i > 0 {
                    write!(f, " | ")?;
                }
                fmt_type(alt, f, namer)?;
            }
            Ok(())
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut namer = TypeNamer::new();
        fmt_type(self, f, &mut namer)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut namer = TypeNamer::new();
        namer.seed(&self.quantified);
        fmt_type(&self.body, f, &mut namer)
    }
}

/// Render a variable and a type with a shared namer, so the same variable
/// gets the same display name in both (used for occurs-check messages)
pub fn render_cycle(var: TyVar, ty: &Type) -> (String, String) {
    let mut namer = TypeNamer::new();
    let var_name = namer.name(var);
    let mut rendered = String::new();
    // Writing into a String cannot fail.
    let _ = fmt_type(ty, &mut rendered, &mut namer);
    (var_name, rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_primitives() {
        assert_eq!(Type::int().to_string(), "Int");
        assert_eq!(Type::Never.to_string(), "Never");
        assert_eq!(Type::unit().to_string(), "Unit");
    }

    #[test]
    fn test_display_functions() {
        let f = Type::fun(Type::int(), Type::bool());
        assert_eq!(f.to_string(), "Int -> Bool");

        let higher = Type::fun(Type::fun(Type::int(), Type::int()), Type::int());
        assert_eq!(higher.to_string(), "(Int -> Int) -> Int");

        let curried = Type::fun_chain(vec![Type::int(), Type::string()], Type::bool());
        assert_eq!(curried.to_string(), "Int -> String -> Bool");
    }

    #[test]
    fn test_display_compounds() {
        assert_eq!(Type::list(Type::int()).to_string(), "List<Int>");
        assert_eq!(
            Type::tuple(vec![Type::int(), Type::string()]).to_string(),
            "(Int, String)"
        );
        assert_eq!(
            Type::record(vec![("x", Type::int()), ("y", Type::float())]).to_string(),
            "{x: Int, y: Float}"
        );
        assert_eq!(Type::reference(Type::int()).to_string(), "Ref<Int>");
    }

    #[test]
    fn test_display_never_prints_raw_ids() {
        let ty = Type::fun(Type::Var(TyVar(12345)), Type::Var(TyVar(12345)));
        assert_eq!(ty.to_string(), "a -> a");

        let two = Type::fun(Type::Var(TyVar(7)), Type::Var(TyVar(9)));
        assert_eq!(two.to_string(), "a -> b");
    }

    #[test]
    fn test_scheme_display_seeds_quantified() {
        let scheme = Scheme::poly(
            vec![TyVar(42)],
            Type::fun(Type::Var(TyVar(42)), Type::Var(TyVar(42))),
        );
        assert_eq!(scheme.to_string(), "a -> a");
    }

    #[test]
    fn test_free_vars() {
        let ty = Type::fun(Type::Var(TyVar(0)), Type::list(Type::Var(TyVar(1))));
        let vars = ty.free_vars();
        assert!(vars.contains(&TyVar(0)));
        assert!(vars.contains(&TyVar(1)));
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn test_scheme_free_vars() {
        let scheme = Scheme::poly(
            vec![TyVar(0)],
            Type::fun(Type::Var(TyVar(0)), Type::Var(TyVar(1))),
        );
        let free = scheme.free_vars();
        assert!(!free.contains(&TyVar(0)));
        assert!(free.contains(&TyVar(1)));
    }

    #[test]
    fn test_contains_var() {
        let ty = Type::list(Type::Var(TyVar(3)));
        assert!(ty.contains_var(TyVar(3)));
        assert!(!ty.contains_var(TyVar(4)));
    }

    #[test]
    fn test_fun_arity() {
        let ty = Type::fun_chain(vec![Type::int(), Type::int()], Type::bool());
        assert_eq!(ty.fun_arity(), 2);
        assert_eq!(Type::int().fun_arity(), 0);
    }

    #[test]
    fn test_serde_roundtrip() {
        let scheme = Scheme::poly(
            vec![TyVar(0)],
            Type::fun(Type::Var(TyVar(0)), Type::list(Type::Var(TyVar(0)))),
        );
        let json = serde_json::to_string(&scheme).unwrap();
        let back: Scheme = serde_json::from_str(&json).unwrap();
        assert_eq!(scheme, back);
    }

    #[test]
    fn test_render_cycle_shares_names() {
        let (var, ty) = render_cycle(TyVar(5), &Type::list(Type::Var(TyVar(5))));
        assert_eq!(var, "a");
        assert_eq!(ty, "List<a>");
    }
}
