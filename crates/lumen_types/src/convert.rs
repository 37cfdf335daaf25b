//! Surface type conversion
//!
//! Turns the AST's surface type expressions into semantic types, resolving
//! names against the environment. Two positions exist:
//! - annotations and external signatures, where type variables are not
//!   supported
//! - type definition bodies, where the definition's declared parameters
//!   are in scope

use crate::env::{TypeDef, TypeEnv};
use crate::error::{TypeError, TypeResult};
use crate::subst::Subst;
use crate::ty::{TyVar, Type};
use lumen_ast::{Module, TypeExprId, TypeExprKind};
use std::collections::HashMap;

/// Where the surface type appears, which decides whether type variables
/// are legal
pub enum TypeVarScope<'a> {
    /// Annotations and external signatures: variables are an error
    Forbidden,
    /// Type definition bodies: the declared parameters are in scope
    Params(&'a HashMap<String, TyVar>),
}

/// Convert a type annotation (type variables rejected)
pub fn convert_annotation(env: &TypeEnv, module: &Module, id: TypeExprId) -> TypeResult<Type> {
    convert_type_expr(env, module, id, &TypeVarScope::Forbidden)
}

/// Convert a surface type expression in the given variable scope
pub fn convert_type_expr(
    env: &TypeEnv,
    module: &Module,
    id: TypeExprId,
    scope: &TypeVarScope<'_>,
) -> TypeResult<Type> {
    let node = module.type_expr(id);
    let loc = node.loc;

    match &node.kind {
        TypeExprKind::Named { name, args } => {
            let converted: Vec<Type> = args
                .iter()
                .map(|arg| convert_type_expr(env, module, *arg, scope))
                .collect::<TypeResult<_>>()?;
            convert_named(env, name, converted, loc)
        }

        TypeExprKind::Fun { param, result } => {
            let param = convert_type_expr(env, module, *param, scope)?;
            let result = convert_type_expr(env, module, *result, scope)?;
            Ok(Type::fun(param, result))
        }

        TypeExprKind::Record { fields } => {
            let mut converted = std::collections::BTreeMap::new();
            for (name, ty) in fields {
                let ty = convert_type_expr(env, module, *ty, scope)?;
                converted.insert(name.clone(), ty);
            }
            Ok(Type::Record { fields: converted })
        }

        TypeExprKind::Union { alternatives } => {
            let alts = alternatives
                .iter()
                .map(|alt| convert_type_expr(env, module, *alt, scope))
                .collect::<TypeResult<_>>()?;
            Ok(Type::Union(alts))
        }

        TypeExprKind::Tuple(elems) => {
            let elems = elems
                .iter()
                .map(|e| convert_type_expr(env, module, *e, scope))
                .collect::<TypeResult<_>>()?;
            Ok(Type::tuple(elems))
        }

        TypeExprKind::Var(name) => match scope {
            TypeVarScope::Forbidden => Err(TypeError::TypeVarNotSupported {
                name: name.clone(),
                loc,
            }),
            TypeVarScope::Params(params) => match params.get(name) {
                Some(var) => Ok(Type::Var(*var)),
                None => Err(TypeError::UndefinedType {
                    name: name.clone(),
                    loc,
                }),
            },
        },
    }
}

fn convert_named(
    env: &TypeEnv,
    name: &str,
    args: Vec<Type>,
    loc: lumen_ast::Location,
) -> TypeResult<Type> {
    // `Ref` is a built-in unary type constructor rather than an env entry.
    if name == "Ref" {
        if args.len() != 1 {
            return Err(arity_error(name, 1, args.len(), loc));
        }
        let mut args = args;
        return Ok(Type::Ref(Box::new(args.remove(0))));
    }

    match env.lookup_type(name) {
        Some(TypeDef::Prim(ty)) => {
            if !args.is_empty() {
                return Err(arity_error(name, 0, args.len(), loc));
            }
            Ok(ty.clone())
        }
        Some(TypeDef::Variant(def)) => {
            if args.len() != def.params.len() {
                return Err(arity_error(name, def.params.len(), args.len(), loc));
            }
            Ok(Type::Variant {
                name: def.name.clone(),
                args,
            })
        }
        Some(TypeDef::Record(def)) => {
            if args.len() != def.params.len() {
                return Err(arity_error(name, def.params.len(), args.len(), loc));
            }
            // A named record is an alias for its structural expansion.
            let mut mapping = Subst::new();
            for (param, arg) in def.params.iter().zip(args) {
                mapping.insert(*param, arg);
            }
            let fields = def
                .fields
                .iter()
                .map(|(name, ty)| (name.clone(), mapping.apply(ty)))
                .collect();
            Ok(Type::Record { fields })
        }
        Some(TypeDef::External { arity }) => {
            if args.len() != *arity {
                return Err(arity_error(name, *arity, args.len(), loc));
            }
            if args.is_empty() {
                Ok(Type::Con(name.to_string()))
            } else {
                Ok(Type::App {
                    ctor: Box::new(Type::Con(name.to_string())),
                    args,
                })
            }
        }
        None => Err(TypeError::UndefinedType {
            name: name.to_string(),
            loc,
        }),
    }
}

fn arity_error(name: &str, expected: usize, actual: usize, loc: lumen_ast::Location) -> TypeError {
    TypeError::ConstructorArity {
        name: name.to_string(),
        expected,
        actual,
        loc,
    }
}
