//! Pattern checking
//!
//! Walks a pattern, unifying its shape with the expected (scrutinee) type
//! and collecting the variable bindings it introduces. Bindings are
//! returned in traversal order; binding the same name twice in one
//! pattern is an error.

use crate::ctx::InferCtx;
use crate::env::TypeEnv;
use crate::error::{TypeError, TypeResult};
use crate::ty::Type;
use lumen_ast::{Literal, Location, Module, PatternId, PatternKind};

/// Check a pattern against the expected type, returning the variable
/// bindings it introduces
pub fn check_pattern(
    ctx: &mut InferCtx,
    env: &TypeEnv,
    module: &Module,
    pattern: PatternId,
    expected: &Type,
) -> TypeResult<Vec<(String, Type)>> {
    let mut bindings = Vec::new();
    walk(ctx, env, module, pattern, expected, &mut bindings)?;
    Ok(bindings)
}

/// The names a pattern binds, in traversal order (no type checking)
pub fn pattern_names(module: &Module, pattern: PatternId) -> Vec<String> {
    let mut names = Vec::new();
    collect_names(module, pattern, &mut names);
    names
}

fn collect_names(module: &Module, pattern: PatternId, names: &mut Vec<String>) {
    match &module.pattern(pattern).kind {
        PatternKind::Wildcard | PatternKind::Literal(_) => {}
        PatternKind::Var(name) => names.push(name.clone()),
        PatternKind::Variant { args, .. } => {
            for arg in args {
                collect_names(module, *arg, names);
            }
        }
        PatternKind::Record { fields } => {
            for (_, sub) in fields {
                collect_names(module, *sub, names);
            }
        }
        PatternKind::Tuple(elems) => {
            for elem in elems {
                collect_names(module, *elem, names);
            }
        }
    }
}

fn walk(
    ctx: &mut InferCtx,
    env: &TypeEnv,
    module: &Module,
    pattern: PatternId,
    expected: &Type,
    bindings: &mut Vec<(String, Type)>,
) -> TypeResult<()> {
    let node = module.pattern(pattern);
    let loc = node.loc;

    match &node.kind {
        PatternKind::Wildcard => Ok(()),

        PatternKind::Var(name) => {
            add_binding(bindings, name, expected.clone(), loc)?;
            Ok(())
        }

        PatternKind::Literal(lit) => {
            let lit_ty = literal_type(lit);
            ctx.unify(&lit_ty, expected, loc)
        }

        PatternKind::Variant { ctor, args } => {
            let (def, ctor_def) = match env.lookup_ctor(ctor) {
                Some(found) => found,
                None => {
                    return Err(TypeError::UndefinedConstructor {
                        name: ctor.clone(),
                        loc,
                    })
                }
            };
            if ctor_def.params.len() != args.len() {
                return Err(TypeError::ConstructorArity {
                    name: ctor.clone(),
                    expected: ctor_def.params.len(),
                    actual: args.len(),
                    loc,
                });
            }

            // Clone out of the env so the instantiation below can borrow
            // the context mutably.
            let type_name = def.name.clone();
            let param_templates = ctor_def.params.clone();
            let (fresh_args, mapping) = def.instantiate(ctx);

            let result = Type::Variant {
                name: type_name,
                args: fresh_args,
            };
            ctx.unify(&result, expected, loc)?;

            for (sub, param) in args.iter().zip(param_templates.iter()) {
                let param_ty = mapping.apply(param);
                walk(ctx, env, module, *sub, &param_ty, bindings)?;
            }
            Ok(())
        }

        PatternKind::Record { fields } => {
            // The pattern's fields form the minimum the scrutinee must
            // provide; extra fields on the scrutinee are fine.
            let mut minimum = std::collections::BTreeMap::new();
            let mut field_vars = Vec::with_capacity(fields.len());
            for (name, _) in fields {
                let var = ctx.fresh_var();
                minimum.insert(name.clone(), var.clone());
                field_vars.push(var);
            }
            ctx.subsume(expected, &Type::Record { fields: minimum }, loc)?;

            for ((_, sub), var) in fields.iter().zip(field_vars.iter()) {
                let field_ty = ctx.resolve(var);
                walk(ctx, env, module, *sub, &field_ty, bindings)?;
            }
            Ok(())
        }

        PatternKind::Tuple(elems) => {
            let elem_vars: Vec<Type> = elems.iter().map(|_| ctx.fresh_var()).collect();
            let tuple_ty = Type::tuple(elem_vars.clone());
            ctx.unify(&tuple_ty, expected, loc)?;

            for (sub, var) in elems.iter().zip(elem_vars.iter()) {
                let elem_ty = ctx.resolve(var);
                walk(ctx, env, module, *sub, &elem_ty, bindings)?;
            }
            Ok(())
        }
    }
}

fn add_binding(
    bindings: &mut Vec<(String, Type)>,
    name: &str,
    ty: Type,
    loc: Location,
) -> TypeResult<()> {
    if bindings.iter().any(|(existing, _)| existing == name) {
        return Err(TypeError::DuplicatePatternBinding {
            name: name.to_string(),
            loc,
        });
    }
    bindings.push((name.to_string(), ty));
    Ok(())
}

/// The primitive type of a literal
pub fn literal_type(lit: &Literal) -> Type {
    match lit {
        Literal::Int(_) => Type::int(),
        Literal::Float(_) => Type::float(),
        Literal::String(_) => Type::string(),
        Literal::Bool(_) => Type::bool(),
        Literal::Unit => Type::unit(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::{builtin_env, Stdlib};
    use lumen_ast::ModuleBuilder;

    fn setup() -> (InferCtx, TypeEnv) {
        let mut ctx = InferCtx::new();
        let env = builtin_env(&mut ctx, Stdlib::Minimal);
        (ctx, env)
    }

    #[test]
    fn test_var_pattern_binds() {
        let (mut ctx, env) = setup();
        let mut b = ModuleBuilder::new("t.lm");
        let p = b.p_var("x");
        let module = b.finish();

        let bindings = check_pattern(&mut ctx, &env, &module, p, &Type::int()).unwrap();
        assert_eq!(bindings, vec![("x".to_string(), Type::int())]);
    }

    #[test]
    fn test_wildcard_matches_anything() {
        let (mut ctx, env) = setup();
        let mut b = ModuleBuilder::new("t.lm");
        let p = b.p_wildcard();
        let module = b.finish();

        let bindings =
            check_pattern(&mut ctx, &env, &module, p, &Type::list(Type::string())).unwrap();
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_literal_pattern_constrains() {
        let (mut ctx, env) = setup();
        let mut b = ModuleBuilder::new("t.lm");
        let p = b.p_int(0);
        let module = b.finish();

        let scrutinee = ctx.fresh_var();
        check_pattern(&mut ctx, &env, &module, p, &scrutinee).unwrap();
        assert_eq!(ctx.resolve(&scrutinee), Type::int());
    }

    #[test]
    fn test_variant_pattern_instantiates() {
        let (mut ctx, env) = setup();
        let mut b = ModuleBuilder::new("t.lm");
        let inner = b.p_var("x");
        let p = b.p_variant("Some", &[inner]);
        let module = b.finish();

        let bindings =
            check_pattern(&mut ctx, &env, &module, p, &Type::option(Type::int())).unwrap();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].0, "x");
        assert_eq!(ctx.resolve(&bindings[0].1), Type::int());
    }

    #[test]
    fn test_variant_pattern_arity() {
        let (mut ctx, env) = setup();
        let mut b = ModuleBuilder::new("t.lm");
        let p = b.p_variant("Some", &[]);
        let module = b.finish();

        let err = check_pattern(&mut ctx, &env, &module, p, &Type::option(Type::int()))
            .unwrap_err();
        assert!(matches!(err, TypeError::ConstructorArity { .. }));
    }

    #[test]
    fn test_unknown_constructor() {
        let (mut ctx, env) = setup();
        let mut b = ModuleBuilder::new("t.lm");
        let p = b.p_variant("Whatever", &[]);
        let module = b.finish();

        let err = check_pattern(&mut ctx, &env, &module, p, &Type::int()).unwrap_err();
        assert!(matches!(err, TypeError::UndefinedConstructor { .. }));
    }

    #[test]
    fn test_duplicate_binding_rejected() {
        let (mut ctx, env) = setup();
        let mut b = ModuleBuilder::new("t.lm");
        let x1 = b.p_var("x");
        let x2 = b.p_var("x");
        let p = b.p_tuple(&[x1, x2]);
        let module = b.finish();

        let expected = Type::tuple(vec![Type::int(), Type::int()]);
        let err = check_pattern(&mut ctx, &env, &module, p, &expected).unwrap_err();
        assert!(matches!(err, TypeError::DuplicatePatternBinding { .. }));
    }

    #[test]
    fn test_record_pattern_width() {
        let (mut ctx, env) = setup();
        let mut b = ModuleBuilder::new("t.lm");
        let px = b.p_var("x");
        let p = b.p_record(&[("x", px)]);
        let module = b.finish();

        // The scrutinee has more fields than the pattern names.
        let scrutinee = Type::record(vec![("x", Type::int()), ("y", Type::bool())]);
        let bindings = check_pattern(&mut ctx, &env, &module, p, &scrutinee).unwrap();
        assert_eq!(bindings[0].0, "x");
        assert_eq!(ctx.resolve(&bindings[0].1), Type::int());
    }

    #[test]
    fn test_tuple_pattern() {
        let (mut ctx, env) = setup();
        let mut b = ModuleBuilder::new("t.lm");
        let pa = b.p_var("a");
        let pb = b.p_var("b");
        let p = b.p_tuple(&[pa, pb]);
        let module = b.finish();

        let expected = Type::tuple(vec![Type::int(), Type::string()]);
        let bindings = check_pattern(&mut ctx, &env, &module, p, &expected).unwrap();
        assert_eq!(ctx.resolve(&bindings[0].1), Type::int());
        assert_eq!(ctx.resolve(&bindings[1].1), Type::string());
    }

    #[test]
    fn test_pattern_names() {
        let mut b = ModuleBuilder::new("t.lm");
        let px = b.p_var("x");
        let py = b.p_var("y");
        let p = b.p_variant("Cons", &[px, py]);
        let module = b.finish();

        assert_eq!(pattern_names(&module, p), vec!["x", "y"]);
    }
}
