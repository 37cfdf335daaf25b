//! Built-in environment
//!
//! Seeds the environment every module starts from: primitive type
//! constants, the generic `List`/`Option`/`Result` variants with their
//! constructors, `panic`, `ref`, and the standard library roster selected
//! by [`Stdlib`]. User declarations extend this environment and must not
//! overwrite anything seeded here.

use crate::ctx::InferCtx;
use crate::env::{CtorDef, TypeDef, TypeEnv, ValueBinding, VariantDef};
use crate::ty::{Prim, Scheme, Type};

/// Which standard library roster to seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stdlib {
    /// Constructors, `panic`, `ref`, and `not` only
    Minimal,
    /// The full polymorphic roster over lists, options, results, and
    /// strings
    #[default]
    Full,
}

/// Build the environment seeded into every module
pub fn builtin_env(ctx: &mut InferCtx, stdlib: Stdlib) -> TypeEnv {
    let mut env = TypeEnv::new();

    register_prims(&mut env);
    register_list(ctx, &mut env);
    register_option(ctx, &mut env);
    register_result(ctx, &mut env);

    // panic : String -> Never
    env.insert_value(
        "panic",
        ValueBinding::Value(Scheme::mono(Type::fun(Type::string(), Type::Never))),
    );

    // ref : ∀a. a -> Ref<a>
    let a = ctx.fresh_ty_var();
    env.insert_value(
        "ref",
        ValueBinding::Value(Scheme::poly(
            vec![a],
            Type::fun(Type::Var(a), Type::reference(Type::Var(a))),
        )),
    );

    // not : Bool -> Bool
    env.insert_value(
        "not",
        ValueBinding::Value(Scheme::mono(Type::fun(Type::bool(), Type::bool()))),
    );

    if stdlib == Stdlib::Full {
        register_full_roster(ctx, &mut env);
    }

    env
}

fn register_prims(env: &mut TypeEnv) {
    for prim in [Prim::Int, Prim::Float, Prim::String, Prim::Bool, Prim::Unit] {
        env.insert_type(prim.name(), TypeDef::Prim(Type::Prim(prim)));
    }
    env.insert_type("Never", TypeDef::Prim(Type::Never));
}

/// `List<a> = Cons(a, List<a>) | Nil`
fn register_list(ctx: &mut InferCtx, env: &mut TypeEnv) {
    let a = ctx.fresh_ty_var();
    let elem = Type::Var(a);
    let list = Type::list(elem.clone());

    env.insert_type(
        "List",
        TypeDef::Variant(VariantDef {
            name: "List".to_string(),
            params: vec![a],
            ctors: vec![
                CtorDef {
                    name: "Cons".to_string(),
                    params: vec![elem.clone(), list.clone()],
                },
                CtorDef {
                    name: "Nil".to_string(),
                    params: vec![],
                },
            ],
        }),
    );
    env.register_ctor("Cons", "List");
    env.register_ctor("Nil", "List");

    env.insert_value(
        "Cons",
        ValueBinding::Value(Scheme::poly(
            vec![a],
            Type::fun_chain(vec![elem, list.clone()], list.clone()),
        )),
    );
    env.insert_value("Nil", ValueBinding::Value(Scheme::poly(vec![a], list)));
}

/// `Option<a> = Some(a) | None`
fn register_option(ctx: &mut InferCtx, env: &mut TypeEnv) {
    let a = ctx.fresh_ty_var();
    let elem = Type::Var(a);
    let option = Type::option(elem.clone());

    env.insert_type(
        "Option",
        TypeDef::Variant(VariantDef {
            name: "Option".to_string(),
            params: vec![a],
            ctors: vec![
                CtorDef {
                    name: "Some".to_string(),
                    params: vec![elem.clone()],
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

    env.insert_value(
        "Some",
        ValueBinding::Value(Scheme::poly(vec![a], Type::fun(elem, option.clone()))),
    );
    env.insert_value("None", ValueBinding::Value(Scheme::poly(vec![a], option)));
}

/// `Result<a, e> = Ok(a) | Err(e)`
fn register_result(ctx: &mut InferCtx, env: &mut TypeEnv) {
    let a = ctx.fresh_ty_var();
    let e = ctx.fresh_ty_var();
    let ok_ty = Type::Var(a);
    let err_ty = Type::Var(e);
    let result = Type::result(ok_ty.clone(), err_ty.clone());

    env.insert_type(
        "Result",
        TypeDef::Variant(VariantDef {
            name: "Result".to_string(),
            params: vec![a, e],
            ctors: vec![
                CtorDef {
                    name: "Ok".to_string(),
                    params: vec![ok_ty.clone()],
                },
                CtorDef {
                    name: "Err".to_string(),
                    params: vec![err_ty.clone()],
                },
            ],
        }),
    );
    env.register_ctor("Ok", "Result");
    env.register_ctor("Err", "Result");

    env.insert_value(
        "Ok",
        ValueBinding::Value(Scheme::poly(vec![a, e], Type::fun(ok_ty, result.clone()))),
    );
    env.insert_value(
        "Err",
        ValueBinding::Value(Scheme::poly(vec![a, e], Type::fun(err_ty, result))),
    );
}

fn register_full_roster(ctx: &mut InferCtx, env: &mut TypeEnv) {
    // List functions
    {
        let (a, b) = (ctx.fresh_ty_var(), ctx.fresh_ty_var());
        let (va, vb) = (Type::Var(a), Type::Var(b));
        env.insert_value(
            "map",
            ValueBinding::Value(Scheme::poly(
                vec![a, b],
                Type::fun_chain(
                    vec![Type::fun(va.clone(), vb.clone()), Type::list(va)],
                    Type::list(vb),
                ),
            )),
        );
    }
    {
        let a = ctx.fresh_ty_var();
        let va = Type::Var(a);
        env.insert_value(
            "filter",
            ValueBinding::Value(Scheme::poly(
                vec![a],
                Type::fun_chain(
                    vec![Type::fun(va.clone(), Type::bool()), Type::list(va.clone())],
                    Type::list(va),
                ),
            )),
        );
    }
    {
        let (a, b) = (ctx.fresh_ty_var(), ctx.fresh_ty_var());
        let (va, vb) = (Type::Var(a), Type::Var(b));
        env.insert_value(
            "foldLeft",
            ValueBinding::Value(Scheme::poly(
                vec![a, b],
                Type::fun_chain(
                    vec![
                        Type::fun(vb.clone(), Type::fun(va.clone(), vb.clone())),
                        vb.clone(),
                        Type::list(va),
                    ],
                    vb,
                ),
            )),
        );
    }
    {
        let a = ctx.fresh_ty_var();
        env.insert_value(
            "length",
            ValueBinding::Value(Scheme::poly(
                vec![a],
                Type::fun(Type::list(Type::Var(a)), Type::int()),
            )),
        );
    }
    {
        let a = ctx.fresh_ty_var();
        let list = Type::list(Type::Var(a));
        env.insert_value(
            "append",
            ValueBinding::Value(Scheme::poly(
                vec![a],
                Type::fun_chain(vec![list.clone(), list.clone()], list),
            )),
        );
    }
    {
        let a = ctx.fresh_ty_var();
        let list = Type::list(Type::Var(a));
        env.insert_value(
            "reverse",
            ValueBinding::Value(Scheme::poly(vec![a], Type::fun(list.clone(), list))),
        );
    }
    {
        let a = ctx.fresh_ty_var();
        env.insert_value(
            "isEmpty",
            ValueBinding::Value(Scheme::poly(
                vec![a],
                Type::fun(Type::list(Type::Var(a)), Type::bool()),
            )),
        );
    }

    // Option functions
    {
        let (a, b) = (ctx.fresh_ty_var(), ctx.fresh_ty_var());
        let (va, vb) = (Type::Var(a), Type::Var(b));
        env.insert_value(
            "mapOption",
            ValueBinding::Value(Scheme::poly(
                vec![a, b],
                Type::fun_chain(
                    vec![Type::fun(va.clone(), vb.clone()), Type::option(va)],
                    Type::option(vb),
                ),
            )),
        );
    }
    {
        let (a, b) = (ctx.fresh_ty_var(), ctx.fresh_ty_var());
        let (va, vb) = (Type::Var(a), Type::Var(b));
        env.insert_value(
            "flatMapOption",
            ValueBinding::Value(Scheme::poly(
                vec![a, b],
                Type::fun_chain(
                    vec![
                        Type::fun(va.clone(), Type::option(vb.clone())),
                        Type::option(va),
                    ],
                    Type::option(vb),
                ),
            )),
        );
    }
    {
        let a = ctx.fresh_ty_var();
        let va = Type::Var(a);
        env.insert_value(
            "getOrElse",
            ValueBinding::Value(Scheme::poly(
                vec![a],
                Type::fun_chain(vec![va.clone(), Type::option(va.clone())], va),
            )),
        );
    }
    for name in ["isSome", "isNone"] {
        let a = ctx.fresh_ty_var();
        env.insert_value(
            name,
            ValueBinding::Value(Scheme::poly(
                vec![a],
                Type::fun(Type::option(Type::Var(a)), Type::bool()),
            )),
        );
    }

    // Result functions
    {
        let (a, b, e) = (ctx.fresh_ty_var(), ctx.fresh_ty_var(), ctx.fresh_ty_var());
        let (va, vb, ve) = (Type::Var(a), Type::Var(b), Type::Var(e));
        env.insert_value(
            "mapResult",
            ValueBinding::Value(Scheme::poly(
                vec![a, b, e],
                Type::fun_chain(
                    vec![
                        Type::fun(va.clone(), vb.clone()),
                        Type::result(va, ve.clone()),
                    ],
                    Type::result(vb, ve),
                ),
            )),
        );
    }
    {
        let (a, e, f) = (ctx.fresh_ty_var(), ctx.fresh_ty_var(), ctx.fresh_ty_var());
        let (va, ve, vf) = (Type::Var(a), Type::Var(e), Type::Var(f));
        env.insert_value(
            "mapErr",
            ValueBinding::Value(Scheme::poly(
                vec![a, e, f],
                Type::fun_chain(
                    vec![
                        Type::fun(ve.clone(), vf.clone()),
                        Type::result(va.clone(), ve),
                    ],
                    Type::result(va, vf),
                ),
            )),
        );
    }
    {
        let (a, b, e) = (ctx.fresh_ty_var(), ctx.fresh_ty_var(), ctx.fresh_ty_var());
        let (va, vb, ve) = (Type::Var(a), Type::Var(b), Type::Var(e));
        env.insert_value(
            "flatMapResult",
            ValueBinding::Value(Scheme::poly(
                vec![a, b, e],
                Type::fun_chain(
                    vec![
                        Type::fun(va.clone(), Type::result(vb.clone(), ve.clone())),
                        Type::result(va, ve.clone()),
                    ],
                    Type::result(vb, ve),
                ),
            )),
        );
    }
    {
        let (a, e) = (ctx.fresh_ty_var(), ctx.fresh_ty_var());
        let va = Type::Var(a);
        env.insert_value(
            "unwrapOr",
            ValueBinding::Value(Scheme::poly(
                vec![a, e],
                Type::fun_chain(vec![va.clone(), Type::result(va.clone(), Type::Var(e))], va),
            )),
        );
    }

    // String and numeric conversions
    env.insert_value(
        "stringLength",
        ValueBinding::Value(Scheme::mono(Type::fun(Type::string(), Type::int()))),
    );
    env.insert_value(
        "concat",
        ValueBinding::Value(Scheme::mono(Type::fun_chain(
            vec![Type::string(), Type::string()],
            Type::string(),
        ))),
    );
    env.insert_value(
        "contains",
        ValueBinding::Value(Scheme::mono(Type::fun_chain(
            vec![Type::string(), Type::string()],
            Type::bool(),
        ))),
    );
    env.insert_value(
        "toFloat",
        ValueBinding::Value(Scheme::mono(Type::fun(Type::int(), Type::float()))),
    );
    for name in ["floor", "round"] {
        env.insert_value(
            name,
            ValueBinding::Value(Scheme::mono(Type::fun(Type::float(), Type::int()))),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_env_has_core_bindings() {
        let mut ctx = InferCtx::new();
        let env = builtin_env(&mut ctx, Stdlib::Minimal);

        assert!(env.lookup_value("panic").is_some());
        assert!(env.lookup_value("ref").is_some());
        assert!(env.lookup_value("Some").is_some());
        assert!(env.lookup_value("Cons").is_some());
        assert!(env.lookup_value("map").is_none());
    }

    #[test]
    fn test_full_env_has_roster() {
        let mut ctx = InferCtx::new();
        let env = builtin_env(&mut ctx, Stdlib::Full);

        for name in ["map", "filter", "foldLeft", "getOrElse", "mapErr", "concat"] {
            assert!(env.lookup_value(name).is_some(), "missing builtin {name}");
        }
    }

    #[test]
    fn test_constructor_schemes_are_polymorphic() {
        let mut ctx = InferCtx::new();
        let env = builtin_env(&mut ctx, Stdlib::Minimal);

        match env.lookup_value("Cons").unwrap() {
            ValueBinding::Value(scheme) => {
                assert_eq!(scheme.quantified.len(), 1);
                assert_eq!(scheme.to_string(), "a -> List<a> -> List<a>");
            }
            other => panic!("expected value binding, got {:?}", other),
        }
    }

    #[test]
    fn test_panic_returns_never() {
        let mut ctx = InferCtx::new();
        let env = builtin_env(&mut ctx, Stdlib::Minimal);
        match env.lookup_value("panic").unwrap() {
            ValueBinding::Value(scheme) => {
                assert_eq!(scheme.body, Type::fun(Type::string(), Type::Never));
            }
            other => panic!("expected value binding, got {:?}", other),
        }
    }

    #[test]
    fn test_type_table_seeded() {
        let mut ctx = InferCtx::new();
        let env = builtin_env(&mut ctx, Stdlib::Minimal);
        for name in ["Int", "Float", "String", "Bool", "Unit", "Never", "List", "Option", "Result"]
        {
            assert!(env.lookup_type(name).is_some(), "missing type {name}");
        }
    }
}
