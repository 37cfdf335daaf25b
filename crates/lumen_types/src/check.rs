//! Top-level module driver
//!
//! Checks a whole module in two passes: first every type definition and
//! external type is registered (so mutually referential definitions
//! resolve), then declarations are processed in source order, each
//! extending the environment. The first error aborts the module. On
//! success every expression's resolved type is attached in a side table,
//! exported names carry their schemes, and unreachable-arm warnings are
//! surfaced.

use crate::builtins::{builtin_env, Stdlib};
use crate::convert::{convert_annotation, convert_type_expr, TypeVarScope};
use crate::ctx::InferCtx;
use crate::env::{CtorDef, Overload, RecordDef, TypeDef, TypeEnv, ValueBinding, VariantDef};
use crate::error::{TypeError, TypeResult};
use crate::infer::{Infer, InferredBinding};
use crate::ty::{Scheme, TyVar, Type};
use lumen_ast::{DeclKind, ExprId, ExternalSig, Location, Module, TypeDefBody};
use lumen_diagnostics::Diagnostic;
use std::collections::HashMap;
use tracing::debug_span;

/// Configuration accepted by the checker
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Which built-in roster to seed
    pub stdlib: Stdlib,
    /// When true, any type variable that survives generalization at a
    /// top-level binding without being quantified is an error
    pub deny_any: bool,
    /// Edit-distance threshold for "did you mean?" suggestions
    pub levenshtein_threshold: u32,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            stdlib: Stdlib::Full,
            deny_any: false,
            levenshtein_threshold: 2,
        }
    }
}

/// The result of successfully checking a module
#[derive(Debug)]
pub struct CheckedModule {
    /// Resolved (zonked) type of every expression node
    pub types: HashMap<ExprId, Type>,
    /// Every top-level value binding and its scheme
    pub bindings: HashMap<String, Scheme>,
    /// Exported names and their bindings
    pub exports: HashMap<String, ValueBinding>,
    /// Non-fatal findings (unreachable match arms)
    pub warnings: Vec<Diagnostic>,
}

/// The type checker
#[derive(Debug, Default)]
pub struct TypeChecker {
    options: CheckOptions,
}

impl TypeChecker {
    /// Create a checker with the given options
    pub fn new(options: CheckOptions) -> Self {
        Self { options }
    }

    /// Check a whole module
    pub fn check_module(&self, module: &Module) -> TypeResult<CheckedModule> {
        let mut ctx = InferCtx::new();
        let mut env = builtin_env(&mut ctx, self.options.stdlib);

        // Pass 1: register type definitions and external types so mutual
        // references resolve, then fill in their bodies.
        self.register_type_headers(&mut ctx, &mut env, module)?;
        self.register_type_bodies(&mut env, module)?;

        // Pass 2: declarations in source order.
        let mut infer = Infer::new(&mut ctx, module, self.options.levenshtein_threshold);
        let mut bindings_out: HashMap<String, Scheme> = HashMap::new();
        let mut exports: HashMap<String, ValueBinding> = HashMap::new();

        for decl in &module.decls {
            let _span = debug_span!("check_decl", kind = decl_kind_name(&decl.kind)).entered();
            match &decl.kind {
                DeclKind::Let {
                    pattern,
                    value,
                    recursive,
                    mutable,
                } => {
                    let (_, inferred) =
                        infer.bind_let(&env, *pattern, *value, *recursive, *mutable, decl.loc)?;
                    self.install_bindings(&mut env, &mut bindings_out, inferred)?;
                }

                DeclKind::LetRecGroup { bindings } => {
                    let inferred = infer.bind_let_rec_group(&env, bindings)?;
                    self.install_bindings(&mut env, &mut bindings_out, inferred)?;
                }

                DeclKind::External { name, sig } => {
                    add_external(&mut env, module, name, sig, decl.loc)?;
                }

                DeclKind::ExternalOverload { name, overloads } => {
                    for sig in overloads {
                        add_external(&mut env, module, name, sig, decl.loc)?;
                    }
                }

                // Handled in pass 1.
                DeclKind::ExternalType { .. } | DeclKind::TypeDef { .. } => {}

                DeclKind::Export { names } => {
                    for name in names {
                        match env.lookup_value(name) {
                            Some(binding) => {
                                exports.insert(name.clone(), binding.clone());
                            }
                            None => {
                                return Err(TypeError::UndefinedVariable {
                                    name: name.clone(),
                                    suggestions: crate::error::suggest(
                                        name,
                                        env.value_names(),
                                        self.options.levenshtein_threshold,
                                    ),
                                    loc: decl.loc,
                                })
                            }
                        }
                    }
                }
            }
        }

        // Zonk: walk the final substitution over everything we hand out.
        let types = infer
            .types
            .iter()
            .map(|(id, ty)| (*id, infer.ctx.resolve(ty)))
            .collect();
        let warnings = std::mem::take(&mut infer.warnings);
        let subst = infer.ctx.substitution();
        let bindings_out = bindings_out
            .into_iter()
            .map(|(name, scheme)| {
                let zonked = subst.apply_scheme(&scheme);
                (name, zonked)
            })
            .collect();
        let exports = exports
            .into_iter()
            .map(|(name, binding)| (name, zonk_binding(&binding, subst)))
            .collect();

        Ok(CheckedModule {
            types,
            bindings: bindings_out,
            exports,
            warnings,
        })
    }

    /// Bind inferred top-level names, enforcing the declaration rules:
    /// no clashes with built-ins or earlier declarations, and no type
    /// variables escaping through a top-level scheme.
    fn install_bindings(
        &self,
        env: &mut TypeEnv,
        out: &mut HashMap<String, Scheme>,
        inferred: Vec<InferredBinding>,
    ) -> TypeResult<()> {
        for binding in inferred {
            if env.lookup_value(&binding.name).is_some() {
                return Err(TypeError::DuplicateDeclaration {
                    name: binding.name,
                    loc: binding.loc,
                });
            }
            if !binding.scheme.free_vars().is_empty() {
                // An unquantified variable at top level can never be
                // constrained later. When the value restriction caused
                // it, report that; otherwise it is an escape, tolerated
                // only when the deny-any check is off.
                if binding.restricted {
                    return Err(TypeError::ValueRestriction {
                        binding: binding.name,
                        loc: binding.loc,
                    });
                }
                if self.options.deny_any {
                    return Err(TypeError::EscapingTypeVar {
                        binding: binding.name,
                        loc: binding.loc,
                    });
                }
            }
            env.insert_value(&binding.name, ValueBinding::Value(binding.scheme.clone()));
            out.insert(binding.name, binding.scheme);
        }
        Ok(())
    }

    fn register_type_headers(
        &self,
        ctx: &mut InferCtx,
        env: &mut TypeEnv,
        module: &Module,
    ) -> TypeResult<()> {
        for decl in &module.decls {
            match &decl.kind {
                DeclKind::TypeDef { name, params, body } => {
                    ensure_new_type(env, name, decl.loc)?;
                    let param_vars: Vec<TyVar> =
                        params.iter().map(|_| ctx.fresh_ty_var()).collect();
                    let def = match body {
                        TypeDefBody::Variant(_) => TypeDef::Variant(VariantDef {
                            name: name.clone(),
                            params: param_vars,
                            ctors: Vec::new(),
                        }),
                        TypeDefBody::Record(_) => TypeDef::Record(RecordDef {
                            name: name.clone(),
                            params: param_vars,
                            fields: Default::default(),
                        }),
                    };
                    env.insert_type(name, def);
                }
                DeclKind::ExternalType { name, arity } => {
                    ensure_new_type(env, name, decl.loc)?;
                    env.insert_type(name, TypeDef::External { arity: *arity });
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn register_type_bodies(&self, env: &mut TypeEnv, module: &Module) -> TypeResult<()> {
        for decl in &module.decls {
            let DeclKind::TypeDef { name, params, body } = &decl.kind else {
                continue;
            };

            let param_vars = match env.lookup_type(name) {
                Some(TypeDef::Variant(def)) => def.params.clone(),
                Some(TypeDef::Record(def)) => def.params.clone(),
                _ => Vec::new(),
            };
            let param_map: HashMap<String, TyVar> = params
                .iter()
                .cloned()
                .zip(param_vars.iter().copied())
                .collect();
            let scope = TypeVarScope::Params(&param_map);

            match body {
                TypeDefBody::Variant(ctors) => {
                    let mut converted = Vec::with_capacity(ctors.len());
                    for ctor in ctors {
                        if env.lookup_value(&ctor.name).is_some() || env.has_ctor(&ctor.name) {
                            return Err(TypeError::DuplicateDeclaration {
                                name: ctor.name.clone(),
                                loc: ctor.loc,
                            });
                        }
                        let ctor_params = ctor
                            .params
                            .iter()
                            .map(|p| convert_type_expr(env, module, *p, &scope))
                            .collect::<TypeResult<Vec<_>>>()?;
                        converted.push(CtorDef {
                            name: ctor.name.clone(),
                            params: ctor_params,
                        });
                    }

                    env.insert_type(
                        name,
                        TypeDef::Variant(VariantDef {
                            name: name.clone(),
                            params: param_vars.clone(),
                            ctors: converted.clone(),
                        }),
                    );

                    // Constructors become value bindings with universally
                    // quantified curried schemes.
                    let result = Type::Variant {
                        name: name.clone(),
                        args: param_vars.iter().map(|v| Type::Var(*v)).collect(),
                    };
                    for ctor in converted {
                        let scheme = Scheme::poly(
                            param_vars.clone(),
                            Type::fun_chain(ctor.params.clone(), result.clone()),
                        );
                        env.insert_value(&ctor.name, ValueBinding::Value(scheme));
                        env.register_ctor(&ctor.name, name);
                    }
                }

                TypeDefBody::Record(fields) => {
                    let mut converted = std::collections::BTreeMap::new();
                    for (field, ty) in fields {
                        let ty = convert_type_expr(env, module, *ty, &scope)?;
                        converted.insert(field.clone(), ty);
                    }
                    env.insert_type(
                        name,
                        TypeDef::Record(RecordDef {
                            name: name.clone(),
                            params: param_vars,
                            fields: converted,
                        }),
                    );
                }
            }
        }
        Ok(())
    }
}

/// Register an external signature, merging into an overload group when
/// the name already has externals of other arities. Same name and same
/// arity is a duplicate; clashing with a non-external binding is too.
fn add_external(
    env: &mut TypeEnv,
    module: &Module,
    name: &str,
    sig: &ExternalSig,
    loc: Location,
) -> TypeResult<()> {
    let ty = convert_annotation(env, module, sig.ty)?;
    let arity = ty.fun_arity();
    let overload = Overload {
        arity,
        scheme: Scheme::mono(ty),
        js_name: sig.js_name.clone(),
    };

    match env.lookup_value(name) {
        None => {
            env.insert_value(
                name,
                ValueBinding::External {
                    scheme: overload.scheme,
                    js_name: overload.js_name,
                },
            );
            Ok(())
        }
        Some(ValueBinding::External { scheme, js_name }) => {
            let existing = Overload {
                arity: scheme.body.fun_arity(),
                scheme: scheme.clone(),
                js_name: js_name.clone(),
            };
            if existing.arity == arity {
                return Err(TypeError::DuplicateDeclaration {
                    name: name.to_string(),
                    loc,
                });
            }
            let mut group = vec![existing, overload];
            group.sort_by_key(|o| o.arity);
            env.insert_value(name, ValueBinding::ExternalOverload(group));
            Ok(())
        }
        Some(ValueBinding::ExternalOverload(overloads)) => {
            if overloads.iter().any(|o| o.arity == arity) {
                return Err(TypeError::DuplicateDeclaration {
                    name: name.to_string(),
                    loc,
                });
            }
            let mut group = overloads.clone();
            group.push(overload);
            group.sort_by_key(|o| o.arity);
            env.insert_value(name, ValueBinding::ExternalOverload(group));
            Ok(())
        }
        Some(ValueBinding::Value(_)) => Err(TypeError::DuplicateDeclaration {
            name: name.to_string(),
            loc,
        }),
    }
}

fn ensure_new_type(env: &TypeEnv, name: &str, loc: Location) -> TypeResult<()> {
    if env.lookup_type(name).is_some() || name == "Ref" || name == "Tuple" {
        return Err(TypeError::DuplicateDeclaration {
            name: name.to_string(),
            loc,
        });
    }
    Ok(())
}

fn zonk_binding(binding: &ValueBinding, subst: &crate::subst::Subst) -> ValueBinding {
    match binding {
        ValueBinding::Value(scheme) => ValueBinding::Value(subst.apply_scheme(scheme)),
        ValueBinding::External { scheme, js_name } => ValueBinding::External {
            scheme: subst.apply_scheme(scheme),
            js_name: js_name.clone(),
        },
        ValueBinding::ExternalOverload(overloads) => ValueBinding::ExternalOverload(
            overloads
                .iter()
                .map(|o| Overload {
                    arity: o.arity,
                    scheme: subst.apply_scheme(&o.scheme),
                    js_name: o.js_name.clone(),
                })
                .collect(),
        ),
    }
}

fn decl_kind_name(kind: &DeclKind) -> &'static str {
    match kind {
        DeclKind::Let { .. } => "let",
        DeclKind::LetRecGroup { .. } => "let-rec-group",
        DeclKind::External { .. } => "external",
        DeclKind::ExternalOverload { .. } => "external-overload",
        DeclKind::ExternalType { .. } => "external-type",
        DeclKind::TypeDef { .. } => "type-def",
        DeclKind::Export { .. } => "export",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_ast::ModuleBuilder;

    fn check(module: &Module) -> TypeResult<CheckedModule> {
        TypeChecker::new(CheckOptions::default()).check_module(module)
    }

    #[test]
    fn test_simple_module() {
        let mut b = ModuleBuilder::new("main.lm");
        let one = b.int(1);
        b.decl_let_var("x", one);
        let module = b.finish();

        let checked = check(&module).unwrap();
        assert_eq!(checked.bindings["x"].body, Type::int());
    }

    #[test]
    fn test_duplicate_declaration() {
        let mut b = ModuleBuilder::new("main.lm");
        let one = b.int(1);
        b.decl_let_var("x", one);
        let two = b.int(2);
        b.decl_let_var("x", two);
        let module = b.finish();

        let err = check(&module).unwrap_err();
        assert!(matches!(err, TypeError::DuplicateDeclaration { .. }));
    }

    #[test]
    fn test_builtin_shadowing_rejected() {
        let mut b = ModuleBuilder::new("main.lm");
        let one = b.int(1);
        b.decl_let_var("map", one);
        let module = b.finish();

        let err = check(&module).unwrap_err();
        assert!(matches!(err, TypeError::DuplicateDeclaration { .. }));
    }

    #[test]
    fn test_user_variant_type() {
        // type Shape<a> = Circle(a) | Square
        // let s = Circle(1)
        let mut b = ModuleBuilder::new("main.lm");
        let a = b.t_var("a");
        b.decl_type_variant("Shape", &["a"], vec![("Circle", vec![a]), ("Square", vec![])]);
        let one = b.int(1);
        let circle = b.variant("Circle", &[one]);
        b.decl_let_var("s", circle);
        let module = b.finish();

        let checked = check(&module).unwrap();
        assert_eq!(checked.bindings["s"].body.to_string(), "Shape<Int>");
    }

    #[test]
    fn test_mutually_referential_types() {
        // type Tree = Node(Forest) | Leaf ; type Forest = Trees(List<Tree>)
        let mut b = ModuleBuilder::new("main.lm");
        let forest_ref = b.t_named("Forest", &[]);
        b.decl_type_variant(
            "Tree",
            &[],
            vec![("Node", vec![forest_ref]), ("Leaf", vec![])],
        );
        let tree_ref = b.t_named("Tree", &[]);
        let list_tree = b.t_named("List", &[tree_ref]);
        b.decl_type_variant("Forest", &[], vec![("Trees", vec![list_tree])]);
        let module = b.finish();

        check(&module).unwrap();
    }

    #[test]
    fn test_external_declaration() {
        // external log : String -> Unit = "console.log"
        let mut b = ModuleBuilder::new("main.lm");
        let string = b.t_named("String", &[]);
        let unit = b.t_named("Unit", &[]);
        let sig = b.t_fun(string, unit);
        b.decl_external("log", sig, "console.log");
        let msg = b.string("hello");
        let log = b.var("log");
        let call = b.app(log, msg);
        b.decl_let_var("r", call);
        let module = b.finish();

        let checked = check(&module).unwrap();
        assert_eq!(checked.bindings["r"].body, Type::unit());
    }

    #[test]
    fn test_external_overload_by_arity() {
        // parseInt with 1-arg and 2-arg overloads; the call site's arity
        // selects.
        let mut b = ModuleBuilder::new("main.lm");
        let s1 = b.t_named("String", &[]);
        let i1 = b.t_named("Int", &[]);
        let one_arg = b.t_fun(s1, i1);

        let s2 = b.t_named("String", &[]);
        let i2 = b.t_named("Int", &[]);
        let i3 = b.t_named("Int", &[]);
        let radix = b.t_fun(i2, i3);
        let two_arg = b.t_fun(s2, radix);

        b.decl_external_overload("parseInt", vec![(one_arg, "parseInt"), (two_arg, "parseInt")]);

        let f = b.var("parseInt");
        let text = b.string("42");
        let call1 = b.app(f, text);
        b.decl_let_var("a", call1);

        let g = b.var("parseInt");
        let text2 = b.string("42");
        let ten = b.int(10);
        let call2 = b.call(g, &[text2, ten]);
        b.decl_let_var("b2", call2);
        let module = b.finish();

        let checked = check(&module).unwrap();
        assert_eq!(checked.bindings["a"].body, Type::int());
        assert_eq!(checked.bindings["b2"].body, Type::int());
    }

    #[test]
    fn test_external_same_arity_duplicate() {
        let mut b = ModuleBuilder::new("main.lm");
        let s1 = b.t_named("String", &[]);
        let i1 = b.t_named("Int", &[]);
        let sig1 = b.t_fun(s1, i1);
        b.decl_external("f", sig1, "f1");
        let s2 = b.t_named("String", &[]);
        let b1 = b.t_named("Bool", &[]);
        let sig2 = b.t_fun(s2, b1);
        b.decl_external("f", sig2, "f2");
        let module = b.finish();

        let err = check(&module).unwrap_err();
        assert!(matches!(err, TypeError::DuplicateDeclaration { .. }));
    }

    #[test]
    fn test_exports() {
        let mut b = ModuleBuilder::new("main.lm");
        let body = b.var("x");
        let id = b.lambda_var("x", body);
        b.decl_let_var("id", id);
        b.decl_export(&["id"]);
        let module = b.finish();

        let checked = check(&module).unwrap();
        match &checked.exports["id"] {
            ValueBinding::Value(scheme) => {
                assert_eq!(scheme.to_string(), "a -> a");
                assert_eq!(scheme.quantified.len(), 1);
            }
            other => panic!("expected value binding, got {:?}", other),
        }
    }

    #[test]
    fn test_export_unknown_name() {
        let mut b = ModuleBuilder::new("main.lm");
        b.decl_export(&["missing"]);
        let module = b.finish();

        let err = check(&module).unwrap_err();
        assert!(matches!(err, TypeError::UndefinedVariable { .. }));
    }

    #[test]
    fn test_types_are_zonked() {
        let mut b = ModuleBuilder::new("main.lm");
        let body = b.var("x");
        let id = b.lambda_var("x", body);
        let id_var = b.var("f");
        let one = b.int(1);
        let call = b.app(id_var, one);
        let inner = b.let_var("f", id, call);
        b.decl_let_var("y", inner);
        let module = b.finish();

        let checked = check(&module).unwrap();
        // The call's recorded type must be ground after zonking.
        assert_eq!(checked.types[&call], Type::int());
        assert_eq!(checked.bindings["y"].body, Type::int());
    }

    #[test]
    fn test_value_restriction_at_top_level() {
        // let f = () => ref(None) ; let cell = f()  — the cell's element
        // type cannot be generalized and escapes: hard error.
        let mut b = ModuleBuilder::new("main.lm");
        let none = b.variant("None", &[]);
        let ref_fn = b.var("ref");
        let alloc = b.app(ref_fn, none);
        let unit_pat = b.p_unit();
        let f = b.lambda(unit_pat, alloc);
        b.decl_let_var("f", f);
        let f_var = b.var("f");
        let unit = b.unit();
        let call = b.app(f_var, unit);
        b.decl_let_var("cell", call);
        let module = b.finish();

        let err = check(&module).unwrap_err();
        assert!(matches!(err, TypeError::ValueRestriction { .. }));
    }

    #[test]
    fn test_deny_any_flags_escapes() {
        // let p = (1, (x) => x) destructured: the lambda component stays
        // monomorphic with a free var.
        let mut b = ModuleBuilder::new("main.lm");
        let one = b.int(1);
        let body = b.var("x");
        let id = b.lambda_var("x", body);
        let pair = b.tuple(&[one, id]);
        let pa = b.p_var("a");
        let pb = b.p_var("g");
        let pat = b.p_tuple(&[pa, pb]);
        b.decl_let(pat, pair);
        let module = b.finish();

        // Tolerated by default...
        check(&module).unwrap();

        // ...but an error under deny-any.
        let strict = TypeChecker::new(CheckOptions {
            deny_any: true,
            ..CheckOptions::default()
        });
        let err = strict.check_module(&module).unwrap_err();
        assert!(matches!(err, TypeError::EscapingTypeVar { .. }));
    }

    #[test]
    fn test_record_type_definition_is_alias() {
        // type Point = { x: Int, y: Int } ; let p : Point = {x:1, y:2}
        let mut b = ModuleBuilder::new("main.lm");
        let ix = b.t_named("Int", &[]);
        let iy = b.t_named("Int", &[]);
        b.decl_type_record("Point", &[], vec![("x", ix), ("y", iy)]);
        let one = b.int(1);
        let two = b.int(2);
        let lit = b.record(&[("x", one), ("y", two)]);
        let point = b.t_named("Point", &[]);
        let ann = b.annotated(lit, point);
        b.decl_let_var("p", ann);
        let module = b.finish();

        let checked = check(&module).unwrap();
        assert_eq!(
            checked.bindings["p"].body,
            Type::record(vec![("x", Type::int()), ("y", Type::int())])
        );
    }
}
