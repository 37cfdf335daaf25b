//! The inference engine
//!
//! Walks the Core AST generating and eagerly solving equality constraints
//! (Algorithm-J style): every rule unifies as it goes, against the
//! context's substitution. Callers that know the expected type (match
//! arms, annotations) check against it for more precise errors; otherwise
//! types are synthesized.
//!
//! Let bindings follow the level discipline: enter a level, infer the
//! value, leave the level, then generalize exactly the variables born
//! above the current level — and only when the bound expression is a
//! syntactic value (the value restriction).

use crate::ctx::InferCtx;
use crate::env::{TypeEnv, ValueBinding};
use crate::error::{MismatchContext, TypeError, TypeResult};
use crate::exhaustive::check_exhaustive;
use crate::pattern::{check_pattern, literal_type, pattern_names};
use crate::ty::{Prim, Scheme, Type};
use lumen_ast::{
    BinOp, ExprId, ExprKind, Location, Module, PatternId, PatternKind, RecBinding, UnaryOp,
};
use lumen_diagnostics::{Diagnostic, SourcePos};
use std::collections::HashMap;
use tracing::debug;

/// One top-level binding produced by a let declaration
#[derive(Debug)]
pub struct InferredBinding {
    /// Bound name
    pub name: String,
    /// The binding's scheme (generalized or monomorphic)
    pub scheme: Scheme,
    /// Whether the value restriction blocked generalization
    pub restricted: bool,
    /// The binding's location
    pub loc: Location,
}

/// The expression walker; owns the per-expression type table and the
/// warning list while borrowing the context and module
pub struct Infer<'a> {
    /// The inference context
    pub ctx: &'a mut InferCtx,
    module: &'a Module,
    /// Inferred type of every visited expression (zonked by the driver)
    pub types: HashMap<ExprId, Type>,
    /// Non-fatal findings (unreachable match arms)
    pub warnings: Vec<Diagnostic>,
    /// Levenshtein threshold for "did you mean?" suggestions
    suggestion_threshold: u32,
}

impl<'a> Infer<'a> {
    /// Create a walker over the given module
    pub fn new(ctx: &'a mut InferCtx, module: &'a Module, suggestion_threshold: u32) -> Self {
        Self {
            ctx,
            module,
            types: HashMap::new(),
            warnings: Vec::new(),
            suggestion_threshold,
        }
    }

    fn record(&mut self, id: ExprId, ty: &Type) {
        self.types.insert(id, ty.clone());
    }

    /// Infer the type of an expression
    pub fn infer_expr(&mut self, env: &TypeEnv, id: ExprId) -> TypeResult<Type> {
        let node = self.module.expr(id);
        let loc = node.loc;

        let ty = match &node.kind {
            ExprKind::Literal(lit) => literal_type(lit),

            ExprKind::Var(name) => self.infer_var(env, name, loc, None)?,

            ExprKind::Lambda { param, body } => self.infer_lambda(env, *param, *body)?,

            ExprKind::App { .. } => self.infer_app(env, id)?,

            ExprKind::BinOp { op, left, right } => {
                self.infer_binop(env, *op, *left, *right, loc)?
            }

            ExprKind::UnaryOp { op, operand } => self.infer_unary(env, *op, *operand, loc)?,

            ExprKind::Let {
                pattern,
                value,
                body,
                recursive,
                mutable,
            } => {
                let (_, bindings) =
                    self.bind_let(env, *pattern, *value, *recursive, *mutable, loc)?;
                let schemes: Vec<(String, Scheme)> = bindings
                    .into_iter()
                    .map(|b| (b.name, b.scheme))
                    .collect();
                let inner = env.with_schemes(&schemes);
                self.infer_expr(&inner, *body)?
            }

            ExprKind::LetRecGroup { bindings, body } => {
                let inferred = self.bind_let_rec_group(env, bindings)?;
                let schemes: Vec<(String, Scheme)> = inferred
                    .into_iter()
                    .map(|b| (b.name, b.scheme))
                    .collect();
                let inner = env.with_schemes(&schemes);
                self.infer_expr(&inner, *body)?
            }

            ExprKind::Match { scrutinee, arms } => {
                self.infer_match(env, *scrutinee, arms, loc)?
            }

            ExprKind::Record { fields } => {
                let mut field_tys = std::collections::BTreeMap::new();
                for (name, value) in fields {
                    let ty = self.infer_expr(env, *value)?;
                    field_tys.insert(name.clone(), ty);
                }
                Type::Record { fields: field_tys }
            }

            ExprKind::RecordAccess { record, field } => {
                self.infer_access(env, *record, field, loc)?
            }

            ExprKind::RecordUpdate { record, updates } => {
                self.infer_update(env, *record, updates, loc)?
            }

            ExprKind::Variant { ctor, args } => self.infer_variant(env, ctor, args, loc)?,

            ExprKind::Tuple(elems) => {
                let tys = elems
                    .iter()
                    .map(|e| self.infer_expr(env, *e))
                    .collect::<TypeResult<Vec<_>>>()?;
                Type::tuple(tys)
            }

            ExprKind::Unsafe(inner) => self.infer_expr(env, *inner)?,

            ExprKind::Annotated { expr, ty } => {
                let annotated = crate::convert::convert_annotation(env, self.module, *ty)?;
                let actual = self.infer_expr(env, *expr)?;
                self.ctx
                    .subsume(&actual, &annotated, loc)
                    .map_err(|e| annotate_context(e, MismatchContext::Annotation))?;
                annotated
            }
        };

        self.record(id, &ty);
        Ok(ty)
    }

    // ── Variables & application ─────────────────────────────────────────

    fn infer_var(
        &mut self,
        env: &TypeEnv,
        name: &str,
        loc: Location,
        spine_arity: Option<usize>,
    ) -> TypeResult<Type> {
        match env.lookup_value(name) {
            None => Err(TypeError::UndefinedVariable {
                name: name.to_string(),
                suggestions: crate::error::suggest(
                    name,
                    env.value_names(),
                    self.suggestion_threshold,
                ),
                loc,
            }),
            Some(ValueBinding::Value(scheme)) => {
                let scheme = scheme.clone();
                Ok(self.ctx.instantiate(&scheme))
            }
            Some(ValueBinding::External { scheme, .. }) => {
                let scheme = scheme.clone();
                Ok(self.ctx.instantiate(&scheme))
            }
            Some(ValueBinding::ExternalOverload(overloads)) => match spine_arity {
                Some(arity) => match overloads.iter().find(|o| o.arity == arity) {
                    Some(overload) => {
                        debug!(name, arity, "selected external overload");
                        let scheme = overload.scheme.clone();
                        Ok(self.ctx.instantiate(&scheme))
                    }
                    None => Err(TypeError::OverloadNoMatch {
                        name: name.to_string(),
                        arity,
                        available: overloads.iter().map(|o| o.arity).collect(),
                        loc,
                    }),
                },
                None => {
                    // Referenced outside an application spine: only an
                    // unambiguous group can be used as a value.
                    if overloads.len() == 1 {
                        let scheme = overloads[0].scheme.clone();
                        Ok(self.ctx.instantiate(&scheme))
                    } else {
                        Err(TypeError::OverloadAmbiguous {
                            name: name.to_string(),
                            loc,
                        })
                    }
                }
            },
        }
    }

    /// Infer an application spine: the head is inferred once (overloads
    /// are selected by the spine's arity), then each argument produces a
    /// fresh result variable unified against the function type
    fn infer_app(&mut self, env: &TypeEnv, app: ExprId) -> TypeResult<Type> {
        let mut spine = Vec::new();
        let mut head = app;
        while let ExprKind::App { func, arg } = &self.module.expr(head).kind {
            spine.push((head, *arg));
            head = *func;
        }
        spine.reverse();

        let head_node = self.module.expr(head);
        let head_ty = match &head_node.kind {
            ExprKind::Var(name) => {
                let ty = self.infer_var(env, name, head_node.loc, Some(spine.len()))?;
                self.record(head, &ty);
                ty
            }
            _ => self.infer_expr(env, head)?,
        };

        let mut fun_ty = head_ty;
        for (node, arg) in spine {
            let loc = self.module.expr(node).loc;
            let arg_ty = self.infer_expr(env, arg)?;
            let result = self.ctx.fresh_var();
            self.ctx
                .unify(&fun_ty, &Type::fun(arg_ty, result.clone()), loc)?;
            self.record(node, &result);
            fun_ty = result;
        }
        Ok(fun_ty)
    }

    // ── Operators ───────────────────────────────────────────────────────

    fn infer_binop(
        &mut self,
        env: &TypeEnv,
        op: BinOp,
        left: ExprId,
        right: ExprId,
        loc: Location,
    ) -> TypeResult<Type> {
        let left_ty = self.infer_expr(env, left)?;
        let right_ty = self.infer_expr(env, right)?;

        match op {
            // Arithmetic is type-directed, not overloaded: both operands
            // unify to one type, which must resolve to Int or Float.
            // Mixing requires an explicit conversion.
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Mod => {
                let operand = self.ctx.fresh_var();
                self.ctx.unify(&left_ty, &operand, loc)?;
                self.ctx.unify(&right_ty, &operand, loc)?;
                let resolved = self.ctx.resolve(&operand);
                match resolved {
                    Type::Prim(Prim::Int) | Type::Prim(Prim::Float) | Type::Never => Ok(resolved),
                    other => Err(TypeError::ArithmeticTypeMismatch {
                        op: op.symbol().to_string(),
                        allowed: "Int or Float".to_string(),
                        actual: other,
                        loc,
                    }),
                }
            }

            // Integer and float division are distinct operators.
            BinOp::IntDiv => {
                self.ctx.unify(&left_ty, &Type::int(), loc)?;
                self.ctx.unify(&right_ty, &Type::int(), loc)?;
                Ok(Type::int())
            }
            BinOp::FloatDiv => {
                self.ctx.unify(&left_ty, &Type::float(), loc)?;
                self.ctx.unify(&right_ty, &Type::float(), loc)?;
                Ok(Type::float())
            }

            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
                let operand = self.ctx.fresh_var();
                self.ctx.unify(&left_ty, &operand, loc)?;
                self.ctx.unify(&right_ty, &operand, loc)?;
                let resolved = self.ctx.resolve(&operand);
                match resolved {
                    Type::Prim(Prim::Int)
                    | Type::Prim(Prim::Float)
                    | Type::Prim(Prim::String)
                    | Type::Never => Ok(Type::bool()),
                    other => Err(TypeError::ArithmeticTypeMismatch {
                        op: op.symbol().to_string(),
                        allowed: "Int, Float, or String".to_string(),
                        actual: other,
                        loc,
                    }),
                }
            }

            // Equality is parametric: any two unifiable operands.
            BinOp::Eq | BinOp::Ne => {
                let operand = self.ctx.fresh_var();
                self.ctx.unify(&left_ty, &operand, loc)?;
                self.ctx.unify(&right_ty, &operand, loc)?;
                Ok(Type::bool())
            }

            BinOp::And | BinOp::Or => {
                self.ctx.unify(&left_ty, &Type::bool(), loc)?;
                self.ctx.unify(&right_ty, &Type::bool(), loc)?;
                Ok(Type::bool())
            }

            BinOp::RefAssign => {
                let cell = self.ctx.fresh_var();
                self.ctx
                    .unify(&left_ty, &Type::reference(cell.clone()), loc)?;
                self.ctx.unify(&right_ty, &cell, loc)?;
                Ok(Type::unit())
            }
        }
    }

    fn infer_unary(
        &mut self,
        env: &TypeEnv,
        op: UnaryOp,
        operand: ExprId,
        loc: Location,
    ) -> TypeResult<Type> {
        let operand_ty = self.infer_expr(env, operand)?;
        match op {
            UnaryOp::Neg => {
                let resolved = self.ctx.resolve(&operand_ty);
                match resolved {
                    Type::Prim(Prim::Int) | Type::Prim(Prim::Float) | Type::Never => Ok(resolved),
                    other => Err(TypeError::ArithmeticTypeMismatch {
                        op: op.symbol().to_string(),
                        allowed: "Int or Float".to_string(),
                        actual: other,
                        loc,
                    }),
                }
            }
            UnaryOp::Not => {
                self.ctx.unify(&operand_ty, &Type::bool(), loc)?;
                Ok(Type::bool())
            }
            UnaryOp::Deref => {
                let cell = self.ctx.fresh_var();
                self.ctx
                    .unify(&operand_ty, &Type::reference(cell.clone()), loc)?;
                Ok(self.ctx.resolve(&cell))
            }
        }
    }

    // ── Lambdas, lets, recursion ────────────────────────────────────────

    fn infer_lambda(&mut self, env: &TypeEnv, param: PatternId, body: ExprId) -> TypeResult<Type> {
        let param_ty = self.ctx.fresh_var();
        let bindings = check_pattern(self.ctx, env, self.module, param, &param_ty)?;
        let inner = env.with_mono_values(&bindings);
        let body_ty = self.infer_expr(&inner, body)?;
        Ok(Type::fun(param_ty, body_ty))
    }

    /// Infer a let binding's value and produce its bindings.
    ///
    /// Shared between expression-level lets and top-level declarations:
    /// enters a level, infers the value (pre-binding the pattern's names
    /// for recursive bindings), leaves the level, then generalizes when
    /// the value restriction permits. Only a plain variable pattern
    /// receives the generalized scheme; bindings destructured out of a
    /// compound pattern stay monomorphic.
    pub fn bind_let(
        &mut self,
        env: &TypeEnv,
        pattern: PatternId,
        value: ExprId,
        recursive: bool,
        mutable: bool,
        loc: Location,
    ) -> TypeResult<(Type, Vec<InferredBinding>)> {
        self.ctx.enter_level();

        let result = self.bind_let_inner(env, pattern, value, recursive);
        // The level must be restored on the error path too.
        self.ctx.leave_level();
        let (value_ty, pattern_bindings) = result.map_err(|e| match e {
            TypeError::TypeMismatch {
                expected,
                actual,
                context: None,
                loc,
            } => TypeError::TypeMismatch {
                expected,
                actual,
                context: Some(MismatchContext::LetBinding),
                loc,
            },
            other => other,
        })?;

        // Mutable bindings are rewritten to refs downstream; for the
        // checker they are simply never values, so they cannot be
        // generalized.
        let is_value = !mutable && is_syntactic_value(self.module, value);

        let bindings = match &self.module.pattern(pattern).kind {
            PatternKind::Var(name) => {
                let scheme = if is_value {
                    let scheme = self.ctx.generalize(&value_ty);
                    debug!(
                        binding = name.as_str(),
                        quantified = scheme.quantified.len(),
                        "generalized let binding"
                    );
                    scheme
                } else {
                    Scheme::mono(self.ctx.resolve(&value_ty))
                };
                vec![InferredBinding {
                    name: name.clone(),
                    scheme,
                    restricted: !is_value,
                    loc,
                }]
            }
            _ => pattern_bindings
                .into_iter()
                .map(|(name, ty)| InferredBinding {
                    name,
                    scheme: Scheme::mono(self.ctx.resolve(&ty)),
                    restricted: !is_value,
                    loc,
                })
                .collect(),
        };

        Ok((value_ty, bindings))
    }

    fn bind_let_inner(
        &mut self,
        env: &TypeEnv,
        pattern: PatternId,
        value: ExprId,
        recursive: bool,
    ) -> TypeResult<(Type, Vec<(String, Type)>)> {
        let value_ty = if recursive {
            // Pre-bind the pattern's names so self-references check.
            let names = pattern_names(self.module, pattern);
            let placeholders: Vec<(String, Type)> = names
                .into_iter()
                .map(|name| (name, self.ctx.fresh_var()))
                .collect();
            let inner = env.with_mono_values(&placeholders);
            let value_ty = self.infer_expr(&inner, value)?;

            let bindings = check_pattern(self.ctx, env, self.module, pattern, &value_ty)?;
            for (name, placeholder) in &placeholders {
                if let Some((_, bound)) = bindings.iter().find(|(n, _)| n == name) {
                    let loc = self.module.expr(value).loc;
                    self.ctx.unify(placeholder, bound, loc)?;
                }
            }
            return Ok((value_ty, bindings));
        } else {
            self.infer_expr(env, value)?
        };

        let bindings = check_pattern(self.ctx, env, self.module, pattern, &value_ty)?;
        Ok((value_ty, bindings))
    }

    /// Infer a mutually recursive group: every name is pre-bound to a
    /// fresh monomorphic variable, the values are inferred in order, and
    /// each binding is generalized independently afterwards
    pub fn bind_let_rec_group(
        &mut self,
        env: &TypeEnv,
        bindings: &[RecBinding],
    ) -> TypeResult<Vec<InferredBinding>> {
        self.ctx.enter_level();

        let result = self.bind_group_inner(env, bindings);
        self.ctx.leave_level();
        let placeholders = result?;

        let mut inferred = Vec::with_capacity(bindings.len());
        for (binding, placeholder) in bindings.iter().zip(placeholders) {
            let is_value = is_syntactic_value(self.module, binding.value);
            let scheme = if is_value {
                self.ctx.generalize(&placeholder)
            } else {
                Scheme::mono(self.ctx.resolve(&placeholder))
            };
            inferred.push(InferredBinding {
                name: binding.name.clone(),
                scheme,
                restricted: !is_value,
                loc: binding.loc,
            });
        }
        Ok(inferred)
    }

    fn bind_group_inner(
        &mut self,
        env: &TypeEnv,
        bindings: &[RecBinding],
    ) -> TypeResult<Vec<Type>> {
        let mut placeholders = Vec::with_capacity(bindings.len());
        for binding in bindings {
            if placeholders
                .iter()
                .any(|(name, _): &(String, Type)| name == &binding.name)
            {
                return Err(TypeError::DuplicateDeclaration {
                    name: binding.name.clone(),
                    loc: binding.loc,
                });
            }
            placeholders.push((binding.name.clone(), self.ctx.fresh_var()));
        }

        let inner = env.with_mono_values(&placeholders);
        for (binding, (_, placeholder)) in bindings.iter().zip(placeholders.iter()) {
            let value_ty = self.infer_expr(&inner, binding.value)?;
            self.ctx.unify(placeholder, &value_ty, binding.loc)?;
        }

        Ok(placeholders.into_iter().map(|(_, ty)| ty).collect())
    }

    // ── Match ───────────────────────────────────────────────────────────

    fn infer_match(
        &mut self,
        env: &TypeEnv,
        scrutinee: ExprId,
        arms: &[lumen_ast::MatchArm],
        loc: Location,
    ) -> TypeResult<Type> {
        let scrutinee_ty = self.infer_expr(env, scrutinee)?;
        let result = self.ctx.fresh_var();

        for arm in arms {
            let bindings =
                check_pattern(self.ctx, env, self.module, arm.pattern, &scrutinee_ty)?;
            let inner = env.with_mono_values(&bindings);

            if let Some(guard) = arm.guard {
                let guard_ty = self.infer_expr(&inner, guard)?;
                let guard_loc = self.module.expr(guard).loc;
                self.ctx
                    .unify(&guard_ty, &Type::bool(), guard_loc)
                    .map_err(|_| TypeError::InvalidGuard {
                        actual: self.ctx.resolve(&guard_ty),
                        loc: guard_loc,
                    })?;
            }

            let body_ty = self.infer_expr(&inner, arm.body)?;
            let body_loc = self.module.expr(arm.body).loc;
            self.ctx
                .unify(&body_ty, &result, body_loc)
                .map_err(|e| annotate_context(e, MismatchContext::MatchArm))?;
        }

        let resolved_scrutinee = self.ctx.resolve(&scrutinee_ty);
        let unreachable =
            check_exhaustive(env, self.module, &resolved_scrutinee, arms, loc)?;
        for index in unreachable {
            let arm_loc = self.module.pattern(arms[index].pattern).loc;
            self.warn_unreachable(arm_loc);
        }

        Ok(result)
    }

    fn warn_unreachable(&mut self, loc: Location) {
        let file = self.module.file_name(loc.file_id).to_string();
        self.warnings.push(Diagnostic::warning(
            "UnreachablePattern",
            "this pattern can never match",
            SourcePos::new(file, loc.line, loc.column),
        ));
    }

    // ── Records & variants ──────────────────────────────────────────────

    fn infer_access(
        &mut self,
        env: &TypeEnv,
        record: ExprId,
        field: &str,
        loc: Location,
    ) -> TypeResult<Type> {
        let record_ty = self.infer_expr(env, record)?;
        let resolved = self.ctx.resolve(&record_ty);
        match resolved {
            Type::Record { ref fields } => match fields.get(field) {
                Some(ty) => Ok(ty.clone()),
                None => Err(TypeError::MissingField {
                    field: field.to_string(),
                    record_type: resolved.clone(),
                    loc,
                }),
            },
            Type::Var(_) => {
                // Constrain the unknown to a record with at least this
                // field.
                let field_ty = self.ctx.fresh_var();
                let mut minimum = std::collections::BTreeMap::new();
                minimum.insert(field.to_string(), field_ty.clone());
                self.ctx
                    .subsume(&resolved, &Type::Record { fields: minimum }, loc)?;
                Ok(field_ty)
            }
            Type::Never => Ok(Type::Never),
            other => Err(TypeError::NonRecordAccess { actual: other, loc }),
        }
    }

    fn infer_update(
        &mut self,
        env: &TypeEnv,
        record: ExprId,
        updates: &[(String, ExprId)],
        loc: Location,
    ) -> TypeResult<Type> {
        let record_ty = self.infer_expr(env, record)?;
        let resolved = self.ctx.resolve(&record_ty);
        match resolved {
            Type::Record { ref fields } => {
                for (name, value) in updates {
                    let field_ty = match fields.get(name) {
                        Some(ty) => ty.clone(),
                        None => {
                            return Err(TypeError::MissingField {
                                field: name.clone(),
                                record_type: resolved.clone(),
                                loc,
                            })
                        }
                    };
                    let value_ty = self.infer_expr(env, *value)?;
                    let value_loc = self.module.expr(*value).loc;
                    self.ctx.unify(&value_ty, &field_ty, value_loc)?;
                }
                Ok(resolved)
            }
            Type::Never => Ok(Type::Never),
            other => Err(TypeError::NonRecordAccess { actual: other, loc }),
        }
    }

    fn infer_variant(
        &mut self,
        env: &TypeEnv,
        ctor: &str,
        args: &[ExprId],
        loc: Location,
    ) -> TypeResult<Type> {
        let (def, ctor_def) = match env.lookup_ctor(ctor) {
            Some(found) => found,
            None => {
                return Err(TypeError::UndefinedConstructor {
                    name: ctor.to_string(),
                    loc,
                })
            }
        };
        if ctor_def.params.len() != args.len() {
            return Err(TypeError::ConstructorArity {
                name: ctor.to_string(),
                expected: ctor_def.params.len(),
                actual: args.len(),
                loc,
            });
        }

        let type_name = def.name.clone();
        let param_templates = ctor_def.params.clone();
        let (fresh_args, mapping) = def.instantiate(self.ctx);

        for (arg, param) in args.iter().zip(param_templates.iter()) {
            let arg_ty = self.infer_expr(env, *arg)?;
            let param_ty = mapping.apply(param);
            let arg_loc = self.module.expr(*arg).loc;
            self.ctx.unify(&arg_ty, &param_ty, arg_loc)?;
        }

        Ok(Type::Variant {
            name: type_name,
            args: fresh_args,
        })
    }
}

fn annotate_context(err: TypeError, context: MismatchContext) -> TypeError {
    match err {
        TypeError::TypeMismatch {
            expected,
            actual,
            context: None,
            loc,
        } => TypeError::TypeMismatch {
            expected,
            actual,
            context: Some(context),
            loc,
        },
        other => other,
    }
}

/// Is the expression a syntactic value?
///
/// Only these shapes may be generalized: variables, lambdas, literals,
/// constructor applications of values, records of values, tuples of
/// values, and annotation/unsafe wrappers around values. Everything
/// else — applications (`ref(...)` included), matches, lets, record
/// access and update, operators — is not a value.
pub fn is_syntactic_value(module: &Module, expr: ExprId) -> bool {
    match &module.expr(expr).kind {
        ExprKind::Literal(_) | ExprKind::Var(_) | ExprKind::Lambda { .. } => true,
        ExprKind::Variant { args, .. } => {
            args.iter().all(|arg| is_syntactic_value(module, *arg))
        }
        ExprKind::Tuple(elems) => elems.iter().all(|e| is_syntactic_value(module, *e)),
        ExprKind::Record { fields } => fields
            .iter()
            .all(|(_, value)| is_syntactic_value(module, *value)),
        ExprKind::Annotated { expr, .. } | ExprKind::Unsafe(expr) => {
            is_syntactic_value(module, *expr)
        }
        ExprKind::App { .. }
        | ExprKind::BinOp { .. }
        | ExprKind::UnaryOp { .. }
        | ExprKind::Let { .. }
        | ExprKind::LetRecGroup { .. }
        | ExprKind::Match { .. }
        | ExprKind::RecordAccess { .. }
        | ExprKind::RecordUpdate { .. } => false,
    }
}
