//! Unification
//!
//! Solves the constraint that two types are equal, extending the context's
//! substitution. One recursive step:
//! 1. Resolve both sides through the substitution
//! 2. Identical constants/variables succeed immediately
//! 3. A variable binds to the other side after the occurs check, lowering
//!    the level of every variable in the bound type to the binder's level
//! 4. `Never` unifies with anything (bottom)
//! 5. Compound types unify structurally; variants are nominal; refs are
//!    invariant
//!
//! Record unification comes in two disciplines: plain [`InferCtx::unify`]
//! requires the same field sets on both sides, while
//! [`InferCtx::subsume`] (checking against an expected type) applies width
//! subtyping in the permissive direction only — every expected field must
//! be present, extra actual fields are accepted.

use crate::ctx::InferCtx;
use crate::error::{TypeError, TypeResult};
use crate::ty::{TyVar, Type};
use lumen_ast::Location;

/// How record widths are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordMode {
    /// Field sets must be identical
    Exact,
    /// The expected side is a minimum; extra actual fields are accepted
    Width,
}

impl InferCtx {
    /// Solve `actual ~ expected` with exact record widths
    pub fn unify(&mut self, actual: &Type, expected: &Type, loc: Location) -> TypeResult<()> {
        self.unify_mode(actual, expected, loc, RecordMode::Exact)
    }

    /// Check `actual` against `expected` with width subtyping on records
    pub fn subsume(&mut self, actual: &Type, expected: &Type, loc: Location) -> TypeResult<()> {
        self.unify_mode(actual, expected, loc, RecordMode::Width)
    }

    fn unify_mode(
        &mut self,
        actual: &Type,
        expected: &Type,
        loc: Location,
        mode: RecordMode,
    ) -> TypeResult<()> {
        let a = self.resolve(actual);
        let b = self.resolve(expected);

        match (a, b) {
            // Identical variables are already equal.
            (Type::Var(v), Type::Var(w)) if v == w => Ok(()),

            // A variable binds to the other side.
            (Type::Var(v), other) | (other, Type::Var(v)) => self.bind_var(v, other, loc),

            // Identical constants.
            (Type::Prim(p), Type::Prim(q)) if p == q => Ok(()),
            (Type::Con(m), Type::Con(n)) if m == n => Ok(()),

            // Never is bottom: it unifies with any type.
            (Type::Never, _) | (_, Type::Never) => Ok(()),

            (
                Type::Fun {
                    param: p1,
                    result: r1,
                },
                Type::Fun {
                    param: p2,
                    result: r2,
                },
            ) => {
                self.unify_mode(&p1, &p2, loc, mode)?;
                self.unify_mode(&r1, &r2, loc, mode)
            }

            (
                Type::App {
                    ctor: c1,
                    args: a1,
                },
                Type::App {
                    ctor: c2,
                    args: a2,
                },
            ) => {
                if a1.len() != a2.len() {
                    return Err(self.mismatch(
                        Type::App { ctor: c1, args: a1 },
                        Type::App { ctor: c2, args: a2 },
                        loc,
                    ));
                }
                self.unify_mode(&c1, &c2, loc, mode)?;
                for (x, y) in a1.iter().zip(a2.iter()) {
                    self.unify_mode(x, y, loc, mode)?;
                }
                Ok(())
            }

            // References are invariant: the cell contents must match
            // exactly in both directions.
            (Type::Ref(x), Type::Ref(y)) => self.unify_mode(&x, &y, loc, RecordMode::Exact),

            // Variants are nominal: the declared names must match.
            (
                Type::Variant {
                    name: n1,
                    args: a1,
                },
                Type::Variant {
                    name: n2,
                    args: a2,
                },
            ) => {
                if n1 != n2 || a1.len() != a2.len() {
                    return Err(self.mismatch(
                        Type::Variant { name: n1, args: a1 },
                        Type::Variant { name: n2, args: a2 },
                        loc,
                    ));
                }
                for (x, y) in a1.iter().zip(a2.iter()) {
                    self.unify_mode(x, y, loc, mode)?;
                }
                Ok(())
            }

            (Type::Record { fields: f1 }, Type::Record { fields: f2 }) => {
                self.unify_records(f1, f2, loc, mode)
            }

            // A union unifies if the other side unifies with at least one
            // alternative; failed attempts are rolled back.
            (Type::Union(alts), other) => self.unify_union(&alts, &other, true, loc, mode),
            (other, Type::Union(alts)) => self.unify_union(&alts, &other, false, loc, mode),

            (a, b) => Err(self.mismatch(a, b, loc)),
        }
    }

    fn unify_records(
        &mut self,
        actual: std::collections::BTreeMap<String, Type>,
        expected: std::collections::BTreeMap<String, Type>,
        loc: Location,
        mode: RecordMode,
    ) -> TypeResult<()> {
        if mode == RecordMode::Exact && actual.len() != expected.len() {
            return Err(self.mismatch(
                Type::Record { fields: actual },
                Type::Record { fields: expected },
                loc,
            ));
        }
        // Every expected field must be present in the actual record; in
        // exact mode the equal sizes make the sets equal.
        for (name, expected_ty) in &expected {
            match actual.get(name) {
                Some(actual_ty) => self.unify_mode(actual_ty, expected_ty, loc, mode)?,
                None => {
                    return Err(TypeError::MissingField {
                        field: name.clone(),
                        record_type: self.resolve(&Type::Record { fields: actual }),
                        loc,
                    })
                }
            }
        }
        Ok(())
    }

    fn unify_union(
        &mut self,
        alts: &[Type],
        other: &Type,
        union_is_actual: bool,
        loc: Location,
        mode: RecordMode,
    ) -> TypeResult<()> {
        for alt in alts {
            let snapshot = self.snapshot();
            let result = if union_is_actual {
                self.unify_mode(alt, other, loc, mode)
            } else {
                self.unify_mode(other, alt, loc, mode)
            };
            match result {
                Ok(()) => return Ok(()),
                Err(_) => self.restore(snapshot),
            }
        }
        let union = Type::Union(alts.to_vec());
        if union_is_actual {
            Err(self.mismatch(union, other.clone(), loc))
        } else {
            Err(self.mismatch(other.clone(), union, loc))
        }
    }

    /// Bind a variable to a resolved type, with occurs check and level
    /// update
    fn bind_var(&mut self, var: TyVar, ty: Type, loc: Location) -> TypeResult<()> {
        if ty.contains_var(var) {
            return Err(TypeError::InfiniteType {
                var,
                occurs_in: ty,
                loc,
            });
        }
        // Every variable reachable from the bound type is pulled down to
        // the binder's level, so generalization at any outer scope sees
        // the most conservative level.
        let level = self.var_level(var);
        self.lower_levels_in(&ty, level);
        self.subst.insert(var, ty);
        Ok(())
    }

    fn lower_levels_in(&mut self, ty: &Type, to: u32) {
        match ty {
            Type::Var(w) => self.lower_level(*w, to),
            Type::Prim(_) | Type::Con(_) | Type::Never => {}
            Type::Fun { param, result } => {
                self.lower_levels_in(param, to);
                self.lower_levels_in(result, to);
            }
            Type::App { ctor, args } => {
                self.lower_levels_in(ctor, to);
                for arg in args {
                    self.lower_levels_in(arg, to);
                }
            }
            Type::Record { fields } => {
                for field in fields.values() {
                    self.lower_levels_in(field, to);
                }
            }
            Type::Variant { args, .. } => {
                for arg in args {
                    self.lower_levels_in(arg, to);
                }
            }
            Type::Ref(inner) => self.lower_levels_in(inner, to),
            Type::Union(alts) => {
                for alt in alts {
                    self.lower_levels_in(alt, to);
                }
            }
        }
    }

    fn mismatch(&self, actual: Type, expected: Type, loc: Location) -> TypeError {
        TypeError::TypeMismatch {
            expected,
            actual,
            context: None,
            loc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> Location {
        Location::dummy()
    }

    #[test]
    fn test_unify_var_with_concrete() {
        let mut ctx = InferCtx::new();
        let a = ctx.fresh_var();
        ctx.unify(&a, &Type::int(), loc()).unwrap();
        assert_eq!(ctx.resolve(&a), Type::int());
    }

    #[test]
    fn test_unify_two_vars_then_bind() {
        let mut ctx = InferCtx::new();
        let a = ctx.fresh_var();
        let b = ctx.fresh_var();
        ctx.unify(&a, &b, loc()).unwrap();
        ctx.unify(&b, &Type::string(), loc()).unwrap();
        assert_eq!(ctx.resolve(&a), Type::string());
        assert_eq!(ctx.resolve(&b), Type::string());
    }

    #[test]
    fn test_unify_mismatch() {
        let mut ctx = InferCtx::new();
        let err = ctx.unify(&Type::int(), &Type::string(), loc()).unwrap_err();
        assert!(matches!(err, TypeError::TypeMismatch { .. }));
    }

    #[test]
    fn test_unify_symmetry() {
        // unify(a, b) succeeds iff unify(b, a) succeeds.
        let cases = [
            (Type::int(), Type::int(), true),
            (Type::int(), Type::string(), false),
            (
                Type::fun(Type::int(), Type::bool()),
                Type::fun(Type::int(), Type::bool()),
                true,
            ),
            (Type::list(Type::int()), Type::option(Type::int()), false),
        ];
        for (a, b, expect) in cases {
            let mut ctx1 = InferCtx::new();
            let mut ctx2 = InferCtx::new();
            assert_eq!(ctx1.unify(&a, &b, loc()).is_ok(), expect);
            assert_eq!(ctx2.unify(&b, &a, loc()).is_ok(), expect);
        }
    }

    #[test]
    fn test_unify_idempotent() {
        let mut ctx = InferCtx::new();
        let a = ctx.fresh_var();
        let list_a = Type::list(a.clone());
        let list_int = Type::list(Type::int());
        ctx.unify(&list_a, &list_int, loc()).unwrap();

        // Applying the substitution to both sides and unifying again is a
        // no-op.
        let ra = ctx.resolve(&list_a);
        let rb = ctx.resolve(&list_int);
        assert_eq!(ra, rb);
        let before = ctx.substitution().len();
        ctx.unify(&ra, &rb, loc()).unwrap();
        assert_eq!(ctx.substitution().len(), before);
    }

    #[test]
    fn test_occurs_check() {
        let mut ctx = InferCtx::new();
        let a = ctx.fresh_var();
        let fun = Type::fun(a.clone(), Type::int());
        let err = ctx.unify(&a, &fun, loc()).unwrap_err();
        assert!(matches!(err, TypeError::InfiniteType { .. }));
        // The failed binding must not extend the substitution.
        assert!(ctx.substitution().is_empty());
    }

    #[test]
    fn test_never_unifies_with_anything() {
        let mut ctx = InferCtx::new();
        ctx.unify(&Type::Never, &Type::int(), loc()).unwrap();
        ctx.unify(&Type::string(), &Type::Never, loc()).unwrap();
    }

    #[test]
    fn test_fun_unifies_param_then_result() {
        let mut ctx = InferCtx::new();
        let a = ctx.fresh_var();
        let b = ctx.fresh_var();
        let f1 = Type::fun(a.clone(), b.clone());
        let f2 = Type::fun(Type::int(), Type::bool());
        ctx.unify(&f1, &f2, loc()).unwrap();
        assert_eq!(ctx.resolve(&a), Type::int());
        assert_eq!(ctx.resolve(&b), Type::bool());
    }

    #[test]
    fn test_variants_are_nominal() {
        // Same constructor roster shapes, different names: never unify.
        let mut ctx = InferCtx::new();
        let this = Type::Variant {
            name: "Shape".to_string(),
            args: vec![Type::int()],
        };
        let that = Type::Variant {
            name: "Blob".to_string(),
            args: vec![Type::int()],
        };
        assert!(ctx.unify(&this, &that, loc()).is_err());
    }

    #[test]
    fn test_ref_is_invariant() {
        let mut ctx = InferCtx::new();
        let r1 = Type::reference(Type::int());
        let r2 = Type::reference(Type::int());
        ctx.unify(&r1, &r2, loc()).unwrap();

        let r3 = Type::reference(Type::string());
        assert!(ctx.unify(&r1, &r3, loc()).is_err());
    }

    #[test]
    fn test_record_exact_width() {
        let mut ctx = InferCtx::new();
        let narrow = Type::record(vec![("x", Type::int())]);
        let wide = Type::record(vec![("x", Type::int()), ("y", Type::int())]);
        // Plain unification rejects differing widths in both directions.
        assert!(ctx.unify(&wide, &narrow, loc()).is_err());
        assert!(ctx.unify(&narrow, &wide, loc()).is_err());
    }

    #[test]
    fn test_record_width_subtyping() {
        let mut ctx = InferCtx::new();
        let narrow = Type::record(vec![("x", Type::int())]);
        let wide = Type::record(vec![("x", Type::int()), ("y", Type::int())]);

        // {x, y} is usable where {x} is expected...
        ctx.subsume(&wide, &narrow, loc()).unwrap();
        // ...but not the other way around.
        let err = ctx.subsume(&narrow, &wide, loc()).unwrap_err();
        assert!(matches!(err, TypeError::MissingField { .. }));
    }

    #[test]
    fn test_union_takes_first_matching_alternative() {
        let mut ctx = InferCtx::new();
        let union = Type::Union(vec![Type::int(), Type::string()]);
        ctx.unify(&union, &Type::string(), loc()).unwrap();

        let mut ctx2 = InferCtx::new();
        assert!(ctx2.unify(&union, &Type::bool(), loc()).is_err());
    }

    #[test]
    fn test_union_rolls_back_failed_attempts() {
        let mut ctx = InferCtx::new();
        let a = ctx.fresh_var();
        let union = Type::Union(vec![
            Type::fun(Type::int(), Type::int()),
            Type::fun(a.clone(), Type::string()),
        ]);
        let target = Type::fun(Type::bool(), Type::string());
        // First alternative fails after binding nothing permanent; the
        // second succeeds and binds `a`.
        ctx.unify(&union, &target, loc()).unwrap();
        assert_eq!(ctx.resolve(&a), Type::bool());
    }

    #[test]
    fn test_level_update_on_binding() {
        let mut ctx = InferCtx::new();
        let outer = ctx.fresh_ty_var();
        ctx.enter_level();
        let inner = ctx.fresh_ty_var();
        // Bind outer ↦ List<inner>: inner is lowered to outer's level.
        ctx.unify(
            &Type::Var(outer),
            &Type::list(Type::Var(inner)),
            loc(),
        )
        .unwrap();
        assert_eq!(ctx.var_level(inner), 0);
        ctx.leave_level();
    }

    #[test]
    fn test_app_arity_mismatch() {
        let mut ctx = InferCtx::new();
        let one = Type::App {
            ctor: Box::new(Type::Con("Promise".to_string())),
            args: vec![Type::int()],
        };
        let two = Type::App {
            ctor: Box::new(Type::Con("Promise".to_string())),
            args: vec![Type::int(), Type::int()],
        };
        assert!(ctx.unify(&one, &two, loc()).is_err());
    }
}
