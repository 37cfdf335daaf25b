//! The inference context
//!
//! All mutable state of a checking run lives here: the fresh-id counter,
//! the current let-nesting level, the substitution, and the side table
//! recording the level at which each variable was born. The context is
//! threaded explicitly through inference; nothing is global.
//!
//! Levels implement Remy-style generalization: a variable may be
//! quantified at a let binding only if its level is strictly greater than
//! the binding's level. Unification lowers levels (never raises them), so
//! a variable captured by an outer scope can never be generalized in an
//! inner one.

use crate::subst::Subst;
use crate::ty::{Scheme, TyVar, Type};

/// The working state of one checking run
#[derive(Debug)]
pub struct InferCtx {
    /// Next fresh variable id
    next_var: u64,
    /// Current let-nesting level
    level: u32,
    /// The accumulated substitution (write-once per variable)
    pub(crate) subst: Subst,
    /// Birth level of each variable, indexed by id
    var_levels: Vec<u32>,
}

impl InferCtx {
    /// Create a fresh context at level 0
    pub fn new() -> Self {
        Self {
            next_var: 0,
            level: 0,
            subst: Subst::new(),
            var_levels: Vec::new(),
        }
    }

    // ── Fresh variables ─────────────────────────────────────────────────

    /// Mint a fresh variable id at the current level
    pub fn fresh_ty_var(&mut self) -> TyVar {
        let var = TyVar(self.next_var);
        self.next_var += 1;
        self.var_levels.push(self.level);
        var
    }

    /// Mint a fresh variable type at the current level
    pub fn fresh_var(&mut self) -> Type {
        Type::Var(self.fresh_ty_var())
    }

    // ── Levels ──────────────────────────────────────────────────────────

    /// Enter a let binding (increase nesting depth)
    pub fn enter_level(&mut self) {
        self.level += 1;
    }

    /// Leave a let binding (decrease nesting depth)
    pub fn leave_level(&mut self) {
        debug_assert!(self.level > 0, "cannot leave level 0");
        self.level -= 1;
    }

    /// The current let-nesting level
    pub fn current_level(&self) -> u32 {
        self.level
    }

    /// The level at which a variable was born (after any lowering)
    pub fn var_level(&self, var: TyVar) -> u32 {
        self.var_levels.get(var.0 as usize).copied().unwrap_or(0)
    }

    /// Lower a variable's level. Levels never increase.
    pub fn lower_level(&mut self, var: TyVar, to: u32) {
        if let Some(level) = self.var_levels.get_mut(var.0 as usize) {
            if to < *level {
                *level = to;
            }
        }
    }

    // ── Substitution ────────────────────────────────────────────────────

    /// Resolve a type through the current substitution
    pub fn resolve(&self, ty: &Type) -> Type {
        self.subst.apply(ty)
    }

    /// The accumulated substitution
    pub fn substitution(&self) -> &Subst {
        &self.subst
    }

    // ── Snapshots ───────────────────────────────────────────────────────

    /// Capture the mutable state, so a speculative unification (union
    /// alternatives) can be rolled back on failure
    pub(crate) fn snapshot(&self) -> CtxSnapshot {
        CtxSnapshot {
            subst: self.subst.clone(),
            var_levels: self.var_levels.clone(),
            next_var: self.next_var,
        }
    }

    /// Roll back to a previously captured snapshot
    pub(crate) fn restore(&mut self, snapshot: CtxSnapshot) {
        self.subst = snapshot.subst;
        self.var_levels = snapshot.var_levels;
        self.next_var = snapshot.next_var;
    }

    // ── Instantiation & generalization ──────────────────────────────────

    /// Instantiate a scheme: replace each quantified variable with a fresh
    /// variable at the current level
    pub fn instantiate(&mut self, scheme: &Scheme) -> Type {
        if scheme.quantified.is_empty() {
            return self.resolve(&scheme.body);
        }
        let mut mapping = Subst::new();
        for q in &scheme.quantified {
            let fresh = self.fresh_var();
            mapping.insert(*q, fresh);
        }
        mapping.apply(&self.resolve(&scheme.body))
    }

    /// Generalize a type at the current level: quantify exactly the free
    /// variables whose level is strictly greater than the current level
    pub fn generalize(&self, ty: &Type) -> Scheme {
        let resolved = self.resolve(ty);
        let mut quantified = Vec::new();
        self.collect_generalizable(&resolved, &mut quantified);
        Scheme::poly(quantified, resolved)
    }

    fn collect_generalizable(&self, ty: &Type, out: &mut Vec<TyVar>) {
        match ty {
            Type::Var(v) => {
                if self.var_level(*v) > self.level && !out.contains(v) {
                    out.push(*v);
                }
            }
            Type::Prim(_) | Type::Con(_) | Type::Never => {}
            Type::Fun { param, result } => {
                self.collect_generalizable(param, out);
                self.collect_generalizable(result, out);
            }
            Type::App { ctor, args } => {
                self.collect_generalizable(ctor, out);
                for arg in args {
                    self.collect_generalizable(arg, out);
                }
            }
            Type::Record { fields } => {
                for field in fields.values() {
                    self.collect_generalizable(field, out);
                }
            }
            Type::Variant { args, .. } => {
                for arg in args {
                    self.collect_generalizable(arg, out);
                }
            }
            Type::Ref(inner) => self.collect_generalizable(inner, out),
            Type::Union(alts) => {
                for alt in alts {
                    self.collect_generalizable(alt, out);
                }
            }
        }
    }
}

impl Default for InferCtx {
    fn default() -> Self {
        Self::new()
    }
}

/// Captured mutable state of an [`InferCtx`]
#[derive(Debug)]
pub(crate) struct CtxSnapshot {
    subst: Subst,
    var_levels: Vec<u32>,
    next_var: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_vars_are_distinct() {
        let mut ctx = InferCtx::new();
        let a = ctx.fresh_var();
        let b = ctx.fresh_var();
        assert_ne!(a, b);
    }

    #[test]
    fn test_var_levels_track_nesting() {
        let mut ctx = InferCtx::new();
        let outer = ctx.fresh_ty_var();
        ctx.enter_level();
        let inner = ctx.fresh_ty_var();
        ctx.leave_level();

        assert_eq!(ctx.var_level(outer), 0);
        assert_eq!(ctx.var_level(inner), 1);
    }

    #[test]
    fn test_lower_level_never_raises() {
        let mut ctx = InferCtx::new();
        ctx.enter_level();
        let v = ctx.fresh_ty_var();
        ctx.leave_level();

        ctx.lower_level(v, 0);
        assert_eq!(ctx.var_level(v), 0);
        ctx.lower_level(v, 5);
        assert_eq!(ctx.var_level(v), 0);
    }

    #[test]
    fn test_generalize_quantifies_inner_vars() {
        let mut ctx = InferCtx::new();
        ctx.enter_level();
        let a = ctx.fresh_var();
        let identity = Type::fun(a.clone(), a);
        ctx.leave_level();

        let scheme = ctx.generalize(&identity);
        assert_eq!(scheme.quantified.len(), 1);
        assert_eq!(scheme.to_string(), "a -> a");
    }

    #[test]
    fn test_generalize_skips_outer_vars() {
        let mut ctx = InferCtx::new();
        let outer = ctx.fresh_var();
        ctx.enter_level();
        let inner = ctx.fresh_var();
        ctx.leave_level();

        let ty = Type::fun(outer, inner);
        let scheme = ctx.generalize(&ty);
        // Only the inner variable is eligible.
        assert_eq!(scheme.quantified.len(), 1);
    }

    #[test]
    fn test_instantiate_produces_fresh_vars() {
        let mut ctx = InferCtx::new();
        ctx.enter_level();
        let a = ctx.fresh_var();
        let identity = Type::fun(a.clone(), a);
        ctx.leave_level();
        let scheme = ctx.generalize(&identity);

        let inst1 = ctx.instantiate(&scheme);
        let inst2 = ctx.instantiate(&scheme);
        assert_ne!(inst1, inst2);
    }

    #[test]
    fn test_instantiate_mono_is_identity() {
        let mut ctx = InferCtx::new();
        let scheme = Scheme::mono(Type::int());
        assert_eq!(ctx.instantiate(&scheme), Type::int());
    }
}
