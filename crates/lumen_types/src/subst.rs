//! Type substitutions
//!
//! A substitution is a finite map from inference variable ids to types.
//! Applying a substitution follows variable chains to a fixed point, so the
//! caller always sees a fully resolved outer constructor. Application
//! preserves sharing: when nothing in a type is substituted, the input is
//! returned unchanged instead of being rebuilt.

use crate::ty::{Scheme, TyVar, Type};
use std::collections::HashMap;

/// A finite map from inference variables to types
#[derive(Debug, Clone, Default)]
pub struct Subst {
    map: HashMap<TyVar, Type>,
}

impl Subst {
    /// The empty (identity) substitution
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bound variables
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the substitution is the identity
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Look up a variable's binding
    pub fn get(&self, var: TyVar) -> Option<&Type> {
        self.map.get(&var)
    }

    /// Whether a variable is bound
    pub fn contains(&self, var: TyVar) -> bool {
        self.map.contains_key(&var)
    }

    /// Bind a variable. Bindings are write-once: rebinding an
    /// already-bound variable indicates a bug in unification.
    pub fn insert(&mut self, var: TyVar, ty: Type) {
        debug_assert!(
            !self.map.contains_key(&var),
            "substitution bindings are write-once"
        );
        self.map.insert(var, ty);
    }

    /// Apply the substitution to a type, following chains to a fixed point
    pub fn apply(&self, ty: &Type) -> Type {
        self.apply_changed(ty).unwrap_or_else(|| ty.clone())
    }

    /// Apply the substitution to a scheme, leaving bound variables alone
    pub fn apply_scheme(&self, scheme: &Scheme) -> Scheme {
        if scheme.quantified.is_empty() {
            return Scheme::mono(self.apply(&scheme.body));
        }
        let filtered = Subst {
            map: self
                .map
                .iter()
                .filter(|(v, _)| !scheme.quantified.contains(v))
                .map(|(v, t)| (*v, t.clone()))
                .collect(),
        };
        Scheme::poly(scheme.quantified.clone(), filtered.apply(&scheme.body))
    }

    /// Apply, returning `None` when nothing changed (sharing preservation)
    fn apply_changed(&self, ty: &Type) -> Option<Type> {
        if self.map.is_empty() {
            return None;
        }
        match ty {
            Type::Var(v) => {
                let bound = self.map.get(v)?;
                // Follow the chain so callers see a resolved constructor.
                Some(self.apply(bound))
            }
            Type::Prim(_) | Type::Con(_) | Type::Never => None,
            Type::Fun { param, result } => {
                let new_param = self.apply_changed(param);
                let new_result = self.apply_changed(result);
                if new_param.is_none() && new_result.is_none() {
                    return None;
                }
                Some(Type::Fun {
                    param: Box::new(new_param.unwrap_or_else(|| (**param).clone())),
                    result: Box::new(new_result.unwrap_or_else(|| (**result).clone())),
                })
            }
            Type::App { ctor, args } => {
                let new_ctor = self.apply_changed(ctor);
                let new_args = self.apply_changed_vec(args);
                if new_ctor.is_none() && new_args.is_none() {
                    return None;
                }
                Some(Type::App {
                    ctor: Box::new(new_ctor.unwrap_or_else(|| (**ctor).clone())),
                    args: new_args.unwrap_or_else(|| args.clone()),
                })
            }
            Type::Record { fields } => {
                let mut changed = false;
                let new_fields = fields
                    .iter()
                    .map(|(name, ty)| match self.apply_changed(ty) {
                        Some(new_ty) => {
                            changed = true;
                            (name.clone(), new_ty)
                        }
                        None => (name.clone(), ty.clone()),
                    })
                    .collect();
                if changed {
                    Some(Type::Record { fields: new_fields })
                } else {
                    None
                }
            }
            Type::Variant { name, args } => {
                let new_args = self.apply_changed_vec(args)?;
                Some(Type::Variant {
                    name: name.clone(),
                    args: new_args,
                })
            }
            Type::Ref(inner) => {
                let new_inner = self.apply_changed(inner)?;
                Some(Type::Ref(Box::new(new_inner)))
            }
            Type::Union(alts) => {
                let new_alts = self.apply_changed_vec(alts)?;
                Some(Type::Union(new_alts))
            }
        }
    }

    fn apply_changed_vec(&self, types: &[Type]) -> Option<Vec<Type>> {
        let mut changed = false;
        let new_types: Vec<Type> = types
            .iter()
            .map(|t| match self.apply_changed(t) {
                Some(new_t) => {
                    changed = true;
                    new_t
                }
                None => t.clone(),
            })
            .collect();
        changed.then_some(new_types)
    }
}

/// Compose two substitutions: the result applies `first`, then `second`.
///
/// Every image of `first` is rewritten through `second`, then the bindings
/// of `second` that `first` does not mention are unioned in.
pub fn compose(first: &Subst, second: &Subst) -> Subst {
    let mut map: HashMap<TyVar, Type> = first
        .map
        .iter()
        .map(|(v, t)| (*v, second.apply(t)))
        .collect();
    for (v, t) in &second.map {
        map.entry(*v).or_insert_with(|| t.clone());
    }
    Subst { map }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(id: u64) -> TyVar {
        TyVar(id)
    }

    #[test]
    fn test_identity_preserves_sharing() {
        let subst = Subst::new();
        let ty = Type::fun(Type::int(), Type::Var(v(0)));
        assert_eq!(subst.apply(&ty), ty);
    }

    #[test]
    fn test_apply_follows_chains() {
        let mut subst = Subst::new();
        subst.insert(v(0), Type::Var(v(1)));
        subst.insert(v(1), Type::int());

        // Chains resolve to a fixed point.
        assert_eq!(subst.apply(&Type::Var(v(0))), Type::int());
    }

    #[test]
    fn test_apply_rewrites_under_constructors() {
        let mut subst = Subst::new();
        subst.insert(v(0), Type::string());

        let ty = Type::list(Type::Var(v(0)));
        assert_eq!(subst.apply(&ty), Type::list(Type::string()));

        let rec = Type::record(vec![("x", Type::Var(v(0)))]);
        assert_eq!(
            subst.apply(&rec),
            Type::record(vec![("x", Type::string())])
        );
    }

    #[test]
    fn test_apply_scheme_respects_bound_vars() {
        let mut subst = Subst::new();
        subst.insert(v(0), Type::int());
        subst.insert(v(1), Type::bool());

        let scheme = Scheme::poly(
            vec![v(0)],
            Type::fun(Type::Var(v(0)), Type::Var(v(1))),
        );
        let applied = subst.apply_scheme(&scheme);

        // v0 is bound by the scheme and untouched; v1 is free and rewritten.
        assert_eq!(
            applied.body,
            Type::fun(Type::Var(v(0)), Type::bool())
        );
    }

    #[test]
    fn test_compose_order() {
        let mut s1 = Subst::new();
        s1.insert(v(0), Type::Var(v(1)));
        let mut s2 = Subst::new();
        s2.insert(v(1), Type::int());

        let composed = compose(&s1, &s2);
        assert_eq!(composed.apply(&Type::Var(v(0))), Type::int());
        assert_eq!(composed.apply(&Type::Var(v(1))), Type::int());
    }

    #[test]
    fn test_compose_identity() {
        let mut s = Subst::new();
        s.insert(v(0), Type::int());
        let id = Subst::new();

        let left = compose(&id, &s);
        let right = compose(&s, &id);
        assert_eq!(left.apply(&Type::Var(v(0))), Type::int());
        assert_eq!(right.apply(&Type::Var(v(0))), Type::int());
    }
}
