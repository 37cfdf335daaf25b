//! Exhaustiveness and reachability checking for match expressions
//!
//! Matrix-based: the arms' patterns form a matrix that is specialized
//! column by column per head constructor (Maranget's usefulness
//! construction). Missing cases are reconstructed as witness skeletons
//! with `_` placeholders (`Some(_)`, `Cons(_, _)`).
//!
//! Head constructor sets: a variant type contributes its declared
//! constructor roster; `Bool` contributes `true`/`false`; tuples and
//! records are single-constructor with recursive field coverage; every
//! other type (including `String` and `Int`) has no finite roster, so
//! only a wildcard or variable arm covers it. Guarded arms never count
//! toward coverage.
//!
//! Non-exhaustive matches are hard errors; unreachable arms are reported
//! for the caller to surface as warnings.

use crate::env::{TypeDef, TypeEnv};
use crate::error::{TypeError, TypeResult};
use crate::subst::Subst;
use crate::ty::{Type, TUPLE_NAME};
use lumen_ast::{Literal, Location, MatchArm, Module, PatternId, PatternKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cap on reported missing cases, so pathological matches stay readable
const MISSING_LIMIT: usize = 16;

/// A missing-case witness, with `_` placeholder sub-patterns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternSkeleton {
    /// Any value (`_`)
    Wildcard,
    /// A variant constructor applied to placeholders
    Ctor {
        /// Constructor name
        name: String,
        /// Sub-skeletons
        args: Vec<PatternSkeleton>,
    },
    /// A literal, rendered
    Literal(String),
    /// A record of field skeletons
    Record(Vec<(String, PatternSkeleton)>),
    /// A tuple of skeletons
    Tuple(Vec<PatternSkeleton>),
}

impl fmt::Display for PatternSkeleton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternSkeleton::Wildcard => write!(f, "_"),
            PatternSkeleton::Ctor { name, args } => {
                write!(f, "{}", name)?;
                if !args.is_empty() {
                    write!(f, "(")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
            PatternSkeleton::Literal(lit) => write!(f, "{}", lit),
            PatternSkeleton::Record(fields) => {
                write!(f, "{{")?;
                for (i, (name, skel)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, skel)?;
                }
                write!(f, "}}")
            }
            PatternSkeleton::Tuple(elems) => {
                write!(f, "(")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", elem)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Check that the arms cover every value of the scrutinee type.
///
/// On success, returns the indices of unreachable arms (for warnings).
/// On failure, returns [`TypeError::NonExhaustiveMatch`] listing the
/// missing cases.
pub fn check_exhaustive(
    env: &TypeEnv,
    module: &Module,
    scrutinee: &Type,
    arms: &[MatchArm],
    loc: Location,
) -> TypeResult<Vec<usize>> {
    let lowered: Vec<SimplePat> = arms
        .iter()
        .map(|arm| lower(module, arm.pattern))
        .collect();

    // Guarded arms do not count toward coverage: their guard may fail.
    let coverage: Vec<Vec<SimplePat>> = arms
        .iter()
        .zip(lowered.iter())
        .filter(|(arm, _)| arm.guard.is_none())
        .map(|(_, pat)| vec![pat.clone()])
        .collect();

    let tys = [scrutinee.clone()];
    let missing = witnesses(env, &tys, &coverage, MISSING_LIMIT);
    if !missing.is_empty() {
        let missing = missing
            .into_iter()
            .filter_map(|mut w| (!w.is_empty()).then(|| w.remove(0)))
            .collect();
        return Err(TypeError::NonExhaustiveMatch { missing, loc });
    }

    // Reachability: an arm is unreachable when the unguarded arms before
    // it already cover everything it could match.
    let mut unreachable = Vec::new();
    for (i, pat) in lowered.iter().enumerate() {
        let previous: Vec<Vec<SimplePat>> = arms[..i]
            .iter()
            .zip(lowered[..i].iter())
            .filter(|(arm, _)| arm.guard.is_none())
            .map(|(_, p)| vec![p.clone()])
            .collect();
        if !is_useful(env, &tys, &previous, &[pat.clone()]) {
            unreachable.push(i);
        }
    }
    Ok(unreachable)
}

// ── Lowered patterns ───────────────────────────────────────────────────

/// Literal keys with a total equality (floats compared by bits)
#[derive(Debug, Clone, PartialEq, Eq)]
enum LitKey {
    Int(i64),
    Bool(bool),
    Str(String),
    Float(u64),
    Unit,
}

/// A pattern normalized for matrix operations
#[derive(Debug, Clone)]
enum SimplePat {
    Wild,
    Ctor { name: String, args: Vec<SimplePat> },
    Lit(LitKey),
    Tuple(Vec<SimplePat>),
    Record(Vec<(String, SimplePat)>),
}

fn lower(module: &Module, pattern: PatternId) -> SimplePat {
    match &module.pattern(pattern).kind {
        PatternKind::Wildcard | PatternKind::Var(_) => SimplePat::Wild,
        PatternKind::Literal(lit) => SimplePat::Lit(match lit {
            Literal::Int(n) => LitKey::Int(*n),
            Literal::Bool(b) => LitKey::Bool(*b),
            Literal::String(s) => LitKey::Str(s.clone()),
            Literal::Float(f) => LitKey::Float(f.to_bits()),
            Literal::Unit => LitKey::Unit,
        }),
        PatternKind::Variant { ctor, args } => SimplePat::Ctor {
            name: ctor.clone(),
            args: args.iter().map(|a| lower(module, *a)).collect(),
        },
        PatternKind::Tuple(elems) => {
            SimplePat::Tuple(elems.iter().map(|e| lower(module, *e)).collect())
        }
        PatternKind::Record { fields } => SimplePat::Record(
            fields
                .iter()
                .map(|(name, p)| (name.clone(), lower(module, *p)))
                .collect(),
        ),
    }
}

// ── Head constructor spaces ────────────────────────────────────────────

/// The complete head-constructor set of a column type
enum Space {
    /// A variant type's roster: constructor name and instantiated
    /// argument types
    Variants(Vec<(String, Vec<Type>)>),
    /// `true` and `false`
    Bools,
    /// The single tuple constructor of this arity
    Tuple(Vec<Type>),
    /// The single record constructor with these fields
    Record(Vec<(String, Type)>),
    /// No values at all (`Never`)
    Empty,
    /// No finite roster; only a wildcard covers
    Open,
}

/// A type with no values at all
fn is_uninhabited(env: &TypeEnv, ty: &Type) -> bool {
    match ty {
        Type::Never => true,
        Type::Variant { name, .. } if name != TUPLE_NAME => match env.lookup_type(name) {
            Some(TypeDef::Variant(def)) => def.ctors.is_empty(),
            _ => false,
        },
        _ => false,
    }
}

fn space_of(env: &TypeEnv, ty: &Type) -> Space {
    match ty {
        Type::Variant { name, args } if name == TUPLE_NAME => Space::Tuple(args.clone()),
        Type::Variant { name, args } => match env.lookup_type(name) {
            Some(TypeDef::Variant(def)) => {
                let mut mapping = Subst::new();
                for (param, arg) in def.params.iter().zip(args.iter()) {
                    mapping.insert(*param, arg.clone());
                }
                Space::Variants(
                    def.ctors
                        .iter()
                        .map(|c| {
                            (
                                c.name.clone(),
                                c.params.iter().map(|p| mapping.apply(p)).collect(),
                            )
                        })
                        .collect(),
                )
            }
            _ => Space::Open,
        },
        Type::Prim(crate::ty::Prim::Bool) => Space::Bools,
        Type::Record { fields } => Space::Record(
            fields
                .iter()
                .map(|(name, ty)| (name.clone(), ty.clone()))
                .collect(),
        ),
        Type::Never => Space::Empty,
        _ => Space::Open,
    }
}

// ── Matrix operations ──────────────────────────────────────────────────

fn wilds(n: usize) -> Vec<SimplePat> {
    vec![SimplePat::Wild; n]
}

/// Specialize the matrix for a variant constructor head
fn specialize_ctor(rows: &[Vec<SimplePat>], name: &str, arity: usize) -> Vec<Vec<SimplePat>> {
    rows.iter()
        .filter_map(|row| {
            let (first, rest) = row.split_first()?;
            match first {
                SimplePat::Wild => Some([wilds(arity), rest.to_vec()].concat()),
                SimplePat::Ctor { name: n, args } if n == name => {
                    Some([args.clone(), rest.to_vec()].concat())
                }
                _ => None,
            }
        })
        .collect()
}

/// Specialize the matrix for a literal head
fn specialize_lit(rows: &[Vec<SimplePat>], key: &LitKey) -> Vec<Vec<SimplePat>> {
    rows.iter()
        .filter_map(|row| {
            let (first, rest) = row.split_first()?;
            match first {
                SimplePat::Wild => Some(rest.to_vec()),
                SimplePat::Lit(k) if k == key => Some(rest.to_vec()),
                _ => None,
            }
        })
        .collect()
}

/// Specialize the matrix for the tuple head of the given arity
fn specialize_tuple(rows: &[Vec<SimplePat>], arity: usize) -> Vec<Vec<SimplePat>> {
    rows.iter()
        .filter_map(|row| {
            let (first, rest) = row.split_first()?;
            match first {
                SimplePat::Wild => Some([wilds(arity), rest.to_vec()].concat()),
                SimplePat::Tuple(args) => Some([args.clone(), rest.to_vec()].concat()),
                _ => None,
            }
        })
        .collect()
}

/// Specialize the matrix for the record head; pattern fields are aligned
/// to the type's field order, absent fields become wildcards
fn specialize_record(rows: &[Vec<SimplePat>], fields: &[(String, Type)]) -> Vec<Vec<SimplePat>> {
    rows.iter()
        .filter_map(|row| {
            let (first, rest) = row.split_first()?;
            match first {
                SimplePat::Wild => Some([wilds(fields.len()), rest.to_vec()].concat()),
                SimplePat::Record(pat_fields) => {
                    let aligned: Vec<SimplePat> = fields
                        .iter()
                        .map(|(name, _)| {
                            pat_fields
                                .iter()
                                .find(|(n, _)| n == name)
                                .map(|(_, p)| p.clone())
                                .unwrap_or(SimplePat::Wild)
                        })
                        .collect();
                    Some([aligned, rest.to_vec()].concat())
                }
                _ => None,
            }
        })
        .collect()
}

/// Drop the first column, keeping only rows that start with a wildcard
fn default_rows(rows: &[Vec<SimplePat>]) -> Vec<Vec<SimplePat>> {
    rows.iter()
        .filter_map(|row| {
            let (first, rest) = row.split_first()?;
            matches!(first, SimplePat::Wild).then(|| rest.to_vec())
        })
        .collect()
}

// ── Witness construction ───────────────────────────────────────────────

/// Find up to `limit` uncovered value shapes for the given column types
fn witnesses(
    env: &TypeEnv,
    tys: &[Type],
    rows: &[Vec<SimplePat>],
    limit: usize,
) -> Vec<Vec<PatternSkeleton>> {
    if limit == 0 {
        return Vec::new();
    }
    // An empty matrix is witnessed by all-wildcards immediately, unless
    // some column is uninhabited. This is also the recursion bound:
    // without it, expanding a recursive variant's heads against no rows
    // would never terminate.
    if rows.is_empty() {
        if tys.iter().any(|ty| is_uninhabited(env, ty)) {
            return Vec::new();
        }
        return vec![vec![PatternSkeleton::Wildcard; tys.len()]];
    }
    let (first_ty, rest_tys) = match tys.split_first() {
        Some(split) => split,
        None => return Vec::new(),
    };

    match space_of(env, first_ty) {
        // No values inhabit the column; the match is vacuously covered.
        Space::Empty => Vec::new(),

        Space::Variants(ctors) => {
            let complete = ctors.iter().all(|(name, _)| {
                rows.iter().any(
                    |row| matches!(row.first(), Some(SimplePat::Ctor { name: n, .. }) if n == name),
                )
            });
            if complete {
                // Every head is present: specialize each and look for
                // gaps in the sub-patterns.
                let mut out = Vec::new();
                for (name, arg_tys) in ctors {
                    let spec = specialize_ctor(rows, &name, arg_tys.len());
                    let sub_tys = [arg_tys.clone(), rest_tys.to_vec()].concat();
                    for mut w in witnesses(env, &sub_tys, &spec, limit - out.len()) {
                        let rest = w.split_off(arg_tys.len());
                        let mut witness = vec![PatternSkeleton::Ctor {
                            name: name.clone(),
                            args: w,
                        }];
                        witness.extend(rest);
                        out.push(witness);
                        if out.len() == limit {
                            return out;
                        }
                    }
                }
                out
            } else {
                // Incomplete signature: the wildcard rows must cover what
                // the listed heads do not. Each inhabited absent head is a
                // missing case.
                let sub = witnesses(env, rest_tys, &default_rows(rows), limit);
                let mut out = Vec::new();
                for w in sub {
                    for (name, arg_tys) in &ctors {
                        let present = rows.iter().any(|row| {
                            matches!(row.first(), Some(SimplePat::Ctor { name: n, .. }) if n == name)
                        });
                        if present || arg_tys.iter().any(|t| is_uninhabited(env, t)) {
                            continue;
                        }
                        let mut witness = vec![PatternSkeleton::Ctor {
                            name: name.clone(),
                            args: vec![PatternSkeleton::Wildcard; arg_tys.len()],
                        }];
                        witness.extend(w.iter().cloned());
                        out.push(witness);
                        if out.len() == limit {
                            return out;
                        }
                    }
                }
                out
            }
        }

        Space::Bools => {
            let present = |value: bool| {
                rows.iter().any(|row| {
                    matches!(row.first(), Some(SimplePat::Lit(LitKey::Bool(b))) if *b == value)
                })
            };
            if present(true) && present(false) {
                let mut out = Vec::new();
                for value in [true, false] {
                    let spec = specialize_lit(rows, &LitKey::Bool(value));
                    for w in witnesses(env, rest_tys, &spec, limit - out.len()) {
                        let mut witness = vec![PatternSkeleton::Literal(value.to_string())];
                        witness.extend(w);
                        out.push(witness);
                        if out.len() == limit {
                            return out;
                        }
                    }
                }
                out
            } else {
                let sub = witnesses(env, rest_tys, &default_rows(rows), limit);
                let mut out = Vec::new();
                for w in sub {
                    for value in [true, false] {
                        if present(value) {
                            continue;
                        }
                        let mut witness = vec![PatternSkeleton::Literal(value.to_string())];
                        witness.extend(w.iter().cloned());
                        out.push(witness);
                        if out.len() == limit {
                            return out;
                        }
                    }
                }
                out
            }
        }

        Space::Tuple(elem_tys) => {
            let spec = specialize_tuple(rows, elem_tys.len());
            let sub_tys = [elem_tys.clone(), rest_tys.to_vec()].concat();
            witnesses(env, &sub_tys, &spec, limit)
                .into_iter()
                .map(|mut w| {
                    let rest = w.split_off(elem_tys.len());
                    let mut witness = vec![PatternSkeleton::Tuple(w)];
                    witness.extend(rest);
                    witness
                })
                .collect()
        }

        Space::Record(fields) => {
            let spec = specialize_record(rows, &fields);
            let field_tys: Vec<Type> = fields.iter().map(|(_, t)| t.clone()).collect();
            let sub_tys = [field_tys, rest_tys.to_vec()].concat();
            witnesses(env, &sub_tys, &spec, limit)
                .into_iter()
                .map(|mut w| {
                    let rest = w.split_off(fields.len());
                    let record = fields
                        .iter()
                        .map(|(name, _)| name.clone())
                        .zip(w)
                        .collect();
                    let mut witness = vec![PatternSkeleton::Record(record)];
                    witness.extend(rest);
                    witness
                })
                .collect()
        }

        // No finite roster: only wildcard rows can cover the column.
        Space::Open => witnesses(env, rest_tys, &default_rows(rows), limit)
            .into_iter()
            .map(|w| {
                let mut witness = vec![PatternSkeleton::Wildcard];
                witness.extend(w);
                witness
            })
            .collect(),
    }
}

// ── Usefulness (reachability) ──────────────────────────────────────────

/// Is there a value matched by `q` and none of `rows`?
fn is_useful(env: &TypeEnv, tys: &[Type], rows: &[Vec<SimplePat>], q: &[SimplePat]) -> bool {
    let (first_ty, rest_tys) = match tys.split_first() {
        Some(split) => split,
        None => return rows.is_empty(),
    };
    let (q_first, q_rest) = match q.split_first() {
        Some(split) => split,
        None => return rows.is_empty(),
    };

    match q_first {
        SimplePat::Ctor { name, args } => {
            let arg_tys = match space_of(env, first_ty) {
                Space::Variants(ctors) => ctors
                    .into_iter()
                    .find(|(n, _)| n == name)
                    .map(|(_, tys)| tys)
                    .unwrap_or_else(|| vec![Type::Never; args.len()]),
                _ => vec![Type::Never; args.len()],
            };
            let spec = specialize_ctor(rows, name, args.len());
            let sub_tys = [arg_tys, rest_tys.to_vec()].concat();
            let sub_q = [args.clone(), q_rest.to_vec()].concat();
            is_useful(env, &sub_tys, &spec, &sub_q)
        }

        SimplePat::Lit(key) => {
            let spec = specialize_lit(rows, key);
            is_useful(env, rest_tys, &spec, q_rest)
        }

        SimplePat::Tuple(args) => {
            let elem_tys = match space_of(env, first_ty) {
                Space::Tuple(tys) => tys,
                _ => vec![Type::Never; args.len()],
            };
            let spec = specialize_tuple(rows, args.len());
            let sub_tys = [elem_tys, rest_tys.to_vec()].concat();
            let sub_q = [args.clone(), q_rest.to_vec()].concat();
            is_useful(env, &sub_tys, &spec, &sub_q)
        }

        SimplePat::Record(pat_fields) => {
            let fields = match space_of(env, first_ty) {
                Space::Record(fields) => fields,
                _ => pat_fields
                    .iter()
                    .map(|(n, _)| (n.clone(), Type::Never))
                    .collect(),
            };
            let spec = specialize_record(rows, &fields);
            let aligned: Vec<SimplePat> = fields
                .iter()
                .map(|(name, _)| {
                    pat_fields
                        .iter()
                        .find(|(n, _)| n == name)
                        .map(|(_, p)| p.clone())
                        .unwrap_or(SimplePat::Wild)
                })
                .collect();
            let field_tys: Vec<Type> = fields.iter().map(|(_, t)| t.clone()).collect();
            let sub_tys = [field_tys, rest_tys.to_vec()].concat();
            let sub_q = [aligned, q_rest.to_vec()].concat();
            is_useful(env, &sub_tys, &spec, &sub_q)
        }

        SimplePat::Wild => match space_of(env, first_ty) {
            Space::Empty => false,
            Space::Variants(ctors) => {
                let all_present = ctors.iter().all(|(name, _)| {
                    rows.iter().any(
                        |row| matches!(row.first(), Some(SimplePat::Ctor { name: n, .. }) if n == name),
                    )
                });
                if all_present && !ctors.is_empty() {
                    ctors.into_iter().any(|(name, arg_tys)| {
                        let spec = specialize_ctor(rows, &name, arg_tys.len());
                        let arity = arg_tys.len();
                        let sub_tys = [arg_tys, rest_tys.to_vec()].concat();
                        let sub_q = [wilds(arity), q_rest.to_vec()].concat();
                        is_useful(env, &sub_tys, &spec, &sub_q)
                    })
                } else {
                    is_useful(env, rest_tys, &default_rows(rows), q_rest)
                }
            }
            Space::Bools => {
                let both_present = [true, false].iter().all(|v| {
                    rows.iter().any(|row| {
                        matches!(row.first(), Some(SimplePat::Lit(LitKey::Bool(b))) if b == v)
                    })
                });
                if both_present {
                    [true, false].into_iter().any(|v| {
                        let spec = specialize_lit(rows, &LitKey::Bool(v));
                        is_useful(env, rest_tys, &spec, q_rest)
                    })
                } else {
                    is_useful(env, rest_tys, &default_rows(rows), q_rest)
                }
            }
            Space::Tuple(elem_tys) => {
                let spec = specialize_tuple(rows, elem_tys.len());
                let arity = elem_tys.len();
                let sub_tys = [elem_tys, rest_tys.to_vec()].concat();
                let sub_q = [wilds(arity), q_rest.to_vec()].concat();
                is_useful(env, &sub_tys, &spec, &sub_q)
            }
            Space::Record(fields) => {
                let spec = specialize_record(rows, &fields);
                let arity = fields.len();
                let field_tys: Vec<Type> = fields.iter().map(|(_, t)| t.clone()).collect();
                let sub_tys = [field_tys, rest_tys.to_vec()].concat();
                let sub_q = [wilds(arity), q_rest.to_vec()].concat();
                is_useful(env, &sub_tys, &spec, &sub_q)
            }
            Space::Open => is_useful(env, rest_tys, &default_rows(rows), q_rest),
        },
    }
}
