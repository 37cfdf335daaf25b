//! Type checker error taxonomy
//!
//! A closed set of failures the checker can report. Every error carries the
//! source location that triggered it; conversion to a renderable
//! [`Diagnostic`] attaches expected/actual types and hints.

use crate::exhaustive::PatternSkeleton;
use crate::ty::{render_cycle, TyVar, Type};
use lumen_ast::Location;
use lumen_diagnostics::{Diagnostic, SourcePos};
use thiserror::Error;

/// Result type for checker operations
pub type TypeResult<T> = Result<T, TypeError>;

/// A type checking error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeError {
    /// Two types failed to unify
    #[error("expected `{expected}` but found `{actual}`")]
    TypeMismatch {
        /// The type the context required
        expected: Type,
        /// The type that was actually found
        actual: Type,
        /// What the checker was doing (drives hints)
        context: Option<MismatchContext>,
        /// Where the mismatch was detected
        loc: Location,
    },

    /// The occurs check rejected a cyclic binding
    #[error("cannot construct the infinite type {}", render_infinite(.var, .occurs_in))]
    InfiniteType {
        /// The variable being bound
        var: TyVar,
        /// The type it occurs in
        occurs_in: Type,
        /// Where the cycle was detected
        loc: Location,
    },

    /// A variable was not in scope
    #[error("undefined variable `{name}`")]
    UndefinedVariable {
        /// The missing name
        name: String,
        /// Similar in-scope names, closest first
        suggestions: Vec<String>,
        /// Where the variable was referenced
        loc: Location,
    },

    /// A type name was not in scope
    #[error("undefined type `{name}`")]
    UndefinedType {
        /// The missing type name
        name: String,
        /// Where the type was referenced
        loc: Location,
    },

    /// A variant constructor was not in scope
    #[error("undefined constructor `{name}`")]
    UndefinedConstructor {
        /// The missing constructor name
        name: String,
        /// Where the constructor was referenced
        loc: Location,
    },

    /// A constructor or type constructor was applied to the wrong number
    /// of arguments
    #[error("`{name}` expects {expected} argument(s) but got {actual}")]
    ConstructorArity {
        /// The constructor name
        name: String,
        /// Declared arity
        expected: usize,
        /// Number of arguments supplied
        actual: usize,
        /// Where the application happened
        loc: Location,
    },

    /// A record does not have the requested field
    #[error("record type `{record_type}` has no field `{field}`")]
    MissingField {
        /// The missing field name
        field: String,
        /// The record type that was searched
        record_type: Type,
        /// Where the access happened
        loc: Location,
    },

    /// Field access on something that is not a record
    #[error("cannot access a field on non-record type `{actual}`")]
    NonRecordAccess {
        /// The non-record type
        actual: Type,
        /// Where the access happened
        loc: Location,
    },

    /// A match does not cover every case
    #[error("non-exhaustive match, missing cases: {}", render_missing(.missing))]
    NonExhaustiveMatch {
        /// The uncovered cases, as pattern skeletons
        missing: Vec<PatternSkeleton>,
        /// The match expression's location
        loc: Location,
    },

    /// A match guard is not a boolean
    #[error("match guard must be `Bool` but found `{actual}`")]
    InvalidGuard {
        /// The guard's actual type
        actual: Type,
        /// The guard's location
        loc: Location,
    },

    /// A non-syntactic-value binding would need to be polymorphic
    #[error("cannot generalize `{binding}`: its definition is not a syntactic value")]
    ValueRestriction {
        /// The binding's name
        binding: String,
        /// The binding's location
        loc: Location,
    },

    /// A type variable survived top-level generalization unquantified
    #[error("a type variable escapes in the binding `{binding}`")]
    EscapingTypeVar {
        /// The binding's name
        binding: String,
        /// The binding's location
        loc: Location,
    },

    /// Operator operands resolved to an unsupported type
    #[error("operator `{op}` requires {allowed} operands but found `{actual}`")]
    ArithmeticTypeMismatch {
        /// The operator's surface spelling
        op: String,
        /// Description of the permitted operand types
        allowed: String,
        /// The operand type that was found
        actual: Type,
        /// The operator's location
        loc: Location,
    },

    /// No overload of an external matches the applied arity
    #[error("no overload of `{name}` takes {arity} argument(s)")]
    OverloadNoMatch {
        /// The overloaded name
        name: String,
        /// The arity at the call site
        arity: usize,
        /// Arities that are available
        available: Vec<usize>,
        /// The call site
        loc: Location,
    },

    /// An overloaded external was used where no arity is determined
    #[error("ambiguous use of overloaded external `{name}`")]
    OverloadAmbiguous {
        /// The overloaded name
        name: String,
        /// The use site
        loc: Location,
    },

    /// The same name is bound twice in one pattern
    #[error("duplicate binding `{name}` in pattern")]
    DuplicatePatternBinding {
        /// The duplicated name
        name: String,
        /// The pattern's location
        loc: Location,
    },

    /// A top-level name or type was declared twice (or clashes with a
    /// built-in)
    #[error("duplicate declaration of `{name}`")]
    DuplicateDeclaration {
        /// The duplicated name
        name: String,
        /// The later declaration's location
        loc: Location,
    },

    /// A type variable appeared in a position that does not support them
    #[error("type variables are not supported here: `{name}`")]
    TypeVarNotSupported {
        /// The variable's surface name
        name: String,
        /// Where it appeared
        loc: Location,
    },
}

/// What the checker was doing when a mismatch was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchContext {
    /// Checking a let binding's value
    LetBinding,
    /// Checking a match arm's body against the match result
    MatchArm,
    /// Checking an expression against its annotation
    Annotation,
}

fn render_infinite(var: &TyVar, occurs_in: &Type) -> String {
    let (var_name, ty) = render_cycle(*var, occurs_in);
    format!("{} ~ {}", var_name, ty)
}

fn render_missing(missing: &[PatternSkeleton]) -> String {
    missing
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl TypeError {
    /// The error kind's name, used as the diagnostic header
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeError::TypeMismatch { .. } => "TypeMismatch",
            TypeError::InfiniteType { .. } => "InfiniteType",
            TypeError::UndefinedVariable { .. } => "UndefinedVariable",
            TypeError::UndefinedType { .. } => "UndefinedType",
            TypeError::UndefinedConstructor { .. } => "UndefinedConstructor",
            TypeError::ConstructorArity { .. } => "ConstructorArity",
            TypeError::MissingField { .. } => "MissingField",
            TypeError::NonRecordAccess { .. } => "NonRecordAccess",
            TypeError::NonExhaustiveMatch { .. } => "NonExhaustiveMatch",
            TypeError::InvalidGuard { .. } => "InvalidGuard",
            TypeError::ValueRestriction { .. } => "ValueRestriction",
            TypeError::EscapingTypeVar { .. } => "EscapingTypeVar",
            TypeError::ArithmeticTypeMismatch { .. } => "ArithmeticTypeMismatch",
            TypeError::OverloadNoMatch { .. } => "OverloadNoMatch",
            TypeError::OverloadAmbiguous { .. } => "OverloadAmbiguous",
            TypeError::DuplicatePatternBinding { .. } => "DuplicatePatternBinding",
            TypeError::DuplicateDeclaration { .. } => "DuplicateDeclaration",
            TypeError::TypeVarNotSupported { .. } => "TypeVarNotSupported",
        }
    }

    /// The location the error points at
    pub fn loc(&self) -> Location {
        match self {
            TypeError::TypeMismatch { loc, .. }
            | TypeError::InfiniteType { loc, .. }
            | TypeError::UndefinedVariable { loc, .. }
            | TypeError::UndefinedType { loc, .. }
            | TypeError::UndefinedConstructor { loc, .. }
            | TypeError::ConstructorArity { loc, .. }
            | TypeError::MissingField { loc, .. }
            | TypeError::NonRecordAccess { loc, .. }
            | TypeError::NonExhaustiveMatch { loc, .. }
            | TypeError::InvalidGuard { loc, .. }
            | TypeError::ValueRestriction { loc, .. }
            | TypeError::EscapingTypeVar { loc, .. }
            | TypeError::ArithmeticTypeMismatch { loc, .. }
            | TypeError::OverloadNoMatch { loc, .. }
            | TypeError::OverloadAmbiguous { loc, .. }
            | TypeError::DuplicatePatternBinding { loc, .. }
            | TypeError::DuplicateDeclaration { loc, .. }
            | TypeError::TypeVarNotSupported { loc, .. } => *loc,
        }
    }

    /// Expected/actual type pair, rendered, when the error has one
    pub fn expected_actual(&self) -> Option<(String, String)> {
        match self {
            TypeError::TypeMismatch {
                expected, actual, ..
            } => Some((expected.to_string(), actual.to_string())),
            TypeError::InvalidGuard { actual, .. } => {
                Some(("Bool".to_string(), actual.to_string()))
            }
            TypeError::ArithmeticTypeMismatch {
                allowed, actual, ..
            } => Some((allowed.clone(), actual.to_string())),
            _ => None,
        }
    }

    /// A suggestion for the user, when the error has one
    pub fn hint(&self) -> Option<String> {
        match self {
            TypeError::UndefinedVariable { suggestions, .. } => match suggestions.as_slice() {
                [] => None,
                [one] => Some(format!("did you mean `{}`?", one)),
                many => Some(format!(
                    "did you mean one of: {}?",
                    many.iter()
                        .map(|s| format!("`{}`", s))
                        .collect::<Vec<_>>()
                        .join(", ")
                )),
            },
            TypeError::TypeMismatch {
                context: Some(MismatchContext::LetBinding),
                ..
            } => Some("consider adding a type annotation".to_string()),
            TypeError::InfiniteType { var, occurs_in, .. } => {
                let (var_name, ty) = render_cycle(*var, occurs_in);
                Some(format!("the cycle arises from `{} ~ {}`", var_name, ty))
            }
            TypeError::OverloadNoMatch { available, .. } => Some(format!(
                "available arities: {}",
                available
                    .iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            TypeError::NonExhaustiveMatch { .. } => {
                Some("add the missing cases or a wildcard arm".to_string())
            }
            _ => None,
        }
    }

    /// Convert to a renderable diagnostic, resolving the file name through
    /// the module's file table
    pub fn to_diagnostic(&self, files: &[String]) -> Diagnostic {
        let loc = self.loc();
        let file = files
            .get(loc.file_id as usize)
            .cloned()
            .unwrap_or_else(|| "<unknown>".to_string());
        let mut diag = Diagnostic::error(
            self.kind_name(),
            self.to_string(),
            SourcePos::new(file, loc.line, loc.column),
        );
        if let Some((expected, actual)) = self.expected_actual() {
            diag = diag.with_types(expected, actual);
        }
        if let Some(hint) = self.hint() {
            diag = diag.with_hint(hint);
        }
        diag
    }
}

// ── "Did you mean?" suggestions ────────────────────────────────────────

/// Levenshtein edit distance between two strings
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Collect in-scope names within the edit-distance threshold of `name`,
/// closest first, capped at three
pub fn suggest<'a>(
    name: &str,
    candidates: impl Iterator<Item = &'a str>,
    threshold: u32,
) -> Vec<String> {
    let mut scored: Vec<(usize, String)> = candidates
        .filter_map(|c| {
            let dist = levenshtein(name, c);
            (dist > 0 && dist <= threshold as usize).then(|| (dist, c.to_string()))
        })
        .collect();
    scored.sort();
    scored.dedup();
    scored.into_iter().map(|(_, c)| c).take(3).collect()
}
