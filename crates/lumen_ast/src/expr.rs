//! Expression nodes of the Core AST
//!
//! These are the expression forms the upstream desugarer produces. By the
//! time a tree reaches the type checker every multi-argument lambda has been
//! curried, `if` has been rewritten to `match`, list literals to
//! `Cons`/`Nil`, pipes and composition to applications, and blocks to
//! nested lets. The checker can therefore assume all functions are unary
//! and the surface sugar is gone.

use crate::pattern::PatternId;
use crate::span::Location;
use crate::ty::TypeExprId;
use serde::{Deserialize, Serialize};

/// Expression node ID (index into the module arena)
pub type ExprId = u32;

/// An expression in the Core AST
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    /// The expression kind
    pub kind: ExprKind,
    /// Source location
    pub loc: Location,
}

/// Literal values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// Integer literal (e.g., `42`)
    Int(i64),
    /// Floating point literal (e.g., `3.14`)
    Float(f64),
    /// String literal
    String(String),
    /// Boolean literal
    Bool(bool),
    /// Unit literal (`()`)
    Unit,
}

/// Binary operators
///
/// `Divide` never appears here: the desugarer resolves it to `IntDiv` or
/// `FloatDiv` before the core runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Remainder (`%`)
    Mod,
    /// Integer division (`/` on integers)
    IntDiv,
    /// Float division (`/.` / `/` on floats)
    FloatDiv,
    /// Less than (`<`)
    Lt,
    /// Less than or equal (`<=`)
    Le,
    /// Greater than (`>`)
    Gt,
    /// Greater than or equal (`>=`)
    Ge,
    /// Equality (`==`)
    Eq,
    /// Inequality (`!=`)
    Ne,
    /// Logical and (`&&`)
    And,
    /// Logical or (`||`)
    Or,
    /// Reference assignment (`:=`)
    RefAssign,
}

impl BinOp {
    /// The operator's surface spelling, for error messages
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Mod => "%",
            BinOp::IntDiv => "/",
            BinOp::FloatDiv => "/.",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::RefAssign => ":=",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Numeric negation (`-x`)
    Neg,
    /// Logical not (`!x` on booleans)
    Not,
    /// Reference dereference (`!r` on references)
    Deref,
}

impl UnaryOp {
    /// The operator's surface spelling, for error messages
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::Deref => "!",
        }
    }
}

/// One arm of a match expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchArm {
    /// Pattern to match against the scrutinee
    pub pattern: PatternId,
    /// Optional boolean guard
    pub guard: Option<ExprId>,
    /// Arm body
    pub body: ExprId,
}

/// One binding of a mutually recursive group (`let rec f = … and g = …`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecBinding {
    /// Bound name
    pub name: String,
    /// Bound value
    pub value: ExprId,
    /// Source location of the binding
    pub loc: Location,
}

/// Expression kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    /// Literal value
    Literal(Literal),

    /// Variable reference
    Var(String),

    /// Unary lambda (multi-argument lambdas are curried upstream)
    Lambda {
        /// Parameter pattern
        param: PatternId,
        /// Body expression
        body: ExprId,
    },

    /// Function application (one argument at a time)
    App {
        /// Function expression
        func: ExprId,
        /// Argument expression
        arg: ExprId,
    },

    /// Binary operation
    BinOp {
        /// The operator
        op: BinOp,
        /// Left operand
        left: ExprId,
        /// Right operand
        right: ExprId,
    },

    /// Unary operation
    UnaryOp {
        /// The operator
        op: UnaryOp,
        /// Operand
        operand: ExprId,
    },

    /// Let binding (`let p = v in body`)
    Let {
        /// Bound pattern
        pattern: PatternId,
        /// Bound value
        value: ExprId,
        /// Body in which the binding is visible
        body: ExprId,
        /// Whether the binding may refer to itself
        recursive: bool,
        /// Whether the binding is mutable (rewritten to a ref downstream)
        mutable: bool,
    },

    /// Mutually recursive let group (`let rec f = … and g = … in body`)
    LetRecGroup {
        /// The bindings, in source order
        bindings: Vec<RecBinding>,
        /// Body in which all bindings are visible
        body: ExprId,
    },

    /// Match expression
    Match {
        /// Scrutinee expression
        scrutinee: ExprId,
        /// Match arms, in source order
        arms: Vec<MatchArm>,
    },

    /// Record literal (`{x: 1, y: 2}`)
    Record {
        /// Field initializers, in source order
        fields: Vec<(String, ExprId)>,
    },

    /// Record field access (`r.x`)
    RecordAccess {
        /// Record expression
        record: ExprId,
        /// Field name
        field: String,
    },

    /// Record update (`{r | x: 1}`)
    RecordUpdate {
        /// Record being updated
        record: ExprId,
        /// Updated fields, in source order
        updates: Vec<(String, ExprId)>,
    },

    /// Variant construction (`Some(x)`, `Nil`)
    Variant {
        /// Constructor name
        ctor: String,
        /// Constructor arguments (saturated)
        args: Vec<ExprId>,
    },

    /// Tuple construction (`(a, b)`)
    Tuple(Vec<ExprId>),

    /// Unsafe block (marks an FFI boundary; still fully type-checked)
    Unsafe(ExprId),

    /// Type annotation (`(e : T)`)
    Annotated {
        /// Annotated expression
        expr: ExprId,
        /// Surface type expression
        ty: TypeExprId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binop_symbols() {
        assert_eq!(BinOp::Add.symbol(), "+");
        assert_eq!(BinOp::RefAssign.symbol(), ":=");
        assert_eq!(BinOp::IntDiv.symbol(), "/");
        assert_eq!(BinOp::FloatDiv.symbol(), "/.");
    }

    #[test]
    fn test_literal_kinds() {
        let lit = ExprKind::Literal(Literal::Int(42));
        assert!(matches!(lit, ExprKind::Literal(Literal::Int(42))));
    }
}
