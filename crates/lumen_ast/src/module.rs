//! Module arena for Core AST nodes
//!
//! Nodes are allocated in per-category `Vec`s and referenced by typed u32
//! indices (`ExprId`, `PatternId`, `TypeExprId`). This keeps the tree
//! serializable, cache-friendly, and free of pointer cycles; consumers look
//! children up through the owning module.

use crate::decl::Decl;
use crate::expr::{Expr, ExprId};
use crate::pattern::{Pattern, PatternId};
use crate::ty::{TypeExpr, TypeExprId};
use serde::{Deserialize, Serialize};

/// A complete desugared module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Source file names (indexed by `Location::file_id`)
    pub files: Vec<String>,
    /// Top-level declarations, in source order
    pub decls: Vec<Decl>,
    /// Expression arena
    exprs: Vec<Expr>,
    /// Pattern arena
    patterns: Vec<Pattern>,
    /// Surface type expression arena
    type_exprs: Vec<TypeExpr>,
}

impl Module {
    /// Create an empty module for the given source file
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            files: vec![file.into()],
            decls: Vec::new(),
            exprs: Vec::new(),
            patterns: Vec::new(),
            type_exprs: Vec::new(),
        }
    }

    /// Allocate an expression node
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = self.exprs.len() as ExprId;
        self.exprs.push(expr);
        id
    }

    /// Allocate a pattern node
    pub fn alloc_pattern(&mut self, pattern: Pattern) -> PatternId {
        let id = self.patterns.len() as PatternId;
        self.patterns.push(pattern);
        id
    }

    /// Allocate a surface type node
    pub fn alloc_type_expr(&mut self, ty: TypeExpr) -> TypeExprId {
        let id = self.type_exprs.len() as TypeExprId;
        self.type_exprs.push(ty);
        id
    }

    /// Append a declaration
    pub fn push_decl(&mut self, decl: Decl) {
        self.decls.push(decl);
    }

    /// Get an expression node
    ///
    /// Panics on an out-of-range ID; ids are only minted by `alloc_expr`,
    /// so a bad id means a malformed input module.
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id as usize]
    }

    /// Get a pattern node
    pub fn pattern(&self, id: PatternId) -> &Pattern {
        &self.patterns[id as usize]
    }

    /// Get a surface type node
    pub fn type_expr(&self, id: TypeExprId) -> &TypeExpr {
        &self.type_exprs[id as usize]
    }

    /// Number of allocated expressions
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    /// Resolve a file id to its name
    pub fn file_name(&self, file_id: u32) -> &str {
        self.files
            .get(file_id as usize)
            .map(String::as_str)
            .unwrap_or("<unknown>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{ExprKind, Literal};
    use crate::span::Location;

    #[test]
    fn test_alloc_and_get() {
        let mut module = Module::new("test.lm");
        let id = module.alloc_expr(Expr {
            kind: ExprKind::Literal(Literal::Int(1)),
            loc: Location::dummy(),
        });
        assert_eq!(id, 0);
        assert!(matches!(
            module.expr(id).kind,
            ExprKind::Literal(Literal::Int(1))
        ));
        assert_eq!(module.expr_count(), 1);
    }

    #[test]
    fn test_file_names() {
        let module = Module::new("main.lm");
        assert_eq!(module.file_name(0), "main.lm");
        assert_eq!(module.file_name(9), "<unknown>");
    }
}
