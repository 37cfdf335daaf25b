//! Programmatic module construction
//!
//! `ModuleBuilder` is the construction surface for desugared modules: the
//! upstream desugarer targets it, and the checker's test suites use it to
//! build trees without a front end. Every helper allocates into the module
//! arena and returns the node id, mirroring the arena's `alloc_*` family.

use crate::decl::{ConstructorDef, Decl, DeclKind, ExternalSig, TypeDefBody};
use crate::expr::{BinOp, Expr, ExprId, ExprKind, Literal, MatchArm, RecBinding, UnaryOp};
use crate::module::Module;
use crate::pattern::{Pattern, PatternId, PatternKind};
use crate::span::Location;
use crate::ty::{TypeExpr, TypeExprId, TypeExprKind};

/// Builder for desugared modules
#[derive(Debug)]
pub struct ModuleBuilder {
    module: Module,
}

impl ModuleBuilder {
    /// Start building a module for the given source file
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            module: Module::new(file),
        }
    }

    /// Finish building and return the module
    pub fn finish(self) -> Module {
        self.module
    }

    fn expr(&mut self, kind: ExprKind) -> ExprId {
        self.module.alloc_expr(Expr {
            kind,
            loc: Location::dummy(),
        })
    }

    fn pattern(&mut self, kind: PatternKind) -> PatternId {
        self.module.alloc_pattern(Pattern {
            kind,
            loc: Location::dummy(),
        })
    }

    fn type_expr(&mut self, kind: TypeExprKind) -> TypeExprId {
        self.module.alloc_type_expr(TypeExpr {
            kind,
            loc: Location::dummy(),
        })
    }

    fn decl(&mut self, kind: DeclKind) {
        self.module.push_decl(Decl {
            kind,
            loc: Location::dummy(),
        });
    }

    // ── Expressions ─────────────────────────────────────────────────────

    /// Integer literal
    pub fn int(&mut self, value: i64) -> ExprId {
        self.expr(ExprKind::Literal(Literal::Int(value)))
    }

    /// Float literal
    pub fn float(&mut self, value: f64) -> ExprId {
        self.expr(ExprKind::Literal(Literal::Float(value)))
    }

    /// String literal
    pub fn string(&mut self, value: impl Into<String>) -> ExprId {
        self.expr(ExprKind::Literal(Literal::String(value.into())))
    }

    /// Boolean literal
    pub fn bool(&mut self, value: bool) -> ExprId {
        self.expr(ExprKind::Literal(Literal::Bool(value)))
    }

    /// Unit literal
    pub fn unit(&mut self) -> ExprId {
        self.expr(ExprKind::Literal(Literal::Unit))
    }

    /// Variable reference
    pub fn var(&mut self, name: impl Into<String>) -> ExprId {
        self.expr(ExprKind::Var(name.into()))
    }

    /// Unary lambda
    pub fn lambda(&mut self, param: PatternId, body: ExprId) -> ExprId {
        self.expr(ExprKind::Lambda { param, body })
    }

    /// Unary lambda binding a plain variable
    pub fn lambda_var(&mut self, param: impl Into<String>, body: ExprId) -> ExprId {
        let param = self.p_var(param);
        self.lambda(param, body)
    }

    /// Single application
    pub fn app(&mut self, func: ExprId, arg: ExprId) -> ExprId {
        self.expr(ExprKind::App { func, arg })
    }

    /// Curried application of several arguments
    pub fn call(&mut self, func: ExprId, args: &[ExprId]) -> ExprId {
        args.iter().fold(func, |f, &a| self.app(f, a))
    }

    /// Binary operation
    pub fn binop(&mut self, op: BinOp, left: ExprId, right: ExprId) -> ExprId {
        self.expr(ExprKind::BinOp { op, left, right })
    }

    /// Unary operation
    pub fn unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        self.expr(ExprKind::UnaryOp { op, operand })
    }

    /// Non-recursive let
    pub fn let_(&mut self, pattern: PatternId, value: ExprId, body: ExprId) -> ExprId {
        self.expr(ExprKind::Let {
            pattern,
            value,
            body,
            recursive: false,
            mutable: false,
        })
    }

    /// Non-recursive let binding a plain variable
    pub fn let_var(&mut self, name: impl Into<String>, value: ExprId, body: ExprId) -> ExprId {
        let pattern = self.p_var(name);
        self.let_(pattern, value, body)
    }

    /// Recursive let binding a plain variable
    pub fn let_rec(&mut self, name: impl Into<String>, value: ExprId, body: ExprId) -> ExprId {
        let pattern = self.p_var(name);
        self.expr(ExprKind::Let {
            pattern,
            value,
            body,
            recursive: true,
            mutable: false,
        })
    }

    /// Mutable let binding a plain variable
    pub fn let_mutable(&mut self, name: impl Into<String>, value: ExprId, body: ExprId) -> ExprId {
        let pattern = self.p_var(name);
        self.expr(ExprKind::Let {
            pattern,
            value,
            body,
            recursive: false,
            mutable: true,
        })
    }

    /// Mutually recursive let group
    pub fn let_rec_group(&mut self, bindings: Vec<(&str, ExprId)>, body: ExprId) -> ExprId {
        let bindings = bindings
            .into_iter()
            .map(|(name, value)| RecBinding {
                name: name.to_string(),
                value,
                loc: Location::dummy(),
            })
            .collect();
        self.expr(ExprKind::LetRecGroup { bindings, body })
    }

    /// Match expression without guards
    pub fn match_(&mut self, scrutinee: ExprId, arms: Vec<(PatternId, ExprId)>) -> ExprId {
        let arms = arms
            .into_iter()
            .map(|(pattern, body)| MatchArm {
                pattern,
                guard: None,
                body,
            })
            .collect();
        self.expr(ExprKind::Match { scrutinee, arms })
    }

    /// Match expression with optional guards per arm
    pub fn match_guarded(
        &mut self,
        scrutinee: ExprId,
        arms: Vec<(PatternId, Option<ExprId>, ExprId)>,
    ) -> ExprId {
        let arms = arms
            .into_iter()
            .map(|(pattern, guard, body)| MatchArm {
                pattern,
                guard,
                body,
            })
            .collect();
        self.expr(ExprKind::Match { scrutinee, arms })
    }

    /// Record literal
    pub fn record(&mut self, fields: &[(&str, ExprId)]) -> ExprId {
        let fields = fields
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect();
        self.expr(ExprKind::Record { fields })
    }

    /// Record field access
    pub fn access(&mut self, record: ExprId, field: impl Into<String>) -> ExprId {
        self.expr(ExprKind::RecordAccess {
            record,
            field: field.into(),
        })
    }

    /// Record update
    pub fn update(&mut self, record: ExprId, updates: &[(&str, ExprId)]) -> ExprId {
        let updates = updates
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect();
        self.expr(ExprKind::RecordUpdate { record, updates })
    }

    /// Variant construction
    pub fn variant(&mut self, ctor: impl Into<String>, args: &[ExprId]) -> ExprId {
        self.expr(ExprKind::Variant {
            ctor: ctor.into(),
            args: args.to_vec(),
        })
    }

    /// Tuple construction
    pub fn tuple(&mut self, elems: &[ExprId]) -> ExprId {
        self.expr(ExprKind::Tuple(elems.to_vec()))
    }

    /// Unsafe block
    pub fn unsafe_(&mut self, inner: ExprId) -> ExprId {
        self.expr(ExprKind::Unsafe(inner))
    }

    /// Type annotation
    pub fn annotated(&mut self, expr: ExprId, ty: TypeExprId) -> ExprId {
        self.expr(ExprKind::Annotated { expr, ty })
    }

    // ── Patterns ────────────────────────────────────────────────────────

    /// Wildcard pattern
    pub fn p_wildcard(&mut self) -> PatternId {
        self.pattern(PatternKind::Wildcard)
    }

    /// Variable pattern
    pub fn p_var(&mut self, name: impl Into<String>) -> PatternId {
        self.pattern(PatternKind::Var(name.into()))
    }

    /// Integer literal pattern
    pub fn p_int(&mut self, value: i64) -> PatternId {
        self.pattern(PatternKind::Literal(Literal::Int(value)))
    }

    /// Boolean literal pattern
    pub fn p_bool(&mut self, value: bool) -> PatternId {
        self.pattern(PatternKind::Literal(Literal::Bool(value)))
    }

    /// String literal pattern
    pub fn p_string(&mut self, value: impl Into<String>) -> PatternId {
        self.pattern(PatternKind::Literal(Literal::String(value.into())))
    }

    /// Unit literal pattern
    pub fn p_unit(&mut self) -> PatternId {
        self.pattern(PatternKind::Literal(Literal::Unit))
    }

    /// Variant pattern
    pub fn p_variant(&mut self, ctor: impl Into<String>, args: &[PatternId]) -> PatternId {
        self.pattern(PatternKind::Variant {
            ctor: ctor.into(),
            args: args.to_vec(),
        })
    }

    /// Record pattern
    pub fn p_record(&mut self, fields: &[(&str, PatternId)]) -> PatternId {
        let fields = fields
            .iter()
            .map(|(name, pattern)| (name.to_string(), *pattern))
            .collect();
        self.pattern(PatternKind::Record { fields })
    }

    /// Tuple pattern
    pub fn p_tuple(&mut self, elems: &[PatternId]) -> PatternId {
        self.pattern(PatternKind::Tuple(elems.to_vec()))
    }

    // ── Surface types ───────────────────────────────────────────────────

    /// Named surface type
    pub fn t_named(&mut self, name: impl Into<String>, args: &[TypeExprId]) -> TypeExprId {
        self.type_expr(TypeExprKind::Named {
            name: name.into(),
            args: args.to_vec(),
        })
    }

    /// Function arrow surface type
    pub fn t_fun(&mut self, param: TypeExprId, result: TypeExprId) -> TypeExprId {
        self.type_expr(TypeExprKind::Fun { param, result })
    }

    /// Record surface type
    pub fn t_record(&mut self, fields: &[(&str, TypeExprId)]) -> TypeExprId {
        let fields = fields
            .iter()
            .map(|(name, ty)| (name.to_string(), *ty))
            .collect();
        self.type_expr(TypeExprKind::Record { fields })
    }

    /// Union surface type
    pub fn t_union(&mut self, alternatives: &[TypeExprId]) -> TypeExprId {
        self.type_expr(TypeExprKind::Union {
            alternatives: alternatives.to_vec(),
        })
    }

    /// Tuple surface type
    pub fn t_tuple(&mut self, elems: &[TypeExprId]) -> TypeExprId {
        self.type_expr(TypeExprKind::Tuple(elems.to_vec()))
    }

    /// Type variable (only legal inside type definition bodies)
    pub fn t_var(&mut self, name: impl Into<String>) -> TypeExprId {
        self.type_expr(TypeExprKind::Var(name.into()))
    }

    // ── Declarations ────────────────────────────────────────────────────

    /// Top-level let declaration
    pub fn decl_let(&mut self, pattern: PatternId, value: ExprId) {
        self.decl(DeclKind::Let {
            pattern,
            value,
            recursive: false,
            mutable: false,
        });
    }

    /// Top-level let declaration binding a plain variable
    pub fn decl_let_var(&mut self, name: impl Into<String>, value: ExprId) {
        let pattern = self.p_var(name);
        self.decl_let(pattern, value);
    }

    /// Top-level recursive let declaration
    pub fn decl_let_rec(&mut self, name: impl Into<String>, value: ExprId) {
        let pattern = self.p_var(name);
        self.decl(DeclKind::Let {
            pattern,
            value,
            recursive: true,
            mutable: false,
        });
    }

    /// Top-level mutually recursive group
    pub fn decl_let_rec_group(&mut self, bindings: Vec<(&str, ExprId)>) {
        let bindings = bindings
            .into_iter()
            .map(|(name, value)| RecBinding {
                name: name.to_string(),
                value,
                loc: Location::dummy(),
            })
            .collect();
        self.decl(DeclKind::LetRecGroup { bindings });
    }

    /// External declaration
    pub fn decl_external(
        &mut self,
        name: impl Into<String>,
        ty: TypeExprId,
        js_name: impl Into<String>,
    ) {
        self.decl(DeclKind::External {
            name: name.into(),
            sig: ExternalSig {
                ty,
                js_name: js_name.into(),
            },
        });
    }

    /// Overloaded external declaration
    pub fn decl_external_overload(
        &mut self,
        name: impl Into<String>,
        overloads: Vec<(TypeExprId, &str)>,
    ) {
        let overloads = overloads
            .into_iter()
            .map(|(ty, js_name)| ExternalSig {
                ty,
                js_name: js_name.to_string(),
            })
            .collect();
        self.decl(DeclKind::ExternalOverload {
            name: name.into(),
            overloads,
        });
    }

    /// External type declaration
    pub fn decl_external_type(&mut self, name: impl Into<String>, arity: usize) {
        self.decl(DeclKind::ExternalType {
            name: name.into(),
            arity,
        });
    }

    /// Variant type definition
    pub fn decl_type_variant(
        &mut self,
        name: impl Into<String>,
        params: &[&str],
        ctors: Vec<(&str, Vec<TypeExprId>)>,
    ) {
        let ctors = ctors
            .into_iter()
            .map(|(ctor, params)| ConstructorDef {
                name: ctor.to_string(),
                params,
                loc: Location::dummy(),
            })
            .collect();
        self.decl(DeclKind::TypeDef {
            name: name.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
            body: TypeDefBody::Variant(ctors),
        });
    }

    /// Record type definition
    pub fn decl_type_record(
        &mut self,
        name: impl Into<String>,
        params: &[&str],
        fields: Vec<(&str, TypeExprId)>,
    ) {
        let fields = fields
            .into_iter()
            .map(|(name, ty)| (name.to_string(), ty))
            .collect();
        self.decl(DeclKind::TypeDef {
            name: name.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
            body: TypeDefBody::Record(fields),
        });
    }

    /// Export declaration
    pub fn decl_export(&mut self, names: &[&str]) {
        self.decl(DeclKind::Export {
            names: names.iter().map(|n| n.to_string()).collect(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curried_call() {
        let mut b = ModuleBuilder::new("test.lm");
        let f = b.var("f");
        let x = b.int(1);
        let y = b.int(2);
        let call = b.call(f, &[x, y]);
        let module = b.finish();

        // call = App(App(f, 1), 2)
        match &module.expr(call).kind {
            ExprKind::App { func, arg } => {
                assert_eq!(*arg, y);
                assert!(matches!(module.expr(*func).kind, ExprKind::App { .. }));
            }
            other => panic!("expected App, got {:?}", other),
        }
    }

    #[test]
    fn test_lambda_var() {
        let mut b = ModuleBuilder::new("test.lm");
        let body = b.var("x");
        let lam = b.lambda_var("x", body);
        let module = b.finish();
        assert!(matches!(module.expr(lam).kind, ExprKind::Lambda { .. }));
    }
}
