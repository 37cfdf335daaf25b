//! End-to-end inference scenarios over whole modules

use lumen_ast::{BinOp, Module, ModuleBuilder};
use lumen_types::{CheckOptions, CheckedModule, TypeChecker, TypeError, Type};

fn check(module: &Module) -> Result<CheckedModule, TypeError> {
    TypeChecker::new(CheckOptions::default()).check_module(module)
}

/// `let id = (x) => x in (id(1), id("hi"))`
#[test]
fn identity_is_polymorphic() {
    let mut b = ModuleBuilder::new("main.lm");
    let body = b.var("x");
    let id_fn = b.lambda_var("x", body);
    let id1 = b.var("id");
    let one = b.int(1);
    let first = b.app(id1, one);
    let id2 = b.var("id");
    let hi = b.string("hi");
    let second = b.app(id2, hi);
    let pair = b.tuple(&[first, second]);
    let expr = b.let_var("id", id_fn, pair);
    b.decl_let_var("result", expr);
    let module = b.finish();

    let checked = check(&module).unwrap();
    assert_eq!(
        checked.bindings["result"].body,
        Type::tuple(vec![Type::int(), Type::string()])
    );
    // The inner binding's scheme is ∀a. a -> a; the visible evidence is
    // that both instantiations went through. The tuple node's recorded
    // type is ground after zonking.
    assert_eq!(
        checked.types[&pair],
        Type::tuple(vec![Type::int(), Type::string()])
    );
}

/// `let rec fact = (n) => match n { 0 => 1 ; n => n * fact(n - 1) }`
#[test]
fn factorial_is_int_to_int() {
    let mut b = ModuleBuilder::new("main.lm");
    let zero_pat = b.p_int(0);
    let one = b.int(1);
    let n_pat = b.p_var("n");
    let n1 = b.var("n");
    let fact = b.var("fact");
    let n2 = b.var("n");
    let lit1 = b.int(1);
    let sub = b.binop(BinOp::Sub, n2, lit1);
    let call = b.app(fact, sub);
    let mul = b.binop(BinOp::Mul, n1, call);
    let scrut = b.var("n");
    let match_ = b.match_(scrut, vec![(zero_pat, one), (n_pat, mul)]);
    let lam = b.lambda_var("n", match_);
    b.decl_let_rec("fact", lam);

    let fact_var = b.var("fact");
    let five = b.int(5);
    let result = b.app(fact_var, five);
    b.decl_let_var("answer", result);
    let module = b.finish();

    let checked = check(&module).unwrap();
    // The multiplication pins n, so the binding ends up monomorphic even
    // though the lambda itself was eligible for generalization.
    let fact_scheme = &checked.bindings["fact"];
    assert!(fact_scheme.quantified.is_empty());
    assert_eq!(fact_scheme.body, Type::fun(Type::int(), Type::int()));
    assert_eq!(checked.bindings["answer"].body, Type::int());
}

/// `let f = () => ref(None) ; let cell = f()` must fail: the cell's
/// element type can neither be generalized (value restriction) nor
/// resolved.
#[test]
fn ref_allocation_cannot_escape() {
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
    assert!(
        matches!(
            err,
            TypeError::ValueRestriction { .. } | TypeError::EscapingTypeVar { .. }
        ),
        "expected a value-restriction or escape failure, got {:?}",
        err
    );
}

/// `match opt { Some(x) => x }` on `Option<Int>` reports the missing
/// `None` case.
#[test]
fn non_exhaustive_option_match() {
    let mut b = ModuleBuilder::new("main.lm");
    let one = b.int(1);
    let opt = b.variant("Some", &[one]);
    let x_pat = b.p_var("x");
    let some_pat = b.p_variant("Some", &[x_pat]);
    let x = b.var("x");
    let match_ = b.match_(opt, vec![(some_pat, x)]);
    b.decl_let_var("r", match_);
    let module = b.finish();

    let err = check(&module).unwrap_err();
    match err {
        TypeError::NonExhaustiveMatch { missing, .. } => {
            let rendered: Vec<String> = missing.iter().map(|m| m.to_string()).collect();
            assert_eq!(rendered, vec!["None".to_string()]);
        }
        other => panic!("expected NonExhaustiveMatch, got {:?}", other),
    }
}

/// `{x:1, y:2} == {x:1, y:2, z:3}` fails: equality constrains both sides
/// to one type, and record widths must then match exactly.
#[test]
fn record_equality_requires_equal_widths() {
    let mut b = ModuleBuilder::new("main.lm");
    let x1 = b.int(1);
    let y1 = b.int(2);
    let left = b.record(&[("x", x1), ("y", y1)]);
    let x2 = b.int(1);
    let y2 = b.int(2);
    let z2 = b.int(3);
    let right = b.record(&[("x", x2), ("y", y2), ("z", z2)]);
    let eq = b.binop(BinOp::Eq, left, right);
    b.decl_let_var("r", eq);
    let module = b.finish();

    let err = check(&module).unwrap_err();
    assert!(matches!(
        err,
        TypeError::TypeMismatch { .. } | TypeError::MissingField { .. }
    ));
}

/// `let rec isEven = … and isOdd = … in isEven(10)` gives both bindings
/// scheme `Int -> Bool`.
#[test]
fn mutual_recursion_even_odd() {
    let mut b = ModuleBuilder::new("main.lm");
    let even = {
        let zero = b.p_int(0);
        let t = b.bool(true);
        let n_pat = b.p_var("n");
        let odd = b.var("isOdd");
        let n = b.var("n");
        let one = b.int(1);
        let sub = b.binop(BinOp::Sub, n, one);
        let call = b.app(odd, sub);
        let scrut = b.var("n");
        let body = b.match_(scrut, vec![(zero, t), (n_pat, call)]);
        b.lambda_var("n", body)
    };
    let odd = {
        let zero = b.p_int(0);
        let f = b.bool(false);
        let n_pat = b.p_var("n");
        let even_v = b.var("isEven");
        let n = b.var("n");
        let one = b.int(1);
        let sub = b.binop(BinOp::Sub, n, one);
        let call = b.app(even_v, sub);
        let scrut = b.var("n");
        let body = b.match_(scrut, vec![(zero, f), (n_pat, call)]);
        b.lambda_var("n", body)
    };
    b.decl_let_rec_group(vec![("isEven", even), ("isOdd", odd)]);

    let even_var = b.var("isEven");
    let ten = b.int(10);
    let result = b.app(even_var, ten);
    b.decl_let_var("r", result);
    let module = b.finish();

    let checked = check(&module).unwrap();
    let expected = Type::fun(Type::int(), Type::bool());
    assert_eq!(checked.bindings["isEven"].body, expected);
    assert_eq!(checked.bindings["isOdd"].body, expected);
    assert_eq!(checked.bindings["r"].body, Type::bool());
}

/// Adding a wildcard arm to a failing match makes it succeed; removing
/// the only wildcard from an exhaustive match makes it fail.
#[test]
fn exhaustiveness_round_trip() {
    // Without wildcard: fails.
    let mut b = ModuleBuilder::new("main.lm");
    let one = b.int(1);
    let opt = b.variant("Some", &[one]);
    let x_pat = b.p_var("x");
    let some_pat = b.p_variant("Some", &[x_pat]);
    let x = b.var("x");
    let match_ = b.match_(opt, vec![(some_pat, x)]);
    b.decl_let_var("r", match_);
    assert!(check(&b.finish()).is_err());

    // With wildcard: succeeds.
    let mut b = ModuleBuilder::new("main.lm");
    let one = b.int(1);
    let opt = b.variant("Some", &[one]);
    let x_pat = b.p_var("x");
    let some_pat = b.p_variant("Some", &[x_pat]);
    let x = b.var("x");
    let wild = b.p_wildcard();
    let zero = b.int(0);
    let match_ = b.match_(opt, vec![(some_pat, x), (wild, zero)]);
    b.decl_let_var("r", match_);
    check(&b.finish()).unwrap();
}

/// Two user variant types with identical constructor shapes but
/// different names never unify.
#[test]
fn nominal_variants_do_not_unify() {
    let mut b = ModuleBuilder::new("main.lm");
    let int_a = b.t_named("Int", &[]);
    b.decl_type_variant("Meters", &[], vec![("Meters", vec![int_a])]);
    let int_b = b.t_named("Int", &[]);
    b.decl_type_variant("Feet", &[], vec![("Feet", vec![int_b])]);

    let one = b.int(1);
    let meters = b.variant("Meters", &[one]);
    let two = b.int(2);
    let feet = b.variant("Feet", &[two]);
    let eq = b.binop(BinOp::Eq, meters, feet);
    b.decl_let_var("r", eq);
    let module = b.finish();

    let err = check(&module).unwrap_err();
    assert!(matches!(err, TypeError::TypeMismatch { .. }));
}

/// A record can be annotated at a narrower type (width subtyping), but
/// not at a wider one.
#[test]
fn width_subtyping_via_annotation() {
    // {x:1, y:2} : {x: Int} — fine.
    let mut b = ModuleBuilder::new("main.lm");
    let one = b.int(1);
    let two = b.int(2);
    let lit = b.record(&[("x", one), ("y", two)]);
    let int_ty = b.t_named("Int", &[]);
    let narrow = b.t_record(&[("x", int_ty)]);
    let ann = b.annotated(lit, narrow);
    b.decl_let_var("r", ann);
    check(&b.finish()).unwrap();

    // {x:1} : {x: Int, y: Int} — missing field.
    let mut b = ModuleBuilder::new("main.lm");
    let one = b.int(1);
    let lit = b.record(&[("x", one)]);
    let ix = b.t_named("Int", &[]);
    let iy = b.t_named("Int", &[]);
    let wide = b.t_record(&[("x", ix), ("y", iy)]);
    let ann = b.annotated(lit, wide);
    b.decl_let_var("r", ann);
    let err = check(&b.finish()).unwrap_err();
    assert!(matches!(err, TypeError::MissingField { .. }));
}

/// Every recorded expression type is ground after a successful check.
#[test]
fn final_types_are_ground() {
    let mut b = ModuleBuilder::new("main.lm");
    let body = b.var("x");
    let id_fn = b.lambda_var("x", body);
    let id_var = b.var("id");
    let one = b.int(1);
    let call = b.app(id_var, one);
    let expr = b.let_var("id", id_fn, call);
    b.decl_let_var("r", expr);
    let module = b.finish();

    let checked = check(&module).unwrap();
    for (id, ty) in &checked.types {
        // Inner nodes of the polymorphic `id` lambda keep their scheme
        // variables; everything reachable from the result is ground.
        if *id == call || *id == expr {
            assert!(
                ty.free_vars().is_empty(),
                "expression {} has unresolved type {}",
                id,
                ty
            );
        }
    }
    assert_eq!(checked.bindings["r"].body, Type::int());
}

/// Unreachable arms surface as warnings, not errors.
#[test]
fn unreachable_arm_is_a_warning() {
    let mut b = ModuleBuilder::new("main.lm");
    let scrut = b.bool(true);
    let wild = b.p_wildcard();
    let one = b.int(1);
    let t_pat = b.p_bool(true);
    let two = b.int(2);
    let match_ = b.match_(scrut, vec![(wild, one), (t_pat, two)]);
    b.decl_let_var("r", match_);
    let module = b.finish();

    let checked = check(&module).unwrap();
    assert_eq!(checked.warnings.len(), 1);
    assert_eq!(checked.warnings[0].kind, "UnreachablePattern");
}

/// Guards do not count toward coverage and must be boolean.
#[test]
fn guards_check_and_do_not_cover() {
    let mut b = ModuleBuilder::new("main.lm");
    let scrut = b.bool(true);
    let t_pat = b.p_bool(true);
    let guard = b.bool(true);
    let one = b.int(1);
    let f_pat = b.p_bool(false);
    let two = b.int(2);
    let match_ = b.match_guarded(
        scrut,
        vec![(t_pat, Some(guard), one), (f_pat, None, two)],
    );
    b.decl_let_var("r", match_);
    let module = b.finish();

    // true is only covered by a guarded arm: non-exhaustive.
    let err = check(&module).unwrap_err();
    assert!(matches!(err, TypeError::NonExhaustiveMatch { .. }));
}
