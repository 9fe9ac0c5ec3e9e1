//! Builder, registry, and serialization coverage for the core data model.

use pretty_assertions::assert_eq;
use soy_core::ast::{
    BinOpKind, CallData, Expr, ExprKind, KeyAccess, ParamDecl, Stmt, StmtKind, Template,
};
use soy_core::span::Span;
use soy_core::registry::TemplateRegistry;
use soy_core::Error;

#[test]
fn data_ref_builders_extend_the_access_chain() {
    let expr = Expr::var("profile")
        .field("owner")
        .at(0)
        .index(Expr::var("key"));
    let ExprKind::DataRef(data) = &expr.kind else {
        panic!("expected a data ref");
    };
    assert_eq!(data.root.as_str(), "profile");
    assert_eq!(data.access.len(), 3);
    assert!(matches!(&data.access[0], KeyAccess::Field(name) if name.as_str() == "owner"));
    assert!(matches!(&data.access[1], KeyAccess::Index(0)));
    assert!(matches!(&data.access[2], KeyAccess::Expr(_)));
}

#[test]
fn binop_builders_nest() {
    let expr = Expr::binop(
        BinOpKind::Add,
        Expr::str("field"),
        Expr::binop(BinOpKind::Add, Expr::int(1), Expr::int(2)),
    );
    let ExprKind::BinOp(node) = &expr.kind else {
        panic!("expected a binop");
    };
    assert_eq!(node.op, BinOpKind::Add);
    assert!(matches!(node.lhs.kind, ExprKind::Str(_)));
    assert!(matches!(node.rhs.kind, ExprKind::BinOp(_)));
}

#[test]
fn statements_default_to_the_null_span() {
    let stmt = Stmt::print(Expr::var("x"));
    assert!(stmt.span.is_null());
    let positioned = Stmt::text("hi").with_span(Span::new(1, 10, 12));
    assert_eq!(positioned.span, Span::new(1, 10, 12));
}

#[test]
fn call_builder_carries_data_mode_and_params() {
    let stmt = Stmt::call("ns.target", CallData::All, vec![]);
    let StmtKind::Call(node) = &stmt.kind else {
        panic!("expected a call");
    };
    assert_eq!(node.target, "ns.target");
    assert_eq!(node.data, CallData::All);
    assert!(node.params.is_empty());
}

#[test]
fn registry_resolves_templates_and_globals() {
    let mut registry = TemplateRegistry::new();
    registry.add(Template::new(
        "test.main",
        vec![ParamDecl::new("profile"), ParamDecl::optional("hint")],
        vec![],
    ));
    registry.define_global("app.MODE", Expr::str("live"));

    let template = registry.lookup("test.main", Span::null()).unwrap();
    assert!(template.declares("profile"));
    assert!(template.declares("hint"));
    assert!(!template.declares("other"));
    assert!(registry.global("app.MODE").is_some());

    let err = registry.lookup("test.missing", Span::null()).unwrap_err();
    assert!(matches!(
        err,
        Error::UnknownTemplateCall { name, .. } if name == "test.missing"
    ));
}

#[test]
fn ast_nodes_round_trip_through_serde() {
    let template = Template::new(
        "test.main",
        vec![ParamDecl::new("profile")],
        vec![
            Stmt::let_expr("t", Expr::str("c_key")),
            Stmt::print(Expr::var("profile").index(Expr::var("t"))),
        ],
    );
    let encoded = serde_json::to_string(&template).unwrap();
    let decoded: Template = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, template);
}
