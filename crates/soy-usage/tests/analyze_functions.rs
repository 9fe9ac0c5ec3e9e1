//! Behavior when analyzing function calls: the modeled pure-function
//! table, transparency of `length`, and the conservative treatment of
//! everything else.

mod common;

use common::{analyze_json, analyze_json_with, main_template};
use pretty_assertions::assert_eq;
use serde_json::json;
use soy_core::ast::{BinOpKind, Expr, Stmt};
use soy_usage::{AnalyzerOptions, UnknownFunctionPolicy};

#[test]
fn unknown_function_gives_unknown_usage() {
    let registry = main_template(
        &["a"],
        vec![Stmt::print(Expr::func(
            "myFunc",
            vec![Expr::var("a").field("b")],
        ))],
    );
    assert_eq!(
        analyze_json(&registry, "test.main"),
        json!({
            "a": { "b": "?" }
        })
    );
}

#[test]
fn unknown_function_full_args_policy() {
    let registry = main_template(
        &["a"],
        vec![Stmt::print(Expr::func(
            "myFunc",
            vec![Expr::var("a").field("b")],
        ))],
    );
    let options = AnalyzerOptions {
        unknown_function_policy: UnknownFunctionPolicy::FullArgs,
        ..AnalyzerOptions::default()
    };
    assert_eq!(
        analyze_json_with(&registry, "test.main", options),
        json!({
            "a": { "b": "*" }
        })
    );
}

#[test]
fn length_does_not_affect_usage() {
    let registry = main_template(
        &["a"],
        vec![Stmt::if_else(
            vec![(
                Expr::binop(
                    BinOpKind::Gt,
                    Expr::func("length", vec![Expr::var("a")]),
                    Expr::int(0),
                ),
                vec![Stmt::print(Expr::var("a").at(0).field("b"))],
            )],
            None,
        )],
    );
    // the whole list is never marked Full, only the element field read
    assert_eq!(
        analyze_json(&registry, "test.main"),
        json!({
            "a": { "b": "*" }
        })
    );
}

#[test]
fn consuming_a_length_result_charges_nothing() {
    let registry = main_template(
        &["a"],
        vec![
            Stmt::let_expr("n", Expr::func("length", vec![Expr::var("a")])),
            Stmt::print(Expr::var("n")),
        ],
    );
    assert_eq!(analyze_json(&registry, "test.main"), json!({}));
}

#[test]
fn augment_map_adds_to_both_maps() {
    let registry = main_template(
        &["a", "b"],
        vec![
            Stmt::let_expr(
                "c",
                Expr::func("augmentMap", vec![Expr::var("a"), Expr::var("b")]),
            ),
            Stmt::print(Expr::var("c").field("d")),
        ],
    );
    assert_eq!(
        analyze_json(&registry, "test.main"),
        json!({
            "a": { "d": "*" },
            "b": { "d": "*" },
        })
    );
}

#[test]
fn augment_map_and_quote_keys_do_not_affect_structure() {
    let registry = main_template(
        &["a", "b"],
        vec![
            Stmt::let_expr(
                "x",
                Expr::func("augmentMap", vec![Expr::var("a"), Expr::var("b")]),
            ),
            Stmt::let_expr("y", Expr::func("quoteKeysIfJs", vec![Expr::var("a")])),
            Stmt::print(Expr::var("x").field("c")),
            Stmt::print(Expr::var("y").field("d")),
        ],
    );
    assert_eq!(
        analyze_json(&registry, "test.main"),
        json!({
            "a": { "c": "*", "d": "*" },
            "b": { "c": "*" },
        })
    );
}

#[test]
fn keys_of_an_opaque_map_observes_it() {
    let registry = main_template(
        &["m", "profile"],
        vec![Stmt::foreach(
            "k",
            Expr::func("keys", vec![Expr::var("m")]),
            vec![Stmt::print(Expr::var("profile").index(Expr::var("k")))],
        )],
    );
    // the key set cannot be enumerated: m is observed opaquely and the
    // profile access degrades to the unknown-key bucket
    assert_eq!(
        analyze_json(&registry, "test.main"),
        json!({
            "m": "?",
            "profile": { "[?]": "*" },
        })
    );
}

#[test]
fn numeric_builtins_fold_over_constants() {
    let registry = main_template(
        &["profile"],
        vec![Stmt::print(Expr::var("profile").index(Expr::binop(
            BinOpKind::Add,
            Expr::str("field"),
            Expr::func("min", vec![Expr::int(3), Expr::int(1)]),
        )))],
    );
    assert_eq!(
        analyze_json(&registry, "test.main"),
        json!({
            "profile": { "field1": "*" }
        })
    );
}

#[test]
fn range_with_dynamic_bound_is_opaque() {
    let registry = main_template(
        &["n", "profile"],
        vec![Stmt::foreach(
            "i",
            Expr::func("range", vec![Expr::var("n")]),
            vec![Stmt::print(Expr::var("profile").index(Expr::binop(
                BinOpKind::Add,
                Expr::str("field"),
                Expr::var("i"),
            )))],
        )],
    );
    // the bound itself is read in full; the keys cannot be enumerated
    assert_eq!(
        analyze_json(&registry, "test.main"),
        json!({
            "n": "*",
            "profile": { "[?]": "*" },
        })
    );
}
