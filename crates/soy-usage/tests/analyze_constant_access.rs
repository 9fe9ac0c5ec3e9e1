//! Constant-valued map access: a fixed set of map fields is selected
//! between by template logic, and the analyzer must recover the literal
//! keys instead of giving up to `[?]`.

mod common;

use common::{analyze_json, main_template};
use pretty_assertions::assert_eq;
use serde_json::json;
use soy_core::ast::{BinOpKind, Expr, PrintDirective, Stmt};

#[test]
fn maps_string_values() {
    let registry = main_template(
        &["profile"],
        vec![
            Stmt::let_block("textField", vec![Stmt::text("\n\t\t\tc_lifeAbout\n\t\t")]),
            Stmt::let_expr("textField2", Expr::str("c_other")),
            Stmt::print(Expr::var("profile").index(Expr::var("textField"))),
            Stmt::print(Expr::var("profile").index(Expr::var("textField2"))),
        ],
    );
    assert_eq!(
        analyze_json(&registry, "test.main"),
        json!({
            "profile": {
                "c_lifeAbout": "*",
                "c_other": "*",
            }
        })
    );
}

#[test]
fn maps_through_print_directive() {
    let registry = main_template(
        &["profile"],
        vec![
            Stmt::let_block(
                "textField",
                vec![Stmt::print_with(
                    Expr::str("c_lifeAbout"),
                    vec![PrintDirective {
                        name: "noAutoescape".into(),
                        args: vec![],
                    }],
                )],
            ),
            Stmt::let_expr("textField2", Expr::str("c_other")),
            Stmt::print(Expr::var("profile").index(Expr::var("textField"))),
            Stmt::print(Expr::var("profile").index(Expr::var("textField2"))),
        ],
    );
    assert_eq!(
        analyze_json(&registry, "test.main"),
        json!({
            "profile": {
                "c_lifeAbout": "*",
                "c_other": "*",
            }
        })
    );
}

#[test]
fn combined_constant_and_variable_values() {
    let registry = main_template(
        &["profile", "locale", "alternative"],
        vec![
            Stmt::let_block(
                "textField",
                vec![Stmt::if_else(
                    vec![(
                        Expr::binop(BinOpKind::Eq, Expr::var("locale"), Expr::str("en")),
                        vec![Stmt::text("c_lifeAbout")],
                    )],
                    Some(vec![Stmt::print(Expr::var("alternative"))]),
                )],
            ),
            Stmt::print(Expr::var("profile").index(Expr::var("textField"))),
        ],
    );
    assert_eq!(
        analyze_json(&registry, "test.main"),
        json!({
            "alternative": "*",
            "locale": "*",
            "profile": {
                "[?]": "*",
                "c_lifeAbout": "*",
            }
        })
    );
}

#[test]
fn indirect_mapping_via_print_and_assignment() {
    let registry = main_template(
        &["profile"],
        vec![
            Stmt::let_block("textField", vec![Stmt::text("c_lifeAbout")]),
            Stmt::let_block("indirect", vec![Stmt::print(Expr::var("textField"))]),
            Stmt::let_expr("textField2", Expr::str("c_other")),
            Stmt::let_expr("indirect2", Expr::var("textField2")),
            Stmt::print(Expr::var("profile").index(Expr::var("indirect"))),
            Stmt::print(Expr::var("profile").index(Expr::var("indirect2"))),
        ],
    );
    assert_eq!(
        analyze_json(&registry, "test.main"),
        json!({
            "profile": {
                "c_lifeAbout": "*",
                "c_other": "*",
            }
        })
    );
}

#[test]
fn maps_string_values_with_msg() {
    let registry = main_template(
        &["profile"],
        vec![
            Stmt::let_block(
                "textField",
                vec![Stmt::msg(
                    "appropriate key for this language",
                    vec![Stmt::text("c_lifeAbout")],
                )],
            ),
            Stmt::let_expr("textField2", Expr::str("c_other")),
            Stmt::print(Expr::var("profile").index(Expr::var("textField"))),
            Stmt::print(Expr::var("profile").index(Expr::var("textField2"))),
        ],
    );
    assert_eq!(
        analyze_json(&registry, "test.main"),
        json!({
            "profile": {
                "c_lifeAbout": "*",
                "c_other": "*",
            }
        })
    );
}

#[test]
fn maps_from_a_switch_statement() {
    let registry = main_template(
        &["profile", "category", "about"],
        vec![
            Stmt::let_block(
                "textField",
                vec![Stmt::switch(
                    Expr::var("category"),
                    vec![
                        (vec![Expr::str("Auto")], vec![Stmt::text("c_autoAbout")]),
                        (vec![Expr::str("Home")], vec![Stmt::text("c_homeAbout")]),
                        (vec![Expr::var("about")], vec![Stmt::text("c_lifeAbout")]),
                    ],
                    None,
                )],
            ),
            Stmt::if_else(
                vec![(
                    Expr::var("profile").index(Expr::var("textField")),
                    vec![Stmt::print(
                        Expr::var("profile").index(Expr::var("textField")),
                    )],
                )],
                None,
            ),
        ],
    );
    assert_eq!(
        analyze_json(&registry, "test.main"),
        json!({
            "category": "*",
            "about": "*",
            "profile": {
                "c_autoAbout": "*",
                "c_homeAbout": "*",
                "c_lifeAbout": "*",
            }
        })
    );
}

#[test]
fn maps_from_a_list_literal() {
    let registry = main_template(
        &["profile"],
        vec![
            Stmt::let_expr(
                "list",
                Expr::list(vec![Expr::str("c_education"), Expr::str("c_awards")]),
            ),
            Stmt::foreach(
                "item",
                Expr::var("list"),
                vec![Stmt::print(Expr::var("profile").index(Expr::var("item")))],
            ),
        ],
    );
    assert_eq!(
        analyze_json(&registry, "test.main"),
        json!({
            "profile": {
                "c_education": "*",
                "c_awards": "*",
            }
        })
    );
}

#[test]
fn maps_from_map_literal_inside_list() {
    let registry = main_template(
        &["profile"],
        vec![
            Stmt::let_expr(
                "list",
                Expr::list(vec![
                    Expr::map(vec![(Expr::str("field"), Expr::str("c_education"))]),
                    Expr::map(vec![(Expr::str("field"), Expr::str("c_awards"))]),
                ]),
            ),
            Stmt::foreach(
                "item",
                Expr::var("list"),
                vec![Stmt::print(
                    Expr::var("profile").index(Expr::var("item").field("field")),
                )],
            ),
        ],
    );
    assert_eq!(
        analyze_json(&registry, "test.main"),
        json!({
            "profile": {
                "c_education": "*",
                "c_awards": "*",
            }
        })
    );
}

#[test]
fn ranged_keys_without_start() {
    let registry = main_template(
        &["profile"],
        vec![Stmt::foreach(
            "i",
            Expr::func("range", vec![Expr::int(2)]),
            vec![Stmt::print(Expr::var("profile").index(Expr::binop(
                BinOpKind::Add,
                Expr::str("field"),
                Expr::var("i"),
            )))],
        )],
    );
    assert_eq!(
        analyze_json(&registry, "test.main"),
        json!({
            "profile": {
                "field0": "*",
                "field1": "*",
            }
        })
    );
}

#[test]
fn ranged_keys() {
    let registry = main_template(
        &["profile"],
        vec![Stmt::foreach(
            "i",
            Expr::func("range", vec![Expr::int(1), Expr::int(3)]),
            vec![Stmt::print(Expr::var("profile").index(Expr::binop(
                BinOpKind::Add,
                Expr::str("field"),
                Expr::var("i"),
            )))],
        )],
    );
    assert_eq!(
        analyze_json(&registry, "test.main"),
        json!({
            "profile": {
                "field1": "*",
                "field2": "*",
            }
        })
    );
}

#[test]
fn ranged_keys_with_increment() {
    let registry = main_template(
        &["profile"],
        vec![Stmt::foreach(
            "i",
            Expr::func("range", vec![Expr::int(2), Expr::int(6), Expr::int(2)]),
            vec![Stmt::print(Expr::var("profile").index(Expr::binop(
                BinOpKind::Add,
                Expr::str("field"),
                Expr::var("i"),
            )))],
        )],
    );
    assert_eq!(
        analyze_json(&registry, "test.main"),
        json!({
            "profile": {
                "field2": "*",
                "field4": "*",
            }
        })
    );
}

#[test]
fn keyed_map_literal_keys() {
    let registry = main_template(
        &["profile"],
        vec![
            Stmt::let_expr(
                "m",
                Expr::map(vec![
                    (Expr::str("first"), Expr::str("c_education")),
                    (Expr::str("second"), Expr::str("c_awards")),
                ]),
            ),
            Stmt::foreach(
                "i",
                Expr::func("keys", vec![Expr::var("m")]),
                vec![Stmt::print(Expr::var("profile").index(Expr::var("i")))],
            ),
        ],
    );
    assert_eq!(
        analyze_json(&registry, "test.main"),
        json!({
            "profile": {
                "first": "*",
                "second": "*",
            }
        })
    );
}

#[test]
fn maps_from_an_if_statement() {
    let registry = main_template(
        &["profile", "category"],
        vec![
            Stmt::let_block(
                "textField",
                vec![Stmt::if_else(
                    vec![(
                        Expr::binop(BinOpKind::Eq, Expr::var("category"), Expr::str("Auto")),
                        vec![Stmt::text("c_autoAbout")],
                    )],
                    Some(vec![Stmt::text("c_lifeAbout")]),
                )],
            ),
            Stmt::if_else(
                vec![(
                    Expr::var("profile").index(Expr::var("textField")),
                    vec![Stmt::print(
                        Expr::var("profile").index(Expr::var("textField")),
                    )],
                )],
                None,
            ),
        ],
    );
    assert_eq!(
        analyze_json(&registry, "test.main"),
        json!({
            "category": "*",
            "profile": {
                "c_autoAbout": "*",
                "c_lifeAbout": "*",
            }
        })
    );
}

#[test]
fn maps_from_nested_statements() {
    let registry = main_template(
        &["profile", "category", "about"],
        vec![
            Stmt::let_block(
                "textField",
                vec![Stmt::switch(
                    Expr::binop(BinOpKind::Elvis, Expr::var("category"), Expr::str("")),
                    vec![
                        (vec![Expr::str("Auto")], vec![Stmt::text("c_autoAbout")]),
                        (vec![Expr::str("Home")], vec![Stmt::text("c_homeAbout")]),
                    ],
                    Some(vec![Stmt::if_else(
                        vec![(
                            Expr::binop(BinOpKind::Eq, Expr::var("about"), Expr::str("Life")),
                            vec![Stmt::text("c_lifeAbout")],
                        )],
                        Some(vec![Stmt::text("c_about")]),
                    )]),
                )],
            ),
            Stmt::let_expr(
                "value",
                Expr::var("profile").index(Expr::var("textField")),
            ),
            Stmt::print(Expr::var("value")),
        ],
    );
    assert_eq!(
        analyze_json(&registry, "test.main"),
        json!({
            "category": "*",
            "about": "*",
            "profile": {
                "c_autoAbout": "*",
                "c_homeAbout": "*",
                "c_lifeAbout": "*",
                "c_about": "*",
            }
        })
    );
}
