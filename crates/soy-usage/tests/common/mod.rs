#![allow(dead_code)]

use serde_json::Value;
use soy_core::ast::{Body, ParamDecl, Template};
use soy_core::registry::TemplateRegistry;
use soy_core::utils::ToJson;
use soy_usage::{analyze, AnalyzerOptions};

pub fn template(name: &str, params: &[&str], body: Body) -> Template {
    Template::new(
        name,
        params.iter().map(|param| ParamDecl::new(*param)).collect(),
        body,
    )
}

pub fn registry(templates: Vec<Template>) -> TemplateRegistry {
    let mut registry = TemplateRegistry::new();
    for template in templates {
        registry.add(template);
    }
    registry
}

/// Registry with a single `test.main` template.
pub fn main_template(params: &[&str], body: Body) -> TemplateRegistry {
    registry(vec![template("test.main", params, body)])
}

pub fn analyze_json(registry: &TemplateRegistry, entry: &str) -> Value {
    analyze_json_with(registry, entry, AnalyzerOptions::default())
}

pub fn analyze_json_with(
    registry: &TemplateRegistry,
    entry: &str,
    options: AnalyzerOptions,
) -> Value {
    let tree = analyze(registry, entry, options).expect("analysis should succeed");
    tree.to_json().expect("usage tree serializes")
}
