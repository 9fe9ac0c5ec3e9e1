use std::collections::HashMap;

use crate::ast::{Expr, Template};
use crate::error::{Error, Result};
use crate::span::Span;

/// Read-only set of parsed templates the analyzer resolves `{call}`
/// targets against, plus the compile-time globals map.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
    globals: HashMap<String, Expr>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, template: Template) {
        self.templates.insert(template.name.clone(), template);
    }

    /// Register a named compile-time constant. The expression is expected
    /// to be a literal; anything else resolves to unknown during analysis.
    pub fn define_global(&mut self, name: impl Into<String>, value: Expr) {
        self.globals.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    pub fn global(&self, name: &str) -> Option<&Expr> {
        self.globals.get(name)
    }

    pub fn lookup(&self, name: &str, span: Span) -> Result<&Template> {
        self.templates
            .get(name)
            .ok_or_else(|| Error::UnknownTemplateCall {
                name: name.to_string(),
                span,
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }
}
