use crate::ast::{Body, Ident};
use crate::span::Span;
use crate::common_struct;

common_struct! {
    /// A parameter declared through a `@param` / `@param?` doc annotation.
    /// Only declared parameters are chargeable roots for usage analysis.
    pub struct ParamDecl {
        pub name: Ident,
        pub required: bool,
    }
}

impl ParamDecl {
    pub fn new(name: impl Into<Ident>) -> Self {
        Self {
            name: name.into(),
            required: true,
        }
    }

    pub fn optional(name: impl Into<Ident>) -> Self {
        Self {
            name: name.into(),
            required: false,
        }
    }
}

common_struct! {
    /// A named template: declared parameters plus a body of statements.
    pub struct Template {
        /// Fully qualified name, e.g. `test.main`.
        pub name: String,
        pub params: Vec<ParamDecl>,
        pub body: Body,
        pub span: Span,
    }
}

impl Template {
    pub fn new(name: impl Into<String>, params: Vec<ParamDecl>, body: Body) -> Self {
        Self {
            name: name.into(),
            params,
            body,
            span: Span::null(),
        }
    }

    pub fn declares(&self, name: &str) -> bool {
        self.params.iter().any(|param| param.name.as_str() == name)
    }
}
