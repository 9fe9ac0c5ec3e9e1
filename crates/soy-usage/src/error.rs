use soy_core::error::Error;
use soy_core::span::Span;

/// Fatal error constructors for the analysis walk.
pub fn malformed_ast(message: impl Into<String>, span: Span) -> Error {
    Error::MalformedAst {
        message: message.into(),
        span,
    }
}

pub fn undeclared_parameter(
    name: impl Into<String>,
    template: impl Into<String>,
    span: Span,
) -> Error {
    Error::UndeclaredParameter {
        name: name.into(),
        template: template.into(),
        span,
    }
}

pub fn unsupported_construct(message: impl Into<String>, span: Span) -> Error {
    Error::UnsupportedConstruct {
        message: message.into(),
        span,
    }
}

/// Macro to ensure a structural invariant holds, or return the given
/// analysis error
#[macro_export]
macro_rules! analyze_ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err);
        }
    };
}
