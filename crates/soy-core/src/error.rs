use crate::span::Span;
use eyre::Error as EyreError;
use std::result;
use thiserror::Error;

/// Fatal analysis errors. Everything else the analyzer cannot decide is
/// expressed in the output tree as a sound over-approximation, never as
/// an error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("call to unknown template '{name}' at {span}")]
    UnknownTemplateCall { name: String, span: Span },
    #[error("malformed AST: {message} at {span}")]
    MalformedAst { message: String, span: Span },
    #[error("reference to undeclared parameter '${name}' in template '{template}' at {span}")]
    UndeclaredParameter {
        name: String,
        template: String,
        span: Span,
    },
    #[error("unsupported construct: {message} at {span}")]
    UnsupportedConstruct { message: String, span: Span },
    #[error("Generic error: {0}")]
    Generic(EyreError),
}

pub type Result<T> = result::Result<T, Error>;

// Convert from eyre::Error to our Error type
impl From<EyreError> for Error {
    fn from(err: EyreError) -> Self {
        Error::Generic(err)
    }
}

// Convert from std::io::Error to our Error type
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Generic(e.into())
    }
}
impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Generic(EyreError::msg(s))
    }
}
impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Generic(EyreError::msg(s.to_string()))
    }
}
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Generic(EyreError::new(e))
    }
}
