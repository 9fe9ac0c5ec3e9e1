//! Shared data model for the Soy template usage analyzer.
//!
//! This crate holds the template AST the analyzer walks, the registry of
//! parsed templates, and the error and serialization infrastructure shared
//! with `soy-usage`. Parsing template source into this AST is a separate
//! concern and lives outside this workspace.

#[macro_use]
pub mod macros;

pub mod ast;
pub mod error;
pub mod registry;
pub mod span;
pub mod utils;

// Alias for error types
pub type Error = crate::error::Error;
pub type Result<T> = crate::error::Result<T>;
