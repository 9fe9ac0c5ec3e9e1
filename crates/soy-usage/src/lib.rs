//! Static usage analysis for Soy templates.
//!
//! Given a registry of parsed templates and an entry template name, the
//! analyzer walks the template AST once, propagating symbolic values
//! through `{let}` bindings, control flow, and `{call}` boundaries, and
//! records which declared parameters (and which of their fields) the
//! rendering would actually read. Downstream data-fetch layers hydrate
//! only the reported fields.

pub mod analyze;
pub mod env;
pub mod error;
pub mod usage;
pub mod value;

pub use analyze::{analyze, Analyzer, AnalyzerOptions, UnknownFunctionPolicy};
pub use usage::{Usage, UsageTree, UNKNOWN_KEY};
pub use value::{Literal, ParamRef, SymValue};
