mod expr;
mod ident;
mod stmt;
mod template;

pub use expr::*;
pub use ident::*;
pub use stmt::*;
pub use template::*;
