/// Wrap an enum declaration with the standard derive set used across the
/// AST and value types: Debug, Clone, Serialize, Deserialize, PartialEq,
/// Eq, Hash.
#[macro_export]
macro_rules! common_enum {
    ($(#[$attr:meta])* pub enum $name:ident { $($body:tt)* }) => {
        $(#[$attr])*
        #[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq, Hash)]
        pub enum $name { $($body)* }
    };
}

/// Wrap a struct declaration with the same derive set as [`common_enum!`].
#[macro_export]
macro_rules! common_struct {
    ($(#[$attr:meta])* pub struct $name:ident { $($body:tt)* }) => {
        $(#[$attr])*
        #[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq, Hash)]
        pub struct $name { $($body)* }
    };
}

/// Macro to return early with a generic error
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::error::Error::Generic(eyre::Error::msg(format!($($arg)*))))
    };
}
