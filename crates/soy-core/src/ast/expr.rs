use crate::ast::Ident;
use crate::span::Span;
use crate::{common_enum, common_struct};
use std::hash::{Hash, Hasher};

pub type BExpr = Box<Expr>;

common_enum! {
    /// Expression node kinds of the template language.
    pub enum ExprKind {
        Null(ExprNull),
        Bool(ExprBool),
        Int(ExprInt),
        Float(ExprFloat),
        Str(ExprStr),
        /// Named compile-time constant.
        Global(ExprGlobal),
        /// `$root.key[expr]...`: a variable or parameter reference with a
        /// chain of field accesses.
        DataRef(ExprDataRef),
        BinOp(ExprBinOp),
        UnOp(ExprUnOp),
        Ternary(ExprTernary),
        List(ExprList),
        Map(ExprMap),
        FunctionCall(ExprFunctionCall),
    }
}

common_struct! {
    pub struct Expr {
        pub span: Span,
        pub kind: ExprKind,
    }
}

common_struct! {
    pub struct ExprNull {}
}

common_struct! {
    pub struct ExprBool {
        pub value: bool,
    }
}

common_struct! {
    pub struct ExprInt {
        pub value: i64,
    }
}

/// Float literal. Kept out of `common_struct!` because `f64` needs manual
/// total-order equality and bit-pattern hashing.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ExprFloat {
    pub value: f64,
}

impl PartialEq for ExprFloat {
    fn eq(&self, other: &Self) -> bool {
        self.value.total_cmp(&other.value) == std::cmp::Ordering::Equal
    }
}
impl Eq for ExprFloat {}
impl Hash for ExprFloat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.to_bits().hash(state);
    }
}

common_struct! {
    pub struct ExprStr {
        pub value: String,
    }
}

common_struct! {
    pub struct ExprGlobal {
        pub name: String,
    }
}

common_enum! {
    /// One step of a data-ref access chain.
    pub enum KeyAccess {
        /// `.field`
        Field(Ident),
        /// `[3]`
        Index(i64),
        /// `[expr]`
        Expr(BExpr),
    }
}

common_struct! {
    pub struct ExprDataRef {
        pub root: Ident,
        pub access: Vec<KeyAccess>,
    }
}

common_enum! {
    #[derive(Copy)]
    pub enum BinOpKind {
        Add,
        Sub,
        Mul,
        Div,
        Mod,
        Eq,
        Ne,
        Lt,
        Le,
        Gt,
        Ge,
        And,
        Or,
        /// `?:` null coalescing.
        Elvis,
    }
}

common_struct! {
    pub struct ExprBinOp {
        pub op: BinOpKind,
        pub lhs: BExpr,
        pub rhs: BExpr,
    }
}

common_enum! {
    #[derive(Copy)]
    pub enum UnOpKind {
        Not,
        Neg,
    }
}

common_struct! {
    pub struct ExprUnOp {
        pub op: UnOpKind,
        pub expr: BExpr,
    }
}

common_struct! {
    pub struct ExprTernary {
        pub cond: BExpr,
        pub then: BExpr,
        pub elze: BExpr,
    }
}

common_struct! {
    pub struct ExprList {
        pub items: Vec<Expr>,
    }
}

common_struct! {
    pub struct MapEntry {
        pub key: Expr,
        pub value: Expr,
    }
}

common_struct! {
    pub struct ExprMap {
        pub entries: Vec<MapEntry>,
    }
}

common_struct! {
    pub struct ExprFunctionCall {
        pub name: Ident,
        pub args: Vec<Expr>,
    }
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self {
            span: Span::null(),
            kind,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn null() -> Self {
        Expr::new(ExprKind::Null(ExprNull {}))
    }

    pub fn bool(value: bool) -> Self {
        Expr::new(ExprKind::Bool(ExprBool { value }))
    }

    pub fn int(value: i64) -> Self {
        Expr::new(ExprKind::Int(ExprInt { value }))
    }

    pub fn float(value: f64) -> Self {
        Expr::new(ExprKind::Float(ExprFloat { value }))
    }

    pub fn str(value: impl Into<String>) -> Self {
        Expr::new(ExprKind::Str(ExprStr {
            value: value.into(),
        }))
    }

    pub fn global(name: impl Into<String>) -> Self {
        Expr::new(ExprKind::Global(ExprGlobal { name: name.into() }))
    }

    /// `$name` with an empty access chain.
    pub fn var(name: impl Into<Ident>) -> Self {
        Expr::new(ExprKind::DataRef(ExprDataRef {
            root: name.into(),
            access: Vec::new(),
        }))
    }

    /// Append `.field` to a data ref.
    pub fn field(mut self, name: impl Into<Ident>) -> Self {
        match &mut self.kind {
            ExprKind::DataRef(data) => data.access.push(KeyAccess::Field(name.into())),
            _ => panic!("field() requires a data-ref expression"),
        }
        self
    }

    /// Append `[index]` to a data ref.
    pub fn at(mut self, index: i64) -> Self {
        match &mut self.kind {
            ExprKind::DataRef(data) => data.access.push(KeyAccess::Index(index)),
            _ => panic!("at() requires a data-ref expression"),
        }
        self
    }

    /// Append `[expr]` to a data ref.
    pub fn index(mut self, key: Expr) -> Self {
        match &mut self.kind {
            ExprKind::DataRef(data) => data.access.push(KeyAccess::Expr(Box::new(key))),
            _ => panic!("index() requires a data-ref expression"),
        }
        self
    }

    pub fn binop(op: BinOpKind, lhs: Expr, rhs: Expr) -> Self {
        Expr::new(ExprKind::BinOp(ExprBinOp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }))
    }

    pub fn unop(op: UnOpKind, expr: Expr) -> Self {
        Expr::new(ExprKind::UnOp(ExprUnOp {
            op,
            expr: Box::new(expr),
        }))
    }

    pub fn ternary(cond: Expr, then: Expr, elze: Expr) -> Self {
        Expr::new(ExprKind::Ternary(ExprTernary {
            cond: Box::new(cond),
            then: Box::new(then),
            elze: Box::new(elze),
        }))
    }

    pub fn list(items: Vec<Expr>) -> Self {
        Expr::new(ExprKind::List(ExprList { items }))
    }

    pub fn map(entries: Vec<(Expr, Expr)>) -> Self {
        Expr::new(ExprKind::Map(ExprMap {
            entries: entries
                .into_iter()
                .map(|(key, value)| MapEntry { key, value })
                .collect(),
        }))
    }

    pub fn func(name: impl Into<Ident>, args: Vec<Expr>) -> Self {
        Expr::new(ExprKind::FunctionCall(ExprFunctionCall {
            name: name.into(),
            args,
        }))
    }
}
