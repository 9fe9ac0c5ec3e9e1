use crate::ast::{Expr, Ident};
use crate::span::Span;
use crate::{common_enum, common_struct};

/// A template body or block body: statements in document order.
pub type Body = Vec<Stmt>;

common_enum! {
    /// Statement node kinds of the template language.
    pub enum StmtKind {
        RawText(StmtRawText),
        Print(StmtPrint),
        Let(StmtLet),
        If(StmtIf),
        Switch(StmtSwitch),
        Foreach(StmtForeach),
        For(StmtFor),
        Msg(StmtMsg),
        Call(StmtCall),
        Log(StmtLog),
        Debugger(StmtDebugger),
        Continue(StmtContinue),
        Break(StmtBreak),
    }
}

common_struct! {
    pub struct Stmt {
        pub span: Span,
        pub kind: StmtKind,
    }
}

common_struct! {
    pub struct StmtRawText {
        pub text: String,
    }
}

common_struct! {
    /// A print directive such as `|noAutoescape` or `|insertWordBreaks:8`.
    pub struct PrintDirective {
        pub name: Ident,
        pub args: Vec<Expr>,
    }
}

common_struct! {
    pub struct StmtPrint {
        pub expr: Expr,
        pub directives: Vec<PrintDirective>,
    }
}

common_enum! {
    /// Initializer of a `{let}` or `{param}`: expression form
    /// (`{let $x: e/}`) or block form (`{let $x}...{/let}`).
    pub enum Initializer {
        Expr(Expr),
        Block(Body),
    }
}

common_struct! {
    pub struct StmtLet {
        pub name: Ident,
        pub init: Initializer,
    }
}

common_struct! {
    pub struct IfArm {
        pub cond: Expr,
        pub body: Body,
    }
}

common_struct! {
    pub struct StmtIf {
        pub arms: Vec<IfArm>,
        pub elze: Option<Body>,
    }
}

common_struct! {
    /// `{case v1, v2}`: a case may carry several candidate values.
    pub struct SwitchCase {
        pub values: Vec<Expr>,
        pub body: Body,
    }
}

common_struct! {
    pub struct StmtSwitch {
        pub subject: Expr,
        pub cases: Vec<SwitchCase>,
        pub default: Option<Body>,
    }
}

common_struct! {
    pub struct StmtForeach {
        pub var: Ident,
        pub iter: Expr,
        pub body: Body,
        pub if_empty: Option<Body>,
    }
}

common_struct! {
    /// `{for $i in range(...)}`; the grammar only admits a range call.
    pub struct StmtFor {
        pub var: Ident,
        pub range: Expr,
        pub body: Body,
    }
}

common_struct! {
    pub struct StmtMsg {
        pub desc: String,
        pub body: Body,
    }
}

common_enum! {
    /// The `data` attribute of a `{call}`.
    pub enum CallData {
        None,
        All,
        Expr(Expr),
    }
}

common_struct! {
    pub struct CallParam {
        pub name: Ident,
        pub value: Initializer,
    }
}

common_struct! {
    pub struct StmtCall {
        /// Fully qualified target template name.
        pub target: String,
        pub data: CallData,
        pub params: Vec<CallParam>,
    }
}

common_struct! {
    pub struct StmtLog {
        pub body: Body,
    }
}

common_struct! {
    pub struct StmtDebugger {}
}

common_struct! {
    pub struct StmtContinue {}
}

common_struct! {
    pub struct StmtBreak {}
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Self {
            span: Span::null(),
            kind,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn text(text: impl Into<String>) -> Self {
        Stmt::new(StmtKind::RawText(StmtRawText { text: text.into() }))
    }

    pub fn print(expr: Expr) -> Self {
        Stmt::new(StmtKind::Print(StmtPrint {
            expr,
            directives: Vec::new(),
        }))
    }

    pub fn print_with(expr: Expr, directives: Vec<PrintDirective>) -> Self {
        Stmt::new(StmtKind::Print(StmtPrint { expr, directives }))
    }

    pub fn let_expr(name: impl Into<Ident>, expr: Expr) -> Self {
        Stmt::new(StmtKind::Let(StmtLet {
            name: name.into(),
            init: Initializer::Expr(expr),
        }))
    }

    pub fn let_block(name: impl Into<Ident>, body: Body) -> Self {
        Stmt::new(StmtKind::Let(StmtLet {
            name: name.into(),
            init: Initializer::Block(body),
        }))
    }

    pub fn if_else(arms: Vec<(Expr, Body)>, elze: Option<Body>) -> Self {
        Stmt::new(StmtKind::If(StmtIf {
            arms: arms
                .into_iter()
                .map(|(cond, body)| IfArm { cond, body })
                .collect(),
            elze,
        }))
    }

    pub fn switch(subject: Expr, cases: Vec<(Vec<Expr>, Body)>, default: Option<Body>) -> Self {
        Stmt::new(StmtKind::Switch(StmtSwitch {
            subject,
            cases: cases
                .into_iter()
                .map(|(values, body)| SwitchCase { values, body })
                .collect(),
            default,
        }))
    }

    pub fn foreach(var: impl Into<Ident>, iter: Expr, body: Body) -> Self {
        Stmt::new(StmtKind::Foreach(StmtForeach {
            var: var.into(),
            iter,
            body,
            if_empty: None,
        }))
    }

    pub fn foreach_ifempty(var: impl Into<Ident>, iter: Expr, body: Body, if_empty: Body) -> Self {
        Stmt::new(StmtKind::Foreach(StmtForeach {
            var: var.into(),
            iter,
            body,
            if_empty: Some(if_empty),
        }))
    }

    pub fn for_range(var: impl Into<Ident>, range: Expr, body: Body) -> Self {
        Stmt::new(StmtKind::For(StmtFor {
            var: var.into(),
            range,
            body,
        }))
    }

    pub fn msg(desc: impl Into<String>, body: Body) -> Self {
        Stmt::new(StmtKind::Msg(StmtMsg {
            desc: desc.into(),
            body,
        }))
    }

    pub fn call(target: impl Into<String>, data: CallData, params: Vec<CallParam>) -> Self {
        Stmt::new(StmtKind::Call(StmtCall {
            target: target.into(),
            data,
            params,
        }))
    }

    pub fn log(body: Body) -> Self {
        Stmt::new(StmtKind::Log(StmtLog { body }))
    }

    pub fn debugger() -> Self {
        Stmt::new(StmtKind::Debugger(StmtDebugger {}))
    }

    pub fn cont() -> Self {
        Stmt::new(StmtKind::Continue(StmtContinue {}))
    }

    pub fn brk() -> Self {
        Stmt::new(StmtKind::Break(StmtBreak {}))
    }
}

impl CallParam {
    pub fn expr(name: impl Into<Ident>, expr: Expr) -> Self {
        Self {
            name: name.into(),
            value: Initializer::Expr(expr),
        }
    }

    pub fn block(name: impl Into<Ident>, body: Body) -> Self {
        Self {
            name: name.into(),
            value: Initializer::Block(body),
        }
    }
}
