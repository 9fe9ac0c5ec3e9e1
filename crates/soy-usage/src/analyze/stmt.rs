use soy_core::ast::{
    Body, ExprKind, Initializer, Stmt, StmtFor, StmtForeach, StmtIf, StmtKind, StmtSwitch,
};
use soy_core::span::Span;
use soy_core::Result;

use crate::analyze_ensure;
use crate::error::{malformed_ast, unsupported_construct};
use crate::value::SymValue;

use super::{Analyzer, Env};

impl<'reg> Analyzer<'reg> {
    pub(super) fn interpret_body(&mut self, body: &Body, env: &mut Env) -> Result<()> {
        for stmt in body {
            self.interpret_stmt(stmt, env)?;
        }
        Ok(())
    }

    fn interpret_stmt(&mut self, stmt: &Stmt, env: &mut Env) -> Result<()> {
        match &stmt.kind {
            // branch arms are already unioned, so loop-control statements
            // carry no analysis meaning
            StmtKind::RawText(_)
            | StmtKind::Debugger(_)
            | StmtKind::Continue(_)
            | StmtKind::Break(_) => Ok(()),
            StmtKind::Print(node) => {
                let value = self.eval_expr(&node.expr, env)?;
                self.consume(&value);
                // directives are transparent to value flow; their
                // arguments are still rendered
                for directive in &node.directives {
                    for arg in &directive.args {
                        let value = self.eval_expr(arg, env)?;
                        self.consume(&value);
                    }
                }
                Ok(())
            }
            StmtKind::Let(node) => {
                // bind without consuming: the value is charged when (and
                // only when) the binding is used
                let value = self.eval_initializer(&node.init, env)?;
                env.define(node.name.as_str(), value);
                Ok(())
            }
            StmtKind::If(node) => self.interpret_if(node, env, stmt.span),
            StmtKind::Switch(node) => self.interpret_switch(node, env, stmt.span),
            StmtKind::Foreach(node) => self.interpret_foreach(node, env),
            StmtKind::For(node) => self.interpret_for(node, env),
            StmtKind::Msg(node) => {
                let mut scope = env.fork();
                self.interpret_body(&node.body, &mut scope)
            }
            StmtKind::Log(node) => {
                let mut scope = env.fork();
                self.interpret_body(&node.body, &mut scope)
            }
            StmtKind::Call(node) => self.interpret_call(node, env, stmt.span),
        }
    }

    fn interpret_if(&mut self, node: &StmtIf, env: &mut Env, span: Span) -> Result<()> {
        analyze_ensure!(!node.arms.is_empty(), malformed_ast("if without arms", span));
        let mut forks = Vec::with_capacity(node.arms.len() + 1);
        for arm in &node.arms {
            let mut fork = env.fork();
            let cond = self.eval_expr(&arm.cond, &fork)?;
            self.consume(&cond);
            self.interpret_body(&arm.body, &mut fork)?;
            forks.push(fork);
        }
        match &node.elze {
            Some(body) => {
                let mut fork = env.fork();
                self.interpret_body(body, &mut fork)?;
                forks.push(fork);
            }
            // no else arm: the parent environment flows through unchanged
            None => forks.push(env.fork()),
        }
        *env = Env::join(forks);
        Ok(())
    }

    fn interpret_switch(&mut self, node: &StmtSwitch, env: &mut Env, span: Span) -> Result<()> {
        analyze_ensure!(
            !node.cases.is_empty(),
            malformed_ast("switch without cases", span)
        );
        let subject = self.eval_expr(&node.subject, env)?;
        self.consume(&subject);
        let mut forks = Vec::with_capacity(node.cases.len() + 1);
        for case in &node.cases {
            let mut fork = env.fork();
            for candidate in &case.values {
                let value = self.eval_expr(candidate, &fork)?;
                self.consume(&value);
            }
            self.interpret_body(&case.body, &mut fork)?;
            forks.push(fork);
        }
        match &node.default {
            Some(body) => {
                let mut fork = env.fork();
                self.interpret_body(body, &mut fork)?;
                forks.push(fork);
            }
            None => forks.push(env.fork()),
        }
        *env = Env::join(forks);
        Ok(())
    }

    fn interpret_foreach(&mut self, node: &StmtForeach, env: &mut Env) -> Result<()> {
        let iter = self.eval_expr(&node.iter, env)?;
        // iteration observes the collection, not every field of it; the
        // loop variable recovers precise per-element usage below
        self.consume_unknown(&iter);
        let mut scope = env.fork();
        scope.define(node.var.as_str(), iter.element());
        // one pass suffices: usage is monotone in the bindings, further
        // iterations would only re-merge identical facts
        self.interpret_body(&node.body, &mut scope)?;
        if let Some(if_empty) = &node.if_empty {
            let mut scope = env.fork();
            self.interpret_body(if_empty, &mut scope)?;
        }
        Ok(())
    }

    fn interpret_for(&mut self, node: &StmtFor, env: &mut Env) -> Result<()> {
        match &node.range.kind {
            ExprKind::FunctionCall(call) if call.name.as_str() == "range" => {
                let values = self.eval_range(call, env, node.range.span)?;
                let mut scope = env.fork();
                scope.define(node.var.as_str(), values.element());
                self.interpret_body(&node.body, &mut scope)
            }
            _ => Err(unsupported_construct(
                "for over a non-range expression",
                node.range.span,
            )),
        }
    }

    /// Value of a `{let}` / `{param}` initializer. Expression form
    /// evaluates directly; block form evaluates the body as a template
    /// fragment. Neither consumes the result.
    pub(super) fn eval_initializer(&mut self, init: &Initializer, env: &Env) -> Result<SymValue> {
        match init {
            Initializer::Expr(expr) => self.eval_expr(expr, env),
            Initializer::Block(body) => {
                let mut scope = env.fork();
                self.eval_block_value(body, &mut scope)
            }
        }
    }

    /// The symbolic value a block body renders to: its single textual or
    /// expression child, joined across branches. Guards and switch
    /// subjects inside the block are consumed eagerly; the child values
    /// themselves stay deferred.
    fn eval_block_value(&mut self, body: &Body, env: &mut Env) -> Result<SymValue> {
        let mut children: Vec<SymValue> = Vec::new();
        for stmt in body {
            match &stmt.kind {
                StmtKind::RawText(node) => {
                    // whitespace around a lone literal is joiner text, not value
                    let trimmed = node.text.trim();
                    if !trimmed.is_empty() {
                        children.push(SymValue::str(trimmed));
                    }
                }
                StmtKind::Print(node) => {
                    for directive in &node.directives {
                        for arg in &directive.args {
                            let value = self.eval_expr(arg, env)?;
                            self.consume(&value);
                        }
                    }
                    children.push(self.eval_expr(&node.expr, env)?);
                }
                StmtKind::Let(node) => {
                    let value = self.eval_initializer(&node.init, env)?;
                    env.define(node.name.as_str(), value);
                }
                StmtKind::If(node) => children.push(self.if_value(node, env, stmt.span)?),
                StmtKind::Switch(node) => children.push(self.switch_value(node, env, stmt.span)?),
                StmtKind::Msg(node) => {
                    // a msg body collapses to its literal text, if any
                    let mut scope = env.fork();
                    let value = self.eval_block_value(&node.body, &mut scope)?;
                    children.push(match value {
                        concrete @ SymValue::Concrete(_) => concrete,
                        _ => SymValue::Unknown,
                    });
                }
                StmtKind::Log(_)
                | StmtKind::Debugger(_)
                | StmtKind::Continue(_)
                | StmtKind::Break(_) => {
                    // interpreted for side effects; renders nothing
                    self.interpret_stmt(stmt, env)?;
                }
                StmtKind::Foreach(_) | StmtKind::For(_) | StmtKind::Call(_) => {
                    // loop and call output is opaque text
                    self.interpret_stmt(stmt, env)?;
                    children.push(SymValue::Unknown);
                }
            }
        }
        Ok(match children.len() {
            // an empty block renders the empty string
            0 => SymValue::str(""),
            1 => children.remove(0),
            // concatenated output of several children is not a single
            // child value
            _ => SymValue::Unknown,
        })
    }

    fn if_value(&mut self, node: &StmtIf, env: &Env, span: Span) -> Result<SymValue> {
        analyze_ensure!(!node.arms.is_empty(), malformed_ast("if without arms", span));
        let mut values = Vec::with_capacity(node.arms.len() + 1);
        for arm in &node.arms {
            let mut scope = env.fork();
            let cond = self.eval_expr(&arm.cond, &scope)?;
            self.consume(&cond);
            values.push(self.eval_block_value(&arm.body, &mut scope)?);
        }
        if let Some(body) = &node.elze {
            let mut scope = env.fork();
            values.push(self.eval_block_value(body, &mut scope)?);
        }
        Ok(SymValue::join_all(values))
    }

    fn switch_value(&mut self, node: &StmtSwitch, env: &Env, span: Span) -> Result<SymValue> {
        analyze_ensure!(
            !node.cases.is_empty(),
            malformed_ast("switch without cases", span)
        );
        let subject = self.eval_expr(&node.subject, env)?;
        self.consume(&subject);
        let mut values = Vec::with_capacity(node.cases.len() + 1);
        for case in &node.cases {
            let mut scope = env.fork();
            for candidate in &case.values {
                let value = self.eval_expr(candidate, &scope)?;
                self.consume(&value);
            }
            values.push(self.eval_block_value(&case.body, &mut scope)?);
        }
        if let Some(body) = &node.default {
            let mut scope = env.fork();
            values.push(self.eval_block_value(body, &mut scope)?);
        }
        Ok(SymValue::join_all(values))
    }
}
