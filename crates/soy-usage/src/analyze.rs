//! The analysis driver: options, the analyzer state, and the walk entry
//! point. Per-statement and per-expression rules live in the submodules.

use std::collections::HashSet;

use soy_core::registry::TemplateRegistry;
use soy_core::span::Span;
use soy_core::Result;
use tracing::debug;

use crate::env::Env;
use crate::usage::{Mark, UsageTree};
use crate::value::SymValue;

mod calls;
mod expr;
mod functions;
mod stmt;

use calls::CallSignature;

/// How arguments of functions the analyzer does not model are charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownFunctionPolicy {
    /// Record Unknown on every parameter ref reachable from an argument.
    UnknownArgs,
    /// Record Full on every parameter ref reachable from an argument.
    FullArgs,
}

#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    /// Collapse to `[?]` once this many named keys sit under one parent.
    pub max_keys_per_field: Option<usize>,
    pub unknown_function_policy: UnknownFunctionPolicy,
    /// Treat refs to undeclared parameters as Unknown instead of failing.
    pub allow_undeclared: bool,
    /// Cut call chains whose binding shapes keep growing; the in-flight
    /// signature set only catches repeats of an identical shape.
    pub max_call_depth: usize,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            max_keys_per_field: None,
            unknown_function_policy: UnknownFunctionPolicy::UnknownArgs,
            allow_undeclared: false,
            max_call_depth: 25,
        }
    }
}

/// Single-use analysis state over a read-only template registry.
pub struct Analyzer<'reg> {
    registry: &'reg TemplateRegistry,
    options: AnalyzerOptions,
    tree: UsageTree,
    in_flight: HashSet<CallSignature>,
    template_stack: Vec<String>,
}

impl<'reg> Analyzer<'reg> {
    pub fn new(registry: &'reg TemplateRegistry, options: AnalyzerOptions) -> Self {
        let tree = UsageTree::new(options.max_keys_per_field);
        Self {
            registry,
            options,
            tree,
            in_flight: HashSet::new(),
            template_stack: Vec::new(),
        }
    }

    /// Walk the entry template and every template reachable through
    /// `{call}`, returning the accumulated usage tree.
    pub fn analyze(mut self, entry: &str) -> Result<UsageTree> {
        let template = self.registry.lookup(entry, Span::null())?;
        debug!(template = entry, "starting usage analysis");
        self.template_stack.push(entry.to_string());
        let mut env = Env::new();
        for param in &template.params {
            env.define(param.name.as_str(), SymValue::param(param.name.as_str()));
        }
        self.interpret_body(&template.body, &mut env)?;
        self.template_stack.pop();
        debug!(template = entry, "analysis finished");
        Ok(self.tree)
    }

    fn current_template(&self) -> &str {
        self.template_stack
            .last()
            .map(String::as_str)
            .unwrap_or("<entry>")
    }

    /// Consume a value in full: every reachable parameter ref is marked
    /// Full. Concrete scalars and Unknown charge nothing.
    pub(crate) fn consume(&mut self, value: &SymValue) {
        self.consume_with(value, Mark::Full);
    }

    /// Consume a value opaquely: reachable refs are marked Unknown.
    pub(crate) fn consume_unknown(&mut self, value: &SymValue) {
        self.consume_with(value, Mark::Unknown);
    }

    pub(crate) fn consume_with(&mut self, value: &SymValue, mark: Mark) {
        let tree = &mut self.tree;
        value.for_each_ref(&mut |re| tree.record(re, mark));
    }
}

/// Convenience entry point over [`Analyzer`].
pub fn analyze(
    registry: &TemplateRegistry,
    entry: &str,
    options: AnalyzerOptions,
) -> Result<UsageTree> {
    Analyzer::new(registry, options).analyze(entry)
}
