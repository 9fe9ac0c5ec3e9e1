use soy_core::ast::ExprFunctionCall;
use soy_core::span::Span;
use soy_core::Result;
use tracing::{debug, warn};

use crate::analyze_ensure;
use crate::error::malformed_ast;
use crate::usage::Mark;
use crate::value::{Literal, SymValue};

use super::{Analyzer, Env, UnknownFunctionPolicy};

/// Ranges longer than this are not worth enumerating as key candidates.
const MAX_RANGE_LEN: i64 = 10_000;

impl<'reg> Analyzer<'reg> {
    /// Dispatch over the table of pure functions the analyzer models.
    /// Anything not in the table is charged per the configured policy.
    pub(super) fn eval_function(
        &mut self,
        call: &ExprFunctionCall,
        env: &Env,
        span: Span,
    ) -> Result<SymValue> {
        let name = call.name.as_str();
        match name {
            // transparent observers: the argument is walked for its
            // sub-effects but deliberately not marked
            "length" | "isNonnull" => {
                self.expect_args(call, 1, span)?;
                let _ = self.eval_expr(&call.args[0], env)?;
                Ok(SymValue::Unknown)
            }
            "keys" => {
                self.expect_args(call, 1, span)?;
                let value = self.eval_expr(&call.args[0], env)?;
                match value {
                    SymValue::Map(map) => Ok(SymValue::list(
                        map.entries
                            .keys()
                            .map(|key| SymValue::str(key.clone()))
                            .collect(),
                    )),
                    other => {
                        // enumerating an opaque map still observes it
                        self.consume_unknown(&other);
                        Ok(SymValue::Unknown)
                    }
                }
            }
            "augmentMap" => {
                self.expect_args(call, 2, span)?;
                let a = self.eval_expr(&call.args[0], env)?;
                let b = self.eval_expr(&call.args[1], env)?;
                // field access on the union must fan out to both maps
                Ok(SymValue::possible(vec![a, b]))
            }
            "quoteKeysIfJs" => {
                self.expect_args(call, 1, span)?;
                self.eval_expr(&call.args[0], env)
            }
            "range" => self.eval_range(call, env, span),
            "floor" | "ceiling" | "round" => {
                self.expect_args(call, 1, span)?;
                let value = self.eval_expr(&call.args[0], env)?;
                match value {
                    SymValue::Concrete(Literal::Int(i)) => Ok(SymValue::int(i)),
                    other => {
                        self.consume(&other);
                        Ok(SymValue::Unknown)
                    }
                }
            }
            "min" | "max" => {
                self.expect_args(call, 2, span)?;
                let a = self.eval_expr(&call.args[0], env)?;
                let b = self.eval_expr(&call.args[1], env)?;
                match (&a, &b) {
                    (
                        SymValue::Concrete(Literal::Int(x)),
                        SymValue::Concrete(Literal::Int(y)),
                    ) => Ok(SymValue::int(if name == "min" {
                        (*x).min(*y)
                    } else {
                        (*x).max(*y)
                    })),
                    _ => {
                        self.consume(&a);
                        self.consume(&b);
                        Ok(SymValue::Unknown)
                    }
                }
            }
            _ => {
                debug!(function = name, "function not modeled; charging arguments");
                let mark = match self.options.unknown_function_policy {
                    UnknownFunctionPolicy::UnknownArgs => Mark::Unknown,
                    UnknownFunctionPolicy::FullArgs => Mark::Full,
                };
                for arg in &call.args {
                    let value = self.eval_expr(arg, env)?;
                    self.consume_with(&value, mark);
                }
                Ok(SymValue::Unknown)
            }
        }
    }

    /// `range(end)` / `range(start, end)` / `range(start, end, step)` with
    /// all-concrete integer arguments produces the half-open sequence;
    /// anything else is Unknown.
    pub(super) fn eval_range(
        &mut self,
        call: &ExprFunctionCall,
        env: &Env,
        span: Span,
    ) -> Result<SymValue> {
        analyze_ensure!(
            (1..=3).contains(&call.args.len()),
            malformed_ast("range expects 1 to 3 arguments", span)
        );
        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.eval_expr(arg, env)?);
        }
        let mut bounds = Vec::with_capacity(args.len());
        for value in &args {
            match value {
                SymValue::Concrete(Literal::Int(i)) => bounds.push(*i),
                other => {
                    // a dynamic bound is read in full; the sequence is opaque
                    self.consume(other);
                }
            }
        }
        if bounds.len() != args.len() {
            return Ok(SymValue::Unknown);
        }
        let (start, end, step) = match bounds.as_slice() {
            [end] => (0, *end, 1),
            [start, end] => (*start, *end, 1),
            [start, end, step] => (*start, *end, *step),
            _ => unreachable!(),
        };
        if step == 0 {
            return Ok(SymValue::Unknown);
        }
        let span_len = end.saturating_sub(start).saturating_abs();
        if span_len / step.saturating_abs() > MAX_RANGE_LEN {
            warn!(start, end, step, "range too long to enumerate");
            return Ok(SymValue::Unknown);
        }
        let mut values = Vec::new();
        let mut i = start;
        while (step > 0 && i < end) || (step < 0 && i > end) {
            values.push(SymValue::int(i));
            i = i.saturating_add(step);
        }
        Ok(SymValue::list(values))
    }

    fn expect_args(&self, call: &ExprFunctionCall, arity: usize, span: Span) -> Result<()> {
        analyze_ensure!(
            call.args.len() == arity,
            malformed_ast(
                format!("{} expects {} argument(s)", call.name, arity),
                span
            )
        );
        Ok(())
    }
}
