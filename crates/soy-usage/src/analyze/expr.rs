use soy_core::ast::{
    BinOpKind, Expr, ExprBinOp, ExprDataRef, ExprKind, ExprMap, KeyAccess, UnOpKind,
};
use soy_core::span::Span;
use soy_core::Result;
use tracing::trace;

use crate::error::undeclared_parameter;
use crate::usage::{Mark, UNKNOWN_KEY};
use crate::value::{self, Literal, SymList, SymValue};

use super::{Analyzer, Env};

impl<'reg> Analyzer<'reg> {
    /// Reduce an expression to a symbolic value under `env`. Usage is
    /// recorded as a side effect wherever a sub-expression is a
    /// consumption site (index keys, operator operands, branch guards).
    pub(super) fn eval_expr(&mut self, expr: &Expr, env: &Env) -> Result<SymValue> {
        match &expr.kind {
            ExprKind::Null(_) => Ok(SymValue::null()),
            ExprKind::Bool(node) => Ok(SymValue::bool(node.value)),
            ExprKind::Int(node) => Ok(SymValue::int(node.value)),
            // floats sit outside the concrete literal domain
            ExprKind::Float(_) => Ok(SymValue::unknown()),
            ExprKind::Str(node) => Ok(SymValue::str(node.value.clone())),
            ExprKind::Global(node) => Ok(self
                .registry
                .global(&node.name)
                .and_then(literal_value)
                .unwrap_or(SymValue::Unknown)),
            ExprKind::DataRef(node) => self.eval_data_ref(node, env, expr.span),
            ExprKind::BinOp(node) => self.eval_binop(node, env),
            ExprKind::UnOp(node) => {
                let value = self.eval_expr(&node.expr, env)?;
                Ok(match (node.op, &value) {
                    (UnOpKind::Not, SymValue::Concrete(Literal::Bool(b))) => SymValue::bool(!b),
                    (UnOpKind::Neg, SymValue::Concrete(Literal::Int(i))) => SymValue::int(-i),
                    // the operator reads its operand in full
                    _ => {
                        self.consume(&value);
                        SymValue::Unknown
                    }
                })
            }
            ExprKind::Ternary(node) => {
                // the condition is read but contributes no path-sensitivity
                let cond = self.eval_expr(&node.cond, env)?;
                self.consume(&cond);
                let then = self.eval_expr(&node.then, env)?;
                let elze = self.eval_expr(&node.elze, env)?;
                Ok(SymValue::join(then, elze))
            }
            ExprKind::List(node) => {
                let mut values = Vec::with_capacity(node.items.len());
                for item in &node.items {
                    values.push(self.eval_expr(item, env)?);
                }
                Ok(SymValue::list(values))
            }
            ExprKind::Map(node) => self.eval_map(node, env),
            ExprKind::FunctionCall(node) => self.eval_function(node, env, expr.span),
        }
    }

    fn eval_data_ref(&mut self, node: &ExprDataRef, env: &Env, span: Span) -> Result<SymValue> {
        let mut value = match env.lookup(node.root.as_str()) {
            Some(value) => value.clone(),
            None if self.options.allow_undeclared => SymValue::Unknown,
            None => {
                return Err(undeclared_parameter(
                    node.root.as_str(),
                    self.current_template(),
                    span,
                ))
            }
        };
        for access in &node.access {
            value = match access {
                KeyAccess::Field(name) => {
                    self.index_value(value, SymValue::str(name.as_str()), span)?
                }
                KeyAccess::Index(i) => self.index_value(value, SymValue::int(*i), span)?,
                KeyAccess::Expr(key) => {
                    let key = self.eval_expr(key, env)?;
                    self.index_value(value, key, span)?
                }
            };
        }
        Ok(value)
    }

    /// `container[key]` under the symbolic domain. Using a value as a key
    /// reads it in full, so any parameter ref inside the key is consumed
    /// here; that is what charges `$alternative` in
    /// `{$profile[$alternative]}`.
    pub(super) fn index_value(
        &mut self,
        container: SymValue,
        key: SymValue,
        span: Span,
    ) -> Result<SymValue> {
        self.consume(&key);
        let flat = key.flatten_keys();
        Ok(match container {
            SymValue::Possible(set) => {
                let mut results = Vec::with_capacity(set.values.len());
                for member in set.values {
                    results.push(self.index_value(member, key.clone(), span)?);
                }
                SymValue::possible(results)
            }
            SymValue::Ref(re) => {
                trace!(container = %re, keys = ?flat.keys, opaque = flat.opaque, "index");
                let mut results: Vec<SymValue> = flat
                    .keys
                    .iter()
                    .map(|key| SymValue::Ref(re.child(key.as_str())))
                    .collect();
                if flat.opaque {
                    results.push(SymValue::Ref(re.child(UNKNOWN_KEY)));
                }
                if flat.int_index {
                    // list positions are one bucket: element usage lands
                    // on the list node itself
                    self.tree.record(&re, Mark::Unknown);
                    results.push(SymValue::Ref(re.clone()));
                }
                SymValue::possible(results)
            }
            SymValue::Map(map) => {
                let mut results: Vec<SymValue> = flat
                    .keys
                    .iter()
                    .map(|key| map.entries.get(key).cloned().unwrap_or(SymValue::Unknown))
                    .collect();
                if flat.opaque {
                    results.extend(map.entries.values().cloned());
                    results.push(SymValue::Unknown);
                }
                if flat.int_index {
                    results.push(SymValue::Unknown);
                }
                SymValue::possible(results)
            }
            SymValue::List(list) => index_list(&list, &key),
            SymValue::Concrete(_) | SymValue::Unknown => SymValue::Unknown,
        })
    }

    fn eval_binop(&mut self, node: &ExprBinOp, env: &Env) -> Result<SymValue> {
        let lhs = self.eval_expr(&node.lhs, env)?;
        let rhs = self.eval_expr(&node.rhs, env)?;
        match node.op {
            BinOpKind::Add => {
                // refs feeding a concatenation are rendered into the
                // result, which reads them in full
                self.consume(&lhs);
                self.consume(&rhs);
                Ok(value::add(&lhs, &rhs))
            }
            // `a ?: b` selects one of its operands; value flow joins them
            BinOpKind::Elvis => Ok(SymValue::join(lhs, rhs)),
            op => {
                if let Some(folded) = fold_binop(op, &lhs, &rhs) {
                    return Ok(SymValue::Concrete(folded));
                }
                // comparisons, logic, and the remaining arithmetic read
                // their operands in full
                self.consume(&lhs);
                self.consume(&rhs);
                Ok(SymValue::Unknown)
            }
        }
    }

    fn eval_map(&mut self, node: &ExprMap, env: &Env) -> Result<SymValue> {
        let all_literal_keys = node
            .entries
            .iter()
            .all(|entry| matches!(entry.key.kind, ExprKind::Str(_)));
        if all_literal_keys {
            let mut entries = std::collections::BTreeMap::new();
            for entry in &node.entries {
                let ExprKind::Str(key) = &entry.key.kind else {
                    continue;
                };
                let value = self.eval_expr(&entry.value, env)?;
                entries.insert(key.value.clone(), value);
            }
            Ok(SymValue::map(entries))
        } else {
            // a non-literal key degrades the whole map; keys and values
            // are still walked for their side effects
            for entry in &node.entries {
                let _ = self.eval_expr(&entry.key, env)?;
                let _ = self.eval_expr(&entry.value, env)?;
            }
            Ok(SymValue::Unknown)
        }
    }
}

/// Literal view of a constant expression, for globals resolution. No
/// usage side effects.
fn literal_value(expr: &Expr) -> Option<SymValue> {
    match &expr.kind {
        ExprKind::Null(_) => Some(SymValue::null()),
        ExprKind::Bool(node) => Some(SymValue::bool(node.value)),
        ExprKind::Int(node) => Some(SymValue::int(node.value)),
        ExprKind::Str(node) => Some(SymValue::str(node.value.clone())),
        _ => None,
    }
}

/// Indexing into a known list: concrete positions pick the element,
/// anything else could be any element.
fn index_list(list: &SymList, key: &SymValue) -> SymValue {
    match key {
        SymValue::Concrete(Literal::Int(i)) => {
            usize::try_from(*i)
                .ok()
                .and_then(|i| list.values.get(i).cloned())
                .unwrap_or(SymValue::Unknown)
        }
        SymValue::Concrete(_) => SymValue::Unknown,
        SymValue::Possible(set) => SymValue::possible(
            set.values
                .iter()
                .map(|member| index_list(list, member))
                .collect(),
        ),
        _ => {
            let mut results = list.values.clone();
            results.push(SymValue::Unknown);
            SymValue::possible(results)
        }
    }
}

/// Constant folding for comparisons, logic, and non-`+` arithmetic.
fn fold_binop(op: BinOpKind, lhs: &SymValue, rhs: &SymValue) -> Option<Literal> {
    let (SymValue::Concrete(a), SymValue::Concrete(b)) = (lhs, rhs) else {
        return None;
    };
    match op {
        BinOpKind::Eq => Some(Literal::Bool(a == b)),
        BinOpKind::Ne => Some(Literal::Bool(a != b)),
        BinOpKind::Lt | BinOpKind::Le | BinOpKind::Gt | BinOpKind::Ge => {
            let (x, y) = (a.as_int()?, b.as_int()?);
            Some(Literal::Bool(match op {
                BinOpKind::Lt => x < y,
                BinOpKind::Le => x <= y,
                BinOpKind::Gt => x > y,
                _ => x >= y,
            }))
        }
        BinOpKind::And | BinOpKind::Or => match (a, b) {
            (Literal::Bool(x), Literal::Bool(y)) => Some(Literal::Bool(match op {
                BinOpKind::And => *x && *y,
                _ => *x || *y,
            })),
            _ => None,
        },
        BinOpKind::Sub => Some(Literal::Int(a.as_int()?.wrapping_sub(b.as_int()?))),
        BinOpKind::Mul => Some(Literal::Int(a.as_int()?.wrapping_mul(b.as_int()?))),
        BinOpKind::Div => {
            let (x, y) = (a.as_int()?, b.as_int()?);
            // template division is float division; only fold exact cases
            if y != 0 && x % y == 0 {
                Some(Literal::Int(x / y))
            } else {
                None
            }
        }
        BinOpKind::Mod => {
            let (x, y) = (a.as_int()?, b.as_int()?);
            if y != 0 {
                Some(Literal::Int(x % y))
            } else {
                None
            }
        }
        BinOpKind::Add | BinOpKind::Elvis => None,
    }
}
