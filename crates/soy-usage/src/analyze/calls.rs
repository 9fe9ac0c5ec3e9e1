use std::collections::BTreeMap;

use soy_core::ast::{CallData, StmtCall, Template};
use soy_core::span::Span;
use soy_core::Result;
use tracing::{debug, warn};

use crate::value::SymValue;

use super::{Analyzer, Env};

/// Identity of an in-flight call: the target template plus the
/// structural shape of its parameter bindings. Meeting the same
/// signature again while it is still on the stack means recursion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(super) struct CallSignature {
    target: String,
    shape: BTreeMap<String, String>,
}

impl<'reg> Analyzer<'reg> {
    /// `{call}`: bind parameters in caller coordinates, then walk the
    /// target under a fresh environment. Because bindings carry caller
    /// refs verbatim, usage recorded inside the target lands on caller
    /// parameters without any explicit translation step.
    pub(super) fn interpret_call(
        &mut self,
        node: &StmtCall,
        env: &Env,
        span: Span,
    ) -> Result<()> {
        let target = self.registry.lookup(&node.target, span)?;
        let bindings = self.bind_parameters(node, target, env)?;
        let signature = CallSignature {
            target: node.target.clone(),
            shape: bindings
                .iter()
                .map(|(name, value)| (name.clone(), value.digest()))
                .collect(),
        };
        if self.in_flight.contains(&signature)
            || self.template_stack.len() > self.options.max_call_depth
        {
            // recursion cut: widen every binding we would have passed
            warn!(template = %node.target, "recursive call cut; widening bindings");
            for value in bindings.values() {
                self.consume_unknown(value);
            }
            return Ok(());
        }
        debug!(template = %node.target, "descending into call");
        self.in_flight.insert(signature.clone());
        self.template_stack.push(node.target.clone());
        let mut callee_env = Env::new();
        for param in &target.params {
            let bound = bindings
                .get(param.name.as_str())
                .cloned()
                .unwrap_or(SymValue::Unknown);
            callee_env.define(param.name.as_str(), bound);
        }
        let walked = self.interpret_body(&target.body, &mut callee_env);
        self.template_stack.pop();
        self.in_flight.remove(&signature);
        walked
    }

    /// The parameter-binding map for one call site, in caller
    /// coordinates. Explicit `{param}`s override data-derived bindings.
    fn bind_parameters(
        &mut self,
        node: &StmtCall,
        target: &Template,
        env: &Env,
    ) -> Result<BTreeMap<String, SymValue>> {
        let mut bindings = BTreeMap::new();
        match &node.data {
            CallData::None => {}
            CallData::All => {
                // every caller binding of a declared name propagates;
                // the rest of the callee's parameters stay unbound
                for param in &target.params {
                    if let Some(value) = env.lookup(param.name.as_str()) {
                        bindings.insert(param.name.as_str().to_string(), value.clone());
                    }
                }
            }
            CallData::Expr(expr) => {
                let data = self.eval_expr(expr, env)?;
                if !is_record_like(&data) {
                    // a data value we cannot project fields from is
                    // handed to the callee opaquely
                    self.consume_unknown(&data);
                }
                for param in &target.params {
                    if let Some(value) = data_binding(&data, param.name.as_str()) {
                        bindings.insert(param.name.as_str().to_string(), value);
                    }
                }
            }
        }
        for param in &node.params {
            let value = self.eval_initializer(&param.value, env)?;
            bindings.insert(param.name.as_str().to_string(), value);
        }
        Ok(bindings)
    }
}

/// Can fields be projected out of this data value?
fn is_record_like(value: &SymValue) -> bool {
    match value {
        SymValue::Map(_) | SymValue::Ref(_) => true,
        SymValue::Possible(set) => set.values.iter().any(is_record_like),
        _ => false,
    }
}

/// The binding a `data="expr"` value contributes for one callee
/// parameter: map fields project directly, refs compose the chain at the
/// call boundary, opaque members bind Unknown.
fn data_binding(data: &SymValue, param: &str) -> Option<SymValue> {
    match data {
        SymValue::Map(map) => map.entries.get(param).cloned(),
        SymValue::Ref(re) => Some(SymValue::Ref(re.child(param))),
        SymValue::Possible(set) => {
            let members: Vec<SymValue> = set
                .values
                .iter()
                .map(|member| data_binding(member, param).unwrap_or(SymValue::Unknown))
                .collect();
            Some(SymValue::possible(members))
        }
        _ => None,
    }
}
