//! Lexical environment: local `{let}` bindings plus the pre-seeded
//! parameter refs of the template being walked. Forked at every branch
//! arm and block scope; branch forks are joined key-wise afterwards.

use std::collections::HashMap;

use crate::value::SymValue;

#[derive(Debug, Clone, Default)]
pub struct Env {
    vars: HashMap<String, SymValue>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind or shadow a name in this scope.
    pub fn define(&mut self, name: impl Into<String>, value: SymValue) {
        self.vars.insert(name.into(), value);
    }

    pub fn lookup(&self, name: &str) -> Option<&SymValue> {
        self.vars.get(name)
    }

    /// Shallow copy for a nested scope or branch arm; mutations in the
    /// fork do not touch the parent.
    pub fn fork(&self) -> Env {
        self.clone()
    }

    /// Key-wise join of branch environments. A name bound in only some
    /// branches is undefined in the others and joins to Unknown.
    pub fn join(envs: Vec<Env>) -> Env {
        let mut keys: Vec<String> = Vec::new();
        for env in &envs {
            for key in env.vars.keys() {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
        }
        let mut joined = Env::new();
        for key in keys {
            let mut value: Option<SymValue> = None;
            for env in &envs {
                let branch = env.vars.get(&key).cloned().unwrap_or(SymValue::Unknown);
                value = Some(match value {
                    Some(current) => SymValue::join(current, branch),
                    None => branch,
                });
            }
            if let Some(value) = value {
                joined.vars.insert(key, value);
            }
        }
        joined
    }
}
