//! The accumulating output: which fields of which parameters the walk
//! consumed. Grows monotonically; merge never loses information.

use std::collections::BTreeMap;

use serde_json::{json, Value as JsonValue};
use soy_core::utils::ToJson;
use soy_core::{common_enum, common_struct, Result};
use tracing::warn;

use crate::value::ParamRef;

/// Field key recorded when an index key could not be enumerated.
pub const UNKNOWN_KEY: &str = "[?]";

common_enum! {
    /// One node of the usage tree.
    pub enum Usage {
        /// The whole value is consumed.
        Full,
        /// Consumed, but structure is opaque.
        Unknown,
        /// Partial record of consumed fields.
        Fields(UsageFields),
    }
}

common_struct! {
    pub struct UsageFields {
        pub fields: BTreeMap<String, Usage>,
    }
}

impl Usage {
    pub fn fields() -> Usage {
        Usage::Fields(UsageFields {
            fields: BTreeMap::new(),
        })
    }

    /// Commutative, associative, idempotent merge. Full dominates; a
    /// field record dominates Unknown because named fields carry strictly
    /// more information than an opaque marker.
    pub fn merge(self, other: Usage) -> Usage {
        match (self, other) {
            (Usage::Full, _) | (_, Usage::Full) => Usage::Full,
            (Usage::Unknown, Usage::Unknown) => Usage::Unknown,
            (Usage::Unknown, fields @ Usage::Fields(_)) => fields,
            (fields @ Usage::Fields(_), Usage::Unknown) => fields,
            (Usage::Fields(mut a), Usage::Fields(b)) => {
                for (key, usage) in b.fields {
                    let merged = match a.fields.remove(&key) {
                        Some(existing) => existing.merge(usage),
                        None => usage,
                    };
                    a.fields.insert(key, merged);
                }
                Usage::Fields(a)
            }
        }
    }
}

impl ToJson for Usage {
    fn to_json(&self) -> Result<JsonValue> {
        Ok(match self {
            Usage::Full => json!("*"),
            Usage::Unknown => json!("?"),
            Usage::Fields(fields) => {
                let mut object = serde_json::Map::new();
                for (key, usage) in &fields.fields {
                    object.insert(key.clone(), usage.to_json()?);
                }
                JsonValue::Object(object)
            }
        })
    }
}

/// Leaf marker recorded at a consumption site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Full,
    Unknown,
}

impl From<Mark> for Usage {
    fn from(mark: Mark) -> Usage {
        match mark {
            Mark::Full => Usage::Full,
            Mark::Unknown => Usage::Unknown,
        }
    }
}

/// Per-parameter usage trees for one entry template. Parameters that are
/// never referenced stay absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageTree {
    params: BTreeMap<String, Usage>,
    max_keys_per_field: Option<usize>,
}

impl UsageTree {
    pub fn new(max_keys_per_field: Option<usize>) -> Self {
        Self {
            params: BTreeMap::new(),
            max_keys_per_field,
        }
    }

    pub fn params(&self) -> &BTreeMap<String, Usage> {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Record a consumption of the position `re` with the given leaf
    /// marker, creating interior field nodes along the path.
    pub fn record(&mut self, re: &ParamRef, mark: Mark) {
        let node = self.params.remove(&re.root);
        let limit = self.max_keys_per_field;
        let placed = Self::place(node, &re.path, mark, limit);
        self.params.insert(re.root.clone(), placed);
    }

    fn place(node: Option<Usage>, path: &[String], mark: Mark, limit: Option<usize>) -> Usage {
        let Some((key, rest)) = path.split_first() else {
            return match node {
                Some(existing) => existing.merge(mark.into()),
                None => mark.into(),
            };
        };
        match node {
            // Full dominates; nothing below it can add information
            Some(Usage::Full) => Usage::Full,
            Some(Usage::Fields(mut fields)) => {
                let key = Self::admit_key(&fields, key, limit);
                let child = fields.fields.remove(&key);
                fields
                    .fields
                    .insert(key, Self::place(child, rest, mark, limit));
                Usage::Fields(fields)
            }
            // absent or Unknown: field records dominate Unknown
            Some(Usage::Unknown) | None => {
                let mut fields = BTreeMap::new();
                let key = key.clone();
                fields.insert(key, Self::place(None, rest, mark, limit));
                Usage::Fields(UsageFields { fields })
            }
        }
    }

    /// Apply the per-parent key budget: once it is exhausted, further
    /// distinct keys fold into the `[?]` bucket.
    fn admit_key(fields: &UsageFields, key: &str, limit: Option<usize>) -> String {
        if key == UNKNOWN_KEY || fields.fields.contains_key(key) {
            return key.to_string();
        }
        if let Some(limit) = limit {
            let named = fields
                .fields
                .keys()
                .filter(|existing| existing.as_str() != UNKNOWN_KEY)
                .count();
            if named >= limit {
                warn!(key, limit, "key budget exhausted; collapsing to [?]");
                return UNKNOWN_KEY.to_string();
            }
        }
        key.to_string()
    }

    /// Merge another tree into this one, parameter-wise.
    pub fn merge(mut self, other: UsageTree) -> UsageTree {
        for (param, usage) in other.params {
            let merged = match self.params.remove(&param) {
                Some(existing) => existing.merge(usage),
                None => usage,
            };
            self.params.insert(param, merged);
        }
        self
    }
}

impl ToJson for UsageTree {
    fn to_json(&self) -> Result<JsonValue> {
        let mut object = serde_json::Map::new();
        for (param, usage) in &self.params {
            object.insert(param.clone(), usage.to_json()?);
        }
        Ok(JsonValue::Object(object))
    }
}
