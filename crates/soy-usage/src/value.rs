//! The symbolic value domain the interpreter propagates.
//!
//! Values are transient: they are rebuilt at every expression evaluation
//! and only cross template boundaries through call-site parameter
//! bindings. The domain tracks exactly enough structure to resolve map
//! index keys to literal field names instead of giving up to unknown.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use itertools::Itertools;
use soy_core::{common_enum, common_struct};

common_enum! {
    /// A scalar the analysis knows exactly.
    pub enum Literal {
        Str(String),
        Int(i64),
        Bool(bool),
        Null,
    }
}

impl Literal {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Literal::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The string a renderer would coerce this scalar to.
    pub fn render(&self) -> String {
        match self {
            Literal::Str(s) => s.clone(),
            Literal::Int(i) => i.to_string(),
            Literal::Bool(b) => b.to_string(),
            Literal::Null => "null".to_string(),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Str(s) => write!(f, "{:?}", s),
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Null => write!(f, "null"),
        }
    }
}

common_struct! {
    /// Symbolic handle to a position inside a caller-visible parameter:
    /// the parameter name plus the chain of field keys walked so far.
    pub struct ParamRef {
        pub root: String,
        pub path: Vec<String>,
    }
}

impl ParamRef {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            path: Vec::new(),
        }
    }

    /// The ref one field deeper.
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut path = self.path.clone();
        path.push(key.into());
        Self {
            root: self.root.clone(),
            path,
        }
    }
}

impl Display for ParamRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}", self.root)?;
        for key in &self.path {
            write!(f, ".{}", key)?;
        }
        Ok(())
    }
}

common_struct! {
    pub struct SymPossible {
        pub values: Vec<SymValue>,
    }
}

common_struct! {
    pub struct SymList {
        pub values: Vec<SymValue>,
    }
}

common_struct! {
    pub struct SymMap {
        pub entries: BTreeMap<String, SymValue>,
    }
}

common_enum! {
    /// A value under abstract interpretation.
    pub enum SymValue {
        /// Single known scalar.
        Concrete(Literal),
        /// Finite set of alternatives, from branch joins and distribution.
        /// Deduplicated by structural equality; an opaque member does not
        /// collapse the set, so literal members stay enumerable as keys.
        Possible(SymPossible),
        /// Ordered sequence of known length.
        List(SymList),
        /// Mapping from literal string keys to values.
        Map(SymMap),
        /// Opaque reference into a parameter tree.
        Ref(ParamRef),
        /// Could be anything.
        Unknown,
    }
}

impl SymValue {
    pub fn str(s: impl Into<String>) -> Self {
        SymValue::Concrete(Literal::Str(s.into()))
    }

    pub fn int(i: i64) -> Self {
        SymValue::Concrete(Literal::Int(i))
    }

    pub fn bool(b: bool) -> Self {
        SymValue::Concrete(Literal::Bool(b))
    }

    pub fn null() -> Self {
        SymValue::Concrete(Literal::Null)
    }

    pub fn unknown() -> Self {
        SymValue::Unknown
    }

    /// A freshly seeded parameter root.
    pub fn param(name: impl Into<String>) -> Self {
        SymValue::Ref(ParamRef::new(name))
    }

    pub fn list(values: Vec<SymValue>) -> Self {
        SymValue::List(SymList { values })
    }

    pub fn map(entries: BTreeMap<String, SymValue>) -> Self {
        SymValue::Map(SymMap { entries })
    }

    /// Build a possible-set: nested sets flatten, duplicates drop, a
    /// singleton unwraps, an empty set degrades to Unknown.
    pub fn possible(values: Vec<SymValue>) -> Self {
        let mut flat: Vec<SymValue> = Vec::new();
        let mut queue = values;
        queue.reverse();
        while let Some(value) = queue.pop() {
            match value {
                SymValue::Possible(set) => {
                    for inner in set.values.into_iter().rev() {
                        queue.push(inner);
                    }
                }
                other => {
                    if !flat.contains(&other) {
                        flat.push(other);
                    }
                }
            }
        }
        match flat.len() {
            0 => SymValue::Unknown,
            1 => flat.remove(0),
            _ => SymValue::Possible(SymPossible { values: flat }),
        }
    }

    /// Branch join. Unlike [`SymValue::possible`], joining with Unknown
    /// loses everything: a branch that could be anything makes the joined
    /// value opaque.
    pub fn join(a: SymValue, b: SymValue) -> SymValue {
        if a == b {
            return a;
        }
        match (a, b) {
            (SymValue::Unknown, _) | (_, SymValue::Unknown) => SymValue::Unknown,
            (SymValue::Map(a), SymValue::Map(b)) => {
                let mut entries = BTreeMap::new();
                let keys: Vec<String> = a.entries.keys().chain(b.entries.keys()).cloned().collect();
                for key in keys {
                    let joined = match (a.entries.get(&key), b.entries.get(&key)) {
                        (Some(x), Some(y)) => SymValue::join(x.clone(), y.clone()),
                        // a key missing on one side reads as null/undefined there
                        _ => SymValue::Unknown,
                    };
                    entries.insert(key, joined);
                }
                SymValue::map(entries)
            }
            (SymValue::List(a), SymValue::List(b)) => {
                if a.values.len() != b.values.len() {
                    return SymValue::Unknown;
                }
                SymValue::list(
                    a.values
                        .into_iter()
                        .zip(b.values)
                        .map(|(x, y)| SymValue::join(x, y))
                        .collect(),
                )
            }
            (a, b) => SymValue::possible(vec![a, b]),
        }
    }

    pub fn join_all(values: impl IntoIterator<Item = SymValue>) -> SymValue {
        let mut iter = values.into_iter();
        let Some(first) = iter.next() else {
            return SymValue::Unknown;
        };
        iter.fold(first, SymValue::join)
    }

    /// The value a `foreach` loop variable binds to: the element view of
    /// this iterable. Element usage on a parameter-rooted list lands on
    /// the list node itself; list positions are not meaningful to
    /// downstream fetchers.
    pub fn element(&self) -> SymValue {
        match self {
            SymValue::List(list) => SymValue::join_all(list.values.iter().cloned()),
            SymValue::Ref(r) => SymValue::Ref(r.clone()),
            SymValue::Possible(set) => {
                SymValue::possible(set.values.iter().map(SymValue::element).collect())
            }
            _ => SymValue::Unknown,
        }
    }

    /// Visit every parameter ref reachable from this value.
    pub fn for_each_ref(&self, f: &mut impl FnMut(&ParamRef)) {
        match self {
            SymValue::Ref(r) => f(r),
            SymValue::Possible(set) => {
                for value in &set.values {
                    value.for_each_ref(f);
                }
            }
            SymValue::List(list) => {
                for value in &list.values {
                    value.for_each_ref(f);
                }
            }
            SymValue::Map(map) => {
                for value in map.entries.values() {
                    value.for_each_ref(f);
                }
            }
            SymValue::Concrete(_) | SymValue::Unknown => {}
        }
    }

    /// Walk a value used as an index key and collect the literal keys it
    /// could take, plus flags for integer indexing and opaque branches.
    pub fn flatten_keys(&self) -> KeyFlattening {
        let mut flat = KeyFlattening::default();
        self.flatten_keys_into(&mut flat);
        flat
    }

    fn flatten_keys_into(&self, flat: &mut KeyFlattening) {
        match self {
            SymValue::Concrete(Literal::Str(s)) => {
                if !flat.keys.contains(s) {
                    flat.keys.push(s.clone());
                }
            }
            SymValue::Concrete(Literal::Int(_)) => flat.int_index = true,
            SymValue::Concrete(_) => flat.opaque = true,
            SymValue::Possible(set) => {
                for value in &set.values {
                    value.flatten_keys_into(flat);
                }
            }
            SymValue::Ref(_) | SymValue::Unknown | SymValue::List(_) | SymValue::Map(_) => {
                flat.opaque = true
            }
        }
    }

    /// Canonical structural digest, used to detect in-flight call
    /// signatures. Order-insensitive for sets, order-sensitive for lists.
    pub fn digest(&self) -> String {
        match self {
            SymValue::Concrete(lit) => format!("c:{}", lit),
            SymValue::Possible(set) => {
                let members = set.values.iter().map(SymValue::digest).sorted().join("|");
                format!("{{{}}}", members)
            }
            SymValue::List(list) => {
                format!("[{}]", list.values.iter().map(SymValue::digest).join(","))
            }
            SymValue::Map(map) => {
                let entries = map
                    .entries
                    .iter()
                    .map(|(key, value)| format!("{}:{}", key, value.digest()))
                    .join(",");
                format!("m{{{}}}", entries)
            }
            SymValue::Ref(r) => r.to_string(),
            SymValue::Unknown => "?".to_string(),
        }
    }
}

/// Result of flattening a symbolic index key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyFlattening {
    /// Literal string keys the index could take.
    pub keys: Vec<String>,
    /// Some branch was an integer index (list-element access).
    pub int_index: bool,
    /// Some branch could not be enumerated.
    pub opaque: bool,
}

/// `a + b` under the symbolic domain: integer addition folds, anything
/// involving a string concatenates, possible sets distribute pairwise,
/// opaque operands degrade the pair to Unknown.
pub fn add(a: &SymValue, b: &SymValue) -> SymValue {
    match (a, b) {
        (SymValue::Possible(set), other) => SymValue::possible(
            set.values
                .iter()
                .map(|member| add(member, other))
                .collect(),
        ),
        (other, SymValue::Possible(set)) => SymValue::possible(
            set.values
                .iter()
                .map(|member| add(other, member))
                .collect(),
        ),
        (SymValue::Concrete(Literal::Int(x)), SymValue::Concrete(Literal::Int(y))) => {
            SymValue::int(x.wrapping_add(*y))
        }
        (SymValue::Concrete(x), SymValue::Concrete(y)) => {
            if matches!(x, Literal::Str(_)) || matches!(y, Literal::Str(_)) {
                SymValue::str(format!("{}{}", x.render(), y.render()))
            } else {
                SymValue::Unknown
            }
        }
        _ => SymValue::Unknown,
    }
}
