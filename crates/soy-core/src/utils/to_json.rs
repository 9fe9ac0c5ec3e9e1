use serde_json::Value;

pub trait ToJson {
    fn to_json(&self) -> crate::error::Result<Value>;
}
