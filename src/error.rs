use serde_json::Value;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Expected a document at the top level, got {found}")]
    NotADocument { found: &'static str },
    #[error("Duplicated key {key:?}")]
    DuplicateKey { key: String },
    #[error("Serializing the leaf value under key {key:?}")]
    SerializingLeaf {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Serializing a field to check it for emptiness")]
    CheckingEmptiness(#[source] serde_json::Error),
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a document",
    }
}
