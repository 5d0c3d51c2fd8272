//! Flattening for documents that are already serialized to
//! [`serde_json::Value`].
//!
//! Objects descend and contribute a `.`-joined path segment per key; arrays
//! and scalars stay whole. Unlike the typed walk there are no annotations
//! here, but collisions are still possible (a literal `"a.b"` key in the
//! input collides with a descended `a` → `b` path) and are reported the same
//! way.

use {
    crate::{
        UpdateDocument,
        error::{Error, value_kind},
        field::insert_leaf,
    },
    serde_json::Value,
    std::iter::once,
    tap::Pipe,
};

fn boxed_iter<'a, T, I>(iter: I) -> Box<dyn Iterator<Item = T> + 'a>
where
    T: 'a,
    I: Iterator<Item = T> + 'a,
{
    Box::new(iter)
}

fn leaf_entries(prefix: String, value: Value) -> Box<dyn Iterator<Item = (String, Value)>> {
    match value {
        Value::Object(fields) => fields
            .into_iter()
            .flat_map(move |(key, value)| leaf_entries(format!("{prefix}.{key}"), value))
            .pipe(boxed_iter),
        other => once((prefix, other)).pipe(boxed_iter),
    }
}

/// Flattens a serialized document into dotted-path leaves.
///
/// Fails with [`Error::NotADocument`] when the root is not an object, and with
/// [`Error::DuplicateKey`] when two paths compose to the same key.
pub fn flatten_value(value: Value) -> Result<UpdateDocument, Error> {
    match value {
        Value::Object(fields) => {
            let mut out = UpdateDocument::new();
            for (key, value) in fields
                .into_iter()
                .flat_map(|(key, value)| leaf_entries(key, value))
            {
                insert_leaf(&mut out, key, value)?;
            }
            tracing::trace!(entries = out.len(), "flattened a raw document");
            Ok(out)
        }
        other => Err(Error::NotADocument {
            found: value_kind(&other),
        }),
    }
}

#[extension_traits::extension(pub trait ValueFlattenExt)]
impl serde_json::Value {
    fn into_update_document(self) -> Result<UpdateDocument, Error> {
        flatten_value(self)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn test_flatten_simple() {
        let result = flatten_value(json!({
            "name": "John",
            "age": 30
        }))
        .expect("flat input");
        assert_eq!(result.get("name"), Some(&json!("John")));
        assert_eq!(result.get("age"), Some(&json!(30)));
    }

    #[test]
    fn test_flatten_nested() {
        let result = flatten_value(json!({
            "user": {
                "name": "John",
                "address": {
                    "city": "NYC",
                    "zip": "10001"
                }
            },
            "active": true
        }))
        .expect("nested input");
        assert_eq!(result.get("user.name"), Some(&json!("John")));
        assert_eq!(result.get("user.address.city"), Some(&json!("NYC")));
        assert_eq!(result.get("user.address.zip"), Some(&json!("10001")));
        assert_eq!(result.get("active"), Some(&json!(true)));
    }

    #[test]
    fn test_arrays_stay_whole() {
        let result = flatten_value(json!({
            "tags": ["a", "b"],
            "nested": { "ids": [1, 2] }
        }))
        .expect("input with arrays");
        assert_eq!(result.get("tags"), Some(&json!(["a", "b"])));
        assert_eq!(result.get("nested.ids"), Some(&json!([1, 2])));
    }

    #[test]
    fn test_root_must_be_a_document() {
        let error = flatten_value(json!(23)).expect_err("scalar root");
        assert!(
            matches!(error, Error::NotADocument { found: "a number" }),
            "{error}"
        );
        let error = flatten_value(json!(["a"])).expect_err("array root");
        assert!(
            matches!(error, Error::NotADocument { found: "an array" }),
            "{error}"
        );
    }

    #[test]
    fn test_literal_dotted_key_collides_with_descended_path() {
        let error = flatten_value(json!({
            "a": { "b": 1 },
            "a.b": 2
        }))
        .expect_err("colliding keys");
        match error {
            Error::DuplicateKey { key } => assert_eq!(key, "a.b"),
            other => panic!("expected a duplicate key error, got {other}"),
        }
    }

    #[test]
    fn test_extension_trait() {
        let result = json!({"a": {"b": 5}})
            .into_update_document()
            .expect("nested input");
        assert_eq!(result.get("a.b"), Some(&json!(5)));
    }
}
