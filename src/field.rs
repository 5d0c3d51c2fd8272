//! Per-field machinery behind the generated `flatten_fields` bodies.
//!
//! The nested-record-or-leaf decision is made by method resolution on
//! [`FieldProxy`]: [`FlattenStruct`] is implemented one reference level closer
//! than [`FlattenLeaf`], so for a field whose type implements
//! [`Flatten`](crate::Flatten) the descent impl wins, and everything that is
//! merely [`Serialize`] falls back to the opaque-leaf impl.

use {
    crate::{Flatten, UpdateDocument, descriptor::FieldDescriptor, error::Error},
    indexmap::map::Entry,
    serde::Serialize,
    serde_json::Value,
    tap::Pipe,
};

pub struct FieldProxy<'a, T>(pub &'a T);

/// Descent path: the field is itself a record.
pub trait FlattenStruct {
    fn flatten_field(
        &self,
        desc: &FieldDescriptor,
        prefix: &str,
        out: &mut UpdateDocument,
    ) -> Result<(), Error>;
}

impl<T: Flatten> FlattenStruct for FieldProxy<'_, T> {
    fn flatten_field(
        &self,
        desc: &FieldDescriptor,
        prefix: &str,
        out: &mut UpdateDocument,
    ) -> Result<(), Error> {
        match desc.inline {
            true => self.0.flatten_fields(prefix, out),
            false => format!("{prefix}{}.", desc.name).pipe(|child| self.0.flatten_fields(&child, out)),
        }
    }
}

/// Fallback path: the field does not flatten, so it is emitted whole under its
/// own key.
pub trait FlattenLeaf {
    fn flatten_field(
        &self,
        desc: &FieldDescriptor,
        prefix: &str,
        out: &mut UpdateDocument,
    ) -> Result<(), Error>;
}

impl<T: Serialize> FlattenLeaf for &FieldProxy<'_, T> {
    fn flatten_field(
        &self,
        desc: &FieldDescriptor,
        prefix: &str,
        out: &mut UpdateDocument,
    ) -> Result<(), Error> {
        let key = format!("{prefix}{}", desc.name);
        serde_json::to_value(self.0)
            .map_err(|source| Error::SerializingLeaf {
                key: key.clone(),
                source,
            })
            .and_then(|value| insert_leaf(out, key, value))
    }
}

/// Every insertion goes through the one shared map, which is what catches
/// collisions between root fields, inlined fields, and separate branches
/// alike.
pub(crate) fn insert_leaf(out: &mut UpdateDocument, key: String, value: Value) -> Result<(), Error> {
    match out.entry(key) {
        Entry::Occupied(entry) => Err(Error::DuplicateKey {
            key: entry.key().clone(),
        }),
        Entry::Vacant(entry) => {
            entry.insert(value);
            Ok(())
        }
    }
}

/// Leaf for an absent `Option` field that is not `omit_empty`.
pub fn insert_null(
    desc: &FieldDescriptor,
    prefix: &str,
    out: &mut UpdateDocument,
) -> Result<(), Error> {
    insert_leaf(out, format!("{prefix}{}", desc.name), Value::Null)
}

/// Zero-value probe backing `omit_empty` for non-reference fields, defined on
/// the serialized form: null, `false`, numeric zero, empty string, empty
/// collection, or a record whose values are all empty.
///
/// `Option` fields never reach this probe: emptiness is shallow on
/// references, so the generated code only asks whether the `Option` itself is
/// absent and a present reference to a zero value is still emitted.
pub fn is_empty_value<T: Serialize>(value: &T) -> Result<bool, Error> {
    serde_json::to_value(value)
        .map(|value| is_empty(&value))
        .map_err(Error::CheckingEmptiness)
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(value) => !value,
        Value::Number(value) => value.as_f64().is_some_and(|value| value == 0.0),
        Value::String(value) => value.is_empty(),
        Value::Array(values) => values.is_empty(),
        Value::Object(fields) => fields.values().all(is_empty),
    }
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn test_empty_values() {
        for value in [
            json!(null),
            json!(false),
            json!(0),
            json!(0.0),
            json!(""),
            json!([]),
            json!({}),
            json!({"a": 0, "b": {"c": ""}}),
        ] {
            assert!(is_empty(&value), "{value} should be empty");
        }
    }

    #[test]
    fn test_non_empty_values() {
        for value in [
            json!(true),
            json!(1),
            json!(-0.5),
            json!("x"),
            json!([0]),
            json!({"a": 0, "b": 1}),
        ] {
            assert!(!is_empty(&value), "{value} should not be empty");
        }
    }
}
