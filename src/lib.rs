//! Flattens nested structs into the dotted-path update documents that
//! document-oriented data stores expect for partial updates, so callers never
//! hand-write key paths like `"address.city"`.
//!
//! Per-field `#[flat(...)]` annotations control naming (`rename`), exclusion
//! (`skip`), emptiness-skipping (`omit_empty`), and namespace merging
//! (`inline`). Any two fields resolving to the same composed key are reported
//! as an error instead of silently overwriting each other.
//!
//! ```
//! use {
//!     flatdoc::{Flatten, flatten},
//!     serde::Serialize,
//! };
//!
//! #[derive(Serialize, Flatten)]
//! struct Address {
//!     city: String,
//!     zip: String,
//! }
//!
//! #[derive(Serialize, Flatten)]
//! struct Profile {
//!     name: String,
//!     #[flat(rename = "addr")]
//!     address: Address,
//!     #[flat(omit_empty)]
//!     nickname: Option<String>,
//! }
//!
//! # fn main() -> Result<(), flatdoc::Error> {
//! let update = flatten(&Profile {
//!     name: "Ada".into(),
//!     address: Address {
//!         city: "NYC".into(),
//!         zip: "10001".into(),
//!     },
//!     nickname: None,
//! })?;
//! assert_eq!(update.get("addr.city"), Some(&"NYC".into()));
//! assert!(!update.contains_key("nickname"));
//! # Ok(())
//! # }
//! ```

use serde::Serialize;

pub mod value;

mod descriptor;
mod error;
mod field;

pub use {descriptor::FieldDescriptor, error::Error, flatdoc_derive::Flatten};

/// Flat mapping from dotted paths to leaf values, in field declaration order.
pub type UpdateDocument = indexmap::IndexMap<String, serde_json::Value>;

/// A record whose fields can be walked into an [`UpdateDocument`].
///
/// Implemented by `#[derive(Flatten)]` on structs with named fields. Types
/// that define their own wire representation (a hand-written [`Serialize`])
/// stay off this trait and are emitted as single opaque leaves, which is also
/// the only option for foreign types whose fields are not visible here.
pub trait Flatten: Serialize {
    /// Appends one entry per leaf field of `self`, each key prefixed with
    /// `prefix`.
    ///
    /// On error `out` may hold entries written before the failure; callers
    /// must discard it.
    fn flatten_fields(&self, prefix: &str, out: &mut UpdateDocument) -> Result<(), Error>;
}

impl<T: Flatten> Flatten for Box<T> {
    fn flatten_fields(&self, prefix: &str, out: &mut UpdateDocument) -> Result<(), Error> {
        (**self).flatten_fields(prefix, out)
    }
}

impl<T: Flatten> Flatten for &T {
    fn flatten_fields(&self, prefix: &str, out: &mut UpdateDocument) -> Result<(), Error> {
        (**self).flatten_fields(prefix, out)
    }
}

/// Flattens `value` into a fresh update document.
pub fn flatten<T: Flatten>(value: &T) -> Result<UpdateDocument, Error> {
    let mut out = UpdateDocument::new();
    value.flatten_fields("", &mut out)?;
    tracing::trace!(entries = out.len(), "flattened into an update document");
    Ok(out)
}

#[doc(hidden)]
pub mod __private {
    pub use {
        crate::{
            descriptor::FieldDescriptor,
            field::{FieldProxy, FlattenLeaf, FlattenStruct, insert_null, is_empty_value},
        },
        serde::Serialize,
    };
}
