/// Resolved `#[flat(...)]` annotations for one struct field.
///
/// Produced at compile time by the derive macro, one `const` per field; the
/// flattening walk consumes it as-is and never re-parses attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Key segment contributed by the field: the `rename` value, or the field
    /// identifier.
    pub name: &'static str,
    /// The field never appears in the output.
    pub skip: bool,
    /// The field is omitted while its value is its type's empty value.
    pub omit_empty: bool,
    /// Nested record fields merge into the parent's namespace instead of
    /// gaining a path segment.
    pub inline: bool,
}
