use syn::{Attribute, LitStr};

/// The `#[flat(...)]` annotations of a single field, as written.
///
/// This is the compile-time side of [`flatdoc`]'s `FieldDescriptor`: `rename`
/// still unresolved (`None` means "use the field identifier"), everything else
/// already normalized.
#[derive(Debug, Default)]
pub(crate) struct FieldAttrs {
    pub(crate) rename: Option<String>,
    pub(crate) skip: bool,
    pub(crate) omit_empty: bool,
    pub(crate) inline: bool,
}

impl FieldAttrs {
    pub(crate) fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in attrs {
            if !attr.path().is_ident("flat") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let key: LitStr = meta.value()?.parse()?;
                    match key.value().is_empty() {
                        true => Err(syn::Error::new(key.span(), "renamed key must not be empty")),
                        false => {
                            parsed.rename = Some(key.value());
                            Ok(())
                        }
                    }
                } else if meta.path.is_ident("skip") {
                    parsed.skip = true;
                    Ok(())
                } else if meta.path.is_ident("omit_empty") {
                    parsed.omit_empty = true;
                    Ok(())
                } else if meta.path.is_ident("inline") {
                    parsed.inline = true;
                    Ok(())
                } else {
                    Err(meta.error("unsupported flat attribute, expected one of `rename`, `skip`, `omit_empty`, `inline`"))
                }
            })?;
        }
        Ok(parsed)
    }
}
