//! Derive macro backing `flatdoc`.
//!
//! `#[derive(Flatten)]` turns a struct with named fields into an
//! implementation of `flatdoc::Flatten` whose body is a fixed sequence of
//! per-field steps over `const` field descriptors, so the flattening walk
//! itself needs no runtime introspection.
//!
//! Generic structs are supported: a field whose type involves a generic
//! parameter is emitted as an opaque leaf (the generated impl bounds it
//! `Serialize`). Bound the parameter with `Flatten` on the struct definition
//! to descend into it instead.

use {
    proc_macro::TokenStream,
    proc_macro2::TokenTree,
    quote::{ToTokens, quote},
    std::collections::HashSet,
    syn::{Data, DeriveInput, Field, Fields, LitStr, Type, parse_macro_input, parse_quote},
};

mod attrs;

use attrs::FieldAttrs;

#[proc_macro_derive(Flatten, attributes(flat))]
pub fn derive_flatten(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(|error| error.to_compile_error())
        .into()
}

fn expand(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new(
                    input.ident.span(),
                    "Flatten requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new(
                input.ident.span(),
                "Flatten can only be derived for structs",
            ));
        }
    };

    let parsed = fields
        .iter()
        .map(|field| FieldAttrs::parse(&field.attrs).map(|attrs| (field, attrs)))
        .collect::<syn::Result<Vec<_>>>()?;

    let steps = parsed
        .iter()
        .filter(|(_, attrs)| !attrs.skip)
        .map(|(field, attrs)| {
            let ident = field.ident.as_ref().expect("named field");
            let name = attrs.rename.clone().unwrap_or_else(|| ident.to_string());
            let name = LitStr::new(&name, ident.span());
            let omit_empty = attrs.omit_empty;
            let inline = attrs.inline;

            // `Option` is the one ownership reference the walk has to unwrap
            // by value: a present record descends, an absent one is a null
            // leaf. Emptiness is shallow on references, so `omit_empty` asks
            // only whether the reference itself is absent — `Some(0)` stays.
            let step = match (is_option(&field.ty), omit_empty) {
                (true, true) => quote! {
                    if let ::core::option::Option::Some(value) = self.#ident.as_ref() {
                        (&FieldProxy(value)).flatten_field(&DESC, prefix, out)?;
                    }
                },
                (true, false) => quote! {
                    match self.#ident.as_ref() {
                        ::core::option::Option::Some(value) => {
                            (&FieldProxy(value)).flatten_field(&DESC, prefix, out)?;
                        }
                        ::core::option::Option::None => insert_null(&DESC, prefix, out)?,
                    }
                },
                (false, true) => quote! {
                    if !is_empty_value(&self.#ident)? {
                        (&FieldProxy(&self.#ident)).flatten_field(&DESC, prefix, out)?;
                    }
                },
                (false, false) => quote! {
                    (&FieldProxy(&self.#ident)).flatten_field(&DESC, prefix, out)?;
                },
            };

            quote! {{
                const DESC: FieldDescriptor = FieldDescriptor {
                    name: #name,
                    skip: false,
                    omit_empty: #omit_empty,
                    inline: #inline,
                };
                #step
            }}
        })
        .collect::<Vec<_>>();

    let ident = &input.ident;
    let generics = bounded_generics(&input, &parsed);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        const _: () = {
            #[allow(unused_imports)]
            use ::flatdoc::__private::{
                FieldDescriptor, FieldProxy, FlattenLeaf as _, FlattenStruct as _, insert_null,
                is_empty_value,
            };

            #[automatically_derived]
            impl #impl_generics ::flatdoc::Flatten for #ident #ty_generics #where_clause {
                fn flatten_fields(
                    &self,
                    prefix: &str,
                    out: &mut ::flatdoc::UpdateDocument,
                ) -> ::core::result::Result<(), ::flatdoc::Error> {
                    #(#steps)*
                    ::core::result::Result::Ok(())
                }
            }
        };
    })
}

/// The struct's generics, plus the bounds the generated impl needs: the type
/// itself must serialize (the supertrait), and every kept field whose type
/// involves a generic parameter must serialize so it can be emitted as an
/// opaque leaf. A parameter the struct bounds with `Flatten` descends instead.
fn bounded_generics(input: &DeriveInput, parsed: &[(&Field, FieldAttrs)]) -> syn::Generics {
    let mut generics = input.generics.clone();
    if input.generics.params.is_empty() {
        return generics;
    }

    let params: HashSet<String> = input
        .generics
        .type_params()
        .map(|param| param.ident.to_string())
        .chain(
            input
                .generics
                .const_params()
                .map(|param| param.ident.to_string()),
        )
        .collect();

    let ident = &input.ident;
    let (_, ty_generics, _) = input.generics.split_for_impl();
    let where_clause = generics.make_where_clause();
    where_clause
        .predicates
        .push(parse_quote! { #ident #ty_generics: ::flatdoc::__private::Serialize });
    for (field, _) in parsed.iter().filter(|(_, attrs)| !attrs.skip) {
        let ty = &field.ty;
        if mentions_param(ty, &params) {
            where_clause
                .predicates
                .push(parse_quote! { #ty: ::flatdoc::__private::Serialize });
        }
    }
    generics
}

fn mentions_param(ty: &Type, params: &HashSet<String>) -> bool {
    fn scan(stream: proc_macro2::TokenStream, params: &HashSet<String>) -> bool {
        stream.into_iter().any(|tree| match tree {
            TokenTree::Ident(ident) => params.contains(&ident.to_string()),
            TokenTree::Group(group) => scan(group.stream(), params),
            _ => false,
        })
    }
    scan(ty.to_token_stream(), params)
}

/// Syntactic `Option<_>` detection, the same convention serde's derive relies
/// on: a path whose last segment is `Option`.
fn is_option(ty: &Type) -> bool {
    matches!(
        ty,
        Type::Path(path) if path.qself.is_none()
            && path.path.segments.last().is_some_and(|segment| segment.ident == "Option")
    )
}
