use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Field, Fields, LitStr};

/// Must match `model_store::MAX_COLLECTION_LEN`.
const MAX_COLLECTION_LEN: usize = 64;

pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let collection = extract_collection(input)?;
    let id_field = extract_id_field(input)?;
    let id_ident = &id_field.ident;
    let id_ty = &id_field.ty;

    Ok(quote! {
        impl #impl_generics model_store::Model for #name #ty_generics #where_clause {
            const COLLECTION: &'static str = #collection;

            type Id = #id_ty;

            fn id(&self) -> &Self::Id {
                &self.#id_ident
            }
        }
    })
}

fn extract_collection(input: &DeriveInput) -> syn::Result<String> {
    for attr in &input.attrs {
        if !attr.path().is_ident("model") {
            continue;
        }

        let mut collection = None;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                let value: LitStr = meta.value()?.parse()?;
                validate_collection(&value.value(), value.span())?;
                collection = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `collection = \"...\"`"))
            }
        })?;

        if let Some(c) = collection {
            return Ok(c);
        }
    }

    // Default: snake_case struct name + "s"
    let collection = format!("{}s", to_snake_case(&input.ident.to_string()));
    validate_collection(&collection, input.ident.span())?;
    Ok(collection)
}

fn validate_collection(collection: &str, span: Span) -> syn::Result<()> {
    if collection.is_empty() {
        return Err(syn::Error::new(span, "collection name must not be empty"));
    }
    if collection.len() > MAX_COLLECTION_LEN {
        return Err(syn::Error::new(
            span,
            format!(
                "collection name is {} bytes; the limit is {}",
                collection.len(),
                MAX_COLLECTION_LEN
            ),
        ));
    }
    if let Some(ch) = collection
        .chars()
        .find(|ch| !(ch.is_ascii_alphanumeric() || *ch == '_' || *ch == '-'))
    {
        return Err(syn::Error::new(
            span,
            format!(
                "collection {:?} contains {:?}; only [A-Za-z0-9_-] is allowed",
                collection, ch
            ),
        ));
    }
    Ok(())
}

fn extract_id_field(input: &DeriveInput) -> syn::Result<&Field> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new(
                    input.ident.span(),
                    "Model derive requires a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new(
                input.ident.span(),
                "Model derive only supports structs",
            ))
        }
    };

    let mut marked = None;
    for field in fields {
        for attr in &field.attrs {
            if !attr.path().is_ident("model") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("id") {
                    Ok(())
                } else {
                    Err(meta.error("expected `id`"))
                }
            })?;
            if marked.is_some() {
                return Err(syn::Error::new(
                    field.span(),
                    "only one field may be marked #[model(id)]",
                ));
            }
            marked = Some(field);
        }
    }
    if let Some(field) = marked {
        return Ok(field);
    }

    fields
        .iter()
        .find(|field| field.ident.as_ref().is_some_and(|ident| ident == "id"))
        .ok_or_else(|| {
            syn::Error::new(
                input.ident.span(),
                "Model derive: no field marked with #[model(id)] and no field named `id`",
            )
        })
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
