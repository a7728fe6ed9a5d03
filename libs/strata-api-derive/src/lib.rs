use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input};

/// Derive macro for record types.
///
/// Implements `strata_api::Typed` on a struct with named fields:
///
/// - `descriptor()`: a record descriptor (built once and cached), one
///   `FieldDef` per field, field types taken from their own `Typed` impls.
/// - `to_data()` / `from_data()`: conversion to and from `Data::Record`,
///   collecting every failing field under its name.
///
/// # Example
///
/// ```ignore
/// #[derive(Typed, Debug, PartialEq)]
/// #[strata(name = "Point")]
/// pub struct Point {
///     pub x: i64,
///
///     #[strata(rename = "label", default)]
///     pub name: String,
/// }
/// ```
///
/// Container attributes: `name = "..."` (descriptor name, defaults to the
/// struct ident), `named_tuple` (positional layout).
/// Field attributes: `rename = "..."`, `default` (uses `Default::default()`).
#[proc_macro_derive(Typed, attributes(strata))]
pub fn derive_typed(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error().into(),
    }
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Typed cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Typed only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(name, "Typed only supports structs"));
        }
    };

    // Parse #[strata(...)] on the container.
    let mut type_name = name.to_string();
    let mut named_tuple = false;
    for attr in &input.attrs {
        if !attr.path().is_ident("strata") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                type_name = value.value();
            } else if meta.path.is_ident("named_tuple") {
                named_tuple = true;
            } else {
                return Err(meta.error(
                    "unknown container attribute (expected `name` or `named_tuple`)",
                ));
            }
            Ok(())
        })?;
    }

    let mut field_def_tokens = Vec::new();
    let mut to_data_tokens = Vec::new();
    let mut take_tokens = Vec::new();
    let mut idents = Vec::new();
    let mut vars = Vec::new();

    for field in fields {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;
        let field_name_str = field_name.to_string();
        let field_ty = &field.ty;

        // Parse #[strata(...)] on the field.
        let mut rename: Option<String> = None;
        let mut has_default = false;

        for attr in &field.attrs {
            if !attr.path().is_ident("strata") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    rename = Some(value.value());
                } else if meta.path.is_ident("default") {
                    has_default = true;
                } else {
                    return Err(meta.error(
                        "unknown field attribute (expected `rename` or `default`)",
                    ));
                }
                Ok(())
            })?;
        }

        let mut field_def = quote! {
            ::strata_api::FieldDef::new(
                #field_name_str,
                <#field_ty as ::strata_api::Typed>::descriptor(),
            )
        };
        if has_default {
            field_def = quote! {
                #field_def.with_default(::strata_api::Typed::to_data(
                    &<#field_ty as ::core::default::Default>::default(),
                ))
            };
        }
        if let Some(rename) = rename {
            field_def = quote! { #field_def.renamed(#rename) };
        }
        field_def_tokens.push(field_def);

        to_data_tokens.push(quote! {
            (
                #field_name_str.to_string(),
                ::strata_api::Typed::to_data(&self.#field_name),
            )
        });

        let var = format_ident!("__{}", field_name);
        take_tokens.push(quote! {
            let #var = __errors.collect(
                ::strata_api::PathElem::Field(#field_name_str.to_string()),
                ::strata_api::typed::take_field::<#field_ty>(&mut __record, #field_name_str),
            );
        });
        idents.push(field_name.clone());
        vars.push(var);
    }

    let constructor = if named_tuple {
        quote! { ::strata_api::TypeDesc::named_tuple }
    } else {
        quote! { ::strata_api::TypeDesc::record }
    };

    let expanded = quote! {
        impl ::strata_api::Typed for #name {
            fn descriptor() -> ::strata_api::TypeDesc {
                static __DESC: ::std::sync::OnceLock<::strata_api::TypeDesc> =
                    ::std::sync::OnceLock::new();
                __DESC
                    .get_or_init(|| #constructor(#type_name, vec![#(#field_def_tokens),*]))
                    .clone()
            }

            fn to_data(&self) -> ::strata_api::Data {
                ::strata_api::Data::Record(::strata_api::RecordData::new(
                    <Self as ::strata_api::Typed>::descriptor(),
                    vec![#(#to_data_tokens),*],
                ))
            }

            fn from_data(
                __data: ::strata_api::Data,
            ) -> ::core::result::Result<Self, ::strata_api::ConversionError> {
                let __desc = <Self as ::strata_api::Typed>::descriptor();
                #[allow(unused_mut)]
                let mut __record = ::strata_api::typed::expect_record(__data, &__desc)?;
                #[allow(unused_mut)]
                let mut __errors = ::strata_api::ErrorCollector::new();
                #(#take_tokens)*
                #[allow(unreachable_patterns)]
                match (#(#vars,)*) {
                    (#(::core::option::Option::Some(#vars),)*) => {
                        ::core::result::Result::Ok(Self { #(#idents: #vars),* })
                    }
                    _ => ::core::result::Result::Err(
                        __errors.into_error(format!("Cannot convert into `{}`", __desc)),
                    ),
                }
            }
        }
    };

    Ok(TokenStream::from(expanded))
}
