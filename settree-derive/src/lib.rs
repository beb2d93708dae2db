//! Derive macros for settree
//!
//! This crate provides `#[derive(DataSet)]`, which turns a struct with named
//! fields into a settings schema at compile time.
//!
//! # Usage
//!
//! ```text
//! use settree::DeriveDataSet;
//! use serde::Serialize;
//!
//! #[derive(DeriveDataSet, Default, Serialize)]
//! #[dataset(file = "config/app.json", env_prefix = "APP_")]
//! struct AppConfig {
//!     serializers: Serializers,      // nested: Serializers derives DataSet too
//!
//!     #[setting(default = 22)]
//!     steps: u32,
//!
//!     #[setting(rename = "maxAuthCount")]
//!     max_auth_count: u32,           // default taken from AppConfig::default()
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Expr, Fields, Lit, Meta, Type, parse_macro_input};

/// Derive macro for generating `DataSet` implementations.
///
/// Fields are declared in order. A field whose type is not a primitive
/// (`bool`, integers, floats, `char`, `String`) is declared as a nested block
/// built from that type's own `DataSet` schema; other fields are scalar
/// settings whose default comes from the struct's `Default` impl (so the
/// struct must then implement `Default` and `serde::Serialize`).
///
/// # Attributes
///
/// ## Container attributes (`#[dataset(...)]`)
/// - `file = "path"` - Load a file after the fields are declared (strict)
/// - `optional_file = "path"` - Same, but a missing file is ignored
/// - `env_prefix = "APP_"` - Load prefixed environment variables last (prefix trimmed)
///
/// ## Field attributes (`#[setting(...)]`)
/// - `default = <expr>` - Default value, any `serde::Serialize` expression
/// - `rename = "key"` - Setting key (defaults to the field name)
/// - `nested` - Force a nested block (the field type must implement `DataSet`)
/// - `value` - Force a scalar setting
/// - `skip` - Leave this field out of the schema
#[proc_macro_derive(DataSet, attributes(dataset, setting))]
pub fn derive_data_set(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let container_attrs = parse_container_attrs(&input.attrs)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "DataSet can only be derived for structs with named fields.\n\nExample:\n  #[derive(DataSet)]\n  struct MyConfig {\n      field: Type,\n  }",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "DataSet can only be derived for structs.\n\nTry: #[derive(DataSet)] on a struct, not an enum or union.",
            ));
        }
    };

    let mut steps = Vec::new();
    let mut needs_defaults = false;

    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let field_type = &field.ty;
        let attrs = parse_field_attrs(&field.attrs)?;

        if attrs.skip {
            continue;
        }

        let key = attrs.rename.clone().unwrap_or_else(|| field_name.to_string());
        if let Err(reason) = check_key(&key) {
            return Err(syn::Error::new_spanned(
                field,
                format!("invalid setting key {key:?}: {reason}"),
            ));
        }

        let nested = match (attrs.nested, attrs.value) {
            (true, true) => {
                return Err(syn::Error::new_spanned(
                    field,
                    "#[setting(nested)] and #[setting(value)] cannot be combined",
                ));
            }
            (true, false) => true,
            (false, true) => false,
            (false, false) => attrs.default.is_none() && is_nested_struct(field_type),
        };

        if nested {
            steps.push(quote! {
                builder.nested_schema(#key, <#field_type as ::settree::DataSet>::schema()?)?
            });
        } else if let Some(default) = &attrs.default {
            steps.push(quote! {
                builder.setting(#key, ::settree::serde_json::to_value(#default)?)?
            });
        } else {
            needs_defaults = true;
            steps.push(quote! {
                builder.setting(#key, ::settree::serde_json::to_value(&defaults.#field_name)?)?
            });
        }
    }

    for (path, strict) in &container_attrs.files {
        steps.push(quote! {
            builder.load(::settree::LoadInstruction::file(#path).strict(#strict))
        });
    }

    if let Some(prefix) = &container_attrs.env_prefix {
        steps.push(quote! {
            builder.load(::settree::LoadInstruction::env().prefix(#prefix).trim_prefix(true))
        });
    }

    let defaults = needs_defaults.then(|| {
        quote! { let defaults = <#name as ::core::default::Default>::default(); }
    });

    Ok(quote! {
        impl ::settree::DataSet for #name {
            fn schema() -> ::settree::Result<::settree::Schema> {
                #defaults
                let builder = ::settree::Schema::builder();
                #( let builder = #steps; )*
                ::core::result::Result::Ok(builder.build())
            }
        }
    })
}

/// Container-level attributes from #[dataset(...)]
#[derive(Default)]
struct ContainerAttrs {
    files: Vec<(String, bool)>, // (path, strict)
    env_prefix: Option<String>,
}

/// Field-level attributes from #[setting(...)]
#[derive(Default)]
struct FieldAttrs {
    default: Option<Expr>,
    rename: Option<String>,
    nested: bool,
    value: bool,
    skip: bool,
}

fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
    let mut result = ContainerAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("dataset") {
            continue;
        }
        let nested = attr.parse_args_with(
            syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated,
        )?;
        for meta in nested {
            let Meta::NameValue(nv) = meta else {
                return Err(syn::Error::new_spanned(
                    meta,
                    "expected `file = \"...\"`, `optional_file = \"...\"` or `env_prefix = \"...\"`",
                ));
            };
            let value = string_literal(&nv.value, "dataset")?;
            if nv.path.is_ident("file") {
                result.files.push((value, true));
            } else if nv.path.is_ident("optional_file") {
                result.files.push((value, false));
            } else if nv.path.is_ident("env_prefix") {
                result.env_prefix = Some(value);
            } else {
                return Err(syn::Error::new_spanned(nv.path, "unknown #[dataset] attribute"));
            }
        }
    }

    Ok(result)
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("setting") {
            continue;
        }
        let nested = attr.parse_args_with(
            syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated,
        )?;
        for meta in nested {
            match meta {
                Meta::Path(path) => {
                    if path.is_ident("nested") {
                        result.nested = true;
                    } else if path.is_ident("value") {
                        result.value = true;
                    } else if path.is_ident("skip") {
                        result.skip = true;
                    } else {
                        return Err(syn::Error::new_spanned(path, "unknown #[setting] flag"));
                    }
                }
                Meta::NameValue(nv) => {
                    if nv.path.is_ident("default") {
                        result.default = Some(nv.value);
                    } else if nv.path.is_ident("rename") {
                        result.rename = Some(string_literal(&nv.value, "setting(rename)")?);
                    } else {
                        return Err(syn::Error::new_spanned(nv.path, "unknown #[setting] attribute"));
                    }
                }
                Meta::List(list) => {
                    return Err(syn::Error::new_spanned(list, "unexpected list in #[setting]"));
                }
            }
        }
    }

    Ok(result)
}

fn string_literal(expr: &Expr, attribute: &str) -> syn::Result<String> {
    if let Expr::Lit(lit) = expr {
        if let Lit::Str(s) = &lit.lit {
            return Ok(s.value());
        }
    }
    Err(syn::Error::new_spanned(
        expr,
        format!("#[{attribute}] values must be string literals.\n\nExample: #[setting(rename = \"maxAuthCount\")]"),
    ))
}

/// Same rules as `settree::schema::validate_key`, applied at compile time
fn check_key(key: &str) -> Result<(), &'static str> {
    if key.is_empty() {
        Err("key must not be empty")
    } else if key.contains('.') {
        Err("key must not contain '.'")
    } else if key.trim() != key {
        Err("key must not start or end with whitespace")
    } else if key.chars().any(char::is_control) {
        Err("key must not contain control characters")
    } else {
        Ok(())
    }
}

/// Check if a type is likely a nested struct (not a primitive)
fn is_nested_struct(ty: &Type) -> bool {
    if let Type::Path(path) = ty {
        if let Some(ident) = path.path.get_ident() {
            let name = ident.to_string();
            // Primitive types are not nested structs
            !matches!(
                name.as_str(),
                "bool"
                    | "i8"
                    | "i16"
                    | "i32"
                    | "i64"
                    | "i128"
                    | "isize"
                    | "u8"
                    | "u16"
                    | "u32"
                    | "u64"
                    | "u128"
                    | "usize"
                    | "f32"
                    | "f64"
                    | "char"
                    | "str"
                    | "String"
                    | "Value"
            )
        } else {
            // Has path segments like Vec<T>, Option<T>, etc.
            // These are values, not nested blocks
            false
        }
    } else {
        false
    }
}
