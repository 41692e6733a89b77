//! Procedural macros for wirebox.
//!
//! Provides `#[derive(Injectable)]`, which turns `#[inject]` field
//! annotations into an `injection_points` implementation.

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, Meta, parse_macro_input};

/// Derives `wirebox::Injectable` for a struct.
///
/// Fields annotated with `#[inject]` become injection points keyed by the
/// field's target type name; `#[inject("key")]` names the registry binding
/// explicitly. Annotated fields must be `wirebox::Dep<T>` slots (anything
/// implementing `wirebox::InjectSlot`). Fields without the annotation are
/// ignored.
///
/// ```ignore
/// #[derive(Default, Injectable)]
/// struct Person {
///     #[inject]
///     stu: Dep<Stu>,
///     #[inject("person_tag")]
///     tag: Dep<String>,
///     nickname: Option<String>,
/// }
/// ```
#[proc_macro_derive(Injectable, attributes(inject))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            name,
            "Injectable can only be derived for structs",
        ));
    };

    let mut points = Vec::new();
    if let Fields::Named(fields) = &data.fields {
        for field in &fields.named {
            let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("inject")) else {
                continue;
            };
            let ident = field
                .ident
                .as_ref()
                .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
            match &attr.meta {
                Meta::Path(_) => points.push(quote! {
                    ::wirebox::InjectionPoint::by_type(&self.#ident)
                }),
                Meta::List(_) => {
                    let key: LitStr = attr.parse_args()?;
                    points.push(quote! {
                        ::wirebox::InjectionPoint::named(#key, &self.#ident)
                    });
                }
                Meta::NameValue(_) => {
                    return Err(syn::Error::new_spanned(
                        attr,
                        "expected `#[inject]` or `#[inject(\"key\")]`",
                    ));
                }
            }
        }
    } else if matches!(data.fields, Fields::Unnamed(_)) {
        // Tuple structs carry no field names to hang annotations on; they
        // can still be registered as dependencies of other services.
        for field in &data.fields {
            if field.attrs.iter().any(|a| a.path().is_ident("inject")) {
                return Err(syn::Error::new_spanned(
                    field,
                    "#[inject] requires a named field",
                ));
            }
        }
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::wirebox::Injectable for #name #ty_generics #where_clause {
            fn injection_points(&self) -> ::std::vec::Vec<::wirebox::InjectionPoint<'_>> {
                ::std::vec![#(#points),*]
            }
        }
    })
}
