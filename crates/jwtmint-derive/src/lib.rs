//! jwtmint Macros
//!
//! This crate provides the `#[claims]` attribute macro.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, Path};

/// Turns a struct into a jwtmint claim set.
///
/// The struct gains a flattened `registered: jwtmint::RegisteredClaims`
/// field holding the registered claims:
/// - Issuer (`iss`)
/// - Subject (`sub`)
/// - Audience (`aud`)
/// - Expiration (`exp`)
/// - Not Before (`nbf`)
/// - Issued At (`iat`)
/// - JWT ID (`jti`)
///
/// It derives `Debug`, `Clone`, `Serialize` and `Deserialize`, and implements
/// `jwtmint::Claims`. With `#[claims(validate = path::to::fn)]` the function
/// (`fn(&Self) -> jwtmint::Result<()>`) runs after the built-in rules.
#[proc_macro_attribute]
pub fn claims(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut validate: Option<Path> = None;
    let arg_parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("validate") {
            validate = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported claims argument, expected `validate = path`"))
        }
    });
    parse_macro_input!(args with arg_parser);

    let input = parse_macro_input!(input as DeriveInput);

    let struct_name = &input.ident;
    let vis = &input.vis;
    let attrs = &input.attrs;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let existing_fields = if let syn::Data::Struct(syn::DataStruct {
        fields: syn::Fields::Named(fields),
        ..
    }) = &input.data
    {
        &fields.named
    } else {
        return syn::Error::new_spanned(
            struct_name,
            "#[claims] can only be applied to structs with named fields",
        )
        .to_compile_error()
        .into();
    };

    let validate_body = match &validate {
        Some(path) => quote! { #path(self) },
        None => quote! { ::core::result::Result::Ok(()) },
    };

    let expanded = quote! {
        #[derive(
            Debug,
            Clone,
            ::jwtmint::serde::Serialize,
            ::jwtmint::serde::Deserialize
        )]
        #[serde(crate = "::jwtmint::serde")]
        #(#attrs)*
        #vis struct #struct_name #generics #where_clause {
            #[serde(flatten)]
            pub registered: ::jwtmint::RegisteredClaims,

            #existing_fields
        }

        impl #impl_generics ::jwtmint::Claims for #struct_name #ty_generics #where_clause {
            fn expiration_time(&self) -> ::jwtmint::Result<::core::option::Option<::jwtmint::NumericDate>> {
                ::jwtmint::Claims::expiration_time(&self.registered)
            }

            fn issued_at(&self) -> ::jwtmint::Result<::core::option::Option<::jwtmint::NumericDate>> {
                ::jwtmint::Claims::issued_at(&self.registered)
            }

            fn not_before(&self) -> ::jwtmint::Result<::core::option::Option<::jwtmint::NumericDate>> {
                ::jwtmint::Claims::not_before(&self.registered)
            }

            fn issuer(&self) -> ::jwtmint::Result<::core::option::Option<&str>> {
                ::jwtmint::Claims::issuer(&self.registered)
            }

            fn subject(&self) -> ::jwtmint::Result<::core::option::Option<&str>> {
                ::jwtmint::Claims::subject(&self.registered)
            }

            fn audience(&self) -> ::jwtmint::Result<::jwtmint::ClaimStrings> {
                ::jwtmint::Claims::audience(&self.registered)
            }

            fn validate(&self) -> ::jwtmint::Result<()> {
                #validate_body
            }
        }
    };

    TokenStream::from(expanded)
}
