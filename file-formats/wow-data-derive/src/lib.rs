use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Expr, Fields, parse_macro_input};

/// Whether a field carries `#[wow_data(skip = ...)]`
fn is_skipped(field: &syn::Field) -> syn::Result<bool> {
    let mut skipped = false;
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("wow_data")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                // the value documents the in-memory default only
                meta.value()?.parse::<Expr>()?;
                skipped = true;
                Ok(())
            } else {
                Err(meta.error("unsupported wow_data attribute"))
            }
        })?;
    }
    Ok(skipped)
}

/// Derives `wow_data::types::WowDataW` for a struct with named fields.
///
/// Fields are written in declaration order and `WOW_SIZE` is the sum of the field sizes.
/// A field marked `#[wow_data(skip = expr)]` is neither written nor counted.
#[proc_macro_derive(WowDataW, attributes(wow_data))]
pub fn wow_data_w_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(s) => &s.fields,
        Data::Enum(_) | Data::Union(_) => {
            return syn::Error::new_spanned(&input, "WowDataW can only be derived for structs.")
                .to_compile_error()
                .into();
        }
    };

    let writer_body = match generate_struct_writer_body(fields) {
        Ok(body) => body,
        Err(e) => return e.to_compile_error().into(),
    };
    let sizer_body = match generate_struct_size_body(fields) {
        Ok(body) => body,
        Err(e) => return e.to_compile_error().into(),
    };

    let expanded = quote! {
        impl #impl_generics ::wow_data::types::WowDataW for #ident #ty_generics #where_clause {
            const WOW_SIZE: usize = #sizer_body;

            fn wow_write<W: ::std::io::Write>(&self, writer: &mut W) -> ::wow_data::error::Result<()> {
                #writer_body
            }
        }
    };

    TokenStream::from(expanded)
}

fn named_fields(
    fields: &Fields,
) -> syn::Result<&syn::punctuated::Punctuated<syn::Field, syn::token::Comma>> {
    if let Fields::Named(f) = fields {
        Ok(&f.named)
    } else {
        Err(syn::Error::new_spanned(
            fields,
            "WowDataW on structs only supports named fields.",
        ))
    }
}

fn generate_struct_writer_body(fields: &Fields) -> syn::Result<proc_macro2::TokenStream> {
    let mut writes = Vec::new();
    for field in named_fields(fields)? {
        if is_skipped(field)? {
            continue;
        }
        if let Some(name) = &field.ident {
            writes.push(quote! {
                ::wow_data::types::WowDataW::wow_write(&self.#name, writer)?;
            });
        }
    }

    Ok(quote! {
        #(#writes)*
        Ok(())
    })
}

fn generate_struct_size_body(fields: &Fields) -> syn::Result<proc_macro2::TokenStream> {
    let mut sizes = Vec::new();
    for field in named_fields(fields)? {
        if !is_skipped(field)? {
            let ty = &field.ty;
            sizes.push(quote! { <#ty as ::wow_data::types::WowDataW>::WOW_SIZE });
        }
    }

    Ok(quote! { 0 #(+ #sizes)* })
}
