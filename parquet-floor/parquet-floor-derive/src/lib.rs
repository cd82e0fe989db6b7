use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Attribute, Data, DeriveInput, Fields, LitStr, Path, ext::IdentExt, parse_macro_input,
    parse_quote,
};

/// Derive `parquet_floor_native::Reflect` for a struct with named fields.
///
/// Each field is exposed under its lower-cased name. Field attributes:
///
/// - `#[floor(skip)]`: the field is never marshalled.
/// - `#[floor(rename = "name")]`: use `name` as the record field name.
///
/// The container attribute `#[floor(crate = "path")]` overrides the path of
/// the `parquet_floor_native` crate, e.g. when it is re-exported.
///
/// ```rust,ignore
/// #[derive(Reflect)]
/// struct Person {
///     name: String,
///     #[floor(rename = "years")]
///     age: Option<u32>,
///     #[floor(skip)]
///     cache: Vec<u8>,
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(floor))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_reflect_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate_reflect_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let krate = crate_path(&input.attrs)?;
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let where_clause = add_trait_bounds(where_clause, &input.generics, &krate);

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unit => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Reflect cannot be derived for unit structs",
                ));
            }
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Reflect cannot be derived for tuple structs",
                ));
            }
        },
        Data::Enum(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "Reflect cannot be derived for enums",
            ));
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "Reflect cannot be derived for unions",
            ));
        }
    };

    let mut entries = Vec::new();
    for field in fields {
        let options = FieldOptions::parse(&field.attrs)?;
        if options.skip {
            continue;
        }
        let Some(ident) = &field.ident else {
            continue;
        };
        let field_name = options
            .rename
            .unwrap_or_else(|| ident.unraw().to_string().to_lowercase());
        entries.push(quote! {
            #krate::StructField::new(#field_name, &self.#ident)
        });
    }

    Ok(quote! {
        impl #impl_generics #krate::Reflect for #name #ty_generics #where_clause {
            fn reflect(&self) -> #krate::Reflected<'_> {
                #krate::Reflected::Struct(::std::vec![#(#entries),*])
            }
        }
    })
}

fn crate_path(attrs: &[Attribute]) -> syn::Result<Path> {
    let mut path = None;
    for attr in attrs {
        if !attr.path().is_ident("floor") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("crate") {
                let value: LitStr = meta.value()?.parse()?;
                path = Some(value.parse()?);
                Ok(())
            } else {
                Err(meta.error("unsupported floor container attribute"))
            }
        })?;
    }
    Ok(path.unwrap_or_else(|| parse_quote!(::parquet_floor_native)))
}

fn add_trait_bounds(
    where_clause: Option<&syn::WhereClause>,
    generics: &syn::Generics,
    krate: &Path,
) -> TokenStream2 {
    let mut predicates = where_clause
        .map(|w| w.predicates.iter().cloned().collect::<Vec<_>>())
        .unwrap_or_default();

    for param in &generics.params {
        if let syn::GenericParam::Type(type_param) = param {
            let ident = &type_param.ident;
            predicates.push(parse_quote!(#ident: #krate::Reflect));
        }
    }

    if predicates.is_empty() {
        quote! {}
    } else {
        quote! { where #(#predicates),* }
    }
}

#[derive(Default)]
struct FieldOptions {
    skip: bool,
    rename: Option<String>,
}

impl FieldOptions {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut options = Self::default();
        for attr in attrs {
            if !attr.path().is_ident("floor") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    options.skip = true;
                    Ok(())
                } else if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    options.rename = Some(value.value());
                    Ok(())
                } else {
                    Err(meta.error("unsupported floor field attribute"))
                }
            })?;
        }
        Ok(options)
    }
}
