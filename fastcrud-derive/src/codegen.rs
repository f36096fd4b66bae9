use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, GenericParam, parse_quote};

use super::attribute_parser::{parse_container_meta, parse_field_meta};
use super::structs::ContainerMeta;

fn named_fields(input: &DeriveInput) -> Result<Vec<&syn::Field>, syn::Error> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "DescribeSchema can only be derived for structs",
        ));
    };
    match &data.fields {
        Fields::Named(named) => Ok(named.named.iter().collect()),
        Fields::Unit => Ok(Vec::new()),
        Fields::Unnamed(_) => Err(syn::Error::new_spanned(
            &input.ident,
            "DescribeSchema only supports structs with named fields",
        )),
    }
}

/// Body of `schema_name`: the container override, else the struct name followed by the
/// names of its type arguments. A generic struct over an anonymous type is anonymous.
fn schema_name_body(input: &DeriveInput, container: &ContainerMeta) -> TokenStream {
    if let Some(name) = &container.name {
        return quote! {
            ::core::option::Option::Some(::std::borrow::Cow::Borrowed(#name))
        };
    }

    let base = input.ident.to_string();
    let type_params: Vec<&syn::Ident> = input
        .generics
        .type_params()
        .map(|param| &param.ident)
        .collect();

    if type_params.is_empty() {
        return quote! {
            ::core::option::Option::Some(::std::borrow::Cow::Borrowed(#base))
        };
    }

    quote! {
        let mut name = ::std::string::String::from(#base);
        #(
            name.push_str(&<#type_params as ::fastcrud::schema::DescribeSchema>::schema_name()?);
        )*
        ::core::option::Option::Some(::std::borrow::Cow::Owned(name))
    }
}

/// `Option<_>`, `std::option::Option<_>` or `core::option::Option<_>`.
fn is_option(ty: &syn::Type) -> bool {
    let syn::Type::Path(type_path) = ty else {
        return false;
    };
    type_path.qself.is_none()
        && type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option")
}

fn field_statements(
    fields: &[&syn::Field],
    container: &ContainerMeta,
) -> Result<Vec<TokenStream>, syn::Error> {
    let mut statements = Vec::with_capacity(fields.len());

    for field in fields {
        let meta = parse_field_meta(field)?;
        if meta.skip {
            continue;
        }
        let ty = &field.ty;

        if meta.flatten {
            if meta.required {
                return Err(syn::Error::new_spanned(
                    field,
                    "`required` has no effect on a flattened field; mark the embedded fields instead",
                ));
            }
            statements.push(if is_option(ty) {
                quote! { schema.splice_optional(generator.subschema_for::<#ty>()); }
            } else {
                quote! { schema.splice(generator.subschema_for::<#ty>()); }
            });
            continue;
        }

        let Some(ident) = &field.ident else {
            continue;
        };
        let rust_name = ident.to_string();
        let rust_name = rust_name.strip_prefix("r#").unwrap_or(&rust_name);
        let name = match (&meta.rename, container.rename_all) {
            (Some(rename), _) => rename.clone(),
            (None, Some(rule)) => rule.apply(rust_name),
            (None, None) => rust_name.to_string(),
        };

        let description = meta.description().map(|text| {
            quote! { property.set_description(#text); }
        });
        let example = meta.example.as_ref().map(|expr| {
            quote! { property.set_example(#expr); }
        });
        let required = meta.required.then(|| {
            quote! { schema.mark_required(#name); }
        });

        statements.push(quote! {
            {
                let mut property = generator.subschema_for::<#ty>();
                #description
                #example
                schema.insert_property(#name, property);
                #required
            }
        });
    }

    Ok(statements)
}

pub(crate) fn expand_describe_schema(mut input: DeriveInput) -> Result<TokenStream, syn::Error> {
    let container = parse_container_meta(&input.attrs)?;
    let name_body = schema_name_body(&input, &container);
    let statements = field_statements(&named_fields(&input)?, &container)?;

    let bounded: Vec<syn::Ident> = input
        .generics
        .params
        .iter()
        .filter_map(|param| match param {
            GenericParam::Type(param) => Some(param.ident.clone()),
            _ => None,
        })
        .collect();
    let where_clause = input.generics.make_where_clause();
    for ident in bounded {
        where_clause
            .predicates
            .push(parse_quote!(#ident: ::fastcrud::schema::DescribeSchema));
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::fastcrud::schema::DescribeSchema for #ident #ty_generics #where_clause {
            fn schema_name() -> ::core::option::Option<::std::borrow::Cow<'static, str>> {
                #name_body
            }

            #[allow(unused_variables, unused_mut)]
            fn describe_schema(
                generator: &mut ::fastcrud::schema::SchemaGenerator,
            ) -> ::fastcrud::schema::Schema {
                let mut schema = ::fastcrud::schema::Schema::object();
                #(#statements)*
                schema
            }
        }
    })
}
