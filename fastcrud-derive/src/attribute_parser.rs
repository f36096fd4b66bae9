use syn::parse::Parser;
use syn::{Expr, Lit, Meta, punctuated::Punctuated, token::Comma};

use super::structs::{ContainerMeta, FieldMeta, RenameRule};

/// Items of a `#[name(...)]` list attribute. Anything that is not `name(...)` yields nothing.
fn list_items(attr: &syn::Attribute, name: &str) -> Result<Vec<Meta>, syn::Error> {
    if !attr.path().is_ident(name) {
        return Ok(Vec::new());
    }
    let Meta::List(meta_list) = &attr.meta else {
        return Ok(Vec::new());
    };
    let metas = Punctuated::<Meta, Comma>::parse_terminated.parse2(meta_list.tokens.clone())?;
    Ok(metas.into_iter().collect())
}

/// serde attributes are best-effort: whatever does not parse as plain metas is not ours
/// to report, serde itself will.
fn serde_items(attr: &syn::Attribute) -> Vec<Meta> {
    list_items(attr, "serde").unwrap_or_default()
}

fn string_value(expr: &Expr) -> Option<String> {
    if let Expr::Lit(expr_lit) = expr
        && let Lit::Str(s) = &expr_lit.lit
    {
        return Some(s.value());
    }
    None
}

fn expect_string(nv: &syn::MetaNameValue) -> Result<String, syn::Error> {
    string_value(&nv.value)
        .ok_or_else(|| syn::Error::new_spanned(&nv.value, "expected a string literal"))
}

/// `rename = "x"` or `rename(serialize = "x", ...)`; the serialized name is what gets
/// documented.
fn serde_rename(meta: &Meta) -> Option<String> {
    match meta {
        Meta::NameValue(nv) if nv.path.is_ident("rename") => string_value(&nv.value),
        Meta::List(list) if list.path.is_ident("rename") => {
            let inner = Punctuated::<Meta, Comma>::parse_terminated
                .parse2(list.tokens.clone())
                .ok()?;
            inner.into_iter().find_map(|item| match item {
                Meta::NameValue(nv) if nv.path.is_ident("serialize") => string_value(&nv.value),
                _ => None,
            })
        }
        _ => None,
    }
}

/// Parses struct-level `#[schema(...)]` and `#[serde(rename_all = "...")]`.
pub(crate) fn parse_container_meta(attrs: &[syn::Attribute]) -> Result<ContainerMeta, syn::Error> {
    let mut meta = ContainerMeta::default();

    for attr in attrs {
        for item in list_items(attr, "schema")? {
            match item {
                Meta::NameValue(nv) if nv.path.is_ident("name") => {
                    meta.name = Some(expect_string(&nv)?);
                }
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "unknown schema attribute, expected `name = \"...\"`",
                    ));
                }
            }
        }

        for item in serde_items(attr) {
            if let Meta::NameValue(nv) = &item
                && nv.path.is_ident("rename_all")
            {
                let rule = expect_string(nv)?;
                meta.rename_all = Some(RenameRule::parse(&rule).ok_or_else(|| {
                    syn::Error::new_spanned(&nv.value, format!("unknown rename_all rule `{rule}`"))
                })?);
            }
        }
    }

    Ok(meta)
}

/// Parses field-level `#[schema(...)]`, the relevant `#[serde(...)]` items and the doc
/// comment.
pub(crate) fn parse_field_meta(field: &syn::Field) -> Result<FieldMeta, syn::Error> {
    let mut meta = FieldMeta::default();
    let mut doc_lines = Vec::new();

    for attr in &field.attrs {
        if attr.path().is_ident("doc")
            && let Meta::NameValue(nv) = &attr.meta
            && let Some(line) = string_value(&nv.value)
        {
            let line = line.trim();
            if !line.is_empty() {
                doc_lines.push(line.to_string());
            }
            continue;
        }

        for item in list_items(attr, "schema")? {
            match item {
                Meta::Path(path) if path.is_ident("skip") => meta.skip = true,
                Meta::Path(path) if path.is_ident("flatten") => meta.flatten = true,
                Meta::Path(path) if path.is_ident("required") => meta.required = true,
                Meta::NameValue(nv) if nv.path.is_ident("description") => {
                    meta.description = Some(expect_string(&nv)?);
                }
                Meta::NameValue(nv) if nv.path.is_ident("example") => {
                    meta.example = Some(nv.value);
                }
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "unknown schema attribute, expected one of `skip`, `flatten`, \
                         `required`, `description = \"...\"`, `example = ...`",
                    ));
                }
            }
        }

        for item in serde_items(attr) {
            match &item {
                Meta::Path(path) if path.is_ident("skip") || path.is_ident("skip_serializing") => {
                    meta.skip = true;
                }
                Meta::Path(path) if path.is_ident("flatten") => meta.flatten = true,
                _ => {
                    if let Some(rename) = serde_rename(&item) {
                        meta.rename = Some(rename);
                    }
                }
            }
        }
    }

    if !doc_lines.is_empty() {
        meta.doc = Some(doc_lines.join(" "));
    }

    Ok(meta)
}
