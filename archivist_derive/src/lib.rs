use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    parse_macro_input, parse_quote, DeriveInput, Expr, ExprPath, Field, GenericParam, LitInt,
    LitStr, Token, WherePredicate,
};

#[derive(Default)]
struct FieldAttrs {
    rename: Option<LitStr>,
    skip: bool,
    required: bool,
    text: bool,
    range: Option<(Expr, Expr)>,
    min_size: Option<LitInt>,
    max_size: Option<LitInt>,
    validate: Vec<ExprPath>,
}

impl FieldAttrs {
    fn has_validators(&self) -> bool {
        self.required
            || self.range.is_some()
            || self.min_size.is_some()
            || self.max_size.is_some()
            || !self.validate.is_empty()
    }
}

fn field_attrs(field: &Field) -> syn::Result<FieldAttrs> {
    let mut attrs = FieldAttrs::default();
    for attr in field.attrs.iter().filter(|x| x.path().is_ident("archive")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                attrs.rename = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("skip") {
                attrs.skip = true;
            } else if meta.path.is_ident("required") {
                attrs.required = true;
            } else if meta.path.is_ident("text") {
                attrs.text = true;
            } else if meta.path.is_ident("range") {
                let content;
                syn::parenthesized!(content in meta.input);
                let args = Punctuated::<Expr, Token![,]>::parse_terminated(&content)?;
                let mut args = args.into_iter();
                match (args.next(), args.next(), args.next()) {
                    (Some(min), Some(max), None) => attrs.range = Some((min, max)),
                    _ => return Err(meta.error("expected `range(min, max)`")),
                }
            } else if meta.path.is_ident("min_size") {
                attrs.min_size = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("max_size") {
                attrs.max_size = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("validate") {
                let path: LitStr = meta.value()?.parse()?;
                attrs.validate.push(path.parse()?);
            } else {
                return Err(meta.error("unrecognized archive attribute"));
            }
            Ok(())
        })?;
    }

    if attrs.text
        && (attrs.range.is_some()
            || attrs.min_size.is_some()
            || attrs.max_size.is_some()
            || !attrs.validate.is_empty())
    {
        return Err(syn::Error::new(
            field.span(),
            "`text` fields only support the `required` check",
        ));
    }

    if attrs.skip && (attrs.rename.is_some() || attrs.text || attrs.has_validators()) {
        return Err(syn::Error::new(
            field.span(),
            "`skip` can not be combined with other archive attributes",
        ));
    }

    Ok(attrs)
}

fn field_statement(field: &Field, attrs: &FieldAttrs) -> syn::Result<TokenStream2> {
    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new(field.span(), "expected a named field"))?;
    let ty = &field.ty;
    let key = match &attrs.rename {
        Some(name) => name.value(),
        None => ident.to_string(),
    };

    let (value, validated_ty) = if attrs.text {
        (
            quote! { &mut ::archivist::Text(&mut self.#ident) },
            quote! { ::archivist::Text<'_, #ty> },
        )
    } else {
        (quote! { &mut self.#ident }, quote! { #ty })
    };

    if !attrs.has_validators() {
        return Ok(quote! {
            object.field(#key, #value)?;
        });
    }

    let mut validators = Vec::new();
    if attrs.required {
        validators.push(quote! { ::archivist::Required });
    }
    if let Some((min, max)) = &attrs.range {
        validators.push(quote! { ::archivist::Range::<#ty>::new(#min, #max) });
    }
    if let Some(n) = &attrs.min_size {
        validators.push(quote! { ::archivist::MinSize(#n) });
    }
    if let Some(n) = &attrs.max_size {
        validators.push(quote! { ::archivist::MaxSize(#n) });
    }

    let validators = validators
        .iter()
        .map(|x| quote! { &#x as &dyn ::archivist::Validator<#validated_ty> })
        .chain(
            attrs
                .validate
                .iter()
                .map(|path| quote! { &#path as &dyn ::archivist::Validator<#validated_ty> }),
        );

    Ok(quote! {
        object.field_with(#key, #value, &[#(#validators),*])?;
    })
}

/// Derive an implementation of `archivist::Serialize` for a struct with named
/// fields.
///
/// Every field is saved and loaded as a member of an object, keyed by the
/// field's name. The following field attributes are understood:
///
/// - `#[archive(rename = "abc")]`: use a different member key
/// - `#[archive(skip)]`: leave the field out of the document
/// - `#[archive(text)]`: go through the field's `TextConvert` implementation
/// - `#[archive(required)]`: record an error if the member is absent on load
/// - `#[archive(range(min, max))]`: the loaded value must lie in `[min, max)`
/// - `#[archive(min_size = n)]` and `#[archive(max_size = n)]`: size bounds
/// - `#[archive(validate = "path::to_fn")]`: a custom check with the
///   signature `fn(&T, bool) -> Option<String>`
///
/// Checks only run on load, and their messages are collected by path instead
/// of aborting the load.
///
/// ```ignore
/// #[derive(archivist::Serialize, Default)]
/// struct Server {
///     #[archive(required, min_size = 1)]
///     host: String,
///     #[archive(rename = "listen_port", range(1, 65536))]
///     port: u32,
/// }
/// ```
#[proc_macro_derive(Serialize, attributes(archive))]
pub fn derive(input: TokenStream) -> TokenStream {
    let dinput = parse_macro_input!(input as DeriveInput);
    match expand(dinput) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(dinput: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_ident = dinput.ident;

    let syn_struct = match dinput.data {
        syn::Data::Struct(x) => x,
        _ => {
            return Err(syn::Error::new(
                struct_ident.span(),
                "Serialize can only be derived for structs",
            ))
        }
    };

    let named_fields = match syn_struct.fields {
        syn::Fields::Named(x) => x,
        fields => {
            return Err(syn::Error::new(
                fields.span(),
                "Serialize can only be derived for structs with named fields",
            ))
        }
    };

    // Generic structs bound every field type instead of the type parameters
    let mut generics = dinput.generics;
    let is_generic = generics
        .params
        .iter()
        .any(|x| matches!(x, GenericParam::Type(_)));

    let mut statements = Vec::with_capacity(named_fields.named.len());
    for field in named_fields.named.iter() {
        let attrs = field_attrs(field)?;
        if attrs.skip {
            continue;
        }

        if is_generic {
            let ty = &field.ty;
            let predicate: WherePredicate = if attrs.text {
                parse_quote!(#ty: ::archivist::TextConvert)
            } else {
                parse_quote!(#ty: ::archivist::Serialize)
            };
            generics.make_where_clause().predicates.push(predicate);
        }

        statements.push(field_statement(field, &attrs)?);
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let capacity = statements.len();

    Ok(quote! {
        impl #impl_generics ::archivist::Serialize for #struct_ident #ty_generics #where_clause {
            fn serialize<__N: ::archivist::Node>(
                &mut self,
                value: ::archivist::ValueScope<'_, __N>,
            ) -> ::std::result::Result<bool, ::archivist::Error> {
                value.object_with_capacity(#capacity, |object| {
                    #(#statements)*
                    let _ = object;
                    ::std::result::Result::Ok(())
                })
            }
        }
    })
}
