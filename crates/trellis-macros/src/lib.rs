use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{parse_macro_input, FnArg, Ident, ItemFn, Pat, PatType, Type};

struct Prop {
    ident: Ident,
    pat: Box<Pat>,
    ty: Box<Type>,
}

/// Collects `name: Type` parameters, renaming each to `__propN` so the
/// original pattern can be rebound inside the render closure.
fn collect_props<'a>(inputs: impl Iterator<Item = &'a FnArg>, offset: usize) -> syn::Result<Vec<Prop>> {
    inputs
        .enumerate()
        .map(|(index, arg)| match arg {
            FnArg::Typed(PatType { pat, ty, .. }) => {
                if matches!(**ty, Type::ImplTrait(_)) {
                    return Err(syn::Error::new_spanned(
                        ty,
                        "component props cannot be `impl Trait`; they are cloned into the render closure",
                    ));
                }
                Ok(Prop {
                    ident: Ident::new(&format!("__prop{}", index + offset), Span::call_site()),
                    pat: pat.clone(),
                    ty: ty.clone(),
                })
            }
            FnArg::Receiver(receiver) => Err(syn::Error::new_spanned(
                receiver,
                "components cannot take `self`",
            )),
        })
        .collect()
}

fn expand(func: ItemFn) -> syn::Result<TokenStream2> {
    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = func;
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "generic components are not supported",
        ));
    }
    let ident = &sig.ident;
    let name = ident.to_string();

    if sig.asyncness.is_some() {
        let props = collect_props(sig.inputs.iter(), 0)?;
        let prop_idents: Vec<_> = props.iter().map(|prop| &prop.ident).collect();
        let prop_pats: Vec<_> = props.iter().map(|prop| &prop.pat).collect();
        let prop_tys: Vec<_> = props.iter().map(|prop| &prop.ty).collect();
        let output = &sig.output;
        // The body keeps its declared return type so `?` and `Ok(..)` infer
        // the error type.
        return Ok(quote! {
            #(#attrs)*
            #[allow(non_snake_case)]
            #vis fn #ident(#(#prop_idents: #prop_tys),*) -> trellis_core::Element {
                async fn __render(#(#prop_pats: #prop_tys),*) #output #block
                trellis_core::Element::async_component(#name, move || {
                    __render(#(::core::clone::Clone::clone(&#prop_idents)),*)
                })
            }
        });
    }

    let mut inputs = sig.inputs.iter();
    let (scope_pat, scope_ty) = match inputs.next() {
        Some(FnArg::Typed(PatType { pat, ty, .. })) => (pat.clone(), ty.clone()),
        _ => {
            return Err(syn::Error::new_spanned(
                &sig,
                "a component takes the render scope (`cx: &Scope`) as its first parameter",
            ))
        }
    };
    let props = collect_props(inputs, 1)?;
    let prop_idents: Vec<_> = props.iter().map(|prop| &prop.ident).collect();
    let prop_pats: Vec<_> = props.iter().map(|prop| &prop.pat).collect();
    let prop_tys: Vec<_> = props.iter().map(|prop| &prop.ty).collect();

    Ok(quote! {
        #(#attrs)*
        #[allow(non_snake_case)]
        #vis fn #ident(#(#prop_idents: #prop_tys),*) -> trellis_core::Element {
            trellis_core::Element::component(
                #name,
                move |#scope_pat: #scope_ty| -> trellis_core::Render {
                    #(let #prop_pats: #prop_tys = ::core::clone::Clone::clone(&#prop_idents);)*
                    #block
                },
            )
        }
    })
}

/// Turns a render function into a constructor for a component element.
///
/// ```ignore
/// #[component]
/// fn Greeting(cx: &Scope, name: String) -> Render {
///     let (count, _) = use_state(cx, || 0);
///     Ok(tag("p").child(format!("hello {name} #{count}")).into())
/// }
///
/// root.render(Greeting("trellis".to_string()))?;
/// ```
///
/// The first parameter receives the [`Scope`]; the rest become props, which
/// must be `Clone + 'static` since they are cloned into every render. The
/// component's name is the function name.
///
/// An `async fn` has no scope parameter and becomes an async component whose
/// body returns `Result<Element, E>`.
///
/// [`Scope`]: ../trellis_core/struct.Scope.html
#[proc_macro_attribute]
pub fn component(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr_tokens = TokenStream2::from(attr);
    if !attr_tokens.is_empty() {
        return syn::Error::new_spanned(attr_tokens, "#[component] takes no arguments")
            .to_compile_error()
            .into();
    }
    let func = parse_macro_input!(item as ItemFn);
    match expand(func) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
