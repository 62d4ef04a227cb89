use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Generics, Ident, WherePredicate};

/// Implements `From<T> for routcome::Fault` using `T`'s `Display` output as fault message.
#[proc_macro_derive(IntoFault)]
pub fn into_fault(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    // Parse the input tokens into a syntax tree
    let input = parse_macro_input!(input as DeriveInput);

    // Used in the quasi-quotation below as `#name`.
    let name = input.ident;

    // Require `Name<..>: Display`, type parameters themselves stay unbounded.
    let generics = add_display_bound(&name, input.generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let message = fault_message(&input.data);

    let expanded = quote! {
        impl #impl_generics ::core::convert::From<#name #ty_generics> for ::routcome::Fault #where_clause {
            fn from(value: #name #ty_generics) -> Self {
                ::routcome::Fault::new(#message)
            }
        }
    };

    proc_macro::TokenStream::from(expanded)
}

// Add a bound `Name<..>: Display` to the where clause.
fn add_display_bound(name: &Ident, mut generics: Generics) -> Generics {
    let bound: WherePredicate = {
        let (_, ty_generics, _) = generics.split_for_impl();
        parse_quote!(#name #ty_generics: ::std::fmt::Display)
    };
    generics.make_where_clause().predicates.push(bound);
    generics
}

// Unions have no sensible Display, reject them where they are declared.
fn fault_message(data: &Data) -> TokenStream {
    match *data {
        Data::Struct(_) | Data::Enum(_) => quote! {
            ::std::string::ToString::to_string(&value)
        },
        Data::Union(ref data) => quote_spanned!(data.union_token.span() =>
            compile_error!("IntoFault cannot be derived for unions")
        ),
    }
}
