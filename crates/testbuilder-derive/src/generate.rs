use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, ext::IdentExt};

use crate::parse::{ShimInput, parse_input};

pub fn expand_test_builder(input: &DeriveInput) -> syn::Result<TokenStream> {
  let shim = parse_input(input, "TestBuilder")?;
  let field_access = field_access_impl(&shim);
  let instantiate = instantiate_impl(&shim);

  Ok(quote! {
    #field_access
    #instantiate
  })
}

pub fn expand_field_access(input: &DeriveInput) -> syn::Result<TokenStream> {
  let shim = parse_input(input, "FieldAccess")?;
  Ok(field_access_impl(&shim))
}

fn field_access_impl(shim: &ShimInput) -> TokenStream {
  let ident = shim.ident;

  let arms = shim.fields.iter().map(|field| {
    let name = field.unraw().to_string();
    quote! {
      #name => ::testbuilder::__private::assign(&mut self.#field, ::core::any::type_name::<Self>(), field, value),
    }
  });

  let fallback = match shim.parent {
    Some(parent) => quote! {
      _ => ::testbuilder::FieldAccess::set_field(&mut self.#parent, field, value),
    },
    None => quote! {
      _ => {
        drop(value);
        ::core::result::Result::Err(::testbuilder::__private::not_found(field))
      }
    },
  };

  quote! {
    #[automatically_derived]
    impl ::testbuilder::FieldAccess for #ident {
      #[allow(clippy::match_single_binding)]
      fn set_field(
        &mut self,
        field: &str,
        value: ::std::boxed::Box<dyn ::core::any::Any>,
      ) -> ::core::result::Result<(), ::testbuilder::FieldError> {
        match field {
          #(#arms)*
          #fallback
        }
      }
    }
  }
}

fn instantiate_impl(shim: &ShimInput) -> TokenStream {
  let ident = shim.ident;

  let body = match &shim.constructor {
    Some(constructor) => quote! {
      ::testbuilder::__private::construct(#constructor)
    },
    None => quote! {
      #[allow(unused_imports)]
      use ::testbuilder::__private::{ViaDefault as _, ViaMissing as _};
      (&::testbuilder::__private::Probe::<Self>::new()).zero_arg()
    },
  };

  quote! {
    #[automatically_derived]
    impl ::testbuilder::Instantiate for #ident {
      fn instantiate() -> ::core::result::Result<Self, ::testbuilder::ConstructError> {
        #body
      }
    }
  }
}
