use proc_macro2::TokenStream;
use quote::quote;

use crate::generator::synth::{BuilderSpec, SetterSpec};

/// Emits the contents of one builder module: the `T<Name>` entry point, the `Builder` and
/// its setters.
///
/// Everything goes through `testbuilder::FieldAccess` and `testbuilder::Instantiate`, so
/// the builder compiles from any module even when the fields are private.
pub struct BuilderGenerator<'a> {
  spec: &'a BuilderSpec,
}

impl<'a> BuilderGenerator<'a> {
  pub fn new(spec: &'a BuilderSpec) -> Self {
    Self { spec }
  }

  pub fn generate(&self) -> TokenStream {
    let vis = self.spec.visibility.to_tokens();
    let wrapper = &self.spec.wrapper;
    let target = &self.spec.target;

    let wrapper_doc = format!("Entry point for building `{}` values in tests.", self.spec.target_name);
    let builder_doc = format!(
      "Builds a `{}` by assigning fields one at a time.",
      self.spec.target_name
    );
    let setters = self.spec.setters.iter().map(|setter| self.generate_setter(setter));

    quote! {
      #[doc = #wrapper_doc]
      #vis struct #wrapper;

      impl #wrapper {
        /// Starts a builder from the zero-argument constructor.
        ///
        /// # Panics
        ///
        /// Panics when the target cannot be instantiated.
        #[must_use]
        #vis fn builder() -> Builder {
          Builder::new()
        }
      }

      #[doc = #builder_doc]
      #vis struct Builder {
        target: #target,
      }

      impl Builder {
        /// # Panics
        ///
        /// Panics when the target cannot be instantiated.
        #[must_use]
        #vis fn new() -> Self {
          match Self::try_new() {
            ::core::result::Result::Ok(builder) => builder,
            ::core::result::Result::Err(fault) => ::testbuilder::raise(fault),
          }
        }

        #vis fn try_new() -> ::core::result::Result<Self, ::testbuilder::Fault> {
          let target = <#target as ::testbuilder::Instantiate>::instantiate()
            .map_err(::testbuilder::Fault::instantiate::<#target>)?;
          ::core::result::Result::Ok(Self { target })
        }

        #[allow(dead_code)]
        fn set_field<V: ::core::any::Any>(mut self, field: &str, value: V) -> Self {
          if let ::core::result::Result::Err(source) =
            ::testbuilder::FieldAccess::set_field(&mut self.target, field, ::std::boxed::Box::new(value))
          {
            ::testbuilder::raise(::testbuilder::Fault::assign::<#target>(field, source));
          }
          self
        }

        #(#setters)*

        #[must_use]
        #vis fn build(self) -> #target {
          self.target
        }
      }

      impl ::core::default::Default for Builder {
        fn default() -> Self {
          Self::new()
        }
      }
    }
  }

  fn generate_setter(&self, setter: &SetterSpec) -> TokenStream {
    let vis = self.spec.visibility.to_tokens();
    let ident = &setter.ident;
    let ty = &setter.ty;
    let field_name = &setter.field_name;
    let doc = if setter.declared_on == self.spec.target_name {
      format!("Sets `{field_name}`.")
    } else {
      format!("Sets `{field_name}`, declared on `{}`.", setter.declared_on)
    };

    quote! {
      #[doc = #doc]
      #[must_use]
      #vis fn #ident(self, #ident: #ty) -> Self {
        self.set_field(#field_name, #ident)
      }
    }
  }
}
