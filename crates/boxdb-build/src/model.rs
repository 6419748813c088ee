use crate::{BindingBuilder, GenerationError, ident};
use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};

/// Model registration function covering every entity of the schema.
pub fn generate(builder: &BindingBuilder<'_>) -> Result<TokenStream, GenerationError> {
    let rt = &builder.runtime;
    let model_fn = ident(&builder.config.model_fn)?;

    let mut registrations = quote!();
    for entity in &builder.schema.entities {
        let binding = format_ident!("{}Binding", ident(&entity.name)?);

        registrations.extend(quote! {
            #rt::Binding::add_to_model(&#binding, &mut model)?;
        });
    }

    let last_id = Literal::u32_unsuffixed(builder.schema.last_entity_id.id.get());
    let last_uid = Literal::u64_unsuffixed(builder.schema.last_entity_id.uid);

    Ok(quote! {
        /// Model covering every generated entity, ready for `StoreBuilder::model`.
        pub fn #model_fn() -> ::std::result::Result<#rt::Model, #rt::ModelError> {
            let mut model = #rt::ModelBuilder::new();
            #registrations
            model.last_entity_id(#last_id, #last_uid);

            model.build()
        }
    })
}
