use crate::{BindingBuilder, GenerationError, ident};
use boxdb_schema::{
    case::{to_constant, to_snake},
    prelude::*,
};
use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};
use syn::ext::IdentExt;

/// Binding type, property handles, box alias and constructor for one entity.
pub fn generate(
    builder: &BindingBuilder<'_>,
    entity: &EntityDescriptor,
) -> Result<TokenStream, GenerationError> {
    let rt = &builder.runtime;
    let props = entity
        .properties
        .iter()
        .map(|prop| PropertyGen::new(entity, prop))
        .collect::<Result<Vec<_>, _>>()?;

    let id_prop = props
        .iter()
        .find(|p| p.prop.is_id())
        .ok_or_else(|| missing_id(entity))?;

    let record = ident(&entity.name)?;
    let binding = format_ident!("{}Binding", record);
    let box_alias = format_ident!("{}Box", record);
    let box_fn = ident(&format!("box_for_{}", to_snake(&entity.name)))?;

    let entity_name = entity.name.as_str();
    let entity_id = Literal::u32_unsuffixed(entity.id.get());
    let entity_uid = Literal::u64_unsuffixed(entity.uid);

    let handles = props.iter().map(|p| p.handle(rt, &entity_id));
    let registrations = props.iter().map(|p| p.registration(rt));
    let last_id = Literal::u32_unsuffixed(entity.last_property_id.id.get());
    let last_uid = Literal::u64_unsuffixed(entity.last_property_id.uid);

    let id_field = &id_prop.field;
    let children = props.iter().filter_map(PropertyGen::child);
    let writes = props.iter().map(|p| p.write(rt));
    let reads = props.iter().map(|p| p.read());
    let slot_count = Literal::u32_unsuffixed(entity.slot_count());
    let entity_param = if entity.has_non_id_property() {
        format_ident!("entity")
    } else {
        format_ident!("_entity")
    };

    Ok(quote! {
        #[derive(Clone, Copy, Debug, Default)]
        pub struct #binding;

        impl #binding {
            #(#handles)*
        }

        #[allow(clippy::all, clippy::pedantic, clippy::nursery)]
        impl #rt::Binding for #binding {
            type Entity = #record;

            const ENTITY_ID: #rt::TypeId = #rt::TypeId::new(#entity_id);
            const ENTITY_UID: u64 = #entity_uid;
            const ENTITY_NAME: &'static str = #entity_name;

            fn add_to_model(
                &self,
                model: &mut #rt::ModelBuilder,
            ) -> ::std::result::Result<(), #rt::ModelError> {
                model.entity(#entity_name, #entity_id, #entity_uid)?;
                #(#registrations)*
                model.entity_last_property_id(#last_id, #last_uid)?;

                Ok(())
            }

            fn id(&self, entity: &#record) -> u64 {
                entity.#id_field
            }

            fn set_id(&self, entity: &mut #record, id: u64) {
                entity.#id_field = id;
            }

            fn flatten(
                &self,
                #entity_param: &#record,
                fbb: &mut #rt::BufferBuilder,
                id: u64,
            ) -> ::std::result::Result<(), #rt::Error> {
                #(#children)*

                fbb.start_table(#slot_count)?;
                #(#writes)*

                Ok(())
            }

            fn to_object(&self, bytes: &[u8]) -> ::std::result::Result<#record, #rt::Error> {
                let table = #rt::Table::root(bytes)?;

                Ok(#record {
                    #(#reads)*
                })
            }
        }

        pub type #box_alias = #rt::EntityBox<#binding>;

        /// Open the box for this entity on `store`.
        pub fn #box_fn(store: &#rt::Store) -> ::std::result::Result<#box_alias, #rt::Error> {
            store.box_for::<#binding>()
        }
    })
}

fn missing_id(entity: &EntityDescriptor) -> GenerationError {
    GenerationError::Schema(boxdb_schema::SchemaError::Descriptor {
        entity: entity.name.clone(),
        message: "no identifier property".to_string(),
    })
}

///
/// PropertyGen
///
/// One checked property with the identifiers its snippets share.
///

struct PropertyGen<'a> {
    prop: &'a PropertyDescriptor,
    field: proc_macro2::Ident,
    child: proc_macro2::Ident,
    handle: proc_macro2::Ident,
    slot: Literal,
    vt_offset: Literal,
}

impl<'a> PropertyGen<'a> {
    fn new(
        entity: &EntityDescriptor,
        prop: &'a PropertyDescriptor,
    ) -> Result<Self, GenerationError> {
        check_encoding(entity, prop)?;

        // derived names come from the unraw form, so `r#type` gives `offset_type`
        let field = ident(&prop.name)?;
        let bare = field.unraw().to_string();
        let child = ident(&format!("offset_{bare}"))?;
        let handle = ident(&to_constant(&bare))?;

        Ok(Self {
            prop,
            field,
            child,
            handle,
            slot: Literal::u16_unsuffixed(prop.slot()),
            vt_offset: Literal::u16_unsuffixed(prop.table_slot_offset()),
        })
    }

    fn handle(&self, rt: &syn::Path, entity_id: &Literal) -> TokenStream {
        let name = &self.handle;
        let id = Literal::u32_unsuffixed(self.prop.id.get());

        quote! {
            pub const #name: #rt::Property = #rt::Property::new(#entity_id, #id);
        }
    }

    fn registration(&self, rt: &syn::Path) -> TokenStream {
        let store_name = self.prop.store_name.as_str();
        let store_type = format_ident!("{}", self.prop.store_type.to_string());
        let id = Literal::u32_unsuffixed(self.prop.id.get());
        let uid = Literal::u64_unsuffixed(self.prop.uid);

        let flags = if self.prop.flags.is_empty() {
            quote!()
        } else {
            let flags = flags_expr(rt, self.prop.flags);
            quote! { model.property_flags(#flags)?; }
        };

        quote! {
            model.property(#store_name, #rt::PropertyType::#store_type, #id, #uid)?;
            #flags
        }
    }

    /// Child region created before the table is opened.
    fn child(&self) -> Option<TokenStream> {
        let field = &self.field;
        let child = &self.child;

        match self.prop.semantic_type {
            SemanticType::String => Some(quote! {
                let #child = fbb.create_string(&entity.#field)?;
            }),
            SemanticType::Bytes => Some(quote! {
                let #child = fbb.create_byte_vector(&entity.#field)?;
            }),
            _ => None,
        }
    }

    fn write(&self, rt: &syn::Path) -> TokenStream {
        let field = &self.field;
        let child = &self.child;
        let slot = &self.slot;

        if self.prop.is_id() {
            return quote! { fbb.push_slot::<u64>(#slot, id, 0)?; };
        }

        match self.prop.semantic_type {
            SemanticType::String | SemanticType::Bytes => quote! {
                fbb.push_offset_slot(#slot, #child)?;
            },
            SemanticType::Bool => quote! {
                fbb.push_slot::<bool>(#slot, entity.#field, false)?;
            },
            SemanticType::Char => quote! {
                fbb.push_slot::<u32>(#slot, u32::from(entity.#field), 0)?;
            },
            SemanticType::Isize => quote! {
                fbb.push_slot::<i32>(
                    #slot,
                    i32::try_from(entity.#field)
                        .map_err(|_| #rt::BufferError::SlotOverflow { slot: #slot })?,
                    0,
                )?;
            },
            SemanticType::Usize => quote! {
                fbb.push_slot::<u32>(
                    #slot,
                    u32::try_from(entity.#field)
                        .map_err(|_| #rt::BufferError::SlotOverflow { slot: #slot })?,
                    0,
                )?;
            },
            ty => {
                let scalar = format_ident!("{}", ty.rust_type());
                let zero = zero_literal(ty);

                quote! {
                    fbb.push_slot::<#scalar>(#slot, entity.#field, #zero)?;
                }
            }
        }
    }

    fn read(&self) -> TokenStream {
        let field = &self.field;
        let vt = &self.vt_offset;

        let value = match self.prop.semantic_type {
            SemanticType::String => quote! { table.get_str_slot(#vt)?.to_owned() },
            SemanticType::Bytes => quote! { table.get_bytes_slot(#vt)?.to_vec() },
            SemanticType::Bool => quote! { table.get_slot::<bool>(#vt, false)? },
            SemanticType::Char => quote! { table.get_char_slot(#vt, '\0')? },
            SemanticType::Isize => quote! { table.get_slot::<i32>(#vt, 0)? as isize },
            SemanticType::Usize => quote! { table.get_slot::<u32>(#vt, 0)? as usize },
            ty => {
                let scalar = format_ident!("{}", ty.rust_type());
                let zero = zero_literal(ty);

                quote! { table.get_slot::<#scalar>(#vt, #zero)? }
            }
        };

        quote! { #field: #value, }
    }
}

fn zero_literal(ty: SemanticType) -> Literal {
    match ty {
        SemanticType::F32 | SemanticType::F64 => Literal::f64_unsuffixed(0.0),
        _ => Literal::u8_unsuffixed(0),
    }
}

fn flags_expr(rt: &syn::Path, flags: PropertyFlags) -> TokenStream {
    let mut parts: Vec<TokenStream> = flags
        .names()
        .map(|name| {
            let name = format_ident!("{}", name);
            quote! { #rt::PropertyFlags::#name }
        })
        .collect();

    let unknown = flags.unknown_bits();
    if unknown != 0 {
        let bits = Literal::u32_unsuffixed(unknown);
        parts.push(quote! { #rt::PropertyFlags::from_bits_retain(#bits) });
    }

    quote! { #(#parts)|* }
}

/// Reject combinations the encoder has no rule for.
fn check_encoding(
    entity: &EntityDescriptor,
    prop: &PropertyDescriptor,
) -> Result<(), GenerationError> {
    let ty = prop.semantic_type;

    if ty == SemanticType::StringVec {
        return Err(GenerationError::UnsupportedType {
            entity: entity.name.clone(),
            property: prop.name.clone(),
            semantic_type: ty.to_string(),
        });
    }

    if prop.buffer_kind != ty.buffer_kind() {
        return Err(GenerationError::BufferKindMismatch {
            entity: entity.name.clone(),
            property: prop.name.clone(),
            semantic_type: ty.to_string(),
            declared: prop.buffer_kind.to_string(),
            expected: ty.buffer_kind().to_string(),
        });
    }

    if prop.store_type != ty.store_type() {
        return Err(GenerationError::StoreTypeMismatch {
            entity: entity.name.clone(),
            property: prop.name.clone(),
            semantic_type: ty.to_string(),
            declared: prop.store_type.to_string(),
            expected: ty.store_type().to_string(),
        });
    }

    Ok(())
}
