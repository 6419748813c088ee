use crate::{VTABLE_HEADER_LEN, case::to_lower_camel, prelude::*};

///
/// PropertyDescriptor
///
/// One field of an entity. The slot is assigned by the owning entity from
/// declaration order; the encoder addresses `slot()` and the decoder
/// `table_slot_offset()`, both derived from the same index.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PropertyDescriptor {
    pub id: TypeId,
    pub uid: u64,

    /// Field identifier on the record struct.
    pub name: String,

    /// Property name registered with the store.
    pub store_name: String,

    pub store_type: PropertyType,
    pub flags: PropertyFlags,
    pub semantic_type: SemanticType,
    pub buffer_kind: BufferKind,
    slot: u16,
}

impl PropertyDescriptor {
    /// Build a descriptor with every derived fact taken from `semantic_type`.
    /// The slot is assigned once the property is added to an entity.
    #[must_use]
    pub fn new(id: IdUid, name: impl Into<String>, semantic_type: SemanticType) -> Self {
        let name = name.into();
        let mut flags = PropertyFlags::NONE;
        if semantic_type.is_unsigned() {
            flags |= PropertyFlags::UNSIGNED;
        }

        Self {
            id: id.id,
            uid: id.uid,
            store_name: to_lower_camel(&name),
            name,
            store_type: semantic_type.store_type(),
            flags,
            semantic_type,
            buffer_kind: semantic_type.buffer_kind(),
            slot: 0,
        }
    }

    #[must_use]
    pub fn with_store_name(mut self, store_name: impl Into<String>) -> Self {
        self.store_name = store_name.into();
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: PropertyFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_buffer_kind(mut self, buffer_kind: BufferKind) -> Self {
        self.buffer_kind = buffer_kind;
        self
    }

    #[must_use]
    pub fn with_store_type(mut self, store_type: PropertyType) -> Self {
        self.store_type = store_type;
        self
    }

    #[must_use]
    pub const fn id_uid(&self) -> IdUid {
        IdUid {
            id: self.id,
            uid: self.uid,
        }
    }

    #[must_use]
    pub const fn is_id(&self) -> bool {
        self.flags.contains(PropertyFlags::ID)
    }

    /// Zero-based slot index in declaration order.
    #[must_use]
    pub const fn slot(&self) -> u16 {
        self.slot
    }

    /// Vtable byte offset of the slot, `4 + 2 * slot`.
    #[must_use]
    pub const fn table_slot_offset(&self) -> u16 {
        VTABLE_HEADER_LEN.saturating_add(self.slot.saturating_mul(2))
    }

    pub(crate) const fn assign_slot(&mut self, index: u16) {
        self.slot = index;
    }
}
