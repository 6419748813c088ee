use crate::prelude::*;

///
/// EntityDescriptor
///
/// A record type registered with the store. Property order is fixed and
/// determines the buffer slot layout.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EntityDescriptor {
    pub id: TypeId,
    pub uid: u64,
    pub name: String,
    pub properties: Vec<PropertyDescriptor>,

    /// Index into `properties` of the identifier property, if resolved.
    pub id_property: Option<usize>,

    pub last_property_id: IdUid,
}

impl EntityDescriptor {
    #[must_use]
    pub fn new(id: IdUid, name: impl Into<String>, last_property_id: IdUid) -> Self {
        Self {
            id: id.id,
            uid: id.uid,
            name: name.into(),
            properties: Vec::new(),
            id_property: None,
            last_property_id,
        }
    }

    /// Append a property, assigning its slot from declaration order.
    /// The first property flagged `ID` becomes the identifier property.
    #[must_use]
    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.push_property(property);
        self
    }

    pub fn push_property(&mut self, mut property: PropertyDescriptor) {
        let index = self.properties.len();
        property.assign_slot(u16::try_from(index).unwrap_or(u16::MAX));

        if property.is_id() && self.id_property.is_none() {
            self.id_property = Some(index);
        }

        self.properties.push(property);
    }

    /// Resolve the identifier property when none is flagged: a property named
    /// `id` is promoted and gets the `ID` flag.
    pub fn resolve_id_property(&mut self) {
        if self.id_property.is_some() {
            return;
        }

        if let Some(index) = self.properties.iter().position(|p| p.name == "id") {
            self.properties[index].flags |= PropertyFlags::ID;
            self.id_property = Some(index);
        }
    }

    #[must_use]
    pub const fn id_uid(&self) -> IdUid {
        IdUid {
            id: self.id,
            uid: self.uid,
        }
    }

    #[must_use]
    pub fn id_property(&self) -> Option<&PropertyDescriptor> {
        self.id_property.and_then(|i| self.properties.get(i))
    }

    #[must_use]
    pub fn get_property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Whether anything besides the identifier is stored.
    #[must_use]
    pub fn has_non_id_property(&self) -> bool {
        self.properties.iter().any(|p| !p.is_id())
    }

    /// Number of slots the table reserves.
    #[must_use]
    pub const fn slot_count(&self) -> u32 {
        self.last_property_id.id.get()
    }
}
