//! Front-to-back buffer construction.
//!
//! Variable-length children are written first, then a single table that
//! refers back to them. Finishing patches the root position into the
//! 4-byte header.
//!
//! ```ignore
//! let mut fbb = BufferBuilder::new();
//! let text = fbb.create_string("hello")?;
//! fbb.start_table(3)?;
//! fbb.push_slot::<u64>(0, 7, 0)?;
//! fbb.push_offset_slot(1, text)?;
//! let bytes = fbb.finish()?;
//! ```

use crate::buffer::{BufferError, ROOT_HEADER_LEN, Scalar, VTABLE_HEADER_LEN};

///
/// Offset
///
/// Position of a child region inside the buffer being built.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Offset(u32);

impl Offset {
    #[must_use]
    pub const fn position(self) -> u32 {
        self.0
    }
}

#[derive(Debug)]
enum FieldValue {
    Inline(Vec<u8>),
    Child(Offset),
}

#[derive(Debug)]
struct OpenTable {
    slot_count: u16,
    fields: Vec<(u16, FieldValue)>,
}

///
/// BufferBuilder
///

#[derive(Debug)]
pub struct BufferBuilder {
    buf: Vec<u8>,
    open: Option<OpenTable>,
    last_table: Option<Offset>,
}

impl Default for BufferBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buf = Vec::with_capacity(capacity.max(ROOT_HEADER_LEN));
        buf.resize(ROOT_HEADER_LEN, 0);

        Self {
            buf,
            open: None,
            last_table: None,
        }
    }

    /// Clear everything written so far, keeping the allocation.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.buf.resize(ROOT_HEADER_LEN, 0);
        self.open = None;
        self.last_table = None;
    }

    pub fn create_string(&mut self, value: &str) -> Result<Offset, BufferError> {
        self.create_child("string", value.as_bytes())
    }

    pub fn create_byte_vector(&mut self, value: &[u8]) -> Result<Offset, BufferError> {
        self.create_child("byte vector", value)
    }

    fn create_child(&mut self, what: &'static str, data: &[u8]) -> Result<Offset, BufferError> {
        if self.open.is_some() {
            return Err(BufferError::TableOpen);
        }

        let len = u32::try_from(data.len()).map_err(|_| BufferError::TooLarge {
            what,
            len: data.len(),
        })?;
        let position = self.position(what)?;

        self.buf.extend_from_slice(&len.to_le_bytes());
        self.buf.extend_from_slice(data);

        Ok(Offset(position))
    }

    /// Open a table with `slot_count` slots. Slot `n` lives at vtable offset
    /// `4 + 2 * n`.
    pub fn start_table(&mut self, slot_count: u32) -> Result<(), BufferError> {
        if self.open.is_some() {
            return Err(BufferError::TableOpen);
        }

        let slot_count = u16::try_from(slot_count)
            .ok()
            .filter(|count| usize::from(*count) <= MAX_SLOTS)
            .ok_or(BufferError::TooManySlots { slot_count })?;

        self.open = Some(OpenTable {
            slot_count,
            fields: Vec::new(),
        });

        Ok(())
    }

    /// Write an inline scalar. Values equal to `default` are omitted, so
    /// readers fall back to the same default.
    pub fn push_slot<T: Scalar>(
        &mut self,
        slot: u16,
        value: T,
        default: T,
    ) -> Result<(), BufferError> {
        let table = self.open_slot(slot)?;
        if value == default {
            return Ok(());
        }

        let mut raw = Vec::with_capacity(T::WIDTH);
        value.write_le(&mut raw);
        table.fields.push((slot, FieldValue::Inline(raw)));

        Ok(())
    }

    /// Write a reference to a child created earlier by this builder.
    pub fn push_offset_slot(&mut self, slot: u16, offset: Offset) -> Result<(), BufferError> {
        let end = (offset.0 as usize).saturating_add(4);
        if offset.0 < ROOT_HEADER_LEN as u32 || end > self.buf.len() {
            return Err(BufferError::InvalidOffset {
                position: offset.0,
            });
        }

        let table = self.open_slot(slot)?;
        table.fields.push((slot, FieldValue::Child(offset)));

        Ok(())
    }

    fn open_slot(&mut self, slot: u16) -> Result<&mut OpenTable, BufferError> {
        let table = self.open.as_mut().ok_or(BufferError::NoTableOpen)?;

        if slot >= table.slot_count {
            return Err(BufferError::SlotOutOfRange {
                slot,
                slot_count: table.slot_count,
            });
        }
        if table.fields.iter().any(|(written, _)| *written == slot) {
            return Err(BufferError::DuplicateSlot { slot });
        }

        Ok(table)
    }

    /// Close the open table: vtable first, then the table body.
    pub fn end_table(&mut self) -> Result<Offset, BufferError> {
        let table = self.open.take().ok_or(BufferError::NoTableOpen)?;

        let vtable_pos = self.buf.len();
        let vtable_size = usize::from(VTABLE_HEADER_LEN) + 2 * usize::from(table.slot_count);
        let table_pos = vtable_pos + vtable_size;

        // body: the i32 back-reference, then each field in write order
        let back_ref =
            i32::try_from(vtable_size).map_err(|_| too_large("vtable", vtable_size))?;
        let mut body = Vec::new();
        body.extend_from_slice(&back_ref.to_le_bytes());

        let mut field_offsets = vec![0u16; usize::from(table.slot_count)];
        for (slot, value) in &table.fields {
            let field_pos = table_pos + body.len();
            field_offsets[usize::from(*slot)] =
                u16::try_from(body.len()).map_err(|_| too_large("table", body.len()))?;

            match value {
                FieldValue::Inline(raw) => body.extend_from_slice(raw),
                FieldValue::Child(child) => {
                    let rel = u32::try_from(field_pos - child.0 as usize)
                        .map_err(|_| too_large("buffer", field_pos))?;
                    body.extend_from_slice(&rel.to_le_bytes());
                }
            }
        }

        let vtable_len =
            u16::try_from(vtable_size).map_err(|_| too_large("vtable", vtable_size))?;
        let table_len = u16::try_from(body.len()).map_err(|_| too_large("table", body.len()))?;
        let position = u32::try_from(table_pos).map_err(|_| too_large("buffer", table_pos))?;

        self.buf.extend_from_slice(&vtable_len.to_le_bytes());
        self.buf.extend_from_slice(&table_len.to_le_bytes());
        for offset in field_offsets {
            self.buf.extend_from_slice(&offset.to_le_bytes());
        }
        self.buf.extend_from_slice(&body);

        let offset = Offset(position);
        self.last_table = Some(offset);

        Ok(offset)
    }

    /// Close any open table, set it as root and hand out the bytes.
    /// The builder is reset for reuse.
    pub fn finish(&mut self) -> Result<Vec<u8>, BufferError> {
        if self.open.is_some() {
            self.end_table()?;
        }
        let root = self.last_table.ok_or(BufferError::NoRoot)?;

        self.buf[..ROOT_HEADER_LEN].copy_from_slice(&root.0.to_le_bytes());
        let bytes = std::mem::take(&mut self.buf);
        self.reset();

        Ok(bytes)
    }

    fn position(&self, what: &'static str) -> Result<u32, BufferError> {
        u32::try_from(self.buf.len()).map_err(|_| too_large(what, self.buf.len()))
    }
}

// u16 vtable length and u16 field offsets bound the slot count
const MAX_SLOTS: usize = (u16::MAX as usize - VTABLE_HEADER_LEN as usize) / 2;

const fn too_large(what: &'static str, len: usize) -> BufferError {
    BufferError::TooLarge { what, len }
}
