use crate::buffer::{DecodeError, ROOT_HEADER_LEN, Scalar, VTABLE_HEADER_LEN};

///
/// Table
///
/// Read-only view over a finished buffer's root table.
/// Slots the vtable does not cover, or covers with a zero offset, are
/// absent and read as their default.
///

#[derive(Clone, Copy, Debug)]
pub struct Table<'a> {
    buf: &'a [u8],
    pos: usize,
    vtable: usize,
    vtable_size: usize,
}

impl<'a> Table<'a> {
    pub fn root(buf: &'a [u8]) -> Result<Self, DecodeError> {
        let pos = read_u32(buf, 0)? as usize;
        if pos < ROOT_HEADER_LEN {
            return Err(DecodeError::InvalidTable {
                position: pos,
                reason: "root points into the header",
            });
        }

        Self::at(buf, pos)
    }

    fn at(buf: &'a [u8], pos: usize) -> Result<Self, DecodeError> {
        let back_ref = i64::from(read_i32(buf, pos)?);
        let vtable = i64::try_from(pos)
            .ok()
            .and_then(|pos| usize::try_from(pos - back_ref).ok())
            .ok_or(DecodeError::InvalidTable {
                position: pos,
                reason: "vtable reference is out of range",
            })?;

        let vtable_size = usize::from(read_u16(buf, vtable)?);
        if vtable_size < usize::from(VTABLE_HEADER_LEN) || vtable_size % 2 != 0 {
            return Err(DecodeError::InvalidTable {
                position: pos,
                reason: "malformed vtable length",
            });
        }
        slice(buf, vtable, vtable_size)?;

        let table_size = usize::from(read_u16(buf, vtable + 2)?);
        slice(buf, pos, table_size)?;

        Ok(Self {
            buf,
            pos,
            vtable,
            vtable_size,
        })
    }

    /// Number of slots described by the vtable.
    #[must_use]
    pub const fn slot_count(&self) -> usize {
        (self.vtable_size - VTABLE_HEADER_LEN as usize) / 2
    }

    fn field_pos(&self, vt_offset: u16) -> Result<Option<usize>, DecodeError> {
        let vt = usize::from(vt_offset);
        if vt < usize::from(VTABLE_HEADER_LEN) || vt + 2 > self.vtable_size {
            return Ok(None);
        }

        match read_u16(self.buf, self.vtable + vt)? {
            0 => Ok(None),
            rel => Ok(Some(self.pos + usize::from(rel))),
        }
    }

    pub fn has_slot(&self, vt_offset: u16) -> Result<bool, DecodeError> {
        Ok(self.field_pos(vt_offset)?.is_some())
    }

    pub fn get_slot<T: Scalar>(&self, vt_offset: u16, default: T) -> Result<T, DecodeError> {
        match self.field_pos(vt_offset)? {
            Some(pos) => Ok(T::read_le(slice(self.buf, pos, T::WIDTH)?)),
            None => Ok(default),
        }
    }

    pub fn get_char_slot(&self, vt_offset: u16, default: char) -> Result<char, DecodeError> {
        match self.field_pos(vt_offset)? {
            Some(pos) => {
                let value = u32::read_le(slice(self.buf, pos, 4)?);
                char::from_u32(value).ok_or(DecodeError::InvalidChar { vt_offset, value })
            }
            None => Ok(default),
        }
    }

    /// Raw bytes of a child region; empty when the slot is absent.
    pub fn get_bytes_slot(&self, vt_offset: u16) -> Result<&'a [u8], DecodeError> {
        let Some(field) = self.field_pos(vt_offset)? else {
            return Ok(&[]);
        };

        let rel = read_u32(self.buf, field)? as usize;
        let child = field.checked_sub(rel).ok_or(DecodeError::InvalidTable {
            position: self.pos,
            reason: "child reference is out of range",
        })?;
        let len = read_u32(self.buf, child)? as usize;

        slice(self.buf, child + 4, len)
    }

    /// String child; `""` when the slot is absent.
    pub fn get_str_slot(&self, vt_offset: u16) -> Result<&'a str, DecodeError> {
        let bytes = self.get_bytes_slot(vt_offset)?;

        std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8 { vt_offset })
    }
}

fn slice(buf: &[u8], position: usize, needed: usize) -> Result<&[u8], DecodeError> {
    position
        .checked_add(needed)
        .and_then(|end| buf.get(position..end))
        .ok_or(DecodeError::OutOfBounds {
            position,
            needed,
            len: buf.len(),
        })
}

fn read_u16(buf: &[u8], position: usize) -> Result<u16, DecodeError> {
    slice(buf, position, 2).map(u16::read_le)
}

fn read_u32(buf: &[u8], position: usize) -> Result<u32, DecodeError> {
    slice(buf, position, 4).map(u32::read_le)
}

fn read_i32(buf: &[u8], position: usize) -> Result<i32, DecodeError> {
    slice(buf, position, 4).map(i32::read_le)
}
