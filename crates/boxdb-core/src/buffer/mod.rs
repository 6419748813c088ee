//! Flat binary record format.
//!
//! ```text
//! [u32 root table position]
//! [children: u32 len + bytes]...
//! [vtable: u16 vtable_len, u16 table_len, u16 field_offset * slots]
//! [table: i32 (table_pos - vtable_pos), fields...]
//! ```
//!
//! All integers are little-endian and unaligned. A child reference stores
//! `field_pos - child_pos` as u32; a field offset of zero marks the slot
//! absent.

mod builder;
mod scalar;
mod table;


pub use builder::{BufferBuilder, Offset};
pub use scalar::Scalar;
pub use table::Table;

use thiserror::Error as ThisError;

/// Bytes reserved at the front of every buffer for the root position.
pub const ROOT_HEADER_LEN: usize = 4;

/// Byte offset of the first slot entry inside a vtable.
pub const VTABLE_HEADER_LEN: u16 = 4;

/// Vtable offset of a zero-based slot index.
#[must_use]
pub const fn slot_offset(slot: u16) -> u16 {
    VTABLE_HEADER_LEN + 2 * slot
}

///
/// BufferError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum BufferError {
    #[error("slot {slot} was written twice")]
    DuplicateSlot { slot: u16 },

    #[error("offset {position} does not point at a child region of this buffer")]
    InvalidOffset { position: u32 },

    #[error("nothing to finish; no table was built")]
    NoRoot,

    #[error("no table is open")]
    NoTableOpen,

    #[error("slot {slot} is outside the table's {slot_count} slots")]
    SlotOutOfRange { slot: u16, slot_count: u16 },

    #[error("value for slot {slot} does not fit into its stored width")]
    SlotOverflow { slot: u16 },

    #[error("a table is open; children must be created before the table")]
    TableOpen,

    #[error("{what} of {len} bytes exceeds the format limit")]
    TooLarge { what: &'static str, len: usize },

    #[error("{slot_count} slots exceed the vtable limit")]
    TooManySlots { slot_count: u32 },
}

///
/// DecodeError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum DecodeError {
    #[error("slot at vtable offset {vt_offset} holds an invalid char {value:#x}")]
    InvalidChar { vt_offset: u16, value: u32 },

    #[error("invalid table at position {position}: {reason}")]
    InvalidTable {
        position: usize,
        reason: &'static str,
    },

    #[error("slot at vtable offset {vt_offset} holds invalid UTF-8")]
    InvalidUtf8 { vt_offset: u16 },

    #[error("buffer too short: need {needed} bytes at position {position}, have {len}")]
    OutOfBounds {
        position: usize,
        needed: usize,
        len: usize,
    },
}
