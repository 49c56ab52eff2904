//! Binary writer for serializing models back to bytes.
//!
//! [`BinaryWriter`] appends little-endian values to a growable buffer; the
//! free `patch_*` functions write named fields at fixed offsets into a
//! retained raw-byte shadow, leaving all other offsets untouched.

use byteorder::{LittleEndian, WriteBytesExt};

/// A growable little-endian output buffer.
///
/// Writes are infallible; the buffer grows as needed. Variable-length formats
/// compute their total size up front and use [`BinaryWriter::with_capacity`].
#[derive(Debug, Default)]
pub struct BinaryWriter {
    buf: Vec<u8>,
}

impl BinaryWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with a pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check whether nothing has been written yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the writer and return the output buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Append a single byte.
    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    /// Append a little-endian u16.
    #[inline]
    pub fn write_u16(&mut self, value: u16) {
        // Writing to a Vec cannot fail.
        self.buf.write_u16::<LittleEndian>(value).unwrap();
    }

    /// Append a little-endian u32.
    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.buf.write_u32::<LittleEndian>(value).unwrap();
    }

    /// Append a little-endian i32.
    #[inline]
    pub fn write_i32(&mut self, value: i32) {
        self.buf.write_i32::<LittleEndian>(value).unwrap();
    }

    /// Append a little-endian f32.
    #[inline]
    pub fn write_f32(&mut self, value: f32) {
        self.buf.write_f32::<LittleEndian>(value).unwrap();
    }

    /// Append raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }
}

/// Patch a u8 at a fixed offset in a raw-byte shadow.
#[inline]
pub fn patch_u8(raw: &mut [u8], offset: usize, value: u8) {
    raw[offset] = value;
}

/// Patch a little-endian u32 at a fixed offset in a raw-byte shadow.
#[inline]
pub fn patch_u32(raw: &mut [u8], offset: usize, value: u32) {
    raw[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Patch a little-endian i32 at a fixed offset in a raw-byte shadow.
#[inline]
pub fn patch_i32(raw: &mut [u8], offset: usize, value: i32) {
    raw[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Patch a little-endian f32 at a fixed offset in a raw-byte shadow.
#[inline]
pub fn patch_f32(raw: &mut [u8], offset: usize, value: f32) {
    raw[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Patch a fixed-size string slot: zero the slot, then copy the bytes
/// truncated to `slot - 1` so the terminator always survives.
pub fn patch_fixed_str(raw: &mut [u8], offset: usize, slot: usize, bytes: &[u8]) {
    raw[offset..offset + slot].fill(0);
    let copy = bytes.len().min(slot - 1);
    raw[offset..offset + copy].copy_from_slice(&bytes[..copy]);
}
