use crate::engine::errors::CodecError;
use std::io::Write;

/// Widest key any column can use.
pub const MAX_KEY_SIZE: usize = 4;

/// Fixed-width key layout for one dictionary column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyGenerator {
    key_size: usize,
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self {
            key_size: MAX_KEY_SIZE,
        }
    }
}

impl KeyGenerator {
    /// Width is clamped to `1..=MAX_KEY_SIZE`.
    pub fn with_key_size(key_size: usize) -> Self {
        Self {
            key_size: key_size.clamp(1, MAX_KEY_SIZE),
        }
    }

    /// Smallest byte width able to hold every key up to `cardinality`.
    pub fn for_cardinality(cardinality: u32) -> Self {
        let bits = (u32::BITS - cardinality.leading_zeros()) as usize;
        Self::with_key_size(bits.div_ceil(8))
    }

    pub fn key_size_in_bytes(&self) -> usize {
        self.key_size
    }

    /// Writes `key` as `key_size` big-endian bytes.
    pub fn write_key<W: Write>(&self, key: u32, sink: &mut W) -> Result<(), CodecError> {
        let bytes = key.to_be_bytes();
        let skip = MAX_KEY_SIZE - self.key_size;
        if bytes[..skip].iter().any(|b| *b != 0) {
            return Err(CodecError::KeyOverflow {
                key,
                key_size: self.key_size,
            });
        }
        sink.write_all(&bytes[skip..])?;
        Ok(())
    }

    /// Inverse of [`write_key`](Self::write_key) for a slice of exactly `key_size` bytes.
    #[cfg(test)]
    pub fn read_key(&self, bytes: &[u8]) -> Option<u32> {
        if bytes.len() != self.key_size {
            return None;
        }
        let mut buf = [0u8; MAX_KEY_SIZE];
        buf[MAX_KEY_SIZE - self.key_size..].copy_from_slice(bytes);
        Some(u32::from_be_bytes(buf))
    }
}
