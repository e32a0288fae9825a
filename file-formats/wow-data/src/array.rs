//! Offset arrays and the two-phase emit protocol.
//!
//! Every block referenced from a fixed header is produced by a pure `emit(base)` call:
//! `base` is the absolute file offset the returned bytes will be copied to, and the
//! returned descriptor is what the parent writes into its own header. Nothing is mutated,
//! so a block can be emitted any number of times with the same result.

use crate::error::{Result, WowDataError};
use crate::types::{WowArray, WowDataW};
use crate::utils::{count_of, offset_at, pad_to_alignment};

/// Bytes produced for one block plus the descriptor its parent stores for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted<D> {
    pub bytes: Vec<u8>,
    pub descriptor: D,
}

impl<D> Emitted<D> {
    pub fn new(bytes: Vec<u8>, descriptor: D) -> Self {
        Self { bytes, descriptor }
    }

    /// A block that contributes no bytes.
    pub fn empty(descriptor: D) -> Self {
        Self::new(Vec::new(), descriptor)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Ordered elements destined for one offset-referenced block. Insertion order is file order.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetArray<T> {
    items: Vec<T>,
}

impl<T> Default for OffsetArray<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> OffsetArray<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) {
        self.items.extend(items);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }
}

impl<T> From<Vec<T>> for OffsetArray<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for OffsetArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a OffsetArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: WowDataW> OffsetArray<T> {
    /// Writes the elements back to back at `base`.
    ///
    /// An empty array yields no bytes and a 0/0 descriptor.
    pub fn emit(&self, base: u32) -> Result<Emitted<WowArray<T>>> {
        if self.items.is_empty() {
            return Ok(Emitted::empty(WowArray::default()));
        }

        let mut bytes = Vec::with_capacity(self.items.len() * T::WOW_SIZE);
        for item in &self.items {
            item.wow_write(&mut bytes)?;
        }

        Ok(Emitted::new(
            bytes,
            WowArray::new(count_of(self.items.len())?, base),
        ))
    }
}

/// A record whose fixed header points into a variable-length payload of its own.
pub trait TrackedRecord {
    type Header: WowDataW;

    /// Name used in diagnostics.
    const NAME: &'static str;

    /// Emits this record's payload at `base` and returns the header that points into it.
    fn emit(&self, base: u32) -> Result<Emitted<Self::Header>>;
}

/// Whether the block of record headers is padded to 16 bytes before the first payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderBlock {
    Aligned,
    Packed,
}

impl<T: TrackedRecord> OffsetArray<T> {
    /// Reserves every record header at `base`, appends each record's payload behind them,
    /// then backfills the reserved region with the headers.
    pub fn emit_records(
        &self,
        base: u32,
        header_block: HeaderBlock,
    ) -> Result<Emitted<WowArray<T::Header>>> {
        if self.items.is_empty() {
            return Ok(Emitted::empty(WowArray::default()));
        }

        let header_len = self.items.len() * T::Header::WOW_SIZE;
        let mut bytes = vec![0u8; header_len];
        if header_block == HeaderBlock::Aligned {
            pad_to_alignment(&mut bytes, base, 16);
        }

        let mut headers = Vec::with_capacity(self.items.len());
        for item in &self.items {
            let record = item.emit(offset_at(base, bytes.len())?)?;
            bytes.extend_from_slice(&record.bytes);
            headers.push(record.descriptor);
        }

        let mut header_bytes = Vec::with_capacity(header_len);
        for header in &headers {
            header.wow_write(&mut header_bytes)?;
        }
        if header_bytes.len() != header_len {
            return Err(WowDataError::HeaderSizeMismatch {
                record: T::NAME,
                expected: header_len,
                actual: header_bytes.len(),
            });
        }
        bytes[..header_len].copy_from_slice(&header_bytes);

        log::trace!(
            "Emitted {} {} record(s) at {base:#x}, {} bytes",
            self.items.len(),
            T::NAME,
            bytes.len()
        );
        Ok(Emitted::new(
            bytes,
            WowArray::new(count_of(self.items.len())?, base),
        ))
    }
}
