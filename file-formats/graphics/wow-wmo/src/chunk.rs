use crate::chunk_id::ChunkId;
use crate::error::{Result, WmoError};
use binrw::BinWrite;
use std::io::{Cursor, Write};

/// Represents a chunk header in a WMO file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    /// 4-byte chunk identifier (magic)
    pub id: ChunkId,
    /// Size of the chunk data in bytes (not including this header)
    pub size: u32,
}

impl ChunkHeader {
    /// Size of a chunk header in bytes
    pub const SIZE: usize = 8;

    /// Write a chunk header to a writer
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        // Identifiers go to disk reversed
        writer.write_all(&self.id.file_bytes())?;
        writer.write_all(&self.size.to_le_bytes())?;
        Ok(())
    }
}

/// A fully rendered chunk: identifier plus payload
///
/// Chunks carry no offsets, so a chunk can be rendered in isolation and
/// concatenated with its siblings afterwards. Nested chunks (`MOGP`) are
/// plain payload that happens to start with more chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub id: ChunkId,
    pub payload: Vec<u8>,
}

impl Chunk {
    pub fn new(id: ChunkId, payload: Vec<u8>) -> Self {
        Self { id, payload }
    }

    /// A chunk with no payload (`MOPV` and friends when there are no portals)
    pub fn empty(id: ChunkId) -> Self {
        Self::new(id, Vec::new())
    }

    /// A chunk whose payload is a packed array of fixed-size records
    pub fn from_records<T>(id: ChunkId, records: &[T]) -> Result<Self>
    where
        T: for<'a> BinWrite<Args<'a> = ()>,
    {
        let mut writer = ChunkWriter::new(id);
        for record in records {
            writer.record(record)?;
        }
        Ok(writer.finish())
    }

    /// The header this chunk renders with
    pub fn header(&self) -> Result<ChunkHeader> {
        let size = u32::try_from(self.payload.len()).map_err(|_| WmoError::ChunkTooLarge {
            id: self.id,
            size: self.payload.len(),
        })?;
        Ok(ChunkHeader { id: self.id, size })
    }

    /// Total rendered size including the header
    pub fn len(&self) -> usize {
        ChunkHeader::SIZE + self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Append the rendered chunk to `out`
    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        self.header()?.write(out)?;
        out.extend_from_slice(&self.payload);
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.len());
        self.write_to(&mut out)?;
        Ok(out)
    }
}

/// Render a sequence of chunks back to back
pub fn render_chunks(chunks: &[Chunk]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(chunks.iter().map(Chunk::len).sum());
    for chunk in chunks {
        tracing::trace!("{}: {} bytes", chunk.id, chunk.payload.len());
        chunk.write_to(&mut out)?;
    }
    Ok(out)
}

/// Incremental builder for a chunk payload
#[derive(Debug)]
pub struct ChunkWriter {
    id: ChunkId,
    cursor: Cursor<Vec<u8>>,
}

impl ChunkWriter {
    pub fn new(id: ChunkId) -> Self {
        Self {
            id,
            cursor: Cursor::new(Vec::new()),
        }
    }

    /// Write one binrw record
    pub fn record<T>(&mut self, record: &T) -> Result<&mut Self>
    where
        T: for<'a> BinWrite<Args<'a> = ()>,
    {
        record.write_le(&mut self.cursor)?;
        Ok(self)
    }

    /// Write raw bytes
    pub fn bytes(&mut self, bytes: &[u8]) -> Result<&mut Self> {
        self.cursor.write_all(bytes)?;
        Ok(self)
    }

    /// Write a string followed by its NUL terminator
    pub fn c_string(&mut self, value: &str) -> Result<&mut Self> {
        self.bytes(value.as_bytes())?;
        self.bytes(&[0])
    }

    /// Pad the payload with NULs up to a multiple of `alignment`
    pub fn pad_to(&mut self, alignment: usize) -> Result<&mut Self> {
        let padding = (alignment - self.len() % alignment) % alignment;
        self.bytes(&vec![0; padding])
    }

    /// Current payload length
    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn finish(self) -> Chunk {
        Chunk::new(self.id, self.cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_chunk_header_write() {
        let header = ChunkHeader {
            id: ChunkId::new(*b"TEST"),
            size: 42,
        };

        let mut buffer = Vec::new();
        header.write(&mut buffer).unwrap();

        assert_eq!(buffer, [b'T', b'S', b'E', b'T', 42, 0, 0, 0]);
    }

    #[test]
    fn test_version_chunk_bytes() {
        let chunk = Chunk::from_records(ChunkId::MVER, &[17u32]).unwrap();
        assert_eq!(
            chunk.to_bytes().unwrap(),
            [b'R', b'E', b'V', b'M', 4, 0, 0, 0, 17, 0, 0, 0]
        );
    }

    #[test]
    fn test_empty_chunk() {
        let chunk = Chunk::empty(ChunkId::MOPV);
        assert_eq!(chunk.to_bytes().unwrap(), b"VPOM\0\0\0\0");
    }

    #[test]
    fn test_string_padding() {
        let mut writer = ChunkWriter::new(ChunkId::MOSB);
        writer.c_string("").unwrap().pad_to(4).unwrap();
        assert_eq!(writer.finish().payload, [0, 0, 0, 0]);

        let mut writer = ChunkWriter::new(ChunkId::MOGN);
        writer.c_string("ABCD").unwrap().pad_to(4).unwrap();
        assert_eq!(writer.finish().payload, b"ABCD\0\0\0\0");
    }

    #[test]
    fn test_render_chunks_concatenates() {
        let chunks = [
            Chunk::from_records(ChunkId::MVER, &[17u32]).unwrap(),
            Chunk::new(ChunkId::MOSB, vec![0; 4]),
        ];
        let bytes = render_chunks(&chunks).unwrap();
        assert_eq!(bytes.len(), 24);
        assert_eq!(&bytes[12..16], b"BSOM");
    }
}
