use std::fmt;

/// A 4-byte chunk identifier, held in its readable order (`MVER`)
///
/// WMO files store identifiers little-endian, so the on-disk form is the
/// reverse of the readable one (`REVM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkId(pub [u8; 4]);

impl ChunkId {
    pub const MVER: Self = Self(*b"MVER");
    pub const MOHD: Self = Self(*b"MOHD");
    pub const MOTX: Self = Self(*b"MOTX");
    pub const MOMT: Self = Self(*b"MOMT");
    pub const MOGN: Self = Self(*b"MOGN");
    pub const MOGI: Self = Self(*b"MOGI");
    pub const MOSB: Self = Self(*b"MOSB");
    pub const MOPV: Self = Self(*b"MOPV");
    pub const MOPT: Self = Self(*b"MOPT");
    pub const MOPR: Self = Self(*b"MOPR");
    pub const MOVV: Self = Self(*b"MOVV");
    pub const MOVB: Self = Self(*b"MOVB");
    pub const MOLT: Self = Self(*b"MOLT");
    pub const MODS: Self = Self(*b"MODS");
    pub const MODN: Self = Self(*b"MODN");
    pub const MODD: Self = Self(*b"MODD");
    pub const MFOG: Self = Self(*b"MFOG");
    pub const MCVP: Self = Self(*b"MCVP");

    // Group file chunks
    pub const MOGP: Self = Self(*b"MOGP");
    pub const MOPY: Self = Self(*b"MOPY");
    pub const MOVI: Self = Self(*b"MOVI");
    pub const MOVT: Self = Self(*b"MOVT");
    pub const MONR: Self = Self(*b"MONR");
    pub const MOTV: Self = Self(*b"MOTV");
    pub const MOBA: Self = Self(*b"MOBA");
    pub const MOLR: Self = Self(*b"MOLR");
    pub const MODR: Self = Self(*b"MODR");
    pub const MOBN: Self = Self(*b"MOBN");
    pub const MOBR: Self = Self(*b"MOBR");
    pub const MOCV: Self = Self(*b"MOCV");
    pub const MLIQ: Self = Self(*b"MLIQ");

    /// Create a chunk identifier from its readable bytes
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// The identifier as it is stored in a file
    pub const fn file_bytes(&self) -> [u8; 4] {
        [self.0[3], self.0[2], self.0[1], self.0[0]]
    }

    /// Get the raw readable bytes of this chunk identifier
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.iter().all(u8::is_ascii_graphic) {
            for &b in &self.0 {
                write!(f, "{}", b as char)?;
            }
            Ok(())
        } else {
            write!(
                f,
                "0x{:02X}{:02X}{:02X}{:02X}",
                self.0[0], self.0[1], self.0[2], self.0[3]
            )
        }
    }
}
