use wow_data::error::Result as WDResult;
use wow_data::prelude::*;
use wow_data::utils::count_of;

/// Texture types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum M2TextureType {
    /// Texture given in filename
    #[default]
    Hardcoded = 0,
    /// Body + clothes
    Body = 1,
    /// Item, capes
    Item = 2,
    /// Monster skin 1
    MonsterSkin1 = 11,
    /// Monster skin 2
    MonsterSkin2 = 12,
    /// Monster skin 3
    MonsterSkin3 = 13,
}

bitflags::bitflags! {
    /// Texture flags as defined in the M2 format
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
    pub struct M2TextureFlags: u32 {
        /// Texture wraps horizontally
        const WRAP_X = 0x1;
        /// Texture wraps vertically
        const WRAP_Y = 0x2;
    }
}

wow_bitflags!(M2TextureFlags, u32);

/// Fixed part of a texture record (16 bytes)
#[derive(Debug, Clone, PartialEq, WowDataW)]
pub struct M2TextureHeader {
    pub texture_type: u32,
    pub flags: M2TextureFlags,
    pub filename: WowArray<u8>,
}

/// Represents a texture in an M2 model
#[derive(Debug, Clone, PartialEq)]
pub struct M2Texture {
    pub texture_type: M2TextureType,
    pub flags: M2TextureFlags,
    /// Full in-game path, e.g. `CREATURE\EVERQUEST\ORCBODY01.BLP`
    pub filename: String,
}

impl M2Texture {
    /// Builds `FOLDER\NAME.BLP` uppercased.
    pub fn in_folder(folder: &str, name: &str, flags: M2TextureFlags) -> Self {
        Self {
            texture_type: M2TextureType::Hardcoded,
            flags,
            filename: format!("{folder}\\{name}.blp").to_uppercase(),
        }
    }
}

impl TrackedRecord for M2Texture {
    type Header = M2TextureHeader;
    const NAME: &'static str = "M2Texture";

    /// The NUL-terminated filename, padded to 16 bytes.
    fn emit(&self, base: u32) -> WDResult<Emitted<M2TextureHeader>> {
        let mut bytes = Vec::with_capacity(self.filename.len() + 16);
        bytes.extend_from_slice(self.filename.as_bytes());
        bytes.push(0);
        let filename = WowArray::new(count_of(bytes.len())?, base);
        pad_to_alignment(&mut bytes, base, 16);

        Ok(Emitted::new(
            bytes,
            M2TextureHeader {
                texture_type: self.texture_type as u32,
                flags: self.flags,
                filename,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_texture_path() {
        let texture = M2Texture::in_folder("Creature\\EverQuest", "orcbody01", M2TextureFlags::empty());
        assert_eq!(texture.filename, "CREATURE\\EVERQUEST\\ORCBODY01.BLP");
    }

    #[test]
    fn test_texture_array_layout() {
        let array: OffsetArray<M2Texture> = vec![
            M2Texture::in_folder("A", "b", M2TextureFlags::WRAP_X | M2TextureFlags::WRAP_Y),
            M2Texture::in_folder("A", "cdefghijklmn", M2TextureFlags::empty()),
        ]
        .into();
        let emitted = array.emit_records(0x100, HeaderBlock::Packed).unwrap();

        assert_eq!(
            emitted.bytes[..16],
            [
                0x00, 0x00, 0x00, 0x00, // hardcoded
                0x03, 0x00, 0x00, 0x00, // wrap x | wrap y
                0x08, 0x00, 0x00, 0x00, // "A\B.BLP\0"
                0x20, 0x01, 0x00, 0x00, // at 0x120
            ]
        );
        // second name is 19 bytes with its terminator and starts on the next 16-byte line
        assert_eq!(emitted.bytes[24..32], [19, 0, 0, 0, 0x30, 0x01, 0, 0]);
        assert_eq!(&emitted.bytes[32..40], b"A\\B.BLP\0");
        assert_eq!(emitted.len(), 32 + 16 + 32);
    }
}
