use crate::error::{Result, WowDataError};

/// Appends zero bytes until `base + bytes.len()` is a multiple of `alignment`.
pub fn pad_to_alignment(bytes: &mut Vec<u8>, base: u32, alignment: usize) {
    let position = base as usize + bytes.len();
    let remainder = position % alignment;
    if remainder != 0 {
        bytes.resize(bytes.len() + alignment - remainder, 0);
    }
}

/// Absolute offset of the byte that follows `len` bytes written at `base`.
pub fn offset_at(base: u32, len: usize) -> Result<u32> {
    u32::try_from(len)
        .ok()
        .and_then(|len| base.checked_add(len))
        .ok_or(WowDataError::OffsetOverflow(base as usize + len))
}

pub fn count_of(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| WowDataError::CountOverflow(len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_pad_to_alignment_relative_to_base() {
        let mut bytes = vec![1, 2, 3];
        pad_to_alignment(&mut bytes, 0, 16);
        assert_eq!(bytes.len(), 16);

        let mut bytes = vec![1, 2, 3];
        pad_to_alignment(&mut bytes, 13, 16);
        assert_eq!(bytes, vec![1, 2, 3]);

        let mut bytes = Vec::new();
        pad_to_alignment(&mut bytes, 20, 16);
        assert_eq!(bytes.len(), 12);
    }

    #[test_case(0x130, 32, 32 ; "aligned")]
    #[test_case(0x131, 32, 47 ; "one past")]
    #[test_case(0x13f, 0, 1 ; "one short")]
    fn test_pad_to_alignment_cases(base: u32, len: usize, expected: usize) {
        let mut bytes = vec![0; len];
        pad_to_alignment(&mut bytes, base, 16);
        assert_eq!(bytes.len(), expected);
    }

    #[test]
    fn test_offset_at() {
        assert_eq!(offset_at(0x130, 16).unwrap(), 0x140);
        assert!(matches!(
            offset_at(u32::MAX, 1),
            Err(WowDataError::OffsetOverflow(_))
        ));
    }
}
