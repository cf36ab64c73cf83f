use std::{char, fmt};

/// Byte Order Mark (BOM) is used to signal the endianness of an encoding. The order `0xFF 0xFE`
/// strongly suggests that the encoding is using little-endian byte order.
///
/// <https://en.wikipedia.org/wiki/Byte_order_mark>
const BOM_LE: &[u8] = &[0xFF, 0xFE];

const BOM_UTF8: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Text encoding of an INI file on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Charset {
    #[default]
    Utf8,
    Utf16Le,
}

impl Charset {
    /// Guess the charset from a leading byte order mark, falling back to UTF-8.
    #[must_use]
    pub fn sniff(data: &[u8]) -> Self {
        if data.starts_with(BOM_LE) {
            Self::Utf16Le
        } else {
            Self::Utf8
        }
    }

    /// Decode `data`, dropping a leading byte order mark if there is one.
    ///
    /// Returns `None` if the bytes are not valid in this charset.
    #[must_use]
    pub fn decode(self, data: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => {
                let data = data.strip_prefix(BOM_UTF8).unwrap_or(data);
                String::from_utf8(data.to_vec()).ok()
            }
            Self::Utf16Le => {
                let data = data.strip_prefix(BOM_LE).unwrap_or(data);
                let chunks = data.chunks_exact(2);

                if !chunks.remainder().is_empty() {
                    return None;
                }

                let utf16 = chunks.map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]));
                char::decode_utf16(utf16)
                    .collect::<Result<String, _>>()
                    .ok()
            }
        }
    }

    /// Encode `text`. UTF-16LE output starts with a byte order mark so [`Charset::sniff`] can
    /// recognize it again.
    #[must_use]
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            Self::Utf16Le => {
                let mut data = Vec::with_capacity(BOM_LE.len() + text.len() * 2);
                data.extend_from_slice(BOM_LE);
                for unit in text.encode_utf16() {
                    data.extend_from_slice(&unit.to_le_bytes());
                }
                data
            }
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Utf8 => f.write_str("UTF-8"),
            Self::Utf16Le => f.write_str("UTF-16LE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniff_little_endian_bom() {
        assert_eq!(Charset::sniff(&[0xFF, 0xFE, b'[', 0]), Charset::Utf16Le);
        assert_eq!(Charset::sniff(b"[Section]"), Charset::Utf8);
    }

    #[test]
    fn decode_utf16_le() {
        let data = [0xFF, 0xFE, b'[', 0, b'a', 0, b']', 0];

        assert_eq!(Charset::Utf16Le.decode(&data).as_deref(), Some("[a]"));
    }

    #[test]
    fn decode_rejects_odd_utf16_length() {
        assert_eq!(Charset::Utf16Le.decode(&[b'[', 0, b'a']), None);
    }

    #[test]
    fn decode_rejects_invalid_utf8() {
        assert_eq!(Charset::Utf8.decode(&[b'a', 0xC3, 0x28]), None);
    }

    #[test]
    fn encode_utf16_le_writes_bom() {
        let data = Charset::Utf16Le.encode("k");

        assert_eq!(data, vec![0xFF, 0xFE, b'k', 0]);
        assert_eq!(Charset::sniff(&data), Charset::Utf16Le);
    }
}
