use crc32fast::Hasher;

/// CRC32 of a text's UTF-8 bytes
pub fn crc32(text: &str) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(text.as_bytes());
    hasher.finalize()
}
