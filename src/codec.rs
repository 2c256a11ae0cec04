/*
 * Created on Sat Mar 6 2021
 *
 * Copyright (c) storycraft. Licensed under the Apache Licence 2.0.
 */

//! Stored-byte pipeline: raw DEFLATE plus the version-gated cipher layer.

use std::io::Read;

use flate2::{read::{DeflateDecoder, DeflateEncoder}, Compression};

use crate::{cipher::IpfCipher, entry::IpfFileEntry, uses_encryption, IpfError, IpfErrorKind};

/// Compress `data` as a raw DEFLATE stream. No zlib header or trailer.
pub fn deflate(data: &[u8]) -> Result<Vec<u8>, IpfError> {
    let mut compressed = Vec::new();

    let mut encoder = DeflateEncoder::new(data, Compression::fast());
    encoder.read_to_end(&mut compressed)?;

    Ok(compressed)
}

/// Decompress a raw DEFLATE stream. `size_hint` preallocates the output.
pub fn inflate(data: &[u8], size_hint: usize) -> Result<Vec<u8>, IpfError> {
    let mut output = Vec::with_capacity(size_hint);

    let mut decoder = DeflateDecoder::new(data);
    decoder.read_to_end(&mut output)?;

    Ok(output)
}

/// Produce the stored bytes for an entry's content: raw for pass-through
/// extensions, otherwise DEFLATE output wrapped by the cipher when the
/// archive version gate holds.
pub fn pack(entry: &IpfFileEntry, content: &[u8], new_version: u32) -> Result<Vec<u8>, IpfError> {
    if entry.raw_storage() {
        return Ok(content.to_vec());
    }

    let mut stored = deflate(content)?;
    if uses_encryption(new_version) {
        IpfCipher::new().encrypt(&mut stored);
    }

    Ok(stored)
}

/// Recover an entry's content from its stored bytes.
pub fn unpack(entry: &IpfFileEntry, mut stored: Vec<u8>, new_version: u32) -> Result<Vec<u8>, IpfError> {
    if entry.raw_storage() {
        return Ok(stored);
    }

    let encrypted = uses_encryption(new_version);
    if encrypted {
        IpfCipher::new().decrypt(&mut stored);
    }

    match inflate(&stored, entry.size_uncompressed() as usize) {
        Ok(content) => Ok(content),

        // A broken stream behind the cipher means the key material and the
        // archive disagree.
        Err(err) if encrypted => Err(IpfError::new(IpfErrorKind::EncryptionMismatch, Some(Box::new(err)))),

        Err(err) => Err(err)
    }
}

#[cfg(test)]
mod tests {
    use crate::entry::IpfFileEntry;

    use super::{deflate, inflate, pack, unpack};

    #[test]
    fn deflate_roundtrip() {
        let data = b"The quick brown fox jumps over the lazy dog".repeat(8);

        let compressed = deflate(&data).unwrap();
        assert!(compressed.len() < data.len());

        assert_eq!(inflate(&compressed, data.len()).unwrap(), data);
    }

    #[test]
    fn pack_encrypts_above_version_gate() {
        let entry = IpfFileEntry::pending("data.ipf".into(), "table.xml".into(), Vec::new());
        let content = b"<xml>payload</xml>".repeat(4);

        let plain = pack(&entry, &content, 10000).unwrap();
        let gated = pack(&entry, &content, 20000).unwrap();

        assert_eq!(plain, deflate(&content).unwrap());
        assert_ne!(gated, plain);

        assert_eq!(unpack(&entry, plain, 10000).unwrap(), content);
        assert_eq!(unpack(&entry, gated, 20000).unwrap(), content);
    }

    #[test]
    fn pack_skips_raw_extensions() {
        let entry = IpfFileEntry::pending("data.ipf".into(), "cover.JPG".into(), Vec::new());
        let content = vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3, 4, 5, 6];

        let stored = pack(&entry, &content, 20000).unwrap();

        assert_eq!(stored, content);
        assert_eq!(unpack(&entry, stored, 20000).unwrap(), content);
    }
}
