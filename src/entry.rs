/*
 * Created on Sun Mar 7 2021
 *
 * Copyright (c) storycraft. Licensed under the Apache Licence 2.0.
 */

use std::{io::{Read, Write}, path::Path};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::{IpfError, IpfErrorKind, IPF_RAW_EXTENSIONS};

/// Payload backing of one archive entry.
#[derive(Debug, Clone)]
pub enum EntryData {

    /// Stored bytes live at this range of the backing source.
    Stored {

        offset: u32,
        size_compressed: u32

    },

    /// Replacement bytes waiting for the next save.
    Pending(Vec<u8>)

}

/// One archived file: identity, sizes, checksum and its payload backing.
/// Identified inside an archive by `pack_name/path`.
#[derive(Debug, Clone)]
pub struct IpfFileEntry {

    pack_name: String,
    path: String,

    size_uncompressed: u32,
    checksum: u32,

    data: EntryData

}

impl IpfFileEntry {

    pub fn new(
        pack_name: String,
        path: String,
        size_uncompressed: u32,
        checksum: u32,
        data: EntryData
    ) -> Self {
        Self {
            pack_name,
            path: normalize_path(&path),
            size_uncompressed,
            checksum,
            data
        }
    }

    /// New in-memory entry carrying its file bytes.
    pub fn pending(pack_name: String, path: String, content: Vec<u8>) -> Self {
        let size_uncompressed = content.len() as u32;

        Self::new(pack_name, path, size_uncompressed, 0, EntryData::Pending(content))
    }

    pub fn pack_name(&self) -> &String {
        &self.pack_name
    }

    pub fn set_pack_name(&mut self, pack_name: String) {
        self.pack_name = pack_name;
    }

    pub fn path(&self) -> &String {
        &self.path
    }

    pub fn set_path(&mut self, path: String) {
        self.path = normalize_path(&path);
    }

    /// Archive-wide entry key.
    pub fn full_path(&self) -> String {
        format!("{}/{}", self.pack_name, self.path)
    }

    pub fn size_uncompressed(&self) -> u32 {
        self.size_uncompressed
    }

    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    pub fn set_checksum(&mut self, checksum: u32) {
        self.checksum = checksum;
    }

    pub fn data(&self) -> &EntryData {
        &self.data
    }

    /// Whether this entry carries replacement bytes to be written out on
    /// the next save.
    pub fn modified(&self) -> bool {
        matches!(self.data, EntryData::Pending(_))
    }

    /// Stored range in the backing source, if any.
    pub fn stored_range(&self) -> Option<(u32, u32)> {
        match self.data {
            EntryData::Stored { offset, size_compressed } => Some((offset, size_compressed)),
            EntryData::Pending(_) => None
        }
    }

    /// Replace the entry content. The bytes are packed on the next save.
    pub fn set_content(&mut self, content: Vec<u8>) {
        self.size_uncompressed = content.len() as u32;
        self.data = EntryData::Pending(content);
    }

    /// Point the entry at a stored range.
    pub fn set_stored(&mut self, offset: u32, size_compressed: u32) {
        self.data = EntryData::Stored { offset, size_compressed };
    }

    /// Whether stored bytes are the raw file bytes, skipping both DEFLATE
    /// and the cipher.
    pub fn raw_storage(&self) -> bool {
        match Path::new(&self.path).extension().and_then(|extension| extension.to_str()) {
            Some(extension) => IPF_RAW_EXTENSIONS
                .iter()
                .any(|raw| extension.eq_ignore_ascii_case(raw)),

            None => false
        }
    }

    /// Read one file-table record from stream.
    /// Returns read size, IpfFileEntry tuple.
    pub fn from_bytes(stream: &mut impl Read) -> Result<(u64, Self), IpfError> {
        let path_length = stream.read_u16::<LittleEndian>()?;
        let checksum = stream.read_u32::<LittleEndian>()?;
        let size_compressed = stream.read_u32::<LittleEndian>()?;
        let size_uncompressed = stream.read_u32::<LittleEndian>()?;
        let offset = stream.read_u32::<LittleEndian>()?;
        let pack_name_length = stream.read_u16::<LittleEndian>()?;

        let pack_name = read_name(stream, pack_name_length as usize)?;
        let path = read_name(stream, path_length as usize)?;

        Ok((
            20 + pack_name_length as u64 + path_length as u64,
            Self::new(
                pack_name,
                path,
                size_uncompressed,
                checksum,
                EntryData::Stored { offset, size_compressed }
            )
        ))
    }

    /// Write one file-table record to stream. The stored range is supplied
    /// by the caller since it describes the file being written, not the
    /// source the entry was read from.
    /// Returns written size.
    pub fn write_record(
        &self,
        stream: &mut impl Write,
        offset: u32,
        size_compressed: u32
    ) -> Result<u64, IpfError> {
        let pack_name = self.pack_name.as_bytes();
        let path = self.path.as_bytes();

        if pack_name.len() > u16::MAX as usize || path.len() > u16::MAX as usize {
            return Err(IpfError::new(IpfErrorKind::InvalidFileTable, None));
        }

        stream.write_u16::<LittleEndian>(path.len() as u16)?;
        stream.write_u32::<LittleEndian>(self.checksum)?;
        stream.write_u32::<LittleEndian>(size_compressed)?;
        stream.write_u32::<LittleEndian>(self.size_uncompressed)?;
        stream.write_u32::<LittleEndian>(offset)?;
        stream.write_u16::<LittleEndian>(pack_name.len() as u16)?;
        stream.write_all(pack_name)?;
        stream.write_all(path)?;

        Ok(20 + pack_name.len() as u64 + path.len() as u64)
    }

}

fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

fn read_name(stream: &mut impl Read, length: usize) -> Result<String, IpfError> {
    let mut buffer = vec![0_u8; length];
    stream.read_exact(&mut buffer)?;

    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{EntryData, IpfFileEntry};

    #[test]
    fn record_roundtrip() {
        let entry = IpfFileEntry::new(
            "data.ipf".into(),
            "sub\\dir\\file.xml".into(),
            100,
            0xDEAD_BEEF,
            EntryData::Stored { offset: 0x40, size_compressed: 64 }
        );

        // Backslashes are normalized on the way in.
        assert_eq!(entry.path(), "sub/dir/file.xml");
        assert_eq!(entry.full_path(), "data.ipf/sub/dir/file.xml");

        let mut buffer = Vec::new();
        let written = entry.write_record(&mut buffer, 0x40, 64).unwrap();
        assert_eq!(written, buffer.len() as u64);

        let (read, parsed) = IpfFileEntry::from_bytes(&mut Cursor::new(&buffer)).unwrap();
        assert_eq!(read, written);
        assert_eq!(parsed.pack_name(), "data.ipf");
        assert_eq!(parsed.path(), "sub/dir/file.xml");
        assert_eq!(parsed.checksum(), 0xDEAD_BEEF);
        assert_eq!(parsed.size_uncompressed(), 100);
        assert_eq!(parsed.stored_range(), Some((0x40, 64)));
    }

    #[test]
    fn raw_storage_extensions() {
        let raw = IpfFileEntry::pending("a.ipf".into(), "sound/bgm.MP3".into(), Vec::new());
        let packed = IpfFileEntry::pending("a.ipf".into(), "table/skill.ies".into(), Vec::new());
        let bare = IpfFileEntry::pending("a.ipf".into(), "README".into(), Vec::new());

        assert!(raw.raw_storage());
        assert!(!packed.raw_storage());
        assert!(!bare.raw_storage());
    }

    #[test]
    fn set_content_marks_modified() {
        let mut entry = IpfFileEntry::new(
            "a.ipf".into(),
            "file.txt".into(),
            0,
            0,
            EntryData::Stored { offset: 0, size_compressed: 0 }
        );
        assert!(!entry.modified());

        entry.set_content(b"replacement".to_vec());
        assert!(entry.modified());
        assert_eq!(entry.size_uncompressed(), 11);
    }
}
