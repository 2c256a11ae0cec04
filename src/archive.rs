/*
 * Created on Sun Mar 7 2021
 *
 * Copyright (c) storycraft. Licensed under the Apache Licence 2.0.
 */

use std::{
    fmt,
    fs::File,
    io::{self, BufReader, Cursor, Read, Seek, SeekFrom},
    path::{Path, PathBuf},
    sync::Mutex
};

use super::{
    codec,
    entry::{EntryData, IpfFileEntry},
    footer::IpfFooter,
    reader::IpfReader,
    writer::IpfWriter,
    IpfError, IpfErrorKind
};

pub trait Source: Read + Seek {}

impl<T: Read + Seek> Source for T {}

/// Shared backing byte source. Extraction workers read ranges through one
/// lock; seek and read form a single critical section.
pub struct SourceStream {

    stream: Mutex<Box<dyn Source + Send>>

}

impl SourceStream {

    pub fn new(stream: Box<dyn Source + Send>) -> Self {
        Self {
            stream: Mutex::new(stream)
        }
    }

    /// Read exactly `len` bytes at `offset` from the source start.
    pub fn read_exact_at(&self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        let mut stream = self
            .stream
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        stream.seek(SeekFrom::Start(offset))?;

        let mut buffer = vec![0_u8; len];
        stream.read_exact(&mut buffer)?;

        Ok(buffer)
    }

}

impl fmt::Debug for SourceStream {

    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("SourceStream")
    }

}

/// An IPF archive: footer metadata plus entries in on-disk order.
/// Stored payloads are read lazily from the backing source; entries are
/// addressed by index.
#[derive(Debug)]
pub struct IpfArchive {

    footer: IpfFooter,
    entries: Vec<IpfFileEntry>,

    source: Option<SourceStream>,
    source_path: Option<PathBuf>

}

impl IpfArchive {

    /// New empty archive without a backing source.
    pub fn create(old_version: u32, new_version: u32) -> Self {
        Self {
            footer: IpfFooter::new(old_version, new_version),
            entries: Vec::new(),
            source: None,
            source_path: None
        }
    }

    /// Open archive file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, IpfError> {
        let path = path.as_ref();
        let stream = BufReader::new(File::open(path)?);

        let mut archive = Self::from_stream(stream)?;
        archive.source_path = Some(path.to_path_buf());

        Ok(archive)
    }

    /// Open archive from a seekable stream.
    pub fn from_stream<T: Read + Seek + Send + 'static>(mut stream: T) -> Result<Self, IpfError> {
        let (footer, entries) = IpfReader::read_container(&mut stream)?;

        Ok(Self {
            footer,
            entries,
            source: Some(SourceStream::new(Box::new(stream))),
            source_path: None
        })
    }

    /// Open archive from an in-memory buffer.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, IpfError> {
        Self::from_stream(Cursor::new(bytes))
    }

    pub fn footer(&self) -> &IpfFooter {
        &self.footer
    }

    pub fn footer_mut(&mut self) -> &mut IpfFooter {
        &mut self.footer
    }

    pub fn entries(&self) -> &Vec<IpfFileEntry> {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut Vec<IpfFileEntry> {
        &mut self.entries
    }

    pub fn source(&self) -> Option<&SourceStream> {
        self.source.as_ref()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Find entry index by its `pack_name/path` key.
    pub fn find_entry(&self, full_path: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.full_path() == full_path)
    }

    /// Extract the entry at `index`: pending bytes verbatim, stored bytes
    /// through the ranged read and the payload codec.
    pub fn entry_data(&self, index: usize) -> Result<Vec<u8>, IpfError> {
        let entry = self
            .entries
            .get(index)
            .ok_or_else(|| IpfError::new(IpfErrorKind::FileNotFound, None))?;

        match entry.data() {
            EntryData::Pending(content) => Ok(content.clone()),

            EntryData::Stored { offset, size_compressed } => {
                let source = self
                    .source
                    .as_ref()
                    .ok_or_else(|| IpfError::new(IpfErrorKind::Closed, None))?;

                let stored = source.read_exact_at(*offset as u64, *size_compressed as usize)?;

                codec::unpack(entry, stored, self.footer.new_version())
            }
        }
    }

    /// Add a file, replacing any entry with the same `pack_name/path` key
    /// in place. Returns the entry index.
    pub fn add_file(&mut self, pack_name: &str, path: &str, content: Vec<u8>) -> usize {
        let entry = IpfFileEntry::pending(pack_name.to_string(), path.to_string(), content);

        match self.find_entry(&entry.full_path()) {
            Some(index) => {
                self.entries[index] = entry;

                index
            },

            None => {
                self.entries.push(entry);

                self.entries.len() - 1
            }
        }
    }

    /// Remove and return the entry at `index`.
    pub fn remove(&mut self, index: usize) -> Option<IpfFileEntry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    /// Release the backing source. Stored entries are unreadable
    /// afterwards.
    pub fn close(&mut self) {
        self.source = None;
    }

    /// Rewrite the archive at `path` through a temp file. Returns true
    /// when it overwrote its own source; the caller must reopen.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<bool, IpfError> {
        IpfWriter::save_archive(self, path.as_ref())
    }

}
