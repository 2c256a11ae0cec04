/*
 * Created on Fri Mar 5 2021
 *
 * Copyright (c) storycraft. Licensed under the Apache Licence 2.0.
 */

pub mod archive;
pub mod reader;
pub mod writer;

pub mod footer;
pub mod entry;

pub mod codec;
pub mod cipher;
pub mod crc;

pub mod stream;

pub mod ies;

mod ingest;

use std::{error::Error, fmt, io};

/// Footer signature. Same bytes as a ZIP end-of-central-directory record.
pub const IPF_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];

/// Byte length of the archive footer.
pub const IPF_FOOTER_SIZE: u64 = 0x18;

/// Fixed password seeding the payload cipher key state.
pub const IPF_PASSWORD: [u8; 20] = [
    0x6F, 0x66, 0x4F, 0x31, 0x61, 0x30, 0x75, 0x65, 0x58, 0x41, 0x3F, 0x20, 0x5B, 0xFF, 0x73,
    0x20, 0x68, 0x20, 0x25, 0x3F,
];

/// Extensions stored as raw bytes, without compression or encryption.
pub const IPF_RAW_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "fsb", "mp3"];

/// Whether payloads of an archive with this new_version pass through the
/// cipher layer.
pub fn uses_encryption(new_version: u32) -> bool {
    new_version > 11000 || new_version == 0
}

#[derive(Debug)]
pub struct IpfError {

    kind: IpfErrorKind,
    error: Option<Box<dyn Error>>

}

impl IpfError {

    pub fn new(kind: IpfErrorKind, error: Option<Box<dyn Error>>) -> Self {
        Self {
            kind, error
        }
    }

    pub fn kind(&self) -> &IpfErrorKind {
        &self.kind
    }

    pub fn error(&self) -> &Option<Box<dyn Error>> {
        &self.error
    }

}

impl fmt::Display for IpfError {

    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IpfErrorKind::Io(err) => write!(formatter, "io error: {}", err),
            IpfErrorKind::InvalidFooter => write!(formatter, "invalid archive footer"),
            IpfErrorKind::InvalidFileTable => write!(formatter, "invalid archive file table"),
            IpfErrorKind::EncryptionMismatch => write!(formatter, "decrypted payload is not a deflate stream"),
            IpfErrorKind::FileNotFound => write!(formatter, "no such entry"),
            IpfErrorKind::Closed => write!(formatter, "archive source closed")
        }
    }

}

impl Error for IpfError {

    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.error.as_deref()
    }

}

impl From<io::Error> for IpfError {

    fn from(err: io::Error) -> Self {
        IpfError::new(IpfErrorKind::Io(err), None)
    }

}

#[derive(Debug)]
pub enum IpfErrorKind {

    Io(io::Error),
    InvalidFooter,
    InvalidFileTable,
    EncryptionMismatch,

    FileNotFound,
    Closed

}
