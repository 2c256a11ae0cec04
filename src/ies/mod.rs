/*
 * Created on Wed Mar 10 2021
 *
 * Copyright (c) storycraft. Licensed under the MIT Licence.
 */

pub mod file;
pub mod column;
pub mod row;

pub mod reader;
pub mod writer;

use std::{error::Error, fmt, io};

/// Byte size of one column record on disk.
pub const IES_COLUMN_SIZE: u32 = 136;

/// Byte length of the header name field.
pub const IES_NAME_SIZE: usize = 128;

/// Byte length of each column name field.
pub const IES_COLUMN_NAME_SIZE: usize = 64;

/// Byte offset of the three patched header size fields
/// (data_offset, resource_offset, file_size).
pub const IES_SIZE_FIELD_OFFSET: u64 = 132;

#[derive(Debug)]
pub struct IesError {

    kind: IesErrorKind,
    error: Option<Box<dyn Error>>

}

impl IesError {

    pub fn new(kind: IesErrorKind, error: Option<Box<dyn Error>>) -> Self {
        Self {
            kind, error
        }
    }

    pub fn kind(&self) -> &IesErrorKind {
        &self.kind
    }

    pub fn error(&self) -> &Option<Box<dyn Error>> {
        &self.error
    }

}

impl fmt::Display for IesError {

    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IesErrorKind::Io(err) => write!(formatter, "io error: {}", err),
            IesErrorKind::InvalidHeader => write!(formatter, "invalid table header"),
            IesErrorKind::InvalidColumn => write!(formatter, "invalid column record"),
            IesErrorKind::FieldNotFound => write!(formatter, "no such column in row"),
            IesErrorKind::TypeMismatch => write!(formatter, "column value has the wrong type")
        }
    }

}

impl Error for IesError {

    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.error.as_deref()
    }

}

impl From<io::Error> for IesError {

    fn from(err: io::Error) -> Self {
        IesError::new(IesErrorKind::Io(err), None)
    }

}

#[derive(Debug)]
pub enum IesErrorKind {

    Io(io::Error),
    InvalidHeader,
    InvalidColumn,

    FieldNotFound,
    TypeMismatch

}
