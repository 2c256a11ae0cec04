/*
 * Created on Wed Mar 10 2021
 *
 * Copyright (c) storycraft. Licensed under the Apache Licence 2.0.
 */

use std::{cmp::Ordering, io::{Read, Write}};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::stream::{read_xored_fixed_string, write_xored_fixed_string};

use super::{IesError, IesErrorKind, IES_COLUMN_NAME_SIZE};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u16)]
pub enum ColumnType {

    Float = 0,
    String = 1,
    String2 = 2

}

impl ColumnType {

    pub fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            0 => Some(ColumnType::Float),
            1 => Some(ColumnType::String),
            2 => Some(ColumnType::String2),

            _ => None
        }
    }

}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u16)]
pub enum ColumnAccess {

    EP = 0,
    CP = 1,
    VP = 2,
    SP = 3,
    CT = 4

}

impl ColumnAccess {

    pub fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            0 => Some(ColumnAccess::EP),
            1 => Some(ColumnAccess::CP),
            2 => Some(ColumnAccess::VP),
            3 => Some(ColumnAccess::SP),
            4 => Some(ColumnAccess::CT),

            _ => None
        }
    }

}

impl Default for ColumnAccess {

    fn default() -> Self {
        ColumnAccess::SP
    }

}

/// One table column. The on-disk record is 136 bytes: two 64 byte
/// obfuscated name fields and four u16 attributes.
#[derive(Debug, Clone)]
pub struct IesColumn {

    name: String,
    name2: String,

    column_type: ColumnType,
    access: ColumnAccess,
    sync: u16,
    position: u16

}

impl IesColumn {

    pub fn new(name: String, name2: String, column_type: ColumnType, position: u16) -> Self {
        Self {
            name,
            name2,
            column_type,
            access: ColumnAccess::default(),
            sync: 0,
            position
        }
    }

    pub fn name(&self) -> &String {
        &self.name
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn name2(&self) -> &String {
        &self.name2
    }

    pub fn set_name2(&mut self, name2: String) {
        self.name2 = name2;
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn set_column_type(&mut self, column_type: ColumnType) {
        self.column_type = column_type;
    }

    pub fn access(&self) -> ColumnAccess {
        self.access
    }

    pub fn set_access(&mut self, access: ColumnAccess) {
        self.access = access;
    }

    pub fn sync(&self) -> u16 {
        self.sync
    }

    pub fn set_sync(&mut self, sync: u16) {
        self.sync = sync;
    }

    pub fn position(&self) -> u16 {
        self.position
    }

    pub fn set_position(&mut self, position: u16) {
        self.position = position;
    }

    /// Whether row cells of this column hold a float.
    pub fn is_number(&self) -> bool {
        self.column_type == ColumnType::Float
    }

    /// Read one column record from stream.
    /// Returns read size, IesColumn tuple.
    pub fn from_bytes(stream: &mut impl Read) -> Result<(u64, Self), IesError> {
        let name = read_xored_fixed_string(stream, IES_COLUMN_NAME_SIZE)?;
        let name2 = read_xored_fixed_string(stream, IES_COLUMN_NAME_SIZE)?;

        let column_type = ColumnType::from_raw(stream.read_u16::<LittleEndian>()?)
            .ok_or_else(|| IesError::new(IesErrorKind::InvalidColumn, None))?;
        let access = ColumnAccess::from_raw(stream.read_u16::<LittleEndian>()?)
            .ok_or_else(|| IesError::new(IesErrorKind::InvalidColumn, None))?;
        let sync = stream.read_u16::<LittleEndian>()?;
        let position = stream.read_u16::<LittleEndian>()?;

        Ok((136, Self {
            name,
            name2,
            column_type,
            access,
            sync,
            position
        }))
    }

    /// Write one column record to stream.
    /// Returns written size.
    pub fn write_bytes(&self, stream: &mut impl Write) -> Result<u64, IesError> {
        write_xored_fixed_string(stream, &self.name, IES_COLUMN_NAME_SIZE)?;
        write_xored_fixed_string(stream, &self.name2, IES_COLUMN_NAME_SIZE)?;

        stream.write_u16::<LittleEndian>(self.column_type as u16)?;
        stream.write_u16::<LittleEndian>(self.access as u16)?;
        stream.write_u16::<LittleEndian>(self.sync)?;
        stream.write_u16::<LittleEndian>(self.position)?;

        Ok(136)
    }

}

/// Columns order by `(type, position)`, with both string types counting as
/// the same type key.
impl Ord for IesColumn {

    fn cmp(&self, other: &Self) -> Ordering {
        let same_type = self.column_type == other.column_type
            || (!self.is_number() && !other.is_number());

        if same_type {
            self.position.cmp(&other.position)
        } else {
            (self.column_type as u16).cmp(&(other.column_type as u16))
        }
    }

}

impl PartialOrd for IesColumn {

    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }

}

impl PartialEq for IesColumn {

    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }

}

impl Eq for IesColumn {}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{ColumnAccess, ColumnType, IesColumn};

    #[test]
    fn record_roundtrip() {
        let mut column = IesColumn::new("Level".into(), "Level".into(), ColumnType::Float, 3);
        column.set_sync(1);

        let mut buffer = Vec::new();
        assert_eq!(column.write_bytes(&mut buffer).unwrap(), 136);
        assert_eq!(buffer.len(), 136);

        let (read, parsed) = IesColumn::from_bytes(&mut Cursor::new(&buffer)).unwrap();
        assert_eq!(read, 136);
        assert_eq!(parsed.name(), "Level");
        assert_eq!(parsed.name2(), "Level");
        assert_eq!(parsed.column_type(), ColumnType::Float);
        assert_eq!(parsed.access(), ColumnAccess::SP);
        assert_eq!(parsed.sync(), 1);
        assert_eq!(parsed.position(), 3);
    }

    #[test]
    fn sort_order() {
        let c1 = IesColumn::new("c1".into(), "c1".into(), ColumnType::String, 5);
        let c2 = IesColumn::new("c2".into(), "c2".into(), ColumnType::String2, 3);
        let c3 = IesColumn::new("c3".into(), "c3".into(), ColumnType::Float, 7);

        let mut columns = vec![c1, c2, c3];
        columns.sort();

        let names: Vec<&str> = columns.iter().map(|column| column.name().as_str()).collect();
        assert_eq!(names, ["c3", "c2", "c1"]);
    }
}
