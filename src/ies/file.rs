/*
 * Created on Thu Mar 11 2021
 *
 * Copyright (c) storycraft. Licensed under the Apache Licence 2.0.
 */

use std::io::{Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::stream::{read_fixed_string, write_fixed_string};

use super::{
    column::IesColumn,
    reader::IesReader,
    row::IesRow,
    writer::IesWriter,
    IesError, IES_NAME_SIZE
};

/// IES table header. The three size fields describe the column table and
/// row region byte extents and are patched by the writer after the row
/// pass.
#[derive(Debug, Clone)]
pub struct IesHeader {

    name: String,
    version: u16,

    data_offset: u32,
    resource_offset: u32,
    file_size: u32,

    use_class_id: bool,

    row_count: u16,
    column_count: u16,
    number_column_count: u16,
    string_column_count: u16

}

impl IesHeader {

    pub fn new(name: String) -> Self {
        Self {
            name,
            version: 1,
            data_offset: 0,
            resource_offset: 0,
            file_size: 0,
            use_class_id: false,
            row_count: 0,
            column_count: 0,
            number_column_count: 0,
            string_column_count: 0
        }
    }

    pub fn name(&self) -> &String {
        &self.name
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn set_version(&mut self, version: u16) {
        self.version = version;
    }

    pub fn data_offset(&self) -> u32 {
        self.data_offset
    }

    pub fn resource_offset(&self) -> u32 {
        self.resource_offset
    }

    pub fn file_size(&self) -> u32 {
        self.file_size
    }

    pub fn use_class_id(&self) -> bool {
        self.use_class_id
    }

    pub fn set_use_class_id(&mut self, use_class_id: bool) {
        self.use_class_id = use_class_id;
    }

    pub fn row_count(&self) -> u16 {
        self.row_count
    }

    pub fn column_count(&self) -> u16 {
        self.column_count
    }

    pub fn number_column_count(&self) -> u16 {
        self.number_column_count
    }

    pub fn string_column_count(&self) -> u16 {
        self.string_column_count
    }

    pub(super) fn set_counts(
        &mut self,
        row_count: u16,
        number_column_count: u16,
        string_column_count: u16
    ) {
        self.row_count = row_count;
        self.number_column_count = number_column_count;
        self.string_column_count = string_column_count;
        self.column_count = number_column_count + string_column_count;
    }

    pub(super) fn set_sizes(&mut self, data_offset: u32, resource_offset: u32, file_size: u32) {
        self.data_offset = data_offset;
        self.resource_offset = resource_offset;
        self.file_size = file_size;
    }

    /// Read table header from current position.
    /// Returns read size, IesHeader tuple.
    pub fn from_bytes(stream: &mut impl Read) -> Result<(u64, Self), IesError> {
        let name = read_fixed_string(stream, IES_NAME_SIZE)?;

        let version = stream.read_u16::<LittleEndian>()?;
        stream.read_u16::<LittleEndian>()?; // Padding

        let data_offset = stream.read_u32::<LittleEndian>()?;
        let resource_offset = stream.read_u32::<LittleEndian>()?;
        let file_size = stream.read_u32::<LittleEndian>()?;

        let use_class_id = stream.read_u8()? != 0;
        stream.read_u8()?; // Padding

        let row_count = stream.read_u16::<LittleEndian>()?;
        let column_count = stream.read_u16::<LittleEndian>()?;
        let number_column_count = stream.read_u16::<LittleEndian>()?;
        let string_column_count = stream.read_u16::<LittleEndian>()?;
        stream.read_u16::<LittleEndian>()?; // Padding

        Ok((156, Self {
            name,
            version,
            data_offset,
            resource_offset,
            file_size,
            use_class_id,
            row_count,
            column_count,
            number_column_count,
            string_column_count
        }))
    }

    /// Write table header to stream.
    /// Returns written size.
    pub fn write_bytes(&self, stream: &mut impl Write) -> Result<u64, IesError> {
        write_fixed_string(stream, &self.name, IES_NAME_SIZE)?;

        stream.write_u16::<LittleEndian>(self.version)?;
        stream.write_u16::<LittleEndian>(0)?;

        stream.write_u32::<LittleEndian>(self.data_offset)?;
        stream.write_u32::<LittleEndian>(self.resource_offset)?;
        stream.write_u32::<LittleEndian>(self.file_size)?;

        stream.write_u8(self.use_class_id as u8)?;
        stream.write_u8(0)?;

        stream.write_u16::<LittleEndian>(self.row_count)?;
        stream.write_u16::<LittleEndian>(self.column_count)?;
        stream.write_u16::<LittleEndian>(self.number_column_count)?;
        stream.write_u16::<LittleEndian>(self.string_column_count)?;
        stream.write_u16::<LittleEndian>(0)?;

        Ok(156)
    }

}

/// An IES table: header, columns, rows. Parsed columns come deduplicated
/// and sorted; rows key their cells by column name.
#[derive(Debug, Clone)]
pub struct IesFile {

    header: IesHeader,

    columns: Vec<IesColumn>,
    rows: Vec<IesRow>

}

impl IesFile {

    pub fn new(header: IesHeader) -> Self {
        Self {
            header,
            columns: Vec::new(),
            rows: Vec::new()
        }
    }

    /// Parse a whole table blob.
    pub fn from_bytes(data: &[u8]) -> Result<Self, IesError> {
        IesReader::read(&mut Cursor::new(data))
    }

    /// Serialize the table to a blob.
    pub fn to_bytes(&self) -> Result<Vec<u8>, IesError> {
        IesWriter::write(self)
    }

    pub fn header(&self) -> &IesHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut IesHeader {
        &mut self.header
    }

    pub fn columns(&self) -> &Vec<IesColumn> {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut Vec<IesColumn> {
        &mut self.columns
    }

    pub fn rows(&self) -> &Vec<IesRow> {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut Vec<IesRow> {
        &mut self.rows
    }

    pub fn add_column(&mut self, column: IesColumn) {
        self.columns.push(column);
    }

    pub fn add_row(&mut self, row: IesRow) {
        self.rows.push(row);
    }

    pub fn find_column(&self, name: &str) -> Option<&IesColumn> {
        self.columns.iter().find(|column| column.name() == name)
    }

    /// Columns in row-value order: numeric columns first, then string
    /// columns, each group by position. The sort is stable.
    pub fn sorted_columns(&self) -> Vec<&IesColumn> {
        let mut sorted: Vec<&IesColumn> = self.columns.iter().collect();
        sorted.sort_by_key(|column| (!column.is_number(), column.position()));

        sorted
    }

}
