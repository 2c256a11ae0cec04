/*
 * Created on Thu Mar 11 2021
 *
 * Copyright (c) storycraft. Licensed under the Apache Licence 2.0.
 */

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::stream::read_xored_lp_string;

use super::{
    column::IesColumn,
    file::{IesFile, IesHeader},
    row::{IesRow, IesValue},
    IesError, IesErrorKind
};

pub struct IesReader;

impl IesReader {

    /// Read a whole table from a seekable stream. The column table and row
    /// region are located backwards from the stream end via the header
    /// size fields.
    pub fn read<T: Read + Seek>(stream: &mut T) -> Result<IesFile, IesError> {
        stream.seek(SeekFrom::Start(0))?;
        let (_, header) = IesHeader::from_bytes(stream)?;

        let number = header.number_column_count() as u32;
        let string = header.string_column_count() as u32;
        if number + string != header.column_count() as u32 {
            return Err(IesError::new(IesErrorKind::InvalidHeader, None));
        }

        let columns = Self::read_columns(stream, &header)?;
        let rows = Self::read_rows(stream, &header, &columns)?;

        let mut file = IesFile::new(header);
        *file.columns_mut() = columns;
        *file.rows_mut() = rows;

        Ok(file)
    }

    fn read_columns<T: Read + Seek>(
        stream: &mut T,
        header: &IesHeader
    ) -> Result<Vec<IesColumn>, IesError> {
        stream.seek(SeekFrom::End(
            -(header.resource_offset() as i64) - header.data_offset() as i64
        ))?;

        let mut columns: Vec<IesColumn> = Vec::with_capacity(header.column_count() as usize);
        for _ in 0..header.column_count() {
            let (_, mut column) = IesColumn::from_bytes(stream)?;

            // Collisions are renamed in read order.
            column.set_name(dedup_name(column.name(), &columns));
            columns.push(column);
        }

        columns.sort();

        Ok(columns)
    }

    fn read_rows<T: Read + Seek>(
        stream: &mut T,
        header: &IesHeader,
        columns: &[IesColumn]
    ) -> Result<Vec<IesRow>, IesError> {
        stream.seek(SeekFrom::End(-(header.resource_offset() as i64)))?;

        let mut rows = Vec::with_capacity(header.row_count() as usize);
        for _ in 0..header.row_count() {
            let class_id = stream.read_i32::<LittleEndian>()?;
            let class_name = read_xored_lp_string(stream)?;

            let mut row = IesRow::new(class_id, class_name);
            for column in columns.iter() {
                let value = if column.is_number() {
                    IesValue::Number(stream.read_f32::<LittleEndian>()?)
                } else {
                    IesValue::Text(read_xored_lp_string(stream)?)
                };

                row.set(column.name(), value);
            }

            // Script flag region, one byte per string column. Discarded.
            stream.seek(SeekFrom::Current(header.string_column_count() as i64))?;

            rows.push(row);
        }

        Ok(rows)
    }

}

fn dedup_name(name: &str, columns: &[IesColumn]) -> String {
    let taken = |candidate: &str| {
        columns.iter().any(|column| column.name() == candidate)
    };

    if !taken(name) {
        return name.to_string();
    }

    let mut suffix = 1;
    loop {
        let candidate = format!("{}_{}", name, suffix);
        if !taken(&candidate) {
            return candidate;
        }

        suffix += 1;
    }
}
