/*
 * Created on Thu Mar 11 2021
 *
 * Copyright (c) storycraft. Licensed under the Apache Licence 2.0.
 */

use std::io::{Cursor, Seek, SeekFrom};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::stream::write_xored_lp_string;

use super::{
    file::IesFile,
    row::IesValue,
    IesError, IesErrorKind, IES_COLUMN_SIZE, IES_SIZE_FIELD_OFFSET
};

pub struct IesWriter;

impl IesWriter {

    /// Serialize a whole table. The column table keeps the file's column
    /// order; row cells are written numeric-first by position. The header
    /// size fields are patched once the row region extent is known.
    pub fn write(file: &IesFile) -> Result<Vec<u8>, IesError> {
        let columns = file.columns();
        let rows = file.rows();

        if columns.len() > u16::MAX as usize || rows.len() > u16::MAX as usize {
            return Err(IesError::new(IesErrorKind::InvalidHeader, None));
        }

        let sorted = file.sorted_columns();
        let number_count = columns.iter().filter(|column| column.is_number()).count() as u16;
        let string_count = columns.len() as u16 - number_count;

        let mut header = file.header().clone();
        header.set_counts(rows.len() as u16, number_count, string_count);

        let mut stream = Cursor::new(Vec::<u8>::new());
        header.write_bytes(&mut stream)?;

        for column in columns.iter() {
            column.write_bytes(&mut stream)?;
        }

        let rows_start = stream.seek(SeekFrom::Current(0))?;

        for row in rows.iter() {
            stream.write_i32::<LittleEndian>(row.class_id())?;
            write_xored_lp_string(&mut stream, row.class_name())?;

            for column in sorted.iter() {
                match row.get(column.name()) {
                    Some(IesValue::Number(value)) if column.is_number() => {
                        stream.write_f32::<LittleEndian>(*value)?;
                    },

                    Some(IesValue::Text(value)) if !column.is_number() => {
                        write_xored_lp_string(&mut stream, value)?;
                    },

                    Some(_) => return Err(IesError::new(IesErrorKind::TypeMismatch, None)),

                    // Absent cells serialize as zero / empty.
                    None if column.is_number() => stream.write_f32::<LittleEndian>(0.0)?,
                    None => stream.write_u16::<LittleEndian>(0)?
                }
            }

            for column in sorted.iter().filter(|column| !column.is_number()) {
                stream.write_u8(row.use_scr(column.name()) as u8)?;
            }
        }

        let end = stream.seek(SeekFrom::Current(0))?;

        let data_offset = columns.len() as u32 * IES_COLUMN_SIZE;
        let resource_offset = (end - rows_start) as u32;
        let file_size = end as u32;

        stream.seek(SeekFrom::Start(IES_SIZE_FIELD_OFFSET))?;
        stream.write_u32::<LittleEndian>(data_offset)?;
        stream.write_u32::<LittleEndian>(resource_offset)?;
        stream.write_u32::<LittleEndian>(file_size)?;

        Ok(stream.into_inner())
    }

}
