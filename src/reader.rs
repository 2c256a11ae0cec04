/*
 * Created on Sun Mar 7 2021
 *
 * Copyright (c) storycraft. Licensed under the Apache Licence 2.0.
 */

use std::io::{Read, Seek, SeekFrom};

use super::{entry::{EntryData, IpfFileEntry}, footer::IpfFooter, IpfError, IpfErrorKind, IPF_FOOTER_SIZE};

pub struct IpfReader;

impl IpfReader {

    /// Read container metadata: the footer at the end of the stream, then
    /// the file table it points at. The stream position is left
    /// unspecified.
    pub fn read_container<T: Read + Seek>(
        stream: &mut T
    ) -> Result<(IpfFooter, Vec<IpfFileEntry>), IpfError> {
        let length = stream.seek(SeekFrom::End(0))?;
        if length < IPF_FOOTER_SIZE {
            return Err(IpfError::new(IpfErrorKind::InvalidFooter, None));
        }

        stream.seek(SeekFrom::End(-(IPF_FOOTER_SIZE as i64)))?;
        let (_, footer) = IpfFooter::from_bytes(stream)?;

        let table_offset = footer.file_table_offset() as u64;
        if table_offset > length - IPF_FOOTER_SIZE {
            return Err(IpfError::new(IpfErrorKind::InvalidFileTable, None));
        }

        stream.seek(SeekFrom::Start(table_offset))?;

        let mut entries = Vec::with_capacity(footer.file_count() as usize);
        for _ in 0..footer.file_count() {
            let (_, entry) = IpfFileEntry::from_bytes(stream)?;

            // Payloads live below the file table.
            if let EntryData::Stored { offset, size_compressed } = entry.data() {
                if *offset as u64 + *size_compressed as u64 > table_offset {
                    return Err(IpfError::new(IpfErrorKind::InvalidFileTable, None));
                }
            }

            entries.push(entry);
        }

        Ok((footer, entries))
    }

}
