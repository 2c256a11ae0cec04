/*
 * Created on Tue Mar 9 2021
 *
 * Copyright (c) storycraft. Licensed under the Apache Licence 2.0.
 */

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf}
};

use super::{
    archive::IpfArchive,
    codec,
    crc::crc32,
    entry::EntryData,
    IpfError, IpfErrorKind
};

pub struct IpfWriter;

impl IpfWriter {

    /// Rewrite `archive` at `path`: payload region in entry order, file
    /// table, footer. Written through a temp file in the target directory;
    /// any failure removes the temp file and leaves the target untouched.
    ///
    /// Returns true when the archive overwrote its own source. The read
    /// handle is released first in that case and the caller must reopen.
    pub fn save_archive(archive: &mut IpfArchive, path: &Path) -> Result<bool, IpfError> {
        let temp_path = temp_path_for(path);

        if let Err(err) = Self::write_archive(archive, &temp_path) {
            let _ = fs::remove_file(&temp_path);

            return Err(err);
        }

        let overwrites_source = archive
            .source_path()
            .map(|source| same_file(source, path))
            .unwrap_or(false);

        if overwrites_source {
            // Release the read handle before replacing the file under it.
            archive.close();
        }

        // Renaming over the target replaces it atomically; a failure here
        // leaves the previous archive intact.
        if let Err(err) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);

            return Err(err.into());
        }

        Ok(overwrites_source)
    }

    fn write_archive(archive: &mut IpfArchive, temp_path: &Path) -> Result<(), IpfError> {
        if archive.entries().len() > u16::MAX as usize {
            return Err(IpfError::new(IpfErrorKind::InvalidFileTable, None));
        }

        let mut stream = BufWriter::new(File::create(temp_path)?);

        let new_version = archive.footer().new_version();
        let entry_count = archive.entries().len();

        // Stored range of every entry in the file being written.
        let mut records: Vec<(u32, u32)> = Vec::with_capacity(entry_count);
        let mut position: u64 = 0;

        for index in 0..entry_count {
            let stored = {
                let entry = &archive.entries()[index];

                match entry.data() {
                    EntryData::Stored { offset, size_compressed } => {
                        let source = archive
                            .source()
                            .ok_or_else(|| IpfError::new(IpfErrorKind::Closed, None))?;

                        source.read_exact_at(*offset as u64, *size_compressed as usize)?
                    },

                    EntryData::Pending(content) => codec::pack(entry, content, new_version)?
                }
            };

            stream.write_all(&stored)?;

            let entry = &mut archive.entries_mut()[index];
            if entry.modified() {
                entry.set_checksum(crc32(0, &stored));
            } else {
                entry.set_stored(position as u32, stored.len() as u32);
            }

            records.push((position as u32, stored.len() as u32));
            position += stored.len() as u64;
        }

        let file_table_offset = position as u32;

        for (index, record) in records.iter().enumerate() {
            archive.entries()[index].write_record(&mut stream, record.0, record.1)?;
        }

        archive.footer_mut().set_file_count(entry_count as u16);
        archive.footer_mut().set_file_table_offset(file_table_offset);
        archive.footer().write_bytes(&mut stream)?;

        stream.flush()?;

        Ok(())
    }

}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    path.with_file_name(format!("~{}", name))
}

/// Whether both paths name the same file. Spelling differences (relative
/// components, links) are resolved through canonicalization; paths that
/// cannot be canonicalized (e.g. a target that does not exist yet) fall
/// back to plain comparison.
fn same_file(source: &Path, target: &Path) -> bool {
    match (fs::canonicalize(source), fs::canonicalize(target)) {
        (Ok(source), Ok(target)) => source == target,

        _ => source == target
    }
}
