/*
 * Created on Tue Mar 9 2021
 *
 * Copyright (c) storycraft. Licensed under the Apache Licence 2.0.
 */

//! Directory ingestion into a synthetic archive.

use std::{fs, io, path::Path};

use walkdir::WalkDir;

use super::{archive::IpfArchive, IpfError};

impl IpfArchive {

    /// Ingest every file under `folder` into the pack `pack_name`. Entry
    /// paths are relative to `folder` with forward slashes. Returns the
    /// number of files added.
    pub fn add_folder_pack(&mut self, pack_name: &str, folder: &Path) -> Result<usize, IpfError> {
        let mut added = 0;

        for dir_entry in WalkDir::new(folder).follow_links(false).sort_by_file_name() {
            let dir_entry = dir_entry.map_err(walkdir_error)?;
            if !dir_entry.file_type().is_file() {
                continue;
            }

            let relative = dir_entry
                .path()
                .strip_prefix(folder)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

            let path = relative_key(relative);
            let content = fs::read(dir_entry.path())?;

            self.add_file(pack_name, &path, content);
            added += 1;
        }

        Ok(added)
    }

    /// Ingest every `*.ipf`-named child directory of `parent` as its own
    /// pack, named after the directory. Returns the number of files added.
    pub fn add_folder(&mut self, parent: &Path) -> Result<usize, IpfError> {
        let mut added = 0;

        for dir_entry in fs::read_dir(parent)? {
            let dir_entry = dir_entry?;
            if !dir_entry.file_type()?.is_dir() {
                continue;
            }

            let name = dir_entry.file_name().to_string_lossy().into_owned();
            if !name.to_ascii_lowercase().ends_with(".ipf") {
                continue;
            }

            added += self.add_folder_pack(&name, &dir_entry.path())?;
        }

        Ok(added)
    }

}

fn relative_key(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn walkdir_error(err: walkdir::Error) -> IpfError {
    let message = err.to_string();
    let io = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, message));

    IpfError::from(io)
}
