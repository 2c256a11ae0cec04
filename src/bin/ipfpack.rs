/*
 * Created on Fri Mar 12 2021
 *
 * Copyright (c) storycraft. Licensed under the Apache Licence 2.0.
 */

use std::{path::PathBuf, process};

use clap::Parser;

use ipf::{archive::IpfArchive, IpfError};

#[derive(Debug, Parser)]
#[command(name = "ipfpack", version, about = "Build an IPF archive from a folder")]
struct Cli {
    /// Input folder.
    folder: PathBuf,

    /// Output archive path. Defaults to {new_version}_001001.ipf.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// New version stamped into the footer. Versions above 11000 (and
    /// version 0) produce encrypted payloads.
    #[arg(long = "nv", default_value_t = 1_000_000)]
    new_version: u32,

    /// Old version stamped into the footer.
    #[arg(long = "ov", default_value_t = 0)]
    old_version: u32,

    /// Single pack name for the whole folder. When absent, every *.ipf
    /// subfolder becomes its own pack.
    #[arg(short = 'p', long = "pack")]
    pack: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), IpfError> {
    let mut archive = IpfArchive::create(cli.old_version, cli.new_version);

    let added = match cli.pack.as_deref() {
        Some(pack) => archive.add_folder_pack(pack, &cli.folder)?,
        None => archive.add_folder(&cli.folder)?,
    };

    let output = cli
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}_001001.ipf", cli.new_version)));

    archive.save(&output)?;

    println!("{}: {} files", output.display(), added);

    Ok(())
}
