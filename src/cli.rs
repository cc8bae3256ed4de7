use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "transmission-check")]
#[command(version, about = "Check and repair Transmission .resume files", long_about = None)]
pub struct Cli {
    /// Make changes on the resume file
    #[arg(short, long)]
    pub make_changes: bool,

    /// Search and replace a substring in the destination path
    #[arg(short, long, num_args = 2, value_names = ["OLD", "NEW"])]
    pub replace: Option<Vec<OsString>>,

    /// Display information about the resume file
    #[arg(short, long)]
    pub verbose: bool,

    /// The .resume file to check
    pub resume_file: PathBuf,
}

impl Cli {
    pub fn replacement(&self) -> Option<(&OsStr, &OsStr)> {
        match self.replace.as_deref() {
            Some([old, new]) => Some((old.as_os_str(), new.as_os_str())),
            _ => None,
        }
    }
}
