use clap::Parser;
use std::path::PathBuf;

use crate::ar::{ArchiveOptions, Compatibility, DEFAULT_BUFFER_SIZE};
use crate::extract::ExtractOptions;

#[derive(Parser, Debug)]
#[command(name = "runar")]
#[command(version)]
#[command(about = "A Rust ar/.deb reader with HTTP URL support", long_about = None)]
#[command(after_help = "Examples:\n  \
  runar -l hello_1.0_all.deb                 list members of a package\n  \
  runar -p pkg.deb debian-binary             print the package format version\n  \
  runar -z -d out pkg.deb 'control.tar.*'    extract and gunzip the control archive\n  \
  runar -v https://example.com/pkg.deb       list members of a remote package")]
pub struct Cli {
    /// Archive path or HTTP URL
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Members to extract (default: all)
    #[arg(value_name = "MEMBERS")]
    pub members: Vec<String>,

    /// List members (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List verbosely
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Extract members to pipe, no messages
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Extract members into exdir
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<String>,

    /// Exclude members that follow
    #[arg(short = 'x', value_name = "MEMBER", num_args = 1..)]
    pub exclude: Vec<String>,

    /// Never overwrite existing files
    #[arg(short = 'n')]
    pub never_overwrite: bool,

    /// Overwrite files WITHOUT prompting
    #[arg(short = 'o')]
    pub overwrite: bool,

    /// Decompress .gz members while extracting
    #[arg(short = 'z')]
    pub gunzip: bool,

    /// Read members packed without alignment padding
    #[arg(long)]
    pub legacy: bool,

    /// Read-ahead buffer size in bytes
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_BUFFER_SIZE)]
    pub buffer_size: usize,

    /// Log parsing details to stderr
    #[arg(long)]
    pub debug: bool,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_http_url(&self) -> bool {
        self.file.starts_with("http://") || self.file.starts_with("https://")
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.pipe
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    pub fn archive_options(&self) -> ArchiveOptions {
        let compatibility = if self.legacy {
            Compatibility::Legacy
        } else {
            Compatibility::Strict
        };
        ArchiveOptions::default()
            .with_buffer_size(self.buffer_size)
            .with_compatibility(compatibility)
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            dir: self.extract_dir.as_ref().map(PathBuf::from),
            gunzip: self.gunzip,
            never_overwrite: self.never_overwrite,
            overwrite: self.overwrite,
        }
    }
}
