//! Writing member payloads to disk or to a stream.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::debug;

use crate::ar::{Compression, Member};
use crate::error::Result;

/// Where and how members are written.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Output directory; the working directory when `None`.
    pub dir: Option<PathBuf>,
    /// Decompress `.gz` members and drop the suffix.
    pub gunzip: bool,
    /// Never replace an existing file.
    pub never_overwrite: bool,
    /// Replace existing files.
    pub overwrite: bool,
}

/// Why a member was not written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The name has no final path component, e.g. `..` or `/`.
    NoFileName,
    /// The target exists and `never_overwrite` is set.
    Exists,
    /// The target exists and `overwrite` is not set.
    NeedsOverwrite,
}

/// Result of [`extract_to_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Extracted(PathBuf),
    Skipped(SkipReason),
}

/// Whether the payload of `member` goes through the gzip decoder.
pub fn decompresses(member: &Member, gunzip: bool) -> bool {
    gunzip && member.compression() == Compression::Gzip
}

/// File name a member is written under.
///
/// Member names are flat, so anything path-like is reduced to its last
/// component. With `gunzip`, a `.gz` suffix is dropped from gzip members.
///
/// # Returns
///
/// `None` when the name has no usable final component.
pub fn output_name(member: &Member, gunzip: bool) -> Option<String> {
    let file_name = Path::new(member.name()).file_name()?;
    let file_name = file_name.to_string_lossy().into_owned();
    if decompresses(member, gunzip) {
        if let Some(stem) = file_name.strip_suffix(".gz") {
            if !stem.is_empty() {
                return Some(stem.to_string());
            }
        }
    }
    Some(file_name)
}

/// Extract a member into the output directory.
///
/// # Arguments
///
/// * `member` - The member to write
/// * `options` - Output directory, gunzip and overwrite policy
///
/// # Returns
///
/// The path written, or why the member was skipped. An existing target is
/// only replaced when `overwrite` is set and `never_overwrite` is not.
pub fn extract_to_dir(member: &Member, options: &ExtractOptions) -> Result<Outcome> {
    let Some(file_name) = output_name(member, options.gunzip) else {
        return Ok(Outcome::Skipped(SkipReason::NoFileName));
    };

    let output_path = match options.dir {
        Some(ref dir) => dir.join(&file_name),
        None => PathBuf::from(&file_name),
    };

    if output_path.exists() {
        if options.never_overwrite {
            return Ok(Outcome::Skipped(SkipReason::Exists));
        }
        if !options.overwrite {
            return Ok(Outcome::Skipped(SkipReason::NeedsOverwrite));
        }
    }

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = fs::File::create(&output_path)?;
    copy_payload(member, decompresses(member, options.gunzip), &mut file)?;
    debug!(member = %member.name(), path = %output_path.display(), "extracted");

    Ok(Outcome::Extracted(output_path))
}

/// Write a member to a stream, preceded by a `--- name ---` line when
/// `show_name` is set.
pub fn write_to_pipe(
    member: &Member,
    gunzip: bool,
    show_name: bool,
    out: &mut impl Write,
) -> Result<()> {
    if show_name {
        writeln!(out, "--- {} ---", member.name())?;
    }
    copy_payload(member, decompresses(member, gunzip), out)?;
    out.flush()?;
    Ok(())
}

fn copy_payload(member: &Member, gunzip: bool, out: &mut impl Write) -> Result<u64> {
    let mut input: Box<dyn Read + '_> = if gunzip {
        Box::new(GzDecoder::new(member.reader()))
    } else {
        Box::new(member.reader())
    };
    Ok(io::copy(&mut input, out)?)
}
