//! Main entry point for the runar CLI application.
//!
//! This binary lists and extracts members of ar archives and Debian
//! packages from both local filesystem and remote HTTP URLs.

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::Path;
use tracing::{Level, warn};

use runar::display::{format_mode, format_mtime, format_size};
use runar::extract::{ExtractOptions, Outcome, SkipReason, extract_to_dir, write_to_pipe};
use runar::select::{has_glob_chars, is_selected};
use runar::{ArchiveReader, Cli, Member, ReadAt};

/// Application entry point.
///
/// Parses command-line arguments and dispatches to the appropriate handler
/// based on whether the input is a local file or HTTP URL.
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr so piped member data stays clean
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.is_very_quiet() {
        Level::ERROR
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let options = cli.archive_options();

    if cli.is_http_url() {
        // Handle remote archive via HTTP Range requests
        let mut archive = ArchiveReader::open_url(&cli.file, options)
            .with_context(|| format!("failed to open {}", cli.file))?;
        let transferred_before = archive.source()?.transferred_bytes();

        process_archive(&mut archive, &cli)?;

        // Display network transfer statistics for HTTP sources
        if !cli.is_quiet() {
            let transferred = archive.source()?.transferred_bytes() - transferred_before;
            eprintln!("\nTotal bytes transferred: {}", format_size(transferred));
        }
    } else {
        // Handle local archive
        let mut archive = ArchiveReader::open(Path::new(&cli.file), options)
            .with_context(|| format!("failed to open {}", cli.file))?;
        process_archive(&mut archive, &cli)?;
    }

    Ok(())
}

/// Process an archive based on CLI options.
///
/// This function handles both listing and extraction modes:
/// - List mode (`-l` or `-v`): Display archive contents
/// - Extract mode: Extract members matching the requested names
///
/// # Arguments
///
/// * `archive` - An open archive over any `ReadAt` source
/// * `cli` - Parsed command-line arguments
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if decoding or writing fails.
fn process_archive<R: ReadAt>(archive: &mut ArchiveReader<R>, cli: &Cli) -> Result<()> {
    // List mode: display archive contents and exit
    if cli.list || cli.verbose {
        return list_members(archive, cli.verbose);
    }

    // Extract mode: keep requested members minus exclusions
    let members = archive.members()?;
    let selected: Vec<&Member> = members
        .values()
        .filter(|m| is_selected(m.name(), &cli.members, &cli.exclude))
        .collect();

    // Exact names that matched nothing are worth a warning; globs are not
    for requested in &cli.members {
        if !members.contains_key(requested.as_str()) && !has_glob_chars(requested) {
            warn!(member = %requested, "not found in archive");
        }
    }

    let options = cli.extract_options();
    let multiple_members = cli.pipe && selected.len() > 1;
    for member in selected {
        extract_member(member, cli, &options, multiple_members)?;
    }

    Ok(())
}

/// List members of the archive.
///
/// Supports two output formats:
/// - Simple format (`-l`): Just member names, one per line
/// - Verbose format (`-v`): Mode, owner, size and modification time
///
/// # Arguments
///
/// * `archive` - The archive to list
/// * `verbose` - If true, display detailed information in table format
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if the members cannot be decoded.
fn list_members<R: ReadAt>(archive: &mut ArchiveReader<R>, verbose: bool) -> Result<()> {
    let members = archive.members()?;

    if verbose {
        // Print table header for verbose output
        println!(
            "{:>9}  {:>11}  {:>10}  {:>16}  Name",
            "Mode", "Uid/Gid", "Size", "Modified"
        );
        println!("{}", "-".repeat(70));
    }

    // Track total payload size for the summary line
    let mut total_size = 0u64;

    for member in members.values() {
        if verbose {
            println!(
                "{}  {:>11}  {:>10}  {}  {}",
                format_mode(member.mode(), member.permissions()),
                format!("{}/{}", member.uid(), member.gid()),
                member.size(),
                format_mtime(member.mtime()),
                member.name()
            );
            total_size += member.size();
        } else {
            println!("{}", member.name());
        }
    }

    if verbose {
        // Print summary line
        println!("{}", "-".repeat(70));
        println!(
            "{:>9}  {:>11}  {:>10}  {:>16}  {} members",
            "",
            "",
            total_size,
            "",
            members.len()
        );
    }

    Ok(())
}

/// Extract a single member.
///
/// Handles several extraction modes:
/// - Pipe mode (`-p`): Write to stdout instead of file
/// - Custom output directory (`-d`): Extract to specified directory
/// - Gunzip (`-z`): Decompress `.gz` members and drop the suffix
/// - Overwrite control (`-n`, `-o`): Handle existing files
///
/// # Arguments
///
/// * `member` - The member to extract
/// * `cli` - Parsed command-line arguments
/// * `options` - Extraction settings derived from `cli`
/// * `show_name` - If true (pipe mode with several members), print a
///   `--- name ---` line before the payload
///
/// # Returns
///
/// Returns `Ok(())` on success or when the member is skipped, or an error if
/// writing fails.
fn extract_member(
    member: &Member,
    cli: &Cli,
    options: &ExtractOptions,
    show_name: bool,
) -> Result<()> {
    // Pipe mode: write payload to stdout
    if cli.pipe {
        let mut stdout = io::stdout().lock();
        write_to_pipe(member, options.gunzip, show_name, &mut stdout)
            .with_context(|| format!("failed to write {}", member.name()))?;
        return Ok(());
    }

    let outcome = extract_to_dir(member, options)
        .with_context(|| format!("failed to extract {}", member.name()))?;

    // Report what happened unless quiet mode is enabled
    match outcome {
        Outcome::Extracted(_) => {
            if !cli.is_quiet() {
                println!("  extracting: {}", member.name());
            }
        }
        Outcome::Skipped(SkipReason::NoFileName) => {
            warn!(member = %member.name(), "skipping member without a usable file name");
        }
        Outcome::Skipped(SkipReason::Exists) => {
            if !cli.is_quiet() {
                eprintln!("Skipping: {} (file exists)", member.name());
            }
        }
        Outcome::Skipped(SkipReason::NeedsOverwrite) => {
            if !cli.is_quiet() {
                eprintln!("Skipping: {} (use -o to overwrite)", member.name());
            }
        }
    }

    Ok(())
}
