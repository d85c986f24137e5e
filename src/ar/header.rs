use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::{ArError, Result};

/// Global archive signature.
pub const SIGNATURE: &[u8; 8] = b"!<arch>\n";

/// Size of a member header in bytes.
pub const HEADER_SIZE: usize = 60;

/// End marker closing every member header.
pub const TERMINATOR: &[u8; 2] = b"`\n";

/// Byte used to pad odd-sized payloads.
pub const PADDING: u8 = b'\n';

/// Check that `data` is the ar signature.
pub fn validate_signature(data: &[u8]) -> Result<()> {
    if data != SIGNATURE {
        return Err(ArError::format("not an ar archive"));
    }
    Ok(())
}

/// Decoded fixed-width member header.
///
/// ```text
///  0       16          28    34    40      48        58 60
///  | name  | mtime     | uid | gid | mode  | size    |`\n|
/// ```
///
/// Every numeric field is space padded decimal text. `mode` is kept as the
/// decimal value of its digits; see [`MemberHeader::permissions`] for the
/// conventional octal reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberHeader {
    pub name: String,
    pub mtime: SystemTime,
    pub uid: u32,
    pub gid: u32,
    pub mode: u32,
    pub size: u64,
    pub terminator: [u8; 2],
}

impl MemberHeader {
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() != HEADER_SIZE {
            return Err(ArError::format(format!(
                "member header must be {} bytes, got {}",
                HEADER_SIZE,
                data.len()
            )));
        }

        let name = parse_name(&data[0..16])?;
        let mtime = parse_decimal("modification time", &data[16..28])?;
        let uid = parse_decimal("owner id", &data[28..34])?;
        let gid = parse_decimal("group id", &data[34..40])?;
        let mode = parse_decimal("file mode", &data[40..48])?;
        let size = parse_decimal("file size", &data[48..58])?;

        Ok(Self {
            name,
            mtime: UNIX_EPOCH + Duration::from_secs(mtime),
            // The field widths keep these well inside u32.
            uid: uid as u32,
            gid: gid as u32,
            mode: mode as u32,
            size,
            terminator: [data[58], data[59]],
        })
    }

    pub fn has_valid_terminator(&self) -> bool {
        &self.terminator == TERMINATOR
    }

    /// Modification time as seconds since the Unix epoch.
    pub fn mtime_secs(&self) -> u64 {
        self.mtime
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    /// The mode digits read as octal, e.g. `100644` becomes `0o100644`.
    ///
    /// Returns `None` when a digit is 8 or 9.
    pub fn permissions(&self) -> Option<u32> {
        u32::from_str_radix(&self.mode.to_string(), 8).ok()
    }
}

fn parse_name(raw: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(raw)
        .map_err(|_| ArError::format(format!("member name is not valid text: {:?}", raw)))?;
    let name = text.trim_end_matches([' ', '\n']);
    if name.is_empty() {
        return Err(ArError::format("member name is empty"));
    }

    if name.starts_with("#1/") {
        return Err(ArError::Unsupported(format!(
            "BSD extended member name {:?}",
            name
        )));
    }
    if name.len() > 1 && name.starts_with('/') && name.as_bytes()[1].is_ascii_digit() {
        return Err(ArError::Unsupported(format!(
            "GNU long member name reference {:?}",
            name
        )));
    }

    // GNU ar terminates names with '/'; "/" and "//" are table names.
    let name = match name {
        "/" | "//" => name,
        _ => name.strip_suffix('/').unwrap_or(name),
    };
    Ok(name.to_string())
}

// Space padded ASCII digits only; no sign.
fn parse_decimal(field: &str, raw: &[u8]) -> Result<u64> {
    std::str::from_utf8(raw)
        .ok()
        .map(str::trim)
        .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(|| {
            ArError::format(format!(
                "invalid {} {:?}",
                field,
                String::from_utf8_lossy(raw)
            ))
        })
}

/// Build a header record. Fields that overflow their width are truncated.
#[cfg(test)]
pub(crate) fn encode_header(name: &str, mtime: u64, uid: u32, gid: u32, mode: u32, size: u64) -> Vec<u8> {
    let mut out = format!(
        "{:<16}{:<12}{:<6}{:<6}{:<8}{:<10}",
        name, mtime, uid, gid, mode, size
    )
    .into_bytes();
    out.truncate(HEADER_SIZE - 2);
    out.extend_from_slice(TERMINATOR);
    out
}
