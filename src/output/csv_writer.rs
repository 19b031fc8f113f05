//! CSV output
//!
//! The file is UTF-8 with a byte-order mark, so spreadsheet tools pick the
//! right encoding for party and municipality names. It is written to a
//! temporary file next to the destination and renamed over it only once
//! complete: a failed write never leaves a partial file, and never touches an
//! existing one.

use crate::crawler::ResultTable;
use crate::output::OutputResult;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// UTF-8 byte-order mark written at the start of every file
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes `table` as CSV to `path`, replacing any existing file atomically
///
/// # Arguments
///
/// * `table` - The aggregated results
/// * `path` - Destination file; its directory must exist
///
/// # Returns
///
/// * `Ok(())` - The file is in place
/// * `Err(OutputError)` - Nothing was written to `path`
pub fn write_csv(table: &ResultTable, path: &Path) -> OutputResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    write_table(table, temp.as_file_mut())?;
    temp.as_file().sync_all()?;

    // Temporary files are created owner-only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(temp.path(), std::fs::Permissions::from_mode(0o644))?;
    }

    temp.persist(path)?;
    tracing::debug!("Wrote {} rows to {}", table.rows().len(), path.display());
    Ok(())
}

/// Writes the BOM, the header and every record of `table` to `writer`
pub fn write_table<W: Write>(table: &ResultTable, mut writer: W) -> OutputResult<()> {
    writer.write_all(UTF8_BOM)?;

    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(table.header())?;
    for record in table.records() {
        csv.write_record(&record)?;
    }
    csv.flush()?;

    Ok(())
}

/// Renders `table` as it would be written to disk, BOM included
pub fn to_csv_string(table: &ResultTable) -> OutputResult<String> {
    let mut buffer = Vec::new();
    write_table(table, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}
