//! In-memory ZIP extraction into a package directory.

use crate::error::InstallError;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::trace;
use zip::ZipArchive;

/// Extract a ZIP payload into `target`, stripping the archive's leading
/// path component (registry archives wrap their content in a
/// `vendor-package-hash/` root directory).
///
/// Entry names are sanitized against traversal and entries whose
/// stripped path is empty are skipped. File modes are preserved on Unix.
///
/// Returns the number of files written.
pub(crate) fn extract_zip(name: &str, data: &[u8], target: &Path) -> Result<usize, InstallError> {
    let archive_invalid = |message: String| InstallError::ArchiveInvalid {
        name: name.to_string(),
        message,
    };

    let mut archive =
        ZipArchive::new(Cursor::new(data)).map_err(|e| archive_invalid(e.to_string()))?;

    fs::create_dir_all(target).map_err(|e| InstallError::io(target, &e))?;

    let mut files_written = 0;
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| archive_invalid(e.to_string()))?;

        let Some(relative) = stripped_entry_path(entry.name()) else {
            continue;
        };
        let out_path = target.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| InstallError::io(&out_path, &e))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| InstallError::io(parent, &e))?;
        }

        let mut out_file =
            fs::File::create(&out_path).map_err(|e| InstallError::io(&out_path, &e))?;
        std::io::copy(&mut entry, &mut out_file)
            .map_err(|e| InstallError::io(&out_path, &e))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&out_path, fs::Permissions::from_mode(mode));
        }

        trace!(file = %out_path.display(), "extracted");
        files_written += 1;
    }

    Ok(files_written)
}

/// Sanitize an entry name and strip its first path component.
///
/// Returns `None` when nothing remains (the archive's root directory
/// entry, or a top-level file outside the wrapped root).
fn stripped_entry_path(entry_name: &str) -> Option<PathBuf> {
    let normalized = entry_name.replace('\\', "/");
    let mut components = normalized
        .split('/')
        .filter(|part| !part.is_empty() && *part != "." && *part != "..");
    components.next()?;
    let rest: PathBuf = components.collect();
    if rest.as_os_str().is_empty() {
        None
    } else {
        Some(rest)
    }
}
