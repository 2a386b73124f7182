//! Atomic output files.

use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::core::manifest::ManifestError;
use crate::utils::validation::check_output_path;

/// Write `path` through a temporary file in the same directory, renaming it
/// into place only after `write` succeeds.
///
/// Without `force` an existing file is never replaced, including one that
/// appears while writing.
///
/// # Errors
///
/// Returns `ManifestError::OutputExists` if `path` exists and `force` is false,
/// errors from `write`, or `ManifestError::Io` if the rename fails. The
/// temporary file is removed on every error path.
pub fn write_atomically<F>(path: &Path, force: bool, write: F) -> Result<(), ManifestError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), ManifestError>,
{
    check_output_path(path, force)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;

    // NamedTempFile creates files as 0600
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))?;
    }

    let persisted = if force {
        temp.persist(path)
    } else {
        temp.persist_noclobber(path)
    };
    persisted.map_err(|e| persist_error(path, e.error))?;
    Ok(())
}

/// An output that appeared while writing is reported like one found up front
fn persist_error(path: &Path, error: std::io::Error) -> ManifestError {
    if error.kind() == std::io::ErrorKind::AlreadyExists {
        ManifestError::OutputExists(path.display().to_string())
    } else {
        ManifestError::Io(error)
    }
}
