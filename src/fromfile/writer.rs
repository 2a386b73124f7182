//! Manifest serialization.
//!
//! Headers are fixed by the downstream sketching tool and must not change:
//!
//! ```text
//! fromfile: ident,name,genome_filename,protein_filename
//! files:    ident,name,filepath,md5,moltype
//! ```

use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::core::manifest::{Manifest, ManifestError};
use crate::core::types::ManifestLayout;
use crate::utils::output::write_atomically;

/// Serialize a manifest to any writer.
///
/// # Errors
///
/// Returns `ManifestError::InvalidInput` for paths that are not valid UTF-8,
/// or `ManifestError::Csv` if writing fails.
pub fn write_manifest<W: Write>(
    manifest: &Manifest,
    layout: ManifestLayout,
    writer: W,
) -> Result<(), ManifestError> {
    let mut w = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    w.write_record(layout.header())?;

    for row in manifest.rows() {
        match layout {
            ManifestLayout::Fromfile => {
                let genome = row.genome.as_ref().map(|f| path_str(&f.path)).transpose()?;
                let protein = row.protein.as_ref().map(|f| path_str(&f.path)).transpose()?;
                w.write_record([
                    row.ident.as_str(),
                    row.name.as_str(),
                    genome.unwrap_or_default(),
                    protein.unwrap_or_default(),
                ])?;
            }
            ManifestLayout::Files => {
                for (moltype, file) in row.files() {
                    w.write_record([
                        row.ident.as_str(),
                        row.name.as_str(),
                        path_str(&file.path)?,
                        file.md5.as_deref().unwrap_or_default(),
                        moltype.label(),
                    ])?;
                }
            }
        }
    }

    w.flush()?;
    Ok(())
}

/// Write a manifest to `path` atomically.
///
/// # Errors
///
/// Returns `ManifestError::OutputExists` if `path` exists and `force` is false,
/// or errors from [`write_manifest`].
pub fn write_manifest_file(
    manifest: &Manifest,
    layout: ManifestLayout,
    path: &Path,
    force: bool,
) -> Result<(), ManifestError> {
    write_atomically(path, force, |w| write_manifest(manifest, layout, w))?;
    info!(
        "wrote {} entries ({} files) to '{}'",
        manifest.len(),
        manifest.file_count(),
        path.display()
    );
    Ok(())
}

fn path_str(path: &Path) -> Result<&str, ManifestError> {
    path.to_str()
        .ok_or_else(|| ManifestError::invalid_input(path, "path is not valid UTF-8"))
}
