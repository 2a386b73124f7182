use std::path::Path;

use tracing::{debug, info};

use crate::core::manifest::{Manifest, ManifestError};
use crate::parsing::manifest::read_manifest;

/// Merge existing manifests into one.
///
/// Rows keep the order in which their identifiers first appear across the
/// inputs. Rows with identical content are collapsed; differing content for
/// one identifier is a conflict naming both manifests.
///
/// # Errors
///
/// Returns `ManifestError::InvalidInput` for unreadable or malformed
/// manifests, or `ManifestError::Conflict` for disagreeing rows.
pub fn extract<P: AsRef<Path>>(paths: &[P]) -> Result<Manifest, ManifestError> {
    let mut manifest = Manifest::new();
    for path in paths {
        let path = path.as_ref();
        let parsed = read_manifest(path)?;
        let origin = path.display().to_string();
        debug!(
            "'{}' uses the {:?} layout with {} rows",
            origin,
            parsed.layout,
            parsed.rows.len()
        );

        let before = manifest.len();
        for row in parsed.rows {
            manifest.merge_row(row, Some(&origin))?;
        }
        info!(
            "read '{}': {} new identifiers",
            origin,
            manifest.len() - before
        );
    }
    Ok(manifest)
}
