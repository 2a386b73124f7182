use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::core::manifest::{Manifest, ManifestError};
use crate::parsing::sourmash::read_sourmash_manifest;
use crate::plan::params::SketchParams;
use crate::utils::output::write_atomically;

/// Sketches that already exist, by name
#[derive(Debug, Clone, Default)]
pub struct AlreadyDone {
    by_name: HashMap<String, HashSet<SketchParams>>,
}

impl AlreadyDone {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and combine several sourmash manifests.
    ///
    /// # Errors
    ///
    /// Returns errors from [`read_sourmash_manifest`].
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self, ManifestError> {
        let mut done = Self::new();
        for path in paths {
            for sketch in read_sourmash_manifest(path.as_ref())? {
                done.insert(sketch.name, sketch.params);
            }
        }
        info!("Loaded {} pre-existing names from manifest(s)", done.len());
        Ok(done)
    }

    pub fn insert(&mut self, name: impl Into<String>, params: SketchParams) {
        self.by_name.entry(name.into()).or_default().insert(params);
    }

    #[must_use]
    pub fn contains(&self, name: &str, params: &SketchParams) -> bool {
        self.by_name.get(name).is_some_and(|set| set.contains(params))
    }

    /// Number of distinct names
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Sketches to compute from one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SketchJob {
    pub name: String,
    pub filename: PathBuf,
    pub params: Vec<SketchParams>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SketchPlan {
    pub jobs: Vec<SketchJob>,
    /// Size of the requested cross-product
    pub total: usize,
    /// Combinations already present
    pub skipped: usize,
}

impl SketchPlan {
    #[must_use]
    pub fn to_build(&self) -> usize {
        self.total - self.skipped
    }
}

/// Cross every manifest row with every parameter set and keep the
/// combinations not yet done.
///
/// DNA sketches come from the genome file, all others from the protein file.
///
/// # Errors
///
/// Returns `ManifestError::InvalidInput` if a needed file is missing from a row.
pub fn plan_sketches(
    manifest: &Manifest,
    params: &[SketchParams],
    done: &AlreadyDone,
) -> Result<SketchPlan, ManifestError> {
    let mut plan = SketchPlan::default();
    let mut index: HashMap<(String, PathBuf), usize> = HashMap::new();

    for row in manifest.rows() {
        for p in params {
            plan.total += 1;
            if done.contains(&row.name, p) {
                debug!("already done: '{}' {}", row.name, p);
                plan.skipped += 1;
                continue;
            }

            let input = p.moltype.input();
            let file = row.file(input).ok_or_else(|| ManifestError::InvalidInput {
                path: row.ident.to_string(),
                reason: format!("no {input} file for '{}' needed by {p}", row.name),
            })?;

            let key = (row.name.clone(), file.path.clone());
            let i = *index.entry(key).or_insert_with(|| {
                plan.jobs.push(SketchJob {
                    name: row.name.clone(),
                    filename: file.path.clone(),
                    params: Vec::new(),
                });
                plan.jobs.len() - 1
            });
            plan.jobs[i].params.push(*p);
        }
    }

    info!(
        "Of {} total requested in cross-product, skipped {}, to build {} in {} files",
        plan.total,
        plan.skipped,
        plan.to_build(),
        plan.jobs.len()
    );
    Ok(plan)
}

pub const PLAN_HEADER: [&str; 7] = [
    "name",
    "filename",
    "moltype",
    "ksize",
    "scaled",
    "num",
    "with_abundance",
];

/// Serialize a plan, one line per sketch.
///
/// # Errors
///
/// Returns `ManifestError::Csv` if writing fails.
pub fn write_plan<W: Write>(plan: &SketchPlan, writer: W) -> Result<(), ManifestError> {
    let mut w = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    w.write_record(PLAN_HEADER)?;
    for job in &plan.jobs {
        let filename = job.filename.to_string_lossy();
        for p in &job.params {
            w.write_record([
                job.name.as_str(),
                filename.as_ref(),
                &p.moltype.to_string(),
                &p.ksize.to_string(),
                &p.scaled.to_string(),
                &p.num.to_string(),
                if p.track_abundance { "1" } else { "0" },
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}

/// Write a plan to `path` atomically.
///
/// # Errors
///
/// See [`write_atomically`] and [`write_plan`].
pub fn write_plan_file(plan: &SketchPlan, path: &Path, force: bool) -> Result<(), ManifestError> {
    write_atomically(path, force, |w| write_plan(plan, w))
}
