//! End-to-end import runs: stage the file, resolve the mapping profile,
//! drive the importer and export what was rejected.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use biorec_import::{Importer, MemoryStore, ProgressSink, TracingLogger};
use biorec_ingest::CsvRowSource;
use biorec_map::{load_mapping_config, save_mapping_config};
use biorec_model::{ImportError, RankLadder};
use biorec_transform::StandardFieldValidator;

/// Inputs for one import run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Delimited source file to stage.
    pub csv_file: PathBuf,
    /// Mapping profile (JSON) to resolve columns through.
    pub mapping: PathBuf,
    /// Destination for rejected rows; defaults next to the source file.
    pub errors_out: Option<PathBuf>,
    /// Rank ladder override (JSON); the built-in ladder when `None`.
    pub ranks: Option<PathBuf>,
    /// Export rejected rows and the mapping sidecar when any exist.
    pub write_error_file: bool,
    /// Write every created entity to this file as JSON after the run.
    pub export_out: Option<PathBuf>,
}

/// What one run produced, for the summary printer and the exit code.
#[derive(Debug)]
pub struct RunReport {
    pub source: PathBuf,
    pub profile_name: String,
    pub row_count: usize,
    pub successes: usize,
    pub errors: usize,
    pub error_file: Option<PathBuf>,
    pub mapping_sidecar: Option<PathBuf>,
    pub export_file: Option<PathBuf>,
    pub entities: EntityCounts,
}

/// Rows created per entity table during the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityCounts {
    pub regions: usize,
    pub sites: usize,
    pub site_visits: usize,
    pub taxa: usize,
    pub common_names: usize,
    pub traits: usize,
    pub materials: usize,
    pub material_parts: usize,
}

impl EntityCounts {
    fn from_store(store: &MemoryStore) -> Self {
        Self {
            regions: store.regions.len(),
            sites: store.sites.len(),
            site_visits: store.site_visits.len(),
            taxa: store.taxa.len(),
            common_names: store.common_names.len(),
            traits: store.traits.len(),
            materials: store.materials.len(),
            material_parts: store.material_parts.len(),
        }
    }
}

/// Stages `csv_file`, imports every row through the mapping profile and
/// returns the run report. Rejected rows are exported beside the source
/// together with the profile, so they can be corrected and re-imported.
pub fn run_import(options: &RunOptions, progress: &mut dyn ProgressSink) -> Result<RunReport> {
    let span = info_span!("import", source = %options.csv_file.display());
    let _guard = span.enter();

    let config = load_mapping_config(&options.mapping)?;
    info!(
        profile = %config.profile_name,
        mappings = config.mappings.len(),
        "mapping profile loaded"
    );

    let ladder = match &options.ranks {
        Some(path) => load_rank_ladder(path)?,
        None => RankLadder::standard(),
    };

    let mut source =
        CsvRowSource::from_path(&options.csv_file).map_err(|err| ImportError::StagingFailed {
            reason: err.to_string(),
        })?;
    let row_count = source.row_count();
    let mut store = MemoryStore::new().with_ranks(ladder);
    let validator = StandardFieldValidator::new();
    let importer = Importer::new(&config.mappings, &validator);
    let mut logger = TracingLogger;

    let summary = importer.run(&mut source, &mut store, progress, &mut logger)?;

    let mut error_file = None;
    let mut mapping_sidecar = None;
    if options.write_error_file && !source.error_rows().is_empty() {
        let path = options
            .errors_out
            .clone()
            .unwrap_or_else(|| default_errors_path(&options.csv_file));
        let written = source.write_error_rows(&path)?;
        let sidecar = path.with_extension("mapping.json");
        save_mapping_config(&sidecar, &config)?;
        info!(
            rows = written,
            path = %path.display(),
            "rejected rows exported with their mapping profile"
        );
        error_file = Some(path);
        mapping_sidecar = Some(sidecar);
    }

    let mut export_file = None;
    if let Some(path) = &options.export_out {
        let json = store
            .export_json()
            .context("serialize imported entities")?;
        std::fs::write(path, json)
            .with_context(|| format!("write entity export {}", path.display()))?;
        info!(path = %path.display(), "created entities exported");
        export_file = Some(path.clone());
    }

    Ok(RunReport {
        source: options.csv_file.clone(),
        profile_name: config.profile_name,
        row_count,
        successes: summary.successes,
        errors: summary.errors,
        error_file,
        mapping_sidecar,
        export_file,
        entities: EntityCounts::from_store(&store),
    })
}

fn default_errors_path(csv_file: &Path) -> PathBuf {
    csv_file.with_extension("errors.csv")
}

fn load_rank_ladder(path: &Path) -> Result<RankLadder> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read rank ladder {}", path.display()))?;
    let ladder: RankLadder = serde_json::from_str(&contents)
        .with_context(|| format!("parse rank ladder {}", path.display()))?;
    Ok(ladder)
}
