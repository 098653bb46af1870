use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;

use crate::{
    config::Config,
    errors::RunError,
    functions::{CostBasisEngine, EngineSummary},
    parsing::{holdings_to_csv, holdings_to_json, read_activity_file, resolve_source},
    utils::{archive_file, commit_staged, file_digest, sha256_hex, stage_files},
};

#[derive(Debug, Clone)]
pub struct RunReport {
    pub source: PathBuf,
    pub dropped_rows: usize,
    pub summary: EngineSummary,
    pub changed: bool,
    pub archived_to: Option<PathBuf>,
}

/* One complete run: resolve the export, validate, recompute every pool from scratch, write the
snapshot, then archive the export.

Any error, including a failed write of one of the outputs, leaves the previous holdings files untouched. The export is archived
on success whether or not the holdings changed.
*/
pub fn run(config: &Config) -> Result<RunReport, RunError> {
    let source = resolve_source(config.input.as_deref(), &config.inbox_dir)?;
    info!("Reading activity export {}", source.display());

    let log = read_activity_file(&source)?;
    info!(
        "{} order events, {} non order rows dropped",
        log.len(),
        log.dropped_rows
    );

    let output = CostBasisEngine::run(&log)?;

    // Serialize everything before touching the disk
    let csv = holdings_to_csv(&output.snapshot)?;
    let json = match &config.json_output {
        Some(_) => Some(holdings_to_json(&output.snapshot)?),
        None => None,
    };

    let changed = file_digest(&config.output).as_deref() != Some(sha256_hex(&csv).as_str());
    let mut outputs: Vec<(&Path, &[u8])> = vec![(config.output.as_path(), csv.as_slice())];
    if let (Some(path), Some(json)) = (&config.json_output, &json) {
        outputs.push((path.as_path(), json.as_slice()));
    }
    // Every output is staged before any is replaced
    commit_staged(stage_files(&outputs)?)?;
    info!(
        "Wrote {} positions to {} ({})",
        output.summary.open_positions,
        config.output.display(),
        if changed { "changed" } else { "unchanged" }
    );

    let archived_to = if config.no_archive {
        None
    } else {
        let archived = archive_file(&source, &config.archive_dir, Utc::now())?;
        info!("Archived export to {}", archived.display());
        Some(archived)
    };

    return Ok(RunReport {
        source,
        dropped_rows: log.dropped_rows,
        summary: output.summary,
        changed,
        archived_to,
    });
}
