mod db;
mod manifest;
mod row;

#[cfg(test)]
mod tests;

pub use db::{AssignmentDb, DbStats};
pub use manifest::{input_digest, RunManifest, RunStats};
pub use row::{build_rows, rows_into_parts, OutputRow};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Everything written for one run: the manifest and one row per input item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentExport {
    pub manifest: RunManifest,
    pub rows: Vec<OutputRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkFormat {
    Json,
    Sqlite,
}

impl SinkFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Ok(Self::Json),
            "sqlite" | "sqlite3" | "db" => Ok(Self::Sqlite),
            _ => bail!(
                "Unsupported output format for {} (expected .json, .sqlite or .db)",
                path.display()
            ),
        }
    }
}

/// Write an export, choosing the sink from the file extension
pub fn write_export(path: &Path, export: &AssignmentExport) -> Result<()> {
    match SinkFormat::from_path(path)? {
        SinkFormat::Json => {
            let json = serde_json::to_string_pretty(export)
                .context("Failed to serialize assignment export")?;
            fs::write(path, json).context(format!("Failed to write {}", path.display()))?;
        }
        SinkFormat::Sqlite => {
            let mut db = AssignmentDb::new_in_memory()?;
            db.insert_run(&export.manifest)?;
            db.insert_rows(&export.rows)?;
            db.save_to_file(path)?;
        }
    }

    info!(path = %path.display(), rows = export.rows.len(), "Wrote assignment export");
    Ok(())
}

/// Read an export written by [`write_export`]
pub fn read_export(path: &Path) -> Result<AssignmentExport> {
    match SinkFormat::from_path(path)? {
        SinkFormat::Json => {
            let text = fs::read_to_string(path)
                .context(format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&text).context(format!("Failed to parse {}", path.display()))
        }
        SinkFormat::Sqlite => {
            let db = AssignmentDb::open_read_only(path)?;
            let stats = db.get_stats()?;
            info!(
                path = %path.display(),
                items = stats.item_count,
                assigned = stats.assigned_count,
                runs = stats.run_count,
                "Opened assignment database"
            );

            let manifest = db
                .latest_manifest()?
                .context(format!("No run recorded in {}", path.display()))?;
            let rows = db.load_rows()?;
            Ok(AssignmentExport { manifest, rows })
        }
    }
}
