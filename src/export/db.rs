use anyhow::{Context, Result};
use rusqlite::{params, Connection, OpenFlags};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::export::{manifest::RunManifest, row::OutputRow};

pub struct AssignmentDb {
    conn: Connection,
}

impl AssignmentDb {
    /// Create a new in-memory database
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to create in-memory database")?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Open an existing database file without creating or migrating it
    pub fn open_read_only(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .context(format!("Failed to open database at {}", path.display()))?;
        Ok(Self { conn })
    }

    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r#"
            CREATE TABLE IF NOT EXISTS runs (
                run_id TEXT PRIMARY KEY,
                created_at TEXT NOT NULL,
                manifest TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS items (
                id TEXT PRIMARY KEY,
                attributes TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS assignments (
                item_id TEXT PRIMARY KEY,
                outer_group INTEGER,
                inner_group INTEGER,
                FOREIGN KEY (item_id) REFERENCES items(id)
            );

            CREATE INDEX IF NOT EXISTS idx_assignments_groups
                ON assignments(outer_group, inner_group);
            "#,
            )
            .context("Failed to initialize database schema")?;
        Ok(())
    }

    /// Record a run manifest
    pub fn insert_run(&self, manifest: &RunManifest) -> Result<()> {
        let json = serde_json::to_string(manifest).context("Failed to serialize manifest")?;
        self.conn
            .execute(
                "INSERT OR REPLACE INTO runs (run_id, created_at, manifest) VALUES (?1, ?2, ?3)",
                params![manifest.run_id.to_string(), manifest.created_at, json],
            )
            .context(format!("Failed to insert run: {}", manifest.run_id))?;
        Ok(())
    }

    /// Insert rows in one transaction, keeping their order
    pub fn insert_rows(&mut self, rows: &[OutputRow]) -> Result<()> {
        let tx = self
            .conn
            .transaction()
            .context("Failed to start transaction")?;
        {
            let mut insert_item = tx
                .prepare("INSERT OR REPLACE INTO items (id, attributes) VALUES (?1, ?2)")
                .context("Failed to prepare statement")?;
            let mut insert_assignment = tx
                .prepare(
                    "INSERT OR REPLACE INTO assignments (item_id, outer_group, inner_group) VALUES (?1, ?2, ?3)",
                )
                .context("Failed to prepare statement")?;

            for row in rows {
                let attributes = serde_json::to_string(&row.attributes)
                    .context(format!("Failed to serialize attributes for {}", row.id))?;
                insert_item
                    .execute(params![row.id, attributes])
                    .context(format!("Failed to insert item: {}", row.id))?;
                insert_assignment
                    .execute(params![row.id, row.outer_group, row.inner_group])
                    .context(format!("Failed to insert assignment: {}", row.id))?;
            }
        }
        tx.commit().context("Failed to commit rows")?;
        Ok(())
    }

    /// All rows in insertion order
    pub fn load_rows(&self) -> Result<Vec<OutputRow>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT i.id, i.attributes, a.outer_group, a.inner_group
                 FROM items i LEFT JOIN assignments a ON a.item_id = i.id
                 ORDER BY i.rowid",
            )
            .context("Failed to prepare statement")?;

        let raw = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<u32>>(2)?,
                    row.get::<_, Option<u32>>(3)?,
                ))
            })
            .context("Failed to query rows")?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to collect rows")?;

        raw.into_iter()
            .map(|(id, attributes, outer_group, inner_group)| {
                let attributes: BTreeMap<String, String> = serde_json::from_str(&attributes)
                    .context(format!("Invalid attributes for item {}", id))?;
                Ok(OutputRow {
                    id,
                    attributes,
                    outer_group,
                    inner_group,
                })
            })
            .collect()
    }

    /// Most recently recorded manifest
    pub fn latest_manifest(&self) -> Result<Option<RunManifest>> {
        let mut stmt = self
            .conn
            .prepare("SELECT manifest FROM runs ORDER BY created_at DESC LIMIT 1")
            .context("Failed to prepare statement")?;

        let mut rows = stmt.query([]).context("Failed to query runs")?;

        if let Some(row) = rows.next().context("Failed to get next row")? {
            let json: String = row.get(0)?;
            let manifest = serde_json::from_str(&json).context("Failed to parse stored manifest")?;
            Ok(Some(manifest))
        } else {
            Ok(None)
        }
    }

    /// Row counts per table
    pub fn get_stats(&self) -> Result<DbStats> {
        let item_count: u32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))
            .context("Failed to count items")?;

        let assigned_count: u32 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM assignments WHERE outer_group IS NOT NULL",
                [],
                |row| row.get(0),
            )
            .context("Failed to count assignments")?;

        let run_count: u32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM runs", [], |row| row.get(0))
            .context("Failed to count runs")?;

        Ok(DbStats {
            item_count,
            assigned_count,
            run_count,
        })
    }

    /// Save database to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        // VACUUM INTO refuses to overwrite, so clear any previous file first
        let _ = std::fs::remove_file(path);
        let safe_path = path.to_string_lossy().replace('\'', "''");
        let sql = format!("VACUUM INTO '{}'", safe_path);
        self.conn
            .execute_batch(&sql)
            .context(format!("Failed to save database to {}", path.display()))?;

        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DbStats {
    pub item_count: u32,
    pub assigned_count: u32,
    pub run_count: u32,
}
