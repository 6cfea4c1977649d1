use super::*;
use crate::assigner::{assign, AssignConfig};
use crate::config::RunConfig;
use crate::record::Item;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;

fn sample_items() -> Vec<Item> {
    let mut items: Vec<Item> = (0..30)
        .map(|i| {
            Item::new(format!("MHS{:04}", i + 1))
                .with_attribute("fakultas", ["Teknik", "MIPA", "Hukum"][i % 3])
                .with_attribute("jenis kelamin", ["Laki-laki", "Perempuan"][i % 2])
                .with_attribute("jalur masuk", ["SNMPTN", "Mandiri"][(i / 2) % 2])
        })
        .collect();
    items.push(Item::new("MHS9999").with_attribute("jenis kelamin", "Perempuan"));
    items
}

fn sample_export() -> (Vec<Item>, AssignmentExport) {
    let items = sample_items();
    let mut config = RunConfig::default();
    config.assign = AssignConfig::new("fakultas", 3, ("jenis kelamin", "jalur masuk"), 2);
    let assignment = assign(&items, &config.assign, &mut ChaCha8Rng::seed_from_u64(11)).unwrap();

    let manifest = RunManifest::new(&config, 11, &items, &assignment);
    let rows = build_rows(&items, &assignment);
    (items, AssignmentExport { manifest, rows })
}

#[test]
fn test_rows_sorted_with_unassigned_last() {
    let (items, export) = sample_export();

    assert_eq!(export.rows.len(), items.len());
    let last = export.rows.last().unwrap();
    assert_eq!(last.id, "MHS9999");
    assert_eq!(last.outer_group, None);

    let keys: Vec<_> = export.rows[..30]
        .iter()
        .map(|r| (r.outer_group.unwrap(), r.inner_group.unwrap(), r.id.clone()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn test_rows_into_parts_restores_assignment() {
    let (items, export) = sample_export();

    let (restored_items, assignment) = rows_into_parts(export.rows.clone(), 3, 2);

    assert_eq!(restored_items.len(), items.len());
    assert_eq!(assignment.unassigned, vec!["MHS9999"]);
    assert_eq!(assignment.assigned_count(), 30);
    assert_eq!(assignment.outer_sizes().iter().sum::<usize>(), 30);
}

#[test]
fn test_manifest_records_seed_and_stats() {
    let (items, export) = sample_export();
    let manifest = &export.manifest;

    assert_eq!(manifest.seed, 11);
    assert_eq!(manifest.config.seed, Some(11));
    assert_eq!(manifest.stats.item_count, 31);
    assert_eq!(manifest.stats.assigned, 30);
    assert_eq!(manifest.stats.unassigned, 1);
    assert_eq!(manifest.input_digest, input_digest(&items));
    assert_eq!(manifest.input_digest.len(), 64);
    assert!(manifest.generator.starts_with("stratagroup v"));
}

#[test]
fn test_input_digest_depends_on_order() {
    let items = sample_items();
    let mut reversed = items.clone();
    reversed.reverse();

    assert_eq!(input_digest(&items), input_digest(&items.clone()));
    assert_ne!(input_digest(&items), input_digest(&reversed));
}

#[test]
fn test_sink_format_from_extension() {
    assert_eq!(SinkFormat::from_path(Path::new("out.json")).unwrap(), SinkFormat::Json);
    assert_eq!(SinkFormat::from_path(Path::new("out.SQLITE")).unwrap(), SinkFormat::Sqlite);
    assert_eq!(SinkFormat::from_path(Path::new("out.db")).unwrap(), SinkFormat::Sqlite);
    assert!(SinkFormat::from_path(Path::new("out.xlsx")).is_err());
}

#[test]
fn test_json_export_round_trip() {
    let (_, export) = sample_export();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("groups.json");

    write_export(&path, &export).unwrap();
    let loaded = read_export(&path).unwrap();

    assert_eq!(loaded.rows, export.rows);
    assert_eq!(loaded.manifest, export.manifest);
}

#[test]
fn test_sqlite_export_round_trip() {
    let (_, export) = sample_export();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("groups.sqlite");

    write_export(&path, &export).unwrap();
    let loaded = read_export(&path).unwrap();

    assert_eq!(loaded.rows, export.rows);
    assert_eq!(loaded.manifest.run_id, export.manifest.run_id);

    let stats = AssignmentDb::open_read_only(&path).unwrap().get_stats().unwrap();
    assert_eq!(stats.item_count, 31);
    assert_eq!(stats.assigned_count, 30);
    assert_eq!(stats.run_count, 1);
}

#[test]
fn test_read_missing_database_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("typo.sqlite");

    let err = read_export(&path).unwrap_err();

    assert!(err.to_string().contains("Failed to open database"), "{err:#}");
    assert!(!path.exists());
}

#[test]
fn test_read_only_database_is_not_modified() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.sqlite");
    AssignmentDb::new_in_memory().unwrap().save_to_file(&path).unwrap();
    let before = std::fs::read(&path).unwrap();

    let err = read_export(&path).unwrap_err();

    assert!(err.to_string().contains("No run recorded"), "{err:#}");
    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[test]
fn test_empty_database_has_no_manifest() {
    let db = AssignmentDb::new_in_memory().unwrap();

    assert!(db.latest_manifest().unwrap().is_none());
    assert!(db.load_rows().unwrap().is_empty());
}
