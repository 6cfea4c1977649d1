use super::*;
use crate::record::Item;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn student(id: &str, faculty: &str, sex: &str, track: &str) -> Item {
    Item::new(id)
        .with_attribute("fakultas", faculty)
        .with_attribute("jenis kelamin", sex)
        .with_attribute("jalur masuk", track)
}

fn population(per_faculty: &[(&str, usize)]) -> Vec<Item> {
    let sexes = ["Laki-laki", "Perempuan"];
    let tracks = ["SNMPTN", "SBMPTN", "Mandiri"];
    let mut items = Vec::new();
    for (faculty, count) in per_faculty {
        for i in 0..*count {
            items.push(student(
                &format!("{}-{:03}", faculty, i),
                faculty,
                sexes[i % sexes.len()],
                tracks[i % tracks.len()],
            ));
        }
    }
    items
}

fn config(outer: u32, inner: u32) -> AssignConfig {
    AssignConfig::new("fakultas", outer, ("jenis kelamin", "jalur masuk"), inner)
}

#[test]
fn test_every_item_assigned_once() {
    let items = population(&[("Teknik", 40), ("MIPA", 23), ("Hukum", 9)]);
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let result = assign(&items, &config(5, 4), &mut rng).unwrap();

    assert_eq!(result.assigned_count(), items.len());
    assert!(result.unassigned.is_empty());
    assert!(result.inner_unassigned.is_empty());
    let index = result.index();
    assert_eq!(index.len(), items.len());
    for item in &items {
        let record = index[item.id.as_str()];
        assert!((1..=5).contains(&record.outer_group));
        let inner = record.inner_group.unwrap();
        assert!((1..=4).contains(&inner));
    }
}

#[test]
fn test_outer_split_is_balanced_per_stratum() {
    let items = population(&[("Teknik", 5), ("MIPA", 3)]);
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let result = assign(&items, &config(2, 1), &mut rng).unwrap();

    for (faculty, total) in [("Teknik", 5usize), ("MIPA", 3)] {
        let mut per_group = vec![0usize; 2];
        for record in &result.records {
            if record.item_id.starts_with(faculty) {
                per_group[record.outer_group as usize - 1] += 1;
            }
        }
        per_group.sort_unstable();
        assert_eq!(per_group.iter().sum::<usize>(), total);
        assert_eq!(per_group, vec![total / 2, total / 2 + total % 2]);
    }
    assert_eq!(result.outer_sizes().iter().sum::<usize>(), 8);
}

#[test]
fn test_inner_sizes_sum_to_outer_size() {
    let items = population(&[("Teknik", 60), ("Ekonomi", 31)]);
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let result = assign(&items, &config(3, 5), &mut rng).unwrap();

    let outer_sizes = result.outer_sizes();
    for outer in 1..=3 {
        let inner_total: usize = result.inner_sizes(outer).iter().sum();
        assert_eq!(inner_total, outer_sizes[outer as usize - 1]);
    }
}

#[test]
fn test_inner_strata_balanced_within_outer_group() {
    let items = population(&[("Teknik", 120)]);
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let cfg = config(2, 4);

    let result = assign(&items, &cfg, &mut rng).unwrap();

    let by_id: std::collections::HashMap<_, _> =
        items.iter().map(|i| (i.id.as_str(), i)).collect();
    for outer in 1..=2 {
        let mut strata: std::collections::BTreeMap<(String, String), Vec<u32>> =
            Default::default();
        for record in result.outer_members(outer) {
            let item = by_id[record.item_id.as_str()];
            let key = (
                item.attribute("jenis kelamin").unwrap().to_string(),
                item.attribute("jalur masuk").unwrap().to_string(),
            );
            let counts = strata.entry(key).or_insert_with(|| vec![0; 4]);
            counts[record.inner_group.unwrap() as usize - 1] += 1;
        }
        for counts in strata.values() {
            let max = counts.iter().max().unwrap();
            let min = counts.iter().min().unwrap();
            assert!(max - min <= 1, "unbalanced stratum: {:?}", counts);
        }
    }
}

#[test]
fn test_missing_outer_attribute_is_skipped() {
    let mut items = population(&[("MIPA", 6)]);
    items.push(Item::new("no-faculty").with_attribute("jenis kelamin", "Perempuan"));
    items.push(student("blank-faculty", " ", "Laki-laki", "Mandiri"));
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let result = assign(&items, &config(2, 2), &mut rng).unwrap();

    assert_eq!(result.assigned_count(), 6);
    assert_eq!(result.unassigned, vec!["no-faculty", "blank-faculty"]);
    assert_eq!(result.skipped(), 2);
    assert!(result.get("no-faculty").is_none());
}

#[test]
fn test_missing_inner_attribute_keeps_outer_group() {
    let mut items = population(&[("Hukum", 4)]);
    items.push(
        Item::new("no-track")
            .with_attribute("fakultas", "Hukum")
            .with_attribute("jenis kelamin", "Perempuan"),
    );
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let result = assign(&items, &config(2, 2), &mut rng).unwrap();

    let record = result.get("no-track").unwrap();
    assert!(record.inner_group.is_none());
    assert_eq!(result.inner_unassigned, vec!["no-track"]);
    assert_eq!(result.skipped(), 1);
}

#[test]
fn test_small_stratum_leaves_empty_inner_groups() {
    let items = population(&[("Kedokteran", 2)]);
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    let result = assign(&items, &config(1, 25), &mut rng).unwrap();

    let sizes = result.inner_sizes(1);
    assert_eq!(sizes.len(), 25);
    assert_eq!(sizes.iter().sum::<usize>(), 2);
}

#[test]
fn test_invalid_group_counts() {
    let items = population(&[("MIPA", 3)]);
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let err = assign(&items, &config(0, 3), &mut rng).unwrap_err();
    assert_eq!(
        err,
        AssignError::InvalidGroupCount {
            level: Level::Outer,
            count: 0
        }
    );

    let err = assign(&items, &config(3, 0), &mut rng).unwrap_err();
    assert!(err.to_string().contains("inner group count"));
}

#[test]
fn test_duplicate_ids_rejected() {
    let items = vec![
        student("dup", "MIPA", "Perempuan", "SNMPTN"),
        student("dup", "Teknik", "Laki-laki", "Mandiri"),
    ];
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let err = assign(&items, &config(2, 2), &mut rng).unwrap_err();

    assert_eq!(err, AssignError::DuplicateItem("dup".to_string()));
}

#[test]
fn test_empty_population() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let result = assign(&[], &AssignConfig::default(), &mut rng).unwrap();

    assert!(result.records.is_empty());
    assert_eq!(result.outer_sizes(), vec![0; 5]);
}

#[test]
fn test_same_seed_same_assignment() {
    let items = population(&[("Teknik", 37), ("MIPA", 21), ("ISIPOL", 8)]);
    let cfg = config(4, 3);

    let a = assign(&items, &cfg, &mut ChaCha8Rng::seed_from_u64(2024)).unwrap();
    let b = assign(&items, &cfg, &mut ChaCha8Rng::seed_from_u64(2024)).unwrap();
    let c = assign(&items, &cfg, &mut ChaCha8Rng::seed_from_u64(2025)).unwrap();

    assert_eq!(a, b);
    assert_ne!(a.records, c.records);
}

#[test]
fn test_default_config() {
    let cfg = AssignConfig::default();
    assert_eq!(cfg.outer_attribute, "fakultas");
    assert_eq!(cfg.outer_group_count, 5);
    assert_eq!(cfg.inner_group_count, 25);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_index_matches_get() {
    let items = population(&[("Teknik", 12), ("Hukum", 5)]);
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    let result = assign(&items, &config(3, 2), &mut rng).unwrap();
    let index = result.index();

    for item in &items {
        assert_eq!(index.get(item.id.as_str()).copied(), result.get(&item.id));
    }
    assert!(!index.contains_key("missing"));
}

#[test]
fn test_many_sparse_outer_groups() {
    let faculties: Vec<(String, usize)> =
        (0..40).map(|i| (format!("F{:02}", i), 3)).collect();
    let per_faculty: Vec<(&str, usize)> =
        faculties.iter().map(|(f, n)| (f.as_str(), *n)).collect();
    let items = population(&per_faculty);
    let mut rng = ChaCha8Rng::seed_from_u64(17);

    let result = assign(&items, &config(5_000, 2), &mut rng).unwrap();

    assert_eq!(result.assigned_count(), items.len());
    let sizes = result.outer_sizes();
    assert_eq!(sizes.len(), 5_000);
    assert_eq!(sizes.iter().sum::<usize>(), items.len());
    for record in &result.records {
        let inner_total: usize = result.inner_sizes(record.outer_group).iter().sum();
        assert_eq!(inner_total, sizes[record.outer_group as usize - 1]);
        assert!(record.inner_group.is_some());
    }
}
