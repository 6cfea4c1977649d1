//! Synthetic student population for trying out the assigner.

use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::Rng;

use crate::record::Item;

pub const ID_FIELD: &str = "nim";
pub const NAME_FIELD: &str = "nama";
pub const FACULTY_FIELD: &str = "fakultas";
pub const TRACK_FIELD: &str = "jalur masuk";
pub const SEX_FIELD: &str = "jenis kelamin";

pub const FACULTIES: [(&str, f64); 7] = [
    ("Teknik", 0.25),
    ("MIPA", 0.20),
    ("Ekonomi", 0.18),
    ("Hukum", 0.12),
    ("Kedokteran", 0.10),
    ("Ilmu Budaya", 0.08),
    ("ISIPOL", 0.07),
];

pub const TRACKS: [(&str, f64); 4] = [
    ("SNMPTN", 0.35),
    ("SBMPTN", 0.40),
    ("Mandiri", 0.20),
    ("Afirmasi", 0.05),
];

pub const SEXES: [(&str, f64); 2] = [("Laki-laki", 0.55), ("Perempuan", 0.45)];

const GIVEN_NAMES: [&str; 12] = [
    "Adi", "Budi", "Citra", "Dewi", "Eka", "Fajar", "Gita", "Hendra", "Indah", "Joko", "Kartika",
    "Lestari",
];

const FAMILY_NAMES: [&str; 10] = [
    "Saputra", "Wijaya", "Santoso", "Pratama", "Hidayat", "Kusuma", "Nugroho", "Lubis",
    "Siregar", "Wulandari",
];

struct Categorical {
    values: Vec<&'static str>,
    dist: WeightedIndex<f64>,
}

impl Categorical {
    fn new(table: &[(&'static str, f64)]) -> Result<Self, WeightedError> {
        Ok(Self {
            values: table.iter().map(|(v, _)| *v).collect(),
            dist: WeightedIndex::new(table.iter().map(|(_, w)| *w))?,
        })
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        self.values[self.dist.sample(rng)]
    }
}

/// Generate `count` students with ids `MHS0001..`
pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Result<Vec<Item>, WeightedError> {
    let faculty = Categorical::new(&FACULTIES)?;
    let track = Categorical::new(&TRACKS)?;
    let sex = Categorical::new(&SEXES)?;

    let items = (1..=count)
        .map(|n| {
            let name = format!(
                "{} {}",
                GIVEN_NAMES[rng.gen_range(0..GIVEN_NAMES.len())],
                FAMILY_NAMES[rng.gen_range(0..FAMILY_NAMES.len())]
            );
            Item::new(format!("MHS{n:04}"))
                .with_attribute(NAME_FIELD, name)
                .with_attribute(FACULTY_FIELD, faculty.sample(rng))
                .with_attribute(TRACK_FIELD, track.sample(rng))
                .with_attribute(SEX_FIELD, sex.sample(rng))
        })
        .collect();

    Ok(items)
}
