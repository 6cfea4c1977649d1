use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeStats {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1); 0 for fewer than two groups
    pub std_dev: f64,
}

impl SizeStats {
    pub fn from_sizes(sizes: &[usize]) -> Option<Self> {
        let min = *sizes.iter().min()?;
        let max = *sizes.iter().max()?;

        let n = sizes.len() as f64;
        let mean = sizes.iter().sum::<usize>() as f64 / n;
        let std_dev = if sizes.len() < 2 {
            0.0
        } else {
            let var = sizes
                .iter()
                .map(|&s| (s as f64 - mean).powi(2))
                .sum::<f64>()
                / (n - 1.0);
            var.sqrt()
        };

        Some(Self {
            min,
            max,
            mean,
            std_dev,
        })
    }
}

/// Share of each distinct value
pub fn proportions<'a, I>(values: I) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total = 0usize;
    for value in values {
        *counts.entry(value.to_string()).or_default() += 1;
        total += 1;
    }

    counts
        .into_iter()
        .map(|(value, count)| (value, count as f64 / total as f64))
        .collect()
}

/// Largest `|observed - target|` over the values in `observed`.
/// A value absent from `target` counts as a target share of 0.
pub fn max_deviation(observed: &BTreeMap<String, f64>, target: &BTreeMap<String, f64>) -> f64 {
    observed
        .iter()
        .map(|(value, share)| (share - target.get(value).copied().unwrap_or(0.0)).abs())
        .fold(0.0, f64::max)
}
