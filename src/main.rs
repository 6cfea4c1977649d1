use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use stratagroup::{
    assign, dummy, export, load_items, verify, AssignmentExport, RunConfig, RunManifest,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stratagroup")]
#[command(about = "Stratified, size-balanced group assignment", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic student population as JSON Lines
    Generate {
        /// Number of students
        #[arg(short, long, default_value_t = 2000)]
        count: usize,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Assign items to outer and inner groups
    Assign {
        /// Input records (JSON array or JSON Lines)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (.json, .sqlite or .db)
        #[arg(short, long)]
        output: PathBuf,

        /// Run configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Random seed, overrides the config file
        #[arg(long)]
        seed: Option<u64>,

        /// Number of outer groups
        #[arg(long)]
        outer_groups: Option<u32>,

        /// Number of inner groups per outer group
        #[arg(long)]
        inner_groups: Option<u32>,

        /// Write the verification report as JSON
        #[arg(long)]
        report: Option<PathBuf>,

        /// Skip printing the verification report
        #[arg(short, long)]
        quiet: bool,
    },

    /// Verify an exported assignment
    Verify {
        /// Exported assignment (.json, .sqlite or .db)
        #[arg(short, long)]
        input: PathBuf,

        /// Tolerances to use instead of those recorded with the run
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            count,
            output,
            seed,
        } => run_generate(count, &output, seed),
        Commands::Assign {
            input,
            output,
            config,
            seed,
            outer_groups,
            inner_groups,
            report,
            quiet,
        } => {
            let mut run_config = RunConfig::load_or_default(config.as_deref())?;
            if seed.is_some() {
                run_config.seed = seed;
            }
            if let Some(n) = outer_groups {
                run_config.assign.outer_group_count = n;
            }
            if let Some(n) = inner_groups {
                run_config.assign.inner_group_count = n;
            }
            run_assign(&input, &output, &run_config, report.as_deref(), quiet)
        }
        Commands::Verify {
            input,
            config,
            json,
        } => run_verify(&input, config.as_deref(), json),
    }
}

fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        let seed = rand::rngs::OsRng.next_u64();
        info!(seed, "No seed configured, drew one from OS entropy");
        seed
    })
}

fn run_generate(count: usize, output: &Path, seed: Option<u64>) -> Result<()> {
    let seed = resolve_seed(seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let items = dummy::generate(count, &mut rng).context("Invalid category weights")?;

    let mut lines = String::new();
    for item in &items {
        let mut record = serde_json::Map::new();
        record.insert(dummy::ID_FIELD.to_string(), item.id.clone().into());
        for (name, value) in &item.attributes {
            record.insert(name.clone(), value.clone().into());
        }
        lines.push_str(&serde_json::to_string(&record)?);
        lines.push('\n');
    }
    fs::write(output, lines).context(format!("Failed to write {}", output.display()))?;

    info!(count, seed, path = %output.display(), "Generated dummy population");
    Ok(())
}

fn run_assign(
    input: &Path,
    output: &Path,
    config: &RunConfig,
    report_path: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let start = Instant::now();

    let items = load_items(input, &config.id_field)
        .context(format!("Failed to load items from {}", input.display()))?;
    info!(count = items.len(), path = %input.display(), "Loaded items");

    let seed = resolve_seed(config.seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let assignment = assign(&items, &config.assign, &mut rng)?;

    if assignment.skipped() > 0 {
        eprintln!(
            "Skipped {} item(s) without an outer attribute and {} without inner attributes",
            assignment.unassigned.len(),
            assignment.inner_unassigned.len()
        );
    }

    let report = verify(&items, &assignment, &config.assign, &config.verify);
    if !quiet {
        println!("{report}");
    }
    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        fs::write(path, json).context(format!("Failed to write {}", path.display()))?;
    }

    let export = AssignmentExport {
        manifest: RunManifest::new(config, seed, &items, &assignment),
        rows: export::build_rows(&items, &assignment),
    };
    export::write_export(output, &export)?;

    info!(
        seed,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Run complete"
    );
    Ok(())
}

fn run_verify(input: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let exported = export::read_export(input)?;
    let recorded = exported.manifest.config;
    let verify_config = match config {
        Some(path) => RunConfig::load(path)?.verify,
        None => recorded.verify.clone(),
    };

    let (items, assignment) = export::rows_into_parts(
        exported.rows,
        recorded.assign.outer_group_count,
        recorded.assign.inner_group_count,
    );
    let report = verify(&items, &assignment, &recorded.assign, &verify_config);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}
