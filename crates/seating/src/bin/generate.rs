use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rand::{SeedableRng, rngs::StdRng};
use seating::{GeneratorParams, RequestFormat, generate};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Generate a random cinema instance", long_about = None)]
struct Args {
    /// Number of seat rows
    #[arg(short, long, default_value_t = 10)]
    rows: usize,

    /// Number of seat columns
    #[arg(short, long, default_value_t = 10)]
    columns: usize,

    /// Every n-th row is an aisle (0 = none)
    #[arg(long, default_value_t = 5)]
    aisle_rows: usize,

    /// Every n-th column is an aisle (0 = none)
    #[arg(long, default_value_t = 5)]
    aisle_columns: usize,

    /// Chance that a seat outside the aisles is removed
    #[arg(short, long, default_value_t = 0.2)]
    blocked: f64,

    /// People to request as a fraction of the free seats
    #[arg(short, long, default_value_t = 0.3)]
    fill: f64,

    /// Write an arrival list for the online allocator instead of counts
    #[arg(long)]
    online: bool,

    /// Random seed (drawn at random when absent)
    #[arg(long)]
    seed: Option<u64>,

    /// Output file; stdout when absent
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
    let args = Args::parse();

    let params = GeneratorParams {
        rows: args.rows,
        columns: args.columns,
        aisle_row_every: args.aisle_rows,
        aisle_column_every: args.aisle_columns,
        blocked_fraction: args.blocked,
        fill_fraction: args.fill,
        format: if args.online {
            RequestFormat::Stream
        } else {
            RequestFormat::Counts
        },
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Seed: {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    let name = args
        .output
        .as_ref()
        .and_then(|p| p.file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("cinema_{}", params.format));
    let instance = generate(&params, &name, &mut rng)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, instance.to_string())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Instance saved to {}", path.display());
        }
        None => print!("{instance}"),
    }

    Ok(())
}
