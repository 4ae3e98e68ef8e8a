use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use log::{error, info};
use seating::{
    Config, DEFAULT_CONFIG_PATH, RequestFormat, Requests, Solution, Strategy, find_violation,
    read_instance, solve_offline, solve_online,
};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// One offline instance
    Single,
    /// Several offline instances, one summary line each
    Batch,
    /// One instance whose groups arrive one at a time
    Online,
}

#[derive(Parser)]
#[command(author, version, about = "Seat groups in a cinema while keeping distance between them", long_about = None)]
struct Args {
    #[arg(short, long, value_enum, default_value_t = Mode::Single)]
    mode: Mode,

    /// Instance file; in batch mode also a directory of *.txt files
    #[arg(short, long = "instance", required = true)]
    instances: Vec<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override the configured offline strategy
    #[arg(short, long, value_enum)]
    strategy: Option<Strategy>,

    /// Override the configured random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of online search workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Write the final grid of a single or online run to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::load_or_default(&args.config)?;

    if let Some(strategy) = args.strategy {
        config.solver.strategy = strategy;
    }
    if let Some(seed) = args.seed {
        config.solver.seed = Some(seed);
    }
    if let Some(workers) = args.workers {
        config.online.workers = workers;
    }

    config.validate()?;
    Ok(config)
}

/// Directories expand to the *.txt files inside, sorted by name
fn expand_instances(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut entries = std::fs::read_dir(path)
                .with_context(|| format!("Failed to read directory {}", path.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "txt"))
                .collect::<Vec<_>>();
            entries.sort();
            files.extend(entries);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn single_instance(args: &Args) -> Result<&Path> {
    match args.instances.as_slice() {
        [path] => Ok(path.as_path()),
        _ => bail!(
            "{:?} mode takes exactly one instance, got {}",
            args.mode,
            args.instances.len()
        ),
    }
}

fn report(solution: &Solution, output: Option<&Path>) -> Result<()> {
    print!("{}", solution.grid);
    println!("{solution}");

    if let Some(path) = output {
        std::fs::write(path, solution.grid.to_string())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Grid saved to {}", path.display());
    }

    if !solution.valid {
        if let Some((a, b, violation)) = find_violation(&solution.grid) {
            error!("{violation} violation between {a:?} and {b:?}");
        }
        bail!("verification failed");
    }
    println!("verification passed");
    Ok(())
}

fn solve_file(path: &Path, config: &Config) -> Result<Solution> {
    let instance = read_instance(path, RequestFormat::Counts)
        .with_context(|| format!("Failed to load instance {}", path.display()))?;
    let Requests::Batch(demand) = &instance.requests else {
        bail!("{} has no group counts", path.display());
    };
    Ok(solve_offline(&instance.grid, demand, &config.solver, None)?)
}

fn run_single(args: &Args, config: &Config) -> Result<()> {
    let path = single_instance(args)?;
    let solution = solve_file(path, config)?;
    report(&solution, args.output.as_deref())
}

fn run_batch(args: &Args, config: &Config) -> Result<()> {
    let files = expand_instances(&args.instances)?;
    if files.is_empty() {
        bail!("no instance files found");
    }

    let (mut seated, mut requested, mut invalid) = (0, 0, 0);
    for path in &files {
        let solution = solve_file(path, config)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!(
            "{name}: {solution} ({}, {})",
            solution.method,
            if solution.valid { "valid" } else { "INVALID" }
        );
        seated += solution.seated;
        requested += solution.requested;
        if !solution.valid {
            invalid += 1;
        }
    }

    println!("total: seated {seated} out of {requested} over {} instances", files.len());
    if invalid > 0 {
        bail!("{invalid} instances failed verification");
    }
    Ok(())
}

fn run_online(args: &Args, config: &Config) -> Result<()> {
    let path = single_instance(args)?;
    let instance = read_instance(path, RequestFormat::Stream)
        .with_context(|| format!("Failed to load instance {}", path.display()))?;
    let Requests::Stream(arrivals) = &instance.requests else {
        bail!("{} has no arrival list", path.display());
    };

    let solution = solve_online(&instance.grid, arrivals, &config.online)?;
    report(&solution, args.output.as_deref())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();

    let config = load_config(&args)?;
    info!("Configuration: {}", args.config.display());

    match args.mode {
        Mode::Single => run_single(&args, &config),
        Mode::Batch => run_batch(&args, &config),
        Mode::Online => run_online(&args, &config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seating::{Grid, GroupDemand, Method};

    fn solution(row: &str, valid: bool) -> Solution {
        let grid = Grid::from_rows(&[row]).unwrap();
        Solution {
            seated: grid.seated(),
            requested: grid.seated(),
            grid,
            method: Method::Greedy,
            unplaced: GroupDemand::default(),
            valid,
        }
    }

    #[test]
    fn test_report_follows_solution_validity() {
        assert!(report(&solution("220022", true), None).is_ok());
        assert!(report(&solution("22022", false), None).is_err());
    }

    #[test]
    fn test_report_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.txt");
        report(&solution("20002", true), Some(path.as_path())).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1\n5\n20002\n");
    }
}
