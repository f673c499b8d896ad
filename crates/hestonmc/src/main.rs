use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use hestonmc::export::DEFAULT_SAMPLE_PATHS;
use hestonmc::{
    PlotData, ResultsFile, RunSettings, format_report, init_logging, load_settings,
    remove_previous_outputs,
};
use hestonmc_core::{SeededShocks, simulate_with_metrics, summarize};

#[derive(Parser, Debug)]
#[command(name = "hestonmc")]
#[command(about = "Price a European call under the Heston model by Monte Carlo")]
struct Args {
    /// YAML settings table (default: built-in fuel hedge)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Random seed (default: drawn from the OS and recorded in results.json)
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of simulated paths
    #[arg(short = 'm', long)]
    paths: Option<usize>,

    /// Override the number of time steps
    #[arg(short = 'n', long)]
    steps: Option<usize>,

    /// Histogram bin width for mode estimates
    #[arg(long)]
    bin_width: Option<f64>,

    /// Units of the underlying to cover
    #[arg(long)]
    notional: Option<f64>,

    /// Directory for results.json and paths.json
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Price paths to export for plotting
    #[arg(long, default_value_t = DEFAULT_SAMPLE_PATHS)]
    sample_paths: usize,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Write logs to hestonmc.log in this directory instead of stderr
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Args {
    fn run_settings(&self) -> color_eyre::Result<RunSettings> {
        let mut run = match &self.settings {
            Some(path) => load_settings(path)
                .wrap_err_with(|| format!("failed to load {}", path.display()))?,
            None => RunSettings::preset(),
        };
        if let Some(paths) = self.paths {
            run.params.num_paths = paths;
        }
        if let Some(steps) = self.steps {
            run.params.num_steps = steps;
        }
        if let Some(bin_width) = self.bin_width {
            run.bin_width = bin_width;
        }
        if let Some(notional) = self.notional {
            run.notional = notional;
        }
        Ok(run)
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(args.log_dir.as_deref(), &args.log_level)?;

    let run = args.run_settings()?;
    run.validate().wrap_err("invalid run settings")?;
    run.params
        .validate()
        .wrap_err("invalid simulation parameters")?;

    std::fs::create_dir_all(&args.output_dir)?;
    remove_previous_outputs(&args.output_dir)?;

    let shocks = args
        .seed
        .map_or_else(SeededShocks::from_entropy, SeededShocks::new);
    tracing::info!(
        seed = shocks.seed,
        paths = run.params.num_paths,
        steps = run.params.num_steps,
        "starting simulation"
    );
    println!("Starting the simulation.");

    let start = Instant::now();
    let (paths, metrics) = simulate_with_metrics(&run.params, &shocks)?;
    let report = summarize(&run.params, &paths, metrics, run.bin_width)?;
    let elapsed = start.elapsed();

    print!("{}", format_report(&report, elapsed, run.notional));

    ResultsFile::new(
        &run.params,
        shocks.seed,
        run.bin_width,
        run.notional,
        elapsed,
        &report,
    )
    .write(&args.output_dir)?;

    PlotData::from_paths(&paths, run.params.strike, run.bin_width, args.sample_paths)?
        .write(&args.output_dir)?;

    tracing::info!("run complete");
    Ok(())
}
