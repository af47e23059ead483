mod watch;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use orbitcast_core::{
    analyze_scenario, build_simulation_context, get_body_states, Forecast, ForecastRequest,
    ScenarioConfig, SimulationContext,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "orbitcast")]
#[command(about = "Orbit simulation with scheduled burns and trajectory forecasts", long_about = None)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Advance a scenario and print the resulting body states
    Run {
        /// Path to the scenario YAML file
        file: PathBuf,
        /// Simulation seconds to advance
        #[arg(short, long, default_value_t = 0.0)]
        duration: f64,
    },
    /// Print the forecast of every massless body
    Forecast {
        file: PathBuf,
        #[command(flatten)]
        options: ForecastOptions,
    },
    /// Check a scenario and print its diagnostics
    Check { file: PathBuf },
    /// Re-run the forecast every time the scenario file changes
    Watch {
        file: PathBuf,
        #[command(flatten)]
        options: ForecastOptions,
    },
}

#[derive(clap::Args, Clone, Debug)]
pub struct ForecastOptions {
    /// Body to put first in the forecast
    #[arg(long)]
    focus: Option<String>,
    /// Number of samples (overrides the scenario)
    #[arg(long, requires = "spacing")]
    samples: Option<usize>,
    /// Seconds between samples (overrides the scenario)
    #[arg(long, requires = "samples")]
    spacing: Option<f64>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Run { file, duration } => run_file(&file, duration),
        Commands::Forecast { file, options } => forecast_file(&file, &options),
        Commands::Check { file } => check_file(&file),
        Commands::Watch { file, options } => watch::watch_file(&file, &options),
    }
}

fn load_context(file: &Path) -> Result<SimulationContext> {
    let config = ScenarioConfig::from_path(file)?;
    let (ctx, _diagnostics) = build_simulation_context(&config)
        .with_context(|| format!("cannot build scenario {}", file.display()))?;
    Ok(ctx)
}

fn run_file(file: &Path, duration: f64) -> Result<()> {
    let mut ctx = load_context(file)?;
    let steps = ctx.advance_sim_time(duration)?;
    tracing::info!(steps, duration, "advanced scenario");

    println!("t = {:.1}s", ctx.elapsed);
    for state in get_body_states(&ctx) {
        println!(
            "{:<12} p=({:>12.4e}, {:>12.4e}) v=({:>12.4e}, {:>12.4e}) heading={:>7.2} thrust={:+.0} burns={}",
            state.name,
            state.position.x,
            state.position.y,
            state.velocity.x,
            state.velocity.y,
            state.heading_deg,
            state.thrust,
            state.pending_burns,
        );
    }
    Ok(())
}

pub(crate) fn forecast_file(file: &Path, options: &ForecastOptions) -> Result<()> {
    let ctx = load_context(file)?;
    let request = forecast_request(&ctx, options)?;
    let forecast = ctx.world.forecast(&request)?;
    print_forecast(&ctx, &forecast);
    Ok(())
}

fn forecast_request(ctx: &SimulationContext, options: &ForecastOptions) -> Result<ForecastRequest> {
    let mut request = ctx.forecast_request();
    if let (Some(samples), Some(spacing)) = (options.samples, options.spacing) {
        request.sample_times = ForecastRequest::evenly_spaced(samples, spacing).sample_times;
    }
    if let Some(name) = &options.focus {
        let Some(id) = ctx.body_id(name) else {
            bail!("no body named '{}'", name);
        };
        request.focus = Some(id);
    }
    Ok(request)
}

fn print_forecast(ctx: &SimulationContext, forecast: &Forecast) {
    for track in &forecast.bodies {
        println!("{}", ctx.world[track.body].name());
        for ((t, p), burn) in forecast
            .sample_times
            .iter()
            .zip(&track.positions)
            .zip(&track.burns)
        {
            println!("  {:>10.1}  {:>14.6e}  {:>14.6e}  {:+.0}", t, p.x, p.y, burn);
        }
    }
}

fn check_file(file: &Path) -> Result<()> {
    let config = ScenarioConfig::from_path(file)?;
    let diagnostics = analyze_scenario(&config);
    for diagnostic in diagnostics.iter() {
        println!("{}", diagnostic);
    }
    if diagnostics.has_errors() {
        bail!("{} has {} error(s)", file.display(), diagnostics.errors().count());
    }
    println!("{}: ok", file.display());
    Ok(())
}
