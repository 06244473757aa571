//! safeflow: command-line driver for the SafeFlow traffic simulator.
//!
//! ```text
//! safeflow generate --out output/safeflow        # topology + telemetry corpus
//! safeflow route --from "Mill Creek" --hour 8 --weather rain
//! safeflow map                                   # text dump of the lattice
//! ```

mod setup;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use sf_core::CityConfig;
use sf_grid::{LandUse, Topology};
use sf_output::{CorpusOutputObserver, CsvWriter, OutputWriter};
use sf_routing::{RouteOutcome, RoutePlanner, RoutePolicy, RouteRequest};
use sf_telemetry::CorpusGenerator;

use setup::{CommonArgs, build_estimator, build_topology, load_config, resolve_neighborhood};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "safeflow")]
#[command(about = "Synthetic school-traffic telemetry and safety-aware routing")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the topology and a telemetry corpus
    Generate {
        /// Output directory
        #[arg(long, default_value = "output/safeflow")]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
    },
    /// Route one neighborhood to the school
    Route {
        /// Neighborhood id (`N3`, `3`) or display name
        #[arg(long)]
        from: String,
        #[arg(long, default_value_t = 8)]
        hour: u8,
        #[arg(long, default_value = "clear")]
        weather: String,
        /// shortest-distance, least-congestion or balanced; all three when omitted
        #[arg(long)]
        policy: Option<String>,
        /// Linear speed model JSON; the rule-based estimator when omitted
        #[arg(long)]
        model: Option<PathBuf>,
    },
    /// Print the land-use lattice, one symbol per cell
    Map,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Format {
    Csv,
    Sqlite,
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli.common)?;
    let topology = build_topology(&config, &cli.common)?;

    match cli.command {
        Command::Generate { out, format } => generate(&config, &topology, &out, format),
        Command::Route { from, hour, weather, policy, model } => {
            let estimator = build_estimator(&config, model.as_deref())?;
            let planner = RoutePlanner::new(&config, &topology, estimator.as_ref())?;
            let origin = resolve_neighborhood(&topology, &from)?;
            let requests = match policy {
                Some(p) => vec![RouteRequest::parse(hour, &weather, &p, origin)?],
                None => RoutePolicy::ALL
                    .iter()
                    .map(|p| RouteRequest::parse(hour, &weather, p.as_str(), origin))
                    .collect::<Result<Vec<_>, _>>()?,
            };
            for request in &requests {
                print_outcome(request, &planner.plan(request)?);
            }
            Ok(())
        }
        Command::Map => {
            print_map(&topology);
            Ok(())
        }
    }
}

// ── generate ──────────────────────────────────────────────────────────────────

fn generate(config: &CityConfig, topology: &Topology, out: &Path, format: Format) -> Result<()> {
    match format {
        Format::Csv => write_all(config, topology, CsvWriter::new(out)?),
        #[cfg(feature = "sqlite")]
        Format::Sqlite => write_all(config, topology, sf_output::SqliteWriter::new(out)?),
        #[cfg(not(feature = "sqlite"))]
        Format::Sqlite => anyhow::bail!("built without the `sqlite` feature"),
    }?;
    println!("Output written to {}", out.display());
    Ok(())
}

fn write_all<W: OutputWriter>(config: &CityConfig, topology: &Topology, mut writer: W) -> Result<()> {
    writer.write_topology(topology)?;

    let generator = CorpusGenerator::new(config, topology)?;
    println!(
        "Corpus: {} days × {} windows, {} samples expected",
        config.telemetry.days,
        config.telemetry.windows_per_day,
        generator.expected_samples(),
    );

    let mut obs = CorpusOutputObserver::new(writer);
    let t0 = Instant::now();
    let stats = generator.run(&mut obs);
    let elapsed = t0.elapsed();
    if let Some(e) = obs.take_error() {
        return Err(e.into());
    }

    println!("Generated {} samples in {:.3} s", stats.samples, elapsed.as_secs_f64());
    println!("  mean average_speed : {:.1} km/h", stats.mean_speed());
    println!("  congestion L/M/H   : {:?}", stats.congestion);
    println!("  accident risk L/M/H: {:?}", stats.risk);
    Ok(())
}

// ── route ─────────────────────────────────────────────────────────────────────

fn print_outcome(request: &RouteRequest, outcome: &RouteOutcome) {
    println!();
    println!("{} from {} at {} ({})", request.policy, request.origin, request.hour, request.weather);
    match outcome {
        RouteOutcome::Found(route) => {
            let path: Vec<String> = route.path.iter().map(|p| p.to_string()).collect();
            println!("  {} -> {}", route.origin_node, route.destination_node);
            println!("  path     : {}", path.join(" "));
            println!("  segments : {}", route.roads.len());
            println!("  cost     : {:.4}", route.cost);
            println!("  length   : {:.2} km", route.length_km);
            println!("  time     : {:.1} min", route.travel_time_h * 60.0);
        }
        RouteOutcome::NoRoute { from, to } => {
            println!("  no route from {from} to {to}");
        }
    }
}

// ── map ───────────────────────────────────────────────────────────────────────

fn print_map(topology: &Topology) {
    print!("{}", topology.grid);
    println!();
    for land_use in LandUse::ALL {
        let n = topology.grid.count(land_use);
        if n > 0 {
            println!("  {} {:<10} {n}", land_use.symbol(), land_use.as_str());
        }
    }
}
