//! Shared start-up: config, topology and estimator.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use sf_core::{CityConfig, NeighborhoodId};
use sf_grid::{Topology, TopologyBuilder, load_neighborhoods_csv, load_roads_csv};
use sf_routing::{CachedEstimator, LinearSpeedModel, RuleSpeedModel, SpeedEstimator};

/// Options every subcommand accepts.
#[derive(clap::Args, Debug)]
pub struct CommonArgs {
    /// JSON file overriding parts of the default configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured seed
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Road segments CSV replacing the built-in street layout
    #[arg(long, global = true)]
    pub roads: Option<PathBuf>,

    /// Neighborhoods CSV replacing the drawn neighborhoods
    #[arg(long, global = true)]
    pub neighborhoods: Option<PathBuf>,
}

pub fn load_config(args: &CommonArgs) -> Result<CityConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<CityConfig>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => CityConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

pub fn build_topology(config: &CityConfig, args: &CommonArgs) -> Result<Topology> {
    let mut builder = TopologyBuilder::new(config);
    if let Some(path) = &args.roads {
        let roads = load_roads_csv(path, config.segment_length_km)
            .with_context(|| format!("loading roads from {}", path.display()))?;
        log::info!("loaded {} road segments from {}", roads.len(), path.display());
        builder = builder.roads(roads);
    }
    if let Some(path) = &args.neighborhoods {
        let hoods = load_neighborhoods_csv(path)
            .with_context(|| format!("loading neighborhoods from {}", path.display()))?;
        log::info!("loaded {} neighborhoods from {}", hoods.len(), path.display());
        builder = builder.neighborhoods(hoods);
    }
    let topology = builder.build()?;
    log::info!(
        "topology: {} road segments, {} neighborhoods, destination {}",
        topology.roads.len(),
        topology.neighborhoods.len(),
        topology.destination,
    );
    Ok(topology)
}

/// A linear model from `path`, or the cached rule model when none is given.
pub fn build_estimator(config: &CityConfig, path: Option<&Path>) -> Result<Box<dyn SpeedEstimator>> {
    match path {
        Some(path) => {
            let model = LinearSpeedModel::from_json_file(path)
                .with_context(|| format!("loading speed model {}", path.display()))?
                .with_optional(config.routing.optional_columns.iter().cloned());
            log::info!("speed model {}: {} columns", path.display(), model.schema().len());
            Ok(Box::new(model))
        }
        None => {
            log::info!("no speed model given; using the rule-based estimator");
            Ok(Box::new(CachedEstimator::new(RuleSpeedModel::from_config(config))))
        }
    }
}

/// Resolve `N3`, `3` or a display name to a neighborhood id.
pub fn resolve_neighborhood(topology: &Topology, key: &str) -> Result<NeighborhoodId> {
    if let Ok(id) = key.parse::<NeighborhoodId>() {
        return Ok(id);
    }
    topology
        .neighborhood_by_name(key)
        .map(|n| n.id)
        .with_context(|| format!("no neighborhood named {key:?}"))
}
