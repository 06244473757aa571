//! Fluent builder producing a [`Topology`].

use std::collections::HashMap;

use sf_core::{CityConfig, GridPos, NeighborhoodId, RoadId, SimRng};

use crate::recipe::{Axis, LayoutRecipe, PlacementRule, neighborhood_name};
use crate::{CityGrid, GridResult, LandUse, Neighborhood, RoadSegment, check_roads};

// ── Topology ──────────────────────────────────────────────────────────────────

/// A generated (or loaded) town: land-use lattice, road segments,
/// neighborhoods, and the fixed destination.
#[derive(Clone, Debug, PartialEq)]
pub struct Topology {
    pub grid:          CityGrid,
    pub roads:         Vec<RoadSegment>,
    pub neighborhoods: Vec<Neighborhood>,
    pub destination:   GridPos,
}

impl Topology {
    pub fn neighborhood(&self, id: NeighborhoodId) -> Option<&Neighborhood> {
        self.neighborhoods.iter().find(|n| n.id == id)
    }

    pub fn neighborhood_by_name(&self, name: &str) -> Option<&Neighborhood> {
        self.neighborhoods.iter().find(|n| n.name.eq_ignore_ascii_case(name))
    }

    pub fn road(&self, id: RoadId) -> Option<&RoadSegment> {
        self.roads.iter().find(|r| r.id == id)
    }

    /// Every segment endpoint, segment by segment, `from` before `to`.
    /// Shared endpoints appear once per segment.
    pub fn road_nodes(&self) -> impl Iterator<Item = GridPos> + '_ {
        self.roads.iter().flat_map(|r| r.endpoints())
    }
}

// ── TopologyBuilder ───────────────────────────────────────────────────────────

/// Build a [`Topology`] from a [`LayoutRecipe`] and the run's seed.
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                                         |
/// |----------------------|-------------------------------------------------|
/// | `.recipe(r)`         | [`LayoutRecipe::default_town`]                  |
/// | `.roads(v)`          | Segments produced by the recipe's street rules  |
/// | `.neighborhoods(v)`  | Drawn from the recipe's sites and demographics  |
///
/// Supplying roads (e.g. loaded from CSV) makes the builder skip every
/// `Street` rule; supplying neighborhoods skips the demographic draws.  All
/// other rules still apply in recipe order.
///
/// # Example
///
/// ```
/// use sf_core::CityConfig;
/// use sf_grid::TopologyBuilder;
///
/// let config = CityConfig::default();
/// let town = TopologyBuilder::new(&config).build().unwrap();
/// assert_eq!(town, TopologyBuilder::new(&config).build().unwrap());
/// ```
pub struct TopologyBuilder<'a> {
    config:        &'a CityConfig,
    recipe:        LayoutRecipe,
    roads:         Option<Vec<RoadSegment>>,
    neighborhoods: Option<Vec<Neighborhood>>,
}

impl<'a> TopologyBuilder<'a> {
    pub fn new(config: &'a CityConfig) -> Self {
        Self {
            config,
            recipe:        LayoutRecipe::default_town(),
            roads:         None,
            neighborhoods: None,
        }
    }

    pub fn recipe(mut self, recipe: LayoutRecipe) -> Self {
        self.recipe = recipe;
        self
    }

    /// Use pre-built road segments instead of the recipe's streets.
    pub fn roads(mut self, roads: Vec<RoadSegment>) -> Self {
        self.roads = Some(roads);
        self
    }

    /// Use pre-built neighborhoods instead of drawing them.
    pub fn neighborhoods(mut self, neighborhoods: Vec<Neighborhood>) -> Self {
        self.neighborhoods = Some(neighborhoods);
        self
    }

    /// Validate the configuration and apply the recipe.
    ///
    /// Fails on an invalid `CityConfig` or on supplied roads with a repeated
    /// id or a non-positive length; layout rules never fail.
    pub fn build(self) -> GridResult<Topology> {
        self.config.validate()?;
        let size = self.config.grid_size;

        // Children are taken in a fixed order so each pass has its own
        // stream regardless of how many draws the other consumes.
        let mut root = SimRng::new(self.config.seed);
        let mut demographics_rng = root.child(1);
        let mut fill_rng = root.child(2);

        // ── Neighborhoods ─────────────────────────────────────────────────
        let neighborhoods = match self.neighborhoods {
            Some(v) => v
                .into_iter()
                .filter(|n| {
                    let keep = n.anchor.in_bounds(size);
                    if !keep {
                        log::warn!("skipping neighborhood {} at {}: outside grid", n.id, n.anchor);
                    }
                    keep
                })
                .collect(),
            None => draw_neighborhoods(&self.recipe, size, &mut demographics_rng),
        };

        // ── Roads supplied up front ───────────────────────────────────────
        let mut grid = CityGrid::new(size);
        let external_roads = self.roads.is_some();
        if let Some(v) = &self.roads {
            check_roads(v)?;
        }
        let mut roads: Vec<RoadSegment> = match self.roads {
            Some(v) => v
                .into_iter()
                .filter(|r| {
                    let keep = r.from.in_bounds(size) && r.to.in_bounds(size);
                    if !keep {
                        log::warn!("skipping road {} {}-{}: outside grid", r.id, r.from, r.to);
                    }
                    keep
                })
                .collect(),
            None => Vec::new(),
        };
        for r in &roads {
            grid.claim(r.from, LandUse::Road);
            grid.claim(r.to, LandUse::Road);
        }

        // ── Placement rules, in order ─────────────────────────────────────
        for rule in &self.recipe.rules {
            match rule {
                PlacementRule::Street { name, axis, line, from, to } => {
                    if external_roads {
                        log::debug!("street rule {name:?} skipped: roads supplied");
                        continue;
                    }
                    lay_street(&mut grid, &mut roads, name, *axis, *line, *from, *to, self.config);
                }
                PlacementRule::NeighborhoodHousing { width, height } => {
                    for n in &neighborhoods {
                        claim_rect(&mut grid, n.anchor, *width, *height, LandUse::House);
                    }
                }
                PlacementRule::Block { origin, width, height, land_use } => {
                    claim_rect(&mut grid, *origin, *width, *height, *land_use);
                }
                PlacementRule::Cells { cells, land_use } => {
                    for &pos in cells {
                        grid.claim(pos, *land_use);
                    }
                }
                PlacementRule::ScatterFill { near_road, elsewhere } => {
                    let empty: Vec<GridPos> = grid
                        .cells()
                        .filter(|&(_, c)| c == LandUse::Empty)
                        .map(|(p, _)| p)
                        .collect();
                    for pos in empty {
                        let r: f64 = fill_rng.random();
                        let table = if grid.is_road_adjacent(pos) { near_road } else { elsewhere };
                        grid.claim(pos, table.pick(r));
                    }
                }
            }
        }

        mark_intersections(&mut roads);

        log::debug!(
            "topology built: {} road segments, {} neighborhoods, {} empty cells left",
            roads.len(),
            neighborhoods.len(),
            grid.count(LandUse::Empty),
        );

        Ok(Topology {
            grid,
            roads,
            neighborhoods,
            destination: self.config.destination,
        })
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn draw_neighborhoods(recipe: &LayoutRecipe, size: u32, rng: &mut SimRng) -> Vec<Neighborhood> {
    let d = &recipe.demographics;
    recipe
        .neighborhood_sites
        .iter()
        .filter(|a| a.in_bounds(size))
        .enumerate()
        .map(|(i, &anchor)| {
            let population = rng.gen_range(d.population.0..=d.population.1);
            let pct: f64 = rng.gen_range(d.working_pct.0..=d.working_pct.1);
            let students = rng.gen_range(d.students.0..=d.students.1);
            Neighborhood {
                id: NeighborhoodId(i as u16),
                name: neighborhood_name(i),
                anchor,
                population,
                working_population_pct: (pct * 100.0).round() / 100.0,
                students,
            }
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn lay_street(
    grid:   &mut CityGrid,
    roads:  &mut Vec<RoadSegment>,
    name:   &str,
    axis:   Axis,
    line:   i32,
    from:   i32,
    to:     i32,
    config: &CityConfig,
) {
    let at = |k: i32| match axis {
        Axis::Horizontal => GridPos::new(k, line),
        Axis::Vertical   => GridPos::new(line, k),
    };
    for k in from..to {
        let (a, b) = (at(k), at(k + 1));
        grid.claim(a, LandUse::Road);
        grid.claim(b, LandUse::Road);
        // Clipped or blocked by an earlier rule: no segment.
        if grid.get(a) != Some(LandUse::Road) || grid.get(b) != Some(LandUse::Road) {
            log::debug!("street {name:?}: segment {a}-{b} skipped");
            continue;
        }
        roads.push(RoadSegment {
            id:              RoadId(roads.len() as u32),
            street_name:     name.to_owned(),
            from:            a,
            to:              b,
            length_km:       config.segment_length_km,
            lanes:           None,
            speed_limit:     None,
            is_intersection: false,
        });
    }
}

fn claim_rect(grid: &mut CityGrid, origin: GridPos, width: u32, height: u32, land_use: LandUse) {
    for dy in 0..height as i32 {
        for dx in 0..width as i32 {
            grid.claim(origin.offset(dx, dy), land_use);
        }
    }
}

/// Flag segments touching a node of degree ≥ 3.
fn mark_intersections(roads: &mut [RoadSegment]) {
    let mut degree: HashMap<GridPos, u32> = HashMap::new();
    for r in roads.iter() {
        *degree.entry(r.from).or_default() += 1;
        *degree.entry(r.to).or_default() += 1;
    }
    for r in roads.iter_mut() {
        r.is_intersection = degree[&r.from] >= 3 || degree[&r.to] >= 3;
    }
}
