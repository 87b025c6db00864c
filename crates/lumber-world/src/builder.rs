//! Fluent construction of a [`Sandbox`], validated on [`SandboxBuilder::build`].

use std::time::Duration;

use lumber_types::{Area, Entity, EntityId, EntityKind, Tile, TreeType};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::WorldError;
use crate::grid::Grid;
use crate::inventory::{Backpack, DEFAULT_CAPACITY};
use crate::sandbox::{Sandbox, SandboxSettings, Walker};
use crate::trees::TreeNode;

/// Name of every bank booth object.
pub const BOOTH_NAME: &str = "Bank booth";

/// Name of every banker NPC.
pub const BANKER_NAME: &str = "Banker";

#[derive(Debug, Clone)]
struct TreePlan {
    name: String,
    log_name: String,
    tile: Tile,
}

/// Builder for a [`Sandbox`].
///
/// ```text
/// SandboxBuilder::new(40, 40)
///     .agent_at(Tile::new(5, 5))
///     .tree(TreeType::Oak, Tile::new(12, 6))
///     .booth(Tile::new(2, 2))
///     .build()?
/// ```
#[derive(Debug, Clone)]
pub struct SandboxBuilder {
    width: u32,
    height: u32,
    seed: u64,
    capacity: u8,
    settings: SandboxSettings,
    agent: Option<Tile>,
    trees: Vec<TreePlan>,
    facilities: Vec<(EntityKind, Tile)>,
    obstacles: Vec<Tile>,
    items: Vec<(String, u32)>,
    visibility: u8,
}

impl SandboxBuilder {
    /// Start a `width` x `height` layout with the agent at the origin.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            seed: 0,
            capacity: DEFAULT_CAPACITY,
            settings: SandboxSettings::default(),
            agent: Some(Tile::new(0, 0)),
            trees: Vec::new(),
            facilities: Vec::new(),
            obstacles: Vec::new(),
            items: Vec::new(),
            visibility: 100,
        }
    }

    /// Seed for log yields.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the simulation tunables.
    #[must_use]
    pub fn settings(mut self, settings: SandboxSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Inventory slot count.
    #[must_use]
    pub const fn capacity(mut self, capacity: u8) -> Self {
        self.capacity = capacity;
        self
    }

    /// Place the agent.
    #[must_use]
    pub const fn agent_at(mut self, tile: Tile) -> Self {
        self.agent = Some(tile);
        self
    }

    /// Start with no agent loaded.
    #[must_use]
    pub const fn without_agent(mut self) -> Self {
        self.agent = None;
        self
    }

    /// Visibility of every entity placed after this call.
    #[must_use]
    pub const fn visibility(mut self, percent: u8) -> Self {
        self.visibility = percent;
        self
    }

    /// Plant a catalogue tree.
    #[must_use]
    pub fn tree(self, tree: TreeType, tile: Tile) -> Self {
        self.custom_tree(tree.tree_name(), tree.log_name(), tile)
    }

    /// Plant a tree with arbitrary names.
    #[must_use]
    pub fn custom_tree(mut self, name: &str, log_name: &str, tile: Tile) -> Self {
        self.trees.push(TreePlan {
            name: name.to_owned(),
            log_name: log_name.to_owned(),
            tile,
        });
        self
    }

    /// Place a bank booth.
    #[must_use]
    pub fn booth(mut self, tile: Tile) -> Self {
        self.facilities.push((EntityKind::Object, tile));
        self
    }

    /// Place a banker NPC.
    #[must_use]
    pub fn banker(mut self, tile: Tile) -> Self {
        self.facilities.push((EntityKind::Npc, tile));
        self
    }

    /// Block one tile.
    #[must_use]
    pub fn obstacle(mut self, tile: Tile) -> Self {
        self.obstacles.push(tile);
        self
    }

    /// Block every tile of the rectangle spanned by `a` and `b`.
    #[must_use]
    pub fn wall(mut self, a: Tile, b: Tile) -> Self {
        self.obstacles.extend(Area::new(a, b).tiles());
        self
    }

    /// Start with `count` items named `name` in the inventory.
    #[must_use]
    pub fn give(mut self, name: &str, count: u32) -> Self {
        self.items.push((name.to_owned(), count));
        self
    }

    /// Validate the layout and build the sandbox.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] for anything off the grid,
    /// [`WorldError::TileOccupied`] for overlapping placements,
    /// [`WorldError::InventoryFull`] if too many items were given, and
    /// [`WorldError::InvalidLayout`] for an empty grid or bad tunables.
    pub fn build(self) -> Result<Sandbox, WorldError> {
        if self.width == 0 || self.height == 0 {
            return Err(invalid("grid must be at least 1x1"));
        }
        if self.settings.min_logs > self.settings.max_logs {
            return Err(invalid("min_logs exceeds max_logs"));
        }
        if self.settings.step_time == Duration::ZERO || self.settings.chop_interval == Duration::ZERO
        {
            return Err(invalid("step_time and chop_interval must be positive"));
        }

        let mut grid = Grid::new(self.width, self.height);
        let mut placed: Vec<(Tile, String)> = Vec::new();
        let mut claim = |grid: &Grid, tile: Tile, what: &str| -> Result<(), WorldError> {
            grid.check(tile)?;
            if let Some((_, occupant)) = placed.iter().find(|(t, _)| *t == tile) {
                return Err(WorldError::TileOccupied {
                    tile,
                    occupant: occupant.clone(),
                });
            }
            placed.push((tile, what.to_owned()));
            Ok(())
        };

        for tile in &self.obstacles {
            grid.check(*tile)?;
            grid.add_obstacle(*tile);
        }
        for plan in &self.trees {
            if grid.is_obstacle(plan.tile) {
                return Err(occupied(plan.tile, "an obstacle"));
            }
            claim(&grid, plan.tile, &plan.name)?;
        }
        for (kind, tile) in &self.facilities {
            if grid.is_obstacle(*tile) {
                return Err(occupied(*tile, "an obstacle"));
            }
            claim(&grid, *tile, facility_name(*kind))?;
        }
        if let Some(tile) = self.agent {
            grid.check(tile)?;
            if grid.is_obstacle(tile) {
                return Err(occupied(tile, "an obstacle"));
            }
            if let Some((_, occupant)) = placed.iter().find(|(t, _)| *t == tile) {
                return Err(occupied(tile, occupant));
            }
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let trees = self
            .trees
            .iter()
            .map(|plan| {
                let logs = draw(&mut rng, self.settings.min_logs, self.settings.max_logs);
                TreeNode::new(&plan.name, &plan.log_name, plan.tile, logs, self.visibility)
            })
            .collect();
        let facilities = self
            .facilities
            .iter()
            .map(|(kind, tile)| Entity {
                id: EntityId::new(),
                name: facility_name(*kind).to_owned(),
                kind: *kind,
                area: Area::single(*tile),
                visibility: self.visibility,
            })
            .collect();

        let mut backpack = Backpack::new(self.capacity);
        for (name, count) in &self.items {
            for _ in 0..*count {
                if !backpack.add(name) {
                    return Err(WorldError::InventoryFull {
                        capacity: self.capacity,
                    });
                }
            }
        }

        let agent = self.agent.map(|position| Walker {
            position,
            moving_until: Duration::ZERO,
        });
        Ok(Sandbox::assemble(
            self.settings,
            grid,
            agent,
            trees,
            facilities,
            backpack,
            rng,
        ))
    }
}

const fn facility_name(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Object => BOOTH_NAME,
        EntityKind::Npc => BANKER_NAME,
    }
}

pub(crate) fn draw(rng: &mut StdRng, min: u32, max: u32) -> u32 {
    if min >= max {
        min
    } else {
        rng.random_range(min..=max)
    }
}

fn invalid(reason: &str) -> WorldError {
    WorldError::InvalidLayout {
        reason: reason.to_owned(),
    }
}

fn occupied(tile: Tile, occupant: &str) -> WorldError {
    WorldError::TileOccupied {
        tile,
        occupant: occupant.to_owned(),
    }
}
