//! Enumeration types for the Lumber agent.
//!
//! Every closed set of states lives here: the agent's working mode, the
//! configured disposal strategy, the tri-state interaction outcome, the
//! navigation result, and the catalogue of harvestable trees.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Agent mode
// ---------------------------------------------------------------------------

/// The working mode of the agent. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentMode {
    /// Looking for, walking to, and harvesting the configured resource.
    Harvesting,
    /// Emptying the inventory by dropping yield items one at a time.
    Discarding,
    /// Walking to a storage facility and depositing yield items.
    Storing,
}

impl fmt::Display for AgentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Harvesting => "harvesting",
            Self::Discarding => "discarding",
            Self::Storing => "storing",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Disposal mode
// ---------------------------------------------------------------------------

/// How the agent empties a full inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisposalMode {
    /// Drop yield items on the ground.
    #[default]
    Drop,
    /// Deposit yield items at the nearest storage facility.
    Bank,
}

impl DisposalMode {
    /// The mode the agent switches to once the inventory is full.
    ///
    /// This is also the mode the agent starts in, so that a session begun
    /// with a loaded inventory empties it before harvesting.
    pub const fn unload_mode(self) -> AgentMode {
        match self {
            Self::Drop => AgentMode::Discarding,
            Self::Bank => AgentMode::Storing,
        }
    }
}

impl FromStr for DisposalMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" | "discard" => Ok(Self::Drop),
            "bank" | "store" => Ok(Self::Bank),
            other => Err(format!("unknown disposal mode: {other}")),
        }
    }
}

impl fmt::Display for DisposalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drop => f.write_str("drop"),
            Self::Bank => f.write_str("bank"),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of one interact-then-confirm unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionOutcome {
    /// The interaction was accepted and its effect was observed.
    Success,
    /// The interaction request was rejected outright.
    Failed,
    /// The interaction was accepted but the effect was not observed in time.
    TimedOut,
}

impl ActionOutcome {
    /// Returns `true` if this outcome is `Success`.
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Why a navigation episode could not make progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockReason {
    /// No path to the destination (or its surrounding tiles) could be built.
    NoPath,
    /// The retry budget ran out, including the single escalated rebuild.
    Exhausted,
    /// The entity being approached no longer exists.
    TargetLost,
    /// There is no local agent to move.
    AgentMissing,
}

impl BlockReason {
    /// Whether a caller should try its alternate, shorter-range action.
    ///
    /// A lost target should simply be re-queried next cycle instead.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::NoPath | Self::Exhausted)
    }
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NoPath => "no path",
            Self::Exhausted => "retries exhausted",
            Self::TargetLost => "target lost",
            Self::AgentMissing => "agent missing",
        };
        f.write_str(label)
    }
}

/// Result of one `approach` call on the navigation controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavResult {
    /// The agent is within interaction range; no movement was issued.
    Arrived,
    /// One step was issued (or the episode escalated) and the episode continues.
    Progressed,
    /// The destination cannot be reached this episode.
    Blocked(BlockReason),
}

/// The kind of scene entity, which decides how it is interacted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// A fixed scene object (tree, bank booth).
    Object,
    /// A non-player character (banker).
    Npc,
}

// ---------------------------------------------------------------------------
// Tree catalogue
// ---------------------------------------------------------------------------

/// The trees the agent knows how to harvest, with their yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeType {
    /// Regular tree.
    #[default]
    Normal,
    /// Oak tree.
    Oak,
    /// Willow tree.
    Willow,
    /// Maple tree.
    Maple,
    /// Yew tree.
    Yew,
    /// Magic tree.
    Magic,
}

impl TreeType {
    /// Every tree type, lowest level first.
    pub const ALL: [Self; 6] = [
        Self::Normal,
        Self::Oak,
        Self::Willow,
        Self::Maple,
        Self::Yew,
        Self::Magic,
    ];

    /// Scene name of the tree.
    pub const fn tree_name(self) -> &'static str {
        match self {
            Self::Normal => "Tree",
            Self::Oak => "Oak tree",
            Self::Willow => "Willow tree",
            Self::Maple => "Maple tree",
            Self::Yew => "Yew tree",
            Self::Magic => "Magic tree",
        }
    }

    /// Inventory name of the logs the tree yields.
    pub const fn log_name(self) -> &'static str {
        match self {
            Self::Normal => "Logs",
            Self::Oak => "Oak logs",
            Self::Willow => "Willow logs",
            Self::Maple => "Maple logs",
            Self::Yew => "Yew logs",
            Self::Magic => "Magic logs",
        }
    }

    /// Woodcutting level required to chop the tree.
    pub const fn required_level(self) -> u32 {
        match self {
            Self::Normal => 1,
            Self::Oak => 15,
            Self::Willow => 30,
            Self::Maple => 45,
            Self::Yew => 60,
            Self::Magic => 75,
        }
    }
}

impl FromStr for TreeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tree| {
                let short = tree.tree_name().to_ascii_lowercase();
                wanted == short || wanted == short.trim_end_matches(" tree") || wanted == tree.to_string()
            })
            .ok_or_else(|| format!("unknown tree type: {s}"))
    }
}

impl fmt::Display for TreeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Normal => "normal",
            Self::Oak => "oak",
            Self::Willow => "willow",
            Self::Maple => "maple",
            Self::Yew => "yew",
            Self::Magic => "magic",
        };
        f.write_str(label)
    }
}
