use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::seed::MatchSeed;

pub const WIN: &str = "win";
pub const DRAW: &str = "draw";
pub const LOSS: &str = "loss";

/// Outcome name to points. Outcomes the table does not mention are worth zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct PointSystem(pub BTreeMap<String, f64>);

impl PointSystem {
    pub fn new(win: f64, draw: f64, loss: f64) -> Self {
        PointSystem(BTreeMap::from([
            (WIN.to_string(), win),
            (DRAW.to_string(), draw),
            (LOSS.to_string(), loss),
        ]))
    }

    pub fn value_for(&self, outcome: &str) -> f64 {
        self.0.get(outcome).copied().unwrap_or(0.0)
    }

    pub fn win_points(&self) -> f64 {
        self.value_for(WIN)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictPolicy {
    #[default]
    FloatDown,
    PairAnyway,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwissVariant {
    #[default]
    Generic,
    FideDutch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupingMethod {
    #[default]
    SimpleChunk,
    SwissGrouping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeamFormationMethod {
    #[default]
    BalanceFirstLast,
    Random,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TeamPersistence {
    #[default]
    Fresh,
    /// Rebuild teams from a prior round. Without an explicit source the most
    /// recent round before the one being drawn is used.
    FromRound { source_round_id: Option<Uuid> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RematchOptions {
    #[serde(default = "default_avoid_rematches")]
    pub avoid_rematches: bool,
    #[serde(default)]
    pub ignored_round_ids: Vec<Uuid>,
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
}

fn default_avoid_rematches() -> bool {
    true
}

impl Default for RematchOptions {
    fn default() -> Self {
        RematchOptions {
            avoid_rematches: true,
            ignored_round_ids: vec![],
            conflict_policy: ConflictPolicy::FloatDown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SwissRoundConfig {
    #[serde(default)]
    pub variant: SwissVariant,
    #[serde(default)]
    pub rematch: RematchOptions,
    #[serde(default)]
    pub bye_points: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FfaRoundConfig {
    pub group_size: usize,
    #[serde(default)]
    pub grouping: GroupingMethod,
    /// Placement (as written, "1", "2", ...) to points.
    #[serde(default)]
    pub placement_points: BTreeMap<String, f64>,
    #[serde(default)]
    pub rematch: RematchOptions,
    #[serde(default)]
    pub bye_points: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRoundConfig {
    pub team_size: usize,
    #[serde(default)]
    pub formation: TeamFormationMethod,
    #[serde(default)]
    pub persistence: TeamPersistence,
    #[serde(default)]
    pub variant: SwissVariant,
    #[serde(default)]
    pub rematch: RematchOptions,
    #[serde(default)]
    pub bye_points: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "system")]
pub enum RoundConfig {
    #[serde(rename = "swiss-1v1")]
    Swiss(SwissRoundConfig),
    #[serde(rename = "n-ffa")]
    Ffa(FfaRoundConfig),
    #[serde(rename = "team-2v2+")]
    Team(TeamRoundConfig),
    #[serde(rename = "custom")]
    Custom { seeds: Vec<MatchSeed> },
}

impl Default for RoundConfig {
    fn default() -> Self {
        RoundConfig::Swiss(SwissRoundConfig::default())
    }
}

impl RoundConfig {
    pub fn rematch_options(&self) -> Option<&RematchOptions> {
        match self {
            RoundConfig::Swiss(c) => Some(&c.rematch),
            RoundConfig::Ffa(c) => Some(&c.rematch),
            RoundConfig::Team(c) => Some(&c.rematch),
            RoundConfig::Custom { .. } => None,
        }
    }

    pub fn bye_points(&self) -> Option<f64> {
        match self {
            RoundConfig::Swiss(c) => c.bye_points,
            RoundConfig::Ffa(c) => c.bye_points,
            RoundConfig::Team(c) => c.bye_points,
            RoundConfig::Custom { .. } => None,
        }
    }

    pub fn placement_points(&self) -> Option<&BTreeMap<String, f64>> {
        match self {
            RoundConfig::Ffa(c) => Some(&c.placement_points),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct TournamentRound {
    pub uuid: Uuid,
    pub tournament_id: Uuid,
    pub index: u64,
    #[serde(default)]
    pub config: RoundConfig,
    #[serde(default)]
    pub point_system: Option<PointSystem>,
}

impl TournamentRound {
    pub fn new(tournament_id: Uuid, index: u64, config: RoundConfig) -> Self {
        TournamentRound {
            uuid: Uuid::new_v4(),
            tournament_id,
            index,
            config,
            point_system: None,
        }
    }

    /// The round's own point system, if it carries a non-empty one.
    pub fn point_system_override(&self) -> Option<&PointSystem> {
        self.point_system.as_ref().filter(|p| !p.is_empty())
    }
}
