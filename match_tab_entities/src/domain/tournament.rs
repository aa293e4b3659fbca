use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::round::PointSystem;
use super::score::{BUCHHOLZ, BUCHHOLZ2, POINTS};

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct TournamentSettings {
    #[serde(default = "default_point_system")]
    pub point_system: PointSystem,
    /// Score keys in tie-break priority order, highest first.
    #[serde(default = "default_tie_breakers")]
    pub tie_breakers: Vec<String>,
    #[serde(default)]
    pub custom_stat_keys: Vec<String>,
}

fn default_point_system() -> PointSystem {
    PointSystem::new(3.0, 1.0, 0.0)
}

fn default_tie_breakers() -> Vec<String> {
    vec![POINTS.into(), BUCHHOLZ.into(), BUCHHOLZ2.into()]
}

impl Default for TournamentSettings {
    fn default() -> Self {
        TournamentSettings {
            point_system: default_point_system(),
            tie_breakers: default_tie_breakers(),
            custom_stat_keys: vec![],
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Default)]
pub struct Tournament {
    pub uuid: Uuid,
    pub name: String,
    #[serde(default)]
    pub settings: TournamentSettings,
    /// Bumped on every standings write.
    #[serde(default)]
    pub standings_generation: u64,
}

impl Tournament {
    pub fn new() -> Self {
        Tournament {
            uuid: Uuid::new_v4(),
            name: "New Tournament".into(),
            settings: TournamentSettings::default(),
            standings_generation: 0,
        }
    }
}
