use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const POINTS: &str = "points";
pub const WINS: &str = "wins";
pub const LOSSES: &str = "losses";
pub const DRAWS: &str = "draws";
pub const BUCHHOLZ: &str = "buchholz";
pub const BUCHHOLZ2: &str = "buchholz2";

/// A participant's derived scores. Every field is recomputed from the
/// completed match log, custom statistics included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ScoreVector {
    #[serde(default)]
    pub points: f64,
    #[serde(default)]
    pub wins: f64,
    #[serde(default)]
    pub losses: f64,
    #[serde(default)]
    pub draws: f64,
    #[serde(default)]
    pub buchholz: f64,
    #[serde(default)]
    pub buchholz2: f64,
    #[serde(default, flatten)]
    pub custom: BTreeMap<String, f64>,
}

impl ScoreVector {
    pub fn new_with_custom_keys(custom_stat_keys: &[String]) -> Self {
        ScoreVector {
            custom: custom_stat_keys.iter().map(|k| (k.clone(), 0.0)).collect(),
            ..Default::default()
        }
    }

    /// Missing keys read as zero.
    pub fn get(&self, key: &str) -> f64 {
        match key {
            POINTS => self.points,
            WINS => self.wins,
            LOSSES => self.losses,
            DRAWS => self.draws,
            BUCHHOLZ => self.buchholz,
            BUCHHOLZ2 => self.buchholz2,
            other => self.custom.get(other).copied().unwrap_or(0.0),
        }
    }

    pub fn add(&mut self, key: &str, value: f64) {
        match key {
            POINTS => self.points += value,
            WINS => self.wins += value,
            LOSSES => self.losses += value,
            DRAWS => self.draws += value,
            BUCHHOLZ => self.buchholz += value,
            BUCHHOLZ2 => self.buchholz2 += value,
            other => *self.custom.entry(other.to_string()).or_insert(0.0) += value,
        }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        [POINTS, WINS, LOSSES, DRAWS, BUCHHOLZ, BUCHHOLZ2]
            .into_iter()
            .chain(self.custom.keys().map(|k| k.as_str()))
    }

    /// Two vectors are tied when every named field on either side is equal,
    /// treating a field only one side carries as zero on the other.
    pub fn is_tied_with(&self, other: &ScoreVector) -> bool {
        self.field_names()
            .chain(other.field_names())
            .all(|key| self.get(key) == other.get(key))
    }
}
