use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::score::ScoreVector;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Participant {
    pub uuid: Uuid,
    pub tournament_id: Uuid,
    pub name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub scores: ScoreVector,
    #[serde(default)]
    pub match_history: Vec<Uuid>,
}

fn default_active() -> bool {
    true
}

impl Participant {
    pub fn new(tournament_id: Uuid, name: String) -> Self {
        Participant {
            uuid: Uuid::new_v4(),
            tournament_id,
            name,
            is_active: true,
            scores: ScoreVector::default(),
            match_history: vec![],
        }
    }
}
