use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TeamLabel {
    A,
    B,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchParticipant {
    pub participant_id: Uuid,
    #[serde(default)]
    pub team: Option<TeamLabel>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub points_awarded: f64,
    #[serde(default)]
    pub custom_stats: BTreeMap<String, f64>,
}

impl MatchParticipant {
    pub fn new(participant_id: Uuid) -> Self {
        MatchParticipant {
            participant_id,
            team: None,
            result: None,
            points_awarded: 0.0,
            custom_stats: BTreeMap::new(),
        }
    }

    pub fn with_result(participant_id: Uuid, result: &str) -> Self {
        MatchParticipant {
            result: Some(result.to_string()),
            ..Self::new(participant_id)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub uuid: Uuid,
    pub tournament_id: Uuid,
    pub round_id: Uuid,
    pub status: MatchStatus,
    pub participants: Vec<MatchParticipant>,
    #[serde(default)]
    pub team_names: Option<BTreeMap<TeamLabel, String>>,
}

impl MatchRecord {
    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    pub fn is_bye(&self) -> bool {
        self.is_completed() && self.participants.len() == 1
    }

    pub fn has_team_labels(&self) -> bool {
        self.participants.iter().any(|p| p.team.is_some())
    }

    pub fn participant_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.participants.iter().map(|p| p.participant_id)
    }
}
