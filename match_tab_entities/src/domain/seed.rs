use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::match_record::{MatchParticipant, MatchRecord, MatchStatus, TeamLabel};
use super::round::WIN;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedParticipant {
    pub participant_id: Uuid,
    #[serde(default)]
    pub team: Option<TeamLabel>,
    /// Only set on byes.
    #[serde(default)]
    pub result: Option<String>,
    /// Only set on byes.
    #[serde(default)]
    pub points_awarded: Option<f64>,
}

impl SeedParticipant {
    pub fn new(participant_id: Uuid) -> Self {
        SeedParticipant {
            participant_id,
            team: None,
            result: None,
            points_awarded: None,
        }
    }

    pub fn in_team(participant_id: Uuid, team: TeamLabel) -> Self {
        SeedParticipant {
            team: Some(team),
            ..Self::new(participant_id)
        }
    }
}

/// A proposed match that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSeed {
    pub status: MatchStatus,
    pub participants: Vec<SeedParticipant>,
    #[serde(default)]
    pub team_names: Option<BTreeMap<TeamLabel, String>>,
}

impl MatchSeed {
    pub fn pending(participant_ids: impl IntoIterator<Item = Uuid>) -> Self {
        MatchSeed {
            status: MatchStatus::Pending,
            participants: participant_ids.into_iter().map(SeedParticipant::new).collect(),
            team_names: None,
        }
    }

    pub fn bye(participant_id: Uuid, points: f64) -> Self {
        MatchSeed {
            status: MatchStatus::Completed,
            participants: vec![SeedParticipant {
                result: Some(WIN.to_string()),
                points_awarded: Some(points),
                ..SeedParticipant::new(participant_id)
            }],
            team_names: None,
        }
    }

    pub fn is_bye(&self) -> bool {
        self.status == MatchStatus::Completed && self.participants.len() == 1
    }

    pub fn participant_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.participants.iter().map(|p| p.participant_id)
    }

    pub fn into_match_record(self, uuid: Uuid, tournament_id: Uuid, round_id: Uuid) -> MatchRecord {
        MatchRecord {
            uuid,
            tournament_id,
            round_id,
            status: self.status,
            participants: self
                .participants
                .into_iter()
                .map(|p| MatchParticipant {
                    participant_id: p.participant_id,
                    team: p.team,
                    result: p.result,
                    points_awarded: p.points_awarded.unwrap_or(0.0),
                    custom_stats: BTreeMap::new(),
                })
                .collect(),
            team_names: self.team_names,
        }
    }
}
