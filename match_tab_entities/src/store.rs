use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::domain::match_record::MatchRecord;
use crate::domain::participant::Participant;
use crate::domain::round::TournamentRound;
use crate::domain::score::ScoreVector;
use crate::domain::team::Team;
use crate::domain::tournament::Tournament;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("Tournament {0} does not exist")]
    TournamentDoesNotExist(Uuid),
    #[error("Participant {0} does not exist")]
    ParticipantDoesNotExist(Uuid),
    #[error("A team with key {lookup_key} already exists")]
    DuplicateTeamKey { lookup_key: String },
    #[error("Standings generation is {actual}, expected {expected}")]
    StaleGeneration { expected: u64, actual: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantStandingsUpdate {
    pub participant_id: Uuid,
    pub scores: ScoreVector,
    pub match_history: Vec<Uuid>,
}

/// The persistence collaborator. Everything the engine reads is loaded per
/// tournament; everything it writes goes through `upsert_team`,
/// `save_matches` or the bulk `save_standings`.
#[async_trait]
pub trait TournamentStore: Send + Sync {
    async fn get_tournament(&self, tournament_id: Uuid) -> Result<Tournament, StoreError>;
    async fn get_participants(&self, tournament_id: Uuid) -> Result<Vec<Participant>, StoreError>;
    async fn get_rounds(&self, tournament_id: Uuid) -> Result<Vec<TournamentRound>, StoreError>;
    async fn get_matches(&self, tournament_id: Uuid) -> Result<Vec<MatchRecord>, StoreError>;
    async fn get_teams(&self, tournament_id: Uuid) -> Result<Vec<Team>, StoreError>;

    /// Inserts the team unless one with the same lookup key exists, in which
    /// case `StoreError::DuplicateTeamKey` is returned and nothing changes.
    async fn upsert_team(&self, team: Team) -> Result<(), StoreError>;

    async fn save_matches(&self, matches: Vec<MatchRecord>) -> Result<(), StoreError>;

    /// Writes all updates at once if the tournament is still at
    /// `expected_generation`, and bumps the generation.
    async fn save_standings(
        &self,
        tournament_id: Uuid,
        expected_generation: u64,
        updates: Vec<ParticipantStandingsUpdate>,
    ) -> Result<u64, StoreError>;
}

/// Everything stored for one tournament, in the shape the CLI reads and
/// writes as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TournamentSnapshot {
    pub tournament: Tournament,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub rounds: Vec<TournamentRound>,
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
    #[serde(default)]
    pub teams: Vec<Team>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tournaments: Mutex<HashMap<Uuid, TournamentSnapshot>>,
}

impl MemoryStore {
    pub fn from_snapshot(snapshot: TournamentSnapshot) -> Self {
        let tournaments = HashMap::from([(snapshot.tournament.uuid, snapshot)]);
        MemoryStore { tournaments: Mutex::new(tournaments) }
    }

    pub async fn snapshot(&self, tournament_id: Uuid) -> Result<TournamentSnapshot, StoreError> {
        self.tournaments
            .lock()
            .await
            .get(&tournament_id)
            .cloned()
            .ok_or(StoreError::TournamentDoesNotExist(tournament_id))
    }
}

#[async_trait]
impl TournamentStore for MemoryStore {
    async fn get_tournament(&self, tournament_id: Uuid) -> Result<Tournament, StoreError> {
        Ok(self.snapshot(tournament_id).await?.tournament)
    }

    async fn get_participants(&self, tournament_id: Uuid) -> Result<Vec<Participant>, StoreError> {
        Ok(self.snapshot(tournament_id).await?.participants)
    }

    async fn get_rounds(&self, tournament_id: Uuid) -> Result<Vec<TournamentRound>, StoreError> {
        Ok(self.snapshot(tournament_id).await?.rounds)
    }

    async fn get_matches(&self, tournament_id: Uuid) -> Result<Vec<MatchRecord>, StoreError> {
        Ok(self.snapshot(tournament_id).await?.matches)
    }

    async fn get_teams(&self, tournament_id: Uuid) -> Result<Vec<Team>, StoreError> {
        Ok(self.snapshot(tournament_id).await?.teams)
    }

    async fn upsert_team(&self, team: Team) -> Result<(), StoreError> {
        let mut tournaments = self.tournaments.lock().await;
        let snapshot = tournaments
            .get_mut(&team.tournament_id)
            .ok_or(StoreError::TournamentDoesNotExist(team.tournament_id))?;

        if snapshot.teams.iter().any(|t| t.lookup_key == team.lookup_key) {
            return Err(StoreError::DuplicateTeamKey { lookup_key: team.lookup_key });
        }
        snapshot.teams.push(team);
        Ok(())
    }

    async fn save_matches(&self, matches: Vec<MatchRecord>) -> Result<(), StoreError> {
        let mut tournaments = self.tournaments.lock().await;
        for record in matches {
            let snapshot = tournaments
                .get_mut(&record.tournament_id)
                .ok_or(StoreError::TournamentDoesNotExist(record.tournament_id))?;

            match snapshot.matches.iter_mut().find(|m| m.uuid == record.uuid) {
                Some(existing) => *existing = record,
                None => snapshot.matches.push(record),
            }
        }
        Ok(())
    }

    async fn save_standings(
        &self,
        tournament_id: Uuid,
        expected_generation: u64,
        updates: Vec<ParticipantStandingsUpdate>,
    ) -> Result<u64, StoreError> {
        let mut tournaments = self.tournaments.lock().await;
        let snapshot = tournaments
            .get_mut(&tournament_id)
            .ok_or(StoreError::TournamentDoesNotExist(tournament_id))?;

        if snapshot.tournament.standings_generation != expected_generation {
            return Err(StoreError::StaleGeneration {
                expected: expected_generation,
                actual: snapshot.tournament.standings_generation,
            });
        }

        let index = snapshot
            .participants
            .iter()
            .enumerate()
            .map(|(i, p)| (p.uuid, i))
            .collect::<HashMap<_, _>>();

        // Nothing is written unless every participant exists
        if let Some(missing) = updates.iter().find(|u| !index.contains_key(&u.participant_id)) {
            return Err(StoreError::ParticipantDoesNotExist(missing.participant_id));
        }

        for update in updates {
            let participant = &mut snapshot.participants[index[&update.participant_id]];
            participant.scores = update.scores;
            participant.match_history = update.match_history;
        }

        snapshot.tournament.standings_generation += 1;
        debug!(
            "Standings of {} written at generation {}",
            tournament_id, snapshot.tournament.standings_generation
        );
        Ok(snapshot.tournament.standings_generation)
    }
}
