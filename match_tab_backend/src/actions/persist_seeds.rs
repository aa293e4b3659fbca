use std::collections::HashSet;

use async_trait::async_trait;
use itertools::Itertools;
use match_tab_entities::prelude::*;
use match_tab_entities::{StoreError, TournamentStore};
use serde::{Deserialize, Serialize};

use super::generate_round::GenerateRoundActionError;
use super::ActionTrait;

/// Stores seeds as the matches of a round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistSeedsAction {
    pub tournament_id: Uuid,
    pub round_id: Uuid,
    pub seeds: Vec<MatchSeed>,
}

#[async_trait]
impl ActionTrait for PersistSeedsAction {
    type Output = Vec<MatchRecord>;

    async fn execute<S>(self, store: &S) -> Result<Vec<MatchRecord>, anyhow::Error>
    where
        S: TournamentStore,
    {
        let rounds = store.get_rounds(self.tournament_id).await?;
        if !rounds.iter().any(|r| r.uuid == self.round_id) {
            return Err(GenerateRoundActionError::RoundIsNotInTournament {
                tournament_id: self.tournament_id,
                round_id: self.round_id,
            }
            .into());
        }

        let known = store
            .get_participants(self.tournament_id)
            .await?
            .into_iter()
            .map(|p| p.uuid)
            .collect::<HashSet<_>>();
        if let Some(unknown) = self
            .seeds
            .iter()
            .flat_map(|s| s.participant_ids())
            .find(|id| !known.contains(id))
        {
            return Err(StoreError::ParticipantDoesNotExist(unknown).into());
        }

        let matches = self
            .seeds
            .into_iter()
            .map(|seed| seed.into_match_record(Uuid::new_v4(), self.tournament_id, self.round_id))
            .collect_vec();

        store.save_matches(matches.clone()).await?;
        Ok(matches)
    }
}
