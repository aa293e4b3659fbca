use async_trait::async_trait;
use match_tab_entities::prelude::*;
use match_tab_entities::TournamentStore;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::recalculation::recalculate_scores;

use super::ActionTrait;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecalculateStandingsAction {
    pub tournament_id: Uuid,
}

#[async_trait]
impl ActionTrait for RecalculateStandingsAction {
    /// The standings generation after the write.
    type Output = u64;

    async fn execute<S>(self, store: &S) -> Result<u64, anyhow::Error>
    where
        S: TournamentStore,
    {
        let tournament = store.get_tournament(self.tournament_id).await?;
        let participants = store.get_participants(self.tournament_id).await?;
        let matches = store.get_matches(self.tournament_id).await?;
        let rounds = store.get_rounds(self.tournament_id).await?;

        let updates = recalculate_scores(&participants, &matches, &rounds, &tournament.settings);
        let generation = store
            .save_standings(self.tournament_id, tournament.standings_generation, updates)
            .await?;

        info!("Standings of {} recalculated, generation {}", self.tournament_id, generation);
        Ok(generation)
    }
}
