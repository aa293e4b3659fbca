use async_trait::async_trait;
use itertools::Itertools;
use match_tab_entities::prelude::*;
use match_tab_entities::standings::get_standings;
use match_tab_entities::{StoreError, TournamentStore};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::draw::{RoundBuilder, RoundGenerationContext};

use super::ActionTrait;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRoundAction {
    pub tournament_id: Uuid,
    pub round_id: Uuid,
    /// Fixes random team formation.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedRound {
    pub round_id: Uuid,
    pub seeds: Vec<MatchSeed>,
}

#[derive(Error, Debug)]
pub enum GenerateRoundActionError {
    #[error("Round {round_id} is not in tournament {tournament_id}")]
    RoundIsNotInTournament { tournament_id: Uuid, round_id: Uuid },
}

#[async_trait]
impl ActionTrait for GenerateRoundAction {
    type Output = GeneratedRound;

    async fn execute<S>(self, store: &S) -> Result<GeneratedRound, anyhow::Error>
    where
        S: TournamentStore,
    {
        let tournament = store.get_tournament(self.tournament_id).await?;
        let rounds = store.get_rounds(self.tournament_id).await?;
        let round = rounds
            .iter()
            .find(|r| r.uuid == self.round_id)
            .ok_or(GenerateRoundActionError::RoundIsNotInTournament {
                tournament_id: self.tournament_id,
                round_id: self.round_id,
            })?;

        let standings = get_standings(
            store.get_participants(self.tournament_id).await?,
            &tournament.settings.tie_breakers,
            true,
        );
        let history = store
            .get_matches(self.tournament_id)
            .await?
            .into_iter()
            .filter(|m| m.round_id != self.round_id)
            .collect_vec();
        let teams = store.get_teams(self.tournament_id).await?;

        let context = RoundGenerationContext {
            tournament_id: self.tournament_id,
            round_id: self.round_id,
            prior_rounds: &rounds,
            point_system: &tournament.settings.point_system,
            existing_teams: &teams,
        };

        let output = RoundBuilder::new(self.seed).build_next_round(&round.config, &standings, &history, &context)?;

        for team in output.new_teams {
            match store.upsert_team(team).await {
                Ok(()) => {}
                Err(StoreError::DuplicateTeamKey { lookup_key }) => {
                    debug!("Team {} was registered concurrently", lookup_key);
                }
                Err(e) => return Err(e.into()),
            }
        }

        info!("Round {} drawn with {} seeds", self.round_id, output.seeds.len());

        Ok(GeneratedRound {
            round_id: self.round_id,
            seeds: output.seeds,
        })
    }
}
