use match_tab_entities::TournamentStore;
use serde::{Deserialize, Serialize};

mod base;
mod generate_round;
mod persist_seeds;
mod recalculate_standings;

pub use self::base::ActionTrait;
pub use self::generate_round::{GenerateRoundAction, GenerateRoundActionError, GeneratedRound};
pub use self::persist_seeds::PersistSeedsAction;
pub use self::recalculate_standings::RecalculateStandingsAction;

use match_tab_entities::prelude::MatchRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    GenerateRound { action: GenerateRoundAction },
    PersistSeeds { action: PersistSeedsAction },
    RecalculateStandings { action: RecalculateStandingsAction },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ActionOutput {
    GeneratedRound { round: GeneratedRound },
    PersistedMatches { matches: Vec<MatchRecord> },
    StandingsGeneration { generation: u64 },
}

impl Action {
    pub async fn execute<S>(self, store: &S) -> Result<ActionOutput, anyhow::Error>
    where
        S: TournamentStore,
    {
        match self {
            Action::GenerateRound { action } => Ok(ActionOutput::GeneratedRound {
                round: action.execute(store).await?,
            }),
            Action::PersistSeeds { action } => Ok(ActionOutput::PersistedMatches {
                matches: action.execute(store).await?,
            }),
            Action::RecalculateStandings { action } => Ok(ActionOutput::StandingsGeneration {
                generation: action.execute(store).await?,
            }),
        }
    }
}
