use std::path::Path;

use match_tab_backend::actions::{
    Action, ActionTrait, GenerateRoundAction, PersistSeedsAction, RecalculateStandingsAction,
};
use match_tab_entities::mock::{make_mock_tournament_with_options, MockOption};
use match_tab_entities::standings::StandingsView;
use match_tab_entities::{MemoryStore, TournamentSnapshot};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;

#[derive(clap::Subcommand)]
pub enum Command {
    /// Write a mock tournament with completed rounds and one open round
    Mock {
        #[arg(long, default_value_t = 8)]
        participants: u32,
        #[arg(long, default_value_t = 2)]
        rounds: u32,
        #[arg(long)]
        random_names: bool,
        #[arg(long)]
        deterministic_uuids: bool,
    },
    /// Print the seeds for a round without storing them
    BuildRound {
        #[arg(long)]
        round: Uuid,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Draw a round and store its matches
    PersistRound {
        #[arg(long)]
        round: Uuid,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Rebuild all scores from the completed matches
    Recalculate,
    Standings {
        #[arg(long)]
        active_only: bool,
    },
    /// Run a JSON encoded action
    Apply { path: String },
}

pub fn load_snapshot(path: impl AsRef<Path>) -> Result<TournamentSnapshot, anyhow::Error> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_snapshot(path: impl AsRef<Path>, snapshot: &TournamentSnapshot, pretty: bool) -> Result<(), anyhow::Error> {
    std::fs::write(path, to_json(snapshot, pretty)?)?;
    Ok(())
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

pub fn format_standings(view: &StandingsView) -> String {
    let mut out = format!(
        "{:>4}  {:<28} {:>7} {:>7} {:>7}\n",
        "Rank", "Name", "Points", "BH", "BH2"
    );
    for entry in view.entries.iter() {
        let scores = &entry.participant.scores;
        out += &format!(
            "{:>4}  {:<28} {:>7.1} {:>7.1} {:>7.1}\n",
            entry.rank + 1,
            entry.participant.name,
            scores.points,
            scores.buchholz,
            scores.buchholz2
        );
    }
    out
}

impl Command {
    pub async fn run(&self, snapshot_path: &str, config: &Config) -> anyhow::Result<()> {
        if let Command::Mock {
            participants,
            rounds,
            random_names,
            deterministic_uuids,
        } = self
        {
            let snapshot = make_mock_tournament_with_options(MockOption {
                deterministic_uuids: *deterministic_uuids,
                num_participants: *participants,
                num_completed_rounds: *rounds,
                use_random_names: *random_names,
                ..Default::default()
            });
            save_snapshot(snapshot_path, &snapshot, config.pretty_output)?;
            info!("Wrote mock tournament {} to {}", snapshot.tournament.uuid, snapshot_path);
            return Ok(());
        }

        let snapshot = load_snapshot(snapshot_path)?;
        let tournament_id = snapshot.tournament.uuid;

        if let Command::Standings { active_only } = self {
            let view = StandingsView::from_participants(
                snapshot.participants,
                &snapshot.tournament.settings.tie_breakers,
                *active_only,
            );
            print!("{}", format_standings(&view));
            return Ok(());
        }

        let store = MemoryStore::from_snapshot(snapshot);

        match self {
            Command::BuildRound { round, seed } => {
                let generated = GenerateRoundAction {
                    tournament_id,
                    round_id: *round,
                    seed: *seed,
                }
                .execute(&store)
                .await?;
                println!("{}", to_json(&generated.seeds, config.pretty_output)?);
                return Ok(());
            }
            Command::PersistRound { round, seed } => {
                let generated = GenerateRoundAction {
                    tournament_id,
                    round_id: *round,
                    seed: *seed,
                }
                .execute(&store)
                .await?;
                let matches = PersistSeedsAction {
                    tournament_id,
                    round_id: *round,
                    seeds: generated.seeds,
                }
                .execute(&store)
                .await?;
                info!("Stored {} matches for round {}", matches.len(), round);
            }
            Command::Recalculate => {
                RecalculateStandingsAction { tournament_id }.execute(&store).await?;
            }
            Command::Apply { path } => {
                let action: Action = serde_json::from_str(&std::fs::read_to_string(path)?)?;
                let output = action.execute(&store).await?;
                println!("{}", to_json(&output, config.pretty_output)?);
            }
            Command::Mock { .. } | Command::Standings { .. } => {}
        }

        save_snapshot(snapshot_path, &store.snapshot(tournament_id).await?, config.pretty_output)
    }
}
