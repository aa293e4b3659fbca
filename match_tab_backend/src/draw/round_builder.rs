use std::collections::{BTreeMap, HashSet};

use itertools::Itertools;
use match_tab_entities::prelude::*;
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, info};

use super::entity::TeamEntity;
use super::ffa::group_entities;
use super::opponents::{OpponentGraph, OpponentGraphOptions};
use super::swiss::{pair_entities, SwissPairingOptions};
use super::teams::{form_fresh_teams, reconstruct_teams, TeamFormation, TeamNameRegistry};

pub struct RoundGenerationContext<'a> {
    pub tournament_id: Uuid,
    /// The round the seeds are generated for.
    pub round_id: Uuid,
    pub prior_rounds: &'a [TournamentRound],
    pub point_system: &'a PointSystem,
    pub existing_teams: &'a [Team],
}

#[derive(Debug, Default)]
pub struct RoundBuildOutput {
    pub seeds: Vec<MatchSeed>,
    /// Teams that got a name for the first time in this round.
    pub new_teams: Vec<Team>,
}

#[derive(Error, Debug)]
pub enum RoundBuildError {
    #[error("Group size must be at least 2, got {0}")]
    InvalidGroupSize(usize),
    #[error("Team size must be at least 1, got {0}")]
    InvalidTeamSize(usize),
    #[error("Source round {0} does not exist")]
    UnknownSourceRound(Uuid),
}

#[derive(Debug, Default)]
pub struct RoundBuilder {
    /// Fixes the random team formation. Without a seed every call draws fresh.
    pub seed: Option<u64>,
}

struct ByeTracker<'a> {
    had_bye: HashSet<Uuid>,
    points: f64,
    seeds: &'a mut Vec<MatchSeed>,
}

impl<'a> ByeTracker<'a> {
    /// Removes the lowest ranked participant without a previous bye, or the
    /// lowest ranked one if everyone had a bye already.
    fn assign_from(&mut self, pool: &mut Vec<&Participant>) {
        let idx = pool
            .iter()
            .rposition(|p| !self.had_bye.contains(&p.uuid))
            .or_else(|| pool.len().checked_sub(1));

        if let Some(idx) = idx {
            let participant = pool.remove(idx);
            self.give(participant.uuid);
        }
    }

    fn give(&mut self, participant_id: Uuid) {
        debug!("Assigning bye to {}", participant_id);
        self.had_bye.insert(participant_id);
        self.seeds.push(MatchSeed::bye(participant_id, self.points));
    }
}

impl RoundBuilder {
    pub fn new(seed: Option<u64>) -> Self {
        RoundBuilder { seed }
    }

    pub fn build_next_round(
        &self,
        config: &RoundConfig,
        standings: &[Participant],
        history: &[MatchRecord],
        context: &RoundGenerationContext,
    ) -> Result<RoundBuildOutput, RoundBuildError> {
        if let RoundConfig::Custom { seeds } = config {
            return Ok(RoundBuildOutput {
                seeds: seeds.clone(),
                new_teams: vec![],
            });
        }

        let mut pool = standings.iter().filter(|p| p.is_active).collect_vec();
        let active_ids = pool.iter().map(|p| p.uuid).collect_vec();

        let rematch = config.rematch_options().cloned().unwrap_or_default();
        let graph = OpponentGraph::from_matches(history, &graph_options(&rematch, context.prior_rounds));
        let pairing_options = SwissPairingOptions {
            avoid_rematches: graph.is_enabled(),
            conflict_policy: rematch.conflict_policy,
        };

        let mut seeds = vec![];
        let mut registry = TeamNameRegistry::new(context.tournament_id, context.existing_teams);
        let mut byes = ByeTracker {
            had_bye: history
                .iter()
                .filter(|m| m.is_bye())
                .flat_map(|m| m.participant_ids())
                .collect(),
            points: config.bye_points().unwrap_or_else(|| context.point_system.win_points()),
            seeds: &mut seeds,
        };

        match config {
            RoundConfig::Swiss(swiss) => {
                if pool.len() < 2 {
                    return Ok(RoundBuildOutput::default());
                }
                if pool.len() % 2 == 1 {
                    byes.assign_from(&mut pool);
                }

                let pairing = pair_entities(pool, swiss.variant, &graph, &pairing_options);
                for (a, b) in pairing.pairs {
                    byes.seeds.push(MatchSeed::pending([a.uuid, b.uuid]));
                }
            }
            RoundConfig::Ffa(ffa) => {
                if ffa.group_size < 2 {
                    return Err(RoundBuildError::InvalidGroupSize(ffa.group_size));
                }
                if pool.len() < 2 {
                    return Ok(RoundBuildOutput::default());
                }
                if pool.len() % ffa.group_size == 1 {
                    byes.assign_from(&mut pool);
                }

                for group in group_entities(pool, ffa.group_size, ffa.grouping, &graph) {
                    if group.len() > 1 {
                        byes.seeds.push(MatchSeed::pending(group.iter().map(|p| p.uuid)));
                    }
                }
            }
            RoundConfig::Team(team) => {
                if team.team_size == 0 {
                    return Err(RoundBuildError::InvalidTeamSize(team.team_size));
                }
                if pool.len() < team.team_size {
                    return Ok(RoundBuildOutput::default());
                }

                let mut rng = match self.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };

                let source_matches = match &team.persistence {
                    TeamPersistence::Fresh => vec![],
                    TeamPersistence::FromRound { source_round_id } => {
                        let source = resolve_source_round(*source_round_id, context)?;
                        history
                            .iter()
                            .filter(|m| Some(m.round_id) == source && !m.is_bye())
                            .collect_vec()
                    }
                };

                let mut formation = if source_matches.is_empty() {
                    if let TeamPersistence::FromRound { .. } = team.persistence {
                        debug!("No source matches for team reconstruction, forming fresh teams");
                    }
                    for _ in 0..(pool.len() % team.team_size) {
                        byes.assign_from(&mut pool);
                    }
                    form_fresh_teams(pool, team.team_size, team.formation, &mut rng)
                } else {
                    let mut formation = reconstruct_teams(&source_matches, &pool, team.team_size);
                    let mut uncovered = std::mem::take(&mut formation.leftover);
                    for _ in 0..(uncovered.len() % team.team_size) {
                        byes.assign_from(&mut uncovered);
                    }
                    let fresh = form_fresh_teams(
                        uncovered,
                        team.team_size,
                        TeamFormationMethod::BalanceFirstLast,
                        &mut rng,
                    );
                    formation.teams.extend(fresh.teams);
                    TeamFormation {
                        teams: formation.teams,
                        leftover: fresh.leftover,
                    }
                };

                for participant in formation.leftover.drain(..) {
                    byes.give(participant.uuid);
                }

                let mut teams = formation
                    .teams
                    .iter()
                    .map(|members| TeamEntity::from_members(members))
                    .sorted_by(|a, b| {
                        OrderedFloat(b.score)
                            .cmp(&OrderedFloat(a.score))
                            .then_with(|| a.lookup_key.cmp(&b.lookup_key))
                    })
                    .collect_vec();

                if teams.len() % 2 == 1 {
                    let idx = teams
                        .iter()
                        .rposition(|t| t.member_ids.iter().all(|id| !byes.had_bye.contains(id)))
                        .unwrap_or(teams.len() - 1);
                    let bye_team = teams.remove(idx);
                    for member in bye_team.member_ids {
                        byes.give(member);
                    }
                }

                let pairing = pair_entities(teams.iter().collect(), team.variant, &graph, &pairing_options);
                for (a, b) in pairing.pairs {
                    let team_names = BTreeMap::from([
                        (TeamLabel::A, registry.name_for(&a.member_ids)),
                        (TeamLabel::B, registry.name_for(&b.member_ids)),
                    ]);

                    byes.seeds.push(MatchSeed {
                        status: MatchStatus::Pending,
                        participants: a
                            .member_ids
                            .iter()
                            .map(|id| SeedParticipant::in_team(*id, TeamLabel::A))
                            .chain(
                                b.member_ids
                                    .iter()
                                    .map(|id| SeedParticipant::in_team(*id, TeamLabel::B)),
                            )
                            .collect(),
                        team_names: Some(team_names),
                    });
                }
            }
            // Returned unchanged above
            RoundConfig::Custom { .. } => {}
        }

        let seated = byes
            .seeds
            .iter()
            .flat_map(|s| s.participant_ids())
            .collect::<HashSet<_>>();
        for id in active_ids.into_iter().filter(|id| !seated.contains(id)) {
            byes.give(id);
        }

        info!("Generated {} match seeds for round {}", seeds.len(), context.round_id);

        Ok(RoundBuildOutput {
            seeds,
            new_teams: registry.into_new_teams(),
        })
    }
}

/// Ignored rounds are expressed as the set of rounds that still count. If
/// every known round is ignored, nothing counts and avoidance is off.
fn graph_options(rematch: &RematchOptions, prior_rounds: &[TournamentRound]) -> OpponentGraphOptions {
    if rematch.ignored_round_ids.is_empty() {
        return OpponentGraphOptions {
            avoid_rematches: rematch.avoid_rematches,
            relevant_round_ids: vec![],
        };
    }

    let ignored = rematch.ignored_round_ids.iter().collect::<HashSet<_>>();
    let relevant_round_ids = prior_rounds
        .iter()
        .map(|r| r.uuid)
        .filter(|id| !ignored.contains(id))
        .collect_vec();

    OpponentGraphOptions {
        avoid_rematches: rematch.avoid_rematches && !relevant_round_ids.is_empty(),
        relevant_round_ids,
    }
}

/// The explicit source round, or the latest round before the one being drawn.
fn resolve_source_round(
    source_round_id: Option<Uuid>,
    context: &RoundGenerationContext,
) -> Result<Option<Uuid>, RoundBuildError> {
    if let Some(source) = source_round_id {
        if !context.prior_rounds.iter().any(|r| r.uuid == source) {
            return Err(RoundBuildError::UnknownSourceRound(source));
        }
        return Ok(Some(source));
    }

    let current_index = context
        .prior_rounds
        .iter()
        .find(|r| r.uuid == context.round_id)
        .map(|r| r.index);

    Ok(context
        .prior_rounds
        .iter()
        .filter(|r| r.uuid != context.round_id && current_index.map(|idx| r.index < idx).unwrap_or(true))
        .max_by_key(|r| r.index)
        .map(|r| r.uuid))
}
