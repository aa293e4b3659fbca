use std::collections::{BTreeSet, HashMap};

use itertools::Itertools;
use lazy_static::lazy_static;
use match_tab_entities::domain::round::{DRAW, WIN};
use match_tab_entities::domain::score::POINTS;
use match_tab_entities::prelude::*;
use match_tab_entities::store::ParticipantStandingsUpdate;
use regex::Regex;
use tracing::debug;

const FIRST_PLACE: &str = "1st";

#[derive(Debug, Clone)]
struct Accumulator {
    scores: ScoreVector,
    match_history: Vec<Uuid>,
    opponents: BTreeSet<Uuid>,
}

/// Leading integer of a placement such as "1st" or "3".
pub fn parse_placement(result: &str) -> Option<u32> {
    lazy_static! {
        static ref PLACEMENT: Regex = Regex::new(r"^\s*(\d+)").unwrap();
    }

    PLACEMENT
        .captures(result)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn normalize_result(result: Option<&String>) -> String {
    result.map(|r| r.trim().to_lowercase()).unwrap_or_default()
}

fn awarded_points(
    record: &MatchRecord,
    participant: &MatchParticipant,
    round: Option<&TournamentRound>,
    settings: &TournamentSettings,
) -> f64 {
    if record.is_bye() {
        return participant.points_awarded;
    }

    if record.has_team_labels() || record.participants.len() == 2 {
        let point_system = round
            .and_then(|r| r.point_system_override())
            .unwrap_or(&settings.point_system);
        return point_system.value_for(&normalize_result(participant.result.as_ref()));
    }

    let placement = participant.result.as_deref().and_then(parse_placement);
    match (placement, round.and_then(|r| r.config.placement_points())) {
        (Some(placement), Some(table)) => table.get(&placement.to_string()).copied().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Rebuilds every participant's scores and match history from the
/// completed matches. The result only depends on the inputs, running it
/// twice gives identical vectors.
pub fn recalculate_scores(
    participants: &[Participant],
    matches: &[MatchRecord],
    rounds: &[TournamentRound],
    settings: &TournamentSettings,
) -> Vec<ParticipantStandingsUpdate> {
    let rounds_by_id = rounds.iter().map(|r| (r.uuid, r)).collect::<HashMap<_, _>>();

    let mut accumulators = participants
        .iter()
        .map(|p| {
            (
                p.uuid,
                Accumulator {
                    scores: ScoreVector::new_with_custom_keys(&settings.custom_stat_keys),
                    match_history: vec![],
                    opponents: BTreeSet::new(),
                },
            )
        })
        .collect::<HashMap<_, _>>();

    let completed = matches
        .iter()
        .filter(|m| m.is_completed())
        .sorted_by_key(|m| rounds_by_id.get(&m.round_id).map(|r| r.index).unwrap_or(u64::MAX))
        .collect_vec();

    for record in completed {
        let round = rounds_by_id.get(&record.round_id).copied();

        for match_participant in record.participants.iter() {
            let Some(acc) = accumulators.get_mut(&match_participant.participant_id) else {
                debug!(
                    "Skipping unknown participant {} in match {}",
                    match_participant.participant_id, record.uuid
                );
                continue;
            };

            acc.scores
                .add(POINTS, awarded_points(record, match_participant, round, settings));

            match normalize_result(match_participant.result.as_ref()).as_str() {
                "" => {}
                WIN | FIRST_PLACE => acc.scores.wins += 1.0,
                DRAW => acc.scores.draws += 1.0,
                _ => acc.scores.losses += 1.0,
            }

            for (key, value) in match_participant.custom_stats.iter() {
                acc.scores.add(key, *value);
            }

            acc.match_history.push(record.uuid);

            if !record.is_bye() {
                acc.opponents.extend(
                    record
                        .participant_ids()
                        .filter(|id| *id != match_participant.participant_id),
                );
            }
        }
    }

    let points = accumulators
        .iter()
        .map(|(id, acc)| (*id, acc.scores.points))
        .collect::<HashMap<_, _>>();
    let sum_over_opponents = |acc: &Accumulator, values: &HashMap<Uuid, f64>| -> f64 {
        acc.opponents.iter().filter_map(|o| values.get(o)).sum()
    };

    let buchholz = accumulators
        .iter()
        .map(|(id, acc)| (*id, sum_over_opponents(acc, &points)))
        .collect::<HashMap<_, _>>();
    let buchholz2 = accumulators
        .iter()
        .map(|(id, acc)| (*id, sum_over_opponents(acc, &buchholz)))
        .collect::<HashMap<_, _>>();

    participants
        .iter()
        .filter_map(|p| {
            let mut acc = accumulators.remove(&p.uuid)?;
            acc.scores.buchholz = buchholz.get(&p.uuid).copied().unwrap_or(0.0);
            acc.scores.buchholz2 = buchholz2.get(&p.uuid).copied().unwrap_or(0.0);

            Some(ParticipantStandingsUpdate {
                participant_id: p.uuid,
                scores: acc.scores,
                match_history: acc.match_history,
            })
        })
        .collect()
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use super::*;

    fn participants(n: u128) -> Vec<Participant> {
        (0..n)
            .map(|i| Participant {
                uuid: Uuid::from_u128(1000 + i),
                ..Participant::new(Uuid::from_u128(1), format!("P{}", i))
            })
            .collect()
    }

    fn record(uuid: u128, round_id: u128, participants: Vec<MatchParticipant>) -> MatchRecord {
        MatchRecord {
            uuid: Uuid::from_u128(uuid),
            tournament_id: Uuid::from_u128(1),
            round_id: Uuid::from_u128(round_id),
            status: MatchStatus::Completed,
            participants,
            team_names: None,
        }
    }

    fn duel(uuid: u128, round_id: u128, winner: u128, loser: u128) -> MatchRecord {
        record(
            uuid,
            round_id,
            vec![
                MatchParticipant::with_result(Uuid::from_u128(winner), "win"),
                MatchParticipant::with_result(Uuid::from_u128(loser), "loss"),
            ],
        )
    }

    fn round(uuid: u128, index: u64) -> TournamentRound {
        TournamentRound {
            uuid: Uuid::from_u128(uuid),
            ..TournamentRound::new(Uuid::from_u128(1), index, RoundConfig::default())
        }
    }

    fn by_id(updates: &[ParticipantStandingsUpdate]) -> HashMap<u128, &ParticipantStandingsUpdate> {
        updates.iter().map(|u| (u.participant_id.as_u128(), u)).collect()
    }

    fn settings(win: f64, draw: f64, loss: f64) -> TournamentSettings {
        TournamentSettings {
            point_system: PointSystem::new(win, draw, loss),
            ..Default::default()
        }
    }

    #[test]
    fn test_win_and_loss_are_tallied() {
        let participants = participants(2);
        let matches = vec![duel(200, 100, 1000, 1001)];
        let updates = recalculate_scores(&participants, &matches, &[round(100, 0)], &settings(3.0, 1.0, 0.0));
        let updates = by_id(&updates);

        assert_eq!(updates[&1000].scores.points, 3.0);
        assert_eq!(updates[&1000].scores.wins, 1.0);
        assert_eq!(updates[&1001].scores.points, 0.0);
        assert_eq!(updates[&1001].scores.losses, 1.0);
        assert_eq!(updates[&1000].match_history, vec![Uuid::from_u128(200)]);
    }

    #[test]
    fn test_draws_use_draw_points() {
        let participants = participants(2);
        let matches = vec![record(
            200,
            100,
            vec![
                MatchParticipant::with_result(Uuid::from_u128(1000), "Draw"),
                MatchParticipant::with_result(Uuid::from_u128(1001), "draw"),
            ],
        )];
        let updates = recalculate_scores(&participants, &matches, &[round(100, 0)], &settings(3.0, 1.0, 0.0));
        let updates = by_id(&updates);

        assert_eq!(updates[&1000].scores.points, 1.0);
        assert_eq!(updates[&1000].scores.draws, 1.0);
        assert_eq!(updates[&1001].scores.draws, 1.0);
    }

    #[test]
    fn test_round_point_system_overrides_tournament() {
        let participants = participants(2);
        let matches = vec![duel(200, 100, 1000, 1001)];
        let mut r = round(100, 0);
        r.point_system = Some(PointSystem::new(2.0, 1.0, 0.0));

        let updates = recalculate_scores(&participants, &matches, &[r], &settings(3.0, 1.0, 0.0));
        assert_eq!(by_id(&updates)[&1000].scores.points, 2.0);
    }

    #[test]
    fn test_ffa_placements_use_round_table() {
        let participants = participants(4);
        let matches = vec![record(
            200,
            100,
            ["1st", "3rd", "2nd", "4th"]
                .iter()
                .enumerate()
                .map(|(i, r)| MatchParticipant::with_result(Uuid::from_u128(1000 + i as u128), r))
                .collect(),
        )];
        let ffa_round = TournamentRound {
            uuid: Uuid::from_u128(100),
            ..TournamentRound::new(
                Uuid::from_u128(1),
                0,
                RoundConfig::Ffa(FfaRoundConfig {
                    group_size: 4,
                    grouping: GroupingMethod::SimpleChunk,
                    placement_points: BTreeMap::from([
                        ("1".to_string(), 3.0),
                        ("2".to_string(), 1.0),
                        ("3".to_string(), 0.0),
                        ("4".to_string(), 0.0),
                    ]),
                    rematch: RematchOptions::default(),
                    bye_points: None,
                }),
            )
        };

        let updates = recalculate_scores(&participants, &matches, &[ffa_round], &settings(3.0, 1.0, 0.0));
        let points = updates.iter().map(|u| u.scores.points).collect_vec();

        assert_eq!(points, vec![3.0, 0.0, 1.0, 0.0]);
        assert_eq!(updates[0].scores.wins, 1.0);
        assert_eq!(updates[1].scores.losses, 1.0);
    }

    #[test]
    fn test_unparseable_placement_is_worth_nothing() {
        assert_eq!(parse_placement("1st"), Some(1));
        assert_eq!(parse_placement(" 12th"), Some(12));
        assert_eq!(parse_placement("first"), None);
    }

    #[test]
    fn test_bye_points_are_taken_verbatim() {
        let participants = participants(1);
        let matches = vec![record(
            200,
            100,
            vec![MatchParticipant {
                points_awarded: 2.5,
                ..MatchParticipant::with_result(Uuid::from_u128(1000), "win")
            }],
        )];

        let updates = recalculate_scores(&participants, &matches, &[round(100, 0)], &settings(3.0, 1.0, 0.0));
        assert_eq!(updates[0].scores.points, 2.5);
        assert_eq!(updates[0].scores.wins, 1.0);
        assert_eq!(updates[0].scores.buchholz, 0.0);
    }

    #[test]
    fn test_pending_matches_do_not_count() {
        let participants = participants(2);
        let mut pending = duel(200, 100, 1000, 1001);
        pending.status = MatchStatus::Pending;

        let updates = recalculate_scores(&participants, &[pending], &[round(100, 0)], &settings(3.0, 1.0, 0.0));
        assert!(updates.iter().all(|u| u.scores == ScoreVector::default()));
        assert!(updates.iter().all(|u| u.match_history.is_empty()));
    }

    #[test]
    fn test_custom_stats_are_summed() {
        let participants = participants(2);
        let mut matches = vec![duel(200, 100, 1000, 1001), duel(201, 101, 1001, 1000)];
        matches[0].participants[0].custom_stats.insert("kills".into(), 4.0);
        matches[1].participants[1].custom_stats.insert("kills".into(), 2.0);

        let settings = TournamentSettings {
            custom_stat_keys: vec!["kills".into(), "assists".into()],
            ..settings(3.0, 1.0, 0.0)
        };
        let updates = recalculate_scores(&participants, &matches, &[round(100, 0), round(101, 1)], &settings);
        let updates = by_id(&updates);

        assert_eq!(updates[&1000].scores.get("kills"), 6.0);
        assert_eq!(updates[&1000].scores.custom.get("assists"), Some(&0.0));
        assert_eq!(updates[&1001].scores.get("kills"), 0.0);
    }

    fn five_player_log() -> (Vec<Participant>, Vec<MatchRecord>, Vec<TournamentRound>) {
        let participants = participants(5);
        let bye = record(
            202,
            100,
            vec![MatchParticipant {
                points_awarded: 3.0,
                ..MatchParticipant::with_result(Uuid::from_u128(1004), "win")
            }],
        );
        let matches = vec![
            duel(200, 100, 1000, 1001),
            duel(201, 100, 1002, 1003),
            bye,
            duel(203, 101, 1000, 1002),
            duel(204, 101, 1004, 1001),
            record(
                205,
                101,
                vec![MatchParticipant {
                    points_awarded: 3.0,
                    ..MatchParticipant::with_result(Uuid::from_u128(1003), "win")
                }],
            ),
        ];
        (participants, matches, vec![round(100, 0), round(101, 1)])
    }

    #[test]
    fn test_buchholz_sums_final_opponent_points() {
        let (participants, matches, rounds) = five_player_log();
        let updates = recalculate_scores(&participants, &matches, &rounds, &settings(3.0, 1.0, 0.0));
        let updates = by_id(&updates);

        // 1000: 6, 1001: 0, 1002: 3, 1003: 3, 1004: 6
        assert_eq!(updates[&1000].scores.points, 6.0);
        assert_eq!(updates[&1004].scores.points, 6.0);
        assert_eq!(updates[&1000].scores.buchholz, 3.0);
        assert_eq!(updates[&1001].scores.buchholz, 12.0);
        assert_eq!(updates[&1004].scores.buchholz, 0.0);

        for update in updates.values() {
            let participant_matches = matches
                .iter()
                .filter(|m| !m.is_bye() && m.participant_ids().any(|id| id == update.participant_id))
                .collect_vec();
            let opponents = participant_matches
                .iter()
                .flat_map(|m| m.participant_ids())
                .filter(|id| *id != update.participant_id)
                .collect::<BTreeSet<_>>();
            let expected: f64 = opponents.iter().map(|o| updates[&o.as_u128()].scores.points).sum();
            assert_eq!(update.scores.buchholz, expected);
        }
    }

    #[test]
    fn test_buchholz2_sums_opponent_buchholz() {
        let (participants, matches, rounds) = five_player_log();
        let updates = recalculate_scores(&participants, &matches, &rounds, &settings(3.0, 1.0, 0.0));
        let updates = by_id(&updates);

        // 1000 met 1001 (buchholz 12) and 1002 (buchholz 9)
        assert_eq!(updates[&1002].scores.buchholz, 9.0);
        assert_eq!(updates[&1000].scores.buchholz2, 21.0);
    }

    #[test]
    fn test_recalculation_is_idempotent() {
        let (mut participants, matches, rounds) = five_player_log();
        let settings = settings(3.0, 1.0, 0.0);
        let first = recalculate_scores(&participants, &matches, &rounds, &settings);

        for (participant, update) in participants.iter_mut().zip(first.iter()) {
            participant.scores = update.scores.clone();
            participant.match_history = update.match_history.clone();
        }
        let second = recalculate_scores(&participants, &matches, &rounds, &settings);

        assert_eq!(first, second);
    }
}
