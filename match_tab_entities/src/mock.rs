use faker_rand::en_us::names::FullName;
use uuid::Uuid;

use crate::domain::match_record::{MatchParticipant, MatchRecord, MatchStatus};
use crate::domain::participant::Participant;
use crate::domain::round::{PointSystem, RoundConfig, TournamentRound, DRAW, LOSS, WIN};
use crate::domain::tournament::{Tournament, TournamentSettings};
use crate::store::TournamentSnapshot;

#[derive(Debug)]
pub struct MockOption {
    pub deterministic_uuids: bool,
    pub num_participants: u32,
    pub num_completed_rounds: u32,
    pub use_random_names: bool,
    /// Config of the completed rounds and of the open round appended after them.
    pub round_config: RoundConfig,
}

impl Default for MockOption {
    fn default() -> Self {
        Self {
            deterministic_uuids: false,
            num_participants: 8,
            num_completed_rounds: 2,
            use_random_names: false,
            round_config: RoundConfig::default(),
        }
    }
}

/// Circle-method round robin: every completed round is rematch free as long
/// as there are fewer rounds than participants.
pub fn make_mock_tournament_with_options(options: MockOption) -> TournamentSnapshot {
    /*
    Tournament: 1
    Participants: 1000
    Rounds: 100
    Matches: 200
    */
    let make_uuid = |base: u128, idx: u32| {
        if options.deterministic_uuids {
            Uuid::from_u128(base + idx as u128)
        } else {
            Uuid::new_v4()
        }
    };

    let tournament = Tournament {
        uuid: make_uuid(1, 0),
        name: "Mock Tournament".into(),
        settings: TournamentSettings {
            point_system: PointSystem::new(3.0, 1.0, 0.0),
            ..Default::default()
        },
        standings_generation: 0,
    };

    let participants = (0..options.num_participants)
        .map(|i| {
            let name = if options.use_random_names {
                rand::random::<FullName>().to_string()
            } else {
                format!("Participant {:02}", i)
            };
            Participant {
                uuid: make_uuid(1000, i),
                ..Participant::new(tournament.uuid, name)
            }
        })
        .collect::<Vec<_>>();

    let rounds = (0..=options.num_completed_rounds)
        .map(|i| TournamentRound {
            uuid: make_uuid(100, i),
            ..TournamentRound::new(tournament.uuid, i as u64, options.round_config.clone())
        })
        .collect::<Vec<_>>();

    // None stands in for the bye slot when the field is odd
    let mut circle: Vec<Option<Uuid>> = participants.iter().map(|p| Some(p.uuid)).collect();
    if circle.len() % 2 == 1 {
        circle.push(None);
    }

    let mut matches = vec![];
    let mut match_idx = 0;
    for round in rounds.iter().take(options.num_completed_rounds as usize) {
        let half = circle.len() / 2;
        for slot in 0..half {
            let first = circle[slot];
            let second = circle[circle.len() - 1 - slot];

            let participants = match (first, second) {
                (Some(a), Some(b)) if match_idx % 5 == 4 => vec![
                    MatchParticipant::with_result(a, DRAW),
                    MatchParticipant::with_result(b, DRAW),
                ],
                (Some(a), Some(b)) => vec![
                    MatchParticipant::with_result(a, WIN),
                    MatchParticipant::with_result(b, LOSS),
                ],
                (Some(a), None) | (None, Some(a)) => vec![MatchParticipant {
                    points_awarded: tournament.settings.point_system.win_points(),
                    ..MatchParticipant::with_result(a, WIN)
                }],
                (None, None) => continue,
            };

            matches.push(MatchRecord {
                uuid: make_uuid(200, match_idx),
                tournament_id: tournament.uuid,
                round_id: round.uuid,
                status: MatchStatus::Completed,
                participants,
                team_names: None,
            });
            match_idx += 1;
        }

        if circle.len() > 2 {
            let last = circle.remove(circle.len() - 1);
            circle.insert(1, last);
        }
    }

    TournamentSnapshot {
        tournament,
        participants,
        rounds,
        matches,
        teams: vec![],
    }
}
