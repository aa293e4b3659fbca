use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use match_tab_entities::prelude::*;

#[derive(Debug, Clone, Default)]
pub struct OpponentGraphOptions {
    pub avoid_rematches: bool,
    /// Rounds whose matches count as history. Empty means every round.
    pub relevant_round_ids: Vec<Uuid>,
}

/// Who has met whom, built from the completed match log. A disabled graph
/// reports no encounters at all.
#[derive(Debug, Clone)]
pub struct OpponentGraph {
    enabled: bool,
    adjacency: HashMap<Uuid, HashSet<Uuid>>,
}

impl OpponentGraph {
    pub fn new(enabled: bool) -> Self {
        OpponentGraph {
            enabled,
            adjacency: HashMap::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn from_matches<'a, I>(matches: I, options: &OpponentGraphOptions) -> Self
    where
        I: IntoIterator<Item = &'a MatchRecord>,
    {
        let mut graph = OpponentGraph::new(options.avoid_rematches);
        if !options.avoid_rematches {
            return graph;
        }

        let relevant_rounds = options.relevant_round_ids.iter().collect::<HashSet<_>>();

        for record in matches.into_iter().filter(|m| m.is_completed()) {
            if !relevant_rounds.is_empty() && !relevant_rounds.contains(&record.round_id) {
                continue;
            }

            for pair in record.participant_ids().unique().combinations(2) {
                graph.add_encounter(pair[0], pair[1]);
            }
        }

        graph
    }

    pub fn add_encounter(&mut self, a: Uuid, b: Uuid) {
        if a == b {
            return;
        }
        self.adjacency.entry(a).or_insert_with(HashSet::new).insert(b);
        self.adjacency.entry(b).or_insert_with(HashSet::new).insert(a);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn have_played(&self, a: &Uuid, b: &Uuid) -> bool {
        self.enabled
            && self
                .adjacency
                .get(a)
                .map(|opponents| opponents.contains(b))
                .unwrap_or(false)
    }

    /// True if any member on one side has met any member on the other.
    pub fn have_any_played(&self, a: &[Uuid], b: &[Uuid]) -> bool {
        self.enabled && a.iter().cartesian_product(b.iter()).any(|(x, y)| self.have_played(x, y))
    }
}

#[cfg(test)]
mod test {
    use match_tab_entities::prelude::*;

    use super::*;

    fn completed_match(uuid: u128, round: u128, participants: &[u128]) -> MatchRecord {
        MatchRecord {
            uuid: Uuid::from_u128(uuid),
            tournament_id: Uuid::from_u128(1),
            round_id: Uuid::from_u128(round),
            status: MatchStatus::Completed,
            participants: participants
                .iter()
                .map(|p| MatchParticipant::new(Uuid::from_u128(*p)))
                .collect(),
            team_names: None,
        }
    }

    #[test]
    fn test_have_played_is_symmetric() {
        let matches = vec![
            completed_match(200, 100, &[1000, 1001]),
            completed_match(201, 100, &[1002, 1003, 1004]),
        ];
        let graph = OpponentGraph::from_matches(
            &matches,
            &OpponentGraphOptions {
                avoid_rematches: true,
                ..Default::default()
            },
        );

        for a in 1000..1005u128 {
            for b in 1000..1005u128 {
                assert_eq!(
                    graph.have_played(&Uuid::from_u128(a), &Uuid::from_u128(b)),
                    graph.have_played(&Uuid::from_u128(b), &Uuid::from_u128(a))
                );
            }
        }
        assert!(graph.have_played(&Uuid::from_u128(1002), &Uuid::from_u128(1004)));
        assert!(!graph.have_played(&Uuid::from_u128(1000), &Uuid::from_u128(1002)));
    }

    #[test]
    fn test_disabled_graph_reports_no_encounters() {
        let matches = vec![completed_match(200, 100, &[1000, 1001])];
        let graph = OpponentGraph::from_matches(&matches, &OpponentGraphOptions::default());

        assert!(!graph.have_played(&Uuid::from_u128(1000), &Uuid::from_u128(1001)));
    }

    #[test]
    fn test_only_relevant_rounds_count() {
        let matches = vec![
            completed_match(200, 100, &[1000, 1001]),
            completed_match(201, 101, &[1000, 1002]),
        ];
        let graph = OpponentGraph::from_matches(
            &matches,
            &OpponentGraphOptions {
                avoid_rematches: true,
                relevant_round_ids: vec![Uuid::from_u128(101)],
            },
        );

        assert!(!graph.have_played(&Uuid::from_u128(1000), &Uuid::from_u128(1001)));
        assert!(graph.have_played(&Uuid::from_u128(1000), &Uuid::from_u128(1002)));
    }

    #[test]
    fn test_pending_matches_are_ignored() {
        let mut pending = completed_match(200, 100, &[1000, 1001]);
        pending.status = MatchStatus::Pending;
        let graph = OpponentGraph::from_matches(
            &vec![pending],
            &OpponentGraphOptions {
                avoid_rematches: true,
                ..Default::default()
            },
        );

        assert!(!graph.have_played(&Uuid::from_u128(1000), &Uuid::from_u128(1001)));
    }

    #[test]
    fn test_team_members_count_for_whole_team() {
        let matches = vec![completed_match(200, 100, &[1000, 1001])];
        let graph = OpponentGraph::from_matches(
            &matches,
            &OpponentGraphOptions {
                avoid_rematches: true,
                ..Default::default()
            },
        );

        let team_a = [Uuid::from_u128(1000), Uuid::from_u128(1005)];
        let team_b = [Uuid::from_u128(1006), Uuid::from_u128(1001)];
        let team_c = [Uuid::from_u128(1007), Uuid::from_u128(1008)];
        assert!(graph.have_any_played(&team_a, &team_b));
        assert!(!graph.have_any_played(&team_a, &team_c));
    }
}
