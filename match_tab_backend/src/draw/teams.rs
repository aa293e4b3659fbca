use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use itertools::Itertools;
use match_tab_entities::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

#[derive(Debug)]
pub struct TeamFormation<'a> {
    pub teams: Vec<Vec<&'a Participant>>,
    /// Participants not placed in any team.
    pub leftover: Vec<&'a Participant>,
}

pub fn form_fresh_teams<'a, R: Rng>(
    participants: Vec<&'a Participant>,
    team_size: usize,
    method: TeamFormationMethod,
    rng: &mut R,
) -> TeamFormation<'a> {
    if team_size == 0 {
        return TeamFormation {
            teams: vec![],
            leftover: participants,
        };
    }

    match method {
        TeamFormationMethod::BalanceFirstLast => balance_first_last(participants, team_size),
        TeamFormationMethod::Random => {
            let mut participants = participants;
            participants.shuffle(rng);
            let num_teams = participants.len() / team_size;
            let leftover = participants.split_off(num_teams * team_size);

            TeamFormation {
                teams: participants.chunks(team_size).map(|c| c.to_vec()).collect(),
                leftover,
            }
        }
    }
}

/// Team slots alternate between the strongest and the weakest entry still
/// available, so the first team of two is 1st + last.
fn balance_first_last<'a>(participants: Vec<&'a Participant>, team_size: usize) -> TeamFormation<'a> {
    let num_teams = participants.len() / team_size;
    let mut remaining: VecDeque<_> = participants.into();

    let teams = (0..num_teams)
        .map(|_| {
            (0..team_size)
                .filter_map(|slot| {
                    if slot % 2 == 0 {
                        remaining.pop_front()
                    } else {
                        remaining.pop_back()
                    }
                })
                .collect_vec()
        })
        .collect_vec();

    TeamFormation {
        teams,
        leftover: remaining.into_iter().collect(),
    }
}

/// Rebuilds the teams that played in `source_matches`. Every team label of
/// every match contributes a member set. Sets sharing a member are merged,
/// so a participant that appeared under two labels joins both line-ups into
/// one team. Merged teams are cut down to `team_size` in standings order and
/// teams that end up short are dissolved.
pub fn reconstruct_teams<'a>(
    source_matches: &[&MatchRecord],
    standings: &[&'a Participant],
    team_size: usize,
) -> TeamFormation<'a> {
    let mut member_sets: Vec<BTreeSet<Uuid>> = vec![];

    for record in source_matches {
        let mut by_label: BTreeMap<TeamLabel, BTreeSet<Uuid>> = BTreeMap::new();
        for participant in record.participants.iter() {
            if let Some(label) = participant.team {
                by_label.entry(label).or_default().insert(participant.participant_id);
            }
        }

        for (_, set) in by_label {
            merge_member_set(&mut member_sets, set);
        }
    }

    let mut covered = HashSet::new();
    let mut teams = vec![];

    for set in member_sets {
        let members = standings
            .iter()
            .filter(|p| set.contains(&p.uuid))
            .take(team_size)
            .cloned()
            .collect_vec();

        if members.len() < team_size {
            debug!("Dissolving team of {} with only {} active members", set.iter().join(", "), members.len());
            continue;
        }

        covered.extend(members.iter().map(|p| p.uuid));
        teams.push(members);
    }

    TeamFormation {
        teams,
        leftover: standings.iter().filter(|p| !covered.contains(&p.uuid)).cloned().collect(),
    }
}

fn merge_member_set(member_sets: &mut Vec<BTreeSet<Uuid>>, mut set: BTreeSet<Uuid>) {
    let first_overlap = member_sets.iter().position(|existing| !existing.is_disjoint(&set));

    match first_overlap {
        None => member_sets.push(set),
        Some(idx) => {
            // Pull every other overlapping set into the first one
            let mut i = member_sets.len();
            while i > idx + 1 {
                i -= 1;
                if !member_sets[i].is_disjoint(&set) {
                    let other = member_sets.remove(i);
                    set.extend(other);
                }
            }
            member_sets[idx].extend(set);
        }
    }
}

/// Display names for teams, keyed by lookup key. Names already registered
/// are reused, new line-ups get the next free letter code.
#[derive(Debug)]
pub struct TeamNameRegistry {
    tournament_id: Uuid,
    names_by_key: HashMap<String, String>,
    used_names: HashSet<String>,
    next_index: usize,
    new_teams: Vec<Team>,
}

impl TeamNameRegistry {
    pub fn new(tournament_id: Uuid, existing_teams: &[Team]) -> Self {
        TeamNameRegistry {
            tournament_id,
            names_by_key: existing_teams
                .iter()
                .map(|t| (t.lookup_key.clone(), t.name.clone()))
                .collect(),
            used_names: existing_teams.iter().map(|t| t.name.clone()).collect(),
            next_index: existing_teams.len(),
            new_teams: vec![],
        }
    }

    pub fn name_for(&mut self, member_ids: &[Uuid]) -> String {
        let key = lookup_key(member_ids);
        if let Some(name) = self.names_by_key.get(&key) {
            return name.clone();
        }

        let name = loop {
            let candidate = team_code(self.next_index);
            self.next_index += 1;
            if !self.used_names.contains(&candidate) {
                break candidate;
            }
        };

        self.used_names.insert(name.clone());
        self.names_by_key.insert(key, name.clone());
        self.new_teams
            .push(Team::new(self.tournament_id, name.clone(), member_ids.to_vec()));

        name
    }

    pub fn into_new_teams(self) -> Vec<Team> {
        self.new_teams
    }
}

/// 0 -> A, 25 -> Z, 26 -> AA, 27 -> AB, ...
pub fn team_code(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = vec![];
    while n > 0 {
        n -= 1;
        letters.push((b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    letters.into_iter().rev().collect()
}

#[cfg(test)]
mod test {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn field(n: u128) -> Vec<Participant> {
        (0..n)
            .map(|i| Participant {
                uuid: Uuid::from_u128(1000 + i),
                ..Participant::new(Uuid::from_u128(1), format!("P{}", i))
            })
            .collect()
    }

    fn team_ids(teams: &[Vec<&Participant>]) -> Vec<Vec<u128>> {
        teams
            .iter()
            .map(|t| t.iter().map(|p| p.uuid.as_u128()).collect())
            .collect()
    }

    fn team_match(uuid: u128, a: &[u128], b: &[u128]) -> MatchRecord {
        MatchRecord {
            uuid: Uuid::from_u128(uuid),
            tournament_id: Uuid::from_u128(1),
            round_id: Uuid::from_u128(100),
            status: MatchStatus::Completed,
            participants: a
                .iter()
                .map(|id| (id, TeamLabel::A))
                .chain(b.iter().map(|id| (id, TeamLabel::B)))
                .map(|(id, label)| MatchParticipant {
                    team: Some(label),
                    ..MatchParticipant::new(Uuid::from_u128(*id))
                })
                .collect(),
            team_names: None,
        }
    }

    #[test]
    fn test_balance_first_last_pairs_strong_with_weak() {
        let participants = field(8);
        let formation = form_fresh_teams(
            participants.iter().collect(),
            2,
            TeamFormationMethod::BalanceFirstLast,
            &mut StdRng::seed_from_u64(0),
        );

        assert_eq!(
            team_ids(&formation.teams),
            vec![vec![1000, 1007], vec![1001, 1006], vec![1002, 1005], vec![1003, 1004]]
        );
        assert!(formation.leftover.is_empty());
    }

    #[test]
    fn test_balance_first_last_larger_teams() {
        let participants = field(7);
        let formation = form_fresh_teams(
            participants.iter().collect(),
            3,
            TeamFormationMethod::BalanceFirstLast,
            &mut StdRng::seed_from_u64(0),
        );

        assert_eq!(team_ids(&formation.teams), vec![vec![1000, 1006, 1001], vec![1002, 1005, 1003]]);
        assert_eq!(formation.leftover.len(), 1);
        assert_eq!(formation.leftover[0].uuid, Uuid::from_u128(1004));
    }

    #[test]
    fn test_random_teams_use_everyone_once() {
        let participants = field(9);
        let formation = form_fresh_teams(
            participants.iter().collect(),
            2,
            TeamFormationMethod::Random,
            &mut StdRng::seed_from_u64(42),
        );

        assert_eq!(formation.teams.len(), 4);
        assert!(formation.teams.iter().all(|t| t.len() == 2));
        assert_eq!(formation.leftover.len(), 1);

        let seen = formation
            .teams
            .iter()
            .flatten()
            .chain(formation.leftover.iter())
            .map(|p| p.uuid)
            .collect::<HashSet<_>>();
        assert_eq!(seen.len(), 9);
    }

    #[test]
    fn test_reconstruction_unions_overlapping_line_ups() {
        let participants = field(6);
        let standings = participants.iter().collect_vec();
        let matches = vec![
            team_match(200, &[1001, 1002], &[1004]),
            team_match(201, &[1001, 1003], &[1005]),
        ];

        let formation = reconstruct_teams(&matches.iter().collect_vec(), &standings, 3);

        assert_eq!(team_ids(&formation.teams), vec![vec![1001, 1002, 1003]]);
        assert_eq!(
            formation.leftover.iter().map(|p| p.uuid.as_u128()).collect_vec(),
            vec![1000, 1004, 1005]
        );
    }

    #[test]
    fn test_reconstruction_trims_in_standings_order() {
        let participants = field(6);
        let standings = participants.iter().collect_vec();
        let matches = vec![
            team_match(200, &[1001, 1002], &[1004, 1005]),
            team_match(201, &[1001, 1003], &[1000]),
        ];

        let formation = reconstruct_teams(&matches.iter().collect_vec(), &standings, 2);

        assert_eq!(team_ids(&formation.teams), vec![vec![1001, 1002], vec![1004, 1005]]);
        assert_eq!(
            formation.leftover.iter().map(|p| p.uuid.as_u128()).collect_vec(),
            vec![1000, 1003]
        );
    }

    #[test]
    fn test_reconstruction_skips_inactive_members() {
        let participants = field(4);
        let standings = vec![&participants[0], &participants[1], &participants[2]];
        let matches = vec![team_match(200, &[1000, 1001], &[1002, 1003])];

        let formation = reconstruct_teams(&matches.iter().collect_vec(), &standings, 2);

        assert_eq!(team_ids(&formation.teams), vec![vec![1000, 1001]]);
        assert_eq!(formation.leftover.len(), 1);
    }

    #[test]
    fn test_team_codes() {
        assert_eq!(team_code(0), "A");
        assert_eq!(team_code(25), "Z");
        assert_eq!(team_code(26), "AA");
        assert_eq!(team_code(27), "AB");
        assert_eq!(team_code(51), "AZ");
        assert_eq!(team_code(52), "BA");
        assert_eq!(team_code(701), "ZZ");
        assert_eq!(team_code(702), "AAA");
    }

    #[test]
    fn test_registry_reuses_names_by_member_set() {
        let tournament_id = Uuid::from_u128(1);
        let existing = vec![Team::new(
            tournament_id,
            "A".into(),
            vec![Uuid::from_u128(1000), Uuid::from_u128(1001)],
        )];
        let mut registry = TeamNameRegistry::new(tournament_id, &existing);

        assert_eq!(registry.name_for(&[Uuid::from_u128(1001), Uuid::from_u128(1000)]), "A");
        assert_eq!(registry.name_for(&[Uuid::from_u128(1002), Uuid::from_u128(1003)]), "B");
        assert_eq!(registry.name_for(&[Uuid::from_u128(1003), Uuid::from_u128(1002)]), "B");
        assert_eq!(registry.name_for(&[Uuid::from_u128(1000), Uuid::from_u128(1003)]), "C");

        let new_teams = registry.into_new_teams();
        assert_eq!(new_teams.iter().map(|t| t.name.as_str()).collect_vec(), vec!["B", "C"]);
    }

    #[test]
    fn test_registry_skips_taken_names() {
        let tournament_id = Uuid::from_u128(1);
        let existing = vec![Team::new(tournament_id, "B".into(), vec![Uuid::from_u128(1000)])];
        let mut registry = TeamNameRegistry::new(tournament_id, &existing);

        assert_eq!(registry.name_for(&[Uuid::from_u128(1001)]), "C");
    }
}
