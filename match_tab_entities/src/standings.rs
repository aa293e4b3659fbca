use std::cmp::Ordering;
use std::collections::HashMap;

use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::participant::Participant;

/// Pairwise head-to-head ordering is resolved outside of the generic sort.
pub const DIRECT_COMPARISON_KEY: &str = "directComparison";

fn compare_by_tie_breakers(a: &Participant, b: &Participant, tie_breaker_keys: &[String]) -> Ordering {
    tie_breaker_keys
        .iter()
        .filter(|key| key.as_str() != DIRECT_COMPARISON_KEY)
        .map(|key| OrderedFloat(b.scores.get(key)).cmp(&OrderedFloat(a.scores.get(key))))
        .find(|o| *o != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Sorts participants descending by each tie-breaker key in priority order,
/// then by name and finally uuid so the order is total.
pub fn get_standings(participants: Vec<Participant>, tie_breaker_keys: &[String], active_only: bool) -> Vec<Participant> {
    participants
        .into_iter()
        .filter(|p| !active_only || p.is_active)
        .sorted_by(|a, b| {
            compare_by_tie_breakers(a, b, tie_breaker_keys)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.uuid.cmp(&b.uuid))
        })
        .collect_vec()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingsEntry {
    pub rank: u32,
    pub participant: Participant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingsView {
    pub entries: Vec<StandingsEntry>,
    pub participant_index: HashMap<Uuid, usize>,
}

impl StandingsView {
    /// Participants tied on every tie-breaker key share a rank. Names only
    /// order the display.
    pub fn from_participants(participants: Vec<Participant>, tie_breaker_keys: &[String], active_only: bool) -> Self {
        let sorted = get_standings(participants, tie_breaker_keys, active_only);

        let mut entries: Vec<StandingsEntry> = Vec::with_capacity(sorted.len());
        let mut prev_rank = 0;
        for (i, participant) in sorted.into_iter().enumerate() {
            let rank = match entries.last() {
                Some(prev) if compare_by_tie_breakers(&prev.participant, &participant, tie_breaker_keys) == Ordering::Equal => prev_rank,
                _ => i as u32,
            };
            prev_rank = rank;
            entries.push(StandingsEntry { rank, participant });
        }

        let participant_index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.participant.uuid, i))
            .collect::<HashMap<_, _>>();

        StandingsView { entries, participant_index }
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use super::*;
    use crate::domain::score::ScoreVector;

    fn participant(id: u128, name: &str, points: f64, buchholz: f64) -> Participant {
        Participant {
            uuid: Uuid::from_u128(id),
            tournament_id: Uuid::from_u128(1),
            name: name.into(),
            is_active: true,
            scores: ScoreVector {
                points,
                buchholz,
                ..Default::default()
            },
            match_history: vec![],
        }
    }

    fn keys() -> Vec<String> {
        vec!["points".into(), DIRECT_COMPARISON_KEY.into(), "buchholz".into()]
    }

    #[test]
    fn test_sorts_by_tie_breakers_then_name() {
        let standings = get_standings(
            vec![
                participant(1000, "Carla", 3.0, 1.0),
                participant(1001, "Bert", 3.0, 4.0),
                participant(1002, "Anna", 6.0, 0.0),
                participant(1003, "Aaron", 3.0, 1.0),
            ],
            &keys(),
            false,
        );

        assert_eq!(
            standings.iter().map(|p| p.name.as_str()).collect_vec(),
            vec!["Anna", "Bert", "Aaron", "Carla"]
        );
    }

    #[test]
    fn test_active_only_drops_inactive() {
        let mut inactive = participant(1000, "Carla", 9.0, 0.0);
        inactive.is_active = false;
        let standings = get_standings(vec![inactive, participant(1001, "Bert", 0.0, 0.0)], &keys(), true);

        assert_eq!(standings.len(), 1);
        assert_eq!(standings[0].name, "Bert");
    }

    #[test]
    fn test_tied_participants_share_rank() {
        let view = StandingsView::from_participants(
            vec![
                participant(1000, "Carla", 3.0, 1.0),
                participant(1001, "Bert", 6.0, 0.0),
                participant(1002, "Aaron", 3.0, 1.0),
                participant(1003, "Dora", 0.0, 0.0),
            ],
            &keys(),
            false,
        );

        assert_eq!(view.entries.iter().map(|e| e.rank).collect_vec(), vec![0, 1, 1, 3]);
        assert_eq!(view.participant_index[&Uuid::from_u128(1002)], 1);
    }
}
