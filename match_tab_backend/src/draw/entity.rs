use std::slice;

use itertools::Itertools;
use match_tab_entities::prelude::*;

use super::opponents::OpponentGraph;

/// Anything the pairing engines can rank and pair.
pub trait SwissEntity {
    fn uuid(&self) -> Uuid;
    fn primary_score(&self) -> f64;
    fn score_vector(&self) -> Option<&ScoreVector>;
    /// The participants fielded by this entity.
    fn member_ids(&self) -> &[Uuid];

    /// Score groups are runs of entities with identical scores. When either
    /// side has no full vector only the primary score is compared.
    fn is_in_score_group_of(&self, other: &Self) -> bool {
        match (self.score_vector(), other.score_vector()) {
            (Some(a), Some(b)) => a.is_tied_with(b),
            _ => self.primary_score() == other.primary_score(),
        }
    }
}

impl SwissEntity for Participant {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn primary_score(&self) -> f64 {
        self.scores.points
    }

    fn score_vector(&self) -> Option<&ScoreVector> {
        Some(&self.scores)
    }

    fn member_ids(&self) -> &[Uuid] {
        slice::from_ref(&self.uuid)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamEntity {
    pub uuid: Uuid,
    pub lookup_key: String,
    pub member_ids: Vec<Uuid>,
    /// Mean of the members' primary scores.
    pub score: f64,
}

impl TeamEntity {
    pub fn from_members(members: &[&Participant]) -> Self {
        let member_ids = members.iter().map(|m| m.uuid).collect_vec();
        let score = if members.is_empty() {
            0.0
        } else {
            members.iter().map(|m| m.scores.points).sum::<f64>() / members.len() as f64
        };

        TeamEntity {
            uuid: Uuid::new_v4(),
            lookup_key: lookup_key(&member_ids),
            member_ids,
            score,
        }
    }
}

impl SwissEntity for TeamEntity {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn primary_score(&self) -> f64 {
        self.score
    }

    fn score_vector(&self) -> Option<&ScoreVector> {
        None
    }

    fn member_ids(&self) -> &[Uuid] {
        &self.member_ids
    }
}

pub(crate) fn have_met<T: SwissEntity>(graph: &OpponentGraph, a: &T, b: &T) -> bool {
    graph.have_any_played(a.member_ids(), b.member_ids())
}
