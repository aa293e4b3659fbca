use itertools::Itertools;
use match_tab_entities::prelude::*;
use tracing::debug;

use super::entity::{have_met, SwissEntity};
use super::opponents::OpponentGraph;

/// Splits a sorted field into groups of `group_size`. The last group may
/// be short.
pub fn group_entities<'a, T: SwissEntity>(
    entities: Vec<&'a T>,
    group_size: usize,
    method: GroupingMethod,
    graph: &OpponentGraph,
) -> Vec<Vec<&'a T>> {
    if group_size == 0 {
        return vec![];
    }

    match method {
        GroupingMethod::SimpleChunk => entities.chunks(group_size).map(|c| c.to_vec()).collect(),
        GroupingMethod::SwissGrouping => swiss_grouping(entities, group_size, graph),
    }
}

fn swiss_grouping<'a, T: SwissEntity>(
    mut remaining: Vec<&'a T>,
    group_size: usize,
    graph: &OpponentGraph,
) -> Vec<Vec<&'a T>> {
    let mut groups = vec![];

    while !remaining.is_empty() {
        let mut group = vec![remaining.remove(0)];

        while group.len() < group_size && !remaining.is_empty() {
            let fresh = remaining
                .iter()
                .position(|candidate| !group.iter().any(|member| have_met(graph, *member, *candidate)));

            let idx = fresh.unwrap_or_else(|| {
                debug!(
                    "No fresh opponent left for group of {}",
                    group.iter().map(|m| m.uuid()).join(", ")
                );
                0
            });
            group.push(remaining.remove(idx));
        }

        groups.push(group);
    }

    groups
}
