use std::collections::{HashSet, VecDeque};

use match_tab_entities::prelude::*;
use tracing::{debug, warn};

use super::entity::{have_met, SwissEntity};
use super::opponents::OpponentGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwissPairingOptions {
    pub avoid_rematches: bool,
    pub conflict_policy: ConflictPolicy,
}

impl Default for SwissPairingOptions {
    fn default() -> Self {
        SwissPairingOptions {
            avoid_rematches: true,
            conflict_policy: ConflictPolicy::FloatDown,
        }
    }
}

#[derive(Debug)]
pub struct SwissPairing<'a, T> {
    pub pairs: Vec<(&'a T, &'a T)>,
    /// Only non-empty for odd input.
    pub unpaired: Vec<&'a T>,
}

impl<'a, T> SwissPairing<'a, T> {
    fn empty() -> Self {
        SwissPairing {
            pairs: vec![],
            unpaired: vec![],
        }
    }

    fn extend(&mut self, other: SwissPairing<'a, T>) {
        self.pairs.extend(other.pairs);
        self.unpaired.extend(other.unpaired);
    }
}

/// Pairs entities that are already sorted best first.
pub fn pair_entities<'a, T: SwissEntity>(
    entities: Vec<&'a T>,
    variant: SwissVariant,
    graph: &OpponentGraph,
    options: &SwissPairingOptions,
) -> SwissPairing<'a, T> {
    match variant {
        SwissVariant::Generic => pair_generic(entities, graph, options),
        SwissVariant::FideDutch => pair_fide_dutch(entities, graph, options),
    }
}

fn is_rematch<T: SwissEntity>(graph: &OpponentGraph, options: &SwissPairingOptions, a: &T, b: &T) -> bool {
    options.avoid_rematches && have_met(graph, a, b)
}

/// Pairs the top entity with the best-placed opponent it has not met yet.
pub fn pair_generic<'a, T: SwissEntity>(
    entities: Vec<&'a T>,
    graph: &OpponentGraph,
    options: &SwissPairingOptions,
) -> SwissPairing<'a, T> {
    let mut remaining: VecDeque<&'a T> = entities.into();
    let mut floated = HashSet::new();
    let mut result = SwissPairing::empty();

    while let Some(top) = remaining.pop_front() {
        if remaining.is_empty() {
            result.unpaired.push(top);
            break;
        }

        let partner_idx = remaining
            .iter()
            .position(|candidate| !is_rematch(graph, options, top, *candidate));

        let partner_idx = match partner_idx {
            Some(idx) => idx,
            None => match options.conflict_policy {
                // An entity floats at most once, after that it takes whoever is left
                ConflictPolicy::FloatDown if floated.insert(top.uuid()) => {
                    debug!("Floating {} down, no opponent without rematch", top.uuid());
                    remaining.push_back(top);
                    continue;
                }
                _ => {
                    warn!("Pairing {} with a previous opponent", top.uuid());
                    0
                }
            },
        };

        if let Some(partner) = remaining.remove(partner_idx) {
            result.pairs.push((top, partner));
        }
    }

    result
}

fn score_groups<'a, T: SwissEntity>(entities: Vec<&'a T>) -> VecDeque<Vec<&'a T>> {
    let mut groups: VecDeque<Vec<&'a T>> = VecDeque::new();
    for entity in entities {
        match groups.back_mut() {
            Some(group) if group.last().map(|last| last.is_in_score_group_of(entity)).unwrap_or(false) => {
                group.push(entity)
            }
            _ => groups.push_back(vec![entity]),
        }
    }
    groups
}

/// Score-group pairing: within each group of equal scores the upper half
/// meets the lower half. Odd groups float their lowest entity into the next
/// group.
pub fn pair_fide_dutch<'a, T: SwissEntity>(
    entities: Vec<&'a T>,
    graph: &OpponentGraph,
    options: &SwissPairingOptions,
) -> SwissPairing<'a, T> {
    let mut groups = score_groups(entities);
    let mut result = SwissPairing::empty();
    let mut carry: Vec<&'a T> = vec![];

    while let Some(group) = groups.pop_front() {
        let mut bracket = carry.drain(..).chain(group.into_iter()).collect::<Vec<_>>();
        if bracket.len() % 2 == 1 {
            if let Some(lowest) = bracket.pop() {
                carry.push(lowest);
            }
        }

        let half = bracket.len() / 2;
        let upper = &bracket[..half];
        let mut lower: Vec<Option<&'a T>> = bracket[half..].iter().map(|e| Some(*e)).collect();

        for (i, top) in upper.iter().enumerate() {
            let default = lower[i].filter(|b| !is_rematch(graph, options, *top, *b)).map(|_| i);
            let alternative = || {
                lower
                    .iter()
                    .position(|b| b.map(|b| !is_rematch(graph, options, *top, b)).unwrap_or(false))
            };

            let partner_idx = match default.or_else(alternative) {
                Some(idx) => idx,
                None => match options.conflict_policy {
                    ConflictPolicy::PairAnyway => {
                        warn!("Pairing {} with a previous opponent", top.uuid());
                        match lower.iter().position(|b| b.is_some()) {
                            Some(idx) => idx,
                            None => break,
                        }
                    }
                    ConflictPolicy::FloatDown => {
                        debug!("Score groups exhausted at {}, pairing the rest generically", top.uuid());
                        let rest = upper[i..]
                            .iter()
                            .cloned()
                            .chain(lower.iter().filter_map(|b| *b))
                            .chain(carry.drain(..))
                            .chain(groups.drain(..).flatten())
                            .collect::<Vec<_>>();
                        result.extend(pair_generic(rest, graph, options));
                        return result;
                    }
                },
            };

            if let Some(partner) = lower[partner_idx].take() {
                result.pairs.push((*top, partner));
            }
        }
    }

    result.extend(pair_generic(carry, graph, options));
    result
}
