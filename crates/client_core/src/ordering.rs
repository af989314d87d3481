//! Single-element moves over an ordered link sequence and the rank
//! bookkeeping that keeps `order` strictly increasing afterwards.

use std::collections::HashMap;

use shared::{domain::LinkId, protocol::Link};

/// Rank changes produced by a move, keyed by link.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub from: usize,
    pub to: usize,
    pub ranks: Vec<(LinkId, f64)>,
}

pub fn sort_by_order(links: &mut [Link]) {
    links.sort_by(|a, b| a.order.total_cmp(&b.order));
}

pub fn position_of(links: &[Link], id: &LinkId) -> Option<usize> {
    links.iter().position(|link| &link.id == id)
}

/// Moves `moved_id` into the slot currently held by `target_id`.
///
/// Returns `None` without touching the sequence when either id is absent or
/// both resolve to the same slot.
pub fn move_link(
    links: &mut Vec<Link>,
    moved_id: &LinkId,
    target_id: &LinkId,
) -> Option<MoveOutcome> {
    let from = position_of(links, moved_id)?;
    let to = position_of(links, target_id)?;
    if from == to {
        return None;
    }

    let moved = links.remove(from);
    links.insert(to, moved);
    let ranks = assign_rank(links, to);
    Some(MoveOutcome { from, to, ranks })
}

/// Gives the link at `index` a rank between its neighbours, renumbering the
/// whole sequence when no such rank exists.
fn assign_rank(links: &mut [Link], index: usize) -> Vec<(LinkId, f64)> {
    let prev = index
        .checked_sub(1)
        .and_then(|i| links.get(i))
        .map(|link| link.order);
    let next = links.get(index + 1).map(|link| link.order);

    let candidate = match (prev, next) {
        (None, None) => return Vec::new(),
        (Some(prev), None) => Some(prev + 1.0),
        (None, Some(next)) => Some(next - 1.0),
        (Some(prev), Some(next)) => {
            let mid = prev + (next - prev) / 2.0;
            (prev < mid && mid < next).then_some(mid)
        }
    };

    match (candidate, links.get_mut(index)) {
        (Some(rank), Some(link)) if rank.is_finite() => {
            link.order = rank;
            vec![(link.id.clone(), rank)]
        }
        _ => renumber(links),
    }
}

/// Assigns ranks 1..=n in sequence order.
pub fn renumber(links: &mut [Link]) -> Vec<(LinkId, f64)> {
    let mut rank = 0.0;
    links
        .iter_mut()
        .map(|link| {
            rank += 1.0;
            link.order = rank;
            (link.id.clone(), rank)
        })
        .collect()
}

/// Overwrites every known link's rank with its confirmed value and restores
/// ascending order. Links without a confirmed rank keep their current one.
pub fn apply_confirmed(links: &mut [Link], confirmed: &HashMap<LinkId, f64>) {
    for link in links.iter_mut() {
        if let Some(order) = confirmed.get(&link.id) {
            link.order = *order;
        }
    }
    sort_by_order(links);
}

#[cfg(test)]
pub(crate) fn is_strictly_increasing(links: &[Link]) -> bool {
    links.windows(2).all(|pair| match pair {
        [a, b] => a.order < b.order,
        _ => true,
    })
}

#[cfg(test)]
#[path = "tests/ordering_tests.rs"]
mod tests;
