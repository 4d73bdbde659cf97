//! Collection router ("bounce tracking").
//!
//! Pure function of the active collection id and a snapshot of all
//! collections. The active collection is passed in explicitly; there is no
//! ambient "current collection" state.

use std::cmp::Ordering;

use crate::collection::Collection;
use crate::ids::CollectionId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// No collection accepts new clips.
    NoAcceptingCollection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Target(CollectionId),
    Dropped(DropReason),
}

impl RouteDecision {
    pub fn target(&self) -> Option<&CollectionId> {
        match self {
            RouteDecision::Target(id) => Some(id),
            RouteDecision::Dropped(_) => None,
        }
    }
}

fn precedence(a: &Collection, b: &Collection) -> Ordering {
    a.sort_key.cmp(&b.sort_key).then_with(|| a.id.cmp(&b.id))
}

/// Decide which collection receives a new clip.
///
/// 1. The active collection, if it accepts new clips.
/// 2. Otherwise the accepting, non-virtual, non-read-only collection with the
///    lowest `(sort_key, id)`.
/// 3. Otherwise the clip is dropped.
pub fn route(active: Option<&CollectionId>, collections: &[Collection]) -> RouteDecision {
    if let Some(active_id) = active {
        if let Some(active) = collections.iter().find(|c| &c.id == active_id) {
            if active.accepts_captures() {
                return RouteDecision::Target(active.id.clone());
            }
        }
    }

    collections
        .iter()
        .filter(|c| c.accepts_captures())
        .min_by(|a, b| precedence(a, b))
        .map(|c| RouteDecision::Target(c.id.clone()))
        .unwrap_or(RouteDecision::Dropped(DropReason::NoAcceptingCollection))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounce_fixture() -> Vec<Collection> {
        vec![
            Collection::new("a", "A", 10).accepting(false),
            Collection::new("b", "B", 5),
            Collection::new("c", "C", 1).virtual_view(),
            Collection::new("d", "D", 20),
        ]
    }

    #[test]
    fn active_collection_wins_when_accepting() {
        let collections = bounce_fixture();
        assert_eq!(
            route(Some(&"d".into()), &collections),
            RouteDecision::Target("d".into())
        );
    }

    #[test]
    fn bounces_to_lowest_eligible_sort_key() {
        let collections = bounce_fixture();
        assert_eq!(
            route(Some(&"a".into()), &collections),
            RouteDecision::Target("b".into())
        );
    }

    #[test]
    fn equal_sort_keys_fall_back_to_id_order() {
        let collections = vec![
            Collection::new("zeta", "Z", 3),
            Collection::new("alpha", "A", 3),
        ];
        assert_eq!(route(None, &collections), RouteDecision::Target("alpha".into()));
    }

    #[test]
    fn read_only_active_collection_is_bounced() {
        let collections = vec![
            Collection::new("ro", "RO", 0).read_only(),
            Collection::new("rw", "RW", 9),
        ];
        assert_eq!(
            route(Some(&"ro".into()), &collections),
            RouteDecision::Target("rw".into())
        );
    }

    #[test]
    fn unknown_active_collection_behaves_like_non_accepting() {
        let collections = vec![Collection::new("inbox", "Inbox", 0)];
        assert_eq!(
            route(Some(&"missing".into()), &collections),
            RouteDecision::Target("inbox".into())
        );
    }

    #[test]
    fn drops_when_nothing_accepts() {
        let collections = vec![
            Collection::new("a", "A", 0).accepting(false),
            Collection::new("b", "B", 1).accepting(false),
        ];
        assert_eq!(
            route(Some(&"a".into()), &collections),
            RouteDecision::Dropped(DropReason::NoAcceptingCollection)
        );
        assert_eq!(
            route(None, &[]),
            RouteDecision::Dropped(DropReason::NoAcceptingCollection)
        );
    }
}
