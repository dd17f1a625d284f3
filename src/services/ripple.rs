// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ripple levels: how many friendship generations have joined an event.
//!
//! The friendship graph is an adjacency map keyed by id, built fresh from
//! the friend list. The ripple level of an event is the largest
//! breadth-first distance from its creator to any attendee; attendees with
//! no path to the creator count as direct adds (distance 1).

use std::collections::{HashMap, HashSet, VecDeque};

use crate::models::{Event, Friend};

/// Undirected friendship graph.
#[derive(Debug, Default, Clone)]
pub struct FriendGraph {
    adjacency: HashMap<String, HashSet<String>>,
}

impl FriendGraph {
    /// Build the graph: the profile is linked to each friend, and each
    /// friend to the ids in its `connections`.
    pub fn build(profile_id: Option<&str>, friends: &[Friend]) -> Self {
        let mut graph = Self::default();
        for friend in friends {
            if let Some(me) = profile_id {
                graph.add_edge(me, &friend.id);
            }
            for other in &friend.connections {
                graph.add_edge(&friend.id, other);
            }
        }
        graph
    }

    pub fn add_edge(&mut self, a: &str, b: &str) {
        if a == b {
            return;
        }
        self.adjacency
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        self.adjacency
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());
    }

    pub fn neighbors(&self, id: &str) -> impl Iterator<Item = &str> {
        self.adjacency
            .get(id)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Hop counts from `origin` to every reachable node (origin included).
    pub fn distances_from(&self, origin: &str) -> HashMap<&str, u32> {
        let mut dist: HashMap<&str, u32> = HashMap::new();
        let Some((origin, _)) = self.adjacency.get_key_value(origin) else {
            return dist;
        };

        dist.insert(origin.as_str(), 0);
        let mut queue = VecDeque::from([origin.as_str()]);
        while let Some(node) = queue.pop_front() {
            let next = dist[node] + 1;
            for neighbor in self.neighbors(node) {
                if !dist.contains_key(neighbor) {
                    dist.insert(neighbor, next);
                    queue.push_back(neighbor);
                }
            }
        }
        dist
    }

    /// Ripple level for a creator and attendee list.
    pub fn ripple_level<S: AsRef<str>>(&self, creator_id: &str, attendees: &[S]) -> u32 {
        let dist = self.distances_from(creator_id);
        attendees
            .iter()
            .map(|a| {
                let a = a.as_ref();
                if a == creator_id {
                    0
                } else {
                    dist.get(a).copied().unwrap_or(1)
                }
            })
            .max()
            .unwrap_or(0)
    }
}

/// Recompute `ripple_level` on every event. Returns how many changed.
pub fn recompute_ripple_levels(graph: &FriendGraph, events: &mut [Event]) -> usize {
    let mut changed = 0;
    for event in events.iter_mut() {
        let level = graph.ripple_level(&event.creator_id, &event.attendees);
        if level != event.ripple_level {
            event.ripple_level = level;
            changed += 1;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PersonalityType;
    use chrono::Utc;

    fn friend(id: &str) -> Friend {
        Friend::new(id, id.to_uppercase(), PersonalityType::Connector, Utc::now())
    }

    #[test]
    fn test_creator_only_is_level_zero() {
        let graph = FriendGraph::build(Some("me"), &[friend("a")]);
        assert_eq!(graph.ripple_level("me", &["me"]), 0);
        assert_eq!(graph.ripple_level("me", &[] as &[&str]), 0);
    }

    #[test]
    fn test_generations_follow_bfs_distance() {
        // me — a — b — c
        let friends = vec![
            friend("a").connected_to("b"),
            friend("x"),
        ];
        let mut graph = FriendGraph::build(Some("me"), &friends);
        graph.add_edge("b", "c");

        assert_eq!(graph.ripple_level("me", &["me", "a"]), 1);
        assert_eq!(graph.ripple_level("me", &["me", "a", "b"]), 2);
        assert_eq!(graph.ripple_level("me", &["me", "c"]), 3);
    }

    #[test]
    fn test_shortest_path_wins() {
        // b is reachable via a (2 hops) and directly (1 hop)
        let friends = vec![friend("a").connected_to("b"), friend("b")];
        let graph = FriendGraph::build(Some("me"), &friends);
        assert_eq!(graph.ripple_level("me", &["me", "b"]), 1);
    }

    #[test]
    fn test_unreachable_attendee_counts_as_direct() {
        let graph = FriendGraph::build(Some("me"), &[friend("a")]);
        assert_eq!(graph.ripple_level("me", &["me", "stranger"]), 1);
        // Creator outside the graph entirely
        assert_eq!(graph.ripple_level("someone-else", &["someone-else", "a"]), 1);
    }

    #[test]
    fn test_cycles_terminate() {
        let friends = vec![
            friend("a").connected_to("b"),
            friend("b").connected_to("a"),
        ];
        let graph = FriendGraph::build(Some("me"), &friends);
        let dist = graph.distances_from("me");
        assert_eq!(dist.len(), 3);
        assert_eq!(dist["a"], 1);
        assert_eq!(dist["b"], 1);
    }

    #[test]
    fn test_self_edges_ignored() {
        let graph = FriendGraph::build(None, &[friend("a").connected_to("a")]);
        assert_eq!(graph.node_count(), 0);
    }
}
