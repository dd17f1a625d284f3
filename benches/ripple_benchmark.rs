use chrono::Utc;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use touch_grass::models::{Friend, PersonalityType};
use touch_grass::services::FriendGraph;

const FRIENDS: usize = 500;
const CONNECTIONS_PER_FRIEND: usize = 20;

/// A profile with `FRIENDS` friends, each linked to a ring of neighbors and
/// a handful of outside people.
fn synthetic_friends() -> Vec<Friend> {
    let now = Utc::now();
    (0..FRIENDS)
        .map(|i| {
            let mut friend = Friend::new(
                format!("friend-{i}"),
                format!("Friend {i}"),
                PersonalityType::ALL[i % PersonalityType::ALL.len()],
                now,
            );
            for j in 1..=CONNECTIONS_PER_FRIEND / 2 {
                friend.connections.push(format!("friend-{}", (i + j) % FRIENDS));
                friend.connections.push(format!("outside-{}", i * CONNECTIONS_PER_FRIEND + j));
            }
            friend
        })
        .collect()
}

fn benchmark_ripple_level(c: &mut Criterion) {
    let friends = synthetic_friends();
    let graph = FriendGraph::build(Some("me"), &friends);

    // Mix of creator, direct friends, friends-of-friends and strangers
    let attendees: Vec<String> = std::iter::once("me".to_string())
        .chain((0..50).map(|i| format!("friend-{}", i * 7)))
        .chain((0..50).map(|i| format!("outside-{}", i * 41 + 1)))
        .chain((0..10).map(|i| format!("stranger-{i}")))
        .collect();

    let mut group = c.benchmark_group("ripple");

    group.bench_function("build_graph", |b| {
        b.iter(|| FriendGraph::build(black_box(Some("me")), black_box(&friends)))
    });

    group.bench_function("ripple_level_large_event", |b| {
        b.iter(|| graph.ripple_level(black_box("me"), black_box(&attendees)))
    });

    group.bench_function("ripple_level_from_stranger", |b| {
        b.iter(|| graph.ripple_level(black_box("stranger-0"), black_box(&attendees)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_ripple_level);
criterion_main!(benches);
