// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - the domain store and the aggregation engine it drives.

pub mod hotspots;
pub mod ripple;
pub mod store;
pub mod trophies;

pub use ripple::FriendGraph;
pub use store::{DomainStore, StoreSnapshot};
pub use trophies::{evaluate_trophies, TrophyProgress};
