// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Touch Grass: persisted domain store for a proximity-networking app
//!
//! This crate owns the user's profile, friends and events, keeps them
//! durable across restarts, and derives the gamification aggregates
//! (ripple levels, networking stats, trophies) from them. Screens and
//! navigation live elsewhere and talk to [`services::DomainStore`].

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;

pub use error::{AppError, Result};
pub use services::{DomainStore, StoreSnapshot};
