// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Touch Grass command-line driver
//!
//! Runs one store operation against the configured storage and prints the
//! resulting snapshot as JSON. Useful for poking at a data directory without
//! the app.

use clap::{Parser, Subcommand};
use touch_grass::{
    config::Config,
    models::{Friend, NewEvent, OnboardingProfile, PersonalityType, ProfileUpdate},
    DomainStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "touch-grass", about = "Inspect and drive the Touch Grass store")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the current state
    Status,
    /// Create the profile
    Onboard {
        name: String,
        personality: PersonalityType,
        #[arg(long, default_value = "")]
        bio: String,
    },
    /// Edit profile fields
    Edit {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Add a friend
    AddFriend {
        id: String,
        name: String,
        #[arg(long, default_value = "connector")]
        personality: PersonalityType,
        /// Ids this friend is connected to
        #[arg(long = "knows")]
        connections: Vec<String>,
    },
    /// Flip networking mode
    Toggle,
    /// Award grass points
    Award {
        amount: u64,
        /// Where they were earned (hotspots double them)
        #[arg(long)]
        at: Option<String>,
    },
    /// Record a handshake
    Handshake,
    /// Record a visit to a place
    Visit {
        location: String,
        #[arg(long, default_value_t = 0)]
        connections: u32,
    },
    /// Create an event hosted by the profile
    Event {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        date: String,
        #[arg(long, default_value = "")]
        time: String,
    },
    /// RSVP someone to an event
    Rsvp { event_id: String, attendee_id: String },
    /// Wipe all data
    Reset,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    tracing::debug!(data_dir = %config.data_dir.display(), storage = ?config.storage, "Opening store");

    let store = DomainStore::from_config(&config);
    let snapshot = store.load().await;

    match cli.command {
        Command::Status => {}
        Command::Onboard {
            name,
            personality,
            bio,
        } => {
            let mut input = OnboardingProfile::new(name, personality);
            input.bio = bio;
            let profile = store.complete_onboarding(input).await?;
            println!("Friend code: {}", profile.friend_code());
        }
        Command::Edit { name, bio, color } => {
            store.update_profile(ProfileUpdate { name, bio, color }).await?;
        }
        Command::AddFriend {
            id,
            name,
            personality,
            connections,
        } => {
            let mut friend = Friend::new(id, name, personality, chrono::Utc::now());
            friend.connections = connections;
            store.add_friend(friend).await?;
        }
        Command::Toggle => {
            let active = store.toggle_networking_mode().await?;
            println!("{}", if active { "You're visible!" } else { "You're hidden" });
        }
        Command::Award { amount, at } => {
            let total = match at {
                Some(location) => store.award_grass_points_at(amount, &location).await?,
                None => store.award_grass_points(amount).await?,
            };
            println!("Grass points: {total}");
        }
        Command::Handshake => {
            store.record_handshake().await?;
        }
        Command::Visit {
            location,
            connections,
        } => {
            store.record_location_visit(&location, connections).await?;
        }
        Command::Event {
            title,
            description,
            location,
            date,
            time,
        } => {
            let profile = snapshot
                .profile
                .ok_or("Complete onboarding before creating events")?;
            let event = store
                .add_event(NewEvent {
                    title,
                    description,
                    location,
                    date,
                    time,
                    creator_id: profile.id,
                    creator_name: profile.name,
                    ..NewEvent::default()
                })
                .await?;
            println!("Event id: {}", event.id);
        }
        Command::Rsvp {
            event_id,
            attendee_id,
        } => {
            store.rsvp_event(&event_id, &attendee_id).await?;
        }
        Command::Reset => {
            store.reset().await?;
        }
    }

    println!("{}", serde_json::to_string_pretty(&store.snapshot())?);
    Ok(())
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("touch_grass=debug,info")),
        )
        .with(format)
        .init();
}
