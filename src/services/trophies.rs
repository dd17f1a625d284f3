//! Trophy unlock evaluation.

use chrono::{DateTime, Utc};

use crate::models::trophy::{definition, TrophyRequirement};
use crate::models::Trophy;

/// Counters the trophy predicates look at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrophyProgress {
    pub handshakes: u32,
    pub grass_points: u64,
    pub friends: usize,
    pub sessions: u32,
}

impl TrophyRequirement {
    pub fn is_met(&self, progress: &TrophyProgress) -> bool {
        match *self {
            TrophyRequirement::Handshakes(n) => progress.handshakes >= n,
            TrophyRequirement::GrassPoints(n) => progress.grass_points >= n,
            TrophyRequirement::Friends(n) => progress.friends >= n,
            TrophyRequirement::Sessions(n) => progress.sessions >= n,
        }
    }
}

/// Unlock every locked trophy whose requirement is now met.
///
/// Already-unlocked trophies are never touched, so repeated evaluation is a
/// no-op. Trophies not in the catalog never unlock. Returns the ids unlocked
/// by this call.
pub fn evaluate_trophies(
    trophies: &mut [Trophy],
    progress: &TrophyProgress,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut unlocked = Vec::new();
    for trophy in trophies.iter_mut().filter(|t| !t.is_unlocked) {
        let Some(def) = definition(&trophy.id) else {
            continue;
        };
        if def.requirement.is_met(progress) {
            trophy.is_unlocked = true;
            trophy.unlocked_at = Some(now);
            unlocked.push(trophy.id.clone());
        }
    }
    unlocked
}
