//! Social hotspots: places where connecting earns bonus grass points.

/// A named place with a grass-point multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotspot {
    pub name: &'static str,
    pub multiplier: u64,
}

pub const SOCIAL_HOTSPOTS: &[Hotspot] = &[
    Hotspot { name: "Central Park", multiplier: 2 },
    Hotspot { name: "Coffee District", multiplier: 2 },
    Hotspot { name: "University Campus", multiplier: 2 },
    Hotspot { name: "Downtown Plaza", multiplier: 2 },
    Hotspot { name: "Beach Boardwalk", multiplier: 2 },
];

/// Find the hotspot for a location name (case-insensitive).
pub fn find_hotspot(location: &str) -> Option<&'static Hotspot> {
    let location = location.trim();
    SOCIAL_HOTSPOTS
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(location))
}

/// Multiplier applied to points earned at `location`; 1 away from hotspots.
pub fn grass_point_multiplier(location: &str) -> u64 {
    find_hotspot(location).map_or(1, |h| h.multiplier)
}
