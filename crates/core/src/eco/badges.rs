#![forbid(unsafe_code)]

use std::collections::BTreeSet;

/// Width of one progress-bar level, in points.
pub const LEVEL_WIDTH: i64 = 100;

/// Milestones unlocked by the cumulative point total.
///
/// Variants are declared in ascending threshold order, so the derived `Ord`
/// sorts badges from the first milestone to the last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Badge {
    EcoRookie,
    SustainableStar,
    EcoWarrior,
}

impl Badge {
    pub const ALL: [Badge; 3] = [Badge::EcoRookie, Badge::SustainableStar, Badge::EcoWarrior];

    pub fn name(self) -> &'static str {
        match self {
            Badge::EcoRookie => "Eco Rookie",
            Badge::SustainableStar => "Sustainable Star",
            Badge::EcoWarrior => "Eco Warrior",
        }
    }

    pub fn threshold(self) -> i64 {
        match self {
            Badge::EcoRookie => 50,
            Badge::SustainableStar => 100,
            Badge::EcoWarrior => 200,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|badge| badge.name() == name)
    }

    pub fn is_unlocked(self, total: i64) -> bool {
        total >= self.threshold()
    }
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Every badge whose threshold `total` has reached; lower badges stay unlocked
/// once a higher one is earned.
pub fn derive_badges(total: i64) -> BTreeSet<Badge> {
    Badge::ALL
        .into_iter()
        .filter(|badge| badge.is_unlocked(total))
        .collect()
}

pub fn badge_names(total: i64) -> Vec<&'static str> {
    derive_badges(total).into_iter().map(Badge::name).collect()
}

/// The next badge still locked at `total` and the points missing to reach it.
pub fn next_badge(total: i64) -> Option<(Badge, i64)> {
    Badge::ALL
        .into_iter()
        .find(|badge| !badge.is_unlocked(total))
        .map(|badge| (badge, badge.threshold() - total))
}

/// Points left until the next multiple of [`LEVEL_WIDTH`].
///
/// An exact multiple reports a full level (`100`), not `0`.
pub fn points_to_next_level(total: i64) -> i64 {
    LEVEL_WIDTH - total.rem_euclid(LEVEL_WIDTH)
}

/// Fill fraction of the current level's progress bar, in `[0, 1)`.
pub fn level_progress(total: i64) -> f32 {
    total.rem_euclid(LEVEL_WIDTH) as f32 / LEVEL_WIDTH as f32
}
