#![forbid(unsafe_code)]

use super::badges::{Badge, derive_badges};
use crate::error::CoreError;
use std::collections::BTreeSet;

/// Adds `points_awarded` to a running total.
///
/// Points can only be added through this path; a negative award or total is
/// rejected, and a sum past `i64::MAX` fails with [`CoreError::Overflow`].
pub fn log_activity(current_total: i64, points_awarded: i64) -> Result<i64, CoreError> {
    if current_total < 0 {
        return Err(CoreError::InvalidArgument("current total must be >= 0"));
    }
    if points_awarded < 0 {
        return Err(CoreError::InvalidArgument("points awarded must be >= 0"));
    }
    current_total
        .checked_add(points_awarded)
        .ok_or(CoreError::Overflow)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityEntry {
    pub label: String,
    pub points: i64,
    pub timestamp_ms: i64,
}

impl ActivityEntry {
    pub fn try_new(
        label: impl Into<String>,
        points: i64,
        timestamp_ms: i64,
    ) -> Result<Self, CoreError> {
        let label = label.into();
        let label = label.trim();
        if label.is_empty() {
            return Err(CoreError::InvalidArgument("activity label must not be empty"));
        }
        if points < 0 {
            return Err(CoreError::InvalidArgument("points awarded must be >= 0"));
        }
        Ok(Self {
            label: label.to_string(),
            points,
            timestamp_ms,
        })
    }
}

/// A user's point total together with the badges it unlocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcoProgress {
    total: i64,
    badges: BTreeSet<Badge>,
}

impl EcoProgress {
    pub fn from_total(total: i64) -> Result<Self, CoreError> {
        if total < 0 {
            return Err(CoreError::InvalidArgument("point total must be >= 0"));
        }
        Ok(Self {
            total,
            badges: derive_badges(total),
        })
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn badges(&self) -> &BTreeSet<Badge> {
        &self.badges
    }

    pub fn apply(&self, entry: &ActivityEntry) -> Result<ProgressUpdate, CoreError> {
        let total = log_activity(self.total, entry.points)?;
        let progress = Self::from_total(total)?;
        let unlocked = progress
            .badges
            .difference(&self.badges)
            .copied()
            .collect();
        Ok(ProgressUpdate { progress, unlocked })
    }
}

impl Default for EcoProgress {
    fn default() -> Self {
        Self {
            total: 0,
            badges: BTreeSet::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub progress: EcoProgress,
    /// Badges this update crossed into.
    pub unlocked: Vec<Badge>,
}
