#![forbid(unsafe_code)]

use crate::collections::{self, ACTIVITIES, ECO_TRACKER, object};
use crate::error::AppError;
use crate::time::now_ms_i64;
use eco_core::eco::{ActivityEntry, ProgressUpdate};
use eco_core::ports::CurrentUserProvider;
use eco_core::{CoreError, EcoProgress, UserId};
use eco_storage::{DocPath, Direction, DocumentStore, i64_field};
use serde_json::json;
use tracing::{info, warn};

/// Per-user point ledger stored at `ecoTracker/<uid>`, with the append-only
/// activity log under `ecoTracker/<uid>/activities`.
pub struct EcoTracker<'a, S, U> {
    store: &'a mut S,
    users: &'a U,
}

impl<'a, S: DocumentStore, U: CurrentUserProvider> EcoTracker<'a, S, U> {
    pub fn new(store: &'a mut S, users: &'a U) -> Self {
        Self { store, users }
    }

    /// Current progress; a user with no record starts at zero.
    pub fn load(&self) -> Result<EcoProgress, AppError> {
        let uid = self.users.current_user().ok_or(AppError::NotSignedIn)?;
        self.load_for(&uid)
    }

    pub fn log_activity(&mut self, label: &str, points: i64) -> Result<ProgressUpdate, AppError> {
        let uid = self.users.current_user().ok_or(AppError::NotSignedIn)?;
        let entry = ActivityEntry::try_new(label, points, now_ms_i64())?;
        let current = self.load_for(&uid)?;

        let update = match current.apply(&entry) {
            Ok(update) => update,
            Err(CoreError::Overflow) => {
                warn!(
                    user = %uid,
                    total = current.total(),
                    points,
                    "activity rejected: point total would overflow"
                );
                return Err(CoreError::Overflow.into());
            }
            Err(err) => return Err(err.into()),
        };

        // The log entry lands before the total moves.
        let total = update.progress.total();
        self.store.add(
            &tracker_doc(&uid)?.child(ACTIVITIES)?,
            object(json!({
                "label": entry.label,
                "points": entry.points,
                "timestamp": entry.timestamp_ms,
            })),
        )?;
        self.store.set(
            &tracker_doc(&uid)?,
            object(json!({
                "points": total,
                "lastActivity": entry.label,
                "timestamp": entry.timestamp_ms,
            })),
        )?;

        info!(user = %uid, activity = %entry.label, points, total, "activity logged");
        for badge in &update.unlocked {
            info!(user = %uid, badge = badge.name(), "badge unlocked");
        }
        Ok(update)
    }

    /// Logged activities, oldest first.
    pub fn history(&self) -> Result<Vec<ActivityEntry>, AppError> {
        let uid = self.users.current_user().ok_or(AppError::NotSignedIn)?;
        let activities = tracker_doc(&uid)?.child(ACTIVITIES)?;
        Ok(self
            .store
            .list_ordered(&activities, "timestamp", Direction::Ascending, 0)?
            .into_iter()
            .map(|doc| ActivityEntry {
                label: doc.str_field("label"),
                points: doc.i64_field("points"),
                timestamp_ms: doc.i64_field("timestamp"),
            })
            .collect())
    }

    fn load_for(&self, uid: &UserId) -> Result<EcoProgress, AppError> {
        let points = self
            .store
            .get(&tracker_doc(uid)?)?
            .map(|doc| i64_field(&doc, "points"))
            .unwrap_or(0);
        Ok(EcoProgress::from_total(points)?)
    }
}

fn tracker_doc(uid: &UserId) -> Result<DocPath, AppError> {
    Ok(collections::root(ECO_TRACKER)?.doc(uid.as_str())?)
}
