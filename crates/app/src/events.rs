#![forbid(unsafe_code)]

use crate::collections::{self, EVENTS, INTERESTED, object};
use crate::error::AppError;
use eco_core::CoreError;
use eco_core::model::{Event, EventInterest};
use eco_core::ports::CurrentUserProvider;
use eco_storage::{DocPath, Direction, DocumentStore, StoredDoc, Subscription};
use serde_json::json;
use tracing::info;

const INTERESTED_COUNT: &str = "interestedCount";

/// Community events stored in `events`, with sign-ups under `events/<id>/interested`.
pub struct Events<'a, S, U> {
    store: &'a mut S,
    users: &'a U,
}

impl<'a, S: DocumentStore, U: CurrentUserProvider> Events<'a, S, U> {
    pub fn new(store: &'a mut S, users: &'a U) -> Self {
        Self { store, users }
    }

    /// All events ordered by their date string.
    pub fn list(&self) -> Result<Vec<Event>, AppError> {
        Ok(self
            .store
            .list_ordered(&collections::root(EVENTS)?, "date", Direction::Ascending, 0)?
            .iter()
            .map(event_from_doc)
            .collect())
    }

    pub fn upload(
        &mut self,
        title: &str,
        description: &str,
        date: &str,
        image_url: &str,
    ) -> Result<Event, AppError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CoreError::InvalidArgument("event title must not be empty").into());
        }
        let path = self.store.add(
            &collections::root(EVENTS)?,
            object(json!({
                "title": title,
                "description": description.trim(),
                "date": date.trim(),
                "imageUrl": image_url.trim(),
                INTERESTED_COUNT: 0,
            })),
        )?;
        info!(event = path.id(), "event published");
        Ok(Event {
            id: path.id().to_string(),
            title: title.to_string(),
            description: description.trim().to_string(),
            date: date.trim().to_string(),
            image_url: image_url.trim().to_string(),
            interested: 0,
        })
    }

    /// Records the signed-in user's interest and returns the new interest count.
    pub fn register_interest(
        &mut self,
        event_id: &str,
        name: &str,
        email: &str,
    ) -> Result<i64, AppError> {
        let uid = self.users.current_user().ok_or(AppError::NotSignedIn)?;
        let interest = EventInterest::try_new(uid.as_str(), name, email)?;
        let event = event_doc(event_id)?;
        if !self.store.exists(&event)? {
            return Err(AppError::UnknownId(event_id.to_string()));
        }

        self.store.add(
            &event.child(INTERESTED)?,
            object(json!({
                "uid": interest.uid,
                "name": interest.name,
                "email": interest.email,
            })),
        )?;
        let count = self.store.increment(&event, INTERESTED_COUNT, 1)?;
        info!(event = event.id(), user = %uid, count, "interest registered");
        Ok(count)
    }

    pub fn subscribe(&mut self) -> Result<Subscription, AppError> {
        Ok(self.store.subscribe(&collections::root(EVENTS)?)?)
    }
}

fn event_doc(event_id: &str) -> Result<DocPath, AppError> {
    Ok(collections::root(EVENTS)?.doc(event_id.trim())?)
}

fn event_from_doc(doc: &StoredDoc) -> Event {
    Event {
        id: doc.id.clone(),
        title: doc.str_field("title"),
        description: doc.str_field("description"),
        date: doc.str_field("date"),
        image_url: doc.str_field("imageUrl"),
        interested: doc.i64_field(INTERESTED_COUNT),
    }
}
