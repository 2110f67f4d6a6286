#![forbid(unsafe_code)]

//! JSON shapes printed by the command-line front end.

use crate::time::ts_ms_to_rfc3339;
use eco_core::chat::{ChatMessage, ChatPreview};
use eco_core::eco::{ActivityEntry, ProgressUpdate, next_badge, points_to_next_level};
use eco_core::model::{Event, SwapItem, UserProfile};
use eco_core::{Badge, EcoProgress};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct ProgressView {
    pub points: i64,
    pub badges: Vec<&'static str>,
    pub points_to_next_level: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_badge: Option<NextBadgeView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unlocked: Vec<&'static str>,
}

#[derive(Clone, Debug, Serialize)]
pub struct NextBadgeView {
    pub name: &'static str,
    pub remaining: i64,
}

impl From<&EcoProgress> for ProgressView {
    fn from(progress: &EcoProgress) -> Self {
        let total = progress.total();
        Self {
            points: total,
            badges: progress.badges().iter().map(|b| b.name()).collect(),
            points_to_next_level: points_to_next_level(total),
            next_badge: next_badge(total).map(|(badge, remaining)| NextBadgeView {
                name: badge.name(),
                remaining,
            }),
            unlocked: Vec::new(),
        }
    }
}

impl From<&ProgressUpdate> for ProgressView {
    fn from(update: &ProgressUpdate) -> Self {
        let mut view = Self::from(&update.progress);
        view.unlocked = update.unlocked.iter().copied().map(Badge::name).collect();
        view
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ActivityView {
    pub label: String,
    pub points: i64,
    pub at: String,
}

impl From<&ActivityEntry> for ActivityView {
    fn from(entry: &ActivityEntry) -> Self {
        Self {
            label: entry.label.clone(),
            points: entry.points,
            at: ts_ms_to_rfc3339(entry.timestamp_ms),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub id: String,
    pub sender_id: String,
    pub profile_name: String,
    pub text: String,
    pub at: String,
}

impl From<&ChatMessage> for MessageView {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id.clone(),
            sender_id: message.sender_id.clone(),
            profile_name: message.profile_name.clone(),
            text: message.text.clone(),
            at: ts_ms_to_rfc3339(message.timestamp_ms),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewView {
    pub chat_id: String,
    pub name: String,
    pub last_message: String,
    pub at: String,
    pub unread_count: u32,
    pub profile_pic_url: String,
}

impl From<&ChatPreview> for PreviewView {
    fn from(preview: &ChatPreview) -> Self {
        Self {
            chat_id: preview.chat_id.clone(),
            name: preview.name.clone(),
            last_message: preview.last_message.clone(),
            at: ts_ms_to_rfc3339(preview.timestamp_ms),
            unread_count: preview.unread_count,
            profile_pic_url: preview.profile_pic_url.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapItemView {
    pub id: String,
    pub name: String,
    pub size: String,
    pub color: String,
    pub image_url: String,
    pub extra_images: Vec<String>,
    pub uploader: String,
    pub uploader_name: String,
    pub status: &'static str,
}

impl From<&SwapItem> for SwapItemView {
    fn from(item: &SwapItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            size: item.size.clone(),
            color: item.color.clone(),
            image_url: item.image_url.clone(),
            extra_images: item.extra_images.clone(),
            uploader: item.uploader.clone(),
            uploader_name: item.uploader_name.clone(),
            status: item.status.as_str(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub image_url: String,
    pub interested: i64,
}

impl From<&Event> for EventView {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            title: event.title.clone(),
            description: event.description.clone(),
            date: event.date.clone(),
            image_url: event.image_url.clone(),
            interested: event.interested,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub name: String,
    pub bio: String,
    pub role: String,
    pub image_url: String,
}

impl From<&UserProfile> for ProfileView {
    fn from(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            bio: profile.bio.clone(),
            role: profile.role.clone(),
            image_url: profile.image_url.clone(),
        }
    }
}
