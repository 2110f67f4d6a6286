#![forbid(unsafe_code)]

use crate::collections::{self, CHATS, MESSAGES, USERS, object};
use crate::error::AppError;
use crate::time::now_ms_i64;
use eco_core::chat::{
    ChatMessage, ChatPreview, DEFAULT_PEER_NAME, DEFAULT_SENDER_NAME, sort_previews,
    validate_message_text,
};
use eco_core::ports::CurrentUserProvider;
use eco_core::{ConversationKey, CoreError, UserId, conversation_key_between};
use eco_storage::{DocPath, Direction, DocumentStore, StoredDoc, Subscription, str_field};
use serde_json::json;
use tracing::{debug, info};

/// Two-party conversations stored at `chats/<key>/messages`.
pub struct Chat<'a, S, U> {
    store: &'a mut S,
    users: &'a U,
}

impl<'a, S: DocumentStore, U: CurrentUserProvider> Chat<'a, S, U> {
    pub fn new(store: &'a mut S, users: &'a U) -> Self {
        Self { store, users }
    }

    /// Derives the key shared with `peer` and makes sure the chat document exists.
    pub fn open_with(&mut self, peer: &str) -> Result<ConversationKey, AppError> {
        let uid = self.users.current_user().ok_or(AppError::NotSignedIn)?;
        let peer = UserId::try_new(peer)?;
        let key = conversation_key_between(&uid, &peer)?;
        self.ensure_chat(&key)?;
        Ok(key)
    }

    pub fn send(&mut self, key: &ConversationKey, text: &str) -> Result<ChatMessage, AppError> {
        let uid = self.users.current_user().ok_or(AppError::NotSignedIn)?;
        if key.is_self_conversation() {
            return Err(CoreError::InvalidArgument("cannot message yourself").into());
        }
        if !key.involves(uid.as_str()) {
            return Err(CoreError::InvalidArgument("you are not part of this conversation").into());
        }
        let text = validate_message_text(text)?;
        let profile_name = self
            .profile_name(&uid)?
            .unwrap_or_else(|| DEFAULT_SENDER_NAME.to_string());
        let timestamp_ms = now_ms_i64();

        let chat = self.ensure_chat(key)?;
        let added = self.store.add(
            &chat.child(MESSAGES)?,
            object(json!({
                "senderId": uid.as_str(),
                "profileName": profile_name,
                "text": text,
                "timestamp": timestamp_ms,
            })),
        )?;
        self.store.merge(
            &chat,
            object(json!({
                "lastMessage": text,
                "lastMessageTime": timestamp_ms,
            })),
        )?;
        debug!(chat = %key, message = added.id(), "message sent");

        Ok(ChatMessage {
            id: added.id().to_string(),
            sender_id: uid.into_string(),
            profile_name,
            text: text.to_string(),
            timestamp_ms,
        })
    }

    /// Messages of a conversation, oldest first.
    pub fn messages(&self, key: &ConversationKey) -> Result<Vec<ChatMessage>, AppError> {
        let messages = chat_doc(key)?.child(MESSAGES)?;
        Ok(self
            .store
            .list_ordered(&messages, "timestamp", Direction::Ascending, 0)?
            .iter()
            .map(message_from_doc)
            .collect())
    }

    pub fn subscribe(&mut self, key: &ConversationKey) -> Result<Subscription, AppError> {
        let messages = chat_doc(key)?.child(MESSAGES)?;
        Ok(self.store.subscribe(&messages)?)
    }

    /// Conversations of the signed-in user with their latest message, newest first.
    pub fn previews(&self) -> Result<Vec<ChatPreview>, AppError> {
        let uid = self.users.current_user().ok_or(AppError::NotSignedIn)?;
        let mut previews = Vec::new();

        for chat in self.store.list(&collections::root(CHATS)?)? {
            let Ok(key) = ConversationKey::parse(&chat.id) else {
                debug!(chat = %chat.id, "skipping chat with malformed key");
                continue;
            };
            let Some(peer) = key.other_participant(uid.as_str()) else {
                continue;
            };

            let latest = self
                .store
                .list_ordered(
                    &chat_doc(&key)?.child(MESSAGES)?,
                    "timestamp",
                    Direction::Descending,
                    1,
                )?
                .into_iter()
                .next();
            let (last_message, timestamp_ms) = latest
                .map(|doc| (doc.str_field("text"), doc.i64_field("timestamp")))
                .unwrap_or_default();

            let peer_doc = self.store.get(&user_doc(peer)?)?;
            let name = peer_doc
                .as_ref()
                .map(|doc| str_field(doc, "name"))
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_PEER_NAME.to_string());
            let profile_pic_url = peer_doc
                .as_ref()
                .map(|doc| str_field(doc, "imageUrl"))
                .unwrap_or_default();

            previews.push(ChatPreview {
                chat_id: key.into_string(),
                name,
                last_message,
                timestamp_ms,
                unread_count: 0,
                profile_pic_url,
            });
        }

        sort_previews(&mut previews);
        Ok(previews)
    }

    /// Display name of any user, falling back to a generic label.
    pub fn user_name(&self, uid: &str) -> Result<String, AppError> {
        let uid = UserId::try_new(uid)?;
        Ok(self
            .profile_name(&uid)?
            .unwrap_or_else(|| DEFAULT_PEER_NAME.to_string()))
    }

    fn profile_name(&self, uid: &UserId) -> Result<Option<String>, AppError> {
        Ok(self
            .store
            .get(&user_doc(uid.as_str())?)?
            .map(|doc| str_field(&doc, "name"))
            .filter(|name| !name.is_empty()))
    }

    fn ensure_chat(&mut self, key: &ConversationKey) -> Result<DocPath, AppError> {
        let chat = chat_doc(key)?;
        if !self.store.exists(&chat)? {
            let (first, second) = key.participants();
            self.store.set(
                &chat,
                object(json!({
                    "created": now_ms_i64(),
                    "participants": [first, second],
                })),
            )?;
            info!(chat = %key, "conversation created");
        }
        Ok(chat)
    }
}

fn chat_doc(key: &ConversationKey) -> Result<DocPath, AppError> {
    Ok(collections::root(CHATS)?.doc(key.as_str())?)
}

fn user_doc(uid: &str) -> Result<DocPath, AppError> {
    Ok(collections::root(USERS)?.doc(uid)?)
}

fn message_from_doc(doc: &StoredDoc) -> ChatMessage {
    ChatMessage {
        id: doc.id.clone(),
        sender_id: doc.str_field("senderId"),
        profile_name: doc.str_field("profileName"),
        text: doc.str_field("text"),
        timestamp_ms: doc.i64_field("timestamp"),
    }
}
