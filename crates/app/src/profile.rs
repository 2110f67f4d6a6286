#![forbid(unsafe_code)]

use crate::collections::{self, USERS, object};
use crate::error::AppError;
use eco_core::UserId;
use eco_core::model::UserProfile;
use eco_core::ports::{CurrentUserProvider, ImageHost};
use eco_storage::{DocPath, DocumentStore, str_field};
use serde_json::json;
use tracing::{info, warn};

/// The signed-in user's profile document at `users/<uid>`.
pub struct Profile<'a, S, U> {
    store: &'a mut S,
    users: &'a U,
}

impl<'a, S: DocumentStore, U: CurrentUserProvider> Profile<'a, S, U> {
    pub fn new(store: &'a mut S, users: &'a U) -> Self {
        Self { store, users }
    }

    pub fn load(&self) -> Result<UserProfile, AppError> {
        let uid = self.users.current_user().ok_or(AppError::NotSignedIn)?;
        Ok(self
            .store
            .get(&user_doc(&uid)?)?
            .map(|doc| UserProfile {
                name: str_field(&doc, "name"),
                bio: str_field(&doc, "bio"),
                role: str_field(&doc, "role"),
                image_url: str_field(&doc, "imageUrl"),
            })
            .unwrap_or_default())
    }

    /// Saves the profile. Without a new image the current image URL is kept.
    pub fn update(
        &mut self,
        name: &str,
        bio: &str,
        role: &str,
        new_image: Option<&[u8]>,
        host: &dyn ImageHost,
    ) -> Result<UserProfile, AppError> {
        let uid = self.users.current_user().ok_or(AppError::NotSignedIn)?;
        let image_url = match new_image {
            None => self.load()?.image_url,
            Some(blob) => match host.upload(blob) {
                Ok(url) if !url.trim().is_empty() => url,
                Ok(_) => return Err(AppError::ImageUploadFailed),
                Err(err) => {
                    warn!(user = %uid, error = %err, "profile image upload failed");
                    return Err(AppError::ImageUploadFailed);
                }
            },
        };

        let profile = UserProfile {
            name: name.trim().to_string(),
            bio: bio.trim().to_string(),
            role: role.trim().to_string(),
            image_url,
        };
        self.store.set(
            &user_doc(&uid)?,
            object(json!({
                "name": profile.name,
                "bio": profile.bio,
                "role": profile.role,
                "imageUrl": profile.image_url,
            })),
        )?;
        info!(user = %uid, "profile updated");
        Ok(profile)
    }
}

fn user_doc(uid: &UserId) -> Result<DocPath, AppError> {
    Ok(collections::root(USERS)?.doc(uid.as_str())?)
}
