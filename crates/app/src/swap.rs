#![forbid(unsafe_code)]

use crate::collections::{self, SWAP_ITEMS, USERS, object};
use crate::error::AppError;
use eco_core::CoreError;
use eco_core::model::{SwapDraft, SwapFilter, SwapItem, SwapStatus, split_image_urls};
use eco_core::ports::{CurrentUserProvider, ImageHost};
use eco_storage::{DocPath, DocumentStore, StoredDoc, str_field};
use serde_json::json;
use tracing::{info, warn};

/// Clothing listings stored in `swapItems`.
pub struct Swap<'a, S, U> {
    store: &'a mut S,
    users: &'a U,
}

impl<'a, S: DocumentStore, U: CurrentUserProvider> Swap<'a, S, U> {
    pub fn new(store: &'a mut S, users: &'a U) -> Self {
        Self { store, users }
    }

    /// Items still available, optionally only those the signed-in user uploaded.
    pub fn list(&self, only_mine: bool) -> Result<Vec<SwapItem>, AppError> {
        let uid = self.users.current_user().ok_or(AppError::NotSignedIn)?;
        Ok(self
            .available()?
            .into_iter()
            .filter(|item| !only_mine || item.uploader == uid.as_str())
            .collect())
    }

    pub fn list_filtered(&self, color: &str, size: &str) -> Result<Vec<SwapItem>, AppError> {
        self.users.current_user().ok_or(AppError::NotSignedIn)?;
        let filter = SwapFilter::from_choices(color, size);
        Ok(self
            .available()?
            .into_iter()
            .filter(|item| filter.matches(item))
            .collect())
    }

    pub fn get(&self, item_id: &str) -> Result<Option<SwapItem>, AppError> {
        let path = item_doc(item_id)?;
        Ok(self.store.get(&path)?.map(|data| {
            item_from_doc(&StoredDoc {
                id: item_id.to_string(),
                data,
            })
        }))
    }

    /// Uploads the images and lists a new item. The first hosted image becomes
    /// the cover; images the host fails to take are skipped.
    pub fn upload(
        &mut self,
        name: &str,
        size: &str,
        color: &str,
        images: &[Vec<u8>],
        host: &dyn ImageHost,
    ) -> Result<SwapItem, AppError> {
        let uid = self.users.current_user().ok_or(AppError::NotSignedIn)?;
        let draft = SwapDraft::try_new(name, size, color)?;
        let (image_url, extra_images) = host_images(images, host)?;
        let uploader_name = self
            .store
            .get(&collections::root(USERS)?.doc(uid.as_str())?)?
            .map(|doc| str_field(&doc, "name"))
            .unwrap_or_default();

        let status = SwapStatus::Available;
        let path = self.store.add(
            &collections::root(SWAP_ITEMS)?,
            object(json!({
                "name": draft.name,
                "size": draft.size,
                "color": draft.color,
                "imageUrl": image_url,
                "extraImages": extra_images,
                "uploader": uid.as_str(),
                "uploaderName": uploader_name,
                "status": status.as_str(),
            })),
        )?;
        info!(item = path.id(), user = %uid, "swap item listed");

        Ok(SwapItem {
            id: path.id().to_string(),
            image_url,
            extra_images,
            name: draft.name,
            size: draft.size,
            color: draft.color,
            uploader: uid.into_string(),
            uploader_name,
            status,
        })
    }

    /// Replaces the details and images of an item owned by the signed-in user.
    pub fn edit(
        &mut self,
        item_id: &str,
        name: &str,
        size: &str,
        color: &str,
        images: &[Vec<u8>],
        host: &dyn ImageHost,
    ) -> Result<SwapItem, AppError> {
        let path = self.owned_item(item_id)?;
        let draft = SwapDraft::try_new(name, size, color)?;
        let (image_url, extra_images) = host_images(images, host)?;
        self.store.merge(
            &path,
            object(json!({
                "name": draft.name,
                "size": draft.size,
                "color": draft.color,
                "imageUrl": image_url,
                "extraImages": extra_images,
            })),
        )?;
        info!(item = item_id, "swap item updated");
        self.get(item_id)?
            .ok_or_else(|| AppError::UnknownId(item_id.to_string()))
    }

    pub fn delete(&mut self, item_id: &str) -> Result<bool, AppError> {
        let path = self.owned_item(item_id)?;
        let deleted = self.store.delete(&path)?;
        info!(item = item_id, "swap item deleted");
        Ok(deleted)
    }

    pub fn mark_swapped(&mut self, item_id: &str) -> Result<(), AppError> {
        let path = self.owned_item(item_id)?;
        self.store.merge(
            &path,
            object(json!({ "status": SwapStatus::Swapped.as_str() })),
        )?;
        info!(item = item_id, "swap item marked as swapped");
        Ok(())
    }

    pub fn is_current_user(&self, uid: &str) -> bool {
        self.users
            .current_user()
            .is_some_and(|current| current.as_str() == uid.trim())
    }

    fn available(&self) -> Result<Vec<SwapItem>, AppError> {
        let items = self.store.list_where(
            &collections::root(SWAP_ITEMS)?,
            "status",
            &json!(SwapStatus::Available.as_str()),
        )?;
        Ok(items.iter().map(item_from_doc).collect())
    }

    fn owned_item(&self, item_id: &str) -> Result<DocPath, AppError> {
        let uid = self.users.current_user().ok_or(AppError::NotSignedIn)?;
        let path = item_doc(item_id)?;
        let doc = self
            .store
            .get(&path)?
            .ok_or_else(|| AppError::UnknownId(item_id.to_string()))?;
        if str_field(&doc, "uploader") != uid.as_str() {
            return Err(AppError::NotOwner);
        }
        Ok(path)
    }
}

fn item_doc(item_id: &str) -> Result<DocPath, AppError> {
    Ok(collections::root(SWAP_ITEMS)?.doc(item_id.trim())?)
}

fn host_images(
    images: &[Vec<u8>],
    host: &dyn ImageHost,
) -> Result<(String, Vec<String>), AppError> {
    if images.is_empty() {
        return Err(CoreError::InvalidArgument("select at least one image").into());
    }
    let mut urls = Vec::with_capacity(images.len());
    for (index, blob) in images.iter().enumerate() {
        match host.upload(blob) {
            Ok(url) => urls.push(url),
            Err(err) => warn!(index, error = %err, "image upload failed, skipping"),
        }
    }
    split_image_urls(urls).ok_or(AppError::ImageUploadFailed)
}

fn item_from_doc(doc: &StoredDoc) -> SwapItem {
    SwapItem {
        id: doc.id.clone(),
        image_url: doc.str_field("imageUrl"),
        extra_images: doc.str_list_field("extraImages"),
        name: doc.str_field("name"),
        size: doc.str_field("size"),
        color: doc.str_field("color"),
        uploader: doc.str_field("uploader"),
        uploader_name: doc.str_field("uploaderName"),
        status: SwapStatus::parse(&doc.str_field("status")),
    }
}
