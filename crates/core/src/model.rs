#![forbid(unsafe_code)]

use crate::error::CoreError;

/// Filter value meaning "do not filter on this field".
pub const FILTER_ALL: &str = "All";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SwapStatus {
    #[default]
    Available,
    Swapped,
}

impl SwapStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SwapStatus::Available => "Available",
            SwapStatus::Swapped => "Swapped",
        }
    }

    /// Unknown or missing values read back as `Available`.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "Swapped" => SwapStatus::Swapped,
            _ => SwapStatus::Available,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SwapItem {
    pub id: String,
    pub image_url: String,
    pub extra_images: Vec<String>,
    pub name: String,
    pub size: String,
    pub color: String,
    pub uploader: String,
    pub uploader_name: String,
    pub status: SwapStatus,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapDraft {
    pub name: String,
    pub size: String,
    pub color: String,
}

impl SwapDraft {
    pub fn try_new(name: &str, size: &str, color: &str) -> Result<Self, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::InvalidArgument("item name must not be empty"));
        }
        Ok(Self {
            name: name.to_string(),
            size: size.trim().to_string(),
            color: color.trim().to_string(),
        })
    }
}

/// Splits uploaded image URLs into the cover image and the extras.
pub fn split_image_urls(urls: Vec<String>) -> Option<(String, Vec<String>)> {
    let mut urls = urls.into_iter().filter(|url| !url.trim().is_empty());
    let cover = urls.next()?;
    Some((cover, urls.collect()))
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SwapFilter {
    color: Option<String>,
    size: Option<String>,
}

impl SwapFilter {
    /// Builds a filter from picker values where [`FILTER_ALL`] disables a field.
    pub fn from_choices(color: &str, size: &str) -> Self {
        let choice = |value: &str| {
            let value = value.trim();
            if value.is_empty() || value == FILTER_ALL {
                None
            } else {
                Some(value.to_lowercase())
            }
        };
        Self {
            color: choice(color),
            size: choice(size),
        }
    }

    pub fn matches(&self, item: &SwapItem) -> bool {
        let field_matches = |wanted: &Option<String>, actual: &str| match wanted {
            Some(wanted) => actual.trim().to_lowercase() == *wanted,
            None => true,
        };
        field_matches(&self.color, &item.color) && field_matches(&self.size, &item.size)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub image_url: String,
    pub interested: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventInterest {
    pub uid: String,
    pub name: String,
    pub email: String,
}

impl EventInterest {
    pub fn try_new(uid: &str, name: &str, email: &str) -> Result<Self, CoreError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(CoreError::InvalidArgument("name must not be empty"));
        }
        if email.is_empty() {
            return Err(CoreError::InvalidArgument("email must not be empty"));
        }
        Ok(Self {
            uid: uid.to_string(),
            name: name.to_string(),
            email: email.to_string(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct UserProfile {
    pub name: String,
    pub bio: String,
    pub role: String,
    pub image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(color: &str, size: &str) -> SwapItem {
        SwapItem {
            color: color.to_string(),
            size: size.to_string(),
            ..SwapItem::default()
        }
    }

    #[test]
    fn swap_filter_all_matches_everything() {
        let filter = SwapFilter::from_choices(FILTER_ALL, FILTER_ALL);
        assert!(filter.matches(&item("Red", "M")));
        assert!(filter.matches(&item("", "")));
    }

    #[test]
    fn swap_filter_is_case_insensitive() {
        let filter = SwapFilter::from_choices("red", "All");
        assert!(filter.matches(&item("Red", "XL")));
        assert!(!filter.matches(&item("Blue", "XL")));

        let filter = SwapFilter::from_choices("All", "m");
        assert!(filter.matches(&item("Blue", "M")));
        assert!(!filter.matches(&item("Blue", "S")));
    }

    #[test]
    fn swap_status_defaults_to_available() {
        assert_eq!(SwapStatus::parse("Swapped"), SwapStatus::Swapped);
        assert_eq!(SwapStatus::parse("gone"), SwapStatus::Available);
        assert_eq!(SwapStatus::default().as_str(), "Available");
    }

    #[test]
    fn image_urls_split_into_cover_and_extras() {
        let (cover, extras) = split_image_urls(vec![
            " ".to_string(),
            "https://img/1".to_string(),
            "https://img/2".to_string(),
        ])
        .unwrap();
        assert_eq!(cover, "https://img/1");
        assert_eq!(extras, vec!["https://img/2".to_string()]);
        assert!(split_image_urls(vec![String::new()]).is_none());
    }

    #[test]
    fn drafts_and_interest_are_validated() {
        assert!(SwapDraft::try_new(" ", "M", "Red").is_err());
        assert_eq!(SwapDraft::try_new(" Jacket ", "M", "Red").unwrap().name, "Jacket");
        assert!(EventInterest::try_new("u1", "", "a@b.c").is_err());
        assert!(EventInterest::try_new("u1", "Ann", " ").is_err());
    }
}
