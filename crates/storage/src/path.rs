#![forbid(unsafe_code)]

use crate::StoreError;

/// A collection: `chats`, `chats/alice_bob/messages`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollectionPath(String);

/// A document inside a collection: `chats/alice_bob`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocPath {
    collection: CollectionPath,
    id: String,
}

impl CollectionPath {
    pub fn root(name: &str) -> Result<Self, StoreError> {
        validate_segment(name)?;
        Ok(Self(name.to_string()))
    }

    pub fn parse(value: &str) -> Result<Self, StoreError> {
        let segments = split_segments(value)?;
        if segments.len() % 2 == 0 {
            return Err(StoreError::InvalidInput(
                "collection path must have an odd number of segments",
            ));
        }
        Ok(Self(segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn doc(&self, id: &str) -> Result<DocPath, StoreError> {
        validate_segment(id)?;
        Ok(DocPath {
            collection: self.clone(),
            id: id.to_string(),
        })
    }
}

impl DocPath {
    pub fn parse(value: &str) -> Result<Self, StoreError> {
        let mut segments = split_segments(value)?;
        if segments.len() % 2 != 0 {
            return Err(StoreError::InvalidInput(
                "document path must have an even number of segments",
            ));
        }
        let id = segments.pop().unwrap_or_default().to_string();
        Ok(Self {
            collection: CollectionPath(segments.join("/")),
            id,
        })
    }

    pub fn collection(&self) -> &CollectionPath {
        &self.collection
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// A sub-collection nested under this document.
    pub fn child(&self, name: &str) -> Result<CollectionPath, StoreError> {
        validate_segment(name)?;
        Ok(CollectionPath(format!("{}/{name}", self)))
    }
}

impl std::fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for DocPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

fn split_segments(value: &str) -> Result<Vec<&str>, StoreError> {
    let value = value.trim().trim_matches('/');
    if value.is_empty() {
        return Err(StoreError::InvalidInput("path must not be empty"));
    }
    let segments = value.split('/').collect::<Vec<_>>();
    for segment in &segments {
        validate_segment(segment)?;
    }
    Ok(segments)
}

fn validate_segment(value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::InvalidInput("path segment must not be empty"));
    }
    if value.contains('/') {
        return Err(StoreError::InvalidInput("path segment must not contain '/'"));
    }
    if value.chars().any(|c| c.is_control()) {
        return Err(StoreError::InvalidInput(
            "path segment contains control characters",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_nest_and_render() {
        let chats = CollectionPath::root("chats").unwrap();
        let chat = chats.doc("alice_bob").unwrap();
        let messages = chat.child("messages").unwrap();
        assert_eq!(chat.to_string(), "chats/alice_bob");
        assert_eq!(messages.as_str(), "chats/alice_bob/messages");

        let parsed = DocPath::parse("chats/alice_bob/messages/m1").unwrap();
        assert_eq!(parsed.collection(), &messages);
        assert_eq!(parsed.id(), "m1");
    }

    #[test]
    fn malformed_paths_are_rejected() {
        assert!(CollectionPath::root("").is_err());
        assert!(CollectionPath::root("a/b").is_err());
        assert!(CollectionPath::parse("chats/alice_bob").is_err());
        assert!(DocPath::parse("chats").is_err());
        assert!(DocPath::parse("chats//x").is_err());
        assert!(CollectionPath::root("chats").unwrap().doc(" ").is_err());
    }
}
