#![forbid(unsafe_code)]

use crate::path::{CollectionPath, DocPath};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    Set,
    Merged,
    Deleted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: DocPath,
    pub kind: ChangeKind,
}

/// Receives change events for one collection until dropped.
#[derive(Debug)]
pub struct Subscription {
    collection: CollectionPath,
    rx: Receiver<ChangeEvent>,
}

impl Subscription {
    pub fn collection(&self) -> &CollectionPath {
        &self.collection
    }

    pub fn try_next(&self) -> Option<ChangeEvent> {
        self.rx.try_recv().ok()
    }

    pub fn next_timeout(&self, timeout: Duration) -> Option<ChangeEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Everything queued so far, oldest first.
    pub fn drain(&self) -> Vec<ChangeEvent> {
        self.rx.try_iter().collect()
    }
}

#[derive(Debug, Default)]
pub(crate) struct Watchers {
    entries: Vec<(CollectionPath, Sender<ChangeEvent>)>,
}

impl Watchers {
    pub(crate) fn subscribe(&mut self, collection: &CollectionPath) -> Subscription {
        let (tx, rx) = channel();
        self.entries.push((collection.clone(), tx));
        Subscription {
            collection: collection.clone(),
            rx,
        }
    }

    pub(crate) fn notify(&mut self, path: &DocPath, kind: ChangeKind) {
        // A failed send means the subscription was dropped.
        self.entries.retain(|(collection, tx)| {
            if collection != path.collection() {
                return true;
            }
            tx.send(ChangeEvent {
                path: path.clone(),
                kind,
            })
            .is_ok()
        });
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
