#![forbid(unsafe_code)]

use eco_app::{AppError, Chat, EcoTracker, Events, Profile, Swap};
use eco_core::ports::{FixedUser, ImageHost, ImageHostError};
use eco_core::{Badge, CoreError, UserId, compute_conversation_key};
use eco_storage::{
    CollectionPath, DocPath, Document, DocumentStore, SqliteStore, StoreError, StoredDoc,
    Subscription,
};
use serde_json::json;
use std::cell::Cell;

fn user(raw: &str) -> FixedUser {
    FixedUser::signed_in(UserId::try_new(raw).expect("user id"))
}

/// Hands out sequential URLs and refuses blobs starting with `!`.
#[derive(Default)]
struct FakeHost {
    uploads: Cell<usize>,
}

impl ImageHost for FakeHost {
    fn upload(&self, blob: &[u8]) -> Result<String, ImageHostError> {
        if blob.first() == Some(&b'!') {
            return Err(ImageHostError::Rejected("refused"));
        }
        let n = self.uploads.get() + 1;
        self.uploads.set(n);
        Ok(format!("https://img.test/{n}"))
    }
}

/// Delegates to SQLite but refuses every `add`.
struct AddFails(SqliteStore);

impl DocumentStore for AddFails {
    fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError> {
        self.0.get(path)
    }
    fn set(&mut self, path: &DocPath, doc: Document) -> Result<(), StoreError> {
        self.0.set(path, doc)
    }
    fn merge(&mut self, path: &DocPath, fields: Document) -> Result<(), StoreError> {
        self.0.merge(path, fields)
    }
    fn increment(&mut self, path: &DocPath, field: &str, by: i64) -> Result<i64, StoreError> {
        self.0.increment(path, field, by)
    }
    fn delete(&mut self, path: &DocPath) -> Result<bool, StoreError> {
        self.0.delete(path)
    }
    fn add(&mut self, _: &CollectionPath, _: Document) -> Result<DocPath, StoreError> {
        Err(StoreError::InvalidInput("add refused"))
    }
    fn list(&self, collection: &CollectionPath) -> Result<Vec<StoredDoc>, StoreError> {
        self.0.list(collection)
    }
    fn subscribe(&mut self, collection: &CollectionPath) -> Result<Subscription, StoreError> {
        self.0.subscribe(collection)
    }
}

#[test]
fn eco_tracker_accumulates_points_and_badges() {
    let mut store = SqliteStore::open_in_memory().expect("open store");
    let alice = user("alice");

    let mut tracker = EcoTracker::new(&mut store, &alice);
    assert_eq!(tracker.load().expect("load").total(), 0);

    let first = tracker.log_activity("Recycled bottles", 20).expect("log");
    assert_eq!(first.progress.total(), 20);
    assert!(first.unlocked.is_empty());

    let second = tracker.log_activity("Thrift haul", 50).expect("log");
    assert_eq!(second.progress.total(), 70);
    assert_eq!(second.unlocked, vec![Badge::EcoRookie]);

    let reloaded = tracker.load().expect("load");
    assert_eq!(reloaded.total(), 70);
    assert!(reloaded.badges().contains(&Badge::EcoRookie));

    let history = tracker.history().expect("history");
    let labels = history.iter().map(|e| e.label.as_str()).collect::<Vec<_>>();
    assert_eq!(labels, vec!["Recycled bottles", "Thrift haul"]);

    let stored = store
        .get(&DocPath::parse("ecoTracker/alice").expect("path"))
        .expect("get")
        .expect("tracker doc");
    assert_eq!(stored.get("points"), Some(&json!(70)));
    assert_eq!(stored.get("lastActivity"), Some(&json!("Thrift haul")));
}

#[test]
fn eco_tracker_rejects_bad_input_and_keeps_total() {
    let mut store = SqliteStore::open_in_memory().expect("open store");
    let alice = user("alice");
    let mut tracker = EcoTracker::new(&mut store, &alice);
    tracker.log_activity("Bike commute", 30).expect("log");

    assert!(matches!(
        tracker.log_activity("Bike commute", -5),
        Err(AppError::Core(CoreError::InvalidArgument(_)))
    ));
    assert!(matches!(
        tracker.log_activity("  ", 5),
        Err(AppError::Core(CoreError::InvalidArgument(_)))
    ));
    assert_eq!(tracker.load().expect("load").total(), 30);
}

#[test]
fn eco_tracker_reports_overflow_without_writing() {
    let mut store = SqliteStore::open_in_memory().expect("open store");
    store
        .set(
            &DocPath::parse("ecoTracker/alice").expect("path"),
            json!({"points": i64::MAX}).as_object().cloned().expect("object"),
        )
        .expect("seed");
    let alice = user("alice");
    let mut tracker = EcoTracker::new(&mut store, &alice);
    assert!(matches!(
        tracker.log_activity("One more", 1),
        Err(AppError::Core(CoreError::Overflow))
    ));
    assert_eq!(tracker.load().expect("load").total(), i64::MAX);
    assert!(tracker.history().expect("history").is_empty());
}

#[test]
fn eco_tracker_total_stays_put_when_the_log_append_fails() {
    let mut store = AddFails(SqliteStore::open_in_memory().expect("open store"));
    store
        .set(
            &DocPath::parse("ecoTracker/alice").expect("path"),
            json!({"points": 40}).as_object().cloned().expect("object"),
        )
        .expect("seed");
    let alice = user("alice");
    let mut tracker = EcoTracker::new(&mut store, &alice);
    assert!(matches!(
        tracker.log_activity("Thrift haul", 20),
        Err(AppError::Store(StoreError::InvalidInput(_)))
    ));
    assert_eq!(tracker.load().expect("load").total(), 40);
}

#[test]
fn services_require_a_signed_in_user() {
    let mut store = SqliteStore::open_in_memory().expect("open store");
    let nobody = FixedUser::signed_out();
    assert!(matches!(
        EcoTracker::new(&mut store, &nobody).load(),
        Err(AppError::NotSignedIn)
    ));
    assert!(matches!(
        Chat::new(&mut store, &nobody).open_with("bob"),
        Err(AppError::NotSignedIn)
    ));
}

#[test]
fn both_participants_land_in_the_same_conversation() {
    let mut store = SqliteStore::open_in_memory().expect("open store");
    let alice = user("alice");
    let bob = user("bob");
    store
        .set(
            &DocPath::parse("users/alice").expect("path"),
            json!({"name": "Alice", "imageUrl": "https://img/alice"})
                .as_object()
                .cloned()
                .expect("object"),
        )
        .expect("seed profile");

    let key = Chat::new(&mut store, &alice).open_with("bob").expect("open");
    assert_eq!(key.as_str(), "alice_bob");
    let same = Chat::new(&mut store, &bob).open_with("alice").expect("open");
    assert_eq!(key, same);

    let sent = Chat::new(&mut store, &alice)
        .send(&key, "Is the coat still available?")
        .expect("send");
    assert_eq!(sent.profile_name, "Alice");
    let reply = Chat::new(&mut store, &bob)
        .send(&key, " Yes! ")
        .expect("send");
    assert_eq!(reply.profile_name, "You");
    assert_eq!(reply.text, "Yes!");

    let messages = Chat::new(&mut store, &bob).messages(&key).expect("messages");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].sender_id, "alice");
    assert_eq!(messages[1].sender_id, "bob");

    let chat = store
        .get(&DocPath::parse("chats/alice_bob").expect("path"))
        .expect("get")
        .expect("chat doc");
    assert_eq!(chat.get("lastMessage"), Some(&json!("Yes!")));

    let previews = Chat::new(&mut store, &bob).previews().expect("previews");
    assert_eq!(previews.len(), 1);
    assert_eq!(previews[0].chat_id, "alice_bob");
    assert_eq!(previews[0].name, "Alice");
    assert_eq!(previews[0].last_message, "Yes!");
    assert_eq!(previews[0].profile_pic_url, "https://img/alice");

    let alice_view = Chat::new(&mut store, &alice).previews().expect("previews");
    assert_eq!(alice_view[0].name, "User");
}

#[test]
fn chat_rejects_self_conversations_outsiders_and_blank_messages() {
    let mut store = SqliteStore::open_in_memory().expect("open store");
    let alice = user("alice");
    let carol = user("carol");

    assert!(matches!(
        Chat::new(&mut store, &alice).open_with("alice"),
        Err(AppError::Core(CoreError::InvalidArgument(_)))
    ));
    assert!(matches!(
        Chat::new(&mut store, &alice).open_with(""),
        Err(AppError::Core(CoreError::InvalidArgument(_)))
    ));

    let key = Chat::new(&mut store, &alice).open_with("bob").expect("open");
    assert!(matches!(
        Chat::new(&mut store, &alice).send(&key, "   "),
        Err(AppError::Core(CoreError::InvalidArgument(_)))
    ));
    assert!(matches!(
        Chat::new(&mut store, &carol).send(&key, "hi"),
        Err(AppError::Core(CoreError::InvalidArgument(_)))
    ));
    assert!(Chat::new(&mut store, &carol).previews().expect("previews").is_empty());

    let own = compute_conversation_key("alice", "alice").expect("degenerate key");
    assert!(matches!(
        Chat::new(&mut store, &alice).send(&own, "hi me"),
        Err(AppError::Core(CoreError::InvalidArgument(_)))
    ));
    assert!(
        !store
            .exists(&DocPath::parse("chats/alice_alice").expect("path"))
            .expect("exists")
    );
}

#[test]
fn chat_user_name_falls_back_to_generic_label() {
    let mut store = SqliteStore::open_in_memory().expect("open store");
    store
        .set(
            &DocPath::parse("users/alice").expect("path"),
            json!({"name": "Alice"}).as_object().cloned().expect("object"),
        )
        .expect("seed profile");
    let bob = user("bob");
    let chat = Chat::new(&mut store, &bob);
    assert_eq!(chat.user_name("alice").expect("name"), "Alice");
    assert_eq!(chat.user_name("dave").expect("name"), "User");
}

#[test]
fn chat_subscribers_see_new_messages() {
    let mut store = SqliteStore::open_in_memory().expect("open store");
    let alice = user("alice");
    let mut chat = Chat::new(&mut store, &alice);
    let key = chat.open_with("bob").expect("open");
    let sub = chat.subscribe(&key).expect("subscribe");

    chat.send(&key, "hello").expect("send");
    let event = sub.try_next().expect("message event");
    assert_eq!(event.path.collection().as_str(), "chats/alice_bob/messages");
    assert!(sub.try_next().is_none());
}

#[test]
fn swap_listing_lifecycle() {
    let mut store = SqliteStore::open_in_memory().expect("open store");
    let alice = user("alice");
    let bob = user("bob");
    let host = FakeHost::default();

    let coat = Swap::new(&mut store, &alice)
        .upload(
            "Wool coat",
            "M",
            "Red",
            &[b"!broken".to_vec(), b"front".to_vec(), b"back".to_vec()],
            &host,
        )
        .expect("upload");
    assert_eq!(coat.image_url, "https://img.test/1");
    assert_eq!(coat.extra_images, vec!["https://img.test/2".to_string()]);
    assert_eq!(coat.uploader, "alice");

    Swap::new(&mut store, &bob)
        .upload("Scarf", "S", "Blue", &[b"scarf".to_vec()], &host)
        .expect("upload");

    let swap = Swap::new(&mut store, &alice);
    assert_eq!(swap.list(false).expect("list").len(), 2);
    let mine = swap.list(true).expect("list");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].name, "Wool coat");
    assert_eq!(swap.list_filtered("red", "All").expect("filter").len(), 1);
    assert_eq!(swap.list_filtered("All", "xl").expect("filter").len(), 0);
    assert!(swap.is_current_user("alice"));
    assert!(!swap.is_current_user("bob"));

    assert!(matches!(
        Swap::new(&mut store, &bob).mark_swapped(&coat.id),
        Err(AppError::NotOwner)
    ));

    let edited = Swap::new(&mut store, &alice)
        .edit(&coat.id, "Wool coat", "L", "Red", &[b"new".to_vec()], &host)
        .expect("edit");
    assert_eq!(edited.size, "L");
    assert!(edited.extra_images.is_empty());

    Swap::new(&mut store, &alice)
        .mark_swapped(&coat.id)
        .expect("mark swapped");
    let remaining = Swap::new(&mut store, &alice).list(false).expect("list");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "Scarf");

    assert!(Swap::new(&mut store, &alice).delete(&coat.id).expect("delete"));
    assert!(matches!(
        Swap::new(&mut store, &alice).delete(&coat.id),
        Err(AppError::UnknownId(_))
    ));
}

#[test]
fn swap_upload_needs_at_least_one_hosted_image() {
    let mut store = SqliteStore::open_in_memory().expect("open store");
    let alice = user("alice");
    let host = FakeHost::default();
    let mut swap = Swap::new(&mut store, &alice);

    assert!(matches!(
        swap.upload("Coat", "M", "Red", &[], &host),
        Err(AppError::Core(CoreError::InvalidArgument(_)))
    ));
    assert!(matches!(
        swap.upload("Coat", "M", "Red", &[b"!nope".to_vec()], &host),
        Err(AppError::ImageUploadFailed)
    ));
    assert!(swap.list(false).expect("list").is_empty());
}

#[test]
fn events_are_ordered_and_count_interest() {
    let mut store = SqliteStore::open_in_memory().expect("open store");
    let alice = user("alice");
    let mut events = Events::new(&mut store, &alice);
    let sub = events.subscribe().expect("subscribe");

    let later = events
        .upload("Repair cafe", "Fix your jeans", "2026-12-01", "")
        .expect("upload");
    events
        .upload("Swap day", "Bring three items", "2026-11-05", "")
        .expect("upload");

    let listed = events.list().expect("list");
    let titles = listed.iter().map(|e| e.title.as_str()).collect::<Vec<_>>();
    assert_eq!(titles, vec!["Swap day", "Repair cafe"]);

    assert_eq!(
        events
            .register_interest(&later.id, "Alice", "alice@example.com")
            .expect("register"),
        1
    );
    assert_eq!(
        events
            .register_interest(&later.id, "Alice", "alice@example.com")
            .expect("register"),
        2
    );
    assert!(matches!(
        events.register_interest("missing", "Alice", "alice@example.com"),
        Err(AppError::UnknownId(_))
    ));
    assert!(matches!(
        events.upload(" ", "", "", ""),
        Err(AppError::Core(CoreError::InvalidArgument(_)))
    ));

    let repair = events
        .list()
        .expect("list")
        .into_iter()
        .find(|e| e.id == later.id)
        .expect("event");
    assert_eq!(repair.interested, 2);
    assert!(sub.drain().len() >= 4);
}

#[test]
fn profile_update_keeps_image_unless_replaced() {
    let mut store = SqliteStore::open_in_memory().expect("open store");
    let alice = user("alice");
    let host = FakeHost::default();
    let mut profile = Profile::new(&mut store, &alice);

    assert_eq!(profile.load().expect("load").name, "");

    let first = profile
        .update("Alice", "Thrifter", "Member", Some(b"face".as_slice()), &host)
        .expect("update");
    assert_eq!(first.image_url, "https://img.test/1");

    let second = profile
        .update("Alice B", "Thrifter", "Admin", None, &host)
        .expect("update");
    assert_eq!(second.image_url, "https://img.test/1");
    assert_eq!(profile.load().expect("load"), second);

    assert!(matches!(
        profile.update("Alice", "", "", Some(b"!bad".as_slice()), &host),
        Err(AppError::ImageUploadFailed)
    ));
}
