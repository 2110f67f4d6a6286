#![forbid(unsafe_code)]

use eco_app::views::{
    ActivityView, EventView, MessageView, PreviewView, ProfileView, ProgressView, SwapItemView,
};
use eco_app::{AppConfig, AppError, Chat, DirImageHost, EcoTracker, Events, Profile, Swap};
use eco_core::ports::FixedUser;
use eco_core::{ConversationKey, UserId, compute_conversation_key};
use eco_storage::SqliteStore;
use serde::Serialize;
use serde_json::{Value, json};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter applied when `RUST_LOG` is unset: the configured level for the
/// workspace crates, `warn` for everything else.
fn log_directive(level: &str) -> String {
    format!("eco_app={level},eco_storage={level},ecoluxe={level},warn")
}

fn init_logging(cfg: &AppConfig) {
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_directive(&cfg.log_level))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|err| AppError::Config(err.to_string()))
}

fn arg<'a>(args: &'a [String], index: usize, what: &str) -> Result<&'a str, AppError> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| AppError::Config(format!("missing {what}\n\n{}", eco_app::config::usage())))
}

fn read_blob(path: &str) -> Result<Vec<u8>, AppError> {
    std::fs::read(path).map_err(|err| AppError::Config(format!("cannot read {path}: {err}")))
}

fn parse_key(raw: &str) -> Result<ConversationKey, AppError> {
    ConversationKey::parse(raw).map_err(|err| AppError::Core(err.into()))
}

fn signed_in(cfg: &AppConfig) -> Result<FixedUser, AppError> {
    match cfg.user.as_deref() {
        Some(raw) => Ok(FixedUser::signed_in(UserId::try_new(raw)?)),
        None => Ok(FixedUser::signed_out()),
    }
}

fn run(cfg: &AppConfig, cmd: &[String]) -> Result<Value, AppError> {
    let group = arg(cmd, 0, "COMMAND")?;

    if group == "chat-key" {
        let key = compute_conversation_key(arg(cmd, 1, "A")?, arg(cmd, 2, "B")?)?;
        return Ok(json!({ "key": key.as_str() }));
    }

    let mut store = SqliteStore::open(&cfg.storage_dir)?;
    let users = signed_in(cfg)?;
    let images = DirImageHost::new(cfg.images_dir());
    let action = arg(cmd, 1, "ACTION")?;

    match (group, action) {
        ("eco", "show") => {
            let progress = EcoTracker::new(&mut store, &users).load()?;
            to_json(&ProgressView::from(&progress))
        }
        ("eco", "log") => {
            let points = arg(cmd, 3, "POINTS")?
                .parse::<i64>()
                .map_err(|_| AppError::Config("POINTS must be an integer".into()))?;
            let update =
                EcoTracker::new(&mut store, &users).log_activity(arg(cmd, 2, "LABEL")?, points)?;
            to_json(&ProgressView::from(&update))
        }
        ("eco", "history") => {
            let entries = EcoTracker::new(&mut store, &users).history()?;
            to_json(&entries.iter().map(ActivityView::from).collect::<Vec<_>>())
        }
        ("chat", "open") => {
            let key = Chat::new(&mut store, &users).open_with(arg(cmd, 2, "PEER")?)?;
            Ok(json!({ "key": key.as_str() }))
        }
        ("chat", "send") => {
            let key = parse_key(arg(cmd, 2, "KEY")?)?;
            let message = Chat::new(&mut store, &users).send(&key, arg(cmd, 3, "TEXT")?)?;
            to_json(&MessageView::from(&message))
        }
        ("chat", "messages") => {
            let key = parse_key(arg(cmd, 2, "KEY")?)?;
            let messages = Chat::new(&mut store, &users).messages(&key)?;
            to_json(&messages.iter().map(MessageView::from).collect::<Vec<_>>())
        }
        ("chat", "list") => {
            let previews = Chat::new(&mut store, &users).previews()?;
            to_json(&previews.iter().map(PreviewView::from).collect::<Vec<_>>())
        }
        ("swap", "list") => {
            let only_mine = cmd.iter().skip(2).any(|a| a == "--mine");
            let items = Swap::new(&mut store, &users).list(only_mine)?;
            to_json(&items.iter().map(SwapItemView::from).collect::<Vec<_>>())
        }
        ("swap", "filter") => {
            let items = Swap::new(&mut store, &users)
                .list_filtered(arg(cmd, 2, "COLOR")?, arg(cmd, 3, "SIZE")?)?;
            to_json(&items.iter().map(SwapItemView::from).collect::<Vec<_>>())
        }
        ("swap", "add") => {
            let blobs = cmd
                .iter()
                .skip(5)
                .map(|path| read_blob(path))
                .collect::<Result<Vec<_>, _>>()?;
            let item = Swap::new(&mut store, &users).upload(
                arg(cmd, 2, "NAME")?,
                arg(cmd, 3, "SIZE")?,
                arg(cmd, 4, "COLOR")?,
                &blobs,
                &images,
            )?;
            to_json(&SwapItemView::from(&item))
        }
        ("swap", "swapped") => {
            let item_id = arg(cmd, 2, "ITEM")?;
            Swap::new(&mut store, &users).mark_swapped(item_id)?;
            Ok(json!({ "id": item_id, "status": "Swapped" }))
        }
        ("events", "list") => {
            let events = Events::new(&mut store, &users).list()?;
            to_json(&events.iter().map(EventView::from).collect::<Vec<_>>())
        }
        ("events", "add") => {
            let event = Events::new(&mut store, &users).upload(
                arg(cmd, 2, "TITLE")?,
                cmd.get(4).map(String::as_str).unwrap_or_default(),
                arg(cmd, 3, "DATE")?,
                cmd.get(5).map(String::as_str).unwrap_or_default(),
            )?;
            to_json(&EventView::from(&event))
        }
        ("events", "interest") => {
            let event_id = arg(cmd, 2, "EVENT")?;
            let count = Events::new(&mut store, &users).register_interest(
                event_id,
                arg(cmd, 3, "NAME")?,
                arg(cmd, 4, "EMAIL")?,
            )?;
            Ok(json!({ "id": event_id, "interested": count }))
        }
        ("profile", "show") => {
            let profile = Profile::new(&mut store, &users).load()?;
            to_json(&ProfileView::from(&profile))
        }
        ("profile", "set") => {
            let blob = cmd.get(5).map(|path| read_blob(path)).transpose()?;
            let profile = Profile::new(&mut store, &users).update(
                arg(cmd, 2, "NAME")?,
                arg(cmd, 3, "BIO")?,
                arg(cmd, 4, "ROLE")?,
                blob.as_deref(),
                &images,
            )?;
            to_json(&ProfileView::from(&profile))
        }
        _ => Err(AppError::Config(format!(
            "unknown command: {group} {action}\n\n{}",
            eco_app::config::usage()
        ))),
    }
}

fn main() {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print!("{}", eco_app::config::usage());
        return;
    }

    let mut cfg = AppConfig::from_env();
    let cmd = match cfg.apply_args(&args) {
        Ok(cmd) => cmd,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };
    init_logging(&cfg);

    match run(&cfg, &cmd) {
        Ok(value) => println!(
            "{}",
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
        ),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_directive_covers_workspace_crates() {
        let directive = log_directive("debug");
        assert_eq!(
            directive,
            "eco_app=debug,eco_storage=debug,ecoluxe=debug,warn"
        );
        assert!(EnvFilter::try_new(&directive).is_ok());
    }
}
