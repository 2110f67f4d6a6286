#![forbid(unsafe_code)]

use crate::error::AppError;
use std::path::PathBuf;

pub const DEFAULT_STORAGE_DIR: &str = ".ecoluxe";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub storage_dir: PathBuf,
    pub user: Option<String>,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            user: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

pub fn usage() -> &'static str {
    "ecoluxe: clothing-swap and eco-tracker store\n\n\
USAGE:\n\
  ecoluxe [--storage-dir DIR] [--user UID] [--log-level LEVEL] COMMAND [ARGS]\n\n\
COMMANDS:\n\
  chat-key A B                 print the conversation key of two users\n\
  eco show                     points, badges and level progress\n\
  eco log LABEL POINTS         log an activity\n\
  eco history                  logged activities, oldest first\n\
  chat open PEER               open (or create) the conversation with PEER\n\
  chat send KEY TEXT           send a message\n\
  chat messages KEY            messages of a conversation\n\
  chat list                    conversations, newest first\n\
  swap list [--mine]           available items\n\
  swap filter COLOR SIZE       available items, `All` disables a field\n\
  swap add NAME SIZE COLOR FILE...\n\
  swap swapped ITEM            mark an item as swapped\n\
  events list                  events ordered by date\n\
  events add TITLE DATE [DESCRIPTION] [IMAGE_URL]\n\
  events interest EVENT NAME EMAIL\n\
  profile show | profile set NAME BIO ROLE [IMAGE_FILE]\n\n\
ENV:\n\
  ECOLUXE_STORAGE_DIR, ECOLUXE_USER, ECOLUXE_LOG (flags win over env).\n"
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_var)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            storage_dir: lookup("ECOLUXE_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            user: lookup("ECOLUXE_USER"),
            log_level: lookup("ECOLUXE_LOG").unwrap_or(defaults.log_level),
        }
    }

    /// Applies leading flags and returns the remaining command words.
    pub fn apply_args(&mut self, args: &[String]) -> Result<Vec<String>, AppError> {
        let mut i = 0usize;
        while i < args.len() {
            match args[i].as_str() {
                "--storage-dir" => {
                    i += 1;
                    let v = args
                        .get(i)
                        .ok_or_else(|| AppError::Config("--storage-dir requires DIR".into()))?;
                    self.storage_dir = PathBuf::from(v);
                }
                "--user" => {
                    i += 1;
                    let v = args
                        .get(i)
                        .ok_or_else(|| AppError::Config("--user requires UID".into()))?;
                    self.user = Some(v.trim().to_string()).filter(|v| !v.is_empty());
                }
                "--log-level" => {
                    i += 1;
                    let v = args
                        .get(i)
                        .ok_or_else(|| AppError::Config("--log-level requires LEVEL".into()))?;
                    self.log_level = v.trim().to_string();
                }
                flag if flag.starts_with("--") => {
                    return Err(AppError::Config(format!("unknown flag: {flag}")));
                }
                _ => break,
            }
            i += 1;
        }
        Ok(args[i..].to_vec())
    }

    pub fn images_dir(&self) -> PathBuf {
        self.storage_dir.join("images")
    }
}
