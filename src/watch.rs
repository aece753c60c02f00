//! The per-run pipeline: resolve watched users, fetch their profiles,
//! detect the newest unseen activity, record it, announce it.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::detect::first_unseen;
use crate::notify::{Notifier, NotifyError, activity_alert, athlete_alert};
use crate::scraper::{ScraperError, WebScraper};
use crate::store::{HistoryStore, StoreError};
use crate::types::Activity;

/// Longest nickname the registry will look up.
pub const MAX_NICKNAME_LEN: usize = 12;

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("failed to query athlete {athlete_id}: {source}")]
    Fetch {
        athlete_id: String,
        source: ScraperError,
    },
    #[error("history store failure for athlete {athlete_id}: {source}")]
    Store {
        athlete_id: String,
        source: StoreError,
    },
    #[error("failed to notify for athlete {athlete_id}: {source}")]
    Notify {
        athlete_id: String,
        source: NotifyError,
    },
}

/// One watched user as registered: the athlete id to scrape and the name
/// to use in alerts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchedUser {
    pub strava_id: String,
    #[serde(default)]
    pub real_name: String,
}

/// Nickname registry, a JSON document of
/// `{"nickname": {"strava_id": "...", "real_name": "..."}}` keyed by
/// lowercase nickname.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Registry {
    users: HashMap<String, WatchedUser>,
}

impl Registry {
    pub fn new(users: HashMap<String, WatchedUser>) -> Self {
        Self { users }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let contents = fs::read_to_string(path)?;
        Ok(Self {
            users: serde_json::from_str(&contents)?,
        })
    }

    /// Resolve a nickname as typed, optionally in `/nickname` chat-command
    /// form. Matching is lowercase; names over [`MAX_NICKNAME_LEN`]
    /// characters are never looked up.
    pub fn lookup(&self, name: &str) -> Option<&WatchedUser> {
        if name.len() > MAX_NICKNAME_LEN {
            return None;
        }
        let nickname = name.strip_prefix('/').unwrap_or(name);
        self.users.get(&nickname.to_lowercase())
    }
}

/// Which upstream page layout to extract from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLayout {
    /// Server-rendered profile page with styled DOM hooks; composite
    /// identity keys.
    Classic,
    /// Profile page carrying a `__NEXT_DATA__` payload; id-based identity
    /// keys.
    NextData,
}

pub struct Watcher<S, N> {
    scraper: WebScraper,
    store: S,
    notifier: N,
}

impl<S: HistoryStore, N: Notifier> Watcher<S, N> {
    pub fn new(scraper: WebScraper, store: S, notifier: N) -> Self {
        Self {
            scraper,
            store,
            notifier,
        }
    }

    /// Check every requested nickname once, sequentially, and return how
    /// many notifications went out. Unknown nicknames are skipped; any
    /// other failure aborts the remaining batch.
    pub async fn run(
        &mut self,
        registry: &Registry,
        names: &[String],
        layout: PageLayout,
    ) -> Result<usize, WatchError> {
        let mut notified = 0;
        for name in names {
            let Some(user) = registry.lookup(name) else {
                log::warn!("Unknown nickname '{name}', skipping");
                continue;
            };
            let display_name = if user.real_name.is_empty() {
                name.strip_prefix('/').unwrap_or(name)
            } else {
                &user.real_name
            };
            let sent = match layout {
                PageLayout::Classic => self.check_classic(user, display_name).await?,
                PageLayout::NextData => self.check_next_data(user).await?,
            };
            if sent {
                notified += 1;
            }
        }
        Ok(notified)
    }

    async fn check_classic(
        &mut self,
        user: &WatchedUser,
        display_name: &str,
    ) -> Result<bool, WatchError> {
        let athlete_id = user.strava_id.clone();
        let activities = self
            .scraper
            .fetch_recent_activities(&athlete_id)
            .await
            .map_err(|source| WatchError::Fetch {
                athlete_id: athlete_id.clone(),
                source,
            })?;

        self.publish_first_unseen(&athlete_id, &activities, Activity::composite_key, |ac| {
            activity_alert(display_name, ac, &athlete_id)
        })
        .await
    }

    async fn check_next_data(&mut self, user: &WatchedUser) -> Result<bool, WatchError> {
        let athlete_id = user.strava_id.clone();
        let athlete = self
            .scraper
            .fetch_athlete(&athlete_id)
            .await
            .map_err(|source| WatchError::Fetch {
                athlete_id: athlete_id.clone(),
                source,
            })?;

        self.publish_first_unseen(
            &athlete_id,
            &athlete.recent_activities,
            Activity::id_key,
            |ac| athlete_alert(&athlete, ac),
        )
        .await
    }

    /// Record-then-notify for the newest unseen record, if any. The key
    /// goes into the store before the message goes out: a crash in between
    /// loses one notification instead of repeating it on every later run.
    async fn publish_first_unseen<K, R>(
        &mut self,
        athlete_id: &str,
        activities: &[Activity],
        key: K,
        render: R,
    ) -> Result<bool, WatchError>
    where
        K: Fn(&Activity) -> String,
        R: Fn(&Activity) -> String,
    {
        let seen = self
            .store
            .recorded_keys(athlete_id)
            .map_err(|source| WatchError::Store {
                athlete_id: athlete_id.to_string(),
                source,
            })?;

        let Some(new) = first_unseen(activities, &seen, &key) else {
            log::debug!("No new activity for athlete {athlete_id}");
            return Ok(false);
        };
        log::info!("New activity found: {new}");

        let new_key = key(new);
        self.store
            .record(athlete_id, &new_key)
            .map_err(|source| WatchError::Store {
                athlete_id: athlete_id.to_string(),
                source,
            })?;
        log::info!("Insert activity ok: {athlete_id}, {new_key}");

        self.notifier
            .send(&render(new))
            .await
            .map_err(|source| WatchError::Notify {
                athlete_id: athlete_id.to_string(),
                source,
            })?;
        Ok(true)
    }
}
