//! Outbound chat notifications and their message renderings.

use crate::types::{Activity, Athlete};
use crate::{ACTIVITY_URL, ATHLETE_URL};

const TG_OPENAPI_URL: &str = "https://api.telegram.org/bot";

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("failed to call sendMessage: {0}")]
    Http(#[from] reqwest::Error),
    #[error("TG_BOT_TOKEN and CHAT_ID must be set")]
    MissingCredentials,
}

/// Delivery seam for the chat message. Called at most once per athlete per
/// run, and only after the history write succeeded.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

/// Telegram Bot API `sendMessage`, form-encoded POST.
pub struct TelegramNotifier {
    client: reqwest::Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }

    /// Credentials from the `TG_BOT_TOKEN` and `CHAT_ID` environment
    /// variables.
    pub fn from_env() -> Result<Self, NotifyError> {
        let bot_token = std::env::var("TG_BOT_TOKEN").unwrap_or_default();
        let chat_id = std::env::var("CHAT_ID").unwrap_or_default();
        if bot_token.is_empty() || chat_id.is_empty() {
            return Err(NotifyError::MissingCredentials);
        }
        Ok(Self::new(bot_token, chat_id))
    }
}

impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let url = format!("{TG_OPENAPI_URL}{}/sendMessage", self.bot_token);
        self.client
            .post(&url)
            .form(&[("chat_id", self.chat_id.as_str()), ("text", text)])
            .send()
            .await?
            .error_for_status()?;
        log::info!("send message ok: {text}");
        Ok(())
    }
}

/// Single-line alert for a record scraped off the legacy page, which has
/// no activity id to link to; the profile link stands in.
pub fn activity_alert(real_name: &str, activity: &Activity, athlete_id: &str) -> String {
    let mut msg = format!(
        "{} just finished a new {}! Duration: {}",
        real_name, activity.kind, activity.duration
    );
    if activity.is_run() {
        msg.push_str(&format!(
            " | Distance: {} | Pace: {}",
            activity.distance, activity.pace
        ));
    }
    msg.push_str(&format!(" | {ATHLETE_URL}{athlete_id}"));
    msg
}

/// Multiline alert carrying the monthly aggregates and a direct activity
/// link, for records that have a real id.
pub fn athlete_alert(athlete: &Athlete, activity: &Activity) -> String {
    let mut msg = format!(
        "{} just finished a new {}!\nDuration: {}",
        athlete.name, activity.kind, activity.duration
    );
    if activity.is_run() {
        msg.push_str(&format!(
            " | Distance: {} | Pace: {}",
            activity.distance, activity.pace
        ));
    }
    msg.push_str(&format!(
        ".\n{}'s workout stat this month: {}, {}.\n{}{}",
        athlete.name, athlete.monthly_time, athlete.monthly_distance, ACTIVITY_URL, activity.id
    ));
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run() -> Activity {
        Activity {
            kind: "Run".to_string(),
            duration: "25:00".to_string(),
            distance: "5.0 km".to_string(),
            pace: "5:00/km".to_string(),
            id: 13884445800,
            ..Activity::default()
        }
    }

    fn ride() -> Activity {
        Activity {
            kind: "Ride".to_string(),
            duration: "1:02:03".to_string(),
            distance: "30.1 km".to_string(),
            id: 13884445801,
            ..Activity::default()
        }
    }

    #[test]
    fn run_alert_carries_distance_and_pace() {
        let msg = activity_alert("Zack", &run(), "96951505");
        assert_eq!(
            msg,
            "Zack just finished a new Run! Duration: 25:00 \
             | Distance: 5.0 km | Pace: 5:00/km \
             | https://www.strava.com/athletes/96951505"
        );
    }

    #[test]
    fn non_run_alert_skips_distance_and_pace() {
        let msg = activity_alert("Zack", &ride(), "96951505");
        assert_eq!(
            msg,
            "Zack just finished a new Ride! Duration: 1:02:03 \
             | https://www.strava.com/athletes/96951505"
        );
    }

    #[test]
    fn athlete_alert_includes_monthly_stats_and_activity_link() {
        let athlete = Athlete {
            id: 96951505,
            name: "Zack Wu".to_string(),
            monthly_distance: "42.2 km".to_string(),
            monthly_time: "5h 30m".to_string(),
            recent_activities: vec![run()],
        };
        let msg = athlete_alert(&athlete, &athlete.recent_activities[0]);
        assert_eq!(
            msg,
            "Zack Wu just finished a new Run!\n\
             Duration: 25:00 | Distance: 5.0 km | Pace: 5:00/km.\n\
             Zack Wu's workout stat this month: 5h 30m, 42.2 km.\n\
             https://www.strava.com/activities/13884445800"
        );
    }

    #[test]
    fn from_env_requires_both_credentials() {
        // Env mutation is process-wide; no other test touches these names.
        unsafe {
            std::env::remove_var("TG_BOT_TOKEN");
            std::env::remove_var("CHAT_ID");
        }
        assert!(matches!(
            TelegramNotifier::from_env(),
            Err(NotifyError::MissingCredentials)
        ));
    }
}
