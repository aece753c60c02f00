//! HTTP fetch layer over the public profile and activity pages.

use std::time::Duration;

use reqwest::Client;

use crate::date::today_in_reference_tz;
use crate::error::ParseError;
use crate::types::{Activity, Athlete};
use crate::{ACTIVITY_URL, ATHLETE_URL, legacy, next_data};

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
}

impl WebScraper {
    pub fn new() -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self { client })
    }

    /// Recent activities scraped off the legacy profile page layout.
    pub async fn fetch_recent_activities(
        &self,
        athlete_id: &str,
    ) -> Result<Vec<Activity>, ScraperError> {
        let url = format!("{ATHLETE_URL}{athlete_id}");
        log::info!("Fetching profile page: {url}");
        let html = self.get_html(&url).await?;
        Ok(legacy::extract_recent_activities(
            &html,
            today_in_reference_tz(),
        )?)
    }

    /// Athlete detail from the `__NEXT_DATA__` profile page layout.
    pub async fn fetch_athlete(&self, athlete_id: &str) -> Result<Athlete, ScraperError> {
        let url = format!("{ATHLETE_URL}{athlete_id}");
        log::info!("Fetching profile page: {url}");
        let html = self.get_html(&url).await?;
        Ok(next_data::extract_athlete(&html)?)
    }

    /// Local start timestamp of a single activity.
    pub async fn fetch_activity_start(&self, activity_id: i64) -> Result<String, ScraperError> {
        let url = format!("{ACTIVITY_URL}{activity_id}");
        log::info!("Fetching activity page: {url}");
        let html = self.get_html(&url).await?;
        Ok(next_data::extract_activity_start(&html)?)
    }

    async fn get_html(&self, url: &str) -> Result<String, ScraperError> {
        Ok(self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?
            .error_for_status()?
            .text()
            .await
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?)
    }
}
