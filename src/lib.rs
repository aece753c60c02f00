pub mod date;
pub mod detect;
pub mod error;
pub mod legacy;
pub mod next_data;
pub mod notify;
pub mod pace;
pub mod scraper;
pub mod store;
pub mod types;
pub mod watch;

pub use scraper::WebScraper;
pub use types::{Activity, Athlete};
pub use watch::Watcher;

/// Public profile page for an athlete id.
pub const ATHLETE_URL: &str = "https://www.strava.com/athletes/";
/// Public page for a single activity id.
pub const ACTIVITY_URL: &str = "https://www.strava.com/activities/";
