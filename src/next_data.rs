//! Extraction from profile pages that ship their render state as a JSON
//! document inside `<script id="__NEXT_DATA__">`.
//!
//! The payload nests the interesting data several levels deep inside the
//! page-framework envelope (`props.pageProps...`). The envelope levels are
//! required; everything below them defaults, so new upstream fields never
//! break decoding. Records from this layout carry a real activity id, so
//! dedup uses [`crate::types::Activity::id_key`].

use scraper::{Html, Selector};
use serde::Deserialize;

use crate::error::ParseError;
use crate::pace::calculate_pace;
use crate::types::{Activity, Athlete};

/// Pull the raw JSON payload out of the page: the text of the first script
/// element whose id is the `__NEXT_DATA__` marker, in document order.
fn extract_next_data_json(html: &str) -> Result<String, ParseError> {
    let document = Html::parse_document(html);
    let script_sel = Selector::parse("script#__NEXT_DATA__").unwrap();

    document
        .select(&script_sel)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .filter(|raw| !raw.is_empty())
        .ok_or(ParseError::NextDataNotFound)
}

/// JSON syntax failures and structural mismatches are different upstream
/// conditions; `serde_json` tells them apart for us.
fn decode<T: for<'de> Deserialize<'de>>(raw: &str) -> Result<T, ParseError> {
    serde_json::from_str(raw).map_err(|e| match e.classify() {
        serde_json::error::Category::Data => ParseError::Schema(e),
        _ => ParseError::Json(e),
    })
}

#[derive(Deserialize)]
struct AthletePage {
    props: AthleteProps,
}

#[derive(Deserialize)]
struct AthleteProps {
    #[serde(rename = "pageProps")]
    page_props: AthletePageProps,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct AthletePageProps {
    #[serde(rename = "athleteData")]
    athlete_data: AthleteData,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct AthleteData {
    athlete: AthleteIdent,
    #[serde(rename = "recentActivities")]
    recent_activities: Vec<Activity>,
    stats: MonthlyStats,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct AthleteIdent {
    id: i64,
    name: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct MonthlyStats {
    #[serde(rename = "monthlyDistance")]
    monthly_distance: String,
    #[serde(rename = "monthlyTime")]
    monthly_time: String,
}

/// Decode an athlete profile page: identity, recent activities (newest
/// first) and the monthly aggregates, with pace filled in for runs.
pub fn extract_athlete(html: &str) -> Result<Athlete, ParseError> {
    let raw = extract_next_data_json(html)?;
    let page: AthletePage = decode(&raw)?;
    let data = page.props.page_props.athlete_data;

    let mut athlete = Athlete {
        id: data.athlete.id,
        name: data.athlete.name,
        recent_activities: data.recent_activities,
        monthly_distance: data.stats.monthly_distance,
        monthly_time: data.stats.monthly_time,
    };

    for activity in &mut athlete.recent_activities {
        if activity.is_run() {
            activity.pace = calculate_pace(&activity.duration, &activity.distance);
        }
    }

    Ok(athlete)
}

#[derive(Deserialize)]
struct ActivityPage {
    props: ActivityProps,
}

#[derive(Deserialize)]
struct ActivityProps {
    #[serde(rename = "pageProps")]
    page_props: ActivityPageProps,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ActivityPageProps {
    activity: ActivityStart,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ActivityStart {
    #[serde(rename = "startLocal")]
    start_local: String,
}

/// Decode a single-activity page for its local start timestamp
/// (`2025-03-15T06:50:19` form), used to back-fill
/// [`crate::types::Activity::start_local`] on records that only carry an
/// id.
pub fn extract_activity_start(html: &str) -> Result<String, ParseError> {
    let raw = extract_next_data_json(html)?;
    let page: ActivityPage = decode(&raw)?;
    Ok(page.props.page_props.activity.start_local)
}
