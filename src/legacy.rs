//! Extraction from the server-rendered profile page (the pre-app layout).
//!
//! The recent-activity list is styled markup whose class names carry CSS
//! module hashes. The stable hooks are the semantic class prefixes and the
//! `data-cy`/`data-testid` attributes; everything else on the page is
//! ignored. Records extracted here have no activity id, so dedup falls
//! back to [`crate::types::Activity::composite_key`].

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

use crate::date::parse_activity_date;
use crate::error::ParseError;
use crate::pace::calculate_pace;
use crate::types::Activity;

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

/// Parse the recent-activity list off a profile page, newest first.
///
/// An entry whose date phrase fails to normalize is skipped with a warning
/// rather than failing the whole page; `today` anchors the relative date
/// phrases (see [`crate::date::parse_activity_date`]).
pub fn extract_recent_activities(
    html: &str,
    today: NaiveDate,
) -> Result<Vec<Activity>, ParseError> {
    let document = Html::parse_document(html);

    let item_sel =
        Selector::parse("ol.RecentActivities_recentActivitiesList__HN_hR > li").unwrap();
    let timestamp_sel = Selector::parse("time.RecentActivities_timestamp__pB9a8").unwrap();
    let name_sel = Selector::parse("button[data-cy='recent-activity-name']").unwrap();
    let stat_sel = Selector::parse("ul[class^='Stats_listStats__'] li").unwrap();
    let stat_label_sel = Selector::parse("span[class^='Stat_statLabel__']").unwrap();
    let stat_value_sel = Selector::parse("div[class^='Stat_statValue__']").unwrap();

    let mut activities = Vec::new();
    for item in document.select(&item_sel) {
        let raw_date = item
            .select(&timestamp_sel)
            .next()
            .map(elem_text)
            .unwrap_or_default();
        let date = match parse_activity_date(&raw_date, today) {
            Ok(date) => date,
            Err(e) => {
                log::warn!("Skipping recent-activity entry: {e}");
                continue;
            }
        };

        let mut activity = Activity {
            date: Some(date),
            ..Activity::default()
        };

        activity.name = item
            .select(&name_sel)
            .next()
            .map(elem_text)
            .unwrap_or_default();
        activity.kind = infer_activity_kind(item);

        for stat in item.select(&stat_sel) {
            let label = stat
                .select(&stat_label_sel)
                .next()
                .map(elem_text)
                .unwrap_or_default();
            let value = stat
                .select(&stat_value_sel)
                .next()
                .map(elem_text)
                .unwrap_or_default();
            match label.as_str() {
                "Time" => activity.duration = value,
                "Distance" => activity.distance = value,
                "Elevation" => activity.elevation = value,
                _ => {}
            }
        }

        if activity.is_run() {
            activity.pace = calculate_pace(&activity.duration, &activity.distance);
        }

        activities.push(activity);
    }

    Ok(activities)
}

/// The activity kind is only rendered as an icon; its accessible title is
/// the one textual trace of it.
fn infer_activity_kind(item: ElementRef) -> String {
    let icon_title_sel = Selector::parse("svg[data-testid='activity-icon'] title").unwrap();
    item.select(&icon_title_sel)
        .next()
        .map(elem_text)
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}
