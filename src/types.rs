use std::fmt::Display;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One logged workout in the unified shape both page layouts reduce to.
///
/// The legacy profile page yields a calendar `date` and no `id`; the
/// `__NEXT_DATA__` page yields a real `id` and, once back-filled from the
/// single-activity page, a `start_local` timestamp. The two temporal fields
/// are never both set.
///
/// Deserializes directly from the activity objects inside the embedded page
/// state; unknown upstream fields are ignored and missing ones default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Activity {
    pub date: Option<NaiveDate>,
    /// Local start timestamp, `2025-03-15T06:50:19` form. Empty until
    /// back-filled.
    #[serde(rename = "startLocal")]
    pub start_local: String,
    pub id: i64,
    pub name: String,
    #[serde(rename = "detailedType")]
    pub kind: String,
    #[serde(rename = "movingTime")]
    pub duration: String,
    pub distance: String,
    pub elevation: String,
    pub pace: String,
}

impl Activity {
    /// Dedup key for records scraped off the legacy page: date, kind,
    /// duration and distance joined with `#`, all whitespace removed.
    /// Two identical-looking activities on the same day collide; the
    /// legacy page exposes nothing stronger to key on.
    pub fn composite_key(&self) -> String {
        let date = self.date.map(|d| d.to_string()).unwrap_or_default();
        format!(
            "{}#{}#{}#{}",
            date, self.kind, self.duration, self.distance
        )
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
    }

    /// Dedup key for records carrying a real activity id.
    pub fn id_key(&self) -> String {
        self.id.to_string()
    }

    /// Whether this activity gets a pace: pace only makes sense for runs.
    pub fn is_run(&self) -> bool {
        self.kind.eq_ignore_ascii_case("run")
    }
}

impl Display for Activity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(date) = self.date {
            write!(f, "[{}] ", date)?;
        } else if !self.start_local.is_empty() {
            write!(f, "[{}] ", self.start_local)?;
        }
        write!(f, "{}: {} ({}", self.kind, self.name, self.duration)?;
        if !self.distance.is_empty() {
            write!(f, ", {}", self.distance)?;
        }
        if !self.pace.is_empty() {
            write!(f, ", {}", self.pace)?;
        }
        write!(f, ")")
    }
}

/// An athlete with the recent activities shown on their profile page,
/// newest first, plus the monthly aggregates as rendered upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Athlete {
    pub id: i64,
    pub name: String,
    pub recent_activities: Vec<Activity>,
    pub monthly_distance: String,
    pub monthly_time: String,
}

impl Display for Athlete {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} (athlete {})", self.name, self.id)?;
        if !self.monthly_time.is_empty() || !self.monthly_distance.is_empty() {
            writeln!(
                f,
                "  This month: {}, {}",
                self.monthly_time, self.monthly_distance
            )?;
        }
        for (i, activity) in self.recent_activities.iter().enumerate() {
            writeln!(f, "{:>3}. {}", i + 1, activity)?;
        }
        Ok(())
    }
}
