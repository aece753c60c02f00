//! Pace derivation from the human-readable stat strings.

/// Compute a `M:SS/km` pace from a `H:MM:SS` or `MM:SS` duration and a
/// distance such as `"5.2 km"`.
///
/// Malformed input never errors: anything that does not yield a finite
/// positive distance and a two- or three-segment duration degrades to
/// `"N/A"`. Unparsable duration segments count as zero rather than failing
/// the whole derivation.
pub fn calculate_pace(duration: &str, distance: &str) -> String {
    let distance = distance.replace("km", "");
    let distance = distance.trim();

    let segments: Vec<&str> = duration.split(':').collect();
    if segments.len() != 2 && segments.len() != 3 {
        return "N/A".to_string();
    }

    let total_seconds = segments
        .iter()
        .map(|s| s.parse::<u64>().unwrap_or(0))
        .fold(0u64, |acc, n| acc * 60 + n);

    let dist: f64 = match distance.parse() {
        Ok(d) => d,
        Err(_) => return "N/A".to_string(),
    };
    if !dist.is_finite() || dist <= 0.0 {
        return "N/A".to_string();
    }

    let pace_seconds = (total_seconds as f64 / dist) as u64;
    format!("{}:{:02}/km", pace_seconds / 60, pace_seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pace_for_even_run() {
        assert_eq!(calculate_pace("25:00", "5.0km"), "5:00/km");
    }

    #[test]
    fn pace_accepts_unit_with_surrounding_whitespace() {
        assert_eq!(calculate_pace("25:00", " 5.0 km "), "5:00/km");
    }

    #[test]
    fn pace_floors_fractional_seconds() {
        // 600 s over 3 km is exactly 200 s; 601 s still floors to 200.
        assert_eq!(calculate_pace("10:00", "3.0km"), "3:20/km");
        assert_eq!(calculate_pace("10:01", "3.0km"), "3:20/km");
    }

    #[test]
    fn pace_handles_hour_long_durations() {
        assert_eq!(calculate_pace("1:00:00", "10km"), "6:00/km");
    }

    #[test]
    fn zero_distance_is_not_computable() {
        assert_eq!(calculate_pace("25:00", "0km"), "N/A");
    }

    #[test]
    fn unparsable_distance_is_not_computable() {
        assert_eq!(calculate_pace("25:00", "far"), "N/A");
        assert_eq!(calculate_pace("25:00", ""), "N/A");
    }

    #[test]
    fn negative_distance_is_not_computable() {
        assert_eq!(calculate_pace("25:00", "-5km"), "N/A");
    }

    #[test]
    fn wrong_segment_count_is_not_computable() {
        assert_eq!(calculate_pace("25", "5km"), "N/A");
        assert_eq!(calculate_pace("1:2:3:4", "5km"), "N/A");
        assert_eq!(calculate_pace("", "5km"), "N/A");
    }

    #[test]
    fn unparsable_segments_count_as_zero() {
        assert_eq!(calculate_pace("xx:30", "1km"), "0:30/km");
    }

    #[test]
    fn seconds_are_zero_padded() {
        assert_eq!(calculate_pace("10:05", "1km"), "10:05/km");
    }
}
