//! Change detection over freshly extracted activity lists.

use std::collections::HashSet;

use crate::types::Activity;

/// First record whose identity key is not in `seen`. The lists are newest
/// first, so this is the newest unseen activity; older unseen records are
/// intentionally left for later runs, which bounds each pass to a single
/// notification per athlete.
pub fn first_unseen<'a, K>(
    activities: &'a [Activity],
    seen: &HashSet<String>,
    key: K,
) -> Option<&'a Activity>
where
    K: Fn(&Activity) -> String,
{
    activities
        .iter()
        .find(|&activity| !seen.contains(&key(activity)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Activity {
        Activity {
            name: name.to_string(),
            ..Activity::default()
        }
    }

    fn by_name(activity: &Activity) -> String {
        activity.name.clone()
    }

    fn seen(keys: &[&str]) -> HashSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn returns_newest_unseen_record() {
        let activities = vec![named("k3"), named("k1"), named("k2")];
        let found = first_unseen(&activities, &seen(&["k1", "k2"]), by_name);
        assert_eq!(found.map(|a| a.name.as_str()), Some("k3"));
    }

    #[test]
    fn returns_none_when_everything_is_recorded() {
        let activities = vec![named("k1"), named("k2")];
        assert!(first_unseen(&activities, &seen(&["k1", "k2"]), by_name).is_none());
    }

    #[test]
    fn returns_none_for_empty_list() {
        assert!(first_unseen(&[], &seen(&["k1"]), by_name).is_none());
    }

    #[test]
    fn reports_only_the_first_of_several_unseen() {
        let activities = vec![named("k4"), named("k3"), named("k1")];
        let found = first_unseen(&activities, &seen(&["k1"]), by_name);
        assert_eq!(found.map(|a| a.name.as_str()), Some("k4"));
    }

    #[test]
    fn empty_seen_set_reports_the_newest_record() {
        let activities = vec![named("k2"), named("k1")];
        let found = first_unseen(&activities, &HashSet::new(), by_name);
        assert_eq!(found.map(|a| a.name.as_str()), Some("k2"));
    }
}
