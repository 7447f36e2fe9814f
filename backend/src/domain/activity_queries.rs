//! Derived views over an activity collection.
//!
//! Nothing here touches storage; these run over whatever slice the caller
//! holds (usually the app context's cached snapshot).

use chrono::{NaiveDate, TimeZone};

use super::models::Activity;

/// Activities for one kid, in their original relative order
pub fn for_kid<'a>(activities: &'a [Activity], kid_id: &str) -> Vec<&'a Activity> {
    activities.iter().filter(|a| a.kid_id == kid_id).collect()
}

/// Activities whose timestamp falls on `day` in the time zone `tz`
pub fn on_day<'a, Tz: TimeZone>(activities: &'a [Activity], day: NaiveDate, tz: &Tz) -> Vec<&'a Activity> {
    activities
        .iter()
        .filter(|a| a.timestamp.with_timezone(tz).date_naive() == day)
        .collect()
}

/// Sort newest first by timestamp. The sort is stable, so activities with the
/// same timestamp keep their insertion order.
pub fn newest_first(mut activities: Vec<&Activity>) -> Vec<&Activity> {
    activities.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    activities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ActivityDetails, NoteDetails};
    use chrono::{FixedOffset, Utc};

    fn note(id: &str, kid_id: &str, millis: i64) -> Activity {
        let at = Utc.timestamp_millis_opt(millis).unwrap();
        Activity {
            id: id.to_string(),
            kid_id: kid_id.to_string(),
            timestamp: at,
            created_at: at,
            updated_at: at,
            details: ActivityDetails::Note(NoteDetails {
                content: id.to_string(),
            }),
        }
    }

    fn ids(activities: &[&Activity]) -> Vec<String> {
        activities.iter().map(|a| a.id.clone()).collect()
    }

    #[test]
    fn test_for_kid_keeps_order() {
        let all = vec![note("a", "k1", 3), note("b", "k2", 2), note("c", "k1", 1)];
        assert_eq!(ids(&for_kid(&all, "k1")), vec!["a", "c"]);
        assert!(for_kid(&all, "k3").is_empty());
    }

    #[test]
    fn test_newest_first_is_stable() {
        let all = vec![note("a", "k1", 10), note("b", "k1", 30), note("c", "k1", 10), note("d", "k1", 20)];
        let sorted = newest_first(all.iter().collect());
        assert_eq!(ids(&sorted), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_on_day_uses_time_zone() {
        // 2024-01-01T23:30:00Z
        let late = Utc.with_ymd_and_hms(2024, 1, 1, 23, 30, 0).unwrap().timestamp_millis();
        let noon = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap().timestamp_millis();
        let all = vec![note("late", "k1", late), note("noon", "k1", noon)];

        let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let jan2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(ids(&on_day(&all, jan1, &Utc)), vec!["late", "noon"]);

        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(ids(&on_day(&all, jan1, &plus_two)), vec!["noon"]);
        assert_eq!(ids(&on_day(&all, jan2, &plus_two)), vec!["late"]);
    }
}
