//! Pure formatting helpers. The controller never formats times itself; views
//! call these with an explicit timezone instead of each converting ad hoc.

use crate::types::Slot;
use chrono::NaiveDate;
use chrono_tz::Tz;

/// The wire date format, `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// "09:00-09:30" in the given zone.
pub fn format_slot_range(slot: &Slot, tz: Tz) -> String {
    format!(
        "{}-{}",
        slot.start_time.with_timezone(&tz).format("%H:%M"),
        slot.end_time.with_timezone(&tz).format("%H:%M")
    )
}

/// Zone-qualified start instant, e.g. "2025-03-10 09:00 CST".
pub fn format_slot_start(slot: &Slot, tz: Tz) -> String {
    slot.start_time
        .with_timezone(&tz)
        .format("%Y-%m-%d %H:%M %Z")
        .to_string()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::{SlotId, SlotStatus};
    use chrono::NaiveDate;

    fn slot() -> Slot {
        let start = NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap()
            .and_utc();
        Slot {
            id: SlotId::from("s"),
            start_time: start,
            end_time: start + chrono::Duration::minutes(30),
            status: SlotStatus::Available,
        }
    }

    #[test]
    fn formats_wire_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(format_date(date), "2025-03-10");
    }

    #[test]
    fn converts_into_the_given_zone() {
        // 15:00 UTC in mid-January is 09:00 in Chicago and 20:30 in Kolkata
        assert_eq!(
            format_slot_range(&slot(), chrono_tz::America::Chicago),
            "09:00-09:30"
        );
        assert_eq!(
            format_slot_range(&slot(), chrono_tz::Asia::Kolkata),
            "20:30-21:00"
        );
        assert_eq!(format_slot_range(&slot(), chrono_tz::UTC), "15:00-15:30");
    }

    #[test]
    fn start_instant_carries_the_zone_name() {
        assert_eq!(
            format_slot_start(&slot(), chrono_tz::America::Chicago),
            "2025-01-15 09:00 CST"
        );
    }
}
