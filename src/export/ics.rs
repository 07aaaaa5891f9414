//! iCalendar export
//!
//! One VEVENT per materialized calendar event. UID is the event's counter
//! value; DTSTAMP is added by the encoder at render time.

use chrono::Utc;
use icalendar::{Calendar, Component, Event, EventLike};

use crate::pipeline::CalendarEvent;

/// Render events as an iCalendar document, ready to write to a `.ics` file.
pub fn render_calendar(events: &[CalendarEvent]) -> String {
    let mut calendar = Calendar::new();
    for event in events {
        calendar.push(
            Event::new()
                .uid(&event.uid.to_string())
                .summary(&event.title)
                .description(&event.description)
                .starts(event.start.with_timezone(&Utc))
                .done(),
        );
    }
    calendar.done().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::calendar::parse_event_datetime;

    fn sample_event(uid: u64, title: &str) -> CalendarEvent {
        CalendarEvent {
            uid,
            title: title.to_string(),
            description: format!("{} description", title),
            start: parse_event_datetime("2025-12-05T19:00:00+12:00").unwrap(),
        }
    }

    #[test]
    fn test_one_vevent_per_event() {
        let ics = render_calendar(&[sample_event(1, "Wrap and Roll"), sample_event(2, "Sunset Suppers")]);

        assert!(ics.contains("BEGIN:VCALENDAR"));
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
        assert!(ics.contains("UID:1"));
        assert!(ics.contains("UID:2"));
        assert!(ics.contains("SUMMARY:Wrap and Roll"));
        assert!(ics.contains("DESCRIPTION:Wrap and Roll description"));
    }

    #[test]
    fn test_start_time_is_utc_normalized() {
        let ics = render_calendar(&[sample_event(1, "Evening post")]);
        // 19:00 at +12:00 is 07:00 UTC.
        assert!(ics.contains("DTSTART:20251205T070000Z"), "unexpected ics:\n{}", ics);
    }

    #[test]
    fn test_empty_event_list_still_renders_a_calendar() {
        let ics = render_calendar(&[]);
        assert!(ics.contains("BEGIN:VCALENDAR"));
        assert!(!ics.contains("BEGIN:VEVENT"));
    }
}
