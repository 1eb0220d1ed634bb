use chrono::{Duration, NaiveDate, NaiveDateTime};
use icalendar::{Calendar, Component, Event, EventLike};

use crate::models::{ScheduleEntry, Staff};

#[derive(Clone, Default)]
pub struct ScheduleExporter;

impl ScheduleExporter {
    pub fn new() -> Self {
        Self
    }

    /// One event per shift in the week starting on `monday`. Shifts with
    /// unparseable times are skipped.
    pub fn generate(&self, staff: &Staff, entries: &[ScheduleEntry], monday: NaiveDate) -> Vec<u8> {
        if entries.is_empty() {
            return Vec::new();
        }

        let name = staff.full_name();
        let mut calendar = Calendar::new();
        calendar.name(&format!("{name} schedule"));

        for entry in entries {
            let (Some(start), Some(end)) = (entry.start(), entry.end()) else {
                continue;
            };
            let day = monday + Duration::days(entry.day_of_week.offset());
            let starts = NaiveDateTime::new(day, start);
            let ends = NaiveDateTime::new(day, end);

            let mut event = Event::new();
            event.summary(&format!("Shift: {name}"));
            event.starts(starts);
            event.ends(ends);
            let mut description = format!("Position: {}", staff.position);
            if let Some(notes) = &entry.notes {
                description.push('\n');
                description.push_str(notes);
            }
            event.description(&description);
            event.uid(&format!(
                "{}-{}-gym-staff-shift",
                starts.format("%Y%m%dT%H%M%S"),
                staff.id.as_deref().unwrap_or("unsaved")
            ));
            calendar.push(event);
        }

        calendar.to_string().into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DayOfWeek;

    fn staff() -> Staff {
        Staff {
            id: Some("s1".into()),
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            position: "Trainer".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_shift() {
        let monday = NaiveDate::from_ymd_opt(2025, 11, 24).unwrap();
        let entries = vec![ScheduleEntry {
            day_of_week: DayOfWeek::Tuesday,
            start_time: "06:00".into(),
            end_time: "14:00".into(),
            notes: Some("Front desk".into()),
        }];
        let body = String::from_utf8(ScheduleExporter::new().generate(&staff(), &entries, monday)).unwrap();
        assert!(body.contains("BEGIN:VEVENT"));
        assert!(body.contains("Shift: Ann Lee"));
        assert!(body.contains("20251125T060000"));
    }

    #[test]
    fn test_generate_empty() {
        let monday = NaiveDate::from_ymd_opt(2025, 11, 24).unwrap();
        assert!(ScheduleExporter::new().generate(&staff(), &[], monday).is_empty());
    }
}
