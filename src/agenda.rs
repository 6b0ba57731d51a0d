//! Day-by-day agenda across every child, built from routine recurrences and
//! calendar events.

use std::fmt;
use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::validators::{format_date, format_time};
use crate::domain::{ChildId, Person, Routine};
use crate::household::Household;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgendaKind {
    Routine,
    Event,
}

impl AgendaKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Routine => "routine",
            Self::Event => "event",
        }
    }
}

impl fmt::Display for AgendaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaEntry {
    pub date: NaiveDate,
    pub kind: AgendaKind,
    pub child_name: String,
    pub title: String,
    pub detail: String,
}

#[derive(Debug, Serialize)]
struct AgendaRow<'a> {
    date: String,
    kind: &'static str,
    child: &'a str,
    title: &'a str,
    detail: &'a str,
}

/// Entries for every date in `from..=to`, sorted by date, kind, then title.
/// An inverted range yields nothing.
pub fn build(household: &Household, from: NaiveDate, to: NaiveDate) -> Vec<AgendaEntry> {
    if from > to {
        return Vec::new();
    }

    let mut entries = Vec::new();
    for date in from.iter_days().take_while(|date| *date <= to) {
        for routine in household.routines() {
            if routine.applies_on_date(date) {
                entries.push(AgendaEntry {
                    date,
                    kind: AgendaKind::Routine,
                    child_name: child_name(household, routine.child_id()),
                    title: routine.name().to_string(),
                    detail: routine_detail(routine),
                });
            }
        }

        for event in household.events_on(date) {
            entries.push(AgendaEntry {
                date,
                kind: AgendaKind::Event,
                child_name: child_name(household, event.child_id()),
                title: event.title().to_string(),
                detail: event.description().unwrap_or_default().to_string(),
            });
        }
    }

    entries.sort_by(|a, b| {
        (a.date, a.kind, &a.title, &a.child_name).cmp(&(b.date, b.kind, &b.title, &b.child_name))
    });
    entries
}

/// Write entries as CSV with a `date,kind,child,title,detail` header.
pub fn write_csv<W: Write>(writer: W, entries: &[AgendaEntry]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for entry in entries {
        csv_writer.serialize(AgendaRow {
            date: format_date(entry.date),
            kind: entry.kind.label(),
            child: &entry.child_name,
            title: &entry.title,
            detail: &entry.detail,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn child_name(household: &Household, child_id: &ChildId) -> String {
    household
        .child(child_id)
        .map(|child| child.name().to_string())
        .unwrap_or_else(|_| child_id.to_string())
}

fn routine_detail(routine: &Routine) -> String {
    let steps = match routine.items().len() {
        1 => "1 step".to_string(),
        count => format!("{count} steps"),
    };
    match routine.items().first().and_then(|item| item.start_time()) {
        Some(start) => format!("{steps} from {}", format_time(start)),
        None => steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ChildInput, EventId, GuardianId, GuardianInput, Recurrence, RoutineId, ValidationPolicy,
    };
    use chrono::{NaiveTime, Weekday};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).expect("valid date")
    }

    fn household() -> Household {
        let today = date(1);
        let mut household = Household::new(ValidationPolicy::default());
        household
            .register_guardian(
                GuardianId::new("g-1"),
                GuardianInput {
                    name: "Maria Silva".to_string(),
                    birth_date: "15/06/1985".to_string(),
                    email: "maria@example.com".to_string(),
                    guardian_type: "mother".to_string(),
                    max_children: 2,
                    ..GuardianInput::default()
                },
                today,
            )
            .expect("guardian");
        household
            .register_child(
                ChildId::new("c-1"),
                &GuardianId::new("g-1"),
                ChildInput {
                    name: "Ana Silva".to_string(),
                    birth_date: "10/02/2018".to_string(),
                    support_level: "moderate".to_string(),
                    sensory_profile: None,
                },
                today,
            )
            .expect("child");

        let mut therapy = Routine::new(
            RoutineId::new("r-1"),
            ChildId::new("c-1"),
            "Therapy session",
            Recurrence::weekly(&[Weekday::Mon, Weekday::Wed]).expect("recurrence"),
        )
        .expect("routine");
        therapy
            .register_item_auto(
                "Arrive",
                None,
                NaiveTime::from_hms_opt(14, 0, 0),
                NaiveTime::from_hms_opt(14, 10, 0),
            )
            .expect("item");
        household.add_routine(therapy).expect("routine added");
        household
            .add_event(
                EventId::new("e-1"),
                "Dentist",
                &ChildId::new("c-1"),
                date(3),
                Some("bring the x-rays".to_string()),
            )
            .expect("event");
        household
    }

    #[test]
    fn agenda_lists_routines_and_events_by_day() {
        // 2025-03-03 is a Monday.
        let entries = build(&household(), date(3), date(5));

        let summary: Vec<(u32, AgendaKind, &str)> = entries
            .iter()
            .map(|entry| {
                use chrono::Datelike;
                (entry.date.day(), entry.kind, entry.title.as_str())
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                (3, AgendaKind::Routine, "Therapy session"),
                (3, AgendaKind::Event, "Dentist"),
                (5, AgendaKind::Routine, "Therapy session"),
            ]
        );
        assert_eq!(entries[0].child_name, "Ana Silva");
        assert_eq!(entries[0].detail, "1 step from 14:00");
        assert_eq!(entries[1].detail, "bring the x-rays");
    }

    #[test]
    fn inverted_range_is_empty() {
        assert!(build(&household(), date(5), date(3)).is_empty());
    }

    #[test]
    fn csv_export_has_header_and_rows() {
        let entries = build(&household(), date(3), date(3));
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &entries).expect("csv written");

        let text = String::from_utf8(buffer).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,kind,child,title,detail");
        assert_eq!(
            lines[1],
            "03/03/2025,routine,Ana Silva,Therapy session,1 step from 14:00"
        );
        assert_eq!(lines[2], "03/03/2025,event,Ana Silva,Dentist,bring the x-rays");
    }
}
