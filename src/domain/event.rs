use chrono::NaiveDate;

use super::child::Child;
use super::error::DomainError;
use super::ids::{ChildId, EventId};
use super::validators::non_blank;

/// Dated calendar entry for a child (appointments, school events, visits).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    id: EventId,
    title: String,
    child_id: ChildId,
    date: NaiveDate,
    description: Option<String>,
}

impl CalendarEvent {
    pub fn new(
        id: EventId,
        title: &str,
        child: &Child,
        date: NaiveDate,
        description: Option<String>,
    ) -> Result<Self, DomainError> {
        Self::restore(id, title, child.id().clone(), date, description)
    }

    pub fn restore(
        id: EventId,
        title: &str,
        child_id: ChildId,
        date: NaiveDate,
        description: Option<String>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            title: validate_title(title)?,
            child_id,
            date,
            description: non_blank(description),
        })
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn child_id(&self) -> &ChildId {
        &self.child_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn reschedule(&mut self, date: NaiveDate) {
        self.date = date;
    }

    pub fn update_text(&mut self, title: &str, description: Option<String>) -> Result<(), DomainError> {
        self.title = validate_title(title)?;
        self.description = non_blank(description);
        Ok(())
    }
}

fn validate_title(raw: &str) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, day).expect("valid date")
    }

    #[test]
    fn event_requires_title() {
        assert_eq!(
            CalendarEvent::restore(EventId::new("e"), " ", ChildId::new("c"), date(1), None),
            Err(DomainError::EmptyTitle)
        );
    }

    #[test]
    fn text_update_is_all_or_nothing() {
        let mut event = CalendarEvent::restore(
            EventId::new("e"),
            "Speech therapy",
            ChildId::new("c"),
            date(2),
            Some("bring the picture cards".to_string()),
        )
        .expect("valid event");

        assert!(event.update_text("", None).is_err());
        assert_eq!(event.title(), "Speech therapy");
        assert_eq!(event.description(), Some("bring the picture cards"));

        event.reschedule(date(9));
        assert_eq!(event.date(), date(9));
    }
}
